// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CSS-style colour parsing.
//!
//! Accepted forms: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` and
//! `rgba(r, g, b, a)` with `a` in `0.0..=1.0`.

use lamina_core::style::Rgba;

use crate::ConfigError;

/// Parses a colour string.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidColor`] if `input` is not one of the
/// accepted forms.
pub fn parse_color(input: &str) -> Result<Rgba, ConfigError> {
    let s = input.trim();
    let parsed = if let Some(hex) = s.strip_prefix('#') {
        parse_hex(hex)
    } else if let Some(args) = s.strip_prefix("rgba(").and_then(|r| r.strip_suffix(')')) {
        parse_components(args, true)
    } else if let Some(args) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
        parse_components(args, false)
    } else {
        None
    };
    parsed.ok_or_else(|| ConfigError::InvalidColor(input.to_owned()))
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize, width: usize| -> Option<u8> {
        let v = u8::from_str_radix(hex.get(i * width..(i + 1) * width)?, 16).ok()?;
        // Short form: `f` means `ff`.
        Some(if width == 1 { v * 17 } else { v })
    };
    match hex.len() {
        3 => Some(Rgba::opaque(channel(0, 1)?, channel(1, 1)?, channel(2, 1)?)),
        6 => Some(Rgba::opaque(channel(0, 2)?, channel(1, 2)?, channel(2, 2)?)),
        8 => Some(Rgba::new(
            channel(0, 2)?,
            channel(1, 2)?,
            channel(2, 2)?,
            f32::from(channel(3, 2)?) / 255.0,
        )),
        _ => None,
    }
}

fn parse_components(args: &str, with_alpha: bool) -> Option<Rgba> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }
    let r = parts[0].parse().ok()?;
    let g = parts[1].parse().ok()?;
    let b = parts[2].parse().ok()?;
    let a = match parts.get(3) {
        Some(a) => a.parse::<f32>().ok().filter(|a| (0.0..=1.0).contains(a))?,
        None => 1.0,
    };
    Some(Rgba::new(r, g, b, a))
}
