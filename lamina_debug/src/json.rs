// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structured JSON output.
//!
//! [`JsonLinesSink`] writes every trace event as one JSON object per line
//! (`{"event": ..., ...}`), which log pipelines can ingest directly.
//! [`snapshot`] captures the reveal state of a whole
//! [`LayerManager`](lamina_core::layer::LayerManager).

use std::io::Write;

use serde_json::{Value, json};

use lamina_core::layer::{LayerAddress, LayerManager, Visibility};
use lamina_core::trace::{
    ActiveCategoryEvent, CategoryAllocatedEvent, LevelChangeEvent, StampEvent, TraceSink,
};

use crate::pretty::{allocator_name, direction_name};

/// Writes one JSON object per trace event.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for JsonLinesSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesSink").finish_non_exhaustive()
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, value: &Value) {
        if serde_json::to_writer(&mut self.writer, value).is_ok() {
            let _ = self.writer.write_all(b"\n");
        }
    }
}

fn address(address: Option<LayerAddress>) -> Value {
    match address {
        Some(a) => json!({ "category": a.category, "level": a.level }),
        None => Value::Null,
    }
}

impl<W: Write> TraceSink for JsonLinesSink<W> {
    fn on_category_allocated(&mut self, e: &CategoryAllocatedEvent) {
        self.emit(&json!({
            "event": "category_allocated",
            "category": e.category,
            "allocator": allocator_name(e.allocator),
            "features": e.features,
            "dropped": e.dropped,
            "layers": e.layers,
        }));
    }

    fn on_level_change(&mut self, e: &LevelChangeEvent) {
        self.emit(&json!({
            "event": "level_change",
            "category": e.category,
            "direction": direction_name(e.direction),
            "from": e.from,
            "to": e.to,
            "changed": address(e.changed),
        }));
    }

    fn on_stamp(&mut self, e: &StampEvent) {
        self.emit(&json!({
            "event": "stamp",
            "category": e.category,
            "layers": e.layers,
            "center": [e.x, e.y],
            "radius": e.radius,
        }));
    }

    fn on_active_category(&mut self, e: &ActiveCategoryEvent) {
        self.emit(&json!({
            "event": "active_category",
            "from": e.from,
            "to": e.to,
        }));
    }
}

fn visibility_name(visibility: Option<Visibility>) -> &'static str {
    match visibility {
        Some(Visibility::Revealed) => "revealed",
        Some(Visibility::Pinned) => "pinned",
        Some(Visibility::Hidden) | None => "hidden",
    }
}

/// Captures the categories, levels, z-indices and stamps of `manager`.
#[must_use]
pub fn snapshot(manager: &LayerManager) -> Value {
    let categories: Vec<Value> = manager
        .categories()
        .iter()
        .enumerate()
        .map(|(index, category)| {
            let layers: Vec<Value> = category
                .layers()
                .iter()
                .map(|layer| {
                    let stamps: Vec<Value> = layer
                        .stamps()
                        .iter()
                        .map(|s| json!({ "center": [s.center().x, s.center().y], "radius": s.radius() }))
                        .collect();
                    json!({
                        "level": layer.level(),
                        "source_level": layer.source_level(),
                        "z_index": layer.z_index(),
                        "features": layer.len(),
                        "visibility": visibility_name(manager.visibility(layer.address())),
                        "stamps": stamps,
                    })
                })
                .collect();
            json!({
                "index": index,
                "name": category.name(),
                "current_level": category.current_level(),
                "layers": layers,
            })
        })
        .collect();

    let extent = manager
        .extent()
        .map_or(Value::Null, |r| json!([r.x0, r.y0, r.x1, r.y1]));

    json!({
        "active_category": manager.active_category(),
        "extent": extent,
        "categories": categories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use lamina_core::feature::{FeatureId, FeatureRecord, Geometry};
    use lamina_core::layer::{InitialLevel, Layer, LayerCategory, LayerManager};
    use lamina_core::stamp::Stamp;
    use lamina_core::style::Style;
    use lamina_core::trace::LevelDirection;

    fn manager() -> LayerManager {
        let layers = (0..3_u32)
            .map(|i| {
                let mut layer = Layer::new(0, i as usize, Style::TextLabel { field: "name".into() });
                let x = f64::from(i);
                layer.add_feature(FeatureRecord::new(FeatureId(i), Geometry::Point(Point::new(x, x))));
                layer
            })
            .collect();
        LayerManager::new(vec![LayerCategory::new("parks", layers, InitialLevel::First)]).unwrap()
    }

    #[test]
    fn one_object_per_line() {
        let mut sink = JsonLinesSink::new(Vec::<u8>::new());
        sink.on_level_change(&LevelChangeEvent {
            category: 0,
            direction: LevelDirection::Up,
            from: Some(0),
            to: Some(1),
            changed: Some(LayerAddress { category: 0, level: 1 }),
        });
        sink.on_active_category(&ActiveCategoryEvent { from: 1, to: 0 });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<Value> = output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2, "got: {output}");
        assert_eq!(lines[0]["event"], "level_change");
        assert_eq!(lines[0]["changed"]["level"], 1);
        assert_eq!(lines[1]["event"], "active_category");
        assert_eq!(lines[1]["to"], 0);
    }

    #[test]
    fn pinned_transition_has_null_change() {
        let mut sink = JsonLinesSink::new(Vec::<u8>::new());
        sink.on_level_change(&LevelChangeEvent {
            category: 3,
            direction: LevelDirection::Down,
            from: Some(0),
            to: None,
            changed: None,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        let value: Value = serde_json::from_str(output.trim()).unwrap();
        assert!(value["changed"].is_null(), "got: {output}");
        assert!(value["to"].is_null(), "got: {output}");
    }

    #[test]
    fn snapshot_reports_visibility_and_stamps() {
        let mut m = manager();
        let _ = m.increment_level();
        let _ = m.add_stamp(Stamp::from_brush(Point::new(1.0, 1.0), 2.0).unwrap());
        let _ = m.decrement_level();

        let snap = snapshot(&m);
        assert_eq!(snap["active_category"], 0);
        assert_eq!(snap["extent"], json!([0.0, 0.0, 2.0, 2.0]));
        let category = &snap["categories"][0];
        assert_eq!(category["name"], "parks");
        assert_eq!(category["current_level"], 0);
        let layers = category["layers"].as_array().unwrap();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0]["visibility"], "revealed");
        assert_eq!(layers[1]["visibility"], "pinned");
        assert_eq!(layers[2]["visibility"], "hidden");
        assert_eq!(layers[0]["z_index"], 2);
        assert_eq!(layers[1]["stamps"][0]["radius"], 2.0);
    }

    #[test]
    fn manager_events_reach_a_boxed_sink() {
        use std::cell::RefCell;
        use std::rc::Rc;

        #[derive(Clone, Default)]
        struct Shared(Rc<RefCell<Vec<u8>>>);
        impl Write for Shared {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.borrow_mut().write(buf)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let buffer = Shared::default();
        let mut m = manager();
        m.set_trace_sink(Box::new(JsonLinesSink::new(buffer.clone())));
        let _ = m.increment_level();
        m.toggle_category();
        drop(m);

        let output = String::from_utf8(buffer.0.borrow().clone()).unwrap();
        let events: Vec<String> = output
            .lines()
            .map(|l| serde_json::from_str::<Value>(l).unwrap()["event"].to_string())
            .collect();
        assert_eq!(events, vec!["\"level_change\"", "\"active_category\""]);
    }
}
