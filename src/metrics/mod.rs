use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Counters describing how often a grid measured and rendered.
#[derive(Debug, Default, Clone)]
pub struct GridMetrics {
    layout_events: u64,
    resizes_applied: u64,
    resizes_ignored: u64,
    renders: u64,
    rows_rendered: u64,
    items_rendered: u64,
}

impl GridMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_layout_event(&mut self, applied: bool, ignored: bool) {
        self.layout_events = self.layout_events.saturating_add(1);
        if applied {
            self.resizes_applied = self.resizes_applied.saturating_add(1);
        }
        if ignored {
            self.resizes_ignored = self.resizes_ignored.saturating_add(1);
        }
    }

    pub fn record_render(&mut self, rows: usize, items: usize) {
        self.renders = self.renders.saturating_add(1);
        self.rows_rendered = self.rows_rendered.saturating_add(rows as u64);
        self.items_rendered = self.items_rendered.saturating_add(items as u64);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            layout_events: self.layout_events,
            resizes_applied: self.resizes_applied,
            resizes_ignored: self.resizes_ignored,
            renders: self.renders,
            rows_rendered: self.rows_rendered,
            items_rendered: self.items_rendered,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub layout_events: u64,
    pub resizes_applied: u64,
    pub resizes_ignored: u64,
    pub renders: u64,
    pub rows_rendered: u64,
    pub items_rendered: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "grid_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("layout_events".to_string(), json!(self.layout_events));
        map.insert("resizes_applied".to_string(), json!(self.resizes_applied));
        map.insert("resizes_ignored".to_string(), json!(self.resizes_ignored));
        map.insert("renders".to_string(), json!(self.renders));
        map.insert("rows_rendered".to_string(), json!(self.rows_rendered));
        map.insert("items_rendered".to_string(), json!(self.items_rendered));
        map
    }
}
