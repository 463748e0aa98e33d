//! Event loop hosting a grid in a terminal.
//!
//! The runtime forwards terminal resizes to [`GridView::on_layout`], scrolls
//! the [`TerminalList`] on arrow keys and re-renders whenever something
//! changed.

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};
use serde_json::json;

use crate::geometry::{Rect, Size};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::GridMetrics;
use crate::render::TerminalList;
use crate::view::{GridView, LayoutEvent, MeasureOutcome};
use crate::Result;

pub mod driver;

const LOG_TARGET: &str = "flat_grid::runtime";

/// Configuration knobs for the runtime loop.
#[derive(Clone)]
pub struct RuntimeConfig {
    /// Interval between synthetic tick events.
    pub tick_interval: Duration,
    pub logger: Option<Logger>,
    /// Metrics accumulator used for periodic snapshots. Share the same handle
    /// with the grid's builder so snapshots include its counters.
    pub metrics: Option<Arc<Mutex<GridMetrics>>>,
    /// Interval between metrics snapshot emissions. Zero disables snapshots.
    pub metrics_interval: Duration,
    pub metrics_target: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(200),
            logger: None,
            metrics: None,
            metrics_interval: Duration::from_secs(5),
            metrics_target: "flat_grid::runtime.metrics".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(GridMetrics::new())));
        }
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<GridMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Events understood by the runtime.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    Tick { elapsed: Duration },
    Key(KeyEvent),
    Resize(Size),
    Raw(CrosstermEvent),
}

impl RuntimeEvent {
    fn describe(&self) -> &'static str {
        match self {
            RuntimeEvent::Tick { .. } => "tick",
            RuntimeEvent::Key(_) => "key",
            RuntimeEvent::Resize(_) => "resize",
            RuntimeEvent::Raw(_) => "raw",
        }
    }
}

impl From<CrosstermEvent> for RuntimeEvent {
    fn from(event: CrosstermEvent) -> Self {
        match event {
            CrosstermEvent::Key(key) => RuntimeEvent::Key(key),
            CrosstermEvent::Resize(width, height) => RuntimeEvent::Resize(Size::new(width, height)),
            other => RuntimeEvent::Raw(other),
        }
    }
}

/// Owns a grid, its items and the terminal list hosting it.
pub struct GridRuntime<T> {
    view: GridView<T, String>,
    items: Vec<T>,
    list: TerminalList,
    config: RuntimeConfig,
    should_exit: bool,
    redraw_requested: bool,
    last_fingerprint: Option<blake3::Hash>,
    start_instant: Option<Instant>,
    last_metrics_emit: Option<Instant>,
}

impl<T> GridRuntime<T> {
    pub fn new(view: GridView<T, String>, items: Vec<T>, list: TerminalList) -> Self {
        Self {
            view,
            items,
            list,
            config: RuntimeConfig::default(),
            should_exit: false,
            redraw_requested: true,
            last_fingerprint: None,
            start_instant: None,
            last_metrics_emit: None,
        }
    }

    pub fn config_mut(&mut self) -> &mut RuntimeConfig {
        &mut self.config
    }

    pub fn view(&self) -> &GridView<T, String> {
        &self.view
    }

    pub fn list(&self) -> &TerminalList {
        &self.list
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.redraw_requested = true;
    }

    /// Fingerprint of the most recently rendered frame.
    pub fn last_fingerprint(&self) -> Option<blake3::Hash> {
        self.last_fingerprint
    }

    pub fn run(&mut self, stdout: &mut impl Write) -> Result<()> {
        self.bootstrap(stdout)?;
        let mut last_tick = Instant::now();

        while !self.should_exit {
            let timeout = self
                .config
                .tick_interval
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_millis(0));

            if event::poll(timeout)? {
                let runtime_event = RuntimeEvent::from(event::read()?);
                self.dispatch_event(runtime_event);
                self.render_if_needed(stdout)?;
                if self.should_exit {
                    break;
                }
            }

            if last_tick.elapsed() >= self.config.tick_interval {
                let now = Instant::now();
                let elapsed = now.duration_since(last_tick);
                last_tick = now;
                self.dispatch_event(RuntimeEvent::Tick { elapsed });
                self.render_if_needed(stdout)?;
            }

            self.maybe_emit_metrics();
        }

        self.finalize();
        Ok(())
    }

    /// Replay `events` without touching the terminal's input queue.
    pub fn run_scripted<I>(&mut self, stdout: &mut impl Write, events: I) -> Result<()>
    where
        I: IntoIterator<Item = RuntimeEvent>,
    {
        self.bootstrap(stdout)?;
        for event in events {
            self.dispatch_event(event);
            self.render_if_needed(stdout)?;
            self.maybe_emit_metrics();
            if self.should_exit {
                break;
            }
        }
        self.finalize();
        Ok(())
    }

    /// Apply a terminal size: the list gets the whole screen and the grid
    /// is notified of its new frame.
    pub fn resize(&mut self, size: Size) -> MeasureOutcome {
        self.list
            .set_viewport(Rect::new(0, 0, size.width, size.height));
        let outcome = self.view.on_layout(&LayoutEvent::sized(
            f32::from(size.width),
            f32::from(size.height),
        ));
        self.redraw_requested = true;
        self.log_runtime_event(
            LogLevel::Info,
            "resized",
            [
                json_kv("width", json!(size.width)),
                json_kv("height", json!(size.height)),
                json_kv("applied", json!(matches!(outcome, MeasureOutcome::Changed(_)))),
            ],
        );
        outcome
    }

    fn dispatch_event(&mut self, event: RuntimeEvent) {
        match &event {
            RuntimeEvent::Resize(size) => {
                self.resize(*size);
            }
            RuntimeEvent::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            _ => {}
        }
        self.log_runtime_event(
            LogLevel::Trace,
            "event_dispatched",
            [json_kv("event", json!(event.describe()))],
        );
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        let page = self.list.visible_rows().len().max(1) as isize;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_exit = true;
                self.log_runtime_event(LogLevel::Info, "exit_requested", std::iter::empty());
            }
            KeyCode::Down => self.scroll(1),
            KeyCode::Up => self.scroll(-1),
            KeyCode::PageDown => self.scroll(page),
            KeyCode::PageUp => self.scroll(-page),
            KeyCode::Home => {
                self.list.scroll_to(0);
                self.redraw_requested = true;
            }
            _ => {}
        }
    }

    fn scroll(&mut self, delta: isize) {
        self.list.scroll_by(delta);
        self.redraw_requested = true;
    }

    fn render_if_needed(&mut self, stdout: &mut impl Write) -> Result<()> {
        if !self.redraw_requested {
            return Ok(());
        }
        self.redraw_requested = false;

        let frame = self.view.render(&self.items, &mut self.list);
        self.list.flush(stdout)?;
        self.last_fingerprint = Some(frame.fingerprint());

        let visible = self.list.visible_rows();
        self.log_runtime_event(
            LogLevel::Debug,
            "render_completed",
            [
                json_kv("rows", json!(frame.row_count())),
                json_kv("first_visible", json!(visible.start)),
                json_kv("visible", json!(visible.len())),
                json_kv("items_per_row", json!(frame.layout.items_per_row)),
            ],
        );
        Ok(())
    }

    fn bootstrap(&mut self, stdout: &mut impl Write) -> Result<()> {
        self.should_exit = false;
        self.redraw_requested = true;
        let now = Instant::now();
        self.start_instant = Some(now);
        self.last_metrics_emit = Some(now);
        self.log_runtime_event(
            LogLevel::Info,
            "runtime_started",
            [
                json_kv("items", json!(self.items.len())),
                json_kv("container", json!(self.view.container_size())),
            ],
        );
        self.render_if_needed(stdout)
    }

    fn finalize(&mut self) {
        let uptime_ms = self
            .start_instant
            .map(|start| start.elapsed().as_millis())
            .unwrap_or(0);
        self.log_runtime_event(
            LogLevel::Info,
            "runtime_stopped",
            [json_kv("uptime_ms", json!(uptime_ms))],
        );
    }

    fn maybe_emit_metrics(&mut self) {
        if self.config.metrics.is_none() || self.config.metrics_interval.is_zero() {
            return;
        }

        let now = Instant::now();
        match self.last_metrics_emit {
            Some(last) if now.duration_since(last) < self.config.metrics_interval => {
                return;
            }
            _ => {
                self.last_metrics_emit = Some(now);
            }
        }

        let uptime = self
            .start_instant
            .map(|start| now.duration_since(start))
            .unwrap_or_default();

        if let (Some(logger), Some(metrics)) =
            (self.config.logger.as_ref(), self.config.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let snapshot_event = guard
                    .snapshot(uptime)
                    .to_log_event(&self.config.metrics_target);
                let _ = logger.log_event(snapshot_event);
            }
        }
    }

    fn log_runtime_event<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, LOG_TARGET, message, fields);
            let _ = logger.log_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::logging::{LogEvent, MemorySink};
    use crate::platform::FixedWindow;
    use crate::render::RendererSettings;
    use crossterm::event::KeyModifiers;

    fn runtime(items: usize) -> GridRuntime<usize> {
        let config = GridConfig::new().with_item_size(8.0).with_spacing(2.0);
        let view = GridView::mount(config, &FixedWindow(Size::new(42, 12)), |ctx| {
            format!("#{}", ctx.item)
        });
        let list = TerminalList::new(RendererSettings {
            viewport: Rect::new(0, 0, 42, 12),
            row_extent: 2,
            restore_cursor: None,
        });
        GridRuntime::new(view, (0..items).collect(), list)
    }

    fn key(code: KeyCode) -> RuntimeEvent {
        RuntimeEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn scripted_run_renders_and_resizes() {
        let mut runtime = runtime(20);
        let sink = MemorySink::new();
        runtime.config_mut().logger = Some(Logger::new(sink.clone()));

        let mut output = Vec::new();
        runtime
            .run_scripted(&mut output, [RuntimeEvent::Resize(Size::new(82, 12))])
            .unwrap();

        // 82 / (8 + 2) = 8 items per row after the resize.
        assert_eq!(runtime.view().layout().items_per_row, 8);
        let rendered = String::from_utf8(output).unwrap();
        assert!(rendered.contains("#0"));
        let messages = sink.messages();
        assert_eq!(messages.first().map(String::as_str), Some("runtime_started"));
        assert!(messages.iter().any(|m| m == "resized"));
        assert_eq!(messages.last().map(String::as_str), Some("runtime_stopped"));
    }

    #[test]
    fn arrow_keys_scroll_and_q_exits() {
        let mut runtime = runtime(60);
        let mut output = Vec::new();
        runtime
            .run_scripted(
                &mut output,
                [
                    key(KeyCode::Down),
                    key(KeyCode::Down),
                    key(KeyCode::Up),
                    key(KeyCode::Char('q')),
                    key(KeyCode::Down),
                ],
            )
            .unwrap();
        assert_eq!(runtime.list().first_row(), 1);
    }

    #[test]
    fn identical_frames_share_a_fingerprint() {
        let mut runtime = runtime(10);
        let mut output = Vec::new();
        runtime
            .run_scripted(&mut output, std::iter::empty())
            .unwrap();
        let first = runtime.last_fingerprint();

        runtime
            .run_scripted(&mut output, [RuntimeEvent::Resize(Size::new(42, 30))])
            .unwrap();
        assert_eq!(runtime.last_fingerprint(), first);
    }

    #[test]
    fn set_items_triggers_a_fresh_frame() {
        let mut runtime = runtime(3);
        let mut output = Vec::new();
        runtime.run_scripted(&mut output, std::iter::empty()).unwrap();
        let first = runtime.last_fingerprint();

        runtime.set_items((0..12).collect());
        runtime.run_scripted(&mut output, std::iter::empty()).unwrap();
        assert_eq!(runtime.items().len(), 12);
        assert_ne!(runtime.last_fingerprint(), first);
    }

    #[test]
    fn scripted_run_emits_metric_snapshots() {
        let mut runtime = runtime(30);
        let sink = MemorySink::new();
        let config = runtime.config_mut();
        config.logger = Some(Logger::new(sink.clone()));
        config.metrics_interval = Duration::from_nanos(1);
        config.enable_metrics();
        let handle = config.metrics_handle().unwrap();
        config.enable_metrics();
        assert!(Arc::ptr_eq(&handle, &config.metrics_handle().unwrap()));

        handle.lock().unwrap().record_render(2, 7);
        let mut output = Vec::new();
        runtime
            .run_scripted(
                &mut output,
                [
                    RuntimeEvent::Resize(Size::new(62, 12)),
                    key(KeyCode::Down),
                    key(KeyCode::Up),
                    key(KeyCode::Home),
                ],
            )
            .unwrap();

        let snapshots: Vec<LogEvent> = sink
            .events()
            .into_iter()
            .filter(|event| event.message == "grid_metrics")
            .collect();
        assert!(!snapshots.is_empty());
        assert_eq!(snapshots[0].target, "flat_grid::runtime.metrics");
        assert_eq!(snapshots[0].fields.get("items_rendered"), Some(&json!(7)));
    }
}
