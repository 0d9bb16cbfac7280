use std::sync::Arc;
use std::time::Instant;

use pagetabs_core::{
    AppConfig, Error, IndicatorFrame, IndicatorGeometry, MeasurementRegistry, Measurements,
    PendingMeasurements, TabSet,
};
use ratatui::layout::Rect;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::event::{ImageLoadResult, MeasureResult};
use crate::input::Action;
use crate::keymap::Keymap;
use crate::pager::Pager;
use crate::theme::Theme;
use crate::widgets::{LabelSlot, PageImage};

/// Application state
pub struct App {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Tabs shown in the tab row, one page each
    pub tabs: TabSet,
    pub theme: Theme,
    pub keymap: Keymap,
    pub pager: Pager,
    /// Image state per page, in tab order
    pub pages: Vec<PageImage>,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status message
    pub status_message: Option<String>,
    /// Live offset published by the pager
    offset_rx: watch::Receiver<f64>,
    /// Registry of the running measurement round, if any
    measurement: Option<MeasurementRegistry>,
    measure_generation: u64,
    /// Tab row position and label layout from the last draw
    tab_row: Rect,
    tab_slots: Vec<LabelSlot>,
    measurements: Option<Measurements>,
    geometry: Option<IndicatorGeometry>,
    /// Column where the current mouse drag last was
    drag_anchor: Option<u16>,
}

impl App {
    /// Create the app for a terminal `width` cells wide
    pub fn new(config: Arc<AppConfig>, tabs: TabSet, width: u16) -> Self {
        let pager = Pager::new(tabs.len(), width as f64, config.ui.scroll.clone());
        let offset_rx = pager.subscribe();
        let pages = tabs.iter().map(|_| PageImage::Loading).collect();
        let keymap = Keymap::from_config(&config.keymap);

        Self {
            config,
            tabs,
            theme: Theme::default(),
            keymap,
            pager,
            pages,
            should_quit: false,
            status_message: None,
            offset_rx,
            measurement: None,
            measure_generation: 0,
            tab_row: Rect::default(),
            tab_slots: Vec::new(),
            measurements: None,
            geometry: None,
            drag_anchor: None,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Start a new measurement round
    ///
    /// The indicator is hidden until the round completes. Any earlier round
    /// is abandoned and its late result ignored.
    pub fn begin_measurement(&mut self) -> (u64, PendingMeasurements) {
        self.measure_generation += 1;
        let (registry, pending) = MeasurementRegistry::new(&self.tabs);
        self.measurement = Some(registry);
        // Only a layout drawn after this point may answer the round
        self.tab_row = Rect::default();
        self.tab_slots.clear();
        self.measurements = None;
        self.geometry = None;
        debug!("Measurement round {} started", self.measure_generation);
        (self.measure_generation, pending)
    }

    /// Remember where the tab row and its labels were drawn
    pub fn record_tab_layout(&mut self, tab_row: Rect, slots: Vec<LabelSlot>) {
        self.tab_row = tab_row;
        self.tab_slots = slots;
    }

    /// Report the drawn label boxes to the running measurement round
    ///
    /// Call after a draw; a no-op when no round is waiting.
    pub fn report_tab_layout(&mut self) {
        let Some(registry) = self.measurement.as_mut() else {
            return;
        };
        if registry.is_settled() || self.tab_slots.is_empty() {
            return;
        }

        for slot in &self.tab_slots {
            if let Err(e) = registry.resolve(&slot.key, slot.bounding_box()) {
                warn!("Failed to report tab measurement: {}", e);
            }
        }
    }

    /// Apply a finished measurement round
    ///
    /// Returns true when the round timed out and measurement should be
    /// issued again.
    pub fn apply_measurements(&mut self, result: MeasureResult) -> bool {
        if result.generation != self.measure_generation {
            debug!(
                "Ignoring stale measurement round {} (current {})",
                result.generation, self.measure_generation
            );
            return false;
        }

        self.measurement = None;
        match result.outcome {
            Ok(measurements) => {
                info!("Measured {} tab labels", measurements.len());
                self.geometry = Some(IndicatorGeometry::new(
                    self.pager.page_width(),
                    &measurements,
                ));
                self.measurements = Some(measurements);
                false
            }
            Err(Error::MeasurementTimeout(missing)) => {
                warn!(
                    "Tab measurement timed out waiting for {}; measuring again",
                    missing.join(", ")
                );
                true
            }
            Err(e) => {
                warn!("Tab measurement failed: {}", e);
                false
            }
        }
    }

    /// Indicator frame for the current offset; None until every tab is measured
    pub fn indicator(&self) -> Option<IndicatorFrame> {
        let offset = *self.offset_rx.borrow();
        self.geometry.as_ref().map(|g| g.at(offset))
    }

    pub fn measurements(&self) -> Option<&Measurements> {
        self.measurements.as_ref()
    }

    /// Tab whose label is under a screen cell
    pub fn tab_at(&self, column: u16, row: u16) -> Option<usize> {
        if row != self.tab_row.y
            || column < self.tab_row.x
            || column >= self.tab_row.x + self.tab_row.width
        {
            return None;
        }
        let local = column - self.tab_row.x;

        match &self.measurements {
            Some(m) => m.hit_test(local as f64, 0.0),
            None => self.tab_slots.iter().position(|s| s.contains_column(local)),
        }
    }

    pub fn handle_action(&mut self, action: Action, now: Instant) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::NextPage => self.pager.next_page(now),
            Action::PrevPage => self.pager.prev_page(now),
            Action::JumpToTab(index) => self.select_tab(index, now),
            Action::Press { column, row } => match self.tab_at(column, row) {
                Some(index) => self.select_tab(index, now),
                None => self.drag_anchor = Some(column),
            },
            Action::Drag { column } => {
                if let Some(anchor) = self.drag_anchor {
                    self.pager.drag_by(anchor as f64 - column as f64);
                    self.drag_anchor = Some(column);
                }
            }
            Action::Release => {
                if self.drag_anchor.take().is_some() {
                    self.pager.release(now);
                }
            }
            Action::None => {}
        }
    }

    fn select_tab(&mut self, index: usize, now: Instant) {
        if let Some(tab) = self.tabs.get(index) {
            debug!("Tab {} selected", tab.key);
        }
        self.clear_status();
        self.pager.jump_to_page(index, now);
    }

    /// Store a finished image download on its page
    pub fn handle_image_result(&mut self, result: ImageLoadResult) {
        match result {
            ImageLoadResult::Success { key, image } => {
                if let Some(index) = self.tabs.index_of(&key) {
                    self.pages[index] = PageImage::loaded(image);
                }
            }
            ImageLoadResult::Failure { key, error } => {
                warn!("Image for tab {} failed: {}", key, error);
                if let Some(index) = self.tabs.index_of(&key) {
                    self.pages[index] = PageImage::Failed(error);
                }
                self.set_status(format!("Could not load image for {}", key));
            }
        }
    }

    /// Adapt to a new terminal width
    ///
    /// The pager stays on its page. Label positions change with the width, so
    /// the caller must start a new measurement round.
    pub fn resize(&mut self, width: u16) {
        self.drag_anchor = None;
        self.pager.resize(width as f64);
    }

    /// Advance the page animation to `now`
    pub fn update(&mut self, now: Instant) {
        self.pager.update_at(now);
    }

    /// Whether the next frame should come at animation rate
    pub fn needs_fast_update(&self) -> bool {
        self.pager.is_animating()
    }
}

#[cfg(test)]
pub(crate) fn test_app() -> App {
    let config = AppConfig::default();
    let tabs = TabSet::from_config(&config.tabs).unwrap();
    App::new(Arc::new(config), tabs, 375)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use image::{DynamicImage, Rgb, RgbImage};
    use pagetabs_core::TabKey;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::widgets::{draw, tab_row_layout};

    async fn measured_app(width: u16) -> (App, Terminal<TestBackend>) {
        let config = AppConfig::default();
        let tabs = TabSet::from_config(&config.tabs).unwrap();
        let mut app = App::new(Arc::new(config), tabs, width);
        let mut terminal = Terminal::new(TestBackend::new(width, 12)).unwrap();

        let (generation, pending) = app.begin_measurement();
        assert!(app.indicator().is_none());

        terminal.draw(|frame| draw(frame, &mut app)).unwrap();
        app.report_tab_layout();

        let outcome = pending.wait(Some(Duration::from_secs(1))).await;
        assert!(!app.apply_measurements(MeasureResult {
            generation,
            outcome
        }));
        (app, terminal)
    }

    #[tokio::test]
    async fn test_tap_settles_indicator_on_tab() {
        let (mut app, _terminal) = measured_app(375).await;
        let measurements = app.measurements().unwrap().clone();
        assert_eq!(measurements.len(), 5);

        let first = measurements.get(0).unwrap();
        let frame = app.indicator().unwrap();
        assert_eq!(frame.width, first.width);
        assert_eq!(frame.translate_x, first.x);

        // Tap the label of the fourth tab
        let target = *measurements.get(3).unwrap();
        let column = app.tab_row.x + target.x as u16;
        let start = Instant::now();
        app.handle_action(
            Action::Press {
                column,
                row: app.tab_row.y,
            },
            start,
        );
        assert!(app.needs_fast_update());

        app.update(start + Duration::from_secs(1));
        assert_eq!(app.pager.offset(), 1125.0);
        let frame = app.indicator().unwrap();
        assert_eq!(frame.width, target.width);
        assert_eq!(frame.translate_x, target.x);
    }

    #[tokio::test]
    async fn test_indicator_between_pages() {
        let (mut app, _terminal) = measured_app(400).await;
        let m = app.measurements().unwrap().clone();
        let (a, b) = (*m.get(0).unwrap(), *m.get(1).unwrap());

        // Drag a third of the way to the second page
        app.handle_action(Action::Press { column: 200, row: 8 }, Instant::now());
        app.handle_action(Action::Drag { column: 200 - 133 }, Instant::now());
        assert_eq!(app.pager.offset(), 133.0);

        let frame = app.indicator().unwrap();
        let t = 133.0 / 400.0;
        assert!((frame.width - (a.width + (b.width - a.width) * t)).abs() < 1e-9);
        assert!((frame.translate_x - (a.x + (b.x - a.x) * t)).abs() < 1e-9);

        app.handle_action(Action::Release, Instant::now());
        app.update(Instant::now() + Duration::from_secs(1));
        assert_eq!(app.pager.offset(), 0.0);
    }

    #[tokio::test]
    async fn test_stale_round_is_ignored() {
        let mut app = test_app();
        let (old, _pending_old) = app.begin_measurement();
        let (_current, _pending) = app.begin_measurement();

        let retry = app.apply_measurements(MeasureResult {
            generation: old,
            outcome: Err(Error::MeasurementTimeout(vec!["man".to_string()])),
        });
        assert!(!retry);
        assert!(app.indicator().is_none());
    }

    #[tokio::test]
    async fn test_timeout_requests_remeasure() {
        let mut app = test_app();
        let (generation, pending) = app.begin_measurement();
        let outcome = pending.wait(Some(Duration::from_millis(1))).await;
        assert!(matches!(outcome, Err(Error::MeasurementTimeout(_))));
        assert!(app.apply_measurements(MeasureResult {
            generation,
            outcome
        }));
        assert!(app.indicator().is_none());
    }

    #[tokio::test]
    async fn test_resize_hides_indicator_until_remeasured() {
        let (mut app, _terminal) = measured_app(375).await;
        app.handle_action(Action::JumpToTab(2), Instant::now());
        app.update(Instant::now() + Duration::from_secs(1));

        app.resize(200);
        let (_generation, _pending) = app.begin_measurement();
        assert!(app.indicator().is_none());
        assert_eq!(app.pager.current_page(), 2);
        assert_eq!(app.pager.offset(), 400.0);
    }

    #[tokio::test]
    async fn test_remeasure_uses_layout_at_new_width() {
        let (mut app, _terminal) = measured_app(375).await;

        app.resize(200);
        let (generation, pending) = app.begin_measurement();

        // Too short for the tab row: nothing may be reported
        let mut short = Terminal::new(TestBackend::new(200, 4)).unwrap();
        short.draw(|frame| draw(frame, &mut app)).unwrap();
        app.report_tab_layout();
        assert_eq!(app.tab_at(58, 3), None);

        let mut tall = Terminal::new(TestBackend::new(200, 12)).unwrap();
        tall.draw(|frame| draw(frame, &mut app)).unwrap();
        app.report_tab_layout();

        let outcome = pending.wait(Some(Duration::from_secs(1))).await;
        assert!(!app.apply_measurements(MeasureResult {
            generation,
            outcome
        }));

        let measured: Vec<f64> = app.measurements().unwrap().iter().map(|b| b.x).collect();
        let expected: Vec<f64> = tab_row_layout(&app.tabs, 200)
            .iter()
            .map(|s| s.x as f64)
            .collect();
        assert_eq!(measured, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_terminal_leaves_round_unanswered() {
        let (mut app, _terminal) = measured_app(375).await;
        app.resize(200);
        let (generation, pending) = app.begin_measurement();

        let mut short = Terminal::new(TestBackend::new(200, 4)).unwrap();
        short.draw(|frame| draw(frame, &mut app)).unwrap();
        app.report_tab_layout();

        let outcome = pending.wait(Some(Duration::from_millis(500))).await;
        assert!(matches!(outcome, Err(Error::MeasurementTimeout(_))));
        assert!(app.apply_measurements(MeasureResult {
            generation,
            outcome
        }));
        assert!(app.indicator().is_none());
    }

    #[test]
    fn test_image_results_update_pages() {
        let mut app = test_app();
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([1, 2, 3])));
        app.handle_image_result(ImageLoadResult::Success {
            key: TabKey::new("kids"),
            image,
        });
        app.handle_image_result(ImageLoadResult::Failure {
            key: TabKey::new("help"),
            error: "404".to_string(),
        });

        assert!(matches!(app.pages[0], PageImage::Loading));
        assert!(matches!(app.pages[2], PageImage::Loaded { .. }));
        assert!(matches!(app.pages[4], PageImage::Failed(_)));
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_press_outside_labels_starts_drag() {
        let mut app = test_app();
        let now = Instant::now();
        app.handle_action(Action::Press { column: 100, row: 9 }, now);
        app.handle_action(Action::Drag { column: 90 }, now);
        assert_eq!(app.pager.offset(), 10.0);

        // Drag without a press is ignored
        app.handle_action(Action::Release, now);
        let mut other = test_app();
        other.handle_action(Action::Drag { column: 0 }, now);
        assert_eq!(other.pager.offset(), 0.0);
    }
}
