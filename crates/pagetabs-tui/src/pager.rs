//! Horizontal paging strip
//!
//! Owns the live scroll offset and publishes every change on a watch
//! channel. The active page is always derived from the offset, never stored
//! on its own.

use std::time::Instant;

use pagetabs_core::ScrollConfig;
use tokio::sync::watch;

use crate::scroll::{OffsetAnimation, ScrollConfigExt};

/// Pager state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    /// Resting exactly on a page
    Idle { page: usize },
    /// Following the user's drag; no page boundary applies
    Dragging,
    /// Animating towards a page
    Scrolling { target: usize },
}

pub struct Pager {
    page_count: usize,
    page_width: f64,
    offset: f64,
    state: PagerState,
    animation: Option<OffsetAnimation>,
    config: ScrollConfig,
    offset_tx: watch::Sender<f64>,
}

impl Pager {
    /// Create a pager resting on the first page
    pub fn new(page_count: usize, page_width: f64, config: ScrollConfig) -> Self {
        assert!(page_count > 0, "pager needs at least one page");
        let (offset_tx, _) = watch::channel(0.0);
        Self {
            page_count,
            page_width: page_width.max(0.0),
            offset: 0.0,
            state: PagerState::Idle { page: 0 },
            animation: None,
            config,
            offset_tx,
        }
    }

    /// Live stream of the scroll offset
    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.offset_tx.subscribe()
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn page_width(&self) -> f64 {
        self.page_width
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn state(&self) -> PagerState {
        self.state
    }

    /// Largest reachable offset; there is no overscroll past the last page
    pub fn max_offset(&self) -> f64 {
        (self.page_count - 1) as f64 * self.page_width
    }

    /// Page nearest to the current offset
    pub fn current_page(&self) -> usize {
        self.page_at(self.offset)
    }

    /// Check if the offset is still moving on its own
    /// Use this to determine if we need high frame rate
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    fn page_at(&self, offset: f64) -> usize {
        if self.page_width <= 0.0 {
            return 0;
        }
        let page = (offset / self.page_width).round();
        (page.max(0.0) as usize).min(self.page_count - 1)
    }

    fn set_offset(&mut self, offset: f64) {
        self.offset = offset.clamp(0.0, self.max_offset());
        self.offset_tx.send_replace(self.offset);
    }

    /// Scroll to a page, animated when smooth scrolling is enabled
    ///
    /// Page indices come from the tab set, so an out-of-range page is a bug
    /// in the caller.
    pub fn jump_to_page(&mut self, page: usize, now: Instant) {
        assert!(
            page < self.page_count,
            "page {} out of range for {} pages",
            page,
            self.page_count
        );

        let target = page as f64 * self.page_width;
        tracing::debug!("Scrolling to page {} (offset {})", page, target);

        if !self.config.is_smooth() || self.offset == target {
            self.animation = None;
            self.set_offset(target);
            self.state = PagerState::Idle { page };
            return;
        }

        self.animation = Some(OffsetAnimation::from_config(
            &self.config,
            now,
            self.offset,
            target,
        ));
        self.state = PagerState::Scrolling { target: page };
    }

    /// Page the strip is resting on or heading to
    pub fn destination_page(&self) -> usize {
        match self.state {
            PagerState::Idle { page } => page,
            PagerState::Scrolling { target } => target,
            PagerState::Dragging => self.current_page(),
        }
    }

    pub fn next_page(&mut self, now: Instant) {
        let page = (self.destination_page() + 1).min(self.page_count - 1);
        self.jump_to_page(page, now);
    }

    pub fn prev_page(&mut self, now: Instant) {
        let page = self.destination_page().saturating_sub(1);
        self.jump_to_page(page, now);
    }

    /// Move the strip with the user's finger (or mouse)
    ///
    /// Positive deltas reveal later pages. Any running animation stops where
    /// it is.
    pub fn drag_by(&mut self, delta: f64) {
        self.animation = None;
        self.state = PagerState::Dragging;
        self.set_offset(self.offset + delta);
    }

    /// End a drag by snapping to the nearest page
    pub fn release(&mut self, now: Instant) {
        if self.state != PagerState::Dragging {
            return;
        }
        let page = self.current_page();
        self.jump_to_page(page, now);
    }

    /// Advance any running animation and return the current offset
    pub fn update_at(&mut self, now: Instant) -> f64 {
        if let Some(animation) = self.animation.as_ref() {
            let finished = animation.is_finished(now);
            let offset = animation.sample(now);
            self.set_offset(offset);

            if finished {
                self.animation = None;
                if let PagerState::Scrolling { target } = self.state {
                    self.state = PagerState::Idle { page: target };
                }
            }
        }
        self.offset
    }

    /// Advance using the wall clock
    pub fn update(&mut self) -> f64 {
        self.update_at(Instant::now())
    }

    /// Change the page width, staying on the same page
    pub fn resize(&mut self, page_width: f64) {
        let page = self.destination_page();
        self.page_width = page_width.max(0.0);
        self.animation = None;
        self.set_offset(page as f64 * self.page_width);
        self.state = PagerState::Idle { page };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn pager(smooth: bool) -> Pager {
        let config = ScrollConfig {
            smooth_enabled: smooth,
            animation_duration_ms: 200,
            ..Default::default()
        };
        Pager::new(5, 375.0, config)
    }

    #[test]
    fn test_instant_jump_when_not_smooth() {
        let mut pager = pager(false);
        let rx = pager.subscribe();
        pager.jump_to_page(3, Instant::now());
        assert_eq!(pager.offset(), 1125.0);
        assert_eq!(pager.state(), PagerState::Idle { page: 3 });
        assert_eq!(*rx.borrow(), 1125.0);
    }

    #[test]
    fn test_animated_jump_settles_on_target() {
        let mut pager = pager(true);
        let rx = pager.subscribe();
        let start = Instant::now();

        pager.jump_to_page(3, start);
        assert_eq!(pager.state(), PagerState::Scrolling { target: 3 });
        assert!(pager.is_animating());

        let mid = pager.update_at(start + Duration::from_millis(100));
        assert!(mid > 0.0 && mid < 1125.0);
        assert_eq!(*rx.borrow(), mid);

        assert_eq!(pager.update_at(start + Duration::from_millis(200)), 1125.0);
        assert_eq!(pager.state(), PagerState::Idle { page: 3 });
        assert!(!pager.is_animating());
        assert_eq!(pager.current_page(), 3);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_page_panics() {
        pager(false).jump_to_page(5, Instant::now());
    }

    #[test]
    fn test_drag_clamps_without_bounce() {
        let mut pager = pager(true);
        pager.drag_by(-50.0);
        assert_eq!(pager.offset(), 0.0);
        pager.drag_by(10_000.0);
        assert_eq!(pager.offset(), pager.max_offset());
        assert_eq!(pager.state(), PagerState::Dragging);
    }

    #[test]
    fn test_release_snaps_to_nearest_page() {
        let mut pager = pager(false);
        pager.drag_by(400.0);
        assert_eq!(pager.current_page(), 1);
        pager.release(Instant::now());
        assert_eq!(pager.offset(), 375.0);
        assert_eq!(pager.state(), PagerState::Idle { page: 1 });

        pager.drag_by(200.0);
        pager.release(Instant::now());
        assert_eq!(pager.offset(), 750.0);
    }

    #[test]
    fn test_drag_interrupts_animation() {
        let mut pager = pager(true);
        let start = Instant::now();
        pager.jump_to_page(4, start);
        let at = pager.update_at(start + Duration::from_millis(50));
        pager.drag_by(5.0);
        assert!(!pager.is_animating());
        assert_eq!(pager.offset(), at + 5.0);
    }

    #[test]
    fn test_next_and_prev_follow_destination() {
        let mut pager = pager(true);
        let now = Instant::now();
        pager.next_page(now);
        pager.next_page(now);
        assert_eq!(pager.state(), PagerState::Scrolling { target: 2 });
        pager.prev_page(now);
        assert_eq!(pager.destination_page(), 1);

        let mut pager = self::pager(false);
        pager.prev_page(now);
        assert_eq!(pager.state(), PagerState::Idle { page: 0 });
        pager.jump_to_page(4, now);
        pager.next_page(now);
        assert_eq!(pager.state(), PagerState::Idle { page: 4 });
    }

    #[test]
    fn test_resize_keeps_page() {
        let mut pager = pager(false);
        pager.jump_to_page(2, Instant::now());
        pager.resize(100.0);
        assert_eq!(pager.offset(), 200.0);
        assert_eq!(pager.current_page(), 2);
    }
}
