//! Time-driven tween of the page offset

use std::time::{Duration, Instant};

use pagetabs_core::ScrollConfig;

use super::easing::{lerp, EasingType, EasingTypeExt};

/// Timing helpers derived from the scroll configuration
pub trait ScrollConfigExt {
    /// Duration of one page animation
    fn animation_duration(&self) -> Duration;

    /// Frame interval while an animation runs
    fn animation_tick_duration(&self) -> Duration;

    /// Whether page changes animate at all
    fn is_smooth(&self) -> bool;
}

impl ScrollConfigExt for ScrollConfig {
    #[inline]
    fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    #[inline]
    fn animation_tick_duration(&self) -> Duration {
        if self.animation_fps == 0 {
            Duration::from_millis(16)
        } else {
            Duration::from_millis(1000 / self.animation_fps as u64)
        }
    }

    #[inline]
    fn is_smooth(&self) -> bool {
        self.smooth_enabled && self.animation_duration_ms > 0
    }
}

/// A running animation from one offset to another
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetAnimation {
    start: Instant,
    from: f64,
    to: f64,
    duration: Duration,
    easing: EasingType,
}

impl OffsetAnimation {
    pub fn new(start: Instant, from: f64, to: f64, duration: Duration, easing: EasingType) -> Self {
        Self {
            start,
            from,
            to,
            duration,
            easing,
        }
    }

    /// Animation using the configured duration and easing
    pub fn from_config(config: &ScrollConfig, start: Instant, from: f64, to: f64) -> Self {
        Self::new(start, from, to, config.animation_duration(), config.easing)
    }

    /// Progress in [0, 1] at `now`
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.start) >= self.duration
    }

    /// Offset at `now`; exactly the target once finished
    pub fn sample(&self, now: Instant) -> f64 {
        if self.is_finished(now) {
            return self.to;
        }
        lerp(self.from, self.to, self.easing.apply(self.progress(now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear(start: Instant) -> OffsetAnimation {
        OffsetAnimation::new(start, 0.0, 300.0, Duration::from_millis(100), EasingType::Linear)
    }

    #[test]
    fn test_samples_along_the_way() {
        let start = Instant::now();
        let anim = linear(start);
        assert_eq!(anim.sample(start), 0.0);
        assert!((anim.sample(start + Duration::from_millis(50)) - 150.0).abs() < 1e-6);
        assert_eq!(anim.sample(start + Duration::from_millis(100)), 300.0);
        assert_eq!(anim.sample(start + Duration::from_secs(9)), 300.0);
    }

    #[test]
    fn test_finish() {
        let start = Instant::now();
        let anim = linear(start);
        assert!(!anim.is_finished(start + Duration::from_millis(99)));
        assert!(anim.is_finished(start + Duration::from_millis(100)));
    }

    #[test]
    fn test_zero_duration_is_immediate() {
        let start = Instant::now();
        let anim = OffsetAnimation::new(start, 10.0, 20.0, Duration::ZERO, EasingType::Cubic);
        assert_eq!(anim.progress(start), 1.0);
        assert_eq!(anim.sample(start), 20.0);
    }

    #[test]
    fn test_config_helpers() {
        let mut config = ScrollConfig::default();
        assert!(config.is_smooth());
        assert_eq!(config.animation_duration(), Duration::from_millis(250));
        assert_eq!(config.animation_tick_duration(), Duration::from_millis(16));

        config.animation_duration_ms = 0;
        assert!(!config.is_smooth());

        config.animation_fps = 0;
        assert_eq!(config.animation_tick_duration(), Duration::from_millis(16));
    }
}
