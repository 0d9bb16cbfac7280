//! Page scroll animation
//!
//! # Layers
//!
//! - `easing` - Pure easing curves and interpolation helpers
//! - `animation` - Time-driven tween of the page offset built on the curves
//!
//! The pager owns one [`OffsetAnimation`] at a time and samples it on every
//! frame while it runs.

pub mod animation;
pub mod easing;

pub use animation::{OffsetAnimation, ScrollConfigExt};
pub use easing::{lerp, EasingTypeExt};
