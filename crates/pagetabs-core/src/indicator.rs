//! Indicator geometry
//!
//! Maps a continuous page scroll offset to the width and horizontal position
//! of the underline drawn beneath the tab row. Page `i` starts at offset
//! `i * page_width`; at that offset the underline matches tab `i`'s measured
//! box exactly. Between two pages both values move linearly, and outside the
//! first and last page they hold the edge values.

use crate::measure::Measurements;

/// Width and horizontal translation of the indicator
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndicatorFrame {
    pub width: f64,
    pub translate_x: f64,
}

/// Piecewise-linear mapping from scroll offset to indicator frame
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorGeometry {
    breakpoints: Vec<f64>,
    widths: Vec<f64>,
    offsets: Vec<f64>,
}

impl IndicatorGeometry {
    /// Build the mapping for pages of `page_width` over complete measurements
    pub fn new(page_width: f64, measurements: &Measurements) -> Self {
        let breakpoints = (0..measurements.len())
            .map(|i| i as f64 * page_width)
            .collect();

        Self {
            breakpoints,
            widths: measurements.iter().map(|b| b.width).collect(),
            offsets: measurements.iter().map(|b| b.x).collect(),
        }
    }

    /// Indicator frame for a scroll offset
    pub fn at(&self, offset: f64) -> IndicatorFrame {
        IndicatorFrame {
            width: interpolate(&self.breakpoints, &self.widths, offset),
            translate_x: interpolate(&self.breakpoints, &self.offsets, offset),
        }
    }
}

/// Linear interpolation over ascending `input` points, clamped at both ends
///
/// `input` and `output` must have the same, non-zero length.
pub fn interpolate(input: &[f64], output: &[f64], x: f64) -> f64 {
    debug_assert_eq!(input.len(), output.len());
    debug_assert!(!input.is_empty());

    let (Some(&first), Some(&last)) = (input.first(), input.last()) else {
        return 0.0;
    };

    if x.is_nan() || x <= first {
        return output[0];
    }
    if x >= last {
        return output[output.len() - 1];
    }

    // First breakpoint strictly greater than x; x > first so upper >= 1
    let upper = input.partition_point(|&p| p <= x);
    let lower = upper - 1;

    let span = input[upper] - input[lower];
    if span <= 0.0 {
        return output[upper];
    }

    let t = (x - input[lower]) / span;
    output[lower] + (output[upper] - output[lower]) * t
}
