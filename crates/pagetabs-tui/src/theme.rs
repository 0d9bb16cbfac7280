use ratatui::style::Color;

/// Fixed palette for the carousel
#[derive(Debug, Clone)]
pub struct Theme {
    /// Page background behind loading and failed images
    pub bg0: Color,
    /// Status bar background
    pub bg1: Color,
    /// Tab labels and indicator
    pub fg0: Color,
    /// Status bar text
    pub fg1: Color,
    /// Hints and loading messages
    pub grey1: Color,
    /// Image load failures
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg1: Color::Rgb(0x32, 0x30, 0x2f),
            fg0: Color::Rgb(0xff, 0xff, 0xff),
            fg1: Color::Rgb(0xdd, 0xc7, 0xa1),
            grey1: Color::Rgb(0x92, 0x83, 0x74),
            error: Color::Rgb(0xea, 0x69, 0x62),
        }
    }
}

/// Darken an RGB triple by laying black at `opacity` over it
pub fn tint(rgb: [u8; 3], opacity: f32) -> Color {
    let keep = 1.0 - opacity.clamp(0.0, 1.0);
    let scale = |c: u8| (c as f32 * keep).round() as u8;
    Color::Rgb(scale(rgb[0]), scale(rgb[1]), scale(rgb[2]))
}

/// Tint a theme color; non-RGB colors pass through unchanged
pub fn tint_color(color: Color, opacity: f32) -> Color {
    match color {
        Color::Rgb(r, g, b) => tint([r, g, b], opacity),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tint() {
        assert_eq!(tint([100, 200, 50], 0.3), Color::Rgb(70, 140, 35));
        assert_eq!(tint([100, 200, 50], 0.0), Color::Rgb(100, 200, 50));
        assert_eq!(tint([100, 200, 50], 5.0), Color::Rgb(0, 0, 0));
        assert_eq!(tint_color(Color::Reset, 0.5), Color::Reset);
    }
}
