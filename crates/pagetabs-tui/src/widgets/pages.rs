use image::{imageops::FilterType, DynamicImage, RgbImage};
use ratatui::{buffer::Buffer, layout::Rect, style::Color, Frame};

use crate::app::App;
use crate::theme::{tint, tint_color};

const HALF_BLOCK: &str = "▀";

/// Image state of one page
pub enum PageImage {
    Loading,
    Loaded {
        image: DynamicImage,
        /// Last cover-fit rendition, reused while the page size is unchanged
        raster: Option<RgbImage>,
    },
    Failed(String),
}

impl PageImage {
    pub fn loaded(image: DynamicImage) -> Self {
        Self::Loaded {
            image,
            raster: None,
        }
    }

    /// Scale and crop the image to cover `width` x `height` pixels
    fn prepare(&mut self, width: u32, height: u32) {
        if let Self::Loaded { image, raster } = self {
            let fresh = raster
                .as_ref()
                .is_some_and(|r| r.width() == width && r.height() == height);
            if !fresh && width > 0 && height > 0 {
                *raster = Some(
                    image
                        .resize_to_fill(width, height, FilterType::Triangle)
                        .to_rgb8(),
                );
            }
        }
    }
}

/// Horizontal strip of full-screen pages, scrolled by the pager offset
pub struct PagesWidget;

impl PagesWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let page_width = area.width as i64;
        let offset = app.pager.offset().round() as i64;
        let first = (offset / page_width) as usize;
        let last = ((offset + page_width - 1) / page_width) as usize;

        // Each cell holds two pixel rows
        let pixel_height = area.height as u32 * 2;
        for page in first..=last.min(app.pages.len().saturating_sub(1)) {
            app.pages[page].prepare(area.width as u32, pixel_height);
        }

        let opacity = app.config.ui.tint_opacity;
        let background = tint_color(app.theme.bg0, opacity);
        let buf = frame.buffer_mut();

        for column in 0..area.width {
            let world = offset + column as i64;
            let page = (world / page_width) as usize;
            let local = (world % page_width) as u32;
            let x = area.x + column;

            match app.pages.get(page) {
                Some(PageImage::Loaded {
                    raster: Some(raster),
                    ..
                }) => {
                    for row in 0..area.height {
                        let top = raster.get_pixel(local, row as u32 * 2).0;
                        let bottom = raster.get_pixel(local, row as u32 * 2 + 1).0;
                        set_cell(
                            buf,
                            x,
                            area.y + row,
                            HALF_BLOCK,
                            tint(top, opacity),
                            tint(bottom, opacity),
                        );
                    }
                }
                other => {
                    let title = app.tabs.get(page).map(|t| t.label()).unwrap_or_default();
                    let (message, color) = match other {
                        Some(PageImage::Failed(_)) => {
                            (format!("Could not load {}", title), app.theme.error)
                        }
                        _ => (format!("Loading {}...", title), app.theme.grey1),
                    };
                    Self::placeholder_column(
                        buf,
                        area,
                        x,
                        local,
                        &message,
                        color,
                        background,
                    );
                }
            }
        }
    }

    /// One column of a page without an image: tinted background and a
    /// centered message
    fn placeholder_column(
        buf: &mut Buffer,
        area: Rect,
        x: u16,
        local: u32,
        message: &str,
        fg: Color,
        bg: Color,
    ) {
        let message: Vec<char> = message.chars().collect();
        let start = (area.width as u32).saturating_sub(message.len() as u32) / 2;
        let message_row = area.height / 2;

        for row in 0..area.height {
            let symbol = if row == message_row && local >= start {
                message.get((local - start) as usize).copied()
            } else {
                None
            };
            let mut tmp = [0u8; 4];
            let symbol: &str = match symbol {
                Some(c) => c.encode_utf8(&mut tmp),
                None => " ",
            };
            set_cell(buf, x, area.y + row, symbol, fg, bg);
        }
    }
}

fn set_cell(buf: &mut Buffer, x: u16, y: u16, symbol: &str, fg: Color, bg: Color) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_symbol(symbol).set_fg(fg).set_bg(bg);
    }
}
