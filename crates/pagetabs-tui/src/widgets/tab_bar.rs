use pagetabs_core::{BoundingBox, TabKey, TabSet};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

const INDICATOR_SYMBOL: &str = "━";

/// Where one tab label sits inside the tab row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSlot {
    pub key: TabKey,
    pub label: String,
    /// Column relative to the tab row
    pub x: u16,
    pub width: u16,
}

impl LabelSlot {
    /// Box reported to the measurement registry
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.x as f64, 0.0, self.width as f64, 1.0)
    }

    pub fn contains_column(&self, column: u16) -> bool {
        column >= self.x && column < self.x.saturating_add(self.width)
    }
}

/// Spread the labels evenly over `width` cells
///
/// The gaps before the first label, between labels and after the last one
/// are equal. When the labels don't fit, they are packed from the left.
pub fn tab_row_layout(tabs: &TabSet, width: u16) -> Vec<LabelSlot> {
    let labels: Vec<(TabKey, String, u16)> = tabs
        .iter()
        .map(|tab| {
            let label = tab.label();
            let w = label.width() as u16;
            (tab.key.clone(), label, w)
        })
        .collect();

    let total: u32 = labels.iter().map(|(_, _, w)| *w as u32).sum();
    let free = (width as u32).saturating_sub(total) as f64;
    let gap = free / (labels.len() + 1) as f64;

    let mut consumed = 0u32;
    labels
        .into_iter()
        .enumerate()
        .map(|(i, (key, label, w))| {
            let x = (gap * (i + 1) as f64 + consumed as f64).round() as u16;
            consumed += w as u32;
            LabelSlot {
                key,
                label,
                x,
                width: w,
            }
        })
        .collect()
}

pub struct TabBarWidget;

impl TabBarWidget {
    /// Render labels on the first row of `area` and the indicator on the second
    ///
    /// Labels only set the foreground so the page image stays visible behind
    /// them. The computed layout is handed back to the app for measurement.
    pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
        if area.height == 0 || area.width == 0 {
            app.record_tab_layout(area, Vec::new());
            return;
        }

        let label_row = Rect::new(area.x, area.y, area.width, 1);
        let slots = tab_row_layout(&app.tabs, label_row.width);
        let style = Style::default()
            .fg(app.theme.fg0)
            .add_modifier(Modifier::BOLD);

        let buf = frame.buffer_mut();
        for slot in &slots {
            if slot.x >= label_row.width {
                continue;
            }
            let room = (label_row.width - slot.x) as usize;
            buf.set_stringn(label_row.x + slot.x, label_row.y, &slot.label, room, style);
        }

        if area.height > 1 {
            if let Some(indicator) = app.indicator() {
                let start = indicator.translate_x.round().max(0.0) as u16;
                let end = (indicator.translate_x + indicator.width).round().max(0.0) as u16;
                let end = end.min(area.width);
                let y = area.y + 1;
                let indicator_style = Style::default().fg(app.theme.fg0);
                for column in start..end {
                    if let Some(cell) = buf.cell_mut((area.x + column, y)) {
                        cell.set_symbol(INDICATOR_SYMBOL).set_style(indicator_style);
                    }
                }
            }
        }

        app.record_tab_layout(label_row, slots);
    }
}
