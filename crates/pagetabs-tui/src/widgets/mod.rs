mod pages;
mod status_bar;
mod tab_bar;

pub use pages::{PageImage, PagesWidget};
pub use status_bar::StatusBarWidget;
pub use tab_bar::{tab_row_layout, LabelSlot, TabBarWidget};

use ratatui::{layout::Rect, Frame};

use crate::app::App;

/// Draw the whole screen: pages underneath, tab bar overlaid near the top,
/// status bar on the last row
pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();
    if size.height == 0 {
        return;
    }

    let pages_area = Rect::new(size.x, size.y, size.width, size.height - 1);
    let status_area = Rect::new(size.x, size.y + size.height - 1, size.width, 1);

    let top = app.config.ui.tab_bar_top.min(pages_area.height);
    let tab_bar_area = Rect::new(
        pages_area.x,
        pages_area.y + top,
        pages_area.width,
        2u16.min(pages_area.height - top),
    );

    PagesWidget::render(frame, pages_area, app);
    TabBarWidget::render(frame, tab_bar_area, app);
    StatusBarWidget::render(frame, status_area, app);
}
