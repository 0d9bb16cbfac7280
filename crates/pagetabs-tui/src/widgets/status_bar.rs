use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let page = app.pager.current_page();

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            let title = app.tabs.get(page).map(|t| t.label()).unwrap_or_default();
            format!(" {}/{} {}", page + 1, app.tabs.len(), title)
        };

        let help_hint = format!(" h/l:page 1-{}:tab drag:scroll q:quit ", app.tabs.len());
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.width() + help_hint.width());

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.fg1).bg(theme.bg1)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg1)),
            Span::styled(help_hint, Style::default().fg(theme.grey1).bg(theme.bg1)),
        ]);

        let paragraph = Paragraph::new(line);
        frame.render_widget(paragraph, area);
    }
}
