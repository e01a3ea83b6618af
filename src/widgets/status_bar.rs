use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::ui::{AppState, ToastLevel};

pub fn toast_tag(level: ToastLevel) -> &'static str {
    match level {
        ToastLevel::Success => "[OK]",
        ToastLevel::Error => "[ERROR]",
        ToastLevel::Info => "[INFO]",
    }
}

/// Toast (if any), editing indicator, then the focused widget's key help.
pub fn draw_footer(f: &mut Frame, area: Rect, state: &AppState, help_text: &str) {
    let mut spans: Vec<Span> = Vec::new();
    if let Some(t) = &state.toast {
        let color = state.theme.toast_color(t.level);
        spans.push(Span::styled(
            format!(" {} ", toast_tag(t.level)),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!("{}  |  ", t.text),
            Style::default().fg(color),
        ));
    }
    if state.focused_is_editing() {
        spans.push(Span::styled(
            "editing  |  ",
            state.theme.text_editing_bold(),
        ));
    }
    spans.push(Span::styled(help_text.to_string(), state.theme.text_muted()));
    let p = Paragraph::new(Line::from(spans)).wrap(Wrap { trim: true });
    f.render_widget(p, area);
}
