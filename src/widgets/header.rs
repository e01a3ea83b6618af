use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::ui::{AppState, View};

/// Top strip: form title on the left, mode and field count on the right.
pub fn draw_header(f: &mut Frame, area: Rect, state: &AppState) {
    let border = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(state.theme.border_unfocused());
    let inner = border.inner(area);
    f.render_widget(border, area);

    let mode = match state.view {
        View::Builder => "building",
        View::Runtime => "filling",
        View::Result => "submitted",
    };
    let fields = state.builder.session.accepted().len();
    let right = format!("{mode} · {fields} field(s) ");
    let title = Line::from(Span::styled(
        format!(" {}", state.config.title),
        state.theme.title_style(),
    ));
    let status = Line::from(Span::styled(right, state.theme.text_muted()))
        .alignment(Alignment::Right);
    f.render_widget(Paragraph::new(title), inner);
    f.render_widget(Paragraph::new(status), inner);
}
