use crate::theme::Theme;
use ratatui::widgets::{Block, Borders};

pub fn panel_block<'a>(title: &'a str, focused: bool, theme: &Theme) -> Block<'a> {
    let b = Block::default().borders(Borders::ALL).title(title);
    if focused {
        b.border_style(theme.border_focused())
    } else {
        b.border_style(theme.border_unfocused())
    }
}

// Row prefix used by every form-like widget
pub fn cursor_mark(selected: bool) -> char {
    if selected {
        '›'
    } else {
        ' '
    }
}

pub fn with_caret(mut text: String, show: bool) -> String {
    if show {
        text.push('▏');
    }
    text
}
