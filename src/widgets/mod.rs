pub mod builder_form;
pub mod chrome;
pub mod field_table;
pub mod header;
pub mod result_viewer;
pub mod runtime_form;
pub mod status_bar;

use crate::app::Effect;
use crate::theme::Theme;
use crossterm::event::KeyCode;
use ratatui::prelude::*;

pub trait Widget {
    fn render(&mut self, f: &mut Frame, area: Rect, focused: bool, theme: &Theme, tick: u64);
    fn on_key(&mut self, key: KeyCode) -> Vec<Effect> {
        let _ = key;
        Vec::new()
    }
    // While true, printable keys belong to the widget (no global shortcuts)
    fn is_editing(&self) -> bool {
        false
    }
    fn help_text(&self) -> &'static str;
}
