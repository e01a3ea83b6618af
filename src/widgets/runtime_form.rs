use crate::app::Effect;
use crate::model::{FieldSpec, FieldType, FieldValue};
use crate::runtime::FormRuntime;
use crate::theme::Theme;
use crate::widgets::chrome::{cursor_mark, panel_block, with_caret};
use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::*;

const UNSELECTED: &str = "(unselected)";

pub struct RuntimeWidget {
    pub runtime: FormRuntime,
    pub title: String,
    // 0..specs.len() are fields, the last row is Submit
    selected: usize,
    editing: bool,
    // Open dropdown cursor: 0 is "unselected", i + 1 is option i
    dropdown: Option<usize>,
    message: Option<String>,
}

impl RuntimeWidget {
    pub fn new(title: impl Into<String>, runtime: FormRuntime) -> Self {
        Self {
            runtime,
            title: title.into(),
            selected: 0,
            editing: false,
            dropdown: None,
            message: None,
        }
    }

    fn row_count(&self) -> usize {
        self.runtime.specs().len() + 1
    }

    fn current_spec(&self) -> Option<&FieldSpec> {
        self.runtime.specs().get(self.selected)
    }

    pub fn on_submit_row(&self) -> bool {
        self.selected == self.runtime.specs().len()
    }

    /// Moves the cursor onto the named field. Returns false for unknown names.
    pub fn focus_field(&mut self, name: &str) -> bool {
        match self.runtime.specs().iter().position(|s| s.name == name) {
            Some(idx) => {
                self.selected = idx;
                true
            }
            None => false,
        }
    }

    #[allow(dead_code)]
    pub fn focus_submit(&mut self) {
        self.selected = self.runtime.specs().len();
    }

    #[allow(dead_code)]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn selected_index(&self, spec: &FieldSpec) -> usize {
        let cur = self
            .runtime
            .value(&spec.name)
            .and_then(FieldValue::as_text)
            .unwrap_or("");
        spec.options
            .iter()
            .position(|o| o.value == cur)
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    // Picks dropdown entry `idx` (0 = unselected) for the current select field.
    fn choose(&mut self, idx: usize) {
        let Some(spec) = self.current_spec() else {
            return;
        };
        let name = spec.name.clone();
        let value = idx
            .checked_sub(1)
            .and_then(|i| spec.options.get(i))
            .map(|o| o.value.clone());
        self.runtime.select(&name, value.as_deref());
    }

    fn submit(&mut self) -> Vec<Effect> {
        match self.runtime.submit(|v| serde_json::to_value(v)) {
            Ok(Ok(payload)) => {
                self.message = None;
                vec![Effect::Submit { payload }]
            }
            Ok(Err(e)) => vec![Effect::Debug(format!("payload encode failed: {e}"))],
            Err(errors) => {
                self.message = Some(format!("{} field(s) need attention", errors.len()));
                if let Some(first) = errors.keys().next().cloned() {
                    self.focus_field(&first);
                }
                vec![Effect::Debug(format!(
                    "submit blocked: {}",
                    errors.keys().cloned().collect::<Vec<_>>().join(", ")
                ))]
            }
        }
    }

    fn on_dropdown_key(&mut self, key: KeyCode, cursor: usize) {
        let len = self.current_spec().map(|s| s.options.len() + 1).unwrap_or(1);
        match key {
            KeyCode::Up => self.dropdown = Some(cursor.saturating_sub(1)),
            KeyCode::Down => self.dropdown = Some((cursor + 1).min(len - 1)),
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.choose(cursor);
                self.dropdown = None;
            }
            KeyCode::Esc => self.dropdown = None,
            _ => {}
        }
    }

    fn value_span(
        &self,
        spec: &FieldSpec,
        is_sel: bool,
        cursor_on: bool,
        theme: &Theme,
    ) -> Span<'static> {
        let value = self.runtime.value(&spec.name);
        match spec.kind {
            FieldType::Text => {
                let raw = value.and_then(FieldValue::as_text).unwrap_or("").to_string();
                let editing = is_sel && self.editing;
                if raw.is_empty() && !editing {
                    let hint = if spec.placeholder.is_empty() {
                        "(empty)".to_string()
                    } else {
                        spec.placeholder.clone()
                    };
                    Span::styled(hint, theme.text_muted())
                } else {
                    Span::styled(
                        with_caret(raw, editing && cursor_on),
                        theme.value_style(is_sel, editing),
                    )
                }
            }
            FieldType::Select => {
                let idx = self.selected_index(spec);
                let label = idx
                    .checked_sub(1)
                    .and_then(|i| spec.options.get(i))
                    .map(|o| o.label.clone())
                    .unwrap_or_else(|| UNSELECTED.to_string());
                Span::styled(format!("◂ {label} ▾"), theme.value_style(is_sel, false))
            }
            FieldType::Checkbox => {
                let on = value.and_then(FieldValue::as_bool).unwrap_or(false);
                let mark = if on { "[x]" } else { "[ ]" };
                Span::styled(mark.to_string(), theme.value_style(is_sel, false))
            }
        }
    }
}

impl crate::widgets::Widget for RuntimeWidget {
    fn render(&mut self, f: &mut Frame, area: Rect, focused: bool, theme: &Theme, tick: u64) {
        let cursor_on = tick % 2 == 0;
        let mut lines: Vec<Line> = Vec::new();
        for (i, spec) in self.runtime.specs().iter().enumerate() {
            let is_sel = i == self.selected;
            let sel = cursor_mark(is_sel);
            let required = spec
                .active_validations()
                .map(|v| v.required)
                .unwrap_or(false);
            let star = if required { "*" } else { "" };
            lines.push(Line::from(vec![
                Span::raw(format!("{sel} {}{star}: ", spec.label)),
                self.value_span(spec, is_sel, cursor_on, theme),
            ]));
            if let (true, Some(cursor)) = (is_sel, self.dropdown) {
                let entries = std::iter::once(UNSELECTED.to_string())
                    .chain(spec.options.iter().map(|o| o.label.clone()));
                let chosen = self.selected_index(spec);
                for (j, label) in entries.enumerate() {
                    let dot = if j == chosen { "(•)" } else { "( )" };
                    let st = if j == cursor {
                        theme.list_cursor_style()
                    } else {
                        Style::default().fg(theme.fg)
                    };
                    lines.push(Line::from(vec![
                        Span::raw("    "),
                        Span::styled(format!("{dot} {label}"), st),
                    ]));
                }
            }
            if let Some(err) = self.runtime.store.error(&spec.name) {
                lines.push(Line::from(Span::styled(
                    format!("  ! {err}"),
                    theme.text_error(),
                )));
            }
        }
        lines.push(Line::from(""));
        let st = if self.on_submit_row() {
            theme.list_cursor_style()
        } else {
            theme.text_active_bold()
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{} ", cursor_mark(self.on_submit_row()))),
            Span::styled("[ Submit ]", st),
        ]));
        if let Some(msg) = &self.message {
            lines.push(Line::from(Span::styled(msg.clone(), theme.text_muted())));
        }
        let p = Paragraph::new(lines)
            .block(panel_block(&self.title, focused, theme))
            .wrap(Wrap { trim: false });
        f.render_widget(p, area);
    }

    fn on_key(&mut self, key: KeyCode) -> Vec<Effect> {
        if let Some(cursor) = self.dropdown {
            self.on_dropdown_key(key, cursor);
            return Vec::new();
        }
        if self.editing {
            let Some(name) = self.current_spec().map(|s| s.name.clone()) else {
                self.editing = false;
                return Vec::new();
            };
            match key {
                KeyCode::Char(c) => {
                    self.runtime.edit_text(&name, |s| s.push(c));
                }
                KeyCode::Backspace => {
                    self.runtime.edit_text(&name, |s| {
                        s.pop();
                    });
                }
                KeyCode::Enter | KeyCode::Esc => self.editing = false,
                _ => {}
            }
            return Vec::new();
        }
        match key {
            KeyCode::Up | KeyCode::BackTab => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Tab => {
                if self.selected + 1 < self.row_count() {
                    self.selected += 1;
                }
            }
            KeyCode::Left | KeyCode::Right => {
                let Some(spec) = self.current_spec() else {
                    return Vec::new();
                };
                match spec.kind {
                    FieldType::Select => {
                        let n = spec.options.len() + 1;
                        let cur = self.selected_index(spec);
                        let next = if key == KeyCode::Right {
                            (cur + 1) % n
                        } else {
                            (cur + n - 1) % n
                        };
                        self.choose(next);
                    }
                    FieldType::Checkbox => {
                        let name = spec.name.clone();
                        self.runtime.toggle(&name);
                    }
                    FieldType::Text => {}
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.on_submit_row() {
                    return self.submit();
                }
                let Some(spec) = self.current_spec() else {
                    return Vec::new();
                };
                match spec.kind {
                    FieldType::Text => self.editing = key == KeyCode::Enter,
                    FieldType::Select => self.dropdown = Some(self.selected_index(spec)),
                    FieldType::Checkbox => {
                        let name = spec.name.clone();
                        self.runtime.toggle(&name);
                    }
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn is_editing(&self) -> bool {
        self.editing || self.dropdown.is_some()
    }

    fn help_text(&self) -> &'static str {
        if self.dropdown.is_some() {
            "↑/↓ choose  Enter select  Esc close"
        } else if self.editing {
            "type to edit  Backspace delete  Enter/Esc done"
        } else {
            "↑/↓ move  Enter edit/open/toggle  ←/→ change  Submit sends the form  q quit"
        }
    }
}
