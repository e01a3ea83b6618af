use crate::app::Effect;
use crate::builder::draft::{paths, FieldDraft};
use crate::builder::session::{BuilderSession, SessionError};
use crate::theme::Theme;
use crate::ui::ToastLevel;
use crate::widgets::chrome::{cursor_mark, panel_block, with_caret};
use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BuilderRow {
    Type,
    Label,
    Name,
    Placeholder,
    Validations,
    Required,
    MaxLength,
    MinLength,
    OptionLabel,
    OptionValue,
    Options,
    AddOption,
    AddField,
    CreateForm,
}

impl BuilderRow {
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            BuilderRow::Label
                | BuilderRow::Name
                | BuilderRow::Placeholder
                | BuilderRow::MaxLength
                | BuilderRow::MinLength
                | BuilderRow::OptionLabel
                | BuilderRow::OptionValue
        )
    }

    fn caption(&self) -> &'static str {
        match self {
            BuilderRow::Type => "Input Type*",
            BuilderRow::Label => "Input Label*",
            BuilderRow::Name => "Input Name*",
            BuilderRow::Placeholder => "Input Placeholder",
            BuilderRow::Validations => "Check this switch to enable validations",
            BuilderRow::Required => "Check this switch to make input field required",
            BuilderRow::MaxLength => "Max Length",
            BuilderRow::MinLength => "Min Length",
            BuilderRow::OptionLabel => "Label of option",
            BuilderRow::OptionValue => "Value of option",
            BuilderRow::Options => "Options",
            BuilderRow::AddOption => "[ Add option ]",
            BuilderRow::AddField => "[ Add Field ]",
            BuilderRow::CreateForm => "[ Create Form ]",
        }
    }

    fn hint(&self) -> &'static str {
        match self {
            BuilderRow::Label => "Enter input label",
            BuilderRow::Name => "Enter input name",
            BuilderRow::Placeholder => "Enter input placeholder",
            BuilderRow::MaxLength => "Enter max length",
            BuilderRow::MinLength => "Enter min length",
            BuilderRow::OptionLabel => "Enter label of option",
            BuilderRow::OptionValue => "Enter value of option",
            _ => "",
        }
    }

    fn draft_path(&self) -> Option<&'static str> {
        match self {
            BuilderRow::Type => Some(paths::TYPE),
            BuilderRow::Label => Some(paths::LABEL),
            BuilderRow::Name => Some(paths::NAME),
            BuilderRow::Placeholder => Some(paths::PLACEHOLDER),
            BuilderRow::MaxLength => Some(paths::MAX_LENGTH),
            BuilderRow::MinLength => Some(paths::MIN_LENGTH),
            BuilderRow::Options => Some(paths::OPTIONS),
            _ => None,
        }
    }
}

/// Rows currently editable, following the draft's conditional sections.
pub fn visible_rows(draft: &FieldDraft, can_create: bool) -> Vec<BuilderRow> {
    let mut rows = vec![
        BuilderRow::Type,
        BuilderRow::Label,
        BuilderRow::Name,
        BuilderRow::Placeholder,
        BuilderRow::Validations,
    ];
    if draft.shows_validations() {
        rows.push(BuilderRow::Required);
    }
    if draft.shows_length_limits() {
        rows.push(BuilderRow::MaxLength);
        rows.push(BuilderRow::MinLength);
    }
    if draft.shows_options() {
        rows.extend([
            BuilderRow::OptionLabel,
            BuilderRow::OptionValue,
            BuilderRow::Options,
            BuilderRow::AddOption,
        ]);
    }
    rows.push(BuilderRow::AddField);
    if can_create {
        rows.push(BuilderRow::CreateForm);
    }
    rows
}

pub struct BuilderWidget {
    pub session: BuilderSession,
    pub title: String,
    selected: usize,
    editing: bool,
    option_cursor: usize,
    message: Option<String>,
}

impl Default for BuilderWidget {
    fn default() -> Self {
        Self::new("Form Builder", BuilderSession::default())
    }
}

impl BuilderWidget {
    pub fn new(title: impl Into<String>, session: BuilderSession) -> Self {
        Self {
            session,
            title: title.into(),
            selected: 0,
            editing: false,
            option_cursor: 0,
            message: None,
        }
    }

    pub fn rows(&self) -> Vec<BuilderRow> {
        visible_rows(&self.session.draft.values, self.session.can_create_form())
    }

    pub fn current_row(&self) -> BuilderRow {
        let rows = self.rows();
        let idx = self.selected.min(rows.len().saturating_sub(1));
        rows.get(idx).copied().unwrap_or(BuilderRow::Type)
    }

    pub fn select_row(&mut self, row: BuilderRow) -> bool {
        match self.rows().iter().position(|r| *r == row) {
            Some(idx) => {
                self.selected = idx;
                true
            }
            None => false,
        }
    }

    #[allow(dead_code)]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    // Keep the cursor on the same row when sections appear or vanish above it.
    fn settle(&mut self, row: BuilderRow) {
        if !self.select_row(row) {
            self.selected = self.selected.min(self.rows().len().saturating_sub(1));
        }
        let n = self.session.draft.values.options.len();
        if self.option_cursor >= n {
            self.option_cursor = n.saturating_sub(1);
        }
    }

    fn note(&mut self, res: Result<(), SessionError>) {
        if let Err(e) = res {
            self.message = Some(e.to_string());
        }
    }

    fn edit_text(&mut self, row: BuilderRow, edit: impl FnOnce(&mut String)) {
        let res = match row {
            BuilderRow::Label => self.session.edit_draft(paths::LABEL, |d| edit(&mut d.label)),
            BuilderRow::Name => self.session.edit_draft(paths::NAME, |d| edit(&mut d.name)),
            BuilderRow::Placeholder => self
                .session
                .edit_draft(paths::PLACEHOLDER, |d| edit(&mut d.placeholder)),
            BuilderRow::MaxLength => self
                .session
                .edit_draft(paths::MAX_LENGTH, |d| edit(&mut d.max_length)),
            BuilderRow::MinLength => self
                .session
                .edit_draft(paths::MIN_LENGTH, |d| edit(&mut d.min_length)),
            BuilderRow::OptionLabel => {
                self.session.pending.edit_label(edit);
                Ok(())
            }
            BuilderRow::OptionValue => {
                self.session.pending.edit_value(edit);
                Ok(())
            }
            _ => Ok(()),
        };
        self.note(res);
    }

    fn text_value(&self, row: BuilderRow) -> &str {
        let d = &self.session.draft.values;
        match row {
            BuilderRow::Label => &d.label,
            BuilderRow::Name => &d.name,
            BuilderRow::Placeholder => &d.placeholder,
            BuilderRow::MaxLength => &d.max_length,
            BuilderRow::MinLength => &d.min_length,
            BuilderRow::OptionLabel => &self.session.pending.label,
            BuilderRow::OptionValue => &self.session.pending.value,
            _ => "",
        }
    }

    fn remove_chip(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        match self.session.remove_option(self.option_cursor) {
            Ok(Some(opt)) => {
                effects.push(Effect::Debug(format!("removed option {}", opt.chip())));
            }
            Ok(None) => {}
            Err(e) => self.message = Some(e.to_string()),
        }
        self.settle(BuilderRow::Options);
        effects
    }

    fn activate(&mut self, row: BuilderRow) -> Vec<Effect> {
        let mut effects = Vec::new();
        match row {
            r if r.is_text() => {
                self.editing = !self.editing;
            }
            BuilderRow::Type => {
                let res = self.session.cycle_kind(true);
                self.note(res);
            }
            BuilderRow::Validations => {
                let res = self.session.toggle_validations();
                self.note(res);
            }
            BuilderRow::Required => {
                let res = self
                    .session
                    .edit_draft(paths::REQUIRED, |d| d.required = !d.required);
                self.note(res);
            }
            BuilderRow::AddOption => match self.session.add_pending_option() {
                Ok(true) => {
                    self.message = None;
                    self.option_cursor = self.session.draft.values.options.len().saturating_sub(1);
                    effects.push(Effect::Debug(format!(
                        "option added ({} total)",
                        self.session.draft.values.options.len()
                    )));
                }
                Ok(false) => self.message = Some("Option not added".into()),
                Err(e) => self.message = Some(e.to_string()),
            },
            BuilderRow::AddField => match self.session.submit_draft() {
                Ok(spec) => {
                    let text = format!("Field '{}' added", spec.name);
                    effects.push(Effect::Debug(format!(
                        "accepted {} field '{}' id={}",
                        spec.kind.as_str(),
                        spec.name,
                        spec.id
                    )));
                    effects.push(Effect::ShowToast {
                        text,
                        level: ToastLevel::Success,
                        seconds: 3,
                    });
                    self.message = None;
                    self.option_cursor = 0;
                    self.editing = false;
                    self.settle(BuilderRow::Type);
                    return effects;
                }
                Err(SessionError::Invalid(errors)) => {
                    self.message = Some("Please fix the highlighted errors".into());
                    effects.push(Effect::Debug(format!(
                        "draft rejected: {}",
                        errors.keys().cloned().collect::<Vec<_>>().join(", ")
                    )));
                }
                Err(e) => self.message = Some(e.to_string()),
            },
            BuilderRow::CreateForm => effects.push(Effect::CreateForm),
            _ => {}
        }
        self.settle(row);
        effects
    }
}

impl crate::widgets::Widget for BuilderWidget {
    fn render(&mut self, f: &mut Frame, area: Rect, focused: bool, theme: &Theme, tick: u64) {
        let cursor_on = tick % 2 == 0;
        let rows = self.rows();
        let current = self.current_row();
        let draft = &self.session.draft;
        let mut lines: Vec<Line> = Vec::new();
        for row in rows {
            let is_sel = row == current;
            let sel = cursor_mark(is_sel);
            let editing = is_sel && self.editing;
            match row {
                BuilderRow::Type => {
                    let val = draft
                        .values
                        .kind
                        .map(|k| k.title().to_string())
                        .unwrap_or_else(|| "(none)".into());
                    lines.push(Line::from(vec![
                        Span::raw(format!("{sel} {}: ", row.caption())),
                        Span::styled(format!("◂ {val} ▸"), theme.value_style(is_sel, false)),
                    ]));
                }
                r if r.is_text() => {
                    let raw = self.text_value(r).to_string();
                    let value = if raw.is_empty() && !editing {
                        Span::styled(r.hint().to_string(), theme.text_muted())
                    } else {
                        Span::styled(
                            with_caret(raw, editing && cursor_on),
                            theme.value_style(is_sel, editing),
                        )
                    };
                    lines.push(Line::from(vec![
                        Span::raw(format!("{sel} {}: ", r.caption())),
                        value,
                    ]));
                }
                BuilderRow::Validations | BuilderRow::Required => {
                    let on = if row == BuilderRow::Validations {
                        draft.values.input_validations
                    } else {
                        draft.values.required
                    };
                    let mark = if on { "[x]" } else { "[ ]" };
                    lines.push(Line::from(vec![
                        Span::raw(format!("{sel} ")),
                        Span::styled(mark.to_string(), theme.value_style(is_sel, false)),
                        Span::raw(format!(" {}", row.caption())),
                    ]));
                }
                BuilderRow::Options => {
                    let mut spans = vec![Span::raw(format!("{sel} {}: ", row.caption()))];
                    if draft.values.options.is_empty() {
                        spans.push(Span::styled("(none yet)", theme.text_muted()));
                    }
                    for (i, opt) in draft.values.options.iter().enumerate() {
                        let st = if is_sel && i == self.option_cursor {
                            theme.list_cursor_style()
                        } else {
                            theme.chip_style()
                        };
                        spans.push(Span::styled(format!(" {} | X ", opt.chip()), st));
                        spans.push(Span::raw(" "));
                    }
                    lines.push(Line::from(spans));
                    for i in 0..draft.values.options.len() {
                        for p in [paths::option_label(i), paths::option_value(i)] {
                            if let Some(err) = draft.error(&p) {
                                lines.push(Line::from(Span::styled(
                                    format!("  ! #{}: {err}", i + 1),
                                    theme.text_error(),
                                )));
                            }
                        }
                    }
                }
                _ => {
                    let st = if is_sel {
                        theme.list_cursor_style()
                    } else {
                        theme.text_active_bold()
                    };
                    lines.push(Line::from(vec![
                        Span::raw(format!("{sel} ")),
                        Span::styled(row.caption().to_string(), st),
                    ]));
                }
            }
            let err = match row {
                BuilderRow::OptionLabel => self.session.pending.label_error.as_ref(),
                BuilderRow::OptionValue => self.session.pending.value_error.as_ref(),
                r => r.draft_path().and_then(|p| draft.error(p)),
            };
            if let Some(err) = err {
                lines.push(Line::from(Span::styled(
                    format!("  ! {err}"),
                    theme.text_error(),
                )));
            }
        }
        if let Some(msg) = &self.message {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(msg.clone(), theme.text_muted())));
        }
        let title = if self.editing {
            format!("{} (editing)", self.title)
        } else {
            self.title.clone()
        };
        let p = Paragraph::new(lines)
            .block(panel_block(&title, focused, theme))
            .wrap(Wrap { trim: false });
        f.render_widget(p, area);
    }

    fn on_key(&mut self, key: KeyCode) -> Vec<Effect> {
        let row = self.current_row();
        if self.editing {
            match key {
                KeyCode::Char(c) => self.edit_text(row, |s| s.push(c)),
                KeyCode::Backspace => self.edit_text(row, |s| {
                    s.pop();
                }),
                KeyCode::Enter | KeyCode::Esc => self.editing = false,
                _ => {}
            }
            return Vec::new();
        }
        match key {
            KeyCode::Up | KeyCode::BackTab => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Tab => {
                if self.selected + 1 < self.rows().len() {
                    self.selected += 1;
                }
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = key == KeyCode::Right;
                match row {
                    BuilderRow::Type => {
                        let res = self.session.cycle_kind(forward);
                        self.note(res);
                        self.settle(row);
                    }
                    BuilderRow::Options => {
                        let n = self.session.draft.values.options.len();
                        if forward && self.option_cursor + 1 < n {
                            self.option_cursor += 1;
                        } else if !forward {
                            self.option_cursor = self.option_cursor.saturating_sub(1);
                        }
                    }
                    BuilderRow::Validations | BuilderRow::Required => return self.activate(row),
                    _ => {}
                }
            }
            KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('x')
                if row == BuilderRow::Options =>
            {
                return self.remove_chip();
            }
            KeyCode::Enter | KeyCode::Char(' ') => return self.activate(row),
            _ => {}
        }
        Vec::new()
    }

    fn is_editing(&self) -> bool {
        self.editing
    }

    fn help_text(&self) -> &'static str {
        if self.editing {
            "type to edit  Backspace delete  Enter/Esc done"
        } else {
            "↑/↓ move  Enter edit/toggle/press  ←/→ change  x remove option  q quit"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge_core::ids::SequentialIds;
    use crate::model::FieldType;
    use crate::widgets::test_support::render_lines;
    use crate::widgets::Widget;

    fn widget() -> BuilderWidget {
        BuilderWidget::new("Form Builder", BuilderSession::new(SequentialIds::new("f")))
    }

    fn type_text(w: &mut BuilderWidget, row: BuilderRow, text: &str) {
        assert!(w.select_row(row));
        w.on_key(KeyCode::Enter);
        for c in text.chars() {
            w.on_key(KeyCode::Char(c));
        }
        w.on_key(KeyCode::Enter);
    }

    #[test]
    fn rows_follow_conditional_sections() {
        let mut d = FieldDraft::default();
        assert_eq!(
            visible_rows(&d, false),
            vec![
                BuilderRow::Type,
                BuilderRow::Label,
                BuilderRow::Name,
                BuilderRow::Placeholder,
                BuilderRow::Validations,
                BuilderRow::AddField,
            ]
        );
        d.set_kind(Some(FieldType::Text));
        d.set_input_validations(true);
        let rows = visible_rows(&d, true);
        assert!(rows.contains(&BuilderRow::Required));
        assert!(rows.contains(&BuilderRow::MaxLength));
        assert!(!rows.contains(&BuilderRow::Options));
        assert_eq!(rows.last(), Some(&BuilderRow::CreateForm));

        d.set_kind(Some(FieldType::Select));
        let rows = visible_rows(&d, false);
        assert!(!rows.contains(&BuilderRow::MinLength));
        assert!(rows.contains(&BuilderRow::AddOption));
    }

    #[test]
    fn keyboard_flow_accepts_a_field() {
        let mut w = widget();
        w.on_key(KeyCode::Right);
        assert_eq!(w.session.draft.values.kind, Some(FieldType::Text));
        type_text(&mut w, BuilderRow::Label, "Email");
        type_text(&mut w, BuilderRow::Name, "emaill");
        w.on_key(KeyCode::Enter);
        w.on_key(KeyCode::Backspace);
        w.on_key(KeyCode::Enter);
        assert_eq!(w.session.draft.values.name, "email");

        assert!(w.select_row(BuilderRow::AddField));
        let effects = w.on_key(KeyCode::Enter);
        assert!(effects
            .iter()
            .any(|e| matches!(e, Effect::ShowToast { text, .. } if text == "Field 'email' added")));
        assert_eq!(w.session.accepted().len(), 1);
        assert_eq!(w.current_row(), BuilderRow::Type);
        assert!(w.rows().contains(&BuilderRow::CreateForm));
    }

    #[test]
    fn invalid_draft_shows_messages() {
        let mut w = widget();
        assert!(w.select_row(BuilderRow::AddField));
        w.on_key(KeyCode::Enter);
        assert_eq!(w.message(), Some("Please fix the highlighted errors"));
        let theme = Theme::default();
        let lines = render_lines(70, 20, |f| {
            let area = f.area();
            w.render(f, area, true, &theme, 1)
        });
        let screen = lines.join("\n");
        assert!(screen.contains("! Please select type of a input"));
        assert!(screen.contains("! Please enter label of a input"));
        assert!(screen.contains("! Name is required"));
    }

    #[test]
    fn option_subform_adds_and_removes_chips() {
        let mut w = widget();
        w.on_key(KeyCode::Right);
        w.on_key(KeyCode::Right);
        assert_eq!(w.session.draft.values.kind, Some(FieldType::Select));
        type_text(&mut w, BuilderRow::OptionLabel, "US");
        type_text(&mut w, BuilderRow::OptionValue, "us");
        assert!(w.select_row(BuilderRow::AddOption));
        w.on_key(KeyCode::Enter);
        type_text(&mut w, BuilderRow::OptionLabel, "United States");
        type_text(&mut w, BuilderRow::OptionValue, "us");
        assert!(w.select_row(BuilderRow::AddOption));
        w.on_key(KeyCode::Enter);
        assert_eq!(w.session.draft.values.options.len(), 1);
        assert_eq!(w.message(), Some("Option not added"));

        let theme = Theme::default();
        let lines = render_lines(70, 20, |f| {
            let area = f.area();
            w.render(f, area, true, &theme, 1)
        });
        let screen = lines.join("\n");
        assert!(screen.contains("US: us | X"));
        assert!(screen.contains("! Value must be unique"));

        assert!(w.select_row(BuilderRow::Options));
        w.on_key(KeyCode::Char('x'));
        assert!(w.session.draft.values.options.is_empty());
    }

    #[test]
    fn toggling_validations_reveals_length_rows_for_text() {
        let mut w = widget();
        w.on_key(KeyCode::Right);
        assert!(w.select_row(BuilderRow::Validations));
        w.on_key(KeyCode::Enter);
        assert_eq!(w.current_row(), BuilderRow::Validations);
        assert!(w.rows().contains(&BuilderRow::MaxLength));
        type_text(&mut w, BuilderRow::MinLength, "10");
        type_text(&mut w, BuilderRow::MaxLength, "5");
        type_text(&mut w, BuilderRow::Label, "Bio");
        type_text(&mut w, BuilderRow::Name, "bio");
        assert!(w.select_row(BuilderRow::AddField));
        w.on_key(KeyCode::Enter);
        assert!(w.session.accepted().is_empty());
        assert_eq!(
            w.session
                .draft
                .error(paths::MAX_LENGTH)
                .map(|e| e.to_string())
                .as_deref(),
            Some("Max length must be greater than min length")
        );
    }

    #[test]
    fn create_form_row_emits_effect() {
        let mut w = widget();
        w.on_key(KeyCode::Right);
        type_text(&mut w, BuilderRow::Label, "Nick");
        type_text(&mut w, BuilderRow::Name, "nick");
        assert!(w.select_row(BuilderRow::AddField));
        w.on_key(KeyCode::Enter);
        assert!(w.select_row(BuilderRow::CreateForm));
        let effects = w.on_key(KeyCode::Enter);
        assert!(matches!(effects.as_slice(), [Effect::CreateForm]));
    }
}
