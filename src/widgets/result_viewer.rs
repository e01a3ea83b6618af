use crate::app::Effect;
use crate::theme::Theme;
use crate::widgets::chrome::panel_block;
use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};

/// Shows the last submitted mapping and where it went.
pub struct ResultViewerWidget {
    pub title: String,
    json_pretty: String,
    json_value: serde_json::Value,
    outcome: Result<String, String>,
    mode_raw: bool,
    wrap: bool,
    scroll_y: u16,
    last_viewport_h: u16,
}

impl ResultViewerWidget {
    pub fn new(
        title: impl Into<String>,
        value: serde_json::Value,
        outcome: Result<String, String>,
    ) -> Self {
        let json_pretty =
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
        Self {
            title: title.into(),
            json_pretty,
            json_value: value,
            outcome,
            mode_raw: false,
            wrap: true,
            scroll_y: 0,
            last_viewport_h: 0,
        }
    }

    #[allow(dead_code)]
    pub fn is_raw(&self) -> bool {
        self.mode_raw
    }

    fn pretty_lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let Some(map) = self.json_value.as_object() else {
            lines.push(Line::from(value_span(&self.json_value, theme)));
            return lines;
        };
        if map.is_empty() {
            lines.push(Line::from(Span::styled("(no fields)", theme.text_muted())));
        }
        for (k, v) in map {
            lines.push(Line::from(vec![
                Span::styled(format!("{k}: "), Style::default().fg(theme.secondary)),
                value_span(v, theme),
            ]));
        }
        lines
    }
}

fn value_span(v: &serde_json::Value, theme: &Theme) -> Span<'static> {
    match v {
        serde_json::Value::Bool(b) => {
            Span::styled(b.to_string(), Style::default().fg(Color::Magenta))
        }
        serde_json::Value::String(s) if s.is_empty() => Span::styled("\"\"", theme.text_muted()),
        serde_json::Value::String(s) => Span::styled(s.clone(), Style::default().fg(Color::Green)),
        other => Span::styled(other.to_string(), Style::default().fg(Color::Yellow)),
    }
}

impl crate::widgets::Widget for ResultViewerWidget {
    fn render(&mut self, f: &mut Frame, area: Rect, focused: bool, theme: &Theme, _tick: u64) {
        let mut lines: Vec<Line> = Vec::new();
        match &self.outcome {
            Ok(dest) => lines.push(Line::from(Span::styled(
                format!("Submitted to {dest}"),
                theme.text_success(),
            ))),
            Err(e) => lines.push(Line::from(Span::styled(
                format!("Delivery failed: {e}"),
                theme.text_error(),
            ))),
        }
        lines.push(Line::from(""));
        if self.mode_raw {
            for l in self.json_pretty.lines() {
                lines.push(Line::from(l.to_string()));
            }
        } else {
            lines.push(Line::from(Span::styled(
                "Press j to toggle raw JSON  •  c to copy  •  Esc to go back",
                theme.text_muted(),
            )));
            lines.extend(self.pretty_lines(theme));
        }
        self.last_viewport_h = area.height.saturating_sub(2);
        let total = lines.len() as u16;
        let max_scroll = total.saturating_sub(self.last_viewport_h);
        if self.scroll_y > max_scroll {
            self.scroll_y = max_scroll;
        }
        let mut p = Paragraph::new(lines)
            .block(panel_block(&self.title, focused, theme))
            .scroll((self.scroll_y, 0));
        if self.wrap {
            p = p.wrap(Wrap { trim: false });
        }
        f.render_widget(p, area);
    }

    fn on_key(&mut self, key: KeyCode) -> Vec<Effect> {
        match key {
            KeyCode::Up => self.scroll_y = self.scroll_y.saturating_sub(1),
            KeyCode::Down => self.scroll_y = self.scroll_y.saturating_add(1),
            KeyCode::PageUp => self.scroll_y = self.scroll_y.saturating_sub(self.last_viewport_h),
            KeyCode::PageDown => self.scroll_y = self.scroll_y.saturating_add(self.last_viewport_h),
            KeyCode::Home => self.scroll_y = 0,
            KeyCode::Char('w') | KeyCode::Char('W') => self.wrap = !self.wrap,
            KeyCode::Char('j') | KeyCode::Char('J') => {
                self.mode_raw = !self.mode_raw;
                self.scroll_y = 0;
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                return vec![Effect::CopyToClipboard {
                    text: self.json_pretty.clone(),
                }]
            }
            KeyCode::Esc | KeyCode::Backspace => return vec![Effect::BackToForm],
            _ => {}
        }
        Vec::new()
    }

    fn help_text(&self) -> &'static str {
        "↑/↓ scroll  j raw/pretty  w wrap  c copy  Esc back to form  q quit"
    }
}
