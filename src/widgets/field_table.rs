use crate::model::FieldSpec;
use crate::theme::Theme;
use crate::widgets::chrome::panel_block;
use ratatui::prelude::*;
use ratatui::widgets::*;

pub const HEADERS: [&str; 9] = [
    "No.",
    "Type",
    "Name",
    "Label",
    "Placeholder",
    "Required",
    "Max size",
    "Min size",
    "Options",
];

fn size_cell(v: Option<usize>) -> String {
    v.map(|n| n.to_string()).unwrap_or_else(|| "-".into())
}

/// One display row per accepted field, numbered from 1.
pub fn table_rows(specs: &[FieldSpec]) -> Vec<[String; 9]> {
    specs
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let v = s.active_validations();
            let required = match v {
                Some(v) if v.required => "true",
                _ => "false",
            };
            let options = if s.options.is_empty() {
                "-".to_string()
            } else {
                s.options
                    .iter()
                    .map(|o| o.chip())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            [
                (i + 1).to_string(),
                s.kind.as_str().to_string(),
                s.name.clone(),
                s.label.clone(),
                if s.placeholder.is_empty() {
                    "-".into()
                } else {
                    s.placeholder.clone()
                },
                required.to_string(),
                size_cell(v.and_then(|v| v.max_length)),
                size_cell(v.and_then(|v| v.min_length)),
                options,
            ]
        })
        .collect()
}

pub fn draw_field_table(f: &mut Frame, area: Rect, specs: &[FieldSpec], theme: &Theme) {
    let title = format!("Fields ({})", specs.len());
    let block = panel_block(&title, false, theme);
    if specs.is_empty() {
        let p = Paragraph::new(Line::from(Span::styled(
            "No fields yet. Fill in the form and press Add Field.",
            theme.text_muted(),
        )))
        .block(block);
        f.render_widget(p, area);
        return;
    }
    let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h))).style(theme.title_style());
    let rows = table_rows(specs)
        .into_iter()
        .map(|cells| Row::new(cells.into_iter().map(Cell::from)));
    let widths = [
        Constraint::Length(4),
        Constraint::Length(9),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Fill(2),
    ];
    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}
