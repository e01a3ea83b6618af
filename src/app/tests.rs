use super::*;
use crate::builder::session::{BuilderSession, Mode};
use crate::forge_core::ids::SequentialIds;
use crate::model::{AppConfig, FieldType};
use crate::ui::{dispatch_key, run_effects, ui, AppState, View};
use crate::widgets::builder_form::{BuilderRow, BuilderWidget};
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use serde_json::json;

fn state() -> AppState {
    let mut st = AppState::new(AppConfig::default());
    st.builder = BuilderWidget::new("Form Builder", BuilderSession::new(SequentialIds::new("f")));
    st
}

fn press(st: &mut AppState, code: KeyCode) {
    dispatch_key(st, code, KeyModifiers::NONE);
}

fn type_str(st: &mut AppState, text: &str) {
    for c in text.chars() {
        press(st, KeyCode::Char(c));
    }
}

fn fill_row(st: &mut AppState, row: BuilderRow, text: &str) {
    assert!(st.builder.select_row(row));
    press(st, KeyCode::Enter);
    type_str(st, text);
    press(st, KeyCode::Enter);
}

fn accept_text_field(st: &mut AppState, name: &str) {
    assert!(st.builder.select_row(BuilderRow::Type));
    st.builder
        .session
        .set_kind(Some(FieldType::Text))
        .unwrap();
    fill_row(st, BuilderRow::Label, name);
    fill_row(st, BuilderRow::Name, name);
    assert!(st.builder.select_row(BuilderRow::AddField));
    press(st, KeyCode::Enter);
}

fn screen(st: &mut AppState) -> String {
    let mut terminal = Terminal::new(TestBackend::new(110, 30)).unwrap();
    terminal.draw(|f| ui(f, st)).unwrap();
    let buf = terminal.backend().buffer().clone();
    let mut out = String::new();
    for y in 0..buf.area.height {
        for x in 0..buf.area.width {
            out.push_str(buf[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

#[test]
fn create_form_without_fields_is_refused() {
    let mut st = state();
    let effects = update(&mut st, AppMsg::CreateForm);
    assert_eq!(st.view, View::Builder);
    assert!(st.runtime.is_none());
    assert!(effects.iter().any(|e| matches!(
        e,
        Effect::ShowToast { level: ToastLevel::Error, .. }
    )));
}

#[test]
fn create_form_switches_to_runtime_and_freezes_builder() {
    let mut st = state();
    accept_text_field(&mut st, "nickname");
    let effects = update(&mut st, AppMsg::CreateForm);
    run_effects(&mut st, effects);
    assert_eq!(st.view, View::Runtime);
    assert_eq!(st.builder.session.mode(), Mode::Running);
    assert!(st.builder.session.edit_draft("name", |d| d.name.push('x')).is_err());
    assert!(st.toast.is_some());
    assert!(st.debug_log.iter().any(|l| l.contains("builder frozen")));
}

#[test]
fn submitted_shows_result_and_back_returns_to_form() {
    let mut st = state();
    accept_text_field(&mut st, "nickname");
    let effects = update(&mut st, AppMsg::CreateForm);
    run_effects(&mut st, effects);
    let _ = update(
        &mut st,
        AppMsg::Submitted {
            payload: json!({"nickname": "Al"}),
            outcome: Ok("stdout".into()),
        },
    );
    assert_eq!(st.view, View::Result);
    assert_eq!(st.last_submission, Some(json!({"nickname": "Al"})));
    let _ = update(&mut st, AppMsg::BackToForm);
    assert_eq!(st.view, View::Runtime);
}

#[test]
fn back_without_runtime_stays_put() {
    let mut st = state();
    let _ = update(&mut st, AppMsg::BackToForm);
    assert_eq!(st.view, View::Builder);
}

#[test]
fn tick_expires_toast() {
    let mut st = state();
    run_effects(
        &mut st,
        vec![Effect::ShowToast {
            text: "hi".into(),
            level: ToastLevel::Info,
            seconds: 1,
        }],
    );
    for _ in 0..4 {
        let _ = update(&mut st, AppMsg::Tick);
    }
    assert!(st.toast.is_some());
    let _ = update(&mut st, AppMsg::Tick);
    assert!(st.toast.is_none());
}

#[test]
fn keyboard_scenario_builds_fills_and_submits() {
    let mut st = state();
    accept_text_field(&mut st, "nickname");
    assert_eq!(st.builder.session.accepted().len(), 1);
    assert!(screen(&mut st).contains("nickname"));

    assert!(st.builder.select_row(BuilderRow::CreateForm));
    press(&mut st, KeyCode::Enter);
    assert_eq!(st.view, View::Runtime);

    // first row is the text field
    press(&mut st, KeyCode::Enter);
    type_str(&mut st, "Al");
    press(&mut st, KeyCode::Enter);
    press(&mut st, KeyCode::Down);
    press(&mut st, KeyCode::Enter);

    assert_eq!(st.view, View::Result);
    assert_eq!(st.stdout_queue, vec![r#"{"nickname":"Al"}"#.to_string()]);
    assert_eq!(st.last_submission, Some(json!({"nickname": "Al"})));
    assert!(screen(&mut st).contains("Submitted to stdout"));
}

#[test]
fn q_types_while_editing_and_quits_otherwise() {
    let mut st = state();
    assert!(st.builder.select_row(BuilderRow::Label));
    press(&mut st, KeyCode::Enter);
    press(&mut st, KeyCode::Char('q'));
    assert!(!st.quit);
    assert_eq!(st.builder.session.draft.values.label, "q");
    press(&mut st, KeyCode::Esc);
    press(&mut st, KeyCode::Char('q'));
    assert!(st.quit);
}

#[test]
fn ctrl_c_always_quits() {
    let mut st = state();
    assert!(st.builder.select_row(BuilderRow::Label));
    press(&mut st, KeyCode::Enter);
    dispatch_key(&mut st, KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert!(st.quit);
}

#[test]
fn builder_screen_lists_accepted_fields() {
    let mut st = state();
    accept_text_field(&mut st, "email");
    accept_text_field(&mut st, "email");
    assert_eq!(st.builder.session.accepted().len(), 1);
    let s = screen(&mut st);
    assert!(s.contains("Fields (1)"));
    assert!(s.contains("Name must be unique"));
}
