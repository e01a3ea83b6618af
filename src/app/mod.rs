use crate::ui::{AppState, ToastLevel, View};
use crate::widgets::result_viewer::ResultViewerWidget;
use crate::widgets::runtime_form::RuntimeWidget;
use serde_json::Value as JsonValue;

pub enum AppMsg {
    CreateForm,
    Submitted {
        payload: JsonValue,
        outcome: Result<String, String>,
    },
    BackToForm,
    Tick,
}

#[derive(Debug)]
pub enum Effect {
    CreateForm,
    Submit {
        payload: JsonValue,
    },
    BackToForm,
    CopyToClipboard {
        text: String,
    },
    ShowToast {
        text: String,
        level: ToastLevel,
        seconds: u64,
    },
    Debug(String),
}

pub fn update(state: &mut AppState, msg: AppMsg) -> Vec<Effect> {
    use AppMsg::*;
    let mut effects: Vec<Effect> = Vec::new();
    match msg {
        CreateForm => match state.builder.session.create_form() {
            Ok(runtime) => {
                let count = runtime.specs().len();
                let runtime = runtime.with_enforced_validations(state.config.enforce_validations);
                state.runtime = Some(RuntimeWidget::new(state.config.title.clone(), runtime));
                state.view = View::Runtime;
                effects.push(Effect::Debug(format!(
                    "form created with {count} field(s); builder frozen"
                )));
                effects.push(Effect::ShowToast {
                    text: "Form created".into(),
                    level: ToastLevel::Success,
                    seconds: 3,
                });
            }
            Err(e) => {
                effects.push(Effect::Debug(format!("create form refused: {e}")));
                effects.push(Effect::ShowToast {
                    text: e.to_string(),
                    level: ToastLevel::Error,
                    seconds: 4,
                });
            }
        },
        Submitted { payload, outcome } => {
            let toast = match &outcome {
                Ok(dest) => Effect::ShowToast {
                    text: format!("Submitted to {dest}"),
                    level: ToastLevel::Success,
                    seconds: 3,
                },
                Err(e) => Effect::ShowToast {
                    text: format!("Submit failed: {e}"),
                    level: ToastLevel::Error,
                    seconds: 5,
                },
            };
            effects.push(Effect::Debug(format!("submission: {payload}")));
            effects.push(toast);
            state.last_submission = Some(payload.clone());
            state.result = Some(ResultViewerWidget::new("Submission", payload, outcome));
            state.view = View::Result;
        }
        BackToForm => {
            if state.runtime.is_some() {
                state.view = View::Runtime;
            }
        }
        Tick => {
            state.tick = state.tick.wrapping_add(1);
            let tick = state.tick;
            if state
                .toast
                .as_ref()
                .is_some_and(|t| tick >= t.expires_at_tick)
            {
                state.toast = None;
            }
        }
    }
    effects
}

#[cfg(test)]
mod tests;
