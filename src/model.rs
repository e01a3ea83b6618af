use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Select,
    Checkbox,
}

impl FieldType {
    pub const ALL: [FieldType; 3] = [FieldType::Text, FieldType::Select, FieldType::Checkbox];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Select => "select",
            FieldType::Checkbox => "checkbox",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            FieldType::Text => "Text",
            FieldType::Select => "Select",
            FieldType::Checkbox => "Checkbox",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    #[allow(dead_code)]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn chip(&self) -> String {
        format!("{}: {}", self.label, self.value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validations {
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
}

impl Default for Validations {
    fn default() -> Self {
        Self {
            required: true,
            max_length: None,
            min_length: None,
        }
    }
}

/// An accepted field definition. Immutable once it lands in the session list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub kind: FieldType,
    pub name: String,
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub input_validations: bool,
    #[serde(default)]
    pub validations: Validations,
    #[serde(default)]
    pub options: Vec<SelectOption>,
}

impl FieldSpec {
    // Validation metadata only counts when the toggle was on at acceptance.
    pub fn active_validations(&self) -> Option<&Validations> {
        if self.input_validations {
            Some(&self.validations)
        } else {
            None
        }
    }

    pub fn blank_value(&self) -> FieldValue {
        match self.kind {
            FieldType::Checkbox => FieldValue::Bool(false),
            FieldType::Text | FieldType::Select => FieldValue::Text(String::new()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            FieldValue::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            FieldValue::Text(_) => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    Stdout,
    File,
    Command,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SubmitConfig {
    #[serde(default)]
    pub sink: SinkKind,
    // File sink: destination path
    #[serde(default)]
    pub path: Option<String>,
    // Command sink: command line receiving the JSON on stdin
    #[serde(default)]
    pub command: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub theme: ThemeChoice,
    // Re-check captured validations before handing values to the sink
    #[serde(default)]
    pub enforce_validations: bool,
    #[serde(default)]
    pub submit: SubmitConfig,
    #[serde(default = "default_true")]
    pub debug_pane: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            theme: ThemeChoice::Dark,
            enforce_validations: false,
            submit: SubmitConfig::default(),
            debug_pane: true,
        }
    }
}

fn default_title() -> String {
    "Form Builder".to_string()
}

fn default_true() -> bool {
    true
}

pub(crate) fn validate_app_config(cfg: &AppConfig) -> Result<(), String> {
    match cfg.submit.sink {
        SinkKind::Stdout => {}
        SinkKind::File => {
            if cfg.submit.path.as_deref().unwrap_or("").trim().is_empty() {
                return Err("submit sink 'file' requires 'path'".to_string());
            }
        }
        SinkKind::Command => {
            if cfg.submit.command.as_deref().unwrap_or("").trim().is_empty() {
                return Err("submit sink 'command' requires 'command'".to_string());
            }
        }
    }
    if cfg.title.trim().is_empty() {
        return Err("title must not be empty".to_string());
    }
    Ok(())
}
