use crate::forge_core::errors::{ErrorMap, FieldError};
use crate::forge_core::store::FormStore;
use crate::model::{FieldSpec, FieldType, FieldValue};
use std::collections::BTreeMap;

pub const VALUE_REQUIRED: &str = "This field is required";
pub const SELECTION_REQUIRED: &str = "Please select an option";

/// Field name to current input value; serialises as a flat JSON object.
pub type RuntimeFormValues = BTreeMap<String, FieldValue>;

/// The generated form: frozen specs plus their live values.
#[derive(Clone, Debug)]
pub struct FormRuntime {
    specs: Vec<FieldSpec>,
    pub store: FormStore<RuntimeFormValues>,
    enforce_validations: bool,
}

impl FormRuntime {
    pub fn new(specs: Vec<FieldSpec>) -> Self {
        let initial: RuntimeFormValues = specs
            .iter()
            .map(|s| (s.name.clone(), s.blank_value()))
            .collect();
        Self {
            specs,
            store: FormStore::new(initial),
            enforce_validations: false,
        }
    }

    pub fn with_enforced_validations(mut self, on: bool) -> Self {
        self.enforce_validations = on;
        self
    }

    pub fn specs(&self) -> &[FieldSpec] {
        &self.specs
    }

    pub fn spec(&self, name: &str) -> Option<&FieldSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    #[allow(dead_code)]
    pub fn values(&self) -> &RuntimeFormValues {
        &self.store.values
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.store.values.get(name)
    }

    fn kind_of(&self, name: &str) -> Option<FieldType> {
        self.spec(name).map(|s| s.kind)
    }

    /// Edits a text input in place. Ignored for unknown or non-text fields.
    pub fn edit_text(&mut self, name: &str, edit: impl FnOnce(&mut String)) -> bool {
        if self.kind_of(name) != Some(FieldType::Text) {
            return false;
        }
        self.store.set_field(name, |values| {
            if let Some(FieldValue::Text(s)) = values.get_mut(name) {
                edit(s);
            }
        });
        true
    }

    #[allow(dead_code)]
    pub fn set_text(&mut self, name: &str, text: impl Into<String>) -> bool {
        let text = text.into();
        self.edit_text(name, |s| *s = text)
    }

    /// `None` picks the neutral "unselected" choice. Values outside the
    /// field's option list are refused.
    pub fn select(&mut self, name: &str, value: Option<&str>) -> bool {
        let Some(spec) = self.spec(name) else {
            return false;
        };
        if spec.kind != FieldType::Select {
            return false;
        }
        let chosen = match value {
            None => String::new(),
            Some(v) if spec.options.iter().any(|o| o.value == v) => v.to_string(),
            Some(_) => return false,
        };
        self.store
            .set_field(name, |values| {
                values.insert(name.to_string(), FieldValue::Text(chosen));
            });
        true
    }

    pub fn set_checked(&mut self, name: &str, checked: bool) -> bool {
        if self.kind_of(name) != Some(FieldType::Checkbox) {
            return false;
        }
        self.store.set_field(name, |values| {
            values.insert(name.to_string(), FieldValue::Bool(checked));
        });
        true
    }

    pub fn toggle(&mut self, name: &str) -> bool {
        let cur = self.value(name).and_then(FieldValue::as_bool).unwrap_or(false);
        self.set_checked(name, !cur)
    }

    /// Hands the whole mapping to `handler`. With enforced validations the
    /// captured rules are checked first and failures are returned instead.
    pub fn submit<T>(
        &mut self,
        handler: impl FnOnce(&RuntimeFormValues) -> T,
    ) -> Result<T, ErrorMap> {
        let enforce = self.enforce_validations;
        let specs = &self.specs;
        self.store.submit(
            |values| {
                if enforce {
                    validate_values(specs, values)
                } else {
                    ErrorMap::new()
                }
            },
            handler,
        )
    }
}

/// Applies each spec's captured rules (required, minLength, maxLength).
pub fn validate_values(specs: &[FieldSpec], values: &RuntimeFormValues) -> ErrorMap {
    let mut errors = ErrorMap::new();
    for spec in specs {
        let Some(rules) = spec.active_validations() else {
            continue;
        };
        let text = values
            .get(&spec.name)
            .and_then(FieldValue::as_text)
            .unwrap_or("");
        match spec.kind {
            FieldType::Text => {
                let blank = text.trim().is_empty();
                if rules.required && blank {
                    errors.insert(
                        spec.name.clone(),
                        FieldError::MissingRequired(VALUE_REQUIRED),
                    );
                    continue;
                }
                if blank {
                    continue;
                }
                let len = text.chars().count();
                if let Some(min) = rules.min_length {
                    if len < min {
                        errors.insert(spec.name.clone(), FieldError::TooShort(min));
                        continue;
                    }
                }
                if let Some(max) = rules.max_length {
                    if len > max {
                        errors.insert(spec.name.clone(), FieldError::TooLong(max));
                    }
                }
            }
            FieldType::Select => {
                if rules.required && text.is_empty() {
                    errors.insert(
                        spec.name.clone(),
                        FieldError::MissingRequired(SELECTION_REQUIRED),
                    );
                }
            }
            FieldType::Checkbox => {
                // a required checkbox may still be left unticked
            }
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SelectOption, Validations};

    fn spec(kind: FieldType, name: &str) -> FieldSpec {
        FieldSpec {
            kind,
            name: name.into(),
            id: format!("id-{name}"),
            label: name.to_uppercase(),
            placeholder: String::new(),
            input_validations: false,
            validations: Validations::default(),
            options: if kind == FieldType::Select {
                vec![SelectOption::new("US", "us"), SelectOption::new("DE", "de")]
            } else {
                vec![]
            },
        }
    }

    #[test]
    fn initial_values_cover_exactly_the_spec_names() {
        let rt = FormRuntime::new(vec![
            spec(FieldType::Text, "nick"),
            spec(FieldType::Select, "country"),
            spec(FieldType::Checkbox, "agree"),
        ]);
        let keys: Vec<&str> = rt.values().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["agree", "country", "nick"]);
        assert_eq!(rt.value("nick"), Some(&FieldValue::Text(String::new())));
        assert_eq!(rt.value("country"), Some(&FieldValue::Text(String::new())));
        assert_eq!(rt.value("agree"), Some(&FieldValue::Bool(false)));
    }

    #[test]
    fn typing_then_submitting_delivers_values_verbatim() {
        let mut rt = FormRuntime::new(vec![spec(FieldType::Text, "nickname")]);
        assert!(rt.edit_text("nickname", |s| s.push('A')));
        assert!(rt.edit_text("nickname", |s| s.push('l')));
        assert_eq!(rt.value("nickname"), Some(&FieldValue::Text("Al".into())));
        let mut delivered = None;
        rt.submit(|values| delivered = Some(values.clone())).unwrap();
        let json = serde_json::to_value(delivered.unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({"nickname": "Al"}));
    }

    #[test]
    fn setters_respect_field_kinds() {
        let mut rt = FormRuntime::new(vec![
            spec(FieldType::Text, "nick"),
            spec(FieldType::Select, "country"),
            spec(FieldType::Checkbox, "agree"),
        ]);
        assert!(!rt.set_text("agree", "x"));
        assert!(!rt.set_checked("nick", true));
        assert!(!rt.select("country", Some("fr")));
        assert!(rt.select("country", Some("de")));
        assert_eq!(rt.value("country"), Some(&FieldValue::Text("de".into())));
        assert!(rt.select("country", None));
        assert_eq!(rt.value("country"), Some(&FieldValue::Text(String::new())));
        assert!(rt.toggle("agree"));
        assert_eq!(rt.value("agree"), Some(&FieldValue::Bool(true)));
        assert!(!rt.set_text("missing", "x"));
    }

    #[test]
    fn captured_rules_ignored_unless_enforced() {
        let mut s = spec(FieldType::Text, "nick");
        s.input_validations = true;
        s.validations.min_length = Some(3);
        let mut rt = FormRuntime::new(vec![s.clone()]);
        assert!(rt.submit(|_| ()).is_ok());

        let mut strict = FormRuntime::new(vec![s]).with_enforced_validations(true);
        let errors = strict.submit(|_| ()).unwrap_err();
        assert_eq!(
            errors.get("nick"),
            Some(&FieldError::MissingRequired(VALUE_REQUIRED))
        );
        strict.set_text("nick", "Al");
        let errors = strict.submit(|_| ()).unwrap_err();
        assert_eq!(errors.get("nick"), Some(&FieldError::TooShort(3)));
        strict.set_text("nick", "Alice");
        assert!(strict.submit(|_| ()).is_ok());
    }

    #[test]
    fn enforced_rules_cover_max_length_and_selects() {
        let mut text = spec(FieldType::Text, "code");
        text.input_validations = true;
        text.validations = Validations {
            required: false,
            max_length: Some(2),
            min_length: None,
        };
        let mut pick = spec(FieldType::Select, "country");
        pick.input_validations = true;
        let mut values = RuntimeFormValues::new();
        values.insert("code".into(), FieldValue::Text("abc".into()));
        values.insert("country".into(), FieldValue::Text(String::new()));
        let errors = validate_values(&[text.clone(), pick], &values);
        assert_eq!(errors.get("code"), Some(&FieldError::TooLong(2)));
        assert_eq!(
            errors.get("country"),
            Some(&FieldError::MissingRequired(SELECTION_REQUIRED))
        );

        values.insert("code".into(), FieldValue::Text(String::new()));
        assert!(validate_values(&[text], &values).is_empty());
    }

    #[test]
    fn length_rules_count_surrounding_spaces() {
        let mut s = spec(FieldType::Text, "nick");
        s.input_validations = true;
        s.validations.min_length = Some(3);
        s.validations.max_length = Some(5);
        let mut values = RuntimeFormValues::new();
        values.insert("nick".into(), FieldValue::Text("  ab  ".into()));
        let errors = validate_values(std::slice::from_ref(&s), &values);
        assert_eq!(errors.get("nick"), Some(&FieldError::TooLong(5)));

        values.insert("nick".into(), FieldValue::Text(" ab".into()));
        assert!(validate_values(std::slice::from_ref(&s), &values).is_empty());

        values.insert("nick".into(), FieldValue::Text("   ".into()));
        let errors = validate_values(&[s], &values);
        assert_eq!(
            errors.get("nick"),
            Some(&FieldError::MissingRequired(VALUE_REQUIRED))
        );
    }
}
