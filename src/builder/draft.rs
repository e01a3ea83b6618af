use crate::builder::schema::parse_size;
use crate::model::{FieldSpec, FieldType, SelectOption, Validations};

pub mod paths {
    pub const TYPE: &str = "type";
    pub const NAME: &str = "name";
    pub const LABEL: &str = "label";
    pub const PLACEHOLDER: &str = "placeholder";
    pub const INPUT_VALIDATIONS: &str = "inputValidations";
    pub const REQUIRED: &str = "validations.required";
    pub const MAX_LENGTH: &str = "validations.maxLength";
    pub const MIN_LENGTH: &str = "validations.minLength";
    pub const OPTIONS: &str = "options";

    pub fn option_label(idx: usize) -> String {
        format!("options[{idx}].label")
    }

    pub fn option_value(idx: usize) -> String {
        format!("options[{idx}].value")
    }
}

/// The field spec being authored. Length limits stay as raw text until validated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDraft {
    pub kind: Option<FieldType>,
    pub name: String,
    pub label: String,
    pub placeholder: String,
    pub input_validations: bool,
    pub required: bool,
    pub max_length: String,
    pub min_length: String,
    pub options: Vec<SelectOption>,
}

impl Default for FieldDraft {
    fn default() -> Self {
        Self {
            kind: None,
            name: String::new(),
            label: String::new(),
            placeholder: String::new(),
            input_validations: false,
            required: true,
            max_length: String::new(),
            min_length: String::new(),
            options: Vec::new(),
        }
    }
}

impl FieldDraft {
    pub fn set_kind(&mut self, kind: Option<FieldType>) {
        self.kind = kind;
        self.options.clear();
    }

    // Cycle: none -> text -> select -> checkbox -> none
    pub fn cycle_kind(&mut self, forward: bool) {
        let order: Vec<Option<FieldType>> = std::iter::once(None)
            .chain(FieldType::ALL.into_iter().map(Some))
            .collect();
        let cur = order.iter().position(|k| *k == self.kind).unwrap_or(0);
        let next = if forward {
            (cur + 1) % order.len()
        } else {
            (cur + order.len() - 1) % order.len()
        };
        self.set_kind(order[next]);
    }

    pub fn set_input_validations(&mut self, on: bool) {
        self.input_validations = on;
        self.required = true;
    }

    pub fn remove_option(&mut self, idx: usize) -> Option<SelectOption> {
        if idx < self.options.len() {
            Some(self.options.remove(idx))
        } else {
            None
        }
    }

    pub fn shows_validations(&self) -> bool {
        self.input_validations
    }

    pub fn shows_length_limits(&self) -> bool {
        self.input_validations && self.kind == Some(FieldType::Text)
    }

    pub fn shows_options(&self) -> bool {
        self.kind == Some(FieldType::Select)
    }

    /// Builds the accepted spec. Inert data (options on non-selects, limits
    /// outside enabled text validations) is dropped. `None` when no type is set.
    pub fn to_spec(&self, id: String) -> Option<FieldSpec> {
        let kind = self.kind?;
        let (max_length, min_length) = if self.shows_length_limits() {
            (
                parse_size(&self.max_length).ok().flatten(),
                parse_size(&self.min_length).ok().flatten(),
            )
        } else {
            (None, None)
        };
        let options = if kind == FieldType::Select {
            self.options.clone()
        } else {
            Vec::new()
        };
        Some(FieldSpec {
            kind,
            name: self.name.clone(),
            id,
            label: self.label.clone(),
            placeholder: self.placeholder.clone(),
            input_validations: self.input_validations,
            validations: Validations {
                required: self.required,
                max_length,
                min_length,
            },
            options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changing_type_clears_options() {
        let mut d = FieldDraft {
            kind: Some(FieldType::Select),
            options: vec![SelectOption::new("US", "us")],
            ..Default::default()
        };
        d.set_kind(Some(FieldType::Select));
        assert!(d.options.is_empty());
    }

    #[test]
    fn enabling_validations_reasserts_required() {
        let mut d = FieldDraft {
            required: false,
            ..Default::default()
        };
        d.set_input_validations(true);
        assert!(d.input_validations);
        assert!(d.required);
    }

    #[test]
    fn visibility_follows_type_and_toggle() {
        let mut d = FieldDraft::default();
        assert!(!d.shows_validations());
        assert!(!d.shows_options());
        d.set_kind(Some(FieldType::Text));
        assert!(!d.shows_length_limits());
        d.set_input_validations(true);
        assert!(d.shows_length_limits());
        d.set_kind(Some(FieldType::Select));
        assert!(!d.shows_length_limits());
        assert!(d.shows_options());
    }

    #[test]
    fn cycle_kind_wraps_both_ways() {
        let mut d = FieldDraft::default();
        d.cycle_kind(false);
        assert_eq!(d.kind, Some(FieldType::Checkbox));
        d.cycle_kind(true);
        assert_eq!(d.kind, None);
        d.cycle_kind(true);
        assert_eq!(d.kind, Some(FieldType::Text));
    }

    #[test]
    fn to_spec_drops_inert_limits_and_options() {
        let d = FieldDraft {
            kind: Some(FieldType::Checkbox),
            name: "agree".into(),
            label: "Agree".into(),
            input_validations: true,
            max_length: "10".into(),
            options: vec![SelectOption::new("a", "a")],
            ..Default::default()
        };
        let spec = d.to_spec("id-1".into()).unwrap();
        assert_eq!(spec.id, "id-1");
        assert!(spec.options.is_empty());
        assert_eq!(spec.validations.max_length, None);

        let text = FieldDraft {
            kind: Some(FieldType::Text),
            input_validations: true,
            max_length: " 12 ".into(),
            min_length: "2".into(),
            ..Default::default()
        };
        let spec = text.to_spec("id-2".into()).unwrap();
        assert_eq!(spec.validations.max_length, Some(12));
        assert_eq!(spec.validations.min_length, Some(2));
    }

    #[test]
    fn to_spec_requires_type() {
        assert!(FieldDraft::default().to_spec("x".into()).is_none());
    }
}
