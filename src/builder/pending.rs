use crate::forge_core::errors::FieldError;
use crate::model::SelectOption;

pub const OPTION_LABEL_REQUIRED: &str = "Please enter a option label";
pub const OPTION_VALUE_REQUIRED: &str = "Please enter a option value";

/// The label/value pair typed into the option sub-form, with its own errors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingOption {
    pub label: String,
    pub value: String,
    pub label_error: Option<FieldError>,
    pub value_error: Option<FieldError>,
}

impl PendingOption {
    pub fn edit_label(&mut self, edit: impl FnOnce(&mut String)) {
        edit(&mut self.label);
        self.label_error = None;
    }

    pub fn edit_value(&mut self, edit: impl FnOnce(&mut String)) {
        edit(&mut self.value);
        self.value_error = None;
    }

    /// Validates the pair against the options already on the draft. On success
    /// the pair is cleared and returned; on failure the errors are set.
    pub fn try_add(&mut self, existing: &[SelectOption]) -> Option<SelectOption> {
        let missing_label = self.label.trim().is_empty();
        let missing_value = self.value.trim().is_empty();
        if missing_value {
            self.value_error = Some(FieldError::MissingRequired(OPTION_VALUE_REQUIRED));
        }
        if missing_label {
            self.label_error = Some(FieldError::MissingRequired(OPTION_LABEL_REQUIRED));
        }
        if missing_label || missing_value {
            return None;
        }
        if existing.iter().any(|o| o.value == self.value) {
            self.value_error = Some(FieldError::DuplicateOptionValue);
            return None;
        }
        let opt = SelectOption {
            label: std::mem::take(&mut self.label),
            value: std::mem::take(&mut self.value),
        };
        self.label_error = None;
        self.value_error = None;
        Some(opt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parts_set_both_errors() {
        let mut p = PendingOption::default();
        assert!(p.try_add(&[]).is_none());
        assert_eq!(
            p.label_error.as_ref().map(|e| e.to_string()).as_deref(),
            Some("Please enter a option label")
        );
        assert_eq!(
            p.value_error.as_ref().map(|e| e.to_string()).as_deref(),
            Some("Please enter a option value")
        );
    }

    #[test]
    fn editing_clears_only_that_error() {
        let mut p = PendingOption::default();
        let _ = p.try_add(&[]);
        p.edit_label(|s| s.push('U'));
        assert!(p.label_error.is_none());
        assert!(p.value_error.is_some());
    }

    #[test]
    fn duplicate_value_rejected_and_pair_kept() {
        let existing = vec![SelectOption::new("US", "us")];
        let mut p = PendingOption {
            label: "United States".into(),
            value: "us".into(),
            ..Default::default()
        };
        assert!(p.try_add(&existing).is_none());
        assert_eq!(p.value_error, Some(FieldError::DuplicateOptionValue));
        assert_eq!(p.label, "United States");
    }

    #[test]
    fn valid_pair_is_returned_and_cleared() {
        let mut p = PendingOption {
            label: "US".into(),
            value: "us".into(),
            ..Default::default()
        };
        assert_eq!(p.try_add(&[]), Some(SelectOption::new("US", "us")));
        assert_eq!(p, PendingOption::default());
    }
}
