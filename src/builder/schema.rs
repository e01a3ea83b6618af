use crate::builder::draft::{paths, FieldDraft};
use crate::forge_core::errors::{ErrorMap, FieldError};
use crate::model::FieldType;
use std::collections::HashSet;

pub const NAME_REQUIRED: &str = "Name is required";
pub const TYPE_REQUIRED: &str = "Please select type of a input";
pub const LABEL_REQUIRED: &str = "Please enter label of a input";
pub const OPTIONS_REQUIRED: &str = "Please add atleast one option";
pub const OPTION_ENTRY_LABEL_REQUIRED: &str = "Please enter a label";
pub const OPTION_ENTRY_VALUE_REQUIRED: &str = "Please enter a value";

/// Blank means "not set"; anything else must be a non-negative integer.
pub fn parse_size(raw: &str) -> Result<Option<usize>, FieldError> {
    let t = raw.trim();
    if t.is_empty() {
        return Ok(None);
    }
    t.parse::<usize>()
        .map(Some)
        .map_err(|_| FieldError::TypeCoercion)
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Checks a draft against the structural rules. Every failing path is
/// reported; an empty map means the draft can be accepted.
pub fn validate_draft<'a>(
    draft: &FieldDraft,
    existing_names: impl IntoIterator<Item = &'a str>,
) -> ErrorMap {
    let mut errors = ErrorMap::new();

    if blank(&draft.name) {
        errors.insert(
            paths::NAME.to_string(),
            FieldError::MissingRequired(NAME_REQUIRED),
        );
    } else if existing_names.into_iter().any(|n| n == draft.name) {
        errors.insert(paths::NAME.to_string(), FieldError::DuplicateName);
    }

    if draft.kind.is_none() {
        errors.insert(
            paths::TYPE.to_string(),
            FieldError::MissingRequired(TYPE_REQUIRED),
        );
    }

    if blank(&draft.label) {
        errors.insert(
            paths::LABEL.to_string(),
            FieldError::MissingRequired(LABEL_REQUIRED),
        );
    }

    if draft.shows_length_limits() {
        let max = parse_size(&draft.max_length);
        let min = parse_size(&draft.min_length);
        if let Err(e) = &max {
            errors.insert(paths::MAX_LENGTH.to_string(), e.clone());
        }
        if let Err(e) = &min {
            errors.insert(paths::MIN_LENGTH.to_string(), e.clone());
        }
        if let (Ok(Some(min)), Ok(Some(max))) = (min, max) {
            if min > max {
                errors.insert(paths::MAX_LENGTH.to_string(), FieldError::RangeOrder);
            }
        }
    }

    if draft.kind == Some(FieldType::Select) {
        if draft.options.is_empty() {
            errors.insert(
                paths::OPTIONS.to_string(),
                FieldError::MissingRequired(OPTIONS_REQUIRED),
            );
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for (i, opt) in draft.options.iter().enumerate() {
            if blank(&opt.label) {
                errors.insert(
                    paths::option_label(i),
                    FieldError::MissingRequired(OPTION_ENTRY_LABEL_REQUIRED),
                );
            }
            if blank(&opt.value) {
                errors.insert(
                    paths::option_value(i),
                    FieldError::MissingRequired(OPTION_ENTRY_VALUE_REQUIRED),
                );
            } else if !seen.insert(opt.value.as_str()) {
                errors.insert(paths::option_value(i), FieldError::DuplicateOptionValue);
            }
        }
    }

    errors
}
