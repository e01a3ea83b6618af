use std::collections::BTreeMap;

/// Per-input validation failure. `Display` is the message shown next to the input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{0}")]
    MissingRequired(&'static str),
    #[error("Name must be unique")]
    DuplicateName,
    #[error("Max length must be greater than min length")]
    RangeOrder,
    #[error("Value must be unique")]
    DuplicateOptionValue,
    #[error("Please enter valid size")]
    TypeCoercion,
    #[error("Must be at least {0} characters")]
    TooShort(usize),
    #[error("Must be at most {0} characters")]
    TooLong(usize),
}

/// Field path (`name`, `validations.maxLength`, `options[0].label`, ...) to its error.
pub type ErrorMap = BTreeMap<String, FieldError>;
