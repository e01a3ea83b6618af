use crate::forge_core::errors::{ErrorMap, FieldError};
use std::collections::BTreeSet;

/// Values plus per-path errors and touched flags for one form.
///
/// Edits go through [`FormStore::set_field`], which marks the path touched and
/// drops its error; errors only come back on the next [`FormStore::submit`].
#[derive(Clone, Debug)]
pub struct FormStore<V> {
    initial: V,
    pub values: V,
    pub errors: ErrorMap,
    pub touched: BTreeSet<String>,
}

impl<V: Clone> FormStore<V> {
    pub fn new(initial: V) -> Self {
        Self {
            values: initial.clone(),
            initial,
            errors: ErrorMap::new(),
            touched: BTreeSet::new(),
        }
    }

    pub fn set_field(&mut self, path: &str, mutate: impl FnOnce(&mut V)) {
        mutate(&mut self.values);
        self.touched.insert(path.to_string());
        self.errors.remove(path);
    }

    pub fn error(&self, path: &str) -> Option<&FieldError> {
        if self.touched.contains(path) {
            self.errors.get(path)
        } else {
            None
        }
    }

    /// Runs `validate`; on success hands the values to `on_valid`, otherwise
    /// records (and returns) the errors with every failing path touched.
    pub fn submit<T>(
        &mut self,
        validate: impl FnOnce(&V) -> ErrorMap,
        on_valid: impl FnOnce(&V) -> T,
    ) -> Result<T, ErrorMap> {
        let errors = validate(&self.values);
        if errors.is_empty() {
            self.errors.clear();
            return Ok(on_valid(&self.values));
        }
        for path in errors.keys() {
            self.touched.insert(path.clone());
        }
        self.errors = errors.clone();
        Err(errors)
    }

    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.errors.clear();
        self.touched.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn must_be_long(v: &String) -> ErrorMap {
        let mut e = ErrorMap::new();
        if v.len() < 3 {
            e.insert("v".into(), FieldError::TooShort(3));
        }
        e
    }

    #[test]
    fn failed_submit_records_errors_and_edit_clears_them() {
        let mut store = FormStore::new(String::new());
        let res = store.submit(must_be_long, |v| v.clone());
        assert!(res.is_err());
        assert_eq!(store.error("v"), Some(&FieldError::TooShort(3)));

        store.set_field("v", |v| v.push('a'));
        assert!(store.error("v").is_none());
        assert!(store.errors.is_empty());
    }

    #[test]
    fn successful_submit_passes_values_and_reset_restores_initial() {
        let mut store = FormStore::new("ab".to_string());
        store.set_field("v", |v| v.push('c'));
        let out = store.submit(must_be_long, |v| v.to_uppercase());
        assert_eq!(out.unwrap(), "ABC");

        store.reset();
        assert_eq!(store.values, "ab");
        assert!(store.touched.is_empty());
    }
}
