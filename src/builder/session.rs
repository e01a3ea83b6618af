use crate::builder::draft::{paths, FieldDraft};
use crate::builder::pending::PendingOption;
use crate::builder::schema::{validate_draft, TYPE_REQUIRED};
use crate::forge_core::errors::{ErrorMap, FieldError};
use crate::forge_core::ids::{IdGenerator, UuidIds};
use crate::forge_core::store::FormStore;
use crate::model::{FieldSpec, FieldType, SelectOption};
use crate::runtime::FormRuntime;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Building,
    Running,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("field specs are frozen once the form is created")]
    Frozen,
    #[error("add at least one field before creating the form")]
    NoFields,
    #[error("draft has {} validation error(s)", .0.len())]
    Invalid(ErrorMap),
}

/// Accepted specs plus the draft being authored. Moves to `Running` once.
pub struct BuilderSession {
    accepted: Vec<FieldSpec>,
    pub draft: FormStore<FieldDraft>,
    pub pending: PendingOption,
    mode: Mode,
    ids: Box<dyn IdGenerator>,
}

impl Default for BuilderSession {
    fn default() -> Self {
        Self::new(UuidIds)
    }
}

impl BuilderSession {
    pub fn new(ids: impl IdGenerator + 'static) -> Self {
        Self {
            accepted: Vec::new(),
            draft: FormStore::new(FieldDraft::default()),
            pending: PendingOption::default(),
            mode: Mode::Building,
            ids: Box::new(ids),
        }
    }

    pub fn accepted(&self) -> &[FieldSpec] {
        &self.accepted
    }

    #[allow(dead_code)]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn can_create_form(&self) -> bool {
        self.mode == Mode::Building && !self.accepted.is_empty()
    }

    fn ensure_building(&self) -> Result<(), SessionError> {
        match self.mode {
            Mode::Building => Ok(()),
            Mode::Running => Err(SessionError::Frozen),
        }
    }

    pub fn edit_draft(
        &mut self,
        path: &str,
        edit: impl FnOnce(&mut FieldDraft),
    ) -> Result<(), SessionError> {
        self.ensure_building()?;
        self.draft.set_field(path, edit);
        Ok(())
    }

    #[allow(dead_code)]
    pub fn set_kind(&mut self, kind: Option<FieldType>) -> Result<(), SessionError> {
        self.edit_draft(paths::TYPE, |d| d.set_kind(kind))
    }

    pub fn cycle_kind(&mut self, forward: bool) -> Result<(), SessionError> {
        self.edit_draft(paths::TYPE, |d| d.cycle_kind(forward))
    }

    pub fn toggle_validations(&mut self) -> Result<(), SessionError> {
        self.edit_draft(paths::INPUT_VALIDATIONS, |d| {
            let on = !d.input_validations;
            d.set_input_validations(on);
        })
    }

    /// Runs the "Add option" action. `Ok(false)` means the pending pair was
    /// rejected and carries its own errors.
    pub fn add_pending_option(&mut self) -> Result<bool, SessionError> {
        self.ensure_building()?;
        match self.pending.try_add(&self.draft.values.options) {
            Some(opt) => {
                self.draft.set_field(paths::OPTIONS, |d| d.options.push(opt));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove_option(&mut self, idx: usize) -> Result<Option<SelectOption>, SessionError> {
        self.ensure_building()?;
        let mut removed = None;
        self.draft
            .set_field(paths::OPTIONS, |d| removed = d.remove_option(idx));
        Ok(removed)
    }

    /// Validates the draft and, when clean, appends it with a fresh id and
    /// resets the draft.
    pub fn submit_draft(&mut self) -> Result<&FieldSpec, SessionError> {
        self.ensure_building()?;
        let names: Vec<String> = self.accepted.iter().map(|s| s.name.clone()).collect();
        let ids = &mut self.ids;
        let built = self
            .draft
            .submit(
                |d| validate_draft(d, names.iter().map(String::as_str)),
                |d| d.to_spec(ids.next_id()),
            )
            .map_err(SessionError::Invalid)?;
        let Some(spec) = built else {
            let mut errors = ErrorMap::new();
            errors.insert(
                paths::TYPE.to_string(),
                FieldError::MissingRequired(TYPE_REQUIRED),
            );
            return Err(SessionError::Invalid(errors));
        };
        self.draft.reset();
        self.pending = PendingOption::default();
        let idx = self.accepted.len();
        self.accepted.push(spec);
        Ok(&self.accepted[idx])
    }

    /// Freezes the list and hands it to a fresh runtime.
    pub fn create_form(&mut self) -> Result<FormRuntime, SessionError> {
        self.ensure_building()?;
        if self.accepted.is_empty() {
            return Err(SessionError::NoFields);
        }
        self.mode = Mode::Running;
        Ok(FormRuntime::new(self.accepted.clone()))
    }
}
