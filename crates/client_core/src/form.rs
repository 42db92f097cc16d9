//! Single draft buffer shared by the create and edit flows.

use shared::{
    domain::{DraftField, UserFields, UserId, UserRecord},
    error::{DashboardError, DashboardResult},
};
use storage::validate_fields;

/// Form contents. An empty `id` means create mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub id: String,
    pub name: String,
    pub email: String,
    pub city: String,
}

impl Draft {
    pub fn fields(&self) -> UserFields {
        UserFields::new(self.name.clone(), self.email.clone(), self.city.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// A validated draft, ready to be applied to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(UserFields),
    Update { id: UserId, fields: UserFields },
}

#[derive(Debug, Clone, Default)]
pub struct FormCoordinator {
    draft: Draft,
}

impl FormCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn mode(&self) -> FormMode {
        if self.draft.id.is_empty() {
            FormMode::Create
        } else {
            FormMode::Edit
        }
    }

    /// Copies `record` into the draft. Unsaved edits are dropped without
    /// asking.
    pub fn begin_edit(&mut self, record: &UserRecord) {
        self.draft = Draft {
            id: record.id.to_string(),
            name: record.name.clone(),
            email: record.email.clone(),
            city: record.city.clone(),
        };
    }

    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::Name => self.draft.name = value,
            DraftField::Email => self.draft.email = value,
            DraftField::City => self.draft.city = value,
        }
    }

    /// Drops back to create mode, keeping the typed field values.
    pub fn clear_id(&mut self) {
        self.draft.id.clear();
    }

    pub fn reset(&mut self) {
        self.draft = Draft::default();
    }

    /// Validates the draft and picks create or update from the current mode.
    /// The draft is left untouched; call [`FormCoordinator::reset`] once the
    /// submission has been applied.
    pub fn prepare_submit(&self) -> DashboardResult<Submission> {
        match self.mode() {
            FormMode::Create => {
                let fields = self.draft.fields();
                validate_fields(&fields)?;
                Ok(Submission::Create(fields))
            }
            FormMode::Edit => self.prepare_edit(),
        }
    }

    /// Like [`FormCoordinator::prepare_submit`] but refuses to create.
    pub fn prepare_update(&self) -> DashboardResult<Submission> {
        match self.mode() {
            FormMode::Create => Err(DashboardError::validation(
                "Please select a user to update",
            )),
            FormMode::Edit => self.prepare_edit(),
        }
    }

    fn prepare_edit(&self) -> DashboardResult<Submission> {
        let fields = self.draft.fields();
        validate_fields(&fields)?;
        let id = self
            .draft
            .id
            .trim()
            .parse::<i64>()
            .map(UserId)
            .map_err(|_| DashboardError::NotFound { id: None })?;
        Ok(Submission::Update { id, fields })
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
