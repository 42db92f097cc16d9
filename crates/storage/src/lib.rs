use shared::{
    domain::{UserFields, UserId, UserRecord},
    error::{DashboardError, DashboardResult},
};
use tracing::debug;

const MIN_TEXT_LEN_EXCLUSIVE: usize = 3;

/// In-memory, ordered list of users for the session.
///
/// Ids come from a counter owned by the store. The counter is seeded from the
/// highest loaded id and only ever moves forward, so an id freed by a removal
/// is never handed out again. `None` means the id space is used up.
#[derive(Debug, Clone)]
pub struct UserStore {
    records: Vec<UserRecord>,
    next_id: Option<i64>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: Some(1),
        }
    }

    /// Replaces the whole contents, typically with the initial fetch result.
    pub fn load(&mut self, records: Vec<UserRecord>) {
        let highest = records.iter().map(|record| record.id.0).max().unwrap_or(0);
        self.next_id = match (self.next_id, highest.checked_add(1)) {
            (Some(current), Some(seed)) => Some(current.max(seed)),
            _ => None,
        };
        debug!(count = records.len(), next_id = ?self.next_id, "user store loaded");
        self.records = records;
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: UserId) -> Option<&UserRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn contains_email(&self, email: &str) -> bool {
        self.records.iter().any(|record| record.email == email)
    }

    pub fn add(&mut self, fields: UserFields) -> DashboardResult<UserRecord> {
        validate_fields(&fields)?;
        if self.contains_email(&fields.email) {
            return Err(DashboardError::DuplicateEmail {
                email: fields.email,
            });
        }

        let Some(next) = self.next_id else {
            return Err(DashboardError::validation("No user ids left to assign"));
        };
        let id = UserId(next.max(1));
        self.next_id = id.0.checked_add(1);
        let record = UserRecord::new(id, fields);
        self.records.push(record.clone());
        debug!(user_id = id.0, "user appended to store");
        Ok(record)
    }

    /// Replaces the fields of `id` in place and returns the previous record.
    pub fn update(&mut self, id: UserId, fields: UserFields) -> DashboardResult<UserRecord> {
        validate_fields(&fields)?;
        let index = self.position(id)?;

        let slot = self
            .records
            .get_mut(index)
            .ok_or(DashboardError::NotFound { id: Some(id) })?;
        let previous = std::mem::replace(slot, UserRecord::new(id, fields));
        debug!(user_id = id.0, "user updated in store");
        Ok(previous)
    }

    /// Removes `id`, returning its former position and the record itself.
    ///
    /// Any pagination correction is the caller's job.
    pub fn remove(&mut self, id: UserId) -> DashboardResult<(usize, UserRecord)> {
        let index = self.position(id)?;
        let record = self.records.remove(index);
        debug!(user_id = id.0, index, "user removed from store");
        Ok((index, record))
    }

    /// Puts a previously held record back without validation. Used to undo a
    /// mutation whose remote mirror failed.
    pub fn restore(&mut self, record: UserRecord) -> DashboardResult<()> {
        let index = self.position(record.id)?;
        if let Some(slot) = self.records.get_mut(index) {
            *slot = record;
        }
        Ok(())
    }

    /// Re-inserts a removed record at its former position, clamped to the
    /// current length.
    pub fn reinsert(&mut self, index: usize, record: UserRecord) {
        let index = index.min(self.records.len());
        self.records.insert(index, record);
    }

    fn position(&self, id: UserId) -> DashboardResult<usize> {
        self.records
            .iter()
            .position(|record| record.id == id)
            .ok_or(DashboardError::NotFound { id: Some(id) })
    }
}

/// Field rules shared by create and update. The first failing rule wins.
pub fn validate_fields(fields: &UserFields) -> DashboardResult<()> {
    if fields.name.is_empty() || fields.email.is_empty() || fields.city.is_empty() {
        return Err(DashboardError::validation("All fields must be filled"));
    }
    if !fields.email.contains('@') {
        return Err(DashboardError::validation("Email must include '@'"));
    }
    if fields.name.chars().count() <= MIN_TEXT_LEN_EXCLUSIVE {
        return Err(DashboardError::validation(
            "Name must be greater than 3 characters",
        ));
    }
    if fields.city.chars().count() <= MIN_TEXT_LEN_EXCLUSIVE {
        return Err(DashboardError::validation(
            "City must be greater than 3 characters",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
