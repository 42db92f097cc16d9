use std::{future::Future, str::FromStr, sync::Arc};

use serde::Deserialize;
use shared::{
    domain::{DraftField, SortDirection, SortKey, Theme, UserFields, UserId, UserRecord},
    error::{DashboardError, DashboardResult, Operation, RemoteError},
    protocol::UserPayload,
};
use storage::UserStore;
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

pub mod form;
pub mod query;
pub mod remote;

pub use form::{Draft, FormCoordinator, FormMode, Submission};
pub use query::{QueryState, ViewWindow, USERS_PER_PAGE};
pub use remote::{HttpUserService, UserService, DEFAULT_API_URL};

/// What happens to a local mutation when its remote mirror fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MirrorPolicy {
    /// The local change stands; the failure is only reported.
    #[default]
    LocalAuthoritative,
    /// The local change is undone.
    Rollback,
}

impl FromStr for MirrorPolicy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "local_authoritative" | "local" => Ok(Self::LocalAuthoritative),
            "rollback" => Ok(Self::Rollback),
            other => Err(format!("unknown mirror policy '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    UsersChanged { count: usize },
    LoadingChanged(bool),
    Error(String),
}

/// Everything a front end needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSnapshot {
    pub window: ViewWindow,
    pub total: usize,
    pub search_text: String,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
    pub draft: Draft,
    pub mode: FormMode,
    pub theme: Theme,
    pub loading: bool,
    pub error: Option<String>,
}

struct DashboardState {
    store: UserStore,
    query: QueryState,
    form: FormCoordinator,
    theme: Theme,
    in_flight: usize,
    error: Option<String>,
}

pub struct DashboardClient {
    service: Arc<dyn UserService>,
    policy: MirrorPolicy,
    inner: Mutex<DashboardState>,
    events: broadcast::Sender<DashboardEvent>,
}

impl DashboardClient {
    pub fn new(service: Arc<dyn UserService>, policy: MirrorPolicy) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            service,
            policy,
            inner: Mutex::new(DashboardState {
                store: UserStore::new(),
                query: QueryState::default(),
                form: FormCoordinator::new(),
                theme: Theme::default(),
                in_flight: 0,
                error: None,
            }),
            events,
        }
    }

    pub fn policy(&self) -> MirrorPolicy {
        self.policy
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        let guard = self.inner.lock().await;
        DashboardSnapshot {
            window: guard.query.window(guard.store.records()),
            total: guard.store.len(),
            search_text: guard.query.search_text().to_string(),
            sort_key: guard.query.sort_key(),
            sort_direction: guard.query.sort_direction(),
            draft: guard.form.draft().clone(),
            mode: guard.form.mode(),
            theme: guard.theme,
            loading: guard.in_flight > 0,
            error: guard.error.clone(),
        }
    }

    pub async fn users(&self) -> Vec<UserRecord> {
        self.inner.lock().await.store.records().to_vec()
    }

    pub async fn page(&self) -> usize {
        self.inner.lock().await.query.page()
    }

    /// Replaces the store with the remote list. On failure the store keeps
    /// whatever it held before.
    pub async fn load_users(&self) -> DashboardResult<usize> {
        let users = self
            .mirror(Operation::FetchUsers, self.service.fetch_users())
            .await;
        let users = match users {
            Ok(users) => users,
            Err(err) => return Err(self.fail(err).await),
        };

        let count = users.len();
        {
            let mut guard = self.inner.lock().await;
            guard.store.load(users);
            guard.error = None;
        }
        info!(count, "users loaded");
        let _ = self.events.send(DashboardEvent::UsersChanged { count });
        Ok(count)
    }

    pub async fn set_search(&self, text: impl Into<String>) {
        self.inner.lock().await.query.set_search(text);
    }

    pub async fn toggle_sort(&self, key: SortKey) {
        self.inner.lock().await.query.toggle_sort(key);
    }

    pub async fn set_sort(&self, key: SortKey, direction: SortDirection) {
        self.inner.lock().await.query.set_sort(key, direction);
    }

    pub async fn next_page(&self) -> bool {
        let mut guard = self.inner.lock().await;
        let state = &mut *guard;
        let filtered = state.query.filtered(state.store.records()).len();
        state.query.next_page(filtered)
    }

    pub async fn previous_page(&self) -> bool {
        self.inner.lock().await.query.previous_page()
    }

    pub async fn set_page(&self, page: usize) {
        self.inner.lock().await.query.set_page(page);
    }

    pub async fn toggle_theme(&self) -> Theme {
        let mut guard = self.inner.lock().await;
        guard.theme = guard.theme.toggled();
        guard.theme
    }

    /// Loads `id` into the draft and clears any displayed error.
    pub async fn begin_edit(&self, id: UserId) -> DashboardResult<()> {
        let mut guard = self.inner.lock().await;
        let Some(record) = guard.store.get(id).cloned() else {
            drop(guard);
            return Err(self.fail(DashboardError::NotFound { id: Some(id) }).await);
        };
        guard.form.begin_edit(&record);
        guard.error = None;
        Ok(())
    }

    pub async fn set_draft_field(&self, field: DraftField, value: impl Into<String>) {
        self.inner.lock().await.form.set_field(field, value);
    }

    pub async fn clear_draft_id(&self) {
        self.inner.lock().await.form.clear_id();
    }

    pub async fn reset_draft(&self) {
        self.inner.lock().await.form.reset();
    }

    /// Submits the draft as a create or an update depending on its mode.
    pub async fn submit(&self) -> DashboardResult<UserRecord> {
        let prepared = self.inner.lock().await.form.prepare_submit();
        self.apply_submission(prepared).await
    }

    /// Submits the draft as an update; fails when no user is selected.
    pub async fn submit_update(&self) -> DashboardResult<UserRecord> {
        let prepared = self.inner.lock().await.form.prepare_update();
        self.apply_submission(prepared).await
    }

    pub async fn add_user(&self, fields: UserFields) -> DashboardResult<UserRecord> {
        self.add(fields, false).await
    }

    pub async fn update_user(&self, id: UserId, fields: UserFields) -> DashboardResult<UserRecord> {
        self.update(id, fields, false).await
    }

    /// Removes `id` locally and mirrors the delete. When the removal stands
    /// the page steps back if it no longer has rows.
    pub async fn delete_user(&self, id: UserId) -> DashboardResult<()> {
        let removed = self.inner.lock().await.store.remove(id);
        let (index, record) = match removed {
            Ok(removed) => removed,
            Err(err) => return Err(self.fail(err).await),
        };
        self.notify_users_changed().await;

        let outcome = self
            .mirror(Operation::DeleteUser, self.service.delete_user(id))
            .await;

        let rolled_back = outcome.is_err() && self.policy == MirrorPolicy::Rollback;
        {
            let mut guard = self.inner.lock().await;
            if rolled_back {
                guard.store.reinsert(index, record);
            } else {
                on_user_removed(&mut guard);
            }
        }
        if rolled_back {
            self.notify_users_changed().await;
        }

        match outcome {
            Ok(()) => {
                info!(user_id = id.0, "user deleted");
                self.clear_error().await;
                Ok(())
            }
            Err(err) => Err(self.fail(err).await),
        }
    }

    async fn apply_submission(
        &self,
        prepared: DashboardResult<Submission>,
    ) -> DashboardResult<UserRecord> {
        match prepared {
            Ok(Submission::Create(fields)) => self.add(fields, true).await,
            Ok(Submission::Update { id, fields }) => self.update(id, fields, true).await,
            Err(err) => Err(self.fail(err).await),
        }
    }

    async fn add(&self, fields: UserFields, from_draft: bool) -> DashboardResult<UserRecord> {
        let added = self.inner.lock().await.store.add(fields);
        let record = match added {
            Ok(record) => record,
            Err(err) => return Err(self.fail(err).await),
        };
        self.notify_users_changed().await;

        let payload = UserPayload::from(&record);
        let outcome = self
            .mirror(Operation::AddUser, self.service.create_user(&payload))
            .await;

        let rolled_back = outcome.is_err() && self.policy == MirrorPolicy::Rollback;
        {
            let mut guard = self.inner.lock().await;
            if rolled_back {
                if let Err(err) = guard.store.remove(record.id) {
                    warn!(user_id = record.id.0, error = %err, "could not roll back add");
                }
            } else if from_draft {
                guard.form.reset();
            }
        }
        if rolled_back {
            self.notify_users_changed().await;
        }

        match outcome {
            Ok(()) => {
                info!(user_id = record.id.0, "user added");
                self.clear_error().await;
                Ok(record)
            }
            Err(err) => Err(self.fail(err).await),
        }
    }

    async fn update(
        &self,
        id: UserId,
        fields: UserFields,
        from_draft: bool,
    ) -> DashboardResult<UserRecord> {
        let updated = UserRecord::new(id, fields.clone());
        let replaced = self.inner.lock().await.store.update(id, fields);
        let previous = match replaced {
            Ok(previous) => previous,
            Err(err) => return Err(self.fail(err).await),
        };
        self.notify_users_changed().await;

        let payload = UserPayload::from(&updated);
        let outcome = self
            .mirror(Operation::UpdateUser, self.service.update_user(&payload))
            .await;

        let rolled_back = outcome.is_err() && self.policy == MirrorPolicy::Rollback;
        {
            let mut guard = self.inner.lock().await;
            if rolled_back {
                if let Err(err) = guard.store.restore(previous) {
                    warn!(user_id = id.0, error = %err, "could not roll back update");
                }
            } else if from_draft {
                guard.form.reset();
            }
        }
        if rolled_back {
            self.notify_users_changed().await;
        }

        match outcome {
            Ok(()) => {
                info!(user_id = id.0, "user updated");
                self.clear_error().await;
                Ok(updated)
            }
            Err(err) => Err(self.fail(err).await),
        }
    }

    /// Runs one remote call with the loading indicator raised. The indicator
    /// is lowered on every path before the outcome is inspected.
    async fn mirror<T, F>(&self, operation: Operation, call: F) -> DashboardResult<T>
    where
        F: Future<Output = Result<T, RemoteError>>,
    {
        self.adjust_in_flight(true).await;
        let outcome = call.await;
        self.adjust_in_flight(false).await;

        outcome.map_err(|source| {
            warn!(%operation, error = %source, "remote call failed");
            DashboardError::remote(operation, source)
        })
    }

    async fn adjust_in_flight(&self, starting: bool) {
        let loading_changed = {
            let mut guard = self.inner.lock().await;
            let before = guard.in_flight;
            guard.in_flight = if starting {
                before + 1
            } else {
                before.saturating_sub(1)
            };
            (before == 0) != (guard.in_flight == 0)
        };
        if loading_changed {
            let _ = self.events.send(DashboardEvent::LoadingChanged(starting));
        }
    }

    async fn notify_users_changed(&self) {
        let count = self.inner.lock().await.store.len();
        let _ = self.events.send(DashboardEvent::UsersChanged { count });
    }

    async fn clear_error(&self) {
        self.inner.lock().await.error = None;
    }

    /// Stores the message for display and hands the error back.
    async fn fail(&self, err: DashboardError) -> DashboardError {
        let message = err.to_string();
        self.inner.lock().await.error = Some(message.clone());
        let _ = self.events.send(DashboardEvent::Error(message));
        err
    }
}

/// Post-removal hook from the store's caller into the pagination state.
fn on_user_removed(state: &mut DashboardState) {
    let remaining = state.query.filtered(state.store.records()).len();
    if state.query.after_removal(remaining) {
        info!(page = state.query.page(), "page emptied by delete, stepped back");
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
