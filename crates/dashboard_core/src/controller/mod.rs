//! Controller layer: UI events, state transitions, and command orchestration.

pub mod events;
pub mod orchestration;

use std::time::Instant;

use crossbeam_channel::Sender;
use shared::domain::{User, UserId};
use tracing::{debug, warn};

use crate::{
    backend_bridge::commands::BackendCommand,
    state::{FormFields, MessageTone, ModalMode, TransientMessage, ViewState, DEFAULT_PAGE_SIZE},
    view::{self, ViewModel},
};
use events::{MutationKind, UiEvent};
use orchestration::{dispatch_backend_command, DispatchFailure};

/// Owns the dashboard's transient state and the cached user list.
///
/// Every method is a synchronous state transition. Collaborator calls are
/// queued on `cmd_tx`; their outcomes come back through [`Self::apply`].
pub struct DashboardController {
    state: ViewState,
    users: Vec<User>,
    in_flight: usize,
    /// Set when a list fetch could not be queued; retried on `tick`.
    refresh_pending: bool,
    cmd_tx: Sender<BackendCommand>,
}

impl DashboardController {
    pub fn new(cmd_tx: Sender<BackendCommand>) -> Self {
        Self::with_page_size(cmd_tx, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(cmd_tx: Sender<BackendCommand>, page_size: usize) -> Self {
        Self {
            state: ViewState::new(page_size),
            users: Vec::new(),
            in_flight: 0,
            refresh_pending: false,
            cmd_tx,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn loading(&self) -> bool {
        self.state.loading
    }

    /// Initial fetch of the raw list.
    pub fn mount(&mut self) {
        self.refresh();
    }

    pub fn refresh(&mut self) {
        match dispatch_backend_command(&self.cmd_tx, BackendCommand::FetchUsers) {
            Ok(()) => self.refresh_pending = false,
            Err(failure) => {
                warn!(?failure, "could not queue user list fetch");
                self.refresh_pending = failure == DispatchFailure::QueueFull;
            }
        }
    }

    pub fn refresh_pending(&self) -> bool {
        self.refresh_pending
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.state.search_query = text.into();
        self.normalize_page();
    }

    pub fn filtered_users(&self) -> Vec<&User> {
        view::filter_users(&self.users, &self.state.search_query)
    }

    pub fn current_page_users(&self) -> Vec<&User> {
        let filtered = self.filtered_users();
        view::page_slice(&filtered, self.state.current_page, self.state.page_size).to_vec()
    }

    pub fn total_pages(&self) -> usize {
        view::total_pages(self.filtered_users().len(), self.state.page_size)
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.state.current_page = page;
        self.normalize_page();
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.state.current_page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.go_to_page(self.state.current_page.saturating_sub(1));
    }

    pub fn open_modal(&mut self, mode: ModalMode, user: Option<&User>) {
        self.state.modal.mode = mode;
        self.state.modal.open = true;
        match mode {
            ModalMode::Edit => {
                self.state.modal.editing_id = user.map(|user| user.id);
                self.state.form = user.map(FormFields::from_user).unwrap_or_default();
            }
            ModalMode::Add => {
                self.state.modal.editing_id = None;
                self.state.form.clear();
            }
        }
    }

    /// Opens the edit modal for a cached user; returns false when the id is unknown.
    pub fn open_edit_for(&mut self, id: UserId) -> bool {
        let Some(user) = self.users.iter().find(|user| user.id == id).cloned() else {
            return false;
        };
        self.open_modal(ModalMode::Edit, Some(&user));
        true
    }

    pub fn close_modal(&mut self) {
        self.state.modal.open = false;
        self.state.form.clear();
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.state.form.name = name.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.state.form.email = email.into();
    }

    pub fn submit(&mut self, now: Instant) {
        if !self.state.modal.open {
            debug!("submit ignored: modal is closed");
            return;
        }

        let name = self.state.form.name.clone();
        let email = self.state.form.email.clone();
        match self.state.modal.mode {
            ModalMode::Add => {
                self.start_mutation(
                    MutationKind::Create,
                    BackendCommand::CreateUser { name, email },
                    now,
                );
            }
            ModalMode::Edit => match self.state.modal.editing_id {
                Some(id) => {
                    self.start_mutation(
                        MutationKind::Update,
                        BackendCommand::UpdateUser { id, name, email },
                        now,
                    );
                }
                None => {
                    warn!("edit submitted without a target user");
                    self.show_message(MutationKind::Update.failure_message(), MessageTone::Failure, now);
                }
            },
        }
    }

    pub fn remove(&mut self, id: UserId, now: Instant) {
        self.start_mutation(MutationKind::Delete, BackendCommand::DeleteUser { id }, now);
    }

    /// Applies a completion event from the backend worker.
    pub fn apply(&mut self, event: UiEvent, now: Instant) {
        match event {
            UiEvent::UsersLoaded(users) => {
                self.users = users;
                self.normalize_page();
            }
            UiEvent::UsersLoadFailed(reason) => {
                warn!(%reason, "failed to load users; keeping cached list");
            }
            UiEvent::MutationSucceeded { kind } => {
                self.finish_mutation();
                if matches!(kind, MutationKind::Create | MutationKind::Update) {
                    self.close_modal();
                }
                self.show_message(kind.success_message(), MessageTone::Success, now);
                self.refresh();
            }
            UiEvent::MutationFailed { kind, reason } => {
                self.finish_mutation();
                warn!(?kind, %reason, "user mutation failed");
                self.show_message(kind.failure_message(), MessageTone::Failure, now);
            }
        }
    }

    /// Retries a dropped list fetch and expires the banner message.
    /// Returns whether the banner changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.refresh_pending {
            self.refresh();
        }
        let expired = self
            .state
            .transient_message
            .as_ref()
            .is_some_and(|message| message.is_expired(now));
        if expired {
            self.state.transient_message = None;
        }
        expired
    }

    pub fn view_model(&self) -> ViewModel {
        ViewModel::build(&self.state, &self.users)
    }

    fn start_mutation(&mut self, kind: MutationKind, cmd: BackendCommand, now: Instant) {
        self.in_flight += 1;
        self.state.loading = true;
        if let Err(failure) = dispatch_backend_command(&self.cmd_tx, cmd) {
            warn!(?kind, ?failure, "could not queue user mutation");
            self.finish_mutation();
            self.show_message(kind.failure_message(), MessageTone::Failure, now);
        }
    }

    fn finish_mutation(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.state.loading = self.in_flight > 0;
    }

    fn show_message(&mut self, text: &str, tone: MessageTone, now: Instant) {
        self.state.transient_message = Some(TransientMessage::new(text, tone, now));
    }

    fn normalize_page(&mut self) {
        let count = self.filtered_users().len();
        self.state.current_page =
            view::clamp_page(self.state.current_page, count, self.state.page_size);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
