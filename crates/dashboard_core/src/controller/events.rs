//! Completion events sent from the backend worker to the UI loop.

use shared::domain::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    pub fn success_message(self) -> &'static str {
        match self {
            MutationKind::Create => "User created successfully!",
            MutationKind::Update => "User updated successfully!",
            MutationKind::Delete => "User deleted successfully!",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            MutationKind::Create => "Error creating user.",
            MutationKind::Update => "Error updating user.",
            MutationKind::Delete => "Error deleting user.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    UsersLoaded(Vec<User>),
    UsersLoadFailed(String),
    MutationSucceeded { kind: MutationKind },
    MutationFailed { kind: MutationKind, reason: String },
}
