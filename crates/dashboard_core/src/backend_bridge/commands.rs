//! Backend commands queued from UI to backend worker.

use shared::domain::UserId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    FetchUsers,
    CreateUser {
        name: String,
        email: String,
    },
    UpdateUser {
        id: UserId,
        name: String,
        email: String,
    },
    DeleteUser {
        id: UserId,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::FetchUsers => "fetch_users",
            BackendCommand::CreateUser { .. } => "create_user",
            BackendCommand::UpdateUser { .. } => "update_user",
            BackendCommand::DeleteUser { .. } => "delete_user",
        }
    }
}
