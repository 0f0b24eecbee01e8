//! View state controller for the user directory dashboard.
//!
//! The controller owns every piece of transient UI state and the cached user
//! list. Collaborator calls never run on the UI thread: the controller queues
//! [`backend_bridge::commands::BackendCommand`]s and later applies the
//! [`controller::events::UiEvent`]s the backend worker sends back.

pub mod backend_bridge;
pub mod controller;
pub mod state;
pub mod view;

pub use controller::DashboardController;
pub use state::{FormFields, MessageTone, ModalMode, ModalState, TransientMessage, ViewState};
pub use view::{ModalView, ViewModel};
