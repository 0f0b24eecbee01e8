//! Bridge between the UI command queue and the async collaborator.

pub mod commands;
pub mod runtime;
