//! Runtime bridge between the UI command queue and the user directory.

use std::{sync::Arc, thread, time::Duration};

use client_core::UserDirectory;
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{MutationKind, UiEvent};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Starts the backend worker thread.
///
/// Each command runs as its own task, so completions may arrive in any order.
/// The worker exits once every command sender is dropped.
pub fn launch(
    directory: Arc<dyn UserDirectory>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("dashboard-backend".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    tracing::error!("failed to build backend runtime: {err}");
                    return;
                }
            };
            tracing::debug!("backend worker ready");

            while let Ok(cmd) = cmd_rx.recv() {
                let directory = Arc::clone(&directory);
                let ui_tx = ui_tx.clone();
                runtime.spawn(async move {
                    let event = execute(directory.as_ref(), cmd).await;
                    if ui_tx.send(event).is_err() {
                        tracing::debug!("ui event receiver dropped; discarding completion");
                    }
                });
            }

            tracing::debug!("command queue closed; stopping backend worker");
            runtime.shutdown_timeout(SHUTDOWN_GRACE);
        })
}

async fn execute(directory: &dyn UserDirectory, cmd: BackendCommand) -> UiEvent {
    let cmd_name = cmd.name();
    tracing::debug!(command = cmd_name, "running backend command");
    match cmd {
        BackendCommand::FetchUsers => match directory.get_all().await {
            Ok(users) => UiEvent::UsersLoaded(users),
            Err(err) => UiEvent::UsersLoadFailed(format!("{err:#}")),
        },
        BackendCommand::CreateUser { name, email } => mutation_event(
            MutationKind::Create,
            directory.create_user(&name, &email).await.map(|_| ()),
        ),
        BackendCommand::UpdateUser { id, name, email } => mutation_event(
            MutationKind::Update,
            directory.update_user(id, &name, &email).await.map(|_| ()),
        ),
        BackendCommand::DeleteUser { id } => {
            mutation_event(MutationKind::Delete, directory.delete_user(id).await)
        }
    }
}

fn mutation_event(kind: MutationKind, result: anyhow::Result<()>) -> UiEvent {
    match result {
        Ok(()) => UiEvent::MutationSucceeded { kind },
        Err(err) => UiEvent::MutationFailed {
            kind,
            reason: format!("{err:#}"),
        },
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
