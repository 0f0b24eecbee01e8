use super::*;
use crate::state::MESSAGE_TTL;
use crossbeam_channel::{bounded, Receiver};
use std::time::Duration;

fn user(id: i64, name: &str) -> User {
    User {
        id: UserId(id),
        name: name.to_string(),
        email: format!("{}@x.com", name.to_lowercase()),
    }
}

fn numbered_users(count: i64) -> Vec<User> {
    (1..=count).map(|id| user(id, &format!("User {id}"))).collect()
}

fn controller(page_size: usize) -> (DashboardController, Receiver<BackendCommand>) {
    let (cmd_tx, cmd_rx) = bounded(32);
    (DashboardController::with_page_size(cmd_tx, page_size), cmd_rx)
}

fn drain(cmd_rx: &Receiver<BackendCommand>) -> Vec<BackendCommand> {
    cmd_rx.try_iter().collect()
}

#[test]
fn mount_queues_initial_fetch() {
    let (mut ctl, cmd_rx) = controller(10);
    ctl.mount();
    assert_eq!(drain(&cmd_rx), vec![BackendCommand::FetchUsers]);
    assert!(!ctl.loading());
}

#[test]
fn filtered_users_matches_name_case_insensitively() {
    let (mut ctl, _cmd_rx) = controller(10);
    let now = Instant::now();
    ctl.apply(UiEvent::UsersLoaded(vec![user(1, "Al"), user(2, "Bob")]), now);
    ctl.set_search("al");
    let ids: Vec<UserId> = ctl.filtered_users().iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![UserId(1)]);
}

#[test]
fn current_page_users_never_exceeds_page_size() {
    let (mut ctl, _cmd_rx) = controller(4);
    let now = Instant::now();
    ctl.apply(UiEvent::UsersLoaded(numbered_users(10)), now);

    assert_eq!(ctl.current_page_users().len(), 4);
    ctl.go_to_page(3);
    assert_eq!(ctl.state().current_page, 3);
    assert_eq!(ctl.current_page_users().len(), 2);
    ctl.next_page();
    assert_eq!(ctl.state().current_page, 3, "clamped at last page");
    ctl.go_to_page(0);
    assert_eq!(ctl.state().current_page, 1);
    ctl.prev_page();
    assert_eq!(ctl.state().current_page, 1);
}

#[test]
fn deleting_sole_item_on_last_page_steps_back_one_page() {
    let (mut ctl, cmd_rx) = controller(10);
    let now = Instant::now();
    let users = numbered_users(21);
    ctl.apply(UiEvent::UsersLoaded(users.clone()), now);
    ctl.go_to_page(3);
    assert_eq!(ctl.current_page_users().len(), 1);

    ctl.remove(UserId(21), now);
    assert!(ctl.loading());
    assert_eq!(
        drain(&cmd_rx),
        vec![BackendCommand::DeleteUser { id: UserId(21) }]
    );

    ctl.apply(
        UiEvent::MutationSucceeded {
            kind: MutationKind::Delete,
        },
        now,
    );
    assert!(!ctl.loading());
    assert_eq!(drain(&cmd_rx), vec![BackendCommand::FetchUsers]);

    ctl.apply(UiEvent::UsersLoaded(users[..20].to_vec()), now);
    assert_eq!(ctl.state().current_page, 2);
    assert_eq!(ctl.current_page_users().len(), 10);
}

#[test]
fn narrowing_search_clamps_page_to_last_available() {
    let (mut ctl, _cmd_rx) = controller(2);
    let now = Instant::now();
    let mut users = numbered_users(6);
    users.push(user(7, "Zed"));
    ctl.apply(UiEvent::UsersLoaded(users), now);
    ctl.go_to_page(4);
    assert_eq!(ctl.state().current_page, 4);

    ctl.set_search("zed");
    assert_eq!(ctl.state().current_page, 1);
    assert_eq!(ctl.current_page_users()[0].id, UserId(7));

    ctl.set_search("nobody");
    assert_eq!(ctl.state().current_page, 1);
    assert!(ctl.current_page_users().is_empty());
}

#[test]
fn edit_then_close_then_add_leaves_clean_form() {
    let (mut ctl, _cmd_rx) = controller(10);
    let target = User {
        id: UserId(5),
        name: "A".to_string(),
        email: "a@x.com".to_string(),
    };

    ctl.open_modal(ModalMode::Edit, Some(&target));
    assert_eq!(ctl.state().form.name, "A");
    assert_eq!(ctl.state().form.email, "a@x.com");
    assert_eq!(ctl.state().modal.editing_id, Some(UserId(5)));

    ctl.close_modal();
    assert!(!ctl.state().modal.open);
    assert!(ctl.state().form.is_empty());

    ctl.open_modal(ModalMode::Add, None);
    assert!(ctl.state().modal.open);
    assert!(ctl.state().form.is_empty());
    assert_eq!(ctl.state().modal.editing_id, None);
}

#[test]
fn open_edit_for_unknown_id_does_nothing() {
    let (mut ctl, _cmd_rx) = controller(10);
    let now = Instant::now();
    ctl.apply(UiEvent::UsersLoaded(vec![user(1, "Al")]), now);

    assert!(!ctl.open_edit_for(UserId(2)));
    assert!(!ctl.state().modal.open);

    assert!(ctl.open_edit_for(UserId(1)));
    assert_eq!(ctl.state().modal.mode, ModalMode::Edit);
    assert_eq!(ctl.state().form.name, "Al");
}

#[test]
fn failed_create_preserves_form_and_keeps_modal_open() {
    let (mut ctl, cmd_rx) = controller(10);
    let now = Instant::now();
    ctl.open_modal(ModalMode::Add, None);
    ctl.set_name("Al");
    ctl.set_email("al@x.com");

    ctl.submit(now);
    assert!(ctl.loading());
    assert_eq!(
        drain(&cmd_rx),
        vec![BackendCommand::CreateUser {
            name: "Al".to_string(),
            email: "al@x.com".to_string(),
        }]
    );

    ctl.apply(
        UiEvent::MutationFailed {
            kind: MutationKind::Create,
            reason: "Conflict: email is already in use".to_string(),
        },
        now,
    );
    assert!(!ctl.loading());
    assert!(ctl.state().modal.open);
    assert_eq!(ctl.state().form.name, "Al");
    assert_eq!(ctl.state().form.email, "al@x.com");
    let message = ctl.state().transient_message.as_ref().expect("message");
    assert_eq!(message.text, "Error creating user.");
    assert_eq!(message.tone, MessageTone::Failure);
    assert!(drain(&cmd_rx).is_empty(), "no refetch after failure");
}

#[test]
fn successful_create_clears_form_closes_modal_and_refetches() {
    let (mut ctl, cmd_rx) = controller(10);
    let now = Instant::now();
    ctl.open_modal(ModalMode::Add, None);
    ctl.set_name("Al");
    ctl.set_email("al@x.com");
    ctl.submit(now);
    drain(&cmd_rx);

    ctl.apply(
        UiEvent::MutationSucceeded {
            kind: MutationKind::Create,
        },
        now,
    );
    assert!(!ctl.state().modal.open);
    assert!(ctl.state().form.is_empty());
    assert_eq!(
        ctl.state().transient_message.as_ref().map(|m| m.text.as_str()),
        Some("User created successfully!")
    );
    assert_eq!(drain(&cmd_rx), vec![BackendCommand::FetchUsers]);
}

#[test]
fn edit_submit_sends_update_for_recorded_id() {
    let (mut ctl, cmd_rx) = controller(10);
    let now = Instant::now();
    ctl.open_modal(ModalMode::Edit, Some(&user(5, "A")));
    ctl.set_name("Alan");
    ctl.submit(now);
    assert_eq!(
        drain(&cmd_rx),
        vec![BackendCommand::UpdateUser {
            id: UserId(5),
            name: "Alan".to_string(),
            email: "a@x.com".to_string(),
        }]
    );
}

#[test]
fn edit_without_target_reports_failure_without_dispatch() {
    let (mut ctl, cmd_rx) = controller(10);
    let now = Instant::now();
    ctl.open_modal(ModalMode::Edit, None);
    ctl.submit(now);
    assert!(drain(&cmd_rx).is_empty());
    assert!(!ctl.loading());
    assert_eq!(
        ctl.state().transient_message.as_ref().map(|m| m.text.as_str()),
        Some("Error updating user.")
    );
}

#[test]
fn submit_with_closed_modal_is_ignored() {
    let (mut ctl, cmd_rx) = controller(10);
    ctl.submit(Instant::now());
    assert!(drain(&cmd_rx).is_empty());
    assert!(ctl.state().transient_message.is_none());
}

#[test]
fn failed_delete_reports_message_and_keeps_list() {
    let (mut ctl, cmd_rx) = controller(10);
    let now = Instant::now();
    ctl.apply(UiEvent::UsersLoaded(vec![user(1, "Al")]), now);
    ctl.remove(UserId(1), now);
    drain(&cmd_rx);

    ctl.apply(
        UiEvent::MutationFailed {
            kind: MutationKind::Delete,
            reason: "timeout".to_string(),
        },
        now,
    );
    assert_eq!(ctl.users().len(), 1);
    assert_eq!(
        ctl.state().transient_message.as_ref().map(|m| m.text.as_str()),
        Some("Error deleting user.")
    );
}

#[test]
fn loading_stays_true_until_every_mutation_lands() {
    let (mut ctl, cmd_rx) = controller(10);
    let now = Instant::now();
    ctl.remove(UserId(1), now);
    ctl.remove(UserId(2), now);
    assert_eq!(drain(&cmd_rx).len(), 2);

    ctl.apply(
        UiEvent::MutationSucceeded {
            kind: MutationKind::Delete,
        },
        now,
    );
    assert!(ctl.loading());
    ctl.apply(
        UiEvent::MutationFailed {
            kind: MutationKind::Delete,
            reason: "gone".to_string(),
        },
        now,
    );
    assert!(!ctl.loading());
}

#[test]
fn latest_fetch_replaces_cached_list_wholesale() {
    let (mut ctl, _cmd_rx) = controller(10);
    let now = Instant::now();
    ctl.apply(UiEvent::UsersLoaded(vec![user(1, "Al"), user(2, "Bob")]), now);
    ctl.apply(UiEvent::UsersLoaded(vec![user(3, "Cy")]), now);
    let ids: Vec<UserId> = ctl.users().iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![UserId(3)]);
}

#[test]
fn failed_fetch_keeps_cached_list() {
    let (mut ctl, _cmd_rx) = controller(10);
    let now = Instant::now();
    ctl.apply(UiEvent::UsersLoaded(vec![user(1, "Al")]), now);
    ctl.apply(UiEvent::UsersLoadFailed("offline".to_string()), now);
    assert_eq!(ctl.users().len(), 1);
    assert!(ctl.state().transient_message.is_none());
}

#[test]
fn message_expires_after_ttl_and_newer_message_restarts_delay() {
    let (mut ctl, cmd_rx) = controller(10);
    let start = Instant::now();
    ctl.remove(UserId(1), start);
    ctl.apply(
        UiEvent::MutationFailed {
            kind: MutationKind::Delete,
            reason: "x".to_string(),
        },
        start,
    );

    let later = start + Duration::from_secs(2);
    ctl.remove(UserId(2), later);
    ctl.apply(
        UiEvent::MutationSucceeded {
            kind: MutationKind::Delete,
        },
        later,
    );
    drain(&cmd_rx);

    assert!(!ctl.tick(start + MESSAGE_TTL), "restarted by newer message");
    assert_eq!(
        ctl.state().transient_message.as_ref().map(|m| m.text.as_str()),
        Some("User deleted successfully!")
    );
    assert!(ctl.tick(later + MESSAGE_TTL));
    assert!(ctl.state().transient_message.is_none());
    assert!(!ctl.tick(later + MESSAGE_TTL * 2));
}

#[test]
fn disconnected_backend_turns_mutation_into_failure_message() {
    let (cmd_tx, cmd_rx) = bounded(1);
    drop(cmd_rx);
    let mut ctl = DashboardController::new(cmd_tx);
    let now = Instant::now();
    ctl.open_modal(ModalMode::Add, None);
    ctl.set_name("Al");
    ctl.set_email("al@x.com");

    ctl.submit(now);
    assert!(!ctl.loading());
    assert!(ctl.state().modal.open);
    assert_eq!(ctl.state().form.name, "Al");
    assert_eq!(
        ctl.state().transient_message.as_ref().map(|m| m.text.as_str()),
        Some("Error creating user.")
    );
}

#[test]
fn view_model_reflects_modal_and_loading() {
    let (mut ctl, _cmd_rx) = controller(10);
    let now = Instant::now();
    ctl.apply(UiEvent::UsersLoaded(vec![user(1, "Al")]), now);
    ctl.open_edit_for(UserId(1));
    ctl.submit(now);

    let vm = ctl.view_model();
    assert!(vm.loading);
    let modal = vm.modal.expect("modal");
    assert_eq!(modal.mode, ModalMode::Edit);
    assert_eq!(modal.editing_id, Some(UserId(1)));
    assert_eq!(vm.rows.len(), 1);
}

#[test]
fn refetch_dropped_by_full_queue_is_retried_on_tick() {
    let (cmd_tx, cmd_rx) = bounded(1);
    let mut ctl = DashboardController::new(cmd_tx);
    let now = Instant::now();
    ctl.remove(UserId(1), now);
    ctl.apply(
        UiEvent::MutationSucceeded {
            kind: MutationKind::Delete,
        },
        now,
    );
    assert!(ctl.refresh_pending());
    assert_eq!(drain(&cmd_rx), vec![BackendCommand::DeleteUser { id: UserId(1) }]);

    ctl.tick(now);
    assert!(!ctl.refresh_pending());
    assert_eq!(drain(&cmd_rx), vec![BackendCommand::FetchUsers]);
    ctl.tick(now);
    assert!(drain(&cmd_rx).is_empty());
}

#[test]
fn refetch_is_not_retried_once_backend_is_gone() {
    let (cmd_tx, cmd_rx) = bounded(1);
    drop(cmd_rx);
    let mut ctl = DashboardController::new(cmd_tx);
    ctl.refresh();
    assert!(!ctl.refresh_pending());
}
