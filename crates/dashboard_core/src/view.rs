//! Pure derivations from the raw user list and the view state.

use shared::domain::{User, UserId};

use crate::state::{MessageTone, ModalMode, ViewState};

/// Users whose name contains `query`, compared lower-cased; raw order is kept.
pub fn filter_users<'a>(users: &'a [User], query: &str) -> Vec<&'a User> {
    if query.is_empty() {
        return users.iter().collect();
    }
    let needle = query.to_lowercase();
    users
        .iter()
        .filter(|user| user.name.to_lowercase().contains(&needle))
        .collect()
}

/// Number of pages needed for `count` items; zero items need zero pages.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// Clamps a 1-based page into `1..=max(1, total_pages)`.
pub fn clamp_page(page: usize, count: usize, page_size: usize) -> usize {
    page.clamp(1, total_pages(count, page_size).max(1))
}

/// The `[(page-1)*size, page*size)` window of `items`, cut to what exists.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = page
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub mode: ModalMode,
    pub editing_id: Option<UserId>,
    pub name: String,
    pub email: String,
}

/// Everything the presentation layer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub rows: Vec<User>,
    pub search_query: String,
    pub current_page: usize,
    pub total_pages: usize,
    pub matching_count: usize,
    pub total_count: usize,
    pub loading: bool,
    pub message: Option<(String, MessageTone)>,
    pub modal: Option<ModalView>,
}

impl ViewModel {
    pub fn build(state: &ViewState, users: &[User]) -> Self {
        let filtered = filter_users(users, &state.search_query);
        let rows = page_slice(&filtered, state.current_page, state.page_size)
            .iter()
            .map(|user| (*user).clone())
            .collect();

        Self {
            rows,
            search_query: state.search_query.clone(),
            current_page: state.current_page,
            total_pages: total_pages(filtered.len(), state.page_size).max(1),
            matching_count: filtered.len(),
            total_count: users.len(),
            loading: state.loading,
            message: state
                .transient_message
                .as_ref()
                .map(|message| (message.text.clone(), message.tone)),
            modal: state.modal.open.then(|| ModalView {
                mode: state.modal.mode,
                editing_id: match state.modal.mode {
                    ModalMode::Edit => state.modal.editing_id,
                    ModalMode::Add => None,
                },
                name: state.form.name.clone(),
                email: state.form.email.clone(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
