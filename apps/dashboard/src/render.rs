//! Plain-text frame rendering for the terminal dashboard.

use std::fmt::Write;

use dashboard_core::{MessageTone, ModalMode, ViewModel};

const NAME_WIDTH: usize = 24;

pub fn render_view(vm: &ViewModel) -> String {
    let mut out = String::new();

    let _ = write!(
        out,
        "Users  page {}/{}  ({} of {} match)",
        vm.current_page, vm.total_pages, vm.matching_count, vm.total_count
    );
    if vm.loading {
        out.push_str("  [saving...]");
    }
    out.push('\n');
    if !vm.search_query.is_empty() {
        let _ = writeln!(out, "search: \"{}\"", vm.search_query);
    }
    if let Some((text, tone)) = &vm.message {
        let marker = match tone {
            MessageTone::Success => "ok",
            MessageTone::Failure => "!!",
        };
        let _ = writeln!(out, "[{marker}] {text}");
    }

    let _ = writeln!(out, "{:>6}  {:<NAME_WIDTH$}  EMAIL", "ID", "NAME");
    if vm.rows.is_empty() {
        out.push_str("        (no users)\n");
    }
    for user in &vm.rows {
        let _ = writeln!(
            out,
            "{:>6}  {:<NAME_WIDTH$}  {}",
            user.id.0,
            truncate(&user.name, NAME_WIDTH),
            user.email
        );
    }

    if let Some(modal) = &vm.modal {
        let title = match (modal.mode, modal.editing_id) {
            (ModalMode::Add, _) => "Add user".to_string(),
            (ModalMode::Edit, Some(id)) => format!("Edit user #{id}"),
            (ModalMode::Edit, None) => "Edit user".to_string(),
        };
        let _ = writeln!(out, "--- {title} ---");
        let _ = writeln!(out, "  name:  {}", modal.name);
        let _ = writeln!(out, "  email: {}", modal.email);
        out.push_str("  (name <text> | email <text> | submit | cancel)\n");
    }

    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('~');
    cut
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
