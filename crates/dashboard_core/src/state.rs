use std::time::{Duration, Instant};

use shared::domain::{User, UserId};

pub const DEFAULT_PAGE_SIZE: usize = 10;
/// How long a banner message stays visible after it was last set.
pub const MESSAGE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalMode {
    #[default]
    Add,
    Edit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub email: String,
}

impl FormFields {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.email.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalState {
    pub open: bool,
    pub mode: ModalMode,
    /// Kept after close; only meaningful while `mode` is `Edit`.
    pub editing_id: Option<UserId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTone {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientMessage {
    pub text: String,
    pub tone: MessageTone,
    expires_at: Instant,
}

impl TransientMessage {
    pub fn new(text: impl Into<String>, tone: MessageTone, now: Instant) -> Self {
        Self {
            text: text.into(),
            tone,
            expires_at: now + MESSAGE_TTL,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone)]
pub struct ViewState {
    pub search_query: String,
    /// 1-based.
    pub current_page: usize,
    pub page_size: usize,
    pub modal: ModalState,
    pub form: FormFields,
    pub loading: bool,
    pub transient_message: Option<TransientMessage>,
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            search_query: String::new(),
            current_page: 1,
            page_size: page_size.max(1),
            modal: ModalState::default(),
            form: FormFields::default(),
            loading: false,
            transient_message: None,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
