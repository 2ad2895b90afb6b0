use std::time::{Duration, Instant};

pub const SUCCESS_TTL: Duration = Duration::from_secs(3);
pub const ERROR_TTL: Duration = Duration::from_secs(4);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub expires_at: Instant,
}

/// Transient notifications, oldest first.
#[derive(Debug, Default)]
pub struct Notifications {
    toasts: Vec<Toast>,
}

impl Notifications {
    pub fn success(&mut self, message: impl Into<String>) {
        self.push_at(ToastKind::Success, message, Instant::now());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push_at(ToastKind::Error, message, Instant::now());
    }

    pub fn push_at(&mut self, kind: ToastKind, message: impl Into<String>, now: Instant) {
        let ttl = match kind {
            ToastKind::Success => SUCCESS_TTL,
            ToastKind::Error => ERROR_TTL,
        };
        self.toasts.push(Toast {
            kind,
            message: message.into(),
            expires_at: now + ttl,
        });
    }

    /// Drops expired toasts and returns how long until the next one expires.
    pub fn prune(&mut self, now: Instant) -> Option<Duration> {
        self.toasts.retain(|toast| toast.expires_at > now);
        self.toasts
            .iter()
            .map(|toast| toast.expires_at.saturating_duration_since(now))
            .min()
    }

    pub fn dismiss(&mut self, index: usize) {
        if index < self.toasts.len() {
            self.toasts.remove(index);
        }
    }

    pub fn active(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }
}
