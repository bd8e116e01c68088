//! Transient user notifications.
//!
//! The queue only holds notifications; dismissing them after their
//! duration is the front-end's job.

use std::time::Duration;

const DEFAULT_DURATION: Duration = Duration::from_secs(4);

/// Error notifications stay up longer.
const ERROR_DURATION: Duration = Duration::from_secs(6);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub title: String,
    pub description: Option<String>,
    pub duration: Duration,
}

/// Notification queue with monotonic ids, oldest first.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: ToastKind, title: String, description: Option<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let duration = match kind {
            ToastKind::Success => DEFAULT_DURATION,
            ToastKind::Error => ERROR_DURATION,
        };
        self.toasts.push(Toast {
            id,
            kind,
            title,
            description,
            duration,
        });
        id
    }

    pub fn success(&mut self, title: impl Into<String>) -> u64 {
        self.push(ToastKind::Success, title.into(), None)
    }

    pub fn error(&mut self, title: impl Into<String>) -> u64 {
        self.push(ToastKind::Error, title.into(), None)
    }

    /// Error with an optional detail line.
    pub fn error_with(&mut self, title: impl Into<String>, description: Option<String>) -> u64 {
        self.push(ToastKind::Error, title.into(), description)
    }

    /// Removes a toast. Returns `true` if it was present.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// Current toasts, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(q: &ToastQueue, id: u64) -> &Toast {
        q.iter().find(|t| t.id == id).unwrap()
    }

    #[test]
    fn ids_are_monotonic_across_dismissals() {
        let mut q = ToastQueue::new();
        let a = q.success("Game added successfully!");
        let b = q.error("Error adding game");
        assert!(q.dismiss(a));
        let c = q.success("Save added successfully!");

        assert_eq!((a, b, c), (0, 1, 2));
        let titles: Vec<&str> = q.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Error adding game", "Save added successfully!"]);
    }

    #[test]
    fn errors_last_longer() {
        let mut q = ToastQueue::new();
        let ok = q.success("ok");
        let err = q.error("fail");
        assert_eq!(find(&q, ok).duration, Duration::from_secs(4));
        assert_eq!(find(&q, err).duration, Duration::from_secs(6));
    }

    #[test]
    fn error_with_keeps_description() {
        let mut q = ToastQueue::new();
        let id = q.error_with("Error adding save", Some("quota exceeded".into()));

        let toast = find(&q, id);
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.description.as_deref(), Some("quota exceeded"));
    }

    #[test]
    fn dismiss_unknown_is_false() {
        let mut q = ToastQueue::new();
        q.success("a");
        assert!(!q.dismiss(42));
        assert_eq!(q.iter().count(), 1);
    }
}
