//! Transient toast notifications.
//!
//! The queue itself is plain data; the reactive wrapper and the rendered
//! container live in `components::toast_view`. Auto-dismiss is scheduled
//! there, so removal stays idempotent: a toast dismissed by hand before its
//! timer fires is simply gone when the timer looks for it.

pub const MAX_TOASTS: usize = 5;
pub const DEFAULT_TOAST_MS: u32 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub const fn css_class(&self) -> &'static str {
        match self {
            ToastKind::Success => "toast-success",
            ToastKind::Error => "toast-error",
            ToastKind::Warning => "toast-warning",
            ToastKind::Info => "toast-info",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub title: String,
    /// Secondary line under the title; most toasts are title-only.
    pub message: Option<String>,
    /// How long the view layer keeps this toast on screen.
    pub duration_ms: u32,
}

/// Newest-first queue capped at [`MAX_TOASTS`]; the oldest entries fall off
/// the end when the cap is exceeded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Adds a toast at the front and returns its id.
    pub fn push(
        &mut self,
        kind: ToastKind,
        title: impl Into<String>,
        message: Option<String>,
        duration_ms: u32,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.insert(
            0,
            Toast {
                id,
                kind,
                title: title.into(),
                message,
                duration_ms,
            },
        );
        self.toasts.truncate(MAX_TOASTS);
        id
    }

    /// Removes the toast with the given id; a no-op when it is already gone.
    pub fn remove(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_simple(q: &mut ToastQueue, kind: ToastKind, title: &str) -> u64 {
        q.push(kind, title, None, DEFAULT_TOAST_MS)
    }

    #[test]
    fn newest_toast_is_first() {
        let mut q = ToastQueue::new();
        push_simple(&mut q, ToastKind::Info, "first");
        push_simple(&mut q, ToastKind::Success, "second");
        assert_eq!(q.toasts()[0].title, "second");
        assert_eq!(q.toasts()[1].title, "first");
    }

    #[test]
    fn queue_is_capped_and_drops_the_oldest() {
        let mut q = ToastQueue::new();
        for i in 0..8 {
            push_simple(&mut q, ToastKind::Info, &format!("toast {}", i));
        }
        assert_eq!(q.toasts().len(), MAX_TOASTS);
        assert_eq!(q.toasts()[0].title, "toast 7");
        assert_eq!(q.toasts()[MAX_TOASTS - 1].title, "toast 3");
    }

    #[test]
    fn remove_is_idempotent() {
        let mut q = ToastQueue::new();
        let id = push_simple(&mut q, ToastKind::Error, "oops");
        q.remove(id);
        assert!(q.toasts().is_empty());
        // Second removal of the same id must not panic or disturb others.
        push_simple(&mut q, ToastKind::Info, "still here");
        q.remove(id);
        assert_eq!(q.toasts().len(), 1);
    }

    #[test]
    fn ids_are_unique_across_evictions() {
        let mut q = ToastQueue::new();
        let mut ids = Vec::new();
        for i in 0..10 {
            ids.push(push_simple(&mut q, ToastKind::Info, &format!("{}", i)));
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn title_message_and_duration_are_kept() {
        let mut q = ToastQueue::new();
        q.push(
            ToastKind::Warning,
            "River level rising",
            Some("Move to higher ground.".to_string()),
            8000,
        );
        let toast = &q.toasts()[0];
        assert_eq!(toast.kind, ToastKind::Warning);
        assert_eq!(toast.title, "River level rising");
        assert_eq!(toast.message.as_deref(), Some("Move to higher ground."));
        assert_eq!(toast.duration_ms, 8000);
    }

    #[test]
    fn every_kind_styles_distinctly() {
        let classes = [
            ToastKind::Success,
            ToastKind::Error,
            ToastKind::Warning,
            ToastKind::Info,
        ]
        .map(|k| k.css_class());
        let mut deduped = classes.to_vec();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), classes.len());
    }
}
