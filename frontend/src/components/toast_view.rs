//! Reactive wrapper around the toast queue plus the rendered stack.

use std::time::Duration;

use leptos::prelude::*;

use crate::toast::{DEFAULT_TOAST_MS, Toast, ToastKind, ToastQueue};

/// Handle to the app-wide toast queue. Copyable; hand it to any closure.
#[derive(Clone, Copy)]
pub struct Toasts(pub RwSignal<ToastQueue>);

impl Toasts {
    /// Full-control emitter: title, optional secondary line, and how long
    /// the toast stays up. The helpers below cover the common cases.
    pub fn show(
        &self,
        kind: ToastKind,
        title: impl Into<String>,
        message: Option<String>,
        duration_ms: u32,
    ) {
        let queue = self.0;
        let Some(id) = queue.try_update(|q| q.push(kind, title.into(), message, duration_ms))
        else {
            return;
        };
        // Auto-dismiss; removal is idempotent, so a manual dismiss racing
        // this timer is harmless.
        set_timeout(
            move || {
                let _ = queue.try_update(|q| q.remove(id));
            },
            Duration::from_millis(duration_ms as u64),
        );
    }

    pub fn push(&self, kind: ToastKind, title: impl Into<String>) {
        self.show(kind, title, None, DEFAULT_TOAST_MS);
    }

    pub fn success(&self, title: impl Into<String>) {
        self.push(ToastKind::Success, title);
    }

    pub fn error(&self, title: impl Into<String>) {
        self.push(ToastKind::Error, title);
    }

    pub fn warning(&self, title: impl Into<String>) {
        self.push(ToastKind::Warning, title);
    }

    pub fn info(&self, title: impl Into<String>) {
        self.push(ToastKind::Info, title);
    }
}

pub fn provide_toasts() -> Toasts {
    let toasts = Toasts(RwSignal::new(ToastQueue::new()));
    provide_context(toasts);
    toasts
}

pub fn use_toasts() -> Toasts {
    use_context::<Toasts>().expect("Toasts should be provided at the app root")
}

#[component]
pub fn ToastContainer() -> impl IntoView {
    let toasts = use_toasts();

    view! {
        <div class="toast toast-top toast-end z-50">
            <For
                each=move || toasts.0.get().toasts().to_vec()
                key=|toast: &Toast| toast.id
                children=move |toast: Toast| {
                    let id = toast.id;
                    view! {
                        <div role="alert" class=format!("alert {}", toast.kind.css_class())>
                            <div>
                                <span class="font-medium">{toast.title.clone()}</span>
                                {toast
                                    .message
                                    .clone()
                                    .map(|m| view! { <p class="text-sm">{m}</p> })}
                            </div>
                            <button
                                class="btn btn-ghost btn-xs"
                                on:click=move |_| toasts.0.update(|q| q.remove(id))
                            >
                                "✕"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
