//! Transient notifications in the top-right corner.

use leptos::prelude::*;

use crate::net::types::AuthError;
use crate::util::notify::{Toast, ToastKind};

/// Toast queue, provided as context by `App`.
#[derive(Clone, Copy, Debug)]
pub struct Toasts {
    items: RwSignal<Vec<(u64, Toast)>>,
    next_id: RwSignal<u64>,
}

impl Toasts {
    #[must_use]
    pub fn new() -> Self {
        Self { items: RwSignal::new(Vec::new()), next_id: RwSignal::new(0) }
    }

    /// Show `toast`; it dismisses itself after
    /// [`crate::util::notify::TOAST_LIFETIME_MS`].
    pub fn push(self, toast: Toast) {
        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);
        self.items.update(|items| items.push((id, toast)));

        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(crate::util::notify::TOAST_LIFETIME_MS))).await;
            self.dismiss(id);
        });
    }

    pub fn success(self, text: impl Into<String>) {
        self.push(Toast::success(text));
    }

    /// Error toast for `err`, unless it has nothing to tell the user.
    pub fn error(self, err: &AuthError, custom: Option<&str>) {
        if let Some(toast) = Toast::error(err, custom) {
            self.push(toast);
        }
    }

    pub fn dismiss(self, id: u64) {
        self.items.update(|items| items.retain(|(item, _)| *item != id));
    }
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new()
    }
}

#[component]
pub fn ToastStack() -> impl IntoView {
    let toasts = expect_context::<Toasts>();
    view! {
        <div class="toast-stack">
            <For
                each=move || toasts.items.get()
                key=|(id, _)| *id
                children=move |(id, toast)| {
                    let class = match toast.kind {
                        ToastKind::Success => "toast toast--success",
                        ToastKind::Error => "toast toast--error",
                    };
                    view! {
                        <div class=class role="status" on:click=move |_| toasts.dismiss(id)>
                            {toast.text}
                        </div>
                    }
                }
            />
        </div>
    }
}
