use leptos::prelude::*;

use crate::notify::toast::{NotificationSink, Toast, ToastLevel};

/// Signal-backed toast store, provided through context by [`crate::app::App`].
///
/// Implements [`NotificationSink`] so the publish controller can emit into it
/// without knowing about Leptos.
#[derive(Clone, Copy)]
pub struct ToastStore {
    toasts: RwSignal<Vec<Toast>>,
}

impl ToastStore {
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
        }
    }

    pub fn dismiss(&self, index: usize) {
        self.toasts.try_update(|list| {
            if index < list.len() {
                list.remove(index);
            }
        });
    }
}

impl Default for ToastStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for ToastStore {
    fn notify(&self, toast: Toast) {
        // try_update so a toast landing after teardown is dropped silently.
        self.toasts.try_update(|list| {
            // An outcome replaces the loading toast of its operation, the way
            // promise-bound toasts behave.
            if toast.level != ToastLevel::Loading {
                if let Some(pos) = list.iter().rposition(|t| t.level == ToastLevel::Loading) {
                    list.remove(pos);
                }
            }
            list.push(toast);
        });
    }
}

/// Renders the toast stack in a fixed corner.
#[component]
pub fn Toaster() -> impl IntoView {
    let store = expect_context::<ToastStore>();

    view! {
        <div class="toaster">
            {move || {
                store
                    .toasts
                    .get()
                    .into_iter()
                    .enumerate()
                    .map(|(index, toast)| {
                        let class = match toast.level {
                            ToastLevel::Loading => "toast toast-loading",
                            ToastLevel::Success => "toast toast-success",
                            ToastLevel::Error => "toast toast-error",
                        };
                        view! {
                            <div class=class>
                                <span>{toast.message}</span>
                                <button
                                    class="toast-dismiss"
                                    on:click=move |_| store.dismiss(index)
                                >
                                    "×"
                                </button>
                            </div>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_replaces_the_pending_loading_toast() {
        let owner = Owner::new();
        owner.set();

        let store = ToastStore::new();
        store.notify(Toast::loading("Publishing..."));
        store.notify(Toast::success("Note published!"));

        let toasts = store.toasts.get_untracked();
        assert_eq!(toasts, vec![Toast::success("Note published!")]);
    }

    #[test]
    fn unrelated_toasts_are_kept() {
        let owner = Owner::new();
        owner.set();

        let store = ToastStore::new();
        store.notify(Toast::error("Failed to copy link."));
        store.notify(Toast::loading("Unpublishing..."));
        store.notify(Toast::error("Failed to unpublish note."));

        let toasts = store.toasts.get_untracked();
        assert_eq!(
            toasts,
            vec![
                Toast::error("Failed to copy link."),
                Toast::error("Failed to unpublish note."),
            ]
        );
    }
}
