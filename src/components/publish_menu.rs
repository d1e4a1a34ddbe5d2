use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::toaster::ToastStore;
use crate::error::AppError;
use crate::models::document::{Document, DocumentId};
use crate::notify::toast::{NotificationSink, Toast};
use crate::publish::controller::{DocumentMutator, PublishController, Transition};
use crate::share::link::{preview_url, Clipboard, ShareLink};

/// [`DocumentMutator`] that goes through the `set_document_published` server
/// function. This is the browser-side injection point for the controller.
pub struct ServerFnMutator;

#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
impl DocumentMutator for ServerFnMutator {
    async fn set_published(&self, id: &DocumentId, is_published: bool) -> Result<(), AppError> {
        crate::api::documents::set_document_published(id.to_string(), is_published)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))
    }
}

/// `navigator.clipboard` wrapper, only meaningful in the browser.
#[cfg(all(feature = "hydrate", target_arch = "wasm32"))]
pub struct NavigatorClipboard;

#[cfg(all(feature = "hydrate", target_arch = "wasm32"))]
#[async_trait::async_trait(?Send)]
impl Clipboard for NavigatorClipboard {
    async fn write_text(&self, text: &str) -> Result<(), AppError> {
        let window =
            web_sys::window().ok_or_else(|| AppError::Clipboard("no window".to_string()))?;
        let promise = window.navigator().clipboard().write_text(text);
        wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map_err(|_| AppError::Clipboard("clipboard write rejected".to_string()))?;
        Ok(())
    }
}

fn platform_clipboard() -> Option<Arc<dyn Clipboard>> {
    #[cfg(all(feature = "hydrate", target_arch = "wasm32"))]
    {
        Some(Arc::new(NavigatorClipboard))
    }
    #[cfg(not(all(feature = "hydrate", target_arch = "wasm32")))]
    {
        None
    }
}

/// Sleep for the acknowledgment window. Only ever awaited in the browser;
/// the server never dispatches copy actions.
async fn ack_delay() {
    #[cfg(all(feature = "hydrate", target_arch = "wasm32"))]
    gloo_timers::future::TimeoutFuture::new(crate::share::link::ACK_WINDOW.as_millis() as u32)
        .await;
}

/// The publish popover: toggles a note's public visibility and hands out the
/// shareable preview link.
///
/// The buttons driving `publish`/`unpublish` are disabled while a submission
/// is in flight; the local `is_published` view only flips on a confirmed
/// [`Transition::Applied`], never optimistically.
#[component]
pub fn PublishMenu(document: Document) -> impl IntoView {
    let toasts = expect_context::<ToastStore>();

    let id = document.id.clone();
    let (is_published, set_is_published) = signal(document.is_published);
    let (submitting, set_submitting) = signal(false);
    let (copied, set_copied) = signal(false);
    let (open, set_open) = signal(false);
    let (origin, set_origin) = signal(String::new());

    let controller = PublishController::new(Arc::new(ServerFnMutator), Arc::new(toasts));

    // The share link is built once the deployment origin is known, which only
    // happens in the browser. Until then the copy button is inert.
    let share: StoredValue<Option<ShareLink>> = StoredValue::new(None);
    Effect::new({
        let id = id.clone();
        move |_| {
            let resolved = window().location().origin().unwrap_or_default();
            if let Some(clipboard) = platform_clipboard() {
                share.set_value(Some(ShareLink::new(resolved.clone(), id.clone(), clipboard)));
            }
            set_origin.set(resolved);
        }
    });

    let url = Signal::derive({
        let id = id.clone();
        move || preview_url(&origin.get(), &id)
    });

    let on_publish = {
        let controller = controller.clone();
        let id = id.clone();
        move |_| {
            let controller = controller.clone();
            let id = id.clone();
            spawn_local(async move {
                set_submitting.try_set(true);
                if controller.publish(&id).await == Transition::Applied {
                    set_is_published.try_set(true);
                }
                set_submitting.try_set(false);
            });
        }
    };

    let on_unpublish = {
        let controller = controller.clone();
        let id = id.clone();
        move |_| {
            let controller = controller.clone();
            let id = id.clone();
            spawn_local(async move {
                set_submitting.try_set(true);
                if controller.unpublish(&id).await == Transition::Applied {
                    set_is_published.try_set(false);
                }
                set_submitting.try_set(false);
            });
        }
    };

    let on_copy = move |_| {
        let Some(share) = share.try_get_value().flatten() else {
            return;
        };
        spawn_local(async move {
            match share.copy().await {
                Ok(token) => {
                    set_copied.try_set(true);
                    ack_delay().await;
                    // A stale token means a newer copy restarted the window.
                    // try_set keeps a timer that outlives the page harmless.
                    if share.expire(token) {
                        set_copied.try_set(false);
                    }
                }
                Err(err) => {
                    tracing::warn!(%err, "clipboard write failed");
                    toasts.notify(Toast::error("Failed to copy link."));
                }
            }
        });
    };

    // Copy handles so the `Show` children closure can rebuild the inner view
    // without moving the handlers out of its environment.
    let on_publish = StoredValue::new(on_publish);
    let on_unpublish = StoredValue::new(on_unpublish);
    let on_copy = StoredValue::new(on_copy);

    view! {
        <div class="publish-menu">
            <button class="btn btn-ghost btn-sm" on:click=move |_| set_open.update(|o| *o = !*o)>
                "Publish"
                {move || is_published.get().then(|| view! { <span class="live-dot">"●"</span> })}
            </button>
            <Show when=move || open.get()>
                {move || {
                    if is_published.get() {
                        view! {
                            <div class="publish-popover">
                                <p class="live-note">"This note is live on web."</p>
                                <div class="share-row">
                                    <input class="share-url" prop:value=move || url.get() disabled/>
                                    <button class="btn btn-sm" on:click=move |ev| on_copy.with_value(|f| f(ev))>
                                        {move || if copied.get() { "✓" } else { "Copy" }}
                                    </button>
                                </div>
                                <button
                                    class="btn btn-sm btn-block"
                                    prop:disabled=submitting
                                    on:click=move |ev| on_unpublish.with_value(|f| f(ev))
                                >
                                    "Unpublish"
                                </button>
                            </div>
                        }
                            .into_any()
                    } else {
                        view! {
                            <div class="publish-popover">
                                <p>"Publish this note"</p>
                                <span class="hint">"Share your work with others."</span>
                                <button
                                    class="btn btn-sm btn-primary btn-block"
                                    prop:disabled=submitting
                                    on:click=move |ev| on_publish.with_value(|f| f(ev))
                                >
                                    "Publish"
                                </button>
                            </div>
                        }
                            .into_any()
                    }
                }}
            </Show>
        </div>
    }
}
