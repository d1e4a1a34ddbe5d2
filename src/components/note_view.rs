use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::api::documents::{get_document, get_published_document, save_document};
use crate::components::publish_menu::PublishMenu;
use crate::rendering::markdown::render_markdown;

/// Editing page for a single note: title, content, save, and the publish
/// popover.
#[component]
pub fn NotePage() -> impl IntoView {
    let params = use_params_map();
    let id_memo = Memo::new(move |_| params.get().get("id").unwrap_or_default());

    let doc_resource = Resource::new(move || id_memo.get(), get_document);

    let (title, set_title) = signal(String::new());
    let (content, set_content) = signal(String::new());
    let (save_status, set_save_status) = signal(String::new());
    let (saving, set_saving) = signal(false);

    let save_action = Action::new(move |_: &()| {
        let id = id_memo.get_untracked();
        let title = title.get_untracked();
        let content = content.get_untracked();
        async move {
            set_saving.set(true);
            set_save_status.set(String::new());
            match save_document(id, title, content).await {
                Ok(()) => set_save_status.set("Saved.".to_string()),
                Err(e) => set_save_status.set(format!("Error: {e}")),
            }
            set_saving.set(false);
        }
    });

    view! {
        <Suspense fallback=|| view! { <p>"Loading note..."</p> }>
            {move || {
                doc_resource
                    .get()
                    .map(|result| match result {
                        Ok(Some(doc)) => {
                            set_title.set(doc.title.clone());
                            set_content.set(doc.content.clone());

                            view! {
                                <div class="note-page">
                                    <div class="note-toolbar">
                                        <input
                                            type="text"
                                            class="note-title"
                                            prop:value=title
                                            on:input=move |ev| set_title.set(event_target_value(&ev))
                                        />
                                        <PublishMenu document=doc/>
                                    </div>
                                    <textarea
                                        class="note-content"
                                        prop:value=content
                                        on:input=move |ev| set_content.set(event_target_value(&ev))
                                    ></textarea>
                                    <div class="note-actions">
                                        <button
                                            class="btn btn-primary"
                                            prop:disabled=saving
                                            on:click=move |_| {
                                                save_action.dispatch(());
                                            }
                                        >
                                            {move || if saving.get() { "Saving..." } else { "Save" }}
                                        </button>
                                        <span class="save-status">{save_status}</span>
                                    </div>
                                </div>
                            }
                                .into_any()
                        }
                        Ok(None) => {
                            view! { <p class="error">"Note not found."</p> }.into_any()
                        }
                        Err(e) => {
                            view! {
                                <p class="error">"Error loading note: " {e.to_string()}</p>
                            }
                                .into_any()
                        }
                    })
            }}
        </Suspense>
    }
}

/// Public, read-only view of a published note: the target of the share URL.
#[component]
pub fn PreviewPage() -> impl IntoView {
    let params = use_params_map();
    let id_memo = Memo::new(move |_| params.get().get("id").unwrap_or_default());

    let doc_resource = Resource::new(move || id_memo.get(), get_published_document);

    view! {
        <Suspense fallback=|| view! { <p>"Loading..."</p> }>
            {move || {
                doc_resource
                    .get()
                    .map(|result| match result {
                        Ok(Some(doc)) => {
                            let html = render_markdown(&doc.content);
                            view! {
                                <article class="preview">
                                    <h1>{doc.title}</h1>
                                    <div inner_html=html></div>
                                </article>
                            }
                                .into_any()
                        }
                        Ok(None) => {
                            view! {
                                <p class="error">"This note is not available."</p>
                            }
                                .into_any()
                        }
                        Err(e) => {
                            view! { <p class="error">"Error: " {e.to_string()}</p> }.into_any()
                        }
                    })
            }}
        </Suspense>
    }
}
