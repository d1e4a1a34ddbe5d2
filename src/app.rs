use leptos::prelude::*;
use leptos_meta::{provide_meta_context, Stylesheet, Title};
use leptos_router::components::*;
use leptos_router::path;

use crate::components::toaster::{ToastStore, Toaster};

/// Server-side application state, injected into server functions via context.
#[cfg(feature = "ssr")]
#[derive(Clone)]
pub struct AppState {
    pub document_repo: std::sync::Arc<dyn crate::db::repository::DocumentRepository>,
    pub leptos_options: LeptosOptions,
}

#[cfg(feature = "ssr")]
impl axum::extract::FromRef<AppState> for LeptosOptions {
    fn from_ref(state: &AppState) -> Self {
        state.leptos_options.clone()
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_context(ToastStore::new());

    view! {
        <Stylesheet id="leptos" href="/pkg/jotter.css"/>
        <Title text="Jotter"/>

        <Router>
            <nav class="top-nav">
                <a class="logo" href="/">"Jotter"</a>
            </nav>
            <main>
                <Routes fallback=|| view! { "Page not found." }.into_view()>
                    <Route path=path!("/") view=HomePage/>
                    <Route path=path!("/note/:id") view=crate::components::note_view::NotePage/>
                    <Route path=path!("/preview/:id") view=crate::components::note_view::PreviewPage/>
                </Routes>
            </main>
            <Toaster/>
        </Router>
    }
}

#[component]
fn HomePage() -> impl IntoView {
    use leptos_router::hooks::use_navigate;

    let notes = Resource::new(|| (), |_| crate::api::documents::list_documents());

    let navigate = use_navigate();
    let create_action = Action::new(move |_: &()| {
        let navigate = navigate.clone();
        async move {
            match crate::api::documents::create_document("Untitled".to_string()).await {
                Ok(doc) => navigate(&format!("/note/{}", doc.id), Default::default()),
                Err(e) => tracing::warn!(%e, "failed to create note"),
            }
        }
    });

    view! {
        <div class="home">
            <div class="home-header">
                <h1>"Your notes"</h1>
                <button class="btn btn-primary" on:click=move |_| {
                    create_action.dispatch(());
                }>
                    "New note"
                </button>
            </div>
            <Suspense fallback=|| view! { <p>"Loading notes..."</p> }>
                {move || {
                    notes
                        .get()
                        .map(|result| match result {
                            Ok(docs) if docs.is_empty() => {
                                view! { <p>"No notes yet."</p> }.into_any()
                            }
                            Ok(docs) => {
                                view! {
                                    <ul class="note-list">
                                        {docs
                                            .into_iter()
                                            .map(|doc| {
                                                view! {
                                                    <li>
                                                        <a href=format!("/note/{}", doc.id)>{doc.title}</a>
                                                        {doc
                                                            .is_published
                                                            .then(|| {
                                                                view! { <span class="live-dot">"●"</span> }
                                                            })}
                                                    </li>
                                                }
                                            })
                                            .collect_view()}
                                    </ul>
                                }
                                    .into_any()
                            }
                            Err(e) => {
                                view! { <p class="error">"Error: " {e.to_string()}</p> }
                                    .into_any()
                            }
                        })
                }}
            </Suspense>
        </div>
    }
}
