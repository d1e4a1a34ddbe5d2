pub mod app;
pub mod error;
pub mod models {
    pub mod document;
}
pub mod notify {
    pub mod toast;
}
pub mod publish {
    pub mod controller;
}
pub mod share {
    pub mod link;
}
pub mod db {
    pub mod repository;
}
pub mod rendering {
    pub mod markdown;
}
pub mod components {
    pub mod note_view;
    pub mod publish_menu;
    pub mod toaster;
}
pub mod api {
    pub mod documents;
}

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(crate::app::App);
}
