//! PhotoSwipe Gallery (Leptos + WASM)

pub mod components;
pub mod dom;
pub mod photoswipe;

#[cfg(feature = "demo")]
mod app;

pub use components::gallery::{use_gallery, Gallery, GalleryContext};
pub use components::item::Item;
pub use photoswipe::{viewer_slot, PhotoSwipe, PhotoSwipeFactory};

#[cfg(feature = "demo")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(app::App);
}
