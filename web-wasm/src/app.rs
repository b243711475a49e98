//! デモアプリケーション
//!
//! `#gid=demo&pid=2` のようなURLで開くと該当アイテムから表示する。

use crate::components::{gallery::Gallery, item::Item};
use leptos::prelude::*;
use photoswipe_gallery_common::ViewerOptions;
use serde_json::json;

/// デモ用の写真（幅, 高さ, ID）
const PHOTOS: &[(u32, u32, &str)] = &[
    (1600, 1067, "harbor"),
    (1200, 1600, "tower"),
    (1920, 1080, "field"),
];

#[component]
pub fn App() -> impl IntoView {
    let options = ViewerOptions::new()
        .set("bgOpacity", json!(0.9))
        .set("showHideAnimationType", json!("zoom"));

    view! {
        <div class="container">
            <h1>"PhotoSwipe Gallery"</h1>
            <Gallery id="demo" options=options>
                {PHOTOS
                    .iter()
                    .enumerate()
                    .map(|(n, (width, height, name))| {
                        view! {
                            <Item
                                original=format!("https://picsum.photos/seed/{}/{}/{}", name, width, height)
                                thumbnail=format!("https://picsum.photos/seed/{}/{}/{}", name, width / 8, height / 8)
                                width=*width
                                height=*height
                                alt=format!("写真 {}", n + 1)
                            />
                        }
                    })
                    .collect_view()}
            </Gallery>
        </div>
    }
}
