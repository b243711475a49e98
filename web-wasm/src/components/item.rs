//! ギャラリーアイテムコンポーネント
//!
//! サムネイルを描画し、マウント時に登録・アンマウント時に削除する。

use super::gallery::use_gallery;
use leptos::html;
use leptos::prelude::*;
use photoswipe_gallery_common::types::Dimension;
use photoswipe_gallery_common::{ItemRecord, Pid, PointerPos};
use serde_json::{Map, Value};
use web_sys::{Element, MouseEvent};

#[component]
pub fn Item(
    /// フル解像度画像のURL
    #[prop(into)]
    original: String,
    #[prop(into)]
    width: Dimension,
    #[prop(into)]
    height: Dimension,
    #[prop(optional, into)]
    thumbnail: Option<String>,
    #[prop(optional, into)]
    original_srcset: Option<String>,
    #[prop(optional, into)]
    title: Option<String>,
    #[prop(optional)]
    cropped: bool,
    /// ハッシュの `pid` と照合する識別子
    #[prop(optional, into)]
    id: Option<Pid>,
    #[prop(optional, into)]
    alt: Option<String>,
    /// PhotoSwipeへそのまま渡す追加フィールド
    #[prop(optional)]
    extra: Map<String, Value>,
) -> impl IntoView {
    let context = use_gallery();
    let item = context.allocate_ref();
    let pid = id.as_ref().map(ToString::to_string);
    let src = thumbnail.clone().unwrap_or_else(|| original.clone());

    let record = ItemRecord {
        width: Some(width),
        height: Some(height),
        title,
        original: Some(original),
        original_srcset,
        thumbnail,
        cropped,
        id,
        extra,
    };

    let node_ref = NodeRef::<html::Img>::new();

    // 要素が確定したら登録。プロパティは固定値なので登録はマウント時の1回だけ
    Effect::new(move |_| {
        if let Some(img) = node_ref.get() {
            let element: Element = img.into();
            context.set(item, Some(element), record.clone());
        }
    });

    on_cleanup(move || context.remove(item));

    let on_click = move |ev: MouseEvent| {
        ev.prevent_default();
        let pointer = PointerPos {
            x: f64::from(ev.client_x()),
            y: f64::from(ev.client_y()),
        };
        context.handle_click(Some(item), pid.clone(), None, Some(pointer));
    };

    view! {
        <img class="pswp-gallery__item" node_ref=node_ref src=src alt=alt on:click=on_click />
    }
}
