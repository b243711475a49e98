//! ギャラリーコンポーネント
//!
//! 子孫の `Item` に登録・削除・オープンの窓口（`GalleryContext`）を提供する。

use crate::dom::{current_hash, DomOrder, ElementTable};
use crate::photoswipe::{viewer_slot, PhotoSwipe, PhotoSwipeFactory};
use leptos::prelude::*;
use photoswipe_gallery_common::gallery::OnOpen;
use photoswipe_gallery_common::{
    Gallery as GalleryCore, GalleryProps as CoreProps, ItemRecord, ItemRef, Pid, PointerPos, ViewerOptions,
};
use web_sys::Element;

pub type BrowserGallery = GalleryCore<PhotoSwipeFactory, DomOrder>;

/// 子孫アイテム向けの窓口
#[derive(Clone, Copy)]
pub struct GalleryContext {
    gallery: StoredValue<BrowserGallery, LocalStorage>,
}

impl GalleryContext {
    pub fn allocate_ref(&self) -> ItemRef {
        self.gallery
            .try_update_value(|g| g.allocate_ref())
            .expect("Gallery は破棄済み")
    }

    /// アイテムの登録・更新。保留中のオープン要求があればここで開く
    pub fn set(&self, item: ItemRef, element: Option<Element>, record: ItemRecord) {
        self.gallery.update_value(|g| {
            match element {
                Some(element) => g.order().elements().insert(item, element),
                None => g.order().elements().remove(item),
            }
            g.set(item, record);
        });
    }

    pub fn remove(&self, item: ItemRef) {
        self.gallery.update_value(|g| {
            g.remove(item);
            g.order().elements().remove(item);
        });
    }

    pub fn handle_click(
        &self,
        item: Option<ItemRef>,
        pid: Option<String>,
        index: Option<i64>,
        pointer: Option<PointerPos>,
    ) {
        self.gallery.with_value(|g| {
            g.handle_click(item, pid, index, pointer);
        });
    }

    pub fn open(&self, index: i64) {
        self.gallery.with_value(|g| {
            g.open_at(index);
        });
    }
}

/// 祖先の `Gallery` が提供する窓口を取得
pub fn use_gallery() -> GalleryContext {
    expect_context::<GalleryContext>()
}

/// ギャラリー
///
/// `on_open` は `init()` 後に呼ばれる。コールバック内からこのギャラリーの
/// 窓口を同期的に呼ばないこと（登録処理の途中で呼ばれることがある）。
#[component]
pub fn Gallery(
    children: Children,
    /// PhotoSwipeのオプション（計算値を上書きする）
    #[prop(optional)]
    options: ViewerOptions,
    /// ハッシュ連携用のギャラリーID
    #[prop(optional, into)]
    id: Option<Pid>,
    #[prop(optional)]
    on_open: Option<OnOpen<PhotoSwipe>>,
) -> impl IntoView {
    let elements = ElementTable::default();
    let core = BrowserGallery::new(
        CoreProps { options, id, on_open },
        PhotoSwipeFactory::new(elements.clone()),
        DomOrder::new(elements),
        viewer_slot(),
    );
    let gallery = StoredValue::new_local(core);
    provide_context(GalleryContext { gallery });

    let view = children();

    // マウント時に一度だけ。エフェクトは作成順に走るので、
    // 子アイテムの登録エフェクトより後に作って登録済みの状態で読む
    Effect::new(move |_| {
        let hash = current_hash();
        gallery.update_value(|g| g.bootstrap_from_hash(&hash));
    });

    on_cleanup(move || {
        gallery.update_value(|g| g.teardown());
    });

    view
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use crate::components::item::Item;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    /// setTimeout(0) 1回分待つ（スケジュール済みのエフェクトを流す）
    async fn next_tick() {
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let _ = gloo::utils::window().set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, 0);
        });
        let _ = JsFuture::from(promise).await;
    }

    #[wasm_bindgen_test]
    async fn wasm_hash_for_other_gallery_does_not_open() {
        gloo::utils::window()
            .location()
            .set_hash("gid=other&pid=1")
            .expect("ハッシュ設定失敗");
        let parent: web_sys::HtmlElement = gloo::utils::document()
            .create_element("div")
            .expect("要素作成失敗")
            .unchecked_into();
        gloo::utils::body().append_child(&parent).expect("追加失敗");

        let handle = leptos::mount::mount_to(parent, || {
            view! {
                <Gallery id="g1">
                    <Item original="a.jpg" width=800u32 height=600u32 />
                    <Item original="b.jpg" width=800u32 height=600u32 />
                </Gallery>
            }
        });
        next_tick().await;
        next_tick().await;

        assert!(!viewer_slot().is_active());
        drop(handle);
    }
}
