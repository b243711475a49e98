//! PhotoSwipe バインディング
//!
//! `ViewerConfig` からJSのオプションオブジェクトを組み立て、
//! `js/photoswipe-bridge.js` 経由でインスタンスを生成する。

use crate::dom::ElementTable;
use js_sys::{Array, Object, Reflect};
use photoswipe_gallery_common::{Slide, SlideField, Viewer, ViewerConfig, ViewerFactory, ViewerSlot};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/js/photoswipe-bridge.js")]
extern "C" {
    /// PhotoSwipeインスタンス
    #[derive(Debug, Clone)]
    pub type PhotoSwipe;

    #[wasm_bindgen(js_name = "createPhotoSwipe")]
    fn create_photoswipe_js(options: &JsValue) -> PhotoSwipe;

    #[wasm_bindgen(method, js_name = "init")]
    fn init_js(this: &PhotoSwipe);

    #[wasm_bindgen(method, js_name = "close")]
    fn close_js(this: &PhotoSwipe);

    #[wasm_bindgen(method, js_name = "on")]
    fn on_js(this: &PhotoSwipe, event: &str, handler: &JsValue);
}

impl Viewer for PhotoSwipe {
    fn init(&self) {
        self.init_js();
    }

    fn close(&self) {
        self.close_js();
    }

    fn on_destroy(&self, listener: Box<dyn FnOnce()>) {
        let handler = Closure::once_into_js(move || listener());
        self.on_js("destroy", &handler);
    }
}

thread_local! {
    // ブラウザのメインスレッドで全ギャラリーが共有する
    static VIEWER_SLOT: ViewerSlot<PhotoSwipe> = ViewerSlot::new();
}

/// プロセス全体で共有されるビューアの格納場所
pub fn viewer_slot() -> ViewerSlot<PhotoSwipe> {
    VIEWER_SLOT.with(Clone::clone)
}

/// PhotoSwipeの生成
#[derive(Clone)]
pub struct PhotoSwipeFactory {
    elements: ElementTable,
}

impl PhotoSwipeFactory {
    pub fn new(elements: ElementTable) -> Self {
        Self { elements }
    }

    /// `dataSource` / `index` / `initialPointerPos` の後にユーザー設定を重ねる
    fn options_object(&self, config: &ViewerConfig) -> Object {
        let options = Object::new();

        let data_source = Array::new();
        for slide in &config.data_source {
            data_source.push(&self.slide_object(slide));
        }
        set(&options, "dataSource", &data_source);
        set(&options, "index", &JsValue::from_f64(config.index.as_f64()));

        let pointer = match config.initial_pointer_pos {
            Some(pos) => {
                let point = Object::new();
                set(&point, "x", &JsValue::from_f64(pos.x));
                set(&point, "y", &JsValue::from_f64(pos.y));
                point.into()
            }
            None => JsValue::NULL,
        };
        set(&options, "initialPointerPos", &pointer);

        for (key, value) in &config.options.0 {
            set(&options, key, &to_js(value));
        }
        options
    }

    fn slide_object(&self, slide: &Slide) -> Object {
        let object = Object::new();
        for (key, field) in slide.fields() {
            let value = match field {
                SlideField::Value(value) => to_js(&value),
                SlideField::Element(item) => self
                    .elements
                    .get(item)
                    .map_or(JsValue::NULL, JsValue::from),
            };
            set(&object, &key, &value);
        }
        object
    }
}

impl ViewerFactory for PhotoSwipeFactory {
    type Viewer = PhotoSwipe;

    fn create(&self, config: ViewerConfig) -> PhotoSwipe {
        create_photoswipe_js(&self.options_object(&config))
    }
}

fn set(target: &Object, key: &str, value: &JsValue) {
    // 通常のオブジェクトへの代入は失敗しない
    let _ = Reflect::set(target, &JsValue::from_str(key), value);
}

/// JSONの値をそのままJSの値へ（オブジェクトはMapではなく通常のオブジェクト）
fn to_js(value: &Value) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use photoswipe_gallery_common::{ItemRecord, ItemRef, ResolvedIndex, ViewerOptions};
    use serde_json::json;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn get(target: &JsValue, key: &str) -> JsValue {
        Reflect::get(target, &JsValue::from_str(key)).expect("プロパティ取得失敗")
    }

    #[wasm_bindgen_test]
    fn wasm_options_object_layout() {
        let elements = ElementTable::default();
        let element = gloo::utils::document().create_element("img").expect("要素作成失敗");
        elements.insert(ItemRef::from_raw(0), element.clone());

        let record = ItemRecord::new("a.jpg", 800, 600).with_extra("alt", json!("説明"));
        let config = ViewerConfig {
            data_source: vec![Slide::from_record(ItemRef::from_raw(0), &record)],
            index: ResolvedIndex::Unresolved,
            initial_pointer_pos: None,
            options: ViewerOptions::new().set("bgOpacity", json!(0.5)),
        };

        let options: JsValue = PhotoSwipeFactory::new(elements).options_object(&config).into();
        assert!(get(&options, "index").as_f64().expect("数値ではない").is_nan());
        assert!(get(&options, "initialPointerPos").is_null());
        assert_eq!(get(&options, "bgOpacity").as_f64(), Some(0.5));

        let slide = Array::from(&get(&options, "dataSource")).get(0);
        assert_eq!(get(&slide, "src").as_string().as_deref(), Some("a.jpg"));
        assert_eq!(get(&slide, "alt").as_string().as_deref(), Some("説明"));
        assert_eq!(get(&slide, "w").as_f64(), Some(800.0));
        assert!(get(&slide, "element") == JsValue::from(element));
    }
}
