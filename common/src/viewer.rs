//! ビューアのライフサイクル
//!
//! ビューアはプロセス全体で同時に1つだけ。`ViewerSlot` を全ギャラリーで共有し、
//! 使用中なら新しいオープン要求は無視する。

use crate::resolve::{ResolvedIndex, Slide};
use crate::types::{ItemRef, PointerPos, ViewerOptions};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// 外部のビューア（PhotoSwipeなど）
///
/// ハンドルは安価に複製できる前提（JSオブジェクトへの参照など）。
pub trait Viewer: Clone + 'static {
    fn init(&self);
    fn close(&self);
    /// 破棄時に一度だけ呼ばれるリスナーを登録する
    fn on_destroy(&self, listener: Box<dyn FnOnce()>);
}

/// ビューアの生成
pub trait ViewerFactory {
    type Viewer: Viewer;

    fn create(&self, config: ViewerConfig) -> Self::Viewer;
}

/// ビューアの生成パラメータ
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub data_source: Vec<Slide>,
    pub index: ResolvedIndex,
    pub initial_pointer_pos: Option<PointerPos>,
    /// 最後にマージされ、計算値を上書きする
    pub options: ViewerOptions,
}

impl ViewerConfig {
    /// `dataSource` / `index` / `initialPointerPos` の後に `options` を重ねたJSON
    pub fn to_json_with(&self, element_json: impl Fn(ItemRef) -> Value) -> Value {
        let mut object = Map::new();
        object.insert(
            "dataSource".to_string(),
            Value::Array(self.data_source.iter().map(|s| s.to_json_with(&element_json)).collect()),
        );
        object.insert("index".to_string(), self.index.to_json());
        object.insert(
            "initialPointerPos".to_string(),
            self.initial_pointer_pos
                .map_or(Value::Null, |p| serde_json::json!({ "x": p.x, "y": p.y })),
        );
        for (key, value) in &self.options.0 {
            object.insert(key.clone(), value.clone());
        }
        Value::Object(object)
    }
}

/// 共有されるビューアの格納場所
pub struct ViewerSlot<V> {
    inner: Rc<RefCell<Option<V>>>,
}

impl<V> Clone for ViewerSlot<V> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<V> Default for ViewerSlot<V> {
    fn default() -> Self {
        Self { inner: Rc::new(RefCell::new(None)) }
    }
}

impl<V: Viewer> ViewerSlot<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.inner.borrow().is_some()
    }

    pub fn current(&self) -> Option<V> {
        self.inner.borrow().clone()
    }

    /// ビューアを格納し、破棄時に格納場所が空になるよう登録する
    pub fn occupy(&self, viewer: &V) {
        *self.inner.borrow_mut() = Some(viewer.clone());

        let slot = self.clone();
        viewer.on_destroy(Box::new(move || {
            debug!("viewer destroyed");
            slot.clear();
        }));
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().take();
    }

    /// 使用中のビューアを閉じる
    ///
    /// 借用を解放してから `close` を呼ぶので、同期的な破棄通知でも安全。
    pub fn close_active(&self) -> bool {
        let Some(viewer) = self.current() else {
            return false;
        };
        debug!("closing active viewer");
        viewer.close();
        true
    }
}
