//! DOM連携
//!
//! アイテム参照と実要素の対応表、文書順の比較、URLフラグメントの取得。

use photoswipe_gallery_common::{ItemRef, NodeOrder};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::rc::Rc;
use web_sys::{Element, Node};

/// `ItemRef` → 要素の対応表（ギャラリーとファクトリで共有）
#[derive(Clone, Default)]
pub struct ElementTable {
    inner: Rc<RefCell<HashMap<ItemRef, Element>>>,
}

impl ElementTable {
    pub fn insert(&self, item: ItemRef, element: Element) {
        self.inner.borrow_mut().insert(item, element);
    }

    pub fn remove(&self, item: ItemRef) {
        self.inner.borrow_mut().remove(&item);
    }

    pub fn get(&self, item: ItemRef) -> Option<Element> {
        self.inner.borrow().get(&item).cloned()
    }
}

/// 2つのノードの文書順
pub fn sort_nodes(a: &Node, b: &Node) -> Ordering {
    if a.is_same_node(Some(b)) {
        return Ordering::Equal;
    }
    let position = a.compare_document_position(b);
    if position & (Node::DOCUMENT_POSITION_FOLLOWING | Node::DOCUMENT_POSITION_CONTAINED_BY) != 0 {
        Ordering::Less
    } else if position & (Node::DOCUMENT_POSITION_PRECEDING | Node::DOCUMENT_POSITION_CONTAINS) != 0 {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// 要素表を使った文書順
#[derive(Clone)]
pub struct DomOrder {
    elements: ElementTable,
}

impl DomOrder {
    pub fn new(elements: ElementTable) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &ElementTable {
        &self.elements
    }
}

impl NodeOrder for DomOrder {
    fn compare(&self, a: ItemRef, b: ItemRef) -> Ordering {
        match (self.elements.get(a), self.elements.get(b)) {
            (Some(a), Some(b)) => sort_nodes(&a, &b),
            // 要素が未確定のものは後ろ
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// 現在のURLフラグメント（`#` を含む）。取得できなければ空文字
pub fn current_hash() -> String {
    gloo::utils::window().location().hash().unwrap_or_default()
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn append_div(parent: &Element) -> Element {
        let document = gloo::utils::document();
        let div = document.create_element("div").expect("要素作成失敗");
        parent.append_child(&div).expect("追加失敗");
        div
    }

    #[wasm_bindgen_test]
    fn wasm_sort_nodes_follows_document_order() {
        let body: Element = gloo::utils::body().into();
        let first = append_div(&body);
        let second = append_div(&body);

        assert_eq!(sort_nodes(&first, &second), Ordering::Less);
        assert_eq!(sort_nodes(&second, &first), Ordering::Greater);
        assert_eq!(sort_nodes(&first, &first), Ordering::Equal);
    }

    #[wasm_bindgen_test]
    fn wasm_dom_order_unknown_ref_sorts_last() {
        let body: Element = gloo::utils::body().into();
        let elements = ElementTable::default();
        elements.insert(ItemRef::from_raw(0), append_div(&body));

        let order = DomOrder::new(elements);
        assert_eq!(order.compare(ItemRef::from_raw(0), ItemRef::from_raw(1)), Ordering::Less);
        assert_eq!(order.compare(ItemRef::from_raw(1), ItemRef::from_raw(0)), Ordering::Greater);
        assert_eq!(order.compare(ItemRef::from_raw(1), ItemRef::from_raw(2)), Ordering::Equal);
    }

    #[wasm_bindgen_test]
    fn wasm_current_hash_reads_location() {
        gloo::utils::window()
            .location()
            .set_hash("gid=g1&pid=3")
            .expect("ハッシュ設定失敗");
        assert_eq!(current_hash(), "#gid=g1&pid=3");
    }
}
