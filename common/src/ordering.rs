//! 文書順の比較
//!
//! 登録順はマウント順に左右されるため、ビューアでの左右移動が
//! 画面上の並びと一致するよう、読み出し時に文書順で並べ直す。

use crate::types::ItemRef;
use std::cmp::Ordering;
use std::collections::HashMap;

/// 2つのアイテムの文書上の前後関係
pub trait NodeOrder {
    fn compare(&self, a: ItemRef, b: ItemRef) -> Ordering;
}

impl<T: NodeOrder + ?Sized> NodeOrder for &T {
    fn compare(&self, a: ItemRef, b: ItemRef) -> Ordering {
        (**self).compare(a, b)
    }
}

impl<T: NodeOrder + ?Sized> NodeOrder for std::rc::Rc<T> {
    fn compare(&self, a: ItemRef, b: ItemRef) -> Ordering {
        (**self).compare(a, b)
    }
}

/// エントリを文書順に並べ替える（安定ソート）
pub fn sort_by_document_order<T>(entries: &mut [(ItemRef, T)], order: &impl NodeOrder) {
    entries.sort_by(|(a, _), (b, _)| order.compare(*a, *b));
}

/// メモリ上の位置表で文書順を表す実装
///
/// 位置が不明なアイテム（DOMから外れた要素に相当）は既知のものより後ろに置く。
#[derive(Debug, Clone, Default)]
pub struct SequenceOrder {
    positions: HashMap<ItemRef, usize>,
}

impl SequenceOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place(&mut self, item: ItemRef, position: usize) {
        self.positions.insert(item, position);
    }

    pub fn forget(&mut self, item: ItemRef) {
        self.positions.remove(&item);
    }

    pub fn position(&self, item: ItemRef) -> Option<usize> {
        self.positions.get(&item).copied()
    }
}

impl NodeOrder for SequenceOrder {
    fn compare(&self, a: ItemRef, b: ItemRef) -> Ordering {
        match (self.position(a), self.position(b)) {
            (Some(pa), Some(pb)) => pa.cmp(&pb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}
