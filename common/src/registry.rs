//! アイテムレジストリ
//!
//! マウントされたアイテムを `ItemRef` で管理する。
//! 保存は登録順、読み出しは文書順（2件以上のとき）。

use crate::ordering::{sort_by_document_order, NodeOrder};
use crate::types::{ItemRecord, ItemRef};
use indexmap::IndexMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct ItemRegistry {
    items: IndexMap<ItemRef, ItemRecord>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登録または上書き。上書き時は登録順の位置を保つ
    pub fn set(&mut self, item: ItemRef, record: ItemRecord) {
        let replaced = self.items.insert(item, record).is_some();
        debug!(%item, replaced, size = self.items.len(), "item registered");
    }

    /// 未登録のアイテムを指定しても何もしない
    pub fn remove(&mut self, item: ItemRef) -> Option<ItemRecord> {
        let removed = self.items.shift_remove(&item);
        if removed.is_some() {
            debug!(%item, size = self.items.len(), "item removed");
        }
        removed
    }

    pub fn get(&self, item: ItemRef) -> Option<&ItemRecord> {
        self.items.get(&item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 登録順で `position` 番目のアイテム
    pub fn ref_at(&self, position: usize) -> Option<ItemRef> {
        self.items.get_index(position).map(|(item, _)| *item)
    }

    /// 読み出し順のスナップショット
    ///
    /// 1件だけのときは並べ替えない（文書順の情報が不要）。
    pub fn snapshot(&self, order: &impl NodeOrder) -> Vec<(ItemRef, &ItemRecord)> {
        let mut entries: Vec<_> = self.items.iter().map(|(item, record)| (*item, record)).collect();
        if entries.len() > 1 {
            sort_by_document_order(&mut entries, order);
        }
        entries
    }
}
