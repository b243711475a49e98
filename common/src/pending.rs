//! 保留中のオープン要求
//!
//! ハッシュで指定された `pid` がアイテム登録より先に届いた場合に保持し、
//! 登録のたびに解決を試みる。保持できる要求は1つだけ。

use crate::numeric::parse_int;
use crate::registry::ItemRegistry;
use crate::types::{ItemRecord, ItemRef};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct PendingOpen {
    pid: Option<String>,
}

impl PendingOpen {
    pub fn new() -> Self {
        Self::default()
    }

    /// 要求を保持する。未解決の前回要求は上書きされる
    pub fn request(&mut self, pid: impl Into<String>) {
        let pid = pid.into();
        if let Some(previous) = self.pid.as_deref() {
            debug!(previous, pid = %pid, "pending open overwritten");
        } else {
            debug!(pid = %pid, "pending open stored");
        }
        self.pid = Some(pid);
    }

    pub fn peek(&self) -> Option<&str> {
        self.pid.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pid.is_some()
    }

    pub fn take(&mut self) -> Option<String> {
        self.pid.take()
    }

    /// `item` が登録された直後に呼ぶ。開くべきアイテムが決まれば返し、要求を消す
    ///
    /// - 登録されたアイテムの `id` が要求と一致すればそのアイテム
    /// - `id` を持たないアイテムなら、要求を1始まりの登録順位置として解釈する
    /// - どちらでもなければ保留を続ける
    pub fn on_set(
        &mut self,
        item: ItemRef,
        record: &ItemRecord,
        registry: &ItemRegistry,
    ) -> Option<ItemRef> {
        let pid = self.pid.as_deref()?;

        let target = match &record.id {
            Some(id) if id.matches(pid) => Some(item),
            Some(_) => None,
            None => parse_int(pid)
                .and_then(|n| usize::try_from(n - 1).ok())
                .and_then(|position| registry.ref_at(position)),
        };

        if let Some(target) = target {
            debug!(pid, %target, "pending open resolved");
            self.pid = None;
        }
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(registry: &mut ItemRegistry, raw: u64, record: ItemRecord) -> (ItemRef, ItemRecord) {
        let item = ItemRef::from_raw(raw);
        registry.set(item, record.clone());
        (item, record)
    }

    #[test]
    fn test_no_pending_is_noop() {
        let mut pending = PendingOpen::new();
        let mut registry = ItemRegistry::new();
        let (item, record) = register(&mut registry, 0, ItemRecord::default());

        assert_eq!(pending.on_set(item, &record, &registry), None);
    }

    #[test]
    fn test_resolves_on_matching_id() {
        let mut pending = PendingOpen::new();
        pending.request("b");
        let mut registry = ItemRegistry::new();

        for (raw, id) in [(0, "a"), (1, "b"), (2, "c")] {
            let (item, record) = register(&mut registry, raw, ItemRecord::default().with_id(id));
            let resolved = pending.on_set(item, &record, &registry);
            if id == "b" {
                assert_eq!(resolved, Some(item));
                assert!(!pending.is_pending());
            } else {
                assert_eq!(resolved, None);
            }
        }
    }

    #[test]
    fn test_numeric_id_matches_string_request() {
        let mut pending = PendingOpen::new();
        pending.request("3");
        let mut registry = ItemRegistry::new();

        let (item, record) = register(&mut registry, 0, ItemRecord::default().with_id(3i64));
        assert_eq!(pending.on_set(item, &record, &registry), Some(item));
    }

    #[test]
    fn test_positional_fallback_waits_for_enough_items() {
        let mut pending = PendingOpen::new();
        pending.request("2");
        let mut registry = ItemRegistry::new();

        let (first, record) = register(&mut registry, 10, ItemRecord::default());
        assert_eq!(pending.on_set(first, &record, &registry), None);
        assert_eq!(pending.peek(), Some("2"));

        let (second, record) = register(&mut registry, 11, ItemRecord::default());
        assert_eq!(pending.on_set(second, &record, &registry), Some(second));
        assert!(!pending.is_pending());
    }

    #[test]
    fn test_non_matching_id_keeps_pending() {
        let mut pending = PendingOpen::new();
        pending.request("1");
        let mut registry = ItemRegistry::new();

        // id を持つアイテムでは位置指定として解釈しない
        let (item, record) = register(&mut registry, 0, ItemRecord::default().with_id("x"));
        assert_eq!(pending.on_set(item, &record, &registry), None);
        assert_eq!(pending.peek(), Some("1"));
    }

    #[test]
    fn test_non_numeric_request_never_resolves_positionally() {
        let mut pending = PendingOpen::new();
        pending.request("zzz");
        let mut registry = ItemRegistry::new();

        let (item, record) = register(&mut registry, 0, ItemRecord::default());
        assert_eq!(pending.on_set(item, &record, &registry), None);
        assert!(pending.is_pending());
    }

    #[test]
    fn test_request_overwrites_previous() {
        let mut pending = PendingOpen::new();
        pending.request("a");
        pending.request("b");
        assert_eq!(pending.take().as_deref(), Some("b"));
        assert!(!pending.is_pending());
    }
}
