//! ギャラリー
//!
//! アイテムの登録・削除、保留中オープン要求の解決、ハッシュからの起動、
//! ビューアのオープンとギャラリー破棄時の後始末をまとめる。
//! すべての操作は単一スレッド上で同期的に実行される前提。

use crate::hash::parse_hash;
use crate::ordering::NodeOrder;
use crate::pending::PendingOpen;
use crate::registry::ItemRegistry;
use crate::resolve::{resolve, OpenTarget, Resolution};
use crate::types::{ItemRecord, ItemRef, Pid, PointerPos, RefAllocator, ViewerOptions};
use crate::viewer::{Viewer, ViewerConfig, ViewerFactory, ViewerSlot};
use std::rc::Rc;
use tracing::{debug, trace};

/// オープン後に呼ばれるコールバック
pub type OnOpen<V> = Rc<dyn Fn(&V)>;

/// ギャラリーの設定
pub struct GalleryProps<V> {
    /// ビューア設定（計算値を上書きする）
    pub options: ViewerOptions,
    /// ハッシュ連携用のギャラリーID。`None` ならハッシュを見ない
    pub id: Option<Pid>,
    /// `init()` 後に生きているビューアを渡す
    pub on_open: Option<OnOpen<V>>,
}

impl<V> Default for GalleryProps<V> {
    fn default() -> Self {
        Self { options: ViewerOptions::default(), id: None, on_open: None }
    }
}

impl<V> Clone for GalleryProps<V> {
    fn clone(&self) -> Self {
        Self {
            options: self.options.clone(),
            id: self.id.clone(),
            on_open: self.on_open.clone(),
        }
    }
}

impl<V> GalleryProps<V> {
    pub fn with_id(mut self, id: impl Into<Pid>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_options(mut self, options: ViewerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_on_open(mut self, on_open: impl Fn(&V) + 'static) -> Self {
        self.on_open = Some(Rc::new(on_open));
        self
    }
}

pub struct Gallery<F: ViewerFactory, O: NodeOrder> {
    props: GalleryProps<F::Viewer>,
    factory: F,
    order: O,
    slot: ViewerSlot<F::Viewer>,
    items: ItemRegistry,
    pending: PendingOpen,
    refs: RefAllocator,
    torn_down: bool,
}

impl<F: ViewerFactory, O: NodeOrder> Gallery<F, O> {
    pub fn new(props: GalleryProps<F::Viewer>, factory: F, order: O, slot: ViewerSlot<F::Viewer>) -> Self {
        Self {
            props,
            factory,
            order,
            slot,
            items: ItemRegistry::new(),
            pending: PendingOpen::new(),
            refs: RefAllocator::new(),
            torn_down: false,
        }
    }

    /// マウントされるアイテム用の参照を払い出す
    pub fn allocate_ref(&mut self) -> ItemRef {
        self.refs.allocate()
    }

    pub fn order(&self) -> &O {
        &self.order
    }

    pub fn order_mut(&mut self) -> &mut O {
        &mut self.order
    }

    pub fn slot(&self) -> &ViewerSlot<F::Viewer> {
        &self.slot
    }

    pub fn pending_pid(&self) -> Option<&str> {
        self.pending.peek()
    }

    /// アイテムを登録し、保留中の要求があれば解決を試みる
    pub fn set(&mut self, item: ItemRef, record: ItemRecord) {
        self.items.set(item, record);

        let resolved = match self.items.get(item) {
            Some(record) => self.pending.on_set(item, record, &self.items),
            None => None,
        };
        if let Some(target) = resolved {
            self.open(OpenTarget::by_ref(target), None);
        }
    }

    pub fn remove(&mut self, item: ItemRef) {
        self.items.remove(item);
    }

    /// アイテムのクリックなどからのオープン
    pub fn handle_click(
        &self,
        item: Option<ItemRef>,
        pid: Option<String>,
        index: Option<i64>,
        pointer: Option<PointerPos>,
    ) -> bool {
        self.open(OpenTarget { item, pid, index }, pointer)
    }

    /// 明示インデックスでのオープン
    pub fn open_at(&self, index: i64) -> bool {
        self.open(OpenTarget::at_index(index), None)
    }

    /// ビューアを開く。すでに開いていれば何もせず `false`
    pub fn open(&self, target: OpenTarget, pointer: Option<PointerPos>) -> bool {
        if self.slot.is_active() {
            trace!(?target, "viewer already active, open ignored");
            return false;
        }

        let Resolution { index, slides } = resolve(&self.items, &self.order, &target);
        debug!(?index, slides = slides.len(), "opening viewer");

        let viewer = self.factory.create(ViewerConfig {
            data_source: slides,
            index,
            initial_pointer_pos: pointer,
            options: self.props.options.clone(),
        });
        self.slot.occupy(&viewer);
        viewer.init();

        if let Some(on_open) = &self.props.on_open {
            on_open(&viewer);
        }
        true
    }

    /// マウント時に一度だけ呼ぶ。フラグメントがこのギャラリーを指していれば開く
    ///
    /// アイテムがまだ1つもなければ `pid` を保留し、以後の登録で解決する。
    pub fn bootstrap_from_hash(&mut self, fragment: &str) {
        let Some(gallery_id) = &self.props.id else {
            return;
        };
        let Some(params) = parse_hash(fragment) else {
            return;
        };

        if self.items.is_empty() {
            match params.pid() {
                Some(pid) => self.pending.request(pid),
                None => {
                    self.pending.take();
                }
            }
            return;
        }

        if let (Some(pid), Some(gid)) = (params.pid(), params.gid()) {
            if gallery_id.matches(gid) {
                self.open(OpenTarget::by_pid(pid), None);
            }
        }
    }

    /// ギャラリー破棄時の後始末。開いているビューアを閉じる（2回目以降は何もしない）
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        if self.slot.close_active() {
            debug!("viewer closed on gallery teardown");
        }
    }
}

impl<F: ViewerFactory, O: NodeOrder> Drop for Gallery<F, O> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::SequenceOrder;
    use crate::resolve::ResolvedIndex;
    use crate::viewer::testing::{FakeFactory, FakeViewer};
    use serde_json::json;
    use std::cell::Cell;

    type TestGallery = Gallery<FakeFactory, SequenceOrder>;

    fn gallery(props: GalleryProps<FakeViewer>) -> (TestGallery, FakeFactory) {
        let factory = FakeFactory::default();
        let gallery = Gallery::new(props, factory.clone(), SequenceOrder::new(), ViewerSlot::new());
        (gallery, factory)
    }

    /// 文書順 0..n のアイテム参照を用意する（登録はしない）
    fn place_items(gallery: &mut TestGallery, n: usize) -> Vec<ItemRef> {
        (0..n)
            .map(|position| {
                let item = gallery.allocate_ref();
                gallery.order_mut().place(item, position);
                item
            })
            .collect()
    }

    fn record(n: usize) -> ItemRecord {
        ItemRecord::new(format!("{}.jpg", n), 1600, 900)
    }

    fn last_index(factory: &FakeFactory) -> ResolvedIndex {
        factory.log.borrow().created.last().expect("ビューアが生成されていない").index
    }

    #[test]
    fn test_open_twice_creates_one_viewer() {
        let (mut gallery, factory) = gallery(GalleryProps::default());
        let items = place_items(&mut gallery, 2);
        gallery.set(items[0], record(0));
        gallery.set(items[1], record(1));

        assert!(gallery.open_at(1));
        assert!(!gallery.open_at(0));

        let log = factory.log.borrow();
        assert_eq!(log.created.len(), 1);
        assert_eq!(log.inits, 1);
        assert_eq!(log.created[0].index, ResolvedIndex::At(1));
    }

    #[test]
    fn test_reopen_after_destroy() {
        let (mut gallery, factory) = gallery(GalleryProps::default());
        let items = place_items(&mut gallery, 1);
        gallery.set(items[0], record(0));

        assert!(gallery.open_at(0));
        gallery.slot().close_active();
        assert!(gallery.open_at(0));
        assert_eq!(factory.log.borrow().created.len(), 2);
    }

    #[test]
    fn test_click_passes_pointer_and_options() {
        let options = ViewerOptions::new().set("bgOpacity", json!(0.5));
        let (mut gallery, factory) = gallery(GalleryProps::default().with_options(options.clone()));
        let items = place_items(&mut gallery, 3);
        for (n, item) in items.iter().enumerate().rev() {
            gallery.set(*item, record(n));
        }

        let pointer = PointerPos { x: 120.0, y: 48.0 };
        gallery.handle_click(Some(items[1]), None, None, Some(pointer));

        let log = factory.log.borrow();
        let config = &log.created[0];
        assert_eq!(config.index, ResolvedIndex::At(1));
        assert_eq!(config.initial_pointer_pos, Some(pointer));
        assert_eq!(config.options, options);
        let srcs: Vec<_> = config.data_source.iter().map(|s| s.src.clone().unwrap_or_default()).collect();
        assert_eq!(srcs, vec!["0.jpg", "1.jpg", "2.jpg"]);
    }

    #[test]
    fn test_on_open_receives_initialized_viewer() {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let props = GalleryProps::default().with_on_open(move |_viewer: &FakeViewer| seen.set(seen.get() + 1));
        let (mut gallery, factory) = gallery(props);
        let items = place_items(&mut gallery, 1);
        gallery.set(items[0], record(0));

        gallery.open_at(0);
        assert_eq!(calls.get(), 1);
        assert_eq!(factory.log.borrow().inits, 1);
    }

    #[test]
    fn test_deferred_open_by_id() {
        let (mut gallery, factory) = gallery(GalleryProps::default().with_id("g"));
        let items = place_items(&mut gallery, 3);
        gallery.bootstrap_from_hash("#gid=g&pid=b");
        assert_eq!(gallery.pending_pid(), Some("b"));

        gallery.set(items[0], record(0).with_id("a"));
        assert!(factory.log.borrow().created.is_empty());

        gallery.set(items[1], record(1).with_id("b"));
        assert_eq!(gallery.pending_pid(), None);
        assert_eq!(last_index(&factory), ResolvedIndex::At(1));

        gallery.set(items[2], record(2).with_id("c"));
        assert_eq!(factory.log.borrow().created.len(), 1);
    }

    #[test]
    fn test_deferred_positional_fallback() {
        let (mut gallery, factory) = gallery(GalleryProps::default().with_id("g"));
        let items = place_items(&mut gallery, 3);
        gallery.bootstrap_from_hash("#gid=g&pid=2");

        gallery.set(items[0], record(0));
        assert!(factory.log.borrow().created.is_empty());
        gallery.set(items[1], record(1));

        assert_eq!(gallery.pending_pid(), None);
        assert_eq!(last_index(&factory), ResolvedIndex::At(1));
    }

    #[test]
    fn test_positional_fallback_counts_registration_order() {
        let (mut gallery, factory) = gallery(GalleryProps::default().with_id("g"));
        let items = place_items(&mut gallery, 3);
        gallery.bootstrap_from_hash("#gid=g&pid=2");

        // 登録順2番目は items[0]。文書順では先頭なので index 0 で開く
        gallery.set(items[2], record(2));
        gallery.set(items[0], record(0));

        let log = factory.log.borrow();
        assert_eq!(log.created.len(), 1);
        assert_eq!(log.created[0].index, ResolvedIndex::At(0));
        assert_eq!(log.created[0].data_source[0].item, items[0]);
    }

    #[test]
    fn test_hash_bootstrap_with_registered_items() {
        let (mut gallery, factory) = gallery(GalleryProps::default().with_id("g1"));
        let items = place_items(&mut gallery, 3);
        for (n, item) in items.iter().enumerate() {
            gallery.set(*item, record(n));
        }

        gallery.bootstrap_from_hash("#gid=g1&pid=3");
        assert_eq!(last_index(&factory), ResolvedIndex::At(2));
    }

    #[test]
    fn test_hash_for_other_gallery_is_ignored() {
        let (mut gallery, factory) = gallery(GalleryProps::default().with_id(1i64));
        let items = place_items(&mut gallery, 2);
        gallery.set(items[0], record(0));
        gallery.set(items[1], record(1));

        gallery.bootstrap_from_hash("#gid=2&pid=1");
        gallery.bootstrap_from_hash("#pid=1&x=1");
        assert!(factory.log.borrow().created.is_empty());

        gallery.bootstrap_from_hash("#gid=1&pid=1");
        assert_eq!(last_index(&factory), ResolvedIndex::At(0));
    }

    #[test]
    fn test_hash_ignored_without_gallery_id() {
        let (mut gallery, _factory) = gallery(GalleryProps::default());
        gallery.bootstrap_from_hash("#gid=g1&pid=3");
        assert_eq!(gallery.pending_pid(), None);
    }

    #[test]
    fn test_short_hash_is_ignored() {
        let (mut gallery, _factory) = gallery(GalleryProps::default().with_id("g"));
        gallery.bootstrap_from_hash("#pid");
        assert_eq!(gallery.pending_pid(), None);
    }

    #[test]
    fn test_unresolvable_pid_passes_through() {
        let (mut gallery, factory) = gallery(GalleryProps::default().with_id("g"));
        let items = place_items(&mut gallery, 2);
        gallery.set(items[0], record(0));
        gallery.set(items[1], record(1));

        gallery.bootstrap_from_hash("#gid=g&pid=nope");
        assert_eq!(last_index(&factory), ResolvedIndex::Unresolved);
    }

    #[test]
    fn test_teardown_closes_viewer() {
        let (mut gallery, factory) = gallery(GalleryProps::default());
        let items = place_items(&mut gallery, 1);
        gallery.set(items[0], record(0));
        gallery.open_at(0);

        let slot = gallery.slot().clone();
        assert!(slot.is_active());

        gallery.teardown();
        gallery.teardown();
        assert!(!slot.is_active());
        assert_eq!(factory.log.borrow().closes, 1);
    }

    #[test]
    fn test_drop_closes_viewer_opened_by_other_gallery() {
        let slot = ViewerSlot::new();
        let factory = FakeFactory::default();
        let mut opener = Gallery::new(GalleryProps::default(), factory.clone(), SequenceOrder::new(), slot.clone());
        let other = Gallery::new(GalleryProps::default(), factory.clone(), SequenceOrder::new(), slot.clone());

        let item = opener.allocate_ref();
        opener.set(item, record(0));
        opener.open_at(0);
        assert!(!other.open_at(0));

        drop(other);
        assert!(!slot.is_active());
        assert_eq!(factory.log.borrow().closes, 1);

        drop(opener);
        assert_eq!(factory.log.borrow().closes, 1);
    }

    #[test]
    fn test_remove_then_open() {
        let (mut gallery, factory) = gallery(GalleryProps::default());
        let items = place_items(&mut gallery, 3);
        for (n, item) in items.iter().enumerate() {
            gallery.set(*item, record(n));
        }
        gallery.remove(items[0]);
        gallery.remove(items[0]);

        gallery.handle_click(Some(items[2]), None, None, None);
        let log = factory.log.borrow();
        assert_eq!(log.created[0].data_source.len(), 2);
        assert_eq!(log.created[0].index, ResolvedIndex::At(1));
    }
}
