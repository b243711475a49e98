//! ヘッドレス検証
//!
//! マニフェストのギャラリーを記録用ビューアで再現し、
//! PhotoSwipeに渡されるはずの生成パラメータを確認する。

use crate::error::{GalleryError, Result};
use photoswipe_gallery_common::{
    Gallery, GalleryManifest, GalleryProps, ItemRef, PointerPos, SequenceOrder, Viewer,
    ViewerConfig, ViewerFactory, ViewerOptions, ViewerSlot,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use tracing::info;

/// ハッシュ起動のタイミング
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HashTiming {
    /// アイテム登録前（遅延読み込みなど）。pid は保留される
    Before,
    /// アイテム登録後（通常のマウント順）
    #[default]
    After,
}

impl std::str::FromStr for HashTiming {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "before" | "b" => Ok(HashTiming::Before),
            "after" | "a" => Ok(HashTiming::After),
            _ => Err(format!("Unknown timing: {}. Use before or after", s)),
        }
    }
}

impl std::fmt::Display for HashTiming {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashTiming::Before => write!(f, "before"),
            HashTiming::After => write!(f, "after"),
        }
    }
}

#[derive(Default)]
struct ViewerState {
    initialized: bool,
    closed: bool,
    listeners: Vec<Box<dyn FnOnce()>>,
}

/// 呼び出しを記録するだけのビューア。`close` で即座に破棄通知を出す
#[derive(Clone, Default)]
pub struct RecordingViewer {
    state: Rc<RefCell<ViewerState>>,
}

impl RecordingViewer {
    pub fn is_initialized(&self) -> bool {
        self.state.borrow().initialized
    }

    pub fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }
}

impl Viewer for RecordingViewer {
    fn init(&self) {
        self.state.borrow_mut().initialized = true;
    }

    fn close(&self) {
        let listeners = {
            let mut state = self.state.borrow_mut();
            state.closed = true;
            std::mem::take(&mut state.listeners)
        };
        for listener in listeners {
            listener();
        }
    }

    fn on_destroy(&self, listener: Box<dyn FnOnce()>) {
        self.state.borrow_mut().listeners.push(listener);
    }
}

#[derive(Clone, Default)]
pub struct RecordingFactory {
    created: Rc<RefCell<Vec<ViewerConfig>>>,
}

impl RecordingFactory {
    pub fn created(&self) -> Vec<ViewerConfig> {
        self.created.borrow().clone()
    }
}

impl ViewerFactory for RecordingFactory {
    type Viewer = RecordingViewer;

    fn create(&self, config: ViewerConfig) -> RecordingViewer {
        self.created.borrow_mut().push(config);
        RecordingViewer::default()
    }
}

/// 検証の指定
#[derive(Debug, Clone, Default)]
pub struct InspectRequest {
    /// URLフラグメント（`#gid=..&pid=..`）
    pub hash: Option<String>,
    pub hash_timing: HashTiming,
    /// 識別子でのオープン
    pub pid: Option<String>,
    /// 明示インデックスでのオープン
    pub index: Option<i64>,
    /// クリックされたアイテム（`items` の添字）
    pub item: Option<usize>,
    pub pointer: Option<PointerPos>,
}

impl InspectRequest {
    fn has_explicit_open(&self) -> bool {
        self.pid.is_some() || self.index.is_some() || self.item.is_some()
    }
}

/// 検証結果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectReport {
    pub opened: bool,
    pub viewers_created: usize,
    /// 最後まで解決されなかった保留要求
    pub pending_pid: Option<String>,
    /// 最初に生成されたビューアのパラメータ。`element` は `{"item": 添字}`
    pub viewer: Option<Value>,
}

/// マニフェストファイルを読み込む
pub fn load_manifest(path: &Path) -> Result<GalleryManifest> {
    if !path.exists() {
        return Err(GalleryError::ManifestNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(GalleryManifest::from_json(&content)?)
}

/// `X,Y` 形式のポインタ座標
pub fn parse_pointer(value: &str) -> Result<PointerPos> {
    let invalid = || GalleryError::InvalidArgument(format!("X,Y 形式ではありません: {}", value));
    let (x, y) = value.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse::<f64>().map_err(|_| invalid())?;
    let y = y.trim().parse::<f64>().map_err(|_| invalid())?;
    Ok(PointerPos { x, y })
}

/// ギャラリーを再現してビューアの生成パラメータを得る
///
/// 1. `items` の並びを文書順として参照を払い出す
/// 2. `HashTiming::Before` ならハッシュ起動（登録が空なので pid は保留）
/// 3. `mountOrder` の順に登録
/// 4. `HashTiming::After` ならハッシュ起動
/// 5. `pid` / `index` / `item` の指定があればクリックと同じ経路で開く
pub fn inspect(
    manifest: &GalleryManifest,
    base_options: &ViewerOptions,
    request: &InspectRequest,
) -> Result<InspectReport> {
    if let Some(item) = request.item {
        if item >= manifest.items.len() {
            return Err(GalleryError::InvalidArgument(format!(
                "item {} は範囲外です（{}件）",
                item,
                manifest.items.len()
            )));
        }
    }

    let factory = RecordingFactory::default();
    let props = GalleryProps {
        options: base_options.merged_with(&manifest.options),
        id: manifest.id.clone(),
        on_open: None,
    };
    let mut gallery = Gallery::new(props, factory.clone(), SequenceOrder::new(), ViewerSlot::new());

    let refs: Vec<ItemRef> = (0..manifest.items.len())
        .map(|position| {
            let item = gallery.allocate_ref();
            gallery.order_mut().place(item, position);
            item
        })
        .collect();

    if let (Some(hash), HashTiming::Before) = (&request.hash, request.hash_timing) {
        gallery.bootstrap_from_hash(hash);
    }

    for idx in manifest.mount_sequence() {
        gallery.set(refs[idx], manifest.items[idx].clone());
    }

    if let (Some(hash), HashTiming::After) = (&request.hash, request.hash_timing) {
        gallery.bootstrap_from_hash(hash);
    }

    if request.has_explicit_open() {
        let opened = gallery.handle_click(
            request.item.map(|idx| refs[idx]),
            request.pid.clone(),
            request.index,
            request.pointer,
        );
        if !opened {
            info!("viewer already open, explicit open ignored");
        }
    }

    let created = factory.created();
    let viewer = created.first().map(|config| {
        config.to_json_with(|item| json!({ "item": gallery.order().position(item) }))
    });

    Ok(InspectReport {
        opened: !created.is_empty(),
        viewers_created: created.len(),
        pending_pid: gallery.pending_pid().map(str::to_string),
        viewer,
    })
}
