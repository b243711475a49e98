//! PhotoSwipe Gallery Common Library
//!
//! Webコンポーネントとヘッドレス検証ツールで共有される登録・オープン制御のコア

pub mod types;
pub mod numeric;
pub mod error;
pub mod ordering;
pub mod registry;
pub mod pending;
pub mod resolve;
pub mod viewer;
pub mod hash;
pub mod gallery;
pub mod manifest;

pub use types::{ItemRecord, ItemRef, Pid, PointerPos, RefAllocator, ViewerOptions};
pub use error::{Error, Result};
pub use ordering::{NodeOrder, SequenceOrder};
pub use registry::ItemRegistry;
pub use resolve::{resolve, OpenTarget, Resolution, ResolvedIndex, Slide, SlideField};
pub use viewer::{Viewer, ViewerConfig, ViewerFactory, ViewerSlot};
pub use hash::{parse_hash, HashParams};
pub use gallery::{Gallery, GalleryProps};
pub use manifest::GalleryManifest;
