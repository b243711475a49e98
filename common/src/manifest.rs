//! ギャラリーマニフェスト
//!
//! ヘッドレス検証やテストでギャラリーを再現するための入力。
//! `items` は文書順、`mountOrder` はアイテムが登録される順番（省略時は文書順）。

use crate::error::{Error, Result};
use crate::types::{ItemRecord, Pid, ViewerOptions};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Pid>,

    #[serde(default, skip_serializing_if = "ViewerOptions::is_empty")]
    pub options: ViewerOptions,

    pub items: Vec<ItemRecord>,

    /// 登録順（`items` の添字）。同じ添字の再登録は更新として扱う
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount_order: Option<Vec<usize>>,
}

impl GalleryManifest {
    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(order) = &self.mount_order {
            if let Some(bad) = order.iter().find(|&&idx| idx >= self.items.len()) {
                return Err(Error::Manifest(format!(
                    "mountOrder の添字 {} が items の範囲外です（{}件）",
                    bad,
                    self.items.len()
                )));
            }
        }
        Ok(())
    }

    /// 登録する順番
    pub fn mount_sequence(&self) -> Vec<usize> {
        self.mount_order
            .clone()
            .unwrap_or_else(|| (0..self.items.len()).collect())
    }
}
