use crate::error::{GalleryError, Result};
use photoswipe_gallery_common::ViewerOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// マニフェストの options の下に敷くビューア設定
    pub default_options: ViewerOptions,
    /// 出力JSONを整形するか
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_options: ViewerOptions::default(),
            pretty: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| GalleryError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("photoswipe-gallery").join("config.json"))
    }

    /// `KEY=JSON` 形式で既定オプションを設定。値がJSONでなければ文字列として扱う
    pub fn set_option(&mut self, assignment: &str) -> Result<()> {
        let (key, raw) = assignment
            .split_once('=')
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| GalleryError::InvalidArgument(format!("KEY=VALUE 形式ではありません: {}", assignment)))?;

        let value = serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
        self.default_options.0.insert(key.to_string(), value);
        Ok(())
    }

    pub fn unset_option(&mut self, key: &str) -> bool {
        self.default_options.0.remove(key).is_some()
    }
}
