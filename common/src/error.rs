//! エラー型定義
//!
//! 登録・オープン制御そのものはエラーを返さない。
//! エラーになるのはマニフェストなど外部入力の読み込み時のみ。

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Manifest error: {0}")]
    Manifest(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
