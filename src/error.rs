use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("マニフェストが見つかりません: {0}")]
    ManifestNotFound(String),

    #[error("マニフェストが不正: {0}")]
    InvalidManifest(String),

    #[error("引数が不正: {0}")]
    InvalidArgument(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl From<photoswipe_gallery_common::Error> for GalleryError {
    fn from(err: photoswipe_gallery_common::Error) -> Self {
        match err {
            photoswipe_gallery_common::Error::Json(e) => GalleryError::JsonParse(e),
            photoswipe_gallery_common::Error::Manifest(msg) => GalleryError::InvalidManifest(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;
