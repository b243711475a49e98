//! PhotoSwipe Gallery ヘッドレス検証ツール

pub mod cli;
pub mod config;
pub mod error;
pub mod inspect;
