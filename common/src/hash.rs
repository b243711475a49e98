//! URLフラグメントの解析
//!
//! 形式: `key1=value1&key2=value2`。使うキーは `pid`（アイテム）と `gid`（ギャラリー）。

use std::collections::HashMap;

/// これより短いフラグメントは無視する（`#` を除いた長さ）
pub const MIN_HASH_LEN: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashParams {
    params: HashMap<String, String>,
}

impl HashParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn pid(&self) -> Option<&str> {
        self.get("pid")
    }

    pub fn gid(&self) -> Option<&str> {
        self.get("gid")
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// フラグメントを解析する
///
/// 先頭の `#` は取り除く。短すぎる場合は `None`。
/// キーか値が空のセグメントは読み飛ばし、同じキーは後勝ち。
///
/// # Examples
/// ```
/// use photoswipe_gallery_common::hash::parse_hash;
///
/// let params = parse_hash("#gid=g1&pid=3").unwrap();
/// assert_eq!(params.gid(), Some("g1"));
/// assert_eq!(params.pid(), Some("3"));
/// ```
pub fn parse_hash(fragment: &str) -> Option<HashParams> {
    let hash = fragment.strip_prefix('#').unwrap_or(fragment);

    // ブラウザと同じくUTF-16単位で数える
    if hash.encode_utf16().count() < MIN_HASH_LEN {
        return None;
    }

    let params = hash
        .split('&')
        .filter_map(|segment| segment.split_once('='))
        .filter(|(key, value)| !key.is_empty() && !value.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

    Some(HashParams { params })
}
