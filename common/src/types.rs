//! ギャラリーの型定義
//!
//! Webコンポーネントとヘッドレス検証ツールで共有される型:
//! - ItemRef: マウント中のアイテムを指すハンドル
//! - ItemRecord: アイテムが登録するメタデータ
//! - Pid: 外部から指定されるアイテム識別子

use crate::numeric::coerce_number;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// マウント中のアイテムを指す不透明なハンドル
///
/// 同じ `RefAllocator` から払い出されたIDは再利用されない。
/// 比較は値ではなくIDの同一性で行う。
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct ItemRef(u64);

impl ItemRef {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// `ItemRef` の払い出し
#[derive(Debug, Default)]
pub struct RefAllocator {
    next_id: u64,
}

impl RefAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> ItemRef {
        let id = ItemRef(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .expect("item ref overflowed u64");
        id
    }
}

/// アイテムの外部識別子（ハッシュの `pid`）
///
/// 数値と文字列のどちらでも指定できる。比較は常に文字列表現で行う。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Pid {
    Number(serde_json::Number),
    Text(String),
}

impl Pid {
    /// 文字列表現で一致するか
    pub fn matches(&self, other: &str) -> bool {
        self.to_string() == other
    }

    pub fn to_json(&self) -> Value {
        match self {
            Pid::Number(n) => Value::Number(n.clone()),
            Pid::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pid::Text(s) => f.write_str(s),
            Pid::Number(n) => match n.as_f64() {
                // 3.0 は "3" と表記する
                Some(v) if n.is_f64() && v.fract() == 0.0 && v.abs() < 1e15 => {
                    write!(f, "{}", v as i64)
                }
                _ => write!(f, "{}", n),
            },
        }
    }
}

impl From<&str> for Pid {
    fn from(value: &str) -> Self {
        Pid::Text(value.to_string())
    }
}

impl From<String> for Pid {
    fn from(value: String) -> Self {
        Pid::Text(value)
    }
}

impl From<i64> for Pid {
    fn from(value: i64) -> Self {
        Pid::Number(value.into())
    }
}

/// 幅・高さ（数値または数値文字列）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    Number(f64),
    Text(String),
}

impl Dimension {
    pub fn to_f64(&self) -> f64 {
        match self {
            Dimension::Number(v) => *v,
            Dimension::Text(s) => coerce_number(s),
        }
    }
}

impl From<u32> for Dimension {
    fn from(value: u32) -> Self {
        Dimension::Number(f64::from(value))
    }
}

impl From<&str> for Dimension {
    fn from(value: &str) -> Self {
        Dimension::Text(value.to_string())
    }
}

/// アイテムが登録するメタデータ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// フル解像度画像のURL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_srcset: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    /// サムネイルがトリミングされているか
    #[serde(default)]
    pub cropped: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Pid>,

    /// ビューアへそのまま渡す追加フィールド
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemRecord {
    pub fn new(original: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            original: Some(original.into()),
            width: Some(width.into()),
            height: Some(height.into()),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<Pid>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// `Number(width)` 相当。未指定ならNaN
    pub fn width_f64(&self) -> f64 {
        self.width.as_ref().map_or(f64::NAN, Dimension::to_f64)
    }

    pub fn height_f64(&self) -> f64 {
        self.height.as_ref().map_or(f64::NAN, Dimension::to_f64)
    }
}

/// オープンのきっかけになったポインタの座標
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPos {
    pub x: f64,
    pub y: f64,
}

/// ビューアへ渡す設定（計算値のあとにマージされ、同名キーを上書きする）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewerOptions(pub Map<String, Value>);

impl ViewerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `self` を土台に `overrides` を重ねた設定を返す
    pub fn merged_with(&self, overrides: &ViewerOptions) -> ViewerOptions {
        let mut merged = self.0.clone();
        for (key, value) in &overrides.0 {
            merged.insert(key.clone(), value.clone());
        }
        ViewerOptions(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ref_allocator_never_reuses() {
        let mut alloc = RefAllocator::new();
        let a = alloc.allocate();
        let b = alloc.allocate();
        assert_ne!(a, b);
        assert_eq!(a.raw() + 1, b.raw());
    }

    #[test]
    fn test_pid_string_form() {
        assert_eq!(Pid::from(3i64).to_string(), "3");
        assert_eq!(Pid::from("b").to_string(), "b");

        let float: Pid = serde_json::from_str("3.0").expect("デシリアライズ失敗");
        assert_eq!(float.to_string(), "3");
        let fraction: Pid = serde_json::from_str("2.5").expect("デシリアライズ失敗");
        assert_eq!(fraction.to_string(), "2.5");
    }

    #[test]
    fn test_pid_matches_across_types() {
        assert!(Pid::from(3i64).matches("3"));
        assert!(Pid::from("3").matches("3"));
        assert!(!Pid::from(3i64).matches("03"));
    }

    #[test]
    fn test_item_record_deserialize() {
        let json = r#"{
            "original": "https://example.com/a.jpg",
            "originalSrcset": "a-2x.jpg 2x",
            "thumbnail": "a-thumb.jpg",
            "width": "1024",
            "height": 768,
            "id": 7,
            "alt": "海"
        }"#;

        let record: ItemRecord = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(record.original.as_deref(), Some("https://example.com/a.jpg"));
        assert_eq!(record.original_srcset.as_deref(), Some("a-2x.jpg 2x"));
        assert_eq!(record.width_f64(), 1024.0);
        assert_eq!(record.height_f64(), 768.0);
        assert_eq!(record.id, Some(Pid::from(7i64)));
        assert!(!record.cropped);
        assert_eq!(record.extra.get("alt"), Some(&json!("海")));
    }

    #[test]
    fn test_item_record_missing_dimensions_are_nan() {
        let record: ItemRecord = serde_json::from_str("{}").expect("デシリアライズ失敗");
        assert!(record.width_f64().is_nan());
        assert!(record.height_f64().is_nan());
        assert!(record.id.is_none());
    }

    #[test]
    fn test_viewer_options_merge() {
        let base = ViewerOptions::new().set("bgOpacity", json!(0.8)).set("loop", json!(true));
        let overrides = ViewerOptions::new().set("loop", json!(false));

        let merged = base.merged_with(&overrides);
        assert_eq!(merged.get("bgOpacity"), Some(&json!(0.8)));
        assert_eq!(merged.get("loop"), Some(&json!(false)));
    }
}
