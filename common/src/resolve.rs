//! オープン位置の解決
//!
//! アイテム参照・明示インデックス・外部識別子のいずれかで指定された要求を、
//! 現在のレジストリから1つのインデックスとビューア用スライド列に変換する。

use crate::numeric::parse_int;
use crate::ordering::NodeOrder;
use crate::registry::ItemRegistry;
use crate::types::{ItemRecord, ItemRef, Pid};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// オープン要求の指定方法
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpenTarget {
    pub item: Option<ItemRef>,
    pub pid: Option<String>,
    pub index: Option<i64>,
}

impl OpenTarget {
    pub fn by_ref(item: ItemRef) -> Self {
        Self { item: Some(item), ..Default::default() }
    }

    pub fn by_pid(pid: impl Into<String>) -> Self {
        Self { pid: Some(pid.into()), ..Default::default() }
    }

    pub fn at_index(index: i64) -> Self {
        Self { index: Some(index), ..Default::default() }
    }
}

/// 解決されたインデックス
///
/// 範囲チェックはしない。`Unresolved` は数値に解釈できなかった識別子で、
/// そのままビューアへ渡す（扱いはビューア側に任せる）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedIndex {
    At(i64),
    Unresolved,
}

impl ResolvedIndex {
    pub fn as_f64(self) -> f64 {
        match self {
            ResolvedIndex::At(i) => i as f64,
            ResolvedIndex::Unresolved => f64::NAN,
        }
    }

    pub fn position(self) -> Option<i64> {
        match self {
            ResolvedIndex::At(i) => Some(i),
            ResolvedIndex::Unresolved => None,
        }
    }

    pub fn to_json(self) -> Value {
        match self {
            ResolvedIndex::At(i) => Value::from(i),
            ResolvedIndex::Unresolved => Value::Null,
        }
    }
}

/// スライドのフィールド値
#[derive(Debug, Clone, PartialEq)]
pub enum SlideField {
    Value(Value),
    /// ホスト側で実要素に置き換えるアイテム参照
    Element(ItemRef),
}

/// ビューア用に正規化したアイテム
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub item: ItemRef,
    pub w: f64,
    pub h: f64,
    pub src: Option<String>,
    pub srcset: Option<String>,
    pub msrc: Option<String>,
    pub thumb_cropped: bool,
    pub pid: Option<Pid>,
    /// 計算値のあとにマージされ、同名キーを上書きする
    pub extra: Map<String, Value>,
}

impl Slide {
    pub fn from_record(item: ItemRef, record: &ItemRecord) -> Self {
        Self {
            item,
            w: record.width_f64(),
            h: record.height_f64(),
            src: record.original.clone(),
            srcset: record.original_srcset.clone(),
            msrc: record.thumbnail.clone(),
            thumb_cropped: record.cropped,
            pid: record.id.clone(),
            extra: record.extra.clone(),
        }
    }

    /// 計算値 → 追加フィールドの順にマージしたフィールド一覧
    pub fn fields(&self) -> IndexMap<String, SlideField> {
        let mut fields = IndexMap::new();
        let value = |v: Value| SlideField::Value(v);

        fields.insert("w".to_string(), value(number(self.w)));
        fields.insert("h".to_string(), value(number(self.h)));
        if let Some(src) = &self.src {
            fields.insert("src".to_string(), value(Value::from(src.as_str())));
        }
        if let Some(srcset) = &self.srcset {
            fields.insert("srcset".to_string(), value(Value::from(srcset.as_str())));
        }
        if let Some(msrc) = &self.msrc {
            fields.insert("msrc".to_string(), value(Value::from(msrc.as_str())));
        }
        fields.insert("element".to_string(), SlideField::Element(self.item));
        fields.insert("thumbCropped".to_string(), value(Value::Bool(self.thumb_cropped)));
        if let Some(pid) = &self.pid {
            fields.insert("pid".to_string(), value(pid.to_json()));
        }

        for (key, extra) in &self.extra {
            fields.insert(key.clone(), SlideField::Value(extra.clone()));
        }
        fields
    }

    /// JSON表現。要素は `element_json` で変換する
    pub fn to_json_with(&self, element_json: impl Fn(ItemRef) -> Value) -> Value {
        let object: Map<String, Value> = self
            .fields()
            .into_iter()
            .map(|(key, field)| match field {
                SlideField::Value(v) => (key, v),
                SlideField::Element(item) => (key, element_json(item)),
            })
            .collect();
        Value::Object(object)
    }
}

/// NaNなど有限でない値はJSONでは null になる
fn number(v: f64) -> Value {
    serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number)
}

/// 解決結果
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub index: ResolvedIndex,
    pub slides: Vec<Slide>,
}

/// オープン要求を解決する
///
/// 1. レジストリを読み出し順（文書順）で走査してスライドを作る
/// 2. 参照または識別子（文字列比較）が最初に一致した位置を採用
/// 3. 参照も識別子もなければ明示インデックス
/// 4. 識別子が一致しなければ1始まりの位置として解釈（数値でなければ `Unresolved`）
pub fn resolve(registry: &ItemRegistry, order: &impl NodeOrder, target: &OpenTarget) -> Resolution {
    let mut matched: Option<usize> = None;
    let mut slides = Vec::with_capacity(registry.len());

    for (position, (item, record)) in registry.snapshot(order).into_iter().enumerate() {
        if matched.is_none() {
            let ref_hit = target.item == Some(item);
            let pid_hit = match (&record.id, &target.pid) {
                (Some(id), Some(pid)) => id.matches(pid),
                _ => false,
            };
            if ref_hit || pid_hit {
                matched = Some(position);
            }
        }
        slides.push(Slide::from_record(item, record));
    }

    let index = match matched {
        Some(position) => ResolvedIndex::At(position as i64),
        None => match (&target.item, &target.pid, target.index) {
            (None, None, Some(explicit)) => ResolvedIndex::At(explicit),
            (_, Some(pid), _) => parse_int(pid).map_or(ResolvedIndex::Unresolved, |n| ResolvedIndex::At(n - 1)),
            _ => ResolvedIndex::Unresolved,
        },
    };

    Resolution { index, slides }
}
