//! Conversions between [`TaggedValue`] and [`serde_json::Value`].
//!
//! JSON has no counterpart for several tags, so the mapping out of the tree
//! is lossy: byte arrays become base64 data URIs, timestamps become epoch
//! seconds, UUIDs become hyphenated strings and handles become null.

use base64::Engine;

use crate::value::{TaggedValue, Timestamp};

const BYTES_URI_PREFIX: &str = "data:application/octet-stream;base64,";

impl From<serde_json::Value> for TaggedValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => TaggedValue::Null,
            serde_json::Value::Bool(b) => TaggedValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    TaggedValue::Int64(i)
                } else if let Some(u) = n.as_u64() {
                    TaggedValue::UInt64(u)
                } else {
                    TaggedValue::Double(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => TaggedValue::String(s),
            serde_json::Value::Array(arr) => {
                TaggedValue::Array(arr.into_iter().map(TaggedValue::from).collect())
            }
            serde_json::Value::Object(obj) => obj
                .into_iter()
                .map(|(k, v)| (k, TaggedValue::from(v)))
                .collect(),
        }
    }
}

impl From<TaggedValue> for serde_json::Value {
    fn from(v: TaggedValue) -> Self {
        match v {
            TaggedValue::Null => serde_json::Value::Null,
            TaggedValue::Bool(b) => serde_json::Value::Bool(b),
            TaggedValue::Int64(i) => serde_json::json!(i),
            TaggedValue::UInt64(u) => serde_json::json!(u),
            TaggedValue::Double(f) => serde_json::json!(f),
            TaggedValue::String(s) => serde_json::Value::String(s),
            TaggedValue::Timestamp(Timestamp(seconds)) => serde_json::json!(seconds),
            TaggedValue::Uuid(id) => serde_json::Value::String(id.hyphenated().to_string()),
            TaggedValue::ByteArray(b) => {
                let b64 = base64::engine::general_purpose::STANDARD.encode(b);
                serde_json::Value::String(format!("{BYTES_URI_PREFIX}{b64}"))
            }
            TaggedValue::Handle(_) => serde_json::Value::Null,
            TaggedValue::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(serde_json::Value::from).collect())
            }
            TaggedValue::Dictionary(entries) => serde_json::Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Handle;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn json_numbers_pick_the_narrowest_tag() {
        assert_eq!(TaggedValue::from(json!(-3)), TaggedValue::Int64(-3));
        assert_eq!(TaggedValue::from(json!(u64::MAX)), TaggedValue::UInt64(u64::MAX));
        assert_eq!(TaggedValue::from(json!(1.5)), TaggedValue::Double(1.5));
    }

    #[test]
    fn objects_keep_insertion_order() {
        let tree = TaggedValue::from(json!({"z": 1, "a": [true, null]}));
        let keys: Vec<&str> = tree
            .as_dictionary()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["z", "a"]);
        assert_eq!(serde_json::Value::from(tree), json!({"z": 1, "a": [true, null]}));
    }

    #[test]
    fn non_json_tags_are_flattened() {
        let id = Uuid::from_u128(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef);
        let tree: TaggedValue = vec![
            ("bytes".to_owned(), TaggedValue::ByteArray(vec![1, 2, 3])),
            ("at".to_owned(), TaggedValue::Timestamp(Timestamp(1_700_000_000))),
            ("id".to_owned(), TaggedValue::Uuid(id)),
            ("fd".to_owned(), TaggedValue::Handle(Handle::from_raw(4))),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            serde_json::Value::from(tree),
            json!({
                "bytes": "data:application/octet-stream;base64,AQID",
                "at": 1_700_000_000,
                "id": "01234567-89ab-cdef-0123-456789abcdef",
                "fd": null,
            })
        );
    }
}
