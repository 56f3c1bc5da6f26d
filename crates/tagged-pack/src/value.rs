//! [`TaggedValue`]: the generic tree exchanged with the message transport.
//!
//! A closed variant: ten leaf kinds plus two composites. Composite nodes are
//! built incrementally by the encoder and only read by the decoder.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use indexmap::IndexMap;
use uuid::Uuid;

/// Dictionary payload: string keys, unique, insertion-ordered.
pub type Dictionary = IndexMap<String, TaggedValue>;

/// The kind of a [`TaggedValue`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Null,
    Bool,
    Int64,
    UInt64,
    Double,
    String,
    Timestamp,
    Uuid,
    ByteArray,
    Handle,
    Array,
    Dictionary,
}

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Tag::Null => "null",
            Tag::Bool => "bool",
            Tag::Int64 => "int64",
            Tag::UInt64 => "uint64",
            Tag::Double => "double",
            Tag::String => "string",
            Tag::Timestamp => "timestamp",
            Tag::Uuid => "uuid",
            Tag::ByteArray => "byte array",
            Tag::Handle => "handle",
            Tag::Array => "array",
            Tag::Dictionary => "dictionary",
        }
    }

    /// Whether nodes of this kind hold other nodes.
    pub fn is_composite(self) -> bool {
        matches!(self, Tag::Array | Tag::Dictionary)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Point in time with whole-second resolution, counted from the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn from_epoch_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    pub fn epoch_seconds(self) -> i64 {
        self.0
    }

    /// Truncates sub-second precision.
    pub fn from_system_time(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => Self(after.as_secs() as i64),
            Err(before) => {
                let d = before.duration();
                let secs = d.as_secs() as i64;
                // Round toward negative infinity so the instant is not moved forward.
                Self(if d.subsec_nanos() > 0 { -secs - 1 } else { -secs })
            }
        }
    }

    pub fn to_system_time(self) -> SystemTime {
        if self.0 >= 0 {
            UNIX_EPOCH + Duration::from_secs(self.0 as u64)
        } else {
            UNIX_EPOCH - Duration::from_secs(self.0.unsigned_abs())
        }
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        Self::from_system_time(time)
    }
}

/// Owned raw bytes, distinct from a sequence of small integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Bytes {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

/// Opaque reference owned by the transport (a descriptor, connection or
/// endpoint). The codec moves handles around but never mints them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    raw: u64,
}

impl Handle {
    /// For transports materializing an inbound reference.
    pub fn from_raw(raw: u64) -> Self {
        Self { raw }
    }

    pub fn raw(self) -> u64 {
        self.raw
    }
}

/// A node of the tagged message tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TaggedValue {
    #[default]
    Null,
    Bool(bool),
    Int64(i64),
    UInt64(u64),
    Double(f64),
    String(String),
    Timestamp(Timestamp),
    Uuid(Uuid),
    ByteArray(Vec<u8>),
    Handle(Handle),
    Array(Vec<TaggedValue>),
    Dictionary(Dictionary),
}

impl TaggedValue {
    pub fn empty_dictionary() -> Self {
        TaggedValue::Dictionary(Dictionary::new())
    }

    pub fn empty_array() -> Self {
        TaggedValue::Array(Vec::new())
    }

    pub fn tag(&self) -> Tag {
        match self {
            TaggedValue::Null => Tag::Null,
            TaggedValue::Bool(_) => Tag::Bool,
            TaggedValue::Int64(_) => Tag::Int64,
            TaggedValue::UInt64(_) => Tag::UInt64,
            TaggedValue::Double(_) => Tag::Double,
            TaggedValue::String(_) => Tag::String,
            TaggedValue::Timestamp(_) => Tag::Timestamp,
            TaggedValue::Uuid(_) => Tag::Uuid,
            TaggedValue::ByteArray(_) => Tag::ByteArray,
            TaggedValue::Handle(_) => Tag::Handle,
            TaggedValue::Array(_) => Tag::Array,
            TaggedValue::Dictionary(_) => Tag::Dictionary,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TaggedValue::Null)
    }

    pub fn is_dictionary(&self) -> bool {
        matches!(self, TaggedValue::Dictionary(_))
    }

    // ---------------------------------------------------------------- leaves

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TaggedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TaggedValue::Int64(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            TaggedValue::UInt64(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TaggedValue::Double(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TaggedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            TaggedValue::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            TaggedValue::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            TaggedValue::ByteArray(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_handle(&self) -> Option<Handle> {
        match self {
            TaggedValue::Handle(h) => Some(*h),
            _ => None,
        }
    }

    // ---------------------------------------------------------------- composites

    pub fn as_array(&self) -> Option<&[TaggedValue]> {
        match self {
            TaggedValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            TaggedValue::Dictionary(map) => Some(map),
            _ => None,
        }
    }

    /// Dictionary lookup; `None` for missing keys and non-dictionaries.
    pub fn get(&self, key: &str) -> Option<&TaggedValue> {
        self.as_dictionary().and_then(|map| map.get(key))
    }

    /// Array lookup; `None` out of bounds and for non-arrays.
    pub fn get_index(&self, index: usize) -> Option<&TaggedValue> {
        self.as_array().and_then(|items| items.get(index))
    }

    /// Wraps `self` as the only entry of a new dictionary.
    pub fn wrapped(self, key: &str) -> TaggedValue {
        let mut map = Dictionary::with_capacity(1);
        map.insert(key.to_owned(), self);
        TaggedValue::Dictionary(map)
    }
}

impl From<bool> for TaggedValue {
    fn from(b: bool) -> Self {
        TaggedValue::Bool(b)
    }
}

impl From<i64> for TaggedValue {
    fn from(n: i64) -> Self {
        TaggedValue::Int64(n)
    }
}

impl From<u64> for TaggedValue {
    fn from(n: u64) -> Self {
        TaggedValue::UInt64(n)
    }
}

impl From<f64> for TaggedValue {
    fn from(n: f64) -> Self {
        TaggedValue::Double(n)
    }
}

impl From<&str> for TaggedValue {
    fn from(s: &str) -> Self {
        TaggedValue::String(s.to_owned())
    }
}

impl From<String> for TaggedValue {
    fn from(s: String) -> Self {
        TaggedValue::String(s)
    }
}

impl From<Timestamp> for TaggedValue {
    fn from(t: Timestamp) -> Self {
        TaggedValue::Timestamp(t)
    }
}

impl From<Uuid> for TaggedValue {
    fn from(u: Uuid) -> Self {
        TaggedValue::Uuid(u)
    }
}

impl From<Bytes> for TaggedValue {
    fn from(b: Bytes) -> Self {
        TaggedValue::ByteArray(b.0)
    }
}

impl From<Handle> for TaggedValue {
    fn from(h: Handle) -> Self {
        TaggedValue::Handle(h)
    }
}

impl From<Vec<TaggedValue>> for TaggedValue {
    fn from(items: Vec<TaggedValue>) -> Self {
        TaggedValue::Array(items)
    }
}

impl From<Dictionary> for TaggedValue {
    fn from(map: Dictionary) -> Self {
        TaggedValue::Dictionary(map)
    }
}

impl FromIterator<(String, TaggedValue)> for TaggedValue {
    fn from_iter<I: IntoIterator<Item = (String, TaggedValue)>>(iter: I) -> Self {
        TaggedValue::Dictionary(iter.into_iter().collect())
    }
}

impl FromIterator<TaggedValue> for TaggedValue {
    fn from_iter<I: IntoIterator<Item = TaggedValue>>(iter: I) -> Self {
        TaggedValue::Array(iter.into_iter().collect())
    }
}

impl fmt::Display for TaggedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaggedValue::Null => f.write_str("null"),
            TaggedValue::Bool(b) => write!(f, "{b}"),
            TaggedValue::Int64(n) => write!(f, "{n}"),
            TaggedValue::UInt64(n) => write!(f, "{n}u"),
            TaggedValue::Double(n) => write!(f, "{n:?}"),
            TaggedValue::String(s) => write!(f, "{s:?}"),
            TaggedValue::Timestamp(t) => write!(f, "@{}", t.0),
            TaggedValue::Uuid(u) => write!(f, "{u}"),
            TaggedValue::ByteArray(b) => write!(f, "<{} bytes>", b.len()),
            TaggedValue::Handle(h) => write!(f, "<handle {}>", h.raw),
            TaggedValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            TaggedValue::Dictionary(map) => {
                f.write_str("{")?;
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key:?}: {item}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_reject_other_tags() {
        let v = TaggedValue::Int64(7);
        assert_eq!(v.as_i64(), Some(7));
        assert_eq!(v.as_u64(), None);
        assert_eq!(v.as_bool(), None);
        assert_eq!(v.as_str(), None);
        assert_eq!(v.tag(), Tag::Int64);
    }

    #[test]
    fn dictionary_equality_ignores_order() {
        let a: TaggedValue = vec![
            ("x".to_owned(), TaggedValue::Int64(1)),
            ("y".to_owned(), TaggedValue::Bool(false)),
        ]
        .into_iter()
        .collect();
        let b: TaggedValue = vec![
            ("y".to_owned(), TaggedValue::Bool(false)),
            ("x".to_owned(), TaggedValue::Int64(1)),
        ]
        .into_iter()
        .collect();
        assert_eq!(a, b);
        assert_eq!(a.get("x"), Some(&TaggedValue::Int64(1)));
        assert_eq!(a.get("z"), None);
    }

    #[test]
    fn timestamp_system_time_roundtrip() {
        let t = Timestamp(1_700_000_000);
        assert_eq!(Timestamp::from_system_time(t.to_system_time()), t);
        let before = Timestamp(-5);
        assert_eq!(Timestamp::from_system_time(before.to_system_time()), before);
        let half = UNIX_EPOCH - Duration::from_millis(1500);
        assert_eq!(Timestamp::from_system_time(half), Timestamp(-2));
    }

    #[test]
    fn display_is_compact() {
        let v: TaggedValue = vec![
            ("a".to_owned(), TaggedValue::Int64(1)),
            (
                "b".to_owned(),
                TaggedValue::Array(vec![TaggedValue::Bool(true), TaggedValue::Null]),
            ),
        ]
        .into_iter()
        .collect();
        assert_eq!(v.to_string(), r#"{"a": 1, "b": [true, null]}"#);
        assert_eq!(TaggedValue::UInt64(3).to_string(), "3u");
        assert_eq!(Tag::ByteArray.to_string(), "byte array");
    }

    #[test]
    fn wrapped_builds_single_entry_dictionary() {
        let v = TaggedValue::Int64(42).wrapped("value");
        assert_eq!(v.as_dictionary().map(|m| m.len()), Some(1));
        assert_eq!(v.get("value"), Some(&TaggedValue::Int64(42)));
    }
}
