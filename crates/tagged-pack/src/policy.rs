//! Top-level wrap/unwrap policies.
//!
//! A root message must be a dictionary. These policies reconcile that with
//! values whose natural encoding is some other shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, EncodeError};
use crate::value::TaggedValue;

/// Applied once to the encoded root.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "strategy", content = "key")]
pub enum WrapPolicy {
    /// Non-dictionary roots are an error.
    #[default]
    ThrowIfNotDictionary,
    /// Every root is wrapped under the key.
    WrapAlways(String),
    /// Only non-dictionary roots are wrapped under the key.
    WrapIfNotDictionary(String),
    /// The root is returned as produced.
    Passthrough,
}

impl WrapPolicy {
    pub fn apply(&self, root: TaggedValue) -> Result<TaggedValue, EncodeError> {
        match (self, root.is_dictionary()) {
            (WrapPolicy::ThrowIfNotDictionary, false) => Err(EncodeError::RootShapeViolation {
                policy: self.to_string(),
                reason: format!("top-level value encoded as {} instead of dictionary", root.tag()),
            }),
            (WrapPolicy::WrapAlways(key), _) | (WrapPolicy::WrapIfNotDictionary(key), false) => {
                tracing::trace!(key = %key, tag = %root.tag(), "wrapping top-level value");
                Ok(root.wrapped(key))
            }
            _ => Ok(root),
        }
    }
}

impl fmt::Display for WrapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WrapPolicy::ThrowIfNotDictionary => f.write_str("throw_if_not_dictionary"),
            WrapPolicy::WrapAlways(key) => write!(f, "wrap_always({key:?})"),
            WrapPolicy::WrapIfNotDictionary(key) => write!(f, "wrap_if_not_dictionary({key:?})"),
            WrapPolicy::Passthrough => f.write_str("passthrough"),
        }
    }
}

/// Applied to an inbound tree before decoding starts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "strategy", content = "key")]
pub enum UnwrapPolicy {
    #[default]
    None,
    /// Unwraps a single-entry dictionary holding the key; otherwise decodes
    /// the tree as is.
    UnwrapIfSinglePresent(String),
    /// Like [`UnwrapPolicy::UnwrapIfSinglePresent`] but fails when the tree
    /// is not such a dictionary.
    ForceUnwrap(String),
}

impl UnwrapPolicy {
    pub fn apply<'t>(&self, tree: &'t TaggedValue) -> Result<&'t TaggedValue, DecodeError> {
        let (key, force) = match self {
            UnwrapPolicy::None => return Ok(tree),
            UnwrapPolicy::UnwrapIfSinglePresent(key) => (key, false),
            UnwrapPolicy::ForceUnwrap(key) => (key, true),
        };
        match single_entry(tree, key) {
            Some(inner) => {
                tracing::trace!(key = %key, tag = %inner.tag(), "unwrapping top-level value");
                Ok(inner)
            }
            None if force => Err(DecodeError::RootShapeViolation {
                policy: self.to_string(),
                reason: "the given data did not contain a top-level value".to_owned(),
            }),
            None => Ok(tree),
        }
    }
}

fn single_entry<'t>(tree: &'t TaggedValue, key: &str) -> Option<&'t TaggedValue> {
    match tree {
        TaggedValue::Dictionary(entries) if entries.len() == 1 => entries.get(key),
        _ => None,
    }
}

impl fmt::Display for UnwrapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnwrapPolicy::None => f.write_str("none"),
            UnwrapPolicy::UnwrapIfSinglePresent(key) => write!(f, "unwrap_if_single_present({key:?})"),
            UnwrapPolicy::ForceUnwrap(key) => write!(f, "force_unwrap({key:?})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict() -> TaggedValue {
        TaggedValue::Int64(1).wrapped("a")
    }

    #[test]
    fn wrap_table() {
        let leaf = TaggedValue::Int64(42);
        let key = || "value".to_owned();

        assert_eq!(WrapPolicy::ThrowIfNotDictionary.apply(dict()), Ok(dict()));
        assert!(matches!(
            WrapPolicy::ThrowIfNotDictionary.apply(leaf.clone()),
            Err(EncodeError::RootShapeViolation { .. })
        ));

        assert_eq!(
            WrapPolicy::WrapAlways(key()).apply(dict()),
            Ok(dict().wrapped("value"))
        );
        assert_eq!(
            WrapPolicy::WrapAlways(key()).apply(leaf.clone()),
            Ok(leaf.clone().wrapped("value"))
        );

        assert_eq!(WrapPolicy::WrapIfNotDictionary(key()).apply(dict()), Ok(dict()));
        assert_eq!(
            WrapPolicy::WrapIfNotDictionary(key()).apply(leaf.clone()),
            Ok(leaf.clone().wrapped("value"))
        );

        assert_eq!(WrapPolicy::Passthrough.apply(dict()), Ok(dict()));
        assert_eq!(WrapPolicy::Passthrough.apply(leaf.clone()), Ok(leaf));
    }

    #[test]
    fn unwrap_table() {
        let wrapped = TaggedValue::Int64(42).wrapped("value");
        let two: TaggedValue = vec![
            ("value".to_owned(), TaggedValue::Int64(42)),
            ("other".to_owned(), TaggedValue::Null),
        ]
        .into_iter()
        .collect();
        let key = || "value".to_owned();

        assert_eq!(UnwrapPolicy::None.apply(&wrapped), Ok(&wrapped));

        let soft = UnwrapPolicy::UnwrapIfSinglePresent(key());
        assert_eq!(soft.apply(&wrapped), Ok(&TaggedValue::Int64(42)));
        assert_eq!(soft.apply(&two), Ok(&two));
        assert_eq!(soft.apply(&dict()).cloned(), Ok(dict()));

        let force = UnwrapPolicy::ForceUnwrap(key());
        assert_eq!(force.apply(&wrapped), Ok(&TaggedValue::Int64(42)));
        let err = force.apply(&two).unwrap_err();
        assert_eq!(
            err.to_string(),
            "top-level shape violation under force_unwrap(\"value\"): the given data did not contain a top-level value"
        );
        assert!(force.apply(&TaggedValue::Int64(42)).is_err());
    }

    #[test]
    fn policies_deserialize_from_config() {
        let wrap: WrapPolicy =
            serde_json::from_str(r#"{"strategy":"wrap_if_not_dictionary","key":"value"}"#).unwrap();
        assert_eq!(wrap, WrapPolicy::WrapIfNotDictionary("value".into()));
        let wrap: WrapPolicy = serde_json::from_str(r#"{"strategy":"passthrough"}"#).unwrap();
        assert_eq!(wrap, WrapPolicy::Passthrough);
        let unwrap: UnwrapPolicy =
            serde_json::from_str(r#"{"strategy":"force_unwrap","key":"k"}"#).unwrap();
        assert_eq!(unwrap, UnwrapPolicy::ForceUnwrap("k".into()));
        let json = serde_json::to_string(&UnwrapPolicy::None).unwrap();
        assert_eq!(json, r#"{"strategy":"none"}"#);
    }
}
