//! Error taxonomy shared by the encoding and decoding engines.
//!
//! Only malformed data and policy failures are reported here. Traversal
//! logic bugs (conflicting container shapes, stack underflow, a referencing
//! encoder released holding several values) panic instead.

use thiserror::Error;

use crate::path::FieldPath;
use crate::value::{Tag, TaggedValue};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("expected to decode {expected} but found {found} instead at {path}")]
    TypeMismatch {
        path: FieldPath,
        expected: Tag,
        found: Tag,
    },
    #[error("expected {expected} value but found null instead at {path}")]
    NullValueFound {
        path: FieldPath,
        expected: &'static str,
    },
    #[error("no value associated with key `{key}` at {path}")]
    KeyNotFound { path: FieldPath, key: String },
    #[error("unkeyed container is at end at {path}")]
    SequenceExhausted { path: FieldPath },
    #[error("value {raw} does not fit in {target} at {path}")]
    ValueOutOfRange {
        path: FieldPath,
        raw: TaggedValue,
        target: &'static str,
    },
    #[error("top-level shape violation under {policy}: {reason}")]
    RootShapeViolation { policy: String, reason: String },
    #[error("value did not encode any values at {path}")]
    EmptyEncode { path: FieldPath },
    #[error("{message} at {path}")]
    Custom { path: FieldPath, message: String },
}

pub type EncodeError = Error;
pub type DecodeError = Error;

impl Error {
    pub fn custom(path: FieldPath, message: impl Into<String>) -> Self {
        Error::Custom {
            path,
            message: message.into(),
        }
    }

    /// Position of the failure, when the error is tied to one.
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            Error::TypeMismatch { path, .. }
            | Error::NullValueFound { path, .. }
            | Error::KeyNotFound { path, .. }
            | Error::SequenceExhausted { path }
            | Error::ValueOutOfRange { path, .. }
            | Error::EmptyEncode { path }
            | Error::Custom { path, .. } => Some(path),
            Error::RootShapeViolation { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matrix() {
        let path = FieldPath::root().child("b").child(1usize);
        let cases = vec![
            (
                Error::TypeMismatch {
                    path: path.clone(),
                    expected: Tag::Int64,
                    found: Tag::String,
                },
                "expected to decode int64 but found string instead at b[1]",
            ),
            (
                Error::NullValueFound {
                    path: path.clone(),
                    expected: "bool",
                },
                "expected bool value but found null instead at b[1]",
            ),
            (
                Error::KeyNotFound {
                    path: FieldPath::root(),
                    key: "a".into(),
                },
                "no value associated with key `a` at <root>",
            ),
            (
                Error::SequenceExhausted { path: path.clone() },
                "unkeyed container is at end at b[1]",
            ),
            (
                Error::ValueOutOfRange {
                    path: path.clone(),
                    raw: TaggedValue::Int64(300),
                    target: "u8",
                },
                "value 300 does not fit in u8 at b[1]",
            ),
            (
                Error::EmptyEncode {
                    path: FieldPath::root(),
                },
                "value did not encode any values at <root>",
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected, "mismatch for {err:?}");
        }
    }

    #[test]
    fn path_accessor() {
        let err = Error::custom(FieldPath::root().child("x"), "bad");
        assert_eq!(err.path().map(|p| p.to_string()), Some("x".to_owned()));
        let err = Error::RootShapeViolation {
            policy: "force unwrap".into(),
            reason: "no top-level value".into(),
        };
        assert_eq!(err.path(), None);
    }
}
