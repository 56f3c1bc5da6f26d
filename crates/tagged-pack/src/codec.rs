//! Top-level entry points pairing the engines with their root policies.

use serde::{Deserialize, Serialize};

use crate::codable::{Decode, Encode};
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{DecodeError, EncodeError};
use crate::path::FieldPath;
use crate::policy::{UnwrapPolicy, WrapPolicy};
use crate::value::TaggedValue;

/// Encodes values into message trees.
#[derive(Debug, Clone, Default)]
pub struct TaggedEncoder {
    wrap_policy: WrapPolicy,
}

impl TaggedEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wrap_policy(wrap_policy: WrapPolicy) -> Self {
        Self { wrap_policy }
    }

    pub fn wrap_policy(&self) -> &WrapPolicy {
        &self.wrap_policy
    }

    pub fn set_wrap_policy(&mut self, wrap_policy: WrapPolicy) {
        self.wrap_policy = wrap_policy;
    }

    pub fn encode<T: Encode + ?Sized>(&self, value: &T) -> Result<TaggedValue, EncodeError> {
        let mut encoder = Encoder::new();
        let root = encoder
            .box_optional(value)
            .and_then(|root| {
                root.ok_or(EncodeError::EmptyEncode {
                    path: FieldPath::root(),
                })
            })
            .and_then(|root| self.wrap_policy.apply(root));
        if let Err(err) = &root {
            tracing::debug!(policy = %self.wrap_policy, error = %err, "top-level encode failed");
        }
        root
    }
}

/// Decodes message trees into values.
#[derive(Debug, Clone, Default)]
pub struct TaggedDecoder {
    unwrap_policy: UnwrapPolicy,
}

impl TaggedDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unwrap_policy(unwrap_policy: UnwrapPolicy) -> Self {
        Self { unwrap_policy }
    }

    pub fn unwrap_policy(&self) -> &UnwrapPolicy {
        &self.unwrap_policy
    }

    pub fn set_unwrap_policy(&mut self, unwrap_policy: UnwrapPolicy) {
        self.unwrap_policy = unwrap_policy;
    }

    pub fn decode<T: Decode>(&self, tree: &TaggedValue) -> Result<T, DecodeError> {
        let result = self
            .unwrap_policy
            .apply(tree)
            .and_then(|root| T::decode(&mut Decoder::new(root)));
        if let Err(err) = &result {
            tracing::debug!(policy = %self.unwrap_policy, error = %err, "top-level decode failed");
        }
        result
    }
}

/// Serializable pair of root policies, for hosts that keep codec settings
/// alongside the rest of their configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub wrap: WrapPolicy,
    pub unwrap: UnwrapPolicy,
}

impl CodecConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn encoder(&self) -> TaggedEncoder {
        TaggedEncoder::with_wrap_policy(self.wrap.clone())
    }

    pub fn decoder(&self) -> TaggedDecoder {
        TaggedDecoder::with_unwrap_policy(self.unwrap.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Silent;

    impl Encode for Silent {
        fn encode(&self, _encoder: &mut Encoder) -> Result<(), EncodeError> {
            Ok(())
        }
    }

    #[test]
    fn empty_root_is_an_error() {
        let err = TaggedEncoder::new().encode(&Silent).unwrap_err();
        assert_eq!(
            err,
            EncodeError::EmptyEncode {
                path: FieldPath::root()
            }
        );
    }

    #[test]
    fn default_policy_rejects_leaf_roots() {
        assert!(matches!(
            TaggedEncoder::new().encode(&42i64),
            Err(EncodeError::RootShapeViolation { .. })
        ));
    }

    #[test]
    fn config_builds_configured_codecs() {
        let config = CodecConfig::from_json_str(
            r#"{"wrap":{"strategy":"wrap_always","key":"value"},"unwrap":{"strategy":"force_unwrap","key":"value"}}"#,
        )
        .unwrap();
        let tree = config.encoder().encode(&42i64).unwrap();
        assert_eq!(tree, TaggedValue::Int64(42).wrapped("value"));
        assert_eq!(config.decoder().decode::<i64>(&tree), Ok(42));

        let defaults = CodecConfig::from_json_str("{}").unwrap();
        assert_eq!(defaults, CodecConfig::default());
        assert_eq!(defaults.encoder().wrap_policy(), &WrapPolicy::ThrowIfNotDictionary);
    }
}
