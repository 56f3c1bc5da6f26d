//! Decoding engine: [`TaggedValue`] → typed values.
//!
//! The [`Decoder`] keeps a stack of the nodes currently being visited.
//! Container requests check the tag of the top node; leaf reads check the
//! tag before converting, reporting null ahead of any other mismatch.

mod keyed;
mod unkeyed;

pub use keyed::KeyedDecoder;
pub use unkeyed::UnkeyedDecoder;

use crate::codable::Decode;
use crate::error::DecodeError;
use crate::path::FieldPath;
use crate::primitive::Primitive;
use crate::value::{Dictionary, Tag, TaggedValue};

/// Stand-in for an absent slot handed to a super decoder.
static NULL_NODE: TaggedValue = TaggedValue::Null;

pub struct Decoder<'t> {
    storage: Vec<&'t TaggedValue>,
    path: FieldPath,
}

impl<'t> Decoder<'t> {
    pub fn new(root: &'t TaggedValue) -> Self {
        Self::with_path(root, FieldPath::root())
    }

    fn with_path(node: &'t TaggedValue, path: FieldPath) -> Self {
        Self {
            storage: vec![node],
            path,
        }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Builds a custom error positioned at the current path.
    pub fn error(&self, message: impl Into<String>) -> DecodeError {
        DecodeError::custom(self.path.clone(), message)
    }

    /// The node currently being decoded.
    pub fn node(&self) -> &'t TaggedValue {
        match self.storage.last() {
            Some(node) => node,
            None => panic!("Empty container stack."),
        }
    }

    /// Null check before descending, for optional values.
    pub fn is_null(&self) -> bool {
        self.node().is_null()
    }

    pub fn keyed_container(&mut self) -> Result<KeyedDecoder<'_, 't>, DecodeError> {
        let entries = expect_dictionary(self.node(), &self.path)?;
        let path = self.path.clone();
        Ok(KeyedDecoder::new(self, entries, path))
    }

    pub fn unkeyed_container(&mut self) -> Result<UnkeyedDecoder<'_, 't>, DecodeError> {
        let items = expect_array(self.node(), &self.path)?;
        let path = self.path.clone();
        Ok(UnkeyedDecoder::new(self, items, path))
    }

    pub fn single_value_container(&mut self) -> SingleValueDecoder<'_, 't> {
        SingleValueDecoder { decoder: self }
    }

    /// Decodes `T` from `value` with the node pushed for the duration.
    pub(crate) fn unbox<T: Decode>(&mut self, value: &'t TaggedValue) -> Result<T, DecodeError> {
        self.storage.push(value);
        let result = T::decode(self);
        self.storage.pop();
        result
    }

    /// Like [`Decoder::unbox`], reporting failures under `path`.
    fn unbox_at<T: Decode>(&mut self, path: FieldPath, value: &'t TaggedValue) -> Result<T, DecodeError> {
        let saved = std::mem::replace(&mut self.path, path);
        let result = self.unbox(value);
        self.path = saved;
        result
    }
}

/// Reads the current node as one leaf.
pub struct SingleValueDecoder<'d, 't> {
    decoder: &'d mut Decoder<'t>,
}

impl<'t> SingleValueDecoder<'_, 't> {
    pub fn path(&self) -> &FieldPath {
        self.decoder.path()
    }

    pub fn decode_nil(&self) -> bool {
        self.decoder.is_null()
    }

    pub fn decode_primitive<P: Primitive>(&self) -> Result<P, DecodeError> {
        unbox_primitive(self.decoder.node(), &self.decoder.path)
    }

    pub fn decode<T: Decode>(&mut self) -> Result<T, DecodeError> {
        let node = self.decoder.node();
        self.decoder.unbox(node)
    }
}

/// Tag-checked leaf conversion: null first, then tag, then range.
pub(crate) fn unbox_primitive<P: Primitive>(value: &TaggedValue, path: &FieldPath) -> Result<P, DecodeError> {
    let found = value.tag();
    if found == Tag::Null {
        return Err(DecodeError::NullValueFound {
            path: path.clone(),
            expected: P::TYPE_NAME,
        });
    }
    if found != P::TAG {
        return Err(DecodeError::TypeMismatch {
            path: path.clone(),
            expected: P::TAG,
            found,
        });
    }
    P::from_tagged(value).ok_or_else(|| DecodeError::ValueOutOfRange {
        path: path.clone(),
        raw: value.clone(),
        target: P::TYPE_NAME,
    })
}

pub(crate) fn expect_dictionary<'t>(
    value: &'t TaggedValue,
    path: &FieldPath,
) -> Result<&'t Dictionary, DecodeError> {
    match value {
        TaggedValue::Dictionary(entries) => Ok(entries),
        TaggedValue::Null => Err(DecodeError::NullValueFound {
            path: path.clone(),
            expected: "keyed container",
        }),
        other => Err(DecodeError::TypeMismatch {
            path: path.clone(),
            expected: Tag::Dictionary,
            found: other.tag(),
        }),
    }
}

pub(crate) fn expect_array<'t>(
    value: &'t TaggedValue,
    path: &FieldPath,
) -> Result<&'t [TaggedValue], DecodeError> {
    match value {
        TaggedValue::Array(items) => Ok(items),
        TaggedValue::Null => Err(DecodeError::NullValueFound {
            path: path.clone(),
            expected: "unkeyed container",
        }),
        other => Err(DecodeError::TypeMismatch {
            path: path.clone(),
            expected: Tag::Array,
            found: other.tag(),
        }),
    }
}
