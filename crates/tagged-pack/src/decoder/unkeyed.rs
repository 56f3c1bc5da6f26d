use crate::codable::Decode;
use crate::error::DecodeError;
use crate::path::FieldPath;
use crate::primitive::Primitive;
use crate::value::TaggedValue;

use super::keyed::KeyedDecoder;
use super::{expect_array, expect_dictionary, unbox_primitive, Decoder};

/// Cursor over an array node. The cursor only moves forward; every
/// successful read advances it by one element.
pub struct UnkeyedDecoder<'d, 't> {
    decoder: &'d mut Decoder<'t>,
    items: &'t [TaggedValue],
    path: FieldPath,
    current_index: usize,
}

impl<'d, 't> UnkeyedDecoder<'d, 't> {
    pub(super) fn new(decoder: &'d mut Decoder<'t>, items: &'t [TaggedValue], path: FieldPath) -> Self {
        Self {
            decoder,
            items,
            path,
            current_index: 0,
        }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_at_end(&self) -> bool {
        self.current_index >= self.items.len()
    }

    fn current_path(&self) -> FieldPath {
        self.path.child(self.current_index)
    }

    fn current(&self) -> Result<&'t TaggedValue, DecodeError> {
        self.items
            .get(self.current_index)
            .ok_or_else(|| DecodeError::SequenceExhausted {
                path: self.current_path(),
            })
    }

    /// Consumes the element only when it is null.
    pub fn decode_nil(&mut self) -> Result<bool, DecodeError> {
        if self.current()?.is_null() {
            self.current_index += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn decode_primitive<P: Primitive>(&mut self) -> Result<P, DecodeError> {
        let value = unbox_primitive(self.current()?, &self.current_path())?;
        self.current_index += 1;
        Ok(value)
    }

    pub fn decode<T: Decode>(&mut self) -> Result<T, DecodeError> {
        let entry = self.current()?;
        let path = self.current_path();
        let value = self.decoder.unbox_at(path, entry)?;
        self.current_index += 1;
        Ok(value)
    }

    /// `None` at the end of the sequence or for a null element.
    pub fn decode_optional<T: Decode>(&mut self) -> Result<Option<T>, DecodeError> {
        if self.is_at_end() || self.decode_nil()? {
            return Ok(None);
        }
        self.decode().map(Some)
    }

    pub fn nested_keyed_container(&mut self) -> Result<KeyedDecoder<'_, 't>, DecodeError> {
        let path = self.current_path();
        let entries = expect_dictionary(self.current()?, &path)?;
        self.current_index += 1;
        Ok(KeyedDecoder::new(self.decoder, entries, path))
    }

    pub fn nested_unkeyed_container(&mut self) -> Result<UnkeyedDecoder<'_, 't>, DecodeError> {
        let path = self.current_path();
        let items = expect_array(self.current()?, &path)?;
        self.current_index += 1;
        Ok(UnkeyedDecoder::new(self.decoder, items, path))
    }

    /// Fresh decoder over the element at the cursor.
    pub fn super_decoder(&mut self) -> Result<Decoder<'t>, DecodeError> {
        let node = self.current()?;
        let path = self.current_path();
        self.current_index += 1;
        Ok(Decoder::with_path(node, path))
    }
}
