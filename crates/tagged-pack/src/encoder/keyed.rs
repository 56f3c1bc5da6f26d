use crate::codable::Encode;
use crate::error::EncodeError;
use crate::path::{FieldPath, PathSegment, SUPER_KEY};
use crate::primitive::Primitive;
use crate::value::TaggedValue;

use super::referencing::ReferencingEncoder;
use super::storage::{set_slot, Location};
use super::unkeyed::UnkeyedEncoder;
use super::Encoder;

/// Handle onto a dictionary under construction.
pub struct KeyedEncoder<'a> {
    encoder: &'a mut Encoder,
    location: Location,
    path: FieldPath,
}

impl<'a> KeyedEncoder<'a> {
    pub(super) fn new(encoder: &'a mut Encoder, location: Location, path: FieldPath) -> Self {
        Self {
            encoder,
            location,
            path,
        }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    fn set(&mut self, key: &str, value: TaggedValue) {
        let node = self.encoder.node_mut(&self.location);
        set_slot(node, PathSegment::Key(key.to_owned()), value);
    }

    pub fn encode_nil(&mut self, key: &str) {
        self.set(key, TaggedValue::Null);
    }

    pub fn encode_primitive<P: Primitive>(&mut self, key: &str, value: &P) {
        self.set(key, value.to_tagged());
    }

    pub fn encode<T: Encode + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), EncodeError> {
        let boxed = self.encoder.box_at(PathSegment::Key(key.to_owned()), value)?;
        self.set(key, boxed);
        Ok(())
    }

    /// Skips the key entirely for `None`.
    pub fn encode_if_present<T: Encode>(&mut self, key: &str, value: &Option<T>) -> Result<(), EncodeError> {
        match value {
            Some(value) => self.encode(key, value),
            None => Ok(()),
        }
    }

    pub fn nested_keyed_container(&mut self, key: &str) -> KeyedEncoder<'_> {
        self.set(key, TaggedValue::empty_dictionary());
        let segment = PathSegment::Key(key.to_owned());
        KeyedEncoder::new(
            self.encoder,
            self.location.child(segment.clone()),
            self.path.child(segment),
        )
    }

    pub fn nested_unkeyed_container(&mut self, key: &str) -> UnkeyedEncoder<'_> {
        self.set(key, TaggedValue::empty_array());
        let segment = PathSegment::Key(key.to_owned());
        UnkeyedEncoder::new(
            self.encoder,
            self.location.child(segment.clone()),
            self.path.child(segment),
        )
    }

    /// Encoder committing into [`SUPER_KEY`] when released.
    pub fn super_encoder(&mut self) -> ReferencingEncoder<'_> {
        self.super_encoder_for_key(SUPER_KEY)
    }

    /// Encoder committing into `key` when released.
    pub fn super_encoder_for_key(&mut self, key: &str) -> ReferencingEncoder<'_> {
        ReferencingEncoder::new(
            self.encoder,
            self.location.clone(),
            &self.path,
            PathSegment::Key(key.to_owned()),
        )
    }
}
