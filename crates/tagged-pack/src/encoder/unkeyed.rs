use crate::codable::Encode;
use crate::error::EncodeError;
use crate::path::{FieldPath, PathSegment};
use crate::primitive::Primitive;
use crate::value::TaggedValue;

use super::keyed::KeyedEncoder;
use super::referencing::ReferencingEncoder;
use super::storage::{set_slot, Location};
use super::Encoder;

/// Handle onto an array under construction. Every write appends.
pub struct UnkeyedEncoder<'a> {
    encoder: &'a mut Encoder,
    location: Location,
    path: FieldPath,
    count: usize,
}

impl<'a> UnkeyedEncoder<'a> {
    pub(super) fn new(encoder: &'a mut Encoder, location: Location, path: FieldPath) -> Self {
        let count = match encoder.node_mut(&location) {
            TaggedValue::Array(items) => items.len(),
            _ => 0,
        };
        Self {
            encoder,
            location,
            path,
            count,
        }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Number of elements appended so far.
    pub fn count(&self) -> usize {
        self.count
    }

    fn append(&mut self, value: TaggedValue) {
        let node = self.encoder.node_mut(&self.location);
        set_slot(node, PathSegment::Index(self.count), value);
        self.count += 1;
    }

    pub fn encode_nil(&mut self) {
        self.append(TaggedValue::Null);
    }

    pub fn encode_primitive<P: Primitive>(&mut self, value: &P) {
        self.append(value.to_tagged());
    }

    pub fn encode<T: Encode + ?Sized>(&mut self, value: &T) -> Result<(), EncodeError> {
        let boxed = self.encoder.box_at(PathSegment::Index(self.count), value)?;
        self.append(boxed);
        Ok(())
    }

    pub fn nested_keyed_container(&mut self) -> KeyedEncoder<'_> {
        let segment = PathSegment::Index(self.count);
        self.append(TaggedValue::empty_dictionary());
        KeyedEncoder::new(
            self.encoder,
            self.location.child(segment.clone()),
            self.path.child(segment),
        )
    }

    pub fn nested_unkeyed_container(&mut self) -> UnkeyedEncoder<'_> {
        let segment = PathSegment::Index(self.count);
        self.append(TaggedValue::empty_array());
        UnkeyedEncoder::new(
            self.encoder,
            self.location.child(segment.clone()),
            self.path.child(segment),
        )
    }

    /// Encoder committing into the next element when released. The slot is
    /// reserved now, so later appends land after it.
    pub fn super_encoder(&mut self) -> ReferencingEncoder<'_> {
        let segment = PathSegment::Index(self.count);
        self.append(TaggedValue::Null);
        ReferencingEncoder::new(self.encoder, self.location.clone(), &self.path, segment)
    }
}
