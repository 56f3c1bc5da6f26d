//! Encoding engine: typed values → [`TaggedValue`].
//!
//! An [`Encoder`] owns a stack of in-progress containers and a field path.
//! Each value being encoded may commit at most one container (or leaf) per
//! path level. Requesting the same shape again at the same level returns a
//! handle to the node already on the stack; requesting a different shape is
//! a traversal bug and panics.

mod keyed;
mod referencing;
mod storage;
mod unkeyed;

pub use keyed::KeyedEncoder;
pub use referencing::ReferencingEncoder;
pub use unkeyed::UnkeyedEncoder;

use crate::codable::Encode;
use crate::error::EncodeError;
use crate::path::{FieldPath, PathSegment};
use crate::primitive::Primitive;
use crate::value::{Tag, TaggedValue};

use storage::{ContainerStack, Location};

#[derive(Debug, Default)]
pub struct Encoder {
    storage: ContainerStack,
    path: FieldPath,
    /// Path length inherited from a parent encoder; zero for a root encoder.
    base: usize,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_path(path: FieldPath) -> Self {
        let base = path.len();
        Self {
            storage: ContainerStack::default(),
            path,
            base,
        }
    }

    /// Current field path.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Builds a custom error positioned at the current path.
    pub fn error(&self, message: impl Into<String>) -> EncodeError {
        EncodeError::custom(self.path.clone(), message)
    }

    /// True while nothing has been committed at the current path.
    fn can_encode_new_value(&self) -> bool {
        self.storage.len() == self.path.len() - self.base
    }

    fn top_container(&mut self, tag: Tag) -> usize {
        if self.can_encode_new_value() {
            let fresh = match tag {
                Tag::Dictionary => TaggedValue::empty_dictionary(),
                _ => TaggedValue::empty_array(),
            };
            return self.storage.push(fresh);
        }
        match self.storage.last() {
            Some(existing) if existing.tag() == tag => self.storage.len() - 1,
            _ => panic!(
                "Attempt to push new {} encoding container when already previously encoded at this path.",
                if tag == Tag::Dictionary { "keyed" } else { "unkeyed" }
            ),
        }
    }

    /// Opens (or reopens) the dictionary for the value being encoded.
    pub fn keyed_container(&mut self) -> KeyedEncoder<'_> {
        let depth = self.top_container(Tag::Dictionary);
        let path = self.path.clone();
        KeyedEncoder::new(self, Location::top(depth), path)
    }

    /// Opens (or reopens) the array for the value being encoded.
    pub fn unkeyed_container(&mut self) -> UnkeyedEncoder<'_> {
        let depth = self.top_container(Tag::Array);
        let path = self.path.clone();
        UnkeyedEncoder::new(self, Location::top(depth), path)
    }

    /// Single-leaf view; each write is legal only once per path.
    pub fn single_value_container(&mut self) -> SingleValueEncoder<'_> {
        SingleValueEncoder { encoder: self }
    }

    fn push_single(&mut self, value: TaggedValue) {
        if !self.can_encode_new_value() {
            panic!("Attempt to encode value through single value container when previously value already encoded.");
        }
        self.storage.push(value);
    }

    /// Encodes `value` below the current path, substituting an empty
    /// dictionary when it produced nothing.
    pub(crate) fn box_value<T: Encode + ?Sized>(&mut self, value: &T) -> Result<TaggedValue, EncodeError> {
        Ok(self
            .box_optional(value)?
            .unwrap_or_else(TaggedValue::empty_dictionary))
    }

    pub(crate) fn box_optional<T: Encode + ?Sized>(
        &mut self,
        value: &T,
    ) -> Result<Option<TaggedValue>, EncodeError> {
        if let Some(direct) = value.direct_representation() {
            return Ok(Some(direct));
        }
        let depth = self.storage.len();
        if let Err(err) = value.encode(self) {
            // Drop whatever the failed value pushed so the stack is back at `depth`.
            if self.storage.len() > depth {
                self.storage.pop();
            }
            return Err(err);
        }
        if self.storage.len() > depth {
            Ok(Some(self.storage.pop()))
        } else {
            Ok(None)
        }
    }

    /// Encodes `value` with `segment` pushed onto the path for the duration.
    fn box_at<T: Encode + ?Sized>(
        &mut self,
        segment: PathSegment,
        value: &T,
    ) -> Result<TaggedValue, EncodeError> {
        self.path.push(segment);
        let result = self.box_value(value);
        self.path.pop();
        result
    }

    fn node_mut(&mut self, location: &Location) -> &mut TaggedValue {
        self.storage.node_mut(location)
    }
}

/// Writes exactly one leaf (or nested value) for the current path.
pub struct SingleValueEncoder<'a> {
    encoder: &'a mut Encoder,
}

impl SingleValueEncoder<'_> {
    pub fn path(&self) -> &FieldPath {
        self.encoder.path()
    }

    pub fn encode_nil(&mut self) {
        self.encoder.push_single(TaggedValue::Null);
    }

    pub fn encode_primitive<P: Primitive>(&mut self, value: &P) {
        self.encoder.push_single(value.to_tagged());
    }

    /// Writes an already-built node as the value at this path.
    pub fn encode_tagged(&mut self, value: TaggedValue) {
        self.encoder.push_single(value);
    }

    pub fn encode<T: Encode + ?Sized>(&mut self, value: &T) -> Result<(), EncodeError> {
        if !self.encoder.can_encode_new_value() {
            panic!("Attempt to encode value through single value container when previously value already encoded.");
        }
        let boxed = self.encoder.box_value(value)?;
        self.encoder.storage.push(boxed);
        Ok(())
    }
}
