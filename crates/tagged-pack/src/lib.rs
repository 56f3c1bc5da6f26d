//! Codec between typed Rust values and a tagged interprocess message tree.
//!
//! Types describe themselves through [`Encode`] / [`Decode`] using keyed,
//! unkeyed and single-value containers. The engines turn those descriptions
//! into a [`TaggedValue`] tree and back, reporting every failure with the
//! [`FieldPath`] at which it happened.
//!
//! ```
//! use tagged_pack::{Decode, DecodeError, Decoder, Encode, EncodeError, Encoder};
//! use tagged_pack::{TaggedDecoder, TaggedEncoder};
//!
//! #[derive(Debug, PartialEq)]
//! struct Point { x: i32, y: i32 }
//!
//! impl Encode for Point {
//!     fn encode(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
//!         let mut keyed = encoder.keyed_container();
//!         keyed.encode_primitive("x", &self.x);
//!         keyed.encode_primitive("y", &self.y);
//!         Ok(())
//!     }
//! }
//!
//! impl Decode for Point {
//!     fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
//!         let keyed = decoder.keyed_container()?;
//!         Ok(Point { x: keyed.decode_primitive("x")?, y: keyed.decode_primitive("y")? })
//!     }
//! }
//!
//! let tree = TaggedEncoder::new().encode(&Point { x: 1, y: -2 }).unwrap();
//! assert_eq!(tree.to_string(), r#"{"x": 1, "y": -2}"#);
//! assert_eq!(TaggedDecoder::new().decode::<Point>(&tree).unwrap(), Point { x: 1, y: -2 });
//! ```

mod codable;
mod codec;
mod error;
mod json;
mod path;
mod policy;
mod primitive;
mod value;

pub mod channel;
pub mod decoder;
pub mod encoder;

pub use codable::{Decode, Encode};
pub use codec::{CodecConfig, TaggedDecoder, TaggedEncoder};
pub use decoder::{Decoder, KeyedDecoder, SingleValueDecoder, UnkeyedDecoder};
pub use encoder::{Encoder, KeyedEncoder, ReferencingEncoder, SingleValueEncoder, UnkeyedEncoder};
pub use error::{DecodeError, EncodeError, Error};
pub use path::{FieldPath, PathSegment, SUPER_KEY};
pub use policy::{UnwrapPolicy, WrapPolicy};
pub use primitive::Primitive;
pub use uuid::Uuid;
pub use value::{Bytes, Dictionary, Handle, Tag, TaggedValue, Timestamp};

/// Encodes `value` under `policy` with a one-off [`TaggedEncoder`].
pub fn encode<T: Encode + ?Sized>(value: &T, policy: &WrapPolicy) -> Result<TaggedValue, EncodeError> {
    TaggedEncoder::with_wrap_policy(policy.clone()).encode(value)
}

/// Decodes a `T` from `tree` under `policy` with a one-off [`TaggedDecoder`].
pub fn decode<T: Decode>(tree: &TaggedValue, policy: &UnwrapPolicy) -> Result<T, DecodeError> {
    TaggedDecoder::with_unwrap_policy(policy.clone()).decode(tree)
}
