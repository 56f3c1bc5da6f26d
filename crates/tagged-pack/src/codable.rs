//! [`Encode`] / [`Decode`] capabilities and their implementations for
//! standard library types.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use indexmap::IndexMap;
use uuid::Uuid;

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{DecodeError, EncodeError};
use crate::primitive::Primitive;
use crate::value::{Bytes, Handle, TaggedValue, Timestamp};

/// A value that knows how to describe itself to an [`Encoder`].
pub trait Encode {
    fn encode(&self, encoder: &mut Encoder) -> Result<(), EncodeError>;

    /// Fixed tagged form for types that never need a generic traversal.
    /// The encoder uses it in place of [`Encode::encode`] when present.
    fn direct_representation(&self) -> Option<TaggedValue> {
        None
    }
}

/// A value that can be rebuilt from a [`Decoder`].
pub trait Decode: Sized {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError>;
}

/// Leaves that go through the single-value container.
macro_rules! leaf_codable {
    ($($ty:ty),*) => {$(
        impl Encode for $ty {
            fn encode(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
                encoder.single_value_container().encode_primitive(self);
                Ok(())
            }
        }

        impl Decode for $ty {
            fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
                decoder.single_value_container().decode_primitive()
            }
        }
    )*};
}

/// Leaves with a direct tagged form.
macro_rules! direct_codable {
    ($($ty:ty),*) => {$(
        impl Encode for $ty {
            fn encode(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
                encoder.single_value_container().encode_primitive(self);
                Ok(())
            }

            fn direct_representation(&self) -> Option<TaggedValue> {
                Some(self.to_tagged())
            }
        }

        impl Decode for $ty {
            fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
                decoder.single_value_container().decode_primitive()
            }
        }
    )*};
}

leaf_codable!(i8, i16, i32, isize, u8, u16, u32, usize, f32);
direct_codable!(bool, i64, u64, f64, String, Timestamp, Uuid, Bytes, Handle);

impl Encode for str {
    fn encode(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
        encoder.single_value_container().encode_primitive(&self.to_owned());
        Ok(())
    }

    fn direct_representation(&self) -> Option<TaggedValue> {
        Some(TaggedValue::String(self.to_owned()))
    }
}

impl Encode for TaggedValue {
    fn encode(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
        encoder.single_value_container().encode_tagged(self.clone());
        Ok(())
    }

    fn direct_representation(&self) -> Option<TaggedValue> {
        Some(self.clone())
    }
}

impl Decode for TaggedValue {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        Ok(decoder.node().clone())
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
        (**self).encode(encoder)
    }

    fn direct_representation(&self) -> Option<TaggedValue> {
        (**self).direct_representation()
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
        (**self).encode(encoder)
    }

    fn direct_representation(&self) -> Option<TaggedValue> {
        (**self).direct_representation()
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        T::decode(decoder).map(Box::new)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
        let mut single = encoder.single_value_container();
        match self {
            Some(value) => single.encode(value),
            None => {
                single.encode_nil();
                Ok(())
            }
        }
    }

    fn direct_representation(&self) -> Option<TaggedValue> {
        match self {
            Some(value) => value.direct_representation(),
            None => Some(TaggedValue::Null),
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        if decoder.is_null() {
            return Ok(None);
        }
        T::decode(decoder).map(Some)
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
        let mut seq = encoder.unkeyed_container();
        for item in self {
            seq.encode(item)?;
        }
        Ok(())
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
        self.as_slice().encode(encoder)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        let mut seq = decoder.unkeyed_container()?;
        let mut out = Vec::with_capacity(seq.count());
        while !seq.is_at_end() {
            out.push(seq.decode()?);
        }
        Ok(out)
    }
}

fn encode_entries<'v, T, I>(encoder: &mut Encoder, entries: I) -> Result<(), EncodeError>
where
    T: Encode + 'v,
    I: IntoIterator<Item = (&'v String, &'v T)>,
{
    let mut keyed = encoder.keyed_container();
    for (key, value) in entries {
        keyed.encode(key, value)?;
    }
    Ok(())
}

fn decode_entries<T: Decode, C: FromIterator<(String, T)>>(decoder: &mut Decoder<'_>) -> Result<C, DecodeError> {
    let mut keyed = decoder.keyed_container()?;
    let keys = keyed.all_keys();
    let mut entries: Vec<(String, T)> = Vec::with_capacity(keys.len());
    for key in keys {
        entries.push((key.to_owned(), keyed.decode_entry(key)?));
    }
    Ok(entries.into_iter().collect())
}

impl<T: Encode, S> Encode for HashMap<String, T, S> {
    fn encode(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
        encode_entries(encoder, self)
    }
}

impl<T: Decode, S: BuildHasher + Default> Decode for HashMap<String, T, S> {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        decode_entries(decoder)
    }
}

impl<T: Encode> Encode for BTreeMap<String, T> {
    fn encode(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
        encode_entries(encoder, self)
    }
}

impl<T: Decode> Decode for BTreeMap<String, T> {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        decode_entries(decoder)
    }
}

impl<T: Encode, S> Encode for IndexMap<String, T, S> {
    fn encode(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
        encode_entries(encoder, self)
    }
}

impl<T: Decode, S: BuildHasher + Default> Decode for IndexMap<String, T, S> {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        decode_entries(decoder)
    }
}
