//! Fixed mapping between native leaf types and their [`Tag`].

use uuid::Uuid;

use crate::value::{Bytes, Handle, Tag, TaggedValue, Timestamp};

/// A native type stored as a single leaf node.
pub trait Primitive: Sized {
    const TAG: Tag;
    const TYPE_NAME: &'static str;

    fn to_tagged(&self) -> TaggedValue;

    /// Converts a node whose tag is already known to be [`Self::TAG`].
    /// Returns `None` when the stored value does not fit `Self`.
    fn from_tagged(value: &TaggedValue) -> Option<Self>;
}

macro_rules! signed_primitive {
    ($($ty:ty),*) => {$(
        impl Primitive for $ty {
            const TAG: Tag = Tag::Int64;
            const TYPE_NAME: &'static str = stringify!($ty);

            fn to_tagged(&self) -> TaggedValue {
                TaggedValue::Int64(*self as i64)
            }

            fn from_tagged(value: &TaggedValue) -> Option<Self> {
                match value {
                    TaggedValue::Int64(n) => <$ty>::try_from(*n).ok(),
                    _ => None,
                }
            }
        }
    )*};
}

macro_rules! unsigned_primitive {
    ($($ty:ty),*) => {$(
        impl Primitive for $ty {
            const TAG: Tag = Tag::UInt64;
            const TYPE_NAME: &'static str = stringify!($ty);

            fn to_tagged(&self) -> TaggedValue {
                TaggedValue::UInt64(*self as u64)
            }

            fn from_tagged(value: &TaggedValue) -> Option<Self> {
                match value {
                    TaggedValue::UInt64(n) => <$ty>::try_from(*n).ok(),
                    _ => None,
                }
            }
        }
    )*};
}

signed_primitive!(i8, i16, i32, i64, isize);
unsigned_primitive!(u8, u16, u32, u64, usize);

impl Primitive for bool {
    const TAG: Tag = Tag::Bool;
    const TYPE_NAME: &'static str = "bool";

    fn to_tagged(&self) -> TaggedValue {
        TaggedValue::Bool(*self)
    }

    fn from_tagged(value: &TaggedValue) -> Option<Self> {
        value.as_bool()
    }
}

impl Primitive for f64 {
    const TAG: Tag = Tag::Double;
    const TYPE_NAME: &'static str = "f64";

    fn to_tagged(&self) -> TaggedValue {
        TaggedValue::Double(*self)
    }

    fn from_tagged(value: &TaggedValue) -> Option<Self> {
        value.as_f64()
    }
}

impl Primitive for f32 {
    const TAG: Tag = Tag::Double;
    const TYPE_NAME: &'static str = "f32";

    fn to_tagged(&self) -> TaggedValue {
        TaggedValue::Double(f64::from(*self))
    }

    fn from_tagged(value: &TaggedValue) -> Option<Self> {
        let wide = value.as_f64()?;
        let narrow = wide as f32;
        if narrow.is_infinite() && wide.is_finite() {
            return None;
        }
        Some(narrow)
    }
}

impl Primitive for String {
    const TAG: Tag = Tag::String;
    const TYPE_NAME: &'static str = "String";

    fn to_tagged(&self) -> TaggedValue {
        TaggedValue::String(self.clone())
    }

    fn from_tagged(value: &TaggedValue) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl Primitive for Timestamp {
    const TAG: Tag = Tag::Timestamp;
    const TYPE_NAME: &'static str = "Timestamp";

    fn to_tagged(&self) -> TaggedValue {
        TaggedValue::Timestamp(*self)
    }

    fn from_tagged(value: &TaggedValue) -> Option<Self> {
        value.as_timestamp()
    }
}

impl Primitive for Uuid {
    const TAG: Tag = Tag::Uuid;
    const TYPE_NAME: &'static str = "Uuid";

    fn to_tagged(&self) -> TaggedValue {
        TaggedValue::Uuid(*self)
    }

    fn from_tagged(value: &TaggedValue) -> Option<Self> {
        value.as_uuid()
    }
}

impl Primitive for Bytes {
    const TAG: Tag = Tag::ByteArray;
    const TYPE_NAME: &'static str = "Bytes";

    fn to_tagged(&self) -> TaggedValue {
        TaggedValue::ByteArray(self.0.clone())
    }

    fn from_tagged(value: &TaggedValue) -> Option<Self> {
        value.as_bytes().map(Bytes::from)
    }
}

impl Primitive for Handle {
    const TAG: Tag = Tag::Handle;
    const TYPE_NAME: &'static str = "Handle";

    fn to_tagged(&self) -> TaggedValue {
        TaggedValue::Handle(*self)
    }

    fn from_tagged(value: &TaggedValue) -> Option<Self> {
        value.as_handle()
    }
}
