//! Deferred-commit encoder bound to one slot of an existing container.

use std::ops::{Deref, DerefMut};

use crate::path::{FieldPath, PathSegment};
use crate::value::TaggedValue;

use super::storage::{set_slot, Location};
use super::Encoder;

/// An ordinary [`Encoder`] (via `Deref`) whose single produced value is
/// written into its bound slot when the handle is dropped. A value that
/// produced nothing commits an empty dictionary.
///
/// ```
/// use tagged_pack::{Encode, EncodeError, Encoder};
///
/// struct Base { id: i64 }
/// struct Derived { base: Base, name: String }
///
/// impl Encode for Base {
///     fn encode(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
///         encoder.keyed_container().encode_primitive("id", &self.id);
///         Ok(())
///     }
/// }
///
/// impl Encode for Derived {
///     fn encode(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
///         let mut keyed = encoder.keyed_container();
///         keyed.encode_primitive("name", &self.name);
///         let mut sup = keyed.super_encoder();
///         self.base.encode(&mut sup)
///     }
/// }
///
/// let value = Derived { base: Base { id: 7 }, name: "n".into() };
/// let tree = tagged_pack::encode(&value, &Default::default()).unwrap();
/// assert_eq!(tree.get("super").and_then(|s| s.get("id")).and_then(|v| v.as_i64()), Some(7));
/// ```
pub struct ReferencingEncoder<'a> {
    parent: &'a mut Encoder,
    location: Location,
    slot: PathSegment,
    inner: Encoder,
}

impl<'a> ReferencingEncoder<'a> {
    /// `path` is the path of the container owning the slot.
    pub(super) fn new(parent: &'a mut Encoder, location: Location, path: &FieldPath, slot: PathSegment) -> Self {
        let inner = Encoder::with_path(path.child(slot.clone()));
        Self {
            parent,
            location,
            slot,
            inner,
        }
    }

    /// Commits now instead of at end of scope.
    pub fn finish(self) {}
}

impl Deref for ReferencingEncoder<'_> {
    type Target = Encoder;

    fn deref(&self) -> &Encoder {
        &self.inner
    }
}

impl DerefMut for ReferencingEncoder<'_> {
    fn deref_mut(&mut self) -> &mut Encoder {
        &mut self.inner
    }
}

impl Drop for ReferencingEncoder<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        let value = match self.inner.storage.len() {
            0 => TaggedValue::empty_dictionary(),
            1 => self.inner.storage.pop(),
            _ => panic!("Referencing encoder released with multiple containers on stack."),
        };
        tracing::trace!(path = %self.inner.path, tag = %value.tag(), "committing referencing encoder");
        let node = self.parent.node_mut(&self.location);
        set_slot(node, self.slot.clone(), value);
    }
}

#[cfg(test)]
mod tests {
    use crate::codable::Encode;
    use crate::encoder::Encoder;
    use crate::error::EncodeError;
    use crate::path::FieldPath;
    use crate::value::TaggedValue;

    struct Leaf(i64);

    impl Encode for Leaf {
        fn encode(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
            encoder.single_value_container().encode_primitive(&self.0);
            Ok(())
        }
    }

    struct Failing;

    impl Encode for Failing {
        fn encode(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
            encoder.keyed_container().encode_primitive("partial", &true);
            Err(encoder.error("boom"))
        }
    }

    /// Uses both flavours of super encoder and the default empty commit.
    struct Host;

    impl Encode for Host {
        fn encode(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
            let mut keyed = encoder.keyed_container();
            {
                let mut sup = keyed.super_encoder_for_key("base");
                assert_eq!(sup.path(), &FieldPath::root().child("base"));
                Leaf(5).encode(&mut sup)?;
            }
            let untouched = keyed.super_encoder();
            untouched.finish();
            let mut list = keyed.nested_unkeyed_container("list");
            list.encode_primitive(&1i64);
            {
                let mut sup = list.super_encoder();
                Leaf(2).encode(&mut sup)?;
            }
            list.encode_primitive(&3i64);
            Ok(())
        }
    }

    struct FailsInsideSuper;

    impl Encode for FailsInsideSuper {
        fn encode(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
            let mut keyed = encoder.keyed_container();
            let mut sup = keyed.super_encoder();
            Failing.encode(&mut sup)
        }
    }

    struct NestedFailsInsideSuper;

    impl Encode for NestedFailsInsideSuper {
        fn encode(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
            let mut keyed = encoder.keyed_container();
            let mut child = keyed.nested_keyed_container("child");
            {
                let mut sup = child.super_encoder();
                Leaf(1).encode(&mut sup)?;
            }
            let mut list = child.nested_unkeyed_container("list");
            let mut sup = list.super_encoder();
            Failing.encode(&mut sup)
        }
    }

    struct Overfull;

    impl Encode for Overfull {
        fn encode(&self, encoder: &mut Encoder) -> Result<(), EncodeError> {
            let mut keyed = encoder.keyed_container();
            let mut sup = keyed.super_encoder();
            // Bypasses the single-value guard by stacking two boxed values.
            sup.storage.push(TaggedValue::Null);
            sup.storage.push(TaggedValue::Null);
            Ok(())
        }
    }

    #[test]
    fn commits_into_bound_slots() {
        let out = Encoder::new().box_value(&Host).unwrap();
        assert_eq!(out.get("base"), Some(&TaggedValue::Int64(5)));
        assert_eq!(out.get("super"), Some(&TaggedValue::empty_dictionary()));
        assert_eq!(
            out.get("list"),
            Some(&TaggedValue::Array(vec![
                TaggedValue::Int64(1),
                TaggedValue::Int64(2),
                TaggedValue::Int64(3),
            ]))
        );
    }

    #[test]
    fn commits_on_error_path() {
        let mut encoder = Encoder::new();
        let err = encoder.box_optional(&FailsInsideSuper).unwrap_err();
        assert_eq!(
            err,
            EncodeError::custom(FieldPath::root().child("super"), "boom")
        );
    }

    #[test]
    fn nested_container_super_reports_container_path() {
        let mut encoder = Encoder::new();
        let err = encoder.box_optional(&NestedFailsInsideSuper).unwrap_err();
        assert_eq!(err.to_string(), "boom at child.list[0]");
        assert_eq!(encoder.path(), &FieldPath::root());
    }

    #[test]
    #[should_panic(expected = "multiple containers on stack")]
    fn multiple_values_panic_on_release() {
        let _ = Encoder::new().box_optional(&Overfull);
    }
}
