use crate::codable::Decode;
use crate::error::DecodeError;
use crate::path::{FieldPath, SUPER_KEY};
use crate::primitive::Primitive;
use crate::value::{Dictionary, TaggedValue};

use super::unkeyed::UnkeyedDecoder;
use super::{expect_array, expect_dictionary, unbox_primitive, Decoder, NULL_NODE};

/// Reader over a dictionary node.
pub struct KeyedDecoder<'d, 't> {
    decoder: &'d mut Decoder<'t>,
    entries: &'t Dictionary,
    path: FieldPath,
}

impl<'d, 't> KeyedDecoder<'d, 't> {
    pub(super) fn new(decoder: &'d mut Decoder<'t>, entries: &'t Dictionary, path: FieldPath) -> Self {
        Self {
            decoder,
            entries,
            path,
        }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn all_keys(&self) -> Vec<&'t str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn entry(&self, key: &str) -> Result<&'t TaggedValue, DecodeError> {
        self.entries.get(key).ok_or_else(|| DecodeError::KeyNotFound {
            path: self.path.clone(),
            key: key.to_owned(),
        })
    }

    /// Whether the entry at `key` is null. Missing keys are an error.
    pub fn decode_nil(&self, key: &str) -> Result<bool, DecodeError> {
        Ok(self.entry(key)?.is_null())
    }

    pub fn decode_primitive<P: Primitive>(&self, key: &str) -> Result<P, DecodeError> {
        let entry = self.entry(key)?;
        unbox_primitive(entry, &self.path.child(key))
    }

    pub fn decode<T: Decode>(&mut self, key: &str) -> Result<T, DecodeError> {
        let entry = self.entry(key)?;
        let path = self.path.child(key);
        if entry.is_null() {
            return Err(DecodeError::NullValueFound {
                path,
                expected: std::any::type_name::<T>(),
            });
        }
        self.decoder.unbox_at(path, entry)
    }

    /// Like [`KeyedDecoder::decode`] but hands null entries to `T`, so
    /// optional values read them as `None`.
    pub(crate) fn decode_entry<T: Decode>(&mut self, key: &str) -> Result<T, DecodeError> {
        let entry = self.entry(key)?;
        let path = self.path.child(key);
        self.decoder.unbox_at(path, entry)
    }

    /// Absent and null entries both decode as `None`.
    pub fn decode_optional<T: Decode>(&mut self, key: &str) -> Result<Option<T>, DecodeError> {
        match self.entries.get(key) {
            None | Some(TaggedValue::Null) => Ok(None),
            Some(_) => self.decode(key).map(Some),
        }
    }

    pub fn nested_keyed_container(&mut self, key: &str) -> Result<KeyedDecoder<'_, 't>, DecodeError> {
        let path = self.path.child(key);
        let entries = expect_dictionary(self.entry(key)?, &path)?;
        Ok(KeyedDecoder::new(self.decoder, entries, path))
    }

    pub fn nested_unkeyed_container(&mut self, key: &str) -> Result<UnkeyedDecoder<'_, 't>, DecodeError> {
        let path = self.path.child(key);
        let items = expect_array(self.entry(key)?, &path)?;
        Ok(UnkeyedDecoder::new(self.decoder, items, path))
    }

    /// Fresh decoder over the [`SUPER_KEY`] entry (null when absent).
    pub fn super_decoder(&self) -> Decoder<'t> {
        self.super_decoder_for_key(SUPER_KEY)
    }

    /// Fresh decoder over the `key` entry (null when absent).
    pub fn super_decoder_for_key(&self, key: &str) -> Decoder<'t> {
        let node = self.entries.get(key).unwrap_or(&NULL_NODE);
        Decoder::with_path(node, self.path.child(key))
    }
}

#[cfg(test)]
mod tests {
    use crate::decoder::Decoder;
    use crate::error::DecodeError;
    use crate::path::FieldPath;
    use crate::value::{Tag, TaggedValue};

    fn sample() -> TaggedValue {
        let inner: TaggedValue = vec![("deep".to_owned(), TaggedValue::Bool(true))]
            .into_iter()
            .collect();
        vec![
            ("a".to_owned(), TaggedValue::Int64(1)),
            ("n".to_owned(), TaggedValue::Null),
            ("inner".to_owned(), inner),
            (
                "list".to_owned(),
                TaggedValue::Array(vec![TaggedValue::UInt64(9)]),
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn reads_entries_and_reports_missing_keys() {
        let tree = sample();
        let mut decoder = Decoder::new(&tree);
        let mut keyed = decoder.keyed_container().unwrap();
        assert_eq!(keyed.all_keys(), vec!["a", "n", "inner", "list"]);
        assert!(keyed.contains("a"));
        assert!(!keyed.contains("zzz"));
        assert_eq!(keyed.decode_primitive::<i32>("a"), Ok(1));
        assert_eq!(keyed.decode_nil("n"), Ok(true));
        assert_eq!(keyed.decode_optional::<i64>("n"), Ok(None));
        assert_eq!(keyed.decode_optional::<i64>("zzz"), Ok(None));
        assert_eq!(keyed.decode_optional::<i64>("a"), Ok(Some(1)));
        assert_eq!(
            keyed.decode::<i64>("zzz"),
            Err(DecodeError::KeyNotFound {
                path: FieldPath::root(),
                key: "zzz".into(),
            })
        );
        assert!(matches!(
            keyed.decode::<String>("n"),
            Err(DecodeError::NullValueFound { .. })
        ));
    }

    #[test]
    fn nested_containers_extend_the_path() {
        let tree = sample();
        let mut decoder = Decoder::new(&tree);
        let mut keyed = decoder.keyed_container().unwrap();
        {
            let inner = keyed.nested_keyed_container("inner").unwrap();
            assert_eq!(inner.path().to_string(), "inner");
            assert_eq!(inner.decode_primitive::<bool>("deep"), Ok(true));
            assert_eq!(
                inner.decode_primitive::<i64>("deep"),
                Err(DecodeError::TypeMismatch {
                    path: FieldPath::root().child("inner").child("deep"),
                    expected: Tag::Int64,
                    found: Tag::Bool,
                })
            );
        }
        {
            let mut list = keyed.nested_unkeyed_container("list").unwrap();
            assert_eq!(list.decode_primitive::<u64>(), Ok(9));
            assert!(list.is_at_end());
        }
        assert!(matches!(
            keyed.nested_unkeyed_container("a"),
            Err(DecodeError::TypeMismatch {
                expected: Tag::Array,
                ..
            })
        ));
    }

    #[test]
    fn super_decoder_treats_absence_as_null() {
        let tree = sample();
        let mut decoder = Decoder::new(&tree);
        let keyed = decoder.keyed_container().unwrap();
        let absent = keyed.super_decoder();
        assert!(absent.is_null());
        assert_eq!(absent.path().to_string(), "super");
        let mut present = keyed.super_decoder_for_key("inner");
        let inner = present.keyed_container().unwrap();
        assert_eq!(inner.decode_primitive::<bool>("deep"), Ok(true));
    }
}
