//! Generic lazy, memoizing store over one keyed record resource.
//!
//! Opening a store scans only the keys. Records are decoded on first lookup
//! and memoized by code; concurrent readers may decode the same record twice,
//! but only the first decoded value is kept and the lock is never held while
//! decoding.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::codec::RecordIndex;
use crate::error::DecodeError;
use crate::model::Code;

/// Decodes the data bytes of one record.
pub type Decoder<V> = Box<dyn Fn(Code, &[u8]) -> Result<V, DecodeError> + Send + Sync>;

/// When records are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Decode each record on first lookup.
    #[default]
    Lazy,
    /// Decode every record while opening; malformed records fail the open.
    Eager,
}

pub struct KeyedStore<V> {
    data: Arc<[u8]>,
    index: RecordIndex,
    decoder: Decoder<V>,
    cache: RwLock<FxHashMap<Code, Arc<V>>>,
}

impl<V> fmt::Debug for KeyedStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedStore")
            .field("name", &self.index.name())
            .field("records", &self.index.len())
            .field("cached", &self.cached_len())
            .finish()
    }
}

impl<V> KeyedStore<V> {
    /// Scans the resource keys; with [`LoadMode::Eager`] also decodes every record.
    pub fn open<F>(name: &'static str, data: Arc<[u8]>, mode: LoadMode, decoder: F) -> Result<Self, DecodeError>
    where
        F: Fn(Code, &[u8]) -> Result<V, DecodeError> + Send + Sync + 'static,
    {
        let index = RecordIndex::scan(name, &data)?;
        let store = Self {
            data,
            index,
            decoder: Box::new(decoder),
            cache: RwLock::new(FxHashMap::default()),
        };
        if mode == LoadMode::Eager {
            for value in store.values() {
                value?;
            }
        }
        tracing::debug!(resource = name, records = store.len(), ?mode, "opened keyed store");
        Ok(store)
    }

    pub fn name(&self) -> &'static str {
        self.index.name()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// All keys in ascending order.
    pub fn keys(&self) -> &[Code] {
        self.index.keys()
    }

    pub fn contains(&self, code: Code) -> bool {
        self.index.ordinal(code).is_some()
    }

    /// Number of records decoded so far.
    pub fn cached_len(&self) -> usize {
        self.cache.read().len()
    }

    /// Looks up a record. An absent code is `Ok(None)`.
    pub fn get(&self, code: Code) -> Result<Option<Arc<V>>, DecodeError> {
        if let Some(value) = self.cache.read().get(&code) {
            return Ok(Some(Arc::clone(value)));
        }
        let Some(ordinal) = self.index.ordinal(code) else {
            return Ok(None);
        };
        self.load(ordinal, code).map(Some)
    }

    fn get_at(&self, ordinal: usize, code: Code) -> Result<Arc<V>, DecodeError> {
        if let Some(value) = self.cache.read().get(&code) {
            return Ok(Arc::clone(value));
        }
        self.load(ordinal, code)
    }

    fn load(&self, ordinal: usize, code: Code) -> Result<Arc<V>, DecodeError> {
        let record = self.index.record(&self.data, ordinal)?;
        let value = Arc::new((self.decoder)(code, record)?);
        let mut cache = self.cache.write();
        Ok(Arc::clone(cache.entry(code).or_insert(value)))
    }

    /// Every record in ascending key order, decoding and caching as it goes.
    pub fn values(&self) -> Values<'_, V> {
        Values {
            store: self,
            ordinal: 0,
        }
    }

    /// `(key, data bytes)` of every record, without decoding.
    pub fn raw_records(&self) -> impl Iterator<Item = Result<(Code, &[u8]), DecodeError>> + '_ {
        self.index
            .keys()
            .iter()
            .enumerate()
            .map(|(ordinal, &code)| self.index.record(&self.data, ordinal).map(|data| (code, data)))
    }
}

/// Iterator over the records of a [`KeyedStore`], in ascending key order.
pub struct Values<'a, V> {
    store: &'a KeyedStore<V>,
    ordinal: usize,
}

impl<V> Iterator for Values<'_, V> {
    type Item = Result<Arc<V>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let code = *self.store.keys().get(self.ordinal)?;
        let ordinal = self.ordinal;
        self.ordinal += 1;
        Some(self.store.get_at(ordinal, code))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.store.len() - self.ordinal;
        (remaining, Some(remaining))
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{write_keyed_resource, Reader};

    #[derive(Debug, Clone, PartialEq)]
    struct Record {
        code: Code,
        value: u16,
    }

    fn decode(code: Code, data: &[u8]) -> Result<Record, DecodeError> {
        let mut reader = Reader::new(data);
        Ok(Record {
            code,
            value: reader.read_u16("value")?,
        })
    }

    fn resource(codes: &[Code]) -> Arc<[u8]> {
        let records: Vec<_> = codes
            .iter()
            .map(|&c| (c, (c as u16).wrapping_mul(3).to_le_bytes().to_vec()))
            .collect();
        write_keyed_resource(2, 2, &records).unwrap().into()
    }

    #[test]
    fn test_lookup_roundtrip() {
        let store = KeyedStore::open("test.dat", resource(&[9001, 9101, 9201]), LoadMode::Lazy, decode).unwrap();
        for &code in store.keys() {
            let record = store.get(code).unwrap().unwrap();
            assert_eq!(record.code, code);
        }
        assert_eq!(store.get(9002).unwrap(), None);
        assert!(!store.contains(0));
    }

    #[test]
    fn test_lazy_decoding_and_memoization() {
        let store = KeyedStore::open("test.dat", resource(&[1, 2, 3]), LoadMode::Lazy, decode).unwrap();
        assert_eq!(store.cached_len(), 0);
        let a = store.get(2).unwrap().unwrap();
        let b = store.get(2).unwrap().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(store.cached_len(), 1);
    }

    #[test]
    fn test_values_ascending_and_restartable() {
        let store = KeyedStore::open("test.dat", resource(&[5, 40, 700]), LoadMode::Lazy, decode).unwrap();
        let first: Vec<Code> = store.values().map(|r| r.unwrap().code).collect();
        assert_eq!(first, vec![5, 40, 700]);
        assert_eq!(store.cached_len(), 3);
        let second: Vec<Code> = store.values().map(|r| r.unwrap().code).collect();
        assert_eq!(first, second);
        assert_eq!(store.values().len(), 3);
    }

    #[test]
    fn test_eager_mode_surfaces_bad_records() {
        let failing = |code: Code, _: &[u8]| -> Result<Record, DecodeError> {
            if code == 40 {
                Err(DecodeError::InvalidTag { field: "test", value: 0 })
            } else {
                Ok(Record { code, value: 0 })
            }
        };
        let data = resource(&[5, 40]);
        assert!(KeyedStore::open("test.dat", Arc::clone(&data), LoadMode::Lazy, failing).is_ok());
        assert!(matches!(
            KeyedStore::open("test.dat", data, LoadMode::Eager, failing),
            Err(DecodeError::InvalidTag { .. })
        ));
    }

    #[test]
    fn test_concurrent_readers_agree() {
        let codes: Vec<Code> = (1..=200).collect();
        let store = KeyedStore::open("test.dat", resource(&codes), LoadMode::Lazy, decode).unwrap();
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for &code in &codes {
                        let record = store.get(code).unwrap().unwrap();
                        assert_eq!(record.value, (code as u16).wrapping_mul(3));
                    }
                });
            }
        });
        assert_eq!(store.cached_len(), codes.len());
        let first = store.get(17).unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &store.get(17).unwrap().unwrap()));
    }

    #[test]
    fn test_raw_records() {
        let store = KeyedStore::open("test.dat", resource(&[10, 20]), LoadMode::Lazy, decode).unwrap();
        let raw: Vec<(Code, Vec<u8>)> = store
            .raw_records()
            .map(|r| r.map(|(code, data)| (code, data.to_vec())))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(raw, vec![(10, 30u16.to_le_bytes().to_vec()), (20, 60u16.to_le_bytes().to_vec())]);
        assert_eq!(store.cached_len(), 0);
    }
}
