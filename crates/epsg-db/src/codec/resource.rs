//! Keyed record resources and named resource sets.
//!
//! Layout (little endian):
//!
//! ```text
//! magic "EPSG" | version u8 | key width u8 | record size u16 | count u32
//! fixed:    count x (key, record size bytes)
//! variable: count x (key, u32 offset) | payload
//! ```
//!
//! A record size of zero selects variable sizing, where record `i` spans
//! from its offset to the next record's offset (or the payload end).

use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::codec::primitives::{Reader, Writer};
use crate::error::{DecodeError, EncodeError, LoadError};
use crate::limits::{FORMAT_VERSION, RECORD_HEADER_LEN, RECORD_MAGIC};
use crate::model::Code;

/// Resource file names.
pub mod names {
    pub const AREAS: &str = "areas.dat";
    pub const AREAS_TEXT: &str = "areas.txt";
    pub const UNITS: &str = "uoms.dat";
    pub const UNITS_TEXT: &str = "uoms.txt";
    pub const ELLIPSOIDS: &str = "ellipsoids.dat";
    pub const ELLIPSOIDS_TEXT: &str = "ellipsoids.txt";
    pub const MERIDIANS: &str = "meridians.dat";
    pub const MERIDIANS_TEXT: &str = "meridians.txt";
    pub const DATUMS: &str = "datums.dat";
    pub const DATUMS_TEXT: &str = "datums.txt";
    pub const COORDINATE_SYSTEMS: &str = "coordsys.dat";
    pub const COORDINATE_SYSTEMS_TEXT: &str = "coordsys.txt";
    pub const AXES: &str = "axes.dat";
    pub const AXES_TEXT: &str = "axes.txt";
    pub const CRS: &str = "crs.dat";
    pub const COMPOUND_CRS: &str = "crscmp.dat";
    pub const CRS_TEXT: &str = "crs.txt";
    pub const CONVERSIONS: &str = "opconv.dat";
    pub const TRANSFORMATIONS: &str = "optran.dat";
    pub const CONCATENATED: &str = "opcat.dat";
    pub const CONCATENATED_STEPS: &str = "oppath.dat";
    pub const OPERATIONS_TEXT: &str = "op.txt";
    pub const METHODS: &str = "opmethod.dat";
    pub const METHODS_TEXT: &str = "opmethod.txt";
    pub const METHOD_SLOTS: &str = "opmethodparams.dat";
    pub const PARAMETERS: &str = "parameters.dat";
    pub const PARAMETERS_TEXT: &str = "parameters.txt";
    pub const PARAMETER_VALUES: &str = "opparams.dat";
    pub const PARAMETER_VALUES_TEXT: &str = "opparams.txt";
    pub const NUMBERS: &str = "numbers.dat";
}

/// Extension of zstd-compressed resource files.
const COMPRESSED_SUFFIX: &str = ".zst";

/// How record boundaries are found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sizing {
    /// Every record has the same data size.
    Fixed(usize),
    /// Record offsets relative to the payload start, one per record.
    Variable { offsets: Vec<u32>, payload_start: usize },
}

/// Key index of a keyed record resource, built by one scan over the keys.
#[derive(Debug, Clone)]
pub struct RecordIndex {
    name: &'static str,
    key_width: u8,
    keys: Vec<Code>,
    sizing: Sizing,
}

// =============================================================================
// DECODING
// =============================================================================

impl RecordIndex {
    /// Validates the header and collects the keys of every record.
    pub fn scan(name: &'static str, data: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = Reader::new(data);
        let magic: [u8; 4] = reader.read_array("magic")?;
        if magic != RECORD_MAGIC {
            return Err(DecodeError::InvalidMagic {
                resource: name,
                found: magic,
            });
        }
        let version = reader.read_u8("version")?;
        if version != FORMAT_VERSION {
            return Err(DecodeError::UnsupportedVersion {
                resource: name,
                version,
            });
        }
        let key_width = reader.read_u8("key_width")?;
        if key_width != 2 && key_width != 4 {
            return Err(DecodeError::InvalidKeyWidth {
                resource: name,
                width: key_width,
            });
        }
        let record_size = reader.read_u16("record_size")? as usize;
        let count = reader.read_u32("record_count")? as usize;

        let entry_size = key_width as usize + if record_size == 0 { 4 } else { record_size };
        let declared = count.saturating_mul(entry_size);
        let actual = reader.remaining_len();
        if declared > actual {
            return Err(DecodeError::TruncatedResource {
                resource: name,
                declared,
                actual,
            });
        }

        let mut keys = Vec::with_capacity(count);
        let mut offsets = Vec::new();
        for _ in 0..count {
            let key = reader.read_key(key_width, "record_key")?;
            if let Some(&previous) = keys.last() {
                if key <= previous {
                    return Err(DecodeError::KeysNotAscending {
                        resource: name,
                        previous,
                        key,
                    });
                }
            }
            keys.push(key);
            if record_size == 0 {
                offsets.push(reader.read_u32("record_offset")?);
            } else {
                reader.skip(record_size, "record_data")?;
            }
        }

        let sizing = if record_size == 0 {
            let payload_start = reader.position();
            let payload_len = data.len() - payload_start;
            let mut previous = 0usize;
            for &offset in &offsets {
                let offset = offset as usize;
                if offset < previous || offset > payload_len {
                    return Err(DecodeError::InvalidRecordOffset {
                        resource: name,
                        offset,
                    });
                }
                previous = offset;
            }
            Sizing::Variable {
                offsets,
                payload_start,
            }
        } else {
            Sizing::Fixed(record_size)
        };

        Ok(Self {
            name,
            key_width,
            keys,
            sizing,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> &[Code] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn sizing(&self) -> &Sizing {
        &self.sizing
    }

    /// Ordinal position of a key.
    pub fn ordinal(&self, key: Code) -> Option<usize> {
        self.keys.binary_search(&key).ok()
    }

    /// Data bytes (after the key) of the record at `ordinal`.
    ///
    /// `data` must be the buffer this index was scanned from.
    pub fn record<'a>(&self, data: &'a [u8], ordinal: usize) -> Result<&'a [u8], DecodeError> {
        if ordinal >= self.keys.len() {
            return Err(DecodeError::IndexOutOfBounds {
                dict: self.name,
                index: ordinal,
                size: self.keys.len(),
            });
        }
        let width = self.key_width as usize;
        let (start, end) = match &self.sizing {
            Sizing::Fixed(size) => {
                let start = RECORD_HEADER_LEN + ordinal * (width + size) + width;
                (start, start + size)
            }
            Sizing::Variable {
                offsets,
                payload_start,
            } => {
                let start = payload_start + offsets[ordinal] as usize;
                let end = offsets
                    .get(ordinal + 1)
                    .map_or(data.len(), |&next| payload_start + next as usize);
                (start, end)
            }
        };
        data.get(start..end).ok_or(DecodeError::UnexpectedEof {
            context: self.name,
        })
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writes a keyed record resource. Records must be sorted by key; for fixed
/// sizing every record must have exactly `record_size` bytes.
pub fn write_keyed_resource(
    key_width: u8,
    record_size: usize,
    records: &[(Code, Vec<u8>)],
) -> Result<Vec<u8>, EncodeError> {
    if record_size > u16::MAX as usize {
        return Err(EncodeError::LengthExceedsLimit {
            field: "record_size",
            len: record_size,
            max: u16::MAX as usize,
        });
    }
    let mut writer = Writer::with_capacity(RECORD_HEADER_LEN + records.len() * (key_width as usize + record_size));
    writer.write_bytes(&RECORD_MAGIC);
    writer.write_u8(FORMAT_VERSION);
    writer.write_u8(key_width);
    writer.write_u16(record_size as u16);
    writer.write_u32(records.len() as u32);

    if record_size == 0 {
        let mut offset = 0usize;
        for (key, data) in records {
            writer.write_key(key_width, *key);
            writer.write_u32(offset as u32);
            offset += data.len();
        }
        if offset > u32::MAX as usize {
            return Err(EncodeError::LengthExceedsLimit {
                field: "payload",
                len: offset,
                max: u32::MAX as usize,
            });
        }
        for (_, data) in records {
            writer.write_bytes(data);
        }
    } else {
        for (key, data) in records {
            if data.len() != record_size {
                return Err(EncodeError::LengthExceedsLimit {
                    field: "record",
                    len: data.len(),
                    max: record_size,
                });
            }
            writer.write_key(key_width, *key);
            writer.write_bytes(data);
        }
    }
    Ok(writer.into_bytes())
}

// =============================================================================
// RESOURCE SETS
// =============================================================================

/// A named set of resource buffers making up one dataset edition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resources {
    files: BTreeMap<String, Arc<[u8]>>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Arc<[u8]>>) {
        self.files.insert(name.into(), data.into());
    }

    pub fn get(&self, name: &str) -> Option<&Arc<[u8]>> {
        self.files.get(name)
    }

    /// Returns a resource that must be present.
    pub fn require(&self, name: &'static str) -> Result<Arc<[u8]>, DecodeError> {
        self.files
            .get(name)
            .cloned()
            .ok_or(DecodeError::MissingResource { resource: name })
    }

    /// Resource names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total size in bytes of all resources.
    pub fn total_size(&self) -> usize {
        self.files.values().map(|data| data.len()).sum()
    }

    /// SHA-256 over the sorted `(name, length, bytes)` of every resource.
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for (name, data) in &self.files {
            hasher.update((name.len() as u64).to_le_bytes());
            hasher.update(name.as_bytes());
            hasher.update((data.len() as u64).to_le_bytes());
            hasher.update(data);
        }
        hasher.finalize().into()
    }

    /// Loads every `.dat`/`.txt` file of a directory; `.zst` variants are
    /// decompressed and stored under the name without the suffix.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(LoadError::NotADirectory {
                path: path.to_path_buf(),
            });
        }
        let io_err = |source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut resources = Resources::new();
        for entry in fs::read_dir(path).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let file_path = entry.path();
            let Some(file_name) = file_path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let (name, compressed) = match file_name.strip_suffix(COMPRESSED_SUFFIX) {
                Some(stem) => (stem.to_string(), true),
                None => (file_name.to_string(), false),
            };
            if !(name.ends_with(".dat") || name.ends_with(".txt")) {
                tracing::warn!(file = %file_path.display(), "skipping unrecognized resource file");
                continue;
            }

            let raw = fs::read(&file_path).map_err(|source| LoadError::Io {
                path: file_path.clone(),
                source,
            })?;
            let data = if compressed { decompress(&raw)? } else { raw };
            tracing::debug!(resource = %name, bytes = data.len(), compressed, "loaded resource");
            resources.insert(name, data);
        }
        Ok(resources)
    }

    /// Writes every resource into a directory, zstd-compressed when a level is given.
    pub fn write_dir(&self, path: impl AsRef<Path>, compression_level: Option<i32>) -> Result<(), LoadError> {
        let path = path.as_ref();
        fs::create_dir_all(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        for (name, data) in &self.files {
            let (file_name, bytes) = match compression_level {
                Some(level) => (format!("{name}{COMPRESSED_SUFFIX}"), compress(data, level)?),
                None => (name.clone(), data.to_vec()),
            };
            let file_path = path.join(file_name);
            fs::write(&file_path, bytes).map_err(|source| LoadError::Io {
                path: file_path,
                source,
            })?;
        }
        Ok(())
    }
}

fn decompress(compressed: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut decoder = zstd::Decoder::new(compressed)
        .map_err(|e| DecodeError::DecompressionFailed(e.to_string()))?;
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| DecodeError::DecompressionFailed(e.to_string()))?;
    Ok(decompressed)
}

fn compress(data: &[u8], level: i32) -> Result<Vec<u8>, EncodeError> {
    zstd::encode_all(data, level).map_err(|e| EncodeError::CompressionFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_resource() -> Vec<u8> {
        let records = vec![
            (1262, vec![1, 2, 3]),
            (1241, vec![4, 5, 6]),
            (3340, vec![7, 8, 9]),
        ];
        let mut sorted = records;
        sorted.sort_by_key(|(k, _)| *k);
        write_keyed_resource(2, 3, &sorted).unwrap()
    }

    #[test]
    fn test_scan_fixed() {
        let data = fixed_resource();
        let index = RecordIndex::scan("areas.dat", &data).unwrap();
        assert_eq!(index.keys(), &[1241, 1262, 3340]);
        assert_eq!(index.ordinal(1262), Some(1));
        assert_eq!(index.ordinal(9999), None);
        assert_eq!(index.record(&data, 1).unwrap(), &[1, 2, 3]);
        assert_eq!(index.record(&data, 2).unwrap(), &[7, 8, 9]);
    }

    #[test]
    fn test_scan_variable() {
        let records = vec![(10, vec![1]), (20, vec![]), (30, vec![2, 3, 4])];
        let data = write_keyed_resource(4, 0, &records).unwrap();
        let index = RecordIndex::scan("opparams.dat", &data).unwrap();
        assert!(matches!(index.sizing(), Sizing::Variable { .. }));
        assert_eq!(index.record(&data, 0).unwrap(), &[1]);
        assert!(index.record(&data, 1).unwrap().is_empty());
        assert_eq!(index.record(&data, 2).unwrap(), &[2, 3, 4]);
    }

    #[test]
    fn test_truncated_resource_rejected() {
        let data = fixed_resource();
        let truncated = &data[..data.len() - 2];
        assert!(matches!(
            RecordIndex::scan("areas.dat", truncated),
            Err(DecodeError::TruncatedResource { resource: "areas.dat", .. })
        ));
        assert!(matches!(
            RecordIndex::scan("areas.dat", &data[..6]),
            Err(DecodeError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_unsorted_keys_rejected() {
        let data = write_keyed_resource(2, 1, &[(5, vec![0]), (3, vec![0])]).unwrap();
        assert!(matches!(
            RecordIndex::scan("uoms.dat", &data),
            Err(DecodeError::KeysNotAscending { previous: 5, key: 3, .. })
        ));
    }

    #[test]
    fn test_bad_magic_and_version() {
        let mut data = fixed_resource();
        data[4] = 9;
        assert!(matches!(
            RecordIndex::scan("areas.dat", &data),
            Err(DecodeError::UnsupportedVersion { version: 9, .. })
        ));
        data[0] = b'X';
        assert!(matches!(
            RecordIndex::scan("areas.dat", &data),
            Err(DecodeError::InvalidMagic { .. })
        ));
    }

    #[test]
    fn test_fingerprint_is_order_independent() {
        let mut a = Resources::new();
        a.insert("b.dat", vec![2u8]);
        a.insert("a.dat", vec![1u8]);
        let mut b = Resources::new();
        b.insert("a.dat", vec![1u8]);
        b.insert("b.dat", vec![2u8]);
        assert_eq!(a.fingerprint(), b.fingerprint());

        b.insert("b.dat", vec![3u8]);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_dir_roundtrip_compressed() {
        let dir = std::env::temp_dir().join(format!("epsg-db-resource-test-{}", std::process::id()));
        let mut resources = Resources::new();
        resources.insert(names::AREAS, fixed_resource());
        resources.insert(names::AREAS_TEXT, b"EPST\x01".to_vec());

        resources.write_dir(&dir, Some(3)).unwrap();
        assert!(dir.join("areas.dat.zst").exists());
        let loaded = Resources::from_dir(&dir).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(loaded, resources);
        assert_eq!(loaded.fingerprint(), resources.fingerprint());
    }

    #[test]
    fn test_missing_resource() {
        let resources = Resources::new();
        assert_eq!(
            resources.require(names::CRS),
            Err(DecodeError::MissingResource { resource: "crs.dat" })
        );
    }
}
