//! Deduplicated text tables addressed by 16-bit offsets.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::codec::primitives::{Reader, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::limits::{
    FORMAT_VERSION, MAX_TEXT_LEN, MAX_TEXT_TABLE_SIZE, NO_CODE, TEXT_HEADER_LEN, TEXT_MAGIC,
};

/// Read side of a text table. Lookups decode on every call.
#[derive(Debug, Clone)]
pub struct TextTable {
    name: &'static str,
    data: Arc<[u8]>,
}

impl TextTable {
    pub fn open(name: &'static str, data: Arc<[u8]>) -> Result<Self, DecodeError> {
        let mut reader = Reader::new(&data);
        let magic: [u8; 4] = reader.read_array("text_magic")?;
        if magic != TEXT_MAGIC {
            return Err(DecodeError::InvalidMagic {
                resource: name,
                found: magic,
            });
        }
        let version = reader.read_u8("text_version")?;
        if version != FORMAT_VERSION {
            return Err(DecodeError::UnsupportedVersion {
                resource: name,
                version,
            });
        }
        Ok(Self { name, data })
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.data.len() - TEXT_HEADER_LEN
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text at `offset`; `0xFFFF` means no text.
    pub fn get(&self, offset: u16) -> Result<Option<String>, DecodeError> {
        if offset == NO_CODE {
            return Ok(None);
        }
        self.get_at(offset as usize).map(Some)
    }

    /// Text at `offset`, or the empty string when absent.
    pub fn get_or_empty(&self, offset: u16) -> Result<String, DecodeError> {
        Ok(self.get(offset)?.unwrap_or_default())
    }

    /// Text at an arbitrary payload offset.
    pub fn get_at(&self, offset: usize) -> Result<String, DecodeError> {
        if offset >= self.len() {
            return Err(DecodeError::IndexOutOfBounds {
                dict: self.name,
                index: offset,
                size: self.len(),
            });
        }
        Reader::at(&self.data, TEXT_HEADER_LEN + offset, self.name)?.read_string(MAX_TEXT_LEN, self.name)
    }
}

/// Write side of a text table: interns strings and hands out offsets.
#[derive(Debug, Clone)]
pub struct TextTableWriter {
    table: &'static str,
    writer: Writer,
    offsets: FxHashMap<String, u16>,
    limit: usize,
}

impl TextTableWriter {
    pub fn new(table: &'static str) -> Self {
        Self::with_limit(table, MAX_TEXT_TABLE_SIZE)
    }

    /// A table whose offsets must stay below `limit`.
    pub fn with_limit(table: &'static str, limit: usize) -> Self {
        Self {
            table,
            writer: Writer::new(),
            offsets: FxHashMap::default(),
            limit,
        }
    }

    /// Interns `text`, returning its offset. Equal strings share one entry.
    pub fn intern(&mut self, text: &str) -> Result<u16, EncodeError> {
        if let Some(&offset) = self.offsets.get(text) {
            return Ok(offset);
        }
        if text.len() > MAX_TEXT_LEN {
            return Err(EncodeError::LengthExceedsLimit {
                field: self.table,
                len: text.len(),
                max: MAX_TEXT_LEN,
            });
        }
        let offset = self.writer.len();
        if offset >= self.limit {
            return Err(EncodeError::TableOverflow {
                table: self.table,
                len: offset,
                max: self.limit,
            });
        }
        self.writer.write_string(text);
        let offset = offset as u16;
        self.offsets.insert(text.to_string(), offset);
        Ok(offset)
    }

    /// Interns an optional string, mapping None to `0xFFFF`.
    pub fn intern_opt(&mut self, text: Option<&str>) -> Result<u16, EncodeError> {
        text.map_or(Ok(NO_CODE), |t| self.intern(t))
    }

    pub fn into_bytes(self) -> Vec<u8> {
        let mut out = Writer::with_capacity(TEXT_HEADER_LEN + self.writer.len());
        out.write_bytes(&TEXT_MAGIC);
        out.write_u8(FORMAT_VERSION);
        out.write_bytes(self.writer.as_bytes());
        out.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_dedups() {
        let mut writer = TextTableWriter::new("crs.txt");
        let a = writer.intern("WGS 84").unwrap();
        let b = writer.intern("NAD27").unwrap();
        let c = writer.intern("WGS 84").unwrap();
        assert_eq!(a, c);
        assert_ne!(a, b);

        let table = TextTable::open("crs.txt", writer.into_bytes().into()).unwrap();
        assert_eq!(table.get(a).unwrap().as_deref(), Some("WGS 84"));
        assert_eq!(table.get(b).unwrap().as_deref(), Some("NAD27"));
        assert_eq!(table.get(NO_CODE).unwrap(), None);
    }

    #[test]
    fn test_offset_out_of_bounds() {
        let mut writer = TextTableWriter::new("crs.txt");
        writer.intern("x").unwrap();
        let table = TextTable::open("crs.txt", writer.into_bytes().into()).unwrap();
        assert!(matches!(
            table.get(100),
            Err(DecodeError::IndexOutOfBounds { dict: "crs.txt", index: 100, .. })
        ));
    }

    #[test]
    fn test_table_overflow() {
        let mut writer = TextTableWriter::with_limit("opparams.txt", 8);
        writer.intern("conus.las").unwrap();
        assert!(matches!(
            writer.intern("conus.los"),
            Err(EncodeError::TableOverflow { .. })
        ));
    }

    #[test]
    fn test_bad_header() {
        assert!(matches!(
            TextTable::open("op.txt", Arc::from(&b"EPSG\x01"[..])),
            Err(DecodeError::InvalidMagic { .. })
        ));
    }
}
