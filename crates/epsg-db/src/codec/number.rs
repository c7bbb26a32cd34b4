//! Shared numeric constant table.
//!
//! Three sections (f64, i32, i16); a 16-bit number code carries the section
//! in its top two bits and the index in the remaining fourteen.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::codec::primitives::{Reader, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::limits::{
    FORMAT_VERSION, MAX_NUMBER_SECTION, NO_CODE, NUMBER_HEADER_LEN, NUMBER_MAGIC, NUMBER_TAG_F64,
    NUMBER_TAG_I16, NUMBER_TAG_I32, NUMBER_TAG_MASK, TAGGED_INDEX_MASK,
};

const RESOURCE: &str = "numbers.dat";

#[derive(Debug, Clone)]
pub struct NumberTable {
    data: Arc<[u8]>,
    doubles: usize,
    ints: usize,
    shorts: usize,
}

impl NumberTable {
    pub fn open(data: Arc<[u8]>) -> Result<Self, DecodeError> {
        let mut reader = Reader::new(&data);
        let magic: [u8; 4] = reader.read_array("number_magic")?;
        if magic != NUMBER_MAGIC {
            return Err(DecodeError::InvalidMagic {
                resource: RESOURCE,
                found: magic,
            });
        }
        let version = reader.read_u8("number_version")?;
        if version != FORMAT_VERSION {
            return Err(DecodeError::UnsupportedVersion {
                resource: RESOURCE,
                version,
            });
        }
        let doubles = reader.read_u16("double_count")? as usize;
        let ints = reader.read_u16("int_count")? as usize;
        let shorts = reader.read_u16("short_count")? as usize;

        let declared = doubles * 8 + ints * 4 + shorts * 2;
        let actual = reader.remaining_len();
        if declared > actual {
            return Err(DecodeError::TruncatedResource {
                resource: RESOURCE,
                declared,
                actual,
            });
        }
        Ok(Self {
            data,
            doubles,
            ints,
            shorts,
        })
    }

    /// Resolves a number code; `0xFFFF` means no value.
    pub fn get(&self, code: u16) -> Result<Option<f64>, DecodeError> {
        if code == NO_CODE {
            return Ok(None);
        }
        let index = (code & TAGGED_INDEX_MASK) as usize;
        let (section, width, size, base) = match code & NUMBER_TAG_MASK {
            NUMBER_TAG_I32 => ("numbers.i32", 4, self.ints, NUMBER_HEADER_LEN + self.doubles * 8),
            NUMBER_TAG_I16 => (
                "numbers.i16",
                2,
                self.shorts,
                NUMBER_HEADER_LEN + self.doubles * 8 + self.ints * 4,
            ),
            NUMBER_TAG_F64 => ("numbers.f64", 8, self.doubles, NUMBER_HEADER_LEN),
            _ => return Err(DecodeError::InvalidNumberCode { code }),
        };
        if index >= size {
            return Err(DecodeError::IndexOutOfBounds {
                dict: section,
                index,
                size,
            });
        }
        let mut reader = Reader::at(&self.data, base + index * width, section)?;
        let value = match width {
            4 => reader.read_i32(section)? as f64,
            2 => reader.read_i16(section)? as f64,
            _ => reader.read_f64(section)?,
        };
        Ok(Some(value))
    }

    /// Resolves a code that must hold a value.
    pub fn get_required(&self, code: u16, field: &'static str) -> Result<f64, DecodeError> {
        self.get(code)?.ok_or(DecodeError::IndexOutOfBounds {
            dict: field,
            index: code as usize,
            size: 0,
        })
    }
}

/// Interns numbers into the smallest section that holds them exactly.
#[derive(Debug, Clone, Default)]
pub struct NumberTableWriter {
    doubles: Vec<f64>,
    ints: Vec<i32>,
    shorts: Vec<i16>,
    codes: FxHashMap<u64, u16>,
}

impl NumberTableWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, value: f64) -> Result<u16, EncodeError> {
        // -0.0 keeps its sign bit, so it is stored as a double.
        let key = value.to_bits();
        if let Some(&code) = self.codes.get(&key) {
            return Ok(code);
        }
        let integral = value.fract() == 0.0 && !(value == 0.0 && value.is_sign_negative());
        let code = if integral && value >= i16::MIN as f64 && value <= i16::MAX as f64 {
            push(&mut self.shorts, value as i16, NUMBER_TAG_I16, "numbers.i16")?
        } else if integral && value >= i32::MIN as f64 && value <= i32::MAX as f64 {
            push(&mut self.ints, value as i32, NUMBER_TAG_I32, "numbers.i32")?
        } else {
            push(&mut self.doubles, value, NUMBER_TAG_F64, "numbers.f64")?
        };
        self.codes.insert(key, code);
        Ok(code)
    }

    pub fn intern_opt(&mut self, value: Option<f64>) -> Result<u16, EncodeError> {
        value.map_or(Ok(NO_CODE), |v| self.intern(v))
    }

    pub fn len(&self) -> usize {
        self.doubles.len() + self.ints.len() + self.shorts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        let mut writer = Writer::with_capacity(
            NUMBER_HEADER_LEN + self.doubles.len() * 8 + self.ints.len() * 4 + self.shorts.len() * 2,
        );
        writer.write_bytes(&NUMBER_MAGIC);
        writer.write_u8(FORMAT_VERSION);
        writer.write_u16(self.doubles.len() as u16);
        writer.write_u16(self.ints.len() as u16);
        writer.write_u16(self.shorts.len() as u16);
        for v in self.doubles {
            writer.write_f64(v);
        }
        for v in self.ints {
            writer.write_i32(v);
        }
        for v in self.shorts {
            writer.write_i16(v);
        }
        writer.into_bytes()
    }
}

fn push<T>(section: &mut Vec<T>, value: T, tag: u16, table: &'static str) -> Result<u16, EncodeError> {
    if section.len() >= MAX_NUMBER_SECTION {
        return Err(EncodeError::TableOverflow {
            table,
            len: section.len(),
            max: MAX_NUMBER_SECTION,
        });
    }
    section.push(value);
    Ok(tag | (section.len() - 1) as u16)
}
