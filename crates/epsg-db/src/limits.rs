//! Format constants and decoding limits.

/// Magic bytes of keyed record resources.
pub const RECORD_MAGIC: [u8; 4] = *b"EPSG";

/// Magic bytes of text tables.
pub const TEXT_MAGIC: [u8; 4] = *b"EPST";

/// Magic bytes of the number table.
pub const NUMBER_MAGIC: [u8; 4] = *b"EPSN";

/// Current resource format version.
pub const FORMAT_VERSION: u8 = 1;

/// Size of the keyed record header: magic, version, key width, record size, count.
pub const RECORD_HEADER_LEN: usize = 4 + 1 + 1 + 2 + 4;

/// Size of the text table header: magic, version.
pub const TEXT_HEADER_LEN: usize = 4 + 1;

/// Size of the number table header: magic, version, three section counts.
pub const NUMBER_HEADER_LEN: usize = 4 + 1 + 2 * 3;

/// Absent 16-bit reference (code, text offset, number code or unit).
pub const NO_CODE: u16 = 0xFFFF;

/// Absent 32-bit CRS reference.
pub const NO_CODE_32: u32 = 0xFFFF_FFFF;

/// Mask selecting the section tag of a number code.
pub const NUMBER_TAG_MASK: u16 = 0xC000;

/// Number code tag of the 32-bit integer section.
pub const NUMBER_TAG_I32: u16 = 0xC000;

/// Number code tag of the 16-bit integer section.
pub const NUMBER_TAG_I16: u16 = 0x4000;

/// Number code tag of the double section.
pub const NUMBER_TAG_F64: u16 = 0x0000;

/// Parameter value tag marking a text offset instead of a number code.
pub const PARAMETER_TEXT_TAG: u16 = 0x8000;

/// Mask extracting the index from a tagged number or parameter code.
pub const TAGGED_INDEX_MASK: u16 = 0x3FFF;

/// Maximum entries per number table section.
pub const MAX_NUMBER_SECTION: usize = 0x4000;

/// Maximum text table payload addressable by a 16-bit offset.
pub const MAX_TEXT_TABLE_SIZE: usize = NO_CODE as usize;

/// Maximum text addressable from a parameter value.
pub const MAX_PARAMETER_TEXT_OFFSET: usize = TAGGED_INDEX_MASK as usize;

/// Maximum byte length of a single text entry.
pub const MAX_TEXT_LEN: usize = 4096;

/// Maximum number of bytes in a varint.
pub const MAX_VARINT_BYTES: usize = 10;

/// Maximum steps of a concatenated operation.
pub const MAX_CONCATENATED_STEPS: usize = u8::MAX as usize;

/// Maximum parameter slots of an operation method.
pub const MAX_PARAMETER_SLOTS: usize = u8::MAX as usize;

/// Default bound on search hops between the source and target chains.
pub const DEFAULT_MAX_HOPS: usize = 4;

/// Base unit of length (metre).
pub const BASE_UNIT_LENGTH: u32 = 9001;

/// Base unit of angle (radian).
pub const BASE_UNIT_ANGLE: u32 = 9101;

/// Base unit of scale (unity).
pub const BASE_UNIT_SCALE: u32 = 9201;

/// Base unit of time (second).
pub const BASE_UNIT_TIME: u32 = 1040;
