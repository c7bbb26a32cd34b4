//! Error types for resource decoding, dataset building and loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::{Category, Code};

/// Stable error codes carried in every decode error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Invalid magic/version
    InvalidMagicOrVersion,
    /// E002: Index out of bounds
    IndexOutOfBounds,
    /// E003: Stored code does not resolve
    DanglingReference,
    /// E004: Invalid UTF-8 encoding
    InvalidUtf8,
    /// E005: Malformed record/length/tag/encoding
    MalformedEncoding,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::InvalidMagicOrVersion => "E001",
            ErrorCode::IndexOutOfBounds => "E002",
            ErrorCode::DanglingReference => "E003",
            ErrorCode::InvalidUtf8 => "E004",
            ErrorCode::MalformedEncoding => "E005",
        }
    }
}

/// Error while decoding a binary resource or one of its records.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    // === E001: Invalid magic/version ===
    #[error("[E001] {resource}: invalid magic bytes {found:?}")]
    InvalidMagic { resource: &'static str, found: [u8; 4] },

    #[error("[E001] {resource}: unsupported version {version}")]
    UnsupportedVersion { resource: &'static str, version: u8 },

    // === E002: Index out of bounds ===
    #[error("[E002] {dict} index {index} out of bounds (size: {size})")]
    IndexOutOfBounds {
        dict: &'static str,
        index: usize,
        size: usize,
    },

    // === E003: Dangling reference ===
    #[error("[E003] {category} {code} is referenced but not present")]
    DanglingReference { category: Category, code: Code },

    // === E004: Invalid UTF-8 ===
    #[error("[E004] invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    // === E005: Malformed encoding ===
    #[error("[E005] unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("[E005] varint exceeds maximum length (10 bytes)")]
    VarintTooLong,

    #[error("[E005] {resource}: unsupported key width {width}")]
    InvalidKeyWidth { resource: &'static str, width: u8 },

    #[error("[E005] {resource}: declares {declared} bytes of records but holds {actual}")]
    TruncatedResource {
        resource: &'static str,
        declared: usize,
        actual: usize,
    },

    #[error("[E005] {resource}: key {key} follows {previous}, keys must be strictly ascending")]
    KeysNotAscending {
        resource: &'static str,
        previous: Code,
        key: Code,
    },

    #[error("[E005] {resource}: record offset {offset} is out of order or past the payload")]
    InvalidRecordOffset { resource: &'static str, offset: usize },

    #[error("[E005] invalid {field} tag: {value}")]
    InvalidTag { field: &'static str, value: u8 },

    #[error("[E005] invalid number code: {code:#06x}")]
    InvalidNumberCode { code: u16 },

    #[error("[E005] unit {code} has a zero conversion denominator")]
    InvalidUnitFactors { code: Code },

    #[error("[E005] concatenated operation {code} has no steps")]
    EmptyConcatenation { code: Code },

    #[error("[E005] base CRS chain of {code} does not terminate")]
    CyclicBaseChain { code: Code },

    #[error("[E005] {category} {code} is missing its {field}")]
    MissingField {
        category: Category,
        code: Code,
        field: &'static str,
    },

    #[error("[E005] {field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    // === Loading ===
    #[error("[E001] required resource {resource} is missing")]
    MissingResource { resource: &'static str },

    #[error("[E001] dataset fingerprint does not match the expected one")]
    FingerprintMismatch,

    #[error("[E005] zstd decompression failed: {0}")]
    DecompressionFailed(String),
}

impl DecodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::InvalidMagic { .. }
            | DecodeError::UnsupportedVersion { .. }
            | DecodeError::MissingResource { .. }
            | DecodeError::FingerprintMismatch => ErrorCode::InvalidMagicOrVersion,
            DecodeError::IndexOutOfBounds { .. } => ErrorCode::IndexOutOfBounds,
            DecodeError::DanglingReference { .. } => ErrorCode::DanglingReference,
            DecodeError::InvalidUtf8 { .. } => ErrorCode::InvalidUtf8,
            _ => ErrorCode::MalformedEncoding,
        }
    }
}

/// Error while building binary resources from model values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("{category} {code} was added twice")]
    DuplicateCode { category: Category, code: Code },

    #[error("{category} code {code} does not fit the resource key width")]
    CodeOutOfRange { category: Category, code: Code },

    #[error("{table} table is full ({len} entries, maximum {max})")]
    TableOverflow {
        table: &'static str,
        len: usize,
        max: usize,
    },

    #[error("{field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("concatenated operation {code} has no steps")]
    EmptyConcatenation { code: Code },

    #[error("{category} {code} cannot be stored: {reason}")]
    Unrepresentable {
        category: Category,
        code: Code,
        reason: &'static str,
    },

    #[error("unit {code} has a zero conversion denominator")]
    InvalidUnitFactors { code: Code },

    #[error("zstd compression failed: {0}")]
    CompressionFailed(String),
}

/// Error while reading or writing a resource directory.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a directory")]
    NotADirectory { path: PathBuf },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DecodeError::InvalidMagic {
            resource: "crs.dat",
            found: *b"EPSX",
        };
        assert_eq!(err.code(), ErrorCode::InvalidMagicOrVersion);
        assert!(err.to_string().starts_with("[E001]"));

        let err = DecodeError::DanglingReference {
            category: Category::Crs,
            code: 4326,
        };
        assert_eq!(err.code().code(), "E003");
        assert_eq!(err.to_string(), "[E003] CRS 4326 is referenced but not present");

        let err = DecodeError::TruncatedResource {
            resource: "areas.dat",
            declared: 40,
            actual: 12,
        };
        assert_eq!(err.code(), ErrorCode::MalformedEncoding);
    }
}
