//! EPSG geodetic reference data: compact binary store, entity model and
//! coordinate operation path generation.
//!
//! The dataset is a set of binary resources, one keyed record file per
//! entity category plus shared text and number tables. A [`Database`] opens
//! them, decodes records lazily on lookup and memoizes them. A
//! [`PathGenerator`] plans a chain of operations between two CRSs.
//!
//! # Quick Start
//!
//! ```rust
//! use epsg_db::{Database, DatabaseOptions, DatasetBuilder, PathGenerator};
//! use epsg_db::model::{
//!     Crs, CrsInfo, GeodeticCrs, GeodeticKind, Operation, OperationInfo, Transformation,
//! };
//!
//! fn geographic(code: u32, name: &str) -> Crs {
//!     Crs::Geodetic(GeodeticCrs {
//!         info: CrsInfo { code, name: name.to_string(), area: None, deprecated: false },
//!         kind: GeodeticKind::Geographic2D,
//!         coordinate_system: 6422,
//!         datum: 6326,
//!         base: None,
//!     })
//! }
//!
//! let resources = DatasetBuilder::new()
//!     .crs(geographic(4267, "NAD27"))
//!     .crs(geographic(4326, "WGS 84"))
//!     .operation(Operation::Transformation(Transformation {
//!         info: OperationInfo {
//!             code: 1173,
//!             name: "NAD27 to WGS 84 (4)".to_string(),
//!             area: None,
//!             deprecated: false,
//!             invertible: true,
//!         },
//!         source_crs: 4267,
//!         target_crs: 4326,
//!         method: 9603,
//!         accuracy: Some(10.0),
//!     }))
//!     .build()
//!     .unwrap();
//!
//! let db = Database::open(&resources, DatabaseOptions::default()).unwrap();
//! let path = PathGenerator::new(&db).generate_path(4326, 4267).unwrap().unwrap();
//! assert_eq!(path.len(), 1);
//! assert!(path.edges()[0].is_inverse());
//! assert_eq!(path.last().name(), "NAD27");
//! ```
//!
//! # Modules
//!
//! - [`model`]: Entity types (areas, units, datums, CRSs, operations)
//! - [`codec`]: Binary resource format and the dataset builder
//! - [`store`]: Lazy keyed record store
//! - [`db`]: Database handle and operation indexes
//! - [`path`]: Operation path generator
//! - [`error`]: Error types
//! - [`limits`]: Format constants and limits
//!
//! # Robustness
//!
//! Resources are validated when opened: headers, key order and declared
//! sizes are checked before any record is read. Record fields are bounds
//! checked on decode and a malformed record is reported as a
//! [`DecodeError`], never a panic.

pub mod codec;
pub mod db;
pub mod error;
pub mod limits;
pub mod model;
pub mod path;
pub mod store;

// Re-export commonly used types at crate root
pub use codec::{DatasetBuilder, Resources};
pub use db::{Database, DatabaseOptions};
pub use error::{DecodeError, EncodeError, ErrorCode, LoadError};
pub use model::{
    Area, Category, Code, CoordinateSystem, Crs, CrsKind, Datum, Ellipsoid, Operation,
    OperationCode, OperationKind, OperationMethod, OperationRef, Parameter, PrimeMeridian, Unit,
    UnitKind,
};
pub use path::{CrsPath, PathGenerator, PathOptions};
pub use store::{KeyedStore, LoadMode};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version byte of the binary resources this crate reads and writes.
pub const FORMAT_VERSION: u8 = limits::FORMAT_VERSION;
