//! Binary resource format: primitives, side tables, record layouts and the
//! dataset builder.

pub mod encode;
pub mod number;
pub mod primitives;
pub mod records;
pub mod resource;
pub mod text;

pub use encode::DatasetBuilder;
pub use number::{NumberTable, NumberTableWriter};
pub use primitives::{Reader, Writer};
pub use resource::{names, write_keyed_resource, RecordIndex, Resources, Sizing};
pub use text::{TextTable, TextTableWriter};
