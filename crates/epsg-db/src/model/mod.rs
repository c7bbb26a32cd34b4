//! Reference-data model for the EPSG dataset.
//!
//! All entities are immutable values identified by a numeric code that is
//! unique within its [`Category`]. Cross references are stored as codes and
//! resolved explicitly through [`crate::Database`].

use std::fmt;

pub mod area;
pub mod coordsys;
pub mod crs;
pub mod datum;
pub mod ellipsoid;
pub mod meridian;
pub mod method;
pub mod operation;
pub mod unit;

pub use area::{Area, LatitudeRange, LongitudeRange};
pub use coordsys::{Axis, CoordinateSystem, CoordinateSystemKind};
pub use crs::{
    BaseDefinition, CompoundCrs, Crs, CrsInfo, CrsKind, EngineeringCrs, GeodeticCrs, GeodeticKind,
    ProjectedCrs, VerticalCrs,
};
pub use datum::{Datum, DatumInfo, GeodeticDatum};
pub use ellipsoid::{Ellipsoid, EllipsoidShape};
pub use meridian::PrimeMeridian;
pub use method::{
    NamedParameter, OperationMethod, Parameter, ParameterSlot, ParameterValue, ParameterValueKind,
};
pub use operation::{
    ConcatenatedOperation, Conversion, Operation, OperationCode, OperationInfo, OperationKind,
    OperationRef, Transformation,
};
pub use unit::{Unit, UnitKind, UnitRatio};

/// Numeric identifier of an entity within its category.
pub type Code = u32;

/// Entity categories, one binary resource each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Area,
    Unit,
    Ellipsoid,
    PrimeMeridian,
    Datum,
    CoordinateSystem,
    Crs,
    Conversion,
    Transformation,
    ConcatenatedOperation,
    OperationMethod,
    Parameter,
    ParameterValues,
}

impl Category {
    /// Human readable name used in errors and logs.
    pub fn name(self) -> &'static str {
        match self {
            Category::Area => "area",
            Category::Unit => "unit",
            Category::Ellipsoid => "ellipsoid",
            Category::PrimeMeridian => "prime meridian",
            Category::Datum => "datum",
            Category::CoordinateSystem => "coordinate system",
            Category::Crs => "CRS",
            Category::Conversion => "conversion",
            Category::Transformation => "transformation",
            Category::ConcatenatedOperation => "concatenated operation",
            Category::OperationMethod => "operation method",
            Category::Parameter => "parameter",
            Category::ParameterValues => "parameter values",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
