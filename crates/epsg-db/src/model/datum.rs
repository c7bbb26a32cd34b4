//! Datums.

use crate::model::Code;

/// Fields shared by every datum variant.
#[derive(Debug, Clone, PartialEq)]
pub struct DatumInfo {
    pub code: Code,
    pub name: String,
    pub area: Option<Code>,
    pub deprecated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeodeticDatum {
    pub info: DatumInfo,
    pub ellipsoid: Code,
    pub prime_meridian: Code,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Geodetic(GeodeticDatum),
    Vertical(DatumInfo),
    Engineering(DatumInfo),
}

impl Datum {
    pub fn info(&self) -> &DatumInfo {
        match self {
            Datum::Geodetic(d) => &d.info,
            Datum::Vertical(info) | Datum::Engineering(info) => info,
        }
    }

    pub fn code(&self) -> Code {
        self.info().code
    }

    pub fn name(&self) -> &str {
        &self.info().name
    }

    pub fn as_geodetic(&self) -> Option<&GeodeticDatum> {
        match self {
            Datum::Geodetic(d) => Some(d),
            _ => None,
        }
    }
}
