//! Coordinate reference systems.
//!
//! Every variant embeds [`CrsInfo`]. References to datums, coordinate
//! systems, base CRSs and operations are codes, resolved through the
//! database on demand.

use crate::model::Code;

/// Kind tag of a CRS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CrsKind {
    Geographic2D = 1,
    Geographic3D = 2,
    Geocentric = 3,
    Projected = 4,
    Vertical = 5,
    Engineering = 6,
    Compound = 7,
}

impl CrsKind {
    /// Creates a CrsKind from its wire representation.
    pub fn from_u8(v: u8) -> Option<CrsKind> {
        match v {
            1 => Some(CrsKind::Geographic2D),
            2 => Some(CrsKind::Geographic3D),
            3 => Some(CrsKind::Geocentric),
            4 => Some(CrsKind::Projected),
            5 => Some(CrsKind::Vertical),
            6 => Some(CrsKind::Engineering),
            7 => Some(CrsKind::Compound),
            _ => None,
        }
    }

    pub fn is_geodetic(self) -> bool {
        matches!(
            self,
            CrsKind::Geographic2D | CrsKind::Geographic3D | CrsKind::Geocentric
        )
    }
}

/// The geodetic flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeodeticKind {
    Geographic2D,
    Geographic3D,
    Geocentric,
}

impl From<GeodeticKind> for CrsKind {
    fn from(kind: GeodeticKind) -> Self {
        match kind {
            GeodeticKind::Geographic2D => CrsKind::Geographic2D,
            GeodeticKind::Geographic3D => CrsKind::Geographic3D,
            GeodeticKind::Geocentric => CrsKind::Geocentric,
        }
    }
}

/// Fields shared by every CRS variant.
#[derive(Debug, Clone, PartialEq)]
pub struct CrsInfo {
    pub code: Code,
    pub name: String,
    pub area: Option<Code>,
    pub deprecated: bool,
}

/// Derivation of a geodetic CRS from another one through a named operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseDefinition {
    pub crs: Code,
    pub operation: Code,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeodeticCrs {
    pub info: CrsInfo,
    pub kind: GeodeticKind,
    pub coordinate_system: Code,
    pub datum: Code,
    pub base: Option<BaseDefinition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedCrs {
    pub info: CrsInfo,
    pub coordinate_system: Code,
    /// Base CRS; may itself be projected.
    pub base_crs: Code,
    /// Conversion applied to coordinates of the base CRS.
    pub projection: Code,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerticalCrs {
    pub info: CrsInfo,
    pub coordinate_system: Code,
    pub datum: Code,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineeringCrs {
    pub info: CrsInfo,
    pub coordinate_system: Code,
    pub datum: Code,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompoundCrs {
    pub info: CrsInfo,
    pub horizontal: Code,
    pub vertical: Code,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Crs {
    Geodetic(GeodeticCrs),
    Projected(ProjectedCrs),
    Vertical(VerticalCrs),
    Engineering(EngineeringCrs),
    Compound(CompoundCrs),
}

impl Crs {
    pub fn info(&self) -> &CrsInfo {
        match self {
            Crs::Geodetic(c) => &c.info,
            Crs::Projected(c) => &c.info,
            Crs::Vertical(c) => &c.info,
            Crs::Engineering(c) => &c.info,
            Crs::Compound(c) => &c.info,
        }
    }

    pub fn code(&self) -> Code {
        self.info().code
    }

    pub fn name(&self) -> &str {
        &self.info().name
    }

    pub fn area(&self) -> Option<Code> {
        self.info().area
    }

    pub fn deprecated(&self) -> bool {
        self.info().deprecated
    }

    pub fn kind(&self) -> CrsKind {
        match self {
            Crs::Geodetic(c) => c.kind.into(),
            Crs::Projected(_) => CrsKind::Projected,
            Crs::Vertical(_) => CrsKind::Vertical,
            Crs::Engineering(_) => CrsKind::Engineering,
            Crs::Compound(_) => CrsKind::Compound,
        }
    }

    /// Coordinate system, absent for compound systems.
    pub fn coordinate_system(&self) -> Option<Code> {
        match self {
            Crs::Geodetic(c) => Some(c.coordinate_system),
            Crs::Projected(c) => Some(c.coordinate_system),
            Crs::Vertical(c) => Some(c.coordinate_system),
            Crs::Engineering(c) => Some(c.coordinate_system),
            Crs::Compound(_) => None,
        }
    }

    pub fn as_geodetic(&self) -> Option<&GeodeticCrs> {
        match self {
            Crs::Geodetic(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_projected(&self) -> Option<&ProjectedCrs> {
        match self {
            Crs::Projected(c) => Some(c),
            _ => None,
        }
    }
}
