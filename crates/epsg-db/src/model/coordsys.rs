//! Coordinate systems and their axes.

use crate::model::Code;

/// Coordinate system kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CoordinateSystemKind {
    Cartesian = 0x10,
    Ellipsoidal = 0x20,
    Spherical = 0x30,
    Vertical = 0x40,
}

impl CoordinateSystemKind {
    /// Creates a kind from the masked bits of the wire type byte.
    pub fn from_u8(v: u8) -> Option<CoordinateSystemKind> {
        match v {
            0x10 => Some(CoordinateSystemKind::Cartesian),
            0x20 => Some(CoordinateSystemKind::Ellipsoidal),
            0x30 => Some(CoordinateSystemKind::Spherical),
            0x40 => Some(CoordinateSystemKind::Vertical),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub name: String,
    pub abbreviation: String,
    pub orientation: String,
    pub unit: Option<Code>,
}

/// A coordinate system. Axis order defines coordinate tuple order.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateSystem {
    pub code: Code,
    pub name: String,
    pub kind: CoordinateSystemKind,
    pub deprecated: bool,
    pub axes: Vec<Axis>,
}

impl CoordinateSystem {
    pub fn dimension(&self) -> usize {
        self.axes.len()
    }
}
