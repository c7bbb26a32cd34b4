//! Units of measure.

use crate::model::Code;

/// Unit type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum UnitKind {
    Length = 1,
    Angle = 2,
    Scale = 3,
    Time = 4,
}

impl UnitKind {
    /// Creates a UnitKind from its wire representation.
    pub fn from_u8(v: u8) -> Option<UnitKind> {
        match v {
            1 => Some(UnitKind::Length),
            2 => Some(UnitKind::Angle),
            3 => Some(UnitKind::Scale),
            4 => Some(UnitKind::Time),
            _ => None,
        }
    }
}

/// Conversion to the base unit of the same kind: `base = value * numerator / denominator`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitRatio {
    pub numerator: f64,
    pub denominator: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub code: Code,
    pub name: String,
    pub kind: UnitKind,
    /// Absent for units without a linear relation to the base unit
    /// (sexagesimal encodings and similar).
    pub ratio: Option<UnitRatio>,
}

impl Unit {
    /// Factor converting a value in this unit to the base unit.
    pub fn to_base_factor(&self) -> Option<f64> {
        self.ratio.map(|r| r.numerator / r.denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_factor() {
        let degree = Unit {
            code: 9102,
            name: "degree".to_string(),
            kind: UnitKind::Angle,
            ratio: Some(UnitRatio {
                numerator: std::f64::consts::PI,
                denominator: 180.0,
            }),
        };
        let factor = degree.to_base_factor().unwrap();
        assert!((factor - 0.017453292519943295).abs() < 1e-18);
    }

    #[test]
    fn test_unit_kind_from_u8() {
        assert_eq!(UnitKind::from_u8(1), Some(UnitKind::Length));
        assert_eq!(UnitKind::from_u8(4), Some(UnitKind::Time));
        assert_eq!(UnitKind::from_u8(0), None);
    }
}
