use crate::model::Code;

/// A prime meridian, given as a longitude from Greenwich.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimeMeridian {
    pub code: Code,
    pub name: String,
    pub longitude: f64,
    /// Angular unit of `longitude`.
    pub unit: Code,
}
