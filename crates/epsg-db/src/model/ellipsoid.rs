//! Reference ellipsoids and their derived quantities.

use crate::model::Code;

/// Second defining parameter of an ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EllipsoidShape {
    Sphere,
    InverseFlattening(f64),
    SemiMinorAxis(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ellipsoid {
    pub code: Code,
    pub name: String,
    pub semi_major_axis: f64,
    pub shape: EllipsoidShape,
    /// Unit of the axis lengths.
    pub unit: Code,
}

impl Ellipsoid {
    pub fn is_sphere(&self) -> bool {
        match self.shape {
            EllipsoidShape::Sphere => true,
            EllipsoidShape::InverseFlattening(_) => false,
            EllipsoidShape::SemiMinorAxis(b) => b == self.semi_major_axis,
        }
    }

    pub fn semi_minor_axis(&self) -> f64 {
        let a = self.semi_major_axis;
        match self.shape {
            EllipsoidShape::Sphere => a,
            EllipsoidShape::InverseFlattening(invf) => a - a / invf,
            EllipsoidShape::SemiMinorAxis(b) => b,
        }
    }

    /// Inverse flattening, infinite for a sphere.
    pub fn inverse_flattening(&self) -> f64 {
        match self.shape {
            EllipsoidShape::InverseFlattening(invf) => invf,
            _ => {
                let f = self.flattening();
                if f == 0.0 { f64::INFINITY } else { 1.0 / f }
            }
        }
    }

    pub fn flattening(&self) -> f64 {
        match self.shape {
            EllipsoidShape::Sphere => 0.0,
            EllipsoidShape::InverseFlattening(invf) => 1.0 / invf,
            EllipsoidShape::SemiMinorAxis(b) => (self.semi_major_axis - b) / self.semi_major_axis,
        }
    }

    /// First eccentricity squared, `e² = 2f - f²`.
    pub fn eccentricity_squared(&self) -> f64 {
        let f = self.flattening();
        2.0 * f - f * f
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity_squared().sqrt()
    }

    /// Second eccentricity squared, `e'² = e² / (1 - e²)`.
    pub fn second_eccentricity_squared(&self) -> f64 {
        let e2 = self.eccentricity_squared();
        e2 / (1.0 - e2)
    }
}
