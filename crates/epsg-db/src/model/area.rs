//! Areas of use and the range predicates used for applicability filtering.
//!
//! Longitudes are periodic: a range may cross the antimeridian, in which
//! case its start is greater than its end (e.g. `170..-170`). Latitudes are
//! plain closed intervals.

use crate::model::Code;

const PERIOD: f64 = 360.0;

/// Periodic longitude range in degrees, read eastward from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongitudeRange {
    pub start: f64,
    pub end: f64,
}

impl LongitudeRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// The range covering every meridian.
    pub fn full() -> Self {
        Self::new(-180.0, 180.0)
    }

    /// Eastward extent in degrees, 360 for a full circle.
    pub fn magnitude(&self) -> f64 {
        if self.end >= self.start {
            (self.end - self.start).min(PERIOD)
        } else {
            PERIOD - (self.start - self.end)
        }
    }

    pub fn is_full(&self) -> bool {
        self.magnitude() >= PERIOD
    }

    /// Eastward distance from `start` to `value`, in `[0, 360)`.
    fn offset(&self, value: f64) -> f64 {
        (value - self.start).rem_euclid(PERIOD)
    }

    /// True when the meridian lies inside the range. -180 and 180 are the same meridian.
    pub fn contains_value(&self, value: f64) -> bool {
        self.is_full() || self.offset(value) <= self.magnitude()
    }

    /// True when `other` lies completely inside this range.
    pub fn contains(&self, other: &LongitudeRange) -> bool {
        if self.is_full() {
            return true;
        }
        if other.is_full() {
            return false;
        }
        self.offset(other.start) + other.magnitude() <= self.magnitude()
    }

    pub fn within(&self, other: &LongitudeRange) -> bool {
        other.contains(self)
    }

    pub fn intersects(&self, other: &LongitudeRange) -> bool {
        self.contains_value(other.start) || other.contains_value(self.start)
    }
}

/// Closed latitude interval in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatitudeRange {
    pub low: f64,
    pub high: f64,
}

impl LatitudeRange {
    /// Creates a range, ordering the bounds.
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    pub fn contains_value(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }

    pub fn contains(&self, other: &LatitudeRange) -> bool {
        self.low <= other.low && other.high <= self.high
    }

    pub fn within(&self, other: &LatitudeRange) -> bool {
        other.contains(self)
    }

    pub fn intersects(&self, other: &LatitudeRange) -> bool {
        self.low <= other.high && other.low <= self.high
    }
}

/// A named geographic extent.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    pub code: Code,
    pub name: String,
    /// ISO 3166 alpha-2 country code, when the area is a country.
    pub iso2: Option<String>,
    /// ISO 3166 alpha-3 country code, when the area is a country.
    pub iso3: Option<String>,
    pub longitude: LongitudeRange,
    pub latitude: LatitudeRange,
}

impl Area {
    pub fn intersects(&self, other: &Area) -> bool {
        self.longitude.intersects(&other.longitude) && self.latitude.intersects(&other.latitude)
    }

    pub fn contains(&self, other: &Area) -> bool {
        self.longitude.contains(&other.longitude) && self.latitude.contains(&other.latitude)
    }

    pub fn within(&self, other: &Area) -> bool {
        other.contains(self)
    }

    /// True when the point (degrees) is inside the area.
    pub fn contains_point(&self, longitude: f64, latitude: f64) -> bool {
        self.longitude.contains_value(longitude) && self.latitude.contains_value(latitude)
    }
}
