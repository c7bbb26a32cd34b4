//! Dataset builder: model values in, binary resources out.
//!
//! # Example
//!
//! ```rust
//! use epsg_db::codec::DatasetBuilder;
//! use epsg_db::model::{Parameter, Unit, UnitKind, UnitRatio};
//!
//! let resources = DatasetBuilder::new()
//!     .unit(Unit {
//!         code: 9001,
//!         name: "metre".to_string(),
//!         kind: UnitKind::Length,
//!         ratio: Some(UnitRatio { numerator: 1.0, denominator: 1.0 }),
//!     })
//!     .parameter(Parameter { code: 8806, name: "False easting".to_string() })
//!     .build()
//!     .unwrap();
//! assert!(resources.get("uoms.dat").is_some());
//! ```

use std::collections::BTreeMap;

use crate::codec::number::NumberTableWriter;
use crate::codec::primitives::Writer;
use crate::codec::records::{self, size};
use crate::codec::resource::{names, write_keyed_resource, Resources};
use crate::codec::text::TextTableWriter;
use crate::error::EncodeError;
use crate::limits::{MAX_PARAMETER_TEXT_OFFSET, NO_CODE};
use crate::model::{
    Area, Category, Code, CoordinateSystem, Crs, Datum, Ellipsoid, Operation, OperationKind,
    OperationMethod, Parameter, ParameterValue, PrimeMeridian, Unit,
};

const SHORT_KEY: u8 = 2;
const LONG_KEY: u8 = 4;

/// Collects model values and encodes them into a [`Resources`] set.
///
/// Adding a code twice within a category is reported by [`build`](Self::build).
/// Operation codes are shared by conversions, transformations and
/// concatenated operations.
#[derive(Debug, Clone, Default)]
pub struct DatasetBuilder {
    areas: BTreeMap<Code, Area>,
    units: BTreeMap<Code, Unit>,
    ellipsoids: BTreeMap<Code, Ellipsoid>,
    meridians: BTreeMap<Code, PrimeMeridian>,
    datums: BTreeMap<Code, Datum>,
    coordinate_systems: BTreeMap<Code, CoordinateSystem>,
    crs: BTreeMap<Code, Crs>,
    operations: BTreeMap<Code, Operation>,
    methods: BTreeMap<Code, OperationMethod>,
    parameters: BTreeMap<Code, Parameter>,
    parameter_values: BTreeMap<Code, Vec<Option<ParameterValue>>>,
    error: Option<EncodeError>,
}

fn insert<T>(map: &mut BTreeMap<Code, T>, error: &mut Option<EncodeError>, category: Category, code: Code, value: T) {
    if map.insert(code, value).is_some() && error.is_none() {
        *error = Some(EncodeError::DuplicateCode { category, code });
    }
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn area(mut self, area: Area) -> Self {
        insert(&mut self.areas, &mut self.error, Category::Area, area.code, area);
        self
    }

    pub fn unit(mut self, unit: Unit) -> Self {
        insert(&mut self.units, &mut self.error, Category::Unit, unit.code, unit);
        self
    }

    pub fn ellipsoid(mut self, ellipsoid: Ellipsoid) -> Self {
        insert(&mut self.ellipsoids, &mut self.error, Category::Ellipsoid, ellipsoid.code, ellipsoid);
        self
    }

    pub fn prime_meridian(mut self, meridian: PrimeMeridian) -> Self {
        insert(&mut self.meridians, &mut self.error, Category::PrimeMeridian, meridian.code, meridian);
        self
    }

    pub fn datum(mut self, datum: Datum) -> Self {
        insert(&mut self.datums, &mut self.error, Category::Datum, datum.code(), datum);
        self
    }

    pub fn coordinate_system(mut self, cs: CoordinateSystem) -> Self {
        insert(&mut self.coordinate_systems, &mut self.error, Category::CoordinateSystem, cs.code, cs);
        self
    }

    /// Adds a CRS of any kind; compound systems go to their own resource.
    pub fn crs(mut self, crs: Crs) -> Self {
        insert(&mut self.crs, &mut self.error, Category::Crs, crs.code(), crs);
        self
    }

    pub fn operation(mut self, op: Operation) -> Self {
        let category = op.kind().category();
        insert(&mut self.operations, &mut self.error, category, op.code(), op);
        self
    }

    pub fn method(mut self, method: OperationMethod) -> Self {
        insert(&mut self.methods, &mut self.error, Category::OperationMethod, method.code, method);
        self
    }

    pub fn parameter(mut self, parameter: Parameter) -> Self {
        insert(&mut self.parameters, &mut self.error, Category::Parameter, parameter.code, parameter);
        self
    }

    /// Sets the parameter values of an operation, in method slot order.
    pub fn parameter_values(mut self, operation: Code, values: Vec<Option<ParameterValue>>) -> Self {
        insert(&mut self.parameter_values, &mut self.error, Category::ParameterValues, operation, values);
        self
    }

    /// Encodes every category. Keys are written in ascending order.
    pub fn build(self) -> Result<Resources, EncodeError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let mut numbers = NumberTableWriter::new();
        let mut resources = Resources::new();

        let mut text = TextTableWriter::new(names::AREAS_TEXT);
        let records = encode_all(&self.areas, Category::Area, SHORT_KEY, |a| records::encode_area(a, &mut text))?;
        resources.insert(names::AREAS, write_keyed_resource(SHORT_KEY, size::AREA, &records)?);
        resources.insert(names::AREAS_TEXT, text.into_bytes());

        let mut text = TextTableWriter::new(names::UNITS_TEXT);
        let records = encode_all(&self.units, Category::Unit, SHORT_KEY, |u| {
            records::encode_unit(u, &mut text, &mut numbers)
        })?;
        resources.insert(names::UNITS, write_keyed_resource(SHORT_KEY, size::UNIT, &records)?);
        resources.insert(names::UNITS_TEXT, text.into_bytes());

        let mut text = TextTableWriter::new(names::ELLIPSOIDS_TEXT);
        let records = encode_all(&self.ellipsoids, Category::Ellipsoid, SHORT_KEY, |e| {
            records::encode_ellipsoid(e, &mut text, &mut numbers)
        })?;
        resources.insert(names::ELLIPSOIDS, write_keyed_resource(SHORT_KEY, size::ELLIPSOID, &records)?);
        resources.insert(names::ELLIPSOIDS_TEXT, text.into_bytes());

        let mut text = TextTableWriter::new(names::MERIDIANS_TEXT);
        let records = encode_all(&self.meridians, Category::PrimeMeridian, SHORT_KEY, |m| {
            records::encode_prime_meridian(m, &mut text, &mut numbers)
        })?;
        resources.insert(names::MERIDIANS, write_keyed_resource(SHORT_KEY, size::MERIDIAN, &records)?);
        resources.insert(names::MERIDIANS_TEXT, text.into_bytes());

        let mut text = TextTableWriter::new(names::DATUMS_TEXT);
        let records = encode_all(&self.datums, Category::Datum, SHORT_KEY, |d| records::encode_datum(d, &mut text))?;
        resources.insert(names::DATUMS, write_keyed_resource(SHORT_KEY, size::DATUM, &records)?);
        resources.insert(names::DATUMS_TEXT, text.into_bytes());

        let mut text = TextTableWriter::new(names::COORDINATE_SYSTEMS_TEXT);
        let mut axes = Writer::new();
        let mut axes_text = TextTableWriter::new(names::AXES_TEXT);
        let records = encode_all(&self.coordinate_systems, Category::CoordinateSystem, SHORT_KEY, |cs| {
            records::encode_coordinate_system(cs, &mut text, &mut axes, &mut axes_text)
        })?;
        resources.insert(
            names::COORDINATE_SYSTEMS,
            write_keyed_resource(SHORT_KEY, size::COORDINATE_SYSTEM, &records)?,
        );
        resources.insert(names::COORDINATE_SYSTEMS_TEXT, text.into_bytes());
        resources.insert(names::AXES, axes.into_bytes());
        resources.insert(names::AXES_TEXT, axes_text.into_bytes());

        let mut text = TextTableWriter::new(names::CRS_TEXT);
        let mut single = Vec::new();
        let mut compound = Vec::new();
        for (&code, crs) in &self.crs {
            check_key(Category::Crs, code, LONG_KEY)?;
            match crs {
                Crs::Compound(c) => compound.push((code, records::encode_compound_crs(c, &mut text)?)),
                other => single.push((code, records::encode_crs(other, &mut text)?)),
            }
        }
        resources.insert(names::CRS, write_keyed_resource(LONG_KEY, size::CRS, &single)?);
        resources.insert(names::COMPOUND_CRS, write_keyed_resource(LONG_KEY, size::COMPOUND_CRS, &compound)?);
        resources.insert(names::CRS_TEXT, text.into_bytes());

        let mut text = TextTableWriter::new(names::OPERATIONS_TEXT);
        let mut steps = Writer::new();
        let mut conversions = Vec::new();
        let mut transformations = Vec::new();
        let mut concatenated = Vec::new();
        for (&code, op) in &self.operations {
            check_key(op.kind().category(), code, SHORT_KEY)?;
            let bytes = records::encode_operation(op, &mut text, &mut numbers, &mut steps)?;
            match op.kind() {
                OperationKind::Conversion => conversions.push((code, bytes)),
                OperationKind::Transformation => transformations.push((code, bytes)),
                OperationKind::Concatenated => concatenated.push((code, bytes)),
            }
        }
        resources.insert(names::CONVERSIONS, write_keyed_resource(SHORT_KEY, size::CONVERSION, &conversions)?);
        resources.insert(
            names::TRANSFORMATIONS,
            write_keyed_resource(SHORT_KEY, size::TRANSFORMATION, &transformations)?,
        );
        resources.insert(
            names::CONCATENATED,
            write_keyed_resource(SHORT_KEY, size::CONCATENATED, &concatenated)?,
        );
        resources.insert(names::CONCATENATED_STEPS, steps.into_bytes());
        resources.insert(names::OPERATIONS_TEXT, text.into_bytes());

        let mut text = TextTableWriter::new(names::METHODS_TEXT);
        let mut slots = Writer::new();
        let records = encode_all(&self.methods, Category::OperationMethod, SHORT_KEY, |m| {
            records::encode_method(m, &mut text, &mut slots)
        })?;
        resources.insert(names::METHODS, write_keyed_resource(SHORT_KEY, size::METHOD, &records)?);
        resources.insert(names::METHODS_TEXT, text.into_bytes());
        resources.insert(names::METHOD_SLOTS, slots.into_bytes());

        let mut text = TextTableWriter::new(names::PARAMETERS_TEXT);
        let records = encode_all(&self.parameters, Category::Parameter, SHORT_KEY, |p| {
            records::encode_parameter(p, &mut text)
        })?;
        resources.insert(names::PARAMETERS, write_keyed_resource(SHORT_KEY, size::PARAMETER, &records)?);
        resources.insert(names::PARAMETERS_TEXT, text.into_bytes());

        let mut text = TextTableWriter::with_limit(names::PARAMETER_VALUES_TEXT, MAX_PARAMETER_TEXT_OFFSET);
        let records = encode_all(&self.parameter_values, Category::ParameterValues, SHORT_KEY, |v| {
            records::encode_parameter_values(v, &mut text, &mut numbers)
        })?;
        resources.insert(names::PARAMETER_VALUES, write_keyed_resource(SHORT_KEY, 0, &records)?);
        resources.insert(names::PARAMETER_VALUES_TEXT, text.into_bytes());

        resources.insert(names::NUMBERS, numbers.into_bytes());
        Ok(resources)
    }
}

fn check_key(category: Category, code: Code, key_width: u8) -> Result<(), EncodeError> {
    if key_width == SHORT_KEY && code >= NO_CODE as Code {
        return Err(EncodeError::CodeOutOfRange { category, code });
    }
    Ok(())
}

fn encode_all<T>(
    values: &BTreeMap<Code, T>,
    category: Category,
    key_width: u8,
    mut encode: impl FnMut(&T) -> Result<Vec<u8>, EncodeError>,
) -> Result<Vec<(Code, Vec<u8>)>, EncodeError> {
    values
        .iter()
        .map(|(&code, value)| {
            check_key(category, code, key_width)?;
            Ok((code, encode(value)?))
        })
        .collect()
}
