//! The database handle: one lazily decoded store per category plus the
//! reverse operation indexes.
//!
//! A [`Database`] is opened from a [`Resources`] set. Opening validates every
//! resource header and key table, so a malformed dataset fails up front; the
//! records themselves are decoded on first access and memoized.
//!
//! # Example
//!
//! ```ignore
//! use epsg_db::{Database, DatabaseOptions, Resources};
//!
//! let resources = Resources::from_dir("data/epsg")?;
//! let db = Database::open(&resources, DatabaseOptions::default())?;
//! let wgs84 = db.crs(4326)?.expect("present");
//! println!("{}", wgs84.name());
//! ```

mod index;

pub use index::OperationIndex;

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::codec::names;
use crate::codec::records::{
    decode_area, decode_compound_crs, decode_concatenated, decode_conversion,
    decode_coordinate_system, decode_crs, decode_datum, decode_ellipsoid, decode_method,
    decode_parameter, decode_parameter_values, decode_prime_meridian, decode_transformation,
    decode_unit,
};
use crate::codec::{NumberTable, Resources, TextTable};
use crate::error::DecodeError;
use crate::limits::{BASE_UNIT_ANGLE, BASE_UNIT_LENGTH, BASE_UNIT_SCALE, BASE_UNIT_TIME};
use crate::model::{
    Area, Category, Code, CoordinateSystem, Crs, Datum, Ellipsoid, NamedParameter, Operation,
    OperationCode, OperationKind, OperationMethod, OperationRef, Parameter, ParameterValue,
    PrimeMeridian, Unit, UnitKind,
};
use crate::store::{KeyedStore, LoadMode};

/// Options for [`Database::open`].
#[derive(Debug, Clone, Default)]
pub struct DatabaseOptions {
    pub load_mode: LoadMode,
    /// When set, the resource fingerprint must match.
    pub expected_fingerprint: Option<[u8; 32]>,
}

impl DatabaseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode every record while opening.
    pub fn eager() -> Self {
        Self {
            load_mode: LoadMode::Eager,
            ..Self::default()
        }
    }

    pub fn with_fingerprint(mut self, fingerprint: [u8; 32]) -> Self {
        self.expected_fingerprint = Some(fingerprint);
        self
    }
}

/// Read-only handle over one EPSG dataset.
#[derive(Debug)]
pub struct Database {
    fingerprint: [u8; 32],
    areas: KeyedStore<Area>,
    units: KeyedStore<Unit>,
    ellipsoids: KeyedStore<Ellipsoid>,
    meridians: KeyedStore<PrimeMeridian>,
    datums: KeyedStore<Datum>,
    coordinate_systems: KeyedStore<CoordinateSystem>,
    crs: KeyedStore<Crs>,
    compound_crs: KeyedStore<Crs>,
    conversions: KeyedStore<Operation>,
    transformations: KeyedStore<Operation>,
    concatenated: KeyedStore<Operation>,
    methods: KeyedStore<OperationMethod>,
    parameters: KeyedStore<Parameter>,
    parameter_values: KeyedStore<Vec<Option<ParameterValue>>>,
    index: OperationIndex,
}

fn open_text(resources: &Resources, name: &'static str) -> Result<Arc<TextTable>, DecodeError> {
    Ok(Arc::new(TextTable::open(name, resources.require(name)?)?))
}

impl Database {
    /// Opens every store of `resources` and builds the operation indexes.
    pub fn open(resources: &Resources, options: DatabaseOptions) -> Result<Self, DecodeError> {
        let fingerprint = resources.fingerprint();
        if let Some(expected) = options.expected_fingerprint {
            if expected != fingerprint {
                return Err(DecodeError::FingerprintMismatch);
            }
        }
        let mode = options.load_mode;
        let numbers = Arc::new(NumberTable::open(resources.require(names::NUMBERS)?)?);

        let areas = {
            let text = open_text(resources, names::AREAS_TEXT)?;
            KeyedStore::open(names::AREAS, resources.require(names::AREAS)?, mode, move |code, data| {
                decode_area(code, data, &text)
            })?
        };
        let units = {
            let text = open_text(resources, names::UNITS_TEXT)?;
            let numbers = Arc::clone(&numbers);
            KeyedStore::open(names::UNITS, resources.require(names::UNITS)?, mode, move |code, data| {
                decode_unit(code, data, &text, &numbers)
            })?
        };
        let ellipsoids = {
            let text = open_text(resources, names::ELLIPSOIDS_TEXT)?;
            let numbers = Arc::clone(&numbers);
            KeyedStore::open(
                names::ELLIPSOIDS,
                resources.require(names::ELLIPSOIDS)?,
                mode,
                move |code, data| decode_ellipsoid(code, data, &text, &numbers),
            )?
        };
        let meridians = {
            let text = open_text(resources, names::MERIDIANS_TEXT)?;
            let numbers = Arc::clone(&numbers);
            KeyedStore::open(
                names::MERIDIANS,
                resources.require(names::MERIDIANS)?,
                mode,
                move |code, data| decode_prime_meridian(code, data, &text, &numbers),
            )?
        };
        let datums = {
            let text = open_text(resources, names::DATUMS_TEXT)?;
            KeyedStore::open(names::DATUMS, resources.require(names::DATUMS)?, mode, move |code, data| {
                decode_datum(code, data, &text)
            })?
        };
        let coordinate_systems = {
            let text = open_text(resources, names::COORDINATE_SYSTEMS_TEXT)?;
            let axes_text = open_text(resources, names::AXES_TEXT)?;
            let axes = resources.require(names::AXES)?;
            KeyedStore::open(
                names::COORDINATE_SYSTEMS,
                resources.require(names::COORDINATE_SYSTEMS)?,
                mode,
                move |code, data| decode_coordinate_system(code, data, &text, &axes, &axes_text),
            )?
        };

        let crs_text = open_text(resources, names::CRS_TEXT)?;
        let crs = {
            let text = Arc::clone(&crs_text);
            KeyedStore::open(names::CRS, resources.require(names::CRS)?, mode, move |code, data| {
                decode_crs(code, data, &text)
            })?
        };
        let compound_crs = KeyedStore::open(
            names::COMPOUND_CRS,
            resources.require(names::COMPOUND_CRS)?,
            mode,
            move |code, data| decode_compound_crs(code, data, &crs_text),
        )?;

        let op_text = open_text(resources, names::OPERATIONS_TEXT)?;
        let conversions = {
            let text = Arc::clone(&op_text);
            KeyedStore::open(
                names::CONVERSIONS,
                resources.require(names::CONVERSIONS)?,
                mode,
                move |code, data| decode_conversion(code, data, &text),
            )?
        };
        let transformations = {
            let text = Arc::clone(&op_text);
            let numbers = Arc::clone(&numbers);
            KeyedStore::open(
                names::TRANSFORMATIONS,
                resources.require(names::TRANSFORMATIONS)?,
                mode,
                move |code, data| decode_transformation(code, data, &text, &numbers),
            )?
        };
        let concatenated = {
            let steps = resources.require(names::CONCATENATED_STEPS)?;
            KeyedStore::open(
                names::CONCATENATED,
                resources.require(names::CONCATENATED)?,
                mode,
                move |code, data| decode_concatenated(code, data, &op_text, &steps),
            )?
        };

        let methods = {
            let text = open_text(resources, names::METHODS_TEXT)?;
            let slots = resources.require(names::METHOD_SLOTS)?;
            KeyedStore::open(names::METHODS, resources.require(names::METHODS)?, mode, move |code, data| {
                decode_method(code, data, &text, &slots)
            })?
        };
        let parameters = {
            let text = open_text(resources, names::PARAMETERS_TEXT)?;
            KeyedStore::open(
                names::PARAMETERS,
                resources.require(names::PARAMETERS)?,
                mode,
                move |code, data| decode_parameter(code, data, &text),
            )?
        };
        let parameter_values = {
            let text = open_text(resources, names::PARAMETER_VALUES_TEXT)?;
            KeyedStore::open(
                names::PARAMETER_VALUES,
                resources.require(names::PARAMETER_VALUES)?,
                mode,
                move |_, data| decode_parameter_values(data, &text, &numbers),
            )?
        };

        let index = OperationIndex::build(&transformations, &concatenated, &crs)?;

        tracing::info!(
            crs = crs.len() + compound_crs.len(),
            conversions = conversions.len(),
            transformations = transformations.len(),
            concatenated = concatenated.len(),
            fingerprint = %hex(&fingerprint[..8]),
            ?mode,
            "opened EPSG database"
        );

        Ok(Self {
            fingerprint,
            areas,
            units,
            ellipsoids,
            meridians,
            datums,
            coordinate_systems,
            crs,
            compound_crs,
            conversions,
            transformations,
            concatenated,
            methods,
            parameters,
            parameter_values,
            index,
        })
    }

    /// SHA-256 over the resource set this database was opened from.
    pub fn fingerprint(&self) -> [u8; 32] {
        self.fingerprint
    }

    // ===== LOOKUPS =====

    pub fn area(&self, code: Code) -> Result<Option<Arc<Area>>, DecodeError> {
        self.areas.get(code)
    }

    pub fn unit(&self, code: Code) -> Result<Option<Arc<Unit>>, DecodeError> {
        self.units.get(code)
    }

    pub fn ellipsoid(&self, code: Code) -> Result<Option<Arc<Ellipsoid>>, DecodeError> {
        self.ellipsoids.get(code)
    }

    pub fn prime_meridian(&self, code: Code) -> Result<Option<Arc<PrimeMeridian>>, DecodeError> {
        self.meridians.get(code)
    }

    pub fn datum(&self, code: Code) -> Result<Option<Arc<Datum>>, DecodeError> {
        self.datums.get(code)
    }

    pub fn coordinate_system(&self, code: Code) -> Result<Option<Arc<CoordinateSystem>>, DecodeError> {
        self.coordinate_systems.get(code)
    }

    /// Single CRSs first, then compound ones.
    pub fn crs(&self, code: Code) -> Result<Option<Arc<Crs>>, DecodeError> {
        match self.crs.get(code)? {
            Some(crs) => Ok(Some(crs)),
            None => self.compound_crs.get(code),
        }
    }

    pub fn conversion(&self, code: Code) -> Result<Option<Arc<Operation>>, DecodeError> {
        self.conversions.get(code)
    }

    pub fn transformation(&self, code: Code) -> Result<Option<Arc<Operation>>, DecodeError> {
        self.transformations.get(code)
    }

    pub fn concatenated_operation(&self, code: Code) -> Result<Option<Arc<Operation>>, DecodeError> {
        self.concatenated.get(code)
    }

    pub fn operation(&self, code: OperationCode) -> Result<Option<Arc<Operation>>, DecodeError> {
        self.operation_store(code.kind).get(code.code)
    }

    /// A concatenated step or base operation: a transformation, else a conversion.
    pub fn single_operation(&self, code: Code) -> Result<Option<Arc<Operation>>, DecodeError> {
        match self.transformations.get(code)? {
            Some(op) => Ok(Some(op)),
            None => self.conversions.get(code),
        }
    }

    pub fn operation_method(&self, code: Code) -> Result<Option<Arc<OperationMethod>>, DecodeError> {
        self.methods.get(code)
    }

    pub fn parameter(&self, code: Code) -> Result<Option<Arc<Parameter>>, DecodeError> {
        self.parameters.get(code)
    }

    fn operation_store(&self, kind: OperationKind) -> &KeyedStore<Operation> {
        match kind {
            OperationKind::Conversion => &self.conversions,
            OperationKind::Transformation => &self.transformations,
            OperationKind::Concatenated => &self.concatenated,
        }
    }

    /// Resolves a code stored inside a trusted record.
    pub(crate) fn require_crs(&self, code: Code) -> Result<Arc<Crs>, DecodeError> {
        self.crs(code)?.ok_or(DecodeError::DanglingReference {
            category: Category::Crs,
            code,
        })
    }

    pub(crate) fn require_operation(&self, code: OperationCode) -> Result<Arc<Operation>, DecodeError> {
        self.operation(code)?.ok_or(DecodeError::DanglingReference {
            category: code.kind.category(),
            code: code.code,
        })
    }

    // ===== ENUMERATION =====

    pub fn areas(&self) -> impl Iterator<Item = Result<Arc<Area>, DecodeError>> + '_ {
        self.areas.values()
    }

    pub fn units(&self) -> impl Iterator<Item = Result<Arc<Unit>, DecodeError>> + '_ {
        self.units.values()
    }

    pub fn ellipsoids(&self) -> impl Iterator<Item = Result<Arc<Ellipsoid>, DecodeError>> + '_ {
        self.ellipsoids.values()
    }

    pub fn prime_meridians(&self) -> impl Iterator<Item = Result<Arc<PrimeMeridian>, DecodeError>> + '_ {
        self.meridians.values()
    }

    pub fn datums(&self) -> impl Iterator<Item = Result<Arc<Datum>, DecodeError>> + '_ {
        self.datums.values()
    }

    pub fn coordinate_systems(&self) -> impl Iterator<Item = Result<Arc<CoordinateSystem>, DecodeError>> + '_ {
        self.coordinate_systems.values()
    }

    /// Single and compound CRSs merged in ascending code order.
    pub fn crss(&self) -> impl Iterator<Item = Result<Arc<Crs>, DecodeError>> + '_ {
        let mut single = self.crs.values();
        let mut compound = self.compound_crs.values();
        let single_keys = self.crs.keys();
        let compound_keys = self.compound_crs.keys();
        let (mut i, mut j) = (0, 0);
        std::iter::from_fn(move || {
            let take_single = match (single_keys.get(i), compound_keys.get(j)) {
                (Some(a), Some(b)) => a <= b,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => return None,
            };
            if take_single {
                i += 1;
                single.next()
            } else {
                j += 1;
                compound.next()
            }
        })
    }

    pub fn conversions(&self) -> impl Iterator<Item = Result<Arc<Operation>, DecodeError>> + '_ {
        self.conversions.values()
    }

    pub fn transformations(&self) -> impl Iterator<Item = Result<Arc<Operation>, DecodeError>> + '_ {
        self.transformations.values()
    }

    pub fn concatenated_operations(&self) -> impl Iterator<Item = Result<Arc<Operation>, DecodeError>> + '_ {
        self.concatenated.values()
    }

    pub fn operation_methods(&self) -> impl Iterator<Item = Result<Arc<OperationMethod>, DecodeError>> + '_ {
        self.methods.values()
    }

    pub fn parameters(&self) -> impl Iterator<Item = Result<Arc<Parameter>, DecodeError>> + '_ {
        self.parameters.values()
    }

    // ===== DERIVED QUERIES =====

    /// Parameter values of an operation paired with their method slot names.
    ///
    /// Unset values are skipped. When `op` is an inverse reference, values in
    /// sign-reversal slots are negated.
    pub fn operation_parameters(&self, op: &OperationRef) -> Result<Vec<NamedParameter>, DecodeError> {
        let Some(method_code) = op.core().method() else {
            return Ok(Vec::new());
        };
        let method = self.operation_method(method_code)?.ok_or(DecodeError::DanglingReference {
            category: Category::OperationMethod,
            code: method_code,
        })?;
        let Some(values) = self.parameter_values.get(op.core().code())? else {
            return Ok(Vec::new());
        };

        let mut named = Vec::with_capacity(values.len());
        for (slot, value) in method.slots.iter().zip(values.iter()) {
            let Some(value) = value else { continue };
            let parameter = self.parameter(slot.parameter)?.ok_or(DecodeError::DanglingReference {
                category: Category::Parameter,
                code: slot.parameter,
            })?;
            let value = if op.is_inverse() && slot.sign_reversal {
                value.negated()
            } else {
                value.clone()
            };
            named.push(NamedParameter {
                parameter: slot.parameter,
                name: parameter.name.clone(),
                value,
            });
        }
        Ok(named)
    }

    /// Resolved steps of a concatenated operation; empty for other kinds.
    pub fn concatenated_steps(&self, op: &Operation) -> Result<Vec<Arc<Operation>>, DecodeError> {
        let Operation::Concatenated(concatenated) = op else {
            return Ok(Vec::new());
        };
        concatenated
            .steps
            .iter()
            .map(|&code| {
                self.single_operation(code)?.ok_or(DecodeError::DanglingReference {
                    category: Category::Transformation,
                    code,
                })
            })
            .collect()
    }

    /// The base unit of a unit kind: metre, radian, unity or second.
    pub fn base_unit(&self, kind: UnitKind) -> Result<Option<Arc<Unit>>, DecodeError> {
        let code = match kind {
            UnitKind::Length => BASE_UNIT_LENGTH,
            UnitKind::Angle => BASE_UNIT_ANGLE,
            UnitKind::Scale => BASE_UNIT_SCALE,
            UnitKind::Time => BASE_UNIT_TIME,
        };
        self.unit(code)
    }

    /// Follows projected base links to the geodetic ancestor of `crs`.
    ///
    /// Returns the CRS itself when it is geodetic and `None` for vertical,
    /// engineering and compound systems or an absent code.
    pub fn geodetic_base(&self, crs: Code) -> Result<Option<Arc<Crs>>, DecodeError> {
        let Some(mut current) = self.crs(crs)? else {
            return Ok(None);
        };
        let mut seen = FxHashSet::default();
        loop {
            let base = match current.as_ref() {
                Crs::Geodetic(_) => return Ok(Some(current)),
                Crs::Projected(projected) => projected.base_crs,
                _ => return Ok(None),
            };
            if !seen.insert(current.code()) {
                return Err(DecodeError::CyclicBaseChain { code: crs });
            }
            current = self.require_crs(base)?;
        }
    }

    /// The datum a CRS is ultimately defined on.
    ///
    /// Projected systems use their geodetic ancestor's datum and compound
    /// systems their horizontal component's.
    pub fn effective_datum(&self, crs: Code) -> Result<Option<Arc<Datum>>, DecodeError> {
        let Some(found) = self.crs(crs)? else {
            return Ok(None);
        };
        let datum = match found.as_ref() {
            Crs::Geodetic(geodetic) => geodetic.datum,
            Crs::Vertical(vertical) => vertical.datum,
            Crs::Engineering(engineering) => engineering.datum,
            Crs::Projected(_) => {
                return match self.geodetic_base(crs)? {
                    Some(base) => self.effective_datum(base.code()),
                    None => Ok(None),
                };
            }
            Crs::Compound(compound) => return self.effective_datum(compound.horizontal),
        };
        self.datum(datum)?
            .ok_or(DecodeError::DanglingReference {
                category: Category::Datum,
                code: datum,
            })
            .map(Some)
    }

    // ===== INDEXES =====

    /// Transformations then concatenated operations declared from `crs`.
    pub fn operations_from(&self, crs: Code) -> &[OperationCode] {
        self.index.operations_from(crs)
    }

    /// Transformations then concatenated operations declared to `crs`.
    pub fn operations_to(&self, crs: Code) -> &[OperationCode] {
        self.index.operations_to(crs)
    }

    /// Projected CRSs whose base is `crs`.
    pub fn projections_based_on(&self, crs: Code) -> &[Code] {
        self.index.projections_based_on(crs)
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DatasetBuilder;
    use crate::model::{
        CrsInfo, DatumInfo, GeodeticCrs, GeodeticDatum, GeodeticKind, OperationInfo, ParameterSlot,
        ProjectedCrs, Transformation,
    };

    fn geographic(code: Code, datum: Code) -> Crs {
        Crs::Geodetic(GeodeticCrs {
            info: CrsInfo {
                code,
                name: format!("Geographic {code}"),
                area: None,
                deprecated: false,
            },
            kind: GeodeticKind::Geographic2D,
            coordinate_system: 6422,
            datum,
            base: None,
        })
    }

    fn projected(code: Code, base_crs: Code) -> Crs {
        Crs::Projected(ProjectedCrs {
            info: CrsInfo {
                code,
                name: format!("Projected {code}"),
                area: None,
                deprecated: false,
            },
            coordinate_system: 4400,
            base_crs,
            projection: 16031,
        })
    }

    fn datum(code: Code) -> Datum {
        Datum::Geodetic(GeodeticDatum {
            info: DatumInfo {
                code,
                name: format!("Datum {code}"),
                area: None,
                deprecated: false,
            },
            ellipsoid: 7030,
            prime_meridian: 8901,
        })
    }

    fn small() -> Resources {
        DatasetBuilder::new()
            .datum(datum(6326))
            .datum(datum(6267))
            .crs(geographic(4326, 6326))
            .crs(geographic(4267, 6267))
            .crs(projected(32631, 4326))
            .crs(projected(99999, 32631))
            .operation(Operation::Transformation(Transformation {
                info: OperationInfo {
                    code: 1173,
                    name: "NAD27 to WGS 84 (4)".to_string(),
                    area: None,
                    deprecated: false,
                    invertible: true,
                },
                source_crs: 4267,
                target_crs: 4326,
                method: 9603,
                accuracy: Some(10.0),
            }))
            .method(OperationMethod {
                code: 9603,
                name: "Geocentric translations".to_string(),
                can_reverse: true,
                slots: vec![
                    ParameterSlot {
                        parameter: 8605,
                        sign_reversal: true,
                    },
                    ParameterSlot {
                        parameter: 8606,
                        sign_reversal: true,
                    },
                ],
            })
            .parameter(Parameter {
                code: 8605,
                name: "X-axis translation".to_string(),
            })
            .parameter(Parameter {
                code: 8606,
                name: "Y-axis translation".to_string(),
            })
            .parameter_values(
                1173,
                vec![Some(ParameterValue::number(-8.0, Some(9001))), None],
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_database_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Database>();
    }

    #[test]
    fn test_open_and_lookup() {
        let db = Database::open(&small(), DatabaseOptions::default()).unwrap();
        assert_eq!(db.crs(4326).unwrap().unwrap().name(), "Geographic 4326");
        assert!(db.crs(1).unwrap().is_none());
        assert_eq!(db.operations_from(4267), &[OperationCode::transformation(1173)]);
        assert_eq!(db.operations_to(4326), &[OperationCode::transformation(1173)]);
        assert!(db.operations_from(4326).is_empty());
        assert_eq!(db.projections_based_on(4326), &[32631]);
    }

    #[test]
    fn test_fingerprint_check() {
        let resources = small();
        let fingerprint = resources.fingerprint();
        assert!(Database::open(&resources, DatabaseOptions::new().with_fingerprint(fingerprint)).is_ok());
        let err = Database::open(&resources, DatabaseOptions::new().with_fingerprint([0; 32])).unwrap_err();
        assert_eq!(err, DecodeError::FingerprintMismatch);
    }

    #[test]
    fn test_missing_resource() {
        let full = small();
        let mut resources = Resources::new();
        for name in full.names().filter(|&name| name != names::CRS) {
            resources.insert(name, Arc::clone(full.get(name).unwrap()));
        }
        let err = Database::open(&resources, DatabaseOptions::default()).unwrap_err();
        assert_eq!(err, DecodeError::MissingResource { resource: names::CRS });
    }

    #[test]
    fn test_geodetic_base_and_datum() {
        let db = Database::open(&small(), DatabaseOptions::eager()).unwrap();
        assert_eq!(db.geodetic_base(99999).unwrap().unwrap().code(), 4326);
        assert_eq!(db.geodetic_base(4267).unwrap().unwrap().code(), 4267);
        assert!(db.geodetic_base(12345).unwrap().is_none());
        assert_eq!(db.effective_datum(32631).unwrap().unwrap().code(), 6326);
    }

    #[test]
    fn test_operation_parameters_inverse_flips_sign() {
        let db = Database::open(&small(), DatabaseOptions::default()).unwrap();
        let op = db.transformation(1173).unwrap().unwrap();
        let forward = OperationRef::forward(op);
        let params = db.operation_parameters(&forward).unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "X-axis translation");
        assert_eq!(params[0].value.as_number(), Some(-8.0));

        let inverse = forward.inverse().unwrap();
        let params = db.operation_parameters(&inverse).unwrap();
        assert_eq!(params[0].value.as_number(), Some(8.0));
    }

    #[test]
    fn test_crss_merged_ascending() {
        let db = Database::open(&small(), DatabaseOptions::default()).unwrap();
        let codes: Vec<Code> = db.crss().map(|c| c.unwrap().code()).collect();
        assert_eq!(codes, vec![4267, 4326, 32631, 99999]);
    }
}
