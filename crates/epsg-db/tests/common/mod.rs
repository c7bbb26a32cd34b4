//! A small EPSG-like dataset shared by the integration tests.

#![allow(dead_code)]

use epsg_db::model::{
    Area, Axis, CompoundCrs, ConcatenatedOperation, Conversion, CoordinateSystem,
    CoordinateSystemKind, Crs, CrsInfo, Datum, DatumInfo, Ellipsoid, EllipsoidShape,
    EngineeringCrs, GeodeticCrs, GeodeticDatum, GeodeticKind, LatitudeRange, LongitudeRange,
    Operation, OperationInfo, OperationMethod, Parameter, ParameterSlot, ParameterValue,
    PrimeMeridian, ProjectedCrs, Transformation, Unit, UnitKind, UnitRatio, VerticalCrs,
};
use epsg_db::{Code, Database, DatabaseOptions, DatasetBuilder, Resources};
use lazy_static::lazy_static;

lazy_static! {
    pub static ref RESOURCES: Resources = dataset().build().expect("fixture dataset encodes");
    pub static ref DB: Database =
        Database::open(&RESOURCES, DatabaseOptions::default()).expect("fixture dataset opens");
}

pub fn area(code: Code, name: &str, lon: (f64, f64), lat: (f64, f64), iso: Option<(&str, &str)>) -> Area {
    Area {
        code,
        name: name.to_string(),
        iso2: iso.map(|(two, _)| two.to_string()),
        iso3: iso.map(|(_, three)| three.to_string()),
        longitude: LongitudeRange::new(lon.0, lon.1),
        latitude: LatitudeRange::new(lat.0, lat.1),
    }
}

fn unit(code: Code, name: &str, kind: UnitKind, ratio: Option<(f64, f64)>) -> Unit {
    Unit {
        code,
        name: name.to_string(),
        kind,
        ratio: ratio.map(|(numerator, denominator)| UnitRatio {
            numerator,
            denominator,
        }),
    }
}

fn ellipsoid(code: Code, name: &str, semi_major_axis: f64, shape: EllipsoidShape) -> Ellipsoid {
    Ellipsoid {
        code,
        name: name.to_string(),
        semi_major_axis,
        shape,
        unit: 9001,
    }
}

fn geodetic_datum(code: Code, name: &str, ellipsoid: Code, area: Code) -> Datum {
    Datum::Geodetic(GeodeticDatum {
        info: DatumInfo {
            code,
            name: name.to_string(),
            area: Some(area),
            deprecated: false,
        },
        ellipsoid,
        prime_meridian: 8901,
    })
}

fn axis(name: &str, abbreviation: &str, orientation: &str, unit: Code) -> Axis {
    Axis {
        name: name.to_string(),
        abbreviation: abbreviation.to_string(),
        orientation: orientation.to_string(),
        unit: Some(unit),
    }
}

pub fn crs_info(code: Code, name: &str, area: Option<Code>) -> CrsInfo {
    CrsInfo {
        code,
        name: name.to_string(),
        area,
        deprecated: false,
    }
}

pub fn geographic(code: Code, name: &str, datum: Code, area: Code) -> Crs {
    Crs::Geodetic(GeodeticCrs {
        info: crs_info(code, name, Some(area)),
        kind: GeodeticKind::Geographic2D,
        coordinate_system: 6422,
        datum,
        base: None,
    })
}

pub fn projected(code: Code, name: &str, base_crs: Code, projection: Code, area: Code) -> Crs {
    Crs::Projected(ProjectedCrs {
        info: crs_info(code, name, Some(area)),
        coordinate_system: 4400,
        base_crs,
        projection,
    })
}

pub fn op_info(code: Code, name: &str, area: Option<Code>, invertible: bool) -> OperationInfo {
    OperationInfo {
        code,
        name: name.to_string(),
        area,
        deprecated: false,
        invertible,
    }
}

pub fn conversion(code: Code, name: &str, method: Code, invertible: bool) -> Operation {
    Operation::Conversion(Conversion {
        info: op_info(code, name, None, invertible),
        method,
    })
}

pub fn transformation(
    code: Code,
    name: &str,
    (source_crs, target_crs): (Code, Code),
    area: Code,
    accuracy: Option<f64>,
) -> Operation {
    let method = if code == 15851 { 9613 } else { 9603 };
    Operation::Transformation(Transformation {
        info: op_info(code, name, Some(area), true),
        source_crs,
        target_crs,
        method,
        accuracy,
    })
}

fn slots(parameters: &[Code], sign_reversal: bool) -> Vec<ParameterSlot> {
    parameters
        .iter()
        .map(|&parameter| ParameterSlot {
            parameter,
            sign_reversal,
        })
        .collect()
}

fn method(code: Code, name: &str, slots: Vec<ParameterSlot>) -> OperationMethod {
    OperationMethod {
        code,
        name: name.to_string(),
        can_reverse: true,
        slots,
    }
}

fn parameter(code: Code, name: &str) -> Parameter {
    Parameter {
        code,
        name: name.to_string(),
    }
}

fn numbers(values: &[(f64, Code)]) -> Vec<Option<ParameterValue>> {
    values
        .iter()
        .map(|&(value, unit)| Some(ParameterValue::number(value, Some(unit))))
        .collect()
}

/// Areas, units, reference frames, CRSs and operations around NAD27, NAD83,
/// WGS 84 and GDA94.
pub fn dataset() -> DatasetBuilder {
    DatasetBuilder::new()
        // Areas
        .area(area(1262, "World", (-180.0, 180.0), (-90.0, 90.0), None))
        .area(area(1241, "North America - NAD27", (-172.54, -47.74), (13.09, 83.17), None))
        .area(area(1350, "North America - NAD83", (167.65, -47.74), (14.92, 86.46), None))
        .area(area(2060, "World - N hemisphere - 0°E to 6°E", (0.0, 6.0), (0.0, 84.0), None))
        .area(area(3340, "Australia - onshore", (93.41, 173.35), (-60.55, -8.47), Some(("AU", "AUS"))))
        // Units
        .unit(unit(9001, "metre", UnitKind::Length, Some((1.0, 1.0))))
        .unit(unit(9101, "radian", UnitKind::Angle, Some((1.0, 1.0))))
        .unit(unit(9102, "degree", UnitKind::Angle, Some((std::f64::consts::PI, 180.0))))
        .unit(unit(9122, "degree (supplier to define representation)", UnitKind::Angle, Some((std::f64::consts::PI, 180.0))))
        .unit(unit(9110, "sexagesimal DMS", UnitKind::Angle, None))
        .unit(unit(9201, "unity", UnitKind::Scale, Some((1.0, 1.0))))
        // Ellipsoids and prime meridian
        .ellipsoid(ellipsoid(7030, "WGS 84", 6378137.0, EllipsoidShape::InverseFlattening(298.257223563)))
        .ellipsoid(ellipsoid(7008, "Clarke 1866", 6378206.4, EllipsoidShape::SemiMinorAxis(6356583.8)))
        .ellipsoid(ellipsoid(7019, "GRS 1980", 6378137.0, EllipsoidShape::InverseFlattening(298.257222101)))
        .ellipsoid(ellipsoid(7035, "Sphere", 6371000.0, EllipsoidShape::Sphere))
        .prime_meridian(PrimeMeridian {
            code: 8901,
            name: "Greenwich".to_string(),
            longitude: 0.0,
            unit: 9102,
        })
        // Datums
        .datum(geodetic_datum(6326, "World Geodetic System 1984", 7030, 1262))
        .datum(geodetic_datum(6267, "North American Datum 1927", 7008, 1241))
        .datum(geodetic_datum(6269, "North American Datum 1983", 7019, 1350))
        .datum(geodetic_datum(6283, "Geocentric Datum of Australia 1994", 7019, 3340))
        .datum(Datum::Vertical(DatumInfo {
            code: 5103,
            name: "North American Vertical Datum 1988".to_string(),
            area: Some(1350),
            deprecated: false,
        }))
        .datum(Datum::Engineering(DatumInfo {
            code: 9315,
            name: "Site datum".to_string(),
            area: None,
            deprecated: false,
        }))
        // Coordinate systems
        .coordinate_system(CoordinateSystem {
            code: 6422,
            name: "Ellipsoidal 2D CS. Axes: latitude, longitude.".to_string(),
            kind: CoordinateSystemKind::Ellipsoidal,
            deprecated: false,
            axes: vec![
                axis("Geodetic latitude", "Lat", "north", 9122),
                axis("Geodetic longitude", "Lon", "east", 9122),
            ],
        })
        .coordinate_system(CoordinateSystem {
            code: 4400,
            name: "Cartesian 2D CS. Axes: easting, northing (E,N).".to_string(),
            kind: CoordinateSystemKind::Cartesian,
            deprecated: false,
            axes: vec![
                axis("Easting", "E", "east", 9001),
                axis("Northing", "N", "north", 9001),
            ],
        })
        .coordinate_system(CoordinateSystem {
            code: 6499,
            name: "Vertical CS. Axis: height (H).".to_string(),
            kind: CoordinateSystemKind::Vertical,
            deprecated: false,
            axes: vec![axis("Gravity-related height", "H", "up", 9001)],
        })
        // CRSs
        .crs(geographic(4326, "WGS 84", 6326, 1262))
        .crs(geographic(4267, "NAD27", 6267, 1241))
        .crs(geographic(4269, "NAD83", 6269, 1350))
        .crs(geographic(4283, "GDA94", 6283, 3340))
        .crs(projected(32631, "WGS 84 / UTM zone 31N", 4326, 16031, 2060))
        .crs(projected(3857, "WGS 84 / Pseudo-Mercator", 4326, 3856, 1262))
        .crs(projected(26717, "NAD27 / UTM zone 17N", 4267, 16017, 1241))
        .crs(projected(26917, "NAD83 / UTM zone 17N", 4269, 16017, 1350))
        .crs(projected(5000, "Site grid on UTM 31N", 32631, 5001, 2060))
        .crs(projected(5900, "WGS 84 / one-way grid", 4326, 5901, 1262))
        .crs(Crs::Vertical(VerticalCrs {
            info: crs_info(5703, "NAVD88 height", Some(1350)),
            coordinate_system: 6499,
            datum: 5103,
        }))
        .crs(Crs::Engineering(EngineeringCrs {
            info: crs_info(5800, "Site local", None),
            coordinate_system: 4400,
            datum: 9315,
        }))
        .crs(Crs::Compound(CompoundCrs {
            info: crs_info(5498, "NAD83 + NAVD88 height", Some(1350)),
            horizontal: 4269,
            vertical: 5703,
        }))
        // Conversions
        .operation(conversion(16031, "UTM zone 31N", 9807, true))
        .operation(conversion(16017, "UTM zone 17N", 9807, true))
        .operation(conversion(3856, "Popular Visualisation Pseudo-Mercator", 1024, true))
        .operation(conversion(5001, "Site grid affine", 9624, true))
        .operation(conversion(5901, "One-way grid", 9624, false))
        // Transformations
        .operation(transformation(1173, "NAD27 to WGS 84 (4)", (4267, 4326), 1241, Some(10.0)))
        .operation(transformation(15851, "NAD27 to NAD83 (1)", (4267, 4269), 1241, Some(5.0)))
        .operation(transformation(1188, "NAD83 to WGS 84 (1)", (4269, 4326), 1350, Some(4.0)))
        .operation(transformation(1150, "GDA94 to WGS 84 (1)", (4283, 4326), 3340, Some(3.0)))
        .operation(transformation(1999, "NAD27 to GDA94 (test)", (4267, 4283), 2060, Some(1.0)))
        .operation(Operation::Concatenated(ConcatenatedOperation {
            info: op_info(8510, "NAD27 to NAD83 via WGS 84", Some(1241), true),
            source_crs: 4267,
            target_crs: 4269,
            steps: vec![1173, 1188],
        }))
        // Methods and parameters
        .method(method(9807, "Transverse Mercator", slots(&[8801, 8802, 8805, 8806, 8807], false)))
        .method(method(1024, "Popular Visualisation Pseudo Mercator", slots(&[8801, 8802, 8806, 8807], false)))
        .method(method(9603, "Geocentric translations (geog2D domain)", slots(&[8605, 8606, 8607], true)))
        .method(method(9613, "NADCON", slots(&[8657, 8658], false)))
        .method(method(9624, "Affine parametric transformation", Vec::new()))
        .parameter(parameter(8801, "Latitude of natural origin"))
        .parameter(parameter(8802, "Longitude of natural origin"))
        .parameter(parameter(8805, "Scale factor at natural origin"))
        .parameter(parameter(8806, "False easting"))
        .parameter(parameter(8807, "False northing"))
        .parameter(parameter(8605, "X-axis translation"))
        .parameter(parameter(8606, "Y-axis translation"))
        .parameter(parameter(8607, "Z-axis translation"))
        .parameter(parameter(8657, "Latitude difference file"))
        .parameter(parameter(8658, "Longitude difference file"))
        // Parameter values
        .parameter_values(
            16031,
            numbers(&[(0.0, 9102), (3.0, 9102), (0.9996, 9201), (500000.0, 9001), (0.0, 9001)]),
        )
        .parameter_values(
            16017,
            numbers(&[(0.0, 9102), (-81.0, 9102), (0.9996, 9201), (500000.0, 9001), (0.0, 9001)]),
        )
        .parameter_values(3856, numbers(&[(0.0, 9102), (0.0, 9102), (0.0, 9001), (0.0, 9001)]))
        .parameter_values(1173, numbers(&[(-8.0, 9001), (160.0, 9001), (176.0, 9001)]))
        .parameter_values(1188, numbers(&[(0.0, 9001), (0.0, 9001), (0.0, 9001)]))
        .parameter_values(1150, numbers(&[(0.0, 9001), (0.0, 9001), (0.0, 9001)]))
        .parameter_values(
            15851,
            vec![
                Some(ParameterValue::text("conus.las")),
                Some(ParameterValue::text("conus.los")),
            ],
        )
}
