//! Per-category record layouts.
//!
//! Each category has a `decode_*` function turning the data bytes of one
//! record (everything after the key) into a model value, and an `encode_*`
//! function producing those bytes. Text fields are 16-bit offsets into the
//! category's text table; recurring numbers are number codes.

use crate::codec::number::{NumberTable, NumberTableWriter};
use crate::codec::primitives::{Reader, Writer};
use crate::codec::text::{TextTable, TextTableWriter};
use crate::error::{DecodeError, EncodeError};
use crate::limits::{
    MAX_CONCATENATED_STEPS, MAX_PARAMETER_SLOTS, NO_CODE, NO_CODE_32, PARAMETER_TEXT_TAG,
    TAGGED_INDEX_MASK,
};
use crate::model::{
    Area, Axis, BaseDefinition, Category, Code, CompoundCrs, ConcatenatedOperation, Conversion,
    CoordinateSystem, CoordinateSystemKind, Crs, CrsInfo, CrsKind, Datum, DatumInfo, Ellipsoid,
    EllipsoidShape, EngineeringCrs, GeodeticCrs, GeodeticDatum, GeodeticKind, LatitudeRange,
    LongitudeRange, Operation, OperationInfo, OperationMethod, Parameter, ParameterSlot,
    ParameterValue, ParameterValueKind, PrimeMeridian, ProjectedCrs, Transformation, Unit,
    UnitKind, UnitRatio, VerticalCrs,
};

/// Data bytes per record, by category.
pub mod size {
    pub const AREA: usize = 15;
    pub const UNIT: usize = 7;
    pub const ELLIPSOID: usize = 8;
    pub const MERIDIAN: usize = 6;
    pub const DATUM: usize = 10;
    pub const COORDINATE_SYSTEM: usize = 5;
    pub const AXIS: usize = 8;
    pub const CRS: usize = 16;
    pub const COMPOUND_CRS: usize = 13;
    pub const CONVERSION: usize = 7;
    pub const TRANSFORMATION: usize = 17;
    pub const CONCATENATED: usize = 16;
    pub const METHOD: usize = 6;
    pub const METHOD_SLOT: usize = 3;
    pub const PARAMETER: usize = 2;
}

const FLAG_DEPRECATED: u8 = 0x01;
const FLAG_INVERTIBLE: u8 = 0x02;
const FLAG_CAN_REVERSE: u8 = 0x01;

const CS_DIMENSION_MASK: u8 = 0x03;
const CS_KIND_MASK: u8 = 0x70;
const CS_DEPRECATED: u8 = 0x80;

const DATUM_GEODETIC: u8 = 1;
const DATUM_VERTICAL: u8 = 2;
const DATUM_ENGINEERING: u8 = 3;

fn opt_code(v: u16) -> Option<Code> {
    (v != NO_CODE).then_some(v as Code)
}

fn opt_code_32(v: u32) -> Option<Code> {
    (v != NO_CODE_32).then_some(v)
}

fn code16(category: Category, code: Code) -> Result<u16, EncodeError> {
    if code >= NO_CODE as Code {
        return Err(EncodeError::CodeOutOfRange { category, code });
    }
    Ok(code as u16)
}

fn opt_code16(category: Category, code: Option<Code>) -> Result<u16, EncodeError> {
    code.map_or(Ok(NO_CODE), |c| code16(category, c))
}

fn code32(category: Category, code: Code) -> Result<u32, EncodeError> {
    if code == NO_CODE_32 {
        return Err(EncodeError::CodeOutOfRange { category, code });
    }
    Ok(code)
}

fn flags(deprecated: bool, invertible: bool) -> u8 {
    let mut f = 0;
    if deprecated {
        f |= FLAG_DEPRECATED;
    }
    if invertible {
        f |= FLAG_INVERTIBLE;
    }
    f
}

fn companion_offset(len: usize, table: &'static str) -> Result<u16, EncodeError> {
    if len >= NO_CODE as usize {
        return Err(EncodeError::TableOverflow {
            table,
            len,
            max: NO_CODE as usize,
        });
    }
    Ok(len as u16)
}

// =============================================================================
// AREAS
// =============================================================================

/// Decodes a fixed-point degree value, dividing by ten until it is a valid longitude.
pub fn decode_degrees(encoded: i16) -> f64 {
    let mut v = encoded as f64 / 100.0;
    while !(-180.0..=180.0).contains(&v) {
        v /= 10.0;
    }
    v
}

/// Encodes degrees as a scaled i16, rounded to hundredths.
///
/// An extra decimal is kept only when the finer value still reads back
/// outside ±180 at the hundredths scale, so [`decode_degrees`] divides it
/// out again. In practice that is magnitudes between 18 and 32.767.
pub fn encode_degrees(degrees: f64) -> i16 {
    let mut v = degrees * 100.0;
    while (v.round() - v).abs() > 0.000001
        && (v * 10.0).abs() <= i16::MAX as f64
        && ((v * 10.0).round() / 100.0).abs() > 180.0
    {
        v *= 10.0;
    }
    v.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

fn read_iso<const N: usize>(reader: &mut Reader<'_>, field: &'static str) -> Result<Option<String>, DecodeError> {
    let bytes: [u8; N] = reader.read_array(field)?;
    if bytes[0] == 0 {
        return Ok(None);
    }
    std::str::from_utf8(&bytes)
        .map(|s| Some(s.trim_end_matches('\0').to_string()))
        .map_err(|_| DecodeError::InvalidUtf8 { field })
}

fn write_iso<const N: usize>(writer: &mut Writer, value: Option<&str>) {
    let mut bytes = [0u8; N];
    if let Some(value) = value {
        for (slot, b) in bytes.iter_mut().zip(value.bytes()) {
            *slot = b;
        }
    }
    writer.write_bytes(&bytes);
}

pub fn decode_area(code: Code, data: &[u8], text: &TextTable) -> Result<Area, DecodeError> {
    let mut reader = Reader::new(data);
    let west = decode_degrees(reader.read_i16("area_west")?);
    let east = decode_degrees(reader.read_i16("area_east")?);
    let south = decode_degrees(reader.read_i16("area_south")?);
    let north = decode_degrees(reader.read_i16("area_north")?);
    let name = text.get_or_empty(reader.read_u16("area_name")?)?;
    let iso2 = read_iso::<2>(&mut reader, "area_iso2")?;
    let iso3 = read_iso::<3>(&mut reader, "area_iso3")?;
    Ok(Area {
        code,
        name,
        iso2,
        iso3,
        longitude: LongitudeRange::new(west, east),
        latitude: LatitudeRange::new(south, north),
    })
}

pub fn encode_area(area: &Area, text: &mut TextTableWriter) -> Result<Vec<u8>, EncodeError> {
    let mut writer = Writer::with_capacity(size::AREA);
    writer.write_i16(encode_degrees(area.longitude.start));
    writer.write_i16(encode_degrees(area.longitude.end));
    writer.write_i16(encode_degrees(area.latitude.low));
    writer.write_i16(encode_degrees(area.latitude.high));
    writer.write_u16(text.intern(&area.name)?);
    write_iso::<2>(&mut writer, area.iso2.as_deref());
    write_iso::<3>(&mut writer, area.iso3.as_deref());
    Ok(writer.into_bytes())
}

// =============================================================================
// UNITS, ELLIPSOIDS, PRIME MERIDIANS
// =============================================================================

pub fn decode_unit(
    code: Code,
    data: &[u8],
    text: &TextTable,
    numbers: &NumberTable,
) -> Result<Unit, DecodeError> {
    let mut reader = Reader::new(data);
    let tag = reader.read_u8("unit_kind")?;
    let kind = UnitKind::from_u8(tag).ok_or(DecodeError::InvalidTag {
        field: "unit_kind",
        value: tag,
    })?;
    let name = text.get_or_empty(reader.read_u16("unit_name")?)?;
    let numerator = numbers.get(reader.read_u16("unit_factor_b")?)?.unwrap_or(0.0);
    let denominator = numbers.get(reader.read_u16("unit_factor_c")?)?.unwrap_or(0.0);
    let ratio = if denominator != 0.0 {
        Some(UnitRatio {
            numerator,
            denominator,
        })
    } else if numerator == 0.0 {
        None
    } else {
        return Err(DecodeError::InvalidUnitFactors { code });
    };
    Ok(Unit {
        code,
        name,
        kind,
        ratio,
    })
}

pub fn encode_unit(
    unit: &Unit,
    text: &mut TextTableWriter,
    numbers: &mut NumberTableWriter,
) -> Result<Vec<u8>, EncodeError> {
    let (b, c) = match unit.ratio {
        Some(r) if r.denominator == 0.0 => {
            return Err(EncodeError::InvalidUnitFactors { code: unit.code });
        }
        Some(r) => (r.numerator, r.denominator),
        None => (0.0, 0.0),
    };
    let mut writer = Writer::with_capacity(size::UNIT);
    writer.write_u8(unit.kind as u8);
    writer.write_u16(text.intern(&unit.name)?);
    writer.write_u16(numbers.intern(b)?);
    writer.write_u16(numbers.intern(c)?);
    Ok(writer.into_bytes())
}

pub fn decode_ellipsoid(
    code: Code,
    data: &[u8],
    text: &TextTable,
    numbers: &NumberTable,
) -> Result<Ellipsoid, DecodeError> {
    let mut reader = Reader::new(data);
    let a = numbers.get_required(reader.read_u16("ellipsoid_a")?, "ellipsoid_a")?;
    let b = numbers.get_required(reader.read_u16("ellipsoid_b")?, "ellipsoid_b")?;
    let name = text.get_or_empty(reader.read_u16("ellipsoid_name")?)?;
    let unit = reader.read_u16("ellipsoid_uom")? as Code;
    let shape = if b == a {
        EllipsoidShape::Sphere
    } else if b < a / 10.0 {
        EllipsoidShape::InverseFlattening(b)
    } else {
        EllipsoidShape::SemiMinorAxis(b)
    };
    Ok(Ellipsoid {
        code,
        name,
        semi_major_axis: a,
        shape,
        unit,
    })
}

pub fn encode_ellipsoid(
    ellipsoid: &Ellipsoid,
    text: &mut TextTableWriter,
    numbers: &mut NumberTableWriter,
) -> Result<Vec<u8>, EncodeError> {
    let a = ellipsoid.semi_major_axis;
    let b = match ellipsoid.shape {
        EllipsoidShape::Sphere => a,
        EllipsoidShape::InverseFlattening(invf) if invf < a / 10.0 => invf,
        EllipsoidShape::SemiMinorAxis(b) if b >= a / 10.0 => b,
        _ => {
            return Err(EncodeError::Unrepresentable {
                category: Category::Ellipsoid,
                code: ellipsoid.code,
                reason: "second parameter is ambiguous with the semi-major axis",
            });
        }
    };
    let mut writer = Writer::with_capacity(size::ELLIPSOID);
    writer.write_u16(numbers.intern(a)?);
    writer.write_u16(numbers.intern(b)?);
    writer.write_u16(text.intern(&ellipsoid.name)?);
    writer.write_u16(code16(Category::Unit, ellipsoid.unit)?);
    Ok(writer.into_bytes())
}

pub fn decode_prime_meridian(
    code: Code,
    data: &[u8],
    text: &TextTable,
    numbers: &NumberTable,
) -> Result<PrimeMeridian, DecodeError> {
    let mut reader = Reader::new(data);
    let unit = reader.read_u16("meridian_uom")? as Code;
    let longitude = numbers.get(reader.read_u16("meridian_longitude")?)?.unwrap_or(0.0);
    let name = text.get_or_empty(reader.read_u16("meridian_name")?)?;
    Ok(PrimeMeridian {
        code,
        name,
        longitude,
        unit,
    })
}

pub fn encode_prime_meridian(
    meridian: &PrimeMeridian,
    text: &mut TextTableWriter,
    numbers: &mut NumberTableWriter,
) -> Result<Vec<u8>, EncodeError> {
    let mut writer = Writer::with_capacity(size::MERIDIAN);
    writer.write_u16(code16(Category::Unit, meridian.unit)?);
    writer.write_u16(numbers.intern(meridian.longitude)?);
    writer.write_u16(text.intern(&meridian.name)?);
    Ok(writer.into_bytes())
}

// =============================================================================
// DATUMS AND COORDINATE SYSTEMS
// =============================================================================

pub fn decode_datum(code: Code, data: &[u8], text: &TextTable) -> Result<Datum, DecodeError> {
    let mut reader = Reader::new(data);
    let kind = reader.read_u8("datum_kind")?;
    let flags = reader.read_u8("datum_flags")?;
    let info = DatumInfo {
        code,
        name: text.get_or_empty(reader.read_u16("datum_name")?)?,
        area: opt_code(reader.read_u16("datum_area")?),
        deprecated: flags & FLAG_DEPRECATED != 0,
    };
    let ellipsoid = opt_code(reader.read_u16("datum_ellipsoid")?);
    let meridian = opt_code(reader.read_u16("datum_meridian")?);
    match kind {
        DATUM_GEODETIC => {
            let missing = |field: &'static str| DecodeError::MissingField {
                category: Category::Datum,
                code,
                field,
            };
            Ok(Datum::Geodetic(GeodeticDatum {
                info,
                ellipsoid: ellipsoid.ok_or_else(|| missing("ellipsoid"))?,
                prime_meridian: meridian.ok_or_else(|| missing("prime meridian"))?,
            }))
        }
        DATUM_VERTICAL => Ok(Datum::Vertical(info)),
        DATUM_ENGINEERING => Ok(Datum::Engineering(info)),
        value => Err(DecodeError::InvalidTag {
            field: "datum_kind",
            value,
        }),
    }
}

pub fn encode_datum(datum: &Datum, text: &mut TextTableWriter) -> Result<Vec<u8>, EncodeError> {
    let (kind, ellipsoid, meridian) = match datum {
        Datum::Geodetic(d) => (
            DATUM_GEODETIC,
            code16(Category::Ellipsoid, d.ellipsoid)?,
            code16(Category::PrimeMeridian, d.prime_meridian)?,
        ),
        Datum::Vertical(_) => (DATUM_VERTICAL, NO_CODE, NO_CODE),
        Datum::Engineering(_) => (DATUM_ENGINEERING, NO_CODE, NO_CODE),
    };
    let info = datum.info();
    let mut writer = Writer::with_capacity(size::DATUM);
    writer.write_u8(kind);
    writer.write_u8(flags(info.deprecated, false));
    writer.write_u16(text.intern(&info.name)?);
    writer.write_u16(opt_code16(Category::Area, info.area)?);
    writer.write_u16(ellipsoid);
    writer.write_u16(meridian);
    Ok(writer.into_bytes())
}

/// Decodes a coordinate system; its axes live in the `axes.dat` companion.
pub fn decode_coordinate_system(
    code: Code,
    data: &[u8],
    text: &TextTable,
    axes: &[u8],
    axes_text: &TextTable,
) -> Result<CoordinateSystem, DecodeError> {
    let mut reader = Reader::new(data);
    let type_byte = reader.read_u8("cs_type")?;
    let kind = CoordinateSystemKind::from_u8(type_byte & CS_KIND_MASK).ok_or(DecodeError::InvalidTag {
        field: "cs_kind",
        value: type_byte,
    })?;
    let name = text.get_or_empty(reader.read_u16("cs_name")?)?;
    let offset = reader.read_u16("cs_axis_offset")? as usize;

    let dimension = (type_byte & CS_DIMENSION_MASK) as usize;
    let mut axis_reader = Reader::at(axes, offset, "axes")?;
    let mut axis_list = Vec::with_capacity(dimension);
    for _ in 0..dimension {
        let unit = opt_code(axis_reader.read_u16("axis_uom")?);
        let name = axes_text.get_or_empty(axis_reader.read_u16("axis_name")?)?;
        let orientation = axes_text.get_or_empty(axis_reader.read_u16("axis_orientation")?)?;
        let abbreviation = axes_text.get_or_empty(axis_reader.read_u16("axis_abbreviation")?)?;
        axis_list.push(Axis {
            name,
            abbreviation,
            orientation,
            unit,
        });
    }
    Ok(CoordinateSystem {
        code,
        name,
        kind,
        deprecated: type_byte & CS_DEPRECATED != 0,
        axes: axis_list,
    })
}

pub fn encode_coordinate_system(
    cs: &CoordinateSystem,
    text: &mut TextTableWriter,
    axes: &mut Writer,
    axes_text: &mut TextTableWriter,
) -> Result<Vec<u8>, EncodeError> {
    if cs.axes.is_empty() || cs.axes.len() > CS_DIMENSION_MASK as usize {
        return Err(EncodeError::Unrepresentable {
            category: Category::CoordinateSystem,
            code: cs.code,
            reason: "dimension must be 1, 2 or 3",
        });
    }
    let mut type_byte = cs.kind as u8 | cs.axes.len() as u8;
    if cs.deprecated {
        type_byte |= CS_DEPRECATED;
    }
    let offset = companion_offset(axes.len(), "axes.dat")?;
    for axis in &cs.axes {
        axes.write_u16(opt_code16(Category::Unit, axis.unit)?);
        axes.write_u16(axes_text.intern(&axis.name)?);
        axes.write_u16(axes_text.intern(&axis.orientation)?);
        axes.write_u16(axes_text.intern(&axis.abbreviation)?);
    }
    let mut writer = Writer::with_capacity(size::COORDINATE_SYSTEM);
    writer.write_u8(type_byte);
    writer.write_u16(text.intern(&cs.name)?);
    writer.write_u16(offset);
    Ok(writer.into_bytes())
}

// =============================================================================
// CRS
// =============================================================================

pub fn decode_crs(code: Code, data: &[u8], text: &TextTable) -> Result<Crs, DecodeError> {
    let mut reader = Reader::new(data);
    let kind_byte = reader.read_u8("crs_kind")?;
    let flags = reader.read_u8("crs_flags")?;
    let datum = opt_code(reader.read_u16("crs_datum")?);
    let base_crs = opt_code_32(reader.read_u32("crs_base")?);
    let base_op = opt_code(reader.read_u16("crs_base_op")?);
    let coordinate_system = reader.read_u16("crs_cs")? as Code;
    let info = CrsInfo {
        code,
        area: opt_code(reader.read_u16("crs_area")?),
        name: text.get_or_empty(reader.read_u16("crs_name")?)?,
        deprecated: flags & FLAG_DEPRECATED != 0,
    };

    let missing = |field: &'static str| DecodeError::MissingField {
        category: Category::Crs,
        code,
        field,
    };
    let kind = CrsKind::from_u8(kind_byte).ok_or(DecodeError::InvalidTag {
        field: "crs_kind",
        value: kind_byte,
    })?;
    let geodetic = |kind: GeodeticKind| -> Result<Crs, DecodeError> {
        Ok(Crs::Geodetic(GeodeticCrs {
            info: info.clone(),
            kind,
            coordinate_system,
            datum: datum.ok_or_else(|| missing("datum"))?,
            base: base_crs
                .zip(base_op)
                .map(|(crs, operation)| BaseDefinition { crs, operation }),
        }))
    };
    match kind {
        CrsKind::Geographic2D => geodetic(GeodeticKind::Geographic2D),
        CrsKind::Geographic3D => geodetic(GeodeticKind::Geographic3D),
        CrsKind::Geocentric => geodetic(GeodeticKind::Geocentric),
        CrsKind::Projected => Ok(Crs::Projected(ProjectedCrs {
            coordinate_system,
            base_crs: base_crs.ok_or_else(|| missing("base CRS"))?,
            projection: base_op.ok_or_else(|| missing("projection"))?,
            info,
        })),
        CrsKind::Vertical => Ok(Crs::Vertical(VerticalCrs {
            coordinate_system,
            datum: datum.ok_or_else(|| missing("datum"))?,
            info,
        })),
        CrsKind::Engineering => Ok(Crs::Engineering(EngineeringCrs {
            coordinate_system,
            datum: datum.ok_or_else(|| missing("datum"))?,
            info,
        })),
        CrsKind::Compound => Err(DecodeError::InvalidTag {
            field: "crs_kind",
            value: kind_byte,
        }),
    }
}

/// Base CRS of a projected CRS record, read without decoding the rest.
pub fn peek_projected_base(data: &[u8]) -> Result<Option<Code>, DecodeError> {
    let mut reader = Reader::new(data);
    let kind = reader.read_u8("crs_kind")?;
    if kind != CrsKind::Projected as u8 {
        return Ok(None);
    }
    reader.skip(1 + 2, "crs_flags")?;
    Ok(opt_code_32(reader.read_u32("crs_base")?))
}

pub fn encode_crs(crs: &Crs, text: &mut TextTableWriter) -> Result<Vec<u8>, EncodeError> {
    let info = crs.info();
    let (datum, base_crs, base_op, cs) = match crs {
        Crs::Geodetic(c) => (
            code16(Category::Datum, c.datum)?,
            match c.base {
                Some(base) => code32(Category::Crs, base.crs)?,
                None => NO_CODE_32,
            },
            opt_code16(Category::Conversion, c.base.map(|b| b.operation))?,
            c.coordinate_system,
        ),
        Crs::Projected(c) => (
            NO_CODE,
            code32(Category::Crs, c.base_crs)?,
            code16(Category::Conversion, c.projection)?,
            c.coordinate_system,
        ),
        Crs::Vertical(c) => (code16(Category::Datum, c.datum)?, NO_CODE_32, NO_CODE, c.coordinate_system),
        Crs::Engineering(c) => (code16(Category::Datum, c.datum)?, NO_CODE_32, NO_CODE, c.coordinate_system),
        Crs::Compound(_) => {
            return Err(EncodeError::Unrepresentable {
                category: Category::Crs,
                code: info.code,
                reason: "compound CRSs are stored separately",
            });
        }
    };
    let mut writer = Writer::with_capacity(size::CRS);
    writer.write_u8(crs.kind() as u8);
    writer.write_u8(flags(info.deprecated, false));
    writer.write_u16(datum);
    writer.write_u32(base_crs);
    writer.write_u16(base_op);
    writer.write_u16(code16(Category::CoordinateSystem, cs)?);
    writer.write_u16(opt_code16(Category::Area, info.area)?);
    writer.write_u16(text.intern(&info.name)?);
    Ok(writer.into_bytes())
}

pub fn decode_compound_crs(code: Code, data: &[u8], text: &TextTable) -> Result<Crs, DecodeError> {
    let mut reader = Reader::new(data);
    let flags = reader.read_u8("compound_flags")?;
    let horizontal = reader.read_u32("compound_horizontal")?;
    let vertical = reader.read_u32("compound_vertical")?;
    let area = opt_code(reader.read_u16("compound_area")?);
    let name = text.get_or_empty(reader.read_u16("compound_name")?)?;
    Ok(Crs::Compound(CompoundCrs {
        info: CrsInfo {
            code,
            name,
            area,
            deprecated: flags & FLAG_DEPRECATED != 0,
        },
        horizontal,
        vertical,
    }))
}

pub fn encode_compound_crs(crs: &CompoundCrs, text: &mut TextTableWriter) -> Result<Vec<u8>, EncodeError> {
    let mut writer = Writer::with_capacity(size::COMPOUND_CRS);
    writer.write_u8(flags(crs.info.deprecated, false));
    writer.write_u32(code32(Category::Crs, crs.horizontal)?);
    writer.write_u32(code32(Category::Crs, crs.vertical)?);
    writer.write_u16(opt_code16(Category::Area, crs.info.area)?);
    writer.write_u16(text.intern(&crs.info.name)?);
    Ok(writer.into_bytes())
}

// =============================================================================
// OPERATIONS
// =============================================================================

fn operation_info(code: Code, flags: u8, area: u16, name: String) -> OperationInfo {
    OperationInfo {
        code,
        name,
        area: opt_code(area),
        deprecated: flags & FLAG_DEPRECATED != 0,
        invertible: flags & FLAG_INVERTIBLE != 0,
    }
}

pub fn decode_conversion(code: Code, data: &[u8], text: &TextTable) -> Result<Operation, DecodeError> {
    let mut reader = Reader::new(data);
    let flags = reader.read_u8("conversion_flags")?;
    let method = reader.read_u16("conversion_method")? as Code;
    let area = reader.read_u16("conversion_area")?;
    let name = text.get_or_empty(reader.read_u16("conversion_name")?)?;
    Ok(Operation::Conversion(Conversion {
        info: operation_info(code, flags, area, name),
        method,
    }))
}

pub fn decode_transformation(
    code: Code,
    data: &[u8],
    text: &TextTable,
    numbers: &NumberTable,
) -> Result<Operation, DecodeError> {
    let mut reader = Reader::new(data);
    let flags = reader.read_u8("transformation_flags")?;
    let source_crs = reader.read_u32("transformation_source")?;
    let target_crs = reader.read_u32("transformation_target")?;
    let method = reader.read_u16("transformation_method")? as Code;
    let accuracy = numbers.get(reader.read_u16("transformation_accuracy")?)?;
    let area = reader.read_u16("transformation_area")?;
    let name = text.get_or_empty(reader.read_u16("transformation_name")?)?;
    Ok(Operation::Transformation(Transformation {
        info: operation_info(code, flags, area, name),
        source_crs,
        target_crs,
        method,
        accuracy,
    }))
}

/// Declared `(source, target, invertible)` of a transformation or
/// concatenated operation record, read without decoding names.
pub fn peek_endpoints(data: &[u8]) -> Result<(Code, Code, bool), DecodeError> {
    let mut reader = Reader::new(data);
    let flags = reader.read_u8("operation_flags")?;
    let source = reader.read_u32("operation_source")?;
    let target = reader.read_u32("operation_target")?;
    Ok((source, target, flags & FLAG_INVERTIBLE != 0))
}

pub fn decode_concatenated(
    code: Code,
    data: &[u8],
    text: &TextTable,
    steps: &[u8],
) -> Result<Operation, DecodeError> {
    let mut reader = Reader::new(data);
    let flags = reader.read_u8("concatenated_flags")?;
    let source_crs = reader.read_u32("concatenated_source")?;
    let target_crs = reader.read_u32("concatenated_target")?;
    let area = reader.read_u16("concatenated_area")?;
    let name = text.get_or_empty(reader.read_u16("concatenated_name")?)?;
    let count = reader.read_u8("concatenated_step_count")? as usize;
    let offset = reader.read_u16("concatenated_step_offset")? as usize;
    if count == 0 {
        return Err(DecodeError::EmptyConcatenation { code });
    }
    let mut step_reader = Reader::at(steps, offset, "oppath")?;
    let step_codes = (0..count)
        .map(|_| step_reader.read_u16("concatenated_step").map(Code::from))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Operation::Concatenated(ConcatenatedOperation {
        info: operation_info(code, flags, area, name),
        source_crs,
        target_crs,
        steps: step_codes,
    }))
}

/// Encodes a conversion, transformation or concatenated operation record.
/// Concatenated steps are appended to `steps`.
pub fn encode_operation(
    op: &Operation,
    text: &mut TextTableWriter,
    numbers: &mut NumberTableWriter,
    steps: &mut Writer,
) -> Result<Vec<u8>, EncodeError> {
    let info = op.info();
    let category = op.kind().category();
    let mut writer = Writer::new();
    writer.write_u8(flags(info.deprecated, info.invertible));
    match op {
        Operation::Conversion(c) => {
            writer.write_u16(code16(Category::OperationMethod, c.method)?);
            writer.write_u16(opt_code16(Category::Area, info.area)?);
            writer.write_u16(text.intern(&info.name)?);
        }
        Operation::Transformation(t) => {
            writer.write_u32(code32(Category::Crs, t.source_crs)?);
            writer.write_u32(code32(Category::Crs, t.target_crs)?);
            writer.write_u16(code16(Category::OperationMethod, t.method)?);
            writer.write_u16(numbers.intern_opt(t.accuracy)?);
            writer.write_u16(opt_code16(Category::Area, info.area)?);
            writer.write_u16(text.intern(&info.name)?);
        }
        Operation::Concatenated(c) => {
            if c.steps.is_empty() {
                return Err(EncodeError::EmptyConcatenation { code: info.code });
            }
            if c.steps.len() > MAX_CONCATENATED_STEPS {
                return Err(EncodeError::LengthExceedsLimit {
                    field: "concatenated_steps",
                    len: c.steps.len(),
                    max: MAX_CONCATENATED_STEPS,
                });
            }
            let offset = companion_offset(steps.len(), "oppath.dat")?;
            for &step in &c.steps {
                steps.write_u16(code16(category, step)?);
            }
            writer.write_u32(code32(Category::Crs, c.source_crs)?);
            writer.write_u32(code32(Category::Crs, c.target_crs)?);
            writer.write_u16(opt_code16(Category::Area, info.area)?);
            writer.write_u16(text.intern(&info.name)?);
            writer.write_u8(c.steps.len() as u8);
            writer.write_u16(offset);
        }
    }
    Ok(writer.into_bytes())
}

// =============================================================================
// METHODS AND PARAMETERS
// =============================================================================

pub fn decode_method(
    code: Code,
    data: &[u8],
    text: &TextTable,
    slots: &[u8],
) -> Result<OperationMethod, DecodeError> {
    let mut reader = Reader::new(data);
    let flags = reader.read_u8("method_flags")?;
    let name = text.get_or_empty(reader.read_u16("method_name")?)?;
    let count = reader.read_u8("method_slot_count")? as usize;
    let offset = reader.read_u16("method_slot_offset")? as usize;
    let mut slot_reader = Reader::at(slots, offset, "opmethodparams")?;
    let mut slot_list = Vec::with_capacity(count);
    for _ in 0..count {
        slot_list.push(ParameterSlot {
            parameter: slot_reader.read_u16("slot_parameter")? as Code,
            sign_reversal: slot_reader.read_u8("slot_sign_reversal")? != 0,
        });
    }
    Ok(OperationMethod {
        code,
        name,
        can_reverse: flags & FLAG_CAN_REVERSE != 0,
        slots: slot_list,
    })
}

pub fn encode_method(
    method: &OperationMethod,
    text: &mut TextTableWriter,
    slots: &mut Writer,
) -> Result<Vec<u8>, EncodeError> {
    if method.slots.len() > MAX_PARAMETER_SLOTS {
        return Err(EncodeError::LengthExceedsLimit {
            field: "method_slots",
            len: method.slots.len(),
            max: MAX_PARAMETER_SLOTS,
        });
    }
    let offset = companion_offset(slots.len(), "opmethodparams.dat")?;
    for slot in &method.slots {
        slots.write_u16(code16(Category::Parameter, slot.parameter)?);
        slots.write_u8(slot.sign_reversal as u8);
    }
    let mut writer = Writer::with_capacity(size::METHOD);
    writer.write_u8(if method.can_reverse { FLAG_CAN_REVERSE } else { 0 });
    writer.write_u16(text.intern(&method.name)?);
    writer.write_u8(method.slots.len() as u8);
    writer.write_u16(offset);
    Ok(writer.into_bytes())
}

pub fn decode_parameter(code: Code, data: &[u8], text: &TextTable) -> Result<Parameter, DecodeError> {
    let mut reader = Reader::new(data);
    let name = text.get_or_empty(reader.read_u16("parameter_name")?)?;
    Ok(Parameter { code, name })
}

pub fn encode_parameter(parameter: &Parameter, text: &mut TextTableWriter) -> Result<Vec<u8>, EncodeError> {
    let mut writer = Writer::with_capacity(size::PARAMETER);
    writer.write_u16(text.intern(&parameter.name)?);
    Ok(writer.into_bytes())
}

/// Decodes the values of one operation, aligned to its method's slots.
pub fn decode_parameter_values(
    data: &[u8],
    text: &TextTable,
    numbers: &NumberTable,
) -> Result<Vec<Option<ParameterValue>>, DecodeError> {
    let mut reader = Reader::new(data);
    let count = reader.read_u8("parameter_count")? as usize;
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        let raw = reader.read_u16("parameter_value")?;
        let unit = opt_code(reader.read_u16("parameter_uom")?);
        let value = if raw == NO_CODE {
            None
        } else if raw & 0xC000 == PARAMETER_TEXT_TAG {
            let text_value = text.get_at((raw & TAGGED_INDEX_MASK) as usize)?;
            Some(ParameterValue {
                value: ParameterValueKind::Text(text_value),
                unit,
            })
        } else {
            numbers.get(raw)?.map(|v| ParameterValue::number(v, unit))
        };
        values.push(value);
    }
    Ok(values)
}

pub fn encode_parameter_values(
    values: &[Option<ParameterValue>],
    text: &mut TextTableWriter,
    numbers: &mut NumberTableWriter,
) -> Result<Vec<u8>, EncodeError> {
    if values.len() > MAX_PARAMETER_SLOTS {
        return Err(EncodeError::LengthExceedsLimit {
            field: "parameter_values",
            len: values.len(),
            max: MAX_PARAMETER_SLOTS,
        });
    }
    let mut writer = Writer::with_capacity(1 + values.len() * 4);
    writer.write_u8(values.len() as u8);
    for value in values {
        let (raw, unit) = match value {
            None => (NO_CODE, None),
            Some(ParameterValue {
                value: ParameterValueKind::Number(v),
                unit,
            }) => (numbers.intern(*v)?, *unit),
            Some(ParameterValue {
                value: ParameterValueKind::Text(s),
                unit,
            }) => (PARAMETER_TEXT_TAG | text.intern(s)?, *unit),
        };
        writer.write_u16(raw);
        writer.write_u16(opt_code16(Category::Unit, unit)?);
    }
    Ok(writer.into_bytes())
}
