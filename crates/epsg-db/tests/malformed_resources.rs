mod common;

use common::RESOURCES;
use epsg_db::codec::{names, write_keyed_resource};
use epsg_db::model::Category;
use epsg_db::{Database, DatabaseOptions, DatasetBuilder, DecodeError, ErrorCode, PathGenerator, Resources};
use proptest::prelude::*;

fn replaced(name: &str, data: Vec<u8>) -> Resources {
    let mut resources = RESOURCES.clone();
    resources.insert(name, data);
    resources
}

fn original(name: &str) -> Vec<u8> {
    RESOURCES.get(name).expect("fixture resource").to_vec()
}

fn open(resources: &Resources) -> Result<Database, DecodeError> {
    Database::open(resources, DatabaseOptions::default())
}

#[test]
fn test_truncated_records_fail_open() {
    let mut crs = original(names::CRS);
    crs.truncate(crs.len() - 5);
    let err = open(&replaced(names::CRS, crs)).unwrap_err();
    assert!(matches!(err, DecodeError::TruncatedResource { resource: "crs.dat", .. }));
    assert_eq!(err.code(), ErrorCode::MalformedEncoding);

    let header_only = original(names::AREAS)[..5].to_vec();
    let err = open(&replaced(names::AREAS, header_only)).unwrap_err();
    assert_eq!(err, DecodeError::UnexpectedEof { context: "key_width" });
}

#[test]
fn test_bad_magic_and_version() {
    let mut areas = original(names::AREAS);
    areas[..4].copy_from_slice(b"EPSX");
    let err = open(&replaced(names::AREAS, areas)).unwrap_err();
    assert_eq!(
        err,
        DecodeError::InvalidMagic {
            resource: "areas.dat",
            found: *b"EPSX",
        }
    );
    assert_eq!(err.code(), ErrorCode::InvalidMagicOrVersion);

    let mut text = original(names::CRS_TEXT);
    text[4] = 2;
    let err = open(&replaced(names::CRS_TEXT, text)).unwrap_err();
    assert_eq!(
        err,
        DecodeError::UnsupportedVersion {
            resource: "crs.txt",
            version: 2,
        }
    );

    let mut numbers = original(names::NUMBERS);
    numbers[0] = b'X';
    assert!(matches!(open(&replaced(names::NUMBERS, numbers)), Err(DecodeError::InvalidMagic { .. })));
}

#[test]
fn test_unordered_keys_fail_open() {
    let records = vec![(1262, vec![0xFF; 15]), (1241, vec![0xFF; 15])];
    let areas = write_keyed_resource(2, 15, &records).unwrap();
    let err = open(&replaced(names::AREAS, areas)).unwrap_err();
    assert_eq!(
        err,
        DecodeError::KeysNotAscending {
            resource: "areas.dat",
            previous: 1262,
            key: 1241,
        }
    );
}

#[test]
fn test_missing_resources() {
    let mut resources = Resources::new();
    for name in RESOURCES.names().filter(|&name| name != names::CONCATENATED_STEPS) {
        resources.insert(name, RESOURCES.get(name).unwrap().clone());
    }
    assert_eq!(
        open(&resources).unwrap_err(),
        DecodeError::MissingResource {
            resource: "oppath.dat",
        }
    );
    assert!(matches!(open(&Resources::new()), Err(DecodeError::MissingResource { .. })));
}

#[test]
fn test_bad_record_is_lazy_until_eager() {
    let mut bad = vec![0xFF; 16];
    bad[0] = 9;
    let crs = write_keyed_resource(4, 16, &[(4326, bad)]).unwrap();
    let resources = replaced(names::CRS, crs);

    let db = open(&resources).unwrap();
    assert_eq!(
        db.crs(4326).unwrap_err(),
        DecodeError::InvalidTag {
            field: "crs_kind",
            value: 9,
        }
    );
    assert!(db.crs(4267).unwrap().is_none());

    let err = Database::open(&resources, DatabaseOptions::eager()).unwrap_err();
    assert!(matches!(err, DecodeError::InvalidTag { field: "crs_kind", .. }));
}

#[test]
fn test_dangling_reference_in_search() {
    let resources = DatasetBuilder::new()
        .crs(common::geographic(4267, "NAD27", 6267, 1241))
        .crs(common::geographic(4269, "NAD83", 6269, 1350))
        .operation(common::transformation(1173, "NAD27 to WGS 84 (4)", (4267, 4326), 1241, None))
        .build()
        .unwrap();
    let db = open(&resources).unwrap();
    let err = PathGenerator::new(&db).generate_path(4267, 4269).unwrap_err();
    assert_eq!(
        err,
        DecodeError::DanglingReference {
            category: Category::Crs,
            code: 4326,
        }
    );
    assert_eq!(err.code(), ErrorCode::DanglingReference);
}

#[test]
fn test_fingerprint_tracks_content() {
    let mut crs = original(names::CRS);
    let last = crs.len() - 1;
    crs[last] ^= 0x01;
    let changed = replaced(names::CRS, crs);
    assert_ne!(changed.fingerprint(), RESOURCES.fingerprint());
    let options = DatabaseOptions::new().with_fingerprint(RESOURCES.fingerprint());
    assert_eq!(Database::open(&changed, options).unwrap_err(), DecodeError::FingerprintMismatch);
}

const FUZZED: [&str; 6] = [
    names::CRS,
    names::CRS_TEXT,
    names::TRANSFORMATIONS,
    names::CONCATENATED,
    names::COORDINATE_SYSTEMS,
    names::NUMBERS,
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_corrupted_resources_never_panic(
        which in 0..FUZZED.len(),
        position in any::<prop::sample::Index>(),
        byte in any::<u8>(),
        truncate in any::<bool>(),
    ) {
        let name = FUZZED[which];
        let mut data = original(name);
        let at = position.index(data.len());
        if truncate {
            data.truncate(at);
        } else {
            data[at] = byte;
        }
        let resources = replaced(name, data);
        if let Ok(db) = Database::open(&resources, DatabaseOptions::default()) {
            let _ = db.crss().count();
            let _ = db.transformations().chain(db.concatenated_operations()).count();
            let _ = PathGenerator::new(&db).generate_path(32631, 26917);
        }
    }
}
