//! Benchmark for dataset loading, record lookup and path generation.
//!
//! Builds a synthetic graph of geographic CRSs joined by transformations,
//! each carrying one projected CRS, writes it to disk, reloads it and times
//! the hot paths.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use epsg_db::model::{
    Conversion, CoordinateSystem, CoordinateSystemKind, Crs, CrsInfo, Datum, DatumInfo, GeodeticCrs,
    GeodeticDatum, GeodeticKind, Operation, OperationInfo, ProjectedCrs, Transformation,
};
use epsg_db::{Code, Database, DatabaseOptions, DatasetBuilder, PathGenerator, PathOptions, Resources};
use serde::Serialize;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

// =============================================================================
// SYNTHETIC DATASET
// =============================================================================

const GEOGRAPHIC: u32 = 400;
const GEOGRAPHIC_BASE: Code = 100_000;
const PROJECTED_BASE: Code = 200_000;
const CONVERSION_BASE: Code = 10_000;
const TRANSFORMATION_BASE: Code = 20_000;

/// Second neighbour of each geographic CRS; gives the ring shortcuts.
const STRIDE: u32 = 7;

const QUERIES: usize = 2_000;
const LOOKUP_ITERS: u32 = 10;

fn info(code: Code, name: String) -> CrsInfo {
    CrsInfo {
        code,
        name,
        area: None,
        deprecated: false,
    }
}

fn op_info(code: Code, name: String) -> OperationInfo {
    OperationInfo {
        code,
        name,
        area: None,
        deprecated: false,
        invertible: true,
    }
}

fn geographic(i: u32) -> Code {
    GEOGRAPHIC_BASE + i % GEOGRAPHIC
}

fn synthetic_dataset() -> DatasetBuilder {
    let mut builder = DatasetBuilder::new()
        .coordinate_system(CoordinateSystem {
            code: 6422,
            name: "Ellipsoidal 2D CS".to_string(),
            kind: CoordinateSystemKind::Ellipsoidal,
            deprecated: false,
            axes: Vec::new(),
        })
        .coordinate_system(CoordinateSystem {
            code: 4400,
            name: "Cartesian 2D CS".to_string(),
            kind: CoordinateSystemKind::Cartesian,
            deprecated: false,
            axes: Vec::new(),
        });

    for i in 0..GEOGRAPHIC {
        let datum = 1_000 + i;
        builder = builder
            .datum(Datum::Geodetic(GeodeticDatum {
                info: DatumInfo {
                    code: datum,
                    name: format!("Datum {i}"),
                    area: None,
                    deprecated: false,
                },
                ellipsoid: 7030,
                prime_meridian: 8901,
            }))
            .crs(Crs::Geodetic(GeodeticCrs {
                info: info(geographic(i), format!("Geographic {i}")),
                kind: GeodeticKind::Geographic2D,
                coordinate_system: 6422,
                datum,
                base: None,
            }))
            .crs(Crs::Projected(ProjectedCrs {
                info: info(PROJECTED_BASE + i, format!("Geographic {i} / Grid")),
                coordinate_system: 4400,
                base_crs: geographic(i),
                projection: CONVERSION_BASE + i,
            }))
            .operation(Operation::Conversion(Conversion {
                info: op_info(CONVERSION_BASE + i, format!("Grid {i}")),
                method: 9807,
            }));

        for (n, step) in [1, STRIDE].into_iter().enumerate() {
            let code = TRANSFORMATION_BASE + i * 2 + n as u32;
            builder = builder.operation(Operation::Transformation(Transformation {
                info: op_info(code, format!("{i} to {}", (i + step) % GEOGRAPHIC)),
                source_crs: geographic(i),
                target_crs: geographic(i + step),
                method: 9603,
                accuracy: Some(f64::from(1 + (i + step) % 10)),
            }));
        }
    }
    builder
}

/// Deterministic query pairs, projected and geographic mixed.
fn query_pairs() -> Vec<(Code, Code)> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };
    (0..QUERIES)
        .map(|_| {
            let pick = |r: u64| {
                let i = (r % u64::from(GEOGRAPHIC)) as u32;
                if r & 0x100 == 0 { geographic(i) } else { PROJECTED_BASE + i }
            };
            (pick(next()), pick(next()))
        })
        .collect()
}

// =============================================================================
// REPORT
// =============================================================================

#[derive(Debug, Serialize)]
struct Timing {
    total_ms: f64,
    per_item_us: f64,
}

impl Timing {
    fn new(elapsed: Duration, items: usize) -> Self {
        Timing {
            total_ms: elapsed.as_secs_f64() * 1e3,
            per_item_us: elapsed.as_secs_f64() * 1e6 / items.max(1) as f64,
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    crs_count: usize,
    operation_count: usize,
    resource_count: usize,
    uncompressed_bytes: usize,
    build: Timing,
    write: Timing,
    reload: Timing,
    open_lazy: Timing,
    open_eager: Timing,
    crs_lookup: Timing,
    path_queries: usize,
    paths_found: usize,
    mean_path_len: f64,
    generate_path: Timing,
    generate_path_ranked: Timing,
}

fn time<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to install subscriber");

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("epsg-db-bench"));

    let (resources, build_time) = time(|| synthetic_dataset().build().expect("Failed to encode dataset"));
    info!(
        resources = resources.len(),
        bytes = resources.total_size(),
        ?build_time,
        "built synthetic dataset"
    );

    let ((), write_time) = time(|| {
        resources
            .write_dir(&out_dir, Some(3))
            .expect("Failed to write dataset")
    });
    let (reloaded, reload_time) = time(|| Resources::from_dir(&out_dir).expect("Failed to reload dataset"));
    assert_eq!(reloaded.fingerprint(), resources.fingerprint());
    info!(dir = %out_dir.display(), ?write_time, ?reload_time, "round-tripped through disk");

    let (db, open_lazy) = time(|| Database::open(&reloaded, DatabaseOptions::default()).expect("Failed to open"));
    let (_, open_eager) =
        time(|| Database::open(&reloaded, DatabaseOptions::eager()).expect("Failed to open eagerly"));

    // Memoizes every CRS record before the lookup loop
    let codes: Vec<Code> = db.crss().map(|crs| crs.expect("Failed to decode CRS").code()).collect();
    let (_, lookup_time) = time(|| {
        for _ in 0..LOOKUP_ITERS {
            for &code in &codes {
                assert!(db.crs(code).expect("Failed to decode CRS").is_some());
            }
        }
    });

    let pairs = query_pairs();
    let generator = PathGenerator::new(&db);
    let ((found, hops), path_time) = time(|| {
        let mut found = 0;
        let mut hops = 0;
        for &(source, target) in &pairs {
            if let Some(path) = generator.generate_path(source, target).expect("Failed to generate path") {
                found += 1;
                hops += path.len();
            }
        }
        (found, hops)
    });
    info!(queries = pairs.len(), found, ?path_time, "generated paths");

    let ranked = PathGenerator::new(&db).with_options(PathOptions::new().ranked_by_accuracy());
    let (_, ranked_time) = time(|| {
        for &(source, target) in &pairs {
            ranked.generate_path(source, target).expect("Failed to generate path");
        }
    });

    let report = Report {
        crs_count: codes.len(),
        operation_count: db.conversions().count() + db.transformations().count(),
        resource_count: resources.len(),
        uncompressed_bytes: resources.total_size(),
        build: Timing::new(build_time, codes.len()),
        write: Timing::new(write_time, resources.len()),
        reload: Timing::new(reload_time, resources.len()),
        open_lazy: Timing::new(open_lazy, 1),
        open_eager: Timing::new(open_eager, 1),
        crs_lookup: Timing::new(lookup_time, codes.len() * LOOKUP_ITERS as usize),
        path_queries: pairs.len(),
        paths_found: found,
        mean_path_len: hops as f64 / found.max(1) as f64,
        generate_path: Timing::new(path_time, pairs.len()),
        generate_path_ranked: Timing::new(ranked_time, pairs.len()),
    };
    println!("{}", serde_json::to_string_pretty(&report).expect("Failed to serialize report"));
}
