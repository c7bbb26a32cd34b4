//! Simple inspector for EPSG dataset directories.
//!
//! Usage: `inspect_dataset [DIR] [SOURCE TARGET]`. Without a directory a
//! tiny built-in dataset is used.

use epsg_db::model::{
    Conversion, Crs, CrsInfo, GeodeticCrs, GeodeticKind, Operation, OperationInfo, ProjectedCrs, Transformation,
};
use epsg_db::{Code, CrsKind, Database, DatabaseOptions, DatasetBuilder, PathGenerator, Resources};

fn builtin() -> Resources {
    let info = |code, name: &str| CrsInfo {
        code,
        name: name.to_string(),
        area: None,
        deprecated: false,
    };
    let geographic = |code, name, datum| {
        Crs::Geodetic(GeodeticCrs {
            info: info(code, name),
            kind: GeodeticKind::Geographic2D,
            coordinate_system: 6422,
            datum,
            base: None,
        })
    };
    DatasetBuilder::new()
        .crs(geographic(4267, "NAD27", 6267))
        .crs(geographic(4326, "WGS 84", 6326))
        .crs(Crs::Projected(ProjectedCrs {
            info: info(3857, "WGS 84 / Pseudo-Mercator"),
            coordinate_system: 4499,
            base_crs: 4326,
            projection: 3856,
        }))
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
        .operation(Operation::Conversion(Conversion {
            info: OperationInfo {
                code: 3856,
                name: "Popular Visualisation Pseudo-Mercator".to_string(),
                area: None,
                deprecated: false,
                invertible: true,
            },
            method: 1024,
        }))
        .build()
        .expect("Failed to encode built-in dataset")
}

fn parse_code(arg: Option<String>) -> Option<Code> {
    arg.map(|s| s.parse().expect("CRS codes are integers"))
}

fn main() {
    let mut args = std::env::args().skip(1);
    let resources = match args.next() {
        Some(dir) => {
            println!("Reading: {}", dir);
            Resources::from_dir(&dir).expect("Failed to load dataset")
        }
        None => {
            println!("Reading: built-in dataset");
            builtin()
        }
    };
    let fingerprint: String = resources.fingerprint()[..8].iter().map(|b| format!("{b:02x}")).collect();
    println!("Resources: {} ({} bytes, fingerprint {})", resources.len(), resources.total_size(), fingerprint);

    let db = Database::open(&resources, DatabaseOptions::default()).expect("Failed to open dataset");

    println!("\n=== Records ===");
    println!("  Areas: {}", db.areas().count());
    println!("  Units: {}", db.units().count());
    println!("  Ellipsoids: {}", db.ellipsoids().count());
    println!("  Prime meridians: {}", db.prime_meridians().count());
    println!("  Datums: {}", db.datums().count());
    println!("  Coordinate systems: {}", db.coordinate_systems().count());
    println!("  Conversions: {}", db.conversions().count());
    println!("  Transformations: {}", db.transformations().count());
    println!("  Concatenated operations: {}", db.concatenated_operations().count());
    println!("  Operation methods: {}", db.operation_methods().count());
    println!("  Parameters: {}", db.parameters().count());

    let mut by_kind = [0usize; 8];
    let mut failed = 0;
    for crs in db.crss() {
        match crs {
            Ok(crs) => by_kind[crs.kind() as usize] += 1,
            Err(err) => {
                failed += 1;
                eprintln!("  bad CRS record: {err}");
            }
        }
    }
    println!("\n=== CRSs ===");
    for kind in [
        CrsKind::Geographic2D,
        CrsKind::Geographic3D,
        CrsKind::Geocentric,
        CrsKind::Projected,
        CrsKind::Vertical,
        CrsKind::Engineering,
        CrsKind::Compound,
    ] {
        println!("  {:?}: {}", kind, by_kind[kind as usize]);
    }
    if failed > 0 {
        println!("  Undecodable: {}", failed);
    }

    let (source, target) = match (parse_code(args.next()), parse_code(args.next())) {
        (Some(source), Some(target)) => (source, target),
        _ => (4267, 3857),
    };
    println!("\n=== Path {} -> {} ===", source, target);
    match PathGenerator::new(&db).generate_path(source, target) {
        Ok(Some(path)) => {
            println!("{}", path);
            for (from, edge, to) in path.steps() {
                println!("  {} -> {}: {}", from.name(), to.name(), edge.name());
            }
        }
        Ok(None) => println!("no path"),
        Err(err) => println!("error: {err}"),
    }
}
