use merra_catalog::cli::build_catalog;
use merra_catalog::config::{CatalogConfig, ConflictPolicy};
use merra_catalog::readers::CatalogReader;
use merra_catalog::writers::CatalogWriter;
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::TempDir;

const BASE_URL: &str = "https://goldsmr2.gesdisc.eosdis.nasa.gov/opendap/MERRA/";

const SLV_DAS: &str = r#"Attributes {
    HDF_GLOBAL {
        String HDFEOSVersion "HDFEOS_V2.14";
        Group {
            String note "nested metadata";
        }
    }
    CoreMetadata {
        String text "INVENTORYMETADATA";
    }
    lat {
        String long_name "latitude";
        String units "degrees_north";
    }
    lon {
        String long_name "longitude";
        String units "degrees_east";
    }
    time {
        String long_name "time";
    }
    TLML {
        String long_name "surface air temperature";
        String standard_name "air_temperature";
        String units "";
        String coordinates "time lat lon";
    }
    QLML {
        String long_name "surface specific humidity";
        String units "1";
        String coordinates "time lat lon";
    }
}
"#;

const SLV_DDS: &str = r#"Dataset {
    Float64 lat[lat=361];
    Float64 lon[lon=540];
    Float64 time[time=1];
    Float32 TLML[time=1][lat=361][lon=540];
    Float32 QLML[time=1][lat=361][lon=540];
    Int32 flags[time=1];
} MERRA300.prod.assim.tavg1_2d_slv_Nx.19900715.hdf;
"#;

const ASM_DAS: &str = r#"Attributes {
    HDF_GLOBAL {
        String title "MERRA inst3_3d_asm_Cp";
    }
    TLML {
        String long_name "surface air temperature";
        String units "K";
        String coordinates "time lat lon";
    }
    lat {
        String long_name "latitude";
    }
}
"#;

const ASM_DDS: &str = "Dataset {\n    Float32 TLML[time=8][lat=144][lon=288];\n    Float64 lat[lat=144];\n}\n";

const CONFLICT_DAS: &str = r#"Attributes {
    QLML {
        String units "kg kg-1";
        String coordinates "time lat lon";
    }
    PS {
        String units "Pa";
        String coordinates "time lat lon";
    }
}
"#;

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

fn entry(code: &str, stem: &str, das: &str) -> String {
    format!(
        r#"{{ "base_url": "{BASE_URL}", "collection_code": "{code}",
      "file_url": "{BASE_URL}{code}.5.2.0/1990/07/{stem}.19900715.hdf.das",
      "das": "{das}" }}"#
    )
}

/// Three good collections, one with an unrecognized vertical coordinate and
/// optionally one that disagrees about QLML units.
fn fixture(with_conflict: bool) -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(root, "slv.das", SLV_DAS);
    write(root, "slv.dds", SLV_DDS);
    write(root, "asm.das", ASM_DAS);
    write(root, "asm.dds", ASM_DDS);
    write(root, "ocn.das", ASM_DAS);
    write(root, "ocn.dds", ASM_DDS);
    write(root, "bad.das", CONFLICT_DAS);
    write(root, "bad.dds", "");

    let mut entries = vec![
        entry("MAT1NXSLV", "MERRA300.prod.assim.tavg1_2d_slv_Nx", "slv.das"),
        entry("MAI3CPASM", "MERRA300.prod.assim.inst3_3d_asm_Cp", "asm.das"),
        entry("MAI3CQOCN", "MERRA300.prod.assim.inst3_3d_ocn_Cq", "ocn.das"),
    ];
    if with_conflict {
        entries.push(entry(
            "MAI6NVANA",
            "MERRA300.prod.assim.inst6_3d_ana_Nv",
            "bad.das",
        ));
    }

    write(
        root,
        "manifest.json",
        &format!("{{ \"entries\": [\n    {}\n] }}", entries.join(",\n    ")),
    );
    dir
}

fn config(on_conflict: ConflictPolicy) -> CatalogConfig {
    CatalogConfig::default()
        .with_overrides(Some(2), Some(on_conflict))
        .unwrap()
        .with_progress(false)
}

#[tokio::test]
async fn test_manifest_to_catalog() {
    let dir = fixture(false);

    let (catalog, report) = build_catalog(&dir.path().join("manifest.json"), &config(ConflictPolicy::Abort))
        .await
        .unwrap();

    assert_eq!(report.inventories_seen, 3);
    assert_eq!(report.inventories_contributing, 2);
    assert_eq!(report.excluded_locations.len(), 1);

    let names: Vec<&str> = catalog.variables().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["QLML", "TLML"]);

    let tlml = catalog.get("TLML").unwrap();
    assert_eq!(tlml.ndims, 3);
    assert_eq!(tlml.dims, vec!["time", "lat", "lon"]);
    assert_eq!(tlml.attributes.units, "K");
    assert_eq!(tlml.attributes.standard_name, "air_temperature");

    let codes: Vec<&str> = tlml.locations.iter().map(|l| l.collection_code()).collect();
    assert_eq!(codes, vec!["MAI3CPASM", "MAT1NXSLV"]);
    assert_eq!(
        tlml.locations[1].tag(),
        "MERRA300.prod.assim.tavg1_2d_slv_Nx"
    );
}

#[tokio::test]
async fn test_catalog_file_round_trip() {
    let dir = fixture(false);
    let (catalog, _) = build_catalog(&dir.path().join("manifest.json"), &config(ConflictPolicy::Abort))
        .await
        .unwrap();

    let path = dir.path().join("output").join("merra.ctg");
    CatalogWriter::new().write_catalog(&catalog, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.starts_with("QLML@3@@surface specific humidity@1@"));

    let records = CatalogReader::new().read_catalog(&path).unwrap();
    assert_eq!(records, catalog.records());
}

#[tokio::test]
async fn test_conflict_aborts_run() {
    let dir = fixture(true);

    let err = build_catalog(&dir.path().join("manifest.json"), &config(ConflictPolicy::Abort))
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("QLML"));
    assert!(message.contains("kg kg-1"));
}

#[tokio::test]
async fn test_conflict_skipped_under_skip_policy() {
    let dir = fixture(true);

    let (catalog, report) = build_catalog(&dir.path().join("manifest.json"), &config(ConflictPolicy::Skip))
        .await
        .unwrap();

    assert_eq!(report.skipped.len(), 1);
    assert!(catalog.get("PS").is_none());
    assert_eq!(catalog.get("QLML").unwrap().attributes.units, "1");
    assert!(report.summary().contains("Skipped after conflicts: 1"));
}

#[tokio::test]
async fn test_short_collection_code_is_excluded_from_run() {
    let dir = fixture(false);
    let entries = [
        entry("MAT1NXSLV", "MERRA300.prod.assim.tavg1_2d_slv_Nx", "slv.das"),
        entry("MAI3C", "MERRA300.prod.assim.inst3_3d_asm_Cp", "asm.das"),
    ];
    write(
        dir.path(),
        "short.json",
        &format!("{{ \"entries\": [\n    {}\n] }}", entries.join(",\n    ")),
    );

    let (catalog, report) = build_catalog(&dir.path().join("short.json"), &config(ConflictPolicy::Abort))
        .await
        .unwrap();

    assert_eq!(report.inventories_seen, 2);
    assert_eq!(report.inventories_contributing, 1);
    assert_eq!(report.excluded_locations.len(), 1);
    assert!(report.excluded_locations[0].starts_with("MAI3C /"));
    assert_eq!(catalog.get("TLML").unwrap().locations.len(), 1);
}
