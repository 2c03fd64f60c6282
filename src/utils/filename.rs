use chrono::{Datelike, Local};
use std::path::{Path, PathBuf};

use crate::utils::constants::{CATALOG_EXTENSION, DAS_EXTENSION, DDS_EXTENSION};

/// Generate default catalog filename with format: merra-catalog-{YYMMDD}.ctg
pub fn generate_default_catalog_filename(output_dir: &Path) -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let filename = format!(
        "merra-catalog-{:02}{:02}{:02}.{}",
        year, month, day, CATALOG_EXTENSION
    );
    output_dir.join(filename)
}

/// Location tag from a file URL: the file name without its date and extensions.
///
/// `.../MERRA300.prod.assim.inst3_3d_asm_Cp.19900715.hdf.das` gives
/// `MERRA300.prod.assim.inst3_3d_asm_Cp`.
pub fn tag_from_url(url: &str) -> String {
    let file_name = url.rsplit('/').next().unwrap_or("");
    let parts: Vec<&str> = file_name.split('.').collect();
    let keep = parts.len().saturating_sub(3);

    parts[..keep].join(".").trim_matches('.').to_string()
}

/// Path of the descriptor text that accompanies an attribute text file
pub fn dds_path_for(das_path: &Path) -> PathBuf {
    match das_path.extension().and_then(|e| e.to_str()) {
        Some(DAS_EXTENSION) => das_path.with_extension(DDS_EXTENSION),
        _ => {
            let mut name = das_path.as_os_str().to_os_string();
            name.push(".");
            name.push(DDS_EXTENSION);
            PathBuf::from(name)
        }
    }
}
