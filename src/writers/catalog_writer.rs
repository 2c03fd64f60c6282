use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::models::{CatalogLocation, CatalogRecord};
use crate::processors::Catalog;
use crate::utils::constants::{FIELD_SEPARATOR, LOCATION_FIELD_SEPARATOR, LOCATION_SEPARATOR};

/// Writes the catalog as `@`-separated lines, one per quantity, in name order
pub struct CatalogWriter;

impl CatalogWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_catalog(&self, catalog: &Catalog, path: &Path) -> Result<CatalogFileInfo> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        let lines = self.write_to(catalog, file)?;
        let file_size = fs::metadata(path)?.len();

        info!("Wrote {} catalog lines to {}", lines, path.display());

        Ok(CatalogFileInfo {
            variables: lines,
            locations: catalog.location_count(),
            file_size,
        })
    }

    /// Write every line to `output`; returns the number of lines
    pub fn write_to<W: Write>(&self, catalog: &Catalog, output: W) -> Result<usize> {
        // The format has no quoting; separator characters inside values are
        // written as-is and reported by the integrity check instead.
        let mut writer = WriterBuilder::new()
            .delimiter(FIELD_SEPARATOR)
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(output);

        let mut lines = 0;
        for record in catalog.records() {
            writer.write_record(record_fields(&record))?;
            lines += 1;
        }

        writer.flush()?;
        Ok(lines)
    }
}

impl Default for CatalogWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn record_fields(record: &CatalogRecord) -> [String; 6] {
    let locations: Vec<String> = record.locations.iter().map(format_location).collect();

    [
        record.name.clone(),
        record.ndims.to_string(),
        record.standard_name.clone(),
        record.long_name.clone(),
        record.units.clone(),
        locations.join(&LOCATION_SEPARATOR.to_string()),
    ]
}

pub fn format_location(location: &CatalogLocation) -> String {
    [
        location.base_url.clone(),
        location.collection_code.clone(),
        location.tag.clone(),
        location.horizontal_grid.to_string(),
        location.vertical_coord.to_string(),
        location.time_spacing.to_string(),
        location.time_average.to_string(),
        location.time_base_offset.to_string(),
    ]
    .join(&LOCATION_FIELD_SEPARATOR.to_string())
}

#[derive(Debug, Clone)]
pub struct CatalogFileInfo {
    pub variables: usize,
    pub locations: usize,
    pub file_size: u64,
}

impl CatalogFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Catalog File Summary:\n\
            - Variables: {}\n\
            - Locations: {}\n\
            - File size: {:.1} KB",
            self.variables,
            self.locations,
            self.file_size as f64 / 1024.0
        )
    }
}
