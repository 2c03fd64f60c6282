use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;

use crate::error::{CatalogError, Result};
use crate::models::{CatalogLocation, CatalogRecord};
use crate::utils::constants::{
    CATALOG_FIELDS, FIELD_SEPARATOR, LOCATION_FIELDS, LOCATION_FIELD_SEPARATOR,
    LOCATION_SEPARATOR,
};

/// Reads a written catalog back into records
pub struct CatalogReader;

impl CatalogReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_catalog(&self, path: &Path) -> Result<Vec<CatalogRecord>> {
        let file = std::fs::File::open(path).map_err(|e| CatalogError::read(path, e))?;
        self.read_from(file)
    }

    pub fn read_from<R: Read>(&self, input: R) -> Result<Vec<CatalogRecord>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(FIELD_SEPARATOR)
            .has_headers(false)
            .quoting(false)
            .flexible(true)
            .from_reader(input);

        let mut records = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let row = result?;
            let line = row.position().map_or(index as u64 + 1, |p| p.line());
            records.push(parse_record(&row, line)?);
        }

        Ok(records)
    }
}

impl Default for CatalogReader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_record(row: &StringRecord, line: u64) -> Result<CatalogRecord> {
    if row.len() != CATALOG_FIELDS {
        return Err(CatalogError::InvalidFormat(format!(
            "catalog line {}: expected {} '@'-separated fields, found {}",
            line,
            CATALOG_FIELDS,
            row.len()
        )));
    }

    let ndims = row[1].parse::<usize>().map_err(|_| {
        CatalogError::InvalidFormat(format!("catalog line {}: invalid ndims '{}'", line, &row[1]))
    })?;

    let locations = if row[5].is_empty() {
        Vec::new()
    } else {
        row[5]
            .split(LOCATION_SEPARATOR)
            .map(|loc| parse_location(loc, line))
            .collect::<Result<Vec<_>>>()?
    };

    Ok(CatalogRecord {
        name: row[0].to_string(),
        ndims,
        standard_name: row[2].to_string(),
        long_name: row[3].to_string(),
        units: row[4].to_string(),
        locations,
    })
}

fn parse_location(text: &str, line: u64) -> Result<CatalogLocation> {
    let parts: Vec<&str> = text.split(LOCATION_FIELD_SEPARATOR).collect();
    if parts.len() != LOCATION_FIELDS {
        return Err(CatalogError::InvalidFormat(format!(
            "catalog line {}: location '{}' has {} fields, expected {}",
            line,
            text,
            parts.len(),
            LOCATION_FIELDS
        )));
    }

    let number = |index: usize| -> Result<i32> {
        parts[index].parse::<i32>().map_err(|_| {
            CatalogError::InvalidFormat(format!(
                "catalog line {}: invalid location code '{}'",
                line, parts[index]
            ))
        })
    };

    let time_base_offset = parts[7].parse::<u32>().map_err(|_| {
        CatalogError::InvalidFormat(format!(
            "catalog line {}: invalid base time '{}'",
            line, parts[7]
        ))
    })?;

    Ok(CatalogLocation {
        base_url: parts[0].to_string(),
        collection_code: parts[1].to_string(),
        tag: parts[2].to_string(),
        horizontal_grid: number(3)?,
        vertical_coord: number(4)?,
        time_spacing: number(5)?,
        time_average: number(6)?,
        time_base_offset,
    })
}
