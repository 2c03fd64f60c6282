use serde::{Deserialize, Serialize};

use crate::models::{LocationCode, Variable};

/// One location as it appears in a catalog line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogLocation {
    pub base_url: String,
    pub collection_code: String,
    pub tag: String,
    pub horizontal_grid: i32,
    pub vertical_coord: i32,
    pub time_spacing: i32,
    pub time_average: i32,
    pub time_base_offset: u32,
}

impl From<&LocationCode> for CatalogLocation {
    fn from(location: &LocationCode) -> Self {
        Self {
            base_url: location.base_url().to_string(),
            collection_code: location.collection_code().to_string(),
            tag: location.tag().to_string(),
            horizontal_grid: location.horizontal_grid().code(),
            vertical_coord: location.vertical_coord().code(),
            time_spacing: location.time_spacing(),
            time_average: location.time_average().code(),
            time_base_offset: location.time_base_offset(),
        }
    }
}

/// One catalog line: a quantity and every location it can be read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub name: String,
    pub ndims: usize,
    pub standard_name: String,
    pub long_name: String,
    pub units: String,
    /// Best location first
    pub locations: Vec<CatalogLocation>,
}

impl From<&Variable> for CatalogRecord {
    fn from(variable: &Variable) -> Self {
        Self {
            name: variable.name.clone(),
            ndims: variable.ndims,
            standard_name: variable.attributes.standard_name.clone(),
            long_name: variable.attributes.long_name.clone(),
            units: variable.attributes.units.clone(),
            locations: variable.locations.iter().map(CatalogLocation::from).collect(),
        }
    }
}
