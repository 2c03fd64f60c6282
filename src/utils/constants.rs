/// Top-level attribute sections that describe the file, not a variable or dimension
pub const METADATA_SECTIONS: &[&str] = &[
    "StructMetadata",
    "ArchiveMetadata",
    "CoreMetadata",
    "HDF_GLOBAL",
];

/// Attribute names picked out of a variable's attribute block
pub const ATTR_LONG_NAME: &str = "long_name";
pub const ATTR_STANDARD_NAME: &str = "standard_name";
pub const ATTR_UNITS: &str = "units";
/// Only variables carry this attribute
pub const ATTR_COORDINATES: &str = "coordinates";

/// Descriptor field types kept in the catalog
pub const FLOAT_TYPES: &[&str] = &["Float32", "Float64"];

/// Catalog line separators. The format has no escaping.
pub const FIELD_SEPARATOR: u8 = b'@';
pub const LOCATION_SEPARATOR: char = '|';
pub const LOCATION_FIELD_SEPARATOR: char = ',';
pub const CATALOG_FIELDS: usize = 6;
pub const LOCATION_FIELDS: usize = 8;

/// File names
pub const CATALOG_EXTENSION: &str = "ctg";
pub const DAS_EXTENSION: &str = "das";
pub const DDS_EXTENSION: &str = "dds";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Environment prefix for configuration overrides
pub const ENV_PREFIX: &str = "MERRA_CATALOG";
