pub mod catalog_reader;
pub mod das_reader;
pub mod dds_reader;
pub mod manifest_reader;

pub use catalog_reader::CatalogReader;
pub use das_reader::{DasEntity, DasReader, EntityKind};
pub use dds_reader::{DdsField, DdsReader};
pub use manifest_reader::{Manifest, ManifestEntry, ManifestReader, SourcePages};
