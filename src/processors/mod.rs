pub mod catalog_builder;
pub mod integrity_checker;
pub mod inventory;
pub mod parallel_processor;

pub use catalog_builder::{BuildReport, Catalog, CatalogBuilder, SkippedInventory};
pub use integrity_checker::{CatalogViolation, IntegrityChecker, IntegrityReport, ViolationType};
pub use inventory::Inventory;
pub use parallel_processor::{InventoryBatch, ParallelProcessor};
