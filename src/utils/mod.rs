pub mod constants;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use filename::{dds_path_for, generate_default_catalog_filename, tag_from_url};
pub use progress::ProgressReporter;
