use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::ConflictPolicy;
use crate::error::{CatalogError, Result};
use crate::processors::{Inventory, SkippedInventory};
use crate::readers::SourcePages;
use crate::utils::progress::ProgressReporter;

/// Inventories in input order, plus whatever was dropped on the way
#[derive(Debug, Default)]
pub struct InventoryBatch {
    pub inventories: Vec<Inventory>,
    /// Files whose collection code could not be decoded
    pub excluded: Vec<String>,
    pub skipped: Vec<SkippedInventory>,
}

pub struct ParallelProcessor {
    max_workers: usize,
    conflict_policy: ConflictPolicy,
}

impl ParallelProcessor {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            conflict_policy: ConflictPolicy::Abort,
        }
    }

    pub fn with_conflict_policy(mut self, conflict_policy: ConflictPolicy) -> Self {
        self.conflict_policy = conflict_policy;
        self
    }

    /// Build one inventory per file on a worker pool.
    ///
    /// Inventories come back in the order of `pages`, so the catalog merge
    /// that follows sees the same sequence whatever the thread count.
    pub fn build_inventories(
        &self,
        pages: &[SourcePages],
        progress: Option<&ProgressReporter>,
    ) -> Result<InventoryBatch> {
        let processed_count = Arc::new(AtomicUsize::new(0));

        if let Some(p) = progress {
            p.set_message(&format!("Inventorying {} files...", pages.len()));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| CatalogError::Config(e.to_string()))?;

        let results: Vec<Result<Inventory>> = pool.install(|| {
            pages
                .par_iter()
                .map(|page| {
                    let result = Inventory::from_pages(page);

                    processed_count.fetch_add(1, Ordering::Relaxed);
                    if let Some(p) = progress {
                        p.increment(1);
                    }

                    result
                })
                .collect()
        });

        let mut batch = InventoryBatch::default();
        for (page, result) in pages.iter().zip(results) {
            match result {
                Ok(inventory) => batch.inventories.push(inventory),
                Err(CatalogError::Validation(e)) => {
                    warn!("Excluding {}: {}", page.file_url, e);
                    batch
                        .excluded
                        .push(format!("{} / {}", page.collection_code, page.file_url));
                }
                Err(e) => match self.conflict_policy {
                    ConflictPolicy::Abort => return Err(e),
                    ConflictPolicy::Skip => {
                        warn!("Skipping {}: {}", page.file_url, e);
                        batch.skipped.push(SkippedInventory {
                            location: format!("{} / {}", page.collection_code, page.file_url),
                            reason: e.to_string(),
                        });
                    }
                },
            }
        }

        info!(
            "Built {} inventories ({} excluded, {} skipped) from {} files",
            batch.inventories.len(),
            batch.excluded.len(),
            batch.skipped.len(),
            processed_count.load(Ordering::Relaxed)
        );

        Ok(batch)
    }
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
