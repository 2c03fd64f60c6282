use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::{CatalogError, Result};
use crate::utils::filename::dds_path_for;

/// List of files to catalog, standing in for server discovery
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

/// One file's pages: where it lives on the server and where its text was saved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub base_url: String,
    pub collection_code: String,
    /// URL the pages were fetched from; only used to derive the location tag
    pub file_url: String,
    /// Decompressed attribute (DAS) text
    pub das: PathBuf,
    /// Decompressed descriptor (DDS) text; defaults to `das` with a `.dds` extension
    #[serde(default)]
    pub dds: Option<PathBuf>,
}

impl ManifestEntry {
    pub fn dds_path(&self) -> PathBuf {
        self.dds.clone().unwrap_or_else(|| dds_path_for(&self.das))
    }

    fn resolve_against(&mut self, base_dir: &Path) {
        if self.das.is_relative() {
            self.das = base_dir.join(&self.das);
        }
        if let Some(dds) = self.dds.as_mut() {
            if dds.is_relative() {
                *dds = base_dir.join(&*dds);
            }
        }
    }
}

/// The text retrieved for one file, ready to be inventoried
#[derive(Debug, Clone)]
pub struct SourcePages {
    pub base_url: String,
    pub collection_code: String,
    pub file_url: String,
    pub das_text: String,
    pub dds_text: String,
}

pub struct ManifestReader {
    max_workers: usize,
}

impl ManifestReader {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
        }
    }

    /// Read a JSON manifest. Relative page paths resolve against the manifest's directory.
    pub fn read_manifest(&self, path: &Path) -> Result<Manifest> {
        let text = std::fs::read_to_string(path).map_err(|e| CatalogError::read(path, e))?;
        let mut manifest: Manifest = serde_json::from_str(&text)?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        for entry in &mut manifest.entries {
            entry.resolve_against(base_dir);
        }

        info!(
            "Manifest {} lists {} files",
            path.display(),
            manifest.entries.len()
        );
        Ok(manifest)
    }

    /// Read every entry's pages concurrently. Output order follows the manifest.
    pub async fn read_pages(&self, manifest: &Manifest) -> Result<Vec<SourcePages>> {
        let permits = Arc::new(Semaphore::new(self.max_workers));

        let handles: Vec<JoinHandle<Result<SourcePages>>> = manifest
            .entries
            .iter()
            .cloned()
            .map(|entry| {
                let permits = Arc::clone(&permits);
                tokio::spawn(async move {
                    let _permit = permits
                        .acquire_owned()
                        .await
                        .map_err(|e| CatalogError::Config(e.to_string()))?;
                    Self::read_entry(entry).await
                })
            })
            .collect();

        let mut pages = Vec::with_capacity(handles.len());
        for handle in handles {
            pages.push(handle.await??);
        }

        Ok(pages)
    }

    async fn read_entry(entry: ManifestEntry) -> Result<SourcePages> {
        let dds_path = entry.dds_path();
        debug!(
            "Reading {} and {}",
            entry.das.display(),
            dds_path.display()
        );

        let das_text = tokio::fs::read_to_string(&entry.das)
            .await
            .map_err(|e| CatalogError::read(&entry.das, e))?;
        let dds_text = tokio::fs::read_to_string(&dds_path)
            .await
            .map_err(|e| CatalogError::read(&dds_path, e))?;

        Ok(SourcePages {
            base_url: entry.base_url,
            collection_code: entry.collection_code,
            file_url: entry.file_url,
            das_text,
            dds_text,
        })
    }
}

impl Default for ManifestReader {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> Result<()> {
        std::fs::write(dir.join(name), content)?;
        Ok(())
    }

    #[tokio::test]
    async fn test_read_manifest_and_pages() -> Result<()> {
        let dir = TempDir::new()?;
        write(dir.path(), "a.hdf.das", "Attributes {\n}\n")?;
        write(dir.path(), "a.hdf.dds", "Dataset {\n}\n")?;
        write(dir.path(), "b.das", "Attributes {\n}\n")?;
        write(dir.path(), "b-descriptor.txt", "Dataset { b }\n")?;
        write(
            dir.path(),
            "manifest.json",
            r#"{
  "entries": [
    { "base_url": "https://s1/MERRA/", "collection_code": "MAI3CPASM",
      "file_url": "https://s1/MERRA/MAI3CPASM/a.19900715.hdf.das", "das": "a.hdf.das" },
    { "base_url": "https://s2/MERRA/", "collection_code": "MAT1NXSLV",
      "file_url": "https://s2/MERRA/MAT1NXSLV/b.19900715.hdf.das", "das": "b.das",
      "dds": "b-descriptor.txt" }
  ]
}"#,
        )?;

        let reader = ManifestReader::new(2);
        let manifest = reader.read_manifest(&dir.path().join("manifest.json"))?;
        assert_eq!(manifest.entries.len(), 2);
        assert!(manifest.entries[0].das.is_absolute());

        let pages = reader.read_pages(&manifest).await?;
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].collection_code, "MAI3CPASM");
        assert_eq!(pages[0].dds_text, "Dataset {\n}\n");
        assert_eq!(pages[1].dds_text, "Dataset { b }\n");

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_page_names_the_file() -> Result<()> {
        let dir = TempDir::new()?;
        let manifest = Manifest {
            entries: vec![ManifestEntry {
                base_url: "https://s1/MERRA/".to_string(),
                collection_code: "MAI3CPASM".to_string(),
                file_url: "x.19900715.hdf.das".to_string(),
                das: dir.path().join("missing.das"),
                dds: None,
            }],
        };

        let err = ManifestReader::new(1).read_pages(&manifest).await.unwrap_err();
        assert!(err.to_string().contains("missing.das"));

        Ok(())
    }
}
