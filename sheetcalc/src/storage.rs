//! Ephemeral per-request file layout.
//!
//! Every request gets a fresh [`JobId`]; the upload lands at `<uploads>/<id>.xlsx` and the result
//! at `<outputs>/<id>_output.xlsx`. Nothing here deletes files.

use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::StorageConfig;
use crate::types::JobId;

#[derive(Debug, Clone)]
pub struct Storage {
    uploads_dir: PathBuf,
    outputs_dir: PathBuf,
}

impl Storage {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            uploads_dir: config.uploads_dir.clone(),
            outputs_dir: config.outputs_dir.clone(),
        }
    }

    /// Create the uploads and outputs directories if they don't exist yet
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.uploads_dir).await?;
        tokio::fs::create_dir_all(&self.outputs_dir).await?;
        info!(
            uploads_dir = %self.uploads_dir.display(),
            outputs_dir = %self.outputs_dir.display(),
            "Storage directories ready"
        );
        Ok(())
    }

    pub fn upload_path(&self, job: JobId) -> PathBuf {
        self.uploads_dir.join(format!("{job}.xlsx"))
    }

    pub fn output_path(&self, job: JobId) -> PathBuf {
        self.outputs_dir.join(format!("{job}_output.xlsx"))
    }

    /// Persist raw upload bytes and return where they were written
    pub async fn write_upload(&self, job: JobId, bytes: &[u8]) -> std::io::Result<PathBuf> {
        let path = self.upload_path(job);
        tokio::fs::write(&path, bytes).await?;
        debug!(job_id = %job, path = %path.display(), bytes = bytes.len(), "Upload written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn storage_in(root: &Path) -> Storage {
        Storage::new(&StorageConfig {
            uploads_dir: root.join("uploads"),
            outputs_dir: root.join("outputs"),
        })
    }

    #[test]
    fn test_paths_are_keyed_by_job_id() {
        let storage = storage_in(Path::new("/data"));
        let job = JobId::from(uuid::Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap());

        assert_eq!(
            storage.upload_path(job),
            PathBuf::from("/data/uploads/550e8400-e29b-41d4-a716-446655440000.xlsx")
        );
        assert_eq!(
            storage.output_path(job),
            PathBuf::from("/data/outputs/550e8400-e29b-41d4-a716-446655440000_output.xlsx")
        );
    }

    #[tokio::test]
    async fn test_ensure_dirs_creates_nested_directories() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("nested");
        let storage = storage_in(&nested);

        storage.ensure_dirs().await.unwrap();
        assert!(nested.join("uploads").is_dir());
        assert!(nested.join("outputs").is_dir());

        // Idempotent
        storage.ensure_dirs().await.unwrap();
    }

    #[tokio::test]
    async fn test_write_upload() {
        let root = tempfile::tempdir().unwrap();
        let storage = storage_in(root.path());
        storage.ensure_dirs().await.unwrap();

        let job = JobId::new();
        let path = storage.write_upload(job, b"payload").await.unwrap();

        assert_eq!(path, storage.upload_path(job));
        assert_eq!(std::fs::read(&path).unwrap(), b"payload");
    }

    #[tokio::test]
    async fn test_write_upload_fails_without_directory() {
        let root = tempfile::tempdir().unwrap();
        let storage = storage_in(&root.path().join("never-created"));

        assert!(storage.write_upload(JobId::new(), b"payload").await.is_err());
    }
}
