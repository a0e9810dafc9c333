use crate::{
    error::{Result, TierError},
    storage::Storage,
};
use async_trait::async_trait;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::fs;

/// File-based storage: one `<key>.json` file per key under a data directory
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    const DATA_DIR: &'static str = ".tierlist";

    /// Creates a new FileStorage rooted in `<project_root>/.tierlist`
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::DATA_DIR),
        }
    }

    /// Rejects keys that could escape the data directory
    fn key_file(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(TierError::StorageError(format!(
                "Invalid storage key: {:?}",
                key
            )));
        }
        Ok(self.root_path.join(format!("{}.json", key)))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let file_path = self.key_file(key)?;

        match fs::read_to_string(&file_path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let file_path = self.key_file(key)?;
        self.ensure_directory_exists(&self.root_path).await?;

        // Atomic replace: write a sibling temp file, then rename over the target
        let temp_path = file_path.with_extension("json.tmp");
        fs::write(&temp_path, value).await?;
        fs::rename(&temp_path, &file_path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let file_path = self.key_file(key)?;

        match fs::remove_file(file_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
