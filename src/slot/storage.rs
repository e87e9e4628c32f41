//! On-disk layout for upload slots.
//!
//! Every slot owns one directory named after its token, holding at most one
//! file under its original name:
//! ```text
//! {root}/
//! ├── 3fa9/
//! │   └── cat.png
//! ├── 0b1c/            (pending, still empty)
//! ├── .staging/        (uploads in flight)
//! └── ...
//! ```
//!
//! Uploads are written into `.staging` first and moved into the slot
//! directory once the registry accepts them. Tokens are hex, so the staging
//! directory never clashes with a slot.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::{DropError, Result};

const STAGING_DIR: &str = ".staging";

/// Directory-per-token file storage.
#[derive(Debug, Clone)]
pub struct SlotStorage {
    /// Base directory for all slot directories.
    root: PathBuf,
}

impl SlotStorage {
    /// Create a storage rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join(STAGING_DIR))?;

        Ok(Self { root })
    }

    /// Get the root path of this storage.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Remove everything under the root and recreate it empty.
    ///
    /// Slots do not survive a restart, so whatever is on disk at boot is an
    /// orphan of the previous run.
    pub fn reset(&self) -> Result<()> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        fs::create_dir_all(self.root.join(STAGING_DIR))?;
        Ok(())
    }

    /// Directory belonging to `token`.
    pub fn slot_dir(&self, token: &str) -> PathBuf {
        self.root.join(token)
    }

    /// Create the directory for `token`.
    pub fn create_slot_dir(&self, token: &str) -> Result<PathBuf> {
        let dir = self.slot_dir(token);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Delete the directory for `token` and its contents.
    ///
    /// Returns `false` if the directory did not exist.
    pub fn remove_slot_dir(&self, token: &str) -> Result<bool> {
        match fs::remove_dir_all(self.slot_dir(token)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Check if the directory for `token` exists.
    pub fn slot_exists(&self, token: &str) -> bool {
        self.slot_dir(token).is_dir()
    }

    /// Path of `file_name` inside the directory of `token`.
    ///
    /// The name must be a single plain path component.
    pub fn file_path(&self, token: &str, file_name: &str) -> Result<PathBuf> {
        validate_file_name(file_name)?;
        Ok(self.slot_dir(token).join(file_name))
    }

    /// Staging location for the upload admitted as `generation` of `token`.
    pub fn staging_path(&self, token: &str, generation: u64) -> PathBuf {
        self.root
            .join(STAGING_DIR)
            .join(format!("{token}-{generation}"))
    }

    /// Write `content` to a staging path.
    pub async fn write_staged(&self, staged: &Path, content: &[u8]) -> Result<()> {
        tokio::fs::write(staged, content).await?;
        Ok(())
    }

    /// Move a staged upload into the directory of `token` as `file_name`.
    ///
    /// Fails if the slot directory is gone.
    pub fn promote(&self, staged: &Path, token: &str, file_name: &str) -> Result<PathBuf> {
        let path = self.file_path(token, file_name)?;
        fs::rename(staged, &path)?;
        Ok(path)
    }

    /// Delete a staged upload. A missing file is not an error.
    pub async fn discard_staged(&self, staged: &Path) -> Result<()> {
        match tokio::fs::remove_file(staged).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Read the stored file back.
    pub async fn read_file(&self, token: &str, file_name: &str) -> Result<Vec<u8>> {
        let path = self.file_path(token, file_name)?;
        match tokio::fs::read(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(DropError::NotFound(format!("file {file_name}")))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Check that `file_name` is usable as a single path component.
///
/// Rejects empty names, `.`/`..`, anything containing a separator, and NUL.
pub fn validate_file_name(file_name: &str) -> Result<()> {
    let invalid = || DropError::InvalidFileName(file_name.to_string());

    if file_name.is_empty() || file_name.contains(['/', '\\', '\0']) {
        return Err(invalid());
    }

    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(invalid()),
    }
}
