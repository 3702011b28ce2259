//! Local staging area
//!
//! Two process-local directories: one for the downloaded archive and its
//! unpacked contents, one for converted outputs. Nothing here is shared
//! between worker instances.

use crate::adapters::storage::ObjectStore;
use crate::config::StagingConfig;
use crate::domain::{Result, WorkItem};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Suffix for downloads in flight
const PARTIAL_SUFFIX: &str = ".part";

/// Whether a fetch downloaded the archive or reused a local copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Archive was downloaded (byte count)
    Downloaded(u64),
    /// A complete local copy was already present
    Reused,
}

/// Download and transform workspaces for one worker
#[derive(Debug, Clone)]
pub struct StagingArea {
    download_dir: PathBuf,
    output_dir: PathBuf,
}

impl StagingArea {
    /// Create a staging area from two directories
    pub fn new(download_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            download_dir: download_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Create a staging area from configuration
    pub fn from_config(config: &StagingConfig) -> Self {
        Self::new(&config.download_dir, &config.output_dir)
    }

    /// Where archives land and are unpacked
    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Where converted outputs are written
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create both directories if missing
    pub async fn ensure(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.download_dir).await?;
        tokio::fs::create_dir_all(&self.output_dir).await?;
        Ok(())
    }

    /// Local path of the archive for `item`
    pub fn archive_path(&self, item: &WorkItem) -> PathBuf {
        self.download_dir.join(item.archive_name())
    }

    /// Make the archive for `item` available locally
    ///
    /// A complete local copy is reused. Otherwise the archive is downloaded to
    /// a `.part` file and renamed into place once the transfer finishes, so an
    /// interrupted download is never mistaken for a complete one.
    pub async fn fetch(&self, store: &dyn ObjectStore, item: &WorkItem) -> Result<FetchStatus> {
        let archive = self.archive_path(item);

        if tokio::fs::try_exists(&archive).await? {
            info!(path = %archive.display(), "File found locally, not downloading");
            return Ok(FetchStatus::Reused);
        }

        let partial = partial_path(&archive);
        info!(
            key = %item,
            bucket = store.bucket(),
            path = %archive.display(),
            "Downloading archive"
        );

        let bytes = match store.download(item.as_str(), &partial).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(e);
            }
        };
        tokio::fs::rename(&partial, &archive).await?;

        Ok(FetchStatus::Downloaded(bytes))
    }

    /// Remove everything below both directories, keeping the directories
    pub async fn clear(&self) -> Result<()> {
        info!(
            download_dir = %self.download_dir.display(),
            output_dir = %self.output_dir.display(),
            "Cleaning up workdir and outdir"
        );
        clear_dir(&self.download_dir).await?;
        clear_dir(&self.output_dir).await?;
        Ok(())
    }
}

fn partial_path(archive: &Path) -> PathBuf {
    let mut name = archive.as_os_str().to_owned();
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

/// Delete all files and directories below `dir`
async fn clear_dir(dir: &Path) -> Result<()> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_dir() {
            debug!(path = %path.display(), "Deleting directory");
            tokio::fs::remove_dir_all(&path).await?;
        } else {
            debug!(path = %path.display(), "Deleting file");
            tokio::fs::remove_file(&path).await?;
        }
    }
    Ok(())
}
