//! Domain identifier types with validation
//!
//! Newtype wrappers for the keys and paths the pipeline passes around, so a
//! source key can't be confused with a destination key or a staging path.

use super::metadata::ExtractedMetadata;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

/// A unit of work: the source key of one archive in the input bucket
///
/// Queue messages carry this key as their plain-text body.
///
/// # Examples
///
/// ```
/// use landsat_cog::domain::ids::WorkItem;
/// use std::str::FromStr;
///
/// let item = WorkItem::from_str("espa/LE072110482001051101T1-SC20181129141358.tar.gz").unwrap();
/// assert_eq!(item.archive_name(), "LE072110482001051101T1-SC20181129141358.tar.gz");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkItem(String);

impl WorkItem {
    /// Creates a new WorkItem from a source key
    ///
    /// Surrounding whitespace is trimmed; a key that is empty or ends in `/`
    /// names no file and is rejected.
    pub fn new(key: impl Into<String>) -> Result<Self, String> {
        let key = key.into();
        let key = key.trim();
        if key.is_empty() {
            return Err("Work item key cannot be empty".to_string());
        }
        if key.ends_with('/') {
            return Err(format!("Work item key '{key}' does not name a file"));
        }
        Ok(Self(key.to_string()))
    }

    /// Returns the source key
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path segment of the key, used as the local archive name
    pub fn archive_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WorkItem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for WorkItem {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Path of an input raster relative to the download workspace
///
/// The same relative path is mirrored under the transform workspace, and its
/// file name becomes the last segment of the published key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativeAssetPath(PathBuf);

impl RelativeAssetPath {
    /// Builds the relative path of `file` under `root`
    ///
    /// Fails if `file` is not inside `root` or has no file name.
    pub fn from_root(root: &Path, file: &Path) -> Result<Self, String> {
        let relative = file.strip_prefix(root).map_err(|_| {
            format!(
                "{} is not inside workspace {}",
                file.display(),
                root.display()
            )
        })?;
        Self::new(relative)
    }

    /// Wraps an already-relative path
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, String> {
        let path = path.into();
        if path.file_name().is_none() {
            return Err(format!("{} has no file name", path.display()));
        }
        let escapes = path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(format!("{} is not a plain relative path", path.display()));
        }
        Ok(Self(path))
    }

    /// The file name component
    pub fn file_name(&self) -> String {
        self.0
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Resolves this path under another workspace root
    pub fn under(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }

    /// The relative path itself
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RelativeAssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Canonical destination prefix for one scene
///
/// `{root}/{satellite}/{path}/{row}/{YYYY}/{MM}/{DD}`. The existence of the
/// descriptor under this prefix marks the scene as published.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutputKeyPrefix(String);

impl OutputKeyPrefix {
    /// Derives the prefix from an output root and scene metadata
    ///
    /// # Examples
    ///
    /// ```
    /// use landsat_cog::domain::{ExtractedMetadata, OutputKeyPrefix};
    /// use chrono::NaiveDate;
    ///
    /// let metadata = ExtractedMetadata {
    ///     acquisition_date: NaiveDate::from_ymd_opt(2001, 5, 11).unwrap(),
    ///     satellite_id: "LE07".to_string(),
    ///     grid_path: "021".to_string(),
    ///     grid_row: "048".to_string(),
    /// };
    /// let prefix = OutputKeyPrefix::new("test", &metadata);
    /// assert_eq!(prefix.as_str(), "test/LE07/021/048/2001/05/11");
    /// ```
    pub fn new(root: &str, metadata: &ExtractedMetadata) -> Self {
        let scene = format!(
            "{}/{}/{}/{}",
            metadata.satellite_id,
            metadata.grid_path,
            metadata.grid_row,
            metadata.acquisition_date.format("%Y/%m/%d")
        );
        let root = root.trim_matches('/');
        if root.is_empty() {
            Self(scene)
        } else {
            Self(format!("{root}/{scene}"))
        }
    }

    /// Key of a file published under this prefix
    pub fn key_for(&self, file_name: &str) -> String {
        format!("{}/{}", self.0, file_name)
    }

    /// Returns the prefix
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OutputKeyPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
