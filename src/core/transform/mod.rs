//! Raster transformation
//!
//! Converts every qualifying raster in the download workspace into a COG
//! under the transform workspace, mirroring relative paths:
//!
//! - [`scan`] - which files qualify
//! - [`profile`] - fixed COG creation parameters
//! - [`gdal`] - the [`RasterTranslator`] seam and its GDAL implementation

pub mod gdal;
pub mod profile;
pub mod scan;

pub use gdal::{GdalTranslator, RasterTranslator};
pub use profile::CogProfile;
pub use scan::{is_qualifying, qualifying_rasters};

use crate::domain::{RelativeAssetPath, Result};
use std::path::{Path, PathBuf};

/// One converted raster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducedOutput {
    /// Path relative to both workspaces
    pub relative: RelativeAssetPath,

    /// Location of the COG in the transform workspace
    pub path: PathBuf,
}

/// Convert every qualifying raster under `input_root` into `output_root`
///
/// Stops at the first conversion failure; outputs written before it are left
/// in place for cleanup to remove.
pub async fn transform_workspace(
    translator: &dyn RasterTranslator,
    input_root: &Path,
    output_root: &Path,
    profile: &CogProfile,
) -> Result<Vec<ProducedOutput>> {
    let rasters = qualifying_rasters(input_root)?;
    tracing::info!(count = rasters.len(), "Found qualifying rasters");

    let mut produced = Vec::with_capacity(rasters.len());
    for relative in rasters {
        let input = relative.under(input_root);
        let output = relative.under(output_root);
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        translator.translate(&input, &output, profile).await?;
        produced.push(ProducedOutput {
            relative,
            path: output,
        });
    }

    Ok(produced)
}
