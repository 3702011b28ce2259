//! Qualifying raster discovery

use crate::domain::{PipelineError, RelativeAssetPath, Result};
use std::path::Path;
use walkdir::WalkDir;

/// Whether a file name is a surface reflectance or QA raster
///
/// The name must end in `.tif` and contain `_sr_` or `_qa`.
pub fn is_qualifying(file_name: &str) -> bool {
    file_name.ends_with(".tif") && (file_name.contains("_sr_") || file_name.contains("_qa"))
}

/// Every qualifying raster below `root`, as paths relative to it
///
/// The walk is recursive and the result is sorted, so conversion and upload
/// order are stable across runs.
pub fn qualifying_rasters(root: &Path) -> Result<Vec<RelativeAssetPath>> {
    let mut found = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| PipelineError::Io(format!("Failed to walk workspace: {e}")))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !is_qualifying(&name) {
            continue;
        }
        let relative =
            RelativeAssetPath::from_root(root, entry.path()).map_err(PipelineError::Validation)?;
        found.push(relative);
    }

    found.sort();
    Ok(found)
}
