//! Raster translation
//!
//! The conversion itself is delegated to GDAL's `gdal_translate` with the
//! COG output driver. [`RasterTranslator`] is the seam tests replace.

use super::profile::CogProfile;
use crate::domain::{Result, TransformError};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

/// Converts one raster into a Cloud Optimised GeoTIFF
#[async_trait]
pub trait RasterTranslator: Send + Sync {
    /// Write a COG of `input` to `output` using `profile`
    ///
    /// The parent directory of `output` must exist.
    ///
    /// # Errors
    ///
    /// Any conversion failure is a [`TransformError`].
    async fn translate(&self, input: &Path, output: &Path, profile: &CogProfile) -> Result<()>;
}

/// [`RasterTranslator`] backed by the `gdal_translate` executable
#[derive(Debug, Clone)]
pub struct GdalTranslator {
    program: String,
}

impl GdalTranslator {
    /// Use the given executable name or path
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Executable this translator runs
    pub fn program(&self) -> &str {
        &self.program
    }

    fn arguments(input: &Path, output: &Path, profile: &CogProfile) -> Vec<String> {
        let mut args = vec!["-q".to_string(), "-of".to_string(), "COG".to_string()];
        for option in profile.creation_options() {
            args.push("-co".to_string());
            args.push(option);
        }
        args.push(input.display().to_string());
        args.push(output.display().to_string());
        args
    }
}

impl Default for GdalTranslator {
    fn default() -> Self {
        Self::new("gdal_translate")
    }
}

#[async_trait]
impl RasterTranslator for GdalTranslator {
    async fn translate(&self, input: &Path, output: &Path, profile: &CogProfile) -> Result<()> {
        let args = Self::arguments(input, output, profile);
        debug!(program = %self.program, args = ?args, "Running converter");

        let result = Command::new(&self.program)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| TransformError::LaunchFailed {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        if !result.status.success() {
            return Err(TransformError::ConversionFailed {
                input: input.to_path_buf(),
                code: result.status.code(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            }
            .into());
        }

        if !tokio::fs::try_exists(output).await? {
            return Err(TransformError::MissingOutput(output.to_path_buf()).into());
        }

        info!(
            input = %input.display(),
            output = %output.display(),
            "Converted raster to COG"
        );
        Ok(())
    }
}
