//! COG creation profile

use crate::config::TransformConfig;

/// Static conversion parameters applied to every raster
///
/// Tiled, pixel-interleaved GeoTIFF with DEFLATE compression and internal
/// overviews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CogProfile {
    /// Tile edge length in pixels (tiles are square)
    pub block_size: u32,

    /// DEFLATE level
    pub compression_level: u8,

    /// TIFF predictor
    pub predictor: u8,

    /// Number of overview levels
    pub overview_levels: u32,

    /// Overview resampling method
    pub overview_resampling: String,
}

impl Default for CogProfile {
    fn default() -> Self {
        Self::from_config(&TransformConfig::default())
    }
}

impl CogProfile {
    /// Build the profile from the `[transform]` section
    pub fn from_config(config: &TransformConfig) -> Self {
        Self {
            block_size: config.block_size,
            compression_level: config.compression_level,
            predictor: config.predictor,
            overview_levels: config.overview_levels,
            overview_resampling: config.overview_resampling.clone(),
        }
    }

    /// Creation options for GDAL's COG driver, as `KEY=VALUE` strings
    pub fn creation_options(&self) -> Vec<String> {
        vec![
            format!("BLOCKSIZE={}", self.block_size),
            "COMPRESS=DEFLATE".to_string(),
            format!("LEVEL={}", self.compression_level),
            format!("PREDICTOR={}", self.predictor),
            format!("OVERVIEW_COUNT={}", self.overview_levels),
            format!(
                "OVERVIEW_RESAMPLING={}",
                self.overview_resampling.to_uppercase()
            ),
            "INTERLEAVE=PIXEL".to_string(),
        ]
    }
}
