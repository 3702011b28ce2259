//! Scene metadata extracted from a product descriptor

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The fields of a scene descriptor the pipeline needs to place its outputs
///
/// Deterministic for a given descriptor: the same archive always yields the
/// same [`OutputKeyPrefix`](crate::domain::OutputKeyPrefix).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedMetadata {
    /// Date the scene was acquired
    pub acquisition_date: NaiveDate,

    /// Satellite identifier as written in the descriptor
    pub satellite_id: String,

    /// WRS path
    pub grid_path: String,

    /// WRS row
    pub grid_row: String,
}
