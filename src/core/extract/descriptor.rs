//! Scene descriptor discovery and parsing
//!
//! Each archive ships one XML descriptor next to its rasters. Only four
//! fields are read from it; everything else in the document is ignored.

use crate::domain::{ExtractError, ExtractedMetadata, PipelineError, Result};
use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info};

/// Default namespace declaration, e.g. ` xmlns="http://espa.cr.usgs.gov/v2"`
static DEFAULT_NAMESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\sxmlns="[^"]+""#).unwrap());

/// Date format of `acquisition_date`
const ACQUISITION_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Deserialize)]
struct Descriptor {
    #[serde(default)]
    global_metadata: Option<GlobalMetadata>,
}

#[derive(Debug, Deserialize)]
struct GlobalMetadata {
    #[serde(default)]
    satellite: Option<String>,

    #[serde(default)]
    acquisition_date: Option<String>,

    #[serde(default)]
    wrs: Option<Wrs>,
}

#[derive(Debug, Deserialize)]
struct Wrs {
    #[serde(rename = "@path", default)]
    path: Option<String>,

    #[serde(rename = "@row", default)]
    row: Option<String>,
}

/// Locate the single descriptor among the top-level files of `dir`
///
/// A file counts as a descriptor when its name contains `.xml`.
///
/// # Errors
///
/// - [`ExtractError::DescriptorNotFound`] when there is none
/// - [`ExtractError::MultipleDescriptors`] when there is more than one
pub fn find_descriptor(dir: &Path) -> Result<PathBuf> {
    let mut found: Vec<(String, PathBuf)> = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.contains(".xml") {
            found.push((name, entry.path()));
        }
    }

    match found.len() {
        0 => Err(ExtractError::DescriptorNotFound(dir.to_path_buf()).into()),
        1 => {
            let (name, path) = found.remove(0);
            debug!(descriptor = %name, "Found descriptor");
            Ok(path)
        }
        _ => {
            let mut files: Vec<String> = found.into_iter().map(|(name, _)| name).collect();
            files.sort();
            Err(ExtractError::MultipleDescriptors {
                dir: dir.to_path_buf(),
                files,
            }
            .into())
        }
    }
}

/// Read and parse the descriptor at `path`
pub async fn parse_descriptor(path: &Path) -> Result<ExtractedMetadata> {
    let xml = tokio::fs::read_to_string(path).await?;
    let metadata = parse_descriptor_str(&xml, path)?;

    info!(
        satellite = %metadata.satellite_id,
        path = %metadata.grid_path,
        row = %metadata.grid_row,
        acquisition_date = %metadata.acquisition_date,
        "Parsed scene metadata"
    );
    Ok(metadata)
}

/// Parse descriptor text; `path` is only used in error messages
///
/// A default `xmlns` declaration on the root is removed before parsing, so
/// namespaced and plain documents yield the same result.
pub fn parse_descriptor_str(xml: &str, path: &Path) -> Result<ExtractedMetadata> {
    let malformed = |message: String| -> PipelineError {
        ExtractError::MalformedMetadata {
            path: path.to_path_buf(),
            message,
        }
        .into()
    };

    let xml = DEFAULT_NAMESPACE.replace(xml, "");

    let descriptor: Descriptor =
        quick_xml::de::from_str(&xml).map_err(|e| malformed(format!("invalid XML: {e}")))?;

    let global = descriptor
        .global_metadata
        .ok_or_else(|| malformed("missing global_metadata".to_string()))?;

    let satellite_id = required(global.satellite, "satellite").map_err(&malformed)?;
    let date = required(global.acquisition_date, "acquisition_date").map_err(&malformed)?;
    let wrs = global
        .wrs
        .ok_or_else(|| malformed("missing wrs".to_string()))?;
    let grid_path = required(wrs.path, "wrs path").map_err(&malformed)?;
    let grid_row = required(wrs.row, "wrs row").map_err(&malformed)?;

    let acquisition_date = NaiveDate::parse_from_str(&date, ACQUISITION_DATE_FORMAT)
        .map_err(|e| malformed(format!("invalid acquisition_date '{date}': {e}")))?;

    Ok(ExtractedMetadata {
        acquisition_date,
        satellite_id,
        grid_path,
        grid_row,
    })
}

fn required(value: Option<String>, field: &str) -> std::result::Result<String, String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(format!("missing {field}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PLAIN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<espa_metadata version="2.0">
  <global_metadata>
    <data_provider>USGS/EROS</data_provider>
    <satellite>LE07</satellite>
    <instrument>ETM</instrument>
    <acquisition_date>2001-05-11</acquisition_date>
    <scene_center_time>15:57:21.8310330Z</scene_center_time>
    <wrs system="2" path="021" row="048"/>
  </global_metadata>
</espa_metadata>"#;

    fn malformed(result: Result<ExtractedMetadata>) -> bool {
        matches!(
            result,
            Err(PipelineError::Extract(ExtractError::MalformedMetadata { .. }))
        )
    }

    #[test]
    fn test_parse_plain_descriptor() {
        let metadata = parse_descriptor_str(PLAIN, Path::new("scene.xml")).unwrap();
        assert_eq!(metadata.satellite_id, "LE07");
        assert_eq!(metadata.grid_path, "021");
        assert_eq!(metadata.grid_row, "048");
        assert_eq!(
            metadata.acquisition_date,
            NaiveDate::from_ymd_opt(2001, 5, 11).unwrap()
        );
    }

    #[test]
    fn test_parse_namespaced_descriptor_matches_plain() {
        let namespaced = PLAIN.replace(
            r#"<espa_metadata version="2.0">"#,
            r#"<espa_metadata version="2.0" xmlns="http://espa.cr.usgs.gov/v2">"#,
        );
        let plain = parse_descriptor_str(PLAIN, Path::new("a.xml")).unwrap();
        let ns = parse_descriptor_str(&namespaced, Path::new("a.xml")).unwrap();
        assert_eq!(plain, ns);
    }

    #[test]
    fn test_default_namespace_only_strips_default_declaration() {
        let root = r#"<espa_metadata xmlns="http://espa.cr.usgs.gov/v2" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#;
        assert_eq!(
            DEFAULT_NAMESPACE.replace(root, ""),
            r#"<espa_metadata xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
        );

        // Shared pattern is reused across parses
        for _ in 0..3 {
            assert!(parse_descriptor_str(PLAIN, Path::new("a.xml")).is_ok());
        }
    }

    #[test]
    fn test_values_are_trimmed() {
        let xml = PLAIN.replace("<satellite>LE07</satellite>", "<satellite>\n  LE07 \n</satellite>");
        let metadata = parse_descriptor_str(&xml, Path::new("a.xml")).unwrap();
        assert_eq!(metadata.satellite_id, "LE07");
    }

    #[test]
    fn test_missing_satellite_is_malformed() {
        let xml = PLAIN.replace("<satellite>LE07</satellite>", "");
        assert!(malformed(parse_descriptor_str(&xml, Path::new("a.xml"))));
    }

    #[test]
    fn test_missing_wrs_row_is_malformed() {
        let xml = PLAIN.replace(r#" row="048""#, "");
        assert!(malformed(parse_descriptor_str(&xml, Path::new("a.xml"))));
    }

    #[test]
    fn test_bad_date_is_malformed() {
        let xml = PLAIN.replace("2001-05-11", "11/05/2001");
        assert!(malformed(parse_descriptor_str(&xml, Path::new("a.xml"))));
    }

    #[test]
    fn test_not_xml_is_malformed() {
        assert!(malformed(parse_descriptor_str(
            "definitely not xml <",
            Path::new("a.xml")
        )));
    }

    #[test]
    fn test_find_single_descriptor() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("scene.xml"), PLAIN).unwrap();
        std::fs::write(dir.path().join("scene_sr_band1.tif"), b"x").unwrap();

        let found = find_descriptor(dir.path()).unwrap();
        assert_eq!(found, dir.path().join("scene.xml"));
    }

    #[test]
    fn test_find_ignores_nested_xml() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("scene.xml"), PLAIN).unwrap();
        std::fs::create_dir(dir.path().join("aux")).unwrap();
        std::fs::write(dir.path().join("aux/other.xml"), PLAIN).unwrap();

        assert!(find_descriptor(dir.path()).is_ok());
    }

    #[test]
    fn test_find_no_descriptor() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("scene_qa.tif"), b"x").unwrap();

        let err = find_descriptor(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Extract(ExtractError::DescriptorNotFound(_))
        ));
    }

    #[test]
    fn test_find_multiple_descriptors() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.xml"), PLAIN).unwrap();
        std::fs::write(dir.path().join("a.xml"), PLAIN).unwrap();

        match find_descriptor(dir.path()).unwrap_err() {
            PipelineError::Extract(ExtractError::MultipleDescriptors { files, .. }) => {
                assert_eq!(files, vec!["a.xml".to_string(), "b.xml".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
