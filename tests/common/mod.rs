//! Shared fixtures for integration tests
//!
//! In-memory stand-ins for the object store, the work queue and the raster
//! translator, plus builders for scene archives.

#![allow(dead_code)]

use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use landsat_cog::adapters::queue::{Lease, WorkQueue};
use landsat_cog::adapters::storage::{KeyPage, ObjectStore};
use landsat_cog::core::process::{AckPolicy, Orchestrator, OrchestratorSettings};
use landsat_cog::core::staging::StagingArea;
use landsat_cog::core::transform::{CogProfile, RasterTranslator};
use landsat_cog::domain::{
    PipelineError, QueueError, Result, StorageError, TransformError, WorkItem,
};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

pub const SCENE: &str = "LE07_L1TP_021048_20010511_20181129_01_T1";
pub const ITEM_KEY: &str =
    "espa/order-1129/LE072110482001051101T1-SC20181129141358.tar.gz";
pub const OUTPUT_PREFIX: &str = "test/LE07/021/048/2001/05/11";

// ---------------------------------------------------------------------------
// Object store
// ---------------------------------------------------------------------------

/// Bucket held in memory
pub struct InMemoryStore {
    bucket: String,
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    uploads: Mutex<Vec<String>>,
    downloads: AtomicUsize,
    fail_lookups: AtomicBool,
    page_size: usize,
}

impl InMemoryStore {
    pub fn new(bucket: &str) -> Self {
        Self::with_page_size(bucket, 1000)
    }

    pub fn with_page_size(bucket: &str, page_size: usize) -> Self {
        Self {
            bucket: bucket.to_string(),
            objects: Mutex::new(BTreeMap::new()),
            uploads: Mutex::new(Vec::new()),
            downloads: AtomicUsize::new(0),
            fail_lookups: AtomicBool::new(false),
            page_size,
        }
    }

    pub fn put(&self, key: &str, data: Vec<u8>) {
        self.objects.lock().unwrap().insert(key.to_string(), data);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    /// Keys in upload order, repeats included
    pub fn upload_log(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    pub fn fail_lookups(&self) {
        self.fail_lookups.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(StorageError::LookupFailed {
                bucket: self.bucket.clone(),
                key: key.to_string(),
                message: "simulated 500".to_string(),
            }
            .into());
        }
        Ok(self.contains(key))
    }

    async fn download(&self, key: &str, destination: &Path) -> Result<u64> {
        let data = self
            .objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                bucket: self.bucket.clone(),
                key: key.to_string(),
            })?;
        self.downloads.fetch_add(1, Ordering::SeqCst);
        tokio::fs::write(destination, &data).await?;
        Ok(data.len() as u64)
    }

    async fn upload(&self, key: &str, source: &Path) -> Result<()> {
        let data = tokio::fs::read(source).await?;
        self.put(key, data);
        self.uploads.lock().unwrap().push(key.to_string());
        Ok(())
    }

    async fn list_page(
        &self,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> Result<KeyPage> {
        let start: usize = continuation_token
            .map(|t| t.parse().unwrap())
            .unwrap_or(0);
        let matching: Vec<String> = self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        let end = (start + self.page_size).min(matching.len());
        Ok(KeyPage {
            keys: matching[start..end].to_vec(),
            next_token: (end < matching.len()).then(|| end.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Work queue
// ---------------------------------------------------------------------------

#[derive(Default)]
struct QueueState {
    visible: VecDeque<(String, u32)>,
    in_flight: HashMap<String, (String, u32)>,
    next_handle: usize,
}

/// Queue with lease semantics but no timeouts: an unsettled lease stays in
/// flight for the rest of the test
#[derive(Default)]
pub struct InMemoryQueue {
    state: Mutex<QueueState>,
    acknowledged: Mutex<Vec<String>>,
    released: Mutex<Vec<String>>,
    sent: Mutex<Vec<String>>,
    receives: AtomicUsize,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(keys: &[&str]) -> Self {
        let queue = Self::new();
        for key in keys {
            queue.push(key);
        }
        queue
    }

    /// Add a message without recording it as sent
    pub fn push(&self, body: &str) {
        self.state
            .lock()
            .unwrap()
            .visible
            .push_back((body.to_string(), 0));
    }

    pub fn visible(&self) -> usize {
        self.state.lock().unwrap().visible.len()
    }

    pub fn in_flight(&self) -> usize {
        self.state.lock().unwrap().in_flight.len()
    }

    pub fn acknowledged(&self) -> Vec<String> {
        self.acknowledged.lock().unwrap().clone()
    }

    pub fn released(&self) -> Vec<String> {
        self.released.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn receive_calls(&self) -> usize {
        self.receives.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkQueue for InMemoryQueue {
    fn name(&self) -> &str {
        "in-memory"
    }

    async fn receive(&self, _visibility_timeout: Duration) -> Result<Option<Lease>> {
        self.receives.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        let Some((body, count)) = state.visible.pop_front() else {
            return Ok(None);
        };
        let count = count + 1;
        state.next_handle += 1;
        let handle = format!("handle-{}", state.next_handle);
        state
            .in_flight
            .insert(handle.clone(), (body.clone(), count));

        let item = WorkItem::new(body).map_err(QueueError::InvalidMessage)?;
        Ok(Some(Lease {
            item,
            receipt_handle: handle,
            receive_count: count,
        }))
    }

    async fn acknowledge(&self, lease: &Lease) -> Result<()> {
        let removed = self
            .state
            .lock()
            .unwrap()
            .in_flight
            .remove(&lease.receipt_handle);
        if removed.is_none() {
            return Err(QueueError::DeleteFailed("unknown receipt handle".to_string()).into());
        }
        self.acknowledged
            .lock()
            .unwrap()
            .push(lease.item.as_str().to_string());
        Ok(())
    }

    async fn release(&self, lease: &Lease) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let (body, count) = state
            .in_flight
            .remove(&lease.receipt_handle)
            .ok_or_else(|| QueueError::ReleaseFailed("unknown receipt handle".to_string()))?;
        state.visible.push_back((body, count));
        self.released
            .lock()
            .unwrap()
            .push(lease.item.as_str().to_string());
        Ok(())
    }

    async fn depth(&self) -> Result<usize> {
        Ok(self.visible())
    }

    async fn enqueue(&self, item: &WorkItem) -> Result<()> {
        self.push(item.as_str());
        self.sent.lock().unwrap().push(item.as_str().to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Translators
// ---------------------------------------------------------------------------

/// Copies input to output and counts calls
#[derive(Default)]
pub struct CopyTranslator {
    calls: AtomicUsize,
}

impl CopyTranslator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RasterTranslator for CopyTranslator {
    async fn translate(&self, input: &Path, output: &Path, _profile: &CogProfile) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::fs::copy(input, output).await?;
        Ok(())
    }
}

/// Fails every conversion
pub struct FailingTranslator;

#[async_trait]
impl RasterTranslator for FailingTranslator {
    async fn translate(&self, input: &Path, _output: &Path, _profile: &CogProfile) -> Result<()> {
        Err(PipelineError::Transform(TransformError::ConversionFailed {
            input: input.to_path_buf(),
            code: Some(1),
            stderr: "ERROR 4: not recognized as a supported file format".to_string(),
        }))
    }
}

/// Fails the first conversion, copies after that
#[derive(Default)]
pub struct FailFirstTranslator {
    failed: AtomicBool,
    inner: CopyTranslator,
}

#[async_trait]
impl RasterTranslator for FailFirstTranslator {
    async fn translate(&self, input: &Path, output: &Path, profile: &CogProfile) -> Result<()> {
        if !self.failed.swap(true, Ordering::SeqCst) {
            return FailingTranslator.translate(input, output, profile).await;
        }
        self.inner.translate(input, output, profile).await
    }
}

// ---------------------------------------------------------------------------
// Archives
// ---------------------------------------------------------------------------

pub fn descriptor_xml(namespaced: bool) -> String {
    let namespace = if namespaced {
        r#" xmlns="http://espa.cr.usgs.gov/v2" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#
    } else {
        ""
    };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<espa_metadata version="2.0"{namespace}>
  <global_metadata>
    <data_provider>USGS/EROS</data_provider>
    <satellite>LE07</satellite>
    <instrument>ETM</instrument>
    <acquisition_date>2001-05-11</acquisition_date>
    <wrs system="2" path="021" row="048"/>
  </global_metadata>
</espa_metadata>
"#
    )
}

/// Gzipped tar of one scene with `rasters` qualifying bands, one
/// non-qualifying band and the descriptor (unless `descriptors` is 0)
pub fn scene_archive_with(rasters: usize, descriptors: usize, namespaced: bool) -> Vec<u8> {
    named_scene_archive(SCENE, rasters, descriptors, namespaced)
}

/// Like [`scene_archive_with`], with files named after `scene`
pub fn named_scene_archive(
    scene: &str,
    rasters: usize,
    descriptors: usize,
    namespaced: bool,
) -> Vec<u8> {
    let mut files: Vec<(String, Vec<u8>)> = Vec::new();
    for band in 1..=rasters {
        files.push((
            format!("{scene}_sr_band{band}.tif"),
            format!("band {band}").into_bytes(),
        ));
    }
    files.push((format!("{scene}_toa_band1.tif"), b"toa".to_vec()));
    for n in 0..descriptors {
        let name = if n == 0 {
            format!("{scene}.xml")
        } else {
            format!("{scene}_{n}.xml")
        };
        files.push((name, descriptor_xml(namespaced).into_bytes()));
    }
    tar_gz(&files)
}

/// Gzip magic followed by a header no decoder accepts
pub fn corrupt_archive() -> Vec<u8> {
    let mut data = vec![0x1f, 0x8b, 0x00, 0x00];
    data.extend_from_slice(b"this was never a tarball");
    data
}

pub fn scene_archive(rasters: usize) -> Vec<u8> {
    scene_archive_with(rasters, 1, false)
}

pub fn tar_gz(files: &[(String, Vec<u8>)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, data) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, data.as_slice()).unwrap();
    }
    let tar = builder.into_inner().unwrap();

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar).unwrap();
    encoder.finish().unwrap()
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// Fakes plus a temporary staging area
pub struct Harness {
    pub root: TempDir,
    pub source: Arc<InMemoryStore>,
    pub destination: Arc<InMemoryStore>,
    pub queue: Arc<InMemoryQueue>,
    pub translator: Arc<CopyTranslator>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().unwrap(),
            source: Arc::new(InMemoryStore::new("landsat-in")),
            destination: Arc::new(InMemoryStore::new("landsat-out")),
            queue: Arc::new(InMemoryQueue::new()),
            translator: Arc::new(CopyTranslator::default()),
        }
    }

    /// Put an archive in the source bucket and its key on the queue
    pub fn seed(&self, key: &str, archive: Vec<u8>) {
        self.source.put(key, archive);
        self.queue.push(key);
    }

    pub fn staging(&self) -> StagingArea {
        StagingArea::new(
            self.root.path().join("download"),
            self.root.path().join("out"),
        )
    }

    pub fn settings() -> OrchestratorSettings {
        OrchestratorSettings {
            output_root: "test".to_string(),
            visibility_timeout: Duration::from_secs(1000),
            min_outputs: 7,
            ack_policy: AckPolicy::default(),
            profile: CogProfile::default(),
        }
    }

    pub fn orchestrator(&self) -> Orchestrator {
        self.orchestrator_with(Self::settings(), self.translator.clone())
    }

    pub fn orchestrator_with(
        &self,
        settings: OrchestratorSettings,
        translator: Arc<dyn RasterTranslator>,
    ) -> Orchestrator {
        Orchestrator::new(
            self.source.clone(),
            self.destination.clone(),
            self.queue.clone(),
            translator,
            self.staging(),
            settings,
        )
    }

    pub fn file_count(dir: &Path) -> usize {
        if !dir.exists() {
            return 0;
        }
        walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .count()
    }
}
