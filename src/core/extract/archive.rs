//! Archive unpacking
//!
//! Handles gzip-compressed and plain tar archives. Compression is detected
//! from the gzip magic bytes rather than the file name.

use crate::domain::{ExtractError, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::info;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Unpack `archive` into `work_dir`
///
/// Runs on the blocking pool. Entries that would escape `work_dir` are
/// skipped by the tar reader.
///
/// # Errors
///
/// Returns [`ExtractError::ArchiveFailed`] if the archive can't be opened or
/// any entry fails to unpack.
pub async fn extract(archive: &Path, work_dir: &Path) -> Result<()> {
    info!(
        archive = %archive.display(),
        work_dir = %work_dir.display(),
        "Unpacking archive"
    );

    let archive_path = archive.to_path_buf();
    let work_dir = work_dir.to_path_buf();

    let result = tokio::task::spawn_blocking({
        let archive_path = archive_path.clone();
        move || unpack_blocking(&archive_path, &work_dir)
    })
    .await
    .map_err(|e| archive_failed(&archive_path, format!("unpack task failed: {e}")))?;

    result.map_err(|message| archive_failed(&archive_path, message).into())
}

fn archive_failed(archive: &Path, message: String) -> ExtractError {
    ExtractError::ArchiveFailed {
        archive: PathBuf::from(archive),
        message,
    }
}

fn unpack_blocking(archive: &Path, work_dir: &Path) -> std::result::Result<(), String> {
    let mut file = File::open(archive).map_err(|e| format!("cannot open archive: {e}"))?;

    let mut magic = [0u8; 2];
    let is_gzip = match file.read_exact(&mut magic) {
        Ok(()) => magic == GZIP_MAGIC,
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => false,
        Err(e) => return Err(format!("cannot read archive: {e}")),
    };
    file.seek(SeekFrom::Start(0))
        .map_err(|e| format!("cannot rewind archive: {e}"))?;

    let reader = BufReader::new(file);
    if is_gzip {
        unpack_tar(GzDecoder::new(reader), work_dir)
    } else {
        unpack_tar(reader, work_dir)
    }
}

fn unpack_tar<R: Read>(reader: R, work_dir: &Path) -> std::result::Result<(), String> {
    let mut archive = tar::Archive::new(reader);
    archive.set_preserve_permissions(false);
    archive.set_overwrite(true);

    let mut unpacked = 0usize;
    for entry in archive.entries().map_err(|e| format!("cannot read entries: {e}"))? {
        let mut entry = entry.map_err(|e| format!("corrupt entry: {e}"))?;
        entry
            .unpack_in(work_dir)
            .map_err(|e| format!("cannot unpack entry: {e}"))?;
        unpacked += 1;
    }

    if unpacked == 0 {
        return Err("archive contains no entries".to_string());
    }

    tracing::debug!(entries = unpacked, "Archive unpacked");
    Ok(())
}
