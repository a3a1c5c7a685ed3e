//! File-backed dataset load/save.
//!
//! # Invariants
//! - `load_dataset` returns a dataset at the latest schema version.
//! - `read_dataset` never migrates and never writes.
//! - `save_dataset` either replaces the target file completely or leaves it
//!   as it was.

use super::migrations::apply_migrations;
use super::StoreResult;
use crate::model::dataset::Dataset;
use log::{error, info};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use uuid::Uuid;

/// Opens a dataset file and applies all pending migrations.
///
/// Migration results are kept in memory only; they reach disk with the next
/// save.
///
/// # Side effects
/// - Emits `dataset_load` logging events with duration and status.
pub fn load_dataset(path: impl AsRef<Path>) -> StoreResult<Dataset> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!(
        "event=dataset_load module=store status=start path={}",
        path.display()
    );

    let result = read_dataset(path).and_then(|mut dataset| {
        let from_version = dataset.db_version;
        if apply_migrations(&mut dataset)? {
            info!(
                "event=dataset_migrate module=store status=ok from_version={} to_version={}",
                from_version, dataset.db_version
            );
        }
        Ok(dataset)
    });

    match &result {
        Ok(dataset) => info!(
            "event=dataset_load module=store status=ok duration_ms={} episodes={} version={}",
            started_at.elapsed().as_millis(),
            dataset.episodes.len(),
            dataset.db_version
        ),
        Err(err) => error!(
            "event=dataset_load module=store status=error duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

/// Decodes a dataset file as-is, without migrating.
pub fn read_dataset(path: impl AsRef<Path>) -> StoreResult<Dataset> {
    let file = File::open(path.as_ref())?;
    let dataset = serde_json::from_reader(BufReader::new(file))?;
    Ok(dataset)
}

/// Writes the whole dataset as tab-indented JSON.
///
/// The document goes to a uniquely named sibling first and is then renamed
/// over `path`.
///
/// # Side effects
/// - Emits `dataset_save` logging events with duration and status.
pub fn save_dataset(path: impl AsRef<Path>, dataset: &Dataset) -> StoreResult<()> {
    let path = path.as_ref();
    let started_at = Instant::now();

    let result = write_atomically(path, &encode(dataset)?);
    match &result {
        Ok(()) => info!(
            "event=dataset_save module=store status=ok duration_ms={} path={}",
            started_at.elapsed().as_millis(),
            path.display()
        ),
        Err(err) => error!(
            "event=dataset_save module=store status=error duration_ms={} path={} error={}",
            started_at.elapsed().as_millis(),
            path.display(),
            err
        ),
    }
    result
}

fn encode(dataset: &Dataset) -> StoreResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
    dataset.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

fn write_atomically(path: &Path, contents: &[u8]) -> StoreResult<()> {
    let tmp_path = temp_sibling(path);
    let written = (|| -> std::io::Result<()> {
        let mut file = File::create(&tmp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();

    if let Err(err) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(err.into());
    }
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string());
    path.with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4().simple()))
}
