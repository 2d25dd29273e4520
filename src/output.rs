//! Writing a [`MergedResult`] to disk.
//!
//! Two layouts are supported:
//!
//! - **archive**: a deflate ZIP holding `skins.json`, `geometry.json` (only
//!   when the merged library is non-empty), and every texture and other file
//!   under its bare name at the archive root.
//! - **JSON directory**: `merged_skins.json` and `merged_geometry.json` only;
//!   binary assets are not copied.
//!
//! Documents are pretty-printed with 2-space indentation, non-ASCII text is
//! written as-is, and object keys keep their original order.

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::blob::read_blob;
use crate::merge::{MergedResult, ProgressObserver};
use crate::model::NamedBlob;

/// Archive entry holding the merged skin document.
pub const SKINS_ENTRY: &str = "skins.json";

/// Archive entry holding the merged geometry library.
pub const GEOMETRY_ENTRY: &str = "geometry.json";

/// Skin document file name in a JSON output directory.
pub const JSON_SKINS_FILE: &str = "merged_skins.json";

/// Geometry file name in a JSON output directory.
pub const JSON_GEOMETRY_FILE: &str = "merged_geometry.json";

/// Failure that aborts writing the output as a whole.
///
/// Individual asset files that cannot be read do not produce an
/// `OutputError`; they are listed in [`ArchiveReport::skipped`].
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// An asset left out of the archive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub name: String,
    pub reason: String,
}

/// What [`write_archive`] put into the archive.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ArchiveReport {
    /// Entry names, in write order.
    pub entries: Vec<String>,
    pub skipped: Vec<SkippedFile>,
}

impl fmt::Display for ArchiveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} entries written", self.entries.len())?;
        for s in &self.skipped {
            write!(f, "\n  skipped {}: {}", s.name, s.reason)?;
        }
        Ok(())
    }
}

/// Archive stem used when the merged `serialize_name` is blank, which
/// happens when every input package was skipped.
pub const FALLBACK_ARCHIVE_STEM: &str = "MergedSkinPack";

/// Archive file name for `result`: its merged `serialize_name` followed by
/// `suffix`. Path separators in the name are replaced with `_`.
#[must_use]
pub fn archive_file_name(result: &MergedResult, suffix: &str) -> String {
    let name = result.skin_document.serialize_name.trim();
    if name.is_empty() {
        return format!("{FALLBACK_ARCHIVE_STEM}{suffix}");
    }
    let stem: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{stem}{suffix}")
}

/// Write `result` as a ZIP archive into `writer`.
///
/// Asset bytes are read with `read_timeout` per file. The observer sees one
/// checkpoint per asset, spanning 0–100 percent.
///
/// # Errors
/// Returns [`OutputError`] if serialization or the archive itself fails.
pub fn write_archive<W: Write + Seek>(
    result: &MergedResult,
    writer: W,
    read_timeout: Duration,
    observer: &mut dyn ProgressObserver,
) -> Result<(W, ArchiveReport), OutputError> {
    let mut zip = ZipWriter::new(writer);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let mut report = ArchiveReport::default();
    let mut written: HashSet<String> = HashSet::new();

    let skins = serde_json::to_string_pretty(&result.skin_document)?;
    zip.start_file(SKINS_ENTRY, options)?;
    zip.write_all(skins.as_bytes())?;
    written.insert(SKINS_ENTRY.to_owned());
    report.entries.push(SKINS_ENTRY.to_owned());

    if !result.geometry_document.is_empty() {
        let geometry = serde_json::to_string_pretty(&result.geometry_document)?;
        zip.start_file(GEOMETRY_ENTRY, options)?;
        zip.write_all(geometry.as_bytes())?;
        written.insert(GEOMETRY_ENTRY.to_owned());
        report.entries.push(GEOMETRY_ENTRY.to_owned());
    }

    let blobs: Vec<&NamedBlob> = result
        .texture_files
        .values()
        .chain(result.other_files.values())
        .collect();
    let total = blobs.len();

    for (i, blob) in blobs.into_iter().enumerate() {
        observer.on_progress(
            asset_percent(i, total),
            &format!("Writing {} ({}/{total})", blob.name, i + 1),
        );

        if !written.insert(blob.name.clone()) {
            warn!(file = %blob.name, "archive already has an entry with this name");
            report.skipped.push(SkippedFile {
                name: blob.name.clone(),
                reason: "duplicate archive entry".to_owned(),
            });
            continue;
        }
        let bytes = match read_blob(blob, read_timeout) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(file = %blob.name, error = %e, "skipping asset");
                report.skipped.push(SkippedFile {
                    name: blob.name.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        zip.start_file(blob.name.as_str(), options)?;
        zip.write_all(&bytes)?;
        report.entries.push(blob.name.clone());
    }

    let writer = zip.finish()?;
    observer.on_progress(100.0, "Archive complete");
    info!(
        entries = report.entries.len(),
        skipped = report.skipped.len(),
        "wrote archive"
    );
    Ok((writer, report))
}

/// Create the file at `path` and write the archive into it.
///
/// # Errors
/// See [`write_archive`]; also fails if the file cannot be created.
pub fn write_archive_file(
    result: &MergedResult,
    path: &Path,
    read_timeout: Duration,
    observer: &mut dyn ProgressObserver,
) -> Result<ArchiveReport, OutputError> {
    let file = File::create(path)?;
    let (mut file, report) = write_archive(result, file, read_timeout, observer)?;
    file.flush()?;
    Ok(report)
}

/// Write the merged documents as separate files in `dir`, creating it if
/// needed. Returns the paths written.
///
/// # Errors
/// Returns [`OutputError`] on serialization or I/O failure.
pub fn write_json_dir(result: &MergedResult, dir: &Path) -> Result<Vec<PathBuf>, OutputError> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(2);

    let skins_path = dir.join(JSON_SKINS_FILE);
    std::fs::write(&skins_path, serde_json::to_string_pretty(&result.skin_document)?)?;
    written.push(skins_path);

    if !result.geometry_document.is_empty() {
        let geometry_path = dir.join(JSON_GEOMETRY_FILE);
        std::fs::write(
            &geometry_path,
            serde_json::to_string_pretty(&result.geometry_document)?,
        )?;
        written.push(geometry_path);
    }

    info!(dir = %dir.display(), files = written.len(), "wrote JSON output");
    Ok(written)
}

#[allow(clippy::cast_precision_loss)]
fn asset_percent(index: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    index as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use serde_json::{Value, json};
    use zip::ZipArchive;

    use super::*;
    use crate::merge::{NoProgress, OutputNaming, merge};
    use crate::model::{AssetPackage, GeometryFile};

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn sample(with_geometry: bool) -> MergedResult {
        let mut pkg = AssetPackage::new(
            "A",
            json!({ "serialize_name": "Pack", "skins": [ { "localization_name": "Héro" } ] }),
        )
        .with_texture(NamedBlob::from_bytes("skin1.png", b"png".to_vec()))
        .with_other(NamedBlob::from_bytes("manifest.json", b"{}".to_vec()));
        if with_geometry {
            pkg = pkg.with_geometry(GeometryFile::new(
                "geometry.json",
                json!({ "minecraft:geometry": [ { "description": { "identifier": "geometry.a" } } ] }),
            ));
        }
        merge(&[pkg], &OutputNaming::default(), &mut NoProgress).unwrap()
    }

    fn read_entry(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
        let mut out = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn archive_contains_documents_and_assets() {
        let result = sample(true);
        let (cursor, report) =
            write_archive(&result, Cursor::new(Vec::new()), TIMEOUT, &mut NoProgress).unwrap();
        assert_eq!(
            report.entries,
            vec!["skins.json", "geometry.json", "skin1.png", "manifest.json"]
        );
        assert!(report.skipped.is_empty());

        let mut archive = ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
        assert_eq!(archive.len(), 4);
        let skins = read_entry(&mut archive, "skins.json");
        assert!(skins.contains("Héro"), "non-ASCII must not be escaped");
        assert!(skins.starts_with("{\n  \"skins\""));
        let parsed: Value = serde_json::from_str(&skins).unwrap();
        assert_eq!(parsed["serialize_name"], "Pack");
        assert_eq!(read_entry(&mut archive, "skin1.png"), "png");
    }

    #[test]
    fn empty_geometry_is_omitted() {
        let result = sample(false);
        let (cursor, report) =
            write_archive(&result, Cursor::new(Vec::new()), TIMEOUT, &mut NoProgress).unwrap();
        assert!(!report.entries.iter().any(|e| e == GEOMETRY_ENTRY));
        let archive = ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
        assert!(archive.index_for_name(GEOMETRY_ENTRY).is_none());
    }

    #[test]
    fn unreadable_asset_is_skipped_and_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut result = sample(false);
        let missing = NamedBlob::from_path(dir.path().join("gone.png"));
        result.texture_files.insert(missing.name.clone(), missing);

        let (cursor, report) =
            write_archive(&result, Cursor::new(Vec::new()), TIMEOUT, &mut NoProgress).unwrap();
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].name, "gone.png");
        let archive = ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
        assert_eq!(archive.len(), 3);
    }

    #[test]
    fn asset_named_like_a_document_is_skipped() {
        let mut result = sample(false);
        let clash = NamedBlob::from_bytes("skins.json", b"x".to_vec());
        result.other_files.insert(clash.name.clone(), clash);

        let (_, report) =
            write_archive(&result, Cursor::new(Vec::new()), TIMEOUT, &mut NoProgress).unwrap();
        assert_eq!(report.skipped[0].reason, "duplicate archive entry");
    }

    #[test]
    fn progress_reports_each_asset() {
        let result = sample(false);
        let mut seen = Vec::new();
        let mut observer = |p: f64, m: &str| seen.push((p, m.to_owned()));
        write_archive(&result, Cursor::new(Vec::new()), TIMEOUT, &mut observer).unwrap();
        assert_eq!(
            seen,
            vec![
                (0.0, "Writing skin1.png (1/2)".to_owned()),
                (50.0, "Writing manifest.json (2/2)".to_owned()),
                (100.0, "Archive complete".to_owned()),
            ]
        );
    }

    #[test]
    fn archive_file_name_uses_serialize_name() {
        let mut result = sample(false);
        assert_eq!(archive_file_name(&result, "_merged.zip"), "Pack_merged.zip");
        result.skin_document.serialize_name = "a/b".to_owned();
        assert_eq!(archive_file_name(&result, ".zip"), "a_b.zip");
    }

    #[test]
    fn archive_file_name_falls_back_when_every_package_was_skipped() {
        let mut loose = AssetPackage::new("Loose", json!({}));
        loose.skin_document = None;
        let result = merge(&[loose], &OutputNaming::default(), &mut NoProgress).unwrap();
        assert_eq!(result.skin_document.serialize_name, "");
        assert_eq!(
            archive_file_name(&result, "_merged.zip"),
            "MergedSkinPack_merged.zip"
        );
    }

    #[cfg(unix)]
    #[test]
    fn stalled_asset_times_out_and_others_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let fifo = dir.path().join("stall.png");
        let status = std::process::Command::new("mkfifo")
            .arg(&fifo)
            .status()
            .unwrap();
        assert!(status.success());

        let mut result = sample(false);
        let stalled = NamedBlob::from_path(&fifo);
        result.texture_files.insert(stalled.name.clone(), stalled);

        let timeout = Duration::from_millis(200);
        let (cursor, report) =
            write_archive(&result, Cursor::new(Vec::new()), timeout, &mut NoProgress).unwrap();
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].name, "stall.png");
        assert!(report.skipped[0].reason.contains("timed out"), "{:?}", report.skipped);
        assert_eq!(
            report.entries,
            vec!["skins.json", "skin1.png", "manifest.json"]
        );

        let mut archive = ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
        assert_eq!(read_entry(&mut archive, "manifest.json"), "{}");
    }

    #[test]
    fn archive_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.zip");
        let report = write_archive_file(&sample(true), &path, TIMEOUT, &mut NoProgress).unwrap();
        assert_eq!(report.entries.len(), 4);
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn json_dir_writes_both_documents() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("json");
        let written = write_json_dir(&sample(true), &out).unwrap();
        assert_eq!(
            written,
            vec![out.join(JSON_SKINS_FILE), out.join(JSON_GEOMETRY_FILE)]
        );
        let geometry: Value =
            serde_json::from_str(&std::fs::read_to_string(&written[1]).unwrap()).unwrap();
        assert_eq!(geometry["format_version"], "1.12.0");
    }

    #[test]
    fn json_dir_omits_empty_geometry() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_json_dir(&sample(false), dir.path()).unwrap();
        assert_eq!(written, vec![dir.path().join(JSON_SKINS_FILE)]);
    }
}
