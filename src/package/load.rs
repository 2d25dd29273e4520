//! Building an [`AssetPackage`] from a folder on disk.
//!
//! JSON documents are read eagerly (they are needed by the merge); textures
//! and other files are recorded as path-backed blobs and only read when the
//! output is written.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::blob::{BlobReadError, read_with_timeout};
use crate::config::LoadConfig;
use crate::jsonc::{self, JsoncError};
use crate::model::{AssetPackage, GeometryFile, NamedBlob};

use super::classify::{Classifier, FileKind};

/// Failure to load a package folder.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{} is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("could not list {}: {source}", path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Read(#[from] BlobReadError),

    #[error("{}: {source}", path.display())]
    SkinDocument {
        path: PathBuf,
        #[source]
        source: JsoncError,
    },
}

/// Load the package in `folder`.
///
/// A folder without `skins.json` still loads; the package simply has no
/// skin document and is skipped by the merge. Geometry files that cannot be
/// read or parsed are skipped with a warning.
///
/// # Errors
/// Returns [`LoadError`] if the folder cannot be listed, or if its
/// `skins.json` cannot be read or parsed.
pub fn load_package(folder: &Path, config: &LoadConfig) -> Result<AssetPackage, LoadError> {
    if !folder.is_dir() {
        return Err(LoadError::NotADirectory {
            path: folder.to_owned(),
        });
    }

    let classifier = Classifier::from_config(config);
    let timeout = config.read_timeout();
    let mut files = Vec::new();
    collect_files(folder, config.recursive, &mut files)?;

    let mut package = AssetPackage {
        folder_name: folder_name(folder),
        skin_document: None,
        geometry_documents: Vec::new(),
        texture_files: Vec::new(),
        other_files: Vec::new(),
    };

    for path in files {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        match classifier.classify(&name) {
            FileKind::SkinDocument => {
                if package.skin_document.is_some() {
                    warn!(path = %path.display(), "ignoring additional skin document");
                    continue;
                }
                let bytes = read_with_timeout(&path, timeout)?;
                let doc = jsonc::parse(&String::from_utf8_lossy(&bytes))
                    .map_err(|source| LoadError::SkinDocument { path, source })?;
                package.skin_document = Some(doc);
            }
            FileKind::Geometry => match read_geometry(&path, timeout) {
                Ok(data) => package.geometry_documents.push(GeometryFile::new(name, data)),
                Err(e) => warn!(error = %e, "skipping unreadable geometry file"),
            },
            FileKind::Texture => package.texture_files.push(NamedBlob::from_path(path)),
            FileKind::Other => package.other_files.push(NamedBlob::from_path(path)),
        }
    }

    if package.skin_document.is_none() {
        warn!(folder = %folder.display(), "no skins.json found");
    }
    info!(
        folder = %package.folder_name,
        skins = package.skins().len(),
        geometry_files = package.geometry_documents.len(),
        textures = package.texture_files.len(),
        others = package.other_files.len(),
        "loaded package"
    );
    Ok(package)
}

/// Load several folders in order, keeping the ones that succeed.
///
/// Failures are returned alongside so the caller decides how to report
/// them.
pub fn load_packages(
    folders: &[PathBuf],
    config: &LoadConfig,
) -> (Vec<AssetPackage>, Vec<(PathBuf, LoadError)>) {
    let mut loaded = Vec::with_capacity(folders.len());
    let mut failed = Vec::new();
    for folder in folders {
        match load_package(folder, config) {
            Ok(package) => loaded.push(package),
            Err(e) => {
                warn!(folder = %folder.display(), error = %e, "failed to load package");
                failed.push((folder.clone(), e));
            }
        }
    }
    (loaded, failed)
}

#[derive(Debug, Error)]
enum GeometryReadError {
    #[error(transparent)]
    Read(#[from] BlobReadError),
    #[error("{}: {source}", path.display())]
    Parse { path: PathBuf, source: JsoncError },
}

fn read_geometry(
    path: &Path,
    timeout: std::time::Duration,
) -> Result<serde_json::Value, GeometryReadError> {
    let bytes = read_with_timeout(path, timeout)?;
    jsonc::parse(&String::from_utf8_lossy(&bytes)).map_err(|source| GeometryReadError::Parse {
        path: path.to_owned(),
        source,
    })
}

/// Regular files under `dir`, sorted by path for a stable discovery order.
fn collect_files(dir: &Path, recursive: bool, out: &mut Vec<PathBuf>) -> Result<(), LoadError> {
    let list_err = |source| LoadError::ListDir {
        path: dir.to_owned(),
        source,
    };
    let mut entries = std::fs::read_dir(dir)
        .map_err(list_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(list_err)?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            if recursive {
                collect_files(&path, recursive, out)?;
            }
        } else if path.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn folder_name(folder: &Path) -> String {
    folder
        .file_name()
        .map_or_else(|| folder.display().to_string(), |n| n.to_string_lossy().into_owned())
}
