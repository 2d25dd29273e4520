//! Core package types for the skin-pack merger.
//!
//! Foundation types used throughout the crate: the input [`AssetPackage`],
//! its geometry files and binary blobs, and the derived [`PackageInfo`]
//! summary shown to users before a merge.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

/// Fallback used wherever a declared name is absent, empty, or not a string.
pub const UNKNOWN_NAME: &str = "unknown";

// ---------------------------------------------------------------------------
// NamedBlob
// ---------------------------------------------------------------------------

/// Where the bytes of a [`NamedBlob`] come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlobContent {
    /// Content already held in memory.
    Bytes(Vec<u8>),
    /// A file on disk, read lazily when the output is written.
    Path(PathBuf),
}

/// A binary asset (texture or miscellaneous file) identified by its bare
/// file name.
///
/// The name is the identity key for deduplication: comparison is
/// case-sensitive and the name never contains directory components.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedBlob {
    /// Bare file name, e.g. `"skin1.png"`.
    pub name: String,
    /// The blob's content or a handle to it.
    pub content: BlobContent,
}

impl NamedBlob {
    /// Create a blob from in-memory bytes.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: BlobContent::Bytes(bytes.into()),
        }
    }

    /// Create a blob backed by a file on disk.
    ///
    /// The identity name is the path's final component; directories are
    /// stripped.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            content: BlobContent::Path(path),
        }
    }
}

impl fmt::Display for NamedBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ---------------------------------------------------------------------------
// GeometryFile
// ---------------------------------------------------------------------------

/// A parsed geometry document together with the file it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometryFile {
    /// Bare file name, used in warnings.
    pub file_name: String,
    /// The parsed document, in either the legacy or the current schema.
    pub data: Value,
}

impl GeometryFile {
    pub fn new(file_name: impl Into<String>, data: Value) -> Self {
        Self {
            file_name: file_name.into(),
            data,
        }
    }
}

// ---------------------------------------------------------------------------
// AssetPackage
// ---------------------------------------------------------------------------

/// One input skin pack, as discovered in a single folder.
///
/// Immutable once constructed: the merge engine only borrows packages and
/// deep-copies any entry it needs to rename.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetPackage {
    /// Name of the folder the package was loaded from.
    pub folder_name: String,
    /// The parsed `skins.json`, or `None` if the folder had none.
    pub skin_document: Option<Value>,
    /// Geometry documents, in discovery order.
    pub geometry_documents: Vec<GeometryFile>,
    /// Texture files (`.png`, `.jpg`, `.jpeg`).
    pub texture_files: Vec<NamedBlob>,
    /// Every other file in the folder.
    pub other_files: Vec<NamedBlob>,
}

impl AssetPackage {
    /// Create a package with a skin document and no other content.
    pub fn new(folder_name: impl Into<String>, skin_document: Value) -> Self {
        Self {
            folder_name: folder_name.into(),
            skin_document: Some(skin_document),
            geometry_documents: Vec::new(),
            texture_files: Vec::new(),
            other_files: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_geometry(mut self, file: GeometryFile) -> Self {
        self.geometry_documents.push(file);
        self
    }

    #[must_use]
    pub fn with_texture(mut self, blob: NamedBlob) -> Self {
        self.texture_files.push(blob);
        self
    }

    #[must_use]
    pub fn with_other(mut self, blob: NamedBlob) -> Self {
        self.other_files.push(blob);
        self
    }

    /// The skin entries of this package; a missing or non-list `skins` field
    /// yields an empty slice.
    #[must_use]
    pub fn skins(&self) -> &[Value] {
        self.skin_document
            .as_ref()
            .and_then(|doc| doc.get("skins"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The package's declared name (`serialize_name` of its skin document).
    #[must_use]
    pub fn declared_name(&self) -> String {
        declared_field(self.skin_document.as_ref(), "serialize_name")
    }

    /// Summarize this package for display.
    #[must_use]
    pub fn info(&self) -> PackageInfo {
        let mut geometries: Vec<String> = Vec::new();
        let mut textures: Vec<String> = Vec::new();

        for skin in self.skins() {
            if let Some(g) = skin.get("geometry").and_then(Value::as_str)
                && !g.is_empty()
                && !geometries.iter().any(|x| x == g)
            {
                geometries.push(g.to_owned());
            }
            if let Some(t) = skin.get("texture").and_then(Value::as_str)
                && !t.is_empty()
                && !textures.iter().any(|x| x == t)
            {
                textures.push(t.to_owned());
            }
        }

        PackageInfo {
            folder_name: self.folder_name.clone(),
            serialize_name: self.declared_name(),
            localization_name: declared_field(self.skin_document.as_ref(), "localization_name"),
            skin_count: self.skins().len(),
            geometry_count: self.geometry_documents.len(),
            texture_count: self.texture_files.len(),
            other_count: self.other_files.len(),
            geometries,
            textures,
        }
    }
}

fn declared_field(doc: Option<&Value>, key: &str) -> String {
    doc.and_then(|d| d.get(key))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_NAME)
        .to_owned()
}

// ---------------------------------------------------------------------------
// PackageInfo
// ---------------------------------------------------------------------------

/// Display summary of an [`AssetPackage`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PackageInfo {
    pub folder_name: String,
    /// Declared package identifier (`"unknown"` when absent).
    pub serialize_name: String,
    /// Declared display name (`"unknown"` when absent).
    pub localization_name: String,
    pub skin_count: usize,
    pub geometry_count: usize,
    pub texture_count: usize,
    pub other_count: usize,
    /// Distinct geometry references used by the skins, first-seen order.
    pub geometries: Vec<String>,
    /// Distinct texture references used by the skins, first-seen order.
    pub textures: Vec<String>,
}

impl fmt::Display for PackageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.folder_name)?;
        writeln!(f, "  package:  {}", self.serialize_name)?;
        writeln!(f, "  display:  {}", self.localization_name)?;
        write!(
            f,
            "  skins: {} | geometry files: {} | textures: {} | other: {}",
            self.skin_count, self.geometry_count, self.texture_count, self.other_count
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
