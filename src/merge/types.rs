//! Types shared across the merge engine: the merged output, statistics,
//! output naming, warnings and errors.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::NamedBlob;

use super::allocate::AllocateError;
use super::normalize::FORMAT_VERSION;

// ---------------------------------------------------------------------------
// OutputNaming
// ---------------------------------------------------------------------------

/// Caller-chosen names for the merged package.
///
/// An empty (or whitespace-only) field means "derive it from the input
/// packages' declared names".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputNaming {
    /// Merged `serialize_name` (package identifier).
    pub package_name: String,
    /// Merged `localization_name` (display name).
    pub display_name: String,
}

impl OutputNaming {
    pub fn new(package_name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            display_name: display_name.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Merged documents
// ---------------------------------------------------------------------------

/// The merged `skins.json`.
///
/// Field order matches the serialized key order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkinDocument {
    pub skins: Vec<Value>,
    pub serialize_name: String,
    pub localization_name: String,
}

/// The merged `geometry.json`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeometryDocument {
    pub format_version: String,
    #[serde(rename = "minecraft:geometry")]
    pub geometry: Vec<Value>,
}

impl Default for GeometryDocument {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION.to_owned(),
            geometry: Vec::new(),
        }
    }
}

impl GeometryDocument {
    /// `true` when no geometry entries were merged; the writer omits
    /// `geometry.json` in that case.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }
}

// ---------------------------------------------------------------------------
// MergeStats
// ---------------------------------------------------------------------------

/// Aggregate counts for one merge run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    /// Number of merged skin entries.
    pub total_skins: usize,
    /// Number of merged geometry entries.
    pub total_geometries: usize,
    /// Number of distinct texture names.
    pub texture_count: usize,
    /// Number of input packages, skipped ones included.
    pub folder_count: usize,
}

impl fmt::Display for MergeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "skins:      {}", self.total_skins)?;
        writeln!(f, "geometries: {}", self.total_geometries)?;
        writeln!(f, "textures:   {}", self.texture_count)?;
        write!(f, "folders:    {}", self.folder_count)
    }
}

// ---------------------------------------------------------------------------
// MergedResult
// ---------------------------------------------------------------------------

/// The output of one merge run.
#[derive(Clone, Debug, PartialEq)]
pub struct MergedResult {
    pub skin_document: SkinDocument,
    pub geometry_document: GeometryDocument,
    /// Texture files by bare name, in first-seen order.
    pub texture_files: IndexMap<String, NamedBlob>,
    /// Other files by bare name, in first-seen order.
    pub other_files: IndexMap<String, NamedBlob>,
    pub stats: MergeStats,
    /// Packages left out whole, in input order.
    pub package_failures: Vec<PackageFailure>,
    /// Pieces of input skipped inside merged packages, in the order it
    /// happened.
    pub warnings: Vec<MergeWarning>,
}

// ---------------------------------------------------------------------------
// EntryCount
// ---------------------------------------------------------------------------

/// Entries one merger appended for one package.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntryCount {
    /// Entries appended to the accumulator.
    pub merged: usize,
    /// How many of those had to be renamed.
    pub renamed: usize,
}

// ---------------------------------------------------------------------------
// PackageSummary
// ---------------------------------------------------------------------------

/// What one merge step did with one package.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PackageSummary {
    pub folder_name: String,
    /// Skin entries merged from this package.
    pub skins: usize,
    /// Geometry entries merged from this package.
    pub geometries: usize,
    /// Entries that were renamed to avoid a collision.
    pub renamed: usize,
    /// `false` if the package was skipped for a precondition failure.
    pub merged: bool,
}

// ---------------------------------------------------------------------------
// PackageFailure
// ---------------------------------------------------------------------------

/// A package that failed a precondition and contributed nothing.
///
/// Unlike a [`MergeWarning`], which drops one piece of an otherwise merged
/// package, a failure drops the whole package: its skins, geometry, assets
/// and declared name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PackageFailure {
    /// The package has no skin document.
    MissingSkinDocument { folder: String },
}

impl PackageFailure {
    /// Folder name of the failed package.
    #[must_use]
    pub fn folder(&self) -> &str {
        match self {
            Self::MissingSkinDocument { folder } => folder,
        }
    }
}

impl fmt::Display for PackageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSkinDocument { folder } => {
                write!(f, "{folder}: no skins.json, package not merged")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MergeWarning
// ---------------------------------------------------------------------------

/// A non-fatal condition recorded during a merge.
///
/// Each warning excludes a piece of input from the result without affecting
/// anything else.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MergeWarning {
    /// The skin document's `skins` field is present but not a list.
    SkinsNotAList { folder: String },
    /// A skin entry is not a JSON object.
    MalformedSkin { folder: String, index: usize },
    /// A geometry-classified file is not a geometry document.
    NotGeometry { folder: String, file: String },
    /// A geometry document's `minecraft:geometry` field is not a list.
    GeometryNotAList { folder: String, file: String },
    /// A geometry entry lacks a string `description.identifier`.
    MalformedGeometry {
        folder: String,
        file: String,
        index: usize,
    },
}

impl fmt::Display for MergeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkinsNotAList { folder } => {
                write!(f, "{folder}: skins.json `skins` is not a list, no skins merged")
            }
            Self::MalformedSkin { folder, index } => {
                write!(f, "{folder}: skin #{index} is not an object, skipped")
            }
            Self::NotGeometry { folder, file } => {
                write!(f, "{folder}/{file}: not a geometry document, skipped")
            }
            Self::GeometryNotAList { folder, file } => {
                write!(f, "{folder}/{file}: `minecraft:geometry` is not a list, skipped")
            }
            Self::MalformedGeometry {
                folder,
                file,
                index,
            } => {
                write!(
                    f,
                    "{folder}/{file}: geometry #{index} has no description.identifier, skipped"
                )
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MergeError
// ---------------------------------------------------------------------------

/// Terminal failures of a merge run. No partial result is returned.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MergeError {
    /// The input package list was empty.
    #[error("no skin packs to merge")]
    NoPackages,

    /// A name could not be made unique.
    #[error("could not allocate a unique name: {0}")]
    Allocate(#[from] AllocateError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
