//! File classification by name.
//!
//! Every file in a package folder lands in exactly one bucket. Matching is
//! case-insensitive on the bare file name; contents are never sniffed.

use crate::config::LoadConfig;

/// File name of the skin document.
pub const SKIN_DOCUMENT: &str = "skins.json";

/// Which part of an [`AssetPackage`](crate::model::AssetPackage) a file
/// belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    /// The package's `skins.json`.
    SkinDocument,
    /// A `.json` file whose name contains a geometry marker word.
    Geometry,
    /// A file with a texture extension.
    Texture,
    /// Anything else; copied through unchanged.
    Other,
}

/// Name-based classifier built from [`LoadConfig`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classifier {
    texture_extensions: Vec<String>,
    geometry_markers: Vec<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::from_config(&LoadConfig::default())
    }
}

impl Classifier {
    /// Build a classifier from the `[load]` config section.
    ///
    /// Extensions may be given with or without a leading dot.
    #[must_use]
    pub fn from_config(config: &LoadConfig) -> Self {
        Self {
            texture_extensions: config
                .texture_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
            geometry_markers: config
                .geometry_markers
                .iter()
                .map(|m| m.to_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
        }
    }

    /// Classify a bare file name.
    #[must_use]
    pub fn classify(&self, file_name: &str) -> FileKind {
        let lower = file_name.to_lowercase();
        if lower == SKIN_DOCUMENT {
            return FileKind::SkinDocument;
        }

        let extension = lower.rsplit_once('.').map(|(_, ext)| ext);
        if extension == Some("json") && self.geometry_markers.iter().any(|m| lower.contains(m)) {
            return FileKind::Geometry;
        }
        if let Some(ext) = extension
            && self.texture_extensions.iter().any(|t| t == ext)
        {
            return FileKind::Texture;
        }
        FileKind::Other
    }
}
