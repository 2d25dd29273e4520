//! Skin-pack data model: input packages and their blobs.

pub mod types;

pub use types::{AssetPackage, BlobContent, GeometryFile, NamedBlob, PackageInfo, UNKNOWN_NAME};
