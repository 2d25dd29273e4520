//! Loading skin packs from folders.
//!
//! [`classify`] decides which bucket each file belongs to; [`load`] walks a
//! folder and builds the [`AssetPackage`](crate::model::AssetPackage).

pub mod classify;
pub mod load;

pub use classify::{Classifier, FileKind, SKIN_DOCUMENT};
pub use load::{LoadError, load_package, load_packages};
