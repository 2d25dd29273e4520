//! Geometry library merging.
//!
//! Each geometry file of a package is normalized to the current schema, then
//! its entries are appended to the merged `minecraft:geometry` list with
//! colliding `description.identifier`s renamed.
//!
//! Files that are not geometry documents are skipped with a warning: a
//! package may contain a `.json` that only looks like geometry by name.

use serde_json::Value;
use tracing::{debug, warn};

use crate::model::AssetPackage;

use super::allocate::{AllocateError, Namespace};
use super::normalize::normalize;
use super::types::{EntryCount, MergeWarning};

/// Merge all geometry entries of `package` into `merged`, claiming
/// identifiers in `ids`.
///
/// # Errors
/// Returns [`AllocateError`] if an identifier cannot be made unique.
pub fn merge_geometry(
    merged: &mut Vec<Value>,
    package: &AssetPackage,
    ids: &mut Namespace,
    warnings: &mut Vec<MergeWarning>,
) -> Result<EntryCount, AllocateError> {
    let mut count = EntryCount::default();
    let folder = &package.folder_name;

    for file in &package.geometry_documents {
        let Some(normalized) = normalize(&file.data) else {
            warn!(%folder, file = %file.file_name, "not a geometry document, skipping");
            warnings.push(MergeWarning::NotGeometry {
                folder: folder.clone(),
                file: file.file_name.clone(),
            });
            continue;
        };
        if normalized.was_migrated() {
            debug!(%folder, file = %file.file_name, "migrated legacy geometry");
        }
        let Some(entries) = normalized.entries() else {
            warn!(%folder, file = %file.file_name, "minecraft:geometry is not a list, skipping");
            warnings.push(MergeWarning::GeometryNotAList {
                folder: folder.clone(),
                file: file.file_name.clone(),
            });
            continue;
        };

        for (index, entry) in entries.iter().enumerate() {
            let Some(original) = identifier_of(entry) else {
                warn!(%folder, file = %file.file_name, index, "geometry entry has no identifier, skipping");
                warnings.push(MergeWarning::MalformedGeometry {
                    folder: folder.clone(),
                    file: file.file_name.clone(),
                    index,
                });
                continue;
            };
            let original = original.to_owned();

            let mut copy = entry.clone();
            let resolved = ids.claim(&original)?;
            if resolved != original {
                debug!(%folder, from = %original, to = %resolved, "renamed geometry");
                copy["description"]["identifier"] = Value::String(resolved);
                count.renamed += 1;
            }

            merged.push(copy);
            count.merged += 1;
        }
    }

    Ok(count)
}

fn identifier_of(entry: &Value) -> Option<&str> {
    entry
        .get("description")
        .filter(|d| d.is_object())
        .and_then(|d| d.get("identifier"))
        .and_then(Value::as_str)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
