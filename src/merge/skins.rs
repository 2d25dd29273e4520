//! Skin list merging.
//!
//! Appends every skin entry of a package to the merged list, renaming any
//! entry whose `localization_name` is already taken. Entries are cloned
//! before renaming so the source package is never modified.

use serde_json::Value;
use tracing::{debug, warn};

use crate::model::AssetPackage;

use super::allocate::{AllocateError, Namespace};
use super::types::{EntryCount, MergeWarning};

/// Name used for skin entries without a `localization_name` string.
pub const UNNAMED_SKIN: &str = "unknown";

/// Merge `package`'s skins into `merged`, claiming names in `names`.
///
/// A missing `skins` field contributes nothing. A `skins` field that is not
/// a list, and entries that are not objects, are recorded in `warnings` and
/// skipped.
///
/// # Errors
/// Returns [`AllocateError`] if a name cannot be made unique.
pub fn merge_skins(
    merged: &mut Vec<Value>,
    package: &AssetPackage,
    names: &mut Namespace,
    warnings: &mut Vec<MergeWarning>,
) -> Result<EntryCount, AllocateError> {
    let mut count = EntryCount::default();

    let Some(document) = package.skin_document.as_ref() else {
        return Ok(count);
    };
    let skins = match document.get("skins") {
        None | Some(Value::Null) => return Ok(count),
        Some(Value::Array(skins)) => skins,
        Some(_) => {
            warn!(folder = %package.folder_name, "skins is not a list, skipping skins");
            warnings.push(MergeWarning::SkinsNotAList {
                folder: package.folder_name.clone(),
            });
            return Ok(count);
        }
    };

    for (index, skin) in skins.iter().enumerate() {
        if !skin.is_object() {
            warn!(folder = %package.folder_name, index, "skin entry is not an object, skipping");
            warnings.push(MergeWarning::MalformedSkin {
                folder: package.folder_name.clone(),
                index,
            });
            continue;
        }

        let mut copy = skin.clone();
        let original = copy
            .get("localization_name")
            .and_then(Value::as_str)
            .unwrap_or(UNNAMED_SKIN)
            .to_owned();

        let resolved = names.claim(&original)?;
        if resolved != original {
            debug!(folder = %package.folder_name, from = %original, to = %resolved, "renamed skin");
            copy["localization_name"] = Value::String(resolved);
            count.renamed += 1;
        }

        merged.push(copy);
        count.merged += 1;
    }

    Ok(count)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
