//! First-writer-wins merging of binary asset files.
//!
//! Textures and other files each get their own name → blob map. The first
//! package (in input order) to introduce a name keeps it; later files with
//! the same name are dropped without comparing content.

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::debug;

use crate::model::NamedBlob;

/// Insert each of `files` into `merged` unless its name is already present.
///
/// Returns the number of files that were newly inserted.
pub fn absorb(merged: &mut IndexMap<String, NamedBlob>, files: &[NamedBlob]) -> usize {
    let mut inserted = 0;
    for file in files {
        match merged.entry(file.name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(file.clone());
                inserted += 1;
            }
            Entry::Occupied(_) => {
                debug!(name = %file.name, "duplicate asset name, keeping first");
            }
        }
    }
    inserted
}
