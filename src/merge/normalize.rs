//! Geometry schema normalization.
//!
//! Geometry documents come in two shapes:
//!
//! - **current**: a `minecraft:geometry` array of entries, each with a
//!   `description` block carrying the `identifier`.
//! - **legacy**: top-level keys prefixed `geometry.`, each holding a flat
//!   record (`texturewidth`, `textureheight`, `bones`, …) with no
//!   `description` wrapper.
//!
//! [`classify`] resolves the shape once; [`normalize`] turns either shape
//! into a [`NormalizedGeometry`] so the mergers only ever see the current
//! layout. Documents of neither shape normalize to `None`, which callers
//! treat as "not a geometry document" rather than an error.
//!
//! Migrated entries keep the legacy key verbatim as their identifier,
//! `geometry.` prefix included, so existing references still resolve.

use std::borrow::Cow;

use serde_json::{Map, Value, json};

/// Format version stamped on migrated and merged geometry documents.
pub const FORMAT_VERSION: &str = "1.12.0";

/// Key of the entry array in the current schema.
pub const GEOMETRY_KEY: &str = "minecraft:geometry";

/// Prefix of top-level keys in the legacy schema.
pub const LEGACY_PREFIX: &str = "geometry.";

const DEFAULT_TEXTURE_SIZE: u32 = 16;
const DEFAULT_VISIBLE_BOUNDS: u32 = 2;

// ---------------------------------------------------------------------------
// GeometrySchema
// ---------------------------------------------------------------------------

/// The detected shape of a geometry document.
#[derive(Clone, Debug, PartialEq)]
pub enum GeometrySchema<'a> {
    /// Already has a `minecraft:geometry` field.
    Current,
    /// Legacy `geometry.*` keys with their records, in document order.
    Legacy(Vec<(&'a str, &'a Value)>),
    /// Neither shape.
    Unrecognized,
}

/// Detect which schema `document` uses.
pub fn classify(document: &Value) -> GeometrySchema<'_> {
    let Some(object) = document.as_object() else {
        return GeometrySchema::Unrecognized;
    };
    if object.get(GEOMETRY_KEY).is_some_and(|v| !v.is_null()) {
        return GeometrySchema::Current;
    }
    let legacy: Vec<(&str, &Value)> = object
        .iter()
        .filter(|(key, _)| key.starts_with(LEGACY_PREFIX))
        .map(|(key, value)| (key.as_str(), value))
        .collect();
    if legacy.is_empty() {
        GeometrySchema::Unrecognized
    } else {
        GeometrySchema::Legacy(legacy)
    }
}

// ---------------------------------------------------------------------------
// NormalizedGeometry
// ---------------------------------------------------------------------------

/// A geometry document in the current schema.
///
/// Borrows the input when it was already current; owns a freshly built
/// document when it was migrated from the legacy schema.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedGeometry<'a> {
    document: Cow<'a, Value>,
    migrated: bool,
}

impl NormalizedGeometry<'_> {
    /// The entries under `minecraft:geometry`, or `None` if that field is
    /// not an array.
    #[must_use]
    pub fn entries(&self) -> Option<&[Value]> {
        self.document
            .get(GEOMETRY_KEY)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    /// `true` if the document was converted from the legacy schema.
    #[must_use]
    pub const fn was_migrated(&self) -> bool {
        self.migrated
    }

    #[must_use]
    pub fn document(&self) -> &Value {
        &self.document
    }

    #[must_use]
    pub fn into_document(self) -> Value {
        self.document.into_owned()
    }
}

/// Bring `document` into the current schema.
///
/// Returns the document unchanged if it already has `minecraft:geometry`,
/// a migrated document if it has legacy `geometry.*` keys, and `None`
/// otherwise.
pub fn normalize(document: &Value) -> Option<NormalizedGeometry<'_>> {
    match classify(document) {
        GeometrySchema::Current => Some(NormalizedGeometry {
            document: Cow::Borrowed(document),
            migrated: false,
        }),
        GeometrySchema::Legacy(records) => {
            let entries: Vec<Value> = records
                .into_iter()
                .map(|(key, record)| migrate_entry(key, record))
                .collect();
            Some(NormalizedGeometry {
                document: Cow::Owned(json!({
                    "format_version": FORMAT_VERSION,
                    GEOMETRY_KEY: entries,
                })),
                migrated: true,
            })
        }
        GeometrySchema::Unrecognized => None,
    }
}

/// Build one current-schema entry from a legacy `geometry.*` record.
fn migrate_entry(key: &str, record: &Value) -> Value {
    let empty = Map::new();
    let record = record.as_object().unwrap_or(&empty);
    let field = |name: &str| record.get(name).filter(|v| !v.is_null()).cloned();

    json!({
        "description": {
            "identifier": key,
            "texture_width": field("texturewidth").unwrap_or_else(|| json!(DEFAULT_TEXTURE_SIZE)),
            "texture_height": field("textureheight").unwrap_or_else(|| json!(DEFAULT_TEXTURE_SIZE)),
            "visible_bounds_width": field("visible_bounds_width")
                .unwrap_or_else(|| json!(DEFAULT_VISIBLE_BOUNDS)),
            "visible_bounds_height": field("visible_bounds_height")
                .unwrap_or_else(|| json!(DEFAULT_VISIBLE_BOUNDS)),
            "visible_bounds_offset": field("visible_bounds_offset")
                .unwrap_or_else(|| json!([0, 1, 0])),
        },
        "bones": field("bones").unwrap_or_else(|| json!([])),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
