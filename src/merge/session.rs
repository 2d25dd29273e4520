//! Merge orchestration.
//!
//! A [`MergeSession`] walks an ordered package list one package per
//! [`step`](MergeSession::step), feeding each to the skin, geometry and asset
//! mergers against accumulators the session owns exclusively. Callers that
//! need to interleave other work (redrawing a UI, say) drive the steps
//! themselves; everyone else calls [`merge`].
//!
//! # Ordering
//!
//! Packages are processed strictly in input order. Later packages are the
//! ones renamed on collision, so order is part of the result, not an
//! implementation detail.
//!
//! # Failure model
//!
//! - An empty package list is rejected by [`MergeSession::new`] before any
//!   progress is reported.
//! - A package without a skin document is skipped whole and recorded as a
//!   [`PackageFailure`], kept apart from warnings; accumulators from earlier
//!   packages are untouched and later packages are still merged.
//! - Unrecognized geometry files and malformed entries are skipped with a
//!   warning by the individual mergers.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{info, info_span, warn};

use crate::model::{AssetPackage, NamedBlob};

use super::allocate::Namespace;
use super::assets;
use super::geometry::merge_geometry;
use super::progress::{COMPLETE_PERCENT, FINALIZING_PERCENT, ProgressObserver, package_percent};
use super::skins::merge_skins;
use super::types::{
    GeometryDocument, MergeError, MergeStats, MergeWarning, MergedResult, OutputNaming,
    PackageFailure, PackageSummary, SkinDocument,
};

/// Separator between declared names in the derived `serialize_name`.
pub const PACKAGE_NAME_SEPARATOR: &str = "_";

/// Separator between declared names in the derived `localization_name`.
pub const DISPLAY_NAME_SEPARATOR: &str = " + ";

// ---------------------------------------------------------------------------
// MergeSession
// ---------------------------------------------------------------------------

/// One merge run over a borrowed, ordered list of packages.
#[derive(Debug)]
pub struct MergeSession<'a> {
    packages: &'a [AssetPackage],
    naming: OutputNaming,
    next: usize,

    skins: Vec<Value>,
    geometry: Vec<Value>,
    textures: IndexMap<String, NamedBlob>,
    others: IndexMap<String, NamedBlob>,
    skin_names: Namespace,
    geometry_ids: Namespace,
    declared_names: Vec<String>,
    failures: Vec<PackageFailure>,
    warnings: Vec<MergeWarning>,
}

impl<'a> MergeSession<'a> {
    /// Start a session over `packages`.
    ///
    /// # Errors
    /// Returns [`MergeError::NoPackages`] if `packages` is empty.
    pub fn new(packages: &'a [AssetPackage], naming: OutputNaming) -> Result<Self, MergeError> {
        if packages.is_empty() {
            return Err(MergeError::NoPackages);
        }
        Ok(Self {
            packages,
            naming,
            next: 0,
            skins: Vec::new(),
            geometry: Vec::new(),
            textures: IndexMap::new(),
            others: IndexMap::new(),
            skin_names: Namespace::new(),
            geometry_ids: Namespace::new(),
            declared_names: Vec::with_capacity(packages.len()),
            failures: Vec::new(),
            warnings: Vec::new(),
        })
    }

    /// Number of packages not yet processed.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.packages.len() - self.next
    }

    /// Packages skipped so far.
    #[must_use]
    pub fn package_failures(&self) -> &[PackageFailure] {
        &self.failures
    }

    /// Warnings recorded so far.
    #[must_use]
    pub fn warnings(&self) -> &[MergeWarning] {
        &self.warnings
    }

    /// Merge the next package.
    ///
    /// Reports progress before touching the package. Returns `Ok(None)` once
    /// every package has been processed.
    ///
    /// # Errors
    /// Returns [`MergeError::Allocate`] if a name cannot be made unique.
    pub fn step(
        &mut self,
        observer: &mut dyn ProgressObserver,
    ) -> Result<Option<PackageSummary>, MergeError> {
        let Some(package) = self.packages.get(self.next) else {
            return Ok(None);
        };
        let index = self.next;
        let total = self.packages.len();
        self.next += 1;

        observer.on_progress(
            package_percent(index, total),
            &format!("Processing {} ({}/{})", package.folder_name, index + 1, total),
        );

        if package.skin_document.is_none() {
            warn!(folder = %package.folder_name, "no skin document, skipping package");
            self.failures.push(PackageFailure::MissingSkinDocument {
                folder: package.folder_name.clone(),
            });
            return Ok(Some(PackageSummary {
                folder_name: package.folder_name.clone(),
                skins: 0,
                geometries: 0,
                renamed: 0,
                merged: false,
            }));
        }

        self.declared_names.push(package.declared_name());

        let skins = merge_skins(
            &mut self.skins,
            package,
            &mut self.skin_names,
            &mut self.warnings,
        )?;
        let geometries = merge_geometry(
            &mut self.geometry,
            package,
            &mut self.geometry_ids,
            &mut self.warnings,
        )?;
        assets::absorb(&mut self.textures, &package.texture_files);
        assets::absorb(&mut self.others, &package.other_files);

        info!(
            folder = %package.folder_name,
            skins = skins.merged,
            geometries = geometries.merged,
            renamed = skins.renamed + geometries.renamed,
            "merged package"
        );

        Ok(Some(PackageSummary {
            folder_name: package.folder_name.clone(),
            skins: skins.merged,
            geometries: geometries.merged,
            renamed: skins.renamed + geometries.renamed,
            merged: true,
        }))
    }

    /// Process any remaining packages, resolve output naming, and return the
    /// merged result.
    ///
    /// # Errors
    /// Propagates errors from [`step`](Self::step).
    pub fn finish(mut self, observer: &mut dyn ProgressObserver) -> Result<MergedResult, MergeError> {
        while self.step(observer)?.is_some() {}

        observer.on_progress(FINALIZING_PERCENT, "Finalizing merge");

        let serialize_name = resolve_name(
            &self.naming.package_name,
            &self.declared_names,
            PACKAGE_NAME_SEPARATOR,
        );
        let localization_name = resolve_name(
            &self.naming.display_name,
            &self.declared_names,
            DISPLAY_NAME_SEPARATOR,
        );

        let stats = MergeStats {
            total_skins: self.skins.len(),
            total_geometries: self.geometry.len(),
            texture_count: self.textures.len(),
            folder_count: self.packages.len(),
        };

        observer.on_progress(COMPLETE_PERCENT, "Merge complete");
        info!(
            skins = stats.total_skins,
            geometries = stats.total_geometries,
            textures = stats.texture_count,
            folders = stats.folder_count,
            failed = self.failures.len(),
            warnings = self.warnings.len(),
            "merge complete"
        );

        Ok(MergedResult {
            skin_document: SkinDocument {
                skins: self.skins,
                serialize_name,
                localization_name,
            },
            geometry_document: GeometryDocument {
                geometry: self.geometry,
                ..GeometryDocument::default()
            },
            texture_files: self.textures,
            other_files: self.others,
            stats,
            package_failures: self.failures,
            warnings: self.warnings,
        })
    }
}

/// Use `explicit` unless it is blank, else join the declared names.
fn resolve_name(explicit: &str, declared: &[String], separator: &str) -> String {
    let explicit = explicit.trim();
    if explicit.is_empty() {
        declared.join(separator)
    } else {
        explicit.to_owned()
    }
}

// ---------------------------------------------------------------------------
// merge
// ---------------------------------------------------------------------------

/// Merge `packages` in order into one result.
///
/// # Errors
/// Returns [`MergeError::NoPackages`] for an empty list, or
/// [`MergeError::Allocate`] if a name cannot be made unique.
pub fn merge(
    packages: &[AssetPackage],
    naming: &OutputNaming,
    observer: &mut dyn ProgressObserver,
) -> Result<MergedResult, MergeError> {
    let span = info_span!("merge", packages = packages.len());
    let _enter = span.enter();
    MergeSession::new(packages, naming.clone())?.finish(observer)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
