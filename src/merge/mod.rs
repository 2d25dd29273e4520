//! Deterministic N-way skin-pack merge engine.
//!
//! Packages are merged one at a time, in input order, into accumulators
//! owned by a single [`MergeSession`]:
//!
//! - **skins**: skin entries appended; colliding `localization_name`s
//!   renamed via [`allocate`] ([`skins`] module).
//! - **geometry**: each geometry file brought to the current schema
//!   ([`normalize`]), then entries appended with colliding identifiers
//!   renamed ([`geometry`] module).
//! - **assets**: texture and other-file maps absorbed first-writer-wins
//!   ([`assets`] module).
//!
//! # Determinism guarantee
//!
//! The same ordered package list always produces the same result:
//!
//! - Renaming depends only on which names earlier entries claimed.
//! - Entries keep input package order, then intra-document order.
//! - Asset maps keep first-seen order and first-seen content.

pub mod allocate;
pub mod assets;
pub mod geometry;
pub mod normalize;
pub mod progress;
pub mod session;
pub mod skins;
pub mod types;

pub use allocate::{AllocateError, Namespace, allocate};
pub use normalize::{GeometrySchema, NormalizedGeometry, normalize};
pub use progress::{NoProgress, ProgressEvent, ProgressObserver};
pub use session::{MergeSession, merge};
pub use types::{
    GeometryDocument, MergeError, MergeStats, MergeWarning, MergedResult, OutputNaming,
    PackageFailure, PackageSummary, SkinDocument,
};
