//! skinpack library crate: the merge engine and its collaborators.
//!
//! The primary interface is the `skinpack-merge` binary. This lib.rs exposes
//! the modules so that integration tests, benchmarks and other tools can
//! load, merge and write skin packs without going through the CLI.

pub mod blob;
pub mod config;
pub mod jsonc;
pub mod merge;
pub mod model;
pub mod output;
pub mod package;

// Private modules only used by the binary, not re-exported:
// format, inspect, merge_cmd, telemetry
