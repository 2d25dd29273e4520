//! Skin-pack test infrastructure.
#![allow(dead_code)]
//!
//! Provides [`TestPacks`], a temporary directory holding any number of
//! skin-pack folders for integration tests. Each instance gets its own
//! `TempDir`, so tests run in parallel without sharing files, and everything
//! is deleted on drop.
//!
//! # Example
//!
//! ```rust,no_run
//! use pack_common::TestPacks;
//! use serde_json::json;
//!
//! let packs = TestPacks::new();
//! let a = packs.add_pack("PackA", json!({ "serialize_name": "A", "skins": [] }));
//! packs.add_file("PackA", "skin1.png", b"png");
//! let stdout = packs.run_ok(&["merge", a.to_str().unwrap()]);
//! ```

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{Value, json};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// TestPacks
// ---------------------------------------------------------------------------

/// Skin-pack folders in a temporary directory.
pub struct TestPacks {
    /// Held to prevent premature cleanup.
    _dir: TempDir,
    root: PathBuf,
}

impl TestPacks {
    /// # Panics
    /// Panics if the temp dir cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let root = dir.path().to_path_buf();
        Self { _dir: dir, root }
    }

    /// The temp dir root; also the working directory for CLI runs.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the pack folder `folder` (which may not exist yet).
    #[must_use]
    pub fn pack_path(&self, folder: &str) -> PathBuf {
        self.root.join(folder)
    }

    /// Create `folder` with `skins` written as its `skins.json`.
    pub fn add_pack(&self, folder: &str, skins: Value) -> PathBuf {
        let text = serde_json::to_string_pretty(&skins).expect("serialize skins.json");
        self.add_file(folder, "skins.json", text.as_bytes())
    }

    /// Create `folder` with a `skins.json` declaring `serialize_name` and
    /// one skin per entry of `skin_names`.
    pub fn add_simple_pack(&self, folder: &str, serialize_name: &str, skin_names: &[&str]) -> PathBuf {
        let skins: Vec<Value> = skin_names
            .iter()
            .map(|n| json!({ "localization_name": n, "texture": format!("{n}.png") }))
            .collect();
        self.add_pack(
            folder,
            json!({
                "serialize_name": serialize_name,
                "localization_name": serialize_name,
                "skins": skins,
            }),
        );
        self.pack_path(folder)
    }

    /// Write `contents` to `folder/name`, creating directories as needed.
    /// Returns the folder path.
    pub fn add_file(&self, folder: &str, name: &str, contents: &[u8]) -> PathBuf {
        let dir = self.pack_path(folder);
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create pack dir");
        }
        std::fs::write(&path, contents).expect("write pack file");
        dir
    }

    /// Write `doc` as JSON to `folder/name`. Returns the folder path.
    pub fn add_json(&self, folder: &str, name: &str, doc: &Value) -> PathBuf {
        let text = serde_json::to_string_pretty(doc).expect("serialize json");
        self.add_file(folder, name, text.as_bytes())
    }

    // -----------------------------------------------------------------------
    // CLI helpers
    // -----------------------------------------------------------------------

    /// Run the `skinpack-merge` binary with the temp dir as cwd.
    pub fn run_raw(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_skinpack-merge"))
            .args(args)
            .current_dir(&self.root)
            .env_remove("SKINPACK_LOG")
            .env_remove("SKINPACK_LOG_FORMAT")
            .output()
            .expect("failed to execute skinpack-merge")
    }

    /// Run the binary and assert it succeeds. Returns stdout.
    ///
    /// # Panics
    /// Panics with stdout + stderr if the command fails.
    pub fn run_ok(&self, args: &[&str]) -> String {
        let out = self.run_raw(args);
        let stdout = String::from_utf8_lossy(&out.stdout);
        let stderr = String::from_utf8_lossy(&out.stderr);
        assert!(
            out.status.success(),
            "skinpack-merge {} failed:\nstdout: {stdout}\nstderr: {stderr}",
            args.join(" "),
        );
        stdout.to_string()
    }

    /// Run the binary and assert it fails. Returns stderr.
    ///
    /// # Panics
    /// Panics if the command succeeds.
    pub fn run_fails(&self, args: &[&str]) -> String {
        let out = self.run_raw(args);
        assert!(
            !out.status.success(),
            "Expected skinpack-merge {} to fail, but it succeeded.\nstdout: {}",
            args.join(" "),
            String::from_utf8_lossy(&out.stdout),
        );
        String::from_utf8_lossy(&out.stderr).to_string()
    }
}

impl Default for TestPacks {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Archive helpers
// ---------------------------------------------------------------------------

/// Read every entry of the ZIP at `path` as `(name, bytes)`, in archive
/// order.
///
/// # Panics
/// Panics if the archive cannot be opened or read.
pub fn read_archive(path: &Path) -> Vec<(String, Vec<u8>)> {
    use std::io::Read;

    let file = std::fs::File::open(path).expect("open archive");
    let mut archive = zip::ZipArchive::new(file).expect("read archive");
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).expect("archive entry");
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes).expect("read entry");
            (entry.name().to_owned(), bytes)
        })
        .collect()
}

/// Parse the archive entry `name` as JSON.
///
/// # Panics
/// Panics if the entry is missing or not JSON.
pub fn archive_json(entries: &[(String, Vec<u8>)], name: &str) -> Value {
    let (_, bytes) = entries
        .iter()
        .find(|(n, _)| n == name)
        .unwrap_or_else(|| panic!("archive has no {name}"));
    serde_json::from_slice(bytes).expect("archive entry is JSON")
}
