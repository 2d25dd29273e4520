//! Merger configuration (`skinpack.toml`).
//!
//! Defines the typed configuration read from `skinpack.toml` in the working
//! directory (or the file given with `--config`): output naming and how
//! package folders are loaded. Command-line flags override every value.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// File name looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "skinpack.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level merger configuration.
///
/// Missing fields use sensible defaults. Missing file → all defaults (no
/// error).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SkinpackConfig {
    /// Output naming and archive settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Folder loading settings.
    #[serde(default)]
    pub load: LoadConfig,
}

// ---------------------------------------------------------------------------
// OutputConfig
// ---------------------------------------------------------------------------

/// How the merged package is named and written.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Merged `serialize_name`. Empty joins the inputs' declared names.
    #[serde(default)]
    pub package_name: String,

    /// Merged `localization_name`. Empty joins the inputs' declared names.
    #[serde(default)]
    pub display_name: String,

    /// Appended to the merged `serialize_name` to form the archive file name
    /// (default: `"_merged.zip"`).
    #[serde(default = "default_archive_suffix")]
    pub archive_suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            package_name: String::new(),
            display_name: String::new(),
            archive_suffix: default_archive_suffix(),
        }
    }
}

fn default_archive_suffix() -> String {
    "_merged.zip".to_owned()
}

// ---------------------------------------------------------------------------
// LoadConfig
// ---------------------------------------------------------------------------

/// How package folders are read and their files classified.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadConfig {
    /// Per-file read timeout in milliseconds (default: 5000).
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// File extensions treated as textures, without the dot
    /// (default: `["png", "jpg", "jpeg"]`). Matched case-insensitively.
    #[serde(default = "default_texture_extensions")]
    pub texture_extensions: Vec<String>,

    /// Words that mark a `.json` file as a geometry document when they
    /// appear in its name (default: `["geometry", "model"]`).
    #[serde(default = "default_geometry_markers")]
    pub geometry_markers: Vec<String>,

    /// Include files in nested directories (default: `false`).
    #[serde(default)]
    pub recursive: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            read_timeout_ms: default_read_timeout_ms(),
            texture_extensions: default_texture_extensions(),
            geometry_markers: default_geometry_markers(),
            recursive: false,
        }
    }
}

impl LoadConfig {
    /// The per-file read timeout as a [`Duration`].
    #[must_use]
    pub const fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

const fn default_read_timeout_ms() -> u64 {
    5_000
}

fn default_texture_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg"].map(str::to_owned).to_vec()
}

fn default_geometry_markers() -> Vec<String> {
    ["geometry", "model"].map(str::to_owned).to_vec()
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Error loading a configuration file.
#[derive(Debug)]
pub struct ConfigError {
    /// The path that was being loaded (if available).
    pub path: Option<std::path::PathBuf>,
    /// Human-readable message with line-level detail when possible.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(p) = &self.path {
            write!(f, "{}: {}", p.display(), self.message)
        } else {
            write!(f, "config error: {}", self.message)
        }
    }
}

impl std::error::Error for ConfigError {}

impl SkinpackConfig {
    /// Load configuration from a TOML file.
    ///
    /// - If the file does not exist, returns all defaults (not an error).
    /// - If the file exists but contains invalid TOML or unknown fields,
    ///   returns a [`ConfigError`] with line-level detail.
    ///
    /// # Errors
    /// Returns `ConfigError` on I/O errors (other than not-found) or parse errors.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError {
                    path: Some(path.to_owned()),
                    message: format!("could not read file: {e}"),
                });
            }
        };
        Self::parse(&contents).map_err(|mut e| {
            e.path = Some(path.to_owned());
            e
        })
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `ConfigError` on invalid TOML or unknown fields.
    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| {
            let mut message = e.message().to_owned();
            if let Some(span) = e.span() {
                let line = toml_str[..span.start]
                    .chars()
                    .filter(|&c| c == '\n')
                    .count()
                    + 1;
                message = format!("line {line}: {message}");
            }
            ConfigError {
                path: None,
                message,
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_all_fields() {
        let cfg = SkinpackConfig::default();
        assert_eq!(cfg.output.package_name, "");
        assert_eq!(cfg.output.display_name, "");
        assert_eq!(cfg.output.archive_suffix, "_merged.zip");
        assert_eq!(cfg.load.read_timeout_ms, 5_000);
        assert_eq!(cfg.load.texture_extensions, vec!["png", "jpg", "jpeg"]);
        assert_eq!(cfg.load.geometry_markers, vec!["geometry", "model"]);
        assert!(!cfg.load.recursive);
        assert_eq!(cfg.load.read_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn parse_empty_string() {
        let cfg = SkinpackConfig::parse("").unwrap();
        assert_eq!(cfg, SkinpackConfig::default());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[output]
package_name = "Mega"
display_name = "Mega Pack"
archive_suffix = ".mcpack"

[load]
read_timeout_ms = 250
texture_extensions = ["png", "tga"]
geometry_markers = ["geo"]
recursive = true
"#;
        let cfg = SkinpackConfig::parse(toml).unwrap();
        assert_eq!(cfg.output.package_name, "Mega");
        assert_eq!(cfg.output.display_name, "Mega Pack");
        assert_eq!(cfg.output.archive_suffix, ".mcpack");
        assert_eq!(cfg.load.read_timeout(), Duration::from_millis(250));
        assert_eq!(cfg.load.texture_extensions, vec!["png", "tga"]);
        assert_eq!(cfg.load.geometry_markers, vec!["geo"]);
        assert!(cfg.load.recursive);
    }

    #[test]
    fn parse_partial_config_uses_defaults() {
        let cfg = SkinpackConfig::parse("[load]\nrecursive = true\n").unwrap();
        assert!(cfg.load.recursive);
        assert_eq!(cfg.load.read_timeout_ms, 5_000);
        assert_eq!(cfg.output, OutputConfig::default());
    }

    #[test]
    fn parse_rejects_unknown_top_level_field() {
        let err = SkinpackConfig::parse("[network]\nport = 1\n").unwrap_err();
        assert!(err.message.contains("network"), "{}", err.message);
    }

    #[test]
    fn parse_rejects_unknown_nested_field() {
        let err = SkinpackConfig::parse("[output]\nzip_level = 9\n").unwrap_err();
        assert!(err.message.contains("zip_level"), "{}", err.message);
    }

    #[test]
    fn parse_includes_line_number_on_error() {
        let toml = "[load]\nrecursive = true\nread_timeout_ms = \"soon\"\n";
        let err = SkinpackConfig::parse(toml).unwrap_err();
        assert!(
            err.message.starts_with("line 3"),
            "error should include line number: {}",
            err.message
        );
    }

    #[test]
    fn load_missing_file_returns_defaults() {
        let cfg = SkinpackConfig::load(Path::new("/nonexistent/skinpack.toml")).unwrap();
        assert_eq!(cfg, SkinpackConfig::default());
    }

    #[test]
    fn load_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[output]\npackage_name = \"Combo\"\n").unwrap();
        let cfg = SkinpackConfig::load(&path).unwrap();
        assert_eq!(cfg.output.package_name, "Combo");
    }

    #[test]
    fn load_invalid_file_shows_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "not valid [[[toml").unwrap();
        let err = SkinpackConfig::load(&path).unwrap_err();
        assert_eq!(err.path.as_deref(), Some(path.as_path()));
        assert!(err.to_string().starts_with(&path.display().to_string()));
    }

    #[test]
    fn config_error_display_without_path() {
        let err = ConfigError {
            path: None,
            message: "parse error".to_owned(),
        };
        assert_eq!(err.to_string(), "config error: parse error");
    }
}
