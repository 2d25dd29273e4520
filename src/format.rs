use anyhow::{Result, bail};
use serde::Serialize;
use std::str::FromStr;

/// Output format for command reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text for humans
    #[default]
    Text,
    /// JSON - machine-parseable
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => bail!("Invalid format '{s}'. Use: text or json"),
        }
    }
}

impl OutputFormat {
    /// `--json` is shorthand for `--format json`.
    #[must_use]
    pub fn with_json_flag(format: Option<Self>, json: bool) -> Self {
        if json {
            Self::Json
        } else {
            format.unwrap_or_default()
        }
    }

    /// Render `data` in this format; text uses its `Display` impl.
    ///
    /// # Errors
    /// Returns an error if JSON serialization fails.
    pub fn render<T: Serialize + std::fmt::Display>(self, data: &T) -> Result<String> {
        match self {
            Self::Json => serde_json::to_string_pretty(data)
                .map_err(|e| anyhow::anyhow!("JSON serialization failed: {e}")),
            Self::Text => Ok(data.to_string()),
        }
    }
}
