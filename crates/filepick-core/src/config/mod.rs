//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every section falls back to its defaults when absent.

pub mod browser;
pub mod indexing;
pub mod logging;
pub mod source;

use serde::{Deserialize, Serialize};

use self::browser::BrowserConfig;
use self::indexing::IndexingConfig;
use self::logging::LoggingConfig;
use self::source::SourceConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Top-level deserialization target for the merged TOML files
/// (`default.toml` + environment overlay) and `FILEPICK__*` variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Tree browsing and listing settings.
    #[serde(default)]
    pub browser: BrowserConfig,
    /// Bulk indexing workflow settings.
    #[serde(default)]
    pub indexing: IndexingConfig,
    /// Where folder listings come from.
    #[serde(default)]
    pub source: SourceConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// `path` is the base file (extension optional); `env` selects an
    /// optional overlay next to it (`config/{env}.toml`). Environment
    /// variables prefixed with `FILEPICK__` win over both.
    pub fn load(path: &str, env: &str) -> Result<Self, AppError> {
        let overlay = std::path::Path::new(path)
            .with_file_name(env)
            .to_string_lossy()
            .into_owned();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&overlay).required(false))
            .add_source(
                config::Environment::with_prefix("FILEPICK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.browser.page_size == 0 {
            return Err(AppError::configuration("browser.page_size must be > 0"));
        }
        if self.browser.max_pages == 0 {
            return Err(AppError::configuration("browser.max_pages must be > 0"));
        }
        if self.indexing.max_poll_attempts == 0 {
            return Err(AppError::configuration(
                "indexing.max_poll_attempts must be > 0",
            ));
        }
        Ok(())
    }
}
