//! Builds the configured listing provider.

use std::sync::Arc;

use tracing::info;

use filepick_core::config::source::SourceConfig;
use filepick_core::error::AppError;
use filepick_core::result::AppResult;
use filepick_core::traits::listing::ResourceLister;

/// Create the lister selected by `config.provider`.
pub async fn build_lister(config: &SourceConfig) -> AppResult<Arc<dyn ResourceLister>> {
    let lister: Arc<dyn ResourceLister> = match config.provider.as_str() {
        #[cfg(feature = "local")]
        "local" => {
            info!(root = %config.root, "Initializing local directory lister");
            Arc::new(crate::local::LocalDirLister::new(&config.root).await?)
        }
        #[cfg(feature = "memory")]
        "fixture" => {
            let path = config.fixture.as_deref().ok_or_else(|| {
                AppError::configuration("source.fixture is required for the fixture provider")
            })?;
            info!(fixture = %path, "Initializing fixture lister");
            Arc::new(crate::memory::MemoryLister::from_fixture_file(path).await?)
        }
        other => {
            return Err(AppError::configuration(format!(
                "Unknown source provider: '{other}'. Supported: local, fixture"
            )));
        }
    };

    Ok(lister)
}
