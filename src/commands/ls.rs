//! Folder listing command.

use clap::Args;

use filepick_core::config::AppConfig;
use filepick_core::error::AppError;
use filepick_core::types::NodeId;

use crate::output::OutputFormat;

use super::FilterArgs;

/// Arguments for the ls command
#[derive(Debug, Args)]
pub struct LsArgs {
    /// Folder ID to list (omit for the root)
    pub folder: Option<String>,

    /// Filter and sort flags
    #[command(flatten)]
    pub filter: FilterArgs,
}

/// Execute the ls command
pub async fn execute(args: &LsArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let session = super::open_session(config).await?;

    if let Some(folder) = &args.folder {
        let id = NodeId::new(folder.clone());
        let name = folder.rsplit('/').next().unwrap_or(folder.as_str()).to_string();
        session.open_folder(&id, &name).await?;
    }

    let filter = args.filter.to_filter(super::default_sort(config))?;
    session.set_filters(filter).await;
    super::print_visible(&session, format).await;
    Ok(())
}
