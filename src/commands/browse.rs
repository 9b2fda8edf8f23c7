//! Interactive browsing shell.
//!
//! Reads one command per line from stdin and applies it to a single
//! session. A failing command prints its error and the shell keeps going.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use filepick_core::config::AppConfig;
use filepick_core::config::indexing::IndexingOptions;
use filepick_core::error::AppError;
use filepick_core::types::{
    IndexStatus, NodeFilter, NodeId, SortDirection, SortKey, SortSpec, StatusFilter, TypeFilter,
};
use filepick_index::IndexWorkflow;
use filepick_tree::BrowserSession;

use crate::output::{self, OutputFormat};

const HELP: &str = "\
commands:
  ls                         list the current view
  open <id>                  open a folder
  back                       go up one breadcrumb
  jump <depth>|root          jump to a breadcrumb
  expand <id> / collapse <id>
  toggle <id>                toggle a file or folder
  select-all / deselect-all
  filter <text>              search every loaded folder by name
  filter type all|file|folder
  filter status <status>|all
  filter clear
  sort name|modified [asc|desc]
  status                     selection and navigation summary
  index                      index the selection
  remove                     remove the selection from the active index
  refresh                    reload from scratch
  quit";

/// Whether the shell keeps reading
enum Flow {
    Continue,
    Quit,
}

/// Execute the browse shell
pub async fn execute(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let session = super::open_session(config).await?;
    let workflow = super::index_workflow(config);
    let options = workflow.default_options().clone();

    println!("{}", HELP);
    super::print_visible(&session, format).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("filepick> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match dispatch(&session, &workflow, &options, line, format).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => output::print_error(&e.to_string()),
        }
        super::report_load_errors(&session).await;
    }

    session.settle().await;
    Ok(())
}

/// Run one shell command
async fn dispatch(
    session: &BrowserSession,
    workflow: &IndexWorkflow,
    options: &IndexingOptions,
    line: &str,
    format: OutputFormat,
) -> Result<Flow, AppError> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "ls" => {
            print_breadcrumbs(session).await;
            super::print_visible(session, format).await;
        }
        "open" => {
            let id = required_id(rest)?;
            let name = session
                .find(&id)
                .await
                .map(|n| n.display_name().to_string())
                .unwrap_or_else(|| id.to_string());
            session.open_folder(&id, &name).await?;
            print_breadcrumbs(session).await;
            super::print_visible(session, format).await;
        }
        "back" => {
            session.go_back().await?;
            print_breadcrumbs(session).await;
            super::print_visible(session, format).await;
        }
        "jump" => {
            if rest == "root" {
                session.jump_to_root().await?;
            } else {
                let depth = rest
                    .parse::<usize>()
                    .map_err(|_| AppError::validation(format!("Invalid depth '{}'", rest)))?;
                session.jump_to_depth(depth).await?;
            }
            print_breadcrumbs(session).await;
            super::print_visible(session, format).await;
        }
        "expand" => {
            session.expand_folder(&required_id(rest)?).await?;
            super::print_visible(session, format).await;
        }
        "collapse" => session.collapse_folder(&required_id(rest)?).await,
        "toggle" => {
            let id = required_id(rest)?;
            session.toggle_node(&id).await;
            let state = session.tri_state(&id).await;
            output::print_kv(id.as_str(), &format!("{:?}", state).to_lowercase());
        }
        "select-all" => {
            session.select_all().await;
            print_counts(session).await;
        }
        "deselect-all" => {
            session.deselect_all().await;
            print_counts(session).await;
        }
        "filter" => {
            let mut filter = session.filter().await;
            apply_filter_command(&mut filter, rest)?;
            session.set_filters(filter).await;
            super::print_visible(session, format).await;
        }
        "sort" => {
            let mut filter = session.filter().await;
            filter.sort = parse_sort(rest)?;
            session.set_filters(filter).await;
            super::print_visible(session, format).await;
        }
        "status" => {
            print_breadcrumbs(session).await;
            print_counts(session).await;
            let filter = session.filter().await;
            output::print_kv(
                "Filter scope",
                if filter.is_active() { "global" } else { "current folder" },
            );
            output::print_kv(
                "Active index",
                &session
                    .active_index()
                    .await
                    .map(|i| i.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            );
        }
        "index" => {
            session.settle().await;
            let outcome = filepick_index::index_selection(session, workflow, options).await?;
            let failed = outcome.failed();
            if failed.is_empty() {
                output::print_success(&format!(
                    "Indexed {} resources into {}",
                    outcome.statuses.len(),
                    outcome.index_id
                ));
            } else {
                output::print_warning(&format!(
                    "Indexed with {} failures into {}",
                    failed.len(),
                    outcome.index_id
                ));
            }
        }
        "remove" => {
            let report = filepick_index::remove_selection(session, workflow).await?;
            match report.aggregate_error() {
                Some(e) => output::print_error(&e.to_string()),
                None => output::print_success(&format!(
                    "Removed {} resources",
                    report.succeeded.len()
                )),
            }
        }
        "refresh" => {
            session.refresh().await?;
            super::print_visible(session, format).await;
        }
        "help" => println!("{}", HELP),
        "quit" | "exit" => return Ok(Flow::Quit),
        other => {
            return Err(AppError::validation(format!(
                "Unknown command '{}', try 'help'",
                other
            )));
        }
    }

    Ok(Flow::Continue)
}

fn required_id(raw: &str) -> Result<NodeId, AppError> {
    if raw.is_empty() {
        return Err(AppError::validation("Missing node id"));
    }
    Ok(NodeId::new(raw))
}

/// Apply `filter <text>`, `filter type ..`, `filter status ..` or
/// `filter clear`
fn apply_filter_command(filter: &mut NodeFilter, args: &str) -> Result<(), AppError> {
    let (head, value) = args.split_once(' ').unwrap_or((args, ""));
    let value = value.trim();
    match head {
        "clear" | "" => {
            let sort = filter.sort;
            *filter = NodeFilter {
                sort,
                ..Default::default()
            };
        }
        "type" => {
            filter.node_type = match value {
                "all" => TypeFilter::All,
                "file" => TypeFilter::File,
                "folder" => TypeFilter::Folder,
                other => {
                    return Err(AppError::validation(format!("Unknown type filter '{}'", other)));
                }
            };
        }
        "status" => {
            filter.index_status = match value {
                "all" => StatusFilter::All,
                raw => StatusFilter::Only(raw.parse::<IndexStatus>()?),
            };
        }
        _ => filter.query = args.to_string(),
    }
    Ok(())
}

fn parse_sort(args: &str) -> Result<SortSpec, AppError> {
    let mut parts = args.split_whitespace();
    let key = match parts.next() {
        Some("name") => SortKey::Name,
        Some("modified") | Some("date") => SortKey::Modified,
        other => {
            return Err(AppError::validation(format!(
                "Unknown sort key '{}'",
                other.unwrap_or("")
            )));
        }
    };
    let direction = match parts.next() {
        None | Some("asc") => SortDirection::Asc,
        Some("desc") => SortDirection::Desc,
        Some(other) => {
            return Err(AppError::validation(format!(
                "Unknown sort direction '{}'",
                other
            )));
        }
    };
    Ok(SortSpec::new(key, direction))
}

async fn print_breadcrumbs(session: &BrowserSession) {
    let crumbs: Vec<String> = session
        .breadcrumbs()
        .await
        .iter()
        .enumerate()
        .map(|(i, f)| format!("[{}] {}", i, f.folder_name))
        .collect();
    if crumbs.is_empty() {
        println!("/");
    } else {
        println!("/ > {}", crumbs.join(" > "));
    }
}

async fn print_counts(session: &BrowserSession) {
    output::print_kv(
        "Selected",
        &session.total_selected_count().await.to_string(),
    );
    output::print_kv(
        "Selected (visible)",
        &session.visible_selected_count().await.to_string(),
    );
}
