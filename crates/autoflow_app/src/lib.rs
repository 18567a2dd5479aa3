//! The `autoflow` command line: offline editing of automation settings and
//! the job queue through the core state machine.
pub mod cli;
pub mod render;
pub mod selection;
pub mod session;

use std::sync::Arc;

use anyhow::{Context, Result};
use autoflow_bridge::{JsonFileSettingsStore, OfflineBackend};
use autoflow_core::Msg;
use autoflow_logging::flow_info;

use cli::{CategoryCommand, Cli, Command, HistoryCommand, KeywordCommand};
use render::{render_notice, render_overview};
use selection::selection_msgs;
use session::Session;

/// Run one CLI command and return what should be printed.
pub async fn run(cli: Cli) -> Result<String> {
    flow_info!("Using settings file {}", cli.settings.display());
    let backend = Arc::new(OfflineBackend::new(JsonFileSettingsStore::new(&cli.settings)));
    let mut session = Session::open(backend).await;

    let mut output = String::new();
    match cli.command {
        Command::Migrate => session.save_now().await,
        Command::Show { json } => {
            output = if json {
                serde_json::to_string_pretty(&session.state().settings_payload())
                    .context("encoding settings")?
            } else {
                render_overview(&session.state().view(), session.state().display())
            };
        }
        Command::Enqueue { paths } => session.dispatch_all(selection_msgs(&paths)?).await,
        Command::Dequeue { index, force } => {
            session
                .dispatch(Msg::QueueItemRemoved {
                    index,
                    confirmed: force,
                })
                .await
        }
        Command::Move { from, to } => session.dispatch(Msg::QueueItemMoved { from, to }).await,
        Command::Clear => session.dispatch(Msg::QueueCleared).await,
        Command::Category(command) => session.dispatch(category_msg(command)).await,
        Command::Keyword(command) => session.dispatch(keyword_msg(command)).await,
        Command::Collapse { collapsed } => {
            session.dispatch(Msg::QueueCollapseToggled(collapsed)).await
        }
        Command::History(HistoryCommand::Clear) => session.dispatch(Msg::HistoryClearClicked).await,
        Command::History(HistoryCommand::Export) => {
            session.dispatch(Msg::HistoryExportClicked).await
        }
    }

    let state = session.close().await?;
    if let Some(notice) = render_notice(&state.view()) {
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(&notice);
    }
    Ok(output)
}

fn category_msg(command: CategoryCommand) -> Msg {
    match command {
        CategoryCommand::Add { name } => Msg::CategoryAdded(name),
        CategoryCommand::Remove { index } => Msg::CategoryRemoved(index),
        CategoryCommand::Move { from, to } => Msg::CategoryMoved { from, to },
        CategoryCommand::Pause { name, enabled } => Msg::PauseToggled {
            category: name,
            enabled,
        },
    }
}

fn keyword_msg(command: KeywordCommand) -> Msg {
    match command {
        KeywordCommand::Add { category, value } => Msg::KeywordAdded { category, value },
        KeywordCommand::Remove { category, index } => Msg::KeywordRemoved { category, index },
    }
}
