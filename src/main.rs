use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::debug;

mod add_command;
mod aggregation;
mod config;
mod console;
mod datetime;
mod delete_command;
mod entry_service;
mod error;
mod history_command;
mod logger;
mod periods_command;
mod store;
mod time_entry;
mod validator;

use add_command::{AddArgs, AddCommand};
use config::Config;
use console::{ConsoleMarkdownList, ConsolePresenter};
use delete_command::{DeleteArgs, DeleteCommand};
use entry_service::EntryService;
use history_command::{HistoryArgs, HistoryCommand};
use periods_command::{PeriodsArgs, PeriodsCommand};
use store::FileEntryStore;

/// 日々の作業時間をプロジェクトごとに記録するCLIアプリケーション。
///
/// # Examples
/// ```
/// $ cargo run -- add --project "Client A" --hours 2.5 --description "review"
/// $ cargo run -- history --month 2026-02
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    #[clap(long = "data-dir", help = "Directory to store entries in")]
    data_dir: Option<PathBuf>,

    #[clap(short, long, parse(from_occurrences), help = "Increases log verbosity")]
    verbose: u64,

    #[clap(subcommand)]
    subcommand: SubCommands,
}

/// サブコマンドを表す列挙型。
#[derive(Debug, Subcommand)]
enum SubCommands {
    Add(AddArgs),
    Delete(DeleteArgs),
    History(HistoryArgs),
    Periods(PeriodsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::new(args.data_dir, args.verbose).context("Failed to load config")?;
    logger::setup_logger(config.log_level)?;
    debug!("Config: {:?}", config);

    let store = FileEntryStore::new(&config.data_dir).context("Failed to open entry store")?;
    let service = EntryService::new(store);
    let mut stdout = io::stdout();
    let mut presenter = ConsoleMarkdownList::new(&mut stdout);

    match args.subcommand {
        SubCommands::Add(add) => {
            let entry = AddCommand::new(&service).run(add).await?;
            presenter.show_entry(&entry)?;
        }
        SubCommands::Delete(delete) => {
            let id = DeleteCommand::new(&service).run(delete)?;
            presenter.show_deleted(id)?;
        }
        SubCommands::History(history) => {
            let history = HistoryCommand::new(&service).run(history)?;
            presenter.show_history(&history)?;
        }
        SubCommands::Periods(periods) => {
            let periods = PeriodsCommand::new(&service).run(periods)?;
            presenter.show_periods(&periods)?;
        }
    }

    Ok(())
}
