use anyhow::Result;
use chrono::Local;
use log::info;

use crate::entry_service::EntryService;
use crate::store::EntryStore;
use crate::time_entry::{NewTimeEntry, TimeEntry};

/// タイムエントリーを追加するためのサブコマンド。
#[derive(Debug, clap::Args)]
pub struct AddArgs {
    #[clap(
        short = 'd',
        long = "date",
        help = "Sets the day worked in the format YYYY-MM-DD (default: today)"
    )]
    date: Option<String>,

    #[clap(
        short = 'p',
        long = "project",
        help = "One of \"Viso Internal\", \"Client A\", \"Client B\", \"Personal Development\""
    )]
    project: String,

    #[clap(short = 'H', long = "hours", help = "Hours worked, e.g. 1.5")]
    hours: f64,

    #[clap(short = 'm', long = "description", help = "What was done")]
    description: String,
}

pub struct AddCommand<'a, S: EntryStore> {
    service: &'a EntryService<S>,
}

impl<'a, S: EntryStore> AddCommand<'a, S> {
    /// 新しい`AddCommand`を返す。
    pub fn new(service: &'a EntryService<S>) -> Self {
        Self { service }
    }

    /// `add`サブコマンドの処理を行う。
    ///
    /// 日付が指定されていない場合は、Localタイムゾーンで現在の日付を利用する。
    pub async fn run(&self, args: AddArgs) -> Result<TimeEntry> {
        let date = args
            .date
            .unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string());
        info!("Adding {} hours to {} on {}", args.hours, args.project, date);

        self.service
            .create(NewTimeEntry {
                date,
                project: args.project,
                hours: args.hours,
                description: args.description,
            })
            .await
    }
}
