use anyhow::{bail, Context, Result};
use chrono::Month;
use log::info;

use crate::aggregation::{History, MonthFilter};
use crate::entry_service::EntryService;
use crate::store::EntryStore;

/// `history`サブコマンドの引数を表す構造体。
#[derive(Debug, clap::Args)]
pub struct HistoryArgs {
    #[clap(
        short = 'm',
        long = "month",
        help = "Shows only the month in the format YYYY-MM",
        parse(try_from_str = parse_month),
    )]
    month: Option<MonthFilter>,
}

pub struct HistoryCommand<'a, S: EntryStore> {
    service: &'a EntryService<S>,
}

impl<'a, S: EntryStore> HistoryCommand<'a, S> {
    /// 新しい`HistoryCommand`を返す。
    pub fn new(service: &'a EntryService<S>) -> Self {
        Self { service }
    }

    /// `history`サブコマンドの処理を行う。
    ///
    /// 月が指定されていない場合は全てのエントリーを集計する。
    pub fn run(&self, args: HistoryArgs) -> Result<History> {
        let filter = args.month.unwrap_or(MonthFilter::All);
        info!("Filter: {:?}", filter);

        self.service.history(filter)
    }
}

/// `YYYY-MM`形式の月をパースする。
fn parse_month(s: &str) -> Result<MonthFilter> {
    let (year, month) = match s.split_once('-') {
        Some((year, month))
            if year.len() == 4
                && month.len() == 2
                && year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) =>
        {
            (year, month)
        }
        _ => bail!("Failed to parse month, expected YYYY-MM: {}", s),
    };
    let year: i32 = year
        .parse()
        .with_context(|| format!("Failed to parse year: {}", s))?;
    let number: u8 = month
        .parse()
        .with_context(|| format!("Failed to parse month: {}", s))?;
    let month = Month::try_from(number)
        .map_err(|_| anyhow::anyhow!("Month must be between 01 and 12: {}", s))?;

    Ok(MonthFilter::Month { year, month })
}
