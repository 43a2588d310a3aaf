use anyhow::Result;

use crate::entry_service::{EntryService, Periods};
use crate::store::EntryStore;

/// 絞り込みに利用できる年と月を表示するためのサブコマンド。
#[derive(Debug, clap::Args)]
pub struct PeriodsArgs {
    #[clap(short = 'y', long = "year", help = "Shows only the months of the year")]
    year: Option<i32>,
}

pub struct PeriodsCommand<'a, S: EntryStore> {
    service: &'a EntryService<S>,
}

impl<'a, S: EntryStore> PeriodsCommand<'a, S> {
    /// 新しい`PeriodsCommand`を返す。
    pub fn new(service: &'a EntryService<S>) -> Self {
        Self { service }
    }

    /// `periods`サブコマンドの処理を行う。
    pub fn run(&self, args: PeriodsArgs) -> Result<Periods> {
        let mut periods = self.service.periods()?;
        if let Some(year) = args.year {
            periods.retain(|y, _| *y == year);
        }

        Ok(periods)
    }
}
