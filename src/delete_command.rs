use anyhow::Result;

use crate::entry_service::EntryService;
use crate::store::EntryStore;

/// タイムエントリーを削除するためのサブコマンド。
#[derive(Debug, clap::Args)]
pub struct DeleteArgs {
    #[clap(help = "Id of the time entry to delete")]
    id: u64,
}

pub struct DeleteCommand<'a, S: EntryStore> {
    service: &'a EntryService<S>,
}

impl<'a, S: EntryStore> DeleteCommand<'a, S> {
    /// 新しい`DeleteCommand`を返す。
    pub fn new(service: &'a EntryService<S>) -> Self {
        Self { service }
    }

    /// `delete`サブコマンドの処理を行い、削除したidを返す。
    pub fn run(&self, args: DeleteArgs) -> Result<u64> {
        self.service.delete(args.id)?;
        Ok(args.id)
    }
}
