use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use chrono::{Month, NaiveDate};
use log::{debug, info, warn};

use crate::aggregation::{self, History, MonthFilter};
use crate::error::EntryError;
use crate::store::EntryStore;
use crate::time_entry::{NewTimeEntry, TimeEntry};
use crate::validator;

/// データに存在する年と月。
pub type Periods = BTreeMap<i32, Vec<Month>>;

/// タイムエントリーの作成、削除、集計を行うサービス。
///
/// 同じ日付への作成は日付ごとのロックで直列化し、上限の確認と保存の間に
/// 他の作成が割り込まないようにする。
pub struct EntryService<S: EntryStore> {
    store: S,
    day_locks: Mutex<HashMap<NaiveDate, Arc<tokio::sync::Mutex<()>>>>,
}

impl<S: EntryStore> EntryService<S> {
    /// 新しい`EntryService`を返す。
    pub fn new(store: S) -> Self {
        Self {
            store,
            day_locks: Mutex::new(HashMap::new()),
        }
    }

    /// 日付ごとのロックを取得する。
    fn day_lock(&self, date: NaiveDate) -> Result<Arc<tokio::sync::Mutex<()>>> {
        let mut locks = self
            .day_locks
            .lock()
            .map_err(|_| anyhow!("Day lock table is poisoned"))?;
        Ok(locks.entry(date).or_default().clone())
    }

    /// タイムエントリーを作成する。
    ///
    /// 形式の検証、日付ごとの上限の確認を行い、問題がなければ保存する。
    /// 拒否された場合は`EntryError`をそのまま返し、保存は行わない。
    ///
    /// # Arguments
    ///
    /// * `request` - 作成するタイムエントリー
    pub async fn create(&self, request: NewTimeEntry) -> Result<TimeEntry> {
        let candidate = validator::validate(&request).map_err(|e| {
            warn!("Rejected entry: {}", e);
            e
        })?;

        let lock = self.day_lock(candidate.date)?;
        let _guard = lock.lock().await;

        let stored = self
            .store
            .find_by_date(candidate.date)
            .with_context(|| format!("Failed to read entries for {}", candidate.date))?;
        debug!("{} entries stored for {}", stored.len(), candidate.date);
        aggregation::check_daily_cap(&candidate, &stored).map_err(|e| {
            warn!("Rejected entry: {}", e);
            e
        })?;

        let created = self
            .store
            .insert(candidate)
            .context("Failed to save time entry")?;
        info!("Created time entry {} on {}", created.id, created.date);

        Ok(created)
    }

    /// タイムエントリーを削除する。
    ///
    /// 対象が存在しない場合は`EntryError::NotFound`を返す。
    pub fn delete(&self, id: u64) -> Result<()> {
        let deleted = self
            .store
            .delete_by_id(id)
            .with_context(|| format!("Failed to delete time entry {}", id))?;
        if !deleted {
            return Err(EntryError::NotFound { id }.into());
        }
        info!("Deleted time entry {}", id);

        Ok(())
    }

    /// 日付ごとに集計した履歴を返す。
    pub fn history(&self, filter: MonthFilter) -> Result<History> {
        let entries = self
            .store
            .list_all()
            .context("Failed to read time entries")?;
        debug!("Building history from {} entries with {:?}", entries.len(), filter);

        Ok(aggregation::build_history(&entries, filter))
    }

    /// 絞り込みに利用できる年と月を返す。
    pub fn periods(&self) -> Result<Periods> {
        let entries = self
            .store
            .list_all()
            .context("Failed to read time entries")?;

        Ok(aggregation::available_years(&entries)
            .into_iter()
            .map(|year| (year, aggregation::available_months(&entries, year)))
            .collect())
    }
}
