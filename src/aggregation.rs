use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Month, NaiveDate};

use crate::error::EntryError;
use crate::time_entry::{TimeEntry, ValidEntry, MAX_HOURS_PER_DAY};

/// 上限判定で利用する1時間あたりの単位数。
///
/// 10進数の入力で生じる表現誤差を丸めるため、時間を整数の単位に変換して比較する。
const UNITS_PER_HOUR: f64 = 1e10;

/// 同じ日付のエントリーとその合計時間。
#[derive(Clone, Debug, PartialEq)]
pub struct DayGroup {
    pub date: NaiveDate,
    /// 作成日時の新しい順。
    pub entries: Vec<TimeEntry>,
    pub total: f64,
}

/// 日付ごとにまとめた履歴。
#[derive(Clone, Debug, PartialEq)]
pub struct History {
    /// 日付の新しい順。
    pub days: Vec<DayGroup>,
    pub grand_total: f64,
}

/// 履歴の絞り込み条件。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MonthFilter {
    All,
    Month { year: i32, month: Month },
}

impl MonthFilter {
    /// エントリーが条件に一致するかを返す。
    pub fn matches(&self, entry: &TimeEntry) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month { year, month } => {
                entry.date.year() == *year && entry.date.month() == month.number_from_month()
            }
        }
    }
}

/// 指定した日付の合計時間を計算する。
pub fn daily_sum(entries: &[TimeEntry], date: NaiveDate) -> f64 {
    entries
        .iter()
        .filter(|entry| entry.date == date)
        .fold(0.0, |acc, entry| acc + entry.hours)
}

/// 時間を上限判定用の整数の単位に変換する。有限でない値は上限を超えるものとして扱う。
fn to_units(hours: f64) -> i64 {
    if hours.is_finite() {
        (hours * UNITS_PER_HOUR).round() as i64
    } else {
        i64::MAX
    }
}

/// 新しいエントリーを追加しても1日の上限を超えないことを確認する。
///
/// # Arguments
///
/// * `candidate` - 検証済みのエントリー
/// * `stored` - 保存済みのエントリー。別の日付のものが含まれていても集計しない
pub fn check_daily_cap(candidate: &ValidEntry, stored: &[TimeEntry]) -> Result<(), EntryError> {
    let existing_units = stored
        .iter()
        .filter(|entry| entry.date == candidate.date)
        .fold(0i64, |acc, entry| acc.saturating_add(to_units(entry.hours)));
    let total_units = existing_units.saturating_add(to_units(candidate.hours));
    if total_units > to_units(MAX_HOURS_PER_DAY) {
        let existing = daily_sum(stored, candidate.date);
        return Err(EntryError::DailyCapExceeded {
            date: candidate.date,
            limit: MAX_HOURS_PER_DAY,
            existing,
            requested: candidate.hours,
        });
    }

    Ok(())
}

/// 表示用の時間。有限でない値は0として扱う。
fn display_hours(hours: f64) -> f64 {
    if hours.is_finite() {
        hours
    } else {
        0.0
    }
}

/// エントリーを日付ごとにまとめる。
///
/// 日付は新しい順、日付内のエントリーは作成日時の新しい順に並べる。
/// 作成日時が同じ場合は入力の順序を保つ。
pub fn group_by_date(entries: &[TimeEntry]) -> Vec<DayGroup> {
    let buckets: BTreeMap<NaiveDate, Vec<TimeEntry>> =
        entries.iter().fold(BTreeMap::new(), |mut acc, entry| {
            acc.entry(entry.date).or_default().push(entry.clone());
            acc
        });

    buckets
        .into_iter()
        .rev()
        .map(|(date, mut entries)| {
            entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            let total = entries
                .iter()
                .fold(0.0, |acc, entry| acc + display_hours(entry.hours));
            DayGroup {
                date,
                entries,
                total,
            }
        })
        .collect()
}

/// 条件に一致するエントリーだけを返す。
pub fn filter_by_month(entries: &[TimeEntry], filter: MonthFilter) -> Vec<TimeEntry> {
    entries
        .iter()
        .filter(|entry| filter.matches(entry))
        .cloned()
        .collect()
}

/// 絞り込み、日付ごとの集計、総計をまとめて行う。
pub fn build_history(entries: &[TimeEntry], filter: MonthFilter) -> History {
    let days = group_by_date(&filter_by_month(entries, filter));
    let grand_total = days.iter().fold(0.0, |acc, day| acc + day.total);

    History { days, grand_total }
}

/// データに存在する年を新しい順に返す。
pub fn available_years(entries: &[TimeEntry]) -> Vec<i32> {
    let years: BTreeSet<i32> = entries.iter().map(|entry| entry.date.year()).collect();
    years.into_iter().rev().collect()
}

/// 指定した年のデータに存在する月を新しい順に返す。
pub fn available_months(entries: &[TimeEntry], year: i32) -> Vec<Month> {
    let months: BTreeSet<u32> = entries
        .iter()
        .filter(|entry| entry.date.year() == year)
        .map(|entry| entry.date.month())
        .collect();
    months
        .into_iter()
        .rev()
        .filter_map(|month| u8::try_from(month).ok())
        .filter_map(|month| Month::try_from(month).ok())
        .collect()
}
