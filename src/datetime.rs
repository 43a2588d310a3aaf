use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

/// エントリーの作成日時として利用する現在のUTC時間を取得する。
#[cfg(not(test))]
pub fn now() -> DateTime<Utc> {
    Utc::now()
}


#[cfg(test)]
pub use mock_clock::now;

/// 日付をUTCの00:00:00に固定した日時に変換する。
///
/// 保存時の日付の表現で、利用者のタイムゾーンに依存しない。
pub fn start_of_utc_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}
