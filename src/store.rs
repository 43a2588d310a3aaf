use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::datetime;
use crate::time_entry::{Project, TimeEntry, ValidEntry};

const ENTRIES_FILE_NAME: &str = "entries.json";

/// タイムエントリーを保存するストア。
#[cfg_attr(test, mockall::automock)]
pub trait EntryStore {
    /// 全てのタイムエントリーを取得する。
    fn list_all(&self) -> Result<Vec<TimeEntry>>;

    /// 指定した日付のタイムエントリーを取得する。
    fn find_by_date(&self, date: NaiveDate) -> Result<Vec<TimeEntry>>;

    /// タイムエントリーを保存し、`id`と`created_at`を割り当てたものを返す。
    fn insert(&self, entry: ValidEntry) -> Result<TimeEntry>;

    /// タイムエントリーを削除する。対象が存在しない場合は`false`を返す。
    fn delete_by_id(&self, id: u64) -> Result<bool>;
}

/// JSONファイルに保存する際のタイムエントリー。
///
/// 日付はUTCの00:00:00に固定した日時として保存する。
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    id: u64,
    date: DateTime<Utc>,
    project: Project,
    #[serde(default)]
    hours: f64,
    description: String,
    created_at: DateTime<Utc>,
}

impl From<StoredEntry> for TimeEntry {
    fn from(stored: StoredEntry) -> Self {
        TimeEntry {
            id: stored.id,
            date: stored.date.date_naive(),
            project: stored.project,
            hours: stored.hours,
            description: stored.description,
            created_at: stored.created_at,
        }
    }
}

impl From<&TimeEntry> for StoredEntry {
    fn from(entry: &TimeEntry) -> Self {
        StoredEntry {
            id: entry.id,
            date: datetime::start_of_utc_day(entry.date),
            project: entry.project,
            hours: entry.hours,
            description: entry.description.clone(),
            created_at: entry.created_at,
        }
    }
}

/// JSONファイルにタイムエントリーを保存するストア。
///
/// 同じプロセス内の読み書きは直列化するが、別プロセスからの書き込みとは協調しない。
pub struct FileEntryStore {
    file_path: PathBuf,
    lock: Mutex<()>,
}

impl FileEntryStore {
    /// 新しい`FileEntryStore`を返す。
    ///
    /// ディレクトリが存在しない場合は作成する。
    ///
    /// # Arguments
    ///
    /// * `data_dir` - `entries.json`を置くディレクトリ
    pub fn new(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        Ok(Self {
            file_path: data_dir.join(ENTRIES_FILE_NAME),
            lock: Mutex::new(()),
        })
    }

    fn read_entries(&self) -> Result<Vec<TimeEntry>> {
        let file = match File::open(&self.file_path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to open entries file: {}", self.file_path.display())
                })
            }
        };
        let stored: Vec<StoredEntry> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse entries file: {}", self.file_path.display()))?;
        debug!("Read {} entries from {}", stored.len(), self.file_path.display());

        Ok(stored.into_iter().map(TimeEntry::from).collect())
    }

    fn write_entries(&self, entries: &[TimeEntry]) -> Result<()> {
        let stored: Vec<StoredEntry> = entries.iter().map(StoredEntry::from).collect();
        let tmp_path = self.file_path.with_extension("json.tmp");
        {
            let file = File::create(&tmp_path)
                .with_context(|| format!("Failed to create file: {}", tmp_path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &stored)
                .context("Failed to serialize entries")?;
            writer.flush().context("Failed to flush entries file")?;
        }
        fs::rename(&tmp_path, &self.file_path).with_context(|| {
            format!("Failed to replace entries file: {}", self.file_path.display())
        })?;

        Ok(())
    }

    fn locked<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| anyhow!("Entries file lock is poisoned"))?;
        f()
    }
}

impl EntryStore for FileEntryStore {
    fn list_all(&self) -> Result<Vec<TimeEntry>> {
        self.locked(|| self.read_entries())
    }

    fn find_by_date(&self, date: NaiveDate) -> Result<Vec<TimeEntry>> {
        let entries = self.locked(|| self.read_entries())?;
        Ok(entries.into_iter().filter(|entry| entry.date == date).collect())
    }

    fn insert(&self, entry: ValidEntry) -> Result<TimeEntry> {
        self.locked(|| {
            let mut entries = self.read_entries()?;
            let id = entries.iter().map(|e| e.id).max().unwrap_or(0) + 1;
            let created = TimeEntry {
                id,
                date: entry.date,
                project: entry.project,
                hours: entry.hours,
                description: entry.description,
                created_at: datetime::now(),
            };
            entries.push(created.clone());
            self.write_entries(&entries)?;
            Ok(created)
        })
    }

    fn delete_by_id(&self, id: u64) -> Result<bool> {
        self.locked(|| {
            let mut entries = self.read_entries()?;
            let before = entries.len();
            entries.retain(|entry| entry.id != id);
            if entries.len() == before {
                return Ok(false);
            }
            self.write_entries(&entries)?;
            Ok(true)
        })
    }
}


#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use chrono::{NaiveDate, TimeZone, Utc};

    use super::{EntryStore, FileEntryStore};
    use crate::datetime::mock_clock;
    use crate::time_entry::{Project, ValidEntry};

    /// テストごとの一時ディレクトリ。スコープを抜けると削除する。
    struct TempDir(PathBuf);

    impl TempDir {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir().join(format!("worklog-{}-{}", name, std::process::id()));
            let _ = fs::remove_dir_all(&dir);
            TempDir(dir)
        }

        fn path(&self) -> &Path {
            &self.0
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    fn valid(day: u32, hours: f64) -> ValidEntry {
        ValidEntry {
            date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            project: Project::PersonalDevelopment,
            hours,
            description: "reading".to_string(),
        }
    }

    #[test]
    fn test_file_store_without_file_is_empty() {
        let temp = TempDir::new("empty");
        let dir = temp.path();
        let store = FileEntryStore::new(&dir).unwrap();

        assert!(store.list_all().unwrap().is_empty());
        assert!(dir.exists());
    }

    #[test]
    fn test_file_store_insert_assigns_id_and_created_at() {
        let temp = TempDir::new("insert");
        let dir = temp.path();
        let store = FileEntryStore::new(&dir).unwrap();
        let time = Utc.with_ymd_and_hms(2026, 1, 29, 18, 0, 0).unwrap();
        mock_clock::set_mock_time(time);

        let first = store.insert(valid(29, 10.0)).unwrap();
        let second = store.insert(valid(30, 5.0)).unwrap();
        mock_clock::clear_mock_time();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.created_at, time);
        let reopened = FileEntryStore::new(&dir).unwrap();
        assert_eq!(reopened.list_all().unwrap(), vec![first.clone(), second]);
        assert_eq!(
            reopened
                .find_by_date(NaiveDate::from_ymd_opt(2026, 1, 29).unwrap())
                .unwrap(),
            vec![first]
        );
    }

    /// 日付はUTCの00:00:00として保存される。
    #[test]
    fn test_file_store_persists_date_as_start_of_utc_day() {
        let temp = TempDir::new("date-format");
        let dir = temp.path();
        let store = FileEntryStore::new(&dir).unwrap();

        store.insert(valid(29, 1.0)).unwrap();

        let json = fs::read_to_string(dir.join("entries.json")).unwrap();
        assert!(json.contains("\"date\": \"2026-01-29T00:00:00Z\""), "{}", json);
        assert!(json.contains("\"project\": \"Personal Development\""), "{}", json);
    }

    #[test]
    fn test_file_store_delete() {
        let temp = TempDir::new("delete");
        let dir = temp.path();
        let store = FileEntryStore::new(&dir).unwrap();
        let first = store.insert(valid(29, 10.0)).unwrap();
        let second = store.insert(valid(29, 14.0)).unwrap();

        assert!(store.delete_by_id(second.id).unwrap());
        assert!(!store.delete_by_id(second.id).unwrap());
        assert!(!store.delete_by_id(99).unwrap());
        assert_eq!(store.list_all().unwrap(), vec![first]);
    }

    /// `hours`がない保存データは0時間として読み込む。
    #[test]
    fn test_file_store_reads_missing_hours_as_zero() {
        let temp = TempDir::new("missing-hours");
        let dir = temp.path();
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("entries.json"),
            r#"[{"id":3,"date":"2026-01-29T00:00:00Z","project":"Client A","description":"legacy","created_at":"2026-01-29T10:00:00Z"}]"#,
        )
        .unwrap();
        let store = FileEntryStore::new(&dir).unwrap();

        let entries = store.list_all().unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].hours, 0.0);
        assert_eq!(entries[0].project, Project::ClientA);
    }

    #[test]
    fn test_temp_dir_is_removed_on_drop() {
        let temp = TempDir::new("cleanup");
        let dir = temp.path().to_path_buf();
        FileEntryStore::new(&dir).unwrap().insert(valid(29, 1.0)).unwrap();
        assert!(dir.join("entries.json").exists());

        drop(temp);

        assert!(!dir.exists());
    }

    #[test]
    fn test_file_store_rejects_broken_file() {
        let temp = TempDir::new("broken");
        let dir = temp.path();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("entries.json"), "not json").unwrap();
        let store = FileEntryStore::new(&dir).unwrap();

        let error = store.list_all().unwrap_err();

        assert!(error.to_string().contains("Failed to parse entries file"));
    }
}
