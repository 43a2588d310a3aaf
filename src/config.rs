use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::LevelFilter;

/// データディレクトリを指定する環境変数。
pub const DATA_DIR_ENV: &str = "WORKLOG_DATA_DIR";

/// 実行時の設定。
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_level: LevelFilter,
}

impl Config {
    /// 新しい`Config`を返す。
    ///
    /// データディレクトリは引数、環境変数`WORKLOG_DATA_DIR`、OSのデータディレクトリの順に決める。
    ///
    /// # Arguments
    ///
    /// * `data_dir` - コマンドラインで指定されたデータディレクトリ
    /// * `verbose` - `-v`の指定回数
    pub fn new(data_dir: Option<PathBuf>, verbose: u64) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => match env::var_os(DATA_DIR_ENV) {
                Some(dir) if !dir.is_empty() => PathBuf::from(dir),
                _ => dirs::data_dir()
                    .context("Failed to find data directory, set WORKLOG_DATA_DIR")?
                    .join("worklog"),
            },
        };

        Ok(Self {
            data_dir,
            log_level: log_level(verbose),
        })
    }
}

fn log_level(verbose: u64) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}
