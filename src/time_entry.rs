use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 1日あたりに記録できる合計時間の上限。
pub const MAX_HOURS_PER_DAY: f64 = 24.0;

/// 作業時間を記録できるプロジェクト。
///
/// 固定の集合であり、利用者が追加することはできない。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Project {
    #[serde(rename = "Viso Internal")]
    VisoInternal,
    #[serde(rename = "Client A")]
    ClientA,
    #[serde(rename = "Client B")]
    ClientB,
    #[serde(rename = "Personal Development")]
    PersonalDevelopment,
}

impl Project {
    /// 全てのプロジェクト。
    pub const ALL: [Project; 4] = [
        Project::VisoInternal,
        Project::ClientA,
        Project::ClientB,
        Project::PersonalDevelopment,
    ];

    /// 表示用のラベルを返す。
    pub fn label(&self) -> &'static str {
        match self {
            Project::VisoInternal => "Viso Internal",
            Project::ClientA => "Client A",
            Project::ClientB => "Client B",
            Project::PersonalDevelopment => "Personal Development",
        }
    }

    /// ラベルに完全一致するプロジェクトを返す。
    pub fn from_label(label: &str) -> Option<Project> {
        Project::ALL.into_iter().find(|project| project.label() == label)
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 保存済みのタイムエントリー。
///
/// `id`と`created_at`はストアが割り当てる。
#[derive(Clone, Debug, PartialEq)]
pub struct TimeEntry {
    pub id: u64,
    pub date: NaiveDate,
    pub project: Project,
    pub hours: f64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// タイムエントリー作成のリクエスト。
///
/// 値は入力のままで、検証前の状態を表す。
#[derive(Clone, Debug, PartialEq)]
pub struct NewTimeEntry {
    pub date: String,
    pub project: String,
    pub hours: f64,
    pub description: String,
}

/// 形式の検証を通過したタイムエントリー作成のリクエスト。
#[derive(Clone, Debug, PartialEq)]
pub struct ValidEntry {
    pub date: NaiveDate,
    pub project: Project,
    pub hours: f64,
    pub description: String,
}
