use std::io::Write;

use anyhow::{Context, Result};

use crate::aggregation::History;
use crate::entry_service::Periods;
use crate::time_entry::TimeEntry;

/// Consoleにタイムエントリーを表示するためのtrait。
pub trait ConsolePresenter {
    /// 作成したタイムエントリーを表示する。
    fn show_entry(&mut self, entry: &TimeEntry) -> Result<()>;

    /// 日付ごとに集計した履歴を表示する。
    ///
    /// # Arguments
    ///
    /// * `history` - 表示する履歴
    fn show_history(&mut self, history: &History) -> Result<()>;

    /// 絞り込みに利用できる年と月を表示する。
    fn show_periods(&mut self, periods: &Periods) -> Result<()>;

    /// 削除したタイムエントリーのidを表示する。
    fn show_deleted(&mut self, id: u64) -> Result<()>;
}

/// Markdownのlist形式で表示する。
pub struct ConsoleMarkdownList<'a, W: Write> {
    writer: &'a mut W,
}

impl<'a, W: Write> ConsoleMarkdownList<'a, W> {
    /// 新しい`ConsoleMarkdownList`を返す。
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }

    fn write_entry(&mut self, entry: &TimeEntry) -> Result<()> {
        writeln!(
            self.writer,
            "- [{}] {} {:.2}h: {}",
            entry.id, entry.project, entry.hours, entry.description
        )
        .with_context(|| format!("Failed to write time entry: {:?}", entry))
    }
}

impl<'a, W: Write> ConsolePresenter for ConsoleMarkdownList<'a, W> {
    fn show_entry(&mut self, entry: &TimeEntry) -> Result<()> {
        writeln!(self.writer, "## {}", entry.date).context("Failed to write date")?;
        self.write_entry(entry)
    }

    // 日付の見出しの後にエントリーを並べ、最後に総計を表示する。
    fn show_history(&mut self, history: &History) -> Result<()> {
        for day in &history.days {
            writeln!(self.writer, "## {} ({:.2}h)", day.date, day.total)
                .with_context(|| format!("Failed to write day header: {}", day.date))?;
            for entry in &day.entries {
                self.write_entry(entry)?;
            }
        }
        writeln!(self.writer, "Total: {:.2}h", history.grand_total)
            .context("Failed to write grand total")?;

        Ok(())
    }

    fn show_periods(&mut self, periods: &Periods) -> Result<()> {
        for (year, months) in periods.iter().rev() {
            let months = months
                .iter()
                .map(|month| format!("{:02}", month.number_from_month()))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(self.writer, "- {}: {}", year, months)
                .with_context(|| format!("Failed to write period: {}", year))?;
        }

        Ok(())
    }

    fn show_deleted(&mut self, id: u64) -> Result<()> {
        writeln!(self.writer, "Deleted time entry {}", id)
            .with_context(|| format!("Failed to write deleted id: {}", id))
    }
}
