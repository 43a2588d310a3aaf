use chrono::NaiveDate;

use crate::error::EntryError;
use crate::time_entry::{NewTimeEntry, Project, ValidEntry};

/// タイムエントリー作成のリクエストの形式を検証する。
///
/// 保存済みのデータは参照しない。上限時間の確認は`aggregation::check_daily_cap`で行う。
///
/// # Arguments
///
/// * `request` - 検証するリクエスト
pub fn validate(request: &NewTimeEntry) -> Result<ValidEntry, EntryError> {
    let date = parse_entry_date(&request.date)?;

    let project = Project::from_label(&request.project).ok_or_else(|| {
        EntryError::invalid_shape(
            "project",
            format!("unknown project `{}`", request.project),
        )
    })?;

    // 0.25刻みの制約はない
    if !request.hours.is_finite() || request.hours <= 0.0 {
        return Err(EntryError::invalid_shape(
            "hours",
            format!("expected a positive number, got {}", request.hours),
        ));
    }

    let description = request.description.trim();
    if description.is_empty() {
        return Err(EntryError::invalid_shape("description", "must not be empty"));
    }

    Ok(ValidEntry {
        date,
        project,
        hours: request.hours,
        description: description.to_string(),
    })
}

/// `YYYY-MM-DD`形式の日付をパースする。
///
/// chronoは桁数の少ない月日も受け付けるため、先に形を確認する。
pub fn parse_entry_date(s: &str) -> Result<NaiveDate, EntryError> {
    let bytes = s.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(EntryError::invalid_shape(
            "date",
            format!("expected YYYY-MM-DD, got `{}`", s),
        ));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
        EntryError::invalid_shape("date", format!("`{}` is not a calendar date: {}", s, e))
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::rstest;

    use super::validate;
    use crate::error::EntryError;
    use crate::time_entry::{NewTimeEntry, Project};

    fn request(date: &str, project: &str, hours: f64, description: &str) -> NewTimeEntry {
        NewTimeEntry {
            date: date.to_string(),
            project: project.to_string(),
            hours,
            description: description.to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_request() {
        let valid = validate(&request("2026-01-29", "Client A", 2.5, "  review  ")).unwrap();

        assert_eq!(valid.date, NaiveDate::from_ymd_opt(2026, 1, 29).unwrap());
        assert_eq!(valid.project, Project::ClientA);
        assert_eq!(valid.hours, 2.5);
        assert_eq!(valid.description, "review");
    }

    /// 1日の上限を超える時間でも、単体のエントリーとしては受け付ける。
    #[rstest]
    #[case::quarter(0.25)]
    #[case::odd_step(0.1)]
    #[case::over_a_day(30.0)]
    fn test_validate_accepts_any_positive_hours(#[case] hours: f64) {
        assert!(validate(&request("2026-01-29", "Client B", hours, "work")).is_ok());
    }

    #[rstest]
    #[case::empty_date(request("", "Client A", 1.0, "work"), "date")]
    #[case::slashes(request("2026/01/29", "Client A", 1.0, "work"), "date")]
    #[case::short_month(request("2026-1-29", "Client A", 1.0, "work"), "date")]
    #[case::with_time(request("2026-01-29T00:00:00Z", "Client A", 1.0, "work"), "date")]
    #[case::not_a_day(request("2026-02-30", "Client A", 1.0, "work"), "date")]
    #[case::month_13(request("2026-13-01", "Client A", 1.0, "work"), "date")]
    #[case::unknown_project(request("2026-01-29", "Client C", 1.0, "work"), "project")]
    #[case::empty_project(request("2026-01-29", "", 1.0, "work"), "project")]
    #[case::zero_hours(request("2026-01-29", "Client A", 0.0, "work"), "hours")]
    #[case::negative_hours(request("2026-01-29", "Client A", -1.0, "work"), "hours")]
    #[case::nan_hours(request("2026-01-29", "Client A", f64::NAN, "work"), "hours")]
    #[case::infinite_hours(request("2026-01-29", "Client A", f64::INFINITY, "work"), "hours")]
    #[case::empty_description(request("2026-01-29", "Client A", 1.0, ""), "description")]
    #[case::blank_description(request("2026-01-29", "Client A", 1.0, " \t\n"), "description")]
    fn test_validate_rejects_invalid_shape(
        #[case] input: NewTimeEntry,
        #[case] expected_field: &str,
    ) {
        match validate(&input) {
            Err(EntryError::InvalidShape { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
