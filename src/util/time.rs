use std::path::Path;

use chrono::{DateTime, Local, NaiveDateTime};

/// Label for a modification time relative to `now`:
/// `Today 14:05`, `Yesterday 09:30`, otherwise `03/11/2025 18:00`.
pub fn format_modified(modified: NaiveDateTime, now: NaiveDateTime) -> String {
    let day = modified.date();
    let today = now.date();
    if day == today {
        format!("Today {}", modified.format("%H:%M"))
    } else if today.pred_opt() == Some(day) {
        format!("Yesterday {}", modified.format("%H:%M"))
    } else {
        modified.format("%d/%m/%Y %H:%M").to_string()
    }
}

/// Last-modified label for a path in local time, or `Unknown` if it cannot
/// be read.
pub fn last_modified_label(path: &Path) -> String {
    match path.metadata().and_then(|m| m.modified()) {
        Ok(time) => {
            let modified: DateTime<Local> = time.into();
            format_modified(modified.naive_local(), Local::now().naive_local())
        }
        Err(_) => "Unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn same_day_is_today() {
        let now = at(2025, 3, 11, 18, 0);
        assert_eq!(format_modified(at(2025, 3, 11, 9, 5), now), "Today 09:05");
    }

    #[test]
    fn previous_day_is_yesterday_across_year_boundary() {
        let now = at(2025, 1, 1, 0, 10);
        assert_eq!(
            format_modified(at(2024, 12, 31, 23, 59), now),
            "Yesterday 23:59"
        );
    }

    #[test]
    fn older_dates_are_day_first() {
        let now = at(2025, 3, 11, 18, 0);
        assert_eq!(
            format_modified(at(2025, 2, 3, 7, 45), now),
            "03/02/2025 07:45"
        );
    }

    #[test]
    fn missing_path_is_unknown() {
        assert_eq!(
            last_modified_label(Path::new("/definitely/not/here")),
            "Unknown"
        );
    }

    #[test]
    fn fresh_directory_is_today() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(last_modified_label(tmp.path()).starts_with("Today "));
    }
}
