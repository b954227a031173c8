use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use chrono::{Datelike, Days, Local, NaiveDate};

use crate::error::ScheduleError;
use crate::session::ClassSession;

/// The on-disk shape: date key (`YYYY-MM-DD`) to that day's sessions.
pub type ScheduleMap = BTreeMap<String, Vec<ClassSession>>;

const DEFAULT_PATH: &str = "data/schedule.json";
const CLASS_NAME: &str = "10A1";
const WEEKDAYS: u64 = 5;
const TIME_SLOTS: [&str; 4] = [
    "07:30-08:15",
    "08:20-09:05",
    "09:10-09:55",
    "10:00-10:45",
];
// Each subject has a two-teacher roster; the pick alternates with the
// day-index parity.
const SUBJECTS: [(&str, [&str; 2]); 4] = [
    ("Math", ["Mr. Archer", "Ms. Bell"]),
    ("Literature", ["Ms. Chau", "Ms. Dunn"]),
    ("English", ["Ms. Ellis", "Mr. Ford"]),
    ("Physics", ["Mr. Gray", "Mr. Holt"]),
];

/// Summary returned by a successful regeneration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateSummary {
    /// The Monday the generated week starts on.
    pub week_start: String,
    /// Total number of sessions written.
    pub total_classes: usize,
}

/// Aggregate report over the whole schedule file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleReport {
    /// Total number of sessions.
    pub total_classes: usize,
    /// Session count per teacher; values sum to `total_classes`.
    pub teacher_stats: BTreeMap<String, usize>,
    /// Number of dates that have at least one entry in the file.
    pub days_scheduled: usize,
}

/// A week-scoped view of the schedule file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeekSchedule {
    /// The Monday the week starts on.
    pub week_start: String,
    /// Total number of sessions across the five weekdays.
    pub total_classes: usize,
    /// The five weekday keys, each with that day's sessions (empty
    /// when the file has nothing for that date).
    pub schedule: ScheduleMap,
}

/// The schedule manager, bound to one JSON file.
#[derive(Clone, Debug)]
pub struct ScheduleStore {
    path: PathBuf,
}

impl Default for ScheduleStore {
    fn default() -> Self {
        Self::new(DEFAULT_PATH)
    }
}

impl ScheduleStore {
    /// Creates a store bound to the given file path.
    #[inline]
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Regenerates the schedule for the week `week_offset` weeks away
    /// from the current one and writes it to the file, replacing any
    /// previous content.
    pub fn generate(
        &self,
        week_offset: i64,
    ) -> Result<GenerateSummary, ScheduleError> {
        self.generate_for(Local::now().date_naive(), week_offset)
    }

    /// Like [`ScheduleStore::generate`], with an explicit "today".
    pub fn generate_for(
        &self,
        today: NaiveDate,
        week_offset: i64,
    ) -> Result<GenerateSummary, ScheduleError> {
        let start = week_start(today, week_offset)
            .ok_or(ScheduleError::InvalidOffset(week_offset))?;
        let mut schedule = ScheduleMap::new();

        for day in 0..WEEKDAYS {
            let date = start
                .checked_add_days(Days::new(day))
                .ok_or(ScheduleError::InvalidOffset(week_offset))?;
            let date_str = date.format("%Y-%m-%d").to_string();

            let sessions = SUBJECTS
                .iter()
                .enumerate()
                .map(|(slot, (subject, roster))| {
                    let teacher = roster[(day % 2) as usize];
                    ClassSession {
                        title: format!("{subject} - {CLASS_NAME}"),
                        date: date_str.clone(),
                        time: TIME_SLOTS[slot].to_string(),
                        teacher: teacher.to_string(),
                        class: CLASS_NAME.to_string(),
                        subject: subject.to_string(),
                    }
                })
                .collect();
            schedule.insert(date_str, sessions);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(ScheduleError::Io)?;
            }
        }
        let json = serde_json::to_string_pretty(&schedule)?;
        fs::write(&self.path, json).map_err(ScheduleError::Io)?;

        let total_classes =
            schedule.values().map(|sessions| sessions.len()).sum();
        info!(
            "wrote {} sessions to {}",
            total_classes,
            self.path.display()
        );
        Ok(GenerateSummary {
            week_start: start.format("%Y-%m-%d").to_string(),
            total_classes,
        })
    }

    /// Loads the whole schedule file.
    pub fn read(&self) -> Result<ScheduleMap, ScheduleError> {
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Loads a single date's sessions; a date absent from the file
    /// yields an empty sequence.
    pub fn read_day(
        &self,
        date: &str,
    ) -> Result<Vec<ClassSession>, ScheduleError> {
        let mut schedule = self.read()?;
        Ok(schedule.remove(date).unwrap_or_default())
    }

    /// Computes the aggregate report over the whole file.
    pub fn analyze(&self) -> Result<ScheduleReport, ScheduleError> {
        let schedule = self.read()?;

        let total_classes =
            schedule.values().map(|sessions| sessions.len()).sum();
        let mut teacher_stats: BTreeMap<String, usize> = BTreeMap::new();
        for session in schedule.values().flatten() {
            *teacher_stats.entry(session.teacher.clone()).or_default() += 1;
        }

        Ok(ScheduleReport {
            total_classes,
            teacher_stats,
            days_scheduled: schedule.len(),
        })
    }

    /// Returns the week-scoped view for the week `week_offset` weeks
    /// away from the current one.
    pub fn week(
        &self,
        week_offset: i64,
    ) -> Result<WeekSchedule, ScheduleError> {
        self.week_for(Local::now().date_naive(), week_offset)
    }

    /// Like [`ScheduleStore::week`], with an explicit "today".
    ///
    /// A missing schedule file yields a week of empty days rather than
    /// an error.
    pub fn week_for(
        &self,
        today: NaiveDate,
        week_offset: i64,
    ) -> Result<WeekSchedule, ScheduleError> {
        let start = week_start(today, week_offset)
            .ok_or(ScheduleError::InvalidOffset(week_offset))?;
        let mut stored = match self.read() {
            Ok(schedule) => schedule,
            Err(ScheduleError::Missing) => ScheduleMap::new(),
            Err(err) => return Err(err),
        };

        let mut schedule = ScheduleMap::new();
        for day in 0..WEEKDAYS {
            let date = start
                .checked_add_days(Days::new(day))
                .ok_or(ScheduleError::InvalidOffset(week_offset))?;
            let date_str = date.format("%Y-%m-%d").to_string();
            let sessions = stored.remove(&date_str).unwrap_or_default();
            schedule.insert(date_str, sessions);
        }

        let total_classes =
            schedule.values().map(|sessions| sessions.len()).sum();
        Ok(WeekSchedule {
            week_start: start.format("%Y-%m-%d").to_string(),
            total_classes,
            schedule,
        })
    }
}

/// Returns the Monday of the week containing `today`, shifted by
/// `week_offset` weeks, or `None` when the shift leaves the range of
/// representable dates.
fn week_start(today: NaiveDate, week_offset: i64) -> Option<NaiveDate> {
    let monday = today.checked_sub_days(Days::new(
        today.weekday().num_days_from_monday() as u64,
    ))?;
    let shift_days = week_offset.checked_mul(7)?;
    monday.checked_add_signed(chrono::Duration::try_days(shift_days)?)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    // 2026-08-24 is a Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 24).unwrap()
    }

    fn store_in(dir: &tempfile::TempDir) -> ScheduleStore {
        ScheduleStore::new(dir.path().join("schedule.json"))
    }

    #[test]
    fn test_week_start_mid_week() {
        let thursday = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();
        assert_eq!(week_start(thursday, 0), Some(monday()));
        assert_eq!(
            week_start(thursday, 1),
            NaiveDate::from_ymd_opt(2026, 8, 31)
        );
        assert_eq!(
            week_start(thursday, -1),
            NaiveDate::from_ymd_opt(2026, 8, 17)
        );
    }

    #[test]
    fn test_out_of_range_offset_is_rejected() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        // Offsets that leave the representable date range must surface
        // as an error instead of aborting the process.
        assert!(matches!(
            store.week_for(monday(), 9_999_999_999),
            Err(ScheduleError::InvalidOffset(9_999_999_999))
        ));
        assert!(matches!(
            store.generate_for(monday(), 9_999_999_999),
            Err(ScheduleError::InvalidOffset(_))
        ));
        assert!(matches!(
            store.generate_for(monday(), i64::MIN),
            Err(ScheduleError::InvalidOffset(_))
        ));

        // Nothing was written by the failed generation.
        assert!(matches!(store.read(), Err(ScheduleError::Missing)));
    }

    #[test]
    fn test_generate_then_read_round_trip() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let summary = store.generate_for(monday(), 0).unwrap();
        assert_eq!(summary.week_start, "2026-08-24");
        assert_eq!(summary.total_classes, 20);

        let schedule = store.read().unwrap();
        assert_eq!(schedule.len(), 5);
        for (date, sessions) in &schedule {
            assert_eq!(sessions.len(), 4);
            for session in sessions {
                assert_eq!(&session.date, date);
                assert_eq!(session.class, "10A1");
            }
        }
    }

    #[test]
    fn test_teacher_alternates_with_day_parity() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.generate_for(monday(), 0).unwrap();

        let schedule = store.read().unwrap();
        let monday_math = &schedule["2026-08-24"][0];
        let tuesday_math = &schedule["2026-08-25"][0];
        let wednesday_math = &schedule["2026-08-26"][0];
        assert_eq!(monday_math.subject, "Math");
        assert_eq!(monday_math.teacher, "Mr. Archer");
        assert_eq!(tuesday_math.teacher, "Ms. Bell");
        assert_eq!(wednesday_math.teacher, monday_math.teacher);
    }

    #[test]
    fn test_analyze_fresh_schedule() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.generate_for(monday(), 0).unwrap();

        let report = store.analyze().unwrap();
        assert_eq!(report.total_classes, 20);
        assert_eq!(report.days_scheduled, 5);
        assert_eq!(report.teacher_stats.values().sum::<usize>(), 20);
    }

    #[test]
    fn test_week_view() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.generate_for(monday(), 0).unwrap();

        let week = store.week_for(monday(), 0).unwrap();
        assert_eq!(week.week_start, "2026-08-24");
        assert_eq!(week.total_classes, 20);
        assert_eq!(week.schedule.len(), 5);

        // The next week has no entries in the file yet.
        let next = store.week_for(monday(), 1).unwrap();
        assert_eq!(next.week_start, "2026-08-31");
        assert_eq!(next.total_classes, 0);
        assert_eq!(next.schedule.len(), 5);
        assert!(next.schedule.values().all(|s| s.is_empty()));
    }

    #[test]
    fn test_week_view_without_file() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let week = store.week_for(monday(), 0).unwrap();
        assert_eq!(week.total_classes, 0);
        assert_eq!(week.schedule.len(), 5);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        assert!(matches!(store.read(), Err(ScheduleError::Missing)));
        assert!(matches!(store.analyze(), Err(ScheduleError::Missing)));
    }

    #[test]
    fn test_read_day() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.generate_for(monday(), 0).unwrap();

        let sessions = store.read_day("2026-08-24").unwrap();
        assert_eq!(sessions.len(), 4);
        // Saturday is never scheduled.
        assert!(store.read_day("2026-08-29").unwrap().is_empty());
    }

    #[test]
    fn test_regenerate_replaces_previous_week() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.generate_for(monday(), 0).unwrap();
        store.generate_for(monday(), 1).unwrap();

        let schedule = store.read().unwrap();
        assert_eq!(schedule.len(), 5);
        assert!(schedule.contains_key("2026-08-31"));
        assert!(!schedule.contains_key("2026-08-24"));
    }
}
