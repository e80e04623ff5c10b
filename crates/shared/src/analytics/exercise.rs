use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{round_to_tenth, TimeWindow};
use crate::{api::response_errors::AnalyticsError, types::Uuid};

/// The parts of a workout log the exercise report needs, joined with the date
/// of its session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseLogEntry {
    pub session_id: Uuid,
    pub session_date: NaiveDate,
    pub sets: u16,
    pub reps: u16,
    pub weight: Option<f64>,
}

impl ExerciseLogEntry {
    /// sets × reps
    pub fn rep_volume(&self) -> u64 {
        u64::from(self.sets) * u64::from(self.reps)
    }

    /// sets × reps × weight. A missing weight counts as 1 kg, a logged 0 stays 0.
    pub fn load_volume(&self) -> f64 {
        self.rep_volume() as f64 * self.weight.unwrap_or(1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSummary {
    pub total_volume: u64,
    pub sessions_per_week: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencySummary {
    pub total_sessions: usize,
    pub sessions_per_week: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionPoint {
    pub session_date: NaiveDate,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    pub percentage: f64,
    /// Whole days between the first and last session
    pub time_span: i64,
    pub first_volume: f64,
    pub last_volume: f64,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

impl Improvement {
    /// Change from the first to the last entry. Needs two entries and a
    /// non-zero starting volume.
    pub fn between(entries: &[ExerciseLogEntry]) -> Option<Self> {
        if entries.len() < 2 {
            return None;
        }
        let (first, last) = (entries.first()?, entries.last()?);
        let first_volume = first.load_volume();
        let last_volume = last.load_volume();
        if first_volume == 0.0 {
            return None;
        }

        Some(Self {
            percentage: round_to_tenth((last_volume - first_volume) / first_volume * 100.0),
            time_span: (last.session_date - first.session_date).num_days(),
            first_volume,
            last_volume,
            first_date: first.session_date,
            last_date: last.session_date,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseReport {
    pub exercise: String,
    pub time_period: String,
    pub volume: VolumeSummary,
    pub frequency: FrequencySummary,
    pub progression: Vec<ProgressionPoint>,
    pub last_improvement: Option<Improvement>,
}

impl ExerciseReport {
    /// Entries are ordered by session date here, keeping the incoming order
    /// for logs of the same day.
    pub fn build(
        window: &TimeWindow,
        exercise_name: &str,
        entries: &[ExerciseLogEntry],
    ) -> Result<Self, AnalyticsError> {
        if entries.is_empty() {
            return Err(AnalyticsError::NoWorkoutData);
        }
        let mut entries = entries.to_vec();
        entries.sort_by_key(|e| e.session_date);

        let sessions: HashSet<Uuid> = entries.iter().map(|e| e.session_id).collect();

        Ok(Self {
            exercise: exercise_name.to_string(),
            time_period: window.time_period(),
            volume: VolumeSummary {
                total_volume: entries.iter().map(ExerciseLogEntry::rep_volume).sum(),
                sessions_per_week: window.per_week(entries.len()),
            },
            frequency: FrequencySummary {
                total_sessions: sessions.len(),
                sessions_per_week: window.per_week(sessions.len()),
            },
            progression: entries
                .iter()
                .map(|e| ProgressionPoint {
                    session_date: e.session_date,
                    volume: e.load_volume(),
                })
                .collect(),
            last_improvement: Improvement::between(&entries),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn entry(session_id: Uuid, day: u32, sets: u16, reps: u16, weight: Option<f64>) -> ExerciseLogEntry {
        ExerciseLogEntry {
            session_id,
            session_date: date(day),
            sets,
            reps,
            weight,
        }
    }

    fn window(days: u32) -> TimeWindow {
        TimeWindow::ending_at(Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap(), days).unwrap()
    }

    #[test]
    fn rep_volume_and_load_progression() {
        let entries = [
            entry(Uuid::new_v4(), 10, 3, 10, Some(50.0)),
            entry(Uuid::new_v4(), 17, 4, 8, Some(60.0)),
        ];
        let report = ExerciseReport::build(&window(14), "Squat", &entries).unwrap();
        assert_eq!(report.exercise, "Squat");
        assert_eq!(report.volume.total_volume, 62);
        assert_eq!(report.volume.sessions_per_week, 1.0);
        assert_eq!(report.frequency.total_sessions, 2);
        let volumes: Vec<f64> = report.progression.iter().map(|p| p.volume).collect();
        assert_eq!(volumes, [1500.0, 1920.0]);

        let improvement = report.last_improvement.unwrap();
        assert_eq!(improvement.percentage, 28.0);
        assert_eq!(improvement.time_span, 7);
        assert_eq!(improvement.first_date, date(10));
        assert_eq!(improvement.last_date, date(17));
    }

    #[test]
    fn frequency_counts_distinct_sessions() {
        let session = Uuid::new_v4();
        let entries = [
            entry(session, 3, 3, 10, Some(40.0)),
            entry(session, 3, 3, 8, Some(45.0)),
            entry(Uuid::new_v4(), 5, 3, 10, Some(45.0)),
        ];
        let report = ExerciseReport::build(&window(7), "Row", &entries).unwrap();
        assert_eq!(report.frequency.total_sessions, 2);
        assert_eq!(report.frequency.sessions_per_week, 2.0);
        assert_eq!(report.volume.sessions_per_week, 3.0);
    }

    #[test]
    fn same_day_entries_keep_their_order() {
        let session = Uuid::new_v4();
        let entries = [
            entry(session, 9, 1, 1, Some(100.0)),
            entry(session, 8, 1, 1, Some(10.0)),
            entry(session, 9, 1, 1, Some(200.0)),
        ];
        let report = ExerciseReport::build(&window(30), "Deadlift", &entries).unwrap();
        let volumes: Vec<f64> = report.progression.iter().map(|p| p.volume).collect();
        assert_eq!(volumes, [10.0, 100.0, 200.0]);
    }

    #[test]
    fn zero_length_window_reports_zero_rates() {
        let entries = [entry(Uuid::new_v4(), 30, 3, 10, None)];
        let report = ExerciseReport::build(&window(0), "Push up", &entries).unwrap();
        assert_eq!(report.volume.sessions_per_week, 0.0);
        assert_eq!(report.frequency.sessions_per_week, 0.0);
    }

    #[test]
    fn improvement_needs_two_logs_and_a_base() {
        let single = [entry(Uuid::new_v4(), 1, 3, 10, Some(50.0))];
        assert_eq!(Improvement::between(&single), None);

        let zero_base = [
            entry(Uuid::new_v4(), 1, 3, 10, Some(0.0)),
            entry(Uuid::new_v4(), 2, 3, 10, Some(50.0)),
        ];
        assert_eq!(Improvement::between(&zero_base), None);

        let bodyweight = [
            entry(Uuid::new_v4(), 1, 2, 10, None),
            entry(Uuid::new_v4(), 4, 3, 10, None),
        ];
        let improvement = Improvement::between(&bodyweight).unwrap();
        assert_eq!(improvement.first_volume, 20.0);
        assert_eq!(improvement.percentage, 50.0);
        assert_eq!(improvement.time_span, 3);
    }

    #[test]
    fn empty_window_has_no_data() {
        assert_eq!(
            ExerciseReport::build(&window(30), "Squat", &[]),
            Err(AnalyticsError::NoWorkoutData)
        );
    }
}
