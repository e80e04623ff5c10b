use serde::{Deserialize, Serialize};

use super::{round_to_tenth, HistoryPoint, TimeWindow};
use crate::{api::response_errors::AnalyticsError, model::Profile};

/// Body mass index from centimeters and kilograms, one decimal. Undefined
/// when either measurement is missing or zero.
pub fn bmi(height_cm: Option<u16>, weight_kg: Option<u16>) -> Option<f64> {
    let (height_cm, weight_kg) = (height_cm?, weight_kg?);
    if height_cm == 0 || weight_kg == 0 {
        return None;
    }
    let height_m = f64::from(height_cm) / 100.0;
    Some(round_to_tenth(f64::from(weight_kg) / (height_m * height_m)))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiReport {
    pub time_period: String,
    pub current: Option<f64>,
    pub history: Vec<HistoryPoint<f64>>,
}

impl BmiReport {
    /// `profiles` are the window's profiles, oldest first
    pub fn build(window: &TimeWindow, profiles: &[Profile]) -> Result<Self, AnalyticsError> {
        let latest = profiles.last().ok_or(AnalyticsError::NoProfileData)?;
        let history = profiles
            .iter()
            .filter_map(|p| {
                p.bmi().map(|value| HistoryPoint {
                    date: p.created_at.date_naive(),
                    value,
                })
            })
            .collect();

        Ok(Self {
            time_period: window.time_period(),
            current: latest.bmi(),
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{model::ProfileStatus, types::Uuid};

    fn profile(day: u32, height: Option<u16>, weight: Option<u16>) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            height,
            weight,
            location: String::new(),
            birth_date: None,
            created_at: Utc.with_ymd_and_hms(2024, 3, day, 8, 0, 0).unwrap(),
            status: ProfileStatus::Historical,
        }
    }

    fn window() -> TimeWindow {
        TimeWindow::ending_at(Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap(), 30).unwrap()
    }

    #[test]
    fn bmi_of_seventy_kilos_at_one_seventy_five() {
        assert_eq!(bmi(Some(175), Some(70)), Some(22.9));
        assert_eq!(bmi(None, Some(70)), None);
        assert_eq!(bmi(Some(175), None), None);
        assert_eq!(bmi(Some(0), Some(70)), None);
    }

    #[test]
    fn history_skips_profiles_without_bmi() {
        let profiles = [
            profile(2, Some(175), Some(70)),
            profile(3, None, Some(71)),
            profile(4, Some(175), Some(72)),
        ];
        let report = BmiReport::build(&window(), &profiles).unwrap();
        assert_eq!(report.current, Some(23.5));
        assert_eq!(report.history.len(), 2);
        assert_eq!(report.history[0].value, 22.9);
        assert_eq!(report.history[1].date.to_string(), "2024-03-04");
    }

    #[test]
    fn current_is_null_when_latest_profile_is_incomplete() {
        let profiles = [profile(2, Some(175), Some(70)), profile(3, Some(175), None)];
        let report = BmiReport::build(&window(), &profiles).unwrap();
        assert_eq!(report.current, None);
        assert_eq!(report.history.len(), 1);
    }

    #[test]
    fn empty_window_has_no_data() {
        assert_eq!(BmiReport::build(&window(), &[]), Err(AnalyticsError::NoProfileData));
    }
}
