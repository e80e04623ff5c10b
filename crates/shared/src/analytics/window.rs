use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::round_to_tenth;
use crate::api::error::ValidationError;

pub const DEFAULT_DAYS: u32 = 30;

/// Inclusive `[start, end]` range ending now, `days` long
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub days: u32,
}

impl TimeWindow {
    pub fn ending_at(end: DateTime<Utc>, days: u32) -> Result<Self, ValidationError> {
        let start = TimeDelta::try_days(i64::from(days))
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or_else(|| ValidationError::field("days", "Too many days"))?;
        Ok(Self { start, end, days })
    }

    /// Parses the raw `days` query value. Missing means [`DEFAULT_DAYS`],
    /// anything that isn't a positive integer is rejected.
    pub fn resolve(days: Option<&str>, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let days = match days.map(str::trim) {
            None => DEFAULT_DAYS,
            Some(raw) => {
                let parsed: i64 = raw
                    .parse()
                    .map_err(|_| ValidationError::field("days", "Days must be an integer"))?;
                if parsed <= 0 {
                    return Err(ValidationError::field("days", "Days must be greater than 0"));
                }
                u32::try_from(parsed).map_err(|_| ValidationError::field("days", "Too many days"))?
            },
        };
        Self::ending_at(now, days)
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    pub fn time_period(&self) -> String {
        format!("Last {} days", self.days)
    }

    /// `count` spread over the window's weeks, one decimal. A zero length
    /// window reports 0.
    pub fn per_week(&self, count: usize) -> f64 {
        if self.days == 0 {
            return 0.0;
        }
        round_to_tenth(count as f64 / (f64::from(self.days) / 7.0))
    }
}

/// `?days=N` as it arrives on the query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindowQuery {
    pub days: Option<String>,
}

impl WindowQuery {
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<TimeWindow, ValidationError> {
        TimeWindow::resolve(self.days.as_deref(), now)
    }
}
