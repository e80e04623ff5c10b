//! Reductions from windowed records to the reports served under
//! `/api/analytics`. Nothing in here touches the database, callers fetch the
//! records for a [`TimeWindow`] and hand them over in ascending time order.

mod window;
pub use window::*;

mod bmi;
pub use bmi::*;

mod weight;
pub use weight::*;

mod exercise;
pub use exercise::*;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Rounds to one decimal place
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint<T> {
    pub date: NaiveDate,
    pub value: T,
}
