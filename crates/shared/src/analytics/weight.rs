use serde::{Deserialize, Serialize};

use super::{HistoryPoint, TimeWindow};
use crate::{api::response_errors::AnalyticsError, model::Profile};

/// Aggregates over the recorded weights, all `None` when nothing was recorded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightStats {
    pub avg: Option<f64>,
    pub max: Option<u16>,
    pub min: Option<u16>,
}

impl WeightStats {
    pub fn from_weights<I: IntoIterator<Item = u16>>(weights: I) -> Self {
        let mut stats = Self::default();
        let mut sum = 0u64;
        let mut count = 0u64;
        for w in weights {
            sum += u64::from(w);
            count += 1;
            stats.max = Some(stats.max.map_or(w, |m| m.max(w)));
            stats.min = Some(stats.min.map_or(w, |m| m.min(w)));
        }
        if count > 0 {
            stats.avg = Some(sum as f64 / count as f64);
        }
        stats
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightReport {
    pub time_period: String,
    pub current: Option<u16>,
    pub stats: WeightStats,
    pub history: Vec<HistoryPoint<Option<u16>>>,
}

impl WeightReport {
    /// `profiles` are the window's profiles, oldest first
    pub fn build(window: &TimeWindow, profiles: &[Profile]) -> Result<Self, AnalyticsError> {
        let latest = profiles.last().ok_or(AnalyticsError::NoProfileData)?;

        Ok(Self {
            time_period: window.time_period(),
            current: latest.weight,
            stats: WeightStats::from_weights(profiles.iter().filter_map(|p| p.weight)),
            history: profiles
                .iter()
                .map(|p| HistoryPoint {
                    date: p.created_at.date_naive(),
                    value: p.weight,
                })
                .collect(),
        })
    }
}
