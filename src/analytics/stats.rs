//! Pure projections from the raw logs; nothing here touches storage.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::models::{HappinessRating, MediaEntry};

pub const HAPPINESS_LEVELS: [i8; 5] = [-2, -1, 0, 1, 2];

// Band thresholds are a display choice for a rough association signal,
// not a statistical test.
const POSITIVE_BAND: f64 = 0.3;
const NEGATIVE_BAND: f64 = -0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CorrelationBand {
    Positive,
    Negative,
    Weak,
}

impl CorrelationBand {
    pub fn classify(r: f64) -> Self {
        if r > POSITIVE_BAND {
            CorrelationBand::Positive
        } else if r < NEGATIVE_BAND {
            CorrelationBand::Negative
        } else {
            CorrelationBand::Weak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CorrelationBand::Positive => "positive",
            CorrelationBand::Negative => "negative",
            CorrelationBand::Weak => "weak",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub days_tracked: usize,
    pub total_entries: usize,
    pub total_duration_minutes: u64,
    pub total_duration_hours: f64,
    pub average_happiness: f64,
    pub average_daily_duration: f64,
    pub correlation: f64,
    pub correlation_band: CorrelationBand,
}

/// Total minutes logged per calendar day.
pub fn daily_duration(entries: &[MediaEntry]) -> BTreeMap<NaiveDate, u64> {
    let mut totals = BTreeMap::new();
    for entry in entries {
        *totals.entry(entry.date).or_insert(0) += u64::from(entry.duration);
    }
    totals
}

/// The chart series: for each happiness level, the mean daily total of the
/// days rated at that level. Days with no logged media count as 0 minutes;
/// a level with no rated days yields 0.
pub fn average_duration_by_happiness(
    ratings: &[HappinessRating],
    entries: &[MediaEntry],
) -> BTreeMap<i8, f64> {
    let totals = daily_duration(entries);

    HAPPINESS_LEVELS
        .iter()
        .map(|&level| {
            let day_totals: Vec<u64> = ratings
                .iter()
                .filter(|r| r.happiness == level)
                .map(|r| totals.get(&r.date).copied().unwrap_or(0))
                .collect();
            let average = if day_totals.is_empty() {
                0.0
            } else {
                day_totals.iter().sum::<u64>() as f64 / day_totals.len() as f64
            };
            (level, average)
        })
        .collect()
}

/// Pearson's r over one (happiness, daily total duration) pair per rating,
/// using mean-centered sums. Defined as 0 when either variance term is
/// zero, which also covers the empty case.
pub fn correlation(ratings: &[HappinessRating], entries: &[MediaEntry]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }

    let totals = daily_duration(entries);
    let pairs: Vec<(f64, f64)> = ratings
        .iter()
        .map(|r| {
            let duration = totals.get(&r.date).copied().unwrap_or(0) as f64;
            (duration, f64::from(r.happiness))
        })
        .collect();

    let n = pairs.len() as f64;
    let mean_duration = pairs.iter().map(|(d, _)| d).sum::<f64>() / n;
    let mean_happiness = pairs.iter().map(|(_, h)| h).sum::<f64>() / n;

    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;
    let mut sum_y2 = 0.0;
    for (duration, happiness) in &pairs {
        let dx = duration - mean_duration;
        let dy = happiness - mean_happiness;
        sum_xy += dx * dy;
        sum_x2 += dx * dx;
        sum_y2 += dy * dy;
    }

    if sum_x2 * sum_y2 == 0.0 {
        0.0
    } else {
        sum_xy / (sum_x2 * sum_y2).sqrt()
    }
}

pub fn summary_stats(ratings: &[HappinessRating], entries: &[MediaEntry]) -> SummaryStats {
    let totals = daily_duration(entries);
    let total_duration_minutes: u64 = entries.iter().map(|e| u64::from(e.duration)).sum();

    let (average_happiness, average_daily_duration) = if ratings.is_empty() {
        (0.0, 0.0)
    } else {
        let n = ratings.len() as f64;
        let happiness_sum: f64 = ratings.iter().map(|r| f64::from(r.happiness)).sum();
        let duration_sum: f64 = ratings
            .iter()
            .map(|r| totals.get(&r.date).copied().unwrap_or(0) as f64)
            .sum();
        (happiness_sum / n, duration_sum / n)
    };

    let r = correlation(ratings, entries);

    SummaryStats {
        days_tracked: ratings.len(),
        total_entries: entries.len(),
        total_duration_minutes,
        total_duration_hours: total_duration_minutes as f64 / 60.0,
        average_happiness,
        average_daily_duration,
        correlation: r,
        correlation_band: CorrelationBand::classify(r),
    }
}
