use std::collections::BTreeSet;

use serde::Serialize;

use super::day_key::{DayCalendar, DayKey};
use super::streak::current_streak;
use crate::models::sleep::Sleep;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepSummary {
    pub nights_logged: usize,
    pub average_duration: Option<f64>,
    pub average_quality: Option<f64>,
    /// Consecutive days, ending today, with a logged night.
    pub streak: u32,
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    Some((avg * 10.0).round() / 10.0)
}

pub fn summarize_sleep(calendar: &DayCalendar, sleeps: &[Sleep], today: DayKey) -> SleepSummary {
    let nights: BTreeSet<DayKey> = sleeps.iter().map(|s| calendar.day_key(&s.date)).collect();
    let durations: Vec<f64> = sleeps.iter().filter_map(|s| s.duration).collect();
    let qualities: Vec<f64> = sleeps
        .iter()
        .filter_map(|s| s.quality.map(f64::from))
        .collect();

    SleepSummary {
        nights_logged: nights.len(),
        average_duration: mean(&durations),
        average_quality: mean(&qualities),
        streak: current_streak(&nights, today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sleep::fixtures::sleep_on;
    use chrono::{TimeZone, Utc};

    fn today() -> DayKey {
        DayKey::from_ymd(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize_sleep(&DayCalendar::utc(), &[], today());
        assert_eq!(summary, SleepSummary::default());
    }

    #[test]
    fn test_summary_averages_and_streak() {
        let night = |d: u32, h: u32| Utc.with_ymd_and_hms(2026, 10, d, h, 0, 0).unwrap();
        let sleeps = vec![
            sleep_on(night(19, 7), Some(7.5), Some(8)),
            sleep_on(night(18, 7), Some(6.0), None),
            sleep_on(night(18, 14), None, Some(5)),
            sleep_on(night(16, 7), Some(8.25), Some(9)),
        ];
        let summary = summarize_sleep(&DayCalendar::utc(), &sleeps, today());
        assert_eq!(summary.nights_logged, 3);
        assert_eq!(summary.average_duration, Some(7.3));
        assert_eq!(summary.average_quality, Some(7.3));
        assert_eq!(summary.streak, 2);
    }
}
