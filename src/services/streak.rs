use std::collections::BTreeSet;

use super::day_key::{DayCalendar, DayKey};

/// Consecutive completed days ending at `today`.
///
/// Walks backward one day at a time and stops at the first gap. If `today`
/// itself is missing the streak is 0; there are no grace days. The walk
/// never runs more than `completed.len() + 1` steps.
pub fn current_streak(completed: &BTreeSet<DayKey>, today: DayKey) -> u32 {
    let mut streak = 0;
    let mut check = Some(today);

    for _ in 0..=completed.len() {
        match check {
            Some(day) if completed.contains(&day) => {
                streak += 1;
                check = day.pred();
            }
            _ => break,
        }
    }

    streak
}

/// Longest run of consecutive days anywhere in the set.
pub fn longest_streak(completed: &BTreeSet<DayKey>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<DayKey> = None;

    for &day in completed {
        run = match prev {
            Some(p) if p.succ() == Some(day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);
    }

    longest
}

/// Current streak for a single habit's raw completion markers.
pub fn habit_streak<S: AsRef<str>>(calendar: &DayCalendar, markers: &[S], today: DayKey) -> u32 {
    current_streak(&calendar.collect_day_keys(markers), today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> DayKey {
        DayKey::from_ymd(2026, 2, 10).unwrap()
    }

    fn ago(n: u32) -> DayKey {
        today().days_before(n).unwrap()
    }

    fn set(days: &[DayKey]) -> BTreeSet<DayKey> {
        days.iter().copied().collect()
    }

    #[test]
    fn test_streak_empty() {
        assert_eq!(current_streak(&BTreeSet::new(), today()), 0);
        assert_eq!(longest_streak(&BTreeSet::new()), 0);
    }

    #[test]
    fn test_streak_single_today() {
        assert_eq!(current_streak(&set(&[today()]), today()), 1);
    }

    #[test]
    fn test_streak_consecutive() {
        let days = set(&[ago(2), ago(1), today()]);
        assert_eq!(current_streak(&days, today()), 3);
        assert_eq!(longest_streak(&days), 3);
    }

    #[test]
    fn test_streak_gap_breaks_current() {
        let days = set(&[today(), ago(2)]);
        assert_eq!(current_streak(&days, today()), 1);
    }

    #[test]
    fn test_streak_zero_without_today() {
        // yesterday alone gives no partial credit
        assert_eq!(current_streak(&set(&[ago(1), ago(2), ago(3)]), today()), 0);
        assert_eq!(current_streak(&set(&[ago(5), ago(9)]), today()), 0);
    }

    #[test]
    fn test_future_days_do_not_count() {
        let tomorrow = today().succ().unwrap();
        assert_eq!(current_streak(&set(&[tomorrow, today(), ago(1)]), today()), 2);
    }

    #[test]
    fn test_streak_crosses_month_and_year() {
        let new_year = DayKey::from_ymd(2026, 1, 1).unwrap();
        let days = set(&[
            new_year,
            DayKey::from_ymd(2025, 12, 31).unwrap(),
            DayKey::from_ymd(2025, 12, 30).unwrap(),
        ]);
        assert_eq!(current_streak(&days, new_year), 3);
    }

    #[test]
    fn test_longest_streak_ignores_today() {
        let days = set(&[ago(10), ago(9), ago(8), ago(7), ago(3), today()]);
        assert_eq!(longest_streak(&days), 4);
        assert_eq!(current_streak(&days, today()), 1);
    }

    #[test]
    fn test_habit_streak_normalizes_markers() {
        let cal = DayCalendar::utc();
        let markers = vec![
            "2026-02-10".to_string(),
            "Mon Feb 09 2026".to_string(),
            "2026-02-09".to_string(),
            "2026-02-08T21:00:00Z".to_string(),
            "not a date".to_string(),
        ];
        assert_eq!(habit_streak(&cal, &markers, today()), 3);
    }

    #[test]
    fn test_streak_idempotent() {
        let days = set(&[ago(1), today()]);
        assert_eq!(current_streak(&days, today()), current_streak(&days, today()));
    }
}
