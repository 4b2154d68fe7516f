//! Which calendar days count as "completed".
//!
//! A day is completed when the user logged at least one mood on it, or when
//! every one of their habits was completed on it. Finishing some habits but
//! not all earns nothing; a user with no habits can only complete days by
//! logging moods.

use std::collections::BTreeSet;

use super::day_key::{DayCalendar, DayKey};
use crate::models::habit::Habit;
use crate::models::mood::Mood;

/// All completed days for a user.
pub fn completed_days(calendar: &DayCalendar, moods: &[Mood], habits: &[Habit]) -> BTreeSet<DayKey> {
    let mut days: BTreeSet<DayKey> = moods.iter().map(|m| calendar.day_key(&m.date)).collect();

    let per_habit: Vec<BTreeSet<DayKey>> = habits
        .iter()
        .map(|h| calendar.collect_day_keys(&h.completed_dates))
        .collect();

    if let Some((first, rest)) = per_habit.split_first() {
        days.extend(
            first
                .iter()
                .filter(|day| rest.iter().all(|other| other.contains(*day)))
                .copied(),
        );
    }

    days
}

/// Single-day form of [`completed_days`]; the two always agree.
pub fn is_day_completed(calendar: &DayCalendar, day: DayKey, moods: &[Mood], habits: &[Habit]) -> bool {
    if moods.iter().any(|m| calendar.day_key(&m.date) == day) {
        return true;
    }

    !habits.is_empty()
        && habits
            .iter()
            .all(|h| is_completed_on(calendar, &h.completed_dates, day))
}

/// Whether one habit's markers include `day`.
pub fn is_completed_on<S: AsRef<str>>(calendar: &DayCalendar, markers: &[S], day: DayKey) -> bool {
    markers
        .iter()
        .any(|m| calendar.parse_day_key(m.as_ref()).ok() == Some(day))
}

/// Days on which at least one habit was completed.
pub fn any_habit_days(calendar: &DayCalendar, habits: &[Habit]) -> BTreeSet<DayKey> {
    habits
        .iter()
        .flat_map(|h| calendar.collect_day_keys(&h.completed_dates))
        .collect()
}

/// Flip `day` in a habit's markers. Every marker naming `day` is removed if
/// any exists; otherwise the canonical key is appended. Returns whether the
/// day is completed afterwards.
pub fn toggle_day(calendar: &DayCalendar, markers: &mut Vec<String>, day: DayKey) -> bool {
    let before = markers.len();
    markers.retain(|m| calendar.parse_day_key(m).ok() != Some(day));
    if markers.len() < before {
        return false;
    }
    markers.push(day.to_string());
    true
}
