//! Dashboard overview.
//!
//! [`compose`] is a pure function over a snapshot of the user's records;
//! fetching the snapshot is the handler's job.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::completion::{completed_days, is_completed_on, is_day_completed};
use super::day_key::{DayCalendar, DayKey};
use super::mood_stats::{trend, MoodTrendPoint};
use super::sleep_stats::{summarize_sleep, SleepSummary};
use super::streak::{current_streak, longest_streak};
use crate::models::habit::Habit;
use crate::models::journal::Journal;
use crate::models::mood::Mood;
use crate::models::sleep::Sleep;

pub const MAX_ACTIVITIES: usize = 5;
pub const RECENT_MOOD_ACTIVITIES: usize = 3;

/// Records fetched for one overview request.
#[derive(Debug, Clone, Default)]
pub struct OverviewSnapshot {
    /// All of the user's moods.
    pub moods: Vec<Mood>,
    /// Most recently created journals.
    pub journals: Vec<Journal>,
    pub habits: Vec<Habit>,
    /// Sleeps from the overview window.
    pub sleeps: Vec<Sleep>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Mood,
    Journal,
    Habit,
}

impl ActivityKind {
    pub fn color(self) -> &'static str {
        match self {
            Self::Mood => "bg-[#D97757]",
            Self::Journal => "bg-[#78716C]",
            Self::Habit => "bg-[#5E8B7E]",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub text: String,
    pub date: DateTime<Utc>,
    pub color: &'static str,
}

impl Activity {
    fn new(kind: ActivityKind, text: String, date: DateTime<Utc>) -> Self {
        Self {
            kind,
            text,
            date,
            color: kind.color(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    pub total_habits: usize,
    pub completed_today: usize,
    pub streak: u32,
    /// Whether today already counts toward the streak
    pub today_completed: bool,
}

/// A habit annotated for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitSummary {
    #[serde(flatten)]
    pub habit: Habit,
    pub streak: u32,
    pub longest_streak: u32,
    pub completed: bool,
}

impl HabitSummary {
    pub fn build(calendar: &DayCalendar, mut habit: Habit, today: DayKey) -> Self {
        let days = calendar.collect_day_keys(&habit.completed_dates);
        habit.icon_name = Some(habit.resolved_icon());
        Self {
            streak: current_streak(&days, today),
            longest_streak: longest_streak(&days),
            completed: days.contains(&today),
            habit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub mood_data: Vec<MoodTrendPoint>,
    pub activities: Vec<Activity>,
    pub stats: OverviewStats,
    pub habits: Vec<HabitSummary>,
    pub sleep: SleepSummary,
}

/// First day of the activity and sleep lookback.
pub fn lookback_start(today: DayKey, window_days: u32) -> DayKey {
    today.days_before(window_days).unwrap_or(today)
}

fn recent_activities(
    calendar: &DayCalendar,
    snapshot: &OverviewSnapshot,
    window_start: DayKey,
) -> Vec<Activity> {
    let mut recent_moods: Vec<&Mood> = snapshot
        .moods
        .iter()
        .filter(|m| calendar.day_key(&m.date) >= window_start)
        .collect();
    recent_moods.sort_by(|a, b| b.date.cmp(&a.date));

    let moods = recent_moods
        .into_iter()
        .take(RECENT_MOOD_ACTIVITIES)
        .map(|m| {
            Activity::new(
                ActivityKind::Mood,
                format!("Logged mood: {}", m.label()),
                m.date,
            )
        });

    let journals = snapshot.journals.iter().map(|j| {
        Activity::new(
            ActivityKind::Journal,
            format!("Journal entry: {}", j.preview()),
            j.created_at,
        )
    });

    let habits = snapshot.habits.iter().filter_map(|h| {
        let last = calendar.collect_day_keys(&h.completed_dates).into_iter().next_back()?;
        Some(Activity::new(
            ActivityKind::Habit,
            format!("Completed: {}", h.name),
            calendar.start_of_day(last),
        ))
    });

    let mut activities: Vec<Activity> = moods.chain(journals).chain(habits).collect();
    activities.sort_by(|a, b| b.date.cmp(&a.date));
    activities.truncate(MAX_ACTIVITIES);
    activities
}

/// Build the dashboard overview for `today`.
///
/// `window_days` sizes the mood trend. Mood activities and the sleep summary
/// look back from the start of `today - window_days`, one day further than
/// the trend.
pub fn compose(
    calendar: &DayCalendar,
    snapshot: &OverviewSnapshot,
    today: DayKey,
    window_days: u32,
) -> Overview {
    let window_start = lookback_start(today, window_days);

    let streak = current_streak(
        &completed_days(calendar, &snapshot.moods, &snapshot.habits),
        today,
    );
    let completed_today = snapshot
        .habits
        .iter()
        .filter(|h| is_completed_on(calendar, &h.completed_dates, today))
        .count();

    let recent_sleeps: Vec<Sleep> = snapshot
        .sleeps
        .iter()
        .filter(|s| calendar.day_key(&s.date) >= window_start)
        .cloned()
        .collect();

    Overview {
        mood_data: trend(calendar, &snapshot.moods, window_days, today),
        activities: recent_activities(calendar, snapshot, window_start),
        stats: OverviewStats {
            total_habits: snapshot.habits.len(),
            completed_today,
            streak,
            today_completed: is_day_completed(calendar, today, &snapshot.moods, &snapshot.habits),
        },
        habits: snapshot
            .habits
            .iter()
            .cloned()
            .map(|h| HabitSummary::build(calendar, h, today))
            .collect(),
        sleep: summarize_sleep(calendar, &recent_sleeps, today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::habit::fixtures::habit_with_dates;
    use crate::models::journal::fixtures::journal_at;
    use crate::models::mood::fixtures::mood_at;
    use crate::models::sleep::fixtures::sleep_on;
    use chrono::TimeZone;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, d, h, 0, 0).unwrap()
    }

    fn today() -> DayKey {
        DayKey::from_ymd(2026, 10, 19).unwrap()
    }

    fn snapshot() -> OverviewSnapshot {
        OverviewSnapshot {
            moods: vec![
                mood_at(9, at(19, 8), &["calm"]),
                mood_at(4, at(18, 22), &[]),
                mood_at(6, at(15, 9), &[]),
                mood_at(2, at(2, 9), &[]),
            ],
            journals: vec![journal_at("Long walk by the river this evening", at(18, 21))],
            habits: vec![
                habit_with_dates("Read", &["2026-10-17", "2026-10-16", "2026-10-19"]),
                habit_with_dates("Stretch", &["Sat Oct 17 2026", "2026-10-16"]),
            ],
            sleeps: vec![sleep_on(at(19, 7), Some(7.0), Some(6))],
        }
    }

    #[test]
    fn test_empty_snapshot() {
        let overview = compose(&DayCalendar::utc(), &OverviewSnapshot::default(), today(), 7);
        assert_eq!(overview.mood_data.len(), 7);
        assert!(overview.activities.is_empty());
        assert_eq!(
            overview.stats,
            OverviewStats {
                total_habits: 0,
                completed_today: 0,
                streak: 0,
                today_completed: false,
            }
        );
        assert!(overview.habits.is_empty());
    }

    #[test]
    fn test_streak_combines_moods_and_full_habit_days() {
        let overview = compose(&DayCalendar::utc(), &snapshot(), today(), 7);
        // 19 and 18 by mood, 17 and 16 by both habits, 15 by mood
        assert_eq!(overview.stats.streak, 5);
        assert_eq!(overview.stats.total_habits, 2);
        assert_eq!(overview.stats.completed_today, 1);
        assert!(overview.stats.today_completed);
    }

    #[test]
    fn test_habits_annotated() {
        let overview = compose(&DayCalendar::utc(), &snapshot(), today(), 7);
        let read = &overview.habits[0];
        assert_eq!(read.streak, 1);
        assert_eq!(read.longest_streak, 2);
        assert!(read.completed);
        assert_eq!(read.habit.icon_name.as_deref(), Some("heart"));

        let stretch = &overview.habits[1];
        assert_eq!(stretch.streak, 0);
        assert!(!stretch.completed);
    }

    #[test]
    fn test_activities_merged_most_recent_first() {
        let overview = compose(&DayCalendar::utc(), &snapshot(), today(), 7);
        let texts: Vec<&str> = overview.activities.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Logged mood: Great",
                "Completed: Read",
                "Logged mood: Low",
                "Journal entry: Long walk by the river this ev...",
                "Completed: Stretch",
            ]
        );
        assert!(overview.activities.len() <= MAX_ACTIVITIES);
        assert_eq!(overview.activities[0].color, "bg-[#D97757]");
    }

    #[test]
    fn test_old_moods_excluded_from_activities_but_not_streak() {
        let overview = compose(&DayCalendar::utc(), &snapshot(), today(), 7);
        assert!(overview
            .activities
            .iter()
            .all(|a| a.text != "Logged mood: Very Low"));
    }

    #[test]
    fn test_serialized_shape() {
        let overview = compose(&DayCalendar::utc(), &snapshot(), today(), 7);
        let json = serde_json::to_value(&overview).unwrap();
        assert!(json["moodData"].is_array());
        assert_eq!(json["stats"]["totalHabits"], 2);
        assert_eq!(json["stats"]["completedToday"], 1);
        assert_eq!(json["activities"][0]["type"], "mood");
        assert_eq!(json["habits"][0]["name"], "Read");
        assert_eq!(json["habits"][0]["completedDates"][0], "2026-10-17");
        assert_eq!(json["habits"][0]["completed"], true);
        assert_eq!(json["sleep"]["nightsLogged"], 1);
    }

    #[test]
    fn test_compose_idempotent() {
        let cal = DayCalendar::utc();
        let snap = snapshot();
        assert_eq!(compose(&cal, &snap, today(), 7), compose(&cal, &snap, today(), 7));
    }

    #[test]
    fn test_lookback_reaches_window_days_back() {
        let snap = OverviewSnapshot {
            moods: vec![mood_at(7, at(12, 0), &[]), mood_at(3, at(11, 23), &[])],
            sleeps: vec![sleep_on(at(12, 6), Some(8.0), None)],
            ..OverviewSnapshot::default()
        };
        let overview = compose(&DayCalendar::utc(), &snap, today(), 7);
        let texts: Vec<&str> = overview.activities.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(texts, vec!["Logged mood: Good"]);
        assert_eq!(overview.sleep.nights_logged, 1);
        // the trend itself stays seven days long
        assert_eq!(overview.mood_data.len(), 7);
        assert_eq!(lookback_start(today(), 7), DayKey::from_ymd(2026, 10, 12).unwrap());
    }
}
