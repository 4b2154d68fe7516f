//! Mood aggregates: summary, trend window and insights.
//!
//! Every "most common" pick in here is stable: when two candidates tie, the
//! one seen first in the input wins.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Utc, Weekday};
use serde::Serialize;

use super::day_key::{DayCalendar, DayKey};
use crate::models::mood::Mood;

pub const TOP_TAGS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MoodBucket {
    VeryHigh,
    High,
    Neutral,
    Low,
    VeryLow,
}

impl MoodBucket {
    pub const ALL: [MoodBucket; 5] = [
        MoodBucket::VeryHigh,
        MoodBucket::High,
        MoodBucket::Neutral,
        MoodBucket::Low,
        MoodBucket::VeryLow,
    ];

    /// veryHigh >= 8, high [6,8), neutral [4,6), low [2,4), veryLow < 2.
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 8 => Self::VeryHigh,
            s if s >= 6 => Self::High,
            s if s >= 4 => Self::Neutral,
            s if s >= 2 => Self::Low,
            _ => Self::VeryLow,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::VeryHigh => "Very High",
            Self::High => "High",
            Self::Neutral => "Neutral",
            Self::Low => "Low",
            Self::VeryLow => "Very Low",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodDistribution {
    pub very_high: usize,
    pub high: usize,
    pub neutral: usize,
    pub low: usize,
    pub very_low: usize,
}

impl MoodDistribution {
    fn bump(&mut self, bucket: MoodBucket) {
        let slot = match bucket {
            MoodBucket::VeryHigh => &mut self.very_high,
            MoodBucket::High => &mut self.high,
            MoodBucket::Neutral => &mut self.neutral,
            MoodBucket::Low => &mut self.low,
            MoodBucket::VeryLow => &mut self.very_low,
        };
        *slot += 1;
    }

    pub fn count(&self, bucket: MoodBucket) -> usize {
        match bucket {
            MoodBucket::VeryHigh => self.very_high,
            MoodBucket::High => self.high,
            MoodBucket::Neutral => self.neutral,
            MoodBucket::Low => self.low,
            MoodBucket::VeryLow => self.very_low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodStatsSummary {
    pub total: usize,
    pub average_score: f64,
    pub distribution: MoodDistribution,
    pub top_tags: Vec<TagCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodTrendPoint {
    pub date: DateTime<Utc>,
    pub score: Option<i32>,
    pub has_data: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketCount {
    pub bucket: MoodBucket,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodInsights {
    pub window_days: u32,
    pub entries: usize,
    pub most_common_mood: Option<BucketCount>,
    pub busiest_weekday: Option<String>,
    pub top_tag: Option<TagCount>,
    pub entries_per_day: f64,
    pub messages: Vec<String>,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Occurrence counts in first-seen order.
fn tally<K, I>(items: I) -> Vec<(K, usize)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();
    for item in items {
        match index.get(&item) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(item.clone(), counts.len());
                counts.push((item, 1));
            }
        }
    }
    counts
}

/// Highest count; earlier entries win ties.
fn most_common<K: Clone>(counts: &[(K, usize)]) -> Option<(K, usize)> {
    counts
        .iter()
        .fold(None::<&(K, usize)>, |best, entry| match best {
            Some(b) if b.1 >= entry.1 => Some(b),
            _ => Some(entry),
        })
        .filter(|(_, count)| *count > 0)
        .cloned()
}

fn ranked_tags(moods: &[Mood], limit: usize) -> Vec<TagCount> {
    let mut counts = tally(moods.iter().flat_map(|m| m.tags.iter().map(String::as_str)));
    // stable: equal counts keep first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(limit)
        .map(|(name, count)| TagCount {
            name: name.to_string(),
            count,
        })
        .collect()
}

pub fn summarize(moods: &[Mood]) -> MoodStatsSummary {
    if moods.is_empty() {
        return MoodStatsSummary::default();
    }

    let total = moods.len();
    let sum: i64 = moods.iter().map(|m| i64::from(m.score)).sum();

    let mut distribution = MoodDistribution::default();
    for mood in moods {
        distribution.bump(MoodBucket::from_score(mood.score));
    }

    MoodStatsSummary {
        total,
        average_score: round1(sum as f64 / total as f64),
        distribution,
        top_tags: ranked_tags(moods, TOP_TAGS),
    }
}

/// One point per day for the `window_days` days ending at `today`, oldest
/// first. When several moods share a day the first one in `moods` is used.
pub fn trend(calendar: &DayCalendar, moods: &[Mood], window_days: u32, today: DayKey) -> Vec<MoodTrendPoint> {
    let keyed: Vec<(DayKey, i32)> = moods
        .iter()
        .map(|m| (calendar.day_key(&m.date), m.score))
        .collect();

    (0..window_days)
        .rev()
        .filter_map(|back| today.days_before(back))
        .map(|day| {
            let score = keyed.iter().find(|(d, _)| *d == day).map(|(_, s)| *s);
            MoodTrendPoint {
                date: calendar.start_of_day(day),
                score,
                has_data: score.is_some(),
            }
        })
        .collect()
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Narrative insights over the moods logged in the last `window_days` days.
pub fn insights(calendar: &DayCalendar, moods: &[Mood], window_days: u32, today: DayKey) -> MoodInsights {
    let window_days = window_days.max(1);
    let Some(first_day) = today.days_before(window_days - 1) else {
        return MoodInsights {
            window_days,
            ..MoodInsights::default()
        };
    };

    let recent: Vec<(&Mood, DayKey)> = moods
        .iter()
        .map(|m| (m, calendar.day_key(&m.date)))
        .filter(|(_, d)| *d >= first_day && *d <= today)
        .collect();

    let bucket_counts: Vec<(MoodBucket, usize)> = {
        let mut distribution = MoodDistribution::default();
        for (m, _) in &recent {
            distribution.bump(MoodBucket::from_score(m.score));
        }
        MoodBucket::ALL
            .iter()
            .map(|b| (*b, distribution.count(*b)))
            .collect()
    };
    let most_common_mood =
        most_common(&bucket_counts).map(|(bucket, count)| BucketCount { bucket, count });

    let weekday_counts = tally(recent.iter().map(|(_, d)| weekday_name(d.weekday())));
    let busiest_weekday = most_common(&weekday_counts).map(|(name, _)| name.to_string());

    let tag_counts = tally(
        recent
            .iter()
            .flat_map(|(m, _)| m.tags.iter().map(String::as_str)),
    );
    let top_tag = most_common(&tag_counts).map(|(name, count)| TagCount {
        name: name.to_string(),
        count,
    });

    let entries = recent.len();
    let entries_per_day = round1(entries as f64 / f64::from(window_days));

    let mut messages = Vec::new();
    if let Some(m) = &most_common_mood {
        messages.push(format!(
            "Your most common mood is \"{}\" ({} times)",
            m.bucket.label(),
            m.count
        ));
    }
    if let Some(day) = &busiest_weekday {
        messages.push(format!("You logged the most on {day}s"));
    }
    if let Some(tag) = &top_tag {
        messages.push(format!(
            "\"{}\" appears in {} of your entries",
            tag.name, tag.count
        ));
    }
    if entries > 0 {
        messages.push(format!(
            "You logged {entries_per_day:.1} entries per day on average"
        ));
    }

    MoodInsights {
        window_days,
        entries,
        most_common_mood,
        busiest_weekday,
        top_tag,
        entries_per_day,
        messages,
    }
}
