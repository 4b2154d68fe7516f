//! Pure aggregation over record snapshots. Nothing in here touches the
//! database or the clock; callers pass `today` in.

pub mod completion;
pub mod day_key;
pub mod mood_stats;
pub mod overview;
pub mod sleep_facts;
pub mod sleep_stats;
pub mod streak;
