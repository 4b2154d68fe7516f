use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SleepFact {
    pub icon: &'static str,
    pub title: &'static str,
    pub fact: &'static str,
    pub category: &'static str,
}

const fn fact(icon: &'static str, title: &'static str, fact: &'static str, category: &'static str) -> SleepFact {
    SleepFact {
        icon,
        title,
        fact,
        category,
    }
}

pub static SLEEP_FACTS: &[SleepFact] = &[
    fact("🌙", "Sleep Cycles", "A full sleep cycle takes about 90 minutes. Most people need 4-6 cycles per night for optimal rest.", "science"),
    fact("⏰", "Circadian Rhythm", "Your body has a natural 24-hour cycle. Going to bed at the same time helps regulate it and improves sleep quality.", "science"),
    fact("💤", "Deep Sleep", "Deep sleep happens in the first half of the night. It's crucial for physical recovery and immune function.", "science"),
    fact("🧠", "REM Sleep", "REM sleep increases as the night progresses. It's when most dreaming occurs and helps with memory consolidation.", "science"),
    fact("📊", "Sleep Debt", "You can't fully \"catch up\" on lost sleep, but consistent good sleep helps maintain balance and recovery.", "health"),
    fact("🌡️", "Temperature", "Your body temperature drops during sleep. A cool room (65-68°F or 18-20°C) promotes better sleep quality.", "tips"),
    fact("📱", "Blue Light", "Blue light from screens can delay sleep by suppressing melatonin. Try avoiding screens 1 hour before bed.", "tips"),
    fact("☕", "Caffeine", "Caffeine has a half-life of 5-6 hours. Avoid it at least 6 hours before bedtime for better sleep.", "tips"),
    fact("🧘", "Relaxation", "A relaxing bedtime routine signals your body it's time to sleep. Try reading, meditation, or gentle stretching.", "tips"),
    fact("🛏️", "Bedroom Environment", "Keep your bedroom dark, quiet, and cool. These conditions help your body enter deep sleep faster.", "tips"),
    fact("⏳", "Sleep Latency", "It typically takes 10-20 minutes to fall asleep. If it takes much longer, consider adjusting your routine.", "health"),
    fact("🌅", "Morning Light", "Exposure to natural light in the morning helps reset your circadian rhythm and improves sleep at night.", "tips"),
];

/// Pick a random fact, restricted to `category` when it matches any.
/// Unknown categories fall back to the whole catalogue.
pub fn random_fact<R: Rng + ?Sized>(category: Option<&str>, rng: &mut R) -> Option<&'static SleepFact> {
    let filtered: Vec<&'static SleepFact> = match category {
        Some(c) => SLEEP_FACTS.iter().filter(|f| f.category == c).collect(),
        None => Vec::new(),
    };

    if filtered.is_empty() {
        SLEEP_FACTS.choose(rng)
    } else {
        filtered.choose(rng).copied()
    }
}
