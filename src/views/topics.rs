use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::models::suit::Suit;

const DAY_MS: u64 = 24 * 60 * 60 * 1000;

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct TopicStat {
    /// Tag without the leading '#', lowercased.
    pub hashtag: String,
    pub count: u64,
    /// Occurrences in suits created within the last 24 hours.
    pub active_today: u64,
}

fn hashtag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"#\w+").expect("hashtag pattern is valid"))
}

/// Hashtag usage across a set of suits, most-used first. Ties keep
/// alphabetical order from the accumulation map.
pub fn topic_stats(suits: &[Suit], now_ms: u64) -> Vec<TopicStat> {
    let one_day_ago = now_ms.saturating_sub(DAY_MS);
    let mut counts: BTreeMap<String, (u64, u64)> = BTreeMap::new();

    for suit in suits {
        let is_recent = suit.timestamp_ms >= one_day_ago;
        for tag in hashtag_pattern().find_iter(&suit.content) {
            let tag = tag.as_str().trim_start_matches('#').to_ascii_lowercase();
            let entry = counts.entry(tag).or_insert((0, 0));
            entry.0 += 1;
            if is_recent {
                entry.1 += 1;
            }
        }
    }

    let mut stats: Vec<TopicStat> = counts
        .into_iter()
        .map(|(hashtag, (count, active_today))| TopicStat {
            hashtag,
            count,
            active_today,
        })
        .collect();
    stats.sort_by_key(|stat| std::cmp::Reverse(stat.count));
    stats
}
