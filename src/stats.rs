//! stats.rs: usage counters ("rooms helped", likes, shared links, ...).
//!
//! The core never reads these. The store sits behind `UsageCounters` so a
//! real key-value backend can replace the in-memory one without touching callers.

use metrics::counter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatName {
    Helped,
    Likes,
    Dislikes,
    Pdfs,
    Links,
}

impl StatName {
    pub const ALL: [StatName; 5] = [
        StatName::Helped,
        StatName::Likes,
        StatName::Dislikes,
        StatName::Pdfs,
        StatName::Links,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatName::Helped => "helped",
            StatName::Likes => "likes",
            StatName::Dislikes => "dislikes",
            StatName::Pdfs => "pdfs",
            StatName::Links => "links",
        }
    }
}

impl fmt::Display for StatName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatName::ALL
            .into_iter()
            .find(|n| n.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown stat '{s}'"))
    }
}

/// Atomic increment + read-all. No invariants beyond monotonic counts.
pub trait UsageCounters: Send + Sync {
    /// Add one and return the new value.
    fn increment(&self, stat: StatName) -> u64;
    fn snapshot(&self) -> BTreeMap<StatName, u64>;
}

#[derive(Debug, Default)]
pub struct InMemoryCounters {
    inner: Mutex<BTreeMap<StatName, u64>>,
}

impl InMemoryCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing totals (e.g. carried over from a previous deployment).
    pub fn with_seed(seed: &BTreeMap<StatName, u64>) -> Self {
        Self {
            inner: Mutex::new(seed.clone()),
        }
    }
}

impl UsageCounters for InMemoryCounters {
    fn increment(&self, stat: StatName) -> u64 {
        let value = {
            let mut map = self.inner.lock().unwrap_or_else(|p| p.into_inner());
            let slot = map.entry(stat).or_insert(0);
            *slot = slot.saturating_add(1);
            *slot
        };
        counter!("rent_split_usage_total", "stat" => stat.as_str()).increment(1);
        debug!(target: "stats", %stat, value, "incremented");
        value
    }

    fn snapshot(&self) -> BTreeMap<StatName, u64> {
        let map = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        StatName::ALL
            .into_iter()
            .map(|s| (s, map.get(&s).copied().unwrap_or(0)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increments_from_seed() {
        let mut seed = BTreeMap::new();
        seed.insert(StatName::Links, 10);
        let c = InMemoryCounters::with_seed(&seed);
        assert_eq!(c.increment(StatName::Links), 11);
        assert_eq!(c.increment(StatName::Likes), 1);
        let snap = c.snapshot();
        assert_eq!(snap[&StatName::Links], 11);
        assert_eq!(snap[&StatName::Dislikes], 0);
        assert_eq!(snap.len(), 5);
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("PDFS".parse::<StatName>().unwrap(), StatName::Pdfs);
        assert!("clicks".parse::<StatName>().is_err());
    }

    #[test]
    fn snapshot_serializes_with_lowercase_keys() {
        let c = InMemoryCounters::new();
        c.increment(StatName::Helped);
        let v = serde_json::to_value(c.snapshot()).unwrap();
        assert_eq!(v["helped"], serde_json::json!(1));
    }
}
