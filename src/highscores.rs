//! High score leaderboard system
//!
//! One top-10 list per game variant (control mode x speed). In-memory only;
//! entries are serializable so a host can snapshot them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of high scores kept per variant
pub const MAX_HIGH_SCORES: usize = 10;

/// Variants that always have a (possibly empty) list
pub const DEFAULT_VARIANTS: [&str; 3] = ["buttons_slow", "buttons_fast", "sensors"];

/// A finished game's score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Coins collected
    pub coins: u32,
    /// Seconds survived
    pub seconds: u32,
    /// Latitude where the game ended
    pub lat: f64,
    /// Longitude where the game ended
    pub lon: f64,
}

impl Score {
    pub fn new(coins: u32, seconds: u32, lat: f64, lon: f64) -> Self {
        Self {
            coins,
            seconds,
            lat,
            lon,
        }
    }

    /// Ranking value (coins x seconds)
    pub fn value(&self) -> u64 {
        self.coins as u64 * self.seconds as u64
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Score: {}  (c:{}  d:{})",
            self.value(),
            self.coins,
            self.seconds
        )
    }
}

/// Per-variant high score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaderboard {
    boards: BTreeMap<String, Vec<Score>>,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Leaderboard {
    /// Create a leaderboard with empty lists for the default variants
    pub fn new() -> Self {
        let boards = DEFAULT_VARIANTS
            .iter()
            .map(|key| (key.to_string(), Vec::with_capacity(MAX_HIGH_SCORES + 1)))
            .collect();
        Self { boards }
    }

    /// Check if a value would make it onto the variant's list
    pub fn qualifies(&self, variant: &str, value: u64) -> bool {
        match self.boards.get(variant) {
            Some(entries) if entries.len() >= MAX_HIGH_SCORES => {
                entries.last().map(|e| value > e.value()).unwrap_or(true)
            }
            _ => true,
        }
    }

    /// Add a score to a variant's list, creating the list if needed.
    ///
    /// Equal values keep insertion order. Returns the rank achieved
    /// (1-indexed) or None if the score fell off the end.
    pub fn add_score(&mut self, variant: &str, score: Score) -> Option<usize> {
        let entries = self
            .boards
            .entry(variant.to_string())
            .or_insert_with(|| Vec::with_capacity(MAX_HIGH_SCORES + 1));

        let value = score.value();
        let pos = entries
            .iter()
            .position(|e| value > e.value())
            .unwrap_or(entries.len());
        entries.insert(pos, score);
        entries.truncate(MAX_HIGH_SCORES);

        if pos < MAX_HIGH_SCORES {
            log::info!("New {} high score {} at rank {}", variant, value, pos + 1);
            Some(pos + 1)
        } else {
            log::debug!("Score {} did not make the {} board", value, variant);
            None
        }
    }

    /// Snapshot of a variant's scores, best first (empty if unknown)
    pub fn top_scores(&self, variant: &str) -> Vec<Score> {
        self.boards.get(variant).cloned().unwrap_or_default()
    }

    /// Best score for a variant (if any)
    pub fn best(&self, variant: &str) -> Option<Score> {
        self.boards.get(variant).and_then(|e| e.first().copied())
    }

    /// Known variant keys, sorted
    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.boards.keys().map(String::as_str)
    }

    /// Number of scores held for a variant
    pub fn variant_len(&self, variant: &str) -> usize {
        self.boards.get(variant).map(Vec::len).unwrap_or(0)
    }

    /// True when no variant holds any score
    pub fn is_empty(&self) -> bool {
        self.boards.values().all(Vec::is_empty)
    }
}
