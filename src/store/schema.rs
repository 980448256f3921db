use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HighScore {
    pub wpm: u32,
    pub accuracy: u32,
    pub achieved_at: DateTime<Utc>,
}

/// Long-lived player progress. Only the completion pipeline changes it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub schema_version: u32,
    pub level: u32,
    pub xp: u64,
    pub best_wpm: u32,
    /// Running mean of per-session accuracy over all completed challenges.
    pub average_accuracy: u32,
    pub total_challenges: u32,
    pub total_points: u64,
    pub streak_days: u32,
    #[serde(default)]
    pub best_streak: u32,
    pub last_played_date: Option<NaiveDate>,
    #[serde(default)]
    pub achievements: BTreeSet<String>,
    #[serde(default)]
    pub completed_snippets: BTreeSet<String>,
    #[serde(default)]
    pub high_scores: BTreeMap<String, HighScore>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            level: 1,
            xp: 0,
            best_wpm: 0,
            average_accuracy: 100,
            total_challenges: 0,
            total_points: 0,
            streak_days: 0,
            best_streak: 0,
            last_played_date: None,
            achievements: BTreeSet::new(),
            completed_snippets: BTreeSet::new(),
            high_scores: BTreeMap::new(),
        }
    }
}

impl UserProfile {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.contains(id)
    }

    pub fn high_score(&self, snippet_id: &str) -> Option<&HighScore> {
        self.high_scores.get(snippet_id)
    }
}
