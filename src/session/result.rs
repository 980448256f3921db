use std::time::Instant;

use chrono::{DateTime, Utc};
use rust_i18n::t;
use serde::{Deserialize, Serialize};

use crate::session::state::SessionState;
use crate::session::stats::{accuracy_percent, words_per_minute};

/// Final figures of a completed session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub snippet_id: String,
    pub wpm: u32,
    pub accuracy: u32,
    pub errors: usize,
    pub typed_chars: usize,
    pub elapsed_secs: f64,
    pub best_combo: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Grade {
    D,
    C,
    B,
    A,
    APlus,
}

impl Grade {
    pub fn as_str(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PerformanceTier {
    Outstanding,
    Excellent,
    Good,
    KeepGoing,
}

impl PerformanceTier {
    /// Encouragement shown under the grade.
    pub fn message(self) -> String {
        match self {
            PerformanceTier::Outstanding => t!("result.outstanding"),
            PerformanceTier::Excellent => t!("result.excellent"),
            PerformanceTier::Good => t!("result.good"),
            PerformanceTier::KeepGoing => t!("result.keep_going"),
        }
        .to_string()
    }
}

impl SessionResult {
    pub fn from_session(session: &SessionState, snippet_id: &str) -> Self {
        Self::from_session_at(session, snippet_id, Instant::now())
    }

    pub fn from_session_at(session: &SessionState, snippet_id: &str, now: Instant) -> Self {
        let elapsed = session.elapsed_at(now);
        let typed = session.typed.len();
        let errors = session.error_count();

        Self {
            snippet_id: snippet_id.to_string(),
            wpm: words_per_minute(typed, elapsed),
            accuracy: accuracy_percent(typed, errors),
            errors,
            typed_chars: typed,
            elapsed_secs: elapsed.as_secs_f64(),
            best_combo: session.best_combo,
            timestamp: Utc::now(),
        }
    }

    pub fn grade(&self) -> Grade {
        // wpm * 0.6 + accuracy * 0.4, scaled by ten
        let score = self.wpm as u64 * 6 + self.accuracy as u64 * 4;
        if score >= 900 {
            Grade::APlus
        } else if score >= 800 {
            Grade::A
        } else if score >= 700 {
            Grade::B
        } else if score >= 600 {
            Grade::C
        } else {
            Grade::D
        }
    }

    pub fn tier(&self) -> PerformanceTier {
        match (self.wpm, self.accuracy) {
            (w, a) if w >= 80 && a >= 95 => PerformanceTier::Outstanding,
            (w, a) if w >= 60 && a >= 90 => PerformanceTier::Excellent,
            (w, a) if w >= 40 && a >= 85 => PerformanceTier::Good,
            _ => PerformanceTier::KeepGoing,
        }
    }
}
