use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::engine::skip::SkipMask;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    Started,
    Completed,
}

/// One attempt at typing a snippet.
///
/// `cursor` sits just past the last consumed position; skip positions ahead
/// of it are crossed on the next keystroke. `typed` holds one entry per
/// consumed non-skip position, so it always equals the number of non-skip
/// positions before `cursor` until the session completes.
#[derive(Clone, Debug)]
pub struct SessionState {
    pub target: Vec<char>,
    mask: SkipMask,
    pub cursor: usize,
    pub typed: Vec<char>,
    pub errors: HashSet<usize>,
    pub started_at: Option<Instant>,
    pub finished_at: Option<Instant>,
    pub completed: bool,
    pub combo: u32,
    pub best_combo: u32,
}

impl SessionState {
    pub fn new(text: &str) -> Self {
        let target: Vec<char> = text.chars().collect();
        let mask = SkipMask::new(&target);
        Self {
            target,
            mask,
            cursor: 0,
            typed: Vec::new(),
            errors: HashSet::new(),
            started_at: None,
            finished_at: None,
            completed: false,
            combo: 0,
            best_combo: 0,
        }
    }

    /// Back to the untouched state for the same text.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.typed.clear();
        self.errors.clear();
        self.started_at = None;
        self.finished_at = None;
        self.completed = false;
        self.combo = 0;
        self.best_combo = 0;
    }

    pub fn phase(&self) -> SessionPhase {
        if self.completed {
            SessionPhase::Completed
        } else if self.started_at.is_some() {
            SessionPhase::Started
        } else {
            SessionPhase::NotStarted
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn is_skipped(&self, i: usize) -> bool {
        self.mask.is_skipped(i)
    }

    pub fn mask(&self) -> &SkipMask {
        &self.mask
    }

    /// Position the next keystroke will be matched against.
    pub fn next_target(&self) -> usize {
        self.mask.next_typeable(self.cursor)
    }

    pub fn is_error(&self, i: usize) -> bool {
        self.errors.contains(&i)
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub(crate) fn complete(&mut self, now: Instant) {
        self.completed = true;
        self.finished_at = Some(now);
        self.cursor = self.target.len();
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.saturating_duration_since(start),
            (Some(start), None) => now.saturating_duration_since(start),
            _ => Duration::ZERO,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    /// Share of typeable positions consumed so far.
    pub fn progress(&self) -> f64 {
        if self.completed {
            return 1.0;
        }
        let total = self.mask.typeable_count();
        if total == 0 {
            return 0.0;
        }
        self.typed.len() as f64 / total as f64
    }
}
