use std::time::{Duration, Instant};

use crate::session::state::SessionState;

/// Characters per "word" in words-per-minute.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Read-only figures derived from a session; recomputed after every transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiveStats {
    pub wpm: u32,
    pub accuracy: u32,
    pub errors: usize,
    pub typed: usize,
    pub elapsed_secs: u64,
    pub cursor: usize,
}

impl Default for LiveStats {
    fn default() -> Self {
        Self {
            wpm: 0,
            accuracy: 100,
            errors: 0,
            typed: 0,
            elapsed_secs: 0,
            cursor: 0,
        }
    }
}

impl LiveStats {
    pub fn from_session(session: &SessionState) -> Self {
        Self::from_session_at(session, Instant::now())
    }

    pub fn from_session_at(session: &SessionState, now: Instant) -> Self {
        let elapsed = session.elapsed_at(now);
        let typed = session.typed.len();
        let errors = session.error_count();
        Self {
            wpm: words_per_minute(typed, elapsed),
            accuracy: accuracy_percent(typed, errors),
            errors,
            typed,
            elapsed_secs: elapsed.as_secs(),
            cursor: session.cursor,
        }
    }
}

pub fn words_per_minute(typed: usize, elapsed: Duration) -> u32 {
    let minutes = elapsed.as_secs_f64() / 60.0;
    if typed == 0 || minutes <= 0.0 {
        return 0;
    }
    ((typed as f64 / CHARS_PER_WORD) / minutes).round() as u32
}

/// Whole-percent accuracy; 100 while nothing has been typed.
pub fn accuracy_percent(typed: usize, errors: usize) -> u32 {
    if typed == 0 {
        return 100;
    }
    let correct = typed.saturating_sub(errors);
    ((correct as f64 / typed as f64) * 100.0).round().clamp(0.0, 100.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::input;

    #[test]
    fn test_wpm_uses_five_chars_per_word() {
        // 50 chars = 10 words in one minute
        assert_eq!(words_per_minute(50, Duration::from_secs(60)), 10);
        // 250 chars in 30 seconds = 100 wpm
        assert_eq!(words_per_minute(250, Duration::from_secs(30)), 100);
    }

    #[test]
    fn test_wpm_rounds() {
        // 12 chars / 5 = 2.4 words in 1 minute -> 2
        assert_eq!(words_per_minute(12, Duration::from_secs(60)), 2);
        // 13 chars -> 2.6 -> 3
        assert_eq!(words_per_minute(13, Duration::from_secs(60)), 3);
    }

    #[test]
    fn test_wpm_zero_without_time_or_input() {
        assert_eq!(words_per_minute(10, Duration::ZERO), 0);
        assert_eq!(words_per_minute(0, Duration::from_secs(10)), 0);
    }

    #[test]
    fn test_accuracy_bounds() {
        assert_eq!(accuracy_percent(0, 0), 100);
        assert_eq!(accuracy_percent(4, 4), 0);
        assert_eq!(accuracy_percent(3, 1), 67);
        assert_eq!(accuracy_percent(10, 0), 100);
        assert_eq!(accuracy_percent(2, 5), 0);
    }

    #[test]
    fn test_live_stats_from_session() {
        let mut session = SessionState::new("abcdefghij");
        let start = Instant::now();
        for (i, ch) in "abcdexghij".chars().enumerate() {
            input::process_char_at(&mut session, ch, start + Duration::from_millis(i as u64 * 600));
        }
        assert!(session.is_complete());
        let stats = LiveStats::from_session_at(&session, start + Duration::from_secs(120));
        // 10 chars in 5.4s -> 2 words / 0.09 min
        assert_eq!(stats.wpm, 22);
        assert_eq!(stats.accuracy, 90);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.elapsed_secs, 5);
        assert_eq!(stats.cursor, 10);
    }

    #[test]
    fn test_default_is_fresh_session_view() {
        let session = SessionState::new("abc");
        assert_eq!(LiveStats::from_session(&session), LiveStats::default());
    }
}
