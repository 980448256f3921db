use chrono::NaiveDate;
use log::{error, info, warn};

use crate::catalog::Difficulty;
use crate::config::Settings;
use crate::engine::rewards::{self, RewardSummary};
use crate::session::result::SessionResult;
use crate::store::schema::UserProfile;
use crate::store::{Store, StoreError};

/// Everything the completion screen needs about one finished session.
#[derive(Clone, Debug)]
pub struct CompletionReport {
    pub result: SessionResult,
    pub rewards: RewardSummary,
    /// Set when the updated profile could not be written. The in-memory
    /// profile then still holds its pre-completion value.
    pub persist_error: Option<String>,
}

impl CompletionReport {
    pub fn persisted(&self) -> bool {
        self.persist_error.is_none()
    }

    /// Rewards that made it into the stored profile. `None` after a failed
    /// write, when level-ups, high scores and unlocks are not yet real.
    pub fn confirmed_rewards(&self) -> Option<&RewardSummary> {
        self.persisted().then_some(&self.rewards)
    }
}

/// Owner of the player profile and settings, and the only path through which
/// either is changed.
///
/// Readers go through `profile()` / `settings()`. Updates build a complete new
/// value and swap it in as a whole, so a reader sees either the old or the new
/// record.
pub struct ProfileState {
    profile: UserProfile,
    settings: Settings,
    store: Box<dyn Store>,
}

impl ProfileState {
    /// Load both records, writing defaults for any that are missing.
    ///
    /// Unreadable records are replaced by defaults in memory only; the file is
    /// left for the player to inspect until the next successful write.
    pub fn load(store: Box<dyn Store>) -> Self {
        let profile = match store.load_profile() {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                let profile = UserProfile::default();
                if let Err(e) = store.save_profile(&profile) {
                    warn!("could not create profile: {e}");
                }
                profile
            }
            Err(e) => {
                warn!("could not load profile, starting fresh: {e}");
                UserProfile::default()
            }
        };

        let settings = match store.load_settings() {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                let settings = Settings::default();
                if let Err(e) = store.save_settings(&settings) {
                    warn!("could not create settings: {e}");
                }
                settings
            }
            Err(e) => {
                warn!("could not load settings, using defaults: {e}");
                Settings::default()
            }
        };

        Self {
            profile,
            settings,
            store,
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run the rewards pipeline for a finished session and persist the result.
    ///
    /// The new profile replaces the in-memory one only after the store
    /// accepted it.
    pub fn record_completion(
        &mut self,
        result: SessionResult,
        difficulty: Difficulty,
        today: NaiveDate,
    ) -> CompletionReport {
        let (updated, summary) = rewards::apply_completion(&self.profile, &result, difficulty, today);

        let persist_error = match self.store.save_profile(&updated) {
            Ok(()) => {
                info!(
                    "completed {}: {} wpm, {}% accuracy, +{} points, level {}",
                    result.snippet_id,
                    result.wpm,
                    result.accuracy,
                    summary.points,
                    updated.level
                );
                self.profile = updated;
                None
            }
            Err(e) => {
                error!("failed to save profile after {}: {e}", result.snippet_id);
                Some(e.to_string())
            }
        };

        CompletionReport {
            result,
            rewards: summary,
            persist_error,
        }
    }

    /// Apply `change` to the settings and write them out.
    ///
    /// The change stays in effect for this run even if the write fails.
    pub fn update_settings(&mut self, change: impl FnOnce(&mut Settings)) -> Result<(), StoreError> {
        let mut next = self.settings.clone();
        change(&mut next);
        next.validate();
        self.settings = next;
        self.store.save_settings(&self.settings)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::config::ThemeName;
    use crate::store::MemoryStore;
    use chrono::Utc;

    fn make_state(store: MemoryStore) -> (Rc<MemoryStore>, ProfileState) {
        let store = Rc::new(store);
        let state = ProfileState::load(Box::new(Rc::clone(&store)));
        (store, state)
    }

    fn result(wpm: u32, accuracy: u32) -> SessionResult {
        SessionResult {
            snippet_id: "hello-rust".to_string(),
            wpm,
            accuracy,
            errors: 0,
            typed_chars: 60,
            elapsed_secs: 20.0,
            best_combo: 12,
            timestamp: Utc::now(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn test_first_run_writes_defaults() {
        let (store, state) = make_state(MemoryStore::new());
        assert_eq!(state.profile(), &UserProfile::default());
        assert_eq!(state.settings(), &Settings::default());
        assert_eq!(store.stored_profile(), Some(UserProfile::default()));
        assert_eq!(store.stored_settings(), Some(Settings::default()));
    }

    #[test]
    fn test_existing_profile_is_loaded() {
        let mut profile = UserProfile::default();
        profile.total_challenges = 7;
        let (store, state) = make_state(MemoryStore::with_profile(profile));
        assert_eq!(state.profile().total_challenges, 7);
        // Only the missing settings record was written.
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_unwritable_store_still_starts() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        let (_store, state) = make_state(store);
        assert_eq!(state.profile().level, 1);
    }

    #[test]
    fn test_completion_is_persisted() {
        let (store, mut state) = make_state(MemoryStore::new());
        let report = state.record_completion(result(50, 96), Difficulty::Hard, today());

        assert!(report.persisted());
        assert_eq!(report.rewards.points, 150);
        assert_eq!(state.profile().total_challenges, 1);
        assert_eq!(store.stored_profile().as_ref(), Some(state.profile()));
    }

    #[test]
    fn test_failed_write_keeps_old_profile() {
        let (store, mut state) = make_state(MemoryStore::new());
        store.set_fail_writes(true);

        let report = state.record_completion(result(50, 96), Difficulty::Hard, today());
        assert!(!report.persisted());
        assert!(report.confirmed_rewards().is_none());
        assert_eq!(report.result.wpm, 50);
        assert_eq!(report.rewards.points, 150);
        assert_eq!(state.profile(), &UserProfile::default());
        assert_eq!(store.stored_profile(), Some(UserProfile::default()));

        // The next completion starts from the old profile again.
        store.set_fail_writes(false);
        let report = state.record_completion(result(50, 96), Difficulty::Hard, today());
        assert!(report.persisted());
        assert_eq!(report.confirmed_rewards(), Some(&report.rewards));
        assert_eq!(state.profile().total_challenges, 1);
    }

    #[test]
    fn test_update_settings() {
        let (store, mut state) = make_state(MemoryStore::new());
        state
            .update_settings(|s| {
                s.theme = ThemeName::Light;
                s.font_size = 99;
            })
            .unwrap();
        assert_eq!(state.settings().theme, ThemeName::Light);
        assert_eq!(state.settings().font_size, 14);
        assert_eq!(store.stored_settings().unwrap().theme, ThemeName::Light);
    }

    #[test]
    fn test_update_settings_write_failure_is_reported() {
        let (store, mut state) = make_state(MemoryStore::new());
        store.set_fail_writes(true);
        let res = state.update_settings(|s| s.sound_enabled = false);
        assert!(res.is_err());
        assert!(!state.settings().sound_enabled);
    }
}
