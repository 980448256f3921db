use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rust_i18n::t;

use crate::catalog::{Catalog, Snippet};
use crate::config::Settings;
use crate::engine::achievements::AchievementId;
use crate::profile::{CompletionReport, ProfileState};
use crate::session::input::{self, InputEvent};
use crate::session::result::SessionResult;
use crate::session::state::SessionState;
use crate::session::stats::LiveStats;
use crate::ui::theme::Theme;

/// Every this many correct keys in a row is worth a toast.
pub const COMBO_MILESTONE: u32 = 50;

const TOAST_DURATION: Duration = Duration::from_secs(3);

pub const SETTINGS_ROWS: usize = 6;

const DIFFICULTY_ROW: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Practice,
    Result,
    Explorer,
    Dashboard,
    Settings,
}

/// Things that happened during the last transitions, for the front end to
/// turn into sounds and toasts. Key cues are only produced with sound on.
#[derive(Clone, Debug)]
pub enum SessionEvent {
    KeyCorrect,
    KeyIncorrect,
    ComboMilestone(u32),
    Completed(CompletionReport),
    LevelUp(u32),
    AchievementUnlocked(AchievementId),
    HighScore(u32),
    PersistFailed(String),
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub message: String,
    pub shown_at: Instant,
}

pub struct App {
    pub screen: AppScreen,
    pub catalog: Catalog,
    pub snippet_idx: usize,
    pub session: SessionState,
    pub stats: LiveStats,
    pub profile: ProfileState,
    pub theme: Theme,
    pub last_report: Option<CompletionReport>,
    pub toast: Option<Toast>,
    pub should_quit: bool,
    pub explorer_selected: usize,
    pub settings_selected: usize,
    events: Vec<SessionEvent>,
    rng: SmallRng,
}

impl App {
    pub fn new(catalog: Catalog, profile: ProfileState) -> Result<Self> {
        let Some(first) = catalog.get(0) else {
            bail!("snippet catalog is empty");
        };
        let session = SessionState::new(&first.code);
        let theme = Theme::for_setting(profile.settings().theme);
        rust_i18n::set_locale(profile.settings().language.locale());

        Ok(Self {
            screen: AppScreen::Practice,
            catalog,
            snippet_idx: 0,
            session,
            stats: LiveStats::default(),
            profile,
            theme,
            last_report: None,
            toast: None,
            should_quit: false,
            explorer_selected: 0,
            settings_selected: 0,
            events: Vec::new(),
            rng: SmallRng::from_entropy(),
        })
    }

    pub fn settings(&self) -> &Settings {
        self.profile.settings()
    }

    pub fn current_snippet(&self) -> &Snippet {
        // snippet_idx only ever holds a valid catalog index.
        &self.catalog.snippets()[self.snippet_idx]
    }

    pub fn level(&self) -> u32 {
        self.profile.profile().level
    }

    pub fn is_unlocked(&self, idx: usize) -> bool {
        Catalog::is_unlocked(idx, self.level())
    }

    /// Start a fresh session on catalog entry `idx`. Locked or unknown
    /// entries leave the current session alone.
    pub fn select_snippet(&mut self, idx: usize) -> bool {
        let Some(snippet) = self.catalog.get(idx) else {
            return false;
        };
        if !self.is_unlocked(idx) {
            log::debug!(
                "snippet {} needs level {}",
                snippet.id,
                Catalog::required_level(idx)
            );
            return false;
        }
        self.session = SessionState::new(&snippet.code);
        self.snippet_idx = idx;
        self.stats = LiveStats::default();
        self.last_report = None;
        self.screen = AppScreen::Practice;
        true
    }

    pub fn select_snippet_by_id(&mut self, id: &str) -> Result<()> {
        let Some((idx, _)) = self.catalog.find(id) else {
            bail!("no snippet with id {id:?}");
        };
        if !self.select_snippet(idx) {
            bail!(
                "snippet {id:?} unlocks at level {} (you are level {})",
                Catalog::required_level(idx),
                self.level()
            );
        }
        Ok(())
    }

    /// Snippets the explorer lists under the current difficulty filter.
    pub fn visible_snippets(&self) -> Vec<usize> {
        self.catalog.visible(self.settings().difficulty)
    }

    fn playable_snippets(&self) -> Vec<usize> {
        self.visible_snippets()
            .into_iter()
            .filter(|&idx| self.is_unlocked(idx))
            .collect()
    }

    pub fn random_snippet(&mut self) {
        let mut pool = self.playable_snippets();
        if pool.len() > 1 {
            pool.retain(|&idx| idx != self.snippet_idx);
        }
        if pool.is_empty() {
            self.reset();
            return;
        }
        let pick = pool[self.rng.gen_range(0..pool.len())];
        self.select_snippet(pick);
    }

    pub fn next_snippet(&mut self) {
        let pool = self.playable_snippets();
        let next = pool
            .iter()
            .copied()
            .find(|&idx| idx > self.snippet_idx)
            .or_else(|| pool.first().copied());
        match next {
            Some(idx) => {
                self.select_snippet(idx);
            }
            None => self.reset(),
        }
    }

    pub fn reset(&mut self) {
        self.session.reset();
        self.stats = LiveStats::default();
        self.last_report = None;
        self.screen = AppScreen::Practice;
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Char(ch) => self.type_char(ch),
            InputEvent::Backspace => self.backspace(),
        }
    }

    pub fn type_char(&mut self, ch: char) {
        if self.screen != AppScreen::Practice {
            return;
        }
        let was_complete = self.session.is_complete();

        if let Some(event) = input::process_char(&mut self.session, ch) {
            if self.settings().sound_enabled {
                self.events.push(if event.correct {
                    SessionEvent::KeyCorrect
                } else {
                    SessionEvent::KeyIncorrect
                });
            }
            let combo = self.session.combo;
            if event.correct && combo > 0 && combo % COMBO_MILESTONE == 0 {
                self.events.push(SessionEvent::ComboMilestone(combo));
            }
        }
        self.stats = LiveStats::from_session(&self.session);

        if !was_complete && self.session.is_complete() {
            self.finish_session();
        }
    }

    pub fn backspace(&mut self) {
        if self.screen != AppScreen::Practice {
            return;
        }
        if input::process_backspace(&mut self.session) {
            self.stats = LiveStats::from_session(&self.session);
        }
    }

    fn finish_session(&mut self) {
        let snippet = self.current_snippet();
        let difficulty = snippet.difficulty;
        let result = SessionResult::from_session(&self.session, &snippet.id);
        let today = chrono::Local::now().date_naive();

        let report = self.profile.record_completion(result, difficulty, today);

        self.events.push(SessionEvent::Completed(report.clone()));
        if let Some(rewards) = report.confirmed_rewards() {
            if rewards.leveled_up() {
                self.events.push(SessionEvent::LevelUp(rewards.level_after));
            }
            if rewards.new_high_score {
                self.events.push(SessionEvent::HighScore(report.result.wpm));
            }
            for id in &rewards.new_achievements {
                self.events.push(SessionEvent::AchievementUnlocked(*id));
            }
        }
        if let Some(ref message) = report.persist_error {
            self.events.push(SessionEvent::PersistFailed(message.clone()));
        }

        self.last_report = Some(report);
        self.screen = AppScreen::Result;
    }

    /// Hand over everything queued since the last call.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Toast text for events that get one.
    pub fn toast_message(event: &SessionEvent) -> Option<String> {
        match event {
            SessionEvent::ComboMilestone(n) => Some(t!("toast.combo", count = n).to_string()),
            SessionEvent::LevelUp(level) => Some(t!("toast.level_up", level = level).to_string()),
            SessionEvent::AchievementUnlocked(id) => Some(
                t!(
                    "toast.achievement",
                    icon = id.def().icon,
                    title = id.title()
                )
                .to_string(),
            ),
            SessionEvent::HighScore(wpm) => Some(t!("toast.high_score", wpm = wpm).to_string()),
            SessionEvent::PersistFailed(_) => Some(t!("toast.save_failed").to_string()),
            _ => None,
        }
    }

    pub fn show_toast(&mut self, message: String) {
        self.toast = Some(Toast {
            message,
            shown_at: Instant::now(),
        });
    }

    pub fn tick(&mut self) {
        if self.session.started_at.is_some() && !self.session.is_complete() {
            self.stats = LiveStats::from_session(&self.session);
        }
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.shown_at.elapsed() > TOAST_DURATION)
        {
            self.toast = None;
        }
    }

    pub fn go_to_practice(&mut self) {
        self.screen = AppScreen::Practice;
    }

    pub fn go_to_explorer(&mut self) {
        let visible = self.visible_snippets();
        self.explorer_selected = visible
            .iter()
            .position(|&idx| idx == self.snippet_idx)
            .unwrap_or(0);
        self.screen = AppScreen::Explorer;
    }

    pub fn go_to_dashboard(&mut self) {
        self.screen = AppScreen::Dashboard;
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    pub fn explorer_next(&mut self) {
        let len = self.visible_snippets().len();
        if len > 0 {
            self.explorer_selected = (self.explorer_selected + 1) % len;
        }
    }

    pub fn explorer_prev(&mut self) {
        let len = self.visible_snippets().len();
        if len > 0 {
            self.explorer_selected = (self.explorer_selected + len - 1) % len;
        }
    }

    pub fn explorer_confirm(&mut self) {
        let visible = self.visible_snippets();
        if let Some(&idx) = visible.get(self.explorer_selected) {
            if !self.select_snippet(idx) {
                self.show_toast(
                    t!("toast.locked", level = Catalog::required_level(idx)).to_string(),
                );
            }
        }
    }

    pub fn settings_next_row(&mut self) {
        self.settings_selected = (self.settings_selected + 1) % SETTINGS_ROWS;
    }

    pub fn settings_prev_row(&mut self) {
        self.settings_selected = (self.settings_selected + SETTINGS_ROWS - 1) % SETTINGS_ROWS;
    }

    pub fn settings_cycle_forward(&mut self) {
        self.cycle_setting(self.settings_selected, true);
    }

    pub fn settings_cycle_backward(&mut self) {
        self.cycle_setting(self.settings_selected, false);
    }

    /// Step the difficulty filter from the explorer without touching the
    /// settings cursor.
    pub fn explorer_cycle_difficulty(&mut self, forward: bool) {
        self.cycle_setting(DIFFICULTY_ROW, forward);
    }

    fn cycle_setting(&mut self, row: usize, forward: bool) {
        let res = self.profile.update_settings(|s| match row {
            0 => s.theme = s.theme.toggled(),
            1 => s.sound_enabled = !s.sound_enabled,
            2 => s.show_line_numbers = !s.show_line_numbers,
            3 => {
                s.font_size = if forward {
                    s.next_font_size()
                } else {
                    s.prev_font_size()
                }
            }
            DIFFICULTY_ROW => {
                s.difficulty = if forward {
                    s.difficulty.next()
                } else {
                    s.difficulty.prev()
                }
            }
            5 => s.language = s.language.toggled(),
            _ => {}
        });
        if let Err(e) = res {
            log::warn!("could not save settings: {e}");
            self.show_toast(t!("toast.save_failed").to_string());
        }

        match row {
            0 => self.theme = Theme::for_setting(self.settings().theme),
            DIFFICULTY_ROW => self.explorer_selected = 0,
            5 => rust_i18n::set_locale(self.settings().language.locale()),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::catalog::Difficulty;
    use crate::config::{DifficultyFilter, ThemeName};
    use crate::store::MemoryStore;
    use crate::store::schema::UserProfile;

    fn snippet(id: &str, difficulty: Difficulty, code: &str) -> Snippet {
        Snippet {
            id: id.to_string(),
            filename: format!("{id}.rs"),
            language: "rust".to_string(),
            difficulty,
            category: None,
            points: None,
            code: code.to_string(),
        }
    }

    fn test_catalog() -> Catalog {
        Catalog::from_snippets(vec![
            snippet("a", Difficulty::Easy, "ab"),
            snippet("b", Difficulty::Medium, "// note\nxy"),
            snippet("c", Difficulty::Hard, "fn"),
            snippet("d", Difficulty::Easy, "zz"),
        ])
        .unwrap()
    }

    fn make_app_with(store: MemoryStore) -> (Rc<MemoryStore>, App) {
        let store = Rc::new(store);
        let profile = ProfileState::load(Box::new(Rc::clone(&store)));
        let app = App::new(test_catalog(), profile).unwrap();
        (store, app)
    }

    fn make_app() -> (Rc<MemoryStore>, App) {
        make_app_with(MemoryStore::new())
    }

    fn type_str(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.type_char(ch);
        }
    }

    #[test]
    fn test_empty_catalog_is_rejected() {
        let profile = ProfileState::load(Box::new(MemoryStore::new()));
        assert!(App::new(Catalog::default(), profile).is_err());
    }

    #[test]
    fn test_completion_runs_once_and_persists() {
        let (store, mut app) = make_app();
        type_str(&mut app, "ab");

        assert_eq!(app.screen, AppScreen::Result);
        let report = app.last_report.clone().unwrap();
        assert!(report.persisted());
        assert_eq!(report.result.snippet_id, "a");
        assert_eq!(report.result.accuracy, 100);
        assert_eq!(app.profile.profile().total_challenges, 1);
        assert_eq!(store.stored_profile().unwrap().total_challenges, 1);

        let completed = app
            .drain_events()
            .iter()
            .filter(|e| matches!(e, SessionEvent::Completed(_)))
            .count();
        assert_eq!(completed, 1);

        // Further keys are ignored until a new session starts.
        type_str(&mut app, "ab");
        assert_eq!(app.profile.profile().total_challenges, 1);
        assert!(app.drain_events().is_empty());
    }

    #[test]
    fn test_completion_events() {
        let (_store, mut app) = make_app();
        type_str(&mut app, "ab");
        let events = app.drain_events();
        assert!(events.iter().any(|e| matches!(e, SessionEvent::HighScore(_))));
        assert!(events.iter().any(|e| matches!(
            e,
            SessionEvent::AchievementUnlocked(AchievementId::FirstChallenge)
        )));
        assert!(!events.iter().any(|e| matches!(e, SessionEvent::PersistFailed(_))));
    }

    #[test]
    fn test_key_cues_follow_sound_setting() {
        let (_store, mut app) = make_app();
        app.type_char('x');
        assert!(matches!(app.drain_events()[..], [SessionEvent::KeyIncorrect]));

        app.profile.update_settings(|s| s.sound_enabled = false).unwrap();
        app.backspace();
        app.type_char('a');
        assert!(app.drain_events().is_empty());
    }

    #[test]
    fn test_persist_failure_is_reported() {
        let (store, mut app) = make_app();
        store.set_fail_writes(true);
        type_str(&mut app, "ab");

        let events = app.drain_events();
        assert!(events.iter().any(|e| matches!(e, SessionEvent::PersistFailed(_))));
        assert!(events.iter().any(|e| matches!(e, SessionEvent::Completed(_))));
        assert!(!events.iter().any(|e| matches!(
            e,
            SessionEvent::LevelUp(_)
                | SessionEvent::HighScore(_)
                | SessionEvent::AchievementUnlocked(_)
        )));
        assert_eq!(app.profile.profile().total_challenges, 0);
        assert!(!app.last_report.as_ref().unwrap().persisted());
    }

    #[test]
    fn test_unlocks_announced_once_after_failed_write() {
        let (store, mut app) = make_app();
        store.set_fail_writes(true);
        type_str(&mut app, "ab");
        app.drain_events();

        store.set_fail_writes(false);
        app.reset();
        type_str(&mut app, "ab");
        let unlocked: Vec<AchievementId> = app
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                SessionEvent::AchievementUnlocked(id) => Some(id),
                _ => None,
            })
            .collect();
        assert!(unlocked.contains(&AchievementId::FirstChallenge));
        assert!(app.profile.profile().has_achievement("first_challenge"));

        app.reset();
        type_str(&mut app, "ab");
        assert!(!app
            .drain_events()
            .iter()
            .any(|e| matches!(e, SessionEvent::AchievementUnlocked(_))));
    }

    #[test]
    fn test_locked_snippet_cannot_be_selected() {
        let (_store, mut app) = make_app();
        assert!(app.select_snippet(2));
        assert_eq!(app.current_snippet().id, "c");
        assert!(!app.select_snippet(3));
        assert_eq!(app.current_snippet().id, "c");
        assert!(app.select_snippet_by_id("d").is_err());
        assert!(app.select_snippet_by_id("missing").is_err());
    }

    #[test]
    fn test_higher_level_unlocks_more() {
        let mut profile = UserProfile::default();
        profile.level = 2;
        let (_store, mut app) = make_app_with(MemoryStore::with_profile(profile));
        assert!(app.select_snippet_by_id("d").is_ok());
    }

    #[test]
    fn test_skip_positions_are_auto_advanced() {
        let (_store, mut app) = make_app();
        assert!(app.select_snippet(1));
        type_str(&mut app, "xy");
        assert_eq!(app.screen, AppScreen::Result);
        assert_eq!(app.last_report.as_ref().unwrap().result.typed_chars, 2);
    }

    #[test]
    fn test_reset_clears_session() {
        let (_store, mut app) = make_app();
        app.type_char('q');
        app.reset();
        assert_eq!(app.session.cursor, 0);
        assert!(app.session.typed.is_empty());
        assert_eq!(app.stats, LiveStats::default());
    }

    #[test]
    fn test_difficulty_filter_limits_explorer() {
        let (_store, mut app) = make_app();
        app.explorer_cycle_difficulty(true);
        assert_eq!(app.settings().difficulty, DifficultyFilter::Easy);
        assert_eq!(app.settings_selected, 0);
        assert_eq!(app.visible_snippets(), vec![0, 3]);
        app.explorer_cycle_difficulty(false);
        assert_eq!(app.settings().difficulty, DifficultyFilter::All);
    }

    #[test]
    fn test_random_and_next_stay_unlocked() {
        let (_store, mut app) = make_app();
        for _ in 0..20 {
            app.random_snippet();
            assert!(app.snippet_idx < 3);
        }
        app.select_snippet(2);
        app.next_snippet();
        assert_eq!(app.snippet_idx, 0);
    }

    #[test]
    fn test_theme_setting_toggles() {
        let (store, mut app) = make_app();
        app.settings_selected = 0;
        app.settings_cycle_forward();
        assert_eq!(app.settings().theme, ThemeName::Light);
        assert_eq!(app.theme.name, "light");
        assert_eq!(store.stored_settings().unwrap().theme, ThemeName::Light);
    }

    #[test]
    fn test_toast_messages() {
        assert!(App::toast_message(&SessionEvent::ComboMilestone(50)).is_some());
        assert!(App::toast_message(&SessionEvent::KeyCorrect).is_none());
    }
}
