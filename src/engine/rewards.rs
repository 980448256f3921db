use chrono::{Days, NaiveDate};

use crate::catalog::Difficulty;
use crate::engine::achievements::{self, AchievementId};
use crate::engine::scoring::{compute_points, level_from_xp, xp_for_points};
use crate::session::result::SessionResult;
use crate::store::schema::{HighScore, UserProfile};

/// What a single completion awarded, for the completion screen and toasts.
#[derive(Clone, Debug, PartialEq)]
pub struct RewardSummary {
    pub points: u64,
    pub xp_gained: u64,
    pub level_before: u32,
    pub level_after: u32,
    pub new_high_score: bool,
    pub streak_days: u32,
    pub new_achievements: Vec<AchievementId>,
}

impl RewardSummary {
    pub fn leveled_up(&self) -> bool {
        self.level_after > self.level_before
    }
}

/// Day streak after playing on `today`.
///
/// Yesterday continues the streak, today leaves it alone, anything else
/// (including a first play or a clock that went backwards) starts over at 1.
pub fn next_streak(last_played: Option<NaiveDate>, current: u32, today: NaiveDate) -> u32 {
    match last_played {
        Some(last) if last == today => current,
        Some(last) if today.checked_sub_days(Days::new(1)) == Some(last) => current + 1,
        _ => 1,
    }
}

fn running_average(old_avg: u32, old_count: u32, accuracy: u32) -> u32 {
    let total = f64::from(old_avg) * f64::from(old_count) + f64::from(accuracy);
    (total / f64::from(old_count + 1)).round() as u32
}

/// Fold a completed session into the profile.
///
/// Pure: returns the updated profile alongside the summary and leaves
/// `profile` untouched, so the caller decides when the update becomes visible.
pub fn apply_completion(
    profile: &UserProfile,
    result: &SessionResult,
    difficulty: Difficulty,
    today: NaiveDate,
) -> (UserProfile, RewardSummary) {
    let mut next = profile.clone();

    let points = compute_points(result.wpm, result.accuracy, difficulty);

    let xp_gained = xp_for_points(points);
    next.xp = profile.xp + xp_gained;
    next.level = level_from_xp(next.xp);

    let new_high_score = profile
        .high_score(&result.snippet_id)
        .is_none_or(|prev| result.wpm > prev.wpm);
    if new_high_score {
        next.high_scores.insert(
            result.snippet_id.clone(),
            HighScore {
                wpm: result.wpm,
                accuracy: result.accuracy,
                achieved_at: result.timestamp,
            },
        );
    }

    next.streak_days = next_streak(profile.last_played_date, profile.streak_days, today);
    next.best_streak = profile.best_streak.max(next.streak_days);
    next.last_played_date = Some(today);

    next.average_accuracy = running_average(
        profile.average_accuracy,
        profile.total_challenges,
        result.accuracy,
    );
    next.best_wpm = profile.best_wpm.max(result.wpm);
    next.total_challenges = profile.total_challenges + 1;
    next.total_points = profile.total_points + points;

    next.completed_snippets.insert(result.snippet_id.clone());

    let new_achievements = achievements::evaluate(&next);
    for id in &new_achievements {
        next.achievements.insert(id.to_key().to_string());
    }

    let summary = RewardSummary {
        points,
        xp_gained,
        level_before: profile.level,
        level_after: next.level,
        new_high_score,
        streak_days: next.streak_days,
        new_achievements,
    };
    (next, summary)
}
