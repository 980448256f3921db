use crate::catalog::Difficulty;

pub const MIN_POINTS: u64 = 10;

/// Points for one finished snippet. Every multiplier floors before the next
/// one is applied.
pub fn compute_points(wpm: u32, accuracy: u32, difficulty: Difficulty) -> u64 {
    let mut points = wpm as u64;

    if accuracy >= 95 {
        points = points * 3 / 2;
    } else if accuracy >= 90 {
        points = points * 6 / 5;
    }

    points = match difficulty {
        Difficulty::Easy => points,
        Difficulty::Medium => points * 3 / 2,
        Difficulty::Hard => points * 2,
    };

    points.max(MIN_POINTS)
}

pub fn xp_for_points(points: u64) -> u64 {
    points / 2
}

/// XP needed to get from `level` to `level + 1`.
pub fn xp_for_level(level: u32) -> u64 {
    let exponent = level.saturating_sub(1) as i32;
    (100.0 * 1.5_f64.powi(exponent)).floor() as u64
}

pub fn level_from_xp(total_xp: u64) -> u32 {
    level_progress(total_xp).level
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelProgress {
    pub level: u32,
    /// XP earned since reaching `level`.
    pub into_level: u64,
    /// XP the current level costs in total.
    pub required: u64,
}

impl LevelProgress {
    pub fn ratio(&self) -> f64 {
        if self.required == 0 {
            return 0.0;
        }
        (self.into_level as f64 / self.required as f64).clamp(0.0, 1.0)
    }

    pub fn remaining(&self) -> u64 {
        self.required.saturating_sub(self.into_level)
    }
}

pub fn level_progress(total_xp: u64) -> LevelProgress {
    let mut level = 1;
    let mut remaining = total_xp;
    let mut required = xp_for_level(level);

    while remaining >= required {
        remaining -= required;
        level += 1;
        required = xp_for_level(level);
    }

    LevelProgress {
        level,
        into_level: remaining,
        required,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_high_accuracy_points() {
        // floor(floor(50 * 1.5) * 2)
        assert_eq!(compute_points(50, 96, Difficulty::Hard), 150);
    }

    #[test]
    fn test_accuracy_bands() {
        assert_eq!(compute_points(40, 95, Difficulty::Easy), 60);
        assert_eq!(compute_points(40, 94, Difficulty::Easy), 48);
        assert_eq!(compute_points(40, 90, Difficulty::Easy), 48);
        assert_eq!(compute_points(40, 89, Difficulty::Easy), 40);
    }

    #[test]
    fn test_each_multiplier_floors() {
        // 33 * 1.2 = 39.6 -> 39, 39 * 1.5 = 58.5 -> 58
        assert_eq!(compute_points(33, 92, Difficulty::Medium), 58);
    }

    #[test]
    fn test_points_have_a_floor() {
        assert_eq!(compute_points(0, 0, Difficulty::Easy), MIN_POINTS);
        assert_eq!(compute_points(4, 100, Difficulty::Easy), MIN_POINTS);
    }

    #[test]
    fn test_level_requirements_grow() {
        assert_eq!(xp_for_level(1), 100);
        assert_eq!(xp_for_level(2), 150);
        assert_eq!(xp_for_level(3), 225);
        assert_eq!(xp_for_level(4), 337);
    }

    #[test]
    fn test_level_starts_at_one() {
        assert_eq!(level_from_xp(0), 1);
        assert_eq!(level_from_xp(80), 1);
        assert_eq!(level_from_xp(99), 1);
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(level_from_xp(100), 2);
        assert_eq!(level_from_xp(249), 2);
        assert_eq!(level_from_xp(250), 3);
        assert_eq!(level_from_xp(475), 4);
    }

    #[test]
    fn test_level_progress_into_level() {
        let progress = level_progress(300);
        assert_eq!(progress.level, 3);
        assert_eq!(progress.into_level, 50);
        assert_eq!(progress.required, 225);
        assert_eq!(progress.remaining(), 175);
        assert!(progress.ratio() > 0.2 && progress.ratio() < 0.25);
    }

    #[test]
    fn test_xp_is_half_the_points() {
        assert_eq!(xp_for_points(150), 75);
        assert_eq!(xp_for_points(11), 5);
    }
}
