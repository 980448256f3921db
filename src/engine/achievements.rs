//! Achievement rules.
//!
//! Every predicate reads fields that only grow across completions (counts,
//! best values, level) or the running averages the profile keeps, so an
//! unlocked achievement is never taken back.

use rust_i18n::t;

use crate::store::schema::UserProfile;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AchievementId {
    FirstChallenge,
    SpeedDemon,
    PerfectRun,
    Dedicated,
    Veteran,
    Master,
    Streak7,
    Streak30,
    PointCollector,
    AccuracyKing,
}

impl AchievementId {
    pub fn to_key(self) -> &'static str {
        match self {
            AchievementId::FirstChallenge => "first_challenge",
            AchievementId::SpeedDemon => "speed_demon",
            AchievementId::PerfectRun => "perfect_run",
            AchievementId::Dedicated => "dedicated",
            AchievementId::Veteran => "veteran",
            AchievementId::Master => "master",
            AchievementId::Streak7 => "streak_7",
            AchievementId::Streak30 => "streak_30",
            AchievementId::PointCollector => "point_collector",
            AchievementId::AccuracyKing => "accuracy_king",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        ACHIEVEMENTS
            .iter()
            .map(|def| def.id)
            .find(|id| id.to_key() == key)
    }

    pub fn def(self) -> &'static AchievementDef {
        // Table order matches declaration order.
        &ACHIEVEMENTS[self as usize]
    }

    pub fn title(self) -> String {
        match self {
            AchievementId::FirstChallenge => t!("achievement.first_challenge.title"),
            AchievementId::SpeedDemon => t!("achievement.speed_demon.title"),
            AchievementId::PerfectRun => t!("achievement.perfect_run.title"),
            AchievementId::Dedicated => t!("achievement.dedicated.title"),
            AchievementId::Veteran => t!("achievement.veteran.title"),
            AchievementId::Master => t!("achievement.master.title"),
            AchievementId::Streak7 => t!("achievement.streak_7.title"),
            AchievementId::Streak30 => t!("achievement.streak_30.title"),
            AchievementId::PointCollector => t!("achievement.point_collector.title"),
            AchievementId::AccuracyKing => t!("achievement.accuracy_king.title"),
        }
        .to_string()
    }

    pub fn description(self) -> String {
        match self {
            AchievementId::FirstChallenge => t!("achievement.first_challenge.description"),
            AchievementId::SpeedDemon => t!("achievement.speed_demon.description"),
            AchievementId::PerfectRun => t!("achievement.perfect_run.description"),
            AchievementId::Dedicated => t!("achievement.dedicated.description"),
            AchievementId::Veteran => t!("achievement.veteran.description"),
            AchievementId::Master => t!("achievement.master.description"),
            AchievementId::Streak7 => t!("achievement.streak_7.description"),
            AchievementId::Streak30 => t!("achievement.streak_30.description"),
            AchievementId::PointCollector => t!("achievement.point_collector.description"),
            AchievementId::AccuracyKing => t!("achievement.accuracy_king.description"),
        }
        .to_string()
    }
}

pub struct AchievementDef {
    pub id: AchievementId,
    pub icon: &'static str,
    condition: fn(&UserProfile) -> bool,
}

impl AchievementDef {
    pub fn is_met(&self, profile: &UserProfile) -> bool {
        (self.condition)(profile)
    }
}

fn first_challenge(p: &UserProfile) -> bool {
    p.total_challenges >= 1
}
fn speed_demon(p: &UserProfile) -> bool {
    p.best_wpm >= 100
}
fn perfect_run(p: &UserProfile) -> bool {
    p.average_accuracy == 100
}
fn dedicated(p: &UserProfile) -> bool {
    p.total_challenges >= 10
}
fn veteran(p: &UserProfile) -> bool {
    p.total_challenges >= 50
}
fn master(p: &UserProfile) -> bool {
    p.level >= 10
}
fn streak_7(p: &UserProfile) -> bool {
    p.streak_days >= 7
}
fn streak_30(p: &UserProfile) -> bool {
    p.streak_days >= 30
}
fn point_collector(p: &UserProfile) -> bool {
    p.total_points >= 1000
}
fn accuracy_king(p: &UserProfile) -> bool {
    p.average_accuracy >= 95 && p.total_challenges >= 10
}

pub const ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef {
        id: AchievementId::FirstChallenge,
        icon: "🎯",
        condition: first_challenge,
    },
    AchievementDef {
        id: AchievementId::SpeedDemon,
        icon: "⚡",
        condition: speed_demon,
    },
    AchievementDef {
        id: AchievementId::PerfectRun,
        icon: "💎",
        condition: perfect_run,
    },
    AchievementDef {
        id: AchievementId::Dedicated,
        icon: "🔥",
        condition: dedicated,
    },
    AchievementDef {
        id: AchievementId::Veteran,
        icon: "🏆",
        condition: veteran,
    },
    AchievementDef {
        id: AchievementId::Master,
        icon: "👑",
        condition: master,
    },
    AchievementDef {
        id: AchievementId::Streak7,
        icon: "📅",
        condition: streak_7,
    },
    AchievementDef {
        id: AchievementId::Streak30,
        icon: "🎊",
        condition: streak_30,
    },
    AchievementDef {
        id: AchievementId::PointCollector,
        icon: "💰",
        condition: point_collector,
    },
    AchievementDef {
        id: AchievementId::AccuracyKing,
        icon: "🎯",
        condition: accuracy_king,
    },
];

/// Achievements whose rule holds for `profile` but which it does not hold yet,
/// in table order.
pub fn evaluate(profile: &UserProfile) -> Vec<AchievementId> {
    ACHIEVEMENTS
        .iter()
        .filter(|def| !profile.has_achievement(def.id.to_key()) && def.is_met(profile))
        .map(|def| def.id)
        .collect()
}
