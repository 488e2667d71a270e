//! Achievement badges and their unlock rules

use crate::stats::HourlyCommits;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementId {
    WeekendWarrior,
    NightOwl,
    EarlyBird,
    StreakMaster,
    BingeCoder,
    NoLife,
    Polyglot,
    CoffeePowered,
    Legend,
}

/// A badge as shown on the stats screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub rarity: Rarity,
    pub requirement: &'static str,
    pub unlocked: bool,
}

/// Aggregated metrics the unlock rules look at
#[derive(Debug, Clone, Copy)]
pub struct AchievementInputs<'a> {
    pub total_commits: i64,
    pub longest_streak: i64,
    pub commits_by_hour: &'a [HourlyCommits],
    pub language_count: usize,
    /// Calendar weeks present in the fetched data, weekend activity or not
    pub total_weeks: usize,
}

impl AchievementId {
    pub const ALL: [AchievementId; 9] = [
        Self::WeekendWarrior,
        Self::NightOwl,
        Self::EarlyBird,
        Self::StreakMaster,
        Self::BingeCoder,
        Self::NoLife,
        Self::Polyglot,
        Self::CoffeePowered,
        Self::Legend,
    ];

    pub const fn slug(self) -> &'static str {
        match self {
            Self::WeekendWarrior => "weekend-warrior",
            Self::NightOwl => "night-owl",
            Self::EarlyBird => "early-bird",
            Self::StreakMaster => "streak-master",
            Self::BingeCoder => "binge-coder",
            Self::NoLife => "no-life",
            Self::Polyglot => "polyglot",
            Self::CoffeePowered => "coffee-powered",
            Self::Legend => "legend",
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::WeekendWarrior => "WEEKEND WARRIOR",
            Self::NightOwl => "NIGHT OWL",
            Self::EarlyBird => "EARLY BIRD",
            Self::StreakMaster => "STREAK MASTER",
            Self::BingeCoder => "BINGE CODER",
            Self::NoLife => "NO LIFE",
            Self::Polyglot => "POLYGLOT",
            Self::CoffeePowered => "COFFEE POWERED",
            Self::Legend => "LEGEND",
        }
    }

    const fn description(self) -> &'static str {
        match self {
            Self::WeekendWarrior => "Showed up for the weekend grind",
            Self::NightOwl => "Ships code while the world sleeps",
            Self::EarlyBird => "Commits before the first coffee",
            Self::StreakMaster => "Weekend after weekend, no breaks",
            Self::BingeCoder => "Treats weekends like a second job",
            Self::NoLife => "Touching grass is optional",
            Self::Polyglot => "Speaks in many languages",
            Self::CoffeePowered => "Fueled by caffeine in the dead of night",
            Self::Legend => "A weekend coding legend",
        }
    }

    const fn icon(self) -> &'static str {
        match self {
            Self::WeekendWarrior => "⚔️",
            Self::NightOwl => "🦉",
            Self::EarlyBird => "🐦",
            Self::StreakMaster => "🔥",
            Self::BingeCoder => "💻",
            Self::NoLife => "💀",
            Self::Polyglot => "🌍",
            Self::CoffeePowered => "☕",
            Self::Legend => "👑",
        }
    }

    const fn rarity(self) -> Rarity {
        match self {
            Self::WeekendWarrior | Self::CoffeePowered => Rarity::Common,
            Self::NightOwl | Self::EarlyBird | Self::Polyglot => Rarity::Rare,
            Self::StreakMaster | Self::BingeCoder => Rarity::Epic,
            Self::NoLife | Self::Legend => Rarity::Legendary,
        }
    }

    const fn requirement(self) -> &'static str {
        match self {
            Self::WeekendWarrior => "20+ weeks on the calendar with weekend commits",
            Self::NightOwl => "20+ commits between 10PM and 2AM",
            Self::EarlyBird => "20+ commits between 5AM and 8AM",
            Self::StreakMaster => "8+ week weekend streak",
            Self::BingeCoder => "200+ weekend commits",
            Self::NoLife => "More than 5 weekend commits per week",
            Self::Polyglot => "Weekend commits in 3+ languages",
            Self::CoffeePowered => "10+ commits between 2AM and 6AM",
            Self::Legend => "500+ weekend commits",
        }
    }

    fn is_unlocked(self, inputs: &AchievementInputs<'_>) -> bool {
        match self {
            Self::WeekendWarrior => inputs.total_weeks >= 20 && inputs.total_commits > 0,
            Self::NightOwl => commits_in(inputs, |h| h >= 22 || h <= 2) >= 20,
            Self::EarlyBird => commits_in(inputs, |h| (5..=8).contains(&h)) >= 20,
            Self::StreakMaster => inputs.longest_streak >= 8,
            Self::BingeCoder => inputs.total_commits > 200,
            Self::NoLife => {
                inputs.total_commits as f64 / inputs.total_weeks.max(1) as f64 > 5.0
            }
            Self::Polyglot => inputs.language_count >= 3,
            // Overlaps the night owl window at 2AM
            Self::CoffeePowered => commits_in(inputs, |h| (2..=6).contains(&h)) >= 10,
            Self::Legend => inputs.total_commits > 500,
        }
    }
}

fn commits_in(inputs: &AchievementInputs<'_>, in_window: impl Fn(u8) -> bool) -> i64 {
    inputs
        .commits_by_hour
        .iter()
        .filter(|h| in_window(h.hour))
        .map(|h| h.commits)
        .sum()
}

/// Evaluate all nine badges, in display order
pub fn evaluate(inputs: &AchievementInputs<'_>) -> Vec<Achievement> {
    AchievementId::ALL
        .into_iter()
        .map(|id| Achievement {
            id: id.slug(),
            name: id.name(),
            description: id.description(),
            icon: id.icon(),
            rarity: id.rarity(),
            requirement: id.requirement(),
            unlocked: id.is_unlocked(inputs),
        })
        .collect()
}
