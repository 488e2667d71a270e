//! Result types returned to the front end

use crate::achievements::Achievement;
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use weekend_warrior_database::{GlobalAverages, NewLeaderboardEntry};

/// Locally computed weekend stats, before leaderboard standing is known
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekendSummary {
    pub username: String,
    pub total_weekend_commits: i64,
    pub saturday_commits: i64,
    pub sunday_commits: i64,
    pub dedication_percentage: i64,
    pub longest_streak: i64,
    pub current_streak: i64,
    /// Sent as `{"date": "", "commits": 0}` when no weekend day had commits
    #[serde(serialize_with = "busiest_day_or_empty")]
    pub busiest_day: Option<DayStats>,
    pub weekends_by_month: Vec<WeekendMonth>,
    pub commits_by_hour: Vec<HourlyCommits>,
    pub top_languages: Vec<LanguageStat>,
    pub top_repos: Vec<RepoStat>,
    pub achievements: Vec<Achievement>,
}

/// Where a player sits on the shared leaderboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub global_rank: i64,
    pub total_players: i64,
    pub percentile: i64,
    pub global_averages: GlobalAverages,
}

/// Full response for one player
#[derive(Debug, Clone, Serialize)]
pub struct WeekendStats {
    #[serde(flatten)]
    pub summary: WeekendSummary,
    #[serde(flatten)]
    pub standing: Standing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayStats {
    pub date: NaiveDate,
    pub commits: i64,
}

/// Heatmap column group for one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekendMonth {
    pub month: String,
    pub weeks: Vec<WeekendWeek>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekendWeek {
    /// 1-based index of the calendar week in the fetched calendar
    pub week_number: usize,
    pub saturday: Option<DayStats>,
    pub sunday: Option<DayStats>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourlyCommits {
    pub hour: u8,
    pub commits: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageStat {
    pub name: String,
    pub commits: i64,
    pub percentage: i64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoStat {
    pub name: String,
    pub commits: i64,
}

#[derive(Serialize)]
struct EmptyDay {
    date: &'static str,
    commits: i64,
}

fn busiest_day_or_empty<S: Serializer>(day: &Option<DayStats>, serializer: S) -> Result<S::Ok, S::Error> {
    match day {
        Some(day) => day.serialize(serializer),
        None => EmptyDay { date: "", commits: 0 }.serialize(serializer),
    }
}

impl Standing {
    /// Standing reported when the leaderboard cannot be reached
    pub fn offline() -> Self {
        Self {
            global_rank: 1,
            total_players: 1,
            percentile: 1,
            global_averages: GlobalAverages::default(),
        }
    }
}

impl WeekendSummary {
    pub fn achievements_unlocked(&self) -> i64 {
        self.achievements.iter().filter(|a| a.unlocked).count() as i64
    }

    /// The subset of the summary persisted on the leaderboard
    pub fn to_entry(&self) -> NewLeaderboardEntry {
        NewLeaderboardEntry {
            username: self.username.clone(),
            total_weekend_commits: self.total_weekend_commits,
            saturday_commits: self.saturday_commits,
            sunday_commits: self.sunday_commits,
            dedication_percentage: self.dedication_percentage,
            longest_streak: self.longest_streak,
            achievements_unlocked: self.achievements_unlocked(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::aggregate::summarize;
    use chrono::{Datelike, NaiveDate};
    use weekend_warrior_collector::calendar::{CalendarWeek, ContributionDay, UserContributions};

    #[test]
    fn test_busiest_day_is_never_null() {
        let idle = summarize("octocat", &UserContributions::default());
        let json = serde_json::to_value(&idle).unwrap();
        assert_eq!(json["busiestDay"], serde_json::json!({"date": "", "commits": 0}));

        let date = NaiveDate::from_ymd_opt(2025, 1, 4).unwrap();
        let active = summarize(
            "octocat",
            &UserContributions {
                weeks: vec![CalendarWeek {
                    days: vec![ContributionDay {
                        date,
                        weekday: date.weekday().num_days_from_sunday() as u8,
                        contribution_count: 6,
                    }],
                }],
                ..Default::default()
            },
        );
        let json = serde_json::to_value(&active).unwrap();
        assert_eq!(json["busiestDay"], serde_json::json!({"date": "2025-01-04", "commits": 6}));
    }
}
