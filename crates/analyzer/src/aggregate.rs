//! Weekend aggregation over a player's contribution calendar

use crate::achievements::{self, AchievementInputs};
use crate::hourly::HourlyDistribution;
use crate::stats::{DayStats, LanguageStat, RepoStat, WeekendMonth, WeekendSummary, WeekendWeek};
use chrono::{DateTime, Datelike, Utc, Weekday};
use weekend_warrior_collector::calendar::{CommitRecord, ContributionDay, UserContributions};
use weekend_warrior_collector::SEASON_YEAR;

/// Weekends in the season, used as the dedication denominator
const SEASON_WEEKENDS: i64 = 52;

const TOP_N: usize = 5;

const DEFAULT_LANGUAGE_COLOR: &str = "#808080";

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Compute a player's weekend stats from their fetched contributions
pub fn summarize(username: &str, data: &UserContributions) -> WeekendSummary {
    let mut saturday_commits = 0;
    let mut sunday_commits = 0;
    let mut busiest_day: Option<DayStats> = None;
    let mut hourly = HourlyDistribution::default();
    let mut months: Vec<WeekendMonth> = Vec::new();

    let mut current_streak = 0;
    let mut longest_streak = 0;
    let mut active_weeks = 0;

    for (idx, week) in data.weeks.iter().enumerate() {
        let mut week_active = false;

        for day in week.days.iter().filter(|d| is_season_weekend(d)) {
            let commits = day.contribution_count;

            if day.weekday == ContributionDay::SATURDAY {
                saturday_commits += commits;
            } else {
                sunday_commits += commits;
            }

            if commits > 0 {
                week_active = true;

                if busiest_day.as_ref().map_or(true, |b| commits > b.commits) {
                    busiest_day = Some(DayStats {
                        date: day.date,
                        commits,
                    });
                }

                hourly.add_day(commits);
            }

            place_in_heatmap(&mut months, idx + 1, day);
        }

        if week_active {
            active_weeks += 1;
            current_streak += 1;
            longest_streak = longest_streak.max(current_streak);
        } else {
            current_streak = 0;
        }
    }

    let total_weekend_commits = saturday_commits + sunday_commits;
    let (top_repos, top_languages) = rank_repositories(username, data, total_weekend_commits);
    let commits_by_hour = hourly.into_hours();

    let achievements = achievements::evaluate(&AchievementInputs {
        total_commits: total_weekend_commits,
        longest_streak,
        commits_by_hour: &commits_by_hour,
        language_count: top_languages.len(),
        total_weeks: data.weeks.len(),
    });

    WeekendSummary {
        username: username.to_string(),
        total_weekend_commits,
        saturday_commits,
        sunday_commits,
        dedication_percentage: percentage(active_weeks, SEASON_WEEKENDS),
        longest_streak,
        current_streak,
        busiest_day,
        weekends_by_month: months,
        commits_by_hour,
        top_languages,
        top_repos,
        achievements,
    }
}

fn is_season_weekend(day: &ContributionDay) -> bool {
    day.date.year() == SEASON_YEAR && day.is_weekend()
}

fn is_season_weekend_commit(commit: &CommitRecord, username: &str) -> bool {
    let date: DateTime<Utc> = commit.committed_date;

    date.year() == SEASON_YEAR
        && matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
        && commit
            .author_login
            .as_deref()
            .is_some_and(|login| login.eq_ignore_ascii_case(username))
}

/// `round(part / whole * 100)`, 0 when `whole` is 0
fn percentage(part: i64, whole: i64) -> i64 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as i64
}

fn place_in_heatmap(months: &mut Vec<WeekendMonth>, week_number: usize, day: &ContributionDay) {
    let label = MONTHS[day.date.month0() as usize];

    let month_idx = match months.iter().position(|m| m.month == label) {
        Some(idx) => idx,
        None => {
            months.push(WeekendMonth {
                month: label.to_string(),
                weeks: Vec::new(),
            });
            months.len() - 1
        }
    };
    let weeks = &mut months[month_idx].weeks;

    let week_idx = match weeks.iter().position(|w| w.week_number == week_number) {
        Some(idx) => idx,
        None => {
            weeks.push(WeekendWeek {
                week_number,
                saturday: None,
                sunday: None,
            });
            weeks.len() - 1
        }
    };

    let stats = Some(DayStats {
        date: day.date,
        commits: day.contribution_count,
    });
    if day.weekday == ContributionDay::SATURDAY {
        weeks[week_idx].saturday = stats;
    } else {
        weeks[week_idx].sunday = stats;
    }
}

/// Count the player's own weekend commits per repository and roll them up
/// by primary language. Both lists come back sorted and truncated.
fn rank_repositories(
    username: &str,
    data: &UserContributions,
    total_weekend_commits: i64,
) -> (Vec<RepoStat>, Vec<LanguageStat>) {
    let mut repos: Vec<RepoStat> = Vec::new();
    let mut languages: Vec<LanguageStat> = Vec::new();

    for repo in &data.repositories {
        let Some(commits) = &repo.commits else {
            continue;
        };

        let count = commits
            .iter()
            .filter(|c| is_season_weekend_commit(c, username))
            .count() as i64;

        if count == 0 {
            continue;
        }

        repos.push(RepoStat {
            name: repo.name.clone(),
            commits: count,
        });

        if let Some(lang) = &repo.primary_language {
            match languages.iter_mut().find(|l| l.name == lang.name) {
                Some(existing) => existing.commits += count,
                None => languages.push(LanguageStat {
                    name: lang.name.clone(),
                    commits: count,
                    percentage: 0,
                    color: lang
                        .color
                        .clone()
                        .unwrap_or_else(|| DEFAULT_LANGUAGE_COLOR.to_string()),
                }),
            }
        }
    }

    // Stable sorts keep first-seen order between ties
    repos.sort_by(|a, b| b.commits.cmp(&a.commits));
    repos.truncate(TOP_N);

    for lang in &mut languages {
        lang.percentage = percentage(lang.commits, total_weekend_commits);
    }
    languages.sort_by(|a, b| b.commits.cmp(&a.commits));
    languages.truncate(TOP_N);

    (repos, languages)
}
