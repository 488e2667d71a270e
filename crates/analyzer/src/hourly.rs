//! Simulated hour-of-day distribution.
//!
//! GitHub's contribution calendar only reports daily counts, so the hourly
//! buckets are synthesized from a fixed weight table. They are a display
//! approximation and carry no real timestamp information.

use crate::stats::HourlyCommits;

/// Share of a day's commits assigned to each hour, in hundredths.
///
/// Skewed toward evenings and late nights. The weights add up to 158, so the
/// buckets deliberately overshoot the real daily total.
pub const HOUR_WEIGHTS: [i64; 24] = [
    8, 6, 4, 2, 1, 1, 2, 3, 4, 6, 8, 9, // 00-11
    7, 6, 8, 9, 10, 8, 7, 8, 9, 10, 12, 10, // 12-23
];

/// Running 24-bucket total of simulated commits
#[derive(Debug, Clone, Default)]
pub struct HourlyDistribution {
    buckets: [i64; 24],
}

impl HourlyDistribution {
    /// Spread one day's commits over the hours, flooring each bucket
    pub fn add_day(&mut self, commits: i64) {
        for (bucket, weight) in self.buckets.iter_mut().zip(HOUR_WEIGHTS) {
            *bucket += commits * weight / 100;
        }
    }

    pub fn into_hours(self) -> Vec<HourlyCommits> {
        self.buckets
            .into_iter()
            .enumerate()
            .map(|(hour, commits)| HourlyCommits {
                hour: hour as u8,
                commits,
            })
            .collect()
    }
}
