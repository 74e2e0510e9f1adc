use crate::models::{MatchResult, MatchStatistics, ScoreDistribution};

/// Aggregate a computed match set into dashboard statistics
pub fn summarize(matches: &[MatchResult]) -> MatchStatistics {
    let mut distribution = ScoreDistribution::default();
    let mut total: u64 = 0;

    for m in matches {
        total += u64::from(m.match_score);
        distribution.record(m.match_score);
    }

    let average_score = if matches.is_empty() {
        0.0
    } else {
        total as f64 / matches.len() as f64
    };

    MatchStatistics {
        count: matches.len(),
        average_score,
        highest_score: matches.iter().map(|m| m.match_score).max(),
        distribution,
    }
}

impl ScoreDistribution {
    /// Count one score into its bucket
    pub fn record(&mut self, score: u8) {
        match score {
            0..=39 => self.below_40 += 1,
            40..=59 => self.from_40_to_59 += 1,
            60..=79 => self.from_60_to_79 += 1,
            _ => self.from_80_to_100 += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.below_40 + self.from_40_to_59 + self.from_60_to_79 + self.from_80_to_100
    }
}

impl From<&[MatchResult]> for MatchStatistics {
    fn from(matches: &[MatchResult]) -> Self {
        summarize(matches)
    }
}
