#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use serde::{Deserialize, Serialize};

use super::categorize::CategorizedResults;
use crate::config::Rubric;

/// Which formula converts a category's pass rate into earned points.
///
/// Exactly one policy applies to every category of a report; the two are
/// never blended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// `earned = possible * pass_rate`.
    #[default]
    Proportional,
    /// Stepped awards at fixed pass-rate thresholds.
    Tiered,
}

impl ScoringPolicy {
    /// Fraction of the possible points awarded at a pass rate.
    pub fn award_fraction(self, pass_rate: f64) -> f64 {
        match self {
            ScoringPolicy::Proportional => pass_rate,
            ScoringPolicy::Tiered => {
                if pass_rate >= 0.9 {
                    1.0
                } else if pass_rate >= 0.8 {
                    0.9
                } else if pass_rate >= 0.7 {
                    0.8
                } else if pass_rate >= 0.5 {
                    0.6
                } else {
                    0.3
                }
            }
        }
    }
}

/// Qualitative judgement of one category's tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryStatus {
    /// At least 90% of the category's tests pass.
    Excellent,
    /// At least 75% pass.
    Good,
    /// At least 60% pass.
    Acceptable,
    /// Some tests pass, fewer than 60%.
    NeedsImprovement,
    /// Tests exist for the category but none pass.
    Incomplete,
    /// No tests matched the category at all.
    NotImplemented,
}

impl CategoryStatus {
    /// Derives the status from a category's test tally.
    fn from_tally(passed: usize, total: usize) -> Self {
        if total == 0 {
            return Self::NotImplemented;
        }
        if passed == 0 {
            return Self::Incomplete;
        }
        let rate = passed as f64 / total as f64;
        if rate >= 0.9 {
            Self::Excellent
        } else if rate >= 0.75 {
            Self::Good
        } else if rate >= 0.6 {
            Self::Acceptable
        } else {
            Self::NeedsImprovement
        }
    }

    /// Short qualitative note used in feedback lines.
    pub fn note(self) -> &'static str {
        match self {
            Self::Excellent => "excellent work",
            Self::Good => "good progress",
            Self::Acceptable => "acceptable, review the failing cases",
            Self::NeedsImprovement => "needs improvement",
            Self::Incomplete => "attempted, but no tests pass yet",
            Self::NotImplemented => "not implemented",
        }
    }
}

/// One scored rubric line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    /// Rubric category key.
    pub category_key:    String,
    /// Human-readable category name.
    pub display_name:    String,
    /// Points the category is worth.
    pub possible_points: f64,
    /// Points earned, already rounded.
    pub earned_points:   f64,
    /// Tests that passed in this category.
    pub tests_passed:    usize,
    /// Tests assigned to this category.
    pub tests_total:     usize,
    /// Qualitative judgement.
    pub status:          CategoryStatus,
}

/// Rounds points to the nearest cent.
///
/// Applied exactly once, per category; the report total is the exact sum of
/// the rounded values, so the parts always add up to the whole.
fn round_cents(points: f64) -> f64 {
    (points * 100.0).round() / 100.0
}

/// Scores every rubric category from its categorized results.
pub fn score(categorized: &CategorizedResults, rubric: &Rubric) -> Vec<CategoryScore> {
    rubric
        .categories
        .iter()
        .map(|category| {
            let cases = categorized.bucket(&category.key).unwrap_or(&[]);
            let total = cases.len();
            let passed = cases.iter().filter(|case| case.status.is_pass()).count();
            let earned = if total == 0 {
                0.0
            } else {
                let pass_rate = passed as f64 / total as f64;
                // Rubrics with sub-cent point values clamp rather than
                // round past the category maximum.
                round_cents(category.points * rubric.policy.award_fraction(pass_rate))
                    .min(category.points)
            };
            CategoryScore {
                category_key:    category.key.clone(),
                display_name:    category.display_name.clone(),
                possible_points: category.points,
                earned_points:   earned,
                tests_passed:    passed,
                tests_total:     total,
                status:          CategoryStatus::from_tally(passed, total),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proportional_awards_the_pass_rate() {
        assert_eq!(ScoringPolicy::Proportional.award_fraction(0.5), 0.5);
        assert_eq!(ScoringPolicy::Proportional.award_fraction(1.0), 1.0);
    }

    #[test]
    fn tiered_awards_stepped_fractions() {
        let policy = ScoringPolicy::Tiered;
        assert_eq!(policy.award_fraction(1.0), 1.0);
        assert_eq!(policy.award_fraction(0.9), 1.0);
        assert_eq!(policy.award_fraction(0.85), 0.9);
        assert_eq!(policy.award_fraction(0.75), 0.8);
        assert_eq!(policy.award_fraction(0.5), 0.6);
        assert_eq!(policy.award_fraction(0.0), 0.3);
    }

    #[test]
    fn status_bands() {
        assert_eq!(CategoryStatus::from_tally(0, 0), CategoryStatus::NotImplemented);
        assert_eq!(CategoryStatus::from_tally(0, 4), CategoryStatus::Incomplete);
        assert_eq!(CategoryStatus::from_tally(1, 4), CategoryStatus::NeedsImprovement);
        assert_eq!(CategoryStatus::from_tally(3, 4), CategoryStatus::Good);
        assert_eq!(CategoryStatus::from_tally(4, 4), CategoryStatus::Excellent);
    }

    #[test]
    fn rounding_is_to_the_nearest_cent() {
        assert_eq!(round_cents(2.506), 2.51);
        assert_eq!(round_cents(2.504), 2.5);
        assert_eq!(round_cents(1.0 / 3.0 * 10.0), 3.33);
    }
}
