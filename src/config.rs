#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{path::Path, time::Duration};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::grade::ScoringPolicy;

/// Default file name pytest writes its JUnit XML results to.
pub const DEFAULT_RESULTS_FILE: &str = "test-results.xml";
/// Default file name for the JSON grade report.
pub const DEFAULT_REPORT_FILE: &str = "grade-report.json";
/// How long one pytest run may take before it is killed.
pub const PYTEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Rubric shipped with the course, used when no `--rubric` is given.
const DEFAULT_RUBRIC: &str = include_str!("assets/default_rubric.json");

/// One weighted line item of the grading scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RubricCategory {
    /// Stable identifier used in reports and CI keys.
    pub key:          String,
    /// Human-readable name shown to students.
    pub display_name: String,
    /// Points this category is worth.
    pub points:       f64,
    /// Case-insensitive substrings matched against test and class names.
    /// Fallback path only; every hit is logged as a diagnostic.
    #[serde(default)]
    pub tokens:       Vec<String>,
    /// Fully-qualified `class::name` test identifiers assigned to this
    /// category at authoring time. Exact matches always win over tokens.
    #[serde(default)]
    pub tests:        Vec<String>,
}

/// A single letter-grade cutoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LetterCutoff {
    /// The letter awarded at or above the cutoff.
    pub letter:         String,
    /// Minimum percentage required for this letter.
    pub min_percentage: f64,
}

/// Letter-grade threshold table, highest cutoff first. Anything below the
/// last cutoff is an "F".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LetterScale(Vec<LetterCutoff>);

impl Default for LetterScale {
    fn default() -> Self {
        let cutoffs = [
            ("A+", 97.0),
            ("A", 93.0),
            ("A-", 90.0),
            ("B+", 87.0),
            ("B", 83.0),
            ("B-", 80.0),
            ("C+", 77.0),
            ("C", 73.0),
            ("C-", 70.0),
            ("D+", 67.0),
            ("D", 63.0),
            ("D-", 60.0),
        ];
        Self(
            cutoffs
                .iter()
                .map(|(letter, min_percentage)| LetterCutoff {
                    letter:         (*letter).to_string(),
                    min_percentage: *min_percentage,
                })
                .collect(),
        )
    }
}

impl LetterScale {
    /// Returns the letter awarded for a percentage.
    pub fn letter_for(&self, percentage: f64) -> &str {
        self.0
            .iter()
            .find(|cutoff| percentage >= cutoff.min_percentage)
            .map(|cutoff| cutoff.letter.as_str())
            .unwrap_or("F")
    }

    /// Ensures cutoffs are strictly decreasing so the letter is a monotonic
    /// function of the percentage.
    fn validate(&self) -> Result<()> {
        ensure!(!self.0.is_empty(), "letter scale must have at least one cutoff");
        for pair in self.0.windows(2) {
            ensure!(
                pair[0].min_percentage > pair[1].min_percentage,
                "letter scale cutoffs must be strictly decreasing ({} then {})",
                pair[0].min_percentage,
                pair[1].min_percentage
            );
        }
        Ok(())
    }
}

/// Fallback percentage below which the grade does not pass.
fn default_pass_threshold() -> f64 {
    60.0
}

/// Complete rubric configuration for one assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rubric {
    /// Assignment title shown in reports.
    pub assignment:     String,
    /// Ordered rubric categories; order decides token tie-breaks.
    pub categories:     Vec<RubricCategory>,
    /// Which scoring formula applies to every category.
    #[serde(default)]
    pub policy:         ScoringPolicy,
    /// Letter-grade thresholds, data not code.
    #[serde(default)]
    pub letter_scale:   LetterScale,
    /// Percentage needed for a passing exit code.
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: f64,
}

impl Rubric {
    /// Loads the rubric from a JSON file, or the embedded course default
    /// when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Could not read rubric {}", path.display()))?;
                Self::from_json(&text)
                    .with_context(|| format!("Invalid rubric {}", path.display()))
            }
            None => Self::from_json(DEFAULT_RUBRIC).context("Embedded default rubric is invalid"),
        }
    }

    /// Parses and validates a rubric from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let rubric: Rubric = serde_json::from_str(text).context("Failed to parse rubric JSON")?;
        rubric.validate()?;
        Ok(rubric)
    }

    /// Total points available across all categories.
    pub fn total_points(&self) -> f64 {
        self.categories.iter().map(|category| category.points).sum()
    }

    /// Rejects rubrics that cannot be graded coherently.
    fn validate(&self) -> Result<()> {
        ensure!(!self.categories.is_empty(), "rubric has no categories");
        for category in &self.categories {
            ensure!(
                category.points > 0.0,
                "category {} must be worth a positive number of points",
                category.key
            );
        }
        let mut keys: Vec<&str> = self
            .categories
            .iter()
            .map(|category| category.key.as_str())
            .collect();
        keys.sort_unstable();
        keys.dedup();
        ensure!(keys.len() == self.categories.len(), "rubric category keys must be unique");
        ensure!(
            (0.0..=100.0).contains(&self.pass_threshold),
            "pass threshold must be a percentage, got {}",
            self.pass_threshold
        );
        self.letter_scale.validate()
    }
}
