#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use bon::Builder;
use serde::{Deserialize, Serialize};

/// Outcome of one executed test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    /// The test passed.
    Passed,
    /// An assertion failed.
    Failed,
    /// The test raised outside an assertion, or failed to collect.
    Error,
    /// The test was skipped.
    Skipped,
}

impl TestStatus {
    /// Whether this status counts toward the pass rate.
    pub fn is_pass(self) -> bool {
        matches!(self, TestStatus::Passed)
    }
}

/// One executed test as recorded in the results file. Immutable once
/// parsed.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(on(String, into))]
pub struct TestCaseResult {
    /// Test function name.
    pub name:             String,
    /// Class or module path the runner attributed the test to.
    pub class_name:       String,
    /// Outcome of the run.
    pub status:           TestStatus,
    /// Wall-clock duration in seconds.
    #[builder(default)]
    pub duration_seconds: f64,
    /// Failure, error, or skip message, when the test did not pass.
    pub message:          Option<String>,
}

impl TestCaseResult {
    /// Fully-qualified identifier, `class::name`.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.class_name, self.name)
    }
}

/// Aggregate counts for one results file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    /// Total tests recorded.
    pub total:        usize,
    /// Tests that passed.
    pub passed:       usize,
    /// Tests that failed an assertion.
    pub failed:       usize,
    /// Tests that errored.
    pub errored:      usize,
    /// Tests that were skipped.
    pub skipped:      usize,
    /// Wall-clock time reported by the suite.
    pub time_seconds: f64,
    /// Set when the results file was missing or malformed; the counts are
    /// all zero in that case and grading proceeds degraded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error:        Option<String>,
}

impl ResultSummary {
    /// A summary for a results file that could not be read or parsed.
    pub fn degraded(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// A grade as earned points over possible points.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Grade {
    /// The points earned.
    pub earned: f64,
    /// The maximum points possible.
    pub out_of: f64,
}

impl Grade {
    /// Creates a new grade -
    /// * `earned` - The points earned
    /// * `out_of` - The maximum points possible
    pub fn new(earned: f64, out_of: f64) -> Self {
        Self { earned, out_of }
    }
}

impl Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}/{:.2}", self.earned, self.out_of)
    }
}
