#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Mapping of parsed tests into rubric categories.
pub mod categorize;
/// Static feedback generation from a finished report.
pub mod feedback;
/// JUnit XML results parsing.
pub mod parser;
/// Report assembly, serialization, and CI signaling.
pub mod report;
/// Shared grade result types.
pub mod results;
/// Scoring policies and category score computation.
pub mod score;

pub use categorize::{CategorizedResults, categorize};
pub use feedback::generate_feedback;
pub use parser::{ParsedResults, ResultsError, parse_results};
pub use report::{CiEnv, GradeReport, ReportWriter, render_markdown, show_table};
pub use results::{Grade, ResultSummary, TestCaseResult, TestStatus};
pub use score::{CategoryScore, CategoryStatus, ScoringPolicy};

use crate::config::Rubric;

/// Grades one parsed result set against a rubric.
///
/// The timestamp is supplied by the caller so that repeated runs over the
/// same results file produce identical reports apart from it.
pub fn grade(
    parsed: &ParsedResults,
    rubric: &Rubric,
    timestamp: impl Into<String>,
) -> (GradeReport, CiEnv) {
    let categorized = categorize(&parsed.cases, rubric);
    let scores = score::score(&categorized, rubric);
    let report =
        GradeReport::from_scores(scores, rubric, parsed.summary.error.clone(), timestamp.into());
    let ci_env = CiEnv::from_report(&report, &parsed.summary);
    (report, ci_env)
}
