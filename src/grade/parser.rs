#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Parses JUnit-style XML results files.
//!
//! The file format is owned by the test runner; this module consumes the
//! shape pytest emits with `--junitxml`: a `<testsuite>` root (possibly
//! wrapped in `<testsuites>`) with nested `<testcase>` elements, each
//! optionally carrying a `<failure>`, `<error>`, or `<skipped>` child.

use std::path::Path;

use roxmltree::{Document, Node};
use thiserror::Error;
use tracing::warn;

use super::results::{ResultSummary, TestCaseResult, TestStatus};

/// Why a results file could not be parsed.
#[derive(Debug, Error)]
pub enum ResultsError {
    /// The file does not exist.
    #[error("results file not found: {path}")]
    Missing {
        /// The path that was looked up.
        path: String,
    },
    /// The file exists but could not be read.
    #[error("results file could not be read: {source}")]
    Unreadable {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not well-formed XML.
    #[error("results file is not valid XML: {source}")]
    Malformed {
        /// The underlying XML error.
        #[from]
        source: roxmltree::Error,
    },
}

/// Parsed contents of one results file.
#[derive(Debug, Clone, Default)]
pub struct ParsedResults {
    /// Aggregate counts, tallied from the test cases themselves.
    pub summary: ResultSummary,
    /// Per-test records in document order.
    pub cases:   Vec<TestCaseResult>,
}

/// Reads and parses a results file.
///
/// Never raises: a missing or malformed file degrades to an empty result
/// set with the summary's `error` field set, and grading proceeds treating
/// every category as zero.
pub fn parse_results(path: &Path) -> ParsedResults {
    match try_parse(path) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("{e}; grading will proceed with an empty result set");
            ParsedResults {
                summary: ResultSummary::degraded(e.to_string()),
                cases:   Vec::new(),
            }
        }
    }
}

/// Fallible read-and-parse used by [`parse_results`].
fn try_parse(path: &Path) -> Result<ParsedResults, ResultsError> {
    if !path.exists() {
        return Err(ResultsError::Missing {
            path: path.display().to_string(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|source| ResultsError::Unreadable { source })?;
    parse_str(&text)
}

/// Parses results from XML text.
pub fn parse_str(text: &str) -> Result<ParsedResults, ResultsError> {
    let doc = Document::parse(text)?;

    // The suite's own `tests`/`failures` attributes are not trusted; counts
    // are tallied from the actual `<testcase>` elements.
    let time_seconds = doc
        .descendants()
        .filter(|node| node.has_tag_name("testsuite"))
        .filter_map(|node| node.attribute("time"))
        .filter_map(|time| time.parse::<f64>().ok())
        .sum();

    let cases: Vec<TestCaseResult> = doc
        .descendants()
        .filter(|node| node.has_tag_name("testcase"))
        .map(parse_case)
        .collect();

    let summary = summarize(&cases, time_seconds);
    Ok(ParsedResults { summary, cases })
}

/// Builds one test record from a `<testcase>` element.
fn parse_case(node: Node<'_, '_>) -> TestCaseResult {
    let (status, message) = case_status(&node);
    TestCaseResult::builder()
        .name(node.attribute("name").unwrap_or_default())
        .class_name(node.attribute("classname").unwrap_or_default())
        .status(status)
        .duration_seconds(
            node.attribute("time")
                .and_then(|time| time.parse().ok())
                .unwrap_or(0.0),
        )
        .maybe_message(message)
        .build()
}

/// Determines the status of one test case from its child elements. A case
/// with no failure/error/skipped child passed.
fn case_status(node: &Node<'_, '_>) -> (TestStatus, Option<String>) {
    for child in node.children().filter(Node::is_element) {
        let message = child
            .attribute("message")
            .map(str::to_string)
            .or_else(|| {
                child
                    .text()
                    .map(|text| text.trim().to_string())
                    .filter(|text| !text.is_empty())
            });
        match child.tag_name().name() {
            "failure" => {
                return (
                    TestStatus::Failed,
                    message.or_else(|| Some("test failed".to_string())),
                );
            }
            "error" => {
                return (
                    TestStatus::Error,
                    message.or_else(|| Some("test errored".to_string())),
                );
            }
            "skipped" => {
                return (
                    TestStatus::Skipped,
                    message.or_else(|| Some("test skipped".to_string())),
                );
            }
            _ => {}
        }
    }
    (TestStatus::Passed, None)
}

/// Tallies the summary from per-case statuses.
fn summarize(cases: &[TestCaseResult], time_seconds: f64) -> ResultSummary {
    let mut summary = ResultSummary {
        total: cases.len(),
        time_seconds,
        ..ResultSummary::default()
    };
    for case in cases {
        match case.status {
            TestStatus::Passed => summary.passed += 1,
            TestStatus::Failed => summary.failed += 1,
            TestStatus::Error => summary.errored += 1,
            TestStatus::Skipped => summary.skipped += 1,
        }
    }
    summary
}
