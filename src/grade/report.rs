#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use itertools::Itertools;
use serde::{Serialize, Serializer, ser::SerializeMap};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Panel, Style, Width, object::Rows},
};
use tracing::{error, info};
use typed_builder::TypedBuilder;

use super::{
    feedback::generate_feedback,
    results::{Grade, ResultSummary},
    score::CategoryScore,
};
use crate::config::Rubric;

/// Scored categories in rubric order, serialized as an ordered mapping
/// keyed by category key.
#[derive(Debug, Clone, Default)]
pub struct CategoryBreakdown(Vec<CategoryScore>);

impl From<Vec<CategoryScore>> for CategoryBreakdown {
    fn from(scores: Vec<CategoryScore>) -> Self {
        Self(scores)
    }
}

impl CategoryBreakdown {
    /// Iterates category scores in rubric order.
    pub fn iter(&self) -> impl Iterator<Item = &CategoryScore> {
        self.0.iter()
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the breakdown has no categories.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for CategoryBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for score in &self.0 {
            map.serialize_entry(&score.category_key, score)?;
        }
        map.end()
    }
}

/// Aggregate result of one grading run. Constructed once per invocation,
/// serialized, and discarded.
#[derive(Debug, Clone, Serialize, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
#[serde(rename_all = "camelCase")]
pub struct GradeReport {
    /// Points earned across all categories.
    pub total_points:       f64,
    /// Points available across all categories.
    pub possible_points:    f64,
    /// `100 * total / possible`, or 0 when nothing was possible.
    pub percentage:         f64,
    /// Letter grade from the rubric's threshold table.
    pub letter_grade:       String,
    /// Scored categories in rubric order.
    pub category_breakdown: CategoryBreakdown,
    /// Ordered feedback lines.
    #[builder(default)]
    pub feedback:           Vec<String>,
    /// When the report was generated (RFC 3339).
    pub timestamp:          String,
    /// Set when grading ran degraded because the results file was missing
    /// or malformed.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub error:              Option<String>,
}

impl GradeReport {
    /// Assembles the report from scored categories.
    ///
    /// The total is the exact sum of the per-category earned points (which
    /// are already rounded), so the parts always add up to the whole.
    pub fn from_scores(
        scores: Vec<CategoryScore>,
        rubric: &Rubric,
        error: Option<String>,
        timestamp: String,
    ) -> Self {
        let total_points: f64 = scores.iter().map(|score| score.earned_points).sum();
        let possible_points = rubric.total_points();
        let percentage = if possible_points > 0.0 {
            100.0 * total_points / possible_points
        } else {
            0.0
        };
        let letter_grade = rubric.letter_scale.letter_for(percentage).to_string();

        let mut report = GradeReport::builder()
            .total_points(total_points)
            .possible_points(possible_points)
            .percentage(percentage)
            .letter_grade(letter_grade)
            .category_breakdown(CategoryBreakdown::from(scores))
            .timestamp(timestamp)
            .error(error)
            .build();
        report.feedback = generate_feedback(&report);
        report
    }

    /// Whether the grade clears a pass threshold (a percentage).
    pub fn passing(&self, pass_threshold: f64) -> bool {
        self.percentage >= pass_threshold
    }
}

/// CI output artifact: ordered `KEY=VALUE` pairs destined for the file
/// named by `GITHUB_ENV`. The pipeline produces this value; only
/// [`CiEnv::append_to`] touches the filesystem.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CiEnv(Vec<(String, String)>);

impl CiEnv {
    /// Builds the CI pairs for a finished report.
    pub fn from_report(report: &GradeReport, summary: &ResultSummary) -> Self {
        Self(vec![
            ("LETTER_GRADE".to_string(), report.letter_grade.clone()),
            ("GRADE_PERCENTAGE".to_string(), format!("{:.1}", report.percentage)),
            ("POINTS".to_string(), format!("{:.2}", report.total_points)),
            ("TESTS_PASSED".to_string(), summary.passed.to_string()),
            ("TESTS_TOTAL".to_string(), summary.total.to_string()),
        ])
    }

    /// The pairs, in output order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    /// Renders the pairs as `KEY=VALUE` lines with a trailing newline.
    pub fn render(&self) -> String {
        let mut text = self
            .0
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .join("\n");
        text.push('\n');
        text
    }

    /// Appends the rendered pairs to an environment file.
    pub fn append_to(&self, path: &Path) -> Result<()> {
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Could not open CI env file {}", path.display()))?;
        file.write_all(self.render().as_bytes())
            .with_context(|| format!("Could not append to CI env file {}", path.display()))?;
        Ok(())
    }
}

/// Writes a finished report to its configured outputs.
#[derive(Debug, Default, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
pub struct ReportWriter {
    /// JSON report path.
    json_path:     Option<PathBuf>,
    /// Markdown summary path.
    markdown_path: Option<PathBuf>,
    /// CI environment file path.
    ci_env_path:   Option<PathBuf>,
}

impl ReportWriter {
    /// Writes every configured output. Each write is independent and
    /// best-effort; a failure is logged and the remaining outputs still
    /// happen. Returns the number of outputs that could not be written.
    pub fn write(&self, report: &GradeReport, ci_env: &CiEnv) -> usize {
        let mut failures = 0;

        if let Some(path) = &self.json_path {
            match write_json(report, path) {
                Ok(()) => info!("wrote {}", path.display()),
                Err(e) => {
                    error!("could not write JSON report {}: {e:#}", path.display());
                    failures += 1;
                }
            }
        }

        if let Some(path) = &self.markdown_path {
            match fs::write(path, render_markdown(report))
                .with_context(|| format!("Could not write Markdown summary {}", path.display()))
            {
                Ok(()) => info!("wrote {}", path.display()),
                Err(e) => {
                    error!("{e:#}");
                    failures += 1;
                }
            }
        }

        if let Some(path) = &self.ci_env_path {
            match ci_env.append_to(path) {
                Ok(()) => info!("appended CI env lines to {}", path.display()),
                Err(e) => {
                    error!("{e:#}");
                    failures += 1;
                }
            }
        }

        failures
    }
}

/// Serializes the report as pretty JSON with a trailing newline.
fn write_json(report: &GradeReport, path: &Path) -> Result<()> {
    let mut text =
        serde_json::to_string_pretty(report).context("Could not serialize grade report")?;
    text.push('\n');
    fs::write(path, text).with_context(|| format!("Could not write {}", path.display()))
}

/// Renders the Markdown summary for a report.
pub fn render_markdown(report: &GradeReport) -> String {
    let mut md = String::with_capacity(2048);

    md.push_str("# Grade Report\n\n");
    md.push_str(&format!(
        "- **Score**: {:.2}/{:.2} ({:.1}%)\n",
        report.total_points, report.possible_points, report.percentage
    ));
    md.push_str(&format!("- **Letter grade**: {}\n", report.letter_grade));
    md.push_str(&format!("- **Generated**: {}\n", report.timestamp));
    if let Some(error) = &report.error {
        md.push_str(&format!("- **Warning**: {error}\n"));
    }
    md.push('\n');

    md.push_str("## Category Breakdown\n\n");
    md.push_str("| Category | Earned | Possible | Tests | Status |\n");
    md.push_str("|----------|--------|----------|-------|--------|\n");
    for score in report.category_breakdown.iter() {
        md.push_str(&format!(
            "| {} | {:.2} | {:.2} | {}/{} | {} |\n",
            score.display_name,
            score.earned_points,
            score.possible_points,
            score.tests_passed,
            score.tests_total,
            score.status.note()
        ));
    }
    md.push('\n');

    md.push_str("## Feedback\n\n");
    for line in &report.feedback {
        md.push_str(&format!("- {line}\n"));
    }

    md
}

/// Prints the per-category grading table to stderr.
pub fn show_table(report: &GradeReport) {
    /// One row of the terminal grading table.
    #[derive(Tabled)]
    struct CategoryRow {
        /// Category display name.
        #[tabled(rename = "Category")]
        category: String,
        /// Earned over possible points.
        #[tabled(rename = "Grade")]
        grade:    Grade,
        /// Passed over total tests.
        #[tabled(rename = "Tests")]
        tests:    String,
        /// Qualitative note.
        #[tabled(rename = "Status")]
        status:   String,
    }

    let rows: Vec<CategoryRow> = report
        .category_breakdown
        .iter()
        .map(|score| CategoryRow {
            category: score.display_name.clone(),
            grade:    Grade::new(score.earned_points, score.possible_points),
            tests:    format!("{}/{}", score.tests_passed, score.tests_total),
            status:   score.status.note().to_string(),
        })
        .collect();

    eprintln!(
        "{}",
        Table::new(&rows)
            .with(Panel::header("Grading Overview"))
            .with(Panel::footer(format!(
                "Total: {:.2}/{:.2} ({:.1}%)",
                report.total_points, report.possible_points, report.percentage
            )))
            .with(Modify::new(Rows::new(1..)).with(Width::wrap(24).keep_words(true)))
            .with(
                Modify::new(Rows::first())
                    .with(Alignment::center())
                    .with(Alignment::center_vertical()),
            )
            .with(
                Modify::new(Rows::last())
                    .with(Alignment::center())
                    .with(Alignment::center_vertical()),
            )
            .with(Style::modern())
    );
}
