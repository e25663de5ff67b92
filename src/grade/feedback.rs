#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use super::report::GradeReport;

/// Appended when the grade is below 80%.
const IMPROVEMENT_SUGGESTIONS: [&str; 4] = [
    "Re-run the failing tests locally with `pytest -v` and read each assertion message.",
    "Review the lab notebooks for the categories marked as needing improvement.",
    "Check coordinate reference systems first; CRS mismatches cause many silent failures.",
    "Bring stubborn failures to office hours before the resubmission deadline.",
];

/// Appended when the grade is 90% or above.
const ENCOURAGEMENT: [&str; 2] = [
    "Keep it up! Consider attempting the optional extension exercises.",
    "Your work is at the level we hope every submission reaches.",
];

/// Produces the ordered feedback lines for a report.
///
/// Pure function of the report: one overall line chosen by percentage band,
/// one line per category, then a conditional suggestions or encouragement
/// block. No randomness, no I/O.
pub fn generate_feedback(report: &GradeReport) -> Vec<String> {
    let mut lines = vec![overall_line(report.percentage, &report.letter_grade)];

    for score in report.category_breakdown.iter() {
        lines.push(format!(
            "{}: {:.2}/{:.2} with {}/{} tests passing ({})",
            score.display_name,
            score.earned_points,
            score.possible_points,
            score.tests_passed,
            score.tests_total,
            score.status.note()
        ));
    }

    if report.percentage >= 90.0 {
        lines.extend(ENCOURAGEMENT.iter().map(|line| (*line).to_string()));
    } else if report.percentage < 80.0 {
        lines.extend(IMPROVEMENT_SUGGESTIONS.iter().map(|line| (*line).to_string()));
    }

    lines
}

/// The overall-performance line for a percentage band.
fn overall_line(percentage: f64, letter: &str) -> String {
    let band = if percentage >= 90.0 {
        "Excellent work! You have a strong grasp of the material."
    } else if percentage >= 80.0 {
        "Good work. Most concepts are solid."
    } else if percentage >= 70.0 {
        "Satisfactory. A few areas need attention."
    } else if percentage >= 60.0 {
        "Passing, but significant gaps remain."
    } else {
        "Not passing yet. Revisit the fundamentals listed below."
    };
    format!("Overall: {percentage:.1}% ({letter}). {band}")
}
