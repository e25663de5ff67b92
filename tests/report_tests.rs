use std::{fs, path::PathBuf};

use geograde::{
    config::Rubric,
    grade::{self, CiEnv, ReportWriter, parse_results, render_markdown},
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("results")
        .join(name)
}

fn rubric_fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("rubrics")
        .join(name)
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("geograde-{}-{}", std::process::id(), name))
}

fn scenario_a() -> (geograde::grade::GradeReport, CiEnv) {
    let rubric =
        Rubric::load(Some(&rubric_fixture("four_categories.json"))).expect("rubric fixture");
    let parsed = parse_results(&fixture("scenario_a.xml"));
    grade::grade(&parsed, &rubric, "2026-08-08T00:00:00Z")
}

#[test]
fn json_carries_the_report_schema() {
    let (report, _) = scenario_a();
    let json = serde_json::to_string_pretty(&report).expect("serialize");
    let value: serde_json::Value = serde_json::from_str(&json).expect("reparse");

    assert_eq!(value["totalPoints"], 7.5);
    assert_eq!(value["possiblePoints"], 10.0);
    assert_eq!(value["percentage"], 75.0);
    assert_eq!(value["letterGrade"], "C");
    assert_eq!(value["timestamp"], "2026-08-08T00:00:00Z");
    assert!(value["feedback"].is_array());
    assert_eq!(value["categoryBreakdown"]["alpha"]["earnedPoints"], 0.0);
    assert_eq!(value["categoryBreakdown"]["beta"]["testsPassed"], 1);
    assert!(value.get("error").is_none());
}

#[test]
fn category_breakdown_preserves_rubric_order() {
    let (report, _) = scenario_a();
    let json = serde_json::to_string_pretty(&report).expect("serialize");

    let position = |key: &str| json.find(&format!("\"{key}\"")).expect("key present");
    assert!(position("alpha") < position("beta"));
    assert!(position("beta") < position("gamma"));
    assert!(position("gamma") < position("delta"));
}

#[test]
fn ci_env_pairs_are_ordered_and_complete() {
    let (_, ci_env) = scenario_a();
    let keys: Vec<&str> = ci_env.pairs().iter().map(|(key, _)| key.as_str()).collect();
    assert_eq!(
        keys,
        ["LETTER_GRADE", "GRADE_PERCENTAGE", "POINTS", "TESTS_PASSED", "TESTS_TOTAL"]
    );

    let rendered = ci_env.render();
    assert!(rendered.contains("LETTER_GRADE=C\n"));
    assert!(rendered.contains("GRADE_PERCENTAGE=75.0\n"));
    assert!(rendered.contains("POINTS=7.50\n"));
    assert!(rendered.contains("TESTS_PASSED=3\n"));
    assert!(rendered.ends_with("TESTS_TOTAL=4\n"));
}

#[test]
fn ci_env_appends_rather_than_truncates() {
    let (_, ci_env) = scenario_a();
    let path = temp_path("ci-env");
    let _ = fs::remove_file(&path);

    ci_env.append_to(&path).expect("first append");
    ci_env.append_to(&path).expect("second append");

    let text = fs::read_to_string(&path).expect("read back");
    assert_eq!(text.lines().count(), 10);
    let _ = fs::remove_file(&path);
}

#[test]
fn markdown_summary_renders_categories_and_feedback() {
    let (report, _) = scenario_a();
    let md = render_markdown(&report);

    assert!(md.starts_with("# Grade Report\n"));
    assert!(md.contains("- **Letter grade**: C\n"));
    assert!(md.contains("| Alpha | 0.00 | 2.50 | 0/1 |"));
    assert!(md.contains("| Beta | 2.50 | 2.50 | 1/1 |"));
    assert!(md.contains("## Feedback"));
}

#[test]
fn writer_keeps_going_when_one_output_fails() {
    let (report, ci_env) = scenario_a();
    let bad_json = temp_path("missing-dir").join("report.json");
    let markdown = temp_path("summary.md");
    let _ = fs::remove_file(&markdown);

    let writer = ReportWriter::builder()
        .json_path(Some(bad_json))
        .markdown_path(Some(markdown.clone()))
        .build();
    let failures = writer.write(&report, &ci_env);

    assert_eq!(failures, 1);
    assert!(markdown.exists());
    let _ = fs::remove_file(&markdown);
}

#[test]
fn degraded_reports_carry_the_error_field() {
    let rubric = Rubric::load(None).expect("default rubric");
    let parsed = parse_results(&fixture("does_not_exist.xml"));
    let (report, _) = grade::grade(&parsed, &rubric, "2026-08-08T00:00:00Z");

    let json = serde_json::to_string_pretty(&report).expect("serialize");
    let value: serde_json::Value = serde_json::from_str(&json).expect("reparse");
    assert!(value["error"].as_str().expect("error field").contains("not found"));
}
