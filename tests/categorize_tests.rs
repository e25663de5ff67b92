use geograde::{
    config::Rubric,
    grade::{TestCaseResult, TestStatus, categorize},
};

fn case(class_name: &str, name: &str, status: TestStatus) -> TestCaseResult {
    TestCaseResult::builder()
        .name(name)
        .class_name(class_name)
        .status(status)
        .build()
}

fn rubric(json: &str) -> Rubric {
    Rubric::from_json(json).expect("rubric")
}

#[test]
fn token_fallback_assigns_first_match_in_table_order() {
    let rubric = rubric(
        r#"{
        "assignment": "t",
        "categories": [
            {"key": "joins", "display_name": "Joins", "points": 5.0, "tokens": ["join"]},
            {"key": "buffers", "display_name": "Buffers", "points": 5.0, "tokens": ["buffer"]}
        ]
    }"#,
    );
    // Matches both tokens; lands in whichever category is listed first.
    let cases = [case("tests.test_ops", "test_buffer_then_join", TestStatus::Passed)];
    let categorized = categorize(&cases, &rubric);

    assert_eq!(categorized.bucket("joins").expect("bucket").len(), 1);
    assert!(categorized.bucket("buffers").expect("bucket").is_empty());
    assert!(categorized.other.is_empty());
}

#[test]
fn explicit_test_list_beats_token_order() {
    let rubric = rubric(
        r#"{
        "assignment": "t",
        "categories": [
            {"key": "joins", "display_name": "Joins", "points": 5.0, "tokens": ["join"]},
            {"key": "buffers", "display_name": "Buffers", "points": 5.0, "tokens": ["buffer"],
             "tests": ["tests.test_ops::test_buffer_then_join"]}
        ]
    }"#,
    );
    let cases = [case("tests.test_ops", "test_buffer_then_join", TestStatus::Passed)];
    let categorized = categorize(&cases, &rubric);

    assert!(categorized.bucket("joins").expect("bucket").is_empty());
    assert_eq!(categorized.bucket("buffers").expect("bucket").len(), 1);
}

#[test]
fn token_matching_is_case_insensitive_and_checks_class_name() {
    let rubric = rubric(
        r#"{
        "assignment": "t",
        "categories": [
            {"key": "raster", "display_name": "Raster", "points": 5.0, "tokens": ["raster"]}
        ]
    }"#,
    );
    let cases = [case("tests.TestRasterStats", "test_mean_elevation", TestStatus::Passed)];
    let categorized = categorize(&cases, &rubric);

    assert_eq!(categorized.bucket("raster").expect("bucket").len(), 1);
}

#[test]
fn unmatched_tests_land_in_other_and_are_not_scored() {
    let rubric = rubric(
        r#"{
        "assignment": "t",
        "categories": [
            {"key": "raster", "display_name": "Raster", "points": 5.0, "tokens": ["raster"]}
        ]
    }"#,
    );
    let cases = [case("tests.test_misc", "test_readme_exists", TestStatus::Passed)];
    let categorized = categorize(&cases, &rubric);

    assert!(categorized.bucket("raster").expect("bucket").is_empty());
    assert_eq!(categorized.other.len(), 1);
}

#[test]
fn every_rubric_category_gets_a_bucket() {
    let rubric = Rubric::load(None).expect("default rubric");
    let categorized = categorize(&[], &rubric);

    assert_eq!(categorized.iter().count(), rubric.categories.len());
    for (_, bucket) in categorized.iter() {
        assert!(bucket.is_empty());
    }
}
