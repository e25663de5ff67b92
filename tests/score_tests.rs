use geograde::{
    config::{LetterScale, Rubric},
    grade::{CategoryStatus, TestCaseResult, TestStatus, categorize, score::score},
};

fn case(name: &str, status: TestStatus) -> TestCaseResult {
    TestCaseResult::builder()
        .name(name)
        .class_name("tests.test_suite")
        .status(status)
        .build()
}

fn two_category_rubric(policy: &str) -> Rubric {
    Rubric::from_json(&format!(
        r#"{{
        "assignment": "t",
        "categories": [
            {{"key": "joins", "display_name": "Joins", "points": 10.0, "tokens": ["join"]}},
            {{"key": "raster", "display_name": "Raster", "points": 10.0, "tokens": ["raster"]}}
        ],
        "policy": "{policy}"
    }}"#
    ))
    .expect("rubric")
}

#[test]
fn proportional_scores_scale_with_pass_rate() {
    let rubric = two_category_rubric("proportional");
    let cases = [
        case("test_join_inner", TestStatus::Passed),
        case("test_join_outer", TestStatus::Passed),
        case("test_join_spatial", TestStatus::Failed),
        case("test_join_attribute", TestStatus::Failed),
        case("test_raster_mean", TestStatus::Passed),
    ];
    let scores = score(&categorize(&cases, &rubric), &rubric);

    assert_eq!(scores[0].earned_points, 5.0);
    assert_eq!(scores[0].tests_passed, 2);
    assert_eq!(scores[0].tests_total, 4);
    assert_eq!(scores[1].earned_points, 10.0);
    assert_eq!(scores[1].status, CategoryStatus::Excellent);
}

#[test]
fn tiered_scores_step_at_thresholds() {
    let rubric = two_category_rubric("tiered");
    // 3/4 passing sits in the 0.7 tier.
    let cases = [
        case("test_join_inner", TestStatus::Passed),
        case("test_join_outer", TestStatus::Passed),
        case("test_join_spatial", TestStatus::Passed),
        case("test_join_attribute", TestStatus::Failed),
        // 0/1 passing still earns the floor tier.
        case("test_raster_mean", TestStatus::Failed),
    ];
    let scores = score(&categorize(&cases, &rubric), &rubric);

    assert_eq!(scores[0].earned_points, 8.0);
    assert_eq!(scores[1].earned_points, 3.0);
    assert_eq!(scores[1].status, CategoryStatus::Incomplete);
}

#[test]
fn category_without_tests_is_not_implemented() {
    let rubric = two_category_rubric("proportional");
    let cases = [case("test_join_inner", TestStatus::Passed)];
    let scores = score(&categorize(&cases, &rubric), &rubric);

    assert_eq!(scores[1].earned_points, 0.0);
    assert_eq!(scores[1].tests_total, 0);
    assert_eq!(scores[1].status, CategoryStatus::NotImplemented);
}

#[test]
fn errors_and_skips_count_against_the_pass_rate() {
    let rubric = two_category_rubric("proportional");
    let cases = [
        case("test_join_inner", TestStatus::Passed),
        case("test_join_outer", TestStatus::Error),
        case("test_join_spatial", TestStatus::Skipped),
        case("test_join_attribute", TestStatus::Failed),
    ];
    let scores = score(&categorize(&cases, &rubric), &rubric);

    assert_eq!(scores[0].tests_passed, 1);
    assert_eq!(scores[0].tests_total, 4);
    assert_eq!(scores[0].earned_points, 2.5);
}

#[test]
fn earned_points_are_rounded_to_cents_and_stay_within_bounds() {
    let rubric = Rubric::from_json(
        r#"{
        "assignment": "t",
        "categories": [
            {"key": "joins", "display_name": "Joins", "points": 7.0, "tokens": ["join"]}
        ]
    }"#,
    )
    .expect("rubric");
    // 1/3 passing forces a repeating decimal before rounding.
    let cases = [
        case("test_join_inner", TestStatus::Passed),
        case("test_join_outer", TestStatus::Failed),
        case("test_join_spatial", TestStatus::Failed),
    ];
    let scores = score(&categorize(&cases, &rubric), &rubric);

    assert_eq!(scores[0].earned_points, 2.33);
    assert!(scores[0].earned_points >= 0.0);
    assert!(scores[0].earned_points <= scores[0].possible_points);
}

#[test]
fn letter_grade_is_monotonic_in_percentage() {
    let scale = LetterScale::default();
    let order = [
        "F", "D-", "D", "D+", "C-", "C", "C+", "B-", "B", "B+", "A-", "A", "A+",
    ];
    let rank = |letter: &str| {
        order
            .iter()
            .position(|known| *known == letter)
            .expect("known letter")
    };

    let mut previous = rank(scale.letter_for(0.0));
    let mut percentage = 0.0;
    while percentage <= 100.0 {
        let current = rank(scale.letter_for(percentage));
        assert!(current >= previous, "letter dropped at {percentage}");
        previous = current;
        percentage += 0.25;
    }
}
