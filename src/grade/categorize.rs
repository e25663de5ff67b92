#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Assigns parsed tests to rubric categories.
//!
//! Explicit authoring-time assignments (`class::name` identifiers listed on
//! a category) are the primary path and are exact. Token substring matching
//! survives only as a fallback for suites written before the rubric listed
//! their tests, and every fallback assignment is logged so the ambiguity is
//! never silent.

use tracing::warn;

use super::results::TestCaseResult;
use crate::config::{Rubric, RubricCategory};

/// Tests grouped by rubric category, in rubric order.
#[derive(Debug, Clone, Default)]
pub struct CategorizedResults {
    /// One bucket per rubric category, in rubric order.
    buckets:   Vec<(String, Vec<TestCaseResult>)>,
    /// Tests that matched no category. Not scored.
    pub other: Vec<TestCaseResult>,
}

impl CategorizedResults {
    /// Returns the bucket for a category key, if the rubric has one.
    pub fn bucket(&self, key: &str) -> Option<&[TestCaseResult]> {
        self.buckets
            .iter()
            .find(|(bucket_key, _)| bucket_key == key)
            .map(|(_, cases)| cases.as_slice())
    }

    /// Iterates buckets in rubric order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TestCaseResult])> {
        self.buckets
            .iter()
            .map(|(key, cases)| (key.as_str(), cases.as_slice()))
    }
}

/// Assigns each test to the first rubric category that claims it.
///
/// Scan order per test: explicit identifiers across all categories first,
/// then tokens in table order, then the unscored `other` bucket.
pub fn categorize(cases: &[TestCaseResult], rubric: &Rubric) -> CategorizedResults {
    let mut buckets: Vec<(String, Vec<TestCaseResult>)> = rubric
        .categories
        .iter()
        .map(|category| (category.key.clone(), Vec::new()))
        .collect();
    let mut other = Vec::new();

    'cases: for case in cases {
        let qualified = case.qualified_name();

        for (index, category) in rubric.categories.iter().enumerate() {
            if category.tests.iter().any(|test| *test == qualified) {
                buckets[index].1.push(case.clone());
                continue 'cases;
            }
        }

        for (index, category) in rubric.categories.iter().enumerate() {
            if matches_token(category, case) {
                warn!(
                    "{qualified} assigned to category {} by token match; list it under the \
                     category's tests to make the assignment exact",
                    category.key
                );
                buckets[index].1.push(case.clone());
                continue 'cases;
            }
        }

        warn!("{qualified} matched no rubric category and will not be scored");
        other.push(case.clone());
    }

    CategorizedResults { buckets, other }
}

/// Case-insensitive substring match against the test and class names.
fn matches_token(category: &RubricCategory, case: &TestCaseResult) -> bool {
    let name = case.name.to_lowercase();
    let class_name = case.class_name.to_lowercase();
    category.tokens.iter().any(|token| {
        let token = token.to_lowercase();
        name.contains(&token) || class_name.contains(&token)
    })
}
