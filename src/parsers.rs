#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Counts recovered from a pytest terminal summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryCounts {
    /// Number of passing tests.
    pub passed:  usize,
    /// Number of failing tests.
    pub failed:  usize,
    /// Number of collection or execution errors.
    pub errors:  usize,
    /// Number of skipped tests.
    pub skipped: usize,
}

impl SummaryCounts {
    /// Total number of tests the summary line accounts for.
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.errors + self.skipped
    }
}

peg::parser! {
    /// includes some useful grammars for parsing pytest terminal output.
    pub grammar parser() for str {
        /// matches any sequence of 1 or more numbers
        rule number() -> usize
            = n:$(['0'..='9']+) {? n.parse().or(Err("usize")) }

        /// matches spaces and tabs
        rule whitespace() = quiet!{[' ' | '\t']+}

        /// matches a lowercase status label like "passed" or "xfailed"
        rule label() -> &'input str
            = $(['a'..='z']+)

        /// matches one "N <label>" segment of the summary line
        rule segment() -> (usize, &'input str)
            = n:number() whitespace() l:label() { (n, l) }

        /// matches the trailing "in 0.45s" wall-clock suffix
        rule elapsed()
            = "in" whitespace() ['0'..='9' | '.']+ "s"

        /// parses the counts out of a pytest summary line body, eg.
        /// `3 passed, 1 failed in 0.45s`
        pub rule summary_counts() -> SummaryCounts
            = segs:(segment() ** ("," whitespace()?)) whitespace() elapsed()
            {
                let mut counts = SummaryCounts::default();
                for (n, label) in segs {
                    match label {
                        "passed" => counts.passed += n,
                        "failed" => counts.failed += n,
                        "error" | "errors" => counts.errors += n,
                        "skipped" => counts.skipped += n,
                        _ => {}
                    }
                }
                counts
            }
    }
}

/// Scans captured pytest console output for the final summary line and
/// parses it. Returns `None` when no line parses (eg. "no tests ran").
pub fn parse_pytest_summary(output: &str) -> Option<SummaryCounts> {
    output.lines().rev().find_map(|line| {
        let line = line.trim().trim_matches('=').trim();
        parser::summary_counts(line).ok()
    })
}
