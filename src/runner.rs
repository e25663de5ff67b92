#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Runs pytest against a student checkout.

use std::{ffi::OsString, path::PathBuf, process::ExitStatus, time::Duration};

use bon::Builder;
use tracing::{info, warn};

use crate::{config, process, util};

/// Captured outcome of one pytest invocation.
///
/// A timeout, crash, or missing toolchain is captured here rather than
/// propagated; grading always proceeds on whatever the run produced.
#[derive(Debug)]
pub struct TestRunOutcome {
    /// Exit status, when the process ran to completion.
    pub exit_status: Option<ExitStatus>,
    /// Captured stdout.
    pub stdout:      String,
    /// Captured stderr.
    pub stderr:      String,
    /// Why the run did not complete, when it did not.
    pub error:       Option<String>,
}

impl TestRunOutcome {
    /// Combined console output, stdout first.
    pub fn console_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Invokes pytest once with a JUnit XML results file and a fixed deadline.
#[derive(Clone, Builder)]
#[builder(on(PathBuf, into))]
pub struct TestRunner {
    /// Directory holding the student's pytest suite.
    tests_dir:    PathBuf,
    /// Where pytest writes its JUnit XML results.
    results_path: PathBuf,
    /// Deadline for the whole run.
    #[builder(default = config::PYTEST_TIMEOUT)]
    timeout:      Duration,
}

impl TestRunner {
    /// Runs pytest to completion or to the deadline.
    pub async fn run(self) -> TestRunOutcome {
        let junit_arg: OsString = format!("--junitxml={}", self.results_path.display()).into();
        let pytest_args = [
            OsString::from("-v"),
            OsString::from("--tb=short"),
            junit_arg,
            self.tests_dir.clone().into_os_string(),
        ];

        let (cmd, args) = match util::pytest_command(&pytest_args) {
            Ok(command) => command,
            Err(e) => {
                warn!("could not assemble a pytest command: {e:#}");
                return TestRunOutcome {
                    exit_status: None,
                    stdout:      String::new(),
                    stderr:      String::new(),
                    error:       Some(format!("{e:#}")),
                };
            }
        };

        info!("running pytest against {}", self.tests_dir.display());
        match process::run_collect(&cmd, &args, None, &[], Some(self.timeout)).await {
            Ok(collected) => TestRunOutcome {
                exit_status: Some(collected.status),
                stdout:      String::from_utf8_lossy(&collected.stdout).to_string(),
                stderr:      String::from_utf8_lossy(&collected.stderr).to_string(),
                error:       None,
            },
            Err(e) => {
                warn!("pytest run did not complete: {e:#}");
                TestRunOutcome {
                    exit_status: None,
                    stdout:      String::new(),
                    stderr:      String::new(),
                    error:       Some(format!("{e:#}")),
                }
            }
        }
    }
}
