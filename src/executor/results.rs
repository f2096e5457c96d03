use crate::{annotation::Expectation, cli, printer};
use std::{fmt, path::PathBuf};

use super::suite;

/// Track the state of a test result.
#[derive(Debug, PartialEq)]
pub enum State {
    /// The output and the exit code matched.
    Pass,
    /// The output or the exit code did not match.
    Fail {
        /// Expected and actual output, if they differ.
        output: Option<(String, String)>,
        /// Expected and actual exit code, if they differ.
        exit: Option<(i32, i32)>,
    },
    /// Building or running the test timed out.
    Timeout,
    /// The build command failed. Contains its STDERR.
    BuildFailed(String),
    /// The annotations in the source could not be read.
    Invalid(String),
}

impl State {
    /// Compare a program's output and exit code with the expectation.
    pub fn compare(expect: Expectation, stdout: String, status: i32) -> Self {
        let output = if stdout == expect.output {
            None
        } else {
            Some((expect.output, stdout))
        };
        let exit = if status == expect.exit_code {
            None
        } else {
            Some((expect.exit_code, status))
        };
        match (output, exit) {
            (None, None) => State::Pass,
            (output, exit) => State::Fail { output, exit },
        }
    }
}

/// Store information related to one test.
#[derive(Debug)]
pub struct Test {
    /// Path of the test source.
    pub path: PathBuf,
    /// Result of the comparison.
    pub state: State,
    /// Id for the test suite that owns this test.
    pub test_suite: suite::Id,
}

impl Test {
    fn with_only_opt(&self, only: &cli::OnlyOpt) -> bool {
        use cli::OnlyOpt as O;
        match (only, &self.state) {
            (O::Fail, State::Fail { .. }) | (O::Fail, State::Timeout) => true,
            (O::Pass, State::Pass) => true,
            (O::Error, State::BuildFailed(..))
            | (O::Error, State::Invalid(..)) => true,
            (O::Fail, _) | (O::Pass, _) | (O::Error, _) => false,
        }
    }

    /// Returns true if this test should be printed with the current options.
    pub fn should_print(&self, opts: &cli::Opts) -> bool {
        // Selectively print things if post_filter is enabled.
        if let Some(only) = &opts.post_filter {
            return self.with_only_opt(only);
        }
        // Print everything if verbose mode is enabled
        if opts.verbose {
            return true;
        }
        // Otherwise just print the tests that did not pass
        !matches!(self.state, State::Pass)
    }

    /// Generate colorized string to report the results of this test.
    pub fn report_str(&self, suite: Option<&str>, show_diff: bool) -> String {
        use colored::*;

        let mut buf = String::new();
        let path_str = self.path.to_string_lossy();
        let (mark, color) = match self.state {
            State::Pass => ("✓ ", Color::Green),
            _ => ("✗ ", Color::Red),
        };
        buf.push_str(&mark.color(color).to_string());
        if let Some(suite_name) = suite {
            buf.push_str(&suite_name.bold().color(color).to_string());
            buf.push_str(&":".color(color).to_string());
        }
        buf.push_str(&path_str.color(color).to_string());

        match &self.state {
            State::Pass => (),
            State::Timeout => buf.push_str(&" (timeout)".dimmed().to_string()),
            State::Invalid(msg) => {
                buf.push_str(&format!(" (invalid: {})", msg).dimmed().to_string())
            }
            State::BuildFailed(stderr) => {
                buf.push_str(&" (build failed)".dimmed().to_string());
                if show_diff && !stderr.is_empty() {
                    buf.push('\n');
                    buf.push_str(stderr.trim_end());
                }
            }
            State::Fail { output, exit } => {
                let reasons = output
                    .as_ref()
                    .map(|_| "output")
                    .into_iter()
                    .chain(exit.as_ref().map(|_| "exit code"))
                    .collect::<Vec<_>>()
                    .join(", ");
                buf.push_str(&format!(" ({})", reasons).dimmed().to_string());
                if !show_diff {
                    return buf;
                }
                if let Some((expected, actual)) = output {
                    let labeled =
                        printer::label_divergence_colored(actual, expected);
                    buf.push_str(&format!(
                        "\n{}\n{}\n{}\n{}",
                        "Expected output:".bold(),
                        expected,
                        "Actual output:".bold(),
                        labeled
                    ));
                }
                if let Some((expected, actual)) = exit {
                    buf.push_str(&format!(
                        "\n{}",
                        format!("exited with {}, expected {}", actual, expected)
                            .red()
                    ));
                }
            }
        }
        buf
    }
}

/// Counts of test outcomes.
#[derive(Debug, Default, PartialEq)]
pub struct Summary {
    pub pass: i32,
    pub fail: i32,
    pub timeout: i32,
    pub error: i32,
}

impl Summary {
    pub fn record(&mut self, state: &State) {
        match state {
            State::Pass => self.pass += 1,
            State::Fail { .. } => self.fail += 1,
            State::Timeout => self.timeout += 1,
            State::BuildFailed(..) | State::Invalid(..) => self.error += 1,
        }
    }

    /// Number of tests that did not pass.
    pub fn unsuccessful(&self) -> i32 {
        self.fail + self.timeout + self.error
    }

    /// Process exit code for this run: the number of tests that did not
    /// pass, capped at 255 so that it never wraps around to 0.
    pub fn exit_code(&self) -> i32 {
        self.unsuccessful().min(255)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use colored::*;
        write!(
            f,
            "  {} / {} / {} / {}",
            format!("{} passing", self.pass).green(),
            format!("{} failing", self.fail).red(),
            format!("{} timeouts", self.timeout).red(),
            format!("{} errors", self.error).yellow(),
        )
    }
}
