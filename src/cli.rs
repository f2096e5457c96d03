use crate::errors;
use std::path::PathBuf;
use structopt::StructOpt;

/// Options for the CLI.
#[derive(StructOpt, Debug)]
#[structopt(
    name = "expectrun",
    about = "Run annotated test programs and check their output."
)]
pub struct Opts {
    /// Test folder containing an expectrun.toml file.
    #[structopt(name = "TEST_DIR", parse(from_os_str))]
    pub dir: PathBuf,

    /// Show the expected output and the labeled actual output for each
    /// failing test.
    #[structopt(short, long)]
    pub diff: bool,

    /// Only display tests from a specific class.
    #[structopt(short = "o", long = "only")]
    pub post_filter: Option<OnlyOpt>,

    /// Only run tests whose `suite:path` matches this regex.
    #[structopt(short = "i", long = "include")]
    pub include_filter: Option<String>,

    /// Skip tests whose `suite:path` matches this regex.
    #[structopt(short = "x", long = "exclude")]
    pub exclude_filter: Option<String>,

    /// Number of worker threads. Defaults to the number of CPUs.
    #[structopt(short = "j", long = "jobs")]
    pub jobs_limit: Option<usize>,

    /// Maximum number of tests in flight at once.
    #[structopt(long)]
    pub max_futures: Option<usize>,

    /// Print the build and run commands without running them.
    #[structopt(short = "n", long)]
    pub dry_run: bool,

    /// Print passing tests and debug logs.
    #[structopt(short, long)]
    pub verbose: bool,
}

/// Possible values for the --only flag.
#[derive(Debug, PartialEq)]
pub enum OnlyOpt {
    /// Failing tests, including timeouts.
    Fail,
    /// Passing tests.
    Pass,
    /// Tests that could not be parsed or built.
    Error,
}

impl std::str::FromStr for OnlyOpt {
    type Err = errors::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail" => Ok(OnlyOpt::Fail),
            "pass" => Ok(OnlyOpt::Pass),
            "error" => Ok(OnlyOpt::Error),
            _ => Err(errors::Error(
                "Must be one of fail, pass, error.".to_string(),
            )),
        }
    }
}
