use expectrun::{
    cli, errors,
    executor::{self, suite},
    picker::toml::Config,
};

use cli::Opts;
use errors::Error;
use regex::Regex;
use std::convert::TryFrom;
use structopt::StructOpt;
use tokio::runtime;
use tracing_subscriber::EnvFilter;

fn dry_run(suites: Vec<suite::Suite>) {
    use colored::*;
    for suite in suites {
        for path in &suite.paths {
            println!(
                "{}{}{}\n  {}\n  {}",
                suite.config.name.blue(),
                ":".blue(),
                path.to_string_lossy().blue(),
                suite.config.build_command(path),
                suite.config.run_command(path)
            );
        }
    }
}

fn init_logging(verbose: bool) {
    let directive = if verbose { "warn,expectrun=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn regex(flag: &str, reg: &Option<String>) -> Result<Option<Regex>, Error> {
    reg.as_ref()
        .map(|reg| {
            Regex::new(reg)
                .map_err(|err| Error(format!("Invalid {} regex: {}", flag, err)))
        })
        .transpose()
}

fn run() -> Result<i32, Error> {
    let opts = Opts::from_args();
    init_logging(opts.verbose);
    let Config { tests, .. } = Config::from_path(&opts.dir)?;

    // Get the include and exclude regexes.
    let include = regex("--include", &opts.include_filter)?;
    let exclude = regex("--exclude", &opts.exclude_filter)?;

    // Switch to directory containing expectrun.toml.
    std::env::set_current_dir(&opts.dir)?;

    let suites = tests
        .into_iter()
        .map(|c| {
            suite::Suite::try_from(c)
                .map(|s| s.with_filters(include.as_ref(), exclude.as_ref()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Print out the commands for each test in dry run mode.
    if opts.dry_run {
        dry_run(suites);
        return Ok(0);
    }

    let ctx = executor::Context::from(suites, opts.max_futures.unwrap_or(50));
    let runtime = runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(opts.jobs_limit.unwrap_or_else(num_cpus::get).max(1))
        .build()?;

    // Run all the test suites.
    runtime.block_on(ctx.flat_summary(&opts))
}

fn main() {
    std::process::exit(match run() {
        Err(Error(msg)) => {
            println!("error: {}", msg);
            1
        }
        Ok(failed_tests) => failed_tests,
    })
}
