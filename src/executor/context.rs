use super::{results, suite, Test};
use crate::{cli, errors::Error};
use futures::{
    io::{AllowStdIo, AsyncWriteExt},
    stream, StreamExt,
};

/// An executor manages the execution of a list of tests.
pub struct Executor {
    /// Test configurations to be executed.
    tests: Vec<Test>,
    /// Maximum number of tests executing at once.
    max_futures: usize,
}

impl Executor {
    /// Execute the tests and generate test results in any order.
    /// It is the job of the consumer of this method to collect the results and
    /// display them in the desired manner.
    pub fn execute_all(
        self,
    ) -> impl stream::Stream<Item = Result<results::Test, Error>> {
        stream::iter(self.tests.into_iter().map(|test| test.execute_test()))
            .buffer_unordered(self.max_futures)
    }
}

/// An execution context manages the mapping between test suites and tests,
/// asynchronously executes tests, collects results, and streams out results
/// as appropriate.
pub struct Context {
    /// Configurations for suites to be executed.
    configs: Vec<suite::Config>,
    /// Test configurations to be executed.
    pub exec: Executor,
}

impl Context {
    /// Construct a Context from a list of Suites.
    pub fn from(suites: Vec<suite::Suite>, max_futures: usize) -> Self {
        let mut configs = Vec::with_capacity(suites.len());
        let mut tests = Vec::new();
        for (idx, suite) in suites.into_iter().enumerate() {
            let suite::Suite { config, paths } = suite;
            tests.extend(paths.into_iter().map(|path| Test {
                build: config.build_command(&path),
                run: config.run_command(&path),
                path,
                test_suite: idx as suite::Id,
                timeout: config.timeout,
            }));
            configs.push(config);
        }
        Context {
            exec: Executor {
                tests,
                max_futures: max_futures.max(1),
            },
            configs,
        }
    }

    /// Generates a summary of the test results that streams the test results
    /// as soon as they become available. Returns the exit code for the run,
    /// see [results::Summary::exit_code].
    pub async fn flat_summary(self, opts: &cli::Opts) -> Result<i32, Error> {
        let Context { configs, exec } = self;
        let mut tasks = exec.execute_all();
        let stdout_buf = std::io::BufWriter::new(std::io::stdout());
        let mut handle = AllowStdIo::new(stdout_buf);
        let mut summary = results::Summary::default();

        while let Some(res) = tasks.next().await {
            let test = res?;
            summary.record(&test.state);
            if test.should_print(opts) {
                let suite = configs
                    .get(test.test_suite as usize)
                    .map(|c| c.name.as_str());
                let buf = test.report_str(suite, opts.diff) + "\n";
                handle.write_all(buf.as_bytes()).await?;
                handle.flush().await?;
            }
        }

        let buf = format!("{}\n", summary);
        handle.write_all(buf.as_bytes()).await?;
        handle.flush().await?;

        Ok(summary.exit_code())
    }
}
