//! The default picker that gathers tests to run from an expectrun.toml file.
use serde::Deserialize;
use std::{
    convert::TryFrom,
    path::Path,
    time::Duration,
};

use crate::{errors, executor::suite};

/// Name of the configuration file inside a test directory.
pub const CONFIG_FILE: &str = "expectrun.toml";

/// Configuration for a single expectrun run.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Version of the expectrun tool this configuration is compatible with.
    pub ver: String,
    /// Test suite configurations.
    pub tests: Vec<SuiteConfig>,
}

/// Configuration for a test suite.
#[derive(Debug, Deserialize)]
pub struct SuiteConfig {
    /// Name of this suite.
    pub name: String,
    /// Paths of annotated source files.
    pub paths: Vec<String>,
    /// Command that builds a source file. `{}` is replaced with the source
    /// path and `{exe}` with the path of the executable.
    pub build: String,
    /// Command that runs the built program. Defaults to `{exe}`.
    pub run: Option<String>,
    /// Optional timeout in seconds.
    pub timeout: Option<u64>,
}

impl Config {
    /// Create a configuration by reading the expectrun.toml file in
    /// `conf_dir`.
    /// Ensures that the version number in the configuration matches the
    /// version of the installed binary.
    pub fn from_path(conf_dir: &Path) -> Result<Self, errors::Error> {
        let conf_path = conf_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&conf_path).map_err(|_| {
            errors::Error(format!(
                "{} is missing. expectrun expects a directory with a {} file.",
                conf_path.display(),
                CONFIG_FILE
            ))
        })?;

        Self::parse(&contents).map_err(|errors::Error(msg)| {
            errors::Error(format!(
                "Failed to parse {}: {}",
                conf_path.display(),
                msg
            ))
        })
    }

    /// Parse the contents of a configuration file.
    pub fn parse(contents: &str) -> Result<Self, errors::Error> {
        let conf: Config = toml::from_str(contents)
            .map_err(|err| errors::Error(err.to_string()))?;

        if env!("CARGO_PKG_VERSION") != conf.ver {
            return Err(errors::Error(format!(
                "version mismatch. Configuration requires: {}, tool version: {}.",
                conf.ver,
                env!("CARGO_PKG_VERSION")
            )));
        }

        Ok(conf)
    }
}

impl TryFrom<SuiteConfig> for suite::Suite {
    type Error = errors::Error;

    /// Expand the glob patterns into the matching paths.
    fn try_from(conf: SuiteConfig) -> Result<Self, Self::Error> {
        let mut paths = Vec::new();
        for pattern in &conf.paths {
            for path in glob::glob(pattern)? {
                paths.push(path?);
            }
        }

        Ok(suite::Suite {
            paths,
            config: suite::Config {
                name: conf.name,
                build: conf.build,
                run: conf.run.unwrap_or_else(|| "{exe}".to_string()),
                timeout: Duration::from_secs(conf.timeout.unwrap_or(1200)),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conf(body: &str) -> String {
        format!("ver = \"{}\"\n{}", env!("CARGO_PKG_VERSION"), body)
    }

    #[test]
    fn parses_suites() {
        let conf = Config::parse(&conf(
            r#"
[[tests]]
name = "util"
paths = ["test_*/*.c"]
build = "cc {} -o {exe}"
timeout = 5
"#,
        ))
        .unwrap();
        assert_eq!(conf.tests.len(), 1);
        assert_eq!(conf.tests[0].name, "util");
        assert_eq!(conf.tests[0].run, None);
        assert_eq!(conf.tests[0].timeout, Some(5));
    }

    #[test]
    fn rejects_version_mismatch() {
        let err = Config::parse("ver = \"0.0.0-old\"\ntests = []\n").unwrap_err();
        assert!(err.0.contains("version mismatch"));
    }

    #[test]
    fn rejects_missing_build_command() {
        let res = Config::parse(&conf(
            "[[tests]]\nname = \"a\"\npaths = []\n",
        ));
        assert!(res.is_err());
    }

    #[test]
    fn suite_defaults() {
        let suite = suite::Suite::try_from(SuiteConfig {
            name: "a".to_string(),
            paths: vec![],
            build: "true".to_string(),
            run: None,
            timeout: None,
        })
        .unwrap();
        assert!(suite.paths.is_empty());
        assert_eq!(suite.config.run, "{exe}");
        assert_eq!(suite.config.timeout, Duration::from_secs(1200));
    }

    #[test]
    fn bad_glob_is_an_error() {
        let res = suite::Suite::try_from(SuiteConfig {
            name: "a".to_string(),
            paths: vec!["[".to_string()],
            build: "true".to_string(),
            run: None,
            timeout: None,
        });
        assert!(res.is_err());
    }
}
