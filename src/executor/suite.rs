use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use regex::Regex;

/// Type for mapping test suite objects.
pub type Id = u64;

pub struct Config {
    /// Name of this suite.
    pub name: String,
    /// Command that builds a source file. `{}` is replaced with the source
    /// path and `{exe}` with the path of the executable.
    pub build: String,
    /// Command that runs the built executable. Same replacements as `build`.
    pub run: String,
    /// Timeout for building and for running each test.
    pub timeout: Duration,
}

impl Config {
    /// Path of the executable built from `path`: the source path without its
    /// extension. Relative paths are made explicit so that they can be run
    /// as commands.
    pub fn exe_path(path: &Path) -> PathBuf {
        let exe = path.with_extension("");
        if exe.is_relative() && !exe.starts_with(".") {
            Path::new(".").join(exe)
        } else {
            exe
        }
    }

    fn expand(cmd: &str, path: &Path) -> String {
        cmd.replace("{exe}", &Self::exe_path(path).to_string_lossy())
            .replace("{}", &path.to_string_lossy())
    }

    /// Concrete build command for the source file at `path`.
    pub fn build_command(&self, path: &Path) -> String {
        Self::expand(&self.build, path)
    }

    /// Concrete run command for the source file at `path`.
    pub fn run_command(&self, path: &Path) -> String {
        Self::expand(&self.run, path)
    }
}

/// Defines a test suite which is a collection of annotated source paths and
/// the commands used to build and run them.
pub struct Suite {
    /// Paths of annotated source files.
    pub paths: Vec<PathBuf>,
    /// Configuration for the [Suite].
    pub config: Config,
}

impl Suite {
    /// Only keep the paths that match `include` and do not match `exclude`.
    /// Filters are matched against the string `suite_name:path`.
    pub fn with_filters(
        mut self,
        include: Option<&Regex>,
        exclude: Option<&Regex>,
    ) -> Self {
        let name = &self.config.name;
        self.paths.retain(|p| {
            let key = format!("{}:{}", name, p.to_string_lossy());
            include.map_or(true, |inc| inc.is_match(&key))
                && exclude.map_or(true, |ex| !ex.is_match(&key))
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suite(paths: &[&str]) -> Suite {
        Suite {
            paths: paths.iter().map(PathBuf::from).collect(),
            config: Config {
                name: "util".to_string(),
                build: "cc -O2 {} -o {exe}".to_string(),
                run: "{exe}".to_string(),
                timeout: Duration::from_secs(1),
            },
        }
    }

    #[test]
    fn expands_commands() {
        let s = suite(&[]);
        let path = Path::new("test_util/test_util.c");
        assert_eq!(
            s.config.build_command(path),
            "cc -O2 test_util/test_util.c -o ./test_util/test_util"
        );
        assert_eq!(s.config.run_command(path), "./test_util/test_util");
        assert_eq!(s.config.run_command(Path::new("/t/a.c")), "/t/a");
    }

    #[test]
    fn filters_on_suite_and_path() {
        let s = suite(&["a/one.c", "b/two.c", "b/three.c"]);
        let inc = Regex::new("util:b/").unwrap();
        let ex = Regex::new("three").unwrap();
        let s = s.with_filters(Some(&inc), Some(&ex));
        assert_eq!(s.paths, vec![PathBuf::from("b/two.c")]);

        let s = suite(&["a/one.c", "b/two.c"]).with_filters(None, None);
        assert_eq!(s.paths.len(), 2);
    }
}
