//! expectrun builds and runs test programs whose expected output is written
//! as comments inside their own source, and reports where the actual output
//! first diverges from it.
//!
//! ## Annotations
//! A test source declares what it should print and return using comment
//! markers:
//! ```c
//! int main(void)
//! {
//!     // echo
//!     echo("Test vdl_CountArgs:");
//!     // expect(3)
//!     test_printf("%d", vdl_CountArgs(1, 2, 3));
//!     // expect start
//!     // first line
//!     // second line
//!     // expect end
//!     test_printf("first line\nsecond line");
//!
//!     // exit(0)
//!     return 0;
//! }
//! ```
//! Echoed lines are expected to be printed with three leading tabs, and each
//! `expect` produces a `Subtest N: ` header with four leading tabs. The
//! subtest counter restarts after every echo. See [annotation] for the
//! exact rules.
//!
//! ## Test Suites
//! Test suites are described in an `expectrun.toml` file:
//! ```toml
//! ver = "0.1.0"
//!
//! [[tests]]
//! # Name for this test suite.
//! name = "util"
//! # Test paths can be globs or exact.
//! paths = [ "test_*/*.c" ]
//! # Build command. {} is the source path, {exe} the source path without
//! # its extension.
//! build = "clang -std=gnu17 -O3 -Wall {} -o {exe}"
//! # (Optional) Run command. Defaults to "{exe}".
//! run = "{exe}"
//! # (Optional) Timeout for tests in seconds. Defaults to 1200 seconds.
//! timeout = 120
//! ```
//!
//! ## Running
//! From anywhere, run `expectrun <dir>` where `<dir>` contains the
//! `expectrun.toml` file:
//! ```text
//! ✗ util:test_vdlutil/test_vdlutil.c (output)
//! ✗ util:test_vdlbt/test_vdlbt.c (exit code)
//!   1 passing / 2 failing / 0 timeouts / 0 errors
//! ```
//! With `-d`, failing tests show the expected output and the actual output
//! with the first divergence marked:
//! ```text
//! Actual output:
//! 			Test vdl_FirstNArgs:
//! 				Subtest 1: 2
//! ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^
//! ```
//!
//! The `--include` and `--exclude` flags select tests whose
//! `<suite-name>:<path>` match a regex, and `--only` restricts which results
//! are printed.
pub mod annotation;
pub mod cli;
pub mod errors;
pub mod executor;
pub mod picker;
pub mod printer;
