//! Extracts the expected output and exit code of a test program from the
//! comment markers in its source.
//!
//! The recognized markers are:
//! ```text
//! // echo              the quoted text on the next line is echoed
//! // echo("text")      same, with the text on the marker line
//! // exit(<int>)       expected exit code of the program
//! // expect(<text>)    a single-line subtest
//! // expect start      a multiline subtest: every following `// ` line is
//! // ...               copied verbatim until
//! // expect end
//! ```
//!
//! Echoed lines are indented with three tabs and subtest headers with four,
//! matching what the test programs print.
use std::{fmt, str::FromStr};

const ECHO: &str = "// echo";
const EXIT: &str = "// exit(";
const EXPECT_END: &str = "// expect end";
const EXPECT: &str = "// expect(";
const EXPECT_START: &str = "// expect start";
const COMMENT: &str = "// ";

const ECHO_INDENT: &str = "\t\t\t";
const SUBTEST_INDENT: &str = "\t\t\t\t";

/// What a test program is expected to print and return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    /// Expected contents of STDOUT.
    pub output: String,
    /// Expected exit code. Defaults to 0 when the source has no `exit(`
    /// marker.
    pub exit_code: i32,
}

/// Malformed annotation in a test source. Line numbers start at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The content of an `exit(...)` marker is not an integer.
    InvalidExitCode { line: usize, content: String },
    /// More than one `exit(...)` marker in the same source.
    DuplicateExitCode { line: usize },
    /// A marker is missing its closing delimiter, or text follows it.
    Unterminated {
        line: usize,
        delimiter: &'static str,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::InvalidExitCode { line, content } => write!(
                f,
                "line {}: `{}` is not a valid exit code",
                line, content
            ),
            ParseError::DuplicateExitCode { line } => {
                write!(f, "line {}: exit code is already declared", line)
            }
            ParseError::Unterminated { line, delimiter } => {
                write!(f, "line {}: missing `{}`", line, delimiter)
            }
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    /// The previous line was a bare `// echo`.
    EchoPending,
    /// Inside an `expect start` ... `expect end` block.
    MultilineExpect,
}

/// Line-oriented annotation parser. Lines are given one at a time to
/// [Parser::feed], including their trailing newline, and the result is
/// collected with [Parser::finish].
#[derive(Debug)]
pub struct Parser {
    state: State,
    /// Number of subtests since the last echo.
    subtest: u32,
    output: String,
    exit_code: Option<i32>,
    lineno: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the text following the first occurrence of `marker`.
fn after<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    line.find(marker).map(|idx| &line[idx + marker.len()..])
}

/// Text between the first pair of double quotes.
fn quoted(line: &str) -> Option<&str> {
    let start = line.find('"')? + 1;
    let len = line[start..].find('"')?;
    Some(&line[start..start + len])
}

/// Text up to the last `)` on the line, so that the text itself may hold
/// unbalanced parentheses. `None` if there is no `)` or if anything other
/// than whitespace follows it.
fn parenthesized(text: &str) -> Option<&str> {
    let close = text.rfind(')')?;
    if text[close + 1..].trim().is_empty() {
        Some(&text[..close])
    } else {
        None
    }
}

impl Parser {
    pub fn new() -> Self {
        Parser {
            state: State::Normal,
            subtest: 0,
            output: String::new(),
            exit_code: None,
            lineno: 0,
        }
    }

    fn unterminated(&self, delimiter: &'static str) -> ParseError {
        ParseError::Unterminated {
            line: self.lineno,
            delimiter,
        }
    }

    fn echo(&mut self, line: &str) -> Result<(), ParseError> {
        let text = quoted(line).ok_or_else(|| self.unterminated("\""))?;
        self.output.push_str(ECHO_INDENT);
        self.output.push_str(text);
        self.output.push('\n');
        self.subtest = 0;
        self.state = State::Normal;
        Ok(())
    }

    fn subtest_header(&mut self) {
        self.subtest += 1;
        self.output.push_str(SUBTEST_INDENT);
        self.output.push_str(&format!("Subtest {}: ", self.subtest));
    }

    /// Process the next line of the source.
    pub fn feed(&mut self, line: &str) -> Result<(), ParseError> {
        self.lineno += 1;

        if self.state == State::EchoPending {
            return self.echo(line);
        }

        if let Some(rest) = after(line, ECHO) {
            if rest.starts_with('(') {
                return self.echo(rest);
            }
            self.state = State::EchoPending;
            return Ok(());
        }

        if let Some(rest) = after(line, EXIT) {
            let close = rest.find(')').ok_or_else(|| self.unterminated(")"))?;
            let content = rest[..close].trim();
            let code = content.parse::<i32>().map_err(|_| {
                ParseError::InvalidExitCode {
                    line: self.lineno,
                    content: content.to_string(),
                }
            })?;
            if self.exit_code.replace(code).is_some() {
                return Err(ParseError::DuplicateExitCode { line: self.lineno });
            }
            return Ok(());
        }

        if line.contains(EXPECT_END) {
            self.state = State::Normal;
            return Ok(());
        }

        if self.state == State::MultilineExpect {
            let rest =
                after(line, COMMENT).ok_or_else(|| self.unterminated(COMMENT))?;
            self.output.push_str(rest);
            return Ok(());
        }

        if let Some(rest) = after(line, EXPECT) {
            let text =
                parenthesized(rest).ok_or_else(|| self.unterminated(")"))?;
            self.subtest_header();
            self.output.push_str(text);
            self.output.push('\n');
            return Ok(());
        }

        if line.contains(EXPECT_START) {
            self.subtest_header();
            self.state = State::MultilineExpect;
        }

        Ok(())
    }

    /// Finish parsing. An echo or multiline block left open at the end of
    /// the input keeps whatever was accumulated.
    pub fn finish(self) -> Expectation {
        if self.state != State::Normal {
            tracing::debug!(state = ?self.state, "annotations ended inside an open block");
        }
        Expectation {
            output: self.output,
            exit_code: self.exit_code.unwrap_or(0),
        }
    }
}

/// Parse all the annotations in `source`.
pub fn parse(source: &str) -> Result<Expectation, ParseError> {
    let mut parser = Parser::new();
    for line in source.split_inclusive('\n') {
        parser.feed(line)?;
    }
    Ok(parser.finish())
}

impl FromStr for Expectation {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn output(src: &str) -> String {
        parse(src).unwrap().output
    }

    #[test]
    fn no_markers() {
        let exp = parse("int main() {\n    return 0;\n}\n").unwrap();
        assert_eq!(exp.output, "");
        assert_eq!(exp.exit_code, 0);
    }

    #[test]
    fn echo_takes_next_line() {
        assert_eq!(output("// echo\necho(\"X\");\n"), "\t\t\tX\n");
    }

    #[test]
    fn inline_echo() {
        assert_eq!(output("// echo(\"X\")\n"), "\t\t\tX\n");
    }

    #[test]
    fn single_line_expect() {
        assert_eq!(output("// expect(Y)\n"), "\t\t\t\tSubtest 1: Y\n");
    }

    #[test]
    fn subtests_count_up() {
        assert_eq!(
            output("// expect(Y)\n// expect(Z)\n"),
            "\t\t\t\tSubtest 1: Y\n\t\t\t\tSubtest 2: Z\n"
        );
    }

    #[test]
    fn echo_resets_subtests() {
        let src = "// expect(a)\n// echo\necho(\"next\");\n// expect(b)\n";
        assert_eq!(
            output(src),
            "\t\t\t\tSubtest 1: a\n\t\t\tnext\n\t\t\t\tSubtest 1: b\n"
        );
    }

    #[test]
    fn expect_keeps_nested_parens() {
        assert_eq!(
            output("    // expect(f(1) = (2))\n"),
            "\t\t\t\tSubtest 1: f(1) = (2)\n"
        );
    }

    #[test]
    fn expect_text_runs_to_last_paren() {
        assert_eq!(output("// expect(ok :))\n"), "\t\t\t\tSubtest 1: ok :)\n");
        assert_eq!(output("// expect(sad :()\n"), "\t\t\t\tSubtest 1: sad :(\n");
        assert_eq!(output("// expect(x) \r\n"), "\t\t\t\tSubtest 1: x\n");
    }

    #[test]
    fn text_after_expect_paren_is_rejected() {
        assert_eq!(
            parse("// expect(1) and more\n"),
            Err(ParseError::Unterminated {
                line: 1,
                delimiter: ")"
            })
        );
    }

    #[test]
    fn echo_inside_multiline_block() {
        let src = "// expect(a)\n// expect start\n// b\n// echo\necho(\"E\");\n// expect(c)\n";
        assert_eq!(
            output(src),
            "\t\t\t\tSubtest 1: a\n\t\t\t\tSubtest 2: b\n\t\t\tE\n\t\t\t\tSubtest 1: c\n"
        );
    }

    #[test]
    fn expect_end_outside_block_is_ignored() {
        assert_eq!(
            output("// expect(a)\n// expect end\n// expect(b)\n"),
            "\t\t\t\tSubtest 1: a\n\t\t\t\tSubtest 2: b\n"
        );
    }

    #[test]
    fn multiline_block() {
        let src = "\
    // expect start
    // first line
    // \tsecond line
    // expect end
    // expect(after)
";
        assert_eq!(
            output(src),
            "\t\t\t\tSubtest 1: first line\n\tsecond line\n\t\t\t\tSubtest 2: after\n"
        );
    }

    #[test]
    fn exit_code() {
        let exp = parse("    // exit(-3)\n    return -3;\n").unwrap();
        assert_eq!(exp.exit_code, -3);
        assert_eq!(exp.output, "");
    }

    #[test]
    fn invalid_exit_code() {
        assert_eq!(
            parse("\n// exit(zero)\n"),
            Err(ParseError::InvalidExitCode {
                line: 2,
                content: "zero".to_string()
            })
        );
    }

    #[test]
    fn duplicate_exit_code() {
        assert_eq!(
            parse("// exit(0)\n// exit(1)\n"),
            Err(ParseError::DuplicateExitCode { line: 2 })
        );
    }

    #[test]
    fn unterminated_markers() {
        assert_eq!(
            parse("// echo\necho(\"oops);\n"),
            Err(ParseError::Unterminated {
                line: 2,
                delimiter: "\""
            })
        );
        assert_eq!(
            parse("// expect(1\n"),
            Err(ParseError::Unterminated {
                line: 1,
                delimiter: ")"
            })
        );
        assert_eq!(
            parse("// expect start\nplain\n"),
            Err(ParseError::Unterminated {
                line: 2,
                delimiter: "// "
            })
        );
    }

    #[test]
    fn open_blocks_at_end_of_input() {
        assert_eq!(output("// echo\n"), "");
        assert_eq!(
            output("// expect start\n// partial\n"),
            "\t\t\t\tSubtest 1: partial\n"
        );
    }

    #[test]
    fn exit_inside_multiline_block() {
        let exp =
            parse("// expect start\n// a\n// exit(2)\n// expect end\n").unwrap();
        assert_eq!(exp.output, "\t\t\t\tSubtest 1: a\n");
        assert_eq!(exp.exit_code, 2);
    }

    #[test]
    fn from_str() {
        let exp: Expectation = "// echo(\"T:\")\n// expect(1)\n// exit(0)\n"
            .parse()
            .unwrap();
        assert_eq!(exp.output, "\t\t\tT:\n\t\t\t\tSubtest 1: 1\n");
    }
}
