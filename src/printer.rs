//! Rendering of output mismatches.
use colored::Colorize;

/// Display width of a tab in the expected outputs.
pub const TAB_WIDTH: usize = 4;

/// Annotate `actual` with the first position where it diverges from
/// `expected`.
///
/// - If one string is a prefix of the other, a `>` line is inserted at the end
///   of the common prefix.
/// - If the very first character differs, a `>` line is prepended.
/// - Otherwise, a line of `^` is inserted after the line containing the
///   divergence, as wide as that line with tabs counted as [TAB_WIDTH]
///   columns.
pub fn label_divergence(actual: &str, expected: &str) -> String {
    label_with(actual, expected, |label| label.to_string())
}

/// Same as [label_divergence], with the inserted marker or caret line in red.
/// Lines of the program's own output are never colored.
pub fn label_divergence_colored(actual: &str, expected: &str) -> String {
    label_with(actual, expected, |label| label.red().bold().to_string())
}

fn label_with<F>(actual: &str, expected: &str, paint: F) -> String
where
    F: Fn(&str) -> String,
{
    let act: Vec<char> = actual.chars().collect();
    let exp: Vec<char> = expected.chars().collect();
    let overlap = act.len().min(exp.len());
    let collect = |chars: &[char]| chars.iter().collect::<String>();

    let diff = match (0..overlap).find(|&i| act[i] != exp[i]) {
        None => {
            return collect(&act[..overlap])
                + &paint(">")
                + "\n"
                + &collect(&act[overlap..])
        }
        Some(0) => return paint(">") + "\n" + actual,
        Some(diff) => diff,
    };

    let last_newline =
        (0..diff).rev().find(|&i| act[i] == '\n').unwrap_or(0);
    let next_newline = (diff + 1..overlap)
        .find(|&i| act[i] == '\n')
        .unwrap_or(overlap);
    let tabs = act[last_newline..next_newline]
        .iter()
        .filter(|&&c| c == '\t')
        .count();
    let width = (next_newline - last_newline) + tabs * TAB_WIDTH - tabs;

    let mut buf = collect(&act[..next_newline]);
    buf.push('\n');
    buf.push_str(&paint(&"^".repeat(width)));
    buf.push_str(&collect(&act[next_newline..]));
    buf
}
