//! Quote-aware splitting of a single pipeline stage into tokens.

use regex::Regex;
use std::sync::OnceLock;

const QUOTE: char = '"';

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static pattern is valid"))
}

/// Split `line` into whitespace-separated tokens, keeping `"..."` spans whole.
///
/// A run of whitespace only separates tokens when an even number of `"` has been
/// seen before it. Every `"` is removed from the resulting tokens afterwards, so
/// `ps -e "foo bar"` yields `["ps", "-e", "foo bar"]`.
///
/// Unbalanced quotes are not an error: everything after an unmatched `"` stays
/// glued into one token and the quote itself is dropped.
pub fn split_command_line(line: &str) -> Vec<String> {
    let line = line.trim();
    if line.is_empty() {
        return Vec::new();
    }

    let mut tokens = Vec::new();
    let mut token_start = 0;
    let mut quotes_seen = 0;
    let mut scanned_to = 0;
    for run in whitespace_runs().find_iter(line) {
        quotes_seen += line[scanned_to..run.start()].matches(QUOTE).count();
        scanned_to = run.start();
        if quotes_seen % 2 == 0 {
            tokens.push(strip_quotes(&line[token_start..run.start()]));
            token_start = run.end();
        }
    }
    tokens.push(strip_quotes(&line[token_start..]));

    tokens
}

fn strip_quotes(raw: &str) -> String {
    raw.replace(QUOTE, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(line: &str) -> Vec<String> {
        split_command_line(line)
    }

    #[test]
    fn test_plain_words() {
        assert_eq!(split("ps -e aux"), vec!["ps", "-e", "aux"]);
    }

    #[test]
    fn test_quoted_span_is_one_token() {
        assert_eq!(split("ps -e \"foo bar\""), vec!["ps", "-e", "foo bar"]);
    }

    #[test]
    fn test_empty_and_blank_lines() {
        assert!(split("").is_empty());
        assert!(split("   \t ").is_empty());
    }

    #[test]
    fn test_runs_of_whitespace_collapse() {
        assert_eq!(split("  echo \t  a   b  "), vec!["echo", "a", "b"]);
    }

    #[test]
    fn test_quotes_inside_a_word() {
        // quotes glue the spaces in, then vanish
        assert_eq!(split("grep na\"me with\"space x"), vec!["grep", "name withspace", "x"]);
    }

    #[test]
    fn test_multiple_quoted_spans() {
        assert_eq!(
            split("echo \"a b\" c \"d  e\""),
            vec!["echo", "a b", "c", "d  e"]
        );
    }

    #[test]
    fn test_empty_quotes_give_empty_argument() {
        assert_eq!(split("echo \"\""), vec!["echo", ""]);
    }

    #[test]
    fn test_unbalanced_quote_is_tolerated() {
        assert_eq!(split("echo \"a b c"), vec!["echo", "a b c"]);
        assert_eq!(split("echo a\""), vec!["echo", "a"]);
    }

    #[test]
    fn test_long_line_with_many_quoted_words() {
        let line = "echo ".to_string() + &"\"a b\" c ".repeat(20_000);
        let tokens = split(&line);

        assert_eq!(tokens.len(), 1 + 2 * 20_000);
        assert_eq!(tokens[1], "a b");
        assert_eq!(tokens[2], "c");
        assert_eq!(tokens[tokens.len() - 1], "c");
    }
}
