//! Whitespace tokenization of command lines.
//!
//! Tokens are literal slices of the input: there is no quoting, escaping, or
//! any kind of expansion. The original NULL-terminated argument array becomes
//! a plain `Vec`, whose length marks the end of the argument list.

/// Longest command line the shell keeps; anything past this is discarded.
pub const MAX_LINE_CHARS: usize = 99;

/// Split a line into its non-empty whitespace-delimited tokens.
///
/// Runs of whitespace collapse, so no empty tokens are produced; an empty or
/// all-blank line yields an empty vector.
pub fn split_into_tokens(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Clip a raw input line to [`MAX_LINE_CHARS`] characters.
///
/// Clipping lands on a char boundary, never inside a multi-byte character.
pub fn clip_line(line: &str) -> &str {
    match line.char_indices().nth(MAX_LINE_CHARS) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_whitespace() {
        assert_eq!(split_into_tokens("ls -la /tmp"), vec!["ls", "-la", "/tmp"]);
    }

    #[test]
    fn test_empty_line_yields_no_tokens() {
        assert!(split_into_tokens("").is_empty());
    }

    #[test]
    fn test_blank_line_yields_no_tokens() {
        assert!(split_into_tokens("   \t  ").is_empty());
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        assert_eq!(
            split_into_tokens("echo   hi\t there  "),
            vec!["echo", "hi", "there"]
        );
    }

    #[test]
    fn test_quotes_are_literal() {
        // No quoting support: quote characters are ordinary token bytes.
        assert_eq!(
            split_into_tokens("echo \"a b\""),
            vec!["echo", "\"a", "b\""]
        );
    }

    #[test]
    fn test_clip_line_keeps_short_lines() {
        let line = "pwd";
        assert_eq!(clip_line(line), "pwd");

        let exactly_max = "y".repeat(MAX_LINE_CHARS);
        assert_eq!(clip_line(&exactly_max), exactly_max);
    }

    #[test]
    fn test_clip_line_discards_the_tail() {
        let long = "z".repeat(150);
        let clipped = clip_line(&long);
        assert_eq!(clipped.chars().count(), MAX_LINE_CHARS);
        assert_eq!(clipped, &long[..MAX_LINE_CHARS]);
    }

    #[test]
    fn test_clip_line_respects_char_boundaries() {
        let long: String = std::iter::repeat('ß').take(130).collect();
        let clipped = clip_line(&long);
        assert_eq!(clipped.chars().count(), MAX_LINE_CHARS);
    }
}
