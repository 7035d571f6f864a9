//! Input line tokenizer.
//!
//! Lines are split on runs of the space character and empty tokens are
//! dropped. There is no quoting: a command that wants free text joins its
//! arguments back together.

/// Result of tokenizing an input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedCommand<'a> {
    /// The command or variable name (first token).
    pub command: &'a str,
    /// The remaining tokens, passed through uninterpreted.
    pub args: Vec<&'a str>,
    /// The raw input line.
    pub raw: &'a str,
}

/// Split a line into its non-empty space-separated tokens.
///
/// Only `' '` separates tokens; tabs and other whitespace stay inside tokens.
///
/// # Examples
///
/// ```
/// use bevy_dev_console::core::tokenize_string;
///
/// assert_eq!(tokenize_string("  Number   789 "), vec!["Number", "789"]);
/// assert!(tokenize_string("   ").is_empty());
/// ```
pub fn tokenize_string(input: &str) -> Vec<&str> {
    input.split(' ').filter(|token| !token.is_empty()).collect()
}

/// Tokenize a line into command name and arguments.
///
/// Returns `None` when the line has no tokens at all.
///
/// # Examples
///
/// ```
/// use bevy_dev_console::core::tokenize;
///
/// let result = tokenize("Echo hello world").unwrap();
/// assert_eq!(result.command, "Echo");
/// assert_eq!(result.args, vec!["hello", "world"]);
/// ```
pub fn tokenize(input: &str) -> Option<TokenizedCommand<'_>> {
    let mut tokens = tokenize_string(input).into_iter();
    let command = tokens.next()?;

    Some(TokenizedCommand {
        command,
        args: tokens.collect(),
        raw: input,
    })
}

/// Check whether the line is exactly one token with no surrounding spaces.
///
/// This is the shape required before tab completion runs.
pub fn is_single_token(input: &str) -> bool {
    !input.is_empty() && !input.contains(' ')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple() {
        let result = tokenize("Number 789").unwrap();
        assert_eq!(result.command, "Number");
        assert_eq!(result.args, vec!["789"]);
        assert_eq!(result.raw, "Number 789");
    }

    #[test]
    fn test_tokenize_no_args() {
        let result = tokenize("Help").unwrap();
        assert_eq!(result.command, "Help");
        assert!(result.args.is_empty());
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_none());
        assert!(tokenize("     ").is_none());
    }

    #[test]
    fn test_tokenize_extra_spaces() {
        let result = tokenize("   Echo    a   b  ").unwrap();
        assert_eq!(result.command, "Echo");
        assert_eq!(result.args, vec!["a", "b"]);
    }

    #[test]
    fn test_quotes_are_not_special() {
        let result = tokenize(r#"Echo "hello world""#).unwrap();
        assert_eq!(result.args, vec!["\"hello", "world\""]);
    }

    #[test]
    fn test_tabs_stay_in_tokens() {
        assert_eq!(tokenize_string("a\tb c"), vec!["a\tb", "c"]);
    }

    #[test]
    fn test_single_token() {
        assert!(is_single_token("cle"));
        assert!(!is_single_token("cle "));
        assert!(!is_single_token(" cle"));
        assert!(!is_single_token("Number 1"));
        assert!(!is_single_token(""));
    }
}
