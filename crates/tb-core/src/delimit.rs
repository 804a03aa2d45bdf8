//! Marker-delimited parsing of free-form backend output.
//!
//! Every structured answer we ask the backend for (a template body, a title,
//! an option number, a best-of-two pick) comes back wrapped in a marker pair.
//! This module is the single place that knows how to find them.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static UNSIGNED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// A pair of literal markers surrounding a value in backend output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delimiters {
    pub open: &'static str,
    pub close: &'static str,
}

/// Template bodies and titles.
pub const BLOCK: Delimiters = Delimiters::new("[begin]", "[end]");

/// Numbered options in template selection.
pub const OPTION: Delimiters = Delimiters::new("[", "]");

/// The two candidates of a best-of-two comparison.
pub const CHOICE: Delimiters = Delimiters::new("<<", ">>");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unmatched {
    MissingOpen,
    MissingClose,
}

impl fmt::Display for Unmatched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unmatched::MissingOpen => f.write_str("opening marker not found"),
            Unmatched::MissingClose => f.write_str("closing marker not found after opening marker"),
        }
    }
}

impl Delimiters {
    pub const fn new(open: &'static str, close: &'static str) -> Self {
        Self { open, close }
    }

    /// `wrap(3)` → `[3]` for [`OPTION`].
    pub fn wrap(&self, label: impl fmt::Display) -> String {
        format!("{}{label}{}", self.open, self.close)
    }

    /// Whether the wrapped `label` occurs anywhere in `text`.
    pub fn mentions(&self, text: &str, label: impl fmt::Display) -> bool {
        text.contains(&self.wrap(label))
    }

    /// Text between the first opening marker and the first closing marker
    /// after it, trimmed of surrounding whitespace.
    pub fn extract<'a>(&self, text: &'a str) -> std::result::Result<&'a str, Unmatched> {
        let start = text.find(self.open).ok_or(Unmatched::MissingOpen)? + self.open.len();
        let rest = &text[start..];
        let end = rest.find(self.close).ok_or(Unmatched::MissingClose)?;
        Ok(rest[..end].trim())
    }

    /// The first wrapped token of `text`, read as an unsigned integer, e.g. `7`
    /// from `"I pick [ 7 ]."`. Only the first token counts: if it is not a
    /// number (or does not fit), the answer is `None` even when a later one is.
    pub fn first_integer(&self, text: &str) -> Option<u64> {
        let token = self.extract(text).ok()?;
        if !UNSIGNED.is_match(token) {
            return None;
        }
        token.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_extract_block() {
        let text = "Sure! [begin]\n  Step 1: isolate the variable.\n[end] Hope it helps.";
        assert_eq!(BLOCK.extract(text), Ok("Step 1: isolate the variable."));
    }

    #[test]
    fn test_extract_uses_first_close_after_open() {
        let text = "[end] noise [begin] a [end] b [end]";
        assert_eq!(BLOCK.extract(text), Ok("a"));
    }

    #[test]
    fn test_extract_missing_markers() {
        assert_eq!(BLOCK.extract("no markers"), Err(Unmatched::MissingOpen));
        assert_eq!(BLOCK.extract("[begin] dangling"), Err(Unmatched::MissingClose));
        assert_eq!(BLOCK.extract("[end] before [begin]"), Err(Unmatched::MissingClose));
    }

    #[test]
    fn test_wrap_and_mentions() {
        assert_eq!(OPTION.wrap(3), "[3]");
        assert_eq!(CHOICE.wrap(1), "<<1>>");
        assert!(CHOICE.mentions("I choose <<2>>.", 2));
        assert!(!CHOICE.mentions("I choose 2.", 2));
    }

    #[test]
    fn test_first_integer() {
        assert_eq!(OPTION.first_integer("[2]"), Some(2));
        assert_eq!(OPTION.first_integer("answer: [ 12 ] because"), Some(12));
        assert_eq!(OPTION.first_integer("[note] then [4]"), None);
        assert_eq!(OPTION.first_integer("[none of these] [2]"), None);
        assert_eq!(OPTION.first_integer("[+3]"), None);
        assert_eq!(OPTION.first_integer("[3] then [note]"), Some(3));
        assert_eq!(OPTION.first_integer("option 3"), None);
        assert_eq!(OPTION.first_integer("[abc]"), None);
        assert_eq!(OPTION.first_integer("[-1]"), None);
        assert_eq!(OPTION.first_integer("[99999999999999999999999]"), None);
        assert_eq!(CHOICE.first_integer("<<1>>"), Some(1));
    }

    proptest! {
        #[test]
        fn prop_extract_returns_trimmed_inner(
            prefix in "[a-z .!]{0,20}",
            inner in "[a-zA-Z0-9 ,.\n]{0,60}",
            suffix in "[a-z .!\\[\\]]{0,20}",
        ) {
            let text = format!("{prefix}[begin]{inner}[end]{suffix}");
            prop_assert_eq!(BLOCK.extract(&text), Ok(inner.trim()));
        }

        #[test]
        fn prop_extract_without_close_fails(
            prefix in "[a-z ]{0,20}",
            inner in "[a-z ]{0,40}",
        ) {
            let text = format!("{prefix}[begin]{inner}");
            prop_assert_eq!(BLOCK.extract(&text), Err(Unmatched::MissingClose));
        }

        #[test]
        fn prop_first_integer_finds_wrapped_number(n in 0u64..100_000, noise in "[a-z ]{0,20}") {
            let text = format!("{noise}{}{noise}", OPTION.wrap(n));
            prop_assert_eq!(OPTION.first_integer(&text), Some(n));
        }
    }
}
