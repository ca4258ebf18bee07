//! Target expressions with an explicit include/exclude polarity
//!
//! A build-tool command line lists target patterns in order. A pattern with a
//! leading `-` removes matching targets from the request; any other pattern adds
//! them. The polarity is parsed once here and carried as a tag, and the token is
//! re-derived only when the expression is written back out.
//!
//! # Example
//!
//! ```
//! use target_shard::{Polarity, TargetExpression};
//!
//! let target = TargetExpression::parse("-//java/com/google/...");
//! assert_eq!(target.polarity(), Polarity::Exclude);
//! assert_eq!(target.pattern(), "//java/com/google/...");
//! assert_eq!(target.to_string(), "-//java/com/google/...");
//! ```

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Prefix marking an exclusion in the serialized token
const EXCLUDE_PREFIX: char = '-';

/// Whether a pattern adds targets to, or removes them from, a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Polarity {
    /// Adds matching targets
    #[default]
    Include,

    /// Removes matching targets added earlier in the same invocation
    Exclude,
}

impl Polarity {
    pub fn is_include(&self) -> bool {
        matches!(self, Polarity::Include)
    }

    pub fn is_exclude(&self) -> bool {
        matches!(self, Polarity::Exclude)
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarity::Include => write!(f, "include"),
            Polarity::Exclude => write!(f, "exclude"),
        }
    }
}

/// One target pattern tagged with its polarity
///
/// The pattern is opaque: no validation is done, and empty or malformed
/// patterns pass through unchanged. Equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct TargetExpression {
    pattern: String,
    polarity: Polarity,
}

impl TargetExpression {
    pub fn new(pattern: impl Into<String>, polarity: Polarity) -> Self {
        Self {
            pattern: pattern.into(),
            polarity,
        }
    }

    /// Create an include pattern
    pub fn include(pattern: impl Into<String>) -> Self {
        Self::new(pattern, Polarity::Include)
    }

    /// Create an exclude pattern (`pattern` is given without the leading `-`)
    pub fn exclude(pattern: impl Into<String>) -> Self {
        Self::new(pattern, Polarity::Exclude)
    }

    /// Parse a serialized token
    ///
    /// Only the first leading `-` is taken as the exclusion marker, so `--x`
    /// is an exclusion of the pattern `-x`.
    pub fn parse(token: &str) -> Self {
        match token.strip_prefix(EXCLUDE_PREFIX) {
            Some(pattern) => Self::exclude(pattern),
            None => Self::include(token),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn is_excluded(&self) -> bool {
        self.polarity.is_exclude()
    }

    /// Serialize back to a command-line token
    ///
    /// `parse(t).to_token() == t` holds for every token `t`.
    pub fn to_token(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TargetExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_excluded() {
            write!(f, "{}", EXCLUDE_PREFIX)?;
        }
        f.write_str(&self.pattern)
    }
}

impl FromStr for TargetExpression {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for TargetExpression {
    fn from(token: &str) -> Self {
        Self::parse(token)
    }
}

impl From<String> for TargetExpression {
    fn from(token: String) -> Self {
        Self::parse(&token)
    }
}

impl From<TargetExpression> for String {
    fn from(target: TargetExpression) -> Self {
        target.to_token()
    }
}

/// Parse an ordered list of tokens, keeping their order
pub fn parse_all<I, S>(tokens: I) -> Vec<TargetExpression>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|token| TargetExpression::parse(token.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_include() {
        let target = TargetExpression::parse("//java/com/google:one");
        assert_eq!(target.polarity(), Polarity::Include);
        assert_eq!(target.pattern(), "//java/com/google:one");
        assert!(!target.is_excluded());
    }

    #[test]
    fn test_parse_exclude() {
        let target = TargetExpression::parse("-//java/com/google:two");
        assert_eq!(target.polarity(), Polarity::Exclude);
        assert_eq!(target.pattern(), "//java/com/google:two");
        assert_eq!(target, TargetExpression::exclude("//java/com/google:two"));
    }

    #[test]
    fn test_only_first_dash_is_polarity() {
        let target = TargetExpression::parse("--x");
        assert!(target.is_excluded());
        assert_eq!(target.pattern(), "-x");
        assert_eq!(target.to_token(), "--x");
    }

    #[test]
    fn test_empty_patterns_pass_through() {
        let empty = TargetExpression::parse("");
        assert_eq!(empty, TargetExpression::include(""));
        assert_eq!(empty.to_token(), "");

        let bare_dash = TargetExpression::parse("-");
        assert_eq!(bare_dash, TargetExpression::exclude(""));
        assert_eq!(bare_dash.to_token(), "-");
    }

    #[test]
    fn test_token_round_trip() {
        for token in ["//a/...", "-//a/...:all", "", "-", "  spaced ", "'quoted'"] {
            assert_eq!(TargetExpression::parse(token).to_token(), token);
        }
    }

    #[test]
    fn test_equality_is_structural() {
        assert_ne!(TargetExpression::include("a"), TargetExpression::exclude("a"));
        assert_eq!(TargetExpression::include("a"), "a".parse::<TargetExpression>().unwrap());
    }

    #[test]
    fn test_parse_all_keeps_order() {
        let targets = parse_all(["//a", "-//b", "//c"]);
        assert_eq!(
            targets,
            vec![
                TargetExpression::include("//a"),
                TargetExpression::exclude("//b"),
                TargetExpression::include("//c"),
            ]
        );
    }

    #[test]
    fn test_polarity_display() {
        assert_eq!(Polarity::Include.to_string(), "include");
        assert_eq!(Polarity::Exclude.to_string(), "exclude");
        assert!(Polarity::default().is_include());
    }
}
