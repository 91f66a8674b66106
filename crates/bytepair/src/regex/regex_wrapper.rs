//! # Regex Wrapper
//! This module provides mechanisms to mix `regex` and `fancy_regex` types.

use core::ops::Range;

use crate::errors::{BpResult, BytepairError};

/// Const Regex Pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ConstRegexPattern {
    /// This is a pattern for the `regex` crate.
    Basic(&'static str),

    /// This is a pattern for the `fancy_regex` crate.
    Fancy(&'static str),
}

impl ConstRegexPattern {
    /// Get the underlying regex pattern.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Basic(pattern) => pattern,
            Self::Fancy(pattern) => pattern,
        }
    }

    /// Compile the regex pattern into a [`RegexWrapper`].
    pub fn compile(&self) -> BpResult<RegexWrapper> {
        RegexPattern::from(*self).compile()
    }
}

impl From<ConstRegexPattern> for RegexPattern {
    fn from(pattern: ConstRegexPattern) -> Self {
        use ConstRegexPattern::*;
        match pattern {
            Basic(pattern) => RegexPattern::Basic(pattern.to_string()),
            Fancy(pattern) => RegexPattern::Fancy(pattern.to_string()),
        }
    }
}

/// Label for regex patterns.
///
/// Patterns compare equal iff their source strings are equal; the
/// engine selection variant does not participate (a persisted pattern
/// always reloads as [`RegexPattern::Adaptive`]).
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum RegexPattern {
    /// This is a pattern for the `regex` crate.
    Basic(String),

    /// This is a pattern for the `fancy_regex` crate.
    Fancy(String),

    /// This pattern will try the `regex` crate first,
    /// and fallback to `fancy_regex` if it fails.
    Adaptive(String),
}

impl PartialEq for RegexPattern {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for RegexPattern {}

impl<S: AsRef<str>> From<S> for RegexPattern {
    fn from(pattern: S) -> Self {
        Self::Adaptive(pattern.as_ref().to_string())
    }
}

impl RegexPattern {
    /// Get the underlying regex pattern.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Basic(pattern) => pattern,
            Self::Fancy(pattern) => pattern,
            Self::Adaptive(pattern) => pattern,
        }
    }

    /// Is the pattern the empty string?
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// Compile the regex pattern into a [`RegexWrapper`].
    ///
    /// ## Returns
    /// A `Result` containing the compiled `RegexWrapper`,
    /// or [`BytepairError::Regex`].
    pub fn compile(&self) -> BpResult<RegexWrapper> {
        match self {
            Self::Basic(pattern) => regex::Regex::new(pattern)
                .map(RegexWrapper::from)
                .map_err(|e| BytepairError::Regex(e.to_string())),
            Self::Fancy(pattern) => fancy_regex::Regex::new(pattern)
                .map(RegexWrapper::from)
                .map_err(|e| BytepairError::Regex(e.to_string())),
            Self::Adaptive(pattern) => regex::Regex::new(pattern)
                .map(RegexWrapper::from)
                .or_else(|_| {
                    fancy_regex::Regex::new(pattern)
                        .map(RegexWrapper::from)
                        .map_err(|e| BytepairError::Regex(e.to_string()))
                }),
        }
    }
}

/// Wrapper for compiled regexes.
#[derive(Debug, Clone)]
pub enum RegexWrapper {
    /// Wrapper for `regex::Regex`.
    Basic(regex::Regex),

    /// Wrapper for `fancy_regex::Regex`.
    Fancy(fancy_regex::Regex),
}

impl From<regex::Regex> for RegexWrapper {
    fn from(regex: regex::Regex) -> Self {
        Self::Basic(regex)
    }
}

impl From<fancy_regex::Regex> for RegexWrapper {
    fn from(regex: fancy_regex::Regex) -> Self {
        Self::Fancy(regex)
    }
}

impl RegexWrapper {
    /// Get the underlying regex pattern.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Basic(regex) => regex.as_str(),
            Self::Fancy(regex) => regex.as_str(),
        }
    }

    /// Iterate over the byte ranges of all non-overlapping matches.
    ///
    /// ## Arguments
    /// * `haystack` - The string to search in.
    ///
    /// ## Returns
    /// A `RangesWrapper` iterator over the match ranges.
    pub fn find_ranges<'r, 'h>(
        &'r self,
        haystack: &'h str,
    ) -> RangesWrapper<'r, 'h> {
        match self {
            Self::Basic(regex) => regex.find_iter(haystack).into(),
            Self::Fancy(regex) => regex.find_iter(haystack).into(),
        }
    }
}

/// Wrapper for regex match-range iterators.
pub enum RangesWrapper<'r, 'h> {
    /// Wrapper for `regex::Matches`.
    Regex(regex::Matches<'r, 'h>),

    /// Wrapper for `fancy_regex::Matches`.
    FancyRegex(fancy_regex::Matches<'r, 'h>),
}

impl<'r, 'h> From<regex::Matches<'r, 'h>> for RangesWrapper<'r, 'h> {
    fn from(matches: regex::Matches<'r, 'h>) -> Self {
        Self::Regex(matches)
    }
}

impl<'r, 'h> From<fancy_regex::Matches<'r, 'h>> for RangesWrapper<'r, 'h> {
    fn from(matches: fancy_regex::Matches<'r, 'h>) -> Self {
        Self::FancyRegex(matches)
    }
}

impl Iterator for RangesWrapper<'_, '_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Regex(matches) => matches.next().map(|m| m.range()),
            Self::FancyRegex(matches) => matches.next().map(|m| m.unwrap().range()),
        }
    }
}
