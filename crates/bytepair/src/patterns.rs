//! # Word Split Patterns
//!
//! The GPT text split patterns, see:
//! <https://github.com/openai/tiktoken/blob/main/tiktoken_ext/openai_public.py>

use crate::regex::ConstRegexPattern;

/// A macro to concatenate multiple string literals with a specified separator.
#[macro_export]
macro_rules! join_strs {
    ($sep:literal, ($first:literal $(, $rest:literal)* $(,)?)) => {
        concat!($first $(, $sep, $rest)*)
    };
}

/// An extension of [`join_strs!()`] which uses the "|" as the seperator.
#[macro_export]
macro_rules! join_patterns {
    ($($e:expr),* $(,)?) => { $crate::join_strs!("|", ($($e),*)) };
}

/// The GPT-2 word split pattern.
///
/// Contractions, runs of letters, runs of digits, runs of punctuation,
/// and whitespace runs; a trailing whitespace run stays separate from
/// whitespace binding to a following word.
pub const GPT2_SPLIT_PATTERN: ConstRegexPattern = ConstRegexPattern::Fancy(join_patterns!(
    r"'(?:[sdmt]|ll|ve|re)",
    r" ?\p{L}+",
    r" ?\p{N}+",
    r" ?[^\s\p{L}\p{N}]+",
    r"\s+(?!\S)",
    r"\s+",
));

/// The GPT-4 word split pattern.
///
/// The stricter variant: case-insensitive contractions, digit runs
/// bounded to 3, and explicit newline handling.
pub const GPT4_SPLIT_PATTERN: ConstRegexPattern = ConstRegexPattern::Fancy(join_patterns!(
    r"'(?i:[sdmt]|ll|ve|re)",
    r"[^\r\n\p{L}\p{N}]?+\p{L}+",
    r"\p{N}{1,3}",
    r" ?[^\s\p{L}\p{N}]++[\r\n]*",
    r"\s*[\r\n]",
    r"\s+(?!\S)",
    r"\s+",
));
