//! # Regex Support
//!
//! This module mixes `regex` and `fancy_regex` behind one wrapper type:
//! the word-split patterns need lookahead and possessive constructs that
//! only `fancy_regex` supports, while special-token unions are plain
//! alternations best served by `regex`.

mod exact_match_union;
mod regex_wrapper;

pub use exact_match_union::exact_match_union_pattern;
pub use regex_wrapper::{ConstRegexPattern, RegexPattern, RegexWrapper};
