//! # Text Splitter
//!
//! Chunk splitting (merges never cross chunk boundaries) and
//! special-token segmentation.

use crate::errors::BpResult;
use crate::regex::{RegexPattern, RegexWrapper, exact_match_union_pattern};

/// One segment of a special-token partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'h> {
    /// Ordinary text, to be chunk-split and byte-encoded.
    Text(&'h str),

    /// An exact occurrence of a registered special token.
    Special(&'h str),
}

/// Word Split + Special Token Splitter
#[derive(Debug, Clone)]
pub struct TextSplitter {
    /// Regex for splitting words; `None` for the empty pattern,
    /// which treats the whole text as one chunk.
    word_re: Option<RegexWrapper>,

    /// Regex matching exact special-token occurrences.
    special_re: Option<RegexWrapper>,
}

impl TextSplitter {
    /// Create a splitter from a word split pattern.
    ///
    /// ## Arguments
    /// * `pattern` - The word split pattern; an empty pattern disables
    ///   splitting.
    ///
    /// ## Returns
    /// A new `TextSplitter`, or a regex compilation error.
    pub fn from_pattern(pattern: &RegexPattern) -> BpResult<Self> {
        let word_re = if pattern.is_empty() {
            None
        } else {
            Some(pattern.compile()?)
        };

        Ok(Self {
            word_re,
            special_re: None,
        })
    }

    /// Attach a special-token union to this splitter.
    ///
    /// ## Arguments
    /// * `specials` - The special-token literals to recognize;
    ///   an empty slice detaches special matching.
    pub fn with_specials<S: AsRef<str>>(
        self,
        specials: &[S],
    ) -> BpResult<Self> {
        let special_re = if specials.is_empty() {
            None
        } else {
            Some(exact_match_union_pattern(specials).compile()?)
        };

        Ok(Self { special_re, ..self })
    }

    /// Split text into chunks.
    ///
    /// The chunks are the word-pattern matches plus any gap text between
    /// them, so their concatenation always reconstructs the input exactly.
    ///
    /// ## Arguments
    /// * `text` - The text to split.
    ///
    /// ## Returns
    /// An ordered vector of non-empty substrings.
    pub fn chunks<'h>(
        &self,
        text: &'h str,
    ) -> Vec<&'h str> {
        let Some(word_re) = &self.word_re else {
            return if text.is_empty() { vec![] } else { vec![text] };
        };

        let mut chunks = Vec::new();
        let mut last = 0;
        for range in word_re.find_ranges(text) {
            if range.is_empty() {
                continue;
            }
            if last < range.start {
                chunks.push(&text[last..range.start]);
            }
            chunks.push(&text[range.clone()]);
            last = range.end;
        }
        if last < text.len() {
            chunks.push(&text[last..]);
        }
        chunks
    }

    /// Partition text on exact occurrences of the attached special tokens.
    ///
    /// ## Arguments
    /// * `text` - The text to partition.
    ///
    /// ## Returns
    /// An ordered vector of [`Segment`] items whose concatenation
    /// reconstructs the input.
    pub fn segments<'h>(
        &self,
        text: &'h str,
    ) -> Vec<Segment<'h>> {
        let Some(special_re) = &self.special_re else {
            return if text.is_empty() {
                vec![]
            } else {
                vec![Segment::Text(text)]
            };
        };

        let mut segments = Vec::new();
        let mut last = 0;
        for range in special_re.find_ranges(text) {
            if last < range.start {
                segments.push(Segment::Text(&text[last..range.start]));
            }
            segments.push(Segment::Special(&text[range.clone()]));
            last = range.end;
        }
        if last < text.len() {
            segments.push(Segment::Text(&text[last..]));
        }
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::GPT4_SPLIT_PATTERN;

    #[test]
    fn test_chunks_reconstruct() {
        let splitter = TextSplitter::from_pattern(&GPT4_SPLIT_PATTERN.into()).unwrap();

        let text = "hello world!!!? (안녕하세요!) lol123 😉";
        let chunks = splitter.chunks(text);

        assert!(!chunks.is_empty());
        assert!(chunks.iter().all(|c| !c.is_empty()));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_empty_pattern_single_chunk() {
        let splitter = TextSplitter::from_pattern(&RegexPattern::from("")).unwrap();

        assert_eq!(splitter.chunks("abc def"), vec!["abc def"]);
        assert!(splitter.chunks("").is_empty());
    }

    #[test]
    fn test_gap_text_kept() {
        // A pattern that only matches letters leaves everything else as gaps.
        let splitter = TextSplitter::from_pattern(&RegexPattern::from(r"\p{L}+")).unwrap();

        let text = "ab, cd!";
        assert_eq!(splitter.chunks(text), vec!["ab", ", ", "cd", "!"]);
        assert_eq!(splitter.chunks(text).concat(), text);
    }

    #[test]
    fn test_segments() {
        let splitter = TextSplitter::from_pattern(&GPT4_SPLIT_PATTERN.into())
            .unwrap()
            .with_specials(&["<|endoftext|>"])
            .unwrap();

        assert_eq!(
            splitter.segments("hi<|endoftext|>bye"),
            vec![
                Segment::Text("hi"),
                Segment::Special("<|endoftext|>"),
                Segment::Text("bye"),
            ]
        );

        assert_eq!(
            splitter.segments("<|endoftext|><|endoftext|>"),
            vec![
                Segment::Special("<|endoftext|>"),
                Segment::Special("<|endoftext|>"),
            ]
        );
    }

    #[test]
    fn test_segments_without_specials() {
        let splitter = TextSplitter::from_pattern(&GPT4_SPLIT_PATTERN.into()).unwrap();

        assert_eq!(splitter.segments("plain"), vec![Segment::Text("plain")]);
        assert!(splitter.segments("").is_empty());
    }
}
