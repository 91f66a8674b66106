//! # Encoder
//!
//! Chunk-aware encoding: every chunk is encoded independently, so
//! merges never span a chunk boundary, matching training.

use crate::errors::{BpResult, BytepairError};
use crate::merges::{PairCounts, apply_merge, count_pairs_into};
use crate::splitter::Segment;
use crate::tokenizer::BpeModel;
use crate::types::{BpHashSet, TokenType};

/// Policy for recognizing registered special tokens at encode time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SpecialPolicy {
    /// Recognize every registered special token.
    All,

    /// Recognize none; special-token text encodes as ordinary bytes.
    None,

    /// Fail if any registered special-token string occurs in the text.
    ///
    /// This is the default, matching tiktoken behaviour.
    #[default]
    Reject,

    /// Recognize only the named subset of registered special tokens.
    Allowed(BpHashSet<String>),
}

impl<T: TokenType> BpeModel<T> {
    /// Encode one chunk's bytes by repeated highest-priority merging.
    ///
    /// Each iteration picks, among the adjacent pairs present, the one
    /// with the lowest assigned merge id (earliest trained), and applies
    /// it; stops when no present pair is in the merge table.
    fn encode_chunk(
        &self,
        bytes: &[u8],
    ) -> Vec<T> {
        let mut ids: Vec<T> = bytes.iter().map(|&b| T::from_u8(b).unwrap()).collect();

        while ids.len() >= 2 {
            let mut counts: PairCounts<T> = PairCounts::default();
            count_pairs_into(&ids, &mut counts);

            // Lowest merge id = highest priority; not highest frequency.
            let best = counts
                .keys()
                .filter_map(|&pair| self.merges.get(&pair).map(|idx| (idx, pair)))
                .min();

            let Some((idx, pair)) = best else {
                break;
            };
            ids = apply_merge(&ids, pair, idx);
        }
        ids
    }

    /// Encode text, ignoring any special tokens.
    ///
    /// ## Arguments
    /// * `text` - The text to encode.
    ///
    /// ## Returns
    /// The concatenated per-chunk id sequences.
    pub fn encode_ordinary(
        &self,
        text: &str,
    ) -> Vec<T> {
        let mut ids = Vec::new();
        for chunk in self.splitter.chunks(text) {
            ids.extend(self.encode_chunk(chunk.as_bytes()));
        }
        ids
    }

    /// Encode text under a special-token policy.
    ///
    /// The text is partitioned on exact, non-overlapping occurrences of
    /// the recognized special tokens; each special segment contributes
    /// its reserved id directly, in position, and each remaining segment
    /// is ordinary-encoded.
    ///
    /// ## Arguments
    /// * `text` - The text to encode.
    /// * `policy` - Which registered special tokens to recognize.
    ///
    /// ## Returns
    /// The id sequence; or [`BytepairError::SpecialTokenConflict`] under
    /// [`SpecialPolicy::Reject`] when a registered special token occurs
    /// in the text, or [`BytepairError::UnknownSpecialToken`] when an
    /// [`SpecialPolicy::Allowed`] entry is not registered.
    pub fn encode(
        &self,
        text: &str,
        policy: &SpecialPolicy,
    ) -> BpResult<Vec<T>> {
        let recognized: Vec<&str> = match policy {
            SpecialPolicy::All => self.specials.strings(),
            SpecialPolicy::None => vec![],
            SpecialPolicy::Reject => {
                for special in self.specials.strings() {
                    if text.contains(special) {
                        return Err(BytepairError::SpecialTokenConflict(special.to_string()));
                    }
                }
                vec![]
            }
            SpecialPolicy::Allowed(allowed) => {
                for name in allowed {
                    if !self.specials.contains(name) {
                        return Err(BytepairError::UnknownSpecialToken(name.clone()));
                    }
                }
                allowed.iter().map(String::as_str).collect()
            }
        };

        if recognized.is_empty() {
            return Ok(self.encode_ordinary(text));
        }

        let splitter = self.splitter.clone().with_specials(&recognized)?;

        let mut ids = Vec::new();
        for segment in splitter.segments(text) {
            match segment {
                Segment::Text(part) => ids.extend(self.encode_ordinary(part)),
                Segment::Special(part) => {
                    let id = self
                        .specials
                        .token_for(part)
                        .expect("recognized special token is registered");
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }
}
