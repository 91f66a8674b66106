//! # Vocabulary Derivation
//!
//! The id to byte-string table is never mutated directly; it is rebuilt
//! from the merge table and the special-token set whenever either changes.

use crate::errors::{BpResult, BytepairError};
use crate::merges::MergeTable;
use crate::types::{BpHashMap, TokenType};

/// The number of raw byte ids; the reserved ``0..=255`` identity range.
pub const BYTE_RANGE: usize = 256;

/// Derived vocabulary mapping: id to byte-string expansion.
pub type VocabMap<T> = BpHashMap<T, Vec<u8>>;

/// Validate a target vocab size against the minimum and `T`'s capacity.
///
/// ## Arguments
/// * `size` - The desired vocab size; must be >= 256 and representable
///   in `T`.
pub fn try_vocab_size<T: TokenType>(size: usize) -> BpResult<()> {
    if size < BYTE_RANGE {
        return Err(BytepairError::VocabSizeTooSmall { size });
    }
    if T::from_usize(size - 1).is_none() {
        return Err(BytepairError::VocabSizeOverflow { size });
    }
    Ok(())
}

/// Bijection between special-token strings and their reserved ids.
///
/// Both directions are consulted: string to id for encoding, id to
/// string for decoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecialTokens<T: TokenType> {
    forward: BpHashMap<String, T>,
    reverse: BpHashMap<T, String>,
}

impl<T: TokenType> SpecialTokens<T> {
    /// Create an empty special-token set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register special tokens.
    ///
    /// ## Arguments
    /// * `mapping` - An iterator of `(string, id)` entries to add.
    ///
    /// ## Returns
    /// `Ok` on success; [`BytepairError::VocabConflict`] if an entry
    /// contains whitespace (unrepresentable in the line-oriented model
    /// format) or would bind an id already bound to a different string,
    /// leaving the set unmodified.
    pub fn register<I, S>(
        &mut self,
        mapping: I,
    ) -> BpResult<()>
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
    {
        let mut forward = self.forward.clone();
        for (text, id) in mapping {
            let text = text.as_ref();
            if text.chars().any(char::is_whitespace) {
                return Err(BytepairError::VocabConflict(format!(
                    "special token {text:?} contains whitespace"
                )));
            }
            forward.insert(text.to_string(), id);
        }

        let mut reverse: BpHashMap<T, String> = BpHashMap::default();
        for (text, &id) in &forward {
            if let Some(prior) = reverse.insert(id, text.clone()) {
                return Err(BytepairError::VocabConflict(format!(
                    "special token id {id} bound to both {prior:?} and {text:?}"
                )));
            }
        }

        self.forward = forward;
        self.reverse = reverse;
        Ok(())
    }

    /// Look up the id for a special-token string.
    pub fn token_for(
        &self,
        text: &str,
    ) -> Option<T> {
        self.forward.get(text).copied()
    }

    /// Look up the string for a special-token id.
    pub fn text_for(
        &self,
        token: &T,
    ) -> Option<&str> {
        self.reverse.get(token).map(String::as_str)
    }

    /// Is the string a registered special token?
    pub fn contains(
        &self,
        text: &str,
    ) -> bool {
        self.forward.contains_key(text)
    }

    /// The registered special-token strings.
    pub fn strings(&self) -> Vec<&str> {
        self.forward.keys().map(String::as_str).collect()
    }

    /// The `(string, id)` entries, sorted by ascending id.
    ///
    /// Sorted so that persisted output is deterministic.
    pub fn sorted_entries(&self) -> Vec<(&str, T)> {
        let mut entries = self
            .forward
            .iter()
            .map(|(s, &t)| (s.as_str(), t))
            .collect::<Vec<_>>();
        entries.sort_by_key(|&(_, t)| t);
        entries
    }

    /// The number of registered special tokens.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Is the set empty?
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

/// Derive the full vocabulary from a merge table and special-token set.
///
/// Ids ``0..=255`` map to their single byte; merged ids are resolved by
/// one forward pass over the merge records in insertion order
/// (``vocab[idx] = vocab[a] ++ vocab[b]``); special ids map to the UTF-8
/// bytes of their strings.
///
/// ## Arguments
/// * `merges` - The ordered merge table.
/// * `specials` - The special-token set.
///
/// ## Returns
/// The derived [`VocabMap`], with
/// ``len == 256 + |merges| + |specials|``; or
/// [`BytepairError::VocabConflict`] if a merge references an undefined
/// parent id, or a special id lands inside the byte or learned range.
pub fn build_vocab<T: TokenType>(
    merges: &MergeTable<T>,
    specials: &SpecialTokens<T>,
) -> BpResult<VocabMap<T>> {
    let mut vocab: VocabMap<T> = BpHashMap::default();

    for b in 0..BYTE_RANGE {
        let id = T::from_usize(b).ok_or(BytepairError::VocabSizeOverflow { size: BYTE_RANGE })?;
        vocab.insert(id, vec![b as u8]);
    }

    for &((a, b), idx) in merges.iter() {
        let left = vocab
            .get(&a)
            .ok_or_else(|| {
                BytepairError::VocabConflict(format!("merge {idx} references undefined parent {a}"))
            })?
            .clone();
        let right = vocab.get(&b).ok_or_else(|| {
            BytepairError::VocabConflict(format!("merge {idx} references undefined parent {b}"))
        })?;

        let mut bytes = left;
        bytes.extend_from_slice(right);
        vocab.insert(idx, bytes);
    }

    for (text, &id) in &specials.forward {
        if vocab.insert(id, text.as_bytes().to_vec()).is_some() {
            return Err(BytepairError::VocabConflict(format!(
                "special token {text:?} id {id} collides with an existing vocabulary entry"
            )));
        }
    }

    Ok(vocab)
}
