//! # Pair Statistics and Merge Application
//!
//! The two inner engines of BPE: counting adjacent pairs over id
//! sequences, and rewriting a sequence by replacing one pair with a
//! freshly minted id.

use crate::types::{BpHashMap, Pair, TokenType};

/// Accumulator map of adjacent-pair occurrence counts.
pub type PairCounts<T> = BpHashMap<Pair<T>, usize>;

/// Accumulate adjacent-pair counts from `ids` into `counts`.
///
/// The accumulator may be reused across many sequences; this is how
/// per-chunk statistics are summed without concatenating the chunks.
/// Sequences of length 0 or 1 contribute no pairs.
///
/// ## Arguments
/// * `ids` - The id sequence to scan.
/// * `counts` - The accumulator to update in place.
pub fn count_pairs_into<T: TokenType>(
    ids: &[T],
    counts: &mut PairCounts<T>,
) {
    for w in ids.windows(2) {
        *counts.entry((w[0], w[1])).or_insert(0) += 1;
    }
}

/// Replace every non-overlapping, left-to-right occurrence of `pair`
/// in `ids` with the single id `idx`.
///
/// Scanning resumes immediately after a replacement, so
/// `[x, a, b, a, b]` with pair `(a, b)` yields `[x, idx, idx]`.
/// The input is not mutated.
///
/// ## Arguments
/// * `ids` - The id sequence to rewrite.
/// * `pair` - The adjacent pair to replace.
/// * `idx` - The replacement id.
///
/// ## Returns
/// The rewritten sequence.
pub fn apply_merge<T: TokenType>(
    ids: &[T],
    pair: Pair<T>,
    idx: T,
) -> Vec<T> {
    let mut out = Vec::with_capacity(ids.len());
    let mut i = 0;
    while i < ids.len() {
        if i + 1 < ids.len() && ids[i] == pair.0 && ids[i + 1] == pair.1 {
            out.push(idx);
            i += 2;
        } else {
            out.push(ids[i]);
            i += 1;
        }
    }
    out
}

/// Ordered table of learned merges.
///
/// The authoritative representation is an append-only list of
/// ``(pair, id)`` records in training order; insertion order is also
/// encode-time priority order (lower id = applied first). A hash index
/// over the same records serves encode-time lookups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeTable<T: TokenType> {
    entries: Vec<(Pair<T>, T)>,
    index: BpHashMap<Pair<T>, T>,
}

impl<T: TokenType> MergeTable<T> {
    /// Create an empty merge table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a merge record.
    ///
    /// If the pair was already present, the earlier (higher priority)
    /// id keeps winning lookups; the record is still appended.
    pub fn push(
        &mut self,
        pair: Pair<T>,
        idx: T,
    ) {
        self.entries.push((pair, idx));
        self.index.entry(pair).or_insert(idx);
    }

    /// Look up the id a pair merges into, if the pair was learned.
    pub fn get(
        &self,
        pair: &Pair<T>,
    ) -> Option<T> {
        self.index.get(pair).copied()
    }

    /// Iterate the merge records in training order.
    pub fn iter(&self) -> impl Iterator<Item = &(Pair<T>, T)> {
        self.entries.iter()
    }

    /// The number of learned merges.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the table empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_pairs() {
        type T = u32;

        let mut counts: PairCounts<T> = PairCounts::default();
        count_pairs_into(&[1, 2, 1, 2, 3], &mut counts);

        assert_eq!(counts.len(), 3);
        assert_eq!(counts[&(1, 2)], 2);
        assert_eq!(counts[&(2, 1)], 1);
        assert_eq!(counts[&(2, 3)], 1);

        // Accumulates across sequences.
        count_pairs_into(&[2, 3], &mut counts);
        assert_eq!(counts[&(2, 3)], 2);
    }

    #[test]
    fn test_count_pairs_degenerate() {
        type T = u32;

        let mut counts: PairCounts<T> = PairCounts::default();
        count_pairs_into(&[], &mut counts);
        count_pairs_into(&[7], &mut counts);
        assert!(counts.is_empty());
    }

    #[test]
    fn test_apply_merge() {
        type T = u32;

        let ids: Vec<T> = vec![1, 2, 1, 2, 3];
        assert_eq!(apply_merge(&ids, (1, 2), 4), vec![4, 4, 3]);
        // Input not mutated.
        assert_eq!(ids, vec![1, 2, 1, 2, 3]);
    }

    #[test]
    fn test_apply_merge_non_overlapping() {
        type T = u32;

        // The first two `a`s are consumed before looking further.
        assert_eq!(apply_merge::<T>(&[5, 5, 6], (5, 5), 9), vec![9, 6]);
        assert_eq!(apply_merge::<T>(&[5, 5, 5], (5, 5), 9), vec![9, 5]);
        assert_eq!(apply_merge::<T>(&[5, 5, 5, 5], (5, 5), 9), vec![9, 9]);
    }

    #[test]
    fn test_merge_table_order() {
        type T = u32;

        let mut table: MergeTable<T> = MergeTable::new();
        assert!(table.is_empty());

        table.push((1, 2), 256);
        table.push((256, 3), 257);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&(1, 2)), Some(256));
        assert_eq!(table.get(&(256, 3)), Some(257));
        assert_eq!(table.get(&(3, 1)), None);

        assert_eq!(
            table.iter().copied().collect::<Vec<_>>(),
            vec![((1, 2), 256), ((256, 3), 257)]
        );
    }
}
