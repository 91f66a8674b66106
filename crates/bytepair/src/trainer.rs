//! # Vocab Trainer
//!
//! Learns a merge table from one in-memory text corpus by iterative
//! pair-merge statistics.

use crate::errors::BpResult;
use crate::merges::{MergeTable, PairCounts, apply_merge, count_pairs_into};
use crate::regex::RegexPattern;
use crate::splitter::TextSplitter;
use crate::types::{Pair, TokenType};
use crate::vocab::{BYTE_RANGE, try_vocab_size};

/// Options for [`Trainer`].
#[derive(Debug, Clone)]
pub struct TrainerOptions {
    /// The regex pattern used for text splitting.
    pub pattern: RegexPattern,

    /// The target vocab size.
    pub vocab_size: usize,
}

impl TrainerOptions {
    /// Create new options.
    ///
    /// ## Arguments
    /// * `pattern` - The word split pattern.
    /// * `vocab_size` - The target vocabulary size.
    pub fn new<P: Into<RegexPattern>>(
        pattern: P,
        vocab_size: usize,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            vocab_size,
        }
    }

    /// Sets the vocab size.
    pub fn with_vocab_size(
        self,
        vocab_size: usize,
    ) -> Self {
        Self { vocab_size, ..self }
    }

    /// Sets the regex pattern used for text splitting.
    pub fn with_pattern<P: Into<RegexPattern>>(
        self,
        pattern: P,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            ..self
        }
    }

    /// Initializes a [`Trainer`] from these options.
    ///
    /// ## Returns
    /// A new `Trainer`, or a regex compilation error.
    pub fn init(self) -> BpResult<Trainer> {
        Trainer::new(self)
    }
}

/// Train results: the learned merge table and the pattern it was
/// trained with.
#[derive(Debug, Clone)]
pub struct TrainResults<T: TokenType> {
    /// The word split pattern used during training.
    pub pattern: RegexPattern,

    /// The learned merge table, in training (priority) order.
    pub merges: MergeTable<T>,
}

/// Trainer for learning byte-pair merges.
#[derive(Debug, Clone)]
pub struct Trainer {
    /// Trainer options.
    pub options: TrainerOptions,

    splitter: TextSplitter,
}

impl Trainer {
    /// Initializes a [`Trainer`].
    ///
    /// ## Arguments
    /// * `options` - The trainer options.
    ///
    /// ## Returns
    /// A new `Trainer`, or a regex compilation error.
    pub fn new(options: TrainerOptions) -> BpResult<Self> {
        let splitter = TextSplitter::from_pattern(&options.pattern)?;
        Ok(Self { options, splitter })
    }

    /// Train a merge table from a text corpus.
    ///
    /// Runs ``vocab_size - 256`` merge rounds. Each round aggregates
    /// pair statistics over all chunk sequences, picks the pair with the
    /// highest total count (ties broken to the numerically smallest
    /// pair, so training is deterministic), mints the next id, and
    /// rewrites every chunk. If the corpus runs out of pairs, training
    /// stops early and the table simply holds fewer merges.
    ///
    /// ## Arguments
    /// * `text` - The training corpus.
    ///
    /// ## Returns
    /// The [`TrainResults`], or a precondition error if the vocab size
    /// is below 256 or exceeds `T`'s capacity.
    pub fn train<T: TokenType>(
        &self,
        text: &str,
    ) -> BpResult<TrainResults<T>> {
        try_vocab_size::<T>(self.options.vocab_size)?;
        let num_merges = self.options.vocab_size - BYTE_RANGE;

        log::info!("starting BPE training: {num_merges} merges to compute");

        let mut chunks: Vec<Vec<T>> = self
            .splitter
            .chunks(text)
            .into_iter()
            .map(|chunk| {
                chunk
                    .as_bytes()
                    .iter()
                    .map(|&b| T::from_u8(b).unwrap())
                    .collect()
            })
            .collect();

        let mut merges: MergeTable<T> = MergeTable::new();
        let mut last_log_percent = 0;

        for round in 0..num_merges {
            let counts = aggregate_pair_counts(&chunks);

            let Some((pair, count)) = select_pair(&counts) else {
                log::warn!(
                    "corpus exhausted after {round} merges ({num_merges} requested); stopping early"
                );
                break;
            };

            let idx = T::from_usize(BYTE_RANGE + round).unwrap();
            chunks = chunks
                .iter()
                .map(|ids| apply_merge(ids, pair, idx))
                .collect();
            merges.push(pair, idx);

            log::debug!(
                "merge {}/{num_merges}: {pair:?} -> {idx} had {count} occurrences",
                round + 1,
            );

            let current_percent = ((round + 1) * 100) / num_merges;
            if current_percent >= last_log_percent + 10 {
                log::info!("progress: {current_percent}% ({}/{num_merges} merges)", round + 1);
                last_log_percent = current_percent;
            }
        }

        log::info!("finished training: {} merges completed", merges.len());
        Ok(TrainResults {
            pattern: self.options.pattern.clone(),
            merges,
        })
    }
}

/// Aggregate pair statistics over all chunk sequences.
///
/// Parallelized per chunk; pair selection still happens on the fully
/// aggregated counts, so trained models are identical with and without
/// the `rayon` feature.
#[cfg(feature = "rayon")]
fn aggregate_pair_counts<T: TokenType>(chunks: &[Vec<T>]) -> PairCounts<T> {
    use rayon::prelude::*;

    chunks
        .par_iter()
        .fold(PairCounts::<T>::default, |mut acc, ids| {
            count_pairs_into(ids, &mut acc);
            acc
        })
        .reduce(PairCounts::<T>::default, |mut a, b| {
            for (pair, count) in b {
                *a.entry(pair).or_insert(0) += count;
            }
            a
        })
}

/// Aggregate pair statistics over all chunk sequences.
#[cfg(not(feature = "rayon"))]
fn aggregate_pair_counts<T: TokenType>(chunks: &[Vec<T>]) -> PairCounts<T> {
    let mut counts = PairCounts::default();
    for ids in chunks {
        count_pairs_into(ids, &mut counts);
    }
    counts
}

/// Select the pair with the strictly highest total count.
///
/// Ties break to the numerically smallest pair. Hash-map iteration
/// order never leaks into the result.
fn select_pair<T: TokenType>(counts: &PairCounts<T>) -> Option<(Pair<T>, usize)> {
    let mut best: Option<(Pair<T>, usize)> = None;
    for (&pair, &count) in counts {
        best = match best {
            None => Some((pair, count)),
            Some((bp, bc)) => {
                if count > bc || (count == bc && pair < bp) {
                    Some((pair, count))
                } else {
                    Some((bp, bc))
                }
            }
        };
    }
    best
}
