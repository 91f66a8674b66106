//! # Tokenizer
//!
//! [`BpeModel`] is an immutable trained-model value (pattern + merge
//! table + special tokens + derived vocabulary). [`Tokenizer`] is a thin
//! holder that swaps whole models on `train` / `load` /
//! `register_special_tokens`, so a failed mutation never leaves partial
//! state behind and read access needs no coordination.

use std::path::Path;

use crate::encoder::SpecialPolicy;
use crate::errors::BpResult;
use crate::merges::MergeTable;
use crate::patterns::GPT4_SPLIT_PATTERN;
use crate::regex::RegexPattern;
use crate::splitter::TextSplitter;
use crate::trainer::TrainerOptions;
use crate::types::TokenType;
use crate::vocab::{SpecialTokens, VocabMap, build_vocab};

/// An immutable trained BPE model.
#[derive(Debug, Clone)]
pub struct BpeModel<T: TokenType> {
    pub(crate) pattern: RegexPattern,
    pub(crate) splitter: TextSplitter,
    pub(crate) merges: MergeTable<T>,
    pub(crate) specials: SpecialTokens<T>,
    pub(crate) vocab: VocabMap<T>,
}

impl<T: TokenType> BpeModel<T> {
    /// Assemble a model from its parts, deriving the vocabulary.
    ///
    /// ## Arguments
    /// * `pattern` - The word split pattern.
    /// * `merges` - The ordered merge table.
    /// * `specials` - The special-token set.
    ///
    /// ## Returns
    /// A new `BpeModel`, or an error if the pattern does not compile or
    /// the merge table references undefined parents.
    pub fn assemble(
        pattern: RegexPattern,
        merges: MergeTable<T>,
        specials: SpecialTokens<T>,
    ) -> BpResult<Self> {
        let splitter = TextSplitter::from_pattern(&pattern)?;
        let vocab = build_vocab(&merges, &specials)?;

        Ok(Self {
            pattern,
            splitter,
            merges,
            specials,
            vocab,
        })
    }

    /// The word split pattern.
    pub fn pattern(&self) -> &RegexPattern {
        &self.pattern
    }

    /// The ordered merge table.
    pub fn merges(&self) -> &MergeTable<T> {
        &self.merges
    }

    /// The special-token set.
    pub fn specials(&self) -> &SpecialTokens<T> {
        &self.specials
    }

    /// The derived vocabulary.
    pub fn vocab(&self) -> &VocabMap<T> {
        &self.vocab
    }
}

/// A byte-level BPE tokenizer.
///
/// Created empty: a 256-byte identity vocabulary, no merges, no special
/// tokens, and the GPT-4 split pattern. There is no deletion operation.
#[derive(Debug, Clone)]
pub struct Tokenizer<T: TokenType> {
    model: BpeModel<T>,
}

impl<T: TokenType> Default for Tokenizer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TokenType> Tokenizer<T> {
    /// Create an untrained tokenizer with the GPT-4 split pattern.
    pub fn new() -> Self {
        Self::with_pattern(GPT4_SPLIT_PATTERN.into())
            .expect("default split pattern compilation failed")
    }

    /// Create an untrained tokenizer with a caller-supplied pattern.
    ///
    /// ## Arguments
    /// * `pattern` - The word split pattern; an empty pattern disables
    ///   chunk splitting.
    pub fn with_pattern(pattern: RegexPattern) -> BpResult<Self> {
        Ok(Self {
            model: BpeModel::assemble(pattern, MergeTable::new(), SpecialTokens::new())?,
        })
    }

    /// The current model.
    pub fn model(&self) -> &BpeModel<T> {
        &self.model
    }

    /// Train a vocabulary of `vocab_size` ids from `text`.
    ///
    /// Replaces the merge table and vocabulary wholesale; registered
    /// special tokens are preserved. Training is not incremental.
    ///
    /// ## Arguments
    /// * `text` - The training corpus.
    /// * `vocab_size` - The target vocab size; must be >= 256.
    pub fn train(
        &mut self,
        text: &str,
        vocab_size: usize,
    ) -> BpResult<()> {
        let trainer = TrainerOptions::new(self.model.pattern.clone(), vocab_size).init()?;
        let results = trainer.train::<T>(text)?;

        self.model = BpeModel::assemble(
            results.pattern,
            results.merges,
            self.model.specials.clone(),
        )?;
        Ok(())
    }

    /// Register special tokens and rebuild the vocabulary.
    ///
    /// ## Arguments
    /// * `mapping` - An iterator of `(string, id)` entries; ids are
    ///   caller-assigned and by convention placed above the learned range.
    pub fn register_special_tokens<I, S>(
        &mut self,
        mapping: I,
    ) -> BpResult<()>
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
    {
        let mut specials = self.model.specials.clone();
        specials.register(mapping)?;

        self.model = BpeModel::assemble(
            self.model.pattern.clone(),
            self.model.merges.clone(),
            specials,
        )?;
        Ok(())
    }

    /// Encode text, ignoring any special tokens.
    ///
    /// See [`BpeModel::encode_ordinary`].
    pub fn encode_ordinary(
        &self,
        text: &str,
    ) -> Vec<T> {
        self.model.encode_ordinary(text)
    }

    /// Encode text under a special-token policy.
    ///
    /// See [`BpeModel::encode`].
    pub fn encode(
        &self,
        text: &str,
        policy: &SpecialPolicy,
    ) -> BpResult<Vec<T>> {
        self.model.encode(text, policy)
    }

    /// Decode an id sequence back to text.
    ///
    /// See [`BpeModel::decode`].
    pub fn decode(
        &self,
        ids: &[T],
    ) -> BpResult<String> {
        self.model.decode(ids)
    }

    /// Persist the model; writes `<prefix>.model` and `<prefix>.vocab`.
    ///
    /// See [`BpeModel::save`].
    pub fn save(
        &self,
        prefix: &Path,
    ) -> BpResult<()> {
        self.model.save(prefix)
    }

    /// Replace this tokenizer's state from a persisted `.model` file.
    ///
    /// Replaces pattern, merges, and special tokens wholesale, and
    /// rebuilds the vocabulary.
    ///
    /// ## Arguments
    /// * `path` - The `.model` file path.
    pub fn load(
        &mut self,
        path: &Path,
    ) -> BpResult<()> {
        self.model = BpeModel::read_model_file(path)?;
        Ok(())
    }
}
