//! # Error Types

/// Errors from bytepair operations.
#[derive(Debug, thiserror::Error)]
pub enum BytepairError {
    /// Vocab size is below the minimum (256, the u8 space).
    #[error("vocab size ({size}) must be >= 256")]
    VocabSizeTooSmall {
        /// The vocab size that was too small.
        size: usize,
    },

    /// Vocab size exceeds the capacity of the target token type.
    #[error("vocab size ({size}) exceeds token type capacity")]
    VocabSizeOverflow {
        /// The vocab size that exceeded the capacity.
        size: usize,
    },

    /// Vocabulary data is inconsistent.
    #[error("{0}")]
    VocabConflict(String),

    /// A registered special token occurred in plain text under a
    /// policy that disallows it.
    #[error("special token {0:?} is not allowed in plain text")]
    SpecialTokenConflict(String),

    /// An allowed-set entry names a special token that is not registered.
    #[error("unknown special token {0:?} in allowed set")]
    UnknownSpecialToken(String),

    /// Decode was given an id in neither the vocabulary nor the special set.
    #[error("invalid token id: {0}")]
    InvalidToken(String),

    /// Malformed persisted model.
    #[error("model parse error at line {line}: {message}")]
    Parse {
        /// The 1-based line number of the offending line.
        line: usize,
        /// What was wrong with it.
        message: String,
    },

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Regex pattern compilation failure.
    #[error("regex error: {0}")]
    Regex(String),
}

/// Result type for bytepair operations.
pub type BpResult<T> = core::result::Result<T, BytepairError>;
