//! # `bytepair` Byte-Level BPE Tokenizer
//!
//! A byte-level Byte Pair Encoding tokenizer: it learns a subword
//! vocabulary from raw text and provides a lossless, deterministic
//! encode/decode between text and integer token ids.
//!
//! See:
//! * [`tokenizer`] for the [`tokenizer::Tokenizer`] entry point.
//! * [`trainer`] to learn a merge table from a corpus.
//! * [`encoder`] / [`decoder`] for the encode/decode surfaces.
//! * [`model_io`] for the persisted model format.
//! * [`patterns`] for the GPT word-split patterns.
//!
//! ```rust
//! use bytepair::encoder::SpecialPolicy;
//! use bytepair::tokenizer::Tokenizer;
//!
//! let mut tokenizer: Tokenizer<u32> = Tokenizer::new();
//! tokenizer.train("a corpus of training text, repeated, repeated", 300)?;
//! tokenizer.register_special_tokens([("<|endoftext|>", 100257_u32)])?;
//!
//! let ids = tokenizer.encode("repeated text<|endoftext|>", &SpecialPolicy::All)?;
//! assert_eq!(tokenizer.decode(&ids)?, "repeated text<|endoftext|>");
//! # Ok::<(), bytepair::errors::BytepairError>(())
//! ```
//!
//! ## Crate Features
//!
//! #### feature: ``ahash``
//!
//! This swaps all HashMap/HashSet implementations for ``ahash``; which
//! is a performance win on many/(most?) modern CPUs. Enabled by
//! default; done by the ``types::BpHash{*}`` type alias machinery.
//!
//! #### feature: ``rayon``
//!
//! This enables parallel pair-count aggregation during training using
//! the ``rayon`` crate. Pair selection is still computed from the fully
//! aggregated counts, so trained models are identical with and without
//! it.
#![warn(missing_docs, unused)]

pub mod decoder;
pub mod encoder;
pub mod errors;
pub mod merges;
pub mod model_io;
pub mod patterns;
pub mod regex;
pub mod splitter;
pub mod tokenizer;
pub mod trainer;
pub mod types;
pub mod vocab;
