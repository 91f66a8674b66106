//! # Model Persistence
//!
//! The `.model` file is the stable serialized form, round-tripped
//! exactly through save/load:
//!
//! ```text
//! bpe v1
//! <split pattern, may be empty>
//! <number of special tokens>
//! <special_token_string> <id>     (one per special token)
//! <id_a> <id_b>                   (one merge per line, in training
//!                                  order; the resulting id is implicit:
//!                                  256, 257, ... in file order)
//! ```
//!
//! The `.vocab` file is a human-readable dump for inspection only; it is
//! lossy (invalid UTF-8 renders as the replacement character) and is
//! never read back.

use std::ffi::OsString;
use std::fmt::Write as _;
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::errors::{BpResult, BytepairError};
use crate::merges::MergeTable;
use crate::regex::RegexPattern;
use crate::tokenizer::BpeModel;
use crate::types::{BpHashMap, Pair, TokenType};
use crate::vocab::{BYTE_RANGE, SpecialTokens};

/// The literal format tag on the first line of a `.model` file.
pub const MODEL_FORMAT_TAG: &str = "bpe v1";

fn with_suffix(
    prefix: &Path,
    suffix: &str,
) -> PathBuf {
    let mut os: OsString = prefix.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

/// Render a token's bytes for the human-readable dump.
///
/// Decodes lossily, then escapes control characters (which would
/// distort the line-oriented output) as `\uXXXX`.
fn render_token(bytes: &[u8]) -> String {
    let mut out = String::new();
    for ch in String::from_utf8_lossy(bytes).chars() {
        if ch.is_control() {
            let _ = write!(out, "\\u{:04x}", ch as u32);
        } else {
            out.push(ch);
        }
    }
    out
}

fn parse_err(
    line: usize,
    message: impl Into<String>,
) -> BytepairError {
    BytepairError::Parse {
        line,
        message: message.into(),
    }
}

impl<T: TokenType> BpeModel<T> {
    /// Persist the model; writes `<prefix>.model` and `<prefix>.vocab`.
    ///
    /// ## Arguments
    /// * `prefix` - The path prefix for both output files.
    pub fn save(
        &self,
        prefix: &Path,
    ) -> BpResult<()> {
        self.write_model_file(&with_suffix(prefix, ".model"))?;
        self.write_vocab_file(&with_suffix(prefix, ".vocab"))?;
        Ok(())
    }

    fn write_model_file(
        &self,
        path: &Path,
    ) -> BpResult<()> {
        let mut f = BufWriter::new(fs::File::create(path)?);

        writeln!(f, "{MODEL_FORMAT_TAG}")?;
        writeln!(f, "{}", self.pattern.as_str())?;

        writeln!(f, "{}", self.specials.len())?;
        for (text, id) in self.specials.sorted_entries() {
            writeln!(f, "{text} {id}")?;
        }

        for &((a, b), _) in self.merges.iter() {
            writeln!(f, "{a} {b}")?;
        }

        f.flush()?;
        Ok(())
    }

    fn write_vocab_file(
        &self,
        path: &Path,
    ) -> BpResult<()> {
        let mut f = BufWriter::new(fs::File::create(path)?);

        // idx -> parent pair, for rendering merged ids with their children.
        let parents: BpHashMap<T, Pair<T>> =
            self.merges.iter().map(|&(pair, idx)| (idx, pair)).collect();

        let mut ids: Vec<T> = self.vocab.keys().copied().collect();
        ids.sort();

        for id in ids {
            let s = render_token(&self.vocab[&id]);
            if let Some((a, b)) = parents.get(&id) {
                let s0 = render_token(&self.vocab[a]);
                let s1 = render_token(&self.vocab[b]);
                writeln!(f, "[{s0}][{s1}] -> [{s}] {id}")?;
            } else {
                writeln!(f, "[{s}] {id}")?;
            }
        }

        f.flush()?;
        Ok(())
    }

    /// Read a model back from a `.model` file.
    ///
    /// Merge ids are reassigned sequentially from 256 in file order, and
    /// the vocabulary is rebuilt. Malformed input is a hard
    /// [`BytepairError::Parse`] failure naming the offending line.
    ///
    /// ## Arguments
    /// * `path` - The `.model` file path.
    ///
    /// ## Returns
    /// The reconstructed model.
    pub fn read_model_file(path: &Path) -> BpResult<Self> {
        let reader = BufReader::new(fs::File::open(path)?);
        let mut lines = reader.lines().enumerate();

        let mut next_line = |expected: &str| -> BpResult<(usize, String)> {
            match lines.next() {
                Some((n, line)) => Ok((n + 1, line?)),
                None => Err(parse_err(0, format!("unexpected end of file: {expected}"))),
            }
        };

        let (n, tag) = next_line("missing format tag")?;
        if tag != MODEL_FORMAT_TAG {
            return Err(parse_err(
                n,
                format!("bad format tag {tag:?}, expected {MODEL_FORMAT_TAG:?}"),
            ));
        }

        let (_, pattern) = next_line("missing split pattern")?;

        let (n, count) = next_line("missing special token count")?;
        let num_specials: usize = count
            .trim()
            .parse()
            .map_err(|_| parse_err(n, format!("bad special token count {count:?}")))?;

        let mut specials: SpecialTokens<T> = SpecialTokens::new();
        for _ in 0..num_specials {
            let (n, line) = next_line("missing special token line")?;
            let fields: Vec<&str> = line.split_whitespace().collect();
            let &[text, id] = fields.as_slice() else {
                return Err(parse_err(n, format!("bad special token line {line:?}")));
            };
            let id: u64 = id
                .parse()
                .map_err(|_| parse_err(n, format!("bad special token id {id:?}")))?;
            let id = T::from_u64(id)
                .ok_or_else(|| parse_err(n, format!("special token id {id} out of range")))?;
            specials.register([(text, id)])?;
        }

        let mut merges: MergeTable<T> = MergeTable::new();
        let mut next_id = BYTE_RANGE;
        for (n, line) in lines {
            let n = n + 1;
            let line = line?;
            let fields: Vec<&str> = line.split_whitespace().collect();
            let &[a, b] = fields.as_slice() else {
                return Err(parse_err(n, format!("bad merge line {line:?}")));
            };
            let a: u64 = a
                .parse()
                .map_err(|_| parse_err(n, format!("bad merge id {a:?}")))?;
            let b: u64 = b
                .parse()
                .map_err(|_| parse_err(n, format!("bad merge id {b:?}")))?;

            let pair = (
                T::from_u64(a).ok_or_else(|| parse_err(n, format!("merge id {a} out of range")))?,
                T::from_u64(b).ok_or_else(|| parse_err(n, format!("merge id {b} out of range")))?,
            );
            let idx = T::from_usize(next_id)
                .ok_or(BytepairError::VocabSizeOverflow { size: next_id + 1 })?;
            merges.push(pair, idx);
            next_id += 1;
        }

        BpeModel::assemble(RegexPattern::from(pattern), merges, specials)
    }
}
