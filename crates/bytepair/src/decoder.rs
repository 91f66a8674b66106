//! # Decoder
//!
//! Id-to-text resolution over the derived vocabulary and the
//! special-token reverse map.

use crate::errors::{BpResult, BytepairError};
use crate::tokenizer::BpeModel;
use crate::types::TokenType;

impl<T: TokenType> BpeModel<T> {
    /// Decode an id sequence back to text.
    ///
    /// Each id resolves through the vocabulary, then through the
    /// special-token reverse map; an id in neither is
    /// [`BytepairError::InvalidToken`]. The concatenated bytes decode as
    /// UTF-8 with lossy replacement: merges can legitimately split
    /// multi-byte characters across token boundaries, so invalid
    /// subsequences get the replacement character rather than an error.
    ///
    /// ## Arguments
    /// * `ids` - The id sequence to decode.
    ///
    /// ## Returns
    /// The decoded string.
    pub fn decode(
        &self,
        ids: &[T],
    ) -> BpResult<String> {
        let mut bytes: Vec<u8> = Vec::with_capacity(ids.len() * 2);

        for id in ids {
            if let Some(word) = self.vocab.get(id) {
                bytes.extend_from_slice(word);
            } else if let Some(text) = self.specials.text_for(id) {
                bytes.extend_from_slice(text.as_bytes());
            } else {
                return Err(BytepairError::InvalidToken(id.to_string()));
            }
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
