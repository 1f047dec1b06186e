//! The reference tokenizer seam.
//!
//! Fixture generation only ever talks to a tokenizer through
//! [`ReferenceTokenizer`]; the Hugging Face backed implementation lives in
//! [`crate::hf`].

use crate::error::Result;

/// Per-model metadata recorded at the top of every fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelInfo {
    /// Vocabulary size including added tokens.
    pub vocabulary_size: usize,
    pub eos_token_id: u32,
    pub pad_token_id: Option<u32>,
}

/// Raw encoder output before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEncoding {
    pub ids: Vec<u32>,
    /// Absolute `[start, end)` spans in characters of the input, one per id.
    pub offsets: Vec<(usize, usize)>,
}

/// An added token the tokenizer treats as special.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialToken {
    pub id: u32,
    pub content: String,
}

/// A known-correct tokenizer that fixtures are recorded from.
pub trait ReferenceTokenizer {
    fn info(&self) -> ModelInfo;

    /// Encode `text`. Special-token markers in the text are always
    /// recognized; `add_special_tokens` only controls the tokens the
    /// tokenizer inserts around the sequence.
    fn encode(&self, text: &str, add_special_tokens: bool) -> Result<RawEncoding>;

    /// Decode a single id in isolation.
    fn decode_one(&self, id: u32) -> Result<String>;

    fn decode_many(&self, ids: &[u32], skip_special_tokens: bool) -> Result<String>;

    /// Added tokens flagged special, i.e. the ones `skip_special_tokens` drops.
    fn special_tokens(&self) -> Vec<SpecialToken>;
}
