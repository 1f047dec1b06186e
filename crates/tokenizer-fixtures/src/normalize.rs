//! Reshape raw reference tokenizer output into the fixture comparison schema.

use serde::{Deserialize, Serialize};

use crate::error::{FixtureError, Result};
use crate::reference::{RawEncoding, ReferenceTokenizer};

/// Expected tokenizer output for one case, as recorded in the fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedResult {
    pub ids: Vec<u32>,
    /// Each id decoded on its own.
    pub tokens: Vec<String>,
    /// `(start, length)` in characters, one per id.
    pub offsets: Vec<(usize, usize)>,
    pub decoded: String,
    #[serde(rename = "decoded_skip_special_tokens")]
    pub decoded_skip_special: String,
    pub token_count: usize,
}

/// What the boolean flag on a case means.
///
/// `AddSpecialTokens` is the current contract. `LegacyAddEos` is the earlier
/// meaning, where the flag appended the EOS id to an encoding made without
/// special tokens. Documents recorded that way can still be verified, and the
/// current catalog can be recorded that way, but earlier fixture sets are not
/// reproduced since their case lists differed. The two are never mixed within
/// one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlagSemantics {
    #[default]
    AddSpecialTokens,
    LegacyAddEos,
}

/// Encode `text` with the reference tokenizer and normalize the result.
pub fn normalize<T>(tokenizer: &T, text: &str, add_special_tokens: bool) -> Result<EncodedResult>
where
    T: ReferenceTokenizer + ?Sized,
{
    let raw = tokenizer.encode(text, add_special_tokens)?;
    finish(tokenizer, raw)
}

/// Like [`normalize`], with the flag interpreted per `semantics`.
pub fn normalize_with<T>(
    tokenizer: &T,
    text: &str,
    flag: bool,
    semantics: FlagSemantics,
) -> Result<EncodedResult>
where
    T: ReferenceTokenizer + ?Sized,
{
    match semantics {
        FlagSemantics::AddSpecialTokens => normalize(tokenizer, text, flag),
        FlagSemantics::LegacyAddEos => {
            let mut raw = tokenizer.encode(text, false)?;
            if flag {
                let end = text.chars().count();
                raw.ids.push(tokenizer.info().eos_token_id);
                raw.offsets.push((end, end));
            }
            finish(tokenizer, raw)
        }
    }
}

fn finish<T>(tokenizer: &T, raw: RawEncoding) -> Result<EncodedResult>
where
    T: ReferenceTokenizer + ?Sized,
{
    let RawEncoding { ids, offsets } = raw;

    // One decode per id so context-dependent pieces show up as-is.
    let tokens = ids
        .iter()
        .map(|&id| tokenizer.decode_one(id))
        .collect::<Result<Vec<_>>>()?;

    let offsets = offsets
        .into_iter()
        .map(|(start, end)| match end.checked_sub(start) {
            Some(length) => Ok((start, length)),
            None => Err(FixtureError::Tokenizer(format!(
                "Inverted offset span ({}, {})",
                start, end
            ))),
        })
        .collect::<Result<Vec<_>>>()?;

    let decoded = tokenizer.decode_many(&ids, false)?;
    let decoded_skip_special = tokenizer.decode_many(&ids, true)?;
    let token_count = ids.len();

    Ok(EncodedResult {
        ids,
        tokens,
        offsets,
        decoded,
        decoded_skip_special,
        token_count,
    })
}
