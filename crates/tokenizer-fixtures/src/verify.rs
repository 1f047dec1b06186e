//! Replay an existing fixture against a reference tokenizer.

use std::fmt;

use crate::error::Result;
use crate::fixture::FixtureDocument;
use crate::normalize::{normalize_with, EncodedResult};
use crate::reference::ReferenceTokenizer;

/// A field of [`EncodedResult`] that can disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Ids,
    Tokens,
    Offsets,
    Decoded,
    DecodedSkipSpecial,
    TokenCount,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Ids => "ids",
            Field::Tokens => "tokens",
            Field::Offsets => "offsets",
            Field::Decoded => "decoded",
            Field::DecodedSkipSpecial => "decoded_skip_special_tokens",
            Field::TokenCount => "token_count",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseMismatch {
    pub case: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub cases_compared: usize,
    /// Descriptions of differing document-level metadata.
    pub metadata: Vec<String>,
    pub mismatches: Vec<CaseMismatch>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.metadata.is_empty() && self.mismatches.is_empty()
    }
}

/// Fields that differ between a recorded and a regenerated result.
pub fn diff_results(recorded: &EncodedResult, actual: &EncodedResult) -> Vec<Field> {
    let mut fields = Vec::new();
    if recorded.ids != actual.ids {
        fields.push(Field::Ids);
    }
    if recorded.tokens != actual.tokens {
        fields.push(Field::Tokens);
    }
    if recorded.offsets != actual.offsets {
        fields.push(Field::Offsets);
    }
    if recorded.decoded != actual.decoded {
        fields.push(Field::Decoded);
    }
    if recorded.decoded_skip_special != actual.decoded_skip_special {
        fields.push(Field::DecodedSkipSpecial);
    }
    if recorded.token_count != actual.token_count {
        fields.push(Field::TokenCount);
    }
    fields
}

/// Re-run every recorded case through `tokenizer` and report differences.
///
/// Tokenizer failures still abort; only output differences are collected.
pub fn verify_document<T>(tokenizer: &T, document: &FixtureDocument) -> Result<VerifyReport>
where
    T: ReferenceTokenizer + ?Sized,
{
    let info = tokenizer.info();
    let mut report = VerifyReport::default();

    if document.vocabulary_size != info.vocabulary_size {
        report.metadata.push(format!(
            "vocabulary_size: recorded {}, actual {}",
            document.vocabulary_size, info.vocabulary_size
        ));
    }
    if document.eos_token_id != info.eos_token_id {
        report.metadata.push(format!(
            "eos_token_id: recorded {}, actual {}",
            document.eos_token_id, info.eos_token_id
        ));
    }
    if document.pad_token_id != info.pad_token_id {
        report.metadata.push(format!(
            "pad_token_id: recorded {:?}, actual {:?}",
            document.pad_token_id, info.pad_token_id
        ));
    }

    for case in &document.test_cases {
        let actual = normalize_with(
            tokenizer,
            &case.input,
            case.flag.value(),
            case.flag.semantics(),
        )
        .map_err(|e| e.in_case(&case.name))?;

        let fields = diff_results(&case.expected, &actual);
        if !fields.is_empty() {
            tracing::debug!("Mismatch in {}: {:?}", case.name, fields);
            report.mismatches.push(CaseMismatch {
                case: case.name.clone(),
                fields,
            });
        }
        report.cases_compared += 1;
    }

    Ok(report)
}
