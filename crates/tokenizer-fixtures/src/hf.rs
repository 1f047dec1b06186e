//! Reference tokenizer backed by the Hugging Face `tokenizers` crate.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tokenizers::Tokenizer;

use crate::error::{FixtureError, Result};
use crate::reference::{ModelInfo, RawEncoding, ReferenceTokenizer, SpecialToken};

pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const TOKENIZER_CONFIG_FILE: &str = "tokenizer_config.json";

/// The subset of `tokenizer_config.json` needed for fixture metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenizerConfig {
    #[serde(default)]
    pub eos_token: Option<TokenSpec>,
    #[serde(default)]
    pub pad_token: Option<TokenSpec>,
}

/// A token reference as written in `tokenizer_config.json`: either the bare
/// content string or an added-token object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TokenSpec {
    Content(String),
    Added { content: String },
}

impl TokenSpec {
    pub fn content(&self) -> &str {
        match self {
            TokenSpec::Content(content) => content,
            TokenSpec::Added { content } => content,
        }
    }
}

/// Hugging Face tokenizer plus the metadata resolved from its config.
pub struct HfReferenceTokenizer {
    tokenizer: Tokenizer,
    info: ModelInfo,
}

impl HfReferenceTokenizer {
    /// Load from a directory containing `tokenizer.json` and
    /// `tokenizer_config.json`.
    ///
    /// A missing config file is treated as empty, which fails later because
    /// the EOS token cannot be resolved.
    pub fn load_from_dir(model_dir: &Path) -> Result<Self> {
        let tokenizer_path = model_dir.join(TOKENIZER_FILE);
        let config_path = model_dir.join(TOKENIZER_CONFIG_FILE);

        let tokenizer_json =
            fs::read(&tokenizer_path).map_err(|e| FixtureError::io(&tokenizer_path, e))?;

        let config_json = if config_path.exists() {
            Some(fs::read_to_string(&config_path).map_err(|e| FixtureError::io(&config_path, e))?)
        } else {
            tracing::warn!("No {} in {}", TOKENIZER_CONFIG_FILE, model_dir.display());
            None
        };

        Self::from_parts(&tokenizer_json, config_json.as_deref())
    }

    /// Build from in-memory `tokenizer.json` bytes and optional
    /// `tokenizer_config.json` text.
    pub fn from_parts(tokenizer_json: &[u8], config_json: Option<&str>) -> Result<Self> {
        let tokenizer = Tokenizer::from_bytes(tokenizer_json)
            .map_err(|e| FixtureError::Tokenizer(format!("Failed to load tokenizer: {}", e)))?;

        let config: TokenizerConfig = match config_json {
            Some(json) => serde_json::from_str(json)?,
            None => TokenizerConfig::default(),
        };

        Self::with_config(tokenizer, &config)
    }

    pub fn with_config(tokenizer: Tokenizer, config: &TokenizerConfig) -> Result<Self> {
        let eos = config
            .eos_token
            .as_ref()
            .ok_or(FixtureError::Unconfigured("eos_token"))?;
        let eos_token_id = resolve(&tokenizer, "eos_token", eos)?;

        let pad_token_id = config
            .pad_token
            .as_ref()
            .map(|pad| resolve(&tokenizer, "pad_token", pad))
            .transpose()?;

        let info = ModelInfo {
            vocabulary_size: tokenizer.get_vocab_size(true),
            eos_token_id,
            pad_token_id,
        };

        tracing::debug!(
            vocabulary_size = info.vocabulary_size,
            eos_token_id = info.eos_token_id,
            pad_token_id = ?info.pad_token_id,
            "Loaded reference tokenizer"
        );

        Ok(Self { tokenizer, info })
    }
}

fn resolve(tokenizer: &Tokenizer, role: &'static str, spec: &TokenSpec) -> Result<u32> {
    tokenizer
        .token_to_id(spec.content())
        .ok_or_else(|| FixtureError::MissingToken {
            role,
            token: spec.content().to_string(),
        })
}

impl ReferenceTokenizer for HfReferenceTokenizer {
    fn info(&self) -> ModelInfo {
        self.info
    }

    fn encode(&self, text: &str, add_special_tokens: bool) -> Result<RawEncoding> {
        // Character offsets, not byte offsets: fixtures index the input by
        // Unicode scalar value.
        let encoding = self
            .tokenizer
            .encode_char_offsets(text, add_special_tokens)
            .map_err(|e| FixtureError::Tokenizer(format!("Tokenization failed: {}", e)))?;

        Ok(RawEncoding {
            ids: encoding.get_ids().to_vec(),
            offsets: encoding.get_offsets().to_vec(),
        })
    }

    fn decode_one(&self, id: u32) -> Result<String> {
        self.tokenizer
            .decode(&[id], false)
            .map_err(|e| FixtureError::Tokenizer(format!("Failed to decode id {}: {}", id, e)))
    }

    fn decode_many(&self, ids: &[u32], skip_special_tokens: bool) -> Result<String> {
        self.tokenizer
            .decode(ids, skip_special_tokens)
            .map_err(|e| FixtureError::Tokenizer(format!("Decoding failed: {}", e)))
    }

    fn special_tokens(&self) -> Vec<SpecialToken> {
        let mut tokens: Vec<SpecialToken> = self
            .tokenizer
            .get_added_tokens_decoder()
            .into_iter()
            .filter(|(_, token)| token.special)
            .map(|(id, token)| SpecialToken {
                id,
                content: token.content,
            })
            .collect();
        tokens.sort_by_key(|token| token.id);
        tokens
    }
}
