#![allow(dead_code)]

use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};
use tokenizer_fixtures::catalog::SPECIAL_MARKERS;
use tokenizer_fixtures::HfReferenceTokenizer;
use tokenizers::pre_tokenizers::byte_level::ByteLevel;

pub const UNK: u32 = 0;
pub const ENDOFTEXT: u32 = 1;
pub const IM_START: u32 = 2;
pub const IM_END: u32 = 3;
pub const THINK: u32 = 4;
pub const HELLO: u32 = 6;
pub const WORLD: u32 = 7;
pub const A: u32 = 8;
pub const BANG: u32 = 9;
pub const USER: u32 = 10;
pub const NI_HAO: u32 = 11;

/// Word-level tokenizer with Qwen-style markers. `<|endoftext|>`,
/// `<|im_start|>` and `<|im_end|>` are special; `<think>`/`</think>` are
/// plain added tokens. The post-processor appends `<|im_end|>` when special
/// tokens are requested.
pub const TOKENIZER_JSON: &str = r#"{
  "version": "1.0",
  "truncation": null,
  "padding": null,
  "added_tokens": [
    {"id": 1, "content": "<|endoftext|>", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
    {"id": 2, "content": "<|im_start|>", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
    {"id": 3, "content": "<|im_end|>", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
    {"id": 4, "content": "<think>", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": false},
    {"id": 5, "content": "</think>", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": false}
  ],
  "normalizer": null,
  "pre_tokenizer": {"type": "Whitespace"},
  "post_processor": {
    "type": "TemplateProcessing",
    "single": [
      {"Sequence": {"id": "A", "type_id": 0}},
      {"SpecialToken": {"id": "<|im_end|>", "type_id": 0}}
    ],
    "pair": [
      {"Sequence": {"id": "A", "type_id": 0}},
      {"Sequence": {"id": "B", "type_id": 1}},
      {"SpecialToken": {"id": "<|im_end|>", "type_id": 1}}
    ],
    "special_tokens": {
      "<|im_end|>": {"id": "<|im_end|>", "ids": [3], "tokens": ["<|im_end|>"]}
    }
  },
  "decoder": null,
  "model": {
    "type": "WordLevel",
    "vocab": {
      "[UNK]": 0,
      "<|endoftext|>": 1,
      "<|im_start|>": 2,
      "<|im_end|>": 3,
      "<think>": 4,
      "</think>": 5,
      "hello": 6,
      "world": 7,
      "a": 8,
      "!": 9,
      "user": 10,
      "你好": 11
    },
    "unk_token": "[UNK]"
  }
}"#;

pub const TOKENIZER_CONFIG_JSON: &str = r#"{
  "eos_token": "<|im_end|>",
  "pad_token": "<|endoftext|>",
  "model_max_length": 512
}"#;

// Shared tokenizer instance built once for all tests
pub static REFERENCE: Lazy<HfReferenceTokenizer> = Lazy::new(|| {
    HfReferenceTokenizer::from_parts(TOKENIZER_JSON.as_bytes(), Some(TOKENIZER_CONFIG_JSON))
        .expect("Failed to build test tokenizer")
});

/// Number of leading `SPECIAL_MARKERS` flagged special, as in Qwen3.
pub const FLAGGED_SPECIAL: usize = 14;

/// Byte-level BPE with no merges: every byte of the input is its own token,
/// so multi-byte characters split across several ids. NFC normalizer and the
/// Qwen3 markers as added tokens.
pub fn byte_level_tokenizer_json() -> String {
    let mut alphabet: Vec<char> = ByteLevel::alphabet().into_iter().collect();
    alphabet.sort_unstable();

    let mut vocab = Map::new();
    for (id, c) in alphabet.iter().enumerate() {
        vocab.insert(c.to_string(), json!(id));
    }

    let mut added_tokens: Vec<Value> = Vec::new();
    for (i, marker) in SPECIAL_MARKERS.iter().enumerate() {
        let id = alphabet.len() + i;
        vocab.insert(marker.to_string(), json!(id));
        added_tokens.push(json!({
            "id": id,
            "content": marker,
            "single_word": false,
            "lstrip": false,
            "rstrip": false,
            "normalized": false,
            "special": i < FLAGGED_SPECIAL
        }));
    }

    json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": added_tokens,
        "normalizer": {"type": "NFC"},
        "pre_tokenizer": {
            "type": "ByteLevel",
            "add_prefix_space": false,
            "trim_offsets": false,
            "use_regex": true
        },
        "post_processor": null,
        "decoder": {
            "type": "ByteLevel",
            "add_prefix_space": false,
            "trim_offsets": false,
            "use_regex": true
        },
        "model": {
            "type": "BPE",
            "dropout": null,
            "unk_token": null,
            "continuing_subword_prefix": null,
            "end_of_word_suffix": null,
            "fuse_unk": false,
            "byte_fallback": false,
            "ignore_merges": false,
            "vocab": vocab,
            "merges": []
        }
    })
    .to_string()
}

pub static BYTE_LEVEL: Lazy<HfReferenceTokenizer> = Lazy::new(|| {
    HfReferenceTokenizer::from_parts(
        byte_level_tokenizer_json().as_bytes(),
        Some(TOKENIZER_CONFIG_JSON),
    )
    .expect("Failed to build byte-level test tokenizer")
});
