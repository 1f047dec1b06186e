//! The fixed catalog of fixture cases.
//!
//! Every entry is emitted twice, in order: once with `add_special_tokens`
//! enabled under its own name, then immediately after with the flag disabled
//! under `<name>_no_special`. Consumers join on `name`; the order is stable so
//! regenerated fixtures diff cleanly.

use serde::{Deserialize, Serialize};

/// Suffix appended to the name of the `add_special_tokens = false` sibling.
pub const SIBLING_SUFFIX: &str = "_no_special";

/// Every added-token marker of the Qwen3 family, in vocabulary order.
///
/// The first fourteen are flagged special; the tool-call, FIM, repo and think
/// markers are added tokens that survive `skip_special_tokens`.
pub const SPECIAL_MARKERS: &[&str] = &[
    "<|endoftext|>",
    "<|im_start|>",
    "<|im_end|>",
    "<|object_ref_start|>",
    "<|object_ref_end|>",
    "<|box_start|>",
    "<|box_end|>",
    "<|quad_start|>",
    "<|quad_end|>",
    "<|vision_start|>",
    "<|vision_end|>",
    "<|vision_pad|>",
    "<|image_pad|>",
    "<|video_pad|>",
    "<tool_call>",
    "</tool_call>",
    "<|fim_prefix|>",
    "<|fim_middle|>",
    "<|fim_suffix|>",
    "<|fim_pad|>",
    "<|repo_name|>",
    "<|file_sep|>",
    "<tool_response>",
    "</tool_response>",
    "<think>",
    "</think>",
];

/// A single fixture case: one input run through the reference tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub input: String,
    pub add_special_tokens: bool,
}

/// How a catalog entry's input text is produced.
#[derive(Debug, Clone, Copy)]
pub enum CaseInput {
    Literal(&'static str),
    /// `text` repeated `count` times.
    Repeated(&'static str, usize),
    /// All parts joined with no separator.
    Concat(&'static [&'static str]),
}

impl CaseInput {
    pub fn render(&self) -> String {
        match *self {
            CaseInput::Literal(text) => text.to_string(),
            CaseInput::Repeated(text, count) => text.repeat(count),
            CaseInput::Concat(parts) => parts.concat(),
        }
    }
}

/// A named input in the catalog table.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub input: CaseInput,
}

const fn lit(name: &'static str, text: &'static str) -> CatalogEntry {
    CatalogEntry {
        name,
        input: CaseInput::Literal(text),
    }
}

const fn repeated(name: &'static str, text: &'static str, count: usize) -> CatalogEntry {
    CatalogEntry {
        name,
        input: CaseInput::Repeated(text, count),
    }
}

pub const ENTRIES: &[CatalogEntry] = &[
    // Empty and whitespace-only
    lit("empty_string", ""),
    lit("single_space", " "),
    lit("multiple_spaces", "   "),
    lit("whitespace_only_mixed", " \t\n\r\n \t"),
    lit("newlines", "Line 1\nLine 2\nLine 3"),
    lit("tabs", "Column1\tColumn2\tColumn3"),
    lit("mixed_whitespace", "Text\n\twith\r\nmixed\t\nwhitespace"),
    // Prose, punctuation and case
    lit("basic_english", "Hello, this is a test of the Qwen3 tokenizer!"),
    lit("simple_sentence", "The quick brown fox jumps over the lazy dog."),
    lit("single_char_a", "a"),
    lit("punctuation", "Hello! How are you? I'm fine, thanks."),
    lit("special_chars", "@#$%^&*()_+-=[]{}|;:',.<>?/~`"),
    lit("uppercase", "HELLO WORLD"),
    lit("lowercase", "hello world"),
    lit("mixed_case", "HeLLo WoRLd"),
    // Numbers and alphanumerics
    lit("numbers", "12345 67890"),
    lit("mixed_numbers_text", "I have 42 apples and 100 oranges."),
    lit("alphanumeric_identifiers", "abc123 x86_64 v2.0.1 3rd 1st-class"),
    lit("url", "Visit https://example.com for more info"),
    lit("email", "Contact us at test@example.com"),
    // Multi-byte scripts
    lit("mixed_unicode", "Café résumé naïve"),
    lit("accented_latin", "Ångström, façade, crème brûlée, Zoë, São Paulo"),
    lit("chinese_simple", "你好世界"),
    lit("chinese_sentence", "这是一个测试句子。"),
    lit("japanese_hiragana", "こんにちは"),
    lit("japanese_katakana", "カタカナのテスト"),
    lit("japanese_mixed", "こんにちは世界 Hello World"),
    lit("mixed_english_chinese", "Hello 你好 World 世界"),
    lit("emojis", "Hello 👋 World 🌍! Happy 😊"),
    lit("emoji_sequences", "Family 👨‍👩‍👧‍👦 flag 🇯🇵 thumbs 👍🏽 heart ❤️"),
    // Code-like text
    lit("code_python", "def hello():\n    print('Hello, World!')"),
    lit("code_json", r#"{"name": "test", "value": 123}"#),
    lit(
        "code_rust",
        "fn main() {\n    let greeting = \"hi\";\n    println!(\"{greeting}\");\n}",
    ),
    // Repetition
    lit("repeated_chars", "aaaaaa bbbbbb cccccc"),
    repeated(
        "long_text",
        "The Qwen3 tokenizer is designed for Qwen3-Embedding models. ",
        10,
    ),
    repeated("long_repeated_pair", "ab", 500),
    // Special markers
    lit("special_token_only", "<|endoftext|>"),
    lit("special_token_im_start", "<|im_start|>user\nHello!<|im_end|>"),
    lit("special_token_endoftext", "Text before<|endoftext|>Text after"),
    lit(
        "multiple_special_tokens",
        "<|im_start|>system\nYou are helpful<|im_end|><|im_start|>user\nHi<|im_end|>",
    ),
    lit(
        "special_token_lookalikes",
        "<|im_start>user <im_end|> <|not_a_token|> |endoftext| < |endoftext| >",
    ),
    lit("think_markers", "<think>\nreasoning\n</think>\n\nanswer"),
    CatalogEntry {
        name: "all_special_tokens",
        input: CaseInput::Concat(SPECIAL_MARKERS),
    },
];

/// Expand the catalog table into the ordered list of fixture cases.
pub fn catalog() -> Vec<TestCase> {
    let mut cases = Vec::with_capacity(ENTRIES.len() * 2);
    for entry in ENTRIES {
        let input = entry.input.render();
        cases.push(TestCase {
            name: entry.name.to_string(),
            input: input.clone(),
            add_special_tokens: true,
        });
        cases.push(TestCase {
            name: sibling_name(entry.name),
            input,
            add_special_tokens: false,
        });
    }
    cases
}

/// Name of the `add_special_tokens = false` sibling of `name`.
pub fn sibling_name(name: &str) -> String {
    format!("{}{}", name, SIBLING_SUFFIX)
}

/// Pair each flag-enabled case with its flag-disabled sibling.
///
/// Cases without a sibling are left out.
pub fn sibling_pairs<'a, T, F>(cases: &'a [T], key: F) -> Vec<(&'a T, &'a T)>
where
    F: Fn(&T) -> (&str, bool),
{
    cases
        .iter()
        .filter(|case| key(*case).1)
        .filter_map(|with_flag| {
            let wanted = sibling_name(key(with_flag).0);
            cases
                .iter()
                .find(|other| {
                    let (name, flag) = key(*other);
                    !flag && name == wanted
                })
                .map(|without_flag| (with_flag, without_flag))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_names_unique() {
        let cases = catalog();
        let names: HashSet<_> = cases.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names.len(), cases.len(), "Case names must be unique");
    }

    #[test]
    fn test_catalog_is_deterministic() {
        assert_eq!(catalog(), catalog());
    }

    #[test]
    fn test_every_flagged_case_has_adjacent_sibling() {
        let cases = catalog();
        assert_eq!(cases.len(), ENTRIES.len() * 2);

        for pair in cases.chunks(2) {
            let (with_flag, without_flag) = (&pair[0], &pair[1]);
            assert!(with_flag.add_special_tokens);
            assert!(!without_flag.add_special_tokens);
            assert_eq!(with_flag.input, without_flag.input);
            assert_eq!(without_flag.name, sibling_name(&with_flag.name));
        }
    }

    #[test]
    fn test_sibling_pairs_covers_catalog() {
        let cases = catalog();
        let pairs = sibling_pairs(&cases, |c| (c.name.as_str(), c.add_special_tokens));
        assert_eq!(pairs.len(), ENTRIES.len());
    }

    #[test]
    fn test_required_categories_present() {
        let cases = catalog();
        let input_of = |name: &str| {
            cases
                .iter()
                .find(|c| c.name == name)
                .map(|c| c.input.clone())
                .unwrap_or_else(|| panic!("Missing case {}", name))
        };

        assert_eq!(input_of("empty_string"), "");
        assert_eq!(input_of("single_space"), " ");
        assert!(input_of("mixed_whitespace").contains("\r\n"));
        assert!(input_of("emoji_sequences").contains('\u{200D}'), "Needs a ZWJ sequence");
        assert!(input_of("japanese_katakana").chars().all(|c| !c.is_ascii()));
        assert!(input_of("code_json").contains('{'));
        assert!(input_of("long_text").len() > 500);
        assert_eq!(input_of("special_token_only"), "<|endoftext|>");
    }

    #[test]
    fn test_lookalikes_contain_no_real_marker() {
        let input = catalog()
            .into_iter()
            .find(|c| c.name == "special_token_lookalikes")
            .unwrap()
            .input;
        for marker in SPECIAL_MARKERS {
            assert!(!input.contains(marker), "Lookalike case contains {}", marker);
        }
    }

    #[test]
    fn test_all_special_tokens_concatenates_markers() {
        let input = CaseInput::Concat(SPECIAL_MARKERS).render();
        assert!(input.starts_with("<|endoftext|><|im_start|>"));
        assert!(input.ends_with("<think></think>"));
        assert_eq!(input.len(), SPECIAL_MARKERS.iter().map(|m| m.len()).sum::<usize>());
    }

    #[test]
    fn test_repeated_input_renders() {
        assert_eq!(CaseInput::Repeated("ab", 3).render(), "ababab");
    }
}
