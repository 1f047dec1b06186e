#![deny(clippy::all)]

//! Reference fixtures for cross-implementation tokenizer validation.
//!
//! A known-correct tokenizer is driven over a fixed catalog of inputs and its
//! output is recorded as one JSON document per model: token ids, per-id
//! decoded strings, character offsets as `(start, length)` pairs, and the
//! full decodes with and without special tokens. Another implementation
//! passes when it reproduces every document exactly.

pub mod catalog;
pub mod checks;
mod error;
pub mod fixture;
pub mod hf;
pub mod normalize;
pub mod reference;
pub mod verify;

// Re-export for external use
pub use catalog::{catalog, TestCase};
pub use checks::{check_document, CheckReport, RoundTripDivergence};
pub use error::{FixtureError, Result};
pub use fixture::{read_fixture, render, write_fixture, CaseFlag, FixtureCase, FixtureDocument};
pub use hf::HfReferenceTokenizer;
pub use normalize::{normalize, EncodedResult, FlagSemantics};
pub use reference::{ModelInfo, RawEncoding, ReferenceTokenizer, SpecialToken};
pub use verify::{verify_document, VerifyReport};

/// A generated document together with the outcome of its checks.
#[derive(Debug, Clone)]
pub struct Generated {
    pub document: FixtureDocument,
    pub report: CheckReport,
}

/// Generates checked fixture documents from the case catalog.
///
/// # Example
/// ```ignore
/// use tokenizer_fixtures::{FixtureGenerator, HfReferenceTokenizer};
/// use std::path::Path;
///
/// let generator = FixtureGenerator::new();
/// let generated = generator.generate_with("Qwen/Qwen3-0.6B", || {
///     HfReferenceTokenizer::load_from_dir(Path::new("models/Qwen/Qwen3-0.6B"))
/// })?;
/// tokenizer_fixtures::write_fixture(&generated.document, Path::new("TestData/test_data.json"))?;
/// ```
#[derive(Debug, Clone)]
pub struct FixtureGenerator {
    cases: Vec<TestCase>,
    semantics: FlagSemantics,
}

impl FixtureGenerator {
    /// Generator over the full catalog with the `add_special_tokens` flag.
    pub fn new() -> Self {
        Self {
            cases: catalog(),
            semantics: FlagSemantics::default(),
        }
    }

    pub fn with_semantics(mut self, semantics: FlagSemantics) -> Self {
        self.semantics = semantics;
        self
    }

    /// Replace the catalog, e.g. with a subset for a quick check.
    pub fn with_cases(mut self, cases: Vec<TestCase>) -> Self {
        self.cases = cases;
        self
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn semantics(&self) -> FlagSemantics {
        self.semantics
    }

    /// Generate and check the document for one model.
    ///
    /// Check failures are errors. Round-trip divergences are logged and
    /// returned in the report.
    pub fn generate<T>(&self, model_name: &str, tokenizer: &T) -> Result<Generated>
    where
        T: ReferenceTokenizer + ?Sized,
    {
        let document =
            fixture::generate_document(tokenizer, model_name, &self.cases, self.semantics)?;
        let report = check_document(&document, &tokenizer.special_tokens())?;

        for divergence in &report.divergences {
            tracing::warn!(
                case = %divergence.case,
                expected = ?divergence.expected,
                decoded = ?divergence.decoded,
                "Decoded text differs from input"
            );
        }

        Ok(Generated { document, report })
    }

    /// Load a tokenizer, generate one model's document with it, and drop it
    /// before returning.
    pub fn generate_with<T, F>(&self, model_name: &str, load: F) -> Result<Generated>
    where
        T: ReferenceTokenizer,
        F: FnOnce() -> Result<T>,
    {
        let tokenizer = load()?;
        self.generate(model_name, &tokenizer)
    }
}

impl Default for FixtureGenerator {
    fn default() -> Self {
        Self::new()
    }
}
