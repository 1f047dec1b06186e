//! Fixture documents: assembly, serialization and persistence.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::catalog::TestCase;
use crate::error::{FixtureError, Result};
use crate::normalize::{normalize_with, EncodedResult, FlagSemantics};
use crate::reference::ReferenceTokenizer;

/// All expected results for one model.
///
/// Field order here is the field order on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureDocument {
    pub model_name: String,
    pub vocabulary_size: usize,
    pub eos_token_id: u32,
    pub pad_token_id: Option<u32>,
    pub test_cases: Vec<FixtureCase>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureCase {
    pub name: String,
    pub input: String,
    #[serde(flatten)]
    pub flag: CaseFlag,
    pub expected: EncodedResult,
}

/// The case flag, keyed by its meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseFlag {
    #[serde(rename = "add_special_tokens")]
    AddSpecialTokens(bool),
    #[serde(rename = "add_eos")]
    AddEos(bool),
}

impl CaseFlag {
    pub fn new(semantics: FlagSemantics, value: bool) -> Self {
        match semantics {
            FlagSemantics::AddSpecialTokens => CaseFlag::AddSpecialTokens(value),
            FlagSemantics::LegacyAddEos => CaseFlag::AddEos(value),
        }
    }

    pub fn value(&self) -> bool {
        match *self {
            CaseFlag::AddSpecialTokens(value) | CaseFlag::AddEos(value) => value,
        }
    }

    pub fn semantics(&self) -> FlagSemantics {
        match self {
            CaseFlag::AddSpecialTokens(_) => FlagSemantics::AddSpecialTokens,
            CaseFlag::AddEos(_) => FlagSemantics::LegacyAddEos,
        }
    }
}

impl FixtureDocument {
    pub fn case(&self, name: &str) -> Option<&FixtureCase> {
        self.test_cases.iter().find(|case| case.name == name)
    }
}

/// Run every case through `tokenizer` and assemble the document.
///
/// Fails on the first case the tokenizer cannot handle; nothing partial is
/// returned.
pub fn generate_document<T>(
    tokenizer: &T,
    model_name: &str,
    cases: &[TestCase],
    semantics: FlagSemantics,
) -> Result<FixtureDocument>
where
    T: ReferenceTokenizer + ?Sized,
{
    let info = tokenizer.info();
    let total = cases.len();
    let mut test_cases = Vec::with_capacity(total);

    for (i, case) in cases.iter().enumerate() {
        tracing::debug!("[{}/{}] Processing: {}", i + 1, total, case.name);

        let expected = normalize_with(tokenizer, &case.input, case.add_special_tokens, semantics)
            .map_err(|e| e.in_case(&case.name))?;

        test_cases.push(FixtureCase {
            name: case.name.clone(),
            input: case.input.clone(),
            flag: CaseFlag::new(semantics, case.add_special_tokens),
            expected,
        });
    }

    Ok(FixtureDocument {
        model_name: model_name.to_string(),
        vocabulary_size: info.vocabulary_size,
        eos_token_id: info.eos_token_id,
        pad_token_id: info.pad_token_id,
        test_cases,
    })
}

/// Serialize a document: two-space indented JSON, non-ASCII kept verbatim,
/// no trailing newline.
pub fn render(document: &FixtureDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Write `document` to `path`, replacing whatever is there.
///
/// The previous file stays untouched unless the new one was written in full.
pub fn write_fixture(document: &FixtureDocument, path: &Path) -> Result<()> {
    let contents = render(document)?;
    atomic_write(path, |file| file.write_all(contents.as_bytes()))?;

    tracing::info!(
        "Wrote {} test cases for {} to {}",
        document.test_cases.len(),
        document.model_name,
        path.display()
    );
    Ok(())
}

/// Atomic write using a sibling temp file + rename.
///
/// On any failure the temp file is removed and `path` keeps its old contents.
fn atomic_write<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| FixtureError::io(parent, e))?;

    let mut staged = NamedTempFile::new_in(parent).map_err(|e| FixtureError::io(parent, e))?;
    write(staged.as_file_mut())
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|e| FixtureError::io(staged.path(), e))?;

    staged
        .persist(path)
        .map_err(|e| FixtureError::io(path, e.error))?;
    Ok(())
}

pub fn read_fixture(path: &Path) -> Result<FixtureDocument> {
    let contents = fs::read_to_string(path).map_err(|e| FixtureError::io(path, e))?;
    Ok(serde_json::from_str(&contents)?)
}
