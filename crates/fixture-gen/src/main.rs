//! fixture-gen: Record reference tokenizer fixtures.
//!
//! Runs every catalog case through a Hugging Face tokenizer and writes one
//! JSON fixture per model. Other tokenizer implementations replay these
//! fixtures to prove they match the reference exactly.

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use tokenizer_fixtures::{
    read_fixture, verify_document, write_fixture, FixtureGenerator, FlagSemantics,
    HfReferenceTokenizer,
};

use crate::config::{model_dir, Config, SINGLE_MODEL_FILE};

#[derive(Parser, Debug)]
#[command(name = "fixture-gen")]
#[command(about = "Generate reference tokenizer fixtures")]
struct Cli {
    /// Directory containing <org>/<model>/tokenizer.json
    #[arg(long, global = true, default_value = "models", env = "FIXTURE_MODELS_DIR")]
    models_dir: PathBuf,

    /// Directory fixtures are written to
    #[arg(long, global = true, default_value = "TestData", env = "FIXTURE_OUTPUT_DIR")]
    output_dir: PathBuf,

    /// JSON config file overriding the default model list
    #[arg(long, global = true, env = "FIXTURE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate fixtures for one model, or for every configured model
    Generate {
        /// Model to generate; all configured models when omitted
        model: Option<String>,

        /// Output path in single-model mode
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Record the flag as the legacy append-EOS switch (`add_eos`)
        #[arg(long)]
        legacy_add_eos: bool,
    },

    /// Re-run a fixture through the reference tokenizer and report differences
    Verify {
        /// Fixture file to check
        fixture: PathBuf,

        /// Model to load instead of the fixture's model_name
        #[arg(long)]
        model: Option<String>,
    },

    /// Print the case catalog
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging - respects RUST_LOG env var, defaults to info (or debug with --verbose)
    let default_filter = if cli.verbose {
        "debug,tokenizer_fixtures=debug"
    } else {
        "info,tokenizer_fixtures=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Command::Generate {
            ref model,
            ref output,
            legacy_add_eos,
        } => {
            let semantics = if legacy_add_eos {
                FlagSemantics::LegacyAddEos
            } else {
                FlagSemantics::AddSpecialTokens
            };
            let jobs: Vec<(String, PathBuf)> = match model {
                Some(model) => {
                    let path = output
                        .clone()
                        .unwrap_or_else(|| cli.output_dir.join(SINGLE_MODEL_FILE));
                    vec![(model.clone(), path)]
                }
                None => Config::load(cli.config.as_deref())?
                    .models
                    .iter()
                    .map(|target| (target.name.clone(), target.output_path(&cli.output_dir)))
                    .collect(),
            };
            generate(&cli, &jobs, semantics)
        }
        Command::Verify {
            ref fixture,
            ref model,
        } => verify(&cli, fixture, model.as_deref()),
        Command::List => {
            list();
            Ok(())
        }
    }
}

/// Generate every (model, output path) job in order, stopping at the first
/// failure.
fn generate(cli: &Cli, jobs: &[(String, PathBuf)], semantics: FlagSemantics) -> Result<()> {
    let generator = FixtureGenerator::new().with_semantics(semantics);
    info!(
        "Generating {} test cases for {} model(s)",
        generator.cases().len(),
        jobs.len()
    );
    if semantics == FlagSemantics::LegacyAddEos {
        warn!("Recording legacy add_eos fixtures; the flag appends EOS instead of adding special tokens");
    }

    for (model, output) in jobs {
        generate_model(cli, &generator, model, output)
            .with_context(|| format!("Failed to generate fixture for {}", model))?;
    }

    info!("All fixtures generated successfully");
    Ok(())
}

/// One model's pass: the tokenizer is loaded here and dropped before the
/// next model starts.
fn generate_model(cli: &Cli, generator: &FixtureGenerator, model: &str, output: &Path) -> Result<()> {
    let dir = model_dir(&cli.models_dir, model);
    info!("Loading tokenizer for {} from {}", model, dir.display());

    let generated = generator.generate_with(model, || HfReferenceTokenizer::load_from_dir(&dir))?;

    let document = &generated.document;
    info!(
        "  Vocabulary size: {}, EOS token ID: {}, PAD token ID: {:?}",
        document.vocabulary_size, document.eos_token_id, document.pad_token_id
    );
    debug!(
        cases = generated.report.cases_checked,
        sibling_pairs = generated.report.sibling_pairs_checked,
        divergences = generated.report.divergences.len(),
        "Fixture checks passed"
    );

    write_fixture(document, output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}

fn verify(cli: &Cli, fixture: &Path, model: Option<&str>) -> Result<()> {
    let document = read_fixture(fixture)
        .with_context(|| format!("Failed to load fixture {}", fixture.display()))?;
    let model = model.unwrap_or(&document.model_name);

    let dir = model_dir(&cli.models_dir, model);
    info!("Verifying {} against {}", fixture.display(), dir.display());

    let tokenizer = HfReferenceTokenizer::load_from_dir(&dir)
        .with_context(|| format!("Failed to load tokenizer for {}", model))?;
    let report = verify_document(&tokenizer, &document)?;

    for line in &report.metadata {
        warn!("Metadata mismatch: {}", line);
    }
    for mismatch in &report.mismatches {
        let fields: Vec<String> = mismatch.fields.iter().map(|f| f.to_string()).collect();
        warn!("Case {} differs in: {}", mismatch.case, fields.join(", "));
    }

    if !report.is_clean() {
        anyhow::bail!(
            "{} of {} cases differ ({} metadata mismatches)",
            report.mismatches.len(),
            report.cases_compared,
            report.metadata.len()
        );
    }

    info!("All {} cases match", report.cases_compared);
    Ok(())
}

fn list() {
    for case in FixtureGenerator::new().cases() {
        println!(
            "{:<36} {:<5} {}",
            case.name,
            case.add_special_tokens,
            preview(&case.input, 48)
        );
    }
}

/// Debug-escaped input, cut to `max_chars` characters.
fn preview(input: &str, max_chars: usize) -> String {
    let escaped = format!("{:?}", input);
    if escaped.chars().count() <= max_chars {
        return escaped;
    }
    let mut cut: String = escaped.chars().take(max_chars).collect();
    cut.push('…');
    cut
}
