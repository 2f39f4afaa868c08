//! Lexiphone CLI: English text to phonemes.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use lexiphone_core::language::fallback::FallbackKind;
use lexiphone_core::language::lexicon::Lexicon;
use lexiphone_core::{G2p, G2pConfig};

// ─── Top-level CLI ───────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "lexiphone",
    about = "Dictionary-driven English grapheme-to-phoneme converter",
    version,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert text to a phoneme string
    Phonemize(PhonemizeArgs),
    /// Load and validate a lexicon directory
    CheckLexicon(CheckLexiconArgs),
}

// ─── Phonemize ───────────────────────────────────────────────────

#[derive(Parser, Debug)]
struct PhonemizeArgs {
    /// Text to convert (read from stdin when empty and no --file)
    text: Vec<String>,

    /// Read text from a file, one phoneme line per input line
    #[arg(long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Use the British dialect
    #[arg(long, default_value_t = false)]
    british: bool,

    /// Directory holding {us,gb}_{gold,silver}.json
    #[arg(long)]
    lexicon_dir: Option<PathBuf>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fallback for words missing from the lexicon
    #[arg(long, value_parser = ["none", "espeak", "auto"])]
    fallback: Option<String>,

    /// Also print resolved tokens as JSON
    #[arg(long, default_value_t = false)]
    tokens: bool,

    /// Show verbose output
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

// ─── Check lexicon ───────────────────────────────────────────────

#[derive(Parser, Debug)]
struct CheckLexiconArgs {
    /// Directory holding {us,gb}_{gold,silver}.json
    #[arg(long)]
    lexicon_dir: PathBuf,

    /// Check the British files
    #[arg(long, default_value_t = false)]
    british: bool,

    /// Show verbose output
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // Init logging
    let log_level = match &cli.command {
        Command::Phonemize(a) if a.verbose => "debug",
        Command::CheckLexicon(a) if a.verbose => "debug",
        _ => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Command::Phonemize(args) => run_phonemize(args),
        Command::CheckLexicon(args) => run_check_lexicon(args),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

// ─── Helpers ─────────────────────────────────────────────────────

/// Merge the config file, environment and command-line flags.
fn build_config(args: &PhonemizeArgs) -> Result<G2pConfig> {
    let mut config = match &args.config {
        Some(path) => G2pConfig::from_file(path)?,
        None => G2pConfig::default(),
    };
    if args.british {
        config.british = true;
    }
    if let Some(dir) = &args.lexicon_dir {
        config.lexicon_dir = Some(dir.clone());
    }
    if let Some(fallback) = &args.fallback {
        config.fallback = fallback.parse::<FallbackKind>()?;
    }
    Ok(config.with_env_overrides())
}

/// Input lines from the arguments, a file, or stdin.
fn read_input(args: &PhonemizeArgs) -> Result<Vec<String>> {
    let text = if let Some(path) = &args.file {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input: {}", path.display()))?
    } else if !args.text.is_empty() {
        args.text.join(" ")
    } else {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    };
    let lines: Vec<String> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect();
    if lines.is_empty() {
        bail!("No input text");
    }
    Ok(lines)
}

// ─── Phonemize runner ────────────────────────────────────────────

fn run_phonemize(args: PhonemizeArgs) -> Result<()> {
    let config = build_config(&args)?;
    let lines = read_input(&args)?;
    let g2p = G2p::from_config(&config)?;
    if let Some(name) = g2p.fallback_name() {
        log::info!("Fallback: {}", name);
    }

    for line in &lines {
        let result = g2p.phonemize(line);
        println!("{}", result.phonemes.trim_end());

        if args.tokens {
            let tokens: Vec<serde_json::Value> = result
                .tokens
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "text": t.text,
                        "tag": t.tag,
                        "phonemes": t.phonemes,
                        "rating": t.rating,
                        "whitespace": t.whitespace,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&tokens)?);
        }

        let unresolved = result
            .tokens
            .iter()
            .filter(|t| t.rating.is_none())
            .count();
        if unresolved > 0 {
            log::info!("{} unresolved token(s) in: {}", unresolved, line);
        }
    }

    Ok(())
}

// ─── Check-lexicon runner ────────────────────────────────────────

fn run_check_lexicon(args: CheckLexiconArgs) -> Result<()> {
    if !args.lexicon_dir.is_dir() {
        bail!("Lexicon directory not found: {}", args.lexicon_dir.display());
    }
    let lexicon = Lexicon::load(&args.lexicon_dir, args.british)
        .with_context(|| format!("Invalid lexicon in {}", args.lexicon_dir.display()))?;

    println!("Dialect: {}", if lexicon.british() { "GB" } else { "US" });
    println!("Gold entries: {}", lexicon.gold_len());
    println!("Silver entries: {}", lexicon.silver_len());

    Ok(())
}
