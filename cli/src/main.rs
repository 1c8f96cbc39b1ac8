//! textlayer CLI - text layer extraction over recorded document captures

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use textlayer::{
    Document, ExtractOptions, Extractor, QualityGate, QualityThresholds, ReplayDocument,
    WordListSpellChecker, WordPunctTokenizer,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "textlayer")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract per-page text layers with OCR quality gating", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the text layer of a recorded capture
    Extract {
        /// Capture JSON file
        #[arg(value_name = "CAPTURE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Output plain text instead of JSON
        #[arg(long, conflicts_with = "compact")]
        text: bool,

        #[command(flatten)]
        options: ExtractArgs,
    },

    /// Check whether a text file looks like garbled OCR output
    Check {
        /// Text file
        #[arg(value_name = "TEXT_FILE")]
        input: PathBuf,

        #[command(flatten)]
        spell: SpellArgs,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },

    /// Show capture information
    Info {
        /// Capture JSON file
        #[arg(value_name = "CAPTURE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct ExtractArgs {
    /// OCR language
    #[arg(long, env = "TEXTLAYER_OCR_LANG", default_value = "eng")]
    ocr_lang: String,

    /// Resolution for full-page OCR
    #[arg(long, env = "TEXTLAYER_OCR_DPI", default_value_t = textlayer::extract::DEFAULT_OCR_DPI)]
    dpi: u32,

    /// Resolution for fragment OCR
    #[arg(long, env = "TEXTLAYER_SEGMENT_DPI", default_value_t = textlayer::extract::DEFAULT_SEGMENT_DPI)]
    segment_dpi: u32,

    /// Maximum number of pages to process (0 = all)
    #[arg(long, env = "TEXTLAYER_MAX_PAGES", default_value_t = 0)]
    max_pages: usize,

    #[command(flatten)]
    spell: SpellArgs,

    #[command(flatten)]
    thresholds: ThresholdArgs,
}

#[derive(Args)]
struct SpellArgs {
    /// Dictionary language for misspelling checks
    #[arg(long, env = "TEXTLAYER_SPELL_LANG", requires = "dictionary")]
    spell_lang: Option<String>,

    /// Word list for the dictionary language, one word per line
    #[arg(long, env = "TEXTLAYER_DICTIONARY", value_name = "FILE", requires = "spell_lang")]
    dictionary: Option<PathBuf>,
}

#[derive(Args)]
struct ThresholdArgs {
    /// Maximum share of unknown or non-alphanumeric tokens
    #[arg(long, default_value_t = 0.8)]
    misspelling_threshold: f64,

    /// Maximum share of space characters
    #[arg(long, default_value_t = 0.5)]
    space_threshold: f64,

    /// Maximum share of newline characters
    #[arg(long, default_value_t = 0.3)]
    newline_threshold: f64,
}

impl ThresholdArgs {
    fn to_thresholds(&self) -> QualityThresholds {
        QualityThresholds::new(
            self.misspelling_threshold,
            self.space_threshold,
            self.newline_threshold,
        )
    }
}

impl SpellArgs {
    /// Load the dictionary, if one was requested.
    fn load(&self) -> CliResult<Option<(WordListSpellChecker, String)>> {
        let (Some(language), Some(path)) = (&self.spell_lang, &self.dictionary) else {
            return Ok(None);
        };

        let mut spell = WordListSpellChecker::new();
        let count = spell.load_language_file(language, path)?;
        log::info!("Loaded {} words for '{}' from {}", count, language, path.display());
        Ok(Some((spell, language.clone())))
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input,
            output,
            compact,
            text,
            options,
        } => cmd_extract(&input, output.as_deref(), compact, text, &options),
        Commands::Check {
            input,
            spell,
            thresholds,
        } => cmd_check(&input, &spell, &thresholds),
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    text: bool,
    args: &ExtractArgs,
) -> CliResult<()> {
    let doc = ReplayDocument::load_file(input)?;
    let spell = args.spell.load()?;

    let mut options = ExtractOptions::new()
        .with_ocr_language(args.ocr_lang.as_str())
        .with_ocr_dpi(args.dpi)
        .with_segment_dpi(args.segment_dpi)
        .with_max_pages(args.max_pages)
        .with_thresholds(args.thresholds.to_thresholds());
    if let Some((_, language)) = &spell {
        options = options.with_spell_language(language.as_str());
    }

    let mut extractor = Extractor::new(&doc, &doc).with_options(options);
    if let Some((checker, _)) = &spell {
        extractor = extractor.with_spell_checker(checker);
    }
    let result = extractor.extract()?;

    let rendered = if text {
        result.plain_text()
    } else if compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };

    if let Some(path) = output {
        fs::write(path, &rendered)?;
        println!("{} {}", "Saved to".green(), path.display());
        print_summary(&result);
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

fn print_summary(result: &Document) {
    let stats = &result.stats;
    println!();
    println!("{}", "Extraction Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Pages".bold(), stats.pages);
    println!(
        "{}: {} ({} accepted, {} rejected, {} failed)",
        "Full-page OCR".bold(),
        stats.ocr_attempts,
        stats.ocr_accepted,
        stats.ocr_rejected,
        stats.ocr_failed
    );
    println!(
        "{}: {} repaired, {} kept",
        "Fragments".bold(),
        stats.fragments_repaired,
        stats.fragments_kept
    );
    if stats.native_failures > 0 {
        println!(
            "{}: {}",
            "Native failures".yellow().bold(),
            stats.native_failures
        );
    }
    if stats.dropped_pages() > 0 {
        println!(
            "{}: {}",
            "Empty pages".yellow().bold(),
            stats.dropped_pages()
        );
    }
}

fn cmd_check(input: &Path, spell: &SpellArgs, thresholds: &ThresholdArgs) -> CliResult<()> {
    let text = fs::read_to_string(input)?;
    let thresholds = thresholds.to_thresholds();
    thresholds.validate()?;

    let tokenizer = WordPunctTokenizer::new();
    let spell = spell.load()?;

    let mut gate = QualityGate::new(&tokenizer, thresholds);
    if let Some((checker, language)) = &spell {
        gate = gate.with_spell_checker(checker, language);
    }

    match gate.assess(&text) {
        Some(reason) => println!("{} {}", "Garbled:".red().bold(), reason),
        None => println!("{}", "Looks usable".green().bold()),
    }

    Ok(())
}

fn cmd_info(input: &Path) -> CliResult<()> {
    let doc = ReplayDocument::load_file(input)?;
    let capture = doc.capture();

    println!("{}", "Capture Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), capture.pages.len());
    println!("{}: {}", "Bookmarks".bold(), capture.toc.len());

    println!();
    println!("{}", "Recorded Content".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let options = ExtractOptions::default();
    let spans = capture
        .pages
        .iter()
        .flat_map(|p| &p.blocks)
        .flat_map(|b| &b.lines)
        .flat_map(|l| &l.spans);
    let (total, invalid) = spans.fold((0, 0), |(total, invalid), span| {
        let bad = options.has_invalid_chars(&span.text) as usize;
        (total + 1, invalid + bad)
    });

    println!("{}: {}", "Native spans".bold(), total);
    println!("{}: {}", "Spans needing repair".bold(), invalid);
    println!("{}: {}", "Full-page OCR".bold(), doc.recorded_ocr_pages());
    println!("{}: {}", "Fragment OCR".bold(), doc.recorded_regions());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "textlayer".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Per-page text layer extraction tool");
    println!();
    println!("License: MIT");
}
