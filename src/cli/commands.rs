use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

use crate::archive::reader::order_message_files;
use crate::archive::{
    DEFAULT_CONFIDENCE_THRESHOLD, check_threshold, inspect, validate_with_threshold,
};
use crate::loader::{LoadSummary, Loader, LoaderOptions, UserIdentity, UuidIds};
use crate::logging::init_tracing;
use crate::sql::tables::{ACTORS, CONVERSATIONS, MESSAGES};
use crate::store::SqliteStore;
use crate::utils::environment::ALIASES_ENV_VAR;
use crate::utils::{default_alias_file, display_path};

#[derive(Parser)]
#[command(name = "messenger-archive-loader")]
#[command(version = "0.1.0")]
#[command(about = "Load a Facebook Messenger export archive into a SQLite database", long_about = None)]
pub struct Cli {
    /// Log filter directive (e.g. "info", "messenger_archive_loader=debug")
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate an archive and load its conversations into a database
    Load(LoadArgs),
    /// Show what the archive validator sees, without loading anything
    Inspect(InspectArgs),
}

#[derive(Args)]
pub struct LoadArgs {
    /// Path to the export ZIP archive
    pub archive: PathBuf,

    /// Database file to create (in-memory when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// File listing the account owner's names, one per line
    #[arg(long)]
    pub aliases: Option<PathBuf>,

    /// 1-based line of the alias file holding the name to store
    #[arg(long)]
    pub preferred_alias: Option<usize>,

    /// Fraction of expected top-level directories that must be present
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE_THRESHOLD)]
    pub confidence: f64,

    /// Abort on the first conversation file that fails to parse
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Path to the export ZIP archive
    pub archive: PathBuf,

    #[arg(long, default_value_t = DEFAULT_CONFIDENCE_THRESHOLD)]
    pub confidence: f64,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match &cli.command {
        Some(Commands::Load(args)) => {
            load(args)?;
        }
        Some(Commands::Inspect(args)) => {
            show_inspection(args)?;
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn load(args: &LoadArgs) -> Result<()> {
    let identity = load_identity(args.aliases.as_deref(), args.preferred_alias)?;
    let archive = validate_with_threshold(&args.archive, args.confidence)
        .with_context(|| format!("Failed to open archive: {}", display_path(&args.archive)))?;
    let mut store = SqliteStore::open_output(args.output.as_deref())
        .context("Failed to create output database")?;

    let summary = Loader::new(&archive, &mut store, UuidIds)
        .with_identity(identity)
        .with_options(LoaderOptions { strict: args.strict })
        .populate(true)
        .context("Failed to load archive")?;

    print_summary(&args.archive, &store, &summary)
}

/// `--aliases` when given, otherwise the default alias file if there is one.
fn load_identity(aliases: Option<&Path>, preferred: Option<usize>) -> Result<UserIdentity> {
    match aliases.map(Path::to_path_buf).or_else(default_alias_file) {
        Some(path) => UserIdentity::from_alias_file(&path, preferred),
        None if preferred.is_some() => {
            bail!("--preferred-alias needs an alias file (--aliases or {})", ALIASES_ENV_VAR)
        }
        None => UserIdentity::new(Vec::new(), None),
    }
}

fn print_summary(archive: &Path, store: &SqliteStore, summary: &LoadSummary) -> Result<()> {
    println!("Archive Load Summary");
    println!("====================");
    println!("Archive: {}", display_path(archive));
    println!("Database: {}", describe_store(store));
    println!();
    println!("Message files loaded: {}", summary.files_processed);
    if summary.files_failed > 0 {
        println!("  Failed to parse: {}", summary.files_failed);
    }
    if summary.group_conversations_skipped > 0 {
        println!("  Group conversations skipped: {}", summary.group_conversations_skipped);
    }
    println!("Conversations: {}", store.count_rows(CONVERSATIONS)?);
    println!("Actors: {}", store.count_rows(ACTORS)?);
    println!("Messages: {}", store.count_rows(MESSAGES)?);
    if summary.messages_without_content > 0 {
        println!("  Skipped without content: {}", summary.messages_without_content);
    }
    if summary.unknown_senders > 0 {
        println!("  Unknown senders: {}", summary.unknown_senders);
    }
    if summary.failed_rows > 0 {
        println!("Failed rows: {}", summary.failed_rows);
    }

    if let Some(earliest) = summary.earliest_timestamp_ms.and_then(format_timestamp) {
        println!("Earliest message: {}", earliest);
    }
    if let Some(latest) = summary.latest_timestamp_ms.and_then(format_timestamp) {
        println!("Latest message: {}", latest);
    }

    Ok(())
}

fn describe_store(store: &SqliteStore) -> String {
    match store.location() {
        Some(path) => display_path(path),
        None => store.describe_location(),
    }
}

fn show_inspection(args: &InspectArgs) -> Result<()> {
    check_threshold(args.confidence)?;
    let inspection = inspect(&args.archive)
        .with_context(|| format!("Failed to inspect archive: {}", display_path(&args.archive)))?;
    let fingerprint = &inspection.fingerprint;

    println!("Archive: {}", display_path(&inspection.location));
    println!("Format: {}", inspection.format);
    println!("Entries: {}", inspection.entries.len());
    println!(
        "Confidence: {:.2} ({} expected directories found)",
        fingerprint.confidence,
        fingerprint.matched.len()
    );
    if !fingerprint.matched.is_empty() {
        println!("Matched: {}", fingerprint.matched.join(", "));
    }
    println!("Message files: {}", order_message_files(&inspection.entries).len());

    let verdict = if !fingerprint.has_messages {
        "rejected (no messages directory)"
    } else if fingerprint.passes(args.confidence) {
        "accepted"
    } else {
        "rejected (below threshold)"
    };
    println!("Validation: {} at threshold {:.2}", verdict, args.confidence);

    Ok(())
}

fn format_timestamp(timestamp_ms: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}
