// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! rankseq CLI - generate ranks and maintain ranks in NDJSON exports.
//!
//! Collections are per document type: ranks of different `_type`s never
//! interact. Rewriting commands print NDJSON to stdout (or `--output`) and
//! their summaries to stderr.

use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use anyhow::Result;
use clap::Args;
use clap::Parser;
use clap::Subcommand;

use rankseq::RankSequence;
use rankseq::collection;
use rankseq::config::Config;
use rankseq::document;
use rankseq::document::Document;

/// Insertion-friendly order ranks for manually sorted records.
#[derive(Parser, Debug)]
#[command(name = "rankseq")]
#[command(version)]
#[command(about, long_about = None)]
struct Cli {
    /// Config file (defaults to ./rankseq.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show info logs (honours RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Never log
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the smallest rank
    Min,
    /// Print the middle rank
    Middle,
    /// Print ranks following RANK, one stride apart
    Next {
        rank: String,
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Print a rank strictly between LOW and HIGH
    Between { low: String, high: String },
    /// Report missing, malformed and duplicate ranks
    Check {
        file: PathBuf,
        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<String>,
    },
    /// Rank documents that have no rank yet, oldest first, after the last rank
    Assign(Rewrite),
    /// Rerank all documents by legacy `order`, then creation time
    Migrate(Rewrite),
    /// Move documents into the next bucket with evenly spaced ranks
    Rebalance(Rewrite),
}

#[derive(Args, Debug)]
struct Rewrite {
    file: PathBuf,

    /// Only touch documents of this type
    #[arg(long = "type", value_name = "TYPE")]
    kind: Option<String>,

    /// Write NDJSON here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn init_tracing(cli: &Cli) {
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("off")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(Path::new("."))?,
    };
    return Ok(config);
}

fn read_file(path: &Path) -> Result<Vec<Document>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let documents = document::read_documents(BufReader::new(file)).with_context(|| format!("reading {}", path.display()))?;
    return Ok(documents);
}

fn write_output(output: Option<&Path>, documents: &[Document]) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            document::write_documents(BufWriter::new(file), documents)?;
        }
        None => {
            let stdout = std::io::stdout();
            document::write_documents(stdout.lock(), documents)?;
        }
    }
    return Ok(());
}

fn selected_kinds(documents: &[Document], kind: Option<&str>) -> Vec<String> {
    return match kind {
        Some(kind) => vec![kind.to_string()],
        None => document::kinds(documents),
    };
}

fn check(file: &Path, kind: Option<&str>) -> Result<ExitCode> {
    let mut documents = read_file(file)?;
    let mut clean = true;
    let mut total = 0;
    let mut unranked = 0;

    let mut out = std::io::stdout().lock();
    for kind in selected_kinds(&documents, kind) {
        let subset = document::of_kind(&mut documents, &kind);
        let report = collection::audit(&subset);

        writeln!(out, "{kind}:")?;
        writeln!(out, "   Total: {}", report.total)?;
        writeln!(out, "   With orderRank: {}", report.ranked)?;
        writeln!(out, "   Missing orderRank: {}", report.missing.len())?;
        for i in &report.missing {
            let draft = if subset[*i].is_draft() { " [DRAFT]" } else { "" };
            writeln!(out, "      - {}{draft} ({})", subset[*i].label(), subset[*i].id)?;
        }
        writeln!(out, "   Malformed orderRank: {}", report.malformed.len())?;
        for i in &report.malformed {
            let value = subset[*i].order_rank.as_deref().unwrap_or_default();
            writeln!(out, "      - {} ({}): {value:?}", subset[*i].label(), subset[*i].id)?;
        }
        writeln!(out, "   Duplicate orderRank groups: {}", report.duplicates.len())?;
        for group in &report.duplicates {
            let ids: Vec<&str> = group.iter().map(|i| subset[*i].id.as_str()).collect();
            writeln!(out, "      - {}", ids.join(", "))?;
        }
        writeln!(out)?;

        total += report.total;
        unranked += report.missing.len() + report.malformed.len();
        clean &= report.is_clean();
    }

    writeln!(out, "Summary: {unranked}/{total} documents missing a valid orderRank")?;
    if clean {
        return Ok(ExitCode::SUCCESS);
    }
    return Ok(ExitCode::FAILURE);
}

fn assign(seq: &RankSequence, args: &Rewrite) -> Result<()> {
    let mut documents = read_file(&args.file)?;
    for kind in selected_kinds(&documents, args.kind.as_deref()) {
        let mut subset = document::of_kind(&mut documents, &kind);
        subset.sort_by(|a, b| a.cmp_created(b));
        let count = collection::assign_missing(seq, &mut subset).with_context(|| format!("assigning ranks to {kind}"))?;
        eprintln!("{kind}: assigned orderRank to {count} documents");
    }
    return write_output(args.output.as_deref(), &documents);
}

fn migrate(seq: &RankSequence, args: &Rewrite) -> Result<()> {
    let mut documents = read_file(&args.file)?;
    for kind in selected_kinds(&documents, args.kind.as_deref()) {
        let mut subset = document::of_kind(&mut documents, &kind);
        subset.sort_by(|a, b| a.cmp_legacy_order(b));
        let count = collection::migrate(seq, &mut subset);
        for doc in &subset {
            tracing::info!(kind = %kind, id = %doc.id, rank = ?doc.order_rank, "migrated");
        }
        eprintln!("{kind}: migrated {count} documents");
    }
    return write_output(args.output.as_deref(), &documents);
}

fn rebalance(seq: &RankSequence, args: &Rewrite) -> Result<()> {
    let mut documents = read_file(&args.file)?;
    for kind in selected_kinds(&documents, args.kind.as_deref()) {
        let mut subset = document::of_kind(&mut documents, &kind);
        let bucket = collection::rebalance(seq, &mut subset);
        eprintln!("{kind}: moved {} documents to bucket {bucket}", subset.len());
    }
    return write_output(args.output.as_deref(), &documents);
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = load_config(cli)?;
    let seq = RankSequence::new(config.sequence);

    match &cli.command {
        Command::Min => println!("{}", seq.min()),
        Command::Middle => println!("{}", seq.middle()),
        Command::Next { rank, count } => {
            let start = seq.parse(rank)?;
            for rank in seq.ranks_after(start).take(*count) {
                println!("{rank}");
            }
        }
        Command::Between { low, high } => {
            let low = seq.parse(low)?;
            let high = seq.parse(high)?;
            println!("{}", seq.between(&low, &high)?);
        }
        Command::Check { file, kind } => return check(file, kind.as_deref()),
        Command::Assign(args) => assign(&seq, args)?,
        Command::Migrate(args) => migrate(&seq, args)?,
        Command::Rebalance(args) => rebalance(&seq, args)?,
    }
    return Ok(ExitCode::SUCCESS);
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    return match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    };
}
