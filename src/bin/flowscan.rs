//! flowscan CLI
//!
//! Operational tooling around the scan engine: inspect headers, dump
//! records, and rebuild statistics sidecars.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use flowscan::filter::{CompareOp, FilterExpr, Literal};
use flowscan::stats;
use flowscan::store::{ByteStore, LocalFileStore};
use flowscan::{FlowError, FormatVersion, Result, ScanConfig, ScanEngine};

/// flowscan CLI
#[derive(Parser, Debug)]
#[command(name = "flowscan")]
#[command(about = "Inspect and scan NetFlow export files")]
#[command(version)]
struct Args {
    /// Export version of the files (5 or 7)
    #[arg(short, long, default_value = "5")]
    version: u16,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a file's header and statistics sidecar
    Info {
        /// The file to inspect
        file: PathBuf,
    },

    /// Decode and print records
    Dump {
        /// The file to dump
        file: PathBuf,

        /// Stop after this many records
        #[arg(short, long)]
        limit: Option<usize>,

        /// Row filters like "protocol=UDP" or "octets>=1000" (conjoined)
        #[arg(short, long)]
        filter: Vec<String>,

        /// Print native integers instead of display forms
        #[arg(long)]
        native: bool,
    },

    /// Rebuild and persist the statistics sidecar
    Stats {
        /// The file to summarize
        file: PathBuf,
    },
}

fn main() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,flowscan=debug"));

    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let version = FormatVersion::from_u16(args.version)?;

    match args.command {
        Commands::Info { file } => info(&file),
        Commands::Dump {
            file,
            limit,
            filter,
            native,
        } => dump(version, &file, limit, &filter, native),
        Commands::Stats { file } => rebuild_stats(version, &file),
    }
}

fn info(file: &PathBuf) -> Result<()> {
    let store = LocalFileStore::new();
    let mut reader = store.open(file, 0, None)?;
    let header = flowscan::scan::FileHeader::parse(reader.as_mut())?;

    println!("file:          {}", file.display());
    println!("version:       {}", header.version);
    println!("byte order:    {:?}", header.byte_order);
    println!("compression:   {:?}", header.compression);
    println!("records:       {}", header.record_count);
    println!("capture start: {}", header.capture_start);
    println!("capture end:   {}", header.capture_end);
    println!("vendor id:     {}", header.vendor_id);
    if !header.comment.is_empty() {
        println!("comment:       {}", header.comment);
    }

    match stats::load(&store, file) {
        Some(entry) => {
            println!("statistics ({} records):", entry.record_count);
            for (name, column) in &entry.columns {
                println!("  {:<12} min={} max={}", name, column.min, column.max);
            }
        }
        None => println!("statistics:    none"),
    }

    Ok(())
}

fn dump(
    version: FormatVersion,
    file: &PathBuf,
    limit: Option<usize>,
    filters: &[String],
    native: bool,
) -> Result<()> {
    let config = ScanConfig::builder()
        .version(version)
        .stringify(!native)
        .build();
    let engine = ScanEngine::new(config);

    let filter = parse_filters(filters)?;
    let plan = engine.plan_scan(&[file.clone()], filter)?;

    let mut printed = 0;
    'outer: for index in 0..plan.partition_count() {
        for item in engine.scan_partition(&plan, index)? {
            let record = item?;
            let row = engine
                .materialize(&record)
                .into_iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join(" ");
            println!("{}", row);

            printed += 1;
            if limit.is_some_and(|l| printed >= l) {
                break 'outer;
            }
        }
    }

    Ok(())
}

fn rebuild_stats(version: FormatVersion, file: &PathBuf) -> Result<()> {
    // Stale sidecars are the caller's responsibility; this command is that
    // caller.
    let sidecar = stats::sidecar_path(file);
    if sidecar.exists() {
        std::fs::remove_file(&sidecar)?;
    }

    let config = ScanConfig::builder()
        .version(version)
        .statistics(true)
        .build();
    let engine = ScanEngine::new(config);

    let plan = engine.plan_scan(&[file.clone()], None)?;
    let records = engine.scan_collect(&plan)?;

    println!(
        "built statistics for {} ({} records) -> {}",
        file.display(),
        records.len(),
        sidecar.display()
    );
    Ok(())
}

/// Parse "column OP value" filter strings; multiple filters are conjoined
fn parse_filters(raw: &[String]) -> Result<Option<FilterExpr>> {
    if raw.is_empty() {
        return Ok(None);
    }

    let mut leaves = Vec::with_capacity(raw.len());
    for spec in raw {
        leaves.push(parse_filter(spec)?);
    }

    Ok(Some(if leaves.len() == 1 {
        leaves.pop().expect("one leaf")
    } else {
        FilterExpr::and(leaves)
    }))
}

fn parse_filter(spec: &str) -> Result<FilterExpr> {
    // Two-character operators first so ">=" does not parse as ">".
    for (token, op) in [
        (">=", CompareOp::Ge),
        ("<=", CompareOp::Le),
        (">", CompareOp::Gt),
        ("<", CompareOp::Lt),
        ("=", CompareOp::Eq),
    ] {
        if let Some((column, value)) = spec.split_once(token) {
            let column = column.trim();
            let value = value.trim();
            if column.is_empty() || value.is_empty() {
                break;
            }
            let literal = match value.parse::<u64>() {
                Ok(n) => Literal::Unsigned(n),
                Err(_) => Literal::Text(value.to_string()),
            };
            return Ok(FilterExpr::compare(column, op, literal));
        }
    }

    Err(FlowError::Config(format!(
        "cannot parse filter '{}'; expected column=value or column>=value",
        spec
    )))
}
