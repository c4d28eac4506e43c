//! burrow - An interactive disk usage explorer.
//!
//! Usage:
//!   burrow [PATH]                Scan PATH and browse it
//!   burrow --summary [PATH]      Print the largest entries and exit
//!   burrow --help                Show help

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use burrow_core::{DirTree, NodeId, ScanConfig, SizeMetric};
use burrow_scan::Scanner;
use burrow_tui::ExplorerConfig;

#[derive(Parser)]
#[command(
    name = "burrow",
    version,
    about = "An interactive disk usage explorer",
    long_about = "burrow scans a directory tree, adds up what every directory holds \
                  and lets you walk the result, delete what you don't need and \
                  rescan what changed."
)]
struct Cli {
    /// Directory to scan (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Stay on the filesystem of PATH
    #[arg(short = 'x', long)]
    one_file_system: bool,

    /// Skip entries matching a glob (repeatable)
    #[arg(long, value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Skip directories containing a CACHEDIR.TAG
    #[arg(long)]
    exclude_caches: bool,

    /// Follow symbolic links
    #[arg(short = 'L', long)]
    follow_symlinks: bool,

    /// Show apparent sizes instead of disk usage
    #[arg(long)]
    apparent_size: bool,

    /// Threads for directory reads (0 = automatic)
    #[arg(long, default_value = "0")]
    threads: usize,

    /// Delete without asking for confirmation
    #[arg(long)]
    no_confirm: bool,

    /// Write logs to this file (filter with BURROW_LOG)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Print a summary instead of starting the explorer
    #[arg(short, long)]
    summary: bool,

    /// Depth shown by --summary
    #[arg(short, long, default_value = "2")]
    depth: usize,

    /// Entries per directory shown by --summary
    #[arg(short = 'n', long, default_value = "10")]
    top: usize,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let path = cli
        .path
        .canonicalize()
        .with_context(|| format!("Invalid path: {}", cli.path.display()))?;

    let scan_config = ScanConfig::builder()
        .root(path)
        .follow_symlinks(cli.follow_symlinks)
        .cross_filesystems(!cli.one_file_system)
        .apparent_size(cli.apparent_size)
        .exclude_patterns(cli.exclude.clone())
        .exclude_caches(cli.exclude_caches)
        .threads(cli.threads)
        .build()
        .wrap_err("Invalid scan settings")?;

    let metric = if cli.apparent_size {
        SizeMetric::ApparentSize
    } else {
        SizeMetric::DiskUsage
    };

    if cli.summary {
        return run_summary(&scan_config, metric, cli.depth, cli.top);
    }

    let explorer_config = ExplorerConfig {
        metric,
        confirm_delete: !cli.no_confirm,
        ..ExplorerConfig::default()
    };
    burrow_tui::run(scan_config, explorer_config)
}

/// Install a file subscriber. Without a log file nothing is installed, the
/// terminal belongs to the explorer.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Some(log_file) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Cannot open log file {}", log_file.display()))?;

    let filter = EnvFilter::try_from_env("BURROW_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "burrow starting");
    Ok(())
}

/// Scan and print the largest entries.
fn run_summary(config: &ScanConfig, metric: SizeMetric, depth: usize, top_n: usize) -> Result<()> {
    eprintln!("Scanning {}...", config.root.display());

    let report = Scanner::new().scan(config).context("Scan failed")?;
    let totals = report.totals().unwrap_or_default();
    let stats = &report.stats;

    println!();
    println!("{}", "-".repeat(60));
    println!(
        " {} - {} ({})",
        report.root_path.display(),
        format_size(totals.size(metric)),
        metric.label()
    );
    println!(
        " {} files, {} directories, {} items",
        stats.files, stats.dirs, totals.item_count
    );
    if stats.excluded > 0 || stats.shared_hardlinks > 0 {
        println!(
            " {} excluded, {} hardlinks counted once",
            stats.excluded, stats.shared_hardlinks
        );
    }
    println!(" Scanned in {:.2}s", report.scan_duration.as_secs_f64());
    println!("{}", "-".repeat(60));
    println!();

    let tree = &report.tree;
    print_node(tree, tree.root(), 0, depth, top_n, totals.size(metric), metric);

    if report.has_warnings() {
        println!();
        println!("{} warning(s) during scan", report.warnings.len());
    }
    Ok(())
}

fn print_node(
    tree: &DirTree,
    id: NodeId,
    depth: usize,
    max_depth: usize,
    top_n: usize,
    root_size: u64,
    metric: SizeMetric,
) {
    let Some(entry) = tree.entry(id) else {
        return;
    };
    let size = tree.aggregate(id).map_or(0, |a| a.size(metric));
    let ratio = if root_size > 0 {
        size as f64 / root_size as f64
    } else {
        0.0
    };
    let name = if entry.is_dir() {
        format!("{}/", entry.name)
    } else {
        entry.name.to_string()
    };

    println!(
        "{}{:<40} {:>10} {:>5.1}% {}",
        "  ".repeat(depth),
        truncate(&name, 40),
        format_size(size),
        ratio * 100.0,
        make_bar(ratio, 10)
    );

    if !entry.is_dir() || depth >= max_depth {
        return;
    }

    let mut children: Vec<(NodeId, u64)> = tree
        .children(id)
        .iter()
        .map(|&child| (child, tree.aggregate(child).map_or(0, |a| a.size(metric))))
        .collect();
    children.sort_by(|a, b| b.1.cmp(&a.1));

    for &(child, _) in children.iter().take(top_n) {
        print_node(tree, child, depth + 1, max_depth, top_n, root_size, metric);
    }
    let remaining = children.len().saturating_sub(top_n);
    if remaining > 0 {
        println!("{}  ... and {} more", "  ".repeat(depth + 1), remaining);
    }
}

fn make_bar(ratio: f64, width: usize) -> String {
    let filled = (ratio.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), " ".repeat(width - filled))
}

fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars - 1).collect();
        format!("{kept}~")
    }
}
