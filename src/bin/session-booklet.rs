//! Session Booklet CLI tool
//!
//! A command-line tool for merging lecture summaries and problem sets into
//! one duplex-ready PDF.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

use session_booklet::collect::collect_sessions;
use session_booklet::pdf::merge::{DEFAULT_OUTPUT, DEFAULT_PROBLEM_DIR, DEFAULT_SUMMARY_DIR};
use session_booklet::pdf::{extract_metadata, merge_sessions, write_booklet, MergeOptions, SessionReport};
use session_booklet::rename::{plan_renames, rename_sessions};

/// Session Booklet - merge session PDFs for duplex printing
#[derive(Parser)]
#[command(name = "session-booklet")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Merge lecturenotes/ and problemsets/ into merged.pdf
    session-booklet merge

    # Show what would be merged without writing anything
    session-booklet merge --dry-run

    # Strip download prefixes from file names in the current directory
    session-booklet rename")]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge all sessions into one PDF
    Merge {
        /// Directory with Ses<N.M>sum.pdf files
        #[arg(long, default_value = DEFAULT_SUMMARY_DIR)]
        summaries: PathBuf,

        /// Directory with Ses<N.M>prob.pdf files
        #[arg(long, default_value = DEFAULT_PROBLEM_DIR)]
        problems: PathBuf,

        /// Output PDF file path (overwritten if it exists)
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Print the page plan without writing the output
        #[arg(long)]
        dry_run: bool,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Rename "<prefix>Ses<N.M><sum|prob>.pdf" files to "Ses<N.M><sum|prob>.pdf"
    Rename {
        /// Directory to rename files in
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Only print the planned renames
        #[arg(long)]
        dry_run: bool,
    },

    /// List the sessions found, in merge order
    Sessions {
        /// Directory with Ses<N.M>sum.pdf files
        #[arg(long, default_value = DEFAULT_SUMMARY_DIR)]
        summaries: PathBuf,

        /// Directory with Ses<N.M>prob.pdf files
        #[arg(long, default_value = DEFAULT_PROBLEM_DIR)]
        problems: PathBuf,
    },

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Merge { summaries, problems, output, dry_run, open } => {
            let options = MergeOptions {
                summary_dir: summaries,
                problem_dir: problems,
                output_path: output,
            };
            cmd_merge(&options, dry_run, open)
        }
        Commands::Rename { dir, dry_run } => cmd_rename(&dir, dry_run),
        Commands::Sessions { summaries, problems } => cmd_sessions(&summaries, &problems),
        Commands::Info { input } => cmd_info(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Log to stderr, honouring RUST_LOG when set
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Open a file with the system default application
fn open_file(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(path).spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(path).spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

/// One line per session for the dry-run and final report
fn describe(report: &SessionReport) -> String {
    if report.is_skipped() {
        return format!("Session {}: skipped (no summary)", report.id);
    }

    let problem = match report.problem_pages {
        Some(pages) => format!("{} problem", pages),
        None => "no problem set".to_string(),
    };
    let filler = if report.filler_added { " + filler" } else { "" };

    format!(
        "Session {}: {} summary, {}{} = {} pages",
        report.id,
        report.summary_pages.unwrap_or(0),
        problem,
        filler,
        report.total_pages(),
    )
}

/// Collect, merge and write the booklet
fn cmd_merge(options: &MergeOptions, dry_run: bool, open: bool) -> Result<()> {
    let sessions = collect_sessions(&options.summary_dir, &options.problem_dir)?;
    eprintln!("Found {} sessions", sessions.len());

    let merged = merge_sessions(&sessions).context("Failed to merge sessions")?;

    for report in &merged.reports {
        eprintln!("  {}", describe(report));
    }

    if dry_run {
        eprintln!("Dry run: {} pages, nothing written", merged.pages.len());
        return Ok(());
    }

    let page_count = write_booklet(merged.pages, &options.output_path)
        .with_context(|| format!("Failed to write {}", options.output_path.display()))?;

    eprintln!("Merged {} pages to: {}", page_count, options.output_path.display());

    if open {
        open_file(&options.output_path)?;
    }

    Ok(())
}

/// Strip prefixes from session file names
fn cmd_rename(dir: &Path, dry_run: bool) -> Result<()> {
    let renames = if dry_run {
        plan_renames(dir)
    } else {
        rename_sessions(dir)
    }
    .with_context(|| format!("Failed to rename files in {}", dir.display()))?;

    for rename in &renames {
        let verb = if dry_run { "Would rename" } else { "Renamed" };
        println!(
            "{}: {} -> {}",
            verb,
            rename.from.file_name().unwrap_or_default().to_string_lossy(),
            rename.to.file_name().unwrap_or_default().to_string_lossy(),
        );
    }

    eprintln!("Renaming complete ({} files)", renames.len());
    Ok(())
}

/// List sessions in merge order
fn cmd_sessions(summaries: &Path, problems: &Path) -> Result<()> {
    let sessions = collect_sessions(summaries, problems)?;

    for (id, entry) in &sessions {
        let show = |path: Option<&PathBuf>| {
            path.map(|p| p.display().to_string())
                .unwrap_or_else(|| "-".to_string())
        };
        println!(
            "{:>8}  {}  {}",
            id,
            show(entry.summary.as_ref()),
            show(entry.problem.as_ref()),
        );
    }

    Ok(())
}

/// Show information about a PDF
fn cmd_info(input: &Path) -> Result<()> {
    let metadata = extract_metadata(input)?;

    println!("File: {}", input.display());
    println!("Pages: {}", metadata.page_count);

    if let Some(size) = metadata.first_page_size {
        let (width_mm, height_mm) = size.to_mm();
        println!(
            "Page size: {:.1} x {:.1} pt ({:.0} x {:.0} mm)",
            size.width, size.height, width_mm, height_mm
        );
    }
    if let Some(title) = metadata.title {
        println!("Title: {}", title);
    }
    if let Some(author) = metadata.author {
        println!("Author: {}", author);
    }

    Ok(())
}
