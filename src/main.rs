//! Main entry point for the unpak CLI application.
//!
//! This binary lists and extracts the entries of idTech 2 PACK archives.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::Write;

use unpak::{ArchiveIndex, Cli, PakExtractor};

/// Application entry point.
///
/// Parses command-line arguments, installs the log subscriber, opens the
/// archive and dispatches to listing or extraction.
fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(cli.log_level())
        .with_target(false)
        .init();

    let index = unpak::open_archive(&cli.file)
        .with_context(|| format!("cannot open {}", cli.file.display()))?;

    // List mode: display archive contents and exit
    if cli.list || cli.verbose {
        list_files(&index, cli.verbose);
        return Ok(());
    }

    process_pak(&index, &cli)
}

/// Extract the entries selected on the command line.
///
/// With no selection, no pipe and overwriting allowed, the whole archive goes
/// through bulk extraction; otherwise entries are extracted one at a time.
fn process_pak(index: &ArchiveIndex, cli: &Cli) -> Result<()> {
    let names = unpak::list_entries(index);

    let unmatched = cli.unmatched(&names);
    for name in &unmatched {
        tracing::error!("caution: entry not matched: {}", name);
    }

    if !cli.pipe && !cli.has_selection() && !cli.never_overwrite {
        extract_all(index, cli)?;
    } else {
        let selected: Vec<_> = names.into_iter().filter(|n| cli.selects(n)).collect();
        if cli.pipe {
            pipe_files(index, &selected)?;
        } else {
            extract_selected(index, &selected, cli)?;
        }
    }

    if !unmatched.is_empty() {
        bail!("{} requested entries not found", unmatched.len());
    }
    Ok(())
}

/// List entries in the archive.
///
/// Supports two output formats:
/// - Simple format (`-l`): entry names, one per line
/// - Verbose format (`-v`): header values, then a table of offset, size and name
fn list_files(index: &ArchiveIndex, verbose: bool) {
    if verbose {
        let header = index.header();
        println!("Archive:  {}", index.source());
        println!(
            "Header:   magic={} directory_offset={} directory_size={} records={}",
            String::from_utf8_lossy(&header.magic),
            header.directory_offset,
            header.directory_size,
            header.entry_count()
        );
        println!();
        println!("{:>10}  {:>10}  Name", "Offset", "Size");
        println!("{}", "-".repeat(50));
    }

    let mut total_size = 0u64;
    for entry in index.entries() {
        if verbose {
            println!(
                "{:>10}  {:>10}  {}",
                entry.content_offset(),
                entry.content_size(),
                entry.name()
            );
            total_size += entry.content_size() as u64;
        } else {
            println!("{}", entry.name());
        }
    }

    if verbose {
        println!("{}", "-".repeat(50));
        println!("{:>10}  {:>10}  {} files", "", total_size, index.len());
        if index.superseded() > 0 {
            println!("({} duplicate records superseded)", index.superseded());
        }
    }
}

/// Extract the whole archive, reporting each entry as it is written.
fn extract_all(index: &ArchiveIndex, cli: &Cli) -> Result<()> {
    let root = cli.output_root();
    let summary = unpak::extract_all(index, root)
        .with_context(|| format!("cannot create {}", root.display()))?;

    if !cli.is_quiet() {
        for (name, _) in summary.extracted() {
            println!("  extracting: {name}");
        }
    }
    for (name, err) in summary.failures() {
        eprintln!("  error: {name}: {err}");
    }

    summary.into_result()?;
    Ok(())
}

/// Extract the selected entries one at a time, honoring `-n`.
fn extract_selected(index: &ArchiveIndex, selected: &[&str], cli: &Cli) -> Result<()> {
    let extractor = PakExtractor::new(index);
    let root = cli.output_root();
    let mut failed = 0usize;

    for name in selected {
        if cli.never_overwrite {
            if let Ok(path) = extractor.output_path(root, name) {
                if path.exists() {
                    if !cli.is_quiet() {
                        eprintln!("Skipping: {name} (file exists)");
                    }
                    continue;
                }
            }
        }

        if !cli.is_quiet() {
            println!("  extracting: {name}");
        }

        if let Err(e) = extractor.extract_to_file(name, root) {
            eprintln!("  error: {name}: {e}");
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("extraction failed for {failed} of {} entries", selected.len());
    }
    Ok(())
}

/// Write the selected entries to stdout.
///
/// With more than one entry, each is preceded by a `--- name ---` marker.
fn pipe_files(index: &ArchiveIndex, selected: &[&str]) -> Result<()> {
    let extractor = PakExtractor::new(index);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let show_names = selected.len() > 1;

    for name in selected {
        if show_names {
            writeln!(out, "--- {name} ---")?;
        }
        extractor.extract_to_writer(name, &mut out)?;
    }

    out.flush()?;
    Ok(())
}
