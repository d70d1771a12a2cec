use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use greenlight::batch;
use greenlight::score::score_document;

#[derive(Parser)]
#[command(
    name = "greenlight",
    about = "Score generated screenplays for AI-sounding writing",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score a single document
    Score {
        /// Path to the document
        file: PathBuf,
        /// Emit the full report as JSON
        #[arg(long)]
        json: bool,
        /// Print per-category details
        #[arg(long)]
        verbose: bool,
    },
    /// Score many documents and compare them
    Batch {
        /// Files or directories (filtered to .txt/.md/.fountain)
        paths: Vec<PathBuf>,
        /// Emit CSV instead of a table
        #[arg(long)]
        csv: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Score {
            file,
            json,
            verbose,
        } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let report = score_document(&text);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "{}  composite {:.2} ({})  {} words",
                    file.display(),
                    report.composite,
                    report.tier.label(),
                    report.word_count,
                );
                for (name, cat) in &report.categories {
                    println!("  {name:<16} {:.2}", cat.score);
                    if verbose {
                        for (key, value) in &cat.details {
                            println!("    {key}: {value}");
                        }
                    }
                }
            }
        }
        Command::Batch { paths, csv } => {
            let rows = batch::run_batch(&paths)?;
            if csv {
                print!("{}", batch::render_csv(&rows));
            } else {
                print!("{}", batch::render_table(&rows));
            }
        }
    }

    Ok(())
}
