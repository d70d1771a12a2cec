use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::score::{self, ScoreReport};

// ---------------------------------------------------------------------------
// Batch scoring. Thin glue over score_document; the leaderboard store the
// orchestrator keeps is external and not written here.
// ---------------------------------------------------------------------------

const TEXT_EXTENSIONS: [&str; 3] = ["txt", "md", "fountain"];

pub struct BatchRow {
    pub path: PathBuf,
    pub report: ScoreReport,
}

fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| TEXT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Expand directories and filter everything down to recognized text files.
pub fn collect_targets(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut targets = Vec::new();
    for path in paths {
        if path.is_dir() {
            let entries =
                fs::read_dir(path).with_context(|| format!("reading {}", path.display()))?;
            let mut files: Vec<PathBuf> = entries
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_text_file(p))
                .collect();
            files.sort();
            targets.extend(files);
        } else {
            targets.push(path.clone());
        }
    }
    Ok(targets)
}

pub fn run_batch(paths: &[PathBuf]) -> Result<Vec<BatchRow>> {
    let mut rows = Vec::new();
    for path in collect_targets(paths)? {
        let text =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        rows.push(BatchRow {
            report: score::score_document(&text),
            path,
        });
    }
    rows.sort_by(|a, b| {
        b.report
            .composite
            .partial_cmp(&a.report.composite)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(rows)
}

pub fn render_table(rows: &[BatchRow]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<40} {:>9} {:<12} {:>8}\n",
        "document", "composite", "tier", "words"
    ));
    out.push_str(&format!("{}\n", "-".repeat(72)));
    for row in rows {
        let name = row
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("<unnamed>");
        out.push_str(&format!(
            "{:<40} {:>9.2} {:<12} {:>8}\n",
            name,
            row.report.composite,
            row.report.tier.label(),
            row.report.word_count,
        ));
    }
    out
}

pub fn render_csv(rows: &[BatchRow]) -> String {
    let mut out = String::from("document,composite,tier,words\n");
    for row in rows {
        out.push_str(&format!(
            "{},{:.2},{},{}\n",
            row.path.display(),
            row.report.composite,
            row.report.tier.label(),
            row.report.word_count,
        ));
    }
    out
}
