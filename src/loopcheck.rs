use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::tuning::TUNING;

// ---------------------------------------------------------------------------
// Loop detection
//
// Two independent, advisory checks run against each new generation pass: a
// keyword-overlap similarity comparison against every prior pass, and a fast
// regex scan for reset phrasing and out-of-place opening-image language.
// Neither ever mutates or blocks.
// ---------------------------------------------------------------------------

static SLUGLINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(INT\.|EXT\.)\s*(.+)$").unwrap());

static RESET_PHRASE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)meanwhile, back at",
        r"(?i)as we saw earlier",
        r"(?i)once again we find",
        r"(?i)back where it all began",
        r"(?i)which brings us back to",
        r"(?i)if you're wondering how we got here",
        r"(?i)flashback to",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

// Act-one conventions that should not reappear after the first pass.
static OPENING_IMAGE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?im)^\s*fade in",
        r"(?i)we first meet",
        r"(?i)we open on",
        r"(?i)our story begins",
        r"(?i)it was an ordinary",
        r"(?i)establishing shot",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Digest of one completed generation pass. Built once, appended to a
/// caller-owned list in generation order, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceSummary {
    pub sequence_number: u32,
    pub keywords: BTreeSet<String>,
    pub summary_text: String,
    pub sluglines: Vec<String>,
}

impl SequenceSummary {
    pub fn from_text(sequence_number: u32, text: &str) -> Self {
        Self {
            sequence_number,
            keywords: extract_keywords(text),
            summary_text: text.to_string(),
            sluglines: extract_sluglines(text),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SequenceEcho {
    pub sequence_number: u32,
    pub overlap: f64,
    pub location_repeat: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarityReport {
    /// Accumulated overlap evidence, capped at 1.0 for reporting.
    pub loop_score: f64,
    pub is_loop: bool,
    pub echoes: Vec<SequenceEcho>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatternReport {
    pub valid: bool,
    pub issues: Vec<String>,
}

fn extract_keywords(text: &str) -> BTreeSet<String> {
    text.split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphabetic()).to_lowercase())
        .filter(|t| t.len() >= TUNING.keyword_min_len && t.chars().all(|c| c.is_alphabetic()))
        .collect()
}

fn extract_sluglines(text: &str) -> Vec<String> {
    SLUGLINE_RE
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

// Location text of a slugline: prefix and time-of-day tail stripped.
// "INT. WAREHOUSE - NIGHT" -> "WAREHOUSE".
fn slugline_location(slugline: &str) -> String {
    let stripped = slugline
        .trim()
        .trim_start_matches("INT.")
        .trim_start_matches("EXT.")
        .trim();
    match stripped.rsplit_once(" - ") {
        Some((location, _)) => location.trim().to_string(),
        None => stripped.to_string(),
    }
}

pub fn check_similarity(new_text: &str, prior: &[SequenceSummary]) -> SimilarityReport {
    let keywords = extract_keywords(new_text);
    let locations: Vec<String> = extract_sluglines(new_text)
        .iter()
        .map(|s| slugline_location(s))
        .filter(|l| !l.is_empty())
        .collect();

    let mut score = 0.0f64;
    let mut echoes = Vec::new();

    for summary in prior {
        let intersection = keywords.intersection(&summary.keywords).count();
        let denom = keywords.len().min(summary.keywords.len()).max(1);
        let overlap = intersection as f64 / denom as f64;

        let location_repeat = overlap > TUNING.location_overlap_threshold
            && locations.iter().any(|loc| {
                summary
                    .summary_text
                    .to_lowercase()
                    .contains(&loc.to_lowercase())
            });

        let mut implicated = false;
        if overlap > TUNING.overlap_accumulate_threshold {
            score += overlap;
            implicated = true;
        }
        if location_repeat {
            score += TUNING.location_increment;
            implicated = true;
        }
        if implicated {
            echoes.push(SequenceEcho {
                sequence_number: summary.sequence_number,
                overlap,
                location_repeat,
            });
        }
    }

    SimilarityReport {
        loop_score: score.min(1.0),
        is_loop: score > TUNING.loop_verdict_threshold,
        echoes,
    }
}

pub fn check_patterns(new_text: &str, sequence_number: u32) -> PatternReport {
    let mut issues = Vec::new();

    for pattern in RESET_PHRASE_RES.iter() {
        if let Some(m) = pattern.find(new_text) {
            issues.push(format!("reset phrasing: '{}'", m.as_str()));
        }
    }

    if sequence_number > 1 {
        for pattern in OPENING_IMAGE_RES.iter() {
            if let Some(m) = pattern.find(new_text) {
                issues.push(format!(
                    "opening-image language in sequence {}: '{}'",
                    sequence_number,
                    m.as_str().trim(),
                ));
            }
        }
    }

    PatternReport {
        valid: issues.is_empty(),
        issues,
    }
}
