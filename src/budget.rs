use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::features;

// ---------------------------------------------------------------------------
// Tic budget enforcement
//
// Runs inline during multi-pass generation. The caller threads a
// TicBudgetState across passes in generation order; the enforcer itself holds
// no state and never reports more usage than it allowed through. Running it
// once over a whole document or pass-by-pass with state threading yields the
// same final cumulative counts.
// ---------------------------------------------------------------------------

/// Marker spliced in where an over-budget occurrence was removed, so a
/// downstream cleanup pass can find the cut sites.
pub const REMOVAL_MARKER: &str = "[TRIMMED]";

struct MotifBudget {
    name: &'static str,
    matcher: Regex,
    max_per_document: usize,
    cooldown_words: usize,
}

// A fixed set, distinct from the scoring tic list but overlapping it. These
// are the motifs worth mutating text over; the scorer tracks a wider list
// that only costs points.
static MOTIFS: Lazy<Vec<MotifBudget>> = Lazy::new(|| {
    vec![
        MotifBudget {
            name: "watch_check",
            matcher: Regex::new(
                r"(?i)\b(?:checks?|checking|glances? at|looks? at) (?:his|her|their|the) watch\b",
            )
            .unwrap(),
            max_per_document: 4,
            cooldown_words: 800,
        },
        MotifBudget {
            name: "cigarette_light",
            matcher: Regex::new(r"(?i)\b(?:lights?|lighting) (?:a|another|his|her|their) cigarette\b")
                .unwrap(),
            max_per_document: 4,
            cooldown_words: 600,
        },
        MotifBudget {
            name: "deep_breath",
            matcher: Regex::new(r"(?i)\btakes? a (?:deep|long|slow) breath\b").unwrap(),
            max_per_document: 6,
            cooldown_words: 500,
        },
        MotifBudget {
            name: "shared_look",
            matcher: Regex::new(r"(?i)\bexchanges? (?:a )?(?:look|glance)s?\b").unwrap(),
            max_per_document: 5,
            cooldown_words: 500,
        },
        MotifBudget {
            name: "white_knuckles",
            matcher: Regex::new(r"(?i)\bknuckles (?:whiten|go white)\b").unwrap(),
            max_per_document: 3,
            cooldown_words: 700,
        },
    ]
});

/// Cumulative motif usage across passes. Created empty at the start of a
/// document, carried forward by the caller, discarded when the document is
/// done. Serializable so an orchestrator can persist it between passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicBudgetState {
    pub counts: BTreeMap<String, u32>,
}

impl TicBudgetState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, motif: &str) -> u32 {
        self.counts.get(motif).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MotifTally {
    pub motif: String,
    pub kept: usize,
    pub removed: usize,
}

#[derive(Debug)]
pub struct EnforcementOutcome {
    pub text: String,
    pub state: TicBudgetState,
    pub warnings: Vec<String>,
    pub tallies: Vec<MotifTally>,
}

pub fn enforce_budget(text: &str, state: TicBudgetState) -> EnforcementOutcome {
    let mut state = state;
    let mut warnings = Vec::new();
    let mut tallies = Vec::new();
    // (start, end) spans to splice out, across all motifs.
    let mut removals: Vec<(usize, usize)> = Vec::new();

    for motif in MOTIFS.iter() {
        let spans: Vec<(usize, usize)> = motif
            .matcher
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .collect();
        if spans.is_empty() {
            continue;
        }

        let cumulative = state.count(motif.name) as usize;
        let remaining = motif.max_per_document.saturating_sub(cumulative);
        let kept = spans.len().min(remaining);
        let removed = spans.len() - kept;

        if removed > 0 {
            warnings.push(format!(
                "motif '{}' over budget: {} occurrence(s) this pass, {} already used, limit {} per document; removed {}",
                motif.name,
                spans.len(),
                cumulative,
                motif.max_per_document,
                removed,
            ));
            removals.extend(spans[kept..].iter().copied());
        }

        *state.counts.entry(motif.name.to_string()).or_insert(0) += kept as u32;
        tallies.push(MotifTally {
            motif: motif.name.to_string(),
            kept,
            removed,
        });
    }

    EnforcementOutcome {
        text: splice_out(text, removals),
        state,
        warnings,
        tallies,
    }
}

fn splice_out(text: &str, mut spans: Vec<(usize, usize)>) -> String {
    if spans.is_empty() {
        return text.to_string();
    }
    spans.sort_unstable();
    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;
    for (start, end) in spans {
        result.push_str(&text[cursor..start]);
        result.push_str(REMOVAL_MARKER);
        cursor = end;
    }
    result.push_str(&text[cursor..]);
    result
}

/// Advisory clustering check, independent of the cap logic. Flags consecutive
/// occurrences of a motif closer together than its cooldown distance; never
/// mutates.
pub fn cooldown_warnings(text: &str) -> Vec<String> {
    let mut warnings = Vec::new();
    for motif in MOTIFS.iter() {
        let offsets: Vec<usize> = motif
            .matcher
            .find_iter(text)
            .map(|m| features::words_before(text, m.start()))
            .collect();
        for pair in offsets.windows(2) {
            let gap = pair[1] - pair[0];
            if gap < motif.cooldown_words {
                warnings.push(format!(
                    "motif '{}' clustered: occurrences {} words apart, cooldown {}",
                    motif.name, gap, motif.cooldown_words,
                ));
            }
        }
    }
    warnings
}
