use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Value};

use crate::features::{self, DocumentFeatures, PatternHit};
use crate::patterns::{PatternCategory, PatternLibrary};
use crate::tuning::TUNING;

// ---------------------------------------------------------------------------
// Category scorers and the composite
//
// Six independent scorers, each clamped to [0, 10], then a fixed-weight
// aggregation. Everything here is a pure function of the text and the
// builtin pattern library.
// ---------------------------------------------------------------------------

// Lowercase letter right after sentence-ending punctuation. A raw generation
// artifact, not a style choice, hence the heaviest fingerprint penalty.
static CASE_BUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+[a-z]").unwrap());

// Adjacent duplicate punctuation. Three dots are an ellipsis; four are a bug.
static DOUBLE_PUNCT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",,|;;|::|\?\?|!!|\.\.\.\.").unwrap());

#[derive(Debug, Clone, Serialize)]
pub struct CategoryScore {
    pub score: f64,
    pub details: BTreeMap<String, Value>,
}

impl CategoryScore {
    fn new(score: f64, details: BTreeMap<String, Value>) -> Self {
        Self {
            score: score.clamp(0.0, 10.0),
            details,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Exceptional,
    Excellent,
    Strong,
    Solid,
    Shaky,
    Slop,
}

impl Tier {
    pub fn from_composite(composite: f64) -> Self {
        if composite >= TUNING.tier_exceptional_min {
            Tier::Exceptional
        } else if composite >= TUNING.tier_excellent_min {
            Tier::Excellent
        } else if composite >= TUNING.tier_strong_min {
            Tier::Strong
        } else if composite >= TUNING.tier_solid_min {
            Tier::Solid
        } else if composite >= TUNING.tier_shaky_min {
            Tier::Shaky
        } else {
            Tier::Slop
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Exceptional => "exceptional",
            Tier::Excellent => "excellent",
            Tier::Strong => "strong",
            Tier::Solid => "solid",
            Tier::Shaky => "shaky",
            Tier::Slop => "slop",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub composite: f64,
    pub tier: Tier,
    pub word_count: usize,
    pub categories: BTreeMap<&'static str, CategoryScore>,
}

// ---------------------------------------------------------------------------
// Individual scorers
// ---------------------------------------------------------------------------

fn variance_score(std_dev: f64) -> f64 {
    if std_dev >= TUNING.variance_full_marks {
        return 10.0;
    }
    if std_dev < TUNING.variance_floor {
        return 4.0;
    }
    let steps = ((TUNING.variance_full_marks - std_dev) / TUNING.variance_step).ceil();
    10.0 - steps
}

fn score_prose(feats: &DocumentFeatures) -> CategoryScore {
    let variance = variance_score(feats.sentence_std_dev);

    let expected_sensory = (feats.word_count as f64 / TUNING.words_per_sensory_ref).max(1.0);
    let sensory = (feats.sensory_hits as f64 / expected_sensory * 10.0).min(10.0);

    let metric_penalty =
        ((feats.medium_ratio - TUNING.metric_ratio_base) * TUNING.metric_ratio_scale).max(0.0);

    let score = TUNING.prose_variance_weight * variance
        + TUNING.prose_sensory_weight * sensory
        + TUNING.prose_rhythm_weight * (10.0 - metric_penalty);

    let mut details = BTreeMap::new();
    details.insert("sentence_std_dev".into(), json!(feats.sentence_std_dev));
    details.insert("sentence_mean".into(), json!(feats.sentence_mean));
    details.insert("variance_score".into(), json!(variance));
    details.insert("sensory_hits".into(), json!(feats.sensory_hits));
    details.insert("sensory_score".into(), json!(sensory));
    details.insert("medium_ratio".into(), json!(feats.medium_ratio));
    details.insert("metric_penalty".into(), json!(metric_penalty));
    CategoryScore::new(score, details)
}

fn clustering_violations(text: &str, hits: &[PatternHit], cooldown: usize) -> usize {
    let offsets: Vec<usize> = hits
        .iter()
        .map(|h| features::words_before(text, h.start))
        .collect();
    offsets
        .windows(2)
        .filter(|pair| pair[1] - pair[0] < cooldown)
        .count()
}

fn score_behavior(text: &str, feats: &DocumentFeatures, library: &PatternLibrary) -> CategoryScore {
    let mut over_cap = 0usize;
    let mut clustered = 0usize;
    let mut per_tic = BTreeMap::new();

    for rule in library.rules_in(PatternCategory::Tic) {
        let count = feats.match_count(rule.name);
        if let Some(cap) = rule.max_count {
            over_cap += count.saturating_sub(cap);
        }
        if let Some(cooldown) = rule.cooldown_words {
            if !rule.dialogue_only {
                if let Some(hits) = feats.matches.get(rule.name) {
                    clustered += clustering_violations(text, hits, cooldown);
                }
            }
        }
        if count > 0 {
            per_tic.insert(rule.name.to_string(), json!(count));
        }
    }

    let violations = (over_cap + clustered) as f64;
    let score = (10.0 - violations / TUNING.violation_divisor).max(0.0);

    let mut details = BTreeMap::new();
    details.insert("over_cap".into(), json!(over_cap));
    details.insert("clustering".into(), json!(clustered));
    details.insert("tic_counts".into(), Value::Object(per_tic.into_iter().collect()));
    CategoryScore::new(score, details)
}

fn weighted_category_penalty(
    feats: &DocumentFeatures,
    library: &PatternLibrary,
    category: PatternCategory,
) -> f64 {
    library
        .rules_in(category)
        .map(|r| feats.match_count(r.name) as f64 * r.severity)
        .sum()
}

fn score_fingerprint(
    text: &str,
    feats: &DocumentFeatures,
    library: &PatternLibrary,
) -> CategoryScore {
    let mut penalty = 0.0;
    let mut details = BTreeMap::new();

    let clinical = weighted_category_penalty(feats, library, PatternCategory::Clinical);
    penalty += clinical;

    let on_the_nose = weighted_category_penalty(feats, library, PatternCategory::OnTheNose);
    penalty += on_the_nose;

    // Mundanity: bangers per dialogue line. A few land; a quip every third
    // line is a tell.
    let bangers = feats.category_count(library, PatternCategory::Banger);
    let dialogue_lines = feats.dialogue_line_count.max(1);
    let mundanity = bangers as f64 / dialogue_lines as f64;
    if mundanity > TUNING.mundanity_threshold {
        penalty += (mundanity - TUNING.mundanity_threshold) * TUNING.mundanity_scale;
    }

    let purple = feats.category_count(library, PatternCategory::PurpleProse);
    if purple > TUNING.purple_heavy_min {
        penalty += TUNING.purple_heavy_penalty;
    } else if purple > TUNING.purple_light_min {
        penalty += TUNING.purple_light_penalty;
    }

    let ellipses = feats.match_count("ellipsis");
    let dashes = feats.match_count("interruption_dash");
    let stutters = feats.match_count("letter_stutter");
    for (count, max) in [
        (ellipses, TUNING.ellipsis_max),
        (dashes, TUNING.dash_max),
        (stutters, TUNING.stutter_max),
    ] {
        if count > max {
            let excess = count - max;
            penalty += if excess > max {
                TUNING.verbal_tic_heavy_penalty
            } else {
                TUNING.verbal_tic_penalty
            };
        }
    }

    let technobabble = feats.category_count(library, PatternCategory::Technobabble);
    if technobabble > TUNING.technobabble_heavy_min {
        penalty += TUNING.technobabble_heavy_penalty;
    } else if technobabble > TUNING.technobabble_light_min {
        penalty += TUNING.technobabble_light_penalty;
    }

    if feats.echo_word_count > TUNING.echo_word_min {
        penalty += TUNING.echo_word_penalty;
    }

    let summary_endings = feats.match_count("summary_ending");
    if summary_endings > TUNING.summary_ending_min {
        penalty += TUNING.summary_ending_penalty;
    }

    let case_bugs = CASE_BUG_RE.find_iter(text).count();
    if case_bugs > TUNING.case_bug_heavy_min {
        penalty += TUNING.case_bug_heavy_penalty;
    } else if case_bugs > TUNING.case_bug_mid_min {
        penalty += TUNING.case_bug_mid_penalty;
    } else if case_bugs > 0 {
        penalty += TUNING.case_bug_light_penalty;
    }

    let punct_bugs = DOUBLE_PUNCT_RE.find_iter(text).count();
    if punct_bugs > TUNING.punct_bug_heavy_min {
        penalty += TUNING.punct_bug_heavy_penalty;
    } else if punct_bugs > 0 {
        penalty += TUNING.punct_bug_light_penalty;
    }

    // Messiness reads human only in moderation; over-injection zeroes the
    // bonus entirely.
    let markers = feats.category_count(library, PatternCategory::Messiness);
    let bonus = if ellipses > TUNING.ellipsis_overuse || dashes > TUNING.dash_overuse {
        0.0
    } else {
        (markers as f64 * TUNING.messiness_bonus_per_marker).min(TUNING.messiness_bonus_cap)
    };

    details.insert("clinical_penalty".into(), json!(clinical));
    details.insert("on_the_nose_penalty".into(), json!(on_the_nose));
    details.insert("mundanity_ratio".into(), json!(mundanity));
    details.insert("purple_matches".into(), json!(purple));
    details.insert("ellipses".into(), json!(ellipses));
    details.insert("dashes".into(), json!(dashes));
    details.insert("stutters".into(), json!(stutters));
    details.insert("technobabble_matches".into(), json!(technobabble));
    details.insert("echo_words".into(), json!(feats.echo_word_count));
    details.insert("summary_endings".into(), json!(summary_endings));
    details.insert("case_bugs".into(), json!(case_bugs));
    details.insert("punct_bugs".into(), json!(punct_bugs));
    details.insert("messiness_bonus".into(), json!(bonus));
    CategoryScore::new(10.0 - penalty + bonus, details)
}

fn score_structure(feats: &DocumentFeatures, library: &PatternLibrary) -> CategoryScore {
    let reset_penalty = weighted_category_penalty(feats, library, PatternCategory::Reset);
    let resets = feats.category_count(library, PatternCategory::Reset);

    let mut details = BTreeMap::new();
    details.insert("reset_matches".into(), json!(resets));
    details.insert("scene_count".into(), json!(feats.scenes.len()));
    CategoryScore::new(10.0 - reset_penalty, details)
}

fn score_character(feats: &DocumentFeatures, library: &PatternLibrary) -> CategoryScore {
    let on_the_nose = feats.category_count(library, PatternCategory::OnTheNose);
    let markers = feats.category_count(library, PatternCategory::Messiness);
    let bonus =
        (markers as f64 * TUNING.messiness_bonus_per_marker).min(TUNING.character_messiness_cap);

    let score = 10.0 - on_the_nose as f64 * TUNING.character_otn_penalty + bonus;

    let mut details = BTreeMap::new();
    details.insert("on_the_nose_matches".into(), json!(on_the_nose));
    details.insert("messiness_bonus".into(), json!(bonus));
    details.insert("speaking_characters".into(), json!(feats.dialogue.len()));
    details.insert(
        "subtext_absence_matches".into(),
        json!(feats.category_count(library, PatternCategory::SubtextAbsence)),
    );
    details.insert(
        "stakes_matches".into(),
        json!(feats.category_count(library, PatternCategory::Stakes)),
    );
    details.insert(
        "uncontracted_matches".into(),
        json!(feats.category_count(library, PatternCategory::DialogueUniformity)),
    );
    CategoryScore::new(score, details)
}

fn score_uniqueness() -> CategoryScore {
    // Requires a corpus of previously produced documents. Extension point;
    // held at a fixed baseline until that integration exists.
    let mut details = BTreeMap::new();
    details.insert("status".into(), json!("baseline; corpus comparison not wired"));
    CategoryScore::new(TUNING.uniqueness_baseline, details)
}

// ---------------------------------------------------------------------------
// Composite
// ---------------------------------------------------------------------------

pub fn score_document(text: &str) -> ScoreReport {
    let library = PatternLibrary::builtin();
    let feats = features::extract(text, library);

    let mut categories = BTreeMap::new();
    categories.insert("structure", score_structure(&feats, library));
    categories.insert("prose", score_prose(&feats));
    categories.insert("character", score_character(&feats, library));
    categories.insert("behavior", score_behavior(text, &feats, library));
    categories.insert("ai_fingerprint", score_fingerprint(text, &feats, library));
    categories.insert("uniqueness", score_uniqueness());

    let weighted = categories["structure"].score * TUNING.weight_structure
        + categories["prose"].score * TUNING.weight_prose
        + categories["character"].score * TUNING.weight_character
        + categories["behavior"].score * TUNING.weight_behavior
        + categories["ai_fingerprint"].score * TUNING.weight_fingerprint
        + categories["uniqueness"].score * TUNING.weight_uniqueness;
    let composite = (weighted * 100.0).round() / 100.0;

    ScoreReport {
        composite,
        tier: Tier::from_composite(composite),
        word_count: feats.word_count,
        categories,
    }
}
