use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::patterns::{PatternCategory, PatternLibrary};
use crate::tuning::TUNING;

// ---------------------------------------------------------------------------
// Feature extraction
//
// Pure functions over the raw text. A DocumentFeatures value is owned by a
// single scoring invocation and never persisted.
// ---------------------------------------------------------------------------

static SENTENCE_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?]["'\u{201D}\u{2019})\]]*(?:\s|$)"#).unwrap());

static SPEAKER_CUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z .'\-]{0,29}$").unwrap());

const SCENE_HEADING_PREFIXES: [&str; 2] = ["INT.", "EXT."];

const TRANSITIONS: [&str; 5] = [
    "FADE IN:",
    "FADE OUT.",
    "CUT TO:",
    "SMASH CUT TO:",
    "DISSOLVE TO:",
];

#[derive(Debug, Clone)]
pub struct SceneInfo {
    pub heading: String,
    pub word_count: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct PatternHit {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug)]
pub struct DocumentFeatures {
    pub word_count: usize,
    pub sentence_lengths: Vec<usize>,
    pub sentence_mean: f64,
    pub sentence_std_dev: f64,
    /// Share of sentences in the 6-14 word bucket.
    pub medium_ratio: f64,
    pub scenes: Vec<SceneInfo>,
    pub dialogue: BTreeMap<String, Vec<String>>,
    pub dialogue_line_count: usize,
    /// All matches per rule name. Offsets for dialogue-scoped rules index
    /// into the concatenated dialogue text, not the document.
    pub matches: HashMap<&'static str, Vec<PatternHit>>,
    pub sensory_hits: usize,
    /// Adjacent case-insensitive duplicates of words with four or more
    /// letters. Counted by token scan; the regex crate has no backreferences.
    pub echo_word_count: usize,
}

impl DocumentFeatures {
    pub fn match_count(&self, rule: &str) -> usize {
        self.matches.get(rule).map_or(0, Vec::len)
    }

    pub fn category_count(&self, library: &PatternLibrary, category: PatternCategory) -> usize {
        library
            .rules_in(category)
            .map(|r| self.match_count(r.name))
            .sum()
    }
}

pub fn extract(text: &str, library: &PatternLibrary) -> DocumentFeatures {
    let word_count = count_words(text);
    let sentence_lengths = sentence_lengths(text);
    let (mean, std_dev, medium_ratio) = sentence_stats(&sentence_lengths);

    let scenes = split_scenes(text);
    let dialogue = attribute_dialogue(text);
    let dialogue_line_count = dialogue.values().map(Vec::len).sum();
    let dialogue_text = dialogue
        .values()
        .flat_map(|lines| lines.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("\n");

    let mut matches: HashMap<&'static str, Vec<PatternHit>> = HashMap::new();
    for rule in library.rules() {
        let haystack = if rule.dialogue_only { &dialogue_text } else { text };
        let hits: Vec<PatternHit> = rule
            .matcher
            .find_iter(haystack)
            .map(|m| PatternHit {
                start: m.start(),
                end: m.end(),
            })
            .collect();
        matches.insert(rule.name, hits);
    }

    let sensory_hits = library
        .rules_in(PatternCategory::Sensory)
        .map(|r| matches.get(r.name).map_or(0, Vec::len))
        .sum();

    DocumentFeatures {
        word_count,
        sentence_lengths,
        sentence_mean: mean,
        sentence_std_dev: std_dev,
        medium_ratio,
        scenes,
        dialogue,
        dialogue_line_count,
        matches,
        sensory_hits,
        echo_word_count: count_echo_words(text),
    }
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Word offset of a byte position, for cooldown-distance math.
pub fn words_before(text: &str, byte_offset: usize) -> usize {
    let end = byte_offset.min(text.len());
    count_words(&text[..end])
}

fn sentence_lengths(text: &str) -> Vec<usize> {
    SENTENCE_SPLIT_RE
        .split(text)
        .map(|s| count_words(s.trim()))
        .filter(|&n| n > 0)
        .collect()
}

fn sentence_stats(lengths: &[usize]) -> (f64, f64, f64) {
    // Too few sentences to say anything about rhythm.
    if lengths.len() < TUNING.min_sentences {
        return (0.0, 0.0, 0.0);
    }
    let n = lengths.len() as f64;
    let mean = lengths.iter().sum::<usize>() as f64 / n;
    let variance = lengths
        .iter()
        .map(|&len| (len as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    let medium = lengths
        .iter()
        .filter(|&&len| len > TUNING.short_sentence_max && len <= TUNING.medium_sentence_max)
        .count();
    (mean, variance.sqrt(), medium as f64 / n)
}

fn is_scene_heading(line: &str) -> bool {
    SCENE_HEADING_PREFIXES
        .iter()
        .any(|p| line.trim_start().starts_with(p))
}

fn split_scenes(text: &str) -> Vec<SceneInfo> {
    let mut scenes: Vec<SceneInfo> = Vec::new();
    for line in text.lines() {
        if is_scene_heading(line) {
            scenes.push(SceneInfo {
                heading: line.trim().to_string(),
                word_count: 0,
            });
        } else if let Some(current) = scenes.last_mut() {
            current.word_count += count_words(line);
        }
    }
    scenes
}

fn speaker_cue(line: &str) -> Option<String> {
    let trimmed = line.trim();
    // Strip a trailing extension like (V.O.) or (CONT'D).
    let name = match trimmed.find('(') {
        Some(idx) => trimmed[..idx].trim_end(),
        None => trimmed,
    };
    if name.is_empty()
        || is_scene_heading(name)
        || TRANSITIONS.contains(&name)
        || name.split_whitespace().count() > 3
        || !SPEAKER_CUE_RE.is_match(name)
    {
        return None;
    }
    Some(name.to_string())
}

fn attribute_dialogue(text: &str) -> BTreeMap<String, Vec<String>> {
    let mut dialogue: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut speaker: Option<String> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || is_scene_heading(trimmed) {
            speaker = None;
            continue;
        }
        if let Some(cue) = speaker_cue(trimmed) {
            dialogue.entry(cue.clone()).or_default();
            speaker = Some(cue);
            continue;
        }
        if trimmed.starts_with('(') {
            continue;
        }
        if let Some(name) = &speaker {
            if let Some(lines) = dialogue.get_mut(name) {
                lines.push(trimmed.to_string());
            }
        }
    }

    dialogue.retain(|_, lines| !lines.is_empty());
    dialogue
}

fn count_echo_words(text: &str) -> usize {
    let mut count = 0;
    let mut prev: Option<String> = None;
    for token in text.split_whitespace() {
        let word: String = token
            .chars()
            .filter(|c| c.is_alphabetic())
            .flat_map(char::to_lowercase)
            .collect();
        if word.len() >= 4 && prev.as_deref() == Some(word.as_str()) {
            count += 1;
        }
        prev = if word.is_empty() { None } else { Some(word) };
    }
    count
}
