use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Pattern library
//
// Every lexical signal the engine looks for is a named PatternRule built once
// at startup. Scorers and the enforcer consume rules by category or by name;
// nothing else in the crate compiles its own lexical patterns.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternCategory {
    Clinical,
    OnTheNose,
    Banger,
    PurpleProse,
    Technobabble,
    Tic,
    Sensory,
    Messiness,
    Reset,
    Stakes,
    ThematicHammer,
    SubtextAbsence,
    DialogueUniformity,
}

#[derive(Debug)]
pub struct PatternRule {
    pub name: &'static str,
    pub category: PatternCategory,
    pub matcher: Regex,
    pub severity: f64,
    /// Per-document cap before the match count is considered a violation.
    pub max_count: Option<usize>,
    /// Minimum word gap between occurrences before clustering is flagged.
    pub cooldown_words: Option<usize>,
    /// Matched against concatenated dialogue instead of the full text.
    pub dialogue_only: bool,
}

impl PatternRule {
    fn raw(name: &'static str, category: PatternCategory, pattern: &str) -> Self {
        Self {
            name,
            category,
            matcher: Regex::new(pattern).unwrap(),
            severity: 1.0,
            max_count: None,
            cooldown_words: None,
            dialogue_only: false,
        }
    }

    fn word_set(name: &'static str, category: PatternCategory, words: &[&str]) -> Self {
        let alt = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        Self::raw(name, category, &format!("(?i)\\b(?:{alt})\\b"))
    }

    fn phrase_set(name: &'static str, category: PatternCategory, phrases: &[&str]) -> Self {
        let alt = phrases
            .iter()
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|");
        Self::raw(name, category, &format!("(?i)(?:{alt})"))
    }

    fn cap(mut self, max_count: usize) -> Self {
        self.max_count = Some(max_count);
        self
    }

    fn cooldown(mut self, words: usize) -> Self {
        self.cooldown_words = Some(words);
        self
    }

    fn dialogue(mut self) -> Self {
        self.dialogue_only = true;
        self
    }

    fn severity(mut self, severity: f64) -> Self {
        self.severity = severity;
        self
    }
}

pub struct PatternLibrary {
    rules: Vec<PatternRule>,
}

impl PatternLibrary {
    pub fn builtin() -> &'static PatternLibrary {
        &LIBRARY
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn rules_in(&self, category: PatternCategory) -> impl Iterator<Item = &PatternRule> {
        self.rules.iter().filter(move |r| r.category == category)
    }

    pub fn get(&self, name: &str) -> Option<&PatternRule> {
        self.rules.iter().find(|r| r.name == name)
    }
}

static LIBRARY: Lazy<PatternLibrary> = Lazy::new(|| PatternLibrary {
    rules: build_rules(),
});

fn build_rules() -> Vec<PatternRule> {
    vec![
        // Clinical vocabulary that never survives a human dialogue pass.
        PatternRule::word_set(
            "clinical_vocab",
            PatternCategory::Clinical,
            &[
                "utilize",
                "utilizes",
                "utilizing",
                "facilitate",
                "facilitates",
                "commence",
                "commences",
                "terminate",
                "approximately",
                "regarding",
                "subsequently",
                "additionally",
                "furthermore",
                "demonstrate",
                "demonstrates",
                "indicates",
                "ascertain",
                "endeavor",
                "prior to",
                "in order to",
                "at this juncture",
            ],
        )
        .severity(0.5),
        // Characters announcing the subtext out loud.
        PatternRule::phrase_set(
            "on_the_nose",
            PatternCategory::OnTheNose,
            &[
                "as you know",
                "what i'm trying to say is",
                "you know what your problem is",
                "i never told you this, but",
                "do you remember when we",
                "that's exactly my point",
                "i just need you to understand",
                "this reminds me of when",
                "let me be perfectly clear",
            ],
        )
        .severity(0.3)
        .dialogue(),
        // Quotable-quip scaffolding; fine once, mechanical in bulk.
        PatternRule::phrase_set(
            "banger_quip",
            PatternCategory::Banger,
            &[
                "that's the thing about",
                "sometimes the only way",
                "funny thing about",
                "that's what they don't tell you",
                "we were never really",
                "turns out,",
                "here's what nobody",
            ],
        )
        .dialogue(),
        PatternRule::word_set(
            "purple_prose",
            PatternCategory::PurpleProse,
            &[
                "gossamer",
                "alabaster",
                "cerulean",
                "porcelain skin",
                "raven hair",
                "a single tear",
                "shattered into a thousand",
                "heart pounding like",
                "the weight of the world",
                "time seemed to stop",
                "electricity between them",
                "golden light bathed",
                "impossibly beautiful",
            ],
        ),
        PatternRule::word_set(
            "technobabble",
            PatternCategory::Technobabble,
            &[
                "quantum",
                "neural pathways",
                "recalibrate",
                "mainframe",
                "triangulate",
                "satellite uplink",
                "encrypted channel",
                "override the system",
                "bypass the firewall",
            ],
        ),
        // Tracked props and gestures. Caps and cooldowns are per document.
        PatternRule::raw(
            "watch_check",
            PatternCategory::Tic,
            r"(?i)\b(?:checks?|checking|glances? at|looks? at) (?:his|her|their|the) watch\b",
        )
        .cap(2)
        .cooldown(800),
        PatternRule::raw(
            "cigarette_light",
            PatternCategory::Tic,
            r"(?i)\b(?:lights?|lighting) (?:a|another|his|her|their) cigarette\b",
        )
        .cap(3)
        .cooldown(600),
        PatternRule::raw(
            "deep_breath",
            PatternCategory::Tic,
            r"(?i)\btakes? a (?:deep|long|slow) breath\b",
        )
        .cap(4)
        .cooldown(500),
        PatternRule::raw(
            "hair_rake",
            PatternCategory::Tic,
            r"(?i)\bruns? (?:a|his|her|their) (?:hand|fingers) through (?:his|her|their) hair\b",
        )
        .cap(3)
        .cooldown(700),
        PatternRule::raw(
            "shared_look",
            PatternCategory::Tic,
            r"(?i)\bexchanges? (?:a )?(?:look|glance)s?\b",
        )
        .cap(4)
        .cooldown(500),
        PatternRule::raw("hard_swallow", PatternCategory::Tic, r"(?i)\bswallows? hard\b")
            .cap(3)
            .cooldown(600),
        // Non-visual senses only; visual description is assumed abundant.
        PatternRule::word_set(
            "sense_smell",
            PatternCategory::Sensory,
            &[
                "smell", "smells", "scent", "odor", "aroma", "stench", "reek", "musty",
                "acrid",
            ],
        ),
        PatternRule::word_set(
            "sense_sound",
            PatternCategory::Sensory,
            &[
                "creak", "creaks", "rustle", "rustles", "thud", "clatter", "drone",
                "buzzing", "echoes", "hiss", "murmur",
            ],
        ),
        PatternRule::word_set(
            "sense_touch",
            PatternCategory::Sensory,
            &[
                "gritty", "clammy", "coarse", "slick", "sticky", "damp", "jagged",
                "threadbare", "scalding",
            ],
        ),
        PatternRule::word_set(
            "sense_taste",
            PatternCategory::Sensory,
            &[
                "bitter", "sour", "salty", "metallic taste", "tastes like", "aftertaste",
                "copper on the tongue",
            ],
        ),
        // Verbal messiness markers; human-like only in moderation.
        PatternRule::raw("ellipsis", PatternCategory::Messiness, r"\.\.\."),
        PatternRule::raw("interruption_dash", PatternCategory::Messiness, r"--|\u{2014}"),
        PatternRule::raw("letter_stutter", PatternCategory::Messiness, &stutter_pattern()),
        PatternRule::raw(
            "filler_word",
            PatternCategory::Messiness,
            r"(?i)\b(?:um|uh|er|y'know)\b|(?i)\b(?:i mean|well|look),",
        ),
        // Narrative resets.
        PatternRule::phrase_set(
            "reset_phrase",
            PatternCategory::Reset,
            &[
                "meanwhile, back at",
                "as we saw earlier",
                "once again we find",
                "back to square one",
                "back where it all began",
                "if you're wondering how we got here",
                "which brings us back to",
            ],
        )
        .severity(2.0),
        PatternRule::phrase_set(
            "flashback_frame",
            PatternCategory::Reset,
            &["flashback to", "we flash back", "remember that day when"],
        )
        .severity(2.0),
        PatternRule::phrase_set(
            "stakes_hammer",
            PatternCategory::Stakes,
            &[
                "everything we've worked for",
                "there's no turning back",
                "this ends tonight",
                "the fate of",
                "our last chance",
            ],
        )
        .dialogue(),
        // Summary-ending phrasing; feeds the fingerprint scorer.
        PatternRule::phrase_set(
            "summary_ending",
            PatternCategory::ThematicHammer,
            &[
                "and in that moment",
                "from that day forward",
                "little did he know",
                "little did she know",
                "little did they know",
                "would never be the same",
                "and so, in the end",
            ],
        ),
        PatternRule::phrase_set(
            "subtext_absence",
            PatternCategory::SubtextAbsence,
            &[
                "i'm angry because",
                "i'm scared because",
                "i'm sad because",
                "what i really mean is",
                "to be honest with you, i feel",
            ],
        )
        .dialogue(),
        // Uncontracted speech reads stiff and makes every voice identical.
        PatternRule::word_set(
            "uncontracted_speech",
            PatternCategory::DialogueUniformity,
            &["cannot", "do not", "will not", "should not", "would not"],
        )
        .dialogue(),
    ]
}

// The regex crate has no backreferences, so the stutter pattern is an
// alternation of every "x-x" letter pair.
fn stutter_pattern() -> String {
    let pairs = ('a'..='z')
        .map(|c| format!("{c}-{c}"))
        .collect::<Vec<_>>()
        .join("|");
    format!("(?i)\\b(?:{pairs})")
}
