// ---------------------------------------------------------------------------
// Tuning constants
//
// Every weight, threshold, cap, and band boundary lives here so the scorers
// contain no inline magic numbers. Values carried over from the production
// pipeline; the loop-detector thresholds and tier bounds in particular are
// deliberate defaults, not derived quantities.
// ---------------------------------------------------------------------------

pub struct Tuning {
    // Sentence features
    pub min_sentences: usize,
    pub short_sentence_max: usize,
    pub medium_sentence_max: usize,

    // Prose mechanics
    pub variance_full_marks: f64,
    pub variance_floor: f64,
    pub variance_step: f64,
    pub words_per_sensory_ref: f64,
    pub metric_ratio_base: f64,
    pub metric_ratio_scale: f64,
    pub prose_variance_weight: f64,
    pub prose_sensory_weight: f64,
    pub prose_rhythm_weight: f64,

    // AI-fingerprint penalties (per-match weights for clinical and
    // on-the-nose matches come from the rules' severity)
    pub mundanity_threshold: f64,
    pub mundanity_scale: f64,
    pub purple_light_min: usize,
    pub purple_light_penalty: f64,
    pub purple_heavy_min: usize,
    pub purple_heavy_penalty: f64,
    pub ellipsis_max: usize,
    pub dash_max: usize,
    pub stutter_max: usize,
    pub verbal_tic_penalty: f64,
    pub verbal_tic_heavy_penalty: f64,
    pub technobabble_light_min: usize,
    pub technobabble_light_penalty: f64,
    pub technobabble_heavy_min: usize,
    pub technobabble_heavy_penalty: f64,
    pub echo_word_min: usize,
    pub echo_word_penalty: f64,
    pub summary_ending_min: usize,
    pub summary_ending_penalty: f64,
    pub case_bug_light_penalty: f64,
    pub case_bug_mid_min: usize,
    pub case_bug_mid_penalty: f64,
    pub case_bug_heavy_min: usize,
    pub case_bug_heavy_penalty: f64,
    pub punct_bug_light_penalty: f64,
    pub punct_bug_heavy_min: usize,
    pub punct_bug_heavy_penalty: f64,
    pub messiness_bonus_per_marker: f64,
    pub messiness_bonus_cap: f64,
    pub ellipsis_overuse: usize,
    pub dash_overuse: usize,

    // Character dynamics
    pub character_otn_penalty: f64,
    pub character_messiness_cap: f64,

    // Behavioral control
    pub violation_divisor: f64,

    // Cross-document uniqueness (stub baseline, see score.rs)
    pub uniqueness_baseline: f64,

    // Composite weights (sum to 1.0)
    pub weight_structure: f64,
    pub weight_prose: f64,
    pub weight_character: f64,
    pub weight_behavior: f64,
    pub weight_fingerprint: f64,
    pub weight_uniqueness: f64,

    // Tier bounds, inclusive lower edges, descending
    pub tier_exceptional_min: f64,
    pub tier_excellent_min: f64,
    pub tier_strong_min: f64,
    pub tier_solid_min: f64,
    pub tier_shaky_min: f64,

    // Loop detector
    pub keyword_min_len: usize,
    pub overlap_accumulate_threshold: f64,
    pub location_overlap_threshold: f64,
    pub location_increment: f64,
    pub loop_verdict_threshold: f64,
}

pub static TUNING: Tuning = Tuning {
    min_sentences: 5,
    short_sentence_max: 5,
    medium_sentence_max: 14,

    variance_full_marks: 6.0,
    variance_floor: 3.5,
    variance_step: 0.5,
    words_per_sensory_ref: 300.0,
    metric_ratio_base: 0.5,
    metric_ratio_scale: 4.0,
    prose_variance_weight: 0.5,
    prose_sensory_weight: 0.3,
    prose_rhythm_weight: 0.2,

    mundanity_threshold: 0.30,
    mundanity_scale: 10.0,
    purple_light_min: 5,
    purple_light_penalty: 1.5,
    purple_heavy_min: 10,
    purple_heavy_penalty: 3.0,
    ellipsis_max: 20,
    dash_max: 15,
    stutter_max: 10,
    verbal_tic_penalty: 1.0,
    verbal_tic_heavy_penalty: 2.0,
    technobabble_light_min: 3,
    technobabble_light_penalty: 1.0,
    technobabble_heavy_min: 8,
    technobabble_heavy_penalty: 2.0,
    echo_word_min: 10,
    echo_word_penalty: 1.5,
    summary_ending_min: 5,
    summary_ending_penalty: 1.5,
    case_bug_light_penalty: 1.5,
    case_bug_mid_min: 5,
    case_bug_mid_penalty: 3.0,
    case_bug_heavy_min: 15,
    case_bug_heavy_penalty: 5.0,
    punct_bug_light_penalty: 1.0,
    punct_bug_heavy_min: 10,
    punct_bug_heavy_penalty: 2.0,
    messiness_bonus_per_marker: 0.1,
    messiness_bonus_cap: 1.5,
    ellipsis_overuse: 50,
    dash_overuse: 30,

    character_otn_penalty: 0.5,
    character_messiness_cap: 1.5,

    violation_divisor: 2.0,

    uniqueness_baseline: 7.5,

    weight_structure: 0.20,
    weight_prose: 0.20,
    weight_character: 0.20,
    weight_behavior: 0.15,
    weight_fingerprint: 0.15,
    weight_uniqueness: 0.10,

    tier_exceptional_min: 9.5,
    tier_excellent_min: 9.0,
    tier_strong_min: 8.0,
    tier_solid_min: 7.0,
    tier_shaky_min: 6.0,

    keyword_min_len: 6,
    overlap_accumulate_threshold: 0.5,
    location_overlap_threshold: 0.4,
    location_increment: 0.3,
    loop_verdict_threshold: 0.7,
};
