use greenlight::score_document;
use greenlight::Tier;

const POOL: [&str; 20] = [
    "river", "stone", "morning", "walked", "along", "road", "window", "curtain", "garden",
    "table", "letter", "rain", "field", "door", "evening", "paper", "coat", "train", "orchard",
    "bridge",
];

const SENSORY: [&str; 4] = ["scent", "creak", "gritty", "bitter"];

/// Prose with alternating short and long sentences (std dev well above 6)
/// and a sensory reference every tenth sentence.
fn clean_prose(total_words: usize) -> String {
    let mut sentences = Vec::new();
    let mut produced = 0;
    let mut word_idx = 0usize;
    let mut i = 0usize;
    while produced < total_words {
        let len = if i % 2 == 0 { 4 + i % 3 } else { 20 + i % 6 };
        let mut words = vec!["The".to_string()];
        for _ in 1..len {
            words.push(POOL[word_idx % POOL.len()].to_string());
            word_idx += 1;
        }
        if i % 10 == 0 {
            words[1] = SENSORY[(i / 10) % SENSORY.len()].to_string();
        }
        produced += len;
        sentences.push(format!("{}.", words.join(" ")));
        i += 1;
    }
    sentences.join(" ")
}

fn robotic_prose(sentence_count: usize) -> String {
    let mut sentences = Vec::new();
    let mut word_idx = 0usize;
    for _ in 0..sentence_count {
        let mut words = vec!["The".to_string()];
        for _ in 1..10 {
            words.push(POOL[word_idx % POOL.len()].to_string());
            word_idx += 1;
        }
        sentences.push(format!("{}.", words.join(" ")));
    }
    sentences.join(" ")
}

#[test]
fn scoring_is_deterministic() {
    let text = clean_prose(2000);
    let a = score_document(&text);
    let b = score_document(&text);
    assert_eq!(a.composite.to_bits(), b.composite.to_bits());
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn clean_prose_scores_high() {
    let text = clean_prose(5000);
    let report = score_document(&text);
    assert!(
        report.categories["prose"].score >= 9.0,
        "prose should be >= 9, got {}",
        report.categories["prose"].score
    );
    assert!(
        report.categories["ai_fingerprint"].score >= 9.0,
        "fingerprint should be >= 9, got {}",
        report.categories["ai_fingerprint"].score
    );
}

#[test]
fn robotic_prose_scores_low() {
    let text = robotic_prose(120);
    let report = score_document(&text);
    assert!(
        report.categories["prose"].score <= 5.0,
        "uniform 10-word sentences should score <= 5, got {}",
        report.categories["prose"].score
    );
}

#[test]
fn reset_phrase_costs_exactly_two_structure_points() {
    let baseline = clean_prose(1500);
    let clean = score_document(&baseline);
    assert_eq!(clean.categories["structure"].score, 10.0);

    let tainted = format!("{baseline} Meanwhile, back at the ranch, nothing had changed.");
    let report = score_document(&tainted);
    assert_eq!(report.categories["structure"].score, 8.0);
}

#[test]
fn adversarial_input_stays_in_bounds() {
    let text = "meanwhile, back at the ranch... as you know, I utilize the quantum mainframe. "
        .repeat(2000);
    let report = score_document(&text);
    for (name, cat) in &report.categories {
        assert!(
            (0.0..=10.0).contains(&cat.score),
            "{name} out of bounds: {}",
            cat.score
        );
    }
    assert!((0.0..=10.0).contains(&report.composite));
}

#[test]
fn empty_input_degrades_gracefully() {
    let report = score_document("");
    assert_eq!(report.word_count, 0);
    assert!((0.0..=10.0).contains(&report.composite));

    let report = score_document("One line only.");
    assert!((0.0..=10.0).contains(&report.composite));
}

#[test]
fn tier_bands() {
    assert_eq!(Tier::from_composite(9.5), Tier::Exceptional);
    assert_eq!(Tier::from_composite(9.49), Tier::Excellent);
    assert_eq!(Tier::from_composite(9.0), Tier::Excellent);
    assert_eq!(Tier::from_composite(8.0), Tier::Strong);
    assert_eq!(Tier::from_composite(7.5), Tier::Solid);
    assert_eq!(Tier::from_composite(6.0), Tier::Shaky);
    assert_eq!(Tier::from_composite(5.99), Tier::Slop);
}

#[test]
fn composite_weights_sum_to_one() {
    // A document scoring 10 in every category except the uniqueness stub
    // should land at 10*0.9 + 7.5*0.1.
    let text = clean_prose(5000);
    let report = score_document(&text);
    if report
        .categories
        .iter()
        .filter(|(name, _)| **name != "uniqueness")
        .all(|(_, c)| c.score == 10.0)
    {
        assert_eq!(report.composite, 9.75);
    }
}

#[test]
fn clinical_vocabulary_lowers_fingerprint() {
    let baseline = clean_prose(1200);
    let clean = score_document(&baseline);
    let tainted = format!(
        "{baseline} They utilize the vehicle. They commence the journey. \
         They facilitate the exchange. Subsequently they terminate it."
    );
    let report = score_document(&tainted);
    assert!(
        report.categories["ai_fingerprint"].score < clean.categories["ai_fingerprint"].score,
        "clinical vocabulary should cost fingerprint points"
    );
}

#[test]
fn dialogue_attribution_feeds_character_scoring() {
    let text = "\
INT. KITCHEN - NIGHT

JANE
As you know, our father left when I was seven.
What I'm trying to say is that I never forgave him.

MIKE
(quietly)
That's exactly my point.

The kettle screams.";
    let report = score_document(text);
    // Three on-the-nose matches at 0.5 each.
    assert_eq!(report.categories["character"].score, 8.5);
}

#[test]
fn json_report_shape() {
    let report = score_document(&clean_prose(800));
    let json = serde_json::to_string_pretty(&report).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(parsed.get("composite").is_some());
    assert!(parsed.get("tier").is_some());
    assert!(parsed.get("word_count").is_some());
    let categories = parsed.get("categories").unwrap();
    for name in [
        "structure",
        "prose",
        "character",
        "behavior",
        "ai_fingerprint",
        "uniqueness",
    ] {
        assert!(categories.get(name).is_some(), "missing category {name}");
        assert!(categories[name].get("score").is_some());
        assert!(categories[name].get("details").is_some());
    }
}
