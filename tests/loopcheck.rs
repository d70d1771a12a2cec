use greenlight::{check_patterns, check_similarity, SequenceSummary};

const SEQUENCE_TWO: &str = "\
INT. WAREHOUSE - NIGHT

Marlowe circles the forklift, counting crates of contraband whiskey.
Rainwater drips through the ceiling onto rusted machinery below.

MARLOWE
Somebody moved the shipment before the inspection.

She pockets the manifest and kills the overhead lights.";

const SEQUENCE_THREE: &str = "\
EXT. HARBOR - DAY

Gulls wheel above the trawlers. Dockworkers haul nets across the pier
while customs officers photograph every container in the morning light.

VOSS
The paperwork says these containers cleared customs yesterday.";

#[test]
fn segment_compared_against_itself_is_a_loop() {
    let prior = vec![SequenceSummary::from_text(1, SEQUENCE_TWO)];
    let report = check_similarity(SEQUENCE_TWO, &prior);
    assert_eq!(report.loop_score, 1.0);
    assert!(report.is_loop);
    assert_eq!(report.echoes.len(), 1);
    assert_eq!(report.echoes[0].sequence_number, 1);
    assert!(report.echoes[0].location_repeat);
}

#[test]
fn unrelated_segments_do_not_loop() {
    let prior = vec![SequenceSummary::from_text(1, SEQUENCE_TWO)];
    let report = check_similarity(SEQUENCE_THREE, &prior);
    assert!(!report.is_loop);
    assert!(report.echoes.is_empty());
    assert_eq!(report.loop_score, 0.0);
}

#[test]
fn empty_prior_list_means_first_pass() {
    let report = check_similarity(SEQUENCE_TWO, &[]);
    assert_eq!(report.loop_score, 0.0);
    assert!(!report.is_loop);
}

#[test]
fn summaries_capture_keywords_and_sluglines() {
    let summary = SequenceSummary::from_text(2, SEQUENCE_TWO);
    assert_eq!(summary.sequence_number, 2);
    assert!(summary.keywords.contains("forklift"));
    assert!(summary.keywords.contains("contraband"));
    // Below the six-letter floor.
    assert!(!summary.keywords.contains("night"));
    assert_eq!(summary.sluglines, vec!["INT. WAREHOUSE - NIGHT"]);
}

#[test]
fn reset_phrasing_is_always_an_issue() {
    let text = "Meanwhile, back at the warehouse, Marlowe counts the crates again.";
    let report = check_patterns(text, 1);
    assert!(!report.valid);
    assert!(report.issues[0].contains("reset phrasing"));
}

#[test]
fn opening_image_is_fine_in_the_first_sequence() {
    let text = "FADE IN:\n\nEXT. HARBOR - DAY\n\nWe first meet VOSS on the pier.";
    assert!(check_patterns(text, 1).valid);

    let late = check_patterns(text, 3);
    assert!(!late.valid);
    assert!(late
        .issues
        .iter()
        .any(|i| i.contains("opening-image language in sequence 3")));
}

#[test]
fn summary_round_trips_through_json() {
    let summary = SequenceSummary::from_text(4, SEQUENCE_THREE);
    let json = serde_json::to_string(&summary).unwrap();
    let restored: SequenceSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.sequence_number, 4);
    assert_eq!(restored.keywords, summary.keywords);
    assert_eq!(restored.sluglines, summary.sluglines);
}
