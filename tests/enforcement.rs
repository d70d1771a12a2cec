use greenlight::{cooldown_warnings, enforce_budget, TicBudgetState, REMOVAL_MARKER};

fn filler(words: usize) -> String {
    let mut out = Vec::with_capacity(words);
    for i in 0..words {
        out.push(if i % 2 == 0 { "the" } else { "street" });
    }
    out.join(" ")
}

#[test]
fn over_injected_motif_is_truncated() {
    let text = "He checks his watch. ".repeat(10);
    let outcome = enforce_budget(&text, TicBudgetState::new());

    let tally = outcome
        .tallies
        .iter()
        .find(|t| t.motif == "watch_check")
        .expect("watch_check tally");
    assert_eq!(tally.kept, 4);
    assert_eq!(tally.removed, 6);
    assert_eq!(outcome.state.count("watch_check"), 4);

    assert_eq!(outcome.text.matches(REMOVAL_MARKER).count(), 6);
    assert_eq!(outcome.text.matches("checks his watch").count(), 4);

    let watch_warnings: Vec<_> = outcome
        .warnings
        .iter()
        .filter(|w| w.contains("watch_check"))
        .collect();
    assert_eq!(watch_warnings.len(), 1);
    assert_eq!(outcome.warnings.len(), 1);
}

#[test]
fn first_occurrences_survive_in_document_order() {
    let text = format!(
        "She checks her watch at dawn. {} He checks his watch at noon. {} \
         They check. She checks her watch again. She checks her watch at dusk. \
         She checks her watch one last time.",
        filler(20),
        filler(20),
    );
    let outcome = enforce_budget(&text, TicBudgetState::new());
    // Five matches, cap four: only the last is cut.
    assert!(outcome.text.contains("watch at dawn"));
    assert!(outcome.text.contains("watch at noon"));
    assert!(!outcome.text.contains("watch one last time"));
}

#[test]
fn under_cap_pass_is_untouched() {
    let text = "He checks his watch. The train leaves without him.";
    let outcome = enforce_budget(text, TicBudgetState::new());
    assert_eq!(outcome.text, text);
    assert!(outcome.warnings.is_empty());
    assert_eq!(outcome.state.count("watch_check"), 1);
}

#[test]
fn budget_is_monotonic_and_capped() {
    let pass = "He checks his watch. ".repeat(5);
    let mut state = TicBudgetState::new();
    for _ in 0..4 {
        let outcome = enforce_budget(&pass, state);
        state = outcome.state;
        assert!(state.count("watch_check") <= 4);
    }
    assert_eq!(state.count("watch_check"), 4);
}

#[test]
fn whole_document_and_threaded_passes_agree() {
    let p1 = "She lights a cigarette. ".repeat(3);
    let p2 = "She lights a cigarette. ".repeat(4);

    let whole = enforce_budget(&format!("{p1}{p2}"), TicBudgetState::new());

    let first = enforce_budget(&p1, TicBudgetState::new());
    let second = enforce_budget(&p2, first.state);

    assert_eq!(whole.state, second.state);
    assert_eq!(whole.state.count("cigarette_light"), 4);
}

#[test]
fn exhausted_budget_removes_everything() {
    let mut state = TicBudgetState::new();
    state.counts.insert("watch_check".to_string(), 4);
    let outcome = enforce_budget("He checks his watch twice. He checks his watch.", state);
    assert_eq!(outcome.state.count("watch_check"), 4);
    assert_eq!(outcome.text.matches(REMOVAL_MARKER).count(), 2);
    assert_eq!(outcome.warnings.len(), 1);
}

#[test]
fn clustered_occurrences_are_flagged() {
    let text = format!(
        "He checks his watch. {} He checks his watch.",
        filler(30)
    );
    let warnings = cooldown_warnings(&text);
    assert!(
        warnings.iter().any(|w| w.contains("watch_check")),
        "expected a clustering warning, got {warnings:?}"
    );
}

#[test]
fn spaced_occurrences_are_not_flagged() {
    let text = format!(
        "He checks his watch. {} He checks his watch.",
        filler(900)
    );
    assert!(cooldown_warnings(&text).is_empty());
}

#[test]
fn state_round_trips_through_json() {
    let outcome = enforce_budget(
        &"He checks his watch. ".repeat(3),
        TicBudgetState::new(),
    );
    let json = serde_json::to_string(&outcome.state).unwrap();
    let restored: TicBudgetState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, outcome.state);
}
