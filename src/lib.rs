//! greenlight - quality control and consistency enforcement for generated
//! screenplays.
//!
//! Two jobs: score a document against a battery of heuristics that detect
//! AI-sounding writing, and keep multi-pass generation honest by enforcing
//! hard budgets on recurring motifs and flagging narrative loops. The engine
//! consumes plain text plus small caller-threaded state values and returns
//! scores, mutated text, and warnings; it never generates or persists
//! anything itself.

pub mod batch;
pub mod budget;
pub mod features;
pub mod loopcheck;
pub mod patterns;
pub mod score;
pub mod tuning;

pub use budget::{
    cooldown_warnings, enforce_budget, EnforcementOutcome, MotifTally, TicBudgetState,
    REMOVAL_MARKER,
};
pub use loopcheck::{
    check_patterns, check_similarity, PatternReport, SequenceEcho, SequenceSummary,
    SimilarityReport,
};
pub use patterns::{PatternCategory, PatternLibrary, PatternRule};
pub use score::{score_document, CategoryScore, ScoreReport, Tier};
