pub mod engine;
pub mod rank;
pub mod scoring;
pub mod selection;

pub use engine::MatchEngine;
pub use rank::{filter_candidates, rank, CandidateFilter};
pub use scoring::{candidate_pairs, score_pair, suggest_matches, MatchCandidate, MIN_CONFIDENCE};
pub use selection::{ConfirmedMatch, SelectionState};
