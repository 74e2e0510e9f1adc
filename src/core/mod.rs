// Core algorithm exports
pub mod filters;
pub mod loader;
pub mod matcher;
pub mod scoring;
pub mod statistics;

pub use filters::{is_candidate_pair, is_matchable_idea, is_matchable_offer, is_self_pair, meets_threshold};
pub use loader::{LoadReport, Snapshot};
pub use matcher::{MatchEngine, MatchPolicy};
pub use scoring::{Compatibility, Scorer, DEFAULT_AMOUNT_FALLOFF};
pub use statistics::summarize;
