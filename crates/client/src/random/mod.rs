//! Random problem selection.
//!
//! ### Flow
//! 1. Resolve the topic in a live catalog; unknown topic → no problem.
//! 2. Collect candidate ids from the topic's categories over a page budget
//!    derived from `period_days`, widening once to the 365-day budget.
//! 3. Pick a first candidate and shuffle the rest with one seeded generator.
//! 4. Probe candidates in that order until one yields a problem.

pub mod collect;
pub mod select;

pub use collect::{COLLECT_CONCURRENCY, CandidatePool, collect_candidates, collect_from_categories};
pub use select::{FALLBACK_WINDOW_DAYS, pages_for_period, probe_order, random_problem};
