//! Reward functions and aggregation for tagged math completions.

pub mod aggregate;
pub mod batch;
pub mod extract;
pub mod functions;
pub mod sample_log;

pub use aggregate::*;
pub use batch::*;
pub use extract::*;
pub use functions::*;
pub use sample_log::*;

/// Neutral-positive reward handed out by every defensive branch.
///
/// Malformed batches and wrong answers both score this value rather than
/// zero or a penalty; the asymmetry is deliberate reward shaping.
pub const FALLBACK_REWARD: f64 = 2.0;
