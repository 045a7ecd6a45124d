//! Streak aggregation core
//!
//! Pure, synchronous computation shared by every badge route. No I/O and no
//! clock access; the reference instant is always passed in by the caller.

pub mod aggregator;
pub mod dates;

pub use aggregator::{compute_stats, DayRecord, StreakStats};
