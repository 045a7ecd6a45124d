//! Streak aggregation over per-day activity counts
//!
//! The single shared implementation behind every badge route: given a list
//! of (date, count) observations and a reference instant, compute the total
//! activity, the longest historical run of consecutive active days, and the
//! current run anchored at today (or yesterday if today has no activity yet).
//!
//! The computation is pure and total: no clock reads, no I/O, and no panics
//! for any input, including an empty day list.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::stats::dates::{add_days, calendar_date};

/// Activity volume on one calendar day (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub count: u32,
}

impl DayRecord {
    pub fn new(date: NaiveDate, count: u32) -> Self {
        Self { date, count }
    }
}

/// Aggregated streak statistics for one activity window.
///
/// Computed fresh per request; purely by-value, no identity beyond the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakStats {
    /// Sum of all counts in the window, plus any extra adjustment.
    pub total: u64,
    /// Earliest date with activity; today's date when the window has none,
    /// so an empty profile still has a display date.
    pub first_active_date: NaiveDate,
    /// Length in days of the run ending at today or yesterday.
    pub current_streak: u32,
    pub current_streak_start: NaiveDate,
    pub current_streak_end: NaiveDate,
    /// Length of the longest consecutive-day run anywhere in the window.
    pub longest_streak: u32,
    pub longest_streak_start: NaiveDate,
    pub longest_streak_end: NaiveDate,
}

impl StreakStats {
    /// Fold an out-of-band adjustment into the total, e.g. a restricted
    /// contribution count reported separately by the upstream API. Streak
    /// lengths are unaffected because the adjustment has no dates.
    pub fn with_extra_total(mut self, extra: u64) -> Self {
        self.total += extra;
        self
    }
}

/// Compute streak statistics from a day list and a reference instant.
///
/// `days` may be empty, unsorted, and may contain duplicate dates (the later
/// occurrence wins) or zero counts. `now` anchors the current-streak walk and
/// must be threaded in by the caller so the computation stays deterministic.
pub fn compute_stats(days: &[DayRecord], now: DateTime<Utc>) -> StreakStats {
    let today = calendar_date(now);

    // Normalize: dedup by date with last-wins, sorted ascending.
    let by_date: BTreeMap<NaiveDate, u32> =
        days.iter().map(|d| (d.date, d.count)).collect();

    let total: u64 = by_date.values().map(|&c| u64::from(c)).sum();

    let first_active_date = by_date
        .iter()
        .find(|(_, &count)| count > 0)
        .map(|(&date, _)| date)
        .unwrap_or(today);

    // Longest streak: one ascending pass over the recorded entries. Dates
    // absent from the list are skipped rather than treated as zero-count,
    // matching the map-driven current-streak walk only when the window is
    // dense. Sources emit dense windows, so the two agree in practice.
    let mut longest = 0u32;
    let mut longest_start = today;
    let mut longest_end = today;
    let mut run = 0u32;
    let mut run_start = today;

    for (&date, &count) in &by_date {
        if count > 0 {
            if run == 0 {
                run_start = date;
            }
            run += 1;
            if run > longest {
                longest = run;
                longest_start = run_start;
                longest_end = date;
            }
        } else {
            run = 0;
        }
    }

    // Current streak: walk backward one calendar day at a time from today,
    // or from yesterday when today has no recorded activity yet. Absent
    // dates count as zero. The walk stops at the window's earliest recorded
    // date; a streak that began before the fetch window is undercounted.
    let mut current = 0u32;
    let mut current_start = today;
    let mut current_end = today;

    if let Some((&earliest, _)) = by_date.iter().next() {
        let lookup = |date: NaiveDate| by_date.get(&date).copied().unwrap_or(0);

        let anchor = if lookup(today) > 0 {
            today
        } else {
            add_days(today, -1)
        };

        let mut cursor = anchor;
        loop {
            if lookup(cursor) == 0 {
                break;
            }
            if current == 0 {
                current_end = cursor;
            }
            current += 1;
            current_start = cursor;
            if cursor <= earliest {
                break;
            }
            cursor = add_days(cursor, -1);
        }
    }

    StreakStats {
        total,
        first_active_date,
        current_streak: current,
        current_streak_start: current_start,
        current_streak_end: current_end,
        longest_streak: longest,
        longest_streak_start: longest_start,
        longest_streak_end: longest_end,
    }
}
