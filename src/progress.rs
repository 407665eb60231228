//! Completion percentage for display. Never persisted; timeframe goals are
//! re-evaluated against the clock on every call.

use chrono::{DateTime, Utc};

use crate::models::{Goal, GoalKind};

/// Current completion of `goal` in `[0, 100]`. Missing or inconsistent data
/// degrades to 0.
pub fn compute_progress(goal: Option<&Goal>) -> u8 {
    compute_progress_at(goal, Utc::now())
}

pub fn compute_progress_at(goal: Option<&Goal>, now: DateTime<Utc>) -> u8 {
    let Some(goal) = goal else {
        return 0;
    };

    match goal.kind {
        GoalKind::Percentage { progress } => progress.clamp(0, 100) as u8,
        GoalKind::Timeframe {
            start_date: Some(start),
            end_date: Some(end),
        } => elapsed_percent(start, end, now),
        GoalKind::Timeframe { .. } => 0,
    }
}

fn elapsed_percent(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> u8 {
    let start = start.timestamp_millis();
    let end = end.timestamp_millis();
    if end <= start {
        return 0;
    }

    let fraction = (now.timestamp_millis() - start) as f64 / (end - start) as f64;
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Grid of progress dots that fits a display area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DotGrid {
    pub columns: u32,
    pub rows: u32,
}

impl DotGrid {
    pub fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// As many whole `cell`-sized dots as fit in `width` x `height`.
    pub fn fit(width: f64, height: f64, cell: f64) -> Self {
        if cell.is_nan() || cell <= 0.0 {
            return Self::new(0, 0);
        }
        let count = |extent: f64| (extent.max(0.0) / cell).floor() as u32;
        Self::new(count(width), count(height))
    }

    pub fn total(&self) -> u64 {
        u64::from(self.columns) * u64::from(self.rows)
    }

    /// Number of filled dots for `percent`, rounded down.
    pub fn filled(&self, percent: u8) -> u64 {
        let percent = u64::from(percent.min(100));
        let total = self.total();
        total / 100 * percent + total % 100 * percent / 100
    }
}
