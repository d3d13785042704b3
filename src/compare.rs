//! Period-over-period comparison.
//!
//! Groups the current and comparison record sets by a dimension, folds
//! each group into a [`StatTuple`], and derives per-day averages and the
//! tonnage variation for every key seen in either period. Grand totals
//! are re-derived from summed tuples rather than averaged from rows.
//!
//! Figures are carried unrounded through every step and rounded once at
//! the boundary: tonnage and variation in MT to 3 places; freight,
//! averages and percentages to 2.

use crate::grouping::group_by;
use crate::stats::accumulate;
use crate::types::{
    Comparison, ComparisonRow, Dimension, OperationRecord, PeriodStats, StatTuple, TotalsRow,
};
use crate::util::round_to;

const TONNAGE_PLACES: u32 = 3;
const MONEY_PLACES: u32 = 2;

/// Runs per day, or 0 for a non-positive day count.
pub fn avg_per_day(runs: u64, days: i64) -> f64 {
    if days > 0 {
        runs as f64 / days as f64
    } else {
        0.0
    }
}

/// Percentage change from `previous` to `current`.
///
/// With no previous figure a new positive value reads as +100 and a
/// zero as 0; the result is never `NaN` or infinite.
// TODO: +100 for a key with no comparison figure is a reporting
// convention; a nullable "not measurable" value would be more honest
// once the downstream renderers can show one.
pub fn variation_percent(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else if current > 0.0 {
        100.0
    } else {
        0.0
    }
}

fn period_stats(stats: StatTuple, days: i64) -> PeriodStats {
    PeriodStats {
        stats,
        avg_per_day: avg_per_day(stats.runs, days),
    }
}

fn round_stats(p: PeriodStats) -> PeriodStats {
    PeriodStats {
        stats: StatTuple {
            tonnage: round_to(p.stats.tonnage, TONNAGE_PLACES),
            freight: round_to(p.stats.freight, MONEY_PLACES),
            ..p.stats
        },
        avg_per_day: round_to(p.avg_per_day, MONEY_PLACES),
    }
}

fn variation(current: &StatTuple, previous: &StatTuple) -> (f64, f64) {
    (
        current.tonnage - previous.tonnage,
        variation_percent(current.tonnage, previous.tonnage),
    )
}

impl ComparisonRow {
    fn from_tuples(
        key: String,
        current: StatTuple,
        previous: StatTuple,
        current_days: i64,
        previous_days: i64,
    ) -> Self {
        let (change_in_units, change_in_percent) = variation(&current, &previous);
        Self {
            key,
            current: period_stats(current, current_days),
            previous: period_stats(previous, previous_days),
            change_in_units,
            change_in_percent,
        }
    }

    pub fn rounded(&self) -> Self {
        Self {
            key: self.key.clone(),
            current: round_stats(self.current),
            previous: round_stats(self.previous),
            change_in_units: round_to(self.change_in_units, TONNAGE_PLACES),
            change_in_percent: round_to(self.change_in_percent, MONEY_PLACES),
        }
    }
}

impl TotalsRow {
    pub fn rounded(&self) -> Self {
        Self {
            current: round_stats(self.current),
            previous: round_stats(self.previous),
            change_in_units: round_to(self.change_in_units, TONNAGE_PLACES),
            change_in_percent: round_to(self.change_in_percent, MONEY_PLACES),
        }
    }
}

fn compare_unrounded<'a, C, P>(
    current: C,
    previous: P,
    current_days: i64,
    previous_days: i64,
    dimension: Dimension,
) -> Vec<ComparisonRow>
where
    C: IntoIterator<Item = &'a OperationRecord>,
    P: IntoIterator<Item = &'a OperationRecord>,
{
    let current = group_by(current, dimension);
    let previous = group_by(previous, dimension);

    let previous_only = previous.keys().filter(|k| current.get(k).is_none());
    current
        .keys()
        .chain(previous_only)
        .map(|key| {
            let cur = current
                .get(key)
                .map(|g| accumulate(g.iter().copied()))
                .unwrap_or_default();
            let prev = previous
                .get(key)
                .map(|g| accumulate(g.iter().copied()))
                .unwrap_or_default();
            ComparisonRow::from_tuples(key.to_string(), cur, prev, current_days, previous_days)
        })
        .collect()
}

fn rollup_unrounded(rows: &[ComparisonRow], current_days: i64, previous_days: i64) -> TotalsRow {
    let mut current = StatTuple::default();
    let mut previous = StatTuple::default();
    for row in rows {
        current.merge(&row.current.stats);
        previous.merge(&row.previous.stats);
    }
    let (change_in_units, change_in_percent) = variation(&current, &previous);
    TotalsRow {
        current: period_stats(current, current_days),
        previous: period_stats(previous, previous_days),
        change_in_units,
        change_in_percent,
    }
}

/// One rounded row per key present in either period. Keys first seen in
/// the current period come first, in input order, followed by keys
/// found only in the comparison period.
pub fn compare_periods<'a, C, P>(
    current: C,
    previous: P,
    current_days: i64,
    previous_days: i64,
    dimension: Dimension,
) -> Vec<ComparisonRow>
where
    C: IntoIterator<Item = &'a OperationRecord>,
    P: IntoIterator<Item = &'a OperationRecord>,
{
    compare_unrounded(current, previous, current_days, previous_days, dimension)
        .iter()
        .map(ComparisonRow::rounded)
        .collect()
}

/// Sum every row's tuples and recompute averages and variation from the
/// sums. Empty input gives an all-zero row.
pub fn rollup_totals(rows: &[ComparisonRow], current_days: i64, previous_days: i64) -> TotalsRow {
    rollup_unrounded(rows, current_days, previous_days).rounded()
}

pub fn compute_comparison<'a, C, P>(
    current: C,
    previous: P,
    current_days: i64,
    previous_days: i64,
    dimension: Dimension,
) -> Comparison
where
    C: IntoIterator<Item = &'a OperationRecord>,
    P: IntoIterator<Item = &'a OperationRecord>,
{
    let rows = compare_unrounded(current, previous, current_days, previous_days, dimension);
    let totals = rollup_unrounded(&rows, current_days, previous_days);
    Comparison {
        rows: rows.iter().map(ComparisonRow::rounded).collect(),
        totals: totals.rounded(),
    }
}
