//! Share-of-total figures and the commodity/station breakdown.

use crate::compare::compute_comparison;
use crate::grouping::group_by;
use crate::types::{CommodityBreakdown, Dimension, OperationRecord, StationShare};
use crate::util::round_to;

/// `numerator` as a percentage of `denominator`, rounded to `places`.
/// A missing, zero or non-finite denominator gives 0.
pub fn percentage_of_total(numerator: f64, denominator: Option<f64>, places: u32) -> f64 {
    match denominator {
        Some(d) if d != 0.0 && d.is_finite() && numerator.is_finite() => {
            round_to(numerator / d * 100.0, places)
        }
        _ => 0.0,
    }
}

/// Per-commodity comparison rows, each with its station rows. Shares are
/// taken on current-period tonnage: a commodity against the grand total,
/// a station against both its commodity and the grand total.
pub fn commodity_breakdown(
    current: &[&OperationRecord],
    previous: &[&OperationRecord],
    current_days: i64,
    previous_days: i64,
    places: u32,
) -> Vec<CommodityBreakdown> {
    let overall = compute_comparison(
        current.iter().copied(),
        previous.iter().copied(),
        current_days,
        previous_days,
        Dimension::Commodity,
    );
    let grand_total = overall.totals.current.stats.tonnage;

    let current_groups = group_by(current.iter().copied(), Dimension::Commodity);
    let previous_groups = group_by(previous.iter().copied(), Dimension::Commodity);

    overall
        .rows
        .into_iter()
        .map(|row| {
            let cur = current_groups.get(&row.key).unwrap_or_default();
            let prev = previous_groups.get(&row.key).unwrap_or_default();
            let commodity_total = row.current.stats.tonnage;
            let stations = compute_comparison(
                cur.iter().copied(),
                prev.iter().copied(),
                current_days,
                previous_days,
                Dimension::Station,
            )
            .rows
            .into_iter()
            .map(|station| StationShare {
                share_of_commodity: percentage_of_total(
                    station.current.stats.tonnage,
                    Some(commodity_total),
                    places,
                ),
                share_of_total: percentage_of_total(
                    station.current.stats.tonnage,
                    Some(grand_total),
                    places,
                ),
                row: station,
            })
            .collect();
            CommodityBreakdown {
                share_of_commodity: percentage_of_total(
                    commodity_total,
                    Some(commodity_total),
                    places,
                ),
                share_of_total: percentage_of_total(commodity_total, Some(grand_total), places),
                row,
                stations,
            }
        })
        .collect()
}
