//! Folding rake movements into run/wagon/tonnage/freight totals.

use crate::types::{OperationRecord, StatTuple};

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

impl StatTuple {
    /// Count one more run and add the record's figures. Missing and
    /// non-finite values count as zero.
    pub fn add_record(&mut self, record: &OperationRecord) {
        self.runs += 1;
        self.wagons += u64::from(record.wagons.unwrap_or(0));
        self.tonnage += finite_or_zero(record.tonnage);
        self.freight += finite_or_zero(record.freight);
    }

    pub fn merge(&mut self, other: &StatTuple) {
        self.runs += other.runs;
        self.wagons += other.wagons;
        self.tonnage += other.tonnage;
        self.freight += other.freight;
    }
}

/// Reduce a sequence of records to a single [`StatTuple`]. Empty input
/// gives all zeros.
pub fn accumulate<'a, I>(records: I) -> StatTuple
where
    I: IntoIterator<Item = &'a OperationRecord>,
{
    records
        .into_iter()
        .fold(StatTuple::default(), |mut acc, record| {
            acc.add_record(record);
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(wagons: Option<u32>, tonnage: Option<f64>, freight: Option<f64>) -> OperationRecord {
        OperationRecord {
            wagons,
            tonnage,
            freight,
            ..OperationRecord::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        }
    }

    #[test]
    fn empty_input_is_all_zero() {
        let stats = accumulate(&Vec::<OperationRecord>::new());
        assert_eq!(stats, StatTuple::default());
    }

    #[test]
    fn sums_every_field_and_counts_runs() {
        let records = vec![
            record(Some(58), Some(3850.5), Some(1_200_000.0)),
            record(Some(42), Some(2700.25), Some(900_000.5)),
        ];
        let stats = accumulate(&records);
        assert_eq!(stats.runs, 2);
        assert_eq!(stats.wagons, 100);
        assert_eq!(stats.tonnage, 6550.75);
        assert_eq!(stats.freight, 2_100_000.5);
    }

    #[test]
    fn missing_and_non_finite_values_count_as_zero() {
        let records = vec![
            record(None, None, None),
            record(Some(10), Some(f64::NAN), Some(f64::INFINITY)),
        ];
        let stats = accumulate(&records);
        assert_eq!(stats.runs, 2);
        assert_eq!(stats.wagons, 10);
        assert_eq!(stats.tonnage, 0.0);
        assert_eq!(stats.freight, 0.0);
    }

    #[test]
    fn order_does_not_change_the_result() {
        let records = vec![
            record(Some(1), Some(10.0), Some(5.0)),
            record(Some(2), Some(20.0), Some(6.0)),
            record(Some(3), Some(30.0), Some(7.0)),
        ];
        let reversed: Vec<_> = records.iter().rev().collect();
        assert_eq!(accumulate(&records), accumulate(reversed));
    }

    #[test]
    fn merge_adds_field_wise() {
        let mut a = accumulate(&[record(Some(5), Some(1.5), Some(2.0))]);
        let b = accumulate(&[record(Some(7), Some(2.5), Some(3.0))]);
        a.merge(&b);
        assert_eq!(a.runs, 2);
        assert_eq!(a.wagons, 12);
        assert_eq!(a.tonnage, 4.0);
        assert_eq!(a.freight, 5.0);
    }
}
