use std::collections::BTreeMap;

use super::model::{LiftRecord, LiftType};

/// Row membership of each lift partition, as indices into the dataset rows.
///
/// A row belongs to a lift's partition when its `MaxLift` indicator equals
/// the lift name and its best result for that lift is strictly positive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiftIndex {
    partitions: BTreeMap<LiftType, Vec<usize>>,
}

impl LiftIndex {
    pub fn build(rows: &[LiftRecord]) -> Self {
        let partitions = LiftType::ALL
            .into_iter()
            .map(|lift| {
                let members = rows
                    .iter()
                    .enumerate()
                    .filter(|(_, rec)| qualifies(lift, rec))
                    .map(|(i, _)| i)
                    .collect::<Vec<_>>();
                log::debug!(
                    "{lift} partition: {} rows ranked {lift} with {} > 0",
                    members.len(),
                    lift.best_result_column().name()
                );
                (lift, members)
            })
            .collect();
        LiftIndex { partitions }
    }

    /// Row indices of the partition, in load order.
    pub fn partition(&self, lift: LiftType) -> &[usize] {
        self.partitions
            .get(&lift)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn partition_len(&self, lift: LiftType) -> usize {
        self.partition(lift).len()
    }
}

fn qualifies(lift: LiftType, rec: &LiftRecord) -> bool {
    rec.max_lift == lift.name() && lift.best_result(rec).is_some_and(|v| v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(max_lift: &str, bench: Option<f64>, squat: Option<f64>, dead: Option<f64>) -> LiftRecord {
        LiftRecord {
            max_lift: max_lift.into(),
            best3_bench_kg: bench,
            best3_squat_kg: squat,
            best3_deadlift_kg: dead,
            ..Default::default()
        }
    }

    #[test]
    fn partitions_follow_indicator_and_positive_best() {
        let rows = vec![
            row("Bench", Some(100.0), None, None),
            row("Bench", Some(-90.0), None, None),
            row("Squat", Some(80.0), Some(150.0), Some(200.0)),
            row("Deadlift", None, None, Some(0.0)),
            row("Deadlift", None, None, Some(250.0)),
            row("", Some(120.0), Some(120.0), Some(120.0)),
        ];
        let index = LiftIndex::build(&rows);

        assert_eq!(index.partition(LiftType::Bench), &[0]);
        assert_eq!(index.partition(LiftType::Squat), &[2]);
        assert_eq!(index.partition(LiftType::Deadlift), &[4]);
    }

    #[test]
    fn partitions_are_disjoint() {
        let rows: Vec<LiftRecord> = (0..30)
            .map(|i| {
                let lift = LiftType::ALL[i % 3];
                row(lift.name(), Some(i as f64), Some(i as f64), Some(i as f64))
            })
            .collect();
        let index = LiftIndex::build(&rows);

        let mut seen = std::collections::BTreeSet::new();
        let mut total = 0;
        for lift in LiftType::ALL {
            for &i in index.partition(lift) {
                assert!(seen.insert(i), "row {i} appears in two partitions");
                assert_eq!(rows[i].max_lift, lift.name());
                assert!(lift.best_result(&rows[i]).unwrap() > 0.0);
                total += 1;
            }
        }
        // Row 0 has a zero best result and is excluded.
        assert_eq!(total, rows.len() - 1);
    }

    #[test]
    fn empty_rows_give_empty_partitions() {
        let index = LiftIndex::build(&[]);
        for lift in LiftType::ALL {
            assert!(index.partition(lift).is_empty());
        }
    }
}
