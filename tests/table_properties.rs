//! Property tests for the formulas, the resistance box and the table.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use proptest::prelude::*;

use wheatstone::calibration::CalibrationStore;
use wheatstone::device::{total_resistance, PIN_WEIGHTS};
use wheatstone::formula::{exact, linear, DENOMINATOR_EPSILON};
use wheatstone::table::{ColumnKind, ColumnSpec, MeasurementTable, Sample};

fn kind() -> impl Strategy<Value = ColumnKind> {
    prop::sample::select(ColumnKind::ALL.to_vec())
}

fn filled_table(voltages: &[f64]) -> MeasurementTable {
    let start = Instant::now();
    let mut table = MeasurementTable::new(start);
    for (i, voltage) in voltages.iter().enumerate() {
        let sample = Sample::take(Duration::from_millis(i as u64 * 500), 2.0, *voltage, 400, 0.0);
        table.record(&sample);
    }
    table
}

proptest! {
    #[test]
    fn test_resistance_is_sum_of_enabled_pins(states in prop::collection::vec(any::<bool>(), 5)) {
        let pins: BTreeMap<u8, bool> = PIN_WEIGHTS
            .iter()
            .zip(&states)
            .map(|((pin, _), on)| (*pin, *on))
            .collect();
        let expected: u32 = PIN_WEIGHTS
            .iter()
            .zip(&states)
            .filter(|(_, on)| **on)
            .map(|((_, ohms), _)| *ohms)
            .sum();
        prop_assert_eq!(total_resistance(&pins), expected);
    }

    #[test]
    fn test_exact_degenerates_only_near_balance(
        us in 0.1f64..10.0,
        ug in -5.0f64..5.0,
        r0 in 0.0f64..1550.0,
    ) {
        let degenerate = (us - 2.0 * ug).abs() < DENOMINATOR_EPSILON;
        prop_assert_eq!(exact(us, ug, r0).is_none(), degenerate);
    }

    #[test]
    fn test_linear_is_first_order_of_exact(
        us in 1.0f64..10.0,
        ug in -0.001f64..0.001,
        r0 in 1.0f64..1550.0,
    ) {
        let exact = exact(us, ug, r0).unwrap();
        let linear = linear(us, ug, r0);
        // the two differ by the 2·Ug/Us term only
        prop_assert!((exact - linear).abs() <= linear.abs() * 4.0 * ug.abs() / us + 1e-9);
    }

    #[test]
    fn test_insert_then_delete_column_restores_rows(
        voltages in prop::collection::vec(-0.5f64..0.5, 0..8),
        kind in kind(),
        position in 0usize..6,
    ) {
        let mut table = filled_table(&voltages);
        let before: Vec<_> = table.rows().to_vec();
        let labels: Vec<String> = table.schema().labels().map(str::to_string).collect();

        let at = table.insert_column(ColumnSpec::of_kind(kind), Some(position)).unwrap();
        prop_assert_eq!(at, position);
        prop_assert!(table.rows().iter().all(|row| row.len() == table.schema().len()));

        table.delete_column(at).unwrap();
        prop_assert_eq!(table.rows(), &before[..]);
        let after: Vec<String> = table.schema().labels().map(str::to_string).collect();
        prop_assert_eq!(after, labels);
    }

    #[test]
    fn test_calibration_is_cumulative(
        first in -0.2f64..0.2,
        second in -0.2f64..0.2,
    ) {
        let mut table = filled_table(&[first]);
        let mut store = CalibrationStore::new();
        let a = store.calibrate(&table).unwrap();

        let sample = Sample::take(Duration::from_secs(1), 2.0, second, 400, store.offset());
        table.record(&sample);
        let b = store.calibrate(&table).unwrap();

        prop_assert!((store.offset() - (a + b)).abs() < 1e-9);
    }

    #[test]
    fn test_clear_resets_rows_and_offset(voltages in prop::collection::vec(-0.2f64..0.2, 1..6)) {
        let mut table = filled_table(&voltages);
        let mut store = CalibrationStore::new();
        store.calibrate(&table).unwrap();

        let restart = Instant::now();
        table.clear(restart);
        store.reset();

        prop_assert!(table.is_empty());
        prop_assert_eq!(store.offset(), 0.0);
        prop_assert_eq!(table.elapsed(restart), Duration::ZERO);
    }
}
