use crate::constants::DRIFT_SIGNIFICANCE;
use crate::data::NumericView;
use crate::drift::stats::ks_2samp;
use crate::errors::SensorError;
use crate::report::{DriftEntry, ReportFragment};
use log::warn;
use std::collections::BTreeMap;

/// Classify a p-value. The null hypothesis is that both samples
/// are drawn from the same distribution.
pub fn is_same_distribution(pvalue: f64) -> bool {
    pvalue > DRIFT_SIGNIFICANCE
}

/// Test every baseline column against the same column of the candidate.
///
/// Each column is tested independently, no multiple comparison
/// correction is applied. The whole mapping is returned as one
/// fragment under `report_key`.
///
/// * `baseline` - Numeric view of the trusted dataset.
/// * `candidate` - Numeric view of a candidate that passed schema reconciliation.
/// * `report_key` - Report section the entries are written under.
pub fn detect_drift(
    baseline: &NumericView,
    candidate: &NumericView,
    report_key: &str,
) -> Result<ReportFragment, SensorError> {
    let mut entries = BTreeMap::new();
    for (name, base_values) in baseline.iter() {
        let current_values = candidate.get(name).ok_or_else(|| SensorError::MissingColumns {
            columns: vec![name.to_string()],
        })?;
        let test = ks_2samp(base_values, current_values);
        if test.pvalue.is_nan() {
            warn!("Column {} has no values to compare, reporting it as drifted.", name);
        }
        entries.insert(
            name.to_string(),
            DriftEntry {
                pvalue: test.pvalue,
                same_distribution: is_same_distribution(test.pvalue),
            },
        );
    }
    Ok(ReportFragment::drift(report_key, entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Column, Dataset};
    use crate::report::ReportSection;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn view(columns: Vec<(&str, Vec<f64>)>) -> NumericView {
        let cols = columns.iter().map(|(n, v)| Column::from_f64(*n, v)).collect();
        Dataset::new(cols).unwrap().to_numeric(&[]).unwrap()
    }

    fn uniform(rng: &mut StdRng, n: usize, shift: f64) -> Vec<f64> {
        (0..n).map(|_| rng.gen::<f64>() + shift).collect()
    }

    #[test]
    fn test_is_same_distribution() {
        assert!(is_same_distribution(0.5));
        assert!(!is_same_distribution(0.05));
        assert!(!is_same_distribution(f64::NAN));
    }

    #[test]
    fn test_detect_drift_single_fragment() {
        let base = view(vec![("a", vec![1.0, 2.0, 3.0]), ("b", vec![4.0, 5.0, 6.0])]);
        let current = view(vec![("a", vec![1.0, 2.0, 3.0]), ("b", vec![4.0, 5.0, 6.0]), ("c", vec![0.0; 3])]);
        let fragment = detect_drift(&base, &current, "data_drift_within_train_dataset").unwrap();
        assert_eq!(fragment.key, "data_drift_within_train_dataset");
        match fragment.section {
            ReportSection::Drift(entries) => {
                assert_eq!(entries.len(), 2);
                assert!(entries["a"].same_distribution);
                assert_eq!(entries["b"].pvalue, 1.0);
                assert!(!entries.contains_key("c"));
            }
            other => panic!("unexpected section {:?}", other),
        }
    }

    #[test]
    fn test_detect_drift_requires_columns() {
        let base = view(vec![("a", vec![1.0]), ("b", vec![2.0])]);
        let current = view(vec![("a", vec![1.0])]);
        let err = detect_drift(&base, &current, "k").unwrap_err();
        assert!(matches!(err, SensorError::MissingColumns { columns } if columns == vec!["b".to_string()]));
    }

    #[test]
    fn test_same_distribution_rarely_flagged() {
        let mut rng = StdRng::seed_from_u64(0);
        let trials = 1000;
        let mut same = 0;
        for _ in 0..trials {
            let base = view(vec![("x", uniform(&mut rng, 150, 0.0))]);
            let current = view(vec![("x", uniform(&mut rng, 120, 0.0))]);
            let fragment = detect_drift(&base, &current, "k").unwrap();
            if let ReportSection::Drift(entries) = fragment.section {
                if entries["x"].same_distribution {
                    same += 1;
                }
            }
        }
        assert!(same as f64 / trials as f64 >= 0.93, "only {} of {} kept", same, trials);
    }

    #[test]
    fn test_shifted_distribution_flagged() {
        let mut rng = StdRng::seed_from_u64(42);
        let trials = 50;
        let mut drifted = 0;
        for _ in 0..trials {
            let base = view(vec![("x", uniform(&mut rng, 150, 0.0))]);
            let current = view(vec![("x", uniform(&mut rng, 150, 0.5))]);
            let fragment = detect_drift(&base, &current, "k").unwrap();
            if let ReportSection::Drift(entries) = fragment.section {
                if !entries["x"].same_distribution {
                    drifted += 1;
                }
            }
        }
        assert_eq!(drifted, trials);
    }
}
