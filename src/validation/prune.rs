use crate::data::Dataset;
use crate::report::ReportFragment;
use log::info;

/// Drop columns whose fraction of missing values is strictly above `threshold`.
///
/// The dropped names are always returned as a fragment under `report_key`,
/// even when nothing was dropped. The dataset is `None` when no column is left.
pub fn prune_missing_columns(
    dataset: Dataset,
    threshold: f64,
    report_key: &str,
) -> (Option<Dataset>, ReportFragment) {
    info!(
        "Selecting columns containing more than {:.1}% missing values",
        threshold * 100.0
    );
    let drop_column_names = dataset.missing_profile().exceeding(threshold);
    info!("Columns to drop: {:?}", drop_column_names);
    let pruned = dataset.drop_columns(&drop_column_names);
    (pruned, ReportFragment::columns(report_key, drop_column_names))
}
