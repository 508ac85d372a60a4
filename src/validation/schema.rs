use crate::data::Dataset;
use crate::report::ReportFragment;
use log::info;

/// Result of checking a candidate against the baseline columns.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaCheck {
    /// Every baseline column is present. Nothing is written to the report.
    Passed,
    /// Some baseline columns are absent, listed in the fragment.
    Failed(ReportFragment),
}

impl SchemaCheck {
    pub fn is_passed(&self) -> bool {
        matches!(self, SchemaCheck::Passed)
    }
}

/// Check that every column of `baseline` is present in `candidate`.
/// Extra candidate columns are ignored.
pub fn check_required_columns(baseline: &Dataset, candidate: &Dataset, report_key: &str) -> SchemaCheck {
    let missing_columns: Vec<String> = baseline
        .column_names()
        .into_iter()
        .filter(|name| !candidate.has_column(name))
        .map(|name| {
            info!("Column: [{}] is not available.", name);
            name.to_string()
        })
        .collect();
    if missing_columns.is_empty() {
        SchemaCheck::Passed
    } else {
        SchemaCheck::Failed(ReportFragment::columns(report_key, missing_columns))
    }
}
