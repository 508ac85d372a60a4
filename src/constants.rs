/// P-values strictly above this keep the null hypothesis of equal distributions.
pub const DRIFT_SIGNIFICANCE: f64 = 0.05;
pub const MISSING_THRESHOLD: f64 = 0.7;
pub const TARGET_COLUMN: &str = "class";
pub const MISSING_SENTINEL: &str = "na";
/// Synthetic row identifier added by the document store.
pub const DOCUMENT_ID: &str = "_id";
pub const STORE_ROOT_ENV: &str = "SENSOR_STORE_ROOT";
pub const KOLMOGOROV_TERMS: usize = 100;
pub const KOLMOGOROV_EPS: f64 = 1e-10;
/// Sample size products up to this use the exact KS distribution.
pub const EXACT_KS_MAX_PRODUCT: usize = 10_000;

pub const MISSING_VALUES_BASE: &str = "missing_values_within_base_dataset";
pub const MISSING_VALUES_TRAIN: &str = "missing_values_within_train_dataset";
pub const MISSING_VALUES_TEST: &str = "missing_values_within_test_dataset";
pub const MISSING_COLUMNS_TRAIN: &str = "missing_columns_within_train_dataset";
pub const MISSING_COLUMNS_TEST: &str = "missing_columns_within_test_dataset";
pub const DATA_DRIFT_TRAIN: &str = "data_drift_within_train_dataset";
pub const DATA_DRIFT_TEST: &str = "data_drift_within_test_dataset";
