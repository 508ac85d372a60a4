//! Drift Detection Logic
//!
//! This module compares the distribution of each numeric column of a
//! candidate dataset with the same column of the baseline, using the
//! two sample Kolmogorov-Smirnov test.

pub mod calculation;
pub mod stats;

pub use calculation::{detect_drift, is_same_distribution};
pub use stats::{ks_2samp, KsTest};
