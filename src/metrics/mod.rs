pub mod classification;

pub use classification::{f1_score, precision, recall, ConfusionCounts};
