/// Counts of a binary confusion matrix, the positive class is 1.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionCounts {
    pub true_positive: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub true_negative: usize,
}

impl ConfusionCounts {
    pub fn from_labels(y: &[f64], yhat: &[f64]) -> Self {
        let mut counts = ConfusionCounts::default();
        for (y_, yhat_) in y.iter().zip(yhat) {
            match (*y_ == 1.0, *yhat_ == 1.0) {
                (true, true) => counts.true_positive += 1,
                (false, true) => counts.false_positive += 1,
                (true, false) => counts.false_negative += 1,
                (false, false) => counts.true_negative += 1,
            }
        }
        counts
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

pub fn precision(y: &[f64], yhat: &[f64]) -> f64 {
    let c = ConfusionCounts::from_labels(y, yhat);
    ratio(c.true_positive, c.true_positive + c.false_positive)
}

pub fn recall(y: &[f64], yhat: &[f64]) -> f64 {
    let c = ConfusionCounts::from_labels(y, yhat);
    ratio(c.true_positive, c.true_positive + c.false_negative)
}

/// Harmonic mean of precision and recall. Zero when there are no
/// true positives.
pub fn f1_score(y: &[f64], yhat: &[f64]) -> f64 {
    let c = ConfusionCounts::from_labels(y, yhat);
    ratio(2 * c.true_positive, 2 * c.true_positive + c.false_positive + c.false_negative)
}
