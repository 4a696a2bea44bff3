//! Binary classification metrics

/// Confusion counts of a binary classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvaluationMetrics {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl EvaluationMetrics {
    /// Create metrics from raw counts
    pub fn new(tp: usize, tn: usize, fp: usize, fn_: usize) -> Self {
        Self {
            true_positives: tp,
            true_negatives: tn,
            false_positives: fp,
            false_negatives: fn_,
        }
    }

    /// Count outcomes of predicted labels against actual labels
    ///
    /// Label `+1` is positive, every other label negative.
    pub fn from_labels(predicted: &[i32], actual: &[i32]) -> Self {
        let mut metrics = Self::default();
        for (&pred, &truth) in predicted.iter().zip(actual) {
            match (pred == 1, truth == 1) {
                (true, true) => metrics.true_positives += 1,
                (false, false) => metrics.true_negatives += 1,
                (true, false) => metrics.false_positives += 1,
                (false, true) => metrics.false_negatives += 1,
            }
        }
        metrics
    }

    /// Total number of counted samples
    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    /// Calculate accuracy: (TP + TN) / (TP + TN + FP + FN)
    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    /// Calculate precision: TP / (TP + FP)
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// Calculate recall (sensitivity): TP / (TP + FN)
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// Calculate F1 score: 2 * (precision * recall) / (precision + recall)
    pub fn f1_score(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * (p * r) / (p + r)
        }
    }

    /// Calculate specificity: TN / (TN + FP)
    pub fn specificity(&self) -> f64 {
        ratio(self.true_negatives, self.true_negatives + self.false_positives)
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Average precision of a ranking
///
/// Samples are ranked by decreasing score; the result is the mean over positive
/// samples of the precision at their rank. Returns `None` without positives.
pub fn average_precision(scores: &[f64], labels: &[i32]) -> Option<f64> {
    let mut ranked: Vec<(f64, bool)> = scores
        .iter()
        .zip(labels)
        .map(|(&s, &l)| (s, l == 1))
        .collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut positives_seen = 0usize;
    let mut sum = 0.0;
    for (rank, &(_, positive)) in ranked.iter().enumerate() {
        if positive {
            positives_seen += 1;
            sum += positives_seen as f64 / (rank + 1) as f64;
        }
    }

    if positives_seen == 0 {
        None
    } else {
        Some(sum / positives_seen as f64)
    }
}
