//! Data loading
//!
//! Loads labeled dense vectors from the text formats commonly used in machine
//! learning. Labels are mapped to `+1` (positive values) and `-1` (everything else).

pub mod csv;
pub mod libsvm;

use crate::core::{class_counts, KmError, Result, TrainingSample};

/// Labeled dense vectors, all padded to the same dimension
#[derive(Debug, Clone)]
pub struct DenseDataset {
    samples: Vec<TrainingSample<Vec<f64>>>,
    dimensions: usize,
}

impl DenseDataset {
    /// Build a dataset, padding every vector with zeros to the largest dimension
    pub fn new(mut samples: Vec<TrainingSample<Vec<f64>>>) -> Self {
        let dimensions = samples.iter().map(|s| s.sample.len()).max().unwrap_or(0);
        for s in &mut samples {
            s.sample.resize(dimensions, 0.0);
        }
        Self {
            samples,
            dimensions,
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of features
    pub fn dim(&self) -> usize {
        self.dimensions
    }

    /// Labeled samples
    pub fn samples(&self) -> &[TrainingSample<Vec<f64>>] {
        &self.samples
    }

    /// Sample vectors without labels
    pub fn vectors(&self) -> Vec<Vec<f64>> {
        self.samples.iter().map(|s| s.sample.clone()).collect()
    }

    /// Number of positive and negative samples
    pub fn class_counts(&self) -> (usize, usize) {
        class_counts(&self.samples)
    }

    /// Take ownership of the labeled samples
    pub fn into_samples(self) -> Vec<TrainingSample<Vec<f64>>> {
        self.samples
    }
}

/// Map a raw label to `+1` / `-1`
pub(crate) fn binary_label(label: f64) -> Result<i32> {
    if !label.is_finite() {
        return Err(KmError::InvalidLabel(label));
    }
    Ok(if label > 0.0 { 1 } else { -1 })
}
