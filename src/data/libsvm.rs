//! LibSVM format loading
//!
//! label index:value index:value ...
//!
//! Example:
//! +1 1:0.5 3:1.2 7:0.8
//! -1 2:0.3 5:2.1
//!
//! Indices are 1-based; missing indices are zero in the dense vector.
//! Indices above [`MAX_FEATURE_INDEX`] are rejected.

use crate::core::{KmError, Result, TrainingSample};
use crate::data::{binary_label, DenseDataset};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Largest feature index accepted in a LibSVM line
pub const MAX_FEATURE_INDEX: usize = 1 << 20;

impl DenseDataset {
    /// Load a dataset from a LibSVM format file
    pub fn from_libsvm_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_libsvm_reader(BufReader::new(file))
    }

    /// Load a dataset from LibSVM text
    pub fn from_libsvm_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut samples = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let sample = parse_line(line).map_err(|e| match e {
                KmError::ParseError(msg) => {
                    KmError::ParseError(format!("Error parsing line {}: {}", line_num + 1, msg))
                }
                other => other,
            })?;
            samples.push(sample);
        }

        if samples.is_empty() {
            return Err(KmError::EmptyDataset);
        }

        Ok(Self::new(samples))
    }
}

/// Parse a single line in libsvm format
fn parse_line(line: &str) -> Result<TrainingSample<Vec<f64>>> {
    let mut parts = line.split_whitespace();

    let label_str = parts
        .next()
        .ok_or_else(|| KmError::ParseError("Empty line".to_string()))?;
    let label = label_str
        .parse::<f64>()
        .map_err(|_| KmError::ParseError(format!("Invalid label: {label_str}")))?;

    let mut features = Vec::new();
    for feature_str in parts {
        let (index, value) = feature_str.split_once(':').ok_or_else(|| {
            KmError::ParseError(format!("Invalid feature format: {feature_str}"))
        })?;

        let index = index
            .parse::<usize>()
            .map_err(|_| KmError::ParseError(format!("Invalid feature index: {index}")))?;
        let value = value
            .parse::<f64>()
            .map_err(|_| KmError::ParseError(format!("Invalid feature value: {value}")))?;

        if index == 0 {
            return Err(KmError::ParseError(format!(
                "Feature index must be positive: {index}"
            )));
        }
        if index > MAX_FEATURE_INDEX {
            return Err(KmError::ParseError(format!(
                "Feature index {index} exceeds the maximum of {MAX_FEATURE_INDEX}"
            )));
        }

        if features.len() < index {
            features.resize(index, 0.0);
        }
        features[index - 1] = value;
    }

    Ok(TrainingSample::new(features, binary_label(label)?))
}
