//! CSV format loading
//!
//! - The last column is the label
//! - All other columns are features
//! - First row can be headers (automatically detected)
//! - Empty lines and lines starting with `#` are skipped

use crate::core::{KmError, Result, TrainingSample};
use crate::data::{binary_label, DenseDataset};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

impl DenseDataset {
    /// Load a dataset from a CSV file
    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_csv_reader(BufReader::new(file))
    }

    /// Load a dataset from CSV text, detecting a header line
    pub fn from_csv_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut samples = Vec::new();
        let mut first_data_line = true;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if first_data_line {
                first_data_line = false;
                if is_header_line(line) {
                    continue;
                }
            }

            let sample = parse_data_line(line).map_err(|e| match e {
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

/// Check if a line appears to be a header
fn is_header_line(line: &str) -> bool {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < 2 {
        return false;
    }

    let non_numeric_count = fields
        .iter()
        .take(fields.len() - 1)
        .filter(|field| field.trim().parse::<f64>().is_err())
        .count();

    non_numeric_count > fields.len() / 2
}

fn parse_data_line(line: &str) -> Result<TrainingSample<Vec<f64>>> {
    let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();

    if fields.len() < 2 {
        return Err(KmError::ParseError(format!(
            "Line has too few fields: {line}"
        )));
    }

    let label_str = fields[fields.len() - 1];
    let label = label_str
        .parse::<f64>()
        .map_err(|_| KmError::ParseError(format!("Invalid label: {label_str}")))?;

    let features = fields[..fields.len() - 1]
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            field.parse::<f64>().map_err(|_| {
                KmError::ParseError(format!(
                    "Invalid feature value at column {}: {}",
                    idx + 1,
                    field
                ))
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok(TrainingSample::new(features, binary_label(label)?))
}
