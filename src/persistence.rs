//! Cross-validation report persistence
//!
//! Saves the outcome of a cross-validation run as JSON so that runs with
//! different kernels or parameters can be compared later.

use crate::core::{Classifier, Evaluator, Result};
use crate::evaluation::{CrossValidation, CrossValidationConfig, RandomSplitCrossValidation};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Serializable summary of a completed cross-validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossValidationReport {
    /// Scores in repeat order
    pub scores: Vec<f64>,
    /// Mean of the scores
    pub mean: f64,
    /// Population standard deviation of the scores
    pub std_dev: f64,
    /// Parameters of the run
    pub config: CrossValidationConfig,
    /// Free-form description of the evaluated setup (kernel, evaluator, ...)
    pub description: String,
    /// Number of samples in the validated list
    pub n_samples: usize,
    /// Library version used to create the report
    pub library_version: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl CrossValidationReport {
    /// Summarize a cross-validation, `None` if it has no scores
    pub fn from_cross_validation<T, C, E>(
        cv: &RandomSplitCrossValidation<T, C, E>,
        description: impl Into<String>,
    ) -> Option<Self>
    where
        T: Clone,
        C: Classifier<T> + Clone,
        E: Evaluator<T, C>,
    {
        let scores = cv.scores()?.to_vec();
        Some(Self {
            scores,
            mean: cv.average_score(),
            std_dev: cv.std_dev_score(),
            config: *cv.config(),
            description: description.into(),
            n_samples: cv.samples().len(),
            library_version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Save report to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Load report from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let report = serde_json::from_reader(BufReader::new(file))?;
        Ok(report)
    }

    /// Print report summary
    pub fn print_summary(&self) {
        println!("=== Cross-Validation Results ===");
        println!("Setup: {}", self.description);
        println!("Samples: {}", self.n_samples);
        println!(
            "Train percent: {:.2} ({})",
            self.config.train_percent,
            if self.config.balance {
                "balanced"
            } else {
                "unbalanced"
            }
        );
        println!("Repeats: {}", self.config.repeat_count);
        println!("Seed: {}", self.config.seed);
        println!("Score: {:.4} ± {:.4}", self.mean, self.std_dev);
    }
}
