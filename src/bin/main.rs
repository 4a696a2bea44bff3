//! RKM Command Line Interface
//!
//! Runs random split cross-validation and Parzen density estimation on datasets
//! in LibSVM or CSV format.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info, warn};
use rkm::classifier::{KernelMeanClassifier, ParzenDensity};
use rkm::core::{DensityFunction, Evaluator, KmError, Result};
use rkm::evaluation::{
    AccuracyEvaluator, ApEvaluator, CrossValidation, CrossValidationConfig,
    RandomSplitCrossValidation,
};
use rkm::kernel::{DoubleGaussL2, DoubleLinear, IndexDoubleGaussL2, KernelRef, KernelSet, Mkl};
use rkm::persistence::CrossValidationReport;
use rkm::DenseDataset;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

type Sample = Vec<f64>;
type Learner = KernelMeanClassifier<Sample, KernelRef<Sample>>;

#[derive(Parser)]
#[command(name = "rkm")]
#[command(about = "Kernel machines toolkit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "RKM Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Random split cross-validation of a kernel class-mean classifier
    Cv(CvArgs),
    /// Parzen window density of test samples
    Density(DensityArgs),
}

#[derive(Args)]
struct CvArgs {
    /// Data file (LibSVM or CSV format)
    #[arg(long)]
    data: PathBuf,

    /// Data format: auto, libsvm, or csv
    #[arg(short, long, default_value = "auto")]
    format: String,

    /// Kernel used by the classifier
    #[arg(short, long, default_value = "gauss")]
    kernel: CliKernel,

    /// Gaussian bandwidth (gauss and mkl kernels)
    #[arg(short, long, default_value = "0.1")]
    gamma: f64,

    /// Cross-validation configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fraction of each class used for training
    #[arg(long)]
    train_percent: Option<f64>,

    /// Number of random splits
    #[arg(long)]
    repeats: Option<usize>,

    /// Shuffling seed
    #[arg(long)]
    seed: Option<u64>,

    /// Split the whole list instead of each class
    #[arg(long)]
    no_balance: bool,

    /// Score of each split
    #[arg(short, long, default_value = "accuracy")]
    evaluator: CliEvaluator,

    /// Write a JSON report to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args)]
struct DensityArgs {
    /// Training data file
    #[arg(long)]
    train: PathBuf,

    /// Test data file
    #[arg(long)]
    test: PathBuf,

    /// Data format: auto, libsvm, or csv
    #[arg(short, long, default_value = "auto")]
    format: String,

    /// Gaussian bandwidth
    #[arg(short, long, default_value = "0.1")]
    gamma: f64,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliKernel {
    /// Gaussian kernel on the whole vector
    #[value(name = "gauss")]
    Gauss,
    /// Dot product
    #[value(name = "linear")]
    Linear,
    /// One Gaussian kernel per feature, uniform weights
    #[value(name = "mkl")]
    Mkl,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliEvaluator {
    /// Accuracy of sign predictions
    #[value(name = "accuracy")]
    Accuracy,
    /// Average precision of the ranking
    #[value(name = "ap")]
    Ap,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Cv(args) => cv_command(args),
        Commands::Density(args) => density_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn cv_command(args: CvArgs) -> Result<()> {
    let dataset = load_dataset(&args.data, &args.format)?;
    let (positives, negatives) = dataset.class_counts();
    info!(
        "Loaded {} samples with {} dimensions ({positives} positive, {negatives} negative)",
        dataset.len(),
        dataset.dim()
    );

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {path:?}");
            CrossValidationConfig::load_from_file(path)?
        }
        None => CrossValidationConfig::default(),
    };
    if let Some(train_percent) = args.train_percent {
        config.train_percent = train_percent;
    }
    if let Some(repeats) = args.repeats {
        config.repeat_count = repeats;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.no_balance {
        config.balance = false;
    }

    let kernel = build_kernel(args.kernel, args.gamma, dataset.dim());
    let classifier = Learner::new(kernel);
    let description = format!(
        "kernel mean classifier, {:?} kernel (gamma {}), {:?} evaluator",
        args.kernel, args.gamma, args.evaluator
    );

    let report = match args.evaluator {
        CliEvaluator::Accuracy => run_cross_validation(
            classifier,
            dataset,
            AccuracyEvaluator::new(),
            config,
            description,
        )?,
        CliEvaluator::Ap => run_cross_validation(
            classifier,
            dataset,
            ApEvaluator::new(),
            config,
            description,
        )?,
    };

    report.print_summary();
    if let Some(path) = &args.report {
        report.save_to_file(path)?;
        info!("Report saved to: {path:?}");
    }

    Ok(())
}

fn run_cross_validation<E: Evaluator<Sample, Learner>>(
    classifier: Learner,
    dataset: DenseDataset,
    evaluator: E,
    config: CrossValidationConfig,
    description: String,
) -> Result<CrossValidationReport> {
    let mut cv = RandomSplitCrossValidation::new(classifier, dataset.into_samples(), evaluator)
        .with_config(config);
    cv.run()?;

    CrossValidationReport::from_cross_validation(&cv, description)
        .ok_or_else(|| KmError::Evaluation("cross-validation produced no scores".to_string()))
}

fn build_kernel(kind: CliKernel, gamma: f64, dimensions: usize) -> KernelRef<Sample> {
    match kind {
        CliKernel::Gauss => Arc::new(DoubleGaussL2::new(gamma)),
        CliKernel::Linear => Arc::new(DoubleLinear::new()),
        CliKernel::Mkl => {
            let mut set: KernelSet<Sample> = KernelSet::new();
            for feature in 0..dimensions {
                set.add_kernel(Arc::new(IndexDoubleGaussL2::with_gamma(feature, gamma)));
            }
            set.normalize_weights();
            info!("Built {} per-feature kernels", set.kernels().len());
            Arc::new(set)
        }
    }
}

fn density_command(args: DensityArgs) -> Result<()> {
    let train = load_dataset(&args.train, &args.format)?;
    let test = load_dataset(&args.test, &args.format)?;
    info!(
        "Parzen density on {} training samples, {} test samples",
        train.len(),
        test.len()
    );

    let mut parzen = ParzenDensity::new(DoubleGaussL2::new(args.gamma));
    parzen.train(&train.vectors())?;

    println!("# Format: sample_index density");
    for (i, sample) in test.samples().iter().enumerate() {
        println!("{} {:.6}", i, parzen.value_of(&sample.sample));
    }

    Ok(())
}

fn load_dataset(path: &Path, format: &str) -> Result<DenseDataset> {
    let format = if format == "auto" {
        detect_format(path)
    } else {
        format.to_string()
    };
    info!("Loading {path:?} as {format} format");

    match format.as_str() {
        "libsvm" => DenseDataset::from_libsvm_file(path),
        "csv" => DenseDataset::from_csv_file(path),
        _ => Err(KmError::InvalidParameter(format!(
            "Unsupported format: {format}. Use 'libsvm' or 'csv'"
        ))),
    }
}

fn detect_format(path: &Path) -> String {
    if let Some(ext) = path.extension() {
        match ext.to_str() {
            Some("csv") => "csv".to_string(),
            Some("libsvm") | Some("svm") => "libsvm".to_string(),
            _ => {
                warn!("Unknown file extension, assuming LibSVM format");
                "libsvm".to_string()
            }
        }
    } else {
        warn!("No file extension, assuming LibSVM format");
        "libsvm".to_string()
    }
}
