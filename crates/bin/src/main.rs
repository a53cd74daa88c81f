//! Crema CLI binary.
//!
//! Trains the coffee price pipeline and serves predictions from the saved
//! artifact: one record from flags, a CSV batch, or an interactive form.

mod integration;

use clap::{Parser, Subcommand, ValueEnum};
use crema::data::{CoffeeAttributes, load_inference_csv, load_training_csv};
use crema::output::{EvaluationReportBuilder, ExportFormat, Exporter, PredictionExport};
use crema::{
    ArtifactStore, DEFAULT_MODEL_PATH, FileArtifactStore, FittedPipeline, PipelineHandle,
    TrainingConfig, predict_price, train_and_evaluate,
};
use indicatif::{ProgressBar, ProgressStyle};
use integration::form::PriceForm;
use integration::session::run_session;
use log::warn;
use serde_json::json;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "crema")]
#[command(about = "Crema: coffee price prediction", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the pipeline, report held-out scores and save the artifact
    Train {
        /// JSON training configuration (flags below override it)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Training dataset (CSV)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Artifact output path
        #[arg(long)]
        model: Option<PathBuf>,

        /// Number of trees
        #[arg(long)]
        trees: Option<usize>,

        /// Maximum tree depth
        #[arg(long)]
        max_depth: Option<usize>,

        /// Random seed for the forest
        #[arg(long)]
        seed: Option<u64>,

        /// Held-out fraction
        #[arg(long)]
        test_fraction: Option<f64>,

        /// Export the evaluation report (.json or .csv)
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Predict the price of one coffee
    Predict {
        /// Bean origin
        #[arg(long, default_value = "Ethiopia")]
        origin: String,

        /// Roast level
        #[arg(long, default_value = "Light")]
        roast: String,

        /// Flavor profile
        #[arg(long, default_value = "Fruity")]
        flavor: String,

        /// Customer rating (1-5)
        #[arg(long, default_value = "4.0")]
        rating: f64,

        /// Competitor price in INR (100-600)
        #[arg(long, default_value = "300")]
        competitor_price: f64,

        /// Bean cost in INR per kg (50-300)
        #[arg(long, default_value = "130")]
        bean_cost: f64,

        /// Sale month (1-12)
        #[arg(long, default_value = "6")]
        month: u32,

        /// Saved artifact
        #[arg(long, default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Predict every row of a CSV file
    Batch {
        /// Input CSV with the attribute columns
        input: PathBuf,

        /// Output file (.csv or .json); CSV on stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,

        /// Saved artifact
        #[arg(long, default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,
    },

    /// Answer prompts and get a price for each completed form
    Interactive {
        /// Saved artifact
        #[arg(long, default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            config,
            data,
            model,
            trees,
            max_depth,
            seed,
            test_fraction,
            report,
        } => {
            let mut config = match config {
                Some(path) => TrainingConfig::from_json_file(&path)?,
                None => TrainingConfig::default(),
            };
            if let Some(data) = data {
                config.data_path = data;
            }
            if let Some(model) = model {
                config.model_path = model;
            }
            if let Some(trees) = trees {
                config.forest.num_trees = trees;
            }
            if max_depth.is_some() {
                config.forest.max_depth = max_depth;
            }
            if let Some(seed) = seed {
                config.forest.random_seed = seed;
            }
            if let Some(fraction) = test_fraction {
                config.test_fraction = fraction;
            }
            train(&config, report.as_deref())?;
        }
        Commands::Predict {
            origin,
            roast,
            flavor,
            rating,
            competitor_price,
            bean_cost,
            month,
            model,
            format,
        } => {
            let attrs = CoffeeAttributes {
                bean_origin: origin,
                roast_level: roast,
                flavor_profile: flavor,
                customer_rating: rating,
                competitor_price,
                bean_cost,
                month,
            };
            predict_one(&attrs, &model, format)?;
        }
        Commands::Batch {
            input,
            output,
            model,
        } => {
            predict_batch(&input, output.as_deref(), &model)?;
        }
        Commands::Interactive { model } => {
            interactive(model)?;
        }
    }

    Ok(())
}

fn spinner(message: &'static str) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message);
    Ok(pb)
}

fn train(
    config: &TrainingConfig,
    report_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║{:^62}║", "COFFEE PRICE MODEL TRAINING");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Dataset: {}", config.data_path.display());
    println!(
        "Model: random forest ({} trees, max depth {}, seed {})",
        config.forest.num_trees,
        config
            .forest
            .max_depth
            .map_or_else(|| "unlimited".to_string(), |d| d.to_string()),
        config.forest.random_seed
    );
    println!(
        "Split: {:.0}% held out (seed {})\n",
        config.test_fraction * 100.0,
        config.split_seed
    );

    print!("Loading dataset...");
    std::io::stdout().flush()?;
    let records = match load_training_csv(&config.data_path, &config.schema) {
        Ok(records) => {
            println!(" ✓ ({} rows)", records.len());
            records
        }
        Err(e) => {
            println!(" ✗");
            return Err(crema::PipelineError::from(e).into());
        }
    };

    let pb = spinner("Fitting encoder and random forest...")?;
    let outcome = match train_and_evaluate(&records, config) {
        Ok(outcome) => {
            pb.finish_with_message(format!(
                "Fitted {} trees on {} rows ({} features)",
                outcome.pipeline.forest().trees().len(),
                outcome.n_train,
                outcome.pipeline.feature_names().len()
            ));
            outcome
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(e.into());
        }
    };

    print!("Saving model...");
    std::io::stdout().flush()?;
    FileArtifactStore::new().save(&outcome.pipeline, &config.model_path)?;
    println!(" ✓");

    let report = EvaluationReportBuilder::new()
        .dataset(config.data_path.clone())
        .model_path(config.model_path.clone())
        .split(outcome.n_train, outcome.n_test)
        .metrics(outcome.metrics)
        .num_trees(outcome.pipeline.forest().trees().len())
        .feature_names(outcome.pipeline.feature_names().to_vec())
        .build()?;
    println!("{}", report.to_ascii_table());

    if let Some(path) = report_path {
        report.export_to_file(path, ExportFormat::from_path(path)?)?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

/// Load the artifact, logging the cause when it is unavailable.
fn load_pipeline(model: &Path) -> Option<FittedPipeline> {
    match FileArtifactStore::new().load(model) {
        Ok(pipeline) => Some(pipeline),
        Err(e) => {
            warn!("Could not load model: {}", e);
            None
        }
    }
}

fn predict_one(
    attrs: &CoffeeAttributes,
    model: &Path,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    attrs.validate()?;
    let pipeline = load_pipeline(model);
    let price = predict_price(pipeline.as_ref(), &attrs.to_record())?;

    match format {
        OutputFormat::Text => {
            println!(
                "{} / {} / {}, rating {}, competitor ₹{}, bean cost ₹{}, month {}",
                attrs.bean_origin,
                attrs.roast_level,
                attrs.flavor_profile,
                attrs.customer_rating,
                attrs.competitor_price,
                attrs.bean_cost,
                attrs.month
            );
            println!("Predicted price: ₹{:.2}", price);
        }
        OutputFormat::Json => {
            let output = json!({
                "attributes": attrs,
                "predicted_price": price,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn predict_batch(
    input: &Path,
    output: Option<&Path>,
    model: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = load_pipeline(model).ok_or(crema::PipelineError::ModelNotLoaded)?;
    let records =
        load_inference_csv(input, pipeline.schema()).map_err(crema::PipelineError::from)?;
    let prices = pipeline.predict_batch(&records)?;
    let export = PredictionExport::from_records(pipeline.schema(), &records, &prices)?;

    match output {
        Some(path) => {
            export.export_to_file(path, ExportFormat::from_path(path)?)?;
            eprintln!(
                "✓ {} predictions written to {} (mean ₹{:.2})",
                export.len(),
                path.display(),
                export.mean_price().unwrap_or_default()
            );
        }
        None => print!("{}", export.export_to_string(ExportFormat::Csv)?),
    }

    Ok(())
}

fn interactive(model: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let handle = PipelineHandle::from_file(model);

    println!("Coffee price predictor. Press Enter to keep a default, q to quit.\n");
    let stdin = std::io::stdin();
    let mut form = PriceForm::new(stdin.lock(), std::io::stdout());
    let summary = run_session(&handle, &mut form)?;

    println!(
        "\n{} prediction(s), {} failed request(s)",
        summary.predicted, summary.failed
    );
    Ok(())
}
