//! Command line entry point of the sensor pipeline stages.
use chrono::Utc;
use clap::{Parser, Subcommand};
use log::info;
use sensor_pipeline::artifact::{DataIngestionArtifact, DataTransformationArtifact};
use sensor_pipeline::config::{ConfigIO, PipelineConfig};
use sensor_pipeline::source::read_csv;
use sensor_pipeline::store::{dataset_to_documents, DocumentStore, FileDocumentStore};
use sensor_pipeline::{DataValidation, LogisticRegression, ModelTrainer, SensorError};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "sensor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Validate sensor data against a baseline and train the failure classifier", long_about = None)]
struct Args {
    /// YAML configuration file. Defaults place outputs under artifact/<timestamp>/
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Insert the rows of a CSV file into the configured collection
    Dump {
        /// CSV file to load
        csv: PathBuf,
    },
    /// Validate train and test partitions against the baseline dataset
    Validate {
        /// Train partition CSV
        #[arg(long)]
        train: PathBuf,
        /// Test partition CSV
        #[arg(long)]
        test: PathBuf,
        /// Baseline CSV, overrides the configured one
        #[arg(long)]
        base: Option<PathBuf>,
    },
    /// Train the classifier on transformed arrays and apply the acceptance gates
    Train {
        /// Transformed train array
        #[arg(long)]
        train_array: PathBuf,
        /// Transformed test array
        #[arg(long)]
        test_array: PathBuf,
    },
}

fn run(args: Args) -> Result<(), SensorError> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load_config(path)?,
        None => PipelineConfig::timestamped("artifact", Utc::now()),
    };

    match args.command {
        Command::Dump { csv } => {
            let dataset = read_csv(&csv)?;
            let store = FileDocumentStore::connect_from_env(&config.store.root)?;
            let n = store.insert_many(
                &config.store.database,
                &config.store.collection,
                dataset_to_documents(&dataset),
            )?;
            info!(
                "Inserted {} records into {}.{}",
                n, config.store.database, config.store.collection
            );
            store.close();
        }
        Command::Validate { train, test, base } => {
            if let Some(base) = base {
                config.validation.base_file_path = base;
            }
            let artifact = DataIngestionArtifact {
                train_file_path: train,
                test_file_path: test,
            };
            let artifact = DataValidation::new(config.validation, artifact).initiate_data_validation()?;
            println!("{}", artifact.report_file_path.display());
        }
        Command::Train {
            train_array,
            test_array,
        } => {
            let artifact = DataTransformationArtifact {
                transformed_train_path: train_array,
                transformed_test_path: test_array,
            };
            let artifact =
                ModelTrainer::new(config.trainer, artifact, LogisticRegression::default()).initiate_model_trainer()?;
            println!("{}", artifact);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
