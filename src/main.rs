// main.rs

mod config;
mod error;
mod groups;
mod output;
mod sampler;
mod table;

// --- External Crate Imports ---
use anyhow::{anyhow, Context, Error, Result};
use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::{fs, time::Instant};

use config::SubsampleConfig;
use groups::Grouping;
use sampler::GroupedSampler;
use table::Table;

// --- Main Function ---
fn main() -> Result<(), Error> {
    let total_time_start = Instant::now();

    // A bare invocation prints help and fails instead of reporting missing flags.
    if std::env::args_os().len() <= 1 {
        let mut command = cli::CliArgs::command();
        eprintln!("{}", command.render_help());
        std::process::exit(1);
    }
    let cli_args = cli::CliArgs::parse();

    // Initialize logger
    let log_level = cli_args
        .log_level
        .parse::<log::LevelFilter>()
        .unwrap_or_else(|_| {
            eprintln!(
                "Warning: Invalid log level '{}' provided. Defaulting to Info.",
                cli_args.log_level
            );
            log::LevelFilter::Info
        });
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_micros()
        .init();

    info!("Starting parse_groups with args: {:?}", cli_args);
    let config = cli_args.into_config();

    run(&config)?;

    info!(
        "parse_groups finished successfully in {:.2?}.",
        total_time_start.elapsed()
    );
    Ok(())
}

fn run(config: &SubsampleConfig) -> Result<()> {
    debug!(
        "Output prefix '{}' is accepted but not used; replicate files are named sample<N>.csv.",
        config.output_prefix
    );

    // --- 1. Load Table ---
    info!("Reading input CSV: {}", config.csv_path.display());
    let table = Table::from_csv_path(&config.csv_path)
        .with_context(|| format!("Failed to load input table {}", config.csv_path.display()))?;
    info!(
        "Loaded {} rows x {} columns.",
        table.num_rows(),
        table.columns().len()
    );
    let output_columns = config
        .resolve_output_columns(&table)
        .context("Invalid --colnames selection")?;
    debug!(
        "Output columns: {:?}",
        output_columns
            .iter()
            .map(|&c| table.columns()[c].as_str())
            .collect::<Vec<_>>()
    );

    // --- 2. Group Rows ---
    let grouping = Grouping::from_table(&table, &config.treatment_columns)
        .context("Failed to group rows by treatment")?;
    info!(
        "Found {} group(s) for treatment column(s) {:?} ({} row(s) without a treatment value).",
        grouping.len(),
        config.treatment_columns,
        grouping.skipped_rows()
    );
    if grouping.is_empty() {
        warn!("No groups found; every replicate file will contain only a header.");
    }

    // --- 3. Prepare Sampler ---
    let sampler = GroupedSampler::try_new(&grouping, config.sample_size)?;
    let mut rng = match config.seed {
        Some(seed) => {
            info!("Seeding sampler RNG with {}.", seed);
            ChaCha8Rng::seed_from_u64(seed)
        }
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    };

    // --- 4. Draw and Write Replicates ---
    let output_dir = &config.output_dir;
    if !output_dir.as_os_str().is_empty() && !output_dir.exists() {
        fs::create_dir_all(output_dir).map_err(|e| {
            anyhow!("Failed to create output directory {}: {}", output_dir.display(), e)
        })?;
        info!("Created output directory: {}", output_dir.display());
    }

    info!(
        "Writing {} replicate(s) of {} row(s) each ({} per group)...",
        config.replicate_count,
        sampler.rows_per_replicate(),
        config.sample_size
    );
    let pb_style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} replicates ({percent}%) ETA: {eta}",
        )
        .map_err(|e| anyhow!("Failed to create progress bar style: {}", e))?
        .progress_chars("=> ");
    let pb = ProgressBar::new(config.replicate_count as u64).with_style(pb_style);

    for replicate in 1..=config.replicate_count {
        let rows = sampler.draw(&mut rng);
        let path = output::replicate_file_path(output_dir, replicate);
        output::write_replicate(&path, &table, &rows, &output_columns)
            .with_context(|| format!("Failed to write replicate {}", replicate))?;
        pb.inc(1);
        debug!("Wrote {} row(s) to {}", rows.len(), path.display());
    }
    pb.finish_with_message("Sampling complete.");
    info!(
        "Wrote sample1.csv..sample{}.csv to {}",
        config.replicate_count,
        output_dir.display()
    );
    Ok(())
}

// --- Module Implementations ---

mod cli {
    use crate::config::{SubsampleConfig, DEFAULT_TREATMENT_COLUMN};
    use clap::Parser; // For the derive macro to find Parser
    use std::{num::NonZeroUsize, path::PathBuf};

    #[derive(Parser, Debug)]
    #[command(author, version, about = "Draw per-treatment random subsamples from a CSV file.", long_about = None, propagate_version = true)]
    pub(crate) struct CliArgs {
        /// Input CSV to be subsampled
        #[arg(short = 'c', long = "csv", required = true)]
        pub(crate) csv_path: PathBuf,

        /// Output prefix for subsampled CSV files (not used in file names)
        #[arg(short = 'o', long = "output", required = true)]
        pub(crate) output_prefix: String,

        /// Column name(s) for treatment
        #[arg(short = 't', long = "treatment", num_args = 1.., default_value = DEFAULT_TREATMENT_COLUMN)]
        pub(crate) treatment_columns: Vec<String>,

        /// Number of times to run sampling
        #[arg(short = 'n', long = "number", default_value = "1")]
        pub(crate) replicate_count: NonZeroUsize,

        /// Sample size to extract from each group
        #[arg(short = 's', long = "sample", default_value = "5")]
        pub(crate) sample_size: NonZeroUsize,

        /// Column name(s) for output (if not set, write all)
        #[arg(long = "colnames", num_args = 1..)]
        pub(crate) output_columns: Option<Vec<String>>,

        /// Directory receiving the sample<N>.csv files
        #[arg(short = 'd', long = "out-dir", default_value = ".")]
        pub(crate) output_dir: PathBuf,

        #[arg(long)]
        pub(crate) seed: Option<u64>,

        #[arg(long, default_value = "Info")]
        pub(crate) log_level: String,
    }

    impl CliArgs {
        pub(crate) fn into_config(self) -> SubsampleConfig {
            SubsampleConfig {
                csv_path: self.csv_path,
                output_prefix: self.output_prefix,
                output_dir: self.output_dir,
                treatment_columns: self.treatment_columns,
                replicate_count: self.replicate_count.get(),
                sample_size: self.sample_size.get(),
                output_columns: self.output_columns,
                seed: self.seed,
            }
        }
    }

}
