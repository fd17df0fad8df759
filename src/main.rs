use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use record_finder::{FinderError, JobConfig, RecordFinder, Result, shard};
use serde_json::{Map, Value};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "record-finder")]
#[command(about = "Find cmsRun job records matching a field spec", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the mapper over every shard file, then the reducer once.
    Find {
        /// Job configuration (JSON mapping with spec/fields/output/verbose).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Spec as inline JSON, e.g. '{"dataset": "MC_"}'. Replaces the config's spec.
        #[arg(long)]
        spec: Option<String>,

        /// Project this field on output; repeat for several, in order.
        #[arg(long = "field")]
        fields: Vec<String>,

        /// Write matched records to this file as a JSON list.
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        #[arg(short, long)]
        verbose: bool,

        /// Shard files: a JSON list of records or JSON Lines.
        #[arg(required = true)]
        shards: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Find {
            config,
            spec,
            fields,
            output,
            verbose,
            shards,
        } => {
            // 1) Job configuration: file first, then command-line overrides.
            let mut options = match &config {
                Some(path) => {
                    let text = std::fs::read_to_string(path)
                        .with_context(|| format!("read config file {}", path.display()))?;
                    serde_json::from_str::<Value>(&text)
                        .with_context(|| format!("parse config file {}", path.display()))?
                }
                None => Value::Object(Map::new()),
            };
            if let Some(spec) = spec {
                let spec: Value = serde_json::from_str(&spec).context("parse --spec")?;
                match &mut options {
                    Value::Object(map) => {
                        map.insert("spec".to_string(), spec);
                    }
                    other => bail!(FinderError::Config(format!(
                        "configuration must be a mapping, got {}",
                        other
                    ))),
                }
            }
            let mut job = JobConfig::from_value(&options)?;
            if !fields.is_empty() {
                job.fields = fields;
            }
            if output.is_some() {
                job.output = output;
            }
            job.verbose |= verbose;

            let finder = RecordFinder::new(job)?;

            // 2) Map every shard.
            let mut batches = Vec::with_capacity(shards.len());
            for path in &shards {
                let records = shard::read_shard(path)?;
                let matched = finder.map(records)?;
                log::debug!("{}: {} matches", path.display(), matched.len());
                batches.push(matched);
            }

            // 3) Reduce and report.
            let summary = finder.reduce(batches)?;
            println!("{}", serde_json::to_string(&summary)?);
        }
    }

    Ok(())
}
