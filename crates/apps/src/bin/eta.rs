use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

use eta_core::{table::sample_batch, DeliveryOrder, Table};
use eta_runtime::{init_tracing, ArtifactArgs, MetricsRegistry, PredictionService, StageTimer};
use eta_scenarios::Preset;
use eta_views::analytics::{average_by_weather, PerformanceRating};
use eta_views::AnnotateOptions;

#[derive(Parser)]
#[command(name = "eta", about = "Food-delivery time estimates")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score one order and print the estimate with insights.
    Predict {
        #[command(flatten)]
        artifacts: ArtifactArgs,
        #[command(flatten)]
        order: OrderArgs,
    },
    /// Score every row of a CSV or JSON upload.
    Batch {
        #[command(flatten)]
        artifacts: ArtifactArgs,
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
        /// Add confidence bands and insight labels.
        #[arg(long)]
        annotate: bool,
    },
    /// Write the five-row upload template.
    Sample {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Score preset scenarios side by side.
    Compare {
        #[command(flatten)]
        artifacts: ArtifactArgs,
        /// Presets to add; all of them when omitted.
        #[arg(long = "preset")]
        presets: Vec<Preset>,
    },
    /// Score the sample orders into a session and report on its history.
    History {
        #[command(flatten)]
        artifacts: ArtifactArgs,
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

#[derive(clap::Args)]
struct OrderArgs {
    #[arg(long, default_value_t = 30)]
    age: u32,
    #[arg(long, default_value_t = 4.5)]
    rating: f64,
    #[arg(long, default_value = "Sunny")]
    weather: String,
    #[arg(long, default_value = "Low")]
    traffic: String,
    #[arg(long, default_value_t = 1)]
    vehicle_condition: u32,
    #[arg(long, default_value = "Snack")]
    order_type: String,
    #[arg(long, default_value = "Motorcycle")]
    vehicle_type: String,
    #[arg(long, default_value_t = 0)]
    multiple_deliveries: u32,
    #[arg(long, default_value = "No")]
    festival: String,
    #[arg(long, default_value = "Metropolitan")]
    city: String,
    #[arg(long, default_value_t = 5.0)]
    distance_km: f64,
    #[arg(long, default_value_t = 10.0)]
    prep_time_min: f64,
    #[arg(long, default_value_t = 13)]
    order_hour: u32,
    #[arg(long, default_value_t = 3)]
    order_day: u32,
    #[arg(long)]
    weekend: bool,
}

impl From<OrderArgs> for DeliveryOrder {
    fn from(a: OrderArgs) -> Self {
        DeliveryOrder {
            age: a.age,
            rating: a.rating,
            weather: a.weather,
            traffic: a.traffic,
            vehicle_condition: a.vehicle_condition,
            order_type: a.order_type,
            vehicle_type: a.vehicle_type,
            multiple_deliveries: a.multiple_deliveries,
            festival: a.festival,
            city: a.city,
            distance_km: a.distance_km,
            prep_time_min: a.prep_time_min,
            order_hour: a.order_hour,
            order_day: a.order_day,
            is_weekend: a.weekend,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let metrics = MetricsRegistry::default();
    let timer = StageTimer::start();

    let label = match cli.command {
        Command::Predict { artifacts, order } => {
            let service = PredictionService::bootstrap(&artifacts.paths(), metrics.clone())?;
            let session = service.open_session();
            let report = service.predict(&session, order.into())?;
            print_json(&report)?;
            "predict"
        }
        Command::Batch {
            artifacts,
            input,
            output,
            format,
            annotate,
        } => {
            let service = PredictionService::bootstrap(&artifacts.paths(), metrics.clone())?;
            let rows = read_table(&input)?;
            let report = service.run_batch(&rows, annotate.then(AnnotateOptions::default))?;
            if let Some(summary) = &report.summary {
                info!(
                    total = summary.total_orders,
                    failed = summary.failed,
                    average = ?summary.average_time,
                    "batch summary"
                );
            }
            write_table(&report.table, format, output)?;
            "batch"
        }
        Command::Sample { output } => {
            write_table(&sample_batch(), Format::Csv, output)?;
            "sample"
        }
        Command::Compare { artifacts, presets } => {
            let service = PredictionService::bootstrap(&artifacts.paths(), metrics.clone())?;
            let session = service.open_session();
            let presets = if presets.is_empty() {
                Preset::ALL.to_vec()
            } else {
                presets
            };
            for preset in presets {
                service.add_preset(&session, preset)?;
            }
            #[derive(Serialize)]
            struct Comparison {
                scenarios: Vec<eta_core::Scenario>,
                summary: Option<eta_views::ScenarioComparison>,
            }
            print_json(&Comparison {
                scenarios: service.scenarios(&session)?,
                summary: service.compare(&session)?,
            })?;
            "compare"
        }
        Command::History { artifacts, format } => {
            let service = PredictionService::bootstrap(&artifacts.paths(), metrics.clone())?;
            let session = service.open_session();
            let sample = sample_batch();
            for index in 0..sample.len() {
                if let Some(record) = sample.record(index) {
                    service.predict_record(&session, &record)?;
                }
            }
            let history = service.history(&session)?;
            if let Some(stats) = service.statistics(&session)? {
                let rating = PerformanceRating::from_average(stats.average_time);
                info!(
                    count = stats.total_predictions,
                    average = stats.average_time,
                    rating = rating.message(),
                    "history statistics"
                );
            }
            if let Some(trend) = service.trends(&session)? {
                info!(trend = ?trend.trend, interval_min = trend.average_interval_minutes, "history trend");
            }
            for (weather, average) in average_by_weather(&history) {
                info!(%weather, average, "average by weather");
            }
            write_table(&service.export_history(&session)?, format, None)?;
            "history"
        }
    };

    info!(metrics = %metrics.snapshot().to_json_line(label, Some(timer.elapsed())), "done");
    Ok(())
}

fn read_table(path: &Path) -> Result<Table> {
    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let table = if is_json {
        let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let records: serde_json::Value = serde_json::from_str(&raw)?;
        Table::from_json_records(&records)?
    } else {
        Table::from_csv_path(path).with_context(|| format!("reading {}", path.display()))?
    };
    Ok(table)
}

fn write_table(table: &Table, format: Format, output: Option<PathBuf>) -> Result<()> {
    let mut sink: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(&path).with_context(|| format!("creating {}", path.display()))?),
        None => Box::new(io::stdout().lock()),
    };
    match format {
        Format::Csv => table.write_csv(&mut sink)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut sink, &table.to_json_records())?;
            writeln!(sink)?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
