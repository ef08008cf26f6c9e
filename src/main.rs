#[cfg(feature = "mimalloc")]
use mimalloc::MiMalloc;
#[cfg_attr(feature = "mimalloc", global_allocator)]
#[cfg(feature = "mimalloc")]
static GLOBAL: MiMalloc = MiMalloc;

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, SecondsFormat};
use clap::{Parser, Subcommand};
use log::error;

use tollgate::geo::parse_linestring;
use tollgate::ledger::OnBoardUnit;
use tollgate::matcher::{FixedClock, SystemClock};
use tollgate::trip::{evaluate_trip, TollContext, TripCharge};
use tollgate::util::logging::initialize_logger;
use tollgate::{Error, RoadModel, TollConfig};

#[derive(Parser)]
#[command(name = "tollgate")]
#[command(version)]
#[command(about = "Evaluates the toll of GPS traces against a road model")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory of `*.wkt` road sections
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Match a trace and price it for a unit
    Evaluate {
        /// Directory holding the day/night rate tables
        #[arg(long)]
        rate_dir: Option<PathBuf>,

        /// Directory of the local model cache
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// WKT `LINESTRING` of the driven trace, in degrees
        #[arg(long)]
        trace: PathBuf,

        /// JSON description of the on-board unit
        #[arg(long)]
        unit: PathBuf,

        /// Matching threshold, in meters
        #[arg(long)]
        threshold: Option<f64>,

        /// Timestamp every waypoint with this RFC3339 time instead of the wall clock
        #[arg(long)]
        at: Option<DateTime<FixedOffset>>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the versions and checksums of the model's sections
    Versions,
}

fn main() {
    initialize_logger();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> tollgate::Result<()> {
    let mut config = TollConfig::from_env()?;
    if let Some(model_dir) = cli.model_dir {
        config.model_dir = model_dir;
    }

    match cli.command {
        Command::Versions => {
            let model = RoadModel::from_directory(&config.model_dir)?;
            println!("{}", to_json(&model.versions())?);
        }
        Command::Evaluate {
            rate_dir,
            cache_dir,
            trace,
            unit,
            threshold,
            at,
            json,
        } => {
            if let Some(rate_dir) = rate_dir {
                config.rate_dir = rate_dir;
            }
            if let Some(cache_dir) = cache_dir {
                config.cache_dir = cache_dir;
            }
            if let Some(threshold) = threshold {
                config.threshold = threshold;
            }

            let context = TollContext::load(config)?;
            let trace = parse_linestring(&read(&trace)?)?;
            let unit = OnBoardUnit::from_json(&read(&unit)?)
                .map_err(|err| Error::Input(format!("malformed unit: {err}")))?;

            let charge = match at {
                Some(at) => evaluate_trip(&context, &trace, &unit.profile(), &FixedClock(at))?,
                None => evaluate_trip(&context, &trace, &unit.profile(), &SystemClock)?,
            };

            if json {
                println!("{}", to_json(&charge)?);
            } else {
                print_charge(&context, &charge, &unit.currency);
            }
        }
    }

    Ok(())
}

fn print_charge(context: &TollContext, charge: &TripCharge, currency: &str) {
    println!("checkpoints:");
    for checkpoint in &charge.checkpoints {
        let road = context
            .model
            .section(checkpoint.section)
            .map_or("?", |section| section.name());

        println!(
            "  {road} #{} at {}",
            checkpoint.point,
            checkpoint.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
    }

    println!("segments:");
    for priced in &charge.segments {
        let segment = &priced.segment;
        println!(
            "  {} {} {:.1}m -> {:.2} {currency}",
            segment.road_name, segment.bucket, segment.distance, priced.charge
        );
    }

    for failure in &charge.failures {
        println!("  segment {} not priced: {}", failure.segment, failure.error);
    }

    println!("total: {:.2} {currency}", charge.total);
}

fn read(path: &Path) -> tollgate::Result<String> {
    std::fs::read_to_string(path)
        .map_err(|err| Error::Input(format!("cannot read {}: {err}", path.display())))
}

fn to_json<T: serde::Serialize>(value: &T) -> tollgate::Result<String> {
    serde_json::to_string_pretty(value).map_err(|err| Error::Input(err.to_string()))
}
