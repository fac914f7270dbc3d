use std::path::PathBuf;

use anyhow::{anyhow, Context};
use charge_planner_data_management::{DataManager, DatabaseLocation};
use charge_planner_lib::{geo_point::GeoPoint, trip::TripRequest};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI for manual data operations
#[derive(Parser)]
struct Cli {
    /// SQLite file, defaults to data/database.db under the project root
    #[arg(long, env = "DATABASE_PATH")]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Insert the default stations if the table is empty
    Seed,
    /// List stored stations
    Stations,
    /// List planned trips, newest first
    Trips,
    /// Plan a trip against the stored stations and record it
    Plan {
        /// LAT,LNG
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        from: GeoPoint,
        /// LAT,LNG
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        to: GeoPoint,
        /// Battery percent at departure
        #[arg(long)]
        charge: i32,
        #[arg(long, default_value = "Model 3 Long Range")]
        model: String,
    },
}

fn parse_point(value: &str) -> anyhow::Result<GeoPoint> {
    let (lat, lng) = value.split_once(',').ok_or_else(|| anyhow!("expected LAT,LNG, got {value:?}"))?;
    Ok(GeoPoint::new(
        lat.trim().parse().context("invalid latitude")?,
        lng.trim().parse().context("invalid longitude")?,
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=trace", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let location = cli.database.map(DatabaseLocation::File).unwrap_or_default();
    let data_manager = DataManager::start(&location).await?;

    match cli.command {
        Command::Seed => {
            let inserted = data_manager.seed_default_stations().await?;
            println!("{inserted} stations inserted");
        }
        Command::Stations => {
            for station in data_manager.get_stations().await? {
                println!(
                    "{}  {:<45} {:>9.4},{:>10.4}  {}/{} stalls free, {} kW",
                    station.id, station.name, station.location.lat, station.location.lng, station.available, station.stalls, station.power
                );
            }
        }
        Command::Trips => {
            for trip in data_manager.get_trips().await? {
                println!(
                    "#{} {}  {}  {:.1} km  {:.2} h  {} stop(s)",
                    trip.trip_id,
                    trip.created_at.format("%Y-%m-%d %H:%M"),
                    trip.plan.vehicle_model,
                    trip.plan.total_distance,
                    trip.plan.total_time,
                    trip.plan.stops.len()
                );
            }
        }
        Command::Plan { from, to, charge, model } => {
            let trip = data_manager.plan_trip(&TripRequest::new(from, to, model, charge)).await?;

            println!("Trip #{}: {:.1} km, {:.2} h", trip.trip_id, trip.plan.total_distance, trip.plan.total_time);
            for (i, stop) in trip.plan.stops.iter().enumerate() {
                println!(
                    "  {}. {}  arrive {}%, leave {}%, charge {} min",
                    i + 1,
                    stop.name,
                    stop.arrival_charge,
                    stop.departure_charge,
                    stop.charging_time
                );
            }
        }
    }

    Ok(())
}

#[test]
fn test_parse_point() {
    assert_eq!(parse_point("37.7749, -122.4194").unwrap(), GeoPoint::new(37.7749, -122.4194));
    assert!(parse_point("37.7749").is_err());
    assert!(parse_point("north,-122").is_err());
}
