use std::str::FromStr;

use charge_planner_lib::{
    charging_station::ChargingStation,
    trip::{PlannedTrip, TripPlan},
    vehicle_profile::VehicleProfile,
};
use chrono::{DateTime, Utc};
use const_format::concatcp;
use sqlx::{
    query, query_as, query_scalar,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Executor, Pool, Sqlite,
};

use crate::{DataManagerError, DatabaseLocation};

use super::constants::*;

const STATION_COLUMNS: &str = concatcp!(
    STATION_ID, ", ", NAME, ", ", LAT, ", ", LNG, ", ", ADDRESS, ", ", CITY, ", ", STATE, ", ",
    STALLS, ", ", AVAILABLE, ", ", POWER, ", ", AMENITIES, ", ", BUSY_HOURS
);

const TRIP_COLUMNS: &str = concatcp!(
    TRIP_ID, ", ", TIMESTAMP, ", ", ORIGIN_LAT, ", ", ORIGIN_LNG, ", ", DESTINATION_LAT, ", ", DESTINATION_LNG, ", ",
    VEHICLE_MODEL, ", ", CURRENT_CHARGE, ", ", STOPS, ", ", TOTAL_DISTANCE, ", ", TOTAL_TIME
);

const PROFILE_COLUMNS: &str = concatcp!(USER_ID, ", ", VEHICLE_MODEL, ", ", BATTERY_CAPACITY, ", ", CURRENT_CHARGE);

#[derive(Clone)]
pub struct ChargeDatabase {
    pool: Pool<Sqlite>,
}

impl ChargeDatabase {
    pub async fn connect(location: &DatabaseLocation) -> Result<Self, DataManagerError> {
        let pool = match location {
            DatabaseLocation::File(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)
                        .map_err(|err| DataManagerError::Io(format!("Failed to create data directory {parent:?}: {err}")))?;
                }

                let options = SqliteConnectOptions::new()
                    .filename(path)
                    .foreign_keys(true)
                    .create_if_missing(true);

                SqlitePoolOptions::new().connect_with(options).await
            }
            DatabaseLocation::InMemory => {
                let options = SqliteConnectOptions::from_str("sqlite::memory:")
                    .map_err(|err| DataManagerError::Database(format!("Invalid in-memory options: {err}")))?;

                // Every connection to :memory: is its own database
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect_with(options)
                    .await
            }
        }
        .map_err(|err| DataManagerError::Database(format!("Failed to connect to database: {err}")))?;

        let db = Self { pool };

        db.init().await?;

        Ok(db)
    }

    pub async fn init(&self) -> Result<(), DataManagerError> {
        self.pool.execute(concatcp!("
            CREATE TABLE IF NOT EXISTS ", STATIONS_TABLE_NAME, "(",
                STATION_ID, " TEXT PRIMARY KEY,",
                NAME,       " TEXT NOT NULL,",
                LAT,        " REAL NOT NULL,",
                LNG,        " REAL NOT NULL,",
                ADDRESS,    " TEXT NOT NULL,",
                CITY,       " TEXT NOT NULL,",
                STATE,      " TEXT NOT NULL,",
                STALLS,     " INTEGER NOT NULL,",
                AVAILABLE,  " INTEGER NOT NULL,",
                POWER,      " INTEGER NOT NULL,",
                AMENITIES,  " BLOB NOT NULL,",
                BUSY_HOURS, " BLOB NOT NULL);

            CREATE TABLE IF NOT EXISTS ", TRIPS_TABLE_NAME, "(",
                TRIP_ID,         " INTEGER PRIMARY KEY AUTOINCREMENT,",
                TIMESTAMP,       " TIMESTAMP NOT NULL,",
                ORIGIN_LAT,      " REAL NOT NULL,",
                ORIGIN_LNG,      " REAL NOT NULL,",
                DESTINATION_LAT, " REAL NOT NULL,",
                DESTINATION_LNG, " REAL NOT NULL,",
                VEHICLE_MODEL,   " TEXT NOT NULL,",
                CURRENT_CHARGE,  " INTEGER NOT NULL,",
                STOPS,           " BLOB NOT NULL,",
                TOTAL_DISTANCE,  " REAL NOT NULL,",
                TOTAL_TIME,      " REAL NOT NULL);

            CREATE TABLE IF NOT EXISTS ", VEHICLE_PROFILES_TABLE_NAME, "(",
                USER_ID,          " TEXT PRIMARY KEY,",
                VEHICLE_MODEL,    " TEXT NOT NULL,",
                BATTERY_CAPACITY, " INTEGER NOT NULL,",
                CURRENT_CHARGE,   " INTEGER NOT NULL
            )"))
            .await
            .map_err(|err| DataManagerError::Database(format!("Failed to create tables: {err}")))
            .map(|_| ())
    }

    pub async fn count_stations(&self) -> Result<i64, DataManagerError> {
        query_scalar::<_, i64>(concatcp!("SELECT COUNT(*) FROM ", STATIONS_TABLE_NAME))
            .fetch_one(&self.pool).await
            .map_err(|err| DataManagerError::Database(format!("Failed to count stations: {err}")))
    }

    /// Inserts all stations in one transaction.
    pub async fn insert_stations(&self, stations: &[ChargingStation]) -> Result<(), DataManagerError> {
        let mut tx = self.pool.begin().await
            .map_err(|err| DataManagerError::Database(format!("Failed to begin transaction: {err}")))?;

        for station in stations {
            let amenities = station.get_amenities_blob().map_err(|err| DataManagerError::Encoding(err.to_string()))?;
            let busy_hours = station.get_busy_hours_blob().map_err(|err| DataManagerError::Encoding(err.to_string()))?;

            query(concatcp!("
                INSERT INTO ", STATIONS_TABLE_NAME, "(", STATION_COLUMNS, ")
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"))
                    .bind(&station.id)
                    .bind(&station.name)
                    .bind(station.location.lat)
                    .bind(station.location.lng)
                    .bind(&station.address)
                    .bind(&station.city)
                    .bind(&station.state)
                    .bind(station.stalls)
                    .bind(station.available)
                    .bind(station.power)
                    .bind(amenities)
                    .bind(busy_hours)
                    .execute(&mut *tx).await
                    .map_err(|err| DataManagerError::Database(format!("Failed to insert station {}: {err}", station.id)))?;
        }

        tx.commit().await
            .map_err(|err| DataManagerError::Database(format!("Failed to commit stations: {err}")))
    }

    /// Stations in insertion order, at most [`MAX_STATIONS`].
    pub async fn get_stations(&self) -> Result<Vec<ChargingStation>, DataManagerError> {
        query_as::<_, ChargingStation>(concatcp!("SELECT ", STATION_COLUMNS, " FROM ", STATIONS_TABLE_NAME, " ORDER BY rowid LIMIT ?1"))
            .bind(MAX_STATIONS)
            .fetch_all(&self.pool).await
            .map_err(|err| DataManagerError::Database(format!("Failed to get stations: {err}")))
    }

    pub async fn get_station(&self, station_id: &str) -> Result<Option<ChargingStation>, DataManagerError> {
        query_as::<_, ChargingStation>(concatcp!("SELECT ", STATION_COLUMNS, " FROM ", STATIONS_TABLE_NAME, " WHERE ", STATION_ID, " = ?1"))
            .bind(station_id)
            .fetch_optional(&self.pool).await
            .map_err(|err| DataManagerError::Database(format!("Failed to get station: {err}")))
    }

    pub async fn insert_trip(&self, plan: TripPlan, timestamp: DateTime<Utc>) -> Result<PlannedTrip, DataManagerError> {
        let stops = plan.get_stops_blob().map_err(|err| DataManagerError::Encoding(err.to_string()))?;

        let trip_id = query_scalar::<_, i64>(concatcp!("
            INSERT INTO ", TRIPS_TABLE_NAME, "(", TRIP_COLUMNS, ")
            VALUES (NULL, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) RETURNING ", TRIP_ID))
                .bind(timestamp)
                .bind(plan.origin.lat)
                .bind(plan.origin.lng)
                .bind(plan.destination.lat)
                .bind(plan.destination.lng)
                .bind(&plan.vehicle_model)
                .bind(plan.current_charge)
                .bind(stops)
                .bind(plan.total_distance)
                .bind(plan.total_time)
                .fetch_one(&self.pool).await
                .map_err(|err| DataManagerError::Database(format!("Failed to insert trip: {err}")))?;

        Ok(PlannedTrip::new(trip_id, timestamp, plan))
    }

    pub async fn get_trip(&self, trip_id: i64) -> Result<Option<PlannedTrip>, DataManagerError> {
        query_as::<_, PlannedTrip>(concatcp!("SELECT ", TRIP_COLUMNS, " FROM ", TRIPS_TABLE_NAME, " WHERE ", TRIP_ID, " = ?1"))
            .bind(trip_id)
            .fetch_optional(&self.pool).await
            .map_err(|err| DataManagerError::Database(format!("Failed to get trip: {err}")))
    }

    /// Newest first.
    pub async fn get_trips(&self) -> Result<Vec<PlannedTrip>, DataManagerError> {
        query_as::<_, PlannedTrip>(concatcp!("SELECT ", TRIP_COLUMNS, " FROM ", TRIPS_TABLE_NAME, " ORDER BY ", TRIP_ID, " DESC"))
            .fetch_all(&self.pool).await
            .map_err(|err| DataManagerError::Database(format!("Failed to get trips: {err}")))
    }

    pub async fn upsert_vehicle_profile(&self, profile: &VehicleProfile) -> Result<(), DataManagerError> {
        query(concatcp!("
            INSERT INTO ", VEHICLE_PROFILES_TABLE_NAME, "(", PROFILE_COLUMNS, ")
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(", USER_ID, ") DO UPDATE SET ",
                VEHICLE_MODEL,    " = excluded.", VEHICLE_MODEL, ", ",
                BATTERY_CAPACITY, " = excluded.", BATTERY_CAPACITY, ", ",
                CURRENT_CHARGE,   " = excluded.", CURRENT_CHARGE))
            .bind(&profile.user_id)
            .bind(&profile.vehicle_model)
            .bind(profile.battery_capacity)
            .bind(profile.current_charge)
            .execute(&self.pool).await
            .map_err(|err| DataManagerError::Database(format!("Failed to save vehicle profile: {err}")))
            .map(|_| ())
    }

    pub async fn get_vehicle_profile(&self, user_id: &str) -> Result<Option<VehicleProfile>, DataManagerError> {
        query_as::<_, VehicleProfile>(concatcp!("SELECT ", PROFILE_COLUMNS, " FROM ", VEHICLE_PROFILES_TABLE_NAME, " WHERE ", USER_ID, " = ?1"))
            .bind(user_id)
            .fetch_optional(&self.pool).await
            .map_err(|err| DataManagerError::Database(format!("Failed to get vehicle profile: {err}")))
    }
}
