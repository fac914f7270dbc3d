use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "sqlx")]
use sqlx::{prelude::*, sqlite::SqliteRow};
use thiserror::Error;

use crate::geo_point::GeoPoint;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} latitude must be within [-90, 90], got {value}")]
    Latitude { field: &'static str, value: f64 },
    #[error("{field} longitude must be within [-180, 180], got {value}")]
    Longitude { field: &'static str, value: f64 },
    #[error("currentCharge must be within [0, 100], got {0}")]
    Charge(i32),
    #[error("batteryCapacity must be positive, got {0}")]
    BatteryCapacity(i32),
    #[error("vehicleModel must not be empty")]
    EmptyVehicleModel,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub vehicle_model: String,
    /// Percent, 0 to 100
    pub current_charge: i32,
}

impl TripRequest {
    pub fn new(origin: GeoPoint, destination: GeoPoint, vehicle_model: impl Into<String>, current_charge: i32) -> Self {
        Self {
            origin,
            destination,
            vehicle_model: vehicle_model.into(),
            current_charge,
        }
    }

    /// Checks the request before it is handed to the planner, which assumes well-formed input.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_point("origin", &self.origin)?;
        validate_point("destination", &self.destination)?;
        validate_charge(self.current_charge)?;

        if self.vehicle_model.trim().is_empty() {
            return Err(ValidationError::EmptyVehicleModel);
        }

        Ok(())
    }
}

pub(crate) fn validate_point(field: &'static str, point: &GeoPoint) -> Result<(), ValidationError> {
    if !point.has_valid_latitude() {
        return Err(ValidationError::Latitude { field, value: point.lat });
    }
    if !point.has_valid_longitude() {
        return Err(ValidationError::Longitude { field, value: point.lng });
    }
    Ok(())
}

pub(crate) fn validate_charge(charge: i32) -> Result<(), ValidationError> {
    if !(0..=100).contains(&charge) {
        return Err(ValidationError::Charge(charge));
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChargingStop {
    #[serde(rename = "superchargerId", alias = "stationId")]
    pub station_id: String,
    pub name: String,
    pub location: GeoPoint,
    pub arrival_charge: i32,
    pub departure_charge: i32,
    /// Minutes
    pub charging_time: i32,
}

/// Result of planning one trip. Stops are in visiting order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripPlan {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub vehicle_model: String,
    pub current_charge: i32,
    pub stops: Vec<ChargingStop>,
    /// Kilometers
    pub total_distance: f64,
    /// Hours, driving plus charging
    pub total_time: f64,
}

impl TripPlan {
    pub fn total_charging_minutes(&self) -> i32 {
        self.stops.iter().map(|stop| stop.charging_time).sum()
    }

    pub fn get_stops_blob(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(&self.stops)
    }
}

/// A plan as kept in the trip history.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlannedTrip {
    #[serde(rename = "id")]
    pub trip_id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub plan: TripPlan,
}

impl PlannedTrip {
    pub fn new(trip_id: i64, created_at: DateTime<Utc>, plan: TripPlan) -> Self {
        Self {
            trip_id,
            created_at,
            plan,
        }
    }
}

#[cfg(feature = "sqlx")]
impl FromRow<'_, SqliteRow> for PlannedTrip {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let stops: Vec<u8> = row.try_get(8)?;

        Ok(Self {
            trip_id: row.try_get(0)?,
            created_at: row.try_get(1)?,
            plan: TripPlan {
                origin: GeoPoint::new(row.try_get(2)?, row.try_get(3)?),
                destination: GeoPoint::new(row.try_get(4)?, row.try_get(5)?),
                vehicle_model: row.try_get(6)?,
                current_charge: row.try_get(7)?,
                stops: crate::decode_blob(&stops)?,
                total_distance: row.try_get(9)?,
                total_time: row.try_get(10)?,
            },
        })
    }
}

#[cfg(test)]
fn request(current_charge: i32) -> TripRequest {
    TripRequest::new(GeoPoint::new(37.7749, -122.4194), GeoPoint::new(34.0522, -118.2437), "Model 3 Long Range", current_charge)
}

#[test]
fn test_validate_accepts_well_formed_request() {
    assert_eq!(request(0).validate(), Ok(()));
    assert_eq!(request(100).validate(), Ok(()));
}

#[test]
fn test_validate_rejects_bad_charge() {
    assert_eq!(request(101).validate(), Err(ValidationError::Charge(101)));
    assert_eq!(request(-1).validate(), Err(ValidationError::Charge(-1)));
}

#[test]
fn test_validate_rejects_bad_coordinates() {
    let mut bad_origin = request(50);
    bad_origin.origin.lat = 91.0;
    assert_eq!(bad_origin.validate(), Err(ValidationError::Latitude { field: "origin", value: 91.0 }));

    let mut bad_destination = request(50);
    bad_destination.destination.lng = -180.5;
    assert_eq!(bad_destination.validate(), Err(ValidationError::Longitude { field: "destination", value: -180.5 }));
}

#[test]
fn test_validate_rejects_blank_model() {
    let mut blank = request(50);
    blank.vehicle_model = "   ".into();
    assert_eq!(blank.validate(), Err(ValidationError::EmptyVehicleModel));
}

#[test]
fn test_wire_names() {
    let request: TripRequest = serde_json::from_str(
        r#"{"origin": {"lat": 1.0, "lng": 2.0}, "destination": {"lat": 3.0, "lng": 4.0}, "vehicleModel": "Model Y", "currentCharge": 42}"#,
    )
    .unwrap();
    assert_eq!(request.current_charge, 42);

    let stop = ChargingStop {
        station_id: "s1".into(),
        name: "Fremont".into(),
        location: GeoPoint::new(37.5483, -121.9886),
        arrival_charge: 60,
        departure_charge: 95,
        charging_time: 26,
    };
    let trip = PlannedTrip::new(
        7,
        DateTime::from_timestamp(0, 0).unwrap(),
        TripPlan {
            origin: request.origin,
            destination: request.destination,
            vehicle_model: request.vehicle_model,
            current_charge: request.current_charge,
            stops: vec![stop],
            total_distance: 10.0,
            total_time: 1.0,
        },
    );

    let value = serde_json::to_value(&trip).unwrap();
    assert_eq!(value["id"], 7);
    assert_eq!(value["vehicleModel"], "Model Y");
    assert_eq!(value["stops"][0]["superchargerId"], "s1");
    assert_eq!(value["stops"][0]["chargingTime"], 26);
    assert_eq!(value["totalDistance"], 10.0);
    assert!(value.get("plan").is_none());
}
