use serde::{Deserialize, Serialize};
#[cfg(feature = "sqlx")]
use sqlx::{prelude::*, sqlite::SqliteRow};

use crate::geo_point::GeoPoint;

/// Daily window, "HH:MM" to "HH:MM", in which a station is usually crowded.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

impl TimeRange {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: start.to_owned(),
            end: end.to_owned(),
        }
    }
}

/// A charging site. Fields not listed here are dropped when deserializing.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChargingStation {
    pub id: String,
    pub name: String,
    pub location: GeoPoint,
    pub stalls: u32,
    pub available: u32,
    /// Peak power in kW
    pub power: u32,
    pub amenities: Vec<String>,
    pub busy_hours: Vec<TimeRange>,
    pub address: String,
    pub city: String,
    pub state: String,
}

impl ChargingStation {
    pub fn get_amenities_blob(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(&self.amenities)
    }

    pub fn get_busy_hours_blob(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(&self.busy_hours)
    }
}

#[cfg(feature = "sqlx")]
impl FromRow<'_, SqliteRow> for ChargingStation {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let amenities: Vec<u8> = row.try_get(10)?;
        let busy_hours: Vec<u8> = row.try_get(11)?;

        Ok(Self {
            id: row.try_get(0)?,
            name: row.try_get(1)?,
            location: GeoPoint::new(row.try_get(2)?, row.try_get(3)?),
            address: row.try_get(4)?,
            city: row.try_get(5)?,
            state: row.try_get(6)?,
            stalls: row.try_get(7)?,
            available: row.try_get(8)?,
            power: row.try_get(9)?,
            amenities: crate::decode_blob(&amenities)?,
            busy_hours: crate::decode_blob(&busy_hours)?,
        })
    }
}

#[test]
fn test_unknown_fields_are_dropped() {
    let json = r#"{
        "id": "abc",
        "name": "Fremont",
        "location": {"lat": 37.5483, "lng": -121.9886},
        "stalls": 24,
        "available": 18,
        "power": 250,
        "amenities": ["restrooms", "food"],
        "busyHours": [{"start": "08:00", "end": "10:00"}],
        "address": "46900 Fremont Blvd",
        "city": "Fremont",
        "state": "CA",
        "_id": "legacy-object-id",
        "rating": 4.5
    }"#;

    let station: ChargingStation = serde_json::from_str(json).unwrap();
    assert_eq!(station.id, "abc");
    assert_eq!(station.busy_hours, vec![TimeRange::new("08:00", "10:00")]);

    let value = serde_json::to_value(&station).unwrap();
    assert!(value.get("rating").is_none());
    assert!(value.get("busyHours").is_some());
}

#[test]
fn test_blobs_round_trip() {
    let station = ChargingStation {
        id: "abc".into(),
        name: "Fremont".into(),
        location: GeoPoint::new(37.5483, -121.9886),
        stalls: 24,
        available: 18,
        power: 250,
        amenities: vec!["wifi".into(), "food".into()],
        busy_hours: vec![TimeRange::new("17:00", "19:00")],
        address: "46900 Fremont Blvd".into(),
        city: "Fremont".into(),
        state: "CA".into(),
    };

    let amenities: Vec<String> = bincode::deserialize(&station.get_amenities_blob().unwrap()).unwrap();
    let busy_hours: Vec<TimeRange> = bincode::deserialize(&station.get_busy_hours_blob().unwrap()).unwrap();
    assert_eq!(amenities, station.amenities);
    assert_eq!(busy_hours, station.busy_hours);
}
