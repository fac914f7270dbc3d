pub mod charging_station;
pub mod distance;
pub mod geo_point;
pub mod planner;
pub mod trip;
pub mod vehicle_profile;

pub use distance::distance;
pub use planner::plan;

#[cfg(feature = "sqlx")]
pub(crate) fn decode_blob<T: serde::de::DeserializeOwned>(blob: &[u8]) -> sqlx::Result<T> {
    bincode::deserialize(blob).map_err(|err| sqlx::Error::Decode(err))
}
