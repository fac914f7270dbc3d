pub const STATIONS_TABLE_NAME: &str = "Stations";
pub const STATION_ID: &str = "station_id";
pub const NAME: &str = "name";
pub const LAT: &str = "lat";
pub const LNG: &str = "lng";
pub const ADDRESS: &str = "address";
pub const CITY: &str = "city";
pub const STATE: &str = "state";
pub const STALLS: &str = "stalls";
pub const AVAILABLE: &str = "available";
pub const POWER: &str = "power";
pub const AMENITIES: &str = "amenities";
pub const BUSY_HOURS: &str = "busy_hours";

pub const TRIPS_TABLE_NAME: &str = "Trips";
pub const TRIP_ID: &str = "trip_id";
pub const TIMESTAMP: &str = "timestamp";
pub const ORIGIN_LAT: &str = "origin_lat";
pub const ORIGIN_LNG: &str = "origin_lng";
pub const DESTINATION_LAT: &str = "destination_lat";
pub const DESTINATION_LNG: &str = "destination_lng";
pub const VEHICLE_MODEL: &str = "vehicle_model";
pub const CURRENT_CHARGE: &str = "current_charge";
pub const STOPS: &str = "stops";
pub const TOTAL_DISTANCE: &str = "total_distance";
pub const TOTAL_TIME: &str = "total_time";

pub const VEHICLE_PROFILES_TABLE_NAME: &str = "VehicleProfiles";
pub const USER_ID: &str = "user_id";
pub const BATTERY_CAPACITY: &str = "battery_capacity";
// Vehicle model
// Current charge

/// Upper bound on stations handed to the planner and listed by the API.
pub const MAX_STATIONS: i64 = 1000;
