use charge_planner_lib::{
    charging_station::ChargingStation,
    planner,
    trip::{PlannedTrip, TripRequest},
    vehicle_profile::VehicleProfile,
};

use crate::{database::db::ChargeDatabase, seed, DataManagerError, DatabaseLocation};

#[derive(Clone)]
pub struct DataManager {
    pub(crate) database: ChargeDatabase,
}

/// The public interface for stations, trip history and vehicle profiles.
impl DataManager {
    /// Opens the database and seeds the default stations if there are none.
    pub async fn start(location: &DatabaseLocation) -> Result<Self, DataManagerError> {
        tracing::debug!("Opening database {:?}", location);
        let database = ChargeDatabase::connect(location).await?;

        let data_manager = DataManager { database };
        data_manager.seed_default_stations().await?;

        Ok(data_manager)
    }

    /// Returns the number of stations inserted, zero if any already existed.
    pub async fn seed_default_stations(&self) -> Result<usize, DataManagerError> {
        if self.database.count_stations().await? > 0 {
            return Ok(0);
        }

        let stations = seed::default_stations();
        self.database.insert_stations(&stations).await?;
        tracing::info!("Inserted {} charging stations", stations.len());

        Ok(stations.len())
    }

    pub async fn add_stations(&self, stations: &[ChargingStation]) -> Result<(), DataManagerError> {
        self.database.insert_stations(stations).await
    }

    pub async fn get_stations(&self) -> Result<Vec<ChargingStation>, DataManagerError> {
        self.database.get_stations().await
    }

    pub async fn get_station(&self, station_id: &str) -> Result<ChargingStation, DataManagerError> {
        self.database
            .get_station(station_id)
            .await?
            .ok_or_else(|| DataManagerError::NotFound("Supercharger not found".into()))
    }

    /// Validates the request, plans it against every stored station and records the plan.
    pub async fn plan_trip(&self, request: &TripRequest) -> Result<PlannedTrip, DataManagerError> {
        request.validate()?;

        let stations = self.database.get_stations().await?;
        let plan = planner::plan(request, &stations);

        let trip = self.database.insert_trip(plan, chrono::Utc::now()).await?;
        tracing::info!(
            "Planned trip {} ({:.1} km, {} stops)",
            trip.trip_id,
            trip.plan.total_distance,
            trip.plan.stops.len()
        );

        Ok(trip)
    }

    pub async fn get_trips(&self) -> Result<Vec<PlannedTrip>, DataManagerError> {
        self.database.get_trips().await
    }

    pub async fn get_trip(&self, trip_id: i64) -> Result<PlannedTrip, DataManagerError> {
        self.database
            .get_trip(trip_id)
            .await?
            .ok_or_else(|| DataManagerError::NotFound("Trip not found".into()))
    }

    /// Creates or replaces the profile of `profile.user_id`.
    pub async fn save_vehicle_profile(&self, profile: VehicleProfile) -> Result<VehicleProfile, DataManagerError> {
        profile.validate()?;
        self.database.upsert_vehicle_profile(&profile).await?;
        Ok(profile)
    }

    /// Falls back to the default profile when the user has not saved one.
    pub async fn get_vehicle_profile(&self, user_id: &str) -> Result<VehicleProfile, DataManagerError> {
        Ok(self
            .database
            .get_vehicle_profile(user_id)
            .await?
            .unwrap_or_else(|| VehicleProfile::default_for(user_id)))
    }
}

#[cfg(test)]
mod tests {
    use charge_planner_lib::{geo_point::GeoPoint, trip::ValidationError};

    use super::*;

    async fn data_manager() -> DataManager {
        DataManager::start(&DatabaseLocation::InMemory).await.unwrap()
    }

    fn sf_to_la(current_charge: i32) -> TripRequest {
        TripRequest::new(GeoPoint::new(37.7749, -122.4194), GeoPoint::new(34.0522, -118.2437), "Model 3 Long Range", current_charge)
    }

    #[tokio::test]
    async fn test_start_seeds_once() {
        let data_manager = data_manager().await;

        let stations = data_manager.get_stations().await.unwrap();
        assert_eq!(stations.len(), 12);
        assert_eq!(stations[0].name, "San Francisco - Fremont Supercharger");
        assert_eq!(stations[11].name, "Miami - South Beach Supercharger");

        assert_eq!(data_manager.seed_default_stations().await.unwrap(), 0);
        assert_eq!(data_manager.get_stations().await.unwrap().len(), 12);
    }

    #[tokio::test]
    async fn test_station_lookup() {
        let data_manager = data_manager().await;
        let stations = data_manager.get_stations().await.unwrap();

        let station = data_manager.get_station(&stations[3].id).await.unwrap();
        assert_eq!(station, stations[3]);
        assert_eq!(station.busy_hours.len(), 2);

        let missing = data_manager.get_station("no-such-station").await;
        assert!(matches!(missing, Err(DataManagerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_plan_trip_is_recorded() {
        let data_manager = data_manager().await;

        let trip = data_manager.plan_trip(&sf_to_la(80)).await.unwrap();
        assert_eq!(trip.plan.stops.len(), 1);
        assert_eq!(trip.plan.stops[0].name, "San Francisco - Fremont Supercharger");

        let stored = data_manager.get_trip(trip.trip_id).await.unwrap();
        assert_eq!(stored.plan, trip.plan);
        assert_eq!(stored.created_at, trip.created_at);
    }

    #[tokio::test]
    async fn test_added_station_is_planned_against() {
        let data_manager = data_manager().await;

        // A few blocks from the San Francisco origin, closer than Fremont
        let mut station = data_manager.get_stations().await.unwrap().remove(0);
        station.id = "sf-downtown".into();
        station.name = "San Francisco - Downtown Supercharger".into();
        station.location = GeoPoint::new(37.7840, -122.4070);
        data_manager.add_stations(&[station.clone()]).await.unwrap();

        assert_eq!(data_manager.get_stations().await.unwrap().len(), 13);
        assert_eq!(data_manager.get_station("sf-downtown").await.unwrap(), station);

        let trip = data_manager.plan_trip(&sf_to_la(80)).await.unwrap();
        assert_eq!(trip.plan.stops.len(), 1);
        assert_eq!(trip.plan.stops[0].station_id, "sf-downtown");
    }

    #[tokio::test]
    async fn test_trip_history_newest_first() {
        let data_manager = data_manager().await;

        let first = data_manager.plan_trip(&sf_to_la(80)).await.unwrap();
        let second = data_manager.plan_trip(&sf_to_la(100)).await.unwrap();

        let ids: Vec<i64> = data_manager.get_trips().await.unwrap().iter().map(|trip| trip.trip_id).collect();
        assert_eq!(ids, vec![second.trip_id, first.trip_id]);

        assert!(matches!(data_manager.get_trip(second.trip_id + 1).await, Err(DataManagerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_invalid_request_is_not_recorded() {
        let data_manager = data_manager().await;

        let result = data_manager.plan_trip(&sf_to_la(150)).await;
        assert!(matches!(result, Err(DataManagerError::Validation(ValidationError::Charge(150)))));
        assert!(data_manager.get_trips().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_vehicle_profile_upsert() {
        let data_manager = data_manager().await;

        let default = data_manager.get_vehicle_profile("alice").await.unwrap();
        assert_eq!(default, VehicleProfile::default_for("alice"));

        let mut profile = VehicleProfile::default_for("alice");
        profile.vehicle_model = "Model Y".into();
        profile.current_charge = 40;
        data_manager.save_vehicle_profile(profile.clone()).await.unwrap();
        assert_eq!(data_manager.get_vehicle_profile("alice").await.unwrap(), profile);

        profile.current_charge = 65;
        data_manager.save_vehicle_profile(profile.clone()).await.unwrap();
        assert_eq!(data_manager.get_vehicle_profile("alice").await.unwrap().current_charge, 65);

        // Other users are unaffected
        assert_eq!(data_manager.get_vehicle_profile("bob").await.unwrap(), VehicleProfile::default_for("bob"));
    }
}
