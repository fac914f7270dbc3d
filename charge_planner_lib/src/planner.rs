//! Greedy charging-stop planner.
//!
//! Stations are ranked by distance from the trip origin only, not by how close
//! they are to the path between origin and destination. Each stop is then
//! simulated with fixed charge assumptions.

use crate::{
    charging_station::ChargingStation,
    distance::distance,
    trip::{ChargingStop, TripPlan, TripRequest},
};

pub const RANGE_PER_FULL_CHARGE_KM: f64 = 400.0;
/// Percent of battery used per km driven.
pub const BATTERY_USAGE_PER_KM: f64 = 100.0 / RANGE_PER_FULL_CHARGE_KM;
/// Percent-equivalent used to size the number of stops. Not a leg length.
pub const STOP_SIZING_PERCENT: f64 = 80.0;
pub const CHARGING_MINUTES_PER_PERCENT: f64 = 0.75;
pub const AVERAGE_SPEED_KMH: f64 = 80.0;

/// Charge lost between consecutive stops.
pub const LEG_CONSUMPTION_PERCENT: i32 = 20;
pub const MIN_ARRIVAL_CHARGE: i32 = 15;
pub const MAX_CHARGE_ADDED: i32 = 60;
pub const MAX_DEPARTURE_CHARGE: i32 = 95;

/// Plans charging stops for `request` using the candidate `stations`.
pub fn plan(request: &TripRequest, stations: &[ChargingStation]) -> TripPlan {
    let total_distance = distance(&request.origin, &request.destination);

    let stops = if needs_charging(total_distance, request.current_charge) {
        let num_stops = stop_count(total_distance, request.current_charge);
        let selected = closest_to(request, stations, num_stops);
        simulate_stops(&selected, request.current_charge)
    } else {
        Vec::new()
    };

    let mut plan = TripPlan {
        origin: request.origin,
        destination: request.destination,
        vehicle_model: request.vehicle_model.clone(),
        current_charge: request.current_charge,
        stops,
        total_distance,
        total_time: 0.0,
    };
    plan.total_time = total_distance / AVERAGE_SPEED_KMH + plan.total_charging_minutes() as f64 / 60.0;

    tracing::debug!(
        "Planned {:.1} km trip for {} with {} stop(s), {:.2} h",
        plan.total_distance,
        plan.vehicle_model,
        plan.stops.len(),
        plan.total_time
    );

    plan
}

/// True when the current charge cannot cover `total_distance`.
pub fn needs_charging(total_distance: f64, current_charge: i32) -> bool {
    total_distance > current_charge as f64 / BATTERY_USAGE_PER_KM
}

/// Heuristic number of stops. Never negative; NaN counts as zero.
pub fn stop_count(total_distance: f64, current_charge: i32) -> usize {
    let needed_percent = total_distance * BATTERY_USAGE_PER_KM;
    let stops = ((needed_percent - current_charge as f64) / STOP_SIZING_PERCENT).ceil();

    if stops.is_nan() || stops <= 0.0 {
        0
    } else {
        stops as usize
    }
}

/// The `count` stations nearest the origin. Ties keep input order.
fn closest_to<'a>(request: &TripRequest, stations: &'a [ChargingStation], count: usize) -> Vec<&'a ChargingStation> {
    let mut ranked: Vec<(f64, &ChargingStation)> = stations
        .iter()
        .map(|station| (distance(&request.origin, &station.location), station))
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

    ranked.into_iter().take(count).map(|(_, station)| station).collect()
}

fn simulate_stops(stations: &[&ChargingStation], start_charge: i32) -> Vec<ChargingStop> {
    let mut current_charge = start_charge;
    let mut stops = Vec::with_capacity(stations.len());

    for station in stations {
        let arrival_charge = current_charge.saturating_sub(LEG_CONSUMPTION_PERCENT).max(MIN_ARRIVAL_CHARGE);
        let departure_charge = arrival_charge.saturating_add(MAX_CHARGE_ADDED).min(MAX_DEPARTURE_CHARGE);
        let charging_time = charging_minutes(arrival_charge, departure_charge);

        stops.push(ChargingStop {
            station_id: station.id.clone(),
            name: station.name.clone(),
            location: station.location,
            arrival_charge,
            departure_charge,
            charging_time,
        });

        current_charge = departure_charge;
    }

    stops
}

/// Whole minutes to charge from `arrival` to `departure`, truncated.
pub fn charging_minutes(arrival: i32, departure: i32) -> i32 {
    ((departure - arrival) as f64 * CHARGING_MINUTES_PER_PERCENT).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{charging_station::TimeRange, geo_point::GeoPoint};

    fn station(id: &str, lat: f64, lng: f64) -> ChargingStation {
        ChargingStation {
            id: id.into(),
            name: format!("Station {id}"),
            location: GeoPoint::new(lat, lng),
            stalls: 8,
            available: 4,
            power: 250,
            amenities: vec!["restrooms".into()],
            busy_hours: vec![TimeRange::new("08:00", "10:00")],
            address: "1 Main St".into(),
            city: "Somewhere".into(),
            state: "CA".into(),
        }
    }

    fn stations() -> Vec<ChargingStation> {
        vec![
            station("far", 10.0, 0.0),
            station("near", 1.0, 0.0),
            station("mid", 5.0, 0.0),
            station("mid-west", 0.0, -7.0),
        ]
    }

    #[test]
    fn test_short_trip_has_no_stops() {
        // 1 degree of latitude, ~111 km, needs ~28%
        let request = TripRequest::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0), "Model Y", 50);
        let plan = plan(&request, &stations());

        assert!(plan.stops.is_empty());
        assert_eq!(plan.total_time, plan.total_distance / AVERAGE_SPEED_KMH);
        assert_eq!(plan.vehicle_model, "Model Y");
        assert_eq!(plan.current_charge, 50);
    }

    #[test]
    fn test_same_origin_and_destination() {
        let point = GeoPoint::new(37.7749, -122.4194);
        let request = TripRequest::new(point, point, "Model 3", 100);
        let plan = plan(&request, &stations());

        assert_eq!(plan.total_distance, 0.0);
        assert!(plan.stops.is_empty());
        assert_eq!(plan.total_time, 0.0);
    }

    #[test]
    fn test_exact_range_needs_no_stop() {
        assert!(!needs_charging(400.0, 100));
        assert!(needs_charging(400.1, 100));
        assert!(needs_charging(0.1, 0));
        assert!(!needs_charging(0.0, 0));
    }

    #[test]
    fn test_stop_count() {
        // 2000 km needs 500%, (500 - 20) / 80 = 6
        assert_eq!(stop_count(2000.0, 20), 6);
        // 559 km needs ~139.7%, (139.7 - 80) / 80 rounds up to 1
        assert_eq!(stop_count(559.0, 80), 1);
        assert_eq!(stop_count(2001.0, 20), 7);
    }

    #[test]
    fn test_stop_count_clamps_to_zero() {
        assert_eq!(stop_count(100.0, 100), 0);
        assert_eq!(stop_count(0.0, 100), 0);
        assert_eq!(stop_count(f64::NAN, 50), 0);
    }

    #[test]
    fn test_stations_ranked_by_distance_from_origin() {
        // ~2224 km due north, from 0% needs ceil(556 / 80) = 7 stops, only 4 stations
        let request = TripRequest::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(20.0, 0.0), "Model S", 0);
        let plan = plan(&request, &stations());

        let ids: Vec<&str> = plan.stops.iter().map(|stop| stop.station_id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "mid-west", "far"]);

        let origin = request.origin;
        let distances: Vec<f64> = plan.stops.iter().map(|stop| distance(&origin, &stop.location)).collect();
        assert!(distances.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let tied = vec![station("east", 0.0, 1.0), station("west", 0.0, -1.0), station("north", 1.0, 0.0)];
        let request = TripRequest::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(20.0, 0.0), "Model S", 0);
        let plan = plan(&request, &tied);

        let ids: Vec<&str> = plan.stops.iter().map(|stop| stop.station_id.as_str()).collect();
        assert_eq!(ids[..2], ["east", "west"]);
    }

    #[test]
    fn test_stop_charge_simulation() {
        let request = TripRequest::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(20.0, 0.0), "Model S", 30);
        let plan = plan(&request, &stations());

        // 30 -> arrive 15 (floor), leave 75; then arrive 55, leave 95; then 75 -> 95
        let charges: Vec<(i32, i32, i32)> = plan
            .stops
            .iter()
            .map(|stop| (stop.arrival_charge, stop.departure_charge, stop.charging_time))
            .collect();
        assert_eq!(charges, vec![(15, 75, 45), (55, 95, 30), (75, 95, 15), (75, 95, 15)]);

        for stop in &plan.stops {
            assert!(MIN_ARRIVAL_CHARGE <= stop.arrival_charge);
            assert!(stop.arrival_charge <= stop.departure_charge);
            assert!(stop.departure_charge <= MAX_DEPARTURE_CHARGE);
            assert_eq!(stop.charging_time, charging_minutes(stop.arrival_charge, stop.departure_charge));
        }

        assert_eq!(plan.total_charging_minutes(), 105);
        let expected = plan.total_distance / AVERAGE_SPEED_KMH + 105.0 / 60.0;
        assert!((plan.total_time - expected).abs() < 1e-12);
    }

    #[test]
    fn test_unvalidated_negative_charge_does_not_overflow() {
        let request = TripRequest::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(20.0, 0.0), "Model S", i32::MIN);
        let plan = plan(&request, &[station("only", 1.0, 0.0)]);

        assert_eq!(plan.stops.len(), 1);
        assert_eq!(plan.stops[0].arrival_charge, MIN_ARRIVAL_CHARGE);
        assert_eq!(plan.stops[0].departure_charge, MIN_ARRIVAL_CHARGE + MAX_CHARGE_ADDED);
    }

    #[test]
    fn test_charging_minutes_truncates() {
        assert_eq!(charging_minutes(15, 75), 45);
        assert_eq!(charging_minutes(60, 95), 26);
        assert_eq!(charging_minutes(95, 95), 0);
    }

    #[test]
    fn test_no_stations_available() {
        let request = TripRequest::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(20.0, 0.0), "Model S", 10);
        let plan = plan(&request, &[]);

        assert!(plan.stops.is_empty());
        assert_eq!(plan.total_time, plan.total_distance / AVERAGE_SPEED_KMH);
    }
}
