use charge_planner_lib::{
    charging_station::{ChargingStation, TimeRange},
    geo_point::GeoPoint,
};
use uuid::Uuid;

struct SeedStation {
    name: &'static str,
    lat: f64,
    lng: f64,
    stalls: u32,
    available: u32,
    amenities: &'static [&'static str],
    busy_hours: &'static [(&'static str, &'static str)],
    address: &'static str,
    city: &'static str,
    state: &'static str,
}

const SEED_STATIONS: [SeedStation; 12] = [
    SeedStation {
        name: "San Francisco - Fremont Supercharger",
        lat: 37.5483, lng: -121.9886,
        stalls: 24, available: 18,
        amenities: &["restrooms", "food", "wifi", "shopping"],
        busy_hours: &[("08:00", "10:00"), ("17:00", "19:00")],
        address: "46900 Fremont Blvd", city: "Fremont", state: "CA",
    },
    SeedStation {
        name: "Los Angeles - Santa Monica Supercharger",
        lat: 34.0195, lng: -118.4912,
        stalls: 16, available: 12,
        amenities: &["restrooms", "wifi", "shopping"],
        busy_hours: &[("12:00", "14:00")],
        address: "1433 26th St", city: "Santa Monica", state: "CA",
    },
    SeedStation {
        name: "San Diego - Mission Valley Supercharger",
        lat: 32.7682, lng: -117.1649,
        stalls: 20, available: 15,
        amenities: &["restrooms", "food", "shopping"],
        busy_hours: &[("11:00", "13:00")],
        address: "1640 Camino Del Rio N", city: "San Diego", state: "CA",
    },
    SeedStation {
        name: "Las Vegas - Spring Valley Supercharger",
        lat: 36.1070, lng: -115.2218,
        stalls: 32, available: 24,
        amenities: &["restrooms", "food", "wifi", "lounge"],
        busy_hours: &[("09:00", "11:00"), ("15:00", "17:00")],
        address: "6730 S Las Vegas Blvd", city: "Las Vegas", state: "NV",
    },
    SeedStation {
        name: "Phoenix - Scottsdale Supercharger",
        lat: 33.4942, lng: -111.9261,
        stalls: 18, available: 10,
        amenities: &["restrooms", "food", "wifi"],
        busy_hours: &[("14:00", "16:00")],
        address: "15255 N Scottsdale Rd", city: "Scottsdale", state: "AZ",
    },
    SeedStation {
        name: "Seattle - Bellevue Supercharger",
        lat: 47.6101, lng: -122.2015,
        stalls: 20, available: 16,
        amenities: &["restrooms", "wifi", "food"],
        busy_hours: &[("08:00", "10:00")],
        address: "2055 152nd Ave NE", city: "Bellevue", state: "WA",
    },
    SeedStation {
        name: "Portland - Downtown Supercharger",
        lat: 45.5152, lng: -122.6784,
        stalls: 16, available: 14,
        amenities: &["restrooms", "wifi"],
        busy_hours: &[("07:00", "09:00")],
        address: "1455 SW Broadway", city: "Portland", state: "OR",
    },
    SeedStation {
        name: "Denver - Cherry Creek Supercharger",
        lat: 39.7294, lng: -104.9531,
        stalls: 22, available: 8,
        amenities: &["restrooms", "food", "wifi", "shopping"],
        busy_hours: &[("12:00", "14:00"), ("18:00", "20:00")],
        address: "3000 E 1st Ave", city: "Denver", state: "CO",
    },
    SeedStation {
        name: "Austin - Downtown Supercharger",
        lat: 30.2672, lng: -97.7431,
        stalls: 20, available: 17,
        amenities: &["restrooms", "food", "wifi"],
        busy_hours: &[("11:00", "13:00")],
        address: "98 San Jacinto Blvd", city: "Austin", state: "TX",
    },
    SeedStation {
        name: "Chicago - Lincoln Park Supercharger",
        lat: 41.9216, lng: -87.6499,
        stalls: 18, available: 12,
        amenities: &["restrooms", "wifi", "food"],
        busy_hours: &[("16:00", "18:00")],
        address: "1551 N Clark St", city: "Chicago", state: "IL",
    },
    SeedStation {
        name: "New York - Manhattan Supercharger",
        lat: 40.7580, lng: -73.9855,
        stalls: 14, available: 6,
        amenities: &["restrooms", "wifi"],
        busy_hours: &[("08:00", "10:00"), ("17:00", "19:00")],
        address: "234 W 42nd St", city: "New York", state: "NY",
    },
    SeedStation {
        name: "Miami - South Beach Supercharger",
        lat: 25.7907, lng: -80.1300,
        stalls: 16, available: 13,
        amenities: &["restrooms", "food", "wifi"],
        busy_hours: &[("10:00", "12:00")],
        address: "1120 Washington Ave", city: "Miami Beach", state: "FL",
    },
];

/// The default station network. Every call assigns fresh ids.
pub fn default_stations() -> Vec<ChargingStation> {
    SEED_STATIONS
        .iter()
        .map(|seed| ChargingStation {
            id: Uuid::new_v4().to_string(),
            name: seed.name.to_owned(),
            location: GeoPoint::new(seed.lat, seed.lng),
            stalls: seed.stalls,
            available: seed.available,
            power: 250,
            amenities: seed.amenities.iter().map(|tag| tag.to_string()).collect(),
            busy_hours: seed.busy_hours.iter().map(|(start, end)| TimeRange::new(start, end)).collect(),
            address: seed.address.to_owned(),
            city: seed.city.to_owned(),
            state: seed.state.to_owned(),
        })
        .collect()
}

#[test]
fn test_default_stations() {
    let stations = default_stations();
    assert_eq!(stations.len(), 12);

    let mut ids: Vec<&str> = stations.iter().map(|station| station.id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 12);

    for station in &stations {
        assert!(station.available <= station.stalls);
        assert!(station.location.has_valid_latitude() && station.location.has_valid_longitude());
    }
}

#[test]
fn test_san_francisco_to_los_angeles() {
    use charge_planner_lib::{distance, plan, trip::TripRequest};

    let stations = default_stations();
    let origin = GeoPoint::new(37.7749, -122.4194);
    let request = TripRequest::new(origin, GeoPoint::new(34.0522, -118.2437), "Model 3 Long Range", 80);

    let trip = plan(&request, &stations);

    assert!((trip.total_distance - 559.0).abs() < 1.0);
    assert_eq!(trip.stops.len(), 1);

    let nearest = stations
        .iter()
        .min_by(|a, b| distance(&origin, &a.location).total_cmp(&distance(&origin, &b.location)))
        .unwrap();
    assert_eq!(trip.stops[0].station_id, nearest.id);
    assert_eq!(trip.stops[0].name, "San Francisco - Fremont Supercharger");

    // 80 -> arrive 60, leave 95, 26 minutes
    assert_eq!(trip.stops[0].arrival_charge, 60);
    assert_eq!(trip.stops[0].departure_charge, 95);
    assert_eq!(trip.stops[0].charging_time, 26);
    assert!((trip.total_time - (trip.total_distance / 80.0 + 26.0 / 60.0)).abs() < 1e-12);
}
