use geo_types::Point;

use crate::geo_point::GeoPoint;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two positions in kilometers (Haversine).
///
/// Never fails. Coordinates outside the valid ranges are used as given.
pub fn distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    haversine_km((*a).into(), (*b).into())
}

/// Same as [`distance`], for `geo_types` points (x = longitude, y = latitude).
pub fn haversine_km(a: Point, b: Point) -> f64 {
    let (lat1, lon1) = (a.y().to_radians(), a.x().to_radians());
    let (lat2, lon2) = (b.y().to_radians(), b.x().to_radians());

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    // Rounding can push h just past 1 for antipodal points
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

#[test]
fn test_distance_to_self_is_zero() {
    for point in [
        GeoPoint::new(0.0, 0.0),
        GeoPoint::new(37.7749, -122.4194),
        GeoPoint::new(-89.9, 179.9),
    ] {
        assert_eq!(distance(&point, &point), 0.0);
    }
}

#[test]
fn test_distance_is_symmetric() {
    let sf = GeoPoint::new(37.7749, -122.4194);
    let la = GeoPoint::new(34.0522, -118.2437);
    let nyc = GeoPoint::new(40.7580, -73.9855);

    assert_eq!(distance(&sf, &la), distance(&la, &sf));
    assert_eq!(distance(&sf, &nyc), distance(&nyc, &sf));
}

#[test]
fn test_one_degree_of_latitude() {
    let a = GeoPoint::new(0.0, 0.0);
    let b = GeoPoint::new(1.0, 0.0);

    let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
    assert!((distance(&a, &b) - expected).abs() < 1e-9);
    assert!((distance(&a, &b) - 111.19).abs() < 0.01);
}

#[test]
fn test_known_city_pair() {
    let sf = GeoPoint::new(37.7749, -122.4194);
    let la = GeoPoint::new(34.0522, -118.2437);

    let km = distance(&sf, &la);
    assert!((km - 559.0).abs() < 1.0, "got {km}");
}

#[test]
fn test_antipodal_points() {
    let a = GeoPoint::new(0.0, 0.0);
    let b = GeoPoint::new(0.0, 180.0);

    let km = distance(&a, &b);
    assert!(km.is_finite());
    assert!((km - EARTH_RADIUS_KM * std::f64::consts::PI).abs() < 1e-6);
}

#[test]
fn test_out_of_range_input_does_not_panic() {
    let a = GeoPoint::new(123.0, 400.0);
    let b = GeoPoint::new(-200.0, -720.0);

    assert!(distance(&a, &b) >= 0.0);
}
