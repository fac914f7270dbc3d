use geo_types::Point;
use serde::{Deserialize, Serialize};

/// A position in decimal degrees.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn has_valid_latitude(&self) -> bool {
        self.lat.is_finite() && (-90.0..=90.0).contains(&self.lat)
    }

    pub fn has_valid_longitude(&self) -> bool {
        self.lng.is_finite() && (-180.0..=180.0).contains(&self.lng)
    }
}

// geo_types points are x = longitude, y = latitude
impl From<GeoPoint> for Point {
    fn from(value: GeoPoint) -> Self {
        Point::new(value.lng, value.lat)
    }
}

impl From<Point> for GeoPoint {
    fn from(value: Point) -> Self {
        Self::new(value.y(), value.x())
    }
}

#[test]
fn test_point_axis_order() {
    let sf = GeoPoint::new(37.7749, -122.4194);
    let point: Point = sf.into();
    assert_eq!(point.x(), -122.4194);
    assert_eq!(point.y(), 37.7749);
    assert_eq!(GeoPoint::from(point), sf);
}

#[test]
fn test_coordinate_ranges() {
    assert!(GeoPoint::new(90.0, -180.0).has_valid_latitude());
    assert!(GeoPoint::new(90.0, -180.0).has_valid_longitude());
    assert!(!GeoPoint::new(90.5, 0.0).has_valid_latitude());
    assert!(!GeoPoint::new(0.0, 181.0).has_valid_longitude());
    assert!(!GeoPoint::new(f64::NAN, 0.0).has_valid_latitude());
}
