use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use charge_planner_data_management::{DataManager, DatabaseLocation};
use serde_json::{json, Value};
use server::{config::ServerConfig, routes, server_state::ServerState};
use tower::ServiceExt;

async fn app() -> Router {
    let data_manager = DataManager::start(&DatabaseLocation::InMemory).await.unwrap();
    routes::router(Arc::new(ServerState { data_manager }), &ServerConfig::default())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn sf_to_la(current_charge: i64) -> Value {
    json!({
        "origin": {"lat": 37.7749, "lng": -122.4194},
        "destination": {"lat": 34.0522, "lng": -118.2437},
        "vehicleModel": "Model 3 Long Range",
        "currentCharge": current_charge,
    })
}

#[tokio::test]
async fn root_message() {
    let app = app().await;

    let (status, body) = send(&app, get("/api/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Supercharger Network Explorer API");
}

#[tokio::test]
async fn lists_and_fetches_stations() {
    let app = app().await;

    let (status, body) = send(&app, get("/api/superchargers")).await;
    assert_eq!(status, StatusCode::OK);
    let stations = body.as_array().unwrap();
    assert_eq!(stations.len(), 12);
    assert!(stations[0]["busyHours"].is_array());

    let id = stations[4]["id"].as_str().unwrap();
    let (status, body) = send(&app, get(&format!("/api/superchargers/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, stations[4]);
}

#[tokio::test]
async fn unknown_station_is_404() {
    let app = app().await;

    let (status, body) = send(&app, get("/api/superchargers/missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Supercharger not found");
}

#[tokio::test]
async fn plans_and_records_trip() {
    let app = app().await;

    let (status, trip) = send(&app, post_json("/api/trips/plan", &sf_to_la(80))).await;
    assert_eq!(status, StatusCode::OK);

    let distance = trip["totalDistance"].as_f64().unwrap();
    assert!((distance - 559.0).abs() < 1.0);
    assert_eq!(trip["vehicleModel"], "Model 3 Long Range");
    assert_eq!(trip["currentCharge"], 80);

    let stops = trip["stops"].as_array().unwrap();
    assert_eq!(stops.len(), 1);
    assert_eq!(stops[0]["name"], "San Francisco - Fremont Supercharger");
    assert_eq!(stops[0]["arrivalCharge"], 60);
    assert_eq!(stops[0]["departureCharge"], 95);
    assert_eq!(stops[0]["chargingTime"], 26);

    let id = trip["id"].as_i64().unwrap();
    let (status, stored) = send(&app, get(&format!("/api/trips/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored, trip);

    let (status, history) = send(&app, get("/api/trips")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn zero_length_trip_has_no_stops() {
    let app = app().await;

    let request = json!({
        "origin": {"lat": 37.7749, "lng": -122.4194},
        "destination": {"lat": 37.7749, "lng": -122.4194},
        "vehicleModel": "Model Y",
        "currentCharge": 100,
    });
    let (status, trip) = send(&app, post_json("/api/trips/plan", &request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trip["totalDistance"], 0.0);
    assert_eq!(trip["totalTime"], 0.0);
    assert!(trip["stops"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn rejects_invalid_trip_request() {
    let app = app().await;

    let (status, body) = send(&app, post_json("/api/trips/plan", &sf_to_la(120))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("currentCharge"));

    let (status, _) = send(&app, post_json("/api/trips/plan", &json!({"origin": {"lat": 1.0}}))).await;
    assert!(status.is_client_error());

    let (_, history) = send(&app, get("/api/trips")).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_trip_is_404() {
    let app = app().await;

    let (status, body) = send(&app, get("/api/trips/42")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Trip not found");
}

#[tokio::test]
async fn vehicle_profile_defaults_and_upserts() {
    let app = app().await;

    let (status, profile) = send(&app, get("/api/vehicle-profile")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["userId"], "default_user");
    assert_eq!(profile["vehicleModel"], "Model 3 Long Range");
    assert_eq!(profile["batteryCapacity"], 82);

    let saved = json!({"userId": "alice", "vehicleModel": "Model Y", "batteryCapacity": 75, "currentCharge": 45});
    let (status, body) = send(&app, post_json("/api/vehicle-profile", &saved)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, saved);

    let (_, body) = send(&app, get("/api/vehicle-profile?userId=alice")).await;
    assert_eq!(body, saved);

    // Default user still gets the default profile
    let (_, body) = send(&app, get("/api/vehicle-profile")).await;
    assert_eq!(body["vehicleModel"], "Model 3 Long Range");

    // Unsaved users get the defaults under their own id, with no separate id field
    let (_, body) = send(&app, get("/api/vehicle-profile?userId=bob")).await;
    assert_eq!(body["userId"], "bob");
    assert_eq!(body["batteryCapacity"], 82);
    assert!(body.get("id").is_none());
}

#[tokio::test]
async fn rejects_invalid_vehicle_profile() {
    let app = app().await;

    let profile = json!({"vehicleModel": "Model Y", "batteryCapacity": 0, "currentCharge": 45});
    let (status, _) = send(&app, post_json("/api/vehicle-profile", &profile)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
