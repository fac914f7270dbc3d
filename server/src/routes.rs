use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, Request},
    routing::{get, post},
    Json, Router,
};
use charge_planner_lib::{
    charging_station::ChargingStation,
    trip::{PlannedTrip, TripRequest},
    vehicle_profile::{VehicleProfile, DEFAULT_USER_ID},
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{config::ServerConfig, error::ApiError, server_state::ServerState};

pub fn router(state: Arc<ServerState>, config: &ServerConfig) -> Router {
    let mut app = Router::new()
        .route("/api", get(root))
        .route("/api/", get(root))
        .route("/api/superchargers", get(get_stations))
        .route("/api/superchargers/{station_id}", get(get_station))
        .route("/api/trips", get(get_trips))
        .route("/api/trips/plan", post(plan_trip))
        .route("/api/trips/{trip_id}", get(get_trip))
        .route("/api/vehicle-profile", get(get_vehicle_profile).post(save_vehicle_profile))
        .with_state(state);

    if let Some(dir) = &config.frontend_dir {
        app = app.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))));
    }

    app.layer(cors_layer(&config.cors_origins)).layer(
        TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
            tracing::info_span!("http_request", method = %request.method(), path = %request.uri().path())
        }),
    )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect();

    layer.allow_origin(origins)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Supercharger Network Explorer API" }))
}

async fn get_stations(State(state): State<Arc<ServerState>>) -> Result<Json<Vec<ChargingStation>>, ApiError> {
    Ok(Json(state.data_manager.get_stations().await?))
}

async fn get_station(
    State(state): State<Arc<ServerState>>,
    Path(station_id): Path<String>,
) -> Result<Json<ChargingStation>, ApiError> {
    Ok(Json(state.data_manager.get_station(&station_id).await?))
}

async fn plan_trip(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<TripRequest>,
) -> Result<Json<PlannedTrip>, ApiError> {
    Ok(Json(state.data_manager.plan_trip(&request).await?))
}

async fn get_trips(State(state): State<Arc<ServerState>>) -> Result<Json<Vec<PlannedTrip>>, ApiError> {
    Ok(Json(state.data_manager.get_trips().await?))
}

async fn get_trip(
    State(state): State<Arc<ServerState>>,
    Path(trip_id): Path<i64>,
) -> Result<Json<PlannedTrip>, ApiError> {
    Ok(Json(state.data_manager.get_trip(trip_id).await?))
}

#[derive(Deserialize)]
struct ProfileQuery {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

async fn get_vehicle_profile(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<VehicleProfile>, ApiError> {
    let user_id = query.user_id.as_deref().unwrap_or(DEFAULT_USER_ID);
    Ok(Json(state.data_manager.get_vehicle_profile(user_id).await?))
}

async fn save_vehicle_profile(
    State(state): State<Arc<ServerState>>,
    Json(profile): Json<VehicleProfile>,
) -> Result<Json<VehicleProfile>, ApiError> {
    Ok(Json(state.data_manager.save_vehicle_profile(profile).await?))
}
