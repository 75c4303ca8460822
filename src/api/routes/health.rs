use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Serialize)]
pub struct SitesResponse {
    pub sites: Vec<String>,
}

pub async fn list_sites(State(state): State<AppState>) -> Json<SitesResponse> {
    Json(SitesResponse {
        sites: state.dispatcher.registry().sites(),
    })
}
