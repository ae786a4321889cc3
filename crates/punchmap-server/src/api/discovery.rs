//! Discovery and nearby-store endpoints.

use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use punchmap_search::{bounding_square, discover, SearchError};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct DiscoveryRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

#[derive(Debug, Serialize)]
pub(super) struct DiscoveryStatsBody {
    pub boxes_queried: usize,
    pub boxes_failed: usize,
    pub pois_found: usize,
    pub stores_added: usize,
}

/// Run one synchronous discovery pass around the requested center.
///
/// The search is incremental: ground covered by previous requests is not
/// re-queried. Partial provider failure still returns 200 with the stats of
/// what did run; only an invalid radius or a database failure is an error.
pub(super) async fn run_discovery(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<DiscoveryRequest>,
) -> Result<Json<ApiResponse<DiscoveryStatsBody>>, ApiError> {
    let stats = discover(
        &state.pool,
        &state.provider,
        body.latitude,
        body.longitude,
        body.radius_km,
    )
    .await
    .map_err(|e| match e {
        SearchError::InvalidRadius => ApiError::new(
            req_id.0.clone(),
            "validation_error",
            "radius_km must be positive",
        ),
        SearchError::Db(db) => map_db_error(req_id.0.clone(), &db),
    })?;

    Ok(Json(ApiResponse {
        data: DiscoveryStatsBody {
            boxes_queried: stats.boxes_queried,
            boxes_failed: stats.boxes_failed,
            pois_found: stats.pois_found,
            stores_added: stats.stores_added,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct NearbyParams {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

#[derive(Debug, Serialize)]
pub(super) struct NearbyStoreItem {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub enrichment_status: String,
}

/// List catalog stores inside the bounding square of the given center/radius.
pub(super) async fn list_nearby_stores(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<ApiResponse<Vec<NearbyStoreItem>>>, ApiError> {
    let Some(bounds) = bounding_square(params.latitude, params.longitude, params.radius_km)
    else {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "radius_km must be positive",
        ));
    };

    let rows = punchmap_db::list_stores_in_box(
        &state.pool,
        bounds.min_lat,
        bounds.min_lng,
        bounds.max_lat,
        bounds.max_lng,
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| NearbyStoreItem {
            id: row.id,
            name: row.name,
            address: row.address,
            latitude: row.latitude,
            longitude: row.longitude,
            city: row.addr_city,
            state: row.addr_state,
            enrichment_status: row.enrichment_status,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
