use axum::{extract::State, Json};

use crate::{
    services::points_valuation::{PointsValuationRequest, PointsValuationResult},
    types::AppState,
};

pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route("/points", axum::routing::post(value_points))
}

/// Unknown or unreachable platforms contribute 0 instead of failing the request.
#[utoipa::path(post, path = "/valuations/points", request_body = PointsValuationRequest, responses((status = 200, body = PointsValuationResult)), tag = "Valuations", operation_id = "valuePoints")]
pub async fn value_points(
    State(state): State<AppState>,
    Json(payload): Json<PointsValuationRequest>,
) -> Json<PointsValuationResult> {
    let result = state.calculator.valuation().value_request(&payload).await;
    Json(result)
}
