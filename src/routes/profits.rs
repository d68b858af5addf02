use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppError,
    services::profit::{ProfitCalculator, ProfitInput, ProfitResult, ProfitSummary},
    types::AppState,
    utils::numeric_input::{deserialize_numeric, format_amount},
};

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", axum::routing::post(calculate))
        .route("/batch", axum::routing::post(calculate_batch))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProfitPayload {
    #[serde(flatten)]
    pub input: ProfitInput,
    /// Part of the purchase price paid with points.
    #[serde(default, deserialize_with = "deserialize_numeric")]
    pub point_paid: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfitDisplay {
    pub cash_profit: String,
    pub points_value: String,
    pub total_profit: String,
    pub roi: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfitResponse {
    #[serde(flatten)]
    pub result: ProfitResult,
    pub roi: f64,
    pub display: ProfitDisplay,
}

#[utoipa::path(post, path = "/profits", request_body = ProfitPayload, responses((status = 200, body = ProfitResponse)), tag = "Profits", operation_id = "calculateProfit")]
pub async fn calculate(
    State(state): State<AppState>,
    Json(payload): Json<ProfitPayload>,
) -> Result<Json<ProfitResponse>, AppError> {
    let result = state.calculator.total_profit(&payload.input).await;
    let roi = ProfitCalculator::roi(
        result.total_profit,
        payload.input.purchase_price,
        payload.point_paid,
    );

    Ok(Json(ProfitResponse {
        result,
        roi,
        display: ProfitDisplay {
            cash_profit: format_amount(result.cash_profit),
            points_value: format_amount(result.points_value),
            total_profit: format_amount(result.total_profit),
            roi: format_amount(roi),
        },
    }))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BatchProfitPayload {
    #[validate(length(min = 1, max = 500))]
    pub items: Vec<ProfitInput>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BatchProfitResponse {
    pub results: Vec<ProfitResult>,
    pub summary: ProfitSummary,
}

#[utoipa::path(post, path = "/profits/batch", request_body = BatchProfitPayload, responses((status = 200, body = BatchProfitResponse), (status = 400, description = "Empty or oversized batch")), tag = "Profits", operation_id = "calculateProfitBatch")]
pub async fn calculate_batch(
    State(state): State<AppState>,
    Json(payload): Json<BatchProfitPayload>,
) -> Result<Json<BatchProfitResponse>, AppError> {
    payload.validate()?;
    let (results, summary) = state.calculator.total_profit_batch(&payload.items).await;
    tracing::debug!(
        "calculated profit for {} transactions, total {}",
        summary.count,
        format_amount(summary.total_profit)
    );
    Ok(Json(BatchProfitResponse { results, summary }))
}
