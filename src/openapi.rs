use utoipa::OpenApi;

use crate::{repos as repo, routes, services};

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::valuations::value_points,

        routes::profits::calculate,
        routes::profits::calculate_batch,

        routes::health::health,
        routes::version::version,
    ),
    components(schemas(
        // Repo models
        repo::points_platform::PointsPlatform,
        // Service models
        services::points_valuation::PointsValuationRequest,
        services::points_valuation::PointsValuationResult,
        services::profit::ProfitInput,
        services::profit::ProfitResult,
        services::profit::ProfitSummary,
        // Route models
        routes::profits::ProfitPayload,
        routes::profits::ProfitDisplay,
        routes::profits::ProfitResponse,
        routes::profits::BatchProfitPayload,
        routes::profits::BatchProfitResponse,
        routes::version::VersionBody,
    )),
    tags(
        (name = "Valuations"),
        (name = "Profits"),
        (name = "System"),
    )
)]
pub struct ApiDoc;
