use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{openapi::ApiDoc, routes, types::AppState};

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .nest("/valuations", routes::valuations::router())
        .nest("/profits", routes::profits::router())
        .route("/health", get(routes::health::health))
        .route("/version", get(routes::version::version))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
