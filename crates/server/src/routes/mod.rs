use axum::Router;
use tower_http::{
    limit::RequestBodyLimitLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::AppState;

mod analytics;
mod exercises;
mod ping;
mod profile;
mod programs;
mod user;
mod workouts;

/// Every `/api` route with its layers, ready to serve
pub fn router(state: AppState) -> Router {
    let max_request_bytes = state.args.max_request_bytes;

    Router::new()
        .merge(ping::router())
        .merge(user::router())
        .merge(profile::router())
        .merge(exercises::router())
        .merge(programs::router())
        .merge(workouts::router())
        .merge(analytics::router())
        .layer(RequestBodyLimitLayer::new(max_request_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
