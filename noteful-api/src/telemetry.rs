use axum::{body::Body, http::Request, Router};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, SetRequestIdLayer},
    trace::{self, TraceLayer},
};
use tracing_subscriber::prelude::*;

const DEFAULT_FILTER: &str = "noteful_api=debug,tower_http=debug,axum::rejection=trace";

pub fn setup_tracing(json: bool) {
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()),
    );

    let result = if json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_file(true)
                    .with_line_number(true)
                    .with_thread_ids(true)
                    .with_target(false),
            )
            .try_init()
    };
    result.ok();
}

/// Assigns request ids ahead of the request span.
pub fn add_tracing_layer(app: Router) -> Router {
    app.layer(
        ServiceBuilder::new().layer(SetRequestIdLayer::x_request_id(MakeRequestUuid)).layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default();
                    tracing::span!(
                        tracing::Level::DEBUG,
                        "request",
                        method = %request.method(),
                        request_id = request_id,
                        uri = %request.uri(),
                    )
                })
                .on_request(trace::DefaultOnRequest::new())
                .on_response(trace::DefaultOnResponse::new().include_headers(false))
                .on_failure(trace::DefaultOnFailure::new()),
        ),
    )
}
