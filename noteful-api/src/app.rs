use aide::redoc::Redoc;
use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    middleware::{self},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
};

use crate::config::{config, Config};

use serde_json::json;

use crate::{
    ctx::with_ctx,
    db::{self, DB},
    errors::{self, on_error, ErrorResponse},
    folders, notes,
    openapi::{self, aide::axum::ApiRouter, OpenApi},
    state::AppState,
    Error,
};

pub struct AppParams<Router>
where
    Router: FnOnce(AppState) -> ApiRouter,
{
    pub db: DB,
    pub router: Router,
}

/// Every resource the API serves.
pub fn resources(state: AppState) -> ApiRouter {
    ApiRouter::new()
        .merge(notes::router(state.clone()))
        .merge(folders::router(state))
}

pub async fn create<R>(AppParams { db, router }: AppParams<R>) -> errors::Result<(Router, OpenApi)>
where
    R: FnOnce(AppState) -> ApiRouter,
{
    let mut api = OpenApi::default();

    let state = AppState::new(db);

    let docs_router = axum::Router::new()
        .route(
            "/__docs__",
            get(Redoc::new("/__docs__/spec.json")
                .with_title("Noteful API")
                .axum_handler()),
        )
        .route("/__docs__/spec.json", get(serve_docs));

    let ops_router = axum::Router::new()
        .route("/__version__", get(version))
        .route("/__heartbeat__", get(heartbeat))
        .route("/__lbheartbeat__", get(lbheartbeat))
        .with_state(state.clone());

    let cors = cors_layer(config())?;

    let app = ApiRouter::new()
        .merge(ops_router)
        .merge(docs_router)
        .merge(router(state))
        .finish_api_with(&mut api, |t| {
            t.title("Noteful")
                .version(&config().version)
                .default_response::<openapi::Json<ErrorResponse>>()
        })
        .layer(
            ServiceBuilder::new()
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors)
                .layer(Extension(Arc::new(api.clone())))
                .layer(middleware::from_fn(with_ctx))
                .layer(middleware::from_fn(on_error)),
        );

    Ok((app, api))
}

fn cors_layer(config: &Config) -> errors::Result<CorsLayer> {
    let origin = match &config.cors_origin {
        Some(origin) => AllowOrigin::exact(
            origin
                .parse::<HeaderValue>()
                .map_err(|e| Error::Unexpected(format!("invalid CORS_ORIGIN {origin}: {e}")))?,
        ),
        None => AllowOrigin::any(),
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]))
}

async fn version() -> impl IntoResponse {
    let config = config();
    Json(json!({
        "source" : config.source,
        "version": config.version,
        "commit" : config.git_commit,
        "build"  : config.pipeline_id
    }))
}

async fn heartbeat(State(state): State<AppState>) -> errors::Result<impl IntoResponse> {
    db::ping(&state.conn).await?;

    Ok(Json(json!({
        "status" : "ok",
    })))
}

async fn lbheartbeat() -> impl IntoResponse {
    ""
}

async fn serve_docs(Extension(api): Extension<Arc<OpenApi>>) -> Response {
    Json(api.as_ref()).into_response()
}
