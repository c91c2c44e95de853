use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::{state::AppState, DB};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Everything a data-access call needs: the store handle and who asked.
#[derive(Clone)]
pub struct BaseParams {
    pub ctx: Ctx,
    pub db: DB,
}

impl BaseParams {
    pub fn new(db: DB, ctx: Ctx) -> Self {
        Self { db, ctx }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for BaseParams {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let ctx = Ctx::from_request_parts(parts, state).await?;
        Ok(Self::new(state.conn.clone(), ctx))
    }
}

#[derive(Clone, Debug, Default)]
pub struct Ctx {
    pub request_id: Option<String>,
}

impl Ctx {
    pub fn new(request_id: Option<String>) -> Self {
        Self { request_id }
    }

    fn from_headers(headers: &HeaderMap) -> Self {
        Self::new(
            headers
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(String::from),
        )
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Ctx
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

#[derive(Clone)]
pub struct ReqCtx {
    pub request_id: Option<String>,
}

tokio::task_local! {
    pub static REQ_CTX: ReqCtx;
}

pub async fn with_ctx(ctx: Ctx, request: Request, next: Next) -> Response {
    REQ_CTX
        .scope(
            ReqCtx {
                request_id: ctx.request_id,
            },
            next.run(request),
        )
        .await
}
