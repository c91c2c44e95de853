use std::marker::PhantomData;

use aide::gen::GenContext;
use aide::openapi::Operation;
use aide::operation::{OperationInput, OperationOutput};
use aide::OperationIo;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, StatusCode},
    response::IntoResponse,
};
use axum_macros::FromRequestParts;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Serialize};

pub use aide;
pub use aide::openapi::OpenApi;

use crate::errors::ErrorResponse;

#[derive(FromRequest, OperationIo)]
#[from_request(via(axum_jsonschema::Json), rejection(crate::Error))]
#[aide(
    input_with = "axum_jsonschema::Json<T>",
    output_with = "axum_jsonschema::Json<T>",
    json_schema
)]
pub struct Json<T>(pub T);

impl<T> IntoResponse for Json<T>
where
    T: Serialize,
{
    fn into_response(self) -> axum::response::Response {
        axum::Json(self.0).into_response()
    }
}

#[derive(FromRequestParts, OperationIo)]
#[from_request(via(axum::extract::Path), rejection(crate::Error))]
#[aide(
    input_with = "axum::extract::Path<T>",
    output_with = "axum_jsonschema::Json<T>",
    json_schema
)]
pub struct Path<T>(pub T);

/// JSON body that is buffered by the extractor but parsed only when asked,
/// so a handler can check that the target resource exists first.
/// An empty body parses as `T::default()`.
pub struct DeferredJson<T> {
    bytes: Bytes,
    _body: PhantomData<T>,
}

impl<T> DeferredJson<T>
where
    T: DeserializeOwned + Default,
{
    pub fn parse(self) -> crate::Result<T> {
        if self.bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }
        serde_json::from_slice(&self.bytes).map_err(|e| crate::Error::Validation(e.to_string()))
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for DeferredJson<T>
where
    T: Send,
    S: Send + Sync,
{
    type Rejection = crate::Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| crate::Error::Validation(e.body_text()))?;

        Ok(Self {
            bytes,
            _body: PhantomData,
        })
    }
}

impl<T> OperationInput for DeferredJson<T>
where
    T: JsonSchema,
{
    fn operation_input(ctx: &mut GenContext, operation: &mut Operation) {
        axum::Json::<T>::operation_input(ctx, operation);
    }
}

/// `201 Created` with a `Location` header pointing at the new resource.
pub struct Created<T> {
    pub location: String,
    pub body: T,
}

impl<T> IntoResponse for Created<T>
where
    T: Serialize,
{
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::CREATED,
            [(header::LOCATION, self.location)],
            axum::Json(self.body),
        )
            .into_response()
    }
}

impl<T> OperationOutput for Created<T>
where
    T: JsonSchema,
{
    type Inner = T;

    fn operation_response(ctx: &mut GenContext, operation: &mut Operation) -> Option<aide::openapi::Response> {
        axum::Json::<T>::operation_response(ctx, operation)
    }

    fn inferred_responses(ctx: &mut GenContext, operation: &mut Operation) -> Vec<(Option<u16>, aide::openapi::Response)> {
        Self::operation_response(ctx, operation)
            .map(|res| vec![(Some(201), res)])
            .unwrap_or_default()
    }
}

/// `204 No Content`
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> axum::response::Response {
        StatusCode::NO_CONTENT.into_response()
    }
}

impl OperationOutput for NoContent {
    type Inner = ();

    fn operation_response(_ctx: &mut GenContext, _operation: &mut Operation) -> Option<aide::openapi::Response> {
        Some(aide::openapi::Response {
            description: "No Content".into(),
            ..Default::default()
        })
    }

    fn inferred_responses(ctx: &mut GenContext, operation: &mut Operation) -> Vec<(Option<u16>, aide::openapi::Response)> {
        Self::operation_response(ctx, operation)
            .map(|res| vec![(Some(204), res)])
            .unwrap_or_default()
    }
}

impl OperationOutput for crate::Error {
    type Inner = ();

    fn operation_response(ctx: &mut GenContext, operation: &mut Operation) -> Option<aide::openapi::Response> {
        let mut schema = ctx.schema.subschema_for::<ErrorResponse>().into_object();

        Some(aide::openapi::Response {
            description: schema.metadata().description.clone().unwrap_or_default(),
            content: IndexMap::from_iter([(
                "application/json".into(),
                aide::openapi::MediaType {
                    schema: Some(aide::openapi::SchemaObject {
                        json_schema: schema.into(),
                        example: None,
                        external_docs: None,
                    }),
                    ..Default::default()
                },
            )]),
            ..Default::default()
        })
    }

    fn inferred_responses(ctx: &mut GenContext, operation: &mut Operation) -> Vec<(Option<u16>, aide::openapi::Response)> {
        if let Some(res) = Self::operation_response(ctx, operation) {
            Vec::from([(None, res)])
        } else {
            Vec::new()
        }
    }
}
