use std::sync::{Arc, OnceLock};

use crate::{ctx::REQ_CTX, error_responses};
use axum::{
    extract::{rejection::PathRejection, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_jsonschema::JsonSchemaRejection;

pub use response::ErrorResponse;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("not_found")]
    NotFound(String),

    // validation
    #[error("validation")]
    Validation(String),
    #[error("validation")]
    JsonValidation(JsonSchemaRejection),
    #[error("validation")]
    PathValidation(#[from] PathRejection),

    #[error(transparent)]
    DB(crate::db::Error),

    // startup
    #[error(transparent)]
    Config(#[from] envy::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("unexpected")]
    Unexpected(String),
}

impl Error {
    pub fn missing_field(field: &str) -> Self {
        Self::Validation(format!("Missing {field} in request"))
    }
}

impl From<JsonSchemaRejection> for Error {
    fn from(rejection: JsonSchemaRejection) -> Self {
        Self::JsonValidation(rejection)
    }
}

impl From<crate::db::Error> for Error {
    fn from(error: crate::db::Error) -> Self {
        match error {
            crate::db::Error::NotFound(msg) => Self::NotFound(msg),
            error => Self::DB(error),
        }
    }
}

// Response

error_responses! {
    not_found: 404,
    validation: 400,
    unexpected: 500
}

impl From<&Error> for ErrorResponse {
    fn from(error: &Error) -> Self {
        let errors = errors();
        match error {
            Error::NotFound(message) => errors.not_found.with_message(message),
            Error::Validation(message) => errors.validation.with_message(message),
            Error::JsonValidation(json_error) => {
                let message = match json_error {
                    JsonSchemaRejection::Json(error) => error.body_text(),
                    JsonSchemaRejection::Serde(error) => error.to_string(),
                    JsonSchemaRejection::Schema(_) => "Request schema validation error".into(),
                };
                errors.validation.with_message(message)
            }
            Error::PathValidation(error) => errors.validation.with_message(error.body_text()),
            Error::Unexpected(message) => errors.unexpected.with_message(message),
            _ => errors.unexpected.with_message("Unexpected error"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let error = Arc::new(self);

        let error_res = ErrorResponse::from(error.as_ref());
        let status = error_res.status;

        let mut res = axum::Json(error_res).into_response();
        res.extensions_mut().insert(error);

        *res.status_mut() = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        res
    }
}

pub async fn on_error(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    let error = response.extensions().get::<Arc<Error>>().map(Arc::as_ref);
    if let Some(error) = error {
        let request_id = REQ_CTX.try_with(|ctx| ctx.request_id.clone()).ok().flatten();
        if response.status().is_server_error() {
            tracing::error!(?request_id, "{:?}", error);
        } else {
            tracing::debug!(?request_id, "{:?}", error);
        }
    }

    response
}

mod response {
    use schemars::JsonSchema;
    use serde::Serialize;

    #[derive(Debug, Serialize, Clone, Default, JsonSchema)]
    pub struct ErrorMessage {
        pub message: String,
    }

    /// `{ "error": { "message": "..." } }`
    #[derive(Debug, Serialize, Clone, Default, JsonSchema)]
    pub struct ErrorResponse {
        pub error: ErrorMessage,
        #[serde(skip)]
        pub kind: &'static str,
        #[serde(skip)]
        pub status: u16,
    }

    impl ErrorResponse {
        pub fn new(kind: &'static str, status: u16) -> Self {
            Self {
                kind,
                status,
                ..Default::default()
            }
        }

        pub fn with_message(&self, message: impl Into<String>) -> Self {
            let mut res = self.clone();
            res.error.message = message.into();
            res
        }
    }

    /// Static registry of error kinds and their status codes
    /// ```rust
    /// error_responses! {
    ///     not_found: 404,
    ///     unexpected: 500
    /// }
    ///
    /// let errors = errors(); // <- from macro
    /// errors.not_found.with_message("Note does not exist");
    /// ```
    #[macro_export]
    macro_rules! error_responses {
        (
            $($name:ident: $code:expr),* $(,)?
        ) => {
            #[derive(Debug, Clone)]
            struct Responses {
                $(
                    $name: ErrorResponse,
                )*
            }

            static ERRORS: OnceLock<Responses> = OnceLock::new();

            fn errors() -> &'static Responses {
                ERRORS.get_or_init(|| Responses {
                    $(
                        $name: ErrorResponse::new(stringify!($name), $code),
                    )*
                })
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_field_is_a_bad_request() {
        let res = ErrorResponse::from(&Error::missing_field("content"));

        assert_eq!(res.status, 400);
        assert_eq!(res.kind, "validation");
        assert_eq!(
            serde_json::to_value(&res).unwrap(),
            json!({ "error": { "message": "Missing content in request" } })
        );
    }

    #[test]
    fn store_failures_hide_details() {
        let error = Error::from(crate::db::Error::Rusqlite(rusqlite::Error::InvalidQuery));
        let res = ErrorResponse::from(&error);

        assert_eq!(res.status, 500);
        assert_eq!(res.error.message, "Unexpected error");
    }

    #[test]
    fn db_not_found_becomes_not_found() {
        let error = Error::from(crate::db::Error::NotFound("Note does not exist".into()));
        let res = ErrorResponse::from(&error);

        assert_eq!(res.status, 404);
        assert_eq!(res.error.message, "Note does not exist");
    }

    #[tokio::test]
    async fn into_response_sets_status_and_extension() {
        let response = Error::NotFound("Folder does not exist".into()).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.extensions().get::<Arc<Error>>().is_some());
    }
}
