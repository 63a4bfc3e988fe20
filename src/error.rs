use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Request, State,
    },
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::config::Environment;

const NOT_AUTHORIZED: &str = "Not authorized to access this route";
const SERVER_ERROR: &str = "Server Error";

/// Every fault a request can end with. `into_response` is the only place that
/// decides the status code and body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Invalid ID format")]
    InvalidIdentifier,

    #[error("{0}")]
    MissingInput(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn unauthenticated() -> Self {
        AppError::Unauthenticated(NOT_AUTHORIZED.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::InvalidIdentifier
            | AppError::MissingInput(_)
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Internal detail attached to 5xx responses. Only surfaced to the caller by
/// [`expose_error_detail`] outside production.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::Internal(e) => {
                error!(error = ?e, "request failed");
                let mut res = (
                    status,
                    Json(json!({ "success": false, "error": SERVER_ERROR })),
                )
                    .into_response();
                res.extensions_mut().insert(ErrorDetail(format!("{e:#}")));
                res
            }
            other => {
                if status.is_client_error() {
                    warn!(%status, error = %other, "request rejected");
                }
                (
                    status,
                    Json(json!({ "success": false, "error": other.to_string() })),
                )
                    .into_response()
            }
        }
    }
}

/// Rewrites internal-error bodies to carry their detail in development.
pub async fn expose_error_detail(
    State(env): State<Environment>,
    req: Request,
    next: Next,
) -> Response {
    let mut res = next.run(req).await;
    if env.is_production() {
        return res;
    }
    match res.extensions_mut().remove::<ErrorDetail>() {
        Some(ErrorDetail(detail)) => (
            res.status(),
            Json(json!({ "success": false, "error": SERVER_ERROR, "detail": detail })),
        )
            .into_response(),
        None => res,
    }
}

/// JSON body extractor whose rejections share the error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Path parameters; any rejection reads as a malformed id.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        warn!(error = %rejection.body_text(), "path rejected");
        AppError::InvalidIdentifier
    }
}
