//! Error Channel - single classify-and-write stage for failed requests
//!
//! Handlers and middleware never render an error body themselves. Turning an
//! [`AppError`] into a response only produces a placeholder carrying an
//! [`ErrorReport`] in its extensions. The [`error_channel`] middleware, which
//! must be the outermost layer of a router, removes the report again and
//! writes the one JSON body the client sees:
//!
//! ```json
//! {"error": "<message>"}
//! ```

use std::borrow::Cow;
use std::error::Error;

use axum::Json;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::app_error::AppError;
use super::kind::ErrorKind;

/// A reported failure travelling from the reporter up to [`error_channel`].
///
/// At most one report is attached to a response; it is removed when read.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    kind: ErrorKind,
    message: Cow<'static, str>,
    detail: Option<String>,
}

impl ErrorReport {
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Text safe to put in a response body.
    pub fn public_message(&self) -> &str {
        if self.kind.exposes_message() {
            &self.message
        } else {
            self.kind.as_str()
        }
    }

    /// Log-only description of the underlying source error.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Write the final error response.
    pub fn render(&self) -> Response {
        let body = serde_json::json!({ "error": self.public_message() });
        (self.status(), Json(body)).into_response()
    }
}

impl From<&AppError> for ErrorReport {
    fn from(err: &AppError) -> Self {
        Self {
            kind: err.kind(),
            message: Cow::Owned(err.message().to_owned()),
            detail: err.source().map(|source| source.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let report = ErrorReport::from(&self);
        let mut response = report.status().into_response();
        response.extensions_mut().insert(report);
        response
    }
}

/// Outermost middleware: run the chain, then render any reported failure.
pub async fn error_channel(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let mut response = next.run(req).await;

    let Some(report) = response.extensions_mut().remove::<ErrorReport>() else {
        return response;
    };

    tracing::warn!(
        kind = ?report.kind(),
        status = report.status().as_u16(),
        %method,
        %path,
        message = %report.message(),
        detail = report.detail().unwrap_or(""),
        "error during HTTP request"
    );

    report.render()
}
