//! Error responses shared by every HTTP module.
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Validation / malformed body | 400 |
//! | Session or payment not found | 404 |
//! | Already consumed | 400 |
//! | Storage / unexpected | 500 |
//! | Payment provider | 502 |

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ErrorCode;
use crate::domain::payment::{PaymentRelayError, WebhookError};
use crate::domain::verification::VerificationError;
use crate::ports::PaymentErrorCode;

/// Standard error response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Raw error detail, development deployments only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }
}

/// An error on its way to becoming an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: String,
    message: String,
    detail: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            detail: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorCode::ValidationFailed.to_string(),
            message,
        )
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Drops the raw detail unless `expose` is set.
    pub fn exposing_details(mut self, expose: bool) -> Self {
        if !expose {
            self.detail = None;
        }
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

impl From<VerificationError> for ApiError {
    fn from(err: VerificationError) -> Self {
        let status = match &err {
            VerificationError::Validation(_) | VerificationError::AlreadyConsumed(_) => {
                StatusCode::BAD_REQUEST
            }
            VerificationError::NotFound(_) => StatusCode::NOT_FOUND,
            VerificationError::Storage(_) | VerificationError::Platform(_) => {
                tracing::error!(error = %err, "Verification request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        ApiError::new(status, err.code().to_string(), err.public_message()).with_detail(err.to_string())
    }
}

impl From<PaymentRelayError> for ApiError {
    fn from(err: PaymentRelayError) -> Self {
        let status = match &err {
            PaymentRelayError::Validation(_) => StatusCode::BAD_REQUEST,
            PaymentRelayError::NotFound(_) => StatusCode::NOT_FOUND,
            PaymentRelayError::Provider(e) if e.code == PaymentErrorCode::InvalidRequest => {
                StatusCode::BAD_REQUEST
            }
            PaymentRelayError::Provider(_) => {
                tracing::error!(error = %err, "Payment provider request failed");
                StatusCode::BAD_GATEWAY
            }
            PaymentRelayError::Storage(_) => {
                tracing::error!(error = %err, "Payment storage failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        ApiError::new(status, err.code().to_string(), err.public_message()).with_detail(err.to_string())
    }
}

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        ApiError::new(err.status_code(), err.code(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error_code: self.code,
            message: self.message,
            details: self.detail.map(serde_json::Value::String),
        };
        (self.status, Json(body)).into_response()
    }
}

/// JSON body extractor whose rejections use [`ErrorResponse`] and status 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
        }
    }
}
