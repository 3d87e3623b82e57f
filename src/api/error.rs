use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::{error, warn};

use crate::TripPlannerError;

/// Error body returned by every API route:
/// `{"error": ..., "message": ..., "details": ...}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: String,
    message: String,
    details: Option<Value>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            status: StatusCode::BAD_REQUEST,
            error: message.clone(),
            message,
            details: None,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

fn status_for(err: &TripPlannerError) -> StatusCode {
    match err {
        TripPlannerError::UnresolvableLocation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        TripPlannerError::Validation { .. } | TripPlannerError::InvalidDateRange { .. } => {
            StatusCode::BAD_REQUEST
        }
        TripPlannerError::Upstream { .. }
        | TripPlannerError::Auth { .. }
        | TripPlannerError::Network { .. } => StatusCode::BAD_GATEWAY,
        TripPlannerError::Config { .. }
        | TripPlannerError::Io { .. }
        | TripPlannerError::General { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<TripPlannerError> for ApiError {
    fn from(err: TripPlannerError) -> Self {
        let status = status_for(&err);
        if status.is_server_error() {
            error!("Request failed: {}", err);
        } else {
            warn!("Request rejected: {}", err);
        }

        let message = err.user_message();
        let error = err.to_string();
        let details = match err {
            TripPlannerError::Upstream { details, .. } => details,
            _ => None,
        };

        Self {
            status,
            error,
            message,
            details,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "error": self.error,
            "message": self.message,
        });
        if let Some(details) = self.details {
            body["details"] = details;
        }
        (self.status, Json(body)).into_response()
    }
}
