use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::{Request, Response};
use serde::Serialize;
use std::io::Cursor;

use crate::auth::AuthError;

/// HTTP-facing error taxonomy. Business-rule failures (validation, conflict,
/// bad credentials) are produced by the flow handlers as values; `Internal`
/// is reserved for unexpected faults, whose detail is logged server-side and
/// never echoed to the caller.
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Conflict(String),
    Authentication(String),
    Authorization(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let (status, error_type, message) = match self {
            ApiError::Validation(msg) => {
                log::debug!("validation failure: {}", msg);
                (Status::BadRequest, "ValidationError", msg)
            }
            ApiError::Conflict(msg) => {
                log::debug!("conflict: {}", msg);
                (Status::Conflict, "ConflictError", msg)
            }
            ApiError::Authentication(msg) => {
                log::debug!("authentication failure");
                (Status::Unauthorized, "AuthenticationError", msg)
            }
            ApiError::Authorization(msg) => {
                log::debug!("authorization failure");
                (Status::Forbidden, "AuthorizationError", msg)
            }
            ApiError::Internal(detail) => {
                log::error!("internal error: {}", detail);
                (
                    Status::InternalServerError,
                    "InternalError",
                    "Internal server error.".to_string(),
                )
            }
        };

        let error_response = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        let json = serde_json::to_string(&error_response).unwrap_or_else(|_| {
            r#"{"error":"SerializationError","message":"Failed to serialize error"}"#.to_string()
        });

        Response::build()
            .status(status)
            .header(rocket::http::ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::TokenInvalid
            | AuthError::Unauthenticated => ApiError::Authentication(err.to_string()),
            AuthError::Forbidden => ApiError::Authorization(err.to_string()),
            AuthError::Config(_)
            | AuthError::Jwt(_)
            | AuthError::Argon2(_)
            | AuthError::PasswordHash(_) => ApiError::Internal(err.to_string()),
        }
    }
}
