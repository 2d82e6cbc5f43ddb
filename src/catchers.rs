//! JSON catchers for statuses produced outside the flow handlers: failed
//! request guards, unmatched routes, and body-parsing errors.

use rocket::Request;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use serde::Serialize;

use crate::auth::guards::GateMessage;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

fn body(error: &str, message: impl Into<String>) -> Json<ErrorBody> {
    Json(ErrorBody {
        error: error.to_string(),
        message: message.into(),
    })
}

fn gate_message(request: &Request<'_>, fallback: &str) -> String {
    request
        .local_cache(|| GateMessage(None))
        .0
        .clone()
        .unwrap_or_else(|| fallback.to_string())
}

#[catch(400)]
pub fn bad_request() -> Json<ErrorBody> {
    body("ValidationError", "The request body could not be parsed.")
}

#[catch(401)]
pub fn unauthorized(request: &Request<'_>) -> Json<ErrorBody> {
    body(
        "AuthenticationError",
        gate_message(request, "Authentication is required."),
    )
}

#[catch(403)]
pub fn forbidden(request: &Request<'_>) -> Json<ErrorBody> {
    body(
        "AuthorizationError",
        gate_message(request, "Insufficient permissions."),
    )
}

#[catch(404)]
pub fn not_found() -> Json<ErrorBody> {
    body("NotFoundError", "Route not found.")
}

/// Rocket reports JSON bodies that parse but fail to deserialize as 422;
/// the contract treats every malformed body as a client-side 400.
#[catch(422)]
pub fn unprocessable() -> status::Custom<Json<ErrorBody>> {
    status::Custom(
        Status::BadRequest,
        body("ValidationError", "The request body could not be parsed."),
    )
}

#[catch(429)]
pub fn too_many_requests() -> Json<ErrorBody> {
    body(
        "RateLimitError",
        "Too many authentication requests. Please try again later.",
    )
}

#[catch(500)]
pub fn internal_error() -> Json<ErrorBody> {
    body("InternalError", "Internal server error.")
}
