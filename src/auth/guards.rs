use rocket::Request;
use rocket::State;
use rocket::request::{FromRequest, Outcome};
use uuid::Uuid;

use crate::auth::responses::Role;
use crate::auth::{AuthError, AuthResult, AuthState};

/// Per-request gate failure message, stashed in the request's local cache so
/// the 401/403 catchers can echo the precise reason.
#[derive(Debug, Default)]
pub struct GateMessage(pub Option<String>);

fn reject<T>(request: &Request<'_>, err: AuthError) -> Outcome<T, AuthError> {
    request.local_cache(|| GateMessage(Some(err.to_string())));
    Outcome::Error((err.status(), err))
}

/// Trusted identity attached to a request once its bearer token verifies.
/// Scoped to the request; discarded when the request completes.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    pub fn has_role(&self, allowed: &[Role]) -> bool {
        allowed.contains(&self.role)
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthUser {
    type Error = AuthError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match authenticate(request).await {
            Ok(user) => Outcome::Success(user),
            Err(err) => reject(request, err),
        }
    }
}

/// Authorization gate for admin-only routes, composed on top of `AuthUser`.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for RequireAdmin {
    type Error = AuthError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match AuthUser::from_request(request).await {
            Outcome::Success(user) if user.has_role(&[Role::Admin]) => {
                Outcome::Success(RequireAdmin(user))
            }
            Outcome::Success(_) => reject(request, AuthError::Forbidden),
            Outcome::Error(err) => Outcome::Error(err),
            // No identity attached at all; unreachable when gates are
            // composed in order, kept as a hard 401.
            Outcome::Forward(_) => reject(request, AuthError::Unauthenticated),
        }
    }
}

async fn authenticate(request: &Request<'_>) -> AuthResult<AuthUser> {
    let token = bearer_token(request)?;

    let state = request
        .guard::<&State<AuthState>>()
        .await
        .succeeded()
        .ok_or_else(|| AuthError::Config("AuthState missing from managed state".into()))?;

    let claims = state.jwt_service.verify(token)?;

    let id: Uuid = claims.sub.parse().map_err(|_| AuthError::TokenInvalid)?;
    // Role normalization happens here, at the verification boundary: a
    // missing or unknown role claim degrades to the least-privileged role.
    let role = claims
        .role
        .as_deref()
        .map(Role::from_str)
        .unwrap_or(Role::User);

    Ok(AuthUser {
        id,
        email: claims.email,
        name: claims.name,
        role,
    })
}

/// Extract the token from an `Authorization: Bearer <token>` header. Absent
/// and malformed headers are indistinguishable to the caller.
fn bearer_token<'r>(request: &'r Request<'_>) -> AuthResult<&'r str> {
    let header = request
        .headers()
        .get_one("Authorization")
        .ok_or(AuthError::MissingToken)?;
    let mut parts = header.splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().unwrap_or_default();
    if scheme.eq_ignore_ascii_case("Bearer") && !token.is_empty() {
        Ok(token)
    } else {
        Err(AuthError::MissingToken)
    }
}
