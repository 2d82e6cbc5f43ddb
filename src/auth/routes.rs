use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{State, get, post};

use crate::auth::AuthState;
use crate::auth::guards::{AuthUser, RequireAdmin};
use crate::auth::policy;
use crate::auth::responses::{
    AdminOverviewResponse, LoginRequest, LoginResponse, MeResponse, PublicUser, RegisterRequest,
    RegisterResponse,
};
use crate::auth::store::{CreateUserError, NewUser};
use crate::error::ApiError;
use crate::rate_limit::AuthThrottle;

const USER_EXISTS: &str = "A user with this email already exists.";
const LOGIN_FIELDS_REQUIRED: &str = "Email and password are required.";
const INVALID_CREDENTIALS: &str = "Invalid email or password.";

#[post("/register", data = "<payload>")]
pub async fn register(
    state: &State<AuthState>,
    _throttle: AuthThrottle,
    payload: Json<RegisterRequest>,
) -> Result<status::Custom<Json<RegisterResponse>>, ApiError> {
    let valid = policy::validate_registration(&payload)
        .map_err(|message| ApiError::Validation(message.into()))?;

    if state.user_store.find_by_email(&valid.email).is_some() {
        return Err(ApiError::Conflict(USER_EXISTS.into()));
    }

    let password_hash = state.password_service.hash_password(&valid.password)?;

    let user = match state.user_store.create(NewUser {
        email: valid.email,
        password_hash,
        name: valid.name,
        role: valid.role,
    }) {
        Ok(user) => user,
        // Lost the race against a concurrent registration for the same
        // normalized email; the store's insert is the arbiter.
        Err(CreateUserError::DuplicateEmail) => {
            return Err(ApiError::Conflict(USER_EXISTS.into()));
        }
        Err(CreateUserError::EmptyEmail) => {
            return Err(ApiError::Validation(policy::MSG_EMAIL_INVALID.into()));
        }
    };

    let signed = state.jwt_service.issue(&user)?;

    log::info!("registered user {} with role {}", user.id, user.role.as_str());

    Ok(status::Custom(
        Status::Created,
        Json(RegisterResponse {
            message: "User registered successfully.".into(),
            token: signed.token,
            user: PublicUser::registered(&user),
        }),
    ))
}

#[post("/login", data = "<payload>")]
pub async fn login(
    state: &State<AuthState>,
    _throttle: AuthThrottle,
    payload: Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty());
    let password = payload
        .password
        .as_deref()
        .filter(|password| !password.is_empty());

    let (Some(email), Some(password)) = (email, password) else {
        return Err(ApiError::Validation(LOGIN_FIELDS_REQUIRED.into()));
    };

    let user = state.user_store.find_by_email(email);

    // On a lookup miss we still burn a hash comparison against the dummy
    // hash so timing does not reveal whether the email exists.
    let verified = match &user {
        Some(user) => state
            .password_service
            .verify_password(password, &user.password_hash)?,
        None => {
            state.password_service.verify_dummy(password)?;
            false
        }
    };

    let Some(user) = user.filter(|_| verified) else {
        // One message for both unknown email and wrong password.
        return Err(ApiError::Authentication(INVALID_CREDENTIALS.into()));
    };

    let signed = state.jwt_service.issue(&user)?;

    log::info!("user {} logged in", user.id);

    Ok(Json(LoginResponse {
        message: "Login successful.".into(),
        token: signed.token,
        user: PublicUser::summary(&user),
    }))
}

#[get("/me")]
pub fn me(user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        user: PublicUser::from(&user),
    })
}

#[get("/admin/overview")]
pub fn admin_overview(admin: RequireAdmin) -> Json<AdminOverviewResponse> {
    let user = admin.0;
    Json(AdminOverviewResponse {
        message: format!("Hello {}, you have admin access.", user.name),
        user: PublicUser::from(&user),
    })
}
