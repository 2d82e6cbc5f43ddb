//! Registration payload validation. Pure checks, applied in order with the
//! first failure winning; the returned message is echoed verbatim to the
//! caller as a 400.
//!
//! Password policy: minimum 12 characters with at least one uppercase letter,
//! one lowercase letter, one digit, and one symbol.

use std::sync::OnceLock;

use regex::Regex;

use crate::auth::responses::{RegisterRequest, Role};

pub const MIN_PASSWORD_LEN: usize = 12;
pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 100;

pub const MSG_FIELDS_REQUIRED: &str = "Email, password, and name are required.";
pub const MSG_EMAIL_INVALID: &str = "A valid email address is required.";
pub const MSG_NAME_LENGTH: &str = "Name must be between 2 and 100 characters.";
pub const MSG_ROLE_INVALID: &str = "Role must be either 'user' or 'admin'.";
pub const MSG_PASSWORD_LENGTH: &str = "Password must be at least 12 characters long.";
pub const MSG_PASSWORD_CLASSES: &str =
    "Password must include uppercase, lowercase, number, and symbol characters.";

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
    })
}

/// A registration payload that has passed every policy check. Email and name
/// are trimmed; the role has been parsed (absent defaults to `user`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

pub fn validate_registration(
    payload: &RegisterRequest,
) -> Result<ValidRegistration, &'static str> {
    let email = payload.email.as_deref().unwrap_or("").trim();
    let password = payload.password.as_deref().unwrap_or("");
    let name = payload.name.as_deref().unwrap_or("").trim();

    if email.is_empty() || password.is_empty() || name.is_empty() {
        return Err(MSG_FIELDS_REQUIRED);
    }

    if !email_regex().is_match(email) {
        return Err(MSG_EMAIL_INVALID);
    }

    let name_len = name.chars().count();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&name_len) {
        return Err(MSG_NAME_LENGTH);
    }

    let role = match payload.role.as_deref().filter(|role| !role.is_empty()) {
        None => Role::User,
        Some(raw) => Role::parse_exact(raw).ok_or(MSG_ROLE_INVALID)?,
    };

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(MSG_PASSWORD_LENGTH);
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());
    if !has_upper || !has_lower || !has_digit || !has_symbol {
        return Err(MSG_PASSWORD_CLASSES);
    }

    Ok(ValidRegistration {
        email: email.to_string(),
        password: password.to_string(),
        name: name.to_string(),
        role,
    })
}
