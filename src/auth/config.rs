use crate::auth::{AuthError, AuthResult};

pub const MIN_HASH_COST: u32 = 10;
pub const MAX_HASH_COST: u32 = 15;

const DEFAULT_HASH_COST: u32 = 12;
const DEFAULT_TOKEN_TTL: &str = "1h";

/// Authentication configuration loaded from environment variables.
///
/// Loading fails (and the process must not start serving) when the signing
/// secret is absent or any value is out of range.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub issuer: String,
    pub audience: String,
    pub token_ttl_secs: i64,
    pub hash_cost: u32,
    pub jwt_secret: String,
    pub cors_origin: Option<String>,
}

impl AuthConfig {
    pub fn from_env() -> AuthResult<Self> {
        let jwt_secret = std::env::var("AUTH_JWT_SECRET")
            .map_err(|_| AuthError::Config("AUTH_JWT_SECRET is required".into()))?;
        if jwt_secret.trim().is_empty() {
            return Err(AuthError::Config("AUTH_JWT_SECRET must not be empty".into()));
        }

        let issuer = std::env::var("AUTH_JWT_ISSUER").unwrap_or_else(|_| "auth-api".into());
        let audience =
            std::env::var("AUTH_JWT_AUDIENCE").unwrap_or_else(|_| "auth-api-users".into());

        let ttl_raw =
            std::env::var("AUTH_TOKEN_TTL").unwrap_or_else(|_| DEFAULT_TOKEN_TTL.into());
        let token_ttl_secs = parse_ttl(&ttl_raw)?;

        let hash_cost = match std::env::var("AUTH_HASH_COST") {
            Ok(raw) => raw.parse::<u32>().map_err(|_| {
                AuthError::Config("AUTH_HASH_COST must be an integer".into())
            })?,
            Err(_) => DEFAULT_HASH_COST,
        };
        if !(MIN_HASH_COST..=MAX_HASH_COST).contains(&hash_cost) {
            return Err(AuthError::Config(format!(
                "AUTH_HASH_COST must be between {} and {}",
                MIN_HASH_COST, MAX_HASH_COST
            )));
        }

        let cors_origin = std::env::var("AUTH_CORS_ORIGIN").ok();

        Ok(Self {
            issuer,
            audience,
            token_ttl_secs,
            hash_cost,
            jwt_secret,
            cors_origin,
        })
    }
}

/// Parse a token lifetime such as `900s`, `15m`, or `1h`. Bare digits are
/// treated as seconds.
pub fn parse_ttl(raw: &str) -> AuthResult<i64> {
    let trimmed = raw.trim();
    let (digits, unit_secs) = match trimmed.char_indices().last() {
        Some((idx, 'h')) => (&trimmed[..idx], 3600),
        Some((idx, 'm')) => (&trimmed[..idx], 60),
        Some((idx, 's')) => (&trimmed[..idx], 1),
        Some(_) => (trimmed, 1),
        None => ("", 1),
    };

    let value: i64 = digits.parse().map_err(|_| {
        AuthError::Config(format!(
            "AUTH_TOKEN_TTL must look like \"900s\", \"15m\", or \"1h\" (got {:?})",
            raw
        ))
    })?;
    if value <= 0 {
        return Err(AuthError::Config(
            "AUTH_TOKEN_TTL must be a positive duration".into(),
        ));
    }

    Ok(value * unit_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_suffixed_lifetimes() {
        assert_eq!(parse_ttl("1h").expect("hours"), 3600);
        assert_eq!(parse_ttl("15m").expect("minutes"), 900);
        assert_eq!(parse_ttl("900s").expect("seconds"), 900);
        assert_eq!(parse_ttl("45").expect("bare digits"), 45);
        assert_eq!(parse_ttl(" 2h ").expect("surrounding whitespace"), 7200);
    }

    #[test]
    fn rejects_malformed_lifetimes() {
        assert!(parse_ttl("").is_err());
        assert!(parse_ttl("h").is_err());
        assert!(parse_ttl("1d").is_err());
        assert!(parse_ttl("-5m").is_err());
        assert!(parse_ttl("0s").is_err());
    }
}
