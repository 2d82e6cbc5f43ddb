//! Authentication subsystem: configuration, password policy, credential
//! hashing and storage, token minting, Rocket request guards, and the HTTP
//! route handlers for registration/login.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod guards;
pub mod jwt;
pub mod passwords;
pub mod policy;
pub mod responses;
pub mod routes;
pub mod store;

pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use guards::{AuthUser, RequireAdmin};
pub use jwt::JwtService;
pub use passwords::PasswordService;
pub use responses::Role;
pub use store::{InMemoryUserStore, UserStore};

/// Shared service bundle managed as Rocket state.
#[derive(Clone)]
pub struct AuthState {
    pub config: AuthConfig,
    pub password_service: Arc<PasswordService>,
    pub jwt_service: Arc<JwtService>,
    pub user_store: Arc<dyn UserStore>,
}

impl AuthState {
    /// Build every auth service from configuration with an empty in-memory
    /// store. Fails when the hash cost is out of range or key material is
    /// unusable, which must abort startup.
    pub fn from_config(config: AuthConfig) -> AuthResult<Self> {
        let password_service = PasswordService::new(config.hash_cost)?;
        let jwt_service = JwtService::from_config(&config)?;

        Ok(Self {
            config,
            password_service: Arc::new(password_service),
            jwt_service: Arc::new(jwt_service),
            user_store: Arc::new(InMemoryUserStore::new()),
        })
    }
}
