#[macro_use]
extern crate rocket;

pub mod auth;
pub mod catchers;
pub mod error;
pub mod rate_limit;
pub mod request_logger;
pub mod routes;

use std::sync::Once;

use env_logger::Env;
use rocket::http::Method;
use rocket::{Build, Rocket};
use rocket_cors::{AllowedOrigins, Cors, CorsOptions};

use crate::auth::AuthState;
use crate::rate_limit::RateLimiter;
use crate::request_logger::RequestLogger;

static LOGGER: Once = Once::new();

/// Initialize logging once per process. Rocket's own chatter is kept at
/// `warn` while application logs default to `info`.
pub fn init_logger() {
    LOGGER.call_once(|| {
        env_logger::Builder::from_env(
            Env::default().default_filter_or("info,rocket::server=warn,rocket::request=warn"),
        )
        .init();
    });
}

fn cors(origin: Option<&str>) -> Cors {
    let allowed_origins = match origin {
        Some(origin) if origin != "*" => AllowedOrigins::some_exact(&[origin]),
        _ => AllowedOrigins::all(),
    };

    CorsOptions::default()
        .allowed_origins(allowed_origins)
        .allowed_methods(
            vec![Method::Get, Method::Post]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .to_cors()
        .expect("Error creating CORS")
}

/// Assemble the Rocket application around a fully constructed `AuthState`.
/// Configuration problems have already been rejected by the time this runs.
pub fn rocket(state: AuthState) -> Rocket<Build> {
    let cors = cors(state.config.cors_origin.as_deref());

    rocket::build()
        .attach(RequestLogger)
        .attach(cors)
        .manage(state)
        .manage(RateLimiter::auth_default())
        .mount("/", routes![routes::health::health_check])
        .mount(
            "/api/auth",
            routes![
                auth::routes::register,
                auth::routes::login,
                auth::routes::me,
                auth::routes::admin_overview,
            ],
        )
        .register(
            "/",
            catchers![
                catchers::bad_request,
                catchers::unauthorized,
                catchers::forbidden,
                catchers::not_found,
                catchers::unprocessable,
                catchers::too_many_requests,
                catchers::internal_error,
            ],
        )
}

#[cfg_attr(not(test), allow(dead_code))]
pub mod test_support {
    use rocket::config::LogLevel;
    use rocket::figment::Figment;
    use rocket::local::asynchronous::Client as AsyncClient;
    use rocket::local::blocking::Client;
    use rocket::{Build, Rocket};

    use crate::auth::{AuthConfig, AuthState};

    pub const TEST_JWT_SECRET: &str = "unit-test-signing-secret";

    /// Configuration mirroring production defaults but with the cheapest
    /// permitted hash cost so tests stay fast.
    pub fn test_config() -> AuthConfig {
        AuthConfig {
            issuer: "https://auth.test".into(),
            audience: "auth-test-clients".into(),
            token_ttl_secs: 3600,
            hash_cost: 10,
            jwt_secret: TEST_JWT_SECRET.into(),
            cors_origin: None,
        }
    }

    pub fn test_state() -> AuthState {
        AuthState::from_config(test_config()).expect("auth state builds")
    }

    /// Builder for local Rocket instances: random port, logging disabled,
    /// a fresh in-memory user store per instance.
    pub struct TestRocketBuilder {
        figment: Figment,
        state: Option<AuthState>,
    }

    impl TestRocketBuilder {
        pub fn new() -> Self {
            let figment = rocket::Config::figment()
                .merge(("port", 0))
                .merge(("log_level", LogLevel::Off))
                .merge(("cli_colors", false));

            Self {
                figment,
                state: None,
            }
        }

        /// Use a caller-supplied `AuthState` (custom config or store).
        pub fn with_state(mut self, state: AuthState) -> Self {
            self.state = Some(state);
            self
        }

        /// Finish building the Rocket instance.
        pub fn build(self) -> Rocket<Build> {
            let state = self.state.unwrap_or_else(test_state);
            crate::rocket(state).configure(self.figment)
        }

        /// Convenience helper to produce a blocking local client.
        pub fn blocking_client(self) -> Client {
            Client::tracked(self.build()).expect("valid Rocket instance")
        }

        /// Convenience helper to produce an asynchronous local client.
        pub async fn async_client(self) -> AsyncClient {
            AsyncClient::tracked(self.build())
                .await
                .expect("valid Rocket instance")
        }
    }

    impl Default for TestRocketBuilder {
        fn default() -> Self {
            Self::new()
        }
    }
}
