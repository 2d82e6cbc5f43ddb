use auth_server::auth::{AuthConfig, AuthState};

#[rocket::launch]
fn rocket() -> _ {
    auth_server::init_logger();

    log::info!("Starting credential issuance service");

    // Configuration errors abort startup; they are never deferred to
    // request time.
    let config = AuthConfig::from_env().unwrap_or_else(|err| {
        log::error!("configuration error: {}", err);
        std::process::exit(1);
    });

    let state = AuthState::from_config(config).unwrap_or_else(|err| {
        log::error!("failed to initialize auth services: {}", err);
        std::process::exit(1);
    });

    auth_server::rocket(state)
}
