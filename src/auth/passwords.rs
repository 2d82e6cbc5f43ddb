use argon2::{
    Algorithm, Argon2, ParamsBuilder, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::RngCore;

use crate::auth::config::{MAX_HASH_COST, MIN_HASH_COST};
use crate::auth::{AuthError, AuthResult};

const SALT_LEN: usize = 16;
const DUMMY_PASSWORD_LEN: usize = 32;

/// Argon2id credential hasher. The cost factor maps to the memory cost
/// (`1 << cost` KiB, so 10 -> 1 MiB up to 15 -> 32 MiB) with two passes.
///
/// A dummy hash is computed once at construction; login attempts against
/// unknown emails verify against it so a lookup miss costs the same as a
/// lookup hit and response timing does not reveal whether an account exists.
pub struct PasswordService {
    argon2: Argon2<'static>,
    dummy_hash: String,
}

impl PasswordService {
    pub fn new(cost: u32) -> AuthResult<Self> {
        if !(MIN_HASH_COST..=MAX_HASH_COST).contains(&cost) {
            return Err(AuthError::Config(format!(
                "hash cost factor must be between {} and {}",
                MIN_HASH_COST, MAX_HASH_COST
            )));
        }

        let mut builder = ParamsBuilder::new();
        builder.m_cost(1 << cost);
        builder.t_cost(2);
        builder.p_cost(1);
        let params = builder.build().map_err(AuthError::from)?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut service = Self {
            argon2,
            dummy_hash: String::new(),
        };

        let mut dummy_password = [0u8; DUMMY_PASSWORD_LEN];
        rand::thread_rng().fill_bytes(&mut dummy_password);
        service.dummy_hash = service.hash_bytes(&dummy_password)?;

        Ok(service)
    }

    pub fn hash_password(&self, password: &str) -> AuthResult<String> {
        self.hash_bytes(password.as_bytes())
    }

    fn hash_bytes(&self, raw: &[u8]) -> AuthResult<String> {
        let mut salt_bytes = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes).map_err(AuthError::from)?;
        let hash = self
            .argon2
            .hash_password(raw, &salt)
            .map_err(AuthError::from)?
            .to_string();
        Ok(hash)
    }

    pub fn verify_password(&self, password: &str, encoded: &str) -> AuthResult<bool> {
        let parsed = PasswordHash::new(encoded)?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(AuthError::from(err)),
        }
    }

    /// Burn a verification against the dummy hash. Called on lookup misses to
    /// keep the response-time profile of login uniform.
    pub fn verify_dummy(&self, password: &str) -> AuthResult<()> {
        self.verify_password(password, &self.dummy_hash).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> PasswordService {
        PasswordService::new(MIN_HASH_COST).expect("password service")
    }

    #[test]
    fn hashes_and_verifies_passwords() {
        let service = service();
        let hash = service
            .hash_password("Str0ng!Passw0rd")
            .expect("hash generation");

        assert!(hash.starts_with("$argon2id$"));
        assert!(
            service
                .verify_password("Str0ng!Passw0rd", &hash)
                .expect("verify succeeds")
        );
        assert!(
            !service
                .verify_password("wrong-password", &hash)
                .expect("verify runs")
        );
    }

    #[test]
    fn salts_are_random_per_hash() {
        let service = service();
        let first = service.hash_password("Str0ng!Passw0rd").expect("hash");
        let second = service.hash_password("Str0ng!Passw0rd").expect("hash");
        assert_ne!(first, second);
    }

    #[test]
    fn dummy_comparison_runs_and_never_matches() {
        let service = service();
        service
            .verify_dummy("Str0ng!Passw0rd")
            .expect("dummy verification runs");
    }

    #[test]
    fn rejects_out_of_range_cost_factors() {
        assert!(PasswordService::new(MIN_HASH_COST - 1).is_err());
        assert!(PasswordService::new(MAX_HASH_COST + 1).is_err());
    }
}
