use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::responses::Role;

/// A stored user record. Created once through registration, never mutated.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Input for `UserStore::create`. The password has already been hashed by
/// the time a record reaches the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
}

/// Recoverable create outcomes. These are business conditions reported to the
/// caller, not faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CreateUserError {
    #[error("a user with this email already exists")]
    DuplicateEmail,
    #[error("email is empty after normalization")]
    EmptyEmail,
}

/// Storage capability consumed by the registration/login flow. A durable
/// backend can satisfy this without touching callers.
pub trait UserStore: Send + Sync {
    fn create(&self, new_user: NewUser) -> Result<User, CreateUserError>;
    fn find_by_email(&self, email: &str) -> Option<User>;
}

/// Uniqueness key: surrounding whitespace removed, letters lower-cased.
/// Applied on both write and read paths.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// In-memory store keyed by normalized email. The map's entry API makes the
/// check-then-insert atomic, so concurrent registrations with the same
/// normalized email resolve to exactly one winner.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: DashMap<String, User>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for InMemoryUserStore {
    fn create(&self, new_user: NewUser) -> Result<User, CreateUserError> {
        let key = normalize_email(&new_user.email);
        if key.is_empty() {
            return Err(CreateUserError::EmptyEmail);
        }

        match self.users.entry(key.clone()) {
            Entry::Occupied(_) => Err(CreateUserError::DuplicateEmail),
            Entry::Vacant(slot) => {
                let user = User {
                    id: Uuid::new_v4(),
                    email: key,
                    password_hash: new_user.password_hash,
                    name: new_user.name.trim().to_string(),
                    role: new_user.role,
                    created_at: Utc::now(),
                };
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }

    fn find_by_email(&self, email: &str) -> Option<User> {
        self.users
            .get(&normalize_email(email))
            .map(|entry| entry.value().clone())
    }
}
