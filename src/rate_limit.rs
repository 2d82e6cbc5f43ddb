//! Fixed-window per-client-IP request limiting for the authentication
//! endpoints. Counters live in process memory alongside the user store.

use std::net::IpAddr;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rocket::Request;
use rocket::State;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};

const AUTH_WINDOW_MINS: i64 = 15;
const AUTH_MAX_ATTEMPTS: u32 = 10;

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: DateTime<Utc>,
    count: u32,
}

pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    buckets: DashMap<IpAddr, Window>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            buckets: DashMap::new(),
        }
    }

    /// Limiter sized for register/login: 10 attempts per 15 minutes per IP.
    pub fn auth_default() -> Self {
        Self::new(Duration::minutes(AUTH_WINDOW_MINS), AUTH_MAX_ATTEMPTS)
    }

    pub fn try_acquire(&self, key: IpAddr) -> bool {
        self.try_acquire_at(key, Utc::now())
    }

    fn try_acquire_at(&self, key: IpAddr, now: DateTime<Utc>) -> bool {
        let mut bucket = self.buckets.entry(key).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if now - bucket.started_at >= self.window {
            bucket.started_at = now;
            bucket.count = 0;
        }

        if bucket.count >= self.max_requests {
            return false;
        }

        bucket.count += 1;
        true
    }
}

/// Request guard applied to register/login. Fails with 429 once the window
/// is exhausted; requests without a resolvable client IP (and deployments
/// that forgot to manage a limiter) pass through.
pub struct AuthThrottle;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthThrottle {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let limiter = match request.guard::<&State<RateLimiter>>().await.succeeded() {
            Some(limiter) => limiter,
            None => {
                log::warn!("rate limiter missing from managed state; skipping throttle");
                return Outcome::Success(AuthThrottle);
            }
        };

        match request.client_ip() {
            Some(ip) if !limiter.try_acquire(ip) => {
                log::debug!("rate limit exceeded for {}", ip);
                Outcome::Error((Status::TooManyRequests, ()))
            }
            _ => Outcome::Success(AuthThrottle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([127, 0, 0, last])
    }

    #[test]
    fn allows_up_to_the_limit_then_blocks() {
        let limiter = RateLimiter::new(Duration::minutes(15), 3);
        let now = Utc::now();

        assert!(limiter.try_acquire_at(ip(1), now));
        assert!(limiter.try_acquire_at(ip(1), now));
        assert!(limiter.try_acquire_at(ip(1), now));
        assert!(!limiter.try_acquire_at(ip(1), now));
    }

    #[test]
    fn windows_are_tracked_per_client() {
        let limiter = RateLimiter::new(Duration::minutes(15), 1);
        let now = Utc::now();

        assert!(limiter.try_acquire_at(ip(1), now));
        assert!(!limiter.try_acquire_at(ip(1), now));
        assert!(limiter.try_acquire_at(ip(2), now));
    }

    #[test]
    fn the_window_resets_after_it_elapses() {
        let limiter = RateLimiter::new(Duration::minutes(15), 1);
        let start = Utc::now();

        assert!(limiter.try_acquire_at(ip(1), start));
        assert!(!limiter.try_acquire_at(ip(1), start + Duration::minutes(14)));
        assert!(limiter.try_acquire_at(ip(1), start + Duration::minutes(15)));
    }
}
