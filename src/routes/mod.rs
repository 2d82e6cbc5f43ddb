//! HTTP route handlers outside the auth subsystem.

pub mod health;
