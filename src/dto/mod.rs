//! Wire types exchanged with the quiz service over REST and the push channel.

/// Authentication request/response bodies.
pub mod auth;
/// Push-channel event payloads.
pub mod push;
/// Quiz, session, and gameplay request/response bodies.
pub mod quiz;
/// Validation helpers for outbound DTOs.
pub mod validation;
