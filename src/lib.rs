//! Headless client engine for the quizroom live multiplayer quiz service.
//!
//! The server is consumed purely as an HTTP/WebSocket boundary: REST wrappers
//! live in [`api`], the push-channel dispatcher in [`push`], the countdown in
//! [`timer`], and the session/auth/quiz state with its reducers in [`state`].
//! [`services`] ties them together; the `quizroom-client` binary renders the
//! resulting effects in a terminal.

/// REST boundary: HTTP client, endpoint traits, refresh policy.
pub mod api;
/// Runtime configuration.
pub mod config;
/// Wire types for REST and the push channel.
pub mod dto;
/// Error taxonomy.
pub mod error;
/// Push-channel client.
pub mod push;
/// Orchestration services and the session engine.
pub mod services;
/// State container and reducers.
pub mod state;
/// Countdown timer.
pub mod timer;
