//! REST boundary: one HTTP client, endpoint traits, and the refresh policy.

/// Authentication endpoints.
pub mod auth;
/// HTTP client plumbing shared by every endpoint.
mod http;
/// Quiz and gameplay endpoints.
pub mod quiz;

pub use auth::AuthApi;
pub use http::HttpApi;
pub use quiz::QuizApi;
