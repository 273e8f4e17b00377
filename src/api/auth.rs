use futures::future::BoxFuture;

use crate::{
    api::http::HttpApi,
    dto::auth::{AuthCheckResponse, Credentials, SignupRequest, UserProfile},
    error::ApiError,
};

/// Path of `POST user/login/`.
pub(crate) const LOGIN_PATH: &str = "user/login/";
/// Path of `POST user/signup/`.
const SIGNUP_PATH: &str = "user/signup/";
/// Path of `POST user/logout/`.
const LOGOUT_PATH: &str = "user/logout/";
/// Path of `GET user/profile/`.
const PROFILE_PATH: &str = "user/profile/";
/// Path of `GET user/isauthenticated/`.
const CHECK_AUTH_PATH: &str = "user/isauthenticated/";
/// Path of `POST user/refresh-token/`.
pub(crate) const REFRESH_PATH: &str = "user/refresh-token/";

/// Boundary over the authentication endpoints, so services can run against
/// in-memory fakes in tests.
pub trait AuthApi: Send + Sync {
    /// `POST user/login/` with the given credentials.
    fn login(&self, credentials: Credentials) -> BoxFuture<'static, Result<UserProfile, ApiError>>;
    /// `POST user/signup/` to register a new account.
    fn signup(&self, request: SignupRequest) -> BoxFuture<'static, Result<UserProfile, ApiError>>;
    /// `POST user/logout/` to invalidate the cookie session.
    fn logout(&self) -> BoxFuture<'static, Result<(), ApiError>>;
    /// `GET user/profile/` for the signed-in user's identity.
    fn profile(&self) -> BoxFuture<'static, Result<UserProfile, ApiError>>;
    /// `GET user/isauthenticated/` to probe the cookie session.
    fn check_auth(&self) -> BoxFuture<'static, Result<bool, ApiError>>;
}

impl AuthApi for HttpApi {
    fn login(&self, credentials: Credentials) -> BoxFuture<'static, Result<UserProfile, ApiError>> {
        let api = self.clone();
        Box::pin(async move { api.post_json(LOGIN_PATH, &credentials).await })
    }

    fn signup(&self, request: SignupRequest) -> BoxFuture<'static, Result<UserProfile, ApiError>> {
        let api = self.clone();
        Box::pin(async move { api.post_json(SIGNUP_PATH, &request).await })
    }

    fn logout(&self) -> BoxFuture<'static, Result<(), ApiError>> {
        let api = self.clone();
        Box::pin(async move { api.post_empty(LOGOUT_PATH).await })
    }

    fn profile(&self) -> BoxFuture<'static, Result<UserProfile, ApiError>> {
        let api = self.clone();
        Box::pin(async move { api.get_json(PROFILE_PATH).await })
    }

    fn check_auth(&self) -> BoxFuture<'static, Result<bool, ApiError>> {
        let api = self.clone();
        Box::pin(async move {
            let response: AuthCheckResponse = api.get_json(CHECK_AUTH_PATH).await?;
            Ok(response.authenticated)
        })
    }
}
