//! Authentication flows over the auth slice.
//!
//! Every operation wraps one REST call. Success lands identity fields plus
//! `is_authenticated = true` in the store; failure lands a user-facing notice
//! and `is_authenticated = false`. The flag is always written, never left
//! stale.

use std::sync::Arc;

use tracing::warn;
use validator::Validate;

use crate::{
    api::AuthApi,
    dto::auth::{Credentials, SignupRequest},
    error::ApiError,
    services::{EffectSink, failure_message, navigate, notify},
    state::{
        SharedStore,
        transitions::{Notice, Route},
    },
};

/// Sign in with the given credentials.
pub async fn login(
    store: &SharedStore,
    api: &Arc<dyn AuthApi>,
    fx: &EffectSink,
    credentials: Credentials,
) {
    store.auth().write().await.set_loading(true);

    match api.login(credentials).await {
        Ok(user) => {
            let mut auth = store.auth().write().await;
            auth.set_user(user);
            auth.set_loading(false);
            drop(auth);
            notify(fx, Notice::success("Login successful"));
            navigate(fx, Route::Home);
        }
        Err(err) => {
            warn!(error = %err, "login failed");
            let mut auth = store.auth().write().await;
            auth.set_authenticated(false);
            auth.set_loading(false);
            drop(auth);
            notify(fx, Notice::error("Login failed: invalid credentials"));
        }
    }
}

/// Register a new account and sign in as it.
pub async fn signup(
    store: &SharedStore,
    api: &Arc<dyn AuthApi>,
    fx: &EffectSink,
    request: SignupRequest,
) {
    if let Err(err) = request.validate() {
        notify(fx, Notice::error(format!("Sign up failed: {err}")));
        return;
    }

    store.auth().write().await.set_loading(true);

    match api.signup(request).await {
        Ok(user) => {
            let mut auth = store.auth().write().await;
            auth.set_user(user);
            auth.set_loading(false);
            drop(auth);
            notify(fx, Notice::success("Sign up successful"));
            navigate(fx, Route::Home);
        }
        Err(err) => {
            warn!(error = %err, "signup failed");
            let mut auth = store.auth().write().await;
            auth.set_authenticated(false);
            auth.set_loading(false);
            drop(auth);
            notify(fx, Notice::error(failure_message("Sign up failed", &err)));
        }
    }
}

/// Sign out. Local auth state is cleared whether or not the request lands.
pub async fn logout(store: &SharedStore, api: &Arc<dyn AuthApi>, fx: &EffectSink) {
    let result = api.logout().await;

    let mut auth = store.auth().write().await;
    auth.set_loading(false);
    auth.clear_user();
    drop(auth);

    match result {
        Ok(()) => notify(fx, Notice::success("Logout successful")),
        Err(err) => {
            warn!(error = %err, "logout request failed");
            notify(fx, Notice::error("Logout failed"));
        }
    }
    navigate(fx, Route::Login);
}

/// Fetch the signed-in user's profile into the store.
///
/// The HTTP layer already performs the one silent token refresh; an
/// `Unauthorized` here means the session is truly gone.
pub async fn fetch_user(store: &SharedStore, api: &Arc<dyn AuthApi>, fx: &EffectSink) {
    store.auth().write().await.set_loading(true);

    match api.profile().await {
        Ok(user) => {
            let mut auth = store.auth().write().await;
            auth.set_user(user);
            auth.set_loading(false);
        }
        Err(ApiError::Unauthorized) => {
            let mut auth = store.auth().write().await;
            auth.clear_user();
            auth.set_loading(false);
            drop(auth);
            navigate(fx, Route::Login);
        }
        Err(err) => {
            warn!(error = %err, "failed to fetch user profile");
            store.auth().write().await.set_loading(false);
            notify(fx, Notice::error(failure_message("Failed to fetch user data", &err)));
        }
    }
}

/// Probe whether the cookie session is still valid, recording the result.
pub async fn check_auth(store: &SharedStore, api: &Arc<dyn AuthApi>) -> bool {
    store.auth().write().await.set_loading(true);

    let authenticated = match api.check_auth().await {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "auth check failed");
            false
        }
    };

    let mut auth = store.auth().write().await;
    auth.set_authenticated(authenticated);
    auth.set_loading(false);
    authenticated
}
