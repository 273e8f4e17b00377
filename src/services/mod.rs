//! Orchestration layer: each service wraps REST calls, applies the results to
//! the store, and queues [`Effect`]s for the front-end to render. Failures are
//! handled per call; one failed request never aborts unrelated state updates.

/// Sign-in, sign-up, and session-probing flows.
pub mod auth_service;
/// Quiz creation, joining, and dashboard lists.
pub mod quiz_service;
/// The live-session engine: gameplay, push events, and the countdown.
pub mod session_service;

use tokio::sync::mpsc;

use crate::{
    error::ApiError,
    state::transitions::{Effect, Notice, Route},
};

/// Channel the front-end consumes rendered effects from.
pub type EffectSink = mpsc::UnboundedSender<Effect>;

/// Queue a notice for the front-end, ignoring a disconnected sink.
pub(crate) fn notify(fx: &EffectSink, notice: Notice) {
    let _ = fx.send(Effect::Notify(notice));
}

/// Queue a navigation for the front-end, ignoring a disconnected sink.
pub(crate) fn navigate(fx: &EffectSink, route: Route) {
    let _ = fx.send(Effect::Navigate(route));
}

/// Compose a user-facing failure message, preferring the server's own text.
pub(crate) fn failure_message(action: &str, err: &ApiError) -> String {
    match err {
        ApiError::Status { message, .. } if !message.is_empty() => {
            format!("{action}: {message}")
        }
        _ => action.to_string(),
    }
}
