//! Quiz creation, joining, and dashboard list management.

use std::sync::Arc;

use tracing::warn;
use validator::Validate;

use crate::{
    api::QuizApi,
    dto::quiz::{CreateQuizRequest, JoinQuizRequest, JoinQuizResponse, QuizSummary},
    error::ClientError,
    services::{EffectSink, failure_message, notify},
    state::{SharedStore, transitions::Notice},
};

/// Load the quizzes this user hosts into the store.
pub async fn load_dashboard(store: &SharedStore, api: &Arc<dyn QuizApi>, fx: &EffectSink) {
    store.quizzes().write().await.set_loading(true);

    match api.dashboard().await {
        Ok(quizzes) => {
            let mut lists = store.quizzes().write().await;
            lists.set_created(quizzes);
            lists.set_error(None);
        }
        Err(err) => {
            warn!(error = %err, "failed to load dashboard");
            let message = failure_message("Failed to fetch quizzes", &err);
            store.quizzes().write().await.set_error(Some(message.clone()));
            notify(fx, Notice::error(message));
        }
    }

    store.quizzes().write().await.set_loading(false);
}

/// Load the quizzes this user has joined into the store.
pub async fn load_enrolled(store: &SharedStore, api: &Arc<dyn QuizApi>, fx: &EffectSink) {
    store.quizzes().write().await.set_loading(true);

    match api.enrolled().await {
        Ok(quizzes) => {
            let mut lists = store.quizzes().write().await;
            lists.set_enrolled(quizzes);
            lists.set_error(None);
        }
        Err(err) => {
            warn!(error = %err, "failed to load enrolled quizzes");
            let message = failure_message("Failed to fetch quizzes", &err);
            store.quizzes().write().await.set_error(Some(message.clone()));
            notify(fx, Notice::error(message));
        }
    }

    store.quizzes().write().await.set_loading(false);
}

/// Create a quiz after validating the authored questions.
///
/// Returns the created quiz so the caller can enter its lobby directly.
pub async fn create_quiz(
    store: &SharedStore,
    api: &Arc<dyn QuizApi>,
    fx: &EffectSink,
    request: CreateQuizRequest,
) -> Result<QuizSummary, ClientError> {
    if let Err(err) = request.validate() {
        notify(fx, Notice::error(format!("Cannot create quiz: {err}")));
        return Err(err.into());
    }
    if request.questions.is_empty() {
        notify(fx, Notice::error("Cannot create quiz: it needs at least one question"));
        return Err(ClientError::InvalidInput(
            "a quiz needs at least one question".into(),
        ));
    }

    store.quizzes().write().await.set_loading(true);
    let result = api.create(request).await;
    store.quizzes().write().await.set_loading(false);

    match result {
        Ok(quiz) => {
            store.quizzes().write().await.add_created(quiz.clone());
            notify(fx, Notice::success("Quiz created successfully!"));
            Ok(quiz)
        }
        Err(err) => {
            warn!(error = %err, "failed to create quiz");
            notify(fx, Notice::error(failure_message("Failed to create quiz", &err)));
            Err(err.into())
        }
    }
}

/// Join a session by room code.
///
/// Returns the join response so the caller can initialise the session engine
/// and seed the lobby roster from it.
pub async fn join_quiz(
    store: &SharedStore,
    api: &Arc<dyn QuizApi>,
    fx: &EffectSink,
    code: &str,
) -> Result<JoinQuizResponse, ClientError> {
    let request = JoinQuizRequest { code: code.into() };
    if let Err(err) = request.validate() {
        notify(fx, Notice::error(format!("Cannot join quiz: {err}")));
        return Err(err.into());
    }

    match api.join(request).await {
        Ok(response) => {
            store.quizzes().write().await.add_enrolled(response.quiz.clone());
            notify(fx, Notice::success("Joined quiz successfully!"));
            Ok(response)
        }
        Err(err) => {
            warn!(error = %err, code, "failed to join quiz");
            notify(fx, Notice::error(failure_message("Failed to join quiz", &err)));
            Err(err.into())
        }
    }
}
