use futures::future::BoxFuture;

use crate::{
    api::http::HttpApi,
    dto::quiz::{
        AttemptStatus, CreateQuizRequest, JoinQuizRequest, JoinQuizResponse, LeaderboardEntry,
        LeaderboardResponse, PaperResponse, QuizListResponse, QuizSummary, SessionActionRequest,
        SubmitAnswerRequest, SubmitAnswerResponse,
    },
    error::ApiError,
};

/// Path of `POST quizzes/create/`.
const CREATE_PATH: &str = "quizzes/create/";
/// Path of `POST quizzes/join/`.
const JOIN_PATH: &str = "quizzes/join/";
/// Path of `GET quizzes/dashboard/`.
const DASHBOARD_PATH: &str = "quizzes/dashboard/";
/// Path of `GET quizzes/enrolled/`.
const ENROLLED_PATH: &str = "quizzes/enrolled/";
/// Path of `POST quizzes/start/`.
const START_PATH: &str = "quizzes/start/";
/// Path of `POST quizzes/end/`.
const END_PATH: &str = "quizzes/end/";
/// Path of `POST quizzes/submit/`.
const SUBMIT_PATH: &str = "quizzes/submit/";
/// Path of `POST quizzes/complete/`.
const COMPLETE_PATH: &str = "quizzes/complete/";

/// Boundary over the quiz and gameplay endpoints, so the session engine can
/// run against in-memory fakes in tests.
pub trait QuizApi: Send + Sync {
    /// `POST quizzes/create/` a new quiz with its questions.
    fn create(&self, request: CreateQuizRequest)
    -> BoxFuture<'static, Result<QuizSummary, ApiError>>;
    /// `POST quizzes/join/` a session by room code.
    fn join(&self, request: JoinQuizRequest)
    -> BoxFuture<'static, Result<JoinQuizResponse, ApiError>>;
    /// `GET quizzes/dashboard/`: quizzes this user hosts.
    fn dashboard(&self) -> BoxFuture<'static, Result<Vec<QuizSummary>, ApiError>>;
    /// `GET quizzes/enrolled/`: quizzes this user has joined.
    fn enrolled(&self) -> BoxFuture<'static, Result<Vec<QuizSummary>, ApiError>>;
    /// `POST quizzes/start/`: host opens the quiz for play.
    fn start(&self, session_id: &str) -> BoxFuture<'static, Result<(), ApiError>>;
    /// `POST quizzes/end/`: host ends the quiz for everyone.
    fn end(&self, session_id: &str) -> BoxFuture<'static, Result<(), ApiError>>;
    /// `GET quizzes/leaderboard/:id/`.
    fn leaderboard(
        &self,
        session_id: &str,
    ) -> BoxFuture<'static, Result<Vec<LeaderboardEntry>, ApiError>>;
    /// `GET quizzes/paper/:id/`: the full ordered question list.
    fn paper(&self, session_id: &str) -> BoxFuture<'static, Result<PaperResponse, ApiError>>;
    /// `POST quizzes/submit/` one answer.
    fn submit(
        &self,
        request: SubmitAnswerRequest,
    ) -> BoxFuture<'static, Result<SubmitAnswerResponse, ApiError>>;
    /// `GET quizzes/status/:id/`: this user's attempt progress.
    fn status(&self, session_id: &str) -> BoxFuture<'static, Result<AttemptStatus, ApiError>>;
    /// `POST quizzes/complete/`: mark this user's attempt finished.
    fn complete(&self, session_id: &str) -> BoxFuture<'static, Result<(), ApiError>>;
}

impl QuizApi for HttpApi {
    fn create(
        &self,
        request: CreateQuizRequest,
    ) -> BoxFuture<'static, Result<QuizSummary, ApiError>> {
        let api = self.clone();
        Box::pin(async move { api.post_json(CREATE_PATH, &request).await })
    }

    fn join(
        &self,
        request: JoinQuizRequest,
    ) -> BoxFuture<'static, Result<JoinQuizResponse, ApiError>> {
        let api = self.clone();
        Box::pin(async move { api.post_json(JOIN_PATH, &request).await })
    }

    fn dashboard(&self) -> BoxFuture<'static, Result<Vec<QuizSummary>, ApiError>> {
        let api = self.clone();
        Box::pin(async move {
            let response: QuizListResponse = api.get_json(DASHBOARD_PATH).await?;
            Ok(response.quizzes)
        })
    }

    fn enrolled(&self) -> BoxFuture<'static, Result<Vec<QuizSummary>, ApiError>> {
        let api = self.clone();
        Box::pin(async move {
            let response: QuizListResponse = api.get_json(ENROLLED_PATH).await?;
            Ok(response.quizzes)
        })
    }

    fn start(&self, session_id: &str) -> BoxFuture<'static, Result<(), ApiError>> {
        let api = self.clone();
        let body = SessionActionRequest {
            session_id: session_id.to_string(),
        };
        Box::pin(async move { api.post_unit(START_PATH, &body).await })
    }

    fn end(&self, session_id: &str) -> BoxFuture<'static, Result<(), ApiError>> {
        let api = self.clone();
        let body = SessionActionRequest {
            session_id: session_id.to_string(),
        };
        Box::pin(async move { api.post_unit(END_PATH, &body).await })
    }

    fn leaderboard(
        &self,
        session_id: &str,
    ) -> BoxFuture<'static, Result<Vec<LeaderboardEntry>, ApiError>> {
        let api = self.clone();
        let path = format!("quizzes/leaderboard/{session_id}/");
        Box::pin(async move {
            let response: LeaderboardResponse = api.get_json(&path).await?;
            Ok(response.leaderboard)
        })
    }

    fn paper(&self, session_id: &str) -> BoxFuture<'static, Result<PaperResponse, ApiError>> {
        let api = self.clone();
        let path = format!("quizzes/paper/{session_id}/");
        Box::pin(async move { api.get_json(&path).await })
    }

    fn submit(
        &self,
        request: SubmitAnswerRequest,
    ) -> BoxFuture<'static, Result<SubmitAnswerResponse, ApiError>> {
        let api = self.clone();
        Box::pin(async move { api.post_json(SUBMIT_PATH, &request).await })
    }

    fn status(&self, session_id: &str) -> BoxFuture<'static, Result<AttemptStatus, ApiError>> {
        let api = self.clone();
        let path = format!("quizzes/status/{session_id}/");
        Box::pin(async move { api.get_json(&path).await })
    }

    fn complete(&self, session_id: &str) -> BoxFuture<'static, Result<(), ApiError>> {
        let api = self.clone();
        let body = SessionActionRequest {
            session_id: session_id.to_string(),
        };
        Box::pin(async move { api.post_unit(COMPLETE_PATH, &body).await })
    }
}
