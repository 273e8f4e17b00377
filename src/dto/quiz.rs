use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::{Validate, ValidationErrors};

use crate::dto::validation::{validate_options, validate_question_text};

/// Number of answer options every question carries.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// One question of a session paper, as served by `GET quizzes/paper/:id/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Question {
    /// Question prompt shown to the participant.
    pub text: String,
    /// The four answer options, in display order.
    pub options: [String; OPTIONS_PER_QUESTION],
    /// Correct option value; omitted on papers served to participants.
    #[serde(default)]
    pub correct_answer: Option<String>,
    /// Optional explanation revealed after the attempt.
    #[serde(default)]
    pub explanation: Option<String>,
    /// Points awarded for a correct answer.
    #[serde(default = "default_points")]
    pub points: u32,
}

fn default_points() -> u32 {
    1
}

/// Response of `GET quizzes/paper/:id/`.
#[derive(Debug, Deserialize)]
pub struct PaperResponse {
    /// Ordered question sequence for the attempt.
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Attempt duration in seconds; `0` means the server left it unset.
    #[serde(default)]
    pub duration: u64,
}

/// Response of `GET quizzes/status/:id/`: this user's progress so far.
#[derive(Debug, Default, Deserialize)]
pub struct AttemptStatus {
    /// Indices of questions already answered, in no particular order.
    #[serde(default)]
    pub attempted_indices: Vec<usize>,
    /// Score accumulated across the attempted questions.
    #[serde(default)]
    pub current_score: u32,
}

/// Body for `POST quizzes/submit/`.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitAnswerRequest {
    /// Session the answer belongs to.
    pub session_id: String,
    /// Index of the question being answered.
    pub question_index: usize,
    /// Option value the participant selected.
    pub selected_option: String,
}

/// Response of `POST quizzes/submit/`.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswerResponse {
    /// Points awarded for this submission; `0` for a wrong answer.
    #[serde(default)]
    pub points: u32,
}

/// One row of a leaderboard or initial roster fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardEntry {
    /// Canonical participant identifier (`_id` accepted for older backends).
    #[serde(alias = "_id")]
    pub user_id: String,
    /// Display name (`username` accepted for older backends).
    #[serde(alias = "username")]
    pub name: String,
    /// Total score for this participant.
    #[serde(default)]
    pub score: u32,
    /// Raw participant status string, `active` or `completed`.
    #[serde(default)]
    pub status: Option<String>,
}

/// Response of `GET quizzes/leaderboard/:id/`.
#[derive(Debug, Deserialize)]
pub struct LeaderboardResponse {
    /// Participants ranked by the server.
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Body for `POST quizzes/create/`.
#[derive(Debug, Serialize, Validate)]
pub struct CreateQuizRequest {
    /// Quiz title shown in dashboards and the lobby.
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    /// Optional free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Attempt duration in seconds.
    #[validate(range(min = 1, message = "duration must be strictly positive"))]
    pub duration: u64,
    /// Questions making up the quiz.
    #[validate(nested)]
    pub questions: Vec<QuestionInput>,
}

/// One authored question inside [`CreateQuizRequest`].
#[derive(Debug, Serialize)]
pub struct QuestionInput {
    /// Question prompt.
    pub text: String,
    /// The four answer options.
    pub options: [String; OPTIONS_PER_QUESTION],
    /// Which option value is correct; must match one of `options`.
    pub correct_answer: String,
    /// Optional explanation shown after the attempt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// Points awarded for a correct answer.
    pub points: u32,
}

impl Validate for QuestionInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_question_text(&self.text) {
            errors.add("text", e);
        }
        if let Err(e) = validate_options(&self.options) {
            errors.add("options", e);
        }
        if !self.options.contains(&self.correct_answer) {
            let mut err = validator::ValidationError::new("correct_answer_unknown");
            err.message = Some("correct answer must be one of the options".into());
            errors.add("correct_answer", err);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Body for `POST quizzes/join/`.
#[derive(Debug, Serialize, Validate)]
pub struct JoinQuizRequest {
    /// Room code shared by the host.
    #[validate(length(min = 1, message = "room code must not be empty"))]
    pub code: String,
}

/// Body for `POST quizzes/start/`, `end/`, and `complete/`.
#[derive(Debug, Serialize)]
pub struct SessionActionRequest {
    /// Session the action targets.
    pub session_id: String,
}

/// One quiz as listed by the dashboard and enrolled endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizSummary {
    /// Canonical quiz identifier.
    #[serde(alias = "_id")]
    pub quiz_id: String,
    /// Live session identifier for this quiz.
    pub session_id: String,
    /// Identifier of the user who created the quiz.
    pub host_id: String,
    /// Quiz title.
    pub title: String,
    /// Join code, present on quizzes the caller hosts.
    #[serde(default)]
    pub code: Option<String>,
    /// Attempt duration in seconds; `0` means the server left it unset.
    #[serde(default)]
    pub duration: u64,
    /// Creation timestamp.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

/// Response of `GET quizzes/dashboard/` and `GET quizzes/enrolled/`.
#[derive(Debug, Deserialize)]
pub struct QuizListResponse {
    /// Quizzes visible to the caller.
    #[serde(default)]
    pub quizzes: Vec<QuizSummary>,
}

/// Response of `POST quizzes/join/`.
#[derive(Debug, Deserialize)]
pub struct JoinQuizResponse {
    /// The quiz that was joined.
    #[serde(flatten)]
    pub quiz: QuizSummary,
    /// Roster snapshot at join time, when the server provides one.
    #[serde(default)]
    pub participants: Vec<LeaderboardEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question_input(correct: &str) -> QuestionInput {
        QuestionInput {
            text: "What is the capital of France?".into(),
            options: [
                "Paris".into(),
                "Lyon".into(),
                "Marseille".into(),
                "Nice".into(),
            ],
            correct_answer: correct.into(),
            explanation: None,
            points: 2,
        }
    }

    #[test]
    fn paper_defaults_missing_fields() {
        let paper: PaperResponse = serde_json::from_str(r#"{"questions":[]}"#).unwrap();
        assert!(paper.questions.is_empty());
        assert_eq!(paper.duration, 0);
    }

    #[test]
    fn question_requires_exactly_four_options() {
        let three = r#"{"text":"q","options":["a","b","c"]}"#;
        assert!(serde_json::from_str::<Question>(three).is_err());

        let four = r#"{"text":"q","options":["a","b","c","d"]}"#;
        let question = serde_json::from_str::<Question>(four).unwrap();
        assert_eq!(question.points, 1);
        assert!(question.correct_answer.is_none());
    }

    #[test]
    fn leaderboard_entry_accepts_legacy_field_names() {
        let legacy: LeaderboardEntry =
            serde_json::from_str(r#"{"_id":"u-1","username":"alice","score":10}"#).unwrap();
        assert_eq!(legacy.user_id, "u-1");
        assert_eq!(legacy.name, "alice");
    }

    #[test]
    fn create_quiz_rejects_foreign_correct_answer() {
        let request = CreateQuizRequest {
            title: "Geography".into(),
            description: None,
            duration: 120,
            questions: vec![question_input("Berlin")],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn create_quiz_accepts_valid_input() {
        let request = CreateQuizRequest {
            title: "Geography".into(),
            description: Some("Capitals".into()),
            duration: 120,
            questions: vec![question_input("Paris")],
        };
        assert!(request.validate().is_ok());
    }
}
