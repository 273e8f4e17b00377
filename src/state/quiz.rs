use crate::dto::quiz::QuizSummary;

/// Created and enrolled quiz lists shown on the dashboard.
#[derive(Debug, Default)]
pub struct QuizListState {
    /// Quizzes this user hosts.
    pub created: Vec<QuizSummary>,
    /// Quizzes this user has joined.
    pub enrolled: Vec<QuizSummary>,
    /// Whether a list request is in flight.
    pub loading: bool,
    /// Last list-loading error, for the dashboard's error banner.
    pub error: Option<String>,
}

impl QuizListState {
    /// Replace the created list wholesale.
    pub fn set_created(&mut self, quizzes: Vec<QuizSummary>) {
        self.created = quizzes;
    }

    /// Append a single freshly created quiz.
    pub fn add_created(&mut self, quiz: QuizSummary) {
        self.created.push(quiz);
    }

    /// Replace the enrolled list wholesale.
    pub fn set_enrolled(&mut self, quizzes: Vec<QuizSummary>) {
        self.enrolled = quizzes;
    }

    /// Append a single freshly joined quiz.
    pub fn add_enrolled(&mut self, quiz: QuizSummary) {
        self.enrolled.push(quiz);
    }

    /// Toggle the in-flight flag.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Record or clear the list-loading error.
    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Look up a session across both lists, created quizzes first.
    pub fn find_session(&self, session_id: &str) -> Option<&QuizSummary> {
        self.created
            .iter()
            .chain(self.enrolled.iter())
            .find(|quiz| quiz.session_id == session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(session_id: &str, host_id: &str) -> QuizSummary {
        QuizSummary {
            quiz_id: format!("q-{session_id}"),
            session_id: session_id.into(),
            host_id: host_id.into(),
            title: "Quiz".into(),
            code: None,
            duration: 60,
            created_at: None,
        }
    }

    #[test]
    fn find_session_searches_both_lists() {
        let mut state = QuizListState::default();
        state.set_created(vec![summary("s-1", "me")]);
        state.add_enrolled(summary("s-2", "them"));

        assert_eq!(state.find_session("s-1").map(|q| q.host_id.as_str()), Some("me"));
        assert_eq!(state.find_session("s-2").map(|q| q.host_id.as_str()), Some("them"));
        assert!(state.find_session("s-3").is_none());
    }
}
