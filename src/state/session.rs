use indexmap::IndexMap;

use crate::dto::quiz::{LeaderboardEntry, Question};

/// Name used when a score update arrives for a participant we have never seen.
pub const FALLBACK_PARTICIPANT_NAME: &str = "Unknown";
/// Attempt duration applied when the server leaves it unset.
pub const DEFAULT_DURATION_SECS: u64 = 60;

/// Lifecycle of a live session as seen by this client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionStatus {
    /// Not attached to any session.
    #[default]
    Idle,
    /// In the lobby, waiting for the host to open the quiz.
    Waiting,
    /// This participant's timed attempt is underway.
    Active,
    /// The host has ended the quiz.
    Ended,
}

/// A participant's progress within the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParticipantStatus {
    /// Still playing (or waiting to).
    #[default]
    Active,
    /// Finished their attempt.
    Completed,
}

/// A user inside the session roster.
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    /// Canonical user identifier; the roster key.
    pub user_id: String,
    /// Display name.
    pub name: String,
    /// Total score.
    pub score: u32,
    /// Whether this participant has finished.
    pub status: ParticipantStatus,
}

impl From<LeaderboardEntry> for Participant {
    fn from(entry: LeaderboardEntry) -> Self {
        let status = match entry.status.as_deref() {
            Some("completed") => ParticipantStatus::Completed,
            _ => ParticipantStatus::Active,
        };
        Self {
            user_id: entry.user_id,
            name: entry.name,
            score: entry.score,
            status,
        }
    }
}

/// Live session slice: lobby roster, question sequence, score, timer flags.
///
/// Invariant: while `status` is [`SessionStatus::Active`], `current_index`
/// stays strictly below `questions.len()`; callers route to the leaderboard
/// instead of installing an out-of-range index.
#[derive(Debug, Default)]
pub struct SessionState {
    session_id: Option<String>,
    is_host: bool,
    /// Whether a session request is in flight.
    pub loading: bool,
    participants: IndexMap<String, Participant>,
    questions: Vec<Question>,
    current_index: usize,
    score: u32,
    server_duration: u64,
    quiz_ready: bool,
    timer_started: bool,
    status: SessionStatus,
}

impl SessionState {
    /// Attach to a session: idle → waiting.
    pub fn init_session(&mut self, session_id: &str, is_host: bool) {
        self.session_id = Some(session_id.to_string());
        self.is_host = is_host;
        self.status = SessionStatus::Waiting;
    }

    /// Return to the pristine idle state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Replace the roster wholesale, e.g. from a leaderboard fetch.
    pub fn set_participants(&mut self, participants: Vec<Participant>) {
        self.participants = participants
            .into_iter()
            .map(|participant| (participant.user_id.clone(), participant))
            .collect();
    }

    /// Add a participant unless their user id is already present.
    /// Returns whether the roster actually grew.
    pub fn add_participant(&mut self, user_id: &str, name: &str) -> bool {
        if self.participants.contains_key(user_id) {
            return false;
        }
        self.participants.insert(
            user_id.to_string(),
            Participant {
                user_id: user_id.to_string(),
                name: name.to_string(),
                score: 0,
                status: ParticipantStatus::Active,
            },
        );
        true
    }

    /// Mark a known participant's progress; unknown ids are ignored.
    pub fn update_participant_status(&mut self, user_id: &str, status: ParticipantStatus) {
        if let Some(participant) = self.participants.get_mut(user_id) {
            participant.status = status;
        }
    }

    /// Record a score update: update a known participant in place, or append
    /// a new one using the provided name (or a fallback) and the given score.
    pub fn upsert_participant_score(
        &mut self,
        user_id: &str,
        name: Option<&str>,
        total_score: u32,
    ) {
        match self.participants.get_mut(user_id) {
            Some(participant) => participant.score = total_score,
            None => {
                self.participants.insert(
                    user_id.to_string(),
                    Participant {
                        user_id: user_id.to_string(),
                        name: name.unwrap_or(FALLBACK_PARTICIPANT_NAME).to_string(),
                        score: total_score,
                        status: ParticipantStatus::Active,
                    },
                );
            }
        }
    }

    /// Install the fetched paper: questions, duration, score, and the index
    /// to resume from. Status becomes [`SessionStatus::Active`].
    pub fn set_quiz_data(
        &mut self,
        questions: Vec<Question>,
        duration: u64,
        current_score: u32,
        current_index: usize,
    ) {
        self.questions = questions;
        self.server_duration = if duration == 0 {
            DEFAULT_DURATION_SECS
        } else {
            duration
        };
        self.score = current_score;
        self.current_index = current_index;
        self.status = SessionStatus::Active;
    }

    /// Add points awarded by a submission.
    pub fn increment_score(&mut self, points: u32) {
        self.score += points;
    }

    /// Advance the local pointer, but never past the last question.
    pub fn next_question(&mut self) {
        let next = self.current_index + 1;
        if next < self.questions.len() {
            self.current_index = next;
        }
    }

    /// Overwrite the session status.
    pub fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
    }

    /// Record that the host has opened the quiz.
    pub fn set_quiz_ready(&mut self, ready: bool) {
        self.quiz_ready = ready;
    }

    /// Record that this participant has begun their own attempt.
    pub fn set_timer_started(&mut self, started: bool) {
        self.timer_started = started;
    }

    /// Record the attempt duration before any paper has been fetched.
    pub fn set_server_duration(&mut self, duration: u64) {
        self.server_duration = if duration == 0 {
            DEFAULT_DURATION_SECS
        } else {
            duration
        };
    }

    /// Session identifier, once attached.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Whether this client created the session.
    pub fn is_host(&self) -> bool {
        self.is_host
    }

    /// Roster in join order.
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    /// Number of participants in the roster.
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Look up one participant by user id.
    pub fn participant(&self, user_id: &str) -> Option<&Participant> {
        self.participants.get(user_id)
    }

    /// The question currently awaiting an answer, if any.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// Index of the current question.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Number of questions in the paper.
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// This participant's running score.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Attempt duration in seconds.
    pub fn server_duration(&self) -> u64 {
        self.server_duration
    }

    /// Whether the host has opened the quiz.
    pub fn quiz_ready(&self) -> bool {
        self.quiz_ready
    }

    /// Whether this participant has begun their own attempt.
    pub fn timer_started(&self) -> bool {
        self.timer_started
    }

    /// Current lifecycle status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str) -> Question {
        Question {
            text: text.into(),
            options: ["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: None,
            explanation: None,
            points: 1,
        }
    }

    #[test]
    fn init_session_moves_idle_to_waiting() {
        let mut state = SessionState::default();
        assert_eq!(state.status(), SessionStatus::Idle);

        state.init_session("s-1", true);
        assert_eq!(state.status(), SessionStatus::Waiting);
        assert_eq!(state.session_id(), Some("s-1"));
        assert!(state.is_host());
    }

    #[test]
    fn roster_never_holds_duplicate_user_ids() {
        let mut state = SessionState::default();
        assert!(state.add_participant("u-1", "Alice"));
        assert!(state.add_participant("u-2", "Bob"));
        assert!(!state.add_participant("u-1", "Alice again"));
        assert!(!state.add_participant("u-1", "Alice"));

        assert_eq!(state.participant_count(), 2);
        assert_eq!(state.participant("u-1").map(|p| p.name.as_str()), Some("Alice"));
    }

    #[test]
    fn score_upsert_updates_in_place_or_appends() {
        let mut state = SessionState::default();
        state.add_participant("u-1", "Alice");

        state.upsert_participant_score("u-1", None, 30);
        assert_eq!(state.participant_count(), 1);
        assert_eq!(state.participant("u-1").map(|p| p.score), Some(30));

        state.upsert_participant_score("u-9", Some("Zoe"), 10);
        assert_eq!(state.participant_count(), 2);
        assert_eq!(state.participant("u-9").map(|p| p.name.as_str()), Some("Zoe"));

        state.upsert_participant_score("u-7", None, 5);
        assert_eq!(
            state.participant("u-7").map(|p| p.name.as_str()),
            Some(FALLBACK_PARTICIPANT_NAME)
        );
    }

    #[test]
    fn status_update_ignores_unknown_participants() {
        let mut state = SessionState::default();
        state.add_participant("u-1", "Alice");

        state.update_participant_status("u-1", ParticipantStatus::Completed);
        state.update_participant_status("ghost", ParticipantStatus::Completed);

        assert_eq!(
            state.participant("u-1").map(|p| p.status),
            Some(ParticipantStatus::Completed)
        );
        assert_eq!(state.participant_count(), 1);
    }

    #[test]
    fn set_quiz_data_activates_and_defaults_duration() {
        let mut state = SessionState::default();
        state.set_quiz_data(vec![question("q1"), question("q2")], 0, 7, 1);

        assert_eq!(state.status(), SessionStatus::Active);
        assert_eq!(state.server_duration(), DEFAULT_DURATION_SECS);
        assert_eq!(state.score(), 7);
        assert_eq!(state.current_question().map(|q| q.text.as_str()), Some("q2"));
    }

    #[test]
    fn next_question_stops_at_the_last_one() {
        let mut state = SessionState::default();
        state.set_quiz_data(vec![question("q1"), question("q2")], 60, 0, 0);

        state.next_question();
        assert_eq!(state.current_index(), 1);

        state.next_question();
        assert_eq!(state.current_index(), 1);
        assert!(state.current_question().is_some());
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut state = SessionState::default();
        state.init_session("s-1", false);
        state.add_participant("u-1", "Alice");
        state.set_quiz_ready(true);

        state.reset();
        assert_eq!(state.status(), SessionStatus::Idle);
        assert_eq!(state.participant_count(), 0);
        assert!(!state.quiz_ready());
    }
}
