//! Push-event to state-transition mapping.
//!
//! Handlers here take the current session state as a parameter and return the
//! side effects the front-end should carry out, so no handler ever closes
//! over a stale snapshot.

use crate::{
    dto::push::PushEvent,
    state::session::{ParticipantStatus, SessionState, SessionStatus},
};

/// Views the front-end can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Landing page after sign-in.
    Home,
    /// Sign-in form.
    Login,
    /// Pre-game waiting room.
    Lobby,
    /// Question-answering view.
    Quiz,
    /// Live leaderboard.
    Leaderboard,
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Neutral information.
    Info,
    /// Something went right.
    Success,
    /// Something needs attention but nothing is broken.
    Warning,
    /// An action failed.
    Error,
}

/// User-facing notification emitted by transitions and services.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// How prominently the front-end should render this.
    pub level: NoticeLevel,
    /// Text shown to the user.
    pub message: String,
}

impl Notice {
    /// Build an informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Build a success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Build a warning notice.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    /// Build an error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Side effect requested by a transition or a service.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Switch the front-end to another view.
    Navigate(Route),
    /// Show a notification to the user.
    Notify(Notice),
}

/// Apply one push event to the session state, returning the effects the
/// front-end should carry out.
pub fn apply_push_event(state: &mut SessionState, event: PushEvent) -> Vec<Effect> {
    match event {
        PushEvent::ParticipantJoined { user_id, name } => {
            let added = state.add_participant(&user_id, &name);
            // Joins are only worth announcing while still in the lobby.
            if added && state.status() != SessionStatus::Active {
                vec![Effect::Notify(Notice::info(format!("{name} joined!")))]
            } else {
                Vec::new()
            }
        }
        PushEvent::QuizStarted => {
            state.set_quiz_ready(true);
            if state.is_host() {
                // Hosts do not answer questions; they watch the board.
                vec![Effect::Navigate(Route::Leaderboard)]
            } else {
                vec![Effect::Notify(Notice::success(
                    "The quiz is now live! Begin when you're ready.",
                ))]
            }
        }
        PushEvent::QuizEnded => {
            state.set_status(SessionStatus::Ended);
            vec![
                Effect::Notify(Notice::warning("The host has ended the quiz.")),
                Effect::Navigate(Route::Leaderboard),
            ]
        }
        PushEvent::LeaderboardUpdate {
            user_id,
            name,
            total_score,
        } => {
            state.upsert_participant_score(&user_id, name.as_deref(), total_score);
            Vec::new()
        }
        PushEvent::ParticipantCompleted { user_id } => {
            state.update_participant_status(&user_id, ParticipantStatus::Completed);
            Vec::new()
        }
        PushEvent::Unknown => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(user_id: &str, name: &str) -> PushEvent {
        PushEvent::ParticipantJoined {
            user_id: user_id.into(),
            name: name.into(),
        }
    }

    #[test]
    fn repeated_joins_never_duplicate_the_roster() {
        let mut state = SessionState::default();
        state.init_session("s-1", false);

        apply_push_event(&mut state, joined("u-1", "Alice"));
        apply_push_event(&mut state, joined("u-2", "Bob"));
        apply_push_event(&mut state, joined("u-1", "Alice"));
        apply_push_event(&mut state, joined("u-2", "Bob"));
        apply_push_event(&mut state, joined("u-1", "Alice"));

        assert_eq!(state.participant_count(), 2);
    }

    #[test]
    fn join_notice_only_while_in_the_lobby() {
        let mut state = SessionState::default();
        state.init_session("s-1", false);

        let lobby_effects = apply_push_event(&mut state, joined("u-1", "Alice"));
        assert!(matches!(lobby_effects.as_slice(), [Effect::Notify(_)]));

        state.set_status(SessionStatus::Active);
        let in_game_effects = apply_push_event(&mut state, joined("u-2", "Bob"));
        assert!(in_game_effects.is_empty());
        assert_eq!(state.participant_count(), 2);
    }

    #[test]
    fn quiz_started_routes_host_to_the_leaderboard() {
        let mut state = SessionState::default();
        state.init_session("s-1", true);

        let effects = apply_push_event(&mut state, PushEvent::QuizStarted);
        assert!(state.quiz_ready());
        assert_eq!(effects, vec![Effect::Navigate(Route::Leaderboard)]);
    }

    #[test]
    fn quiz_started_leaves_participant_waiting() {
        let mut state = SessionState::default();
        state.init_session("s-1", false);

        let effects = apply_push_event(&mut state, PushEvent::QuizStarted);
        assert!(state.quiz_ready());
        assert_eq!(state.status(), SessionStatus::Waiting);
        assert!(matches!(effects.as_slice(), [Effect::Notify(notice)]
            if notice.level == NoticeLevel::Success));
    }

    #[test]
    fn quiz_ended_is_terminal_for_everyone() {
        let mut state = SessionState::default();
        state.init_session("s-1", false);

        let effects = apply_push_event(&mut state, PushEvent::QuizEnded);
        assert_eq!(state.status(), SessionStatus::Ended);
        assert!(effects.contains(&Effect::Navigate(Route::Leaderboard)));
    }

    #[test]
    fn leaderboard_update_upserts_without_growing_for_known_ids() {
        let mut state = SessionState::default();
        state.init_session("s-1", false);
        apply_push_event(&mut state, joined("u-1", "Alice"));

        apply_push_event(
            &mut state,
            PushEvent::LeaderboardUpdate {
                user_id: "u-1".into(),
                name: None,
                total_score: 25,
            },
        );
        assert_eq!(state.participant_count(), 1);
        assert_eq!(state.participant("u-1").map(|p| p.score), Some(25));

        apply_push_event(
            &mut state,
            PushEvent::LeaderboardUpdate {
                user_id: "u-5".into(),
                name: Some("Eve".into()),
                total_score: 40,
            },
        );
        assert_eq!(state.participant_count(), 2);
        assert_eq!(state.participant("u-5").map(|p| p.name.as_str()), Some("Eve"));
    }

    #[test]
    fn participant_completed_marks_progress() {
        let mut state = SessionState::default();
        state.init_session("s-1", false);
        apply_push_event(&mut state, joined("u-1", "Alice"));

        apply_push_event(
            &mut state,
            PushEvent::ParticipantCompleted {
                user_id: "u-1".into(),
            },
        );
        assert_eq!(
            state.participant("u-1").map(|p| p.status),
            Some(ParticipantStatus::Completed)
        );
    }

    #[test]
    fn unknown_events_are_inert() {
        let mut state = SessionState::default();
        state.init_session("s-1", false);

        let effects = apply_push_event(&mut state, PushEvent::Unknown);
        assert!(effects.is_empty());
        assert_eq!(state.status(), SessionStatus::Waiting);
    }
}
