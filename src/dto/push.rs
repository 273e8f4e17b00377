use serde::Deserialize;

/// Messages pushed by the server over the per-session channel.
///
/// Every frame is a JSON object discriminated by its `type` field. Types this
/// client does not recognize land on [`PushEvent::Unknown`] and are dropped by
/// the dispatcher instead of killing the connection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum PushEvent {
    /// A user entered the session lobby.
    #[serde(rename = "participant_joined")]
    ParticipantJoined {
        /// Identifier of the joining user.
        user_id: String,
        /// Display name of the joining user.
        name: String,
    },
    /// The host opened the quiz for play.
    #[serde(rename = "quiz_started")]
    QuizStarted,
    /// The host ended the quiz for everyone.
    #[serde(rename = "quiz_ended")]
    QuizEnded,
    /// A participant's total score changed.
    #[serde(rename = "leaderboard_update")]
    LeaderboardUpdate {
        /// Identifier of the participant whose score changed.
        user_id: String,
        /// Display name, present when the participant may be new to us.
        #[serde(default)]
        name: Option<String>,
        /// New total score for that participant.
        #[serde(default)]
        total_score: u32,
    },
    /// A participant finished their attempt.
    #[serde(rename = "participant_completed")]
    ParticipantCompleted {
        /// Identifier of the participant who finished.
        user_id: String,
    },
    /// Any event type this client does not understand.
    #[serde(other)]
    Unknown,
}
