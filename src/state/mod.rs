//! Client-side state container.
//!
//! All mutable state lives in one [`Store`] split into domain slices, passed
//! explicitly to services rather than living in an ambient singleton. Slices
//! are mutated through their reducer methods only; push-driven mutations go
//! through [`transitions::apply_push_event`], which takes the state snapshot
//! as a parameter instead of closing over it.

/// Authentication slice.
pub mod auth;
/// Created/enrolled quiz lists.
pub mod quiz;
/// Live session slice: roster, questions, score, timer flags.
pub mod session;
/// Push-event to state-transition mapping and front-end effects.
pub mod transitions;

use std::sync::Arc;

use tokio::sync::RwLock;

use self::{auth::AuthState, quiz::QuizListState, session::SessionState};

/// Cheap-to-clone shared handle to the store.
pub type SharedStore = Arc<Store>;

/// Central mutable state shared by services and the front-end.
#[derive(Default)]
pub struct Store {
    auth: RwLock<AuthState>,
    quizzes: RwLock<QuizListState>,
    session: RwLock<SessionState>,
}

impl Store {
    /// Construct an empty store wrapped in an [`Arc`].
    pub fn new() -> SharedStore {
        Arc::new(Self::default())
    }

    /// Authentication slice.
    pub fn auth(&self) -> &RwLock<AuthState> {
        &self.auth
    }

    /// Quiz lists slice.
    pub fn quizzes(&self) -> &RwLock<QuizListState> {
        &self.quizzes
    }

    /// Live session slice.
    pub fn session(&self) -> &RwLock<SessionState> {
        &self.session
    }
}
