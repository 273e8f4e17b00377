//! The live-session engine.
//!
//! One [`SessionEngine`] instance drives one browser-tab's worth of
//! participation: it owns the push connection (exactly one per active
//! session), the countdown timer, and every gameplay REST action. Push events
//! and timer expiry both funnel into the same store, so all mutations happen
//! through the slice reducers regardless of which side triggered them.
//!
//! The server stays the authority on attempt progress: after a submission the
//! caller re-invokes [`SessionEngine::load_game`] to fetch the next index
//! instead of advancing a local pointer, which tolerates repeated or
//! out-of-order submissions.

use std::sync::{Arc, Weak};

use tokio::sync::{Mutex, mpsc};
use tracing::{info, warn};

use crate::{
    api::QuizApi,
    config::ClientConfig,
    dto::{push::PushEvent, quiz::SubmitAnswerRequest},
    error::ClientError,
    push::{PushClient, PushHandle},
    services::{EffectSink, failure_message, navigate, notify},
    state::{
        SharedStore,
        session::{DEFAULT_DURATION_SECS, Participant, SessionStatus},
        transitions::{self, Notice, Route},
    },
    timer::CountdownTimer,
};

/// Drives one live session: REST actions, push events, and the countdown.
pub struct SessionEngine {
    store: SharedStore,
    api: Arc<dyn QuizApi>,
    config: ClientConfig,
    fx: EffectSink,
    timer: Mutex<CountdownTimer>,
    push: Mutex<Option<PushHandle>>,
}

impl SessionEngine {
    /// Build the engine and wire the timer-expiry listener.
    pub fn new(
        store: SharedStore,
        api: Arc<dyn QuizApi>,
        config: ClientConfig,
        fx: EffectSink,
    ) -> Arc<Self> {
        let (expiry_tx, mut expiry_rx) = mpsc::unbounded_channel::<()>();
        let timer = CountdownTimer::new(DEFAULT_DURATION_SECS);
        timer.on_expire(move || {
            let _ = expiry_tx.send(());
        });

        let engine = Arc::new(Self {
            store,
            api,
            config,
            fx,
            timer: Mutex::new(timer),
            push: Mutex::new(None),
        });

        let weak = Arc::downgrade(&engine);
        tokio::spawn(async move {
            while expiry_rx.recv().await.is_some() {
                let Some(engine) = weak.upgrade() else { break };
                engine.handle_timer_expired().await;
            }
        });

        engine
    }

    /// Attach to a session: resolve the host role from the quiz lists,
    /// reset the slice to a fresh waiting state, and open the push channel.
    pub async fn init(self: &Arc<Self>, session_id: &str) -> Result<(), ClientError> {
        let (is_host, duration) = resolve_role(&self.store, session_id).await;

        {
            let mut session = self.store.session().write().await;
            session.reset();
            session.init_session(session_id, is_host);
            session.set_server_duration(duration);
        }
        let effective = self.store.session().read().await.server_duration();
        self.timer.lock().await.configure(effective);

        self.connect_push(session_id).await?;
        info!(session_id, is_host, "session initialised");
        Ok(())
    }

    /// Seed the lobby roster, e.g. from the join response.
    pub async fn set_initial_participants(&self, participants: Vec<Participant>) {
        self.store.session().write().await.set_participants(participants);
    }

    /// Non-host: begin the timed attempt. Starts the countdown with the
    /// session's configured duration and enters the question view.
    pub async fn begin_quiz(&self) {
        let duration = {
            let mut session = self.store.session().write().await;
            if session.is_host() {
                warn!("begin_quiz ignored: the host does not answer questions");
                return;
            }
            session.set_timer_started(true);
            session.set_status(SessionStatus::Active);
            session.server_duration()
        };
        self.timer.lock().await.start(Some(duration));
        navigate(&self.fx, Route::Quiz);
    }

    /// Host: open the quiz for everyone. Navigation happens when the
    /// resulting `quiz_started` push event arrives.
    pub async fn start_quiz(&self) {
        let Some(session_id) = self.session_id().await else {
            return;
        };
        self.set_loading(true).await;
        if let Err(err) = self.api.start(&session_id).await {
            warn!(error = %err, session_id, "failed to start quiz");
            notify(&self.fx, Notice::error(failure_message("Failed to start quiz", &err)));
        }
        self.set_loading(false).await;
    }

    /// Fetch attempt status and the paper, then resume at the next unanswered
    /// question, or route to the leaderboard when the attempt is complete.
    ///
    /// The next index is one past the highest attempted index (or zero when
    /// nothing has been attempted yet).
    pub async fn load_game(&self) {
        let Some(session_id) = self.session_id().await else {
            return;
        };
        self.set_loading(true).await;

        let fetched = async {
            let status = self.api.status(&session_id).await?;
            let paper = self.api.paper(&session_id).await?;
            Ok::<_, crate::error::ApiError>((status, paper))
        }
        .await;

        match fetched {
            Ok((status, paper)) => {
                let next_index = status
                    .attempted_indices
                    .iter()
                    .max()
                    .map(|highest| highest + 1)
                    .unwrap_or(0);

                if next_index >= paper.questions.len() {
                    // Every question is already attempted; show the board.
                    navigate(&self.fx, Route::Leaderboard);
                } else {
                    let mut session = self.store.session().write().await;
                    session.set_quiz_data(
                        paper.questions,
                        paper.duration,
                        status.current_score,
                        next_index,
                    );
                }
            }
            Err(err) => {
                warn!(error = %err, session_id, "failed to load quiz data");
                notify(&self.fx, Notice::error("Failed to load quiz."));
            }
        }

        self.set_loading(false).await;
    }

    /// Submit the selected option for the current question.
    ///
    /// A no-op when no question is loaded. Submission failures are logged and
    /// swallowed: a lost submission must not block progression.
    pub async fn submit_answer(&self, selected_option: &str) {
        let request = {
            let session = self.store.session().read().await;
            let Some(session_id) = session.session_id() else {
                return;
            };
            if session.current_question().is_none() {
                return;
            }
            SubmitAnswerRequest {
                session_id: session_id.to_string(),
                question_index: session.current_index(),
                selected_option: selected_option.to_string(),
            }
        };

        match self.api.submit(request).await {
            Ok(response) if response.points > 0 => {
                self.store.session().write().await.increment_score(response.points);
                notify(
                    &self.fx,
                    Notice::success(format!("Correct! +{}", response.points)),
                );
            }
            Ok(_) => {}
            Err(err) => {
                warn!(error = %err, "answer submission failed");
            }
        }
    }

    /// Host: end the quiz for everyone.
    pub async fn end_quiz(&self) {
        let Some(session_id) = self.session_id().await else {
            return;
        };
        if let Err(err) = self.api.end(&session_id).await {
            warn!(error = %err, session_id, "failed to end quiz");
            notify(&self.fx, Notice::error(failure_message("Failed to end quiz", &err)));
        }
    }

    /// Mark this participant's attempt finished.
    pub async fn complete_quiz(&self) {
        let Some(session_id) = self.session_id().await else {
            return;
        };
        match self.api.complete(&session_id).await {
            Ok(()) => notify(&self.fx, Notice::success("Quiz completed!")),
            Err(err) => warn!(error = %err, session_id, "failed to complete quiz"),
        }
    }

    /// Replace the roster from the leaderboard endpoint.
    pub async fn fetch_leaderboard(&self) {
        let Some(session_id) = self.session_id().await else {
            return;
        };
        self.set_loading(true).await;

        match self.api.leaderboard(&session_id).await {
            Ok(entries) => {
                let participants = entries.into_iter().map(Participant::from).collect();
                self.store.session().write().await.set_participants(participants);
            }
            Err(err) => {
                warn!(error = %err, session_id, "failed to load leaderboard");
                notify(&self.fx, Notice::error("Failed to load leaderboard"));
            }
        }

        self.set_loading(false).await;
    }

    /// Remaining attempt time rendered as `M:SS`.
    pub async fn time_left(&self) -> String {
        self.timer.lock().await.format_remaining()
    }

    /// Whether the countdown is currently ticking.
    pub async fn timer_running(&self) -> bool {
        self.timer.lock().await.is_running()
    }

    /// Tear down the push connection and halt the countdown.
    pub async fn teardown(&self) {
        if let Some(handle) = self.push.lock().await.take() {
            handle.close().await;
        }
        self.timer.lock().await.stop();
    }

    /// Open the push connection for `session_id`, closing any previous one
    /// first so there is never more than one live connection.
    async fn connect_push(self: &Arc<Self>, session_id: &str) -> Result<(), ClientError> {
        let mut slot = self.push.lock().await;
        if let Some(previous) = slot.take() {
            info!(previous = %previous.session_id(), "closing previous push connection");
            previous.close().await;
        }

        let (handle, events) = PushClient::connect(&self.config, session_id).await?;
        *slot = Some(handle);
        drop(slot);

        let engine = Arc::downgrade(self);
        tokio::spawn(pump_push_events(engine, events));
        Ok(())
    }

    /// Time ran out: auto-complete the attempt and show the board,
    /// regardless of how many questions remain.
    async fn handle_timer_expired(&self) {
        notify(
            &self.fx,
            Notice::warning("Time's up! Your quiz has been submitted."),
        );
        if let Some(session_id) = self.session_id().await
            && let Err(err) = self.api.complete(&session_id).await
        {
            warn!(error = %err, session_id, "failed to complete quiz on timeout");
        }
        navigate(&self.fx, Route::Leaderboard);
    }

    async fn session_id(&self) -> Option<String> {
        let id = self
            .store
            .session()
            .read()
            .await
            .session_id()
            .map(str::to_string);
        if id.is_none() {
            warn!("no active session");
        }
        id
    }

    async fn set_loading(&self, loading: bool) {
        self.store.session().write().await.set_loading(loading);
    }
}

/// Resolve whether the signed-in user hosts `session_id`, plus the configured
/// attempt duration from the quiz lists (zero when unknown).
pub(crate) async fn resolve_role(store: &SharedStore, session_id: &str) -> (bool, u64) {
    let auth = store.auth().read().await;
    let quizzes = store.quizzes().read().await;
    let quiz = quizzes.find_session(session_id);
    let is_host = matches!(
        (auth.user_id(), quiz),
        (Some(user_id), Some(quiz)) if quiz.host_id == user_id
    );
    (is_host, quiz.map(|quiz| quiz.duration).unwrap_or(0))
}

/// Apply push events to the store until the channel closes.
async fn pump_push_events(engine: Weak<SessionEngine>, mut events: mpsc::Receiver<PushEvent>) {
    while let Some(event) = events.recv().await {
        let Some(engine) = engine.upgrade() else {
            return;
        };
        let effects = {
            let mut session = engine.store.session().write().await;
            transitions::apply_push_event(&mut session, event)
        };
        for effect in effects {
            let _ = engine.fx.send(effect);
        }
    }
}
