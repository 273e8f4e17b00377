//! quizroom terminal client: sign in, join a session, play it live.
//!
//! The engine does the real work; this binary renders its effects as text and
//! translates stdin commands into engine calls. Credentials and the session
//! come from the environment:
//! `QUIZROOM_USERNAME`, `QUIZROOM_PASSWORD`, and either
//! `QUIZROOM_SESSION_ID` (rejoin) or `QUIZROOM_JOIN_CODE` (first join).

use std::{env, sync::Arc};

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quizroom_client::{
    api::{AuthApi, HttpApi, QuizApi},
    config::ClientConfig,
    dto::auth::Credentials,
    services::{auth_service, quiz_service, session_service::SessionEngine},
    state::{
        SharedStore, Store,
        session::Participant,
        transitions::{Effect, NoticeLevel, Route},
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ClientConfig::load();
    let http = HttpApi::new(config.clone()).context("building http client")?;
    let auth_api: Arc<dyn AuthApi> = Arc::new(http.clone());
    let quiz_api: Arc<dyn QuizApi> = Arc::new(http);
    let store = Store::new();
    let (fx, effects) = mpsc::unbounded_channel::<Effect>();

    // Sign in with environment-provided credentials.
    let credentials = Credentials {
        username: env::var("QUIZROOM_USERNAME").context("QUIZROOM_USERNAME is not set")?,
        password: env::var("QUIZROOM_PASSWORD").context("QUIZROOM_PASSWORD is not set")?,
    };
    auth_service::login(&store, &auth_api, &fx, credentials).await;
    if !store.auth().read().await.is_authenticated {
        anyhow::bail!("login failed; check QUIZROOM_USERNAME / QUIZROOM_PASSWORD");
    }

    // The quiz lists drive host detection for the session we are entering.
    quiz_service::load_dashboard(&store, &quiz_api, &fx).await;
    quiz_service::load_enrolled(&store, &quiz_api, &fx).await;

    let engine = SessionEngine::new(store.clone(), quiz_api.clone(), config, fx.clone());

    let (session_id, roster) = resolve_session(&store, &quiz_api, &fx).await?;
    engine.init(&session_id).await.context("entering session")?;
    if !roster.is_empty() {
        engine.set_initial_participants(roster).await;
    }

    render_lobby(&store).await;
    println!("commands: start | begin | 1-4 | board | time | quit");

    let renderer = tokio::spawn(render_effects(effects, store.clone(), engine.clone()));
    run_command_loop(&store, &engine).await;

    engine.teardown().await;
    renderer.abort();
    info!("goodbye");
    Ok(())
}

/// Pick the session to enter: an explicit id, or join by room code.
async fn resolve_session(
    store: &SharedStore,
    api: &Arc<dyn QuizApi>,
    fx: &quizroom_client::services::EffectSink,
) -> anyhow::Result<(String, Vec<Participant>)> {
    if let Ok(session_id) = env::var("QUIZROOM_SESSION_ID") {
        return Ok((session_id, Vec::new()));
    }

    let code = env::var("QUIZROOM_JOIN_CODE")
        .context("set QUIZROOM_SESSION_ID or QUIZROOM_JOIN_CODE")?;
    let response = quiz_service::join_quiz(store, api, fx, &code)
        .await
        .context("joining quiz")?;
    let roster = response
        .participants
        .into_iter()
        .map(Participant::from)
        .collect();
    Ok((response.quiz.session_id, roster))
}

/// Translate stdin lines into engine calls until `quit` or Ctrl-C/SIGTERM.
async fn run_command_loop(store: &SharedStore, engine: &Arc<SessionEngine>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                match line.trim() {
                    "" => {}
                    "quit" | "q" => break,
                    "start" => engine.start_quiz().await,
                    "begin" => {
                        let (ready, started) = {
                            let session = store.session().read().await;
                            (session.quiz_ready(), session.timer_started())
                        };
                        if !ready {
                            println!("the host hasn't started the quiz yet");
                        } else if started {
                            println!("attempt already underway");
                        } else {
                            engine.begin_quiz().await;
                            engine.load_game().await;
                        }
                    }
                    "board" | "leaderboard" => {
                        engine.fetch_leaderboard().await;
                        render_leaderboard(store).await;
                    }
                    "time" => println!("time left: {}", engine.time_left().await),
                    choice @ ("1" | "2" | "3" | "4") => {
                        answer(store, engine, choice).await;
                    }
                    other => println!("unknown command `{other}`"),
                }
            }
        }
    }
}

/// Submit the numbered option, then ask the server what comes next.
async fn answer(store: &SharedStore, engine: &Arc<SessionEngine>, choice: &str) {
    let selected = {
        let session = store.session().read().await;
        let Some(question) = session.current_question() else {
            println!("no question to answer; `begin` first");
            return;
        };
        // `choice` is one of "1".."4" here.
        let index = choice.parse::<usize>().unwrap_or(1) - 1;
        question.options[index].clone()
    };

    engine.submit_answer(&selected).await;
    // The server decides what the next unanswered question is.
    engine.load_game().await;
}

/// Render engine effects as they arrive.
async fn render_effects(
    mut effects: mpsc::UnboundedReceiver<Effect>,
    store: SharedStore,
    engine: Arc<SessionEngine>,
) {
    while let Some(effect) = effects.recv().await {
        match effect {
            Effect::Notify(notice) => {
                let prefix = match notice.level {
                    NoticeLevel::Info => "·",
                    NoticeLevel::Success => "✔",
                    NoticeLevel::Warning => "⚠",
                    NoticeLevel::Error => "✘",
                };
                println!("{prefix} {}", notice.message);
            }
            Effect::Navigate(Route::Quiz) => render_question(&store, &engine).await,
            Effect::Navigate(Route::Leaderboard) => {
                engine.fetch_leaderboard().await;
                render_leaderboard(&store).await;
            }
            Effect::Navigate(Route::Lobby) => render_lobby(&store).await,
            Effect::Navigate(Route::Home | Route::Login) => {}
        }
    }
}

/// Print the lobby roster.
async fn render_lobby(store: &SharedStore) {
    let session = store.session().read().await;
    println!("── lobby ({} joined) ──", session.participant_count());
    for participant in session.participants() {
        println!("  {}", participant.name);
    }
}

/// Print the current question and its numbered options.
async fn render_question(store: &SharedStore, engine: &Arc<SessionEngine>) {
    let session = store.session().read().await;
    let Some(question) = session.current_question() else {
        return;
    };
    println!(
        "── question {}/{} · {} · score {} ──",
        session.current_index() + 1,
        session.total_questions(),
        engine.time_left().await,
        session.score(),
    );
    println!("{}", question.text);
    for (number, option) in question.options.iter().enumerate() {
        println!("  {}. {option}", number + 1);
    }
}

/// Print the leaderboard, highest score first.
async fn render_leaderboard(store: &SharedStore) {
    let session = store.session().read().await;
    let mut rows: Vec<_> = session.participants().collect();
    rows.sort_by(|a, b| b.score.cmp(&a.score));

    println!("── leaderboard ──");
    for (rank, participant) in rows.iter().enumerate() {
        println!(
            "  {:>2}. {:<20} {:>5}",
            rank + 1,
            participant.name,
            participant.score
        );
    }
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = match signal(SignalKind::terminate()) {
            Ok(term) => term,
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
