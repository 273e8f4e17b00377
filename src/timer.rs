//! Countdown timer driving a participant's timed attempt.
//!
//! The timer only starts on an explicit call, ticks once per second, and
//! fires its expiry callback exactly once when the remaining time reaches
//! zero. Whatever callback is registered last is the one that fires, even if
//! it was registered after the countdown began.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicU64, Ordering},
};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::warn;

/// Callback invoked when the countdown reaches zero.
pub type ExpiryCallback = Box<dyn FnMut() + Send + 'static>;

/// State shared between the timer handle and its ticker task.
#[derive(Default)]
struct TimerShared {
    remaining: AtomicU64,
    running: AtomicBool,
    on_expire: Mutex<Option<ExpiryCallback>>,
}

/// Interval-based countdown with start/stop/reset semantics.
pub struct CountdownTimer {
    initial: u64,
    shared: Arc<TimerShared>,
    ticker: Option<JoinHandle<()>>,
}

impl CountdownTimer {
    /// Create a timer configured for `initial` seconds, not yet running.
    pub fn new(initial: u64) -> Self {
        let shared = Arc::new(TimerShared::default());
        shared.remaining.store(initial, Ordering::Release);
        Self {
            initial,
            shared,
            ticker: None,
        }
    }

    /// Replace the configured duration used by [`start`](Self::start) and
    /// [`reset`](Self::reset). Does not touch a countdown in progress.
    pub fn configure(&mut self, duration: u64) {
        self.initial = duration;
        if !self.is_running() {
            self.shared.remaining.store(duration, Ordering::Release);
        }
    }

    /// Register the expiry callback. The latest registration wins; the ticker
    /// reads the slot at fire time, so re-registering before expiry is honored.
    pub fn on_expire<F>(&self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        if let Ok(mut slot) = self.shared.on_expire.lock() {
            *slot = Some(Box::new(callback));
        }
    }

    /// Begin counting down from `duration_override`, or from the configured
    /// duration when `None`. A zero duration is ignored with a warning.
    /// Starting while already running re-arms cleanly: the previous ticker is
    /// cancelled first, so there is never more than one.
    pub fn start(&mut self, duration_override: Option<u64>) {
        let duration = duration_override.unwrap_or(self.initial);
        if duration == 0 {
            warn!("countdown start ignored: duration is zero");
            return;
        }

        self.abort_ticker();
        self.shared.remaining.store(duration, Ordering::Release);
        self.shared.running.store(true, Ordering::Release);

        let shared = Arc::clone(&self.shared);
        self.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // The first tick of a tokio interval completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                let next = shared
                    .remaining
                    .load(Ordering::Acquire)
                    .saturating_sub(1);
                shared.remaining.store(next, Ordering::Release);
                if next == 0 {
                    shared.running.store(false, Ordering::Release);
                    if let Ok(mut slot) = shared.on_expire.lock()
                        && let Some(callback) = slot.as_mut()
                    {
                        callback();
                    }
                    break;
                }
            }
        }));
    }

    /// Halt ticking without resetting the remaining value.
    pub fn stop(&mut self) {
        self.abort_ticker();
        self.shared.running.store(false, Ordering::Release);
    }

    /// Stop and restore the configured initial duration.
    pub fn reset(&mut self) {
        self.stop();
        self.shared.remaining.store(self.initial, Ordering::Release);
    }

    /// Seconds left on the countdown.
    pub fn remaining(&self) -> u64 {
        self.shared.remaining.load(Ordering::Acquire)
    }

    /// Whether the countdown is currently ticking.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Remaining time rendered as `M:SS`.
    pub fn format_remaining(&self) -> String {
        format_seconds(self.remaining())
    }

    fn abort_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.abort_ticker();
    }
}

/// Render a second count as `M:SS`: seconds zero-padded, minutes not.
pub fn format_seconds(total: u64) -> String {
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    fn counting_timer(initial: u64) -> (CountdownTimer, Arc<AtomicUsize>) {
        let timer = CountdownTimer::new(initial);
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        timer.on_expire(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (timer, fired)
    }

    async fn advance(millis: u64) {
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn expires_after_configured_ticks() {
        let (mut timer, fired) = counting_timer(0);
        timer.start(Some(10));
        advance(10_500).await;

        assert_eq!(timer.remaining(), 0);
        assert!(!timer.is_running());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_second() {
        let (mut timer, _fired) = counting_timer(5);
        timer.start(None);
        advance(2_100).await;

        assert_eq!(timer.remaining(), 3);
        assert!(timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_fires_exactly_once() {
        let (mut timer, fired) = counting_timer(2);
        timer.start(None);
        advance(10_000).await;

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(timer.remaining(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_preserves_remaining() {
        let (mut timer, fired) = counting_timer(5);
        timer.start(None);
        advance(2_100).await;
        timer.stop();
        advance(5_000).await;

        assert_eq!(timer.remaining(), 3);
        assert!(!timer.is_running());
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_restores_initial_duration() {
        let (mut timer, _fired) = counting_timer(30);
        timer.start(None);
        advance(5_100).await;
        timer.reset();

        assert_eq!(timer.remaining(), 30);
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_rearms_without_duplicate_tickers() {
        let (mut timer, fired) = counting_timer(10);
        timer.start(None);
        advance(3_100).await;
        timer.start(Some(10));
        advance(5_100).await;

        // A duplicate ticker would decrement twice per second.
        assert_eq!(timer.remaining(), 5);
        assert!(timer.is_running());
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_start_is_ignored() {
        let (mut timer, fired) = counting_timer(0);
        timer.start(None);
        assert!(!timer.is_running());

        timer.start(Some(0));
        advance(3_000).await;
        assert!(!timer.is_running());
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn late_callback_registration_is_honored() {
        let mut timer = CountdownTimer::new(2);
        timer.start(None);

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        timer.on_expire(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        advance(2_500).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_seconds(125), "2:05");
        assert_eq!(format_seconds(9), "0:09");
        assert_eq!(format_seconds(0), "0:00");
        assert_eq!(format_seconds(600), "10:00");
    }
}
