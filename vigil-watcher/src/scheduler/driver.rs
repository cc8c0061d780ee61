//! Cycle driver
//!
//! Runs one cycle per retry period, strictly sequentially. Every cycle,
//! whatever happened inside it, ends by advancing the poll window by one
//! retry period. The sleep follows in [`CycleDriver::run`].

use std::time::Duration;

use tokio::time;
use tracing::{debug, error, info, warn};
use vigil_core::domain::{PollWindow, VerdictTable};
use vigil_core::validate::response_timestamp;
use vigil_core::{extract_subjects, interpret};

use crate::repository::{MessageChannel, StatusSource};
use crate::scheduler::CycleError;
use crate::service::notify;

/// What a completed cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new message was delivered
    Notified(String),
    /// The newest status matches what was already delivered
    NoChange,
    /// The API reported no subjects in the window
    NoActivity,
}

/// Polls, detects status changes and notifies, once per retry period
pub struct CycleDriver<S, C> {
    source: S,
    channel: C,
    verdicts: VerdictTable,
    retry_period: Duration,
    window: PollWindow,
    last_message: String,
}

impl<S: StatusSource, C: MessageChannel> CycleDriver<S, C> {
    /// Creates a driver that starts polling from `window`
    pub fn new(
        source: S,
        channel: C,
        verdicts: VerdictTable,
        retry_period: Duration,
        window: PollWindow,
    ) -> Self {
        Self {
            source,
            channel,
            verdicts,
            retry_period,
            window,
            last_message: String::new(),
        }
    }

    /// Current poll window
    pub fn window(&self) -> PollWindow {
        self.window
    }

    /// Last message that was actually delivered (empty until the first one)
    #[allow(dead_code)]
    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    /// Runs cycles forever, sleeping one retry period after each
    pub async fn run(&mut self) {
        info!(
            "Starting status watcher (retry period: {:?}, {})",
            self.retry_period, self.window
        );

        loop {
            let _ = self.tick().await;
            time::sleep(self.retry_period).await;
        }
    }

    /// Runs one cycle and always finishes it, advancing the window
    pub async fn tick(&mut self) -> Result<CycleOutcome, CycleError> {
        let result = self.run_cycle().await;
        self.finish_cycle(&result);
        result
    }

    /// Poll, validate, interpret and notify
    async fn run_cycle(&mut self) -> Result<CycleOutcome, CycleError> {
        debug!("Polling homework statuses ({})", self.window);

        let response = self.source.poll(self.window).await?;

        if let Some(server_time) = response_timestamp(&response) {
            debug!(server_time, "Status API responded");
        }

        let subjects = extract_subjects(&response)?;

        // Most recent first; older entries are history
        let Some(subject) = subjects.first() else {
            return Ok(CycleOutcome::NoActivity);
        };

        let message = interpret(subject, &self.verdicts)?;

        if message == self.last_message {
            return Ok(CycleOutcome::NoChange);
        }

        notify(&self.channel, &message).await?;
        self.last_message.clone_from(&message);

        Ok(CycleOutcome::Notified(message))
    }

    /// Logs the cycle result and advances the window
    fn finish_cycle(&mut self, result: &Result<CycleOutcome, CycleError>) {
        match result {
            Ok(CycleOutcome::Notified(message)) => info!("Sent status update: {}", message),
            Ok(CycleOutcome::NoChange) => debug!("Status unchanged"),
            Ok(CycleOutcome::NoActivity) => debug!("No status changes"),
            Err(e) if e.is_unknown_status() => warn!("Unexpected homework status: {}", e),
            Err(
                e @ (CycleError::Poll(_)
                | CycleError::Shape(_)
                | CycleError::Interpret(_)
                | CycleError::Delivery(_)),
            ) => error!("Cycle failed: {:#}", e),
        }

        self.window.advance(self.retry_period);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{DeliveryError, PollError};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use vigil_core::InterpretError;

    const PERIOD: Duration = Duration::from_secs(600);
    const START: i64 = 1_700_000_000;

    /// Replays queued responses, then reports an empty subject list
    #[derive(Clone, Default)]
    struct FakeSource {
        responses: Arc<Mutex<VecDeque<Result<Value, PollError>>>>,
        windows: Arc<Mutex<Vec<i64>>>,
    }

    impl FakeSource {
        fn push(&self, response: Result<Value, PollError>) {
            self.responses.lock().unwrap().push_back(response);
        }

        fn windows(&self) -> Vec<i64> {
            self.windows.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl StatusSource for FakeSource {
        async fn poll(&self, window: PollWindow) -> Result<Value, PollError> {
            self.windows.lock().unwrap().push(window.from_date());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(json!({ "homeworks": [] })))
        }
    }

    #[derive(Clone, Default)]
    struct FakeChannel {
        sent: Arc<Mutex<Vec<String>>>,
        offline: Arc<AtomicBool>,
    }

    impl FakeChannel {
        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }

        fn set_offline(&self, offline: bool) {
            self.offline.store(offline, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl MessageChannel for FakeChannel {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn send(&self, text: &str) -> Result<(), DeliveryError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(DeliveryError {
                    channel: self.name(),
                    reason: "offline".to_string(),
                });
            }
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn driver() -> (CycleDriver<FakeSource, FakeChannel>, FakeSource, FakeChannel) {
        let source = FakeSource::default();
        let channel = FakeChannel::default();
        let driver = CycleDriver::new(
            source.clone(),
            channel.clone(),
            VerdictTable::default(),
            PERIOD,
            PollWindow::new(START),
        );
        (driver, source, channel)
    }

    fn homework(status: &str, name: &str) -> Value {
        json!({
            "homeworks": [{
                "id": 1,
                "status": status,
                "homework_name": name,
                "reviewer_comment": "",
                "date_updated": "2024-02-01T12:00:00Z",
                "lesson_name": "Lesson"
            }],
            "current_date": START
        })
    }

    #[tokio::test]
    async fn test_unchanged_status_notifies_once() {
        let (mut driver, source, channel) = driver();
        source.push(Ok(homework("approved", "hw1")));
        source.push(Ok(homework("approved", "hw1")));

        let first = driver.tick().await.unwrap();
        let second = driver.tick().await.unwrap();

        let approved = VerdictTable::default().verdict("approved").unwrap().to_string();
        let sent = channel.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("hw1"));
        assert!(sent[0].contains(&approved));
        assert!(matches!(first, CycleOutcome::Notified(_)));
        assert_eq!(second, CycleOutcome::NoChange);
        assert_eq!(driver.last_message(), sent[0]);
    }

    #[tokio::test]
    async fn test_status_change_notifies_again() {
        let (mut driver, source, channel) = driver();
        source.push(Ok(homework("reviewing", "hw1")));
        source.push(Ok(homework("approved", "hw1")));

        driver.tick().await.unwrap();
        driver.tick().await.unwrap();

        let sent = channel.sent();
        assert_eq!(sent.len(), 2);
        assert_ne!(sent[0], sent[1]);
    }

    #[tokio::test]
    async fn test_unknown_status_is_skipped() {
        let (mut driver, source, channel) = driver();
        source.push(Ok(json!({ "homeworks": [{ "status": "bananas", "homework_name": "hw1" }] })));

        let err = driver.tick().await.unwrap_err();

        assert!(err.is_unknown_status());
        assert!(channel.sent().is_empty());
        assert_eq!(driver.window().from_date(), START + 600);
        assert_eq!(driver.last_message(), "");
    }

    #[tokio::test]
    async fn test_empty_list_skips_notifier_and_advances_window() {
        let (mut driver, source, channel) = driver();
        source.push(Ok(json!({ "homeworks": [], "current_date": START })));

        let outcome = driver.tick().await.unwrap();

        assert_eq!(outcome, CycleOutcome::NoActivity);
        assert!(channel.sent().is_empty());
        assert_eq!(driver.window().from_date(), START + 600);
    }

    #[tokio::test]
    async fn test_empty_list_keeps_last_message() {
        let (mut driver, source, channel) = driver();
        source.push(Ok(homework("approved", "hw1")));
        source.push(Ok(json!({ "homeworks": [] })));
        source.push(Ok(homework("approved", "hw1")));

        driver.tick().await.unwrap();
        driver.tick().await.unwrap();
        driver.tick().await.unwrap();

        assert_eq!(channel.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_poll_failure_still_advances_window() {
        let (mut driver, source, channel) = driver();
        source.push(Err(PollError::Transport("connection refused".to_string())));

        let err = driver.tick().await.unwrap_err();

        assert!(matches!(err, CycleError::Poll(PollError::Transport(_))));
        assert!(channel.sent().is_empty());
        assert_eq!(driver.window().from_date(), START + 600);
    }

    #[tokio::test]
    async fn test_malformed_response_is_shape_error() {
        let (mut driver, source, _channel) = driver();
        source.push(Ok(json!({ "homeworks": "hw1" })));

        let err = driver.tick().await.unwrap_err();

        assert!(matches!(err, CycleError::Shape(_)));
        assert_eq!(driver.window().from_date(), START + 600);
    }

    #[tokio::test]
    async fn test_missing_name_is_generic_error() {
        let (mut driver, source, channel) = driver();
        source.push(Ok(json!({ "homeworks": [{ "status": "approved" }] })));

        let err = driver.tick().await.unwrap_err();

        assert_eq!(err, CycleError::Interpret(InterpretError::MissingName));
        assert!(!err.is_unknown_status());
        assert!(channel.sent().is_empty());
    }

    #[tokio::test]
    async fn test_failed_delivery_is_retried_next_cycle() {
        let (mut driver, source, channel) = driver();
        source.push(Ok(homework("approved", "hw1")));
        source.push(Ok(homework("approved", "hw1")));

        channel.set_offline(true);
        let err = driver.tick().await.unwrap_err();
        assert!(matches!(err, CycleError::Delivery(_)));
        assert_eq!(driver.last_message(), "");

        channel.set_offline(false);
        let outcome = driver.tick().await.unwrap();
        assert!(matches!(outcome, CycleOutcome::Notified(_)));
        assert_eq!(channel.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_only_newest_subject_is_consulted() {
        let (mut driver, source, channel) = driver();
        source.push(Ok(json!({
            "homeworks": [
                { "status": "reviewing", "homework_name": "hw2" },
                { "status": "bananas", "homework_name": "hw1" }
            ]
        })));

        driver.tick().await.unwrap();

        let sent = channel.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("hw2"));
    }

    #[tokio::test]
    async fn test_malformed_history_does_not_block_notification() {
        let (mut driver, source, channel) = driver();
        let mut newest = homework("approved", "hw1")["homeworks"][0].clone();
        newest["date_updated"] = json!(1_706_788_800);
        source.push(Ok(json!({
            "homeworks": [newest, { "id": "legacy-7", "status": 3 }, "garbage"]
        })));

        let outcome = driver.tick().await.unwrap();

        assert!(matches!(outcome, CycleOutcome::Notified(_)));
        assert_eq!(channel.sent().len(), 1);
        assert!(channel.sent()[0].contains("hw1"));
    }

    #[tokio::test]
    async fn test_window_advances_once_per_cycle() {
        let (mut driver, source, _channel) = driver();
        source.push(Ok(homework("approved", "hw1")));
        source.push(Err(PollError::Decode("eof".to_string())));
        source.push(Ok(json!({ "homeworks": [] })));

        for _ in 0..3 {
            let _ = driver.tick().await;
        }

        assert_eq!(source.windows(), vec![START, START + 600, START + 1200]);
        assert_eq!(driver.window().from_date(), START + 1800);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_sleeps_between_cycles() {
        let (mut driver, source, _channel) = driver();

        let stopped = time::timeout(Duration::from_secs(1_250), driver.run()).await;

        assert!(stopped.is_err());
        assert_eq!(source.windows(), vec![START, START + 600, START + 1200]);
    }
}
