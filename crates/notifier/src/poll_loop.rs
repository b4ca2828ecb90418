use std::time::Duration;

use {
    tokio_util::sync::CancellationToken,
    tracing::{debug, info},
};

use crate::{dispatcher::NotificationDispatcher, tracker::ChannelTracker};

/// Poll, dispatch, sleep for the cooldown, repeat.
pub struct PollLoop {
    tracker: ChannelTracker,
    dispatcher: NotificationDispatcher,
    cooldown: Duration,
}

impl PollLoop {
    pub fn new(
        tracker: ChannelTracker,
        dispatcher: NotificationDispatcher,
        cooldown: Duration,
    ) -> Self {
        Self {
            tracker,
            dispatcher,
            cooldown,
        }
    }

    /// Run until `cancel` fires, then hand back the tracker.
    pub async fn run(mut self, cancel: CancellationToken) -> ChannelTracker {
        info!(
            channels = self.tracker.channels().len(),
            destinations = self.dispatcher.destinations().len(),
            cooldown_secs = self.cooldown.as_secs(),
            "poll loop started"
        );

        loop {
            let outcome = tokio::select! {
                () = cancel.cancelled() => break,
                outcome = self.tracker.poll_once() => outcome,
            };
            debug!(
                events = outcome.events.len(),
                failures = outcome.failures.len(),
                "poll cycle finished"
            );

            if !outcome.events.is_empty() {
                let report = tokio::select! {
                    () = cancel.cancelled() => break,
                    report = self.dispatcher.dispatch(&outcome.events) => report,
                };
                info!(
                    delivered = report.delivered,
                    failed = report.failures.len(),
                    "notifications dispatched"
                );
            }

            tokio::select! {
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(self.cooldown) => {},
            }
        }

        info!("poll loop stopped");
        self.tracker
    }
}
