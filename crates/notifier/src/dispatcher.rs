use std::{sync::Arc, time::Duration};

use {
    tracing::{debug, warn},
    ytbot_channels::{ChatDestination, ChatGateway, SendOptions, escape_html},
};

use crate::{Error, timeout::with_timeout, tracker::NotificationEvent};

/// HTML message announcing `event`.
#[must_use]
pub fn format_notification(event: &NotificationEvent) -> String {
    format!(
        "<b>{}</b> published new <a href=\"{}\">video</a>!",
        escape_html(&event.display_name),
        event.video_url()
    )
}

/// A notification that could not be delivered to one destination.
#[derive(Debug)]
pub struct DeliveryFailure {
    pub destination: ChatDestination,
    pub video_id: String,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failures: Vec<DeliveryFailure>,
}

/// Sends every event to every configured destination.
pub struct NotificationDispatcher {
    chat: Arc<dyn ChatGateway>,
    destinations: Vec<ChatDestination>,
    send_timeout: Duration,
}

impl NotificationDispatcher {
    pub fn new(
        chat: Arc<dyn ChatGateway>,
        destinations: Vec<ChatDestination>,
        send_timeout: Duration,
    ) -> Self {
        Self {
            chat,
            destinations,
            send_timeout,
        }
    }

    #[must_use]
    pub fn destinations(&self) -> &[ChatDestination] {
        &self.destinations
    }

    /// Deliver `events` event by event, each to the destinations in
    /// configured order. A failed send is recorded and delivery continues.
    pub async fn dispatch(&self, events: &[NotificationEvent]) -> DispatchReport {
        let mut report = DispatchReport::default();
        if events.is_empty() {
            return report;
        }
        if self.destinations.is_empty() {
            warn!(
                events = events.len(),
                "no chats configured, dropping notifications"
            );
            return report;
        }

        for event in events {
            let text = format_notification(event);
            for destination in &self.destinations {
                let sent = with_timeout(
                    "send notification",
                    self.send_timeout,
                    self.chat
                        .send(destination.as_str(), &text, SendOptions::default()),
                )
                .await;

                match sent {
                    Ok(()) => {
                        debug!(
                            destination = %destination,
                            video_id = %event.video_id,
                            "notification delivered"
                        );
                        report.delivered += 1;
                    },
                    Err(error) => {
                        warn!(
                            destination = %destination,
                            channel_id = %event.channel_id,
                            video_id = %event.video_id,
                            error = %error,
                            "notification delivery failed"
                        );
                        report.failures.push(DeliveryFailure {
                            destination: destination.clone(),
                            video_id: event.video_id.clone(),
                            error,
                        });
                    },
                }
            }
        }

        report
    }
}
