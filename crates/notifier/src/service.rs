use std::{sync::Arc, time::Duration};

use {
    tokio::{task::JoinHandle, time::Instant},
    tokio_util::sync::CancellationToken,
    tracing::{debug, info, warn},
    ytbot_channels::{ChatDestination, ChatGateway},
    ytbot_youtube::VideoPlatform,
};

use crate::{
    Result,
    commands::CommandRouter,
    dispatcher::NotificationDispatcher,
    inbound_loop::InboundLoop,
    poll_loop::PollLoop,
    timeout::with_timeout,
    tracker::ChannelTracker,
};

/// Runtime settings for the notifier.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Channels to track, in notification order.
    pub channel_ids: Vec<String>,
    pub destinations: Vec<ChatDestination>,
    /// Pause between poll cycles.
    pub cooldown: Duration,
    /// Limit for every single gateway call.
    pub request_timeout: Duration,
}

/// Running poll and inbound loops.
pub struct ServiceHandle {
    cancel: CancellationToken,
    chat: Arc<dyn ChatGateway>,
    poll_task: JoinHandle<()>,
    inbound_task: JoinHandle<()>,
}

/// Initialize the tracker and start both loops.
///
/// Fails without spawning anything when a channel cannot be initialized
/// or the inbound stream cannot be opened. A failure to advertise the
/// command list is only logged.
pub async fn start(
    settings: ServiceSettings,
    platform: Arc<dyn VideoPlatform>,
    chat: Arc<dyn ChatGateway>,
) -> Result<ServiceHandle> {
    let tracker = ChannelTracker::initialize(
        Arc::clone(&platform),
        &settings.channel_ids,
        settings.request_timeout,
    )
    .await?;

    let router = CommandRouter::new(platform, settings.request_timeout);
    let specs = router.specs();
    if let Err(e) = with_timeout(
        "register commands",
        settings.request_timeout,
        chat.register_commands(&specs),
    )
    .await
    {
        warn!(error = %e, "failed to register bot commands");
    }

    let cancel = CancellationToken::new();
    let inbound = chat.receive_inbound(cancel.clone()).await?;

    let dispatcher = NotificationDispatcher::new(
        Arc::clone(&chat),
        settings.destinations,
        settings.request_timeout,
    );
    let poll_loop = PollLoop::new(tracker, dispatcher, settings.cooldown);
    let poll_cancel = cancel.clone();
    let poll_task = tokio::spawn(async move {
        poll_loop.run(poll_cancel).await;
    });

    let inbound_loop = InboundLoop::new(Arc::clone(&chat), router, settings.request_timeout);
    let inbound_task = tokio::spawn(inbound_loop.run(inbound, cancel.clone()));

    info!(channels = settings.channel_ids.len(), "notifier started");
    Ok(ServiceHandle {
        cancel,
        chat,
        poll_task,
        inbound_task,
    })
}

impl ServiceHandle {
    /// Stop both loops and the gateway's background work, aborting any
    /// loop that has not finished once `grace` has elapsed.
    pub async fn shutdown(self, grace: Duration) {
        info!(grace_secs = grace.as_secs(), "shutting down notifier");
        self.cancel.cancel();

        let deadline = Instant::now() + grace;
        join_or_abort("poll loop", self.poll_task, deadline).await;
        join_or_abort("inbound loop", self.inbound_task, deadline).await;

        match tokio::time::timeout_at(deadline, self.chat.stop()).await {
            Ok(Ok(())) => debug!("chat gateway stopped"),
            Ok(Err(e)) => warn!(error = %e, "chat gateway failed to stop cleanly"),
            Err(_) => warn!("chat gateway did not stop within grace period"),
        }
    }
}

async fn join_or_abort(task: &'static str, mut handle: JoinHandle<()>, deadline: Instant) {
    match tokio::time::timeout_at(deadline, &mut handle).await {
        Ok(Ok(())) => debug!(task, "task stopped"),
        Ok(Err(e)) => warn!(task, error = %e, "task ended abnormally"),
        Err(_) => {
            warn!(task, "task did not stop within grace period, aborting");
            handle.abort();
        },
    }
}
