//! In-memory gateways for unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{
    collections::{HashMap, HashSet},
    future,
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use {
    async_trait::async_trait,
    tokio::sync::mpsc,
    tokio_util::sync::CancellationToken,
    ytbot_channels::{ChatGateway, CommandSpec, InboundReceiver, InboundSender, SendOptions},
    ytbot_youtube::{ChannelSummary, VideoPlatform},
};

#[derive(Debug, Clone)]
struct FakeChannel {
    name: String,
    count: u64,
    newest: Option<String>,
}

#[derive(Default)]
struct PlatformState {
    channels: HashMap<String, FakeChannel>,
    search: HashMap<String, String>,
    failing_summary: HashSet<String>,
    failing_newest: HashSet<String>,
    hanging_summary: HashSet<String>,
    newest_calls: Vec<String>,
}

/// Scriptable [`VideoPlatform`].
#[derive(Default)]
pub struct FakePlatform {
    state: Mutex<PlatformState>,
}

impl FakePlatform {
    pub fn set_channel(&self, id: &str, name: &str, count: u64, newest: Option<&str>) {
        self.state.lock().unwrap().channels.insert(id.into(), FakeChannel {
            name: name.into(),
            count,
            newest: newest.map(Into::into),
        });
    }

    pub fn add_search_result(&self, query: &str, id: &str) {
        self.state
            .lock()
            .unwrap()
            .search
            .insert(query.into(), id.into());
    }

    pub fn fail_summary(&self, id: &str, failing: bool) {
        let mut state = self.state.lock().unwrap();
        if failing {
            state.failing_summary.insert(id.into());
        } else {
            state.failing_summary.remove(id);
        }
    }

    pub fn fail_newest(&self, id: &str, failing: bool) {
        let mut state = self.state.lock().unwrap();
        if failing {
            state.failing_newest.insert(id.into());
        } else {
            state.failing_newest.remove(id);
        }
    }

    /// Make summary requests for `id` never complete.
    pub fn hang_summary(&self, id: &str) {
        self.state
            .lock()
            .unwrap()
            .hanging_summary
            .insert(id.into());
    }

    pub fn newest_calls(&self) -> Vec<String> {
        self.state.lock().unwrap().newest_calls.clone()
    }
}

fn unavailable() -> ytbot_youtube::Error {
    ytbot_youtube::Error::Http {
        status: 503,
        body: "backend unavailable".into(),
    }
}

#[async_trait]
impl VideoPlatform for FakePlatform {
    async fn resolve_channel_id(&self, name: &str) -> ytbot_youtube::Result<String> {
        if name == "hang" {
            future::pending::<()>().await;
        }
        let state = self.state.lock().unwrap();
        if name == "explode" {
            return Err(unavailable());
        }
        state
            .search
            .get(name)
            .cloned()
            .ok_or_else(|| ytbot_youtube::Error::not_found(format!("channel matching {name:?}")))
    }

    async fn fetch_channel_summary(&self, channel_id: &str) -> ytbot_youtube::Result<ChannelSummary> {
        let hangs = self
            .state
            .lock()
            .unwrap()
            .hanging_summary
            .contains(channel_id);
        if hangs {
            future::pending::<()>().await;
        }
        let state = self.state.lock().unwrap();
        if state.failing_summary.contains(channel_id) {
            return Err(unavailable());
        }
        let channel = state
            .channels
            .get(channel_id)
            .ok_or_else(|| ytbot_youtube::Error::not_found(format!("channel {channel_id}")))?;
        Ok(ChannelSummary {
            display_name: channel.name.clone(),
            video_count: channel.count,
        })
    }

    async fn fetch_newest_video_id(
        &self,
        channel_id: &str,
    ) -> ytbot_youtube::Result<Option<String>> {
        let mut state = self.state.lock().unwrap();
        state.newest_calls.push(channel_id.into());
        if state.failing_newest.contains(channel_id) {
            return Err(unavailable());
        }
        let channel = state
            .channels
            .get(channel_id)
            .ok_or_else(|| ytbot_youtube::Error::not_found(format!("channel {channel_id}")))?;
        Ok(channel.newest.clone())
    }
}

/// One recorded `send` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub to: String,
    pub text: String,
    pub reply_to: Option<String>,
}

/// Recording [`ChatGateway`] with an injectable inbound stream.
pub struct FakeChat {
    sent: Mutex<Vec<SentMessage>>,
    attempts: Mutex<Vec<(String, String)>>,
    failing: Mutex<HashSet<String>>,
    hanging: Mutex<HashSet<String>>,
    registered: Mutex<Vec<CommandSpec>>,
    inbound: Mutex<Option<InboundReceiver>>,
    stopped: AtomicBool,
}

impl FakeChat {
    /// Returns the gateway and the sender feeding its inbound stream.
    pub fn new() -> (Self, InboundSender) {
        let (tx, rx) = mpsc::channel(16);
        let chat = Self {
            sent: Mutex::new(Vec::new()),
            attempts: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            hanging: Mutex::new(HashSet::new()),
            registered: Mutex::new(Vec::new()),
            inbound: Mutex::new(Some(rx)),
            stopped: AtomicBool::new(false),
        };
        (chat, tx)
    }

    pub fn fail_destination(&self, to: &str) {
        self.failing.lock().unwrap().insert(to.into());
    }

    /// Make sends to `to` never complete.
    pub fn hang_destination(&self, to: &str) {
        self.hanging.lock().unwrap().insert(to.into());
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Every `(destination, text)` pair passed to `send`, failed ones included.
    pub fn attempts(&self) -> Vec<(String, String)> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn registered(&self) -> Vec<CommandSpec> {
        self.registered.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatGateway for FakeChat {
    async fn receive_inbound(
        &self,
        _cancel: CancellationToken,
    ) -> ytbot_channels::Result<InboundReceiver> {
        self.inbound
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| ytbot_channels::Error::unavailable("inbound stream already taken"))
    }

    async fn send(&self, to: &str, text: &str, options: SendOptions) -> ytbot_channels::Result<()> {
        self.attempts
            .lock()
            .unwrap()
            .push((to.into(), text.into()));
        let hangs = self.hanging.lock().unwrap().contains(to);
        if hangs {
            future::pending::<()>().await;
        }
        if self.failing.lock().unwrap().contains(to) {
            return Err(ytbot_channels::Error::unknown_destination(to));
        }
        self.sent.lock().unwrap().push(SentMessage {
            to: to.into(),
            text: text.into(),
            reply_to: options.reply_to,
        });
        Ok(())
    }

    async fn register_commands(&self, commands: &[CommandSpec]) -> ytbot_channels::Result<()> {
        self.registered.lock().unwrap().extend_from_slice(commands);
        Ok(())
    }

    async fn stop(&self) -> ytbot_channels::Result<()> {
        self.stopped.store(true, Ordering::SeqCst);
        Ok(())
    }
}
