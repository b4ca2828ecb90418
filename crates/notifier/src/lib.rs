//! New-video detection and chat command handling.
//!
//! [`ChannelTracker`] keeps per-channel state and turns one poll into a list
//! of [`NotificationEvent`]s, [`NotificationDispatcher`] fans those out to
//! every configured chat, and [`CommandRouter`] answers chat commands. The
//! two long-running loops are wired together by [`start`].

pub mod commands;
pub mod dispatcher;
pub mod error;
pub mod inbound_loop;
pub mod poll_loop;
pub mod service;
mod timeout;
pub mod tracker;

#[cfg(test)]
pub(crate) mod test_support;

pub use {
    commands::{
        BUILTIN_COMMANDS, CHANNELID_USAGE, CommandContext, CommandDescriptor, CommandRequest,
        CommandRouter, PING_REPLY,
    },
    dispatcher::{DeliveryFailure, DispatchReport, NotificationDispatcher, format_notification},
    error::{Error, Result},
    service::{ServiceHandle, ServiceSettings, start},
    tracker::{ChannelState, ChannelTracker, NotificationEvent, PollFailure, PollOutcome},
};
