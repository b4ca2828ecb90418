//! Chat transport abstraction shared by the bot.
//!
//! A chat transport (Telegram today) implements [`ChatGateway`] to deliver
//! inbound messages as a stream and to send text to a destination. Command
//! parsing and destination identifiers live here so they stay independent
//! of any one transport.

pub mod command;
pub mod destination;
pub mod error;
pub mod gateway;
pub mod html;

pub use {
    command::{CommandCall, CommandSpec, parse_command},
    destination::ChatDestination,
    error::{Error, Result},
    gateway::{ChatGateway, InboundMessage, InboundReceiver, InboundSender, SendOptions},
    html::escape_html,
};
