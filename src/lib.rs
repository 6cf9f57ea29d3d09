//! # seabot
//!
//! A small Twitch IRC chat bot. The interesting parts are the protocol
//! line parser and the connection lifecycle state machine; everything
//! else is glue.
//!
//! - Positional line parsing into tags, source, command and parameters
//! - Sans-IO handshake machine (CAP/PASS/NICK, join, keep-alive duties)
//! - Timeout-bounded reads with partial-line buffering
//! - Chat command registry, open for extension
//!
//! ## Parsing a line
//!
//! ```rust
//! use seabot::Message;
//!
//! let msg = Message::parse("@display-name=foo :foo!foo@foo.tmi.twitch.tv PRIVMSG #chan :!ping")
//!     .expect("valid line");
//! assert_eq!(msg.command.name, "PRIVMSG");
//! assert_eq!(msg.tags["display-name"], "foo");
//! assert_eq!(msg.parameters, Some("!ping"));
//! ```
//!
//! ## Registering a chat command
//!
//! ```rust
//! use seabot::CommandRegistry;
//!
//! let mut registry = CommandRegistry::default();
//! registry.register("hug", |args| Some(format!("/me hugs {args}")));
//! assert_eq!(registry.route("ping"), Some("pong!".to_string()));
//! ```

#![deny(clippy::all)]

pub mod client;
pub mod command;
pub mod commands;
pub mod config;
pub mod connection;
pub mod dispatch;
pub mod error;
pub mod message;
pub mod state;

pub use self::client::Bot;
pub use self::command::ClientCommand;
pub use self::commands::CommandRegistry;
pub use self::config::{BotConfig, Credentials, DEFAULT_CREDENTIALS_PATH};
pub use self::connection::Connection;
pub use self::dispatch::Dispatcher;
pub use self::error::{BotError, MessageParseError};
pub use self::message::{CommandInfo, Message};
pub use self::state::{ConnectionState, Handshake, HandshakeAction, HandshakeConfig};
