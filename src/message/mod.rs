//! Inbound protocol line parsing.

mod parse;
mod tags;

pub use self::parse::{CommandInfo, Message};
