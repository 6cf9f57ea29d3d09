//! Typed outbound client commands.
//!
//! Every command the bot ever writes to the wire is one of these
//! variants; `Display` produces the literal protocol format without the
//! line terminator (the connection appends CRLF on send).

use std::fmt;

/// An outbound protocol command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientCommand {
    /// `CAP REQ :<capability-list>`
    CapReq(String),
    /// `PASS oauth:<token>` — the token is stored without the `oauth:`
    /// prefix.
    Pass(String),
    /// `NICK <nickname>`
    Nick(String),
    /// `JOIN <channel>`
    Join(String),
    /// `PRIVMSG <channel> :<text>`
    Privmsg(String, String),
    /// `PONG :<server>`
    Pong(String),
}

impl fmt::Display for ClientCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientCommand::CapReq(caps) => write!(f, "CAP REQ :{caps}"),
            ClientCommand::Pass(token) => write!(f, "PASS oauth:{token}"),
            ClientCommand::Nick(nick) => write!(f, "NICK {nick}"),
            ClientCommand::Join(channel) => write!(f, "JOIN {channel}"),
            ClientCommand::Privmsg(channel, text) => write!(f, "PRIVMSG {channel} :{text}"),
            ClientCommand::Pong(server) => write!(f, "PONG :{server}"),
        }
    }
}

impl ClientCommand {
    /// Rendering for logs: the PASS token is never echoed.
    pub fn redacted(&self) -> String {
        match self {
            ClientCommand::Pass(_) => "PASS oauth:<redacted>".to_string(),
            other => other.to_string(),
        }
    }
}
