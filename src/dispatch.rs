//! Protocol-level reactions to parsed messages.
//!
//! The dispatcher is pure: it looks at one parsed message and decides
//! on at most one outbound command. It performs no I/O, so it can never
//! block the event loop.

use tracing::debug;

use crate::command::ClientCommand;
use crate::commands::CommandRegistry;
use crate::message::Message;

/// Prefix character marking a chat message as a chat command.
pub const COMMAND_PREFIX: char = '!';

/// Fixed origin used in keep-alive replies.
pub const KEEPALIVE_ORIGIN: &str = "tmi.twitch.tv";

/// Decides protocol-level reactions and routes chat payloads.
#[derive(Debug)]
pub struct Dispatcher {
    registry: CommandRegistry,
    channel: String,
}

impl Dispatcher {
    /// Dispatcher replying into `channel` using the given registry.
    #[must_use]
    pub fn new(registry: CommandRegistry, channel: impl Into<String>) -> Self {
        Self {
            registry,
            channel: channel.into(),
        }
    }

    /// React to one inbound message. Returns at most one outbound
    /// command; unknown protocol commands are ignored, not errors.
    pub fn dispatch(&self, msg: &Message<'_>) -> Option<ClientCommand> {
        match msg.command.name {
            // Keep-alive: fixed reply, independent of the message payload.
            "PING" => Some(ClientCommand::Pong(KEEPALIVE_ORIGIN.to_string())),
            "PRIVMSG" => {
                let text = msg.parameters?;
                let invocation = text.strip_prefix(COMMAND_PREFIX)?;
                let reply = self.registry.route(invocation)?;
                debug!(command = %invocation, "chat command handled");
                Some(ClientCommand::Privmsg(self.channel.clone(), reply))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(CommandRegistry::default(), "#smokedseabass")
    }

    #[test]
    fn test_ping_gets_exactly_one_pong() {
        let msg = Message::parse("PING :tmi.twitch.tv").unwrap();
        assert_eq!(
            dispatcher().dispatch(&msg),
            Some(ClientCommand::Pong("tmi.twitch.tv".to_string()))
        );
    }

    #[test]
    fn test_pong_ignores_message_parameters() {
        // The reply is fixed even when the server names itself differently.
        let msg = Message::parse("PING :some.other.server").unwrap();
        assert_eq!(
            dispatcher().dispatch(&msg),
            Some(ClientCommand::Pong("tmi.twitch.tv".to_string()))
        );
    }

    #[test]
    fn test_prefixed_chat_command_is_routed() {
        let msg = Message::parse(
            ":foo!foo@foo.tmi.twitch.tv PRIVMSG #smokedseabass :!ping",
        )
        .unwrap();
        assert_eq!(
            dispatcher().dispatch(&msg),
            Some(ClientCommand::Privmsg(
                "#smokedseabass".to_string(),
                "pong!".to_string()
            ))
        );
    }

    #[test]
    fn test_plain_chat_is_ignored() {
        let msg = Message::parse(":foo PRIVMSG #smokedseabass :hello everyone").unwrap();
        assert_eq!(dispatcher().dispatch(&msg), None);
    }

    #[test]
    fn test_unknown_chat_command_is_silent() {
        let msg = Message::parse(":foo PRIVMSG #smokedseabass :!unknown-cmd").unwrap();
        assert_eq!(dispatcher().dispatch(&msg), None);
    }

    #[test]
    fn test_unknown_protocol_command_is_ignored() {
        let msg = Message::parse(":tmi.twitch.tv ROOMSTATE #smokedseabass").unwrap();
        assert_eq!(dispatcher().dispatch(&msg), None);
    }

    #[test]
    fn test_privmsg_without_parameters_is_ignored() {
        let msg = Message::parse(":foo PRIVMSG #smokedseabass").unwrap();
        assert_eq!(dispatcher().dispatch(&msg), None);
    }
}
