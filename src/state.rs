//! Sans-IO connection lifecycle state machine.
//!
//! The machine owns the [`ConnectionState`] and sequences the handshake:
//! it consumes parsed messages and produces actions (commands to send),
//! but performs no I/O itself. The client is responsible for writing the
//! actions to the socket, which keeps the sequencing testable without a
//! network.
//!
//! Happy path:
//!
//! ```text
//! Disconnected -> Connecting -> Authenticating -> Joining -> Online
//! ```
//!
//! and from any state `-> Disconnecting -> Disconnected` on shutdown or
//! fatal error.

use crate::command::ClientCommand;
use crate::message::Message;

/// Current state of the connection lifecycle. Exactly one is active at
/// a time; transitions happen only through [`Handshake`] methods.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected.
    #[default]
    Disconnected,
    /// TCP connection opened, login not yet sent.
    Connecting,
    /// CAP/PASS/NICK sent, awaiting the login response.
    Authenticating,
    /// Login accepted, JOIN issued.
    Joining,
    /// Joined and serving the channel.
    Online,
    /// Shutdown in progress, socket about to close.
    Disconnecting,
}

/// Configuration for the handshake.
#[derive(Clone, Debug)]
pub struct HandshakeConfig {
    /// Bot account nickname.
    pub nickname: String,
    /// Channel to join after login.
    pub channel: String,
    /// OAuth access token, without the `oauth:` prefix.
    pub token: String,
    /// Capabilities to request before logging in.
    pub request_caps: Vec<String>,
    /// Chat message announced right after joining, if any.
    pub greeting: Option<String>,
}

/// Actions produced by the state machine. The caller sends the
/// messages to the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandshakeAction {
    /// Send this command to the server.
    Send(ClientCommand),
    /// Handshake finished, the connection is online.
    Complete,
    /// The handshake failed; the caller should disconnect.
    Error(HandshakeError),
}

/// Fatal handshake failures.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandshakeError {
    /// The server rejected the login.
    AuthenticationFailed(String),
}

impl std::fmt::Display for HandshakeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed(reason) => {
                write!(f, "authentication failed: {}", reason)
            }
        }
    }
}

impl std::error::Error for HandshakeError {}

/// Login failure notices the server is known to send. The old substring
/// check (`'failed' in response`) misclassified ordinary chat containing
/// the word, so failure detection is an exact match on the NOTICE text.
const LOGIN_FAILURE_NOTICES: &[&str] = &[
    "Login authentication failed",
    "Login unsuccessful",
    "Improperly formatted auth",
];

/// Numeric sent on successful login (RPL_WELCOME).
const WELCOME: &str = "001";

/// Sans-IO state machine for the connect/login/join sequence.
#[derive(Clone, Debug)]
pub struct Handshake {
    config: HandshakeConfig,
    state: ConnectionState,
}

impl Handshake {
    /// New machine in `Disconnected`.
    #[must_use]
    pub fn new(config: HandshakeConfig) -> Self {
        Self {
            config,
            state: ConnectionState::Disconnected,
        }
    }

    /// Current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Whether the handshake finished successfully.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.state == ConnectionState::Online
    }

    /// The TCP connection was opened.
    pub fn connected(&mut self) {
        self.state = ConnectionState::Connecting;
    }

    /// Begin the login. Returns the capability request and credentials
    /// to send, in order.
    #[must_use]
    pub fn start(&mut self) -> Vec<HandshakeAction> {
        self.state = ConnectionState::Authenticating;
        vec![
            HandshakeAction::Send(ClientCommand::CapReq(self.config.request_caps.join(" "))),
            HandshakeAction::Send(ClientCommand::Pass(self.config.token.clone())),
            HandshakeAction::Send(ClientCommand::Nick(self.config.nickname.clone())),
        ]
    }

    /// Feed one parsed inbound message to the machine.
    #[must_use]
    pub fn feed(&mut self, msg: &Message<'_>) -> Vec<HandshakeAction> {
        match self.state {
            ConnectionState::Authenticating => self.handle_login_response(msg),
            _ => vec![],
        }
    }

    fn handle_login_response(&mut self, msg: &Message<'_>) -> Vec<HandshakeAction> {
        match msg.command.name {
            "NOTICE" => {
                let text = msg.parameters.unwrap_or("");
                if LOGIN_FAILURE_NOTICES.contains(&text) {
                    vec![HandshakeAction::Error(HandshakeError::AuthenticationFailed(
                        text.to_string(),
                    ))]
                } else {
                    vec![]
                }
            }
            WELCOME => {
                // Join is issued without waiting for an acknowledgment;
                // the server replays our own JOIN once it takes effect.
                self.state = ConnectionState::Joining;
                let mut actions = vec![HandshakeAction::Send(ClientCommand::Join(
                    self.config.channel.clone(),
                ))];
                if let Some(ref greeting) = self.config.greeting {
                    actions.push(HandshakeAction::Send(ClientCommand::Privmsg(
                        self.config.channel.clone(),
                        greeting.clone(),
                    )));
                }
                self.state = ConnectionState::Online;
                actions.push(HandshakeAction::Complete);
                actions
            }
            _ => vec![],
        }
    }

    /// Shutdown requested; the socket is about to close.
    pub fn begin_disconnect(&mut self) {
        self.state = ConnectionState::Disconnecting;
    }

    /// The socket is closed.
    pub fn finish_disconnect(&mut self) {
        self.state = ConnectionState::Disconnected;
    }
}
