//! The bot: connection, handshake and event loop glued together.
//!
//! Single-task, cooperative: each loop iteration is one timeout-bounded
//! receive followed by parse-and-dispatch of every line in arrival
//! order. Outbound sends happen synchronously before the next receive.

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::command::ClientCommand;
use crate::commands::CommandRegistry;
use crate::config::BotConfig;
use crate::connection::Connection;
use crate::dispatch::Dispatcher;
use crate::error::{BotError, Result};
use crate::message::Message;
use crate::state::{ConnectionState, Handshake, HandshakeAction, HandshakeConfig, HandshakeError};

/// A connected, authenticated chat bot.
#[derive(Debug)]
pub struct Bot<S = TcpStream> {
    config: BotConfig,
    connection: Connection<S>,
    handshake: Handshake,
    dispatcher: Dispatcher,
}

impl Bot<TcpStream> {
    /// Connect, authenticate and join with the stock command registry.
    /// TCP and login failures are fatal and propagate to the caller.
    pub async fn connect(config: BotConfig, token: String) -> Result<Self> {
        Self::connect_with_registry(config, token, CommandRegistry::default()).await
    }

    /// Like [`Bot::connect`] with a caller-supplied command registry.
    pub async fn connect_with_registry(
        config: BotConfig,
        token: String,
        registry: CommandRegistry,
    ) -> Result<Self> {
        info!(host = %config.host, port = config.port, "connecting");
        let connection = Connection::connect(&config.host, config.port).await?;
        info!("connected");
        let mut bot = Self::from_parts(config, token, registry, connection);
        bot.login().await?;
        Ok(bot)
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> Bot<S> {
    /// Assemble a bot over an already-connected stream. The handshake
    /// still has to be driven via [`Bot::login`].
    pub fn from_parts(
        config: BotConfig,
        token: String,
        registry: CommandRegistry,
        connection: Connection<S>,
    ) -> Self {
        let mut handshake = Handshake::new(HandshakeConfig {
            nickname: config.nickname.clone(),
            channel: config.channel.clone(),
            token,
            request_caps: config.request_caps.clone(),
            greeting: config.greeting.clone(),
        });
        handshake.connected();
        let dispatcher = Dispatcher::new(registry, config.channel.clone());
        Self {
            config,
            connection,
            handshake,
            dispatcher,
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.handshake.state()
    }

    /// Drive the handshake until online, bounded by the configured
    /// handshake timeout.
    pub async fn login(&mut self) -> Result<()> {
        for action in self.handshake.start() {
            self.apply(action).await?;
        }

        let deadline = tokio::time::Instant::now() + self.config.handshake_timeout;
        while !self.handshake.is_online() {
            let now = tokio::time::Instant::now();
            if now >= deadline {
                return Err(BotError::HandshakeTimeout);
            }
            let lines = self.connection.receive(Some(deadline - now)).await?;
            for line in lines {
                debug!(line = %line, "inbound");
                let msg = match Message::parse(&line) {
                    Ok(msg) => msg,
                    Err(cause) => {
                        warn!(line = %line, error = %cause, "discarding unparseable line");
                        continue;
                    }
                };
                for action in self.handshake.feed(&msg) {
                    self.apply(action).await?;
                }
                // Keep-alives can arrive mid-handshake.
                if let Some(reply) = self.dispatcher.dispatch(&msg) {
                    self.send(reply).await?;
                }
            }
        }
        info!(
            nickname = %self.config.nickname,
            channel = %self.config.channel,
            "online"
        );
        Ok(())
    }

    /// One event-loop iteration: a timeout-bounded receive, then
    /// parse-and-dispatch of every returned line in order.
    pub async fn step(&mut self) -> Result<()> {
        let lines = self
            .connection
            .receive(Some(self.config.read_timeout))
            .await?;
        for line in lines {
            debug!(line = %line, "inbound");
            match Message::parse(&line) {
                Ok(msg) => {
                    if let Some(reply) = self.dispatcher.dispatch(&msg) {
                        self.send(reply).await?;
                    }
                }
                Err(cause) => {
                    warn!(line = %line, error = %cause, "discarding unparseable line");
                }
            }
        }
        Ok(())
    }

    /// Run until interrupted or the connection drops.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupt received, shutting down");
                    return Ok(());
                }
                iteration = self.step() => match iteration {
                    Ok(()) => {}
                    Err(BotError::ConnectionClosed) => {
                        warn!("server closed the connection");
                        return Ok(());
                    }
                    Err(e) => return Err(e),
                },
            }
        }
    }

    /// Close the connection. Always safe to call; re-enters
    /// `Disconnected`.
    pub async fn disconnect(&mut self) {
        self.handshake.begin_disconnect();
        self.connection.shutdown().await;
        self.handshake.finish_disconnect();
        info!("disconnected");
    }

    async fn send(&mut self, command: ClientCommand) -> Result<()> {
        info!(command = %command.redacted(), "send");
        self.connection.send(&command.to_string()).await
    }

    async fn apply(&mut self, action: HandshakeAction) -> Result<()> {
        match action {
            HandshakeAction::Send(command) => self.send(command).await,
            HandshakeAction::Complete => Ok(()),
            HandshakeAction::Error(HandshakeError::AuthenticationFailed(reason)) => {
                Err(BotError::AuthenticationFailed(reason))
            }
        }
    }
}
