//! Error types for the bot.
//!
//! This module defines error types for connection-level failures and
//! protocol line parsing failures.

use thiserror::Error;

/// Convenience type alias for Results using [`BotError`].
pub type Result<T, E = BotError> = std::result::Result<T, E>;

/// Top-level bot errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BotError {
    /// I/O error during connecting, reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The server closed the connection.
    #[error("connection closed by server")]
    ConnectionClosed,

    /// Credential file could not be read or parsed.
    #[error("invalid credentials file {path}: {cause}")]
    Credentials {
        /// Path of the credentials file.
        path: String,
        /// What went wrong reading or parsing it.
        cause: String,
    },

    /// The server rejected the login.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// No authentication response arrived within the handshake deadline.
    #[error("handshake timed out")]
    HandshakeTimeout,

    /// Failed to parse an inbound protocol line.
    #[error("invalid message: {string}")]
    InvalidMessage {
        /// The raw line.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: MessageParseError,
    },
}

/// Errors encountered when parsing protocol lines.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Line was empty.
    #[error("empty message")]
    EmptyMessage,

    /// The command segment was empty or malformed.
    #[error("missing command")]
    MissingCommand,

    /// A prefixed segment (tags or source) was not followed by anything.
    #[error("truncated {segment} segment")]
    TruncatedSegment {
        /// Which segment was cut short.
        segment: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BotError::AuthenticationFailed("Login authentication failed".into());
        assert_eq!(
            format!("{}", err),
            "authentication failed: Login authentication failed"
        );

        let err = MessageParseError::TruncatedSegment { segment: "tags" };
        assert_eq!(format!("{}", err), "truncated tags segment");
    }

    #[test]
    fn test_error_source_chaining() {
        let cause = MessageParseError::MissingCommand;
        let err = BotError::InvalidMessage {
            string: ": :".to_string(),
            cause: cause.clone(),
        };

        let source = std::error::Error::source(&err);
        assert!(source.is_some());
        assert_eq!(source.unwrap().to_string(), cause.to_string());
    }

    #[test]
    fn test_error_conversion() {
        let io_err =
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err: BotError = io_err.into();
        assert!(matches!(err, BotError::Io(_)));
    }
}
