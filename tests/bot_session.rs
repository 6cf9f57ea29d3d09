//! End-to-end bot sessions over an in-memory stream: handshake
//! sequencing, keep-alive duties, chat command replies and failure
//! handling, without a network.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

use seabot::{Bot, BotConfig, BotError, CommandRegistry, Connection, ConnectionState};

fn test_config() -> BotConfig {
    BotConfig {
        read_timeout: Duration::from_millis(100),
        handshake_timeout: Duration::from_secs(5),
        ..BotConfig::default()
    }
}

fn test_bot(server_buffer: usize) -> (Bot<DuplexStream>, DuplexStream) {
    let (client, server) = tokio::io::duplex(server_buffer);
    let bot = Bot::from_parts(
        test_config(),
        "tok123".to_string(),
        CommandRegistry::default(),
        Connection::from_stream(client),
    );
    (bot, server)
}

async fn read_line(server: &mut DuplexStream) -> String {
    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        server.read_exact(&mut byte).await.unwrap();
        if byte[0] == b'\n' {
            break;
        }
        line.push(byte[0]);
    }
    let text = String::from_utf8(line).unwrap();
    text.trim_end_matches('\r').to_string()
}

#[tokio::test]
async fn test_handshake_sequencing_and_online_duties() {
    let (mut bot, mut server) = test_bot(1024);

    let (login, ()) = tokio::join!(bot.login(), async {
        assert_eq!(
            read_line(&mut server).await,
            "CAP REQ :twitch.tv/membership twitch.tv/tags twitch.tv/commands"
        );
        assert_eq!(read_line(&mut server).await, "PASS oauth:tok123");
        assert_eq!(read_line(&mut server).await, "NICK SeaBotBeepBoop");
        server
            .write_all(b":tmi.twitch.tv 001 SeaBotBeepBoop :Welcome, GLHF!\r\n")
            .await
            .unwrap();
        assert_eq!(read_line(&mut server).await, "JOIN #smokedseabass");
        assert_eq!(
            read_line(&mut server).await,
            "PRIVMSG #smokedseabass :Beep boop, hello everyone!"
        );
    });
    login.unwrap();
    assert_eq!(bot.state(), ConnectionState::Online);

    // Keep-alive: one PING in, exactly one PONG out.
    server.write_all(b"PING :tmi.twitch.tv\r\n").await.unwrap();
    bot.step().await.unwrap();
    assert_eq!(read_line(&mut server).await, "PONG :tmi.twitch.tv");

    // Chat command routed through the registry.
    server
        .write_all(
            b"@badge-info=;display-name=foo :foo!foo@foo.tmi.twitch.tv PRIVMSG #smokedseabass :!ping\r\n",
        )
        .await
        .unwrap();
    bot.step().await.unwrap();
    assert_eq!(read_line(&mut server).await, "PRIVMSG #smokedseabass :pong!");

    bot.disconnect().await;
    assert_eq!(bot.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_malformed_line_is_skipped_and_processing_continues() {
    let (mut bot, mut server) = test_bot(1024);

    let (login, ()) = tokio::join!(bot.login(), async {
        for _ in 0..3 {
            let _ = read_line(&mut server).await;
        }
        server
            .write_all(b":tmi.twitch.tv 001 SeaBotBeepBoop :Welcome\r\n")
            .await
            .unwrap();
        let _ = read_line(&mut server).await; // JOIN
        let _ = read_line(&mut server).await; // greeting
    });
    login.unwrap();

    // A truncated tags segment is unparseable; the PING behind it in
    // the same batch must still be answered.
    server
        .write_all(b"@oops\r\nPING :tmi.twitch.tv\r\n")
        .await
        .unwrap();
    bot.step().await.unwrap();
    assert_eq!(read_line(&mut server).await, "PONG :tmi.twitch.tv");
}

#[tokio::test]
async fn test_login_failure_notice_aborts_startup() {
    let (mut bot, mut server) = test_bot(1024);

    let (login, ()) = tokio::join!(bot.login(), async {
        for _ in 0..3 {
            let _ = read_line(&mut server).await;
        }
        server
            .write_all(b":tmi.twitch.tv NOTICE * :Login authentication failed\r\n")
            .await
            .unwrap();
    });
    match login {
        Err(BotError::AuthenticationFailed(reason)) => {
            assert_eq!(reason, "Login authentication failed");
        }
        other => panic!("expected authentication failure, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_silent_server_hits_handshake_deadline() {
    // Server never responds but keeps the socket open.
    let (mut bot, _server) = test_bot(1024);

    let err = bot.login().await.unwrap_err();
    assert!(matches!(err, BotError::HandshakeTimeout));
}
