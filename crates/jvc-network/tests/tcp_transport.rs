//! Integration tests for TcpTransport
//!
//! These tests run the transport against scripted mock projectors on
//! loopback, covering the handshake, response validation, fail-fast shutdown
//! and the transaction lock.

use std::sync::Arc;
use std::time::Duration;

use jvc_core::Error;
use jvc_network::{TcpTransport, Transport};
use jvc_protocol::Command;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

const TIMEOUT: Duration = Duration::from_millis(1000);

const POWER_QUERY: &[u8] = b"\x3F\x89\x01PW\n";
const POWER_ACK: &[u8] = b"\x06\x89\x01PW\n";
const POWER_ON_REPLY: &[u8] = b"\x40\x89\x01PW1\n";

async fn listen() -> (TcpListener, std::net::SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

/// Accept one connection, greet, check the auth request and accept it.
async fn accept_authenticated(listener: &TcpListener, expected_request: &[u8]) -> BufReader<TcpStream> {
    let (mut stream, _) = listener.accept().await.unwrap();
    stream.write_all(b"PJ_OK").await.unwrap();
    let mut request = vec![0u8; expected_request.len()];
    stream.read_exact(&mut request).await.unwrap();
    assert_eq!(request, expected_request);
    stream.write_all(b"PJACK").await.unwrap();
    BufReader::new(stream)
}

async fn read_line(stream: &mut BufReader<TcpStream>) -> Vec<u8> {
    let mut line = Vec::new();
    stream.read_until(b'\n', &mut line).await.unwrap();
    line
}

fn power_query() -> Command {
    Command::from_name("power_status.query", b"").unwrap()
}

#[tokio::test]
async fn test_power_query_roundtrip() {
    let (listener, addr) = listen().await;
    let server = tokio::spawn(async move {
        let mut stream = accept_authenticated(&listener, b"PJREQ").await;
        let line = read_line(&mut stream).await;
        stream.write_all(POWER_ACK).await.unwrap();
        stream.write_all(POWER_ON_REPLY).await.unwrap();
        line
    });

    let transport = TcpTransport::connect(addr, None, TIMEOUT).await.unwrap();
    let command = power_query();
    let packets = transport.transact(command.packet()).await.unwrap();
    let response = packets.into_response(command).unwrap();

    assert_eq!(response.response_str(), Some("On"));
    assert_eq!(server.await.unwrap(), POWER_QUERY);

    transport.shutdown(None);
    transport.wait().await.unwrap();
}

#[tokio::test]
async fn test_password_is_appended_to_request() {
    let (listener, addr) = listen().await;
    let server = tokio::spawn(async move {
        accept_authenticated(&listener, b"PJREQ_secret").await;
    });

    let transport = TcpTransport::connect(addr, Some("secret"), TIMEOUT).await.unwrap();
    server.await.unwrap();
    assert!(!transport.is_shutting_down());
}

#[tokio::test]
async fn test_empty_password_is_not_sent() {
    let (listener, addr) = listen().await;
    let server = tokio::spawn(async move {
        accept_authenticated(&listener, b"PJREQ").await;
    });

    TcpTransport::connect(addr, Some(""), TIMEOUT).await.unwrap();
    server.await.unwrap();
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let (listener, addr) = listen().await;
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        stream.write_all(b"PJ_OK").await.unwrap();
        let mut request = [0u8; 11];
        stream.read_exact(&mut request).await.unwrap();
        stream.write_all(b"PJNAK").await.unwrap();
    });

    let err = TcpTransport::connect(addr, Some("wrong"), TIMEOUT).await.unwrap_err();
    assert!(matches!(err, Error::AuthenticationFailed));
}

#[tokio::test]
async fn test_bad_greeting_fails_handshake() {
    let (listener, addr) = listen().await;
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        stream.write_all(b"HELLO").await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
    });

    let err = TcpTransport::connect(addr, None, TIMEOUT).await.unwrap_err();
    assert!(matches!(err, Error::HandshakeFailed(_)));
}

#[tokio::test]
async fn test_unexpected_auth_reply_fails_handshake() {
    let (listener, addr) = listen().await;
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        stream.write_all(b"PJ_OK").await.unwrap();
        let mut request = [0u8; 5];
        stream.read_exact(&mut request).await.unwrap();
        stream.write_all(b"PJERR").await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
    });

    let err = TcpTransport::connect(addr, None, TIMEOUT).await.unwrap_err();
    assert!(matches!(err, Error::HandshakeFailed(_)));
}

#[tokio::test]
async fn test_silent_server_times_out_handshake() {
    let (listener, addr) = listen().await;
    tokio::spawn(async move {
        let (_stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let err = TcpTransport::connect(addr, None, Duration::from_millis(100))
        .await
        .unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_connect_refused() {
    let (listener, addr) = listen().await;
    drop(listener);

    let err = TcpTransport::connect(addr, None, TIMEOUT).await.unwrap_err();
    assert!(matches!(err, Error::Connect { .. }));
}

#[tokio::test]
async fn test_advanced_before_basic_is_fatal() {
    let (listener, addr) = listen().await;
    tokio::spawn(async move {
        let mut stream = accept_authenticated(&listener, b"PJREQ").await;
        read_line(&mut stream).await;
        stream.write_all(POWER_ON_REPLY).await.unwrap();
        stream.write_all(POWER_ACK).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
    });

    let transport = TcpTransport::connect(addr, None, TIMEOUT).await.unwrap();
    let command = power_query();

    let err = transport.transact(command.packet()).await.unwrap_err();
    assert!(matches!(err, Error::ProtocolViolation(_)));
    assert!(transport.is_shutting_down());

    // Every later call fails with the stored error.
    let again = transport.transact(command.packet()).await.unwrap_err();
    assert!(matches!(again, Error::ProtocolViolation(_)));
    assert!(matches!(
        transport.wait().await,
        Err(Error::ProtocolViolation(_))
    ));
}

#[tokio::test]
async fn test_mismatched_response_code_is_fatal() {
    let (listener, addr) = listen().await;
    tokio::spawn(async move {
        let mut stream = accept_authenticated(&listener, b"PJREQ").await;
        read_line(&mut stream).await;
        stream.write_all(b"\x06\x89\x01IP\n").await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
    });

    let transport = TcpTransport::connect(addr, None, TIMEOUT).await.unwrap();
    let err = transport.transact(power_query().packet()).await.unwrap_err();
    assert!(matches!(err, Error::ProtocolViolation(_)));
}

#[tokio::test]
async fn test_peer_close_mid_packet() {
    let (listener, addr) = listen().await;
    tokio::spawn(async move {
        let mut stream = accept_authenticated(&listener, b"PJREQ").await;
        read_line(&mut stream).await;
        stream.write_all(b"\x06\x89\x01P").await.unwrap();
        // Dropping the stream closes the connection.
    });

    let transport = TcpTransport::connect(addr, None, TIMEOUT).await.unwrap();
    let err = transport.transact(power_query().packet()).await.unwrap_err();
    assert!(matches!(err, Error::ConnectionClosed(_)));
}

#[tokio::test]
async fn test_read_timeout_shuts_down() {
    let (listener, addr) = listen().await;
    tokio::spawn(async move {
        let mut stream = accept_authenticated(&listener, b"PJREQ").await;
        read_line(&mut stream).await;
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let transport = TcpTransport::connect(addr, None, Duration::from_millis(100))
        .await
        .unwrap();
    let err = transport.transact(power_query().packet()).await.unwrap_err();
    assert!(err.is_timeout());
    assert!(transport.is_shutting_down());
}

#[tokio::test]
async fn test_shutdown_unblocks_pending_transaction() {
    let (listener, addr) = listen().await;
    tokio::spawn(async move {
        let mut stream = accept_authenticated(&listener, b"PJREQ").await;
        read_line(&mut stream).await;
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    let transport = Arc::new(
        TcpTransport::connect(addr, None, Duration::from_secs(30))
            .await
            .unwrap(),
    );
    let pending = {
        let transport = Arc::clone(&transport);
        tokio::spawn(async move { transport.transact(power_query().packet()).await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    transport.shutdown(None);

    let result = tokio::time::timeout(Duration::from_secs(1), pending)
        .await
        .expect("pending transaction was not unblocked")
        .unwrap();
    assert!(matches!(result, Err(Error::TransportClosed)));
    transport.wait().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_transactions_do_not_interleave() {
    let (listener, addr) = listen().await;
    let server = tokio::spawn(async move {
        let mut stream = accept_authenticated(&listener, b"PJREQ").await;
        let mut lines = Vec::new();
        for _ in 0..2 {
            lines.push(read_line(&mut stream).await);

            // Nothing else may arrive while this exchange is open.
            let mut extra = [0u8; 1];
            let early = tokio::time::timeout(Duration::from_millis(100), stream.read(&mut extra)).await;
            assert!(early.is_err(), "second command sent before first completed");

            stream.write_all(POWER_ACK).await.unwrap();
            stream.write_all(POWER_ON_REPLY).await.unwrap();
        }
        lines
    });

    let transport = Arc::new(TcpTransport::connect(addr, None, TIMEOUT).await.unwrap());
    let tasks: Vec<_> = (0..2)
        .map(|_| {
            let transport = Arc::clone(&transport);
            tokio::spawn(async move { transport.transact(power_query().packet()).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(server.await.unwrap(), vec![POWER_QUERY.to_vec(), POWER_QUERY.to_vec()]);
}

#[tokio::test]
async fn test_transaction_guard_runs_several_exchanges() {
    let (listener, addr) = listen().await;
    tokio::spawn(async move {
        let mut stream = accept_authenticated(&listener, b"PJREQ").await;
        // null command (basic), then power query (advanced)
        read_line(&mut stream).await;
        stream.write_all(b"\x06\x89\x01\x01\x00\n").await.unwrap();
        read_line(&mut stream).await;
        stream.write_all(POWER_ACK).await.unwrap();
        stream.write_all(POWER_ON_REPLY).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
    });

    let transport = TcpTransport::connect(addr, None, TIMEOUT).await.unwrap();
    let transaction = transport.begin_transaction().await;

    let null = Command::from_name("test_command.null_command", b"").unwrap();
    let response = transaction.transact_command(&null).await.unwrap();
    assert!(!response.is_advanced());

    let response = transaction.transact_command(&power_query()).await.unwrap();
    assert_eq!(response.response_str(), Some("On"));
}
