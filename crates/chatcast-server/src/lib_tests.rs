use super::*;

#[test]
fn test_chat_server_creation() {
    let server = ChatServer::new(ServerConfig::new("127.0.0.1", 3000));
    assert_eq!(server.address(), "127.0.0.1:3000");
    assert!(!server.is_started());
    assert_eq!(server.connection_count(), 0);
    assert!(server.local_addr().is_none());
}

#[test]
fn test_chat_server_default_config() {
    let server = ChatServer::new(ServerConfig::default());
    assert_eq!(server.address(), "0.0.0.0:3000");
}

#[test]
fn test_state_creation() {
    let (state, _events) = ChatServerState::new();
    assert!(state.registry.is_empty());
    assert!(!state.is_started());
    assert!(!state.shutdown_token().is_cancelled());
}

#[test]
fn test_dispatch_fails_without_loop() {
    let (state, events) = ChatServerState::new();
    drop(events);
    let result = state.dispatch(DispatchEvent::Disconnect {
        id: "abc".into(),
    });
    assert!(matches!(result, Err(ChannelError::Disconnected)));
}

#[tokio::test]
async fn test_start_binds_ephemeral_port() {
    let server = ChatServer::new(ServerConfig::new("127.0.0.1", 0));
    let addr = server.start().await.unwrap();
    assert_ne!(addr.port(), 0);
    assert!(server.is_started());
    assert_eq!(server.local_addr(), Some(addr));

    // Second start is a no-op returning the same address
    assert_eq!(server.start().await.unwrap(), addr);

    server.stop().await.unwrap();
    assert!(!server.is_started());
}

#[tokio::test]
async fn test_stop_cancels_shutdown_token() {
    let server = ChatServer::new(ServerConfig::new("127.0.0.1", 0));
    server.start().await.unwrap();
    let token = server.state().shutdown_token();
    assert!(!token.is_cancelled());

    server.stop().await.unwrap();
    assert!(token.is_cancelled());
}

#[tokio::test]
async fn test_stop_when_not_started() {
    let server = ChatServer::new(ServerConfig::default());
    assert!(server.stop().await.is_ok());
}

#[tokio::test]
async fn test_start_fails_when_port_taken() {
    let first = ChatServer::new(ServerConfig::new("127.0.0.1", 0));
    let addr = first.start().await.unwrap();

    let second = ChatServer::new(ServerConfig::new("127.0.0.1", addr.port()));
    let result = second.start().await;
    assert!(matches!(result, Err(ChannelError::ConnectionFailed(_))));
    assert!(!second.is_started());

    first.stop().await.unwrap();
}
