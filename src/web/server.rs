//! WebSocket server broadcasting the live game session.

use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, Mutex};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::session::{GameSession, SessionCommand, SessionError, SessionEvent};

/// Messages pushed to clients.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage<'a> {
    GameState { state: &'a GameSession },
    Error { message: String },
}

/// Owns the live game and the channel that fans updates out to clients.
pub struct LiveServer {
    session: Mutex<GameSession>,
    updates: broadcast::Sender<String>,
}

impl LiveServer {
    pub fn new(session: GameSession) -> Self {
        let (updates, _) = broadcast::channel(100);
        Self {
            session: Mutex::new(session),
            updates,
        }
    }

    /// Receive every update broadcast from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.updates.subscribe()
    }

    /// Current game state as a `gameState` message.
    pub async fn state_json(&self) -> String {
        let session = self.session.lock().await;
        encode(&ServerMessage::GameState { state: &session })
    }

    /// Apply an admin command and broadcast the new state plus its events.
    pub async fn handle_command(&self, command: SessionCommand) -> Result<(), SessionError> {
        let mut session = self.session.lock().await;
        let events = apply_command(&mut session, &command)?;
        if events.is_empty() && command == SessionCommand::UndoNumber {
            return Ok(());
        }

        // No subscribers is fine
        let _ = self
            .updates
            .send(encode(&ServerMessage::GameState { state: &session }));
        for event in &events {
            let _ = self.updates.send(encode(event));
        }
        Ok(())
    }
}

fn apply_command(
    session: &mut GameSession,
    command: &SessionCommand,
) -> Result<Vec<SessionEvent>, SessionError> {
    let mut rng = rand::thread_rng();
    session.apply(command, &mut rng)
}

fn encode<T: Serialize>(message: &T) -> String {
    serde_json::to_string(message).unwrap_or_else(|_| "{}".to_string())
}

/// Start the server on the given port
pub async fn start_live_server(port: u16, server: Arc<LiveServer>) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    info!("Live caller listening on ws://localhost:{}", port);

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let server = Arc::clone(&server);
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, addr, server).await {
                        warn!("Connection error from {}: {}", addr, e);
                    }
                });
            }
            Err(e) => {
                warn!("Accept error: {}", e);
            }
        }
    }
}

/// Handle a single client connection
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    server: Arc<LiveServer>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Plain HTTP requests get a JSON snapshot instead of a socket
    let mut peek_buf = [0u8; 1024];
    let n = stream.peek(&mut peek_buf).await?;
    let request = String::from_utf8_lossy(&peek_buf[..n]).to_ascii_lowercase();
    if request.starts_with("get ") && !request.contains("upgrade: websocket") {
        serve_state(stream, &server).await?;
        return Ok(());
    }

    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let client_id = Uuid::new_v4();
    info!(%client_id, "Client connected from {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Subscribe before sending the snapshot so no update falls in between
    let mut updates = server.subscribe();
    ws_sender.send(Message::Text(server.state_json().await)).await?;

    let (reply_tx, mut reply_rx) = tokio::sync::mpsc::channel::<String>(16);

    // Forward broadcasts and direct replies to this client
    let send_task = tokio::spawn(async move {
        loop {
            let text = tokio::select! {
                update = updates.recv() => match update {
                    Ok(text) => text,
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                },
                reply = reply_rx.recv() => match reply {
                    Some(text) => text,
                    None => break,
                },
            };
            if ws_sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let result = match serde_json::from_str::<SessionCommand>(&text) {
                    Ok(command) => {
                        debug!(%client_id, ?command, "Command received");
                        server.handle_command(command).await.map_err(|e| e.to_string())
                    }
                    Err(e) => Err(format!("unrecognised command: {}", e)),
                };
                if let Err(message) = result {
                    warn!(%client_id, "Rejected command: {}", message);
                    let _ = reply_tx.send(encode(&ServerMessage::Error { message })).await;
                }
            }
            Ok(Message::Close(_)) => break,
            Err(_) => break,
            _ => {}
        }
    }

    send_task.abort();
    info!(%client_id, "Client disconnected");

    Ok(())
}

/// Answer a plain HTTP request with the current state
async fn serve_state(mut stream: TcpStream, server: &LiveServer) -> std::io::Result<()> {
    let body = server.state_json().await;
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );

    stream.write_all(response.as_bytes()).await?;
    Ok(())
}
