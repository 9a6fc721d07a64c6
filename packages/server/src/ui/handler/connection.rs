//! Per-connection handler: handshake, receive loop and teardown.

use std::{net::SocketAddr, sync::Arc};

use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::TcpStream,
    sync::{mpsc, watch},
};

use crate::{
    domain::{OUTBOUND_QUEUE_CAPACITY, SessionRegistry},
    ui::signal::wait_for_shutdown,
    usecase::{BroadcastUseCase, HandshakeError, JoinSessionUseCase, LeaveSessionUseCase},
};

/// Drive one accepted connection until it disconnects or is closed.
///
/// The first Frame is the identity. A connection that closes before sending
/// it, or sends a blank one, is dropped without registration or notice.
pub async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    registry: Arc<dyn SessionRegistry>,
    mut shutdown: watch::Receiver<bool>,
) {
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    // Handshake: exactly one Frame
    let first = tokio::select! {
        line = lines.next_line() => line,
        _ = wait_for_shutdown(&mut shutdown) => {
            tracing::debug!("Shutdown during handshake with {}", peer_addr);
            return;
        }
    };
    let identity_line = match first {
        Ok(Some(line)) => line,
        Ok(None) => {
            tracing::warn!("{} ({})", HandshakeError::ConnectionClosed, peer_addr);
            return;
        }
        Err(e) => {
            tracing::warn!("Error reading handshake from {}: {}", peer_addr, e);
            return;
        }
    };

    let (tx, mut rx) = mpsc::channel::<String>(OUTBOUND_QUEUE_CAPACITY);
    let session = match JoinSessionUseCase::new(registry.clone())
        .execute(identity_line, peer_addr, tx)
        .await
    {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!("Client connected without username ({}): {}", peer_addr, e);
            return;
        }
    };

    let leave_usecase = LeaveSessionUseCase::new(registry.clone());

    // Registered after shutdown already closed every session
    if *shutdown.borrow() {
        leave_usecase.execute(&session).await;
        return;
    }

    let broadcast_usecase = BroadcastUseCase::new(registry);

    let receive = async {
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    tracing::debug!("Message from '{}': {}", session.identity(), line);
                    broadcast_usecase.execute(&line, session.identity()).await;
                }
                Ok(None) => {
                    tracing::info!("Client '{}' disconnected", session.identity());
                    break;
                }
                Err(e) => {
                    tracing::warn!(
                        "Error reading message from client '{}': {}",
                        session.identity(),
                        e
                    );
                    break;
                }
            }
        }
    };

    // Single writer for this session's stream
    let send = async {
        while let Some(frame) = rx.recv().await {
            write_half.write_all(format!("{}\n", frame).as_bytes()).await?;
            write_half.flush().await?;
        }
        Ok::<(), std::io::Error>(())
    };

    tokio::select! {
        _ = receive => {},
        result = send => {
            if let Err(e) = result {
                tracing::warn!("Error sending data to client '{}': {}", session.identity(), e);
            }
        }
        _ = session.closed() => {
            tracing::debug!("Session '{}' closed", session.identity());
        }
    }

    leave_usecase.execute(&session).await;
    tracing::debug!("All resources closed for client '{}'", session.identity());
}
