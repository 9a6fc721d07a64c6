//! Listener, bounded worker pool and lifecycle controller.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use tokio::{
    net::{TcpListener, TcpStream},
    sync::{Semaphore, watch},
    task::{JoinHandle, JoinSet},
};

use crate::{
    config::ServerConfig,
    domain::SessionRegistry,
    error::ServerError,
    infrastructure::repository::InMemorySessionRegistry,
    ui::{handler::handle_connection, signal::wait_for_shutdown},
};

const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// A bound, not yet accepting, broadcast server.
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    config: ServerConfig,
    registry: Arc<dyn SessionRegistry>,
}

impl Server {
    /// Bind the configured address with a fresh in-memory registry.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if the address cannot be bound. This is the
    /// only fatal startup failure.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        Self::bind_with_registry(config, Arc::new(InMemorySessionRegistry::new())).await
    }

    /// Bind the configured address using the given registry.
    pub async fn bind_with_registry(
        config: ServerConfig,
        registry: Arc<dyn SessionRegistry>,
    ) -> Result<Self, ServerError> {
        let listener = TcpListener::bind((config.host(), config.port()))
            .await
            .map_err(|source| ServerError::Bind {
                addr: config.bind_address(),
                source,
            })?;
        let local_addr = listener.local_addr()?;

        tracing::info!(
            "Server initialized with worker pool size: {}",
            config.max_workers()
        );

        Ok(Self {
            listener,
            local_addr,
            config,
            registry,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn registry(&self) -> Arc<dyn SessionRegistry> {
        self.registry.clone()
    }

    /// Start the accept loop.
    pub fn start(self) -> ServerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let local_addr = self.local_addr;
        let registry = self.registry.clone();

        tracing::info!("Server started on {}", local_addr);
        tracing::info!("Waiting for client connections...");

        let task = tokio::spawn(accept_loop(
            self.listener,
            self.registry,
            self.config.max_workers(),
            self.config.shutdown_grace(),
            shutdown_rx,
        ));

        ServerHandle {
            shutdown: shutdown_tx,
            task,
            local_addr,
            registry,
        }
    }
}

/// Control handle for a running server.
pub struct ServerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
    local_addr: SocketAddr,
    registry: Arc<dyn SessionRegistry>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn registry(&self) -> Arc<dyn SessionRegistry> {
        self.registry.clone()
    }

    /// Receiver for the running flag; flips to `true` when shutdown starts.
    pub fn subscribe_shutdown(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    /// Flip the running flag. The accept loop stops and releases the
    /// listening socket; use [`ServerHandle::shutdown`] to also wait for the
    /// drain to finish.
    pub fn stop(&self) {
        self.shutdown.send_replace(true);
    }

    /// Stop accepting, close every session and drain the worker pool.
    ///
    /// Once this returns the registry is empty and the address can be bound
    /// again.
    pub async fn shutdown(self) {
        tracing::info!("Shutting down server...");
        self.stop();
        self.wait().await;
    }

    /// Wait for the server task to finish.
    pub async fn wait(self) {
        if let Err(e) = self.task.await {
            tracing::error!("Server task failed: {}", e);
        }
    }
}

async fn accept_loop(
    listener: TcpListener,
    registry: Arc<dyn SessionRegistry>,
    max_workers: usize,
    grace: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let pool = Arc::new(Semaphore::new(max_workers));
    let mut workers = JoinSet::new();

    loop {
        tokio::select! {
            result = listener.accept() => match result {
                Ok((stream, peer_addr)) => {
                    tracing::info!("New client connected from: {}", peer_addr);
                    if pool.available_permits() == 0 {
                        tracing::info!(
                            "Worker pool saturated, {} waits for a free worker",
                            peer_addr
                        );
                    }
                    workers.spawn(run_worker(
                        stream,
                        peer_addr,
                        pool.clone(),
                        registry.clone(),
                        shutdown.clone(),
                    ));
                    tracing::debug!("Active connection handlers: {}", workers.len());
                }
                Err(e) => {
                    if *shutdown.borrow() {
                        break;
                    }
                    tracing::error!("Error accepting client connection: {}", e);
                    if back_off_after_accept_error(&mut shutdown).await {
                        break;
                    }
                }
            },
            _ = wait_for_shutdown(&mut shutdown) => {
                tracing::info!("Server stopped accepting connections");
                break;
            }
            Some(result) = workers.join_next(), if !workers.is_empty() => {
                if let Err(e) = result {
                    tracing::error!("Connection handler failed: {}", e);
                }
            }
        }
    }

    drop(listener);
    tracing::info!("Server socket closed");

    drain(&mut workers, registry.as_ref(), grace).await;
    tracing::info!("Server shutdown complete");
}

/// Pause after a failed accept so a persistent error (e.g. EMFILE) does not
/// spin the loop. Returns `true` if shutdown was requested meanwhile.
async fn back_off_after_accept_error(shutdown: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(ACCEPT_ERROR_BACKOFF) => *shutdown.borrow(),
        _ = wait_for_shutdown(shutdown) => true,
    }
}

/// Wait for a worker slot, then run the connection.
async fn run_worker(
    stream: TcpStream,
    peer_addr: SocketAddr,
    pool: Arc<Semaphore>,
    registry: Arc<dyn SessionRegistry>,
    mut shutdown: watch::Receiver<bool>,
) {
    let permit = tokio::select! {
        permit = pool.acquire_owned() => match permit {
            Ok(permit) => permit,
            Err(_) => return,
        },
        _ = wait_for_shutdown(&mut shutdown) => {
            tracing::debug!("Dropping {} still waiting for a worker", peer_addr);
            return;
        }
    };

    handle_connection(stream, peer_addr, registry, shutdown).await;
    drop(permit);
}

/// Close every session, then give workers `grace` to finish before aborting.
async fn drain(workers: &mut JoinSet<()>, registry: &dyn SessionRegistry, grace: Duration) {
    for session in registry.snapshot().await {
        session.close();
    }

    let drained = tokio::time::timeout(grace, async {
        while workers.join_next().await.is_some() {}
    })
    .await;

    if drained.is_err() {
        tracing::warn!(
            "Worker pool did not terminate in {:?}, forcing shutdown",
            grace
        );
        workers.abort_all();
        while workers.join_next().await.is_some() {}
    } else {
        tracing::info!("Worker pool shut down successfully");
    }

    // sessions whose workers were aborted never ran their teardown
    for session in registry.drain().await {
        session.close();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[tokio::test]
    async fn test_accept_error_backoff_waits() {
        // テスト項目: accept 失敗後は一定時間待ってから再試行する
        // given (前提条件):
        let (_tx, mut rx) = watch::channel(false);

        // when (操作):
        let started = Instant::now();
        let stop = back_off_after_accept_error(&mut rx).await;

        // then (期待する結果):
        assert!(!stop);
        assert!(started.elapsed() >= ACCEPT_ERROR_BACKOFF);
    }

    #[tokio::test]
    async fn test_accept_error_backoff_ends_on_shutdown() {
        // テスト項目: 待機中に停止要求があれば即座に accept ループを抜ける
        // given (前提条件):
        let (tx, mut rx) = watch::channel(false);
        tx.send_replace(true);

        // when (操作):
        let started = Instant::now();
        let stop = back_off_after_accept_error(&mut rx).await;

        // then (期待する結果):
        assert!(stop);
        assert!(started.elapsed() < ACCEPT_ERROR_BACKOFF);
    }
}
