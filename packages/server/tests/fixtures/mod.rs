//! Shared test fixtures: a real server on an ephemeral port and raw TCP clients.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use hiroba_server::{
    Server, ServerConfig, ServerHandle, domain::SessionRegistry, ui::{bind_admin, spawn_admin},
};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines},
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    task::JoinHandle,
};

/// How long a client waits for an expected line.
pub const RECV_TIMEOUT: Duration = Duration::from_secs(3);

pub struct TestServer {
    handle: ServerHandle,
    admin: Option<JoinHandle<()>>,
    admin_addr: Option<SocketAddr>,
}

impl TestServer {
    pub fn config(max_workers: u32) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_workers,
            shutdown_grace_secs: 2,
            admin_port: None,
        }
    }

    pub async fn start() -> Self {
        Self::start_with(Self::config(50)).await
    }

    pub async fn start_with_workers(max_workers: u32) -> Self {
        Self::start_with(Self::config(max_workers)).await
    }

    pub async fn start_with(config: ServerConfig) -> Self {
        let server = Server::bind(config).await.expect("Failed to bind server");
        Self {
            handle: server.start(),
            admin: None,
            admin_addr: None,
        }
    }

    pub async fn start_with_registry(
        config: ServerConfig,
        registry: Arc<dyn SessionRegistry>,
    ) -> Self {
        let server = Server::bind_with_registry(config, registry)
            .await
            .expect("Failed to bind server");
        Self {
            handle: server.start(),
            admin: None,
            admin_addr: None,
        }
    }

    pub async fn start_with_admin() -> Self {
        let mut server = Self::start().await;
        let listener = bind_admin("127.0.0.1", 0)
            .await
            .expect("Failed to bind admin API");
        server.admin_addr = Some(listener.local_addr().unwrap());
        server.admin = Some(spawn_admin(
            listener,
            server.handle.registry(),
            server.handle.subscribe_shutdown(),
        ));
        server
    }

    pub fn addr(&self) -> SocketAddr {
        self.handle.local_addr()
    }

    pub fn admin_base_url(&self) -> String {
        format!("http://{}", self.admin_addr.expect("admin API not started"))
    }

    pub fn registry(&self) -> Arc<dyn SessionRegistry> {
        self.handle.registry()
    }

    /// Poll until the registry holds exactly `expected` sessions.
    pub async fn wait_for_count(&self, expected: usize) {
        let registry = self.registry();
        tokio::time::timeout(RECV_TIMEOUT, async {
            while registry.count().await != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("registry never reached {} sessions", expected));
    }

    /// Poll until the registry holds exactly `expected`, in order.
    pub async fn wait_for_identities(&self, expected: &[&str]) {
        tokio::time::timeout(RECV_TIMEOUT, async {
            while self.identities().await != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("registry never became {:?}", expected));
    }

    /// Identities in registry order.
    pub async fn identities(&self) -> Vec<String> {
        self.registry()
            .snapshot()
            .await
            .iter()
            .map(|s| s.identity().as_str().to_string())
            .collect()
    }

    pub async fn shutdown(self) {
        self.handle.shutdown().await;
        if let Some(admin) = self.admin {
            admin.await.unwrap();
        }
    }
}

pub struct TestClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr)
            .await
            .expect("Failed to connect");
        let (reader, writer) = stream.into_split();
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
        }
    }

    /// Connect and send `name` as the handshake Frame.
    pub async fn join(addr: SocketAddr, name: &str) -> Self {
        let mut client = Self::connect(addr).await;
        client.send_line(name).await;
        client
    }

    pub async fn send_line(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .expect("Failed to send line");
    }

    /// Next line, or `None` on end of stream.
    pub async fn recv_line(&mut self) -> Option<String> {
        tokio::time::timeout(RECV_TIMEOUT, self.lines.next_line())
            .await
            .expect("Timed out waiting for a line")
            .unwrap_or(None)
    }

    /// Assert that nothing arrives within `wait`.
    pub async fn expect_silence(&mut self, wait: Duration) {
        if let Ok(line) = tokio::time::timeout(wait, self.lines.next_line()).await {
            panic!("expected silence, got {:?}", line);
        }
    }

    /// Collect lines until the server closes the stream.
    pub async fn recv_until_closed(&mut self) -> Vec<String> {
        let mut received = Vec::new();
        while let Some(line) = self.recv_line().await {
            received.push(line);
        }
        received
    }

    pub async fn close(mut self) {
        let _ = self.writer.shutdown().await;
    }

    /// Abort the connection with a TCP reset instead of a clean close.
    pub fn reset(self) {
        let stream = self
            .lines
            .into_inner()
            .into_inner()
            .reunite(self.writer)
            .expect("halves of the same stream");
        stream
            .set_linger(Some(Duration::ZERO))
            .expect("Failed to set SO_LINGER");
        drop(stream);
    }
}
