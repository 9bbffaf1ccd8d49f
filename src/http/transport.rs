//! Loopback transport for REST clients.
//!
//! Starts the translating server on a local port and hands back an HTTP
//! client plus the base URL to point a REST client at. The client routes
//! every plain `http://` request to the local server whatever its host, so
//! code holding absolute API URLs works unchanged. `https://` targets are
//! tunnelled instead of proxied and must be rewritten onto `base_url()`.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::TransportConfig;
use crate::error::{TransportError, TransportResult};
use crate::http::server::HttpServer;
use crate::lifecycle::Shutdown;

/// A running loopback server and a client bound to it.
pub struct LocalTransport {
    addr: SocketAddr,
    client: reqwest::Client,
    shutdown: Shutdown,
    task: JoinHandle<Result<(), std::io::Error>>,
}

impl LocalTransport {
    /// Resolve the program, bind the listener and start serving.
    ///
    /// A missing program is reported here, before any request is made.
    pub async fn start(config: TransportConfig) -> TransportResult<Self> {
        let bind_address = config.listener.bind_address.clone();
        let server = HttpServer::new(config)?;

        let listener = TcpListener::bind(&bind_address)
            .await
            .map_err(TransportError::Bind)?;
        let addr = listener.local_addr().map_err(TransportError::Bind)?;

        let client = reqwest::Client::builder()
            .proxy(reqwest::Proxy::http(base_url(addr))?)
            .build()?;

        let shutdown = Shutdown::new();
        let server_shutdown = shutdown.subscribe();
        let task = tokio::spawn(async move { server.run(listener, server_shutdown).await });

        tracing::info!(address = %addr, "Local transport started");

        Ok(Self {
            addr,
            client,
            shutdown,
            task,
        })
    }

    /// Start with the default configuration (`gh` on `PATH`).
    pub async fn start_default() -> TransportResult<Self> {
        Self::start(TransportConfig::default()).await
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL to configure the REST client with.
    pub fn base_url(&self) -> String {
        base_url(self.addr)
    }

    /// Absolute URL for an API path such as `/users/octocat`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }

    /// A client whose `http://` requests all land on the loopback server.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Stop accepting requests and wait for in-flight ones to finish.
    pub async fn shutdown(self) -> Result<(), std::io::Error> {
        self.shutdown.trigger();
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(std::io::Error::other(e)),
        }
    }
}

fn base_url(addr: SocketAddr) -> String {
    format!("http://{addr}")
}
