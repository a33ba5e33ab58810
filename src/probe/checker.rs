// src/probe/checker.rs
use crate::config::{Protocol, ServiceTarget};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tokio::net::TcpStream;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("connect failed: {0}")]
    Connect(#[from] std::io::Error),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(StatusCode),
}

/// A single reachability check against one target.
#[async_trait]
pub trait Probe: Send + Sync {
    fn target(&self) -> &ServiceTarget;

    async fn check(&self) -> Result<(), ProbeError>;
}

pub struct TcpProbe {
    target: ServiceTarget,
}

impl TcpProbe {
    pub fn new(target: ServiceTarget) -> Self {
        Self { target }
    }
}

#[async_trait]
impl Probe for TcpProbe {
    fn target(&self) -> &ServiceTarget {
        &self.target
    }

    async fn check(&self) -> Result<(), ProbeError> {
        let stream = TcpStream::connect(self.target.endpoint()).await?;
        drop(stream);
        Ok(())
    }
}

pub struct HttpProbe {
    target: ServiceTarget,
    client: Client,
}

impl HttpProbe {
    pub fn new(target: ServiceTarget, client: Client) -> Self {
        Self { target, client }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    fn target(&self) -> &ServiceTarget {
        &self.target
    }

    async fn check(&self) -> Result<(), ProbeError> {
        let response = self.client.get(self.target.endpoint()).send().await?;
        let status = response.status();

        // Release the connection without reading the body; a streaming
        // endpoint may never finish it.
        drop(response);

        if (200..400).contains(&status.as_u16()) {
            Ok(())
        } else {
            Err(ProbeError::Status(status))
        }
    }
}

/// Pick the check matching the target's protocol. HTTP probes share one
/// client and its connection pool.
pub fn probe_for(target: ServiceTarget, client: &Client) -> Arc<dyn Probe> {
    match target.protocol() {
        Protocol::Tcp => Arc::new(TcpProbe::new(target)),
        Protocol::Http | Protocol::Https => Arc::new(HttpProbe::new(target, client.clone())),
    }
}
