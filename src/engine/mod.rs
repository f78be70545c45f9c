//! Cube execution module.
//!
//! Queries run through a bridge subprocess that owns the ADOMD/XMLA
//! connection to the cube server:
//!
//! - [`client`] - async NDJSON client for the bridge process
//! - [`protocol`] - request/response envelope types
//! - [`error`] - bridge error types
//!
//! The [`CubeExecutor`] trait is the seam the web layer depends on, so
//! handlers can be exercised without a live bridge.

pub mod client;
pub mod error;
pub mod protocol;

pub use client::BridgeClient;
pub use error::{EngineError, EngineResult};
pub use protocol::ConnectionParams;

use async_trait::async_trait;

use crate::result::Table;

/// Something that can run MDX against a cube.
#[async_trait]
pub trait CubeExecutor: Send + Sync {
    /// Execute a query and fetch the raw table.
    async fn execute(&self, mdx: &str) -> EngineResult<Table>;

    /// Probe connectivity to the cube server.
    async fn ping(&self) -> EngineResult<bool>;
}

/// A [`BridgeClient`] bound to one cube connection.
pub struct BridgeExecutor {
    client: BridgeClient,
    connection: ConnectionParams,
}

impl BridgeExecutor {
    pub fn new(client: BridgeClient, connection: ConnectionParams) -> Self {
        Self { client, connection }
    }

    /// The connection this executor targets.
    pub fn connection(&self) -> &ConnectionParams {
        &self.connection
    }
}

#[async_trait]
impl CubeExecutor for BridgeExecutor {
    async fn execute(&self, mdx: &str) -> EngineResult<Table> {
        self.client.execute_mdx(&self.connection, mdx).await
    }

    async fn ping(&self) -> EngineResult<bool> {
        self.client.ping(&self.connection).await
    }
}
