//! Async client for the cube bridge process.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::{oneshot, Mutex};

use super::error::{EngineError, EngineResult};
use super::protocol::{
    methods, ConnectionParams, ErrorInfo, ExecuteParams, ExecuteResponse, PingParams,
    PingResponse, RequestEnvelope, ResponseEnvelope,
};
use crate::config::Settings;
use crate::result::Table;

/// Default timeout for requests (30 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Async client for the cube bridge.
///
/// The client spawns the bridge as a child process and communicates via
/// NDJSON (newline-delimited JSON) over stdin/stdout. Each request has a
/// unique ID for correlation with responses, so concurrent requests share
/// one bridge process while the bridge keeps cube sessions per request.
///
/// # Example
///
/// ```ignore
/// use cubist::engine::BridgeClient;
///
/// let client = BridgeClient::spawn("./cubist-bridge").await?;
/// let table = client.execute_mdx(&connection, "SELECT ...").await?;
/// ```
pub struct BridgeClient {
    /// Writer for sending requests to bridge stdin.
    stdin: Arc<Mutex<BufWriter<ChildStdin>>>,

    /// Map of pending request IDs to response channels.
    pending: Arc<Mutex<HashMap<String, oneshot::Sender<ResponseEnvelope>>>>,

    /// Handle to the bridge child process.
    _child: Child,

    /// Handle to the background reader task.
    _reader_task: tokio::task::JoinHandle<()>,

    /// Request timeout duration.
    timeout: Duration,
}

impl BridgeClient {
    /// Spawn a new bridge process.
    ///
    /// # Errors
    ///
    /// Returns an error if the bridge process cannot be spawned.
    pub async fn spawn<P: AsRef<Path>>(bridge_path: P) -> EngineResult<Self> {
        Self::spawn_with_timeout(bridge_path, Duration::from_secs(DEFAULT_TIMEOUT_SECS)).await
    }

    /// Spawn a bridge using settings configuration: the configured path
    /// first, common locations as fallback.
    pub async fn spawn_with_settings(settings: &Settings) -> EngineResult<Self> {
        let bridge_path = Self::resolve_bridge_path(settings)?;
        let timeout = Duration::from_secs(settings.bridge.timeout_secs);
        Self::spawn_with_timeout(&bridge_path, timeout).await
    }

    /// Resolve the bridge binary path from settings.
    fn resolve_bridge_path(settings: &Settings) -> EngineResult<PathBuf> {
        if let Some(path) = settings.bridge_path() {
            return Ok(path);
        }

        // Search common locations
        let candidates = [
            "cubist-bridge",
            "./cubist-bridge",
            "./bridge/cubist-bridge",
        ];

        for candidate in candidates {
            let path = PathBuf::from(candidate);
            if path.exists() {
                return Ok(path);
            }
        }

        // Try PATH
        if let Ok(output) = std::process::Command::new("which")
            .arg("cubist-bridge")
            .output()
        {
            if output.status.success() {
                let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path.is_empty() {
                    return Ok(PathBuf::from(path));
                }
            }
        }

        Err(EngineError::SpawnFailed(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Bridge binary not found. Set bridge.path in cubist.toml",
        )))
    }

    /// Spawn a new bridge process with a custom request timeout.
    pub async fn spawn_with_timeout<P: AsRef<Path>>(
        bridge_path: P,
        timeout: Duration,
    ) -> EngineResult<Self> {
        let mut child = Command::new(bridge_path.as_ref())
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(EngineError::SpawnFailed)?;

        let stdin = child.stdin.take().expect("stdin not captured");
        let stdout = child.stdout.take().expect("stdout not captured");

        let stdin = Arc::new(Mutex::new(BufWriter::new(stdin)));
        let pending: Arc<Mutex<HashMap<String, oneshot::Sender<ResponseEnvelope>>>> =
            Arc::new(Mutex::new(HashMap::new()));

        // Spawn background reader task
        let reader_task = Self::spawn_reader_task(stdout, pending.clone());

        Ok(Self {
            stdin,
            pending,
            _child: child,
            _reader_task: reader_task,
            timeout,
        })
    }

    /// Spawn the background task that reads responses from the bridge.
    fn spawn_reader_task(
        stdout: ChildStdout,
        pending: Arc<Mutex<HashMap<String, oneshot::Sender<ResponseEnvelope>>>>,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut reader = BufReader::new(stdout);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        // EOF - bridge exited
                        break;
                    }
                    Ok(_) => match serde_json::from_str::<ResponseEnvelope>(&line) {
                        Ok(resp) => {
                            let mut pending = pending.lock().await;
                            if let Some(tx) = pending.remove(&resp.id) {
                                let _ = tx.send(resp);
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "bridge: failed to parse response");
                        }
                    },
                    Err(e) => {
                        tracing::warn!(error = %e, "bridge: read error");
                        break;
                    }
                }
            }

            // Bridge exited - fail all pending requests so no caller hangs
            let mut pending = pending.lock().await;
            for (id, tx) in pending.drain() {
                let error_response = ResponseEnvelope {
                    id,
                    success: false,
                    result: None,
                    error: Some(ErrorInfo {
                        code: "BRIDGE_EXITED".to_string(),
                        message: "Bridge process exited unexpectedly".to_string(),
                    }),
                };
                let _ = tx.send(error_response);
            }
        })
    }

    /// Send a request to the bridge and wait for its response.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails, writing fails, the request
    /// times out, the bridge returns an error response, or the response
    /// cannot be deserialized.
    pub async fn request<P, R>(&self, method: &str, params: P) -> EngineResult<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let id = uuid::Uuid::new_v4().to_string();

        let request = RequestEnvelope {
            id: id.clone(),
            method: method.to_string(),
            params: serde_json::to_value(params).map_err(EngineError::SerializeFailed)?,
        };

        // Register response channel
        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().await;
            pending.insert(id.clone(), tx);
        }

        // Send request
        {
            let mut stdin = self.stdin.lock().await;
            let line =
                serde_json::to_string(&request).map_err(EngineError::SerializeFailed)? + "\n";
            stdin
                .write_all(line.as_bytes())
                .await
                .map_err(EngineError::WriteFailed)?;
            stdin.flush().await.map_err(EngineError::WriteFailed)?;
        }

        // Wait for response with timeout
        let response = match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(resp)) => resp,
            Ok(Err(_)) => {
                // Channel closed - bridge exited
                return Err(EngineError::ChannelClosed);
            }
            Err(_) => {
                // Timeout - clean up pending request to prevent a leak
                let mut pending = self.pending.lock().await;
                pending.remove(&id);
                return Err(EngineError::Timeout(self.timeout.as_secs()));
            }
        };

        // Process response
        if response.success {
            let result = response.result.unwrap_or(serde_json::Value::Null);
            serde_json::from_value(result).map_err(EngineError::DeserializeFailed)
        } else {
            let error = response.error.unwrap_or_else(|| ErrorInfo {
                code: "UNKNOWN".to_string(),
                message: "Unknown error".to_string(),
            });
            Err(Self::classify_error(&error.code, &error.message))
        }
    }

    /// Classify a bridge error into a more specific error type.
    fn classify_error(code: &str, message: &str) -> EngineError {
        match code {
            "CONNECTION_FAILED" => EngineError::ConnectionFailed(message.to_string()),
            "CATALOG_NOT_FOUND" => EngineError::CatalogNotFound(message.to_string()),
            "QUERY_FAILED" => EngineError::QueryFailed(message.to_string()),
            "INVALID_REQUEST" => EngineError::InvalidRequest(message.to_string()),
            "BRIDGE_EXITED" => EngineError::BridgeExited,
            _ => EngineError::remote(code, message),
        }
    }

    /// Check if the bridge is still running.
    pub fn is_alive(&self) -> bool {
        // If the reader task has finished, the bridge has exited
        !self._reader_task.is_finished()
    }

    /// Get the current request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

// Convenience methods for the bridge's methods
impl BridgeClient {
    /// Execute an MDX query and fetch the raw table.
    pub async fn execute_mdx(
        &self,
        connection: &ConnectionParams,
        mdx: &str,
    ) -> EngineResult<Table> {
        let response: ExecuteResponse = self
            .request(
                methods::EXECUTE,
                ExecuteParams {
                    connection: connection.clone(),
                    mdx: mdx.to_string(),
                },
            )
            .await?;
        Ok(response.into())
    }

    /// Probe connectivity to the cube server.
    pub async fn ping(&self, connection: &ConnectionParams) -> EngineResult<bool> {
        let response: PingResponse = self
            .request(
                methods::PING,
                PingParams {
                    connection: connection.clone(),
                },
            )
            .await?;
        Ok(response.ok)
    }
}
