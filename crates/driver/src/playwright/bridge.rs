//! Node.js bridge process and its line-delimited JSON protocol

use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::{oneshot, Mutex as AsyncMutex};
use tracing::{debug, trace, warn};

use crate::error::{DriverError, DriverResult};

const BRIDGE_SCRIPT: &str = include_str!("bridge.js");

/// Grace period between closing stdin and signalling the process
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

type Pending = Arc<Mutex<HashMap<u64, oneshot::Sender<Reply>>>>;

#[derive(Debug, Serialize)]
pub(crate) struct Request<'a, P> {
    pub id: u64,
    pub method: &'a str,
    pub params: P,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Reply {
    pub id: u64,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<RemoteError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RemoteError {
    pub name: String,
    pub message: String,
}

impl From<RemoteError> for DriverError {
    fn from(err: RemoteError) -> Self {
        match err.name.as_str() {
            "TimeoutError" => DriverError::Timeout(err.message),
            "HandleError" => DriverError::Closed(err.message),
            _ => DriverError::Remote {
                name: err.name,
                message: err.message,
            },
        }
    }
}

impl Reply {
    pub(crate) fn into_result<R: DeserializeOwned>(self) -> DriverResult<R> {
        if let Some(error) = self.error {
            return Err(error.into());
        }
        let value = self.result.unwrap_or(serde_json::Value::Null);
        Ok(serde_json::from_value(value)?)
    }
}

/// One Node.js process hosting one Playwright browser
pub(crate) struct Bridge {
    stdin: AsyncMutex<Option<ChildStdin>>,
    child: AsyncMutex<Option<Child>>,
    pending: Pending,
    next_id: AtomicU64,
    // Holds the script file for the lifetime of the process
    _script_dir: tempfile::TempDir,
}

impl Bridge {
    /// Spawn `node` running the bridge script
    pub(crate) async fn spawn(node: &Path, node_modules: &Path) -> DriverResult<Arc<Self>> {
        let script_dir = tempfile::tempdir()?;
        let script_path = script_dir.path().join("bridge.js");
        std::fs::write(&script_path, BRIDGE_SCRIPT)?;

        debug!("Spawning Playwright bridge: {}", script_path.display());

        let mut child = Command::new(node)
            .arg(&script_path)
            .env("NODE_PATH", node_modules)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                DriverError::Unavailable(format!("failed to spawn {}: {}", node.display(), e))
            })?;

        let stdin = child.stdin.take();
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DriverError::Protocol("bridge stdout not captured".to_string()))?;
        let stderr = child.stderr.take();

        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));

        let reader_pending = Arc::clone(&pending);
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        trace!("bridge <- {}", line);
                        match serde_json::from_str::<Reply>(&line) {
                            Ok(reply) => {
                                if let Some(tx) = reader_pending.lock().remove(&reply.id) {
                                    let _ = tx.send(reply);
                                }
                            }
                            Err(e) => warn!("Unparsable bridge reply: {}", e),
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        warn!("Bridge stdout read failed: {}", e);
                        break;
                    }
                }
            }
            // Dropping the senders fails every in-flight call with Closed
            reader_pending.lock().clear();
        });

        if let Some(stderr) = stderr {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!("[bridge] {}", line);
                }
            });
        }

        Ok(Arc::new(Self {
            stdin: AsyncMutex::new(stdin),
            child: AsyncMutex::new(Some(child)),
            pending,
            next_id: AtomicU64::new(1),
            _script_dir: script_dir,
        }))
    }

    /// Send one request and wait for its reply
    pub(crate) async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> DriverResult<R> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let line = serde_json::to_string(&Request { id, method, params })?;
        trace!("bridge -> {}", line);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);

        if let Err(e) = self.write_line(&line).await {
            self.pending.lock().remove(&id);
            return Err(e);
        }

        let reply = rx
            .await
            .map_err(|_| DriverError::Closed(format!("bridge exited during {}", method)))?;
        reply.into_result()
    }

    async fn write_line(&self, line: &str) -> DriverResult<()> {
        let mut guard = self.stdin.lock().await;
        let stdin = guard
            .as_mut()
            .ok_or_else(|| DriverError::Closed("bridge stdin closed".to_string()))?;
        stdin.write_all(line.as_bytes()).await?;
        stdin.write_all(b"\n").await?;
        stdin.flush().await?;
        Ok(())
    }

    /// Stop the bridge process
    pub(crate) async fn shutdown(&self) -> DriverResult<()> {
        // EOF on stdin asks the bridge to close its browsers and exit
        self.stdin.lock().await.take();

        let Some(mut child) = self.child.lock().await.take() else {
            return Ok(());
        };

        if let Ok(status) = tokio::time::timeout(SHUTDOWN_GRACE, child.wait()).await {
            debug!("Bridge exited: {:?}", status?);
            return Ok(());
        }

        // Try a graceful stop before killing
        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            if let Some(pid) = child.id() {
                warn!("Bridge did not exit in time, sending SIGTERM (pid: {})", pid);
                if kill(Pid::from_raw(pid as i32), Signal::SIGTERM).is_ok()
                    && tokio::time::timeout(Duration::from_millis(500), child.wait())
                        .await
                        .is_ok()
                {
                    return Ok(());
                }
            }
        }

        child.kill().await?;
        Ok(())
    }
}
