//! Process bridge — talks to a `the-circle serve` host over its stdio.
//!
//! Spawns the host as a child, writes one request line to its stdin and
//! reads lines from its stdout until a response parses. Calls are
//! serialized: one request in flight at a time.

use std::path::Path;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, ChildStdout};
use tokio::sync::Mutex;

use super::{Bridge, BridgeError, Request, Response};

struct Pipes {
    child: Child,
    stdin: BufWriter<ChildStdin>,
    stdout: BufReader<ChildStdout>,
}

pub struct ProcessBridge {
    pipes: Mutex<Pipes>,
}

impl ProcessBridge {
    /// Spawn the host (usually `the-circle serve`) and wire up its pipes.
    pub fn spawn(program: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<Self, BridgeError> {
        let mut cmd = tokio::process::Command::new(program);
        cmd.args(args)
            .envs(envs.iter().copied())
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            BridgeError::Disconnected(format!("Failed to spawn {}: {}", program.display(), e))
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| BridgeError::Disconnected("No stdin for bridge host".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BridgeError::Disconnected("No stdout for bridge host".into()))?;

        log::info!("[BRIDGE] Spawned host {}", program.display());
        Ok(Self {
            pipes: Mutex::new(Pipes {
                child,
                stdin: BufWriter::new(stdin),
                stdout: BufReader::new(stdout),
            }),
        })
    }

    /// Close stdin, give the host a moment to exit, then kill it.
    pub async fn shutdown(&self) {
        let mut pipes = self.pipes.lock().await;
        let _ = pipes.stdin.shutdown().await;

        match tokio::time::timeout(std::time::Duration::from_secs(3), pipes.child.wait()).await {
            Ok(Ok(status)) => log::info!("[BRIDGE] Host exited: {}", status),
            _ => {
                log::warn!("[BRIDGE] Host did not exit, killing");
                let _ = pipes.child.kill().await;
            }
        }
    }
}

#[async_trait]
impl Bridge for ProcessBridge {
    async fn send(&self, request: Request) -> Result<Response, BridgeError> {
        let mut pipes = self.pipes.lock().await;

        let mut line = serde_json::to_string(&request)?;
        line.push('\n');
        pipes
            .stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| BridgeError::Disconnected(format!("stdin write failed: {}", e)))?;
        pipes
            .stdin
            .flush()
            .await
            .map_err(|e| BridgeError::Disconnected(format!("stdin flush failed: {}", e)))?;

        let mut line = String::new();
        loop {
            line.clear();
            let n = pipes
                .stdout
                .read_line(&mut line)
                .await
                .map_err(|e| BridgeError::Disconnected(format!("stdout read failed: {}", e)))?;
            if n == 0 {
                return Err(BridgeError::Disconnected("host closed stdout".into()));
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<Response>(trimmed) {
                Ok(response) => return Ok(response),
                Err(_) => {
                    log::debug!(
                        "[BRIDGE] Ignoring non-response line: {}",
                        crate::text::truncate_chars(trimmed, 100)
                    );
                }
            }
        }
    }
}
