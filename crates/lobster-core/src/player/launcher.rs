//! Process launching

use super::Invocation;
use crate::{Error, Result};
use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::{info, warn};

/// Starts a player invocation
#[async_trait]
pub trait Launcher: Send + Sync {
    /// Run `invocation` to completion
    async fn launch(&self, invocation: &Invocation) -> Result<()>;
}

/// Spawns the player as a child process and waits for it.
///
/// The child shares the terminal. An interrupt while waiting kills the
/// child and reports [`Error::Interrupted`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Launcher for ProcessLauncher {
    async fn launch(&self, invocation: &Invocation) -> Result<()> {
        let program = invocation.program.clone();

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::Spawn {
                program: program.clone(),
                source,
            })?;

        info!(program = %program, pid = ?child.id(), "Player started");

        tokio::select! {
            status = child.wait() => {
                let status = status.map_err(|source| Error::Spawn {
                    program: program.clone(),
                    source,
                })?;
                check_status(&program, status)
            }
            Ok(()) = tokio::signal::ctrl_c() => {
                warn!(program = %program, "Interrupt received, stopping player");
                if let Err(e) = child.kill().await {
                    warn!(error = %e, "Failed to kill player");
                }
                Err(Error::Interrupted { program })
            }
        }
    }
}

fn check_status(program: &str, status: ExitStatus) -> Result<()> {
    if status.success() {
        info!(program = %program, "Player exited");
        Ok(())
    } else {
        Err(Error::PlayerExit {
            program: program.to_string(),
            status: status.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let inv = Invocation::new("lobster-test-no-such-player").arg("http://x/a.m3u8");
        let err = ProcessLauncher::new().launch(&inv).await.unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
        assert_eq!(err.stage(), "launch");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_status() {
        let ok = Invocation::new("sh").arg("-c").arg("exit 0");
        assert!(ProcessLauncher::new().launch(&ok).await.is_ok());

        let failing = Invocation::new("sh").arg("-c").arg("exit 3");
        let err = ProcessLauncher::new().launch(&failing).await.unwrap_err();
        match err {
            Error::PlayerExit { program, status } => {
                assert_eq!(program, "sh");
                assert!(status.contains('3'));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_interrupt_stops_player() {
        let pid = std::process::id().to_string();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            let _ = Command::new("kill").arg("-INT").arg(&pid).status().await;
        });

        let started = Instant::now();
        let inv = Invocation::new("sleep").arg("10");
        let err = ProcessLauncher::new().launch(&inv).await.unwrap_err();

        assert!(matches!(err, Error::Interrupted { ref program } if program == "sleep"));
        assert_eq!(err.stage(), "launch");
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
