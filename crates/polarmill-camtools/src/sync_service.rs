//! Async driver for the spindle sync timer
//!
//! A single task owns the [`ParameterStore`]. Edits arrive over a channel and
//! the pending recomputation is raced against the next edit with
//! `tokio::select!`, so timer expiry and edits are never interleaved.

use std::time::Instant as StdInstant;

use polarmill_core::MachiningParameters;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, trace};

use crate::error::{CamToolError, CamToolResult};
use crate::session::{GeneratedProgram, ParameterEdit, ParameterStore};

const COMMAND_BUFFER: usize = 32;

enum SyncCommand {
    Apply {
        edit: ParameterEdit,
        reply: oneshot::Sender<MachiningParameters>,
    },
    Snapshot {
        reply: oneshot::Sender<MachiningParameters>,
    },
    Compute {
        reply: oneshot::Sender<CamToolResult<GeneratedProgram>>,
    },
}

/// Cloneable handle to a running sync service
#[derive(Debug, Clone)]
pub struct SpindleSyncHandle {
    tx: mpsc::Sender<SyncCommand>,
}

impl SpindleSyncHandle {
    /// Apply an edit and return the parameters right after it
    pub async fn apply(&self, edit: ParameterEdit) -> CamToolResult<MachiningParameters> {
        let (reply, rx) = oneshot::channel();
        self.send(SyncCommand::Apply { edit, reply }).await?;
        rx.await.map_err(|_| CamToolError::ServiceStopped)
    }

    /// Current parameters
    pub async fn snapshot(&self) -> CamToolResult<MachiningParameters> {
        let (reply, rx) = oneshot::channel();
        self.send(SyncCommand::Snapshot { reply }).await?;
        rx.await.map_err(|_| CamToolError::ServiceStopped)
    }

    /// Compute a program from the current parameters
    pub async fn compute(&self) -> CamToolResult<GeneratedProgram> {
        let (reply, rx) = oneshot::channel();
        self.send(SyncCommand::Compute { reply }).await?;
        rx.await.map_err(|_| CamToolError::ServiceStopped)?
    }

    async fn send(&self, command: SyncCommand) -> CamToolResult<()> {
        self.tx.send(command).await.map_err(|_| CamToolError::ServiceStopped)
    }
}

fn now() -> StdInstant {
    Instant::now().into_std()
}

/// Start the service on the current runtime.
///
/// The task ends once every handle is dropped and hands the store back.
pub fn spawn(store: ParameterStore) -> (SpindleSyncHandle, JoinHandle<ParameterStore>) {
    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    let task = tokio::spawn(run(store, rx));
    (SpindleSyncHandle { tx }, task)
}

async fn run(mut store: ParameterStore, mut rx: mpsc::Receiver<SyncCommand>) -> ParameterStore {
    loop {
        let deadline = store.pending_deadline().map(Instant::from_std);

        tokio::select! {
            command = rx.recv() => {
                let Some(command) = command else {
                    break;
                };
                handle(&mut store, command);
            }
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if store.poll(now()) {
                    trace!("Spindle sync timer fired");
                }
            }
        }
    }

    debug!("Spindle sync service stopped");
    store
}

fn handle(store: &mut ParameterStore, command: SyncCommand) {
    // A dropped reply receiver only means the caller stopped waiting
    match command {
        SyncCommand::Apply { edit, reply } => {
            store.apply(edit, now());
            let _ = reply.send(store.params().clone());
        }
        SyncCommand::Snapshot { reply } => {
            let _ = reply.send(store.params().clone());
        }
        SyncCommand::Compute { reply } => {
            let _ = reply.send(store.compute().cloned());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn test_debounce_collapses_edits() {
        let (handle, task) = spawn(ParameterStore::default());

        handle.apply(ParameterEdit::SpindleRpm(1000)).await.unwrap();
        sleep(Duration::from_millis(800)).await;
        handle.apply(ParameterEdit::SpindleRpm(1500)).await.unwrap();
        sleep(Duration::from_millis(800)).await;
        let p = handle.apply(ParameterEdit::SpindleRpm(2500)).await.unwrap();
        assert_eq!(p.spindle_rpm, 2500);
        assert_eq!(p.cutting_speed, 75.0);

        // First edit's deadline has passed, the last one's has not
        sleep(Duration::from_millis(1500)).await;
        assert_eq!(handle.snapshot().await.unwrap().cutting_speed, 75.0);

        sleep(Duration::from_millis(1100)).await;
        let p = handle.snapshot().await.unwrap();
        assert_eq!(p.spindle_rpm, 2500);
        assert_eq!(p.cutting_speed, 94.0);

        drop(handle);
        let store = task.await.unwrap();
        assert!(store.pending_deadline().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_vc_edit_waits_for_quiet_period() {
        let (handle, _task) = spawn(ParameterStore::default());

        handle.apply(ParameterEdit::CuttingSpeed(90.0)).await.unwrap();
        sleep(Duration::from_millis(2400)).await;
        assert_eq!(handle.snapshot().await.unwrap().spindle_rpm, 2000);

        sleep(Duration::from_millis(200)).await;
        let p = handle.snapshot().await.unwrap();
        assert_eq!(p.spindle_rpm, 2387);
        assert_eq!(p.cutting_speed, 90.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_compute_through_handle() {
        let (handle, _task) = spawn(ParameterStore::default());

        let p = handle.apply(ParameterEdit::ToolDiameter(10.0)).await.unwrap();
        assert_eq!(p.cutting_speed, 63.0);

        let program = handle.compute().await.unwrap();
        assert_eq!(program.feed_rate, 400);
        assert!(program.program.contains("(MILL D10)"));

        handle.apply(ParameterEdit::AcrossFlats(-1.0)).await.unwrap();
        assert!(matches!(
            handle.compute().await,
            Err(CamToolError::Parameter(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_service_reports_one_error() {
        let (handle, task) = spawn(ParameterStore::default());
        task.abort();
        let _ = task.await;

        assert!(matches!(
            handle.apply(ParameterEdit::SpindleRpm(1000)).await,
            Err(CamToolError::ServiceStopped)
        ));
        assert!(matches!(
            handle.snapshot().await,
            Err(CamToolError::ServiceStopped)
        ));
        assert!(matches!(
            handle.compute().await,
            Err(CamToolError::ServiceStopped)
        ));
    }
}
