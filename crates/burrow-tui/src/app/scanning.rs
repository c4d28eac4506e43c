//! Background scanning.

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use burrow_core::{ScanConfig, ScanError};
use burrow_scan::{ScanProgress, Scanner};

use super::state::ScanMessage;
use crate::explorer::{RescanJob, RescanOutcome};

/// Start the startup scan on a blocking thread.
///
/// Progress and the final report arrive on `tx`.
pub fn start_scan(config: ScanConfig, token: CancellationToken, tx: mpsc::Sender<ScanMessage>) {
    tokio::spawn(async move {
        let scanner = Scanner::new();
        let progress_task = forward_progress(scanner.subscribe(), tx.clone());

        // jwalk drives its own rayon pool, keep it off the async workers
        let result = tokio::task::spawn_blocking(move || scanner.scan_with_cancel(&config, &token))
            .await
            .unwrap_or_else(|e| {
                Err(ScanError::Other {
                    message: e.to_string(),
                })
            });

        progress_task.abort();
        let _ = tx.send(ScanMessage::ScanComplete(result)).await;
    });
}

/// Run a rescan job on a blocking thread.
pub fn start_rescan(job: RescanJob, tx: mpsc::Sender<ScanMessage>) {
    tokio::spawn(async move {
        let target = job.target();
        let path = job.path().to_path_buf();
        let scanner = Scanner::new();
        let progress_task = forward_progress(scanner.subscribe(), tx.clone());

        let outcome = tokio::task::spawn_blocking(move || job.run_with(&scanner))
            .await
            .unwrap_or_else(|e| RescanOutcome {
                target,
                path,
                result: Err(ScanError::Other {
                    message: e.to_string(),
                }),
            });

        progress_task.abort();
        let _ = tx.send(ScanMessage::RescanComplete(outcome)).await;
    });
}

fn forward_progress(
    mut progress_rx: broadcast::Receiver<ScanProgress>,
    tx: mpsc::Sender<ScanMessage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match progress_rx.recv().await {
                Ok(progress) => {
                    if tx.send(ScanMessage::Progress(progress)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
