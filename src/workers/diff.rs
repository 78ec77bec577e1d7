use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::git::types::{ComparisonTarget, FileDelta};
use crate::git::DiffEngine;
use crate::state::diff_state::ViewOptions;

#[derive(Debug, Clone)]
pub struct DiffRequest {
    pub generation: u64,
    pub target: ComparisonTarget,
    pub options: ViewOptions,
}

#[derive(Debug)]
pub struct DiffResult {
    pub generation: u64,
    pub deltas: Result<Vec<FileDelta>, String>,
}

/// Computes diffs off the UI task. Results echo the request's generation
/// so the receiver can drop anything superseded in flight.
pub struct DiffWorker {
    request_tx: mpsc::UnboundedSender<DiffRequest>,
    result_rx: mpsc::UnboundedReceiver<DiffResult>,
}

impl DiffWorker {
    pub fn new(repo_path: PathBuf) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<DiffRequest>();
        let (result_tx, result_rx) = mpsc::unbounded_channel::<DiffResult>();

        tokio::spawn(async move {
            while let Some(request) = request_rx.recv().await {
                let path = repo_path.clone();
                let tx = result_tx.clone();

                tokio::task::spawn_blocking(move || {
                    let deltas = git2::Repository::open(&path)
                        .map_err(|e| e.to_string())
                        .and_then(|repo| {
                            DiffEngine::compute_diff(&repo, &request.target, &request.options)
                                .map_err(|e| e.to_string())
                        });
                    let _ = tx.send(DiffResult {
                        generation: request.generation,
                        deltas,
                    });
                });
            }
        });

        Self {
            request_tx,
            result_rx,
        }
    }

    pub fn request(&self, req: DiffRequest) {
        let _ = self.request_tx.send(req);
    }

    pub fn try_recv(&mut self) -> Option<DiffResult> {
        self.result_rx.try_recv().ok()
    }
}
