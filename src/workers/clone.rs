use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::git::GitCli;

#[derive(Debug, Clone)]
pub struct CloneRequest {
    pub url: String,
    pub dest: PathBuf,
}

#[derive(Debug)]
pub struct CloneOutcome {
    pub dest: PathBuf,
    pub result: Result<(), String>,
}

/// Runs `git clone` off the UI task. One clone is in flight at a time;
/// the dialog disables submission while `cloning` is set, so no
/// generation token is needed here.
pub struct CloneWorker {
    request_tx: mpsc::UnboundedSender<CloneRequest>,
    result_rx: mpsc::UnboundedReceiver<CloneOutcome>,
}

impl CloneWorker {
    pub fn new() -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<CloneRequest>();
        let (result_tx, result_rx) = mpsc::unbounded_channel::<CloneOutcome>();

        tokio::spawn(async move {
            while let Some(request) = request_rx.recv().await {
                let tx = result_tx.clone();
                tokio::task::spawn_blocking(move || {
                    let result =
                        GitCli::clone_repo(&request.url, &request.dest).map_err(|e| e.to_string());
                    let _ = tx.send(CloneOutcome {
                        dest: request.dest,
                        result,
                    });
                });
            }
        });

        Self {
            request_tx,
            result_rx,
        }
    }

    pub fn request(&self, req: CloneRequest) {
        let _ = self.request_tx.send(req);
    }

    pub fn try_recv(&mut self) -> Option<CloneOutcome> {
        self.result_rx.try_recv().ok()
    }
}
