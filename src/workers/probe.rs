use std::path::PathBuf;

use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct ProbeRequest {
    pub generation: u64,
    pub path: PathBuf,
}

#[derive(Debug)]
pub struct ProbeResult {
    pub generation: u64,
    pub exists: bool,
}

/// Asynchronous existence checks for clone destinations. Every path edit
/// fires a new probe; completion order is unreliable, so results carry the
/// issuing generation and the dialog drops any that are no longer current.
pub struct PathProbe {
    request_tx: mpsc::UnboundedSender<ProbeRequest>,
    result_rx: mpsc::UnboundedReceiver<ProbeResult>,
}

impl PathProbe {
    pub fn new() -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<ProbeRequest>();
        let (result_tx, result_rx) = mpsc::unbounded_channel::<ProbeResult>();

        tokio::spawn(async move {
            while let Some(request) = request_rx.recv().await {
                let tx = result_tx.clone();
                tokio::spawn(async move {
                    let exists = tokio::fs::try_exists(&request.path).await.unwrap_or(false);
                    let _ = tx.send(ProbeResult {
                        generation: request.generation,
                        exists,
                    });
                });
            }
        });

        Self {
            request_tx,
            result_rx,
        }
    }

    pub fn request(&self, req: ProbeRequest) {
        let _ = self.request_tx.send(req);
    }

    pub fn try_recv(&mut self) -> Option<ProbeResult> {
        self.result_rx.try_recv().ok()
    }
}
