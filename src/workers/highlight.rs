use tokio::sync::mpsc;

use crate::git::types::{FileDelta, LineOrigin};
use crate::highlight::{HighlightEngine, HighlightSpan};

#[derive(Debug, Clone)]
pub struct HighlightRequest {
    pub generation: u64,
    pub delta: FileDelta,
}

#[derive(Debug)]
pub struct HighlightResult {
    pub generation: u64,
    pub old: Vec<Vec<HighlightSpan>>,
    pub new: Vec<Vec<HighlightSpan>>,
}

/// Tokenizes the two sides of a file diff off the UI task.
///
/// Each request snapshots its inputs via the generation token; the two
/// steps (content reconstruction, then tokenization) run to completion
/// regardless, and the receiver discards results whose token is stale.
pub struct HighlightWorker {
    request_tx: mpsc::UnboundedSender<HighlightRequest>,
    result_rx: mpsc::UnboundedReceiver<HighlightResult>,
}

impl HighlightWorker {
    pub fn new() -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<HighlightRequest>();
        let (result_tx, result_rx) = mpsc::unbounded_channel::<HighlightResult>();

        // One blocking thread owns the engine; grammar compilation happens
        // once, not per request.
        tokio::task::spawn_blocking(move || {
            let engine = HighlightEngine::new();
            while let Some(request) = request_rx.blocking_recv() {
                let old_content = reconstruct_side(&request.delta, Side::Old);
                let new_content = reconstruct_side(&request.delta, Side::New);

                let old = engine
                    .highlight_lines(&request.delta.path, &old_content)
                    .unwrap_or_default();
                let new = engine
                    .highlight_lines(&request.delta.path, &new_content)
                    .unwrap_or_default();

                let _ = result_tx.send(HighlightResult {
                    generation: request.generation,
                    old,
                    new,
                });
            }
        });

        Self {
            request_tx,
            result_rx,
        }
    }

    pub fn request(&self, req: HighlightRequest) {
        let _ = self.request_tx.send(req);
    }

    pub fn try_recv(&mut self) -> Option<HighlightResult> {
        self.result_rx.try_recv().ok()
    }
}

#[derive(Clone, Copy)]
enum Side {
    Old,
    New,
}

/// Rebuild one side of the file from the diff alone. Lines outside any
/// hunk come back empty, which is fine for per-line tokenization.
fn reconstruct_side(delta: &FileDelta, side: Side) -> String {
    let mut lines: Vec<&str> = Vec::new();

    for hunk in &delta.hunks {
        for line in &hunk.lines {
            let lineno = match (side, line.origin) {
                (Side::Old, LineOrigin::Context | LineOrigin::Deletion) => line.old_lineno,
                (Side::New, LineOrigin::Context | LineOrigin::Addition) => line.new_lineno,
                _ => None,
            };
            if let Some(n) = lineno {
                let idx = n as usize - 1;
                if lines.len() <= idx {
                    lines.resize(idx + 1, "");
                }
                lines[idx] = &line.content;
            }
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::types::{DiffHunk, DiffLine, FileStatus};
    use std::path::PathBuf;

    #[test]
    fn reconstruction_places_lines_by_number() {
        let delta = FileDelta {
            path: PathBuf::from("x.rs"),
            old_path: None,
            status: FileStatus::Modified,
            hunks: vec![DiffHunk {
                header: "@@ -3,2 +3,2 @@".to_string(),
                start_index: 0,
                old_start: 3,
                old_lines: 2,
                new_start: 3,
                new_lines: 2,
                lines: vec![
                    DiffLine {
                        origin: LineOrigin::Context,
                        index: 1,
                        old_lineno: Some(3),
                        new_lineno: Some(3),
                        content: "shared".to_string(),
                        no_newline: false,
                    },
                    DiffLine {
                        origin: LineOrigin::Deletion,
                        index: 2,
                        old_lineno: Some(4),
                        new_lineno: None,
                        content: "before".to_string(),
                        no_newline: false,
                    },
                    DiffLine {
                        origin: LineOrigin::Addition,
                        index: 3,
                        old_lineno: None,
                        new_lineno: Some(4),
                        content: "after".to_string(),
                        no_newline: false,
                    },
                ],
            }],
            additions: 1,
            deletions: 1,
            binary: false,
        };

        assert_eq!(reconstruct_side(&delta, Side::Old), "\n\nshared\nbefore");
        assert_eq!(reconstruct_side(&delta, Side::New), "\n\nshared\nafter");
    }
}
