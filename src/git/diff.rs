use anyhow::{Context, Result};
use git2::{Delta, Diff, DiffFormat, DiffOptions, Repository};

use super::types::*;
use crate::state::diff_state::ViewOptions;

pub struct DiffEngine;

impl DiffEngine {
    pub fn compute_diff(
        repo: &Repository,
        target: &ComparisonTarget,
        options: &ViewOptions,
    ) -> Result<Vec<FileDelta>> {
        let mut diff_opts = DiffOptions::new();
        diff_opts.ignore_whitespace(options.ignore_whitespace);
        diff_opts.include_untracked(true);
        diff_opts.recurse_untracked_dirs(true);
        diff_opts.show_untracked_content(true);

        let diff = match target {
            ComparisonTarget::WorkdirVsHead => {
                // New repositories may have no commits yet
                let head_tree = match repo.head() {
                    Ok(head) => {
                        let commit = head.peel_to_commit()?;
                        Some(commit.tree()?)
                    }
                    Err(_) => None,
                };
                repo.diff_tree_to_workdir_with_index(head_tree.as_ref(), Some(&mut diff_opts))?
            }
            ComparisonTarget::Branch(name) => {
                let obj = repo
                    .revparse_single(name)
                    .with_context(|| format!("could not resolve: {name}"))?;
                let commit = obj
                    .peel_to_commit()
                    .with_context(|| format!("{name} does not point to a commit"))?;
                let tree = commit.tree()?;
                repo.diff_tree_to_workdir_with_index(Some(&tree), Some(&mut diff_opts))?
            }
            ComparisonTarget::Commit(oid) => {
                let commit = repo.find_commit(*oid)?;
                let tree = commit.tree()?;
                repo.diff_tree_to_workdir_with_index(Some(&tree), Some(&mut diff_opts))?
            }
        };

        Self::parse_diff(&diff)
    }

    fn parse_diff(diff: &Diff<'_>) -> Result<Vec<FileDelta>> {
        let mut deltas: Vec<FileDelta> = Vec::new();

        for i in 0..diff.deltas().len() {
            let Some(delta) = diff.get_delta(i) else {
                continue;
            };
            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .unwrap_or_else(|| std::path::Path::new("<unknown>"))
                .to_path_buf();

            let old_path = if delta.status() == Delta::Renamed {
                delta.old_file().path().map(|p| p.to_path_buf())
            } else {
                None
            };

            let status = match delta.status() {
                Delta::Added => FileStatus::Added,
                Delta::Deleted => FileStatus::Deleted,
                Delta::Modified => FileStatus::Modified,
                Delta::Renamed => FileStatus::Renamed,
                Delta::Untracked => FileStatus::Untracked,
                _ => FileStatus::Modified,
            };

            deltas.push(FileDelta {
                path,
                old_path,
                status,
                hunks: Vec::new(),
                additions: 0,
                deletions: 0,
                binary: delta.flags().is_binary(),
            });
        }

        // Walk the patch text, assigning every hunk header and line its
        // diff-relative index within the owning file.
        let mut current_delta_idx: Option<usize> = None;
        let mut current_hunk: Option<DiffHunk> = None;
        let mut diff_index: usize = 0;

        diff.print(DiffFormat::Patch, |delta, hunk, line| {
            let delta_path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .unwrap_or_else(|| std::path::Path::new("<unknown>"));

            let idx = match current_delta_idx {
                Some(i) if deltas[i].path == delta_path => i,
                prior => {
                    if let Some(h) = current_hunk.take() {
                        if let Some(p) = prior {
                            deltas[p].hunks.push(h);
                        }
                    }
                    diff_index = 0;
                    deltas
                        .iter()
                        .position(|d| d.path == delta_path)
                        .unwrap_or(0)
                }
            };
            current_delta_idx = Some(idx);

            match line.origin() {
                'H' => {
                    if let Some(h) = current_hunk.take() {
                        deltas[idx].hunks.push(h);
                    }
                    let (header, old_start, old_lines, new_start, new_lines) = match hunk {
                        Some(ref h) => (
                            format!(
                                "@@ -{},{} +{},{} @@",
                                h.old_start(),
                                h.old_lines(),
                                h.new_start(),
                                h.new_lines()
                            ),
                            h.old_start(),
                            h.old_lines(),
                            h.new_start(),
                            h.new_lines(),
                        ),
                        None => ("@@ -0,0 +0,0 @@".to_string(), 0, 0, 0, 0),
                    };
                    current_hunk = Some(DiffHunk {
                        header,
                        start_index: diff_index,
                        old_start,
                        old_lines,
                        new_start,
                        new_lines,
                        lines: Vec::new(),
                    });
                    diff_index += 1;
                }
                '+' | '-' | ' ' => {
                    let origin = match line.origin() {
                        '+' => LineOrigin::Addition,
                        '-' => LineOrigin::Deletion,
                        _ => LineOrigin::Context,
                    };
                    match origin {
                        LineOrigin::Addition => deltas[idx].additions += 1,
                        LineOrigin::Deletion => deltas[idx].deletions += 1,
                        _ => {}
                    }
                    let diff_line = DiffLine {
                        origin,
                        index: diff_index,
                        old_lineno: line.old_lineno(),
                        new_lineno: line.new_lineno(),
                        content: String::from_utf8_lossy(line.content())
                            .trim_end_matches('\n')
                            .to_string(),
                        no_newline: false,
                    };
                    diff_index += 1;
                    if let Some(h) = current_hunk.as_mut() {
                        h.lines.push(diff_line);
                    }
                }
                // "\ No newline at end of file" markers attach to the
                // preceding line rather than occupying a row of their own.
                '=' | '>' | '<' => {
                    if let Some(l) = current_hunk.as_mut().and_then(|h| h.lines.last_mut()) {
                        l.no_newline = true;
                    }
                }
                _ => {}
            }

            true
        })?;

        if let Some(h) = current_hunk.take() {
            if let Some(idx) = current_delta_idx {
                deltas[idx].hunks.push(h);
            }
        }

        Ok(deltas)
    }
}
