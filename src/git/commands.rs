use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Thin wrapper over the `git` binary for every mutating operation.
/// Reads go through libgit2; mutations go through the CLI so hooks,
/// filters and credential helpers behave exactly as on the command line.
pub struct GitCli {
    workdir: std::path::PathBuf,
}

impl GitCli {
    pub fn new(workdir: &Path) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
        }
    }

    /// Clone `url` into `dest`. Blocking; run on a worker, not the UI task.
    pub fn clone_repo(url: &str, dest: &Path) -> Result<()> {
        let output = Command::new("git")
            .args(["-c", "color.ui=false", "clone"])
            .arg(url)
            .arg(dest)
            .output()
            .context("failed to run git clone")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("git clone failed: {}", stderr.trim());
        }
        Ok(())
    }

    /// Stage the lines described by `patch` into the index.
    pub fn stage_patch(&self, patch: &str) -> Result<()> {
        self.apply(patch, &["apply", "--cached", "--whitespace=nowarn", "-"])
    }

    /// Remove the lines described by `patch` from the working tree.
    pub fn discard_patch(&self, patch: &str) -> Result<()> {
        self.apply(patch, &["apply", "-R", "--whitespace=nowarn", "-"])
    }

    pub fn stage_file(&self, path: &Path) -> Result<()> {
        let output = Command::new("git")
            .args(["add", "--"])
            .arg(path)
            .current_dir(&self.workdir)
            .output()
            .context("failed to run git add")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("git add failed: {}", stderr.trim());
        }
        Ok(())
    }

    pub fn unstage_file(&self, path: &Path) -> Result<()> {
        let output = Command::new("git")
            .args(["reset", "HEAD", "--"])
            .arg(path)
            .current_dir(&self.workdir)
            .output()
            .context("failed to run git reset")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("git reset failed: {}", stderr.trim());
        }
        Ok(())
    }

    fn apply(&self, patch: &str, args: &[&str]) -> Result<()> {
        let mut child = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .context("failed to run git apply")?;

        child
            .stdin
            .take()
            .context("git apply stdin unavailable")?
            .write_all(patch.as_bytes())
            .context("failed to write patch to git apply")?;

        let output = child
            .wait_with_output()
            .context("failed to wait for git apply")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("git apply failed: {}", stderr.trim());
        }
        Ok(())
    }
}
