//! Live git adapter using `git` CLI commands.

use std::path::Path;
use std::process::Command;

use crate::error::PortError;
use crate::ports::git::GitRepo;

/// Live git adapter that shells out to the `git` CLI.
pub struct LiveGitRepo;

fn git(root: &Path, args: &[&str]) -> Result<String, PortError> {
    let output = Command::new("git").arg("-C").arg(root).args(args).output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("git {} failed: {}", args.join(" "), stderr.trim()).into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

impl GitRepo for LiveGitRepo {
    fn is_dirty(&self, root: &Path) -> Result<bool, PortError> {
        let status = git(root, &["status", "--porcelain"])?;
        Ok(!status.trim().is_empty())
    }

    fn has_ref(&self, root: &Path, reference: &str) -> bool {
        let spec = format!("{reference}^{{commit}}");
        git(root, &["rev-parse", "--verify", "--quiet", &spec]).is_ok()
    }

    fn changed_files(&self, root: &Path, base: &str) -> Result<Vec<String>, PortError> {
        let range = format!("{base}...HEAD");
        let out = git(root, &["diff", "--name-only", &range])?;
        Ok(out.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect())
    }
}
