// ABOUTME: Source checkout collaborator and the per-run workspace.
// ABOUTME: GitFetcher clones the exact revision; Workspace is removed post-run.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

use crate::types::ServiceName;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("git {action} failed: {stderr}")]
    Command { action: String, stderr: String },

    #[error("failed to run git: {0}")]
    Io(#[from] std::io::Error),
}

/// Fetches the exact source revision associated with a run into a workspace.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, workspace: &Path, revision: &str) -> Result<(), FetchError>;
}

/// Git-backed fetcher: clone into the workspace, then check out the revision.
pub struct GitFetcher {
    repo: String,
}

impl GitFetcher {
    pub fn new(repo: impl Into<String>) -> Self {
        Self { repo: repo.into() }
    }

    async fn git(args: &[&str], cwd: &Path, action: &str) -> Result<(), FetchError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(cwd)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(FetchError::Command {
                action: action.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

#[async_trait]
impl SourceFetcher for GitFetcher {
    async fn fetch(&self, workspace: &Path, revision: &str) -> Result<(), FetchError> {
        tracing::debug!(repo = %self.repo, revision, "fetching source");

        Self::git(&["clone", &self.repo, "."], workspace, "clone").await?;
        Self::git(&["checkout", revision], workspace, "checkout").await?;

        Ok(())
    }
}

/// Per-run checkout directory under `.caravel/work/<service>`.
///
/// Created fresh at run start; the post-run action removes it regardless of
/// how the run terminated.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn create(project_dir: &Path, service: &ServiceName) -> std::io::Result<Self> {
        let root = project_dir
            .join(".caravel")
            .join("work")
            .join(service.as_str());

        if root.exists() {
            std::fs::remove_dir_all(&root)?;
        }
        std::fs::create_dir_all(&root)?;

        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Remove the checkout directory. Safe to call when already gone.
    pub fn cleanup(&self) -> std::io::Result<()> {
        if self.root.exists() {
            std::fs::remove_dir_all(&self.root)?;
        }
        Ok(())
    }
}
