use crate::error::SyncError;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Source of the local checkout that a sync run reads recipes from.
#[async_trait]
pub trait Mirror: Send + Sync {
    /// Local checkout directory. Runs over the same directory never overlap.
    fn dir(&self) -> &Path;

    /// Make the checkout present and current, returning its root directory.
    async fn prepare(&self) -> Result<PathBuf, SyncError>;
}

/// State of the mirror directory before a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorState {
    Absent,
    /// Directory with version-control metadata
    Valid,
    /// Directory without `.git`; it is removed and cloned again
    Invalid,
}

impl MirrorState {
    pub async fn inspect(dir: &Path) -> MirrorState {
        if !is_dir(dir).await {
            MirrorState::Absent
        } else if tokio::fs::metadata(dir.join(".git")).await.is_ok() {
            MirrorState::Valid
        } else {
            MirrorState::Invalid
        }
    }
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
}

/// Clones `repo_url` into `dir` and keeps it at the upstream head.
#[derive(Debug, Clone)]
pub struct GitMirror {
    repo_url: String,
    dir: PathBuf,
}

impl GitMirror {
    pub fn new(repo_url: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_url: repo_url.into(),
            dir: dir.into(),
        }
    }

    async fn clone_fresh(&self) -> Result<(), SyncError> {
        info!("Cloning {} into {}", self.repo_url, self.dir.display());
        if let Some(parent) = self.dir.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let mut cmd = Command::new("git");
        cmd.arg("clone").arg(&self.repo_url).arg(&self.dir);
        run_git(cmd, "git clone").await
    }

    async fn update(&self) -> Result<(), SyncError> {
        info!("Repository exists, pulling latest changes");
        for (args, label) in [
            (&["reset", "--hard"][..], "git reset"),
            (&["clean", "-fd"][..], "git clean"),
            (&["pull", "--ff-only"][..], "git pull"),
        ] {
            let mut cmd = Command::new("git");
            cmd.arg("-C").arg(&self.dir).args(args);
            run_git(cmd, label).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Mirror for GitMirror {
    fn dir(&self) -> &Path {
        &self.dir
    }

    async fn prepare(&self) -> Result<PathBuf, SyncError> {
        match MirrorState::inspect(&self.dir).await {
            MirrorState::Absent => {
                info!("Repository does not exist, cloning");
                self.clone_fresh().await?;
            }
            MirrorState::Valid => self.update().await?,
            MirrorState::Invalid => {
                warn!(
                    "{} exists but is not a git repository, removing and cloning",
                    self.dir.display()
                );
                tokio::fs::remove_dir_all(&self.dir).await?;
                self.clone_fresh().await?;
            }
        }
        Ok(self.dir.clone())
    }
}

async fn run_git(mut cmd: Command, label: &str) -> Result<(), SyncError> {
    debug!("Running {:?}", cmd);
    let output = cmd
        .output()
        .await
        .map_err(|e| SyncError::Mirror(format!("{label}: {e}")))?;
    if !output.status.success() {
        return Err(SyncError::Mirror(format!(
            "{label} failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(())
}

/// An existing checkout used as-is, without touching version control.
#[derive(Debug, Clone)]
pub struct LocalMirror {
    dir: PathBuf,
}

impl LocalMirror {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl Mirror for LocalMirror {
    fn dir(&self) -> &Path {
        &self.dir
    }

    async fn prepare(&self) -> Result<PathBuf, SyncError> {
        if is_dir(&self.dir).await {
            Ok(self.dir.clone())
        } else {
            Err(SyncError::Mirror(format!(
                "{} is not a directory",
                self.dir.display()
            )))
        }
    }
}
