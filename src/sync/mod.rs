mod lease;
mod mirror;
mod walk;

pub use mirror::{GitMirror, LocalMirror, Mirror, MirrorState};
pub use walk::{recipe_files, WalkError};

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::parser::RecipeParser;
use crate::store::{RecipeStore, UpsertOutcome};
use lease::MirrorLease;
use log::{debug, error, info, warn};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;

/// Per-run counters. Every visited file, and every entry the walk could not
/// read, counts towards `processed` and exactly one of the other three.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub processed: usize,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
}

/// Observable state of the synchronizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SyncStatus {
    Idle,
    Running,
    Completed { report: SyncReport },
    Failed { message: String },
}

/// Mirrors the upstream repository into a [`RecipeStore`].
///
/// Only one run per mirror directory may be active in the process, whichever
/// synchronizer started it; a second [`Synchronizer::sync`] or
/// [`Synchronizer::trigger`] on that directory fails with
/// [`SyncError::AlreadyRunning`].
pub struct Synchronizer {
    mirror: Box<dyn Mirror>,
    store: Arc<dyn RecipeStore>,
    parser: RecipeParser,
    recipes_dir: String,
    extension: String,
    status: Mutex<SyncStatus>,
}

impl Synchronizer {
    pub fn new(mirror: Box<dyn Mirror>, store: Arc<dyn RecipeStore>) -> Self {
        Self {
            mirror,
            store,
            parser: RecipeParser::default(),
            recipes_dir: "dishes".to_string(),
            extension: "md".to_string(),
            status: Mutex::new(SyncStatus::Idle),
        }
    }

    /// Git-backed synchronizer for `config`, or a local one when
    /// `config.offline` is set.
    pub fn from_config(
        config: &SyncConfig,
        parser: RecipeParser,
        store: Arc<dyn RecipeStore>,
    ) -> Self {
        let mirror: Box<dyn Mirror> = if config.offline {
            Box::new(LocalMirror::new(&config.mirror_dir))
        } else {
            Box::new(GitMirror::new(&config.repo_url, &config.mirror_dir))
        };
        Self::new(mirror, store)
            .with_parser(parser)
            .with_recipes_dir(&config.recipes_dir)
            .with_extension(&config.extension)
    }

    pub fn with_parser(mut self, parser: RecipeParser) -> Self {
        self.parser = parser;
        self
    }

    /// Subdirectory of the mirror that holds the recipes.
    pub fn with_recipes_dir(mut self, dir: impl Into<String>) -> Self {
        self.recipes_dir = dir.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn status(&self) -> SyncStatus {
        self.status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_status(&self, status: SyncStatus) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = status;
    }

    fn acquire(&self) -> Result<MirrorLease, SyncError> {
        MirrorLease::acquire(self.mirror.dir())
    }

    /// Run a full sync and wait for it.
    pub async fn sync(&self) -> Result<SyncReport, SyncError> {
        let guard = self.acquire()?;
        self.run(guard).await
    }

    /// Start a sync in the background and return immediately.
    ///
    /// Progress is observable through [`Synchronizer::status`].
    pub fn trigger(
        self: &Arc<Self>,
    ) -> Result<JoinHandle<Result<SyncReport, SyncError>>, SyncError> {
        let guard = self.acquire()?;
        self.set_status(SyncStatus::Running);
        let this = Arc::clone(self);
        Ok(tokio::spawn(async move { this.run(guard).await }))
    }

    async fn run(&self, _lease: MirrorLease) -> Result<SyncReport, SyncError> {
        self.set_status(SyncStatus::Running);
        info!("Starting repository sync");

        let result = self.sync_locked().await;
        match &result {
            Ok(report) => {
                info!(
                    "Sync finished: {} processed, {} created, {} updated, {} failed",
                    report.processed, report.created, report.updated, report.failed
                );
                self.set_status(SyncStatus::Completed { report: *report });
            }
            Err(e) => {
                error!("Error syncing repository: {}", e);
                self.set_status(SyncStatus::Failed {
                    message: e.to_string(),
                });
            }
        }
        result
    }

    async fn sync_locked(&self) -> Result<SyncReport, SyncError> {
        let root = self.mirror.prepare().await?;
        let recipes_dir = root.join(&self.recipes_dir);
        if !tokio::fs::metadata(&recipes_dir)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
        {
            return Err(SyncError::Mirror(format!(
                "{} is missing from the mirror",
                recipes_dir.display()
            )));
        }

        info!("Processing recipes in {}", recipes_dir.display());
        let extension = self.extension.clone();
        let entries: Vec<Result<PathBuf, WalkError>> = tokio::task::spawn_blocking(move || {
            recipe_files(&recipes_dir, &extension).collect()
        })
        .await?;

        let mut report = SyncReport::default();
        for entry in entries {
            report.processed += 1;

            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!("Error walking recipes: {}", e);
                    report.failed += 1;
                    continue;
                }
            };

            let Some(recipe) = self.parser.parse_file(&root, &path).await else {
                report.failed += 1;
                continue;
            };
            let name = recipe.name.clone();

            match self.store.upsert(recipe).await {
                Ok(UpsertOutcome::Created(_)) => {
                    info!("Added new recipe: {}", name);
                    report.created += 1;
                }
                Ok(UpsertOutcome::Updated(_)) => {
                    debug!("Updated recipe: {}", name);
                    report.updated += 1;
                }
                Err(e) => {
                    warn!("Error processing file {}: {}", path.display(), e);
                    report.failed += 1;
                }
            }
        }
        Ok(report)
    }
}
