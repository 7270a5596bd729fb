//! Structured catalog of the HowToCook recipe repository.
//!
//! The crate clones (or updates) the upstream markdown repository, parses each
//! recipe document into a [`RecipeDocument`] and upserts it into a
//! [`RecipeStore`] keyed by the document's source URL.

pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod parser;
pub mod store;
pub mod sync;

pub use config::{load_config, AppConfig};
pub use error::{Error, GenerateError, StoreError, SyncError};
pub use generator::{generate_recipe, GeminiGenerator, RecipeGenerator, Selections};
pub use model::{RecipeDocument, RecipeLine, RecipeSummary, StoredRecipe};
pub use parser::{parse_document, Conventions, RecipeParser};
pub use store::{MemoryStore, Page, RecipeQuery, RecipeStore, SqliteStore, UpsertOutcome};
pub use sync::{SyncReport, SyncStatus, Synchronizer};

use std::sync::Arc;

/// Open the SQLite store named by `config`.
pub fn open_store(config: &AppConfig) -> Result<Arc<dyn RecipeStore>, Error> {
    let store = SqliteStore::open(&config.store.path)?;
    Ok(Arc::new(store))
}

/// Build a synchronizer for `config` writing into `store`.
pub fn synchronizer(config: &AppConfig, store: Arc<dyn RecipeStore>) -> Synchronizer {
    let parser = RecipeParser::new(config.conventions.clone());
    Synchronizer::from_config(&config.sync, parser, store)
}

/// Mirror the upstream repository into `store` and wait for the result.
pub async fn sync_recipes(
    config: &AppConfig,
    store: Arc<dyn RecipeStore>,
) -> Result<SyncReport, Error> {
    Ok(synchronizer(config, store).sync().await?)
}

/// Generate a recipe with the configured Gemini model.
pub async fn generate_with_config(
    config: &AppConfig,
    selections: &Selections,
) -> Result<RecipeDocument, Error> {
    let generator = GeminiGenerator::new(&config.generator)?;
    let parser = RecipeParser::new(config.conventions.clone());
    Ok(generate_recipe(&generator, &parser, selections).await?)
}
