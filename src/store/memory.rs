use super::{Page, RecipeQuery, RecipeStore, UpsertOutcome};
use crate::error::StoreError;
use crate::model::{RecipeDocument, RecipeSummary, StoredRecipe};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeSet;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Inner {
    records: Vec<StoredRecipe>,
    next_id: i64,
}

/// Process-local store, used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_query(record: &StoredRecipe, query: &RecipeQuery) -> bool {
    let name_ok = query.name.as_ref().map_or(true, |needle| {
        record
            .recipe
            .name
            .to_lowercase()
            .contains(&needle.to_lowercase())
    });
    let category_ok = query
        .category
        .as_ref()
        .map_or(true, |category| &record.recipe.category == category);
    name_ok && category_ok
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn upsert(&self, recipe: RecipeDocument) -> Result<UpsertOutcome, StoreError> {
        // The write lock spans lookup and write, so the upsert is atomic.
        let mut inner = self.inner.write().await;
        let now = Utc::now();

        if let Some(existing) = inner
            .records
            .iter_mut()
            .find(|r| r.recipe.source_url == recipe.source_url)
        {
            existing.recipe = recipe;
            existing.last_updated = now;
            return Ok(UpsertOutcome::Updated(existing.id));
        }

        inner.next_id += 1;
        let id = inner.next_id;
        inner.records.push(StoredRecipe {
            id,
            recipe,
            last_updated: now,
        });
        Ok(UpsertOutcome::Created(id))
    }

    async fn find_by_source_url(
        &self,
        source_url: &str,
    ) -> Result<Option<StoredRecipe>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .records
            .iter()
            .find(|r| r.recipe.source_url == source_url)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<StoredRecipe>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.records.iter().find(|r| r.id == id).cloned())
    }

    async fn categories(&self) -> Result<Vec<String>, StoreError> {
        let inner = self.inner.read().await;
        let categories: BTreeSet<&str> = inner
            .records
            .iter()
            .map(|r| r.recipe.category.as_str())
            .collect();
        Ok(categories.into_iter().map(str::to_string).collect())
    }

    async fn list(&self, query: &RecipeQuery) -> Result<Page, StoreError> {
        let inner = self.inner.read().await;
        let mut hits: Vec<&StoredRecipe> =
            inner.records.iter().filter(|r| matches_query(r, query)).collect();
        hits.sort_by(|a, b| a.recipe.name.cmp(&b.recipe.name).then(a.id.cmp(&b.id)));

        let total = hits.len() as u64;
        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let data = hits
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .map(RecipeSummary::from)
            .collect();
        Ok(Page::new(query, total, data))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.inner.read().await.records.len() as u64)
    }
}
