mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::StoreError;
use crate::model::{RecipeDocument, RecipeSummary, StoredRecipe};
use async_trait::async_trait;
use serde::Serialize;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created(i64),
    Updated(i64),
}

impl UpsertOutcome {
    pub fn id(&self) -> i64 {
        match self {
            UpsertOutcome::Created(id) | UpsertOutcome::Updated(id) => *id,
        }
    }
}

/// Filter and pagination for [`RecipeStore::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeQuery {
    /// Case-insensitive substring of the recipe name
    pub name: Option<String>,
    /// Exact category
    pub category: Option<String>,
    /// 1-based page number
    pub page: u32,
    pub limit: u32,
}

impl Default for RecipeQuery {
    fn default() -> Self {
        Self {
            name: None,
            category: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl RecipeQuery {
    /// Builds a query, treating missing or zero page/limit as the defaults
    /// and blank filters as absent.
    pub fn new(
        name: Option<String>,
        category: Option<String>,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Self {
        Self {
            name: name.filter(|n| !n.trim().is_empty()),
            category: category.filter(|c| !c.trim().is_empty()),
            page: page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE),
            limit: limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// One page of recipe summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
    pub data: Vec<RecipeSummary>,
}

impl Page {
    pub fn new(query: &RecipeQuery, total: u64, data: Vec<RecipeSummary>) -> Self {
        Self {
            page: query.page,
            limit: query.limit,
            total,
            total_pages: total.div_ceil(u64::from(query.limit)),
            data,
        }
    }
}

/// Document store holding recipes, keyed uniquely by `sourceUrl`.
///
/// Implementations must make [`RecipeStore::upsert`] atomic per source URL so
/// concurrent callers never create duplicates.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Insert `recipe` or fully overwrite the record with the same source URL,
    /// stamping `lastUpdated` either way.
    async fn upsert(&self, recipe: RecipeDocument) -> Result<UpsertOutcome, StoreError>;

    async fn find_by_source_url(&self, source_url: &str)
        -> Result<Option<StoredRecipe>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<StoredRecipe>, StoreError>;

    /// Distinct categories, sorted.
    async fn categories(&self) -> Result<Vec<String>, StoreError>;

    /// Filtered page of recipes sorted by name.
    async fn list(&self, query: &RecipeQuery) -> Result<Page, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults_for_missing_or_zero_values() {
        let query = RecipeQuery::new(Some("  ".to_string()), None, Some(0), None);
        assert_eq!(query, RecipeQuery::default());
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_query_offset() {
        let query = RecipeQuery::new(None, None, Some(3), Some(20));
        assert_eq!(query.offset(), 40);
    }

    #[test]
    fn test_page_total_pages_rounds_up() {
        let query = RecipeQuery::default();
        assert_eq!(Page::new(&query, 0, vec![]).total_pages, 0);
        assert_eq!(Page::new(&query, 10, vec![]).total_pages, 1);
        assert_eq!(Page::new(&query, 11, vec![]).total_pages, 2);
    }
}
