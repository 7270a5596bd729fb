use super::{Page, RecipeQuery, RecipeStore, UpsertOutcome};
use crate::error::StoreError;
use crate::model::{RecipeDocument, RecipeLine, RecipeSummary, StoredRecipe};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS recipes (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        source_url     TEXT UNIQUE NOT NULL,
        name           TEXT NOT NULL,
        category       TEXT NOT NULL,
        difficulty     INTEGER,
        description    TEXT,
        materials      TEXT NOT NULL DEFAULT '[]',
        quantities     TEXT NOT NULL DEFAULT '[]',
        procedure      TEXT NOT NULL DEFAULT '[]',
        notes          TEXT NOT NULL DEFAULT '[]',
        image_url      TEXT NOT NULL DEFAULT '',
        all_image_urls TEXT NOT NULL DEFAULT '[]',
        last_updated   TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_recipes_name ON recipes(name);
    CREATE INDEX IF NOT EXISTS idx_recipes_category ON recipes(category);
";

const COLUMNS: &str = "id, source_url, name, category, difficulty, description, materials, \
                       quantities, procedure, notes, image_url, all_image_urls, last_updated";

const FILTER: &str = "(?1 IS NULL OR instr(lower(name), lower(?1)) > 0) \
                      AND (?2 IS NULL OR category = ?2)";

/// Recipe store persisted in a single SQLite table.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&mut guard)
        })
        .await?
    }
}

/// Columns of one row before JSON and timestamp decoding.
struct RawRecipe {
    id: i64,
    source_url: String,
    name: String,
    category: String,
    difficulty: Option<u32>,
    description: Option<String>,
    materials: String,
    quantities: String,
    procedure: String,
    notes: String,
    image_url: String,
    all_image_urls: String,
    last_updated: String,
}

impl RawRecipe {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            source_url: row.get(1)?,
            name: row.get(2)?,
            category: row.get(3)?,
            difficulty: row.get(4)?,
            description: row.get(5)?,
            materials: row.get(6)?,
            quantities: row.get(7)?,
            procedure: row.get(8)?,
            notes: row.get(9)?,
            image_url: row.get(10)?,
            all_image_urls: row.get(11)?,
            last_updated: row.get(12)?,
        })
    }

    fn decode(self) -> Result<StoredRecipe, StoreError> {
        let lines = |raw: &str| serde_json::from_str::<Vec<RecipeLine>>(raw);
        Ok(StoredRecipe {
            id: self.id,
            recipe: RecipeDocument {
                name: self.name,
                category: self.category,
                difficulty: self.difficulty,
                description: self.description,
                materials: lines(&self.materials)?,
                quantities: lines(&self.quantities)?,
                procedure: lines(&self.procedure)?,
                notes: lines(&self.notes)?,
                image_url: self.image_url,
                all_image_urls: serde_json::from_str(&self.all_image_urls)?,
                source_url: self.source_url,
            },
            last_updated: DateTime::parse_from_rfc3339(&self.last_updated)?.with_timezone(&Utc),
        })
    }
}

fn find_one(
    conn: &Connection,
    clause: &str,
    param: &dyn rusqlite::ToSql,
) -> Result<Option<StoredRecipe>, StoreError> {
    let sql = format!("SELECT {COLUMNS} FROM recipes WHERE {clause}");
    conn.query_row(&sql, [param], RawRecipe::from_row)
        .optional()?
        .map(RawRecipe::decode)
        .transpose()
}

#[async_trait]
impl RecipeStore for SqliteStore {
    async fn upsert(&self, recipe: RecipeDocument) -> Result<UpsertOutcome, StoreError> {
        self.with_conn(move |conn| {
            let materials = serde_json::to_string(&recipe.materials)?;
            let quantities = serde_json::to_string(&recipe.quantities)?;
            let procedure = serde_json::to_string(&recipe.procedure)?;
            let notes = serde_json::to_string(&recipe.notes)?;
            let all_image_urls = serde_json::to_string(&recipe.all_image_urls)?;
            let now = Utc::now().to_rfc3339();

            let tx = conn.transaction()?;
            let existing: Option<i64> = tx
                .query_row(
                    "SELECT id FROM recipes WHERE source_url = ?1",
                    [&recipe.source_url],
                    |row| row.get(0),
                )
                .optional()?;

            let outcome = match existing {
                Some(id) => {
                    tx.execute(
                        "UPDATE recipes SET name = ?2, category = ?3, difficulty = ?4,
                             description = ?5, materials = ?6, quantities = ?7, procedure = ?8,
                             notes = ?9, image_url = ?10, all_image_urls = ?11, last_updated = ?12
                         WHERE id = ?1",
                        params![
                            id,
                            recipe.name,
                            recipe.category,
                            recipe.difficulty,
                            recipe.description,
                            materials,
                            quantities,
                            procedure,
                            notes,
                            recipe.image_url,
                            all_image_urls,
                            now
                        ],
                    )?;
                    UpsertOutcome::Updated(id)
                }
                None => {
                    tx.execute(
                        "INSERT INTO recipes (source_url, name, category, difficulty, description,
                             materials, quantities, procedure, notes, image_url, all_image_urls,
                             last_updated)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                        params![
                            recipe.source_url,
                            recipe.name,
                            recipe.category,
                            recipe.difficulty,
                            recipe.description,
                            materials,
                            quantities,
                            procedure,
                            notes,
                            recipe.image_url,
                            all_image_urls,
                            now
                        ],
                    )?;
                    UpsertOutcome::Created(tx.last_insert_rowid())
                }
            };
            tx.commit()?;
            debug!("Upserted {} ({:?})", recipe.source_url, outcome);
            Ok(outcome)
        })
        .await
    }

    async fn find_by_source_url(
        &self,
        source_url: &str,
    ) -> Result<Option<StoredRecipe>, StoreError> {
        let source_url = source_url.to_string();
        self.with_conn(move |conn| find_one(conn, "source_url = ?1", &source_url))
            .await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<StoredRecipe>, StoreError> {
        self.with_conn(move |conn| find_one(conn, "id = ?1", &id))
            .await
    }

    async fn categories(&self) -> Result<Vec<String>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT DISTINCT category FROM recipes ORDER BY category")?;
            let categories = stmt
                .query_map([], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;
            Ok(categories)
        })
        .await
    }

    async fn list(&self, query: &RecipeQuery) -> Result<Page, StoreError> {
        let query = query.clone();
        self.with_conn(move |conn| {
            let total: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM recipes WHERE {FILTER}"),
                params![query.name, query.category],
                |row| row.get(0),
            )?;

            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM recipes WHERE {FILTER} \
                 ORDER BY name, id LIMIT ?3 OFFSET ?4"
            ))?;
            let offset = i64::try_from(query.offset()).unwrap_or(i64::MAX);
            let data = stmt
                .query_map(
                    params![query.name, query.category, i64::from(query.limit), offset],
                    RawRecipe::from_row,
                )?
                .map(|raw| -> Result<RecipeSummary, StoreError> {
                    let stored = raw?.decode()?;
                    Ok(RecipeSummary::from(&stored))
                })
                .collect::<Result<Vec<_>, StoreError>>()?;

            Ok(Page::new(&query, total.max(0) as u64, data))
        })
        .await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.with_conn(|conn| {
            let total: i64 = conn.query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;
            Ok(total.max(0) as u64)
        })
        .await
    }
}
