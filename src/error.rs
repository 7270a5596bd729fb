use thiserror::Error;

/// Errors raised by a recipe store backend
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite failure
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored column could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The database file or its directory could not be created
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored timestamp could not be parsed
    #[error("Invalid timestamp in store: {0}")]
    Timestamp(#[from] chrono::ParseError),

    /// The blocking task running the query panicked or was cancelled
    #[error("Store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The connection mutex was poisoned by a panicking writer
    #[error("Store connection poisoned")]
    Poisoned,
}

/// Errors that abort a sync run
#[derive(Error, Debug)]
pub enum SyncError {
    /// Another run holds the mirror
    #[error("A sync is already in progress")]
    AlreadyRunning,

    /// The mirror could not be cloned or updated
    #[error("Mirror error: {0}")]
    Mirror(String),

    /// Filesystem failure while preparing the mirror
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The recipe walk could not be scheduled
    #[error("Walk task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Errors from the AI recipe generator
#[derive(Error, Debug)]
pub enum GenerateError {
    /// No API key in configuration or environment
    #[error("GOOGLE_API_KEY not found in config or environment")]
    MissingApiKey,

    /// The provider rejected the API key
    #[error("Invalid Google API key. Please check your GOOGLE_API_KEY environment variable.")]
    InvalidApiKey,

    /// The provider quota is exhausted
    #[error("API quota exceeded. Please try again later.")]
    QuotaExceeded,

    /// The provider blocked the prompt or answer
    #[error("Content filtered by safety settings. Please try different ingredients.")]
    Safety,

    /// Transport failure
    #[error("Failed to reach generator: {0}")]
    Http(#[from] reqwest::Error),

    /// Any other provider failure
    #[error("Failed to generate recipe: {0}")]
    Provider(String),
}

/// Top-level error for the library entry points and the CLI
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A requested recipe does not exist
    #[error("Recipe not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
