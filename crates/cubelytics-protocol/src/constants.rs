/// Avatar shown when the resolved skin URL cannot be loaded.
pub const DEFAULT_AVATAR_URL: &str = "https://mc-heads.net/body/MHF_Steve/right";

/// Message surfaced when the push channel drops before a terminal event.
pub const CONNECTION_LOST_MESSAGE: &str = "Connection lost";

/// Placeholder body for a source that produced nothing renderable.
pub const NO_DATA_PLACEHOLDER: &str = "No data";

/// Epoch-milliseconds threshold above which a numeric stat is read as a date.
pub const TIMESTAMP_MILLIS_THRESHOLD: f64 = 1e12;

/// Delay before the progress indicator collapses after completion.
pub const PROGRESS_LINGER_MS: u64 = 800;

/// Default path of the server-push search endpoint.
pub const SEARCH_PATH: &str = "/api/search";

/// Query parameter carrying the free-text search.
pub const SEARCH_QUERY_PARAM: &str = "q";
