//! Embedded document store over line-delimited record logs.
//! Loads tagged JSON records, indexes designated text fields and answers
//! structured queries with soft delete, sorting and projection.

pub mod index;
pub mod logging;
pub mod model;
pub mod query;
pub mod store;

pub use index::{IndexError, IndexResult, TextIndex};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::document::{Document, JsonDocument};
pub use model::record::{IndexedRecord, RecordId};
pub use model::scalar::{Scalar, ScalarKind};
pub use query::{matches, parse_query, FieldOperator, Query, QueryError, QueryResult};
pub use store::config::StoreConfig;
pub use store::loader::{LoadError, LoadResult, LogFormat, ACTIVE_TAG, DELETED_TAG};
pub use store::options::{parse_find_options, FindOptions, Found, SortOrder};
pub use store::Store;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
