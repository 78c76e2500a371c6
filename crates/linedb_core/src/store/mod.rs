//! Embedded document store over a line-oriented record log.
//!
//! # Responsibility
//! - Load and index the whole log once at construction.
//! - Answer queries against active records with sort/projection.
//! - Apply in-memory inserts and soft deletes.
//!
//! # Invariants
//! - Construction either loads every kept line or fails; no partial store.
//! - Deleted records are never returned by `find`.
//! - Writes are never persisted back to the log.

pub mod config;
pub mod loader;
pub mod options;

use crate::index::{build_index, IndexResult};
use crate::model::document::Document;
use crate::model::record::{IndexedRecord, RecordId};
use crate::query::{matches, Query, QueryResult};
use config::StoreConfig;
use loader::{load_records, LoadResult, LogFormat};
use log::{debug, error, info};
use options::{project, sort_records, FindOptions, Found};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::time::Instant;

/// In-memory collection of indexed records loaded from a log.
#[derive(Debug, Clone)]
pub struct Store<D: Document> {
    source: String,
    text_fields: Vec<D::Field>,
    log_format: LogFormat,
    records: Vec<IndexedRecord<D>>,
}

impl<D: Document> Store<D> {
    /// Opens and loads the log at `config.path`.
    ///
    /// # Side effects
    /// - Reads the whole log file once.
    /// - Emits `store_load` logging events with duration and status.
    ///
    /// # Errors
    /// - `LoadError::Io` when the file cannot be opened or read.
    /// - `LoadError::MalformedRecord` / `LoadError::Index` for the first bad line.
    pub fn open(config: StoreConfig<D::Field>) -> LoadResult<Self> {
        let file = match File::open(&config.path) {
            Ok(file) => file,
            Err(err) => {
                error!(
                    "event=store_load module=store status=error error_code=log_open_failed error={}",
                    err
                );
                return Err(err.into());
            }
        };
        Self::from_reader(config, BufReader::new(file))
    }

    /// Loads records from any buffered reader.
    ///
    /// `config.path` is kept only as the source identifier.
    pub fn from_reader<R: BufRead>(config: StoreConfig<D::Field>, reader: R) -> LoadResult<Self> {
        let started_at = Instant::now();
        let source = config.path.display().to_string();
        info!(
            "event=store_load module=store status=start format={:?} text_fields={}",
            config.log_format,
            config.text_fields.len()
        );

        match load_records(reader, &config.text_fields, config.log_format) {
            Ok(records) => {
                let store = Self {
                    source,
                    text_fields: config.text_fields,
                    log_format: config.log_format,
                    records,
                };
                info!(
                    "event=store_load module=store status=ok records={} deleted={} duration_ms={}",
                    store.len(),
                    store.len() - store.active_count(),
                    started_at.elapsed().as_millis()
                );
                Ok(store)
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error duration_ms={} error_code=log_load_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Finds active records matching `query`, then sorts and projects them.
    ///
    /// Returns an empty list when nothing matches.
    pub fn find(
        &self,
        query: &Query<D::Field>,
        options: &FindOptions<D::Field>,
    ) -> QueryResult<Vec<Found<D>>> {
        let mut hits = self
            .matching(query)?
            .into_iter()
            .map(|(_, record)| record)
            .collect::<Vec<_>>();
        sort_records(&mut hits, &options.sort)?;

        let found = match &options.projection {
            Some(fields) => hits
                .into_iter()
                .map(|record| project(record.document(), fields).map(Found::Projected))
                .collect::<QueryResult<Vec<_>>>()?,
            None => hits
                .into_iter()
                .map(|record| Found::Document(record.document().clone()))
                .collect(),
        };

        debug!(
            "event=store_find module=store status=ok hits={} sort_keys={} projected={}",
            found.len(),
            options.sort.len(),
            options.projection.is_some()
        );
        Ok(found)
    }

    /// Finds active records matching `query` in store order, without options.
    pub fn find_documents(&self, query: &Query<D::Field>) -> QueryResult<Vec<D>> {
        Ok(self
            .matching(query)?
            .into_iter()
            .map(|(_, record)| record.document().clone())
            .collect())
    }

    /// Finds active records matching `query` together with their ids.
    pub fn find_with_ids(&self, query: &Query<D::Field>) -> QueryResult<Vec<(RecordId, &D)>> {
        Ok(self
            .matching(query)?
            .into_iter()
            .map(|(id, record)| (id, record.document()))
            .collect())
    }

    /// Soft-deletes every active record matching `query`.
    ///
    /// Returns how many records were newly deleted. All matches are
    /// evaluated before any flag changes, so a failing query deletes nothing.
    pub fn delete(&mut self, query: &Query<D::Field>) -> QueryResult<usize> {
        let ids = self
            .matching(query)?
            .into_iter()
            .map(|(id, _)| id)
            .collect::<Vec<_>>();

        for id in &ids {
            self.records[*id].mark_deleted();
        }

        info!(
            "event=store_delete module=store status=ok matched={} active={}",
            ids.len(),
            self.active_count()
        );
        Ok(ids.len())
    }

    /// Appends `document` as a new active record with a fresh index.
    ///
    /// Not persisted to the log.
    ///
    /// # Errors
    /// - `IndexError` when a full-text field is missing or not a string; the
    ///   store is left unchanged.
    pub fn insert(&mut self, document: D) -> IndexResult<RecordId> {
        let index = match build_index(&document, &self.text_fields) {
            Ok(index) => index,
            Err(err) => {
                error!(
                    "event=store_insert module=store status=error error_code=index_failed error={}",
                    err
                );
                return Err(err);
            }
        };

        let id = self.records.len();
        self.records.push(IndexedRecord::new(document, index, false));
        info!(
            "event=store_insert module=store status=ok record_id={} records={}",
            id,
            self.records.len()
        );
        Ok(id)
    }

    /// Returns the record stored under `id`, including deleted ones.
    pub fn get(&self, id: RecordId) -> Option<&IndexedRecord<D>> {
        self.records.get(id)
    }

    /// All records in store order, deleted ones included.
    pub fn records(&self) -> &[IndexedRecord<D>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records not soft-deleted.
    pub fn active_count(&self) -> usize {
        self.records.iter().filter(|record| record.is_active()).count()
    }

    /// Identifier of the log this store was loaded from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn text_fields(&self) -> &[D::Field] {
        &self.text_fields
    }

    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    fn matching(&self, query: &Query<D::Field>) -> QueryResult<Vec<(RecordId, &IndexedRecord<D>)>> {
        let mut hits = Vec::new();
        for (id, record) in self.records.iter().enumerate() {
            if record.is_deleted() {
                continue;
            }
            if matches(query, record)? {
                hits.push((id, record));
            }
        }
        Ok(hits)
    }
}
