//! Store construction settings.

use super::loader::LogFormat;
use std::path::{Path, PathBuf};

/// Settings for opening a [`Store`](super::Store).
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig<F> {
    /// Log file to load on open.
    pub path: PathBuf,
    /// Fields tokenized into each record's full-text index.
    pub text_fields: Vec<F>,
    /// How line tags are interpreted.
    pub log_format: LogFormat,
}

impl<F> StoreConfig<F> {
    /// Creates a config with no full-text fields and the tagged log format.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            text_fields: Vec::new(),
            log_format: LogFormat::default(),
        }
    }

    pub fn text_fields(mut self, fields: impl IntoIterator<Item = F>) -> Self {
        self.text_fields = fields.into_iter().collect();
        self
    }

    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }
}
