//! Line-oriented record log parsing.
//!
//! # Responsibility
//! - Classify each log line by its one-character tag.
//! - Decode JSON payloads into documents and report failures by line.
//!
//! # Invariants
//! - Blank lines are skipped in every format.
//! - Every kept line becomes its own record; lines are never merged.

use crate::index::{build_index, IndexError};
use crate::model::document::Document;
use crate::model::record::IndexedRecord;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::BufRead;

/// Tag marking an active record.
pub const ACTIVE_TAG: char = 'E';
/// Tag marking a record that is already deleted when loaded.
pub const DELETED_TAG: char = 'D';

pub type LoadResult<T> = Result<T, LoadError>;

/// How line tags are interpreted on load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Only `E` lines are loaded; every other tag is ignored.
    ActiveOnly,
    /// Every line is loaded; `D` lines start deleted, other tags start active.
    #[default]
    Tagged,
}

/// Store construction failure. No partially loaded store is ever returned.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    /// Payload on `line` (1-based) is not a valid document.
    MalformedRecord {
        line: usize,
        source: serde_json::Error,
    },
    /// Record on `line` (1-based) could not be indexed.
    Index { line: usize, source: IndexError },
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read record log: {err}"),
            Self::MalformedRecord { line, source } => {
                write!(f, "malformed record on line {line}: {source}")
            }
            Self::Index { line, source } => write!(f, "cannot index record on line {line}: {source}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::MalformedRecord { source, .. } => Some(source),
            Self::Index { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// A kept log line split into its initial state and JSON payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LogEntry<'a> {
    pub deleted: bool,
    pub payload: &'a str,
}

/// Classifies one raw line, returning `None` when it is skipped.
pub(crate) fn classify_line(line: &str, format: LogFormat) -> Option<LogEntry<'_>> {
    if line.trim().is_empty() {
        return None;
    }

    let mut chars = line.chars();
    let tag = chars.next()?;
    let payload = chars.as_str();

    match format {
        LogFormat::ActiveOnly if tag != ACTIVE_TAG => None,
        LogFormat::ActiveOnly => Some(LogEntry {
            deleted: false,
            payload,
        }),
        LogFormat::Tagged => Some(LogEntry {
            deleted: tag == DELETED_TAG,
            payload,
        }),
    }
}

/// Reads, classifies, decodes and indexes every line of `reader`.
///
/// Lines are read as raw bytes and decoded lossily, so invalid UTF-8 never
/// fails the read. Lines the format ignores are skipped whatever they
/// contain; replaced bytes in kept lines reach the JSON decoder as `U+FFFD`.
/// Stops at the first failing line.
pub(crate) fn load_records<D: Document, R: BufRead>(
    mut reader: R,
    text_fields: &[D::Field],
    format: LogFormat,
) -> LoadResult<Vec<IndexedRecord<D>>> {
    let mut records = Vec::new();
    let mut buffer = Vec::new();
    let mut line_number = 0;

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        line_number += 1;

        let line = String::from_utf8_lossy(strip_line_ending(&buffer));
        let Some(entry) = classify_line(&line, format) else {
            continue;
        };

        let document = serde_json::from_str::<D>(entry.payload).map_err(|source| {
            LoadError::MalformedRecord {
                line: line_number,
                source,
            }
        })?;
        let index = build_index(&document, text_fields).map_err(|source| LoadError::Index {
            line: line_number,
            source,
        })?;
        records.push(IndexedRecord::new(document, index, entry.deleted));
    }

    Ok(records)
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
