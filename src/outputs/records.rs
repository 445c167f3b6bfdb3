//! Append-only CSV record stores.
//!
//! Both the primary and the secondary store use the same layout:
//!
//! ```text
//! keyword,article_url,article_content
//! malware,https://www.bbc.co.uk/news/technology-1,new malware strain found
//! ```
//!
//! Rows are flushed as they are written, so an interrupted collection leaves
//! every completed row on disk and a rerun can pick up where it stopped.

use crate::error::{AppError, Result};
use crate::models::ArticleRecord;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::{info, instrument};

/// Writes [`ArticleRecord`]s one row at a time.
pub struct RecordWriter<W: Write> {
    writer: csv::Writer<W>,
    path: String,
    written: usize,
}

impl RecordWriter<File> {
    /// Open the store at `path` for appending.
    ///
    /// The header row is written when the file is new, empty, or `fresh` is
    /// set (which truncates any existing contents).
    #[instrument(level = "info")]
    pub fn open(path: &str, fresh: bool) -> Result<Self> {
        let store_err = |e: std::io::Error| AppError::RecordStore {
            path: path.to_string(),
            source: e.into(),
        };
        let existing_len = if fresh {
            0
        } else {
            std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
        };
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(!fresh)
            .truncate(fresh)
            .open(path)
            .map_err(store_err)?;
        info!(append = existing_len > 0, "Opened record store");
        Ok(Self::from_writer(file, path, existing_len == 0))
    }
}

impl<W: Write> RecordWriter<W> {
    /// Wrap any writer; `write_header` controls whether the first row is the header.
    pub fn from_writer(inner: W, path: &str, write_header: bool) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(inner);
        Self {
            writer,
            path: path.to_string(),
            written: 0,
        }
    }

    /// Append one record and flush it through to the underlying writer.
    pub fn append(&mut self, record: &ArticleRecord) -> Result<()> {
        self.writer
            .serialize(record)
            .and_then(|_| self.writer.flush().map_err(csv::Error::from))
            .map_err(|source| AppError::RecordStore {
                path: self.path.clone(),
                source,
            })?;
        self.written += 1;
        Ok(())
    }

    /// Number of records appended through this writer.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Flush and hand back the underlying writer.
    #[cfg(test)]
    pub fn into_inner(self) -> Result<W> {
        let path = self.path;
        self.writer
            .into_inner()
            .map_err(|e| AppError::RecordStore {
                path,
                source: std::io::Error::other(e.to_string()).into(),
            })
    }
}

/// Read every record in the store at `path`, in file order.
#[instrument(level = "info")]
pub fn load_records(path: &str) -> Result<Vec<ArticleRecord>> {
    let store_err = |source: csv::Error| AppError::RecordStore {
        path: path.to_string(),
        source,
    };
    let mut reader = csv::Reader::from_path(Path::new(path)).map_err(store_err)?;
    let records = reader
        .deserialize::<ArticleRecord>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(store_err)?;
    info!(count = records.len(), "Loaded records");
    Ok(records)
}

/// `(keyword, url)` pairs already present in the store, for skipping on rerun.
///
/// A missing store simply means nothing has been collected yet.
pub fn collected_links(path: &str) -> Result<HashSet<(String, String)>> {
    if !Path::new(path).exists() {
        return Ok(HashSet::new());
    }
    Ok(load_records(path)?
        .into_iter()
        .map(|r| (r.keyword.to_lowercase(), r.article_url))
        .collect())
}
