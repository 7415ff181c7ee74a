//! Asynchronous CSV reader for the local account service's data files
//!
//! # Design
//!
//! The AsyncReader uses:
//! - csv-async for streaming CSV parsing
//! - tokio for async file access (bridged with tokio-util's compat layer)
//! - caller-supplied conversion from raw rows to domain types
//!
//! Malformed rows are logged and skipped so that one bad line does not hide
//! the rest of the file.

use crate::types::ExportError;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};

/// Asynchronous CSV reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
}

impl AsyncReader<Compat<tokio::fs::File>> {
    /// Open a CSV file on disk
    ///
    /// # Errors
    ///
    /// Returns `ExportError::IoError` if the file cannot be opened.
    pub async fn open(path: &Path) -> Result<Self, ExportError> {
        let file = tokio::fs::File::open(path).await.map_err(|e| ExportError::IoError {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;

        // Wrap tokio file in a compatibility layer for csv-async
        Ok(Self::new(file.compat()))
    }
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self { csv_reader }
    }

    /// Read every remaining row, converting each one with `convert`
    ///
    /// Rows that fail to deserialize or convert are logged at `warn` level
    /// and skipped.
    pub async fn read_all<T, U, F>(&mut self, convert: F) -> Vec<U>
    where
        T: DeserializeOwned + 'static,
        F: Fn(T) -> Result<U, String>,
    {
        let mut rows = Vec::new();
        let mut records = self.csv_reader.deserialize::<T>();

        while let Some(record) = records.next().await {
            match record {
                Ok(raw) => match convert(raw) {
                    Ok(row) => rows.push(row),
                    Err(e) => tracing::warn!(error = %e, "Skipping invalid row"),
                },
                Err(e) => {
                    let error = ExportError::from(e);
                    tracing::warn!(%error, "Skipping malformed CSV row");
                }
            }
        }

        rows
    }
}
