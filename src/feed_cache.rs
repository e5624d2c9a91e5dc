use crate::error::QueryError;
use gtfs_feed::{FeedReader, FeedSource, FeedTable, Table};
use log::{error, info};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::OnceCell;

/// Feed tables, read on first use and kept for the lifetime of the process
///
/// Each table has its own cell: concurrent first requests for the same table wait on a single
/// read, and a failed read leaves the cell empty so that the next request tries again.
pub struct FeedCache {
    source: FeedSource,
    reader: FeedReader,
    tables: [OnceCell<Arc<Table>>; FeedTable::ALL.len()],
}

impl FeedCache {
    pub fn new(source: FeedSource, reader: FeedReader) -> Self {
        FeedCache {
            source,
            reader,
            tables: Default::default(),
        }
    }

    pub fn source(&self) -> &FeedSource {
        &self.source
    }

    fn cell(&self, table: FeedTable) -> &OnceCell<Arc<Table>> {
        &self.tables[table as usize]
    }

    pub fn is_loaded(&self, table: FeedTable) -> bool {
        self.cell(table).initialized()
    }

    pub async fn get(&self, table: FeedTable) -> Result<Arc<Table>, QueryError> {
        self.cell(table)
            .get_or_try_init(|| self.load(table))
            .await
            .cloned()
    }

    /// Reads every table concurrently, logging the failures
    pub async fn preload(&self) -> Result<(), QueryError> {
        let loads = FeedTable::ALL.map(|table| self.get(table));
        let results = futures::future::join_all(loads).await;

        let mut first_error = None;
        for (table, result) in FeedTable::ALL.into_iter().zip(results) {
            match result {
                Ok(t) => info!("  {}: {} objects", table, t.len()),
                Err(e) => {
                    error!("  {}: {}", table, e);
                    first_error.get_or_insert(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    async fn load(&self, table: FeedTable) -> Result<Arc<Table>, QueryError> {
        info!("Loading {} from {}", table.file_name(), self.source);
        let now = Instant::now();

        let source = self.source.clone();
        let reader = self.reader.clone();
        let loaded = tokio::task::spawn_blocking(move || reader.read_table(&source, table))
            .await
            .map_err(|e| QueryError::Internal(format!("reading {} did not finish: {}", table, e)))?
            .map_err(|source| QueryError::Read { table, source })?;

        info!(
            "Loaded {} rows of {} in {} ms",
            loaded.len(),
            loaded.kind().file_name(),
            now.elapsed().as_millis()
        );
        Ok(Arc::new(loaded))
    }
}
