use gtfs_feed::FeedTable;
use thiserror::Error;

/// Failure of a query, mapped to an HTTP status by [crate::response]
#[derive(Error, Debug)]
pub enum QueryError {
    /// A feed file is missing, unreadable or malformed
    #[error("could not read {}", table.file_name())]
    Read {
        table: FeedTable,
        #[source]
        source: gtfs_feed::Error,
    },
    /// The primary entity of the query does not exist
    #[error("no {entity} found with id {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("could not serialize the response")]
    Serialize(#[from] serde_json::Error),
    #[error("{0}")]
    Internal(String),
}
