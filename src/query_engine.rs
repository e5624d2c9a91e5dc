use crate::error::QueryError;
use crate::feed_cache::FeedCache;
use crate::shape::shape_points;
use crate::trip_details::{self, TripDetail};
use gtfs_feed::{FeedTable, Record, Table};
use std::sync::Arc;

/// Answers the API queries from the tables of a [FeedCache]
#[derive(Clone)]
pub struct QueryEngine {
    cache: Arc<FeedCache>,
}

impl QueryEngine {
    pub fn new(cache: Arc<FeedCache>) -> Self {
        QueryEngine { cache }
    }

    pub fn cache(&self) -> &FeedCache {
        &self.cache
    }

    /// The whole table, in file order
    pub async fn list_all(&self, table: FeedTable) -> Result<Arc<Table>, QueryError> {
        self.cache.get(table).await
    }

    pub async fn shape_by_id(&self, shape_id: &str) -> Result<Vec<Record>, QueryError> {
        let shapes = self.cache.get(FeedTable::Shapes).await?;
        Ok(shape_points(&shapes, shape_id).into_iter().cloned().collect())
    }

    /// The four tables are fetched concurrently, the join starts once all of them are there
    pub async fn trip_detail(&self, trip_id: &str) -> Result<TripDetail, QueryError> {
        let (trips, stop_times, stops, routes) = futures::try_join!(
            self.cache.get(FeedTable::Trips),
            self.cache.get(FeedTable::StopTimes),
            self.cache.get(FeedTable::Stops),
            self.cache.get(FeedTable::Routes)
        )?;

        trip_details::assemble(trip_id, &trips, &stop_times, &stops, &routes)
    }
}
