use crate::query_engine::QueryEngine;
use crate::web_cache::TripCache;
use std::sync::Arc;

pub struct AppData {
    pub engine: QueryEngine,
    pub trip_cache: TripCache,
}

impl AppData {
    pub fn new(engine: QueryEngine, trip_cache_size: usize) -> Arc<AppData> {
        Arc::new(AppData {
            engine,
            trip_cache: TripCache::new(trip_cache_size),
        })
    }
}
