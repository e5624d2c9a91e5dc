use crate::error::QueryError;
use gtfs_feed::{Record, Table};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::HashMap;

pub const UNKNOWN_STOP_NAME: &str = "Unknown";

const TRIP_ID: &str = "trip_id";
const ROUTE_ID: &str = "route_id";
const STOP_ID: &str = "stop_id";
const STOP_SEQUENCE: &str = "stop_sequence";

/// A stop time of the trip, with the name and position of its stop
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedStopTime {
    pub stop_id: String,
    pub stop_sequence: String,
    pub arrival_time: String,
    pub departure_time: String,
    pub stop_name: String,
    pub stop_lat: Option<String>,
    pub stop_lon: Option<String>,
}

impl EnrichedStopTime {
    fn new(stop_time: &Record, stop: Option<&Record>) -> Self {
        let field = |column| stop_time.get(column).unwrap_or_default().to_owned();
        let stop_field = |column| {
            stop.and_then(|s| s.get_non_empty(column))
                .map(str::to_owned)
        };

        EnrichedStopTime {
            stop_id: field(STOP_ID),
            stop_sequence: field(STOP_SEQUENCE),
            arrival_time: field("arrival_time"),
            departure_time: field("departure_time"),
            stop_name: stop_field("stop_name").unwrap_or_else(|| UNKNOWN_STOP_NAME.to_owned()),
            stop_lat: stop_field("stop_lat"),
            stop_lon: stop_field("stop_lon"),
        }
    }
}

/// A trip with its route and its ordered stop times
///
/// Serialized as the columns of the trip followed by `route` and `stop_times`.
#[derive(Debug, Clone)]
pub struct TripDetail {
    pub trip: Record,
    pub route: Option<Record>,
    pub stop_times: Vec<EnrichedStopTime>,
}

impl Serialize for TripDetail {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        for (column, value) in self.trip.columns() {
            // Joined values replace trip columns with the same name
            if column != "route" && column != "stop_times" {
                map.serialize_entry(column, value)?;
            }
        }
        map.serialize_entry("route", &self.route)?;
        map.serialize_entry("stop_times", &self.stop_times)?;
        map.end()
    }
}

/// Joins a trip with its route, its stop times and their stops
///
/// Only a missing trip is an error. A trip whose route does not exist has no route, and a stop time
/// whose stop does not exist is kept with [UNKNOWN_STOP_NAME] and no position.
pub fn assemble(
    trip_id: &str,
    trips: &Table,
    stop_times: &Table,
    stops: &Table,
    routes: &Table,
) -> Result<TripDetail, QueryError> {
    let trip = trips
        .find(TRIP_ID, trip_id)
        .ok_or_else(|| QueryError::NotFound {
            entity: "trip",
            id: trip_id.to_owned(),
        })?;

    let route = trip
        .get(ROUTE_ID)
        .and_then(|route_id| routes.find(ROUTE_ID, route_id));

    let mut trip_stop_times: Vec<&Record> = stop_times.filter(TRIP_ID, trip_id).collect();
    trip_stop_times.sort_by_cached_key(|st| st.sequence(STOP_SEQUENCE));

    let stops_by_id: HashMap<&str, &Record> = stops.index_by(STOP_ID);
    let enriched = trip_stop_times
        .into_iter()
        .map(|st| {
            let stop = st
                .get(STOP_ID)
                .and_then(|stop_id| stops_by_id.get(stop_id).copied());
            EnrichedStopTime::new(st, stop)
        })
        .collect();

    Ok(TripDetail {
        trip: trip.clone(),
        route: route.cloned(),
        stop_times: enriched,
    })
}
