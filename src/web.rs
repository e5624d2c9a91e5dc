use crate::configuration::Configuration;
use crate::error::QueryError;
use crate::feed_cache::FeedCache;
use crate::query_engine::QueryEngine;
use crate::response;
use crate::web_app_data::AppData;
use gtfs_feed::{FeedReader, FeedSource, FeedTable};
use log::{debug, error, info, warn};
use std::convert::Infallible;
use std::path::Path;
use std::sync::Arc;
use warp::reply::Response;
use warp::{Filter, Rejection};

fn with_appdata(
    ad: Arc<AppData>,
) -> impl Filter<Extract = (Arc<AppData>,), Error = Infallible> + Clone {
    warp::any().map(move || ad.clone())
}

/// Path segments are percent-decoded, an invalid encoding is used as is
fn decode_segment(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_owned())
}

async fn list_table(ad: Arc<AppData>, table: FeedTable) -> Result<Response, Infallible> {
    Ok(match ad.engine.list_all(table).await {
        Ok(t) => response::success(&*t),
        Err(e) => response::failure(&e),
    })
}

async fn shape(raw_shape_id: String, ad: Arc<AppData>) -> Result<Response, Infallible> {
    let shape_id = decode_segment(&raw_shape_id);
    Ok(response::reply(ad.engine.shape_by_id(&shape_id).await))
}

async fn trip(raw_trip_id: String, ad: Arc<AppData>) -> Result<Response, Infallible> {
    let trip_id = decode_segment(&raw_trip_id);

    if let Some(cached) = ad.trip_cache.check_cache(&trip_id) {
        return Ok(response::success(&cached));
    }

    let detail = ad.engine.trip_detail(&trip_id).await.and_then(|detail| {
        serde_json::to_value(detail).map_err(QueryError::from)
    });
    if let Ok(value) = &detail {
        ad.trip_cache.insert_cache(trip_id, value.clone());
        debug!("{} trip details cached", ad.trip_cache.len());
    }
    Ok(response::reply(detail))
}

fn table_listing(
    ad: Arc<AppData>,
    table: FeedTable,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    warp::get()
        .and(warp::path("api"))
        .and(warp::path(table.name()))
        .and(warp::path::end())
        .and(with_appdata(ad))
        .and_then(move |ad| list_table(ad, table))
}

/// Every endpoint of the API, without the cors, log and compression layers
pub fn routes(ad: Arc<AppData>) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let shape_points = warp::get()
        .and(warp::path!("api" / "shapes" / String))
        .and(with_appdata(ad.clone()))
        .and_then(shape);

    let trip_detail = warp::get()
        .and(warp::path!("api" / "trip" / String))
        .and(with_appdata(ad.clone()))
        .and_then(trip);

    table_listing(ad.clone(), FeedTable::Stops)
        .or(table_listing(ad.clone(), FeedTable::Routes))
        .unify()
        .or(table_listing(ad.clone(), FeedTable::Trips))
        .unify()
        .or(table_listing(ad, FeedTable::StopTimes))
        .unify()
        .or(shape_points)
        .unify()
        .or(trip_detail)
        .unify()
}

/// A path that is neither a file nor a directory is still served as a directory: every table
/// read then fails with a missing file until the feed shows up.
fn feed_source(path: &Path) -> FeedSource {
    FeedSource::from_path(path).unwrap_or_else(|e| {
        warn!("{}, serving errors until the feed is available", e);
        FeedSource::Directory(path.to_owned())
    })
}

fn appdata(config: &Configuration) -> Arc<AppData> {
    let reader = FeedReader::default().trim_fields(config.trim_fields);
    let cache = FeedCache::new(feed_source(&config.data_path), reader);
    AppData::new(QueryEngine::new(Arc::new(cache)), config.trip_cache_size)
}

pub async fn main(config: Configuration) -> anyhow::Result<()> {
    let appdata = appdata(&config);

    if config.preload {
        let cache = appdata.engine.cache();
        info!("Preloading {}", cache.source());
        if let Err(e) = cache.preload().await {
            error!("Preloading failed, the table will be read again on request: {}", e);
        }
        let loaded = FeedTable::ALL
            .iter()
            .filter(|table| cache.is_loaded(**table))
            .count();
        info!("{}/{} tables in memory", loaded, FeedTable::ALL.len());
    }

    let cors_policy = warp::cors()
        .allow_any_origin()
        .allow_headers(vec![
            "Access-Control-Allow-Origin",
            "Origin",
            "Accept",
            "X-Requested-With",
            "Content-Type",
        ])
        .allow_methods(["GET"]);

    info!("Setup done, listening on port {}", config.port);

    let log = warp::log("gtfs_api");
    let filters = routes(appdata)
        .with(warp::compression::gzip())
        .with(cors_policy)
        .with(log);

    warp::serve(filters).run(([0, 0, 0, 0], config.port)).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use warp::http::StatusCode;

    fn appdata(path: &str, trip_cache_size: usize) -> Arc<AppData> {
        super::appdata(&Configuration {
            data_path: path.into(),
            port: 3000,
            trip_cache_size,
            preload: false,
            trim_fields: true,
        })
    }

    async fn get(ad: &Arc<AppData>, path: &str) -> (StatusCode, Value) {
        let res = warp::test::request()
            .method("GET")
            .path(path)
            .reply(&routes(ad.clone()))
            .await;
        let body = if res.body().is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(res.body()).unwrap()
        };
        (res.status(), body)
    }

    #[tokio::test]
    async fn listings() {
        let ad = appdata("fixtures/feed", 0);
        for (path, count) in [
            ("/api/stops", 3),
            ("/api/routes", 2),
            ("/api/trips", 3),
            ("/api/stop_times", 7),
        ] {
            let (status, body) = get(&ad, path).await;
            assert_eq!(StatusCode::OK, status, "{}", path);
            assert_eq!(count, body.as_array().unwrap().len(), "{}", path);
        }

        let (_, stops) = get(&ad, "/api/stops").await;
        assert_eq!(
            json!({"stop_id": "S_A", "stop_name": "Plaza Mayor", "stop_lat": "40.4155", "stop_lon": "-3.7074"}),
            stops[0]
        );
    }

    #[tokio::test]
    async fn shape_points_are_sorted() {
        let ad = appdata("fixtures/feed", 0);
        let (status, body) = get(&ad, "/api/shapes/S1").await;
        assert_eq!(StatusCode::OK, status);
        let sequences: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["shape_pt_sequence"].as_str().unwrap())
            .collect();
        assert_eq!(vec!["1", "2", "3"], sequences);

        let (status, body) = get(&ad, "/api/shapes/unknown").await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(json!([]), body);
    }

    #[tokio::test]
    async fn trip_detail() {
        let ad = appdata("fixtures/feed", 10);
        let (status, body) = get(&ad, "/api/trip/T1").await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!("T1", body["trip_id"]);
        assert_eq!("X", body["route"]["route_short_name"]);
        assert_eq!("1", body["stop_times"][0]["stop_sequence"]);
        assert_eq!("Plaza Mayor", body["stop_times"][0]["stop_name"]);
        assert_eq!("2", body["stop_times"][1]["stop_sequence"]);
        assert_eq!("Unknown", body["stop_times"][1]["stop_name"]);
        assert_eq!(Value::Null, body["stop_times"][1]["stop_lat"]);
        assert_eq!(Value::Null, body["stop_times"][1]["stop_lon"]);
    }

    #[tokio::test]
    async fn trip_without_route() {
        let ad = appdata("fixtures/feed", 0);
        let (status, body) = get(&ad, "/api/trip/T2").await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(Value::Null, body["route"]);
        assert_eq!(3, body["stop_times"].as_array().unwrap().len());
    }

    #[tokio::test]
    async fn unknown_trip() {
        let ad = appdata("fixtures/feed", 10);
        let (status, body) = get(&ad, "/api/trip/UNKNOWN").await;
        assert_eq!(StatusCode::NOT_FOUND, status);
        assert_eq!(json!({"error": "No trip found with trip_id UNKNOWN"}), body);
        assert_eq!(0, ad.trip_cache.len());
    }

    #[tokio::test]
    async fn percent_encoded_ids() {
        let ad = appdata("fixtures/feed", 0);
        let (status, body) = get(&ad, "/api/trip/T%201").await;
        assert_eq!(StatusCode::NOT_FOUND, status);
        assert_eq!(json!({"error": "No trip found with trip_id T 1"}), body);
    }

    #[tokio::test]
    async fn responses_are_identical() {
        let ad = appdata("fixtures/feed", 10);
        let mut bodies = Vec::new();
        for _ in 0..3 {
            let res = warp::test::request()
                .path("/api/trip/T3")
                .reply(&routes(ad.clone()))
                .await;
            assert_eq!(StatusCode::OK, res.status());
            bodies.push(res.body().clone());
        }
        assert_eq!(1, ad.trip_cache.len());
        assert_eq!(bodies[0], bodies[1]);
        assert_eq!(bodies[1], bodies[2]);

        let first = warp::test::request().path("/api/shapes/S2").reply(&routes(ad.clone())).await;
        let second = warp::test::request().path("/api/shapes/S2").reply(&routes(ad.clone())).await;
        assert_eq!(first.body(), second.body());
    }

    #[tokio::test]
    async fn read_failures() {
        let ad = appdata("fixtures/partial", 10);

        let (status, _) = get(&ad, "/api/stops").await;
        assert_eq!(StatusCode::OK, status);

        let (status, body) = get(&ad, "/api/routes").await;
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status);
        assert_eq!(json!({"error": "Error reading routes.txt"}), body);

        let (status, body) = get(&ad, "/api/shapes/S1").await;
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status);
        assert_eq!(json!({"error": "Error reading shapes.txt"}), body);

        let (status, body) = get(&ad, "/api/trip/T1").await;
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status);
        assert!(body["error"].as_str().unwrap().starts_with("Error reading "));
    }

    #[tokio::test]
    async fn unknown_paths() {
        let ad = appdata("fixtures/feed", 0);
        let (status, _) = get(&ad, "/api/agency").await;
        assert_eq!(StatusCode::NOT_FOUND, status);
        let (status, _) = get(&ad, "/api/stops/extra").await;
        assert_eq!(StatusCode::NOT_FOUND, status);
    }

    #[tokio::test]
    async fn missing_feed_path() {
        let ad = appdata("fixtures/does-not-exist", 10);
        assert_eq!(
            &FeedSource::Directory("fixtures/does-not-exist".into()),
            ad.engine.cache().source()
        );

        let (status, body) = get(&ad, "/api/stops").await;
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status);
        assert_eq!(json!({"error": "Error reading stops.txt"}), body);

        let (status, _) = get(&ad, "/api/trip/T1").await;
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status);
        assert_eq!(0, ad.trip_cache.len());

        assert!(ad.engine.cache().preload().await.is_err());
    }
}
