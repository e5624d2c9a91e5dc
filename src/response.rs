use crate::error::QueryError;
use log::error;
use serde::Serialize;
use warp::http::header::{HeaderValue, CONTENT_TYPE};
use warp::http::StatusCode;
use warp::reply::Response;

pub const GENERIC_ERROR: &str = "Error processing GTFS files";

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

fn json_response(body: Vec<u8>, status: StatusCode) -> Response {
    let mut response = Response::new(body.into());
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

fn error_response(status: StatusCode, message: &str) -> Response {
    match serde_json::to_vec(&ErrorBody { error: message }) {
        Ok(body) => json_response(body, status),
        Err(e) => {
            error!("Could not serialize error message {:?}: {}", message, e);
            json_response(br#"{"error":"Error processing GTFS files"}"#.to_vec(), status)
        }
    }
}

/// Status code and client facing message of a failed query
///
/// Internal details are logged here and never sent to the client.
pub fn status_and_message(err: &QueryError) -> (StatusCode, String) {
    match err {
        QueryError::Read { table, source } => {
            error!("Could not read {}: {:?}", table.file_name(), source);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error reading {}", table.file_name()),
            )
        }
        QueryError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            format!("No {entity} found with {entity}_id {id}"),
        ),
        QueryError::Serialize(_) | QueryError::Internal(_) => {
            error!("{:?}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR.to_owned())
        }
    }
}

pub fn success<T: Serialize + ?Sized>(value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => json_response(body, StatusCode::OK),
        Err(e) => failure(&QueryError::from(e)),
    }
}

pub fn failure(err: &QueryError) -> Response {
    let (status, message) = status_and_message(err);
    error_response(status, &message)
}

pub fn reply<T: Serialize>(result: Result<T, QueryError>) -> Response {
    match result {
        Ok(value) => success(&value),
        Err(e) => failure(&e),
    }
}
