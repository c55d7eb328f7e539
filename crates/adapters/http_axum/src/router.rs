//! Axum router assembly and the dynamic rest-point handler.

use std::collections::HashMap;

use axum::Router;
use axum::body::to_bytes;
use axum::extract::{Query, Request, State};
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use http_body_util::LengthLimitError;
use serde_json::Value;
use tower_http::trace::TraceLayer;

use restpub_app::dispatcher::{RouteKind, Verb};
use restpub_app::format::RestResponse;
use restpub_app::scope::{Params, PublishScope};

use crate::state::AppState;

/// Header the host authentication layer uses to convey the caller identity.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Request bodies above this size are rejected outright.
const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Build the top-level axum [`Router`].
///
/// Every path except `/health` falls through to the rest-point handler,
/// which resolves it against the publisher's route table. Includes a
/// [`TraceLayer`] that logs each HTTP request/response at the `DEBUG` level
/// using the `tracing` ecosystem.
pub fn build(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .fallback(handle_rest_point)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

/// Resolve and dispatch one request against the published rest points.
async fn handle_rest_point(State(state): State<AppState>, request: Request) -> Response {
    let Some(verb) = Verb::parse(request.method().as_str()) else {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    };

    let path = request.uri().path().to_string();
    let Some((resource, route)) = state.publisher.lookup(&path) else {
        tracing::debug!(%path, "no published rest point matched");
        return StatusCode::NOT_FOUND.into_response();
    };

    let query = parse_query(request.uri());
    let user_id = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);
    let id = match &route {
        RouteKind::Item { id } => Some(id.clone()),
        RouteKind::Base => None,
    };
    let scope = PublishScope {
        user_id,
        params: Params { id },
        query,
    };

    let body = match read_json_body(request).await {
        Ok(value) => value,
        Err(response) => return response,
    };

    // Snapshot the registry so one request sees one consistent set of
    // format handlers.
    let formats = state.publisher.formats();

    match resource.dispatch(verb, route, &scope, body, &formats).await {
        Some(response) => into_axum(response),
        None => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

/// Parse the request body as JSON; an absent body counts as an empty object.
async fn read_json_body(request: Request) -> Result<Value, Response> {
    let bytes = to_bytes(request.into_body(), BODY_LIMIT)
        .await
        .map_err(|err| body_read_status(&err).into_response())?;
    if bytes.is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_slice(&bytes).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            [(header::CONTENT_TYPE, "application/json")],
            "{\"error\":\"Request body is not valid JSON\"}",
        )
            .into_response()
    })
}

/// 413 only when the configured body limit tripped; any other read failure
/// (the connection broke mid-body, for instance) is the client's 400.
fn body_read_status(err: &axum::Error) -> StatusCode {
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        if cause.is::<LengthLimitError>() {
            return StatusCode::PAYLOAD_TOO_LARGE;
        }
        source = cause.source();
    }
    StatusCode::BAD_REQUEST
}

/// Decode the query string into a flat key/value map, percent-decoding
/// included. An undecodable query yields an empty map, not a failure.
fn parse_query(uri: &Uri) -> HashMap<String, String> {
    Query::<HashMap<String, String>>::try_from_uri(uri)
        .map(|Query(map)| map)
        .unwrap_or_default()
}

fn into_axum(response: RestResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, response.content_type)],
        response.body,
    )
        .into_response()
}
