//! Request handlers for the callable endpoint

use std::convert::Infallible;
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header::ACCEPT},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use futures::StreamExt;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use super::AppState;
use super::error::{ApiError, ApiResult};
use super::protocol::{
    CallableRequest, CallableResult, HealthResponse, StreamMessage, SuggestRequest,
};
use crate::agents::{NoopCallback, StreamingCallback, SuggestionEngine};
use crate::{log_debug, log_warn};

/// Buffered stream events before the producer waits on the client
const STREAM_BUFFER: usize = 32;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// Parse the callable envelope, mapping any shape error to `INVALID_ARGUMENT`
fn parse_request(body: &Bytes) -> ApiResult<SuggestRequest> {
    let request: CallableRequest<SuggestRequest> = serde_json::from_slice(body).map_err(|e| {
        ApiError::InvalidArgument(format!(
            "Expected a body of the form {{\"data\": {{\"username\": string}}}}: {e}"
        ))
    })?;
    Ok(request.data)
}

fn wants_stream(headers: &HeaderMap) -> bool {
    headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.contains("text/event-stream"))
}

/// `POST <function path>`: suggest a project for `data.username`.
///
/// Answers with `{ "result": text }`, or with server-sent events when the
/// client accepts `text/event-stream`.
pub async fn suggest_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(err) => return err.into_response(),
    };

    if wants_stream(&headers) {
        log_debug!("Streaming suggestion for {}", request.username);
        stream_suggestion(Arc::clone(&state.engine), request.username).into_response()
    } else {
        match state.engine.suggest(&request.username, &NoopCallback).await {
            Ok(result) => Json(CallableResult { result }).into_response(),
            Err(err) => {
                log_warn!("Suggestion for {} failed: {}", request.username, err);
                ApiError::from(err).into_response()
            }
        }
    }
}

fn json_event<T: Serialize>(payload: &T) -> Event {
    Event::default().data(serde_json::to_string(payload).unwrap_or_default())
}

/// Forwards model chunks into the event channel
struct ChannelCallback {
    tx: mpsc::Sender<Event>,
}

#[async_trait]
impl StreamingCallback for ChannelCallback {
    async fn on_chunk(&self, chunk: &str) -> anyhow::Result<()> {
        let event = json_event(&StreamMessage {
            message: chunk.to_string(),
        });
        self.tx
            .send(event)
            .await
            .map_err(|_| anyhow!("client disconnected"))
    }
}

fn stream_suggestion(
    engine: Arc<dyn SuggestionEngine>,
    username: String,
) -> Sse<impl futures::Stream<Item = Result<Event, Infallible>>> {
    let (tx, rx) = mpsc::channel(STREAM_BUFFER);

    tokio::spawn(async move {
        let callback = ChannelCallback { tx: tx.clone() };
        let last = match engine.suggest(&username, &callback).await {
            Ok(result) => json_event(&CallableResult { result }),
            Err(err) => {
                log_warn!("Streamed suggestion for {} failed: {}", username, err);
                json_event(&ApiError::from(err).body())
            }
        };
        // The receiver is gone if the client disconnected; nothing left to do then
        let _ = tx.send(last).await;
    });

    Sse::new(ReceiverStream::new(rx).map(Ok)).keep_alive(KeepAlive::default())
}
