use std::sync::mpsc;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use search_logging::{search_debug, search_info, search_warn};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    DecodedLine, EngineEvent, FailureKind, NdjsonDecoder, RequestId, SearchError, SearchRequest,
    StreamFrame, StreamSummary,
};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";

/// Characters of a skipped line kept in its warning.
const SKIPPED_LINE_EXCERPT: usize = 120;

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Server root; requests go to `{base_url}/search/{search_type}`.
    pub base_url: String,
    /// Bounds connection setup only. A response body may stream for as long as it likes.
    pub connect_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Receives frames in stream order as they are decoded.
pub trait FrameSink: Send + Sync {
    fn emit(&self, request_id: RequestId, frame: StreamFrame);
}

pub struct ChannelFrameSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelFrameSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl FrameSink for ChannelFrameSink {
    fn emit(&self, request_id: RequestId, frame: StreamFrame) {
        let _ = self.tx.send(EngineEvent::Frame { request_id, frame });
    }
}

#[async_trait::async_trait]
pub trait SearchClient: Send + Sync {
    /// Runs one search to the end of its response stream.
    ///
    /// Must return `FailureKind::Cancelled` promptly once `cancel` fires, and
    /// must not emit frames after that.
    async fn search(
        &self,
        request_id: RequestId,
        request: &SearchRequest,
        cancel: &CancellationToken,
        sink: &dyn FrameSink,
    ) -> Result<StreamSummary, SearchError>;
}

#[derive(Serialize)]
struct QueryBody<'a> {
    query: &'a str,
}

#[derive(Debug, Clone)]
pub struct ReqwestSearchClient {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestSearchClient {
    pub fn new(settings: ClientSettings) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| SearchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, search_type: &str) -> Result<Url, SearchError> {
        let mut base = Url::parse(&self.settings.base_url)
            .map_err(|err| SearchError::new(FailureKind::InvalidRequest, err.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(&format!("search/{search_type}"))
            .map_err(|err| SearchError::new(FailureKind::InvalidRequest, err.to_string()))
    }
}

#[async_trait::async_trait]
impl SearchClient for ReqwestSearchClient {
    async fn search(
        &self,
        request_id: RequestId,
        request: &SearchRequest,
        cancel: &CancellationToken,
        sink: &dyn FrameSink,
    ) -> Result<StreamSummary, SearchError> {
        let url = self.endpoint(&request.search_type)?;
        let body = serde_json::to_vec(&QueryBody {
            query: &request.query,
        })
        .map_err(|err| SearchError::new(FailureKind::InvalidRequest, err.to_string()))?;

        search_info!(
            "request {} POST {} query_len={}",
            request_id,
            url,
            request.query.len()
        );

        let send = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send();
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SearchError::cancelled()),
            result = send => result.map_err(map_reqwest_error)?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.canonical_reason().unwrap_or("unexpected status"),
            ));
        }

        let mut decoder = NdjsonDecoder::new();
        let mut summary = StreamSummary::default();
        let mut stream = response.bytes_stream();
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(SearchError::cancelled()),
                next = stream.next() => next,
            };
            let Some(chunk) = next else {
                break;
            };
            let chunk = chunk.map_err(map_reqwest_error)?;
            summary.bytes += chunk.len() as u64;
            dispatch(request_id, decoder.push(&chunk), cancel, sink, &mut summary)?;
        }
        dispatch(request_id, decoder.finish(), cancel, sink, &mut summary)?;

        search_debug!(
            "request {} stream ended: frames={} skipped={} bytes={}",
            request_id,
            summary.frames,
            summary.skipped_lines,
            summary.bytes
        );
        Ok(summary)
    }
}

fn dispatch(
    request_id: RequestId,
    lines: Vec<DecodedLine>,
    cancel: &CancellationToken,
    sink: &dyn FrameSink,
    summary: &mut StreamSummary,
) -> Result<(), SearchError> {
    for line in lines {
        if cancel.is_cancelled() {
            return Err(SearchError::cancelled());
        }
        match line.result {
            Ok(frame) => {
                summary.frames += 1;
                sink.emit(request_id, frame);
            }
            Err(err) => {
                summary.skipped_lines += 1;
                search_warn!(
                    "request {} skipped line {}: {} in {:?}",
                    request_id,
                    line.line_number,
                    err,
                    excerpt(&line.text)
                );
            }
        }
    }
    Ok(())
}

fn excerpt(line: &str) -> String {
    let line = line.trim();
    match line.char_indices().nth(SKIPPED_LINE_EXCERPT) {
        Some((cut, _)) => format!("{}...", &line[..cut]),
        None => line.to_string(),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> SearchError {
    if err.is_builder() {
        return SearchError::new(FailureKind::InvalidRequest, err.to_string());
    }
    SearchError::new(FailureKind::Network, err.to_string())
}
