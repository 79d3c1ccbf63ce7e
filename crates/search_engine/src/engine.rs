use std::sync::{mpsc, Arc};
use std::thread;

use search_logging::{search_debug, search_info, search_warn};
use tokio_util::sync::CancellationToken;

use crate::client::{ChannelFrameSink, ClientSettings, ReqwestSearchClient, SearchClient};
use crate::{EngineEvent, RequestId, SearchError, SearchRequest};

enum EngineCommand {
    Start {
        request_id: RequestId,
        request: SearchRequest,
    },
    Cancel {
        request_id: RequestId,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[from] SearchError),
}

/// Command side of the search engine.
///
/// The engine thread owns a Tokio runtime and at most one active request.
/// Starting a request cancels the previous one before the new stream opens.
/// Events come back on the receiver returned by the constructor.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(
        settings: ClientSettings,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), EngineError> {
        let client = ReqwestSearchClient::new(settings)?;
        Self::with_client(Arc::new(client))
    }

    pub fn with_client(
        client: Arc<dyn SearchClient>,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::Builder::new()
            .name("search-engine".to_string())
            .spawn(move || run_engine(runtime, client, cmd_rx, event_tx))?;

        Ok((Self { cmd_tx }, event_rx))
    }

    pub fn start(&self, request_id: RequestId, request: SearchRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Start {
            request_id,
            request,
        });
    }

    pub fn cancel(&self, request_id: RequestId) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel { request_id });
    }
}

fn run_engine(
    runtime: tokio::runtime::Runtime,
    client: Arc<dyn SearchClient>,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let mut active: Option<(RequestId, CancellationToken)> = None;

    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::Start {
                request_id,
                request,
            } => {
                if let Some((previous, token)) = active.take() {
                    if !token.is_cancelled() {
                        search_debug!("request {} superseded by {}", previous, request_id);
                    }
                    token.cancel();
                }
                let token = CancellationToken::new();
                active = Some((request_id, token.clone()));

                let client = client.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    run_search(client.as_ref(), request_id, request, token, event_tx).await;
                });
            }
            EngineCommand::Cancel { request_id } => match &active {
                Some((id, token)) if *id == request_id => {
                    search_info!("request {} cancelled", request_id);
                    token.cancel();
                }
                _ => search_debug!("ignoring cancel for inactive request {}", request_id),
            },
        }
    }

    // All handles dropped: stop whatever is still streaming.
    if let Some((_, token)) = active {
        token.cancel();
    }
}

async fn run_search(
    client: &dyn SearchClient,
    request_id: RequestId,
    request: SearchRequest,
    cancel: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let sink = ChannelFrameSink::new(event_tx.clone());
    let result = client.search(request_id, &request, &cancel, &sink).await;
    match &result {
        Ok(summary) => search_info!(
            "request {} completed: frames={} skipped={} bytes={}",
            request_id,
            summary.frames,
            summary.skipped_lines,
            summary.bytes
        ),
        Err(err) if err.is_cancelled() => search_debug!("request {} stopped", request_id),
        Err(err) => search_warn!("request {} failed: {}", request_id, err),
    }
    let _ = event_tx.send(EngineEvent::Settled { request_id, result });
}
