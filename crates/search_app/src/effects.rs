use std::sync::mpsc;
use std::thread;

use search_core::{Effect, Frame, LogContent, Msg, SearchOutcome, TokenUsage};
use search_engine::{
    harden_result_links, ClientSettings, EngineError, EngineEvent, EngineHandle, SearchError,
    SearchRequest, StreamFrame, StreamSummary,
};
use search_logging::{search_debug, search_info};

use crate::app::AppEvent;

pub(crate) struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub(crate) fn new(
        settings: ClientSettings,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Result<Self, EngineError> {
        let (engine, events) = EngineHandle::new(settings)?;
        spawn_event_forwarder(events, event_tx);
        Ok(Self { engine })
    }

    /// Executes effects. Effects that complete synchronously return their
    /// follow-up messages, to be applied before anything else.
    pub(crate) fn run(&self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut follow_ups = Vec::new();
        for effect in effects {
            match effect {
                Effect::StartSearch {
                    request_id,
                    search_type,
                    query,
                } => {
                    search_info!(
                        "StartSearch request_id={} type={} query_len={}",
                        request_id,
                        search_type,
                        query.len()
                    );
                    self.engine.start(
                        request_id,
                        SearchRequest {
                            search_type,
                            query,
                        },
                    );
                }
                Effect::CancelSearch { request_id } => {
                    search_debug!("CancelSearch request_id={}", request_id);
                    self.engine.cancel(request_id);
                }
                Effect::FinalizeResults { request_id, html } => {
                    follow_ups.push(Msg::ResultsFinalized {
                        request_id,
                        html: harden_result_links(&html),
                    });
                }
            }
        }
        follow_ups
    }
}

fn spawn_event_forwarder(events: mpsc::Receiver<EngineEvent>, event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        for event in events {
            if event_tx.send(AppEvent::Msg(map_event(event))).is_err() {
                break;
            }
        }
    });
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Frame { request_id, frame } => Msg::FrameReceived {
            request_id,
            frame: map_frame(frame),
        },
        EngineEvent::Settled { request_id, result } => Msg::SearchSettled {
            request_id,
            outcome: map_outcome(result),
        },
    }
}

fn map_frame(frame: StreamFrame) -> Frame {
    match frame {
        StreamFrame::Output(html) => Frame::Output(html),
        StreamFrame::Log(search_engine::LogContent::Text(text)) => {
            Frame::Log(LogContent::Text(text))
        }
        StreamFrame::Log(search_engine::LogContent::Step { query, explanation }) => {
            Frame::Log(LogContent::Step { query, explanation })
        }
        StreamFrame::TokenUsage(usage) => Frame::TokenUsage(TokenUsage {
            prompt: usage.prompt_tokens,
            completion: usage.completion_tokens,
        }),
        StreamFrame::Error(content) => Frame::Error(content),
    }
}

fn map_outcome(result: Result<StreamSummary, SearchError>) -> SearchOutcome {
    match result {
        Ok(_) => SearchOutcome::Completed,
        Err(err) if err.is_cancelled() => SearchOutcome::Cancelled,
        Err(err) => SearchOutcome::Failed(err.to_string()),
    }
}
