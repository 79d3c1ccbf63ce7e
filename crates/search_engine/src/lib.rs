//! Search engine: streamed search requests, NDJSON decoding and effect execution.
mod client;
mod engine;
mod frame;
mod links;
mod ndjson;
mod text;
mod types;

pub use client::{
    ChannelFrameSink, ClientSettings, FrameSink, ReqwestSearchClient, SearchClient,
    DEFAULT_BASE_URL,
};
pub use engine::{EngineError, EngineHandle};
pub use frame::{parse_frame, FrameError, LogContent, StreamFrame, TokenUsage};
pub use links::{collect_result_links, harden_result_links, ResultLink, RESULT_LINK_CLASS};
pub use ndjson::{DecodedLine, LineBuffer, NdjsonDecoder};
pub use text::fragment_text;
pub use types::{
    EngineEvent, FailureKind, RequestId, SearchError, SearchRequest, StreamSummary,
};
