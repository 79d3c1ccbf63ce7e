use crate::{Frame, RequestId, SearchOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the query field.
    QueryChanged(String),
    /// User picked a value in the search type selector (raw selector value).
    SearchTypeSelected(String),
    /// User triggered a search (button or Enter).
    SearchRequested,
    /// User asked to abort the in-flight search.
    CancelRequested,
    /// Engine decoded a frame from a request's stream.
    FrameReceived { request_id: RequestId, frame: Frame },
    /// Engine finished a request's stream, one way or another.
    SearchSettled {
        request_id: RequestId,
        outcome: SearchOutcome,
    },
    /// Result HTML with hardened links, produced for `Effect::FinalizeResults`.
    ResultsFinalized { request_id: RequestId, html: String },
    /// User clicked "show steps".
    ShowStepsClicked,
    /// User clicked "hide steps".
    HideStepsClicked,
}
