use crate::RequestId;

/// Side effects requested by `update`; executed by the host, never by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open the streamed POST for a validated request.
    StartSearch {
        request_id: RequestId,
        search_type: String,
        query: String,
    },
    /// Abort the network operation of a request that is still in flight.
    CancelSearch { request_id: RequestId },
    /// Post-process the links of the rendered answer once its request settled.
    FinalizeResults { request_id: RequestId, html: String },
}
