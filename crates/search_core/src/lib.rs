//! Search core: pure state machine and view-model helpers for the streaming
//! search client.
mod effect;
mod frame;
mod msg;
mod search_type;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use frame::{Frame, LogContent, SearchOutcome, TokenUsage};
pub use msg::Msg;
pub use search_type::{validate_request, SearchTypeSelection, ValidationError, UNSET_SEARCH_TYPE};
pub use state::{AppState, RequestId, LOADING_TEXT};
pub use update::update;
pub use view_model::{format_token_usage, AppViewModel, ResultsBody, ResultsView, StepsView};
