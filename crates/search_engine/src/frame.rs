use serde::{Deserialize, Serialize};

/// One line of the search response stream.
///
/// Wire shape: `{"type": "<tag>", "content": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum StreamFrame {
    /// Final answer as an HTML fragment.
    Output(String),
    Log(LogContent),
    TokenUsage(TokenUsage),
    /// Server-side failure, shown verbatim.
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogContent {
    Step {
        #[serde(default)]
        query: String,
        explanation: String,
    },
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("malformed json: {0}")]
    Json(#[source] serde_json::Error),
    #[error("unrecognised frame: {0}")]
    Unrecognised(#[source] serde_json::Error),
}

/// Parses one complete line. Surrounding whitespace (including `\r`) is ignored.
pub fn parse_frame(line: &str) -> Result<StreamFrame, FrameError> {
    let value: serde_json::Value = serde_json::from_str(line).map_err(FrameError::Json)?;
    serde_json::from_value(value).map_err(FrameError::Unrecognised)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_every_frame_kind() {
        assert_eq!(
            parse_frame(r#"{"type":"output","content":"<p>Sunny</p>"}"#).unwrap(),
            StreamFrame::Output("<p>Sunny</p>".to_string())
        );
        assert_eq!(
            parse_frame(r#"{"type":"log","content":"Generating output..."}"#).unwrap(),
            StreamFrame::Log(LogContent::Text("Generating output...".to_string()))
        );
        assert_eq!(
            parse_frame(
                r#"{"type":"log","content":{"query":"weather tomorrow","explanation":"Looking up forecast"}}"#
            )
            .unwrap(),
            StreamFrame::Log(LogContent::Step {
                query: "weather tomorrow".to_string(),
                explanation: "Looking up forecast".to_string(),
            })
        );
        assert_eq!(
            parse_frame(
                r#"{"type":"token_usage","content":{"prompt_tokens":3,"completion_tokens":5,"total_tokens":8}}"#
            )
            .unwrap(),
            StreamFrame::TokenUsage(TokenUsage {
                prompt_tokens: 3,
                completion_tokens: 5,
            })
        );
        assert_eq!(
            parse_frame("{\"type\":\"error\",\"content\":\"rate limited\"}\r").unwrap(),
            StreamFrame::Error("rate limited".to_string())
        );
    }

    #[test]
    fn invalid_json_is_a_json_error() {
        let err = parse_frame(r#"{"type":"output","content":"#).unwrap_err();
        assert!(matches!(err, FrameError::Json(_)));
    }

    #[test]
    fn unknown_type_is_unrecognised() {
        let err = parse_frame(r#"{"type":"heartbeat","content":null}"#).unwrap_err();
        assert!(matches!(err, FrameError::Unrecognised(_)));
    }

    #[test]
    fn step_without_explanation_is_unrecognised() {
        let err = parse_frame(r#"{"type":"log","content":{"query":"q"}}"#).unwrap_err();
        assert!(matches!(err, FrameError::Unrecognised(_)));
    }

    #[test]
    fn step_without_query_defaults_to_empty() {
        let frame = parse_frame(r#"{"type":"log","content":{"explanation":"thinking"}}"#).unwrap();
        assert_eq!(
            frame,
            StreamFrame::Log(LogContent::Step {
                query: String::new(),
                explanation: "thinking".to_string(),
            })
        );
    }
}
