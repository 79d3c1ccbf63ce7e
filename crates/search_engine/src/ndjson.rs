use encoding_rs::{CoderResult, Decoder, UTF_8};

use crate::{parse_frame, FrameError, StreamFrame};

/// Turns a chunked byte stream into complete text lines.
///
/// UTF-8 sequences split across chunks are carried over by the decoder; a
/// leading BOM is dropped and invalid bytes decode to U+FFFD. Text after the
/// last `\n` stays buffered until a later chunk or `finish`.
pub struct LineBuffer {
    decoder: Decoder,
    pending: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            decoder: UTF_8.new_decoder(),
            pending: String::new(),
        }
    }

    /// Feeds one chunk and returns the lines it completed, without terminators.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.decode(bytes, false);
        self.drain_complete_lines()
    }

    /// Flushes the decoder at end of stream and returns every remaining line,
    /// including an unterminated trailing one. The buffer is reset afterwards.
    pub fn finish(&mut self) -> Vec<String> {
        self.decode(&[], true);
        let mut lines = self.drain_complete_lines();
        if !self.pending.is_empty() {
            lines.push(std::mem::take(&mut self.pending));
        }
        self.decoder = UTF_8.new_decoder();
        lines
    }

    /// Decoded text that is not yet part of a complete line.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    fn decode(&mut self, mut src: &[u8], last: bool) {
        loop {
            let needed = self
                .decoder
                .max_utf8_buffer_length(src.len())
                .unwrap_or_else(|| src.len().saturating_mul(3).saturating_add(4));
            self.pending.reserve(needed);
            let (result, read, _replaced) =
                self.decoder
                    .decode_to_string(src, &mut self.pending, last);
            src = &src[read..];
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => continue,
            }
        }
    }

    fn drain_complete_lines(&mut self) -> Vec<String> {
        let Some(last_newline) = self.pending.rfind('\n') else {
            return Vec::new();
        };
        let rest = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, rest);
        complete.split_terminator('\n').map(str::to_owned).collect()
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one non-blank line.
#[derive(Debug)]
pub struct DecodedLine {
    /// 1-based position of the line in the stream, blank lines included.
    pub line_number: usize,
    pub text: String,
    pub result: Result<StreamFrame, FrameError>,
}

/// Line buffering plus frame parsing for a newline-delimited JSON stream.
#[derive(Default)]
pub struct NdjsonDecoder {
    lines: LineBuffer,
    line_number: usize,
}

impl NdjsonDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) -> Vec<DecodedLine> {
        let lines = self.lines.push(bytes);
        self.parse_lines(lines)
    }

    pub fn finish(&mut self) -> Vec<DecodedLine> {
        let lines = self.lines.finish();
        self.parse_lines(lines)
    }

    fn parse_lines(&mut self, lines: Vec<String>) -> Vec<DecodedLine> {
        let mut decoded = Vec::with_capacity(lines.len());
        for line in lines {
            self.line_number += 1;
            if line.trim().is_empty() {
                continue;
            }
            let result = parse_frame(&line);
            decoded.push(DecodedLine {
                line_number: self.line_number,
                text: line,
                result,
            });
        }
        decoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LogContent, TokenUsage};
    use pretty_assertions::assert_eq;

    const STREAM: &str = concat!(
        "{\"type\":\"log\",\"content\":{\"query\":\"météo demain\",\"explanation\":\"Prévisions 🌤\"}}\n",
        "\n",
        "{\"type\":\"token_usage\",\"content\":{\"prompt_tokens\":3,\"completion_tokens\":5}}\n",
        "{\"type\":\"output\",\"content\":\"<p>Ensoleillé ☀</p>\"}\n",
    );

    fn frames(decoded: Vec<DecodedLine>) -> Vec<StreamFrame> {
        decoded
            .into_iter()
            .filter_map(|line| line.result.ok())
            .collect()
    }

    fn decode_in_chunks(bytes: &[u8], chunk_sizes: &[usize]) -> Vec<StreamFrame> {
        let mut decoder = NdjsonDecoder::new();
        let mut out = Vec::new();
        let mut rest = bytes;
        let mut sizes = chunk_sizes.iter().cycle();
        while !rest.is_empty() {
            let size = (*sizes.next().unwrap()).clamp(1, rest.len());
            let (chunk, tail) = rest.split_at(size);
            out.extend(frames(decoder.push(chunk)));
            rest = tail;
        }
        out.extend(frames(decoder.finish()));
        out
    }

    #[test]
    fn whole_stream_parses_all_frames() {
        let parsed = decode_in_chunks(STREAM.as_bytes(), &[STREAM.len()]);
        assert_eq!(
            parsed,
            vec![
                StreamFrame::Log(LogContent::Step {
                    query: "météo demain".to_string(),
                    explanation: "Prévisions 🌤".to_string(),
                }),
                StreamFrame::TokenUsage(TokenUsage {
                    prompt_tokens: 3,
                    completion_tokens: 5,
                }),
                StreamFrame::Output("<p>Ensoleillé ☀</p>".to_string()),
            ]
        );
    }

    #[test]
    fn chunk_boundaries_do_not_change_parsed_frames() {
        let bytes = STREAM.as_bytes();
        let expected = decode_in_chunks(bytes, &[bytes.len()]);

        // Every single split point, including ones inside multi-byte characters.
        for split in 1..bytes.len() {
            let mut decoder = NdjsonDecoder::new();
            let mut parsed = frames(decoder.push(&bytes[..split]));
            parsed.extend(frames(decoder.push(&bytes[split..])));
            parsed.extend(frames(decoder.finish()));
            assert_eq!(parsed, expected, "split at byte {split}");
        }

        let chunkings: [&[usize]; 4] = [&[1], &[2, 3], &[7, 1, 13], &[64]];
        for sizes in chunkings {
            assert_eq!(decode_in_chunks(bytes, sizes), expected, "chunks {sizes:?}");
        }
    }

    #[test]
    fn malformed_line_is_reported_and_skipped() {
        let stream = concat!(
            "{\"type\":\"log\",\"content\":\"first\"}\n",
            "{not json}\n",
            "{\"type\":\"output\",\"content\":\"<p>ok</p>\"}\n",
        );
        let mut decoder = NdjsonDecoder::new();
        let decoded = decoder.push(stream.as_bytes());

        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[1].line_number, 2);
        assert_eq!(decoded[1].text, "{not json}");
        assert!(matches!(decoded[1].result, Err(FrameError::Json(_))));
        assert_eq!(
            frames(decoded),
            vec![
                StreamFrame::Log(LogContent::Text("first".to_string())),
                StreamFrame::Output("<p>ok</p>".to_string()),
            ]
        );
    }

    #[test]
    fn partial_line_waits_for_its_newline() {
        let mut lines = LineBuffer::new();
        assert!(lines.push(b"{\"type\":\"log\",").is_empty());
        assert_eq!(lines.pending(), "{\"type\":\"log\",");

        let completed = lines.push(b"\"content\":\"x\"}\n{\"type\"");
        assert_eq!(completed, vec!["{\"type\":\"log\",\"content\":\"x\"}".to_string()]);
        assert_eq!(lines.pending(), "{\"type\"");
    }

    #[test]
    fn unterminated_last_line_is_parsed_at_end_of_stream() {
        let mut decoder = NdjsonDecoder::new();
        assert!(decoder
            .push(b"{\"type\":\"error\",\"content\":\"rate limited\"}")
            .is_empty());

        assert_eq!(
            frames(decoder.finish()),
            vec![StreamFrame::Error("rate limited".to_string())]
        );
    }

    #[test]
    fn blank_lines_are_skipped_but_counted() {
        let mut decoder = NdjsonDecoder::new();
        let decoded = decoder.push(b"\n  \r\n{\"type\":\"log\",\"content\":\"x\"}\r\n");

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].line_number, 3);
        assert!(decoded[0].result.is_ok());
    }

    #[test]
    fn leading_bom_is_dropped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"{\"type\":\"output\",\"content\":\"hi\"}\n");
        assert_eq!(
            decode_in_chunks(&bytes, &[2]),
            vec![StreamFrame::Output("hi".to_string())]
        );
    }

    #[test]
    fn truncated_multibyte_sequence_becomes_replacement_character() {
        let mut lines = LineBuffer::new();
        assert!(lines.push(&[b'a', 0xE2, 0x98]).is_empty());
        assert_eq!(lines.finish(), vec!["a\u{FFFD}".to_string()]);
    }
}
