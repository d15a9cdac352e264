//! Incremental decoder for the server-sent-events text format.
//!
//! Only `data:` fields matter here: consecutive data lines are joined with
//! `\n` and a blank line ends the event. Comments (`:`), `event:`, `id:` and
//! `retry:` fields are ignored. Both `\n` and `\r\n` line endings are
//! accepted, and chunk boundaries may fall anywhere, including inside a
//! multi-byte character.

use cubelytics_protocol::StreamEvent;

#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Bytes of the current, not yet terminated line.
    line: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return the data payloads of every event it
    /// completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut payloads = Vec::new();
        for &byte in chunk {
            if byte == b'\n' {
                let line = std::mem::take(&mut self.line);
                if let Some(payload) = self.process_line(&line) {
                    payloads.push(payload);
                }
            } else {
                self.line.push(byte);
            }
        }
        payloads
    }

    /// Whether a partial event is buffered.
    pub fn has_pending(&self) -> bool {
        !self.line.is_empty() || !self.data.is_empty()
    }

    fn process_line(&mut self, raw: &[u8]) -> Option<String> {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        if raw.is_empty() {
            if self.data.is_empty() {
                return None;
            }
            return Some(std::mem::take(&mut self.data).join("\n"));
        }

        let line = String::from_utf8_lossy(raw);
        if line.starts_with(':') {
            return None;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line.as_ref(), ""),
        };
        if field == "data" {
            self.data.push(value.to_string());
        }
        None
    }
}

/// Decode a payload into an event, logging and skipping malformed ones.
pub fn decode_payload(payload: &str) -> Option<StreamEvent> {
    match StreamEvent::decode(payload) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::warn!(error = %e, "Skipping malformed stream frame");
            None
        }
    }
}

/// Decode a complete SSE transcript.
pub fn decode_all(text: &str) -> Vec<StreamEvent> {
    let mut decoder = SseDecoder::new();
    let mut payloads = decoder.push(text.as_bytes());
    // A transcript may omit the final blank line.
    payloads.extend(decoder.push(b"\n\n"));
    payloads.iter().filter_map(|p| decode_payload(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_data_lines_and_ignores_other_fields() {
        let mut decoder = SseDecoder::new();
        let out = decoder.push(b": keepalive\nevent: message\nid: 7\ndata: {\"type\":\ndata: \"done\"}\nretry: 100\n\n");
        assert_eq!(out, vec!["{\"type\":\n\"done\"}".to_string()]);
        assert!(!decoder.has_pending());
    }

    #[test]
    fn chunks_split_anywhere() {
        let text = "data: {\"type\":\"error\",\"message\":\"héllo\"}\r\n\r\ndata: {\"type\":\"done\"}\n\n";
        let bytes = text.as_bytes();
        let mut decoder = SseDecoder::new();
        let mut out = Vec::new();
        for chunk in bytes.chunks(3) {
            out.extend(decoder.push(chunk));
        }
        assert_eq!(out.len(), 2);
        assert_eq!(
            decode_payload(&out[0]),
            Some(StreamEvent::Error { message: "héllo".into() })
        );
        assert_eq!(decode_payload(&out[1]), Some(StreamEvent::Done));
    }

    #[test]
    fn blank_lines_without_data_emit_nothing() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"\n\n: comment\n\n").is_empty());
        decoder.push(b"data: partial");
        assert!(decoder.has_pending());
    }

    #[test]
    fn malformed_frames_are_skipped() {
        let events = decode_all("data: not json\n\ndata: {\"type\":\"done\"}");
        assert_eq!(events, vec![StreamEvent::Done]);
    }
}
