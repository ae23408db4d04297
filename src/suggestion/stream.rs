//! Decoding and accumulation of streamed suggestion text
//!
//! The suggestion endpoint answers with `text/event-stream` lines of the form
//! `data: {"content": "..."}` or `data: {"error": "..."}`. Network chunks do
//! not respect line or UTF-8 boundaries, so the decoder holds back any
//! partial line until its newline arrives.

use log::{debug, warn};
use serde::Deserialize;

use super::extractor::{extract_number, final_suggestion_span, ExtractedValue};

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Content(String),
    Error(String),
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Longest event line kept while waiting for its newline (1 MiB)
pub const MAX_LINE_BYTES: usize = 1 << 20;

/// Incremental server-sent-events decoder
#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
    /// Set after an oversized line was dropped; skip bytes up to its newline
    discarding: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one network chunk and return every complete event it finished
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.pending.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            if std::mem::take(&mut self.discarding) {
                continue;
            }
            if let Some(event) = parse_line(&line[..newline]) {
                events.push(event);
            }
        }

        if self.pending.len() > MAX_LINE_BYTES {
            warn!("Dropping stream line longer than {} bytes", MAX_LINE_BYTES);
            self.pending.clear();
            self.discarding = true;
        }
        events
    }

    /// Flush a trailing line that was never newline-terminated
    pub fn finish(&mut self) -> Option<StreamEvent> {
        if std::mem::take(&mut self.discarding) {
            self.pending.clear();
            return None;
        }
        if self.pending.is_empty() {
            return None;
        }
        let line = std::mem::take(&mut self.pending);
        parse_line(&line)
    }
}

fn parse_line(raw: &[u8]) -> Option<StreamEvent> {
    let decoded = String::from_utf8_lossy(raw);
    let line = decoded.strip_suffix('\r').unwrap_or(&decoded[..]);
    let data = line.strip_prefix("data:")?;
    let data = data.strip_prefix(' ').unwrap_or(data);

    if data.is_empty() || data == "[DONE]" {
        return None;
    }

    match serde_json::from_str::<EventPayload>(data) {
        Ok(EventPayload { error: Some(error), .. }) => Some(StreamEvent::Error(error)),
        Ok(EventPayload { content: Some(content), .. }) if !content.is_empty() => {
            Some(StreamEvent::Content(content))
        }
        Ok(_) => None,
        Err(e) => {
            warn!("Skipping malformed stream payload {:?}: {}", data, e);
            None
        }
    }
}

/// Progress report handed to callers after each content event
#[derive(Debug, Clone, Copy)]
pub struct SuggestionUpdate<'a> {
    /// Text received in this event
    pub delta: &'a str,
    /// Full text received so far
    pub text: &'a str,
    /// Whether a complete `FINAL SUGGESTION` amount has arrived
    pub is_final: bool,
}

/// Ordered concatenation of streamed content
#[derive(Debug, Clone, Default)]
pub struct SuggestionAccumulator {
    text: String,
    finished: bool,
}

impl SuggestionAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, delta: &str) {
        self.text.push_str(delta);
    }

    /// Mark the stream as closed; a trailing final amount is then complete
    pub fn finish(&mut self) {
        debug!("Suggestion stream closed after {} bytes", self.text.len());
        self.finished = true;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// True once the final marker carries an amount that cannot grow further
    ///
    /// `FINAL SUGGESTION: $1,2` may still become `$1,250.00`, so the amount
    /// only counts once a terminator follows it or the stream ended. A `,`
    /// or `.` terminates it only when the next character is not a digit.
    pub fn is_final(&self) -> bool {
        match final_suggestion_span(&self.text) {
            Some(_) if self.finished => true,
            Some((_, end)) => {
                let mut rest = self.text[end..].chars();
                match rest.next() {
                    Some(',' | '.') => matches!(rest.next(), Some(c) if !c.is_ascii_digit()),
                    Some(_) => true,
                    None => false,
                }
            }
            None => false,
        }
    }

    /// Best numeric interpretation of the text received so far
    pub fn best_value(&self) -> Option<ExtractedValue> {
        extract_number(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoder_reads_data_lines() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"data: {\"content\": \"Hello\"}\n\ndata: {\"content\": \" world\"}\n\n");
        assert_eq!(
            events,
            vec![
                StreamEvent::Content("Hello".to_string()),
                StreamEvent::Content(" world".to_string()),
            ]
        );
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_decoder_joins_split_lines() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: {\"cont").is_empty());
        assert!(decoder.feed(b"ent\": \"$4").is_empty());
        let events = decoder.feed(b"2\"}\n\n");
        assert_eq!(events, vec![StreamEvent::Content("$42".to_string())]);
    }

    #[test]
    fn test_decoder_joins_split_utf8() {
        let line = "data: {\"content\": \"caf\u{e9} \u{2014} $5\"}\n".as_bytes();
        let split = line.iter().position(|&b| b == 0xC3).unwrap() + 1;

        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(&line[..split]).is_empty());
        let events = decoder.feed(&line[split..]);
        assert_eq!(events, vec![StreamEvent::Content("caf\u{e9} \u{2014} $5".to_string())]);
    }

    #[test]
    fn test_decoder_errors_and_noise() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(
            b": keep-alive\r\nevent: message\r\ndata: not json\r\ndata: {\"error\": \"quota exceeded\"}\r\n",
        );
        assert_eq!(events, vec![StreamEvent::Error("quota exceeded".to_string())]);
    }

    #[test]
    fn test_decoder_drops_oversized_line() {
        let mut decoder = SseDecoder::new();
        let mut flood = b"data: {\"content\": \"".to_vec();
        flood.resize(MAX_LINE_BYTES + 1, b'x');
        assert!(decoder.feed(&flood).is_empty());
        assert!(decoder.pending.is_empty());

        // The rest of the dropped line is skipped, the next line decodes
        let events = decoder.feed(b"xxxx\"}\ndata: {\"content\": \"$12\"}\n");
        assert_eq!(events, vec![StreamEvent::Content("$12".to_string())]);
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_decoder_flushes_unterminated_line() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: {\"content\": \"tail\"}").is_empty());
        assert_eq!(decoder.finish(), Some(StreamEvent::Content("tail".to_string())));
    }

    #[test]
    fn test_accumulator_final_detection() {
        let mut acc = SuggestionAccumulator::new();
        acc.push("Analysis...\nFINAL SUGGESTION: $1,2");
        assert!(!acc.is_final());

        acc.push("50.");
        assert!(!acc.is_final());

        acc.push("00\n");
        assert!(acc.is_final());
        assert_eq!(acc.best_value().unwrap().value, 1250.0);
    }

    #[test]
    fn test_accumulator_final_before_sentence_period() {
        let mut acc = SuggestionAccumulator::new();
        acc.push("FINAL SUGGESTION: $45.");
        assert!(!acc.is_final());

        acc.push(" That is my recommendation.\n");
        assert!(acc.is_final());
        assert_eq!(acc.best_value().unwrap().value, 45.0);
    }

    #[test]
    fn test_accumulator_final_at_end_of_stream() {
        let mut acc = SuggestionAccumulator::new();
        acc.push("FINAL SUGGESTION: $89");
        assert!(!acc.is_final());

        acc.finish();
        assert!(acc.is_final());
    }

    #[test]
    fn test_accumulator_without_marker() {
        let mut acc = SuggestionAccumulator::new();
        acc.push("A fair monthly budget is $750 for launch.");
        acc.finish();
        assert!(!acc.is_final());
        assert_eq!(acc.best_value().unwrap().value, 750.0);
    }
}
