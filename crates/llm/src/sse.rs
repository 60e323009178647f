//! Server-sent event framing for streamed completions.
//!
//! Network chunks do not line up with event boundaries: one chunk may carry
//! several `data:` lines, and one line may be split across chunks. Bytes are
//! buffered until a newline arrives, so multi-byte characters and JSON
//! payloads are never cut in half.

use std::collections::VecDeque;
use std::fmt::Display;
use std::mem;

use bytes::Bytes;
use futures::{Stream, StreamExt, stream};
use serde::Deserialize;

use crate::{LlmError, TextStream};

/// Line buffer yielding the payload of each complete `data: ` line.
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    buffer: Vec<u8>,
}

impl SseLineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw bytes and return the payloads of every line now complete.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut payloads = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            payloads.extend(data_payload(&line[..newline]));
        }

        payloads
    }

    /// Payload of a trailing line left without a newline when the stream ends.
    pub fn flush(&mut self) -> Option<String> {
        let rest = mem::take(&mut self.buffer);
        data_payload(&rest)
    }
}

fn data_payload(line: &[u8]) -> Option<String> {
    let line = String::from_utf8_lossy(line);
    let data = line.trim_end_matches('\r').strip_prefix("data: ")?;

    (!data.trim().is_empty()).then(|| data.to_owned())
}

#[derive(Debug, Deserialize)]
struct StreamingResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Text at `candidates[0].content.parts[0].text`.
///
/// Malformed payloads are logged and skipped; so are events without text.
pub fn extract_text(data: &str) -> Option<String> {
    let response = match serde_json::from_str::<StreamingResponse>(data) {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "Skipping malformed streaming chunk");
            return None;
        }
    };

    let candidate = response.candidates.into_iter().next()?;
    let part = candidate.content?.parts.into_iter().next()?;

    part.text.filter(|text| !text.is_empty())
}

struct TextStreamState<S> {
    bytes: S,
    lines: SseLineBuffer,
    pending: VecDeque<String>,
    ended: bool,
}

impl<S> TextStreamState<S> {
    fn queue(&mut self, payloads: impl IntoIterator<Item = String>) {
        self.pending
            .extend(payloads.into_iter().filter_map(|data| extract_text(&data)));
    }
}

/// Turn a raw SSE byte stream into the text fragments it carries.
///
/// A transport error is yielded once and ends the stream.
pub fn text_stream<S, E>(bytes: S) -> TextStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let state = TextStreamState {
        bytes: Box::pin(bytes),
        lines: SseLineBuffer::new(),
        pending: VecDeque::new(),
        ended: false,
    };

    let stream = stream::unfold(state, |mut state| async move {
        loop {
            if let Some(text) = state.pending.pop_front() {
                return Some((Ok(text), state));
            }

            if state.ended {
                return None;
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    let payloads = state.lines.feed(&chunk);
                    state.queue(payloads);
                }
                Some(Err(e)) => {
                    state.ended = true;
                    return Some((Err(LlmError::Stream(e.to_string())), state));
                }
                None => {
                    state.ended = true;
                    let payload = state.lines.flush();
                    state.queue(payload);
                }
            }
        }
    });

    Box::pin(stream)
}
