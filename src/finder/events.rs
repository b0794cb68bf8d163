//! Streamed output events from the external finder.
//!
//! Events flow from the orchestrator to a subscriber over an unbounded tokio
//! channel. Each event carries one chunk exactly as it was read from the
//! child's pipe; nothing is line-buffered or batched.

use tokio::sync::mpsc;

/// One chunk of streamed finder output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Text read from the finder's standard output.
    ProgressChunk { text: String },
    /// Text read from the finder's standard error.
    ErrorChunk { text: String },
}

impl StreamEvent {
    /// The chunk's text, regardless of which stream it came from.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::ProgressChunk { text } | Self::ErrorChunk { text } => text,
        }
    }

    /// Whether this chunk came from standard error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::ErrorChunk { .. })
    }
}

pub type EventSender = mpsc::UnboundedSender<StreamEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<StreamEvent>;

pub fn create_event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Incremental UTF-8 decoder for pipe chunks.
///
/// A multi-byte character can straddle two reads. The trailing incomplete
/// sequence is held back until the next chunk completes it, so emitted text
/// never contains a split character. Invalid bytes become U+FFFD.
#[derive(Debug, Default)]
pub struct ChunkDecoder {
    pending: Vec<u8>,
}

impl ChunkDecoder {
    /// Feed a chunk of bytes, returning whatever text is complete.
    ///
    /// Returns `None` when the chunk only extended a pending sequence.
    pub fn push(&mut self, bytes: &[u8]) -> Option<String> {
        self.pending.extend_from_slice(bytes);

        let mut text = String::new();
        let mut consumed = 0;
        loop {
            match std::str::from_utf8(&self.pending[consumed..]) {
                Ok(valid) => {
                    text.push_str(valid);
                    consumed = self.pending.len();
                    break;
                }
                Err(e) => {
                    let valid_end = consumed + e.valid_up_to();
                    text.push_str(&String::from_utf8_lossy(&self.pending[consumed..valid_end]));
                    match e.error_len() {
                        Some(bad) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            consumed = valid_end + bad;
                        }
                        None => {
                            // Incomplete sequence at the end: wait for more bytes.
                            consumed = valid_end;
                            break;
                        }
                    }
                }
            }
        }

        self.pending.drain(..consumed);
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Flush any held-back bytes at end of stream.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let text = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        Some(text)
    }
}
