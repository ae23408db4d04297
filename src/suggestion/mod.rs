//! AI suggestion parsing and streaming retrieval

pub mod extractor;
mod stream;
mod step;
mod client;

pub use extractor::{extract_final, extract_number, ExtractedValue, MatchKind};
pub use stream::{SseDecoder, StreamEvent, SuggestionAccumulator, SuggestionUpdate};
pub use step::{apply_suggestion, WizardStep};
pub use client::{Suggestion, SuggestionClient};
