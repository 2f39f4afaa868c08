//! English grapheme-to-phoneme conversion.
//!
//! Text goes through annotation preprocessing, part-of-speech tagging,
//! tokenization, a dictionary-backed resolver with morphology and numeral
//! expansion, and an optional external fallback for unknown words.

pub mod config;
pub mod error;
pub mod language;
pub mod pipeline;
pub mod types;

pub use config::G2pConfig;
pub use error::LexiconError;
pub use pipeline::G2p;
pub use types::*;
