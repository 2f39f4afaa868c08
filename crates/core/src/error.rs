use std::path::PathBuf;

/// Failures while loading a pronunciation lexicon.
///
/// All of these are fatal at startup: a pipeline with a broken lexicon
/// would silently produce wrong phonemes.
#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("failed to read lexicon file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed lexicon JSON in {origin}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("entry {word:?} uses {symbol:?}, which is outside the {dialect} phoneme alphabet")]
    InvalidSymbol {
        word: String,
        symbol: char,
        dialect: &'static str,
    },

    #[error("tag-indexed entry {word:?} has no DEFAULT pronunciation")]
    MissingDefault { word: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_symbol_message() {
        let err = LexiconError::InvalidSymbol {
            word: "cat".into(),
            symbol: 'x',
            dialect: "US",
        };
        let msg = err.to_string();
        assert!(msg.contains("\"cat\""));
        assert!(msg.contains("'x'"));
        assert!(msg.contains("US"));
    }

    #[test]
    fn test_io_error_has_source() {
        let err = LexiconError::Io {
            path: PathBuf::from("/nope/us_gold.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("/nope/us_gold.json"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
