//! The `G2p` façade: text in, phonemes and resolved tokens out.

use anyhow::{Context, Result};

use crate::config::G2pConfig;
use crate::language::fallback::{get_fallback, Fallback};
use crate::language::lexicon::Lexicon;
use crate::language::preprocess::preprocess;
use crate::language::resolve::Resolver;
use crate::language::retokenize::retokenize;
use crate::language::tagger::{RuleTagger, Tagger};
use crate::language::tokenize::{fold_left, tokenize};
use crate::types::Transcription;

/// English grapheme-to-phoneme pipeline.
///
/// Holds only read-only state after construction, so one instance can be
/// shared across threads.
pub struct G2p {
    lexicon: Lexicon,
    tagger: Box<dyn Tagger>,
    fallback: Option<Box<dyn Fallback>>,
    unk: String,
}

impl G2p {
    pub fn new(lexicon: Lexicon, fallback: Option<Box<dyn Fallback>>, unk: &str) -> Self {
        Self {
            lexicon,
            tagger: Box::new(RuleTagger::new()),
            fallback,
            unk: unk.to_string(),
        }
    }

    /// Load the lexicon and fallback named by `config`.
    pub fn from_config(config: &G2pConfig) -> Result<Self> {
        let dir = config.resolved_lexicon_dir();
        let lexicon = Lexicon::load(&dir, config.british)
            .with_context(|| format!("Failed to load lexicon from {}", dir.display()))?;
        let fallback = get_fallback(config.fallback, config.british, &config.espeak_binary)?;
        Ok(Self::new(lexicon, fallback, &config.unk))
    }

    /// Replace the part-of-speech tagger.
    pub fn with_tagger(mut self, tagger: Box<dyn Tagger>) -> Self {
        self.tagger = tagger;
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn fallback_name(&self) -> Option<&str> {
        self.fallback.as_deref().map(|f| f.name())
    }

    /// Convert text to a phoneme string plus the resolved tokens.
    ///
    /// Never fails: unresolved words come out as the placeholder glyph.
    pub fn phonemize(&self, text: &str) -> Transcription {
        let pre = preprocess(text);
        let tagged = self.tagger.tag(&pre.text);
        log::debug!("{} tagger: {} tokens", self.tagger.name(), tagged.len());

        let tokens = tokenize(&tagged, &pre.tokens, &pre.features);
        let tokens = fold_left(tokens, &self.unk);
        let units = retokenize(tokens);
        let resolver = Resolver::new(&self.lexicon, self.fallback.as_deref(), &self.unk);
        let tokens = resolver.resolve(units);

        let mut phonemes = String::new();
        for tk in &tokens {
            phonemes.push_str(tk.phonemes.as_deref().unwrap_or(&self.unk));
            phonemes.push_str(&tk.whitespace);
        }
        Transcription { phonemes, tokens }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::fixture_lexicon;
    use crate::language::tagger::TaggedToken;
    use crate::types::{Rating, Token};

    struct UpperFallback;

    impl Fallback for UpperFallback {
        fn name(&self) -> &str {
            "upper"
        }

        fn phonemize(&self, token: &Token) -> Option<(String, Rating)> {
            Some((token.text.to_uppercase(), 2))
        }
    }

    /// Tags every whitespace-separated word as a noun.
    struct NounTagger;

    impl Tagger for NounTagger {
        fn name(&self) -> &str {
            "noun"
        }

        fn tag(&self, text: &str) -> Vec<TaggedToken> {
            text.split_whitespace()
                .map(|w| TaggedToken::new(w, "NN", " "))
                .collect()
        }
    }

    #[test]
    fn test_phonemize_simple() {
        let g2p = G2p::new(fixture_lexicon(), None, "❓");
        let result = g2p.phonemize("hello world");
        assert_eq!(result.phonemes.trim_end(), "həlˈO wˈɜɹld");
        assert_eq!(result.tokens.len(), 2);
    }

    #[test]
    fn test_unknown_word_placeholder() {
        let g2p = G2p::new(fixture_lexicon(), None, "?");
        let result = g2p.phonemize("hello zzyzx");
        assert_eq!(result.phonemes.trim_end(), "həlˈO ?");
        assert_eq!(result.tokens[1].rating, None);
    }

    #[test]
    fn test_fallback_used_for_unknown() {
        let g2p = G2p::new(fixture_lexicon(), Some(Box::new(UpperFallback)), "❓");
        assert_eq!(g2p.fallback_name(), Some("upper"));
        let result = g2p.phonemize("zzyzx");
        assert_eq!(result.tokens[0].phonemes.as_deref(), Some("ZZYZX"));
        assert_eq!(result.tokens[0].rating, Some(2));
    }

    #[test]
    fn test_custom_tagger() {
        let g2p = G2p::new(fixture_lexicon(), None, "❓").with_tagger(Box::new(NounTagger));
        let result = g2p.phonemize("read");
        assert_eq!(result.tokens[0].tag, "NN");
        assert_eq!(result.tokens[0].phonemes.as_deref(), Some("ɹˈid"));
    }

    #[test]
    fn test_empty_input() {
        let g2p = G2p::new(fixture_lexicon(), None, "❓");
        let result = g2p.phonemize("");
        assert!(result.tokens.is_empty());
        assert_eq!(result.phonemes, "");
    }
}
