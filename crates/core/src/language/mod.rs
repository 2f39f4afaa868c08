//! Text → phoneme stages: tagging, tokenization, lexicon lookup,
//! numeral expansion, stress and fallback.

pub mod fallback;
pub mod lexicon;
pub mod numbers;
pub mod numerals;
pub mod preprocess;
pub mod punctuation;
pub mod resolve;
pub mod retokenize;
pub mod stress;
pub mod tagger;
pub mod tokenize;

pub use fallback::{get_fallback, Fallback, FallbackKind};
pub use lexicon::Lexicon;
pub use tagger::{RuleTagger, TaggedToken, Tagger};

/// Small US lexicon shared by unit tests.
#[cfg(test)]
pub(crate) fn fixture_lexicon() -> Lexicon {
    Lexicon::from_json(
        include_str!("../../tests/fixtures/us_gold.json"),
        include_str!("../../tests/fixtures/us_silver.json"),
        false,
    )
    .expect("fixture lexicon is valid")
}
