use serde::{Deserialize, Serialize};

/// Confidence score attached to a resolved phoneme string.
///
/// 2 = external fallback, 3 = silver dictionary / heuristic / punctuation,
/// 4 = gold dictionary or rule, 5 = explicit user override.
pub type Rating = u8;

pub const RATING_FALLBACK: Rating = 2;
pub const RATING_SILVER: Rating = 3;
pub const RATING_GOLD: Rating = 4;
pub const RATING_USER: Rating = 5;

/// A unit of text flowing through the pipeline.
///
/// Tokens are created by the tokenizer and mutated in place by the
/// fold, retokenize and resolve stages, in that order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    /// Surface text
    pub text: String,
    /// Coarse part-of-speech tag (Penn style, e.g. "NN", "CD", "$")
    pub tag: String,
    /// Text between this token and the next; empty means glued
    pub whitespace: String,
    /// `None` = unresolved, `Some("")` = intentionally silent
    #[serde(default)]
    pub phonemes: Option<String>,
    /// False means "fold into the previous token"
    #[serde(default = "default_true")]
    pub is_head: bool,
    /// Lookup text used instead of `text`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Explicit stress directive from an annotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress: Option<f64>,
    /// Currency symbol carried onto a numeral during retokenization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Numeral reading flags (`&`, `a`, `n`)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub num_flags: String,
    /// Insert a visible space before this token's phonemes when merging
    #[serde(default)]
    pub prespace: bool,
    #[serde(default)]
    pub rating: Option<Rating>,
}

fn default_true() -> bool {
    true
}

impl Token {
    pub fn new(text: &str, tag: &str, whitespace: &str) -> Self {
        Self {
            text: text.to_string(),
            tag: tag.to_string(),
            whitespace: whitespace.to_string(),
            phonemes: None,
            is_head: true,
            alias: None,
            stress: None,
            currency: None,
            num_flags: String::new(),
            prespace: false,
            rating: None,
        }
    }

    /// Merge a run of tokens into one.
    ///
    /// With `unk = None` the merged token is unresolved (used to build
    /// lookup windows). With `Some(unk)` member phonemes are concatenated,
    /// substituting `unk` for unresolved members.
    pub fn merge(tokens: &[Token], unk: Option<&str>) -> Token {
        let first = &tokens[0];
        let last = &tokens[tokens.len() - 1];

        let mut stresses: Vec<f64> = Vec::new();
        for s in tokens.iter().filter_map(|tk| tk.stress) {
            if !stresses.contains(&s) {
                stresses.push(s);
            }
        }

        let currency = tokens.iter().filter_map(|tk| tk.currency.clone()).max();

        let rating = if tokens.iter().any(|tk| tk.rating.is_none()) {
            None
        } else {
            tokens.iter().filter_map(|tk| tk.rating).min()
        };

        let phonemes = unk.map(|unk| {
            let mut ps = String::new();
            for tk in tokens {
                let has_phonemes = tk.phonemes.as_deref().is_some_and(|p| !p.is_empty());
                let ends_in_space = ps.chars().last().is_some_and(char::is_whitespace);
                if tk.prespace && !ps.is_empty() && !ends_in_space && has_phonemes {
                    ps.push(' ');
                }
                ps.push_str(tk.phonemes.as_deref().unwrap_or(unk));
            }
            ps
        });

        let mut text = String::new();
        for tk in &tokens[..tokens.len() - 1] {
            text.push_str(&tk.text);
            text.push_str(&tk.whitespace);
        }
        text.push_str(&last.text);

        let mut flags: Vec<char> = tokens.iter().flat_map(|tk| tk.num_flags.chars()).collect();
        flags.sort_unstable();
        flags.dedup();

        Token {
            text,
            tag: dominant_tag(tokens).to_string(),
            whitespace: last.whitespace.clone(),
            phonemes,
            is_head: first.is_head,
            alias: None,
            stress: if stresses.len() == 1 { Some(stresses[0]) } else { None },
            currency,
            num_flags: flags.into_iter().collect(),
            prespace: first.prespace,
            rating,
        }
    }
}

/// Tag of the "heaviest" token: longer and more uppercase text wins,
/// earliest token on ties.
fn dominant_tag(tokens: &[Token]) -> &str {
    let score = |tk: &Token| -> usize {
        tk.text
            .chars()
            .map(|c| if c.to_lowercase().eq(std::iter::once(c)) { 1 } else { 2 })
            .sum()
    };
    let mut best = &tokens[0];
    let mut best_score = score(best);
    for tk in &tokens[1..] {
        let s = score(tk);
        if s > best_score {
            best = tk;
            best_score = s;
        }
    }
    &best.tag
}

/// Look-ahead state threaded right-to-left during resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TokenContext {
    /// Whether the next resolved token starts with a vowel sound;
    /// `None` when unknown or separated by punctuation
    pub future_vowel: Option<bool>,
    /// Whether the next token is the word "to"
    pub future_to: bool,
}

/// Output of a full text-to-phoneme pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcription {
    pub phonemes: String,
    pub tokens: Vec<Token>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(text: &str, whitespace: &str, phonemes: &str, rating: Rating) -> Token {
        let mut tk = Token::new(text, "NN", whitespace);
        tk.phonemes = Some(phonemes.to_string());
        tk.rating = Some(rating);
        tk
    }

    #[test]
    fn test_token_defaults() {
        let tk = Token::new("cat", "NN", " ");
        assert!(tk.is_head);
        assert!(tk.phonemes.is_none());
        assert!(tk.num_flags.is_empty());
        assert!(!tk.prespace);
    }

    #[test]
    fn test_merge_text_and_whitespace() {
        let a = Token::new("New", "NNP", " ");
        let b = Token::new("York", "NNP", "\n");
        let merged = Token::merge(&[a, b], None);
        assert_eq!(merged.text, "New York");
        assert_eq!(merged.whitespace, "\n");
        assert!(merged.phonemes.is_none());
    }

    #[test]
    fn test_merge_concatenates_phonemes_with_unk() {
        let a = resolved("base", "", "bˈAs", 4);
        let b = Token::new("ball", "NN", " ");
        let merged = Token::merge(&[a, b], Some("❓"));
        assert_eq!(merged.phonemes.as_deref(), Some("bˈAs❓"));
        assert_eq!(merged.rating, None);
    }

    #[test]
    fn test_merge_prespace_inserts_space() {
        let a = resolved("3", "", "θɹˈi", 4);
        let mut b = resolved("D", " ", "dˈi", 3);
        b.prespace = true;
        let merged = Token::merge(&[a, b], Some("❓"));
        assert_eq!(merged.phonemes.as_deref(), Some("θɹˈi dˈi"));
        assert_eq!(merged.rating, Some(3));
    }

    #[test]
    fn test_merge_tag_prefers_uppercase_heavier_token() {
        let a = Token::new("ab", "DT", "");
        let b = Token::new("CD", "NNP", "");
        let merged = Token::merge(&[a, b], None);
        assert_eq!(merged.tag, "NNP");

        let a = Token::new("ab", "DT", "");
        let b = Token::new("cd", "NN", "");
        let merged = Token::merge(&[a, b], None);
        assert_eq!(merged.tag, "DT");
    }

    #[test]
    fn test_merge_flags_stress_currency() {
        let mut a = Token::new("a", "CD", "");
        a.num_flags = "n&".into();
        a.stress = Some(1.0);
        a.currency = Some("$".into());
        let mut b = Token::new("b", "CD", "");
        b.num_flags = "a&".into();
        b.stress = Some(1.0);
        let merged = Token::merge(&[a.clone(), b.clone()], None);
        assert_eq!(merged.num_flags, "&an");
        assert_eq!(merged.stress, Some(1.0));
        assert_eq!(merged.currency.as_deref(), Some("$"));

        b.stress = Some(-1.0);
        let merged = Token::merge(&[a, b], None);
        assert_eq!(merged.stress, None);
    }

    #[test]
    fn test_token_serde_roundtrip() {
        let tk = resolved("cat", " ", "kˈæt", 4);
        let json = serde_json::to_string(&tk).unwrap();
        let back: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(tk, back);
    }
}
