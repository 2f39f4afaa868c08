//! Part-of-speech tagging interface and a rule-based tagger.
//!
//! The pipeline only needs coarse Penn-style tags to pick allophones,
//! tag-indexed lexicon entries and punctuation handling. Statistical
//! taggers can be plugged in through [`Tagger`].

use serde::{Deserialize, Serialize};

use super::numbers::is_number;

/// One tagger output record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub text: String,
    pub tag: String,
    /// Literal text up to the next token; a single space after the last one
    pub whitespace: String,
}

impl TaggedToken {
    pub fn new(text: &str, tag: &str, whitespace: &str) -> Self {
        Self {
            text: text.to_string(),
            tag: tag.to_string(),
            whitespace: whitespace.to_string(),
        }
    }
}

/// Sentence tokenizer + part-of-speech tagger.
pub trait Tagger: Send + Sync {
    /// Tagger name for logging.
    fn name(&self) -> &str;

    /// Split `text` into tagged tokens covering the whole input in order.
    fn tag(&self, text: &str) -> Vec<TaggedToken>;
}

const LEADING: &str = "\"“([{$£€";
const TRAILING: &str = ".,!?;:)]}\"”…";

/// Closed word classes, matched case-insensitively.
const CLOSED_CLASSES: &[(&str, &[&str])] = &[
    ("DT", &["a", "an", "the", "this", "that", "these", "those", "every", "some", "no"]),
    ("TO", &["to"]),
    (
        "IN",
        &[
            "in", "of", "on", "at", "by", "for", "with", "from", "into", "about", "as", "than",
            "over", "under", "after", "before", "vs", "vs.", "if", "because",
        ],
    ),
    (
        "PRP",
        &["i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them"],
    ),
    ("PRP$", &["my", "your", "his", "her", "its", "our", "their"]),
    ("CC", &["and", "or", "but", "nor"]),
    ("MD", &["can", "could", "will", "would", "shall", "should", "may", "might", "must"]),
    ("VBD", &["was", "were", "had", "did", "used"]),
    ("VBZ", &["is", "has", "does"]),
    ("VBP", &["am", "are", "have", "do"]),
    ("RB", &["not", "very", "also", "too", "just", "never", "now"]),
];

/// Heuristic tagger driven by punctuation, shape, closed word lists and
/// suffixes. Unknown words tag as `NN`.
#[derive(Debug, Clone, Default)]
pub struct RuleTagger;

impl RuleTagger {
    pub fn new() -> Self {
        Self
    }

    fn punct_tag(text: &str, leading: bool) -> Option<&'static str> {
        let tag = match text {
            "." | "!" | "?" | "…" => ".",
            t if t.len() > 1 && t.chars().all(|c| c == '.') => ".",
            "," => ",",
            ":" | ";" | "-" | "–" | "—" | "--" => ":",
            "(" | "[" | "{" => "-LRB-",
            ")" | "]" | "}" => "-RRB-",
            "“" => "``",
            "”" => "''",
            "\"" => {
                if leading {
                    "``"
                } else {
                    "''"
                }
            }
            "$" | "£" | "€" => "$",
            "#" => "#",
            "%" => "NN",
            "&" => "CC",
            "+" | "@" | "/" => "SYM",
            _ => return None,
        };
        Some(tag)
    }

    fn word_tag(word: &str, sentence_start: bool) -> &'static str {
        if let Some(tag) = Self::punct_tag(word, false) {
            return tag;
        }
        if is_number(word, true) {
            return "CD";
        }
        if is_address(word) {
            return "ADD";
        }
        let lower = word.to_lowercase();
        if let Some((tag, _)) = CLOSED_CLASSES.iter().find(|(_, words)| words.contains(&lower.as_str())) {
            // "US" is a country more often than a pronoun
            if !(word.len() > 1 && word == word.to_uppercase() && *tag == "PRP") {
                return *tag;
            }
        }
        let starts_upper = word.chars().next().is_some_and(char::is_uppercase);
        let all_caps = word.chars().filter(|c| c.is_alphabetic()).count() > 1
            && word == word.to_uppercase();
        if starts_upper && (!sentence_start || all_caps) {
            return "NNP";
        }
        let len = lower.chars().count();
        if len > 4 && lower.ends_with("ing") {
            "VBG"
        } else if len > 3 && lower.ends_with("ed") {
            "VBD"
        } else if len > 3 && lower.ends_with("ly") {
            "RB"
        } else if len > 3 && lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("'s") {
            "NNS"
        } else {
            "NN"
        }
    }

    /// Split one whitespace-free chunk into leading punctuation, core and
    /// trailing punctuation pieces. The bool marks leading pieces.
    fn split_chunk(chunk: &str) -> Vec<(&str, bool)> {
        let mut start = 0;
        let mut pieces = Vec::new();
        for (i, c) in chunk.char_indices() {
            if !LEADING.contains(c) || i + c.len_utf8() == chunk.len() {
                break;
            }
            pieces.push((&chunk[i..i + c.len_utf8()], true));
            start = i + c.len_utf8();
        }

        let core_and_tail = &chunk[start..];
        let mut end = core_and_tail.len();
        for (i, c) in core_and_tail.char_indices().rev() {
            if !TRAILING.contains(c) {
                break;
            }
            end = i;
        }
        // "U.S." keeps its final period
        let core = &core_and_tail[..end];
        if end < core_and_tail.len()
            && core_and_tail[end..].starts_with('.')
            && core.contains('.')
            && core.chars().all(|c| c == '.' || c.is_alphabetic())
        {
            end += 1;
        }
        let (core, tail) = core_and_tail.split_at(end);
        if !core.is_empty() {
            pieces.push((core, false));
        }

        // Periods group into one ellipsis token; everything else stands alone.
        let mut rest = tail;
        while let Some(c) = rest.chars().next() {
            let len = if c == '.' {
                rest.len() - rest.trim_start_matches('.').len()
            } else {
                c.len_utf8()
            };
            pieces.push((&rest[..len], false));
            rest = &rest[len..];
        }
        pieces
    }
}

impl Tagger for RuleTagger {
    fn name(&self) -> &str {
        "rule"
    }

    fn tag(&self, text: &str) -> Vec<TaggedToken> {
        let mut tokens: Vec<TaggedToken> = Vec::new();
        let mut rest = text.trim_start();
        while !rest.is_empty() {
            let chunk_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            let (chunk, after) = rest.split_at(chunk_end);
            let ws_end = after.find(|c: char| !c.is_whitespace()).unwrap_or(after.len());
            let (whitespace, next) = after.split_at(ws_end);

            let pieces = Self::split_chunk(chunk);
            let last = pieces.len().saturating_sub(1);
            for (i, (piece, leading)) in pieces.into_iter().enumerate() {
                let sentence_start = tokens.last().map_or(true, |t| t.tag == ".");
                let tag = if leading {
                    Self::punct_tag(piece, true).unwrap_or("NN")
                } else {
                    Self::word_tag(piece, sentence_start)
                };
                let ws = if i == last { whitespace } else { "" };
                tokens.push(TaggedToken::new(piece, tag, ws));
            }
            rest = next;
        }
        if let Some(last) = tokens.last_mut() {
            last.whitespace = " ".to_string();
        }
        tokens
    }
}

/// URLs and e-mail addresses.
fn is_address(word: &str) -> bool {
    let lower = word.to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("www.") {
        return true;
    }
    match word.split_once('@') {
        Some((user, host)) => !user.is_empty() && host.contains('.') && !host.ends_with('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[TaggedToken]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    fn tags(tokens: &[TaggedToken]) -> Vec<&str> {
        tokens.iter().map(|t| t.tag.as_str()).collect()
    }

    #[test]
    fn test_sentence_with_currency() {
        let tokens = RuleTagger::new().tag("It costs $3.50.");
        assert_eq!(texts(&tokens), vec!["It", "costs", "$", "3.50", "."]);
        assert_eq!(tags(&tokens), vec!["PRP", "NNS", "$", "CD", "."]);
        let ws: Vec<&str> = tokens.iter().map(|t| t.whitespace.as_str()).collect();
        assert_eq!(ws, vec![" ", " ", "", "", " "]);
    }

    #[test]
    fn test_initials_keep_period() {
        let tokens = RuleTagger::new().tag("the U.S. army");
        assert_eq!(texts(&tokens), vec!["the", "U.S.", "army"]);
        assert_eq!(tokens[1].tag, "NNP");
    }

    #[test]
    fn test_brackets_and_quotes() {
        let tokens = RuleTagger::new().tag("(hi) \"there\"");
        assert_eq!(texts(&tokens), vec!["(", "hi", ")", "\"", "there", "\""]);
        assert_eq!(tags(&tokens), vec!["-LRB-", "NN", "-RRB-", "``", "NN", "''"]);
    }

    #[test]
    fn test_ellipsis_is_one_token() {
        let tokens = RuleTagger::new().tag("wait...");
        assert_eq!(texts(&tokens), vec!["wait", "..."]);
        assert_eq!(tokens[1].tag, ".");
    }

    #[test]
    fn test_proper_nouns() {
        let tokens = RuleTagger::new().tag("Ask the FBI about Paris. London");
        assert_eq!(tags(&tokens), vec!["NN", "DT", "NNP", "IN", "NNP", ".", "NN"]);
    }

    #[test]
    fn test_whitespace_is_literal() {
        let tokens = RuleTagger::new().tag("a\n\nb");
        assert_eq!(tokens[0].whitespace, "\n\n");
        assert_eq!(tokens[1].whitespace, " ");
    }

    #[test]
    fn test_dash_and_address() {
        let tokens = RuleTagger::new().tag("mail me@example.com - now");
        assert_eq!(tags(&tokens), vec!["NN", "ADD", ":", "RB"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(RuleTagger::new().tag("   ").is_empty());
    }
}
