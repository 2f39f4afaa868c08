//! Inline annotation extraction.
//!
//! Annotations use markdown-link syntax, `[display](directive)`:
//! - `[tomato](/təmˈɑtO/)` forces literal phonemes
//! - `[2024](#&#)` sets numeral-reading flags
//! - `[record](-1)` or `[a](0.5)` sets a stress override

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LINK_REGEX: Regex = Regex::new(r"\[([^\]]+)\]\(([^\)]*)\)").unwrap();
}

/// A parsed annotation directive.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Stress(f64),
    Phonemes(String),
    NumFlags(String),
}

impl Directive {
    /// Parse the parenthesised part of a link. Unrecognised directives
    /// yield `None` and are dropped.
    pub fn parse(raw: &str) -> Option<Self> {
        let unsigned = raw.strip_prefix(['-', '+']).unwrap_or(raw);
        if !unsigned.is_empty() && unsigned.bytes().all(|b| b.is_ascii_digit()) {
            return raw.parse::<i64>().ok().map(|n| Directive::Stress(n as f64));
        }
        match raw {
            "0.5" | "+0.5" => return Some(Directive::Stress(0.5)),
            "-0.5" => return Some(Directive::Stress(-0.5)),
            _ => {}
        }
        let len = raw.chars().count();
        if len > 1 && raw.starts_with('/') && raw.ends_with('/') {
            let ps = raw.trim_matches('/');
            return Some(Directive::Phonemes(ps.to_string()));
        }
        if len > 1 && raw.starts_with('#') && raw.ends_with('#') {
            return Some(Directive::NumFlags(raw.trim_matches('#').to_string()));
        }
        None
    }
}

/// Output of [`preprocess`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preprocessed {
    /// Input with every link replaced by its display text
    pub text: String,
    /// Whitespace-split surface pieces; each link display is one piece
    pub tokens: Vec<String>,
    /// Directives keyed by index into `tokens`
    pub features: BTreeMap<usize, Directive>,
}

/// Strip annotation links from `text`, recording their directives.
pub fn preprocess(text: &str) -> Preprocessed {
    let text = text.trim_start();
    let mut out = Preprocessed::default();
    let mut last_end = 0;
    for caps in LINK_REGEX.captures_iter(text) {
        let (Some(whole), Some(display), Some(raw)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let before = &text[last_end..whole.start()];
        out.text.push_str(before);
        out.tokens.extend(before.split_whitespace().map(str::to_string));

        match Directive::parse(raw.as_str()) {
            Some(directive) => {
                out.features.insert(out.tokens.len(), directive);
            }
            None => log::debug!("Ignoring unknown annotation {:?}", raw.as_str()),
        }
        out.text.push_str(display.as_str());
        out.tokens.push(display.as_str().to_string());
        last_end = whole.end();
    }
    if last_end < text.len() {
        let rest = &text[last_end..];
        out.text.push_str(rest);
        out.tokens.extend(rest.split_whitespace().map(str::to_string));
    }
    out
}
