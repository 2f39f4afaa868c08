//! Tagged tokens → pipeline tokens, with annotation directives applied
//! and phrase overrides folded back into single tokens.

use std::collections::BTreeMap;
use std::ops::Range;

use crate::types::{Token, RATING_USER};

use super::preprocess::Directive;
use super::tagger::TaggedToken;

/// Non-whitespace character span of each piece, counted across the whole
/// sequence. Two tokenizations of the same text align where spans overlap.
fn spans<'a>(pieces: impl Iterator<Item = &'a str>) -> Vec<Range<usize>> {
    let mut offset = 0;
    pieces
        .map(|piece| {
            let len = piece.chars().filter(|c| !c.is_whitespace()).count();
            let span = offset..offset + len;
            offset += len;
            span
        })
        .collect()
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Build pipeline tokens from tagger output and apply the directives
/// extracted by the preprocessor.
///
/// `surface` is the preprocessor's piece list that `features` indexes.
/// A phoneme override spanning several tagged tokens keeps only the first
/// as head; the rest are silenced and folded into it by [`fold_left`].
pub fn tokenize(
    tagged: &[TaggedToken],
    surface: &[String],
    features: &BTreeMap<usize, Directive>,
) -> Vec<Token> {
    let mut tokens: Vec<Token> = tagged
        .iter()
        .map(|t| Token::new(&t.text, &t.tag, &t.whitespace))
        .collect();
    if features.is_empty() {
        return tokens;
    }

    let surface_spans = spans(surface.iter().map(String::as_str));
    let token_spans = spans(tagged.iter().map(|t| t.text.as_str()));
    for (&k, directive) in features {
        let Some(target) = surface_spans.get(k) else {
            continue;
        };
        let aligned = token_spans
            .iter()
            .enumerate()
            .filter(|(_, span)| overlaps(span, target))
            .map(|(j, _)| j);
        for (i, j) in aligned.enumerate() {
            let tk = &mut tokens[j];
            match directive {
                Directive::Stress(stress) => tk.stress = Some(*stress),
                Directive::Phonemes(ps) => {
                    tk.is_head = i == 0;
                    tk.phonemes = Some(if i == 0 { ps.clone() } else { String::new() });
                    tk.rating = Some(RATING_USER);
                }
                Directive::NumFlags(flags) => tk.num_flags = flags.clone(),
            }
        }
    }
    tokens
}

/// Merge every non-head token into the token before it.
pub fn fold_left(tokens: Vec<Token>, unk: &str) -> Vec<Token> {
    let mut result: Vec<Token> = Vec::with_capacity(tokens.len());
    for tk in tokens {
        match result.pop() {
            Some(prev) if !tk.is_head => result.push(Token::merge(&[prev, tk], Some(unk))),
            Some(prev) => {
                result.push(prev);
                result.push(tk);
            }
            None => result.push(tk),
        }
    }
    result
}
