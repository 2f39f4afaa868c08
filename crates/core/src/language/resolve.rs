//! Right-to-left resolution of retokenized units.
//!
//! Words are resolved directly; glued groups first try greedy compound
//! lookups over shrinking windows, then fall back to the external
//! phonemizer or to per-piece resolution with a stress heuristic.

use crate::types::{Rating, Token, TokenContext, RATING_SILVER};

use super::fallback::Fallback;
use super::lexicon::Lexicon;
use super::retokenize::{is_junk, Unit, NON_QUOTE_PUNCTS, SUBTOKEN_JUNKS};
use super::stress::{apply_stress, is_consonant, is_vowel, stress_weight, PRIMARY_STRESS};

/// Context for the token to the left of `token`, given its phonemes.
///
/// The first vowel, consonant or phrase-breaking punctuation character
/// decides `future_vowel`; punctuation makes it unknown again.
pub fn token_context(ctx: &TokenContext, ps: Option<&str>, token: &Token) -> TokenContext {
    let future_vowel = ps
        .and_then(|ps| {
            ps.chars()
                .find(|&c| is_vowel(c) || is_consonant(c) || NON_QUOTE_PUNCTS.contains(c))
        })
        .map_or(ctx.future_vowel, |c| {
            if NON_QUOTE_PUNCTS.contains(c) {
                None
            } else {
                Some(is_vowel(c))
            }
        });
    let future_to = matches!(token.text.as_str(), "to" | "To")
        || (token.text == "TO" && (token.tag == "TO" || token.tag == "IN"));
    TokenContext {
        future_vowel,
        future_to,
    }
}

/// Resolution driver holding the lexicon and optional fallback.
pub struct Resolver<'a> {
    lexicon: &'a Lexicon,
    fallback: Option<&'a dyn Fallback>,
    unk: &'a str,
}

impl<'a> Resolver<'a> {
    pub fn new(lexicon: &'a Lexicon, fallback: Option<&'a dyn Fallback>, unk: &'a str) -> Self {
        Self {
            lexicon,
            fallback,
            unk,
        }
    }

    fn call_fallback(&self, token: &Token) -> Option<(String, Rating)> {
        let fallback = self.fallback?;
        let result = fallback.phonemize(token);
        match &result {
            Some((ps, _)) => log::debug!("{} fallback: {:?} → {:?}", fallback.name(), token.text, ps),
            None => log::warn!("{} fallback could not phonemize {:?}", fallback.name(), token.text),
        }
        result
    }

    /// Resolve every unit and flatten groups into single tokens. Every
    /// returned token has phonemes; unresolved ones get the `unk` glyph.
    pub fn resolve(&self, mut units: Vec<Unit>) -> Vec<Token> {
        let mut ctx = TokenContext::default();
        for unit in units.iter_mut().rev() {
            match unit {
                Unit::Word(tk) => {
                    if tk.phonemes.is_none() {
                        if let Some((ps, rating)) = self.lexicon.resolve_token(tk, &ctx) {
                            tk.phonemes = Some(ps);
                            tk.rating = Some(rating);
                        }
                    }
                    if tk.phonemes.is_none() {
                        if let Some((ps, rating)) = self.call_fallback(tk) {
                            tk.phonemes = Some(ps);
                            tk.rating = Some(rating);
                        }
                    }
                    ctx = token_context(&ctx, tk.phonemes.as_deref(), tk);
                }
                Unit::Group(group) => ctx = self.resolve_group(group, ctx),
            }
        }

        units
            .into_iter()
            .map(|unit| {
                let mut tk = match unit {
                    Unit::Word(tk) => tk,
                    Unit::Group(group) => Token::merge(&group, Some(self.unk)),
                };
                if tk.phonemes.is_none() {
                    log::debug!("No pronunciation for {:?}", tk.text);
                    tk.phonemes = Some(self.unk.to_string());
                }
                tk
            })
            .collect()
    }

    /// Greedy longest-window compound lookup over a glued group.
    fn resolve_group(&self, group: &mut [Token], mut ctx: TokenContext) -> TokenContext {
        let (mut left, mut right) = (0, group.len());
        let mut should_fallback = false;
        while left < right {
            let window = &group[left..right];
            let found = if window.iter().any(|tk| tk.alias.is_some() || tk.phonemes.is_some()) {
                None
            } else {
                let merged = Token::merge(window, None);
                self.lexicon
                    .resolve_token(&merged, &ctx)
                    .map(|found| (found, merged))
            };

            if let Some(((ps, rating), merged)) = found {
                log::debug!("Compound {:?} resolved over [{}, {})", merged.text, left, right);
                ctx = token_context(&ctx, Some(&ps), &merged);
                group[left].phonemes = Some(ps);
                group[left].rating = Some(rating);
                for tk in &mut group[left + 1..right] {
                    tk.phonemes = Some(String::new());
                    tk.rating = Some(rating);
                }
                right = left;
                left = 0;
            } else if left + 1 < right {
                left += 1;
            } else {
                right -= 1;
                let tk = &mut group[right];
                if tk.phonemes.is_none() {
                    if is_junk(&tk.text) {
                        tk.phonemes = Some(String::new());
                        tk.rating = Some(RATING_SILVER);
                    } else if self.fallback.is_some() {
                        should_fallback = true;
                        break;
                    }
                }
                left = 0;
            }
        }

        if should_fallback {
            let merged = Token::merge(group, None);
            let result = self.call_fallback(&merged);
            let rating = result.as_ref().map(|(_, r)| *r);
            group[0].phonemes = result.map(|(ps, _)| ps);
            group[0].rating = rating;
            for tk in group.iter_mut().skip(1) {
                tk.phonemes = Some(String::new());
                tk.rating = rating;
            }
        } else {
            resolve_tokens(group);
        }
        ctx
    }
}

/// Stress heuristic for a group whose compound lookup failed.
///
/// Loosely joined groups (spaces, slashes, or mixed letters and digits)
/// keep each piece's stress and get a visible space between pieces.
/// Tightly joined groups with too many primary stresses have the lighter
/// half demoted to secondary.
pub fn resolve_tokens(tokens: &mut [Token]) {
    let Some(last) = tokens.last() else {
        return;
    };
    let mut text = String::new();
    for tk in &tokens[..tokens.len() - 1] {
        text.push_str(&tk.text);
        text.push_str(&tk.whitespace);
    }
    text.push_str(&last.text);

    let mut classes = [false; 3];
    for c in text.chars().filter(|&c| !SUBTOKEN_JUNKS.contains(c)) {
        let class = if c.is_alphabetic() {
            0
        } else if c.is_ascii_digit() {
            1
        } else {
            2
        };
        classes[class] = true;
    }
    let prespace = text.contains(' ')
        || text.contains('/')
        || classes.iter().filter(|&&seen| seen).count() > 1;

    let n = tokens.len();
    for (i, tk) in tokens.iter_mut().enumerate() {
        if tk.phonemes.is_none() {
            if i == n - 1 && tk.text.chars().count() == 1 && NON_QUOTE_PUNCTS.contains(tk.text.as_str()) {
                tk.phonemes = Some(tk.text.clone());
                tk.rating = Some(RATING_SILVER);
            } else if is_junk(&tk.text) {
                tk.phonemes = Some(String::new());
                tk.rating = Some(RATING_SILVER);
            }
        } else if i > 0 {
            tk.prespace = prespace;
        }
    }
    if prespace {
        return;
    }

    let mut indices: Vec<(bool, usize, usize)> = tokens
        .iter()
        .enumerate()
        .filter_map(|(i, tk)| {
            let ps = tk.phonemes.as_deref().filter(|ps| !ps.is_empty())?;
            Some((ps.contains(PRIMARY_STRESS), stress_weight(ps), i))
        })
        .collect();

    let demote = |tk: &mut Token| {
        if let Some(ps) = tk.phonemes.as_deref() {
            tk.phonemes = Some(apply_stress(ps, Some(-0.5)));
        }
    };

    if indices.len() == 2 && tokens[indices[0].2].text.chars().count() == 1 {
        demote(&mut tokens[indices[1].2]);
        return;
    }
    let primaries = indices.iter().filter(|(primary, _, _)| *primary).count();
    if indices.len() < 2 || primaries <= (indices.len() + 1) / 2 {
        return;
    }
    indices.sort_unstable();
    let half = indices.len() / 2;
    for &(_, _, i) in &indices[..half] {
        demote(&mut tokens[i]);
    }
}
