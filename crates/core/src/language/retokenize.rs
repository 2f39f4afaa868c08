//! Subtoken splitting and regrouping.
//!
//! Each token is split into lexical subtokens (camel-case pieces, digit
//! groups, hyphen runs, quotes). Punctuation and currency subtokens are
//! resolved on the spot; the rest are regrouped into runs of glued
//! subtokens that the resolver will try to look up as compounds.

use crate::types::{Token, RATING_GOLD, RATING_SILVER};

use super::lexicon::currency_units;

/// Tags whose non-alphabetic tokens are rendered as literal punctuation.
pub const PUNCT_TAGS: [&str; 10] = [".", ",", "-LRB-", "-RRB-", "``", "\"\"", "''", ":", "$", "#"];

/// Punctuation kept verbatim in the phoneme stream.
pub const PUNCTS: &str = ";:,.!?—…\"“”";

/// Punctuation that separates phrases (quotes excluded).
pub const NON_QUOTE_PUNCTS: &str = ";:,.!?—…";

/// Characters that carry no sound inside a glued group.
pub const SUBTOKEN_JUNKS: &str = "',-._‘’/";

fn punct_tag_phonemes(tag: &str) -> Option<&'static str> {
    match tag {
        "-LRB-" => Some("("),
        "-RRB-" => Some(")"),
        "``" => Some("\u{201c}"),
        "\"\"" | "''" => Some("\u{201d}"),
        _ => None,
    }
}

pub(crate) fn is_junk(text: &str) -> bool {
    text.chars().all(|c| SUBTOKEN_JUNKS.contains(c))
}

/// A retokenized unit: a standalone token or a run of glued subtokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Unit {
    Word(Token),
    Group(Vec<Token>),
}

fn is_quote(c: char) -> bool {
    matches!(c, '\'' | '\u{2018}' | '\u{2019}')
}

fn run_while(chars: &[char], start: usize, pred: impl Fn(char) -> bool) -> usize {
    chars[start..]
        .iter()
        .position(|&c| !pred(c))
        .map_or(chars.len(), |n| start + n)
}

/// Leading quote run at the very start of the word.
fn scan_leading_quotes(chars: &[char], p: usize) -> Option<usize> {
    (p == 0 && is_quote(chars[0])).then(|| run_while(chars, 0, is_quote))
}

/// A capital starting an "ABc" run when scanning lands on it ("4KTv").
fn scan_camel_capital(chars: &[char], p: usize) -> Option<usize> {
    let upper_then_word = chars[p].is_uppercase()
        && chars.get(p + 1).is_some_and(|c| c.is_uppercase())
        && chars.get(p + 2).is_some_and(|c| c.is_lowercase());
    upper_then_word.then_some(p + 1)
}

/// Digit groups with single `,`/`.` separators, optionally negative at the
/// start of the word.
fn scan_digits(chars: &[char], p: usize) -> Option<usize> {
    let digit = |i: usize| chars.get(i).is_some_and(|c| c.is_ascii_digit());
    let sep = |i: usize| chars.get(i).is_some_and(|&c| c == ',' || c == '.');
    let mut q = if p == 0 && chars[0] == '-' { 1 } else { p };
    let start = q;
    loop {
        q = if digit(q) && sep(q + 1) && digit(q + 2) {
            q + 3
        } else if digit(q) && digit(q + 1) {
            q + 2
        } else if sep(q) && digit(q + 1) {
            q + 2
        } else if digit(q) {
            q + 1
        } else {
            break;
        };
    }
    (q > start).then_some(q)
}

fn scan_dashes(chars: &[char], p: usize) -> Option<usize> {
    let end = run_while(chars, p, |c| c == '-' || c == '_');
    (end > p).then_some(end)
}

fn scan_quote_run(chars: &[char], p: usize) -> Option<usize> {
    let end = run_while(chars, p, is_quote);
    (end - p >= 2).then_some(end)
}

/// Shortest letter run ending in a lowercase letter right before a
/// capital ("camelCase" → "camel").
fn scan_lower_before_upper(chars: &[char], p: usize) -> Option<usize> {
    let letters_end = run_while(chars, p, char::is_alphabetic);
    for n in p..=letters_end {
        let mut q = n;
        loop {
            if chars.get(q).is_some_and(|c| c.is_lowercase())
                && chars.get(q + 1).is_some_and(|c| c.is_uppercase())
            {
                return Some(q + 1);
            }
            let pair = chars.get(q).is_some_and(|&c| is_quote(c))
                && chars.get(q + 1).is_some_and(|c| c.is_alphabetic());
            if !pair {
                break;
            }
            q += 2;
        }
    }
    None
}

/// Letters with internal apostrophes ("don't", "rock'n'roll").
fn scan_word(chars: &[char], p: usize) -> Option<usize> {
    let mut end = run_while(chars, p, char::is_alphabetic);
    if end == p {
        return None;
    }
    while end + 1 < chars.len() && is_quote(chars[end]) && chars[end + 1].is_alphabetic() {
        end = run_while(chars, end + 1, char::is_alphabetic);
    }
    Some(end)
}

fn scan_symbol(chars: &[char], p: usize) -> Option<usize> {
    let c = chars[p];
    let plain = !(c == '-' || c == '_' || c.is_alphabetic() || is_quote(c) || c.is_ascii_digit());
    plain.then_some(p + 1)
}

fn scan_trailing_quotes(chars: &[char], p: usize) -> Option<usize> {
    let end = run_while(chars, p, is_quote);
    (end > p && end == chars.len()).then_some(end)
}

const SCANNERS: [fn(&[char], usize) -> Option<usize>; 9] = [
    scan_leading_quotes,
    scan_camel_capital,
    scan_digits,
    scan_dashes,
    scan_quote_run,
    scan_lower_before_upper,
    scan_word,
    scan_symbol,
    scan_trailing_quotes,
];

/// Split a word into lexical subtokens. Characters matched by no rule
/// (a lone mid-word quote) are dropped.
pub fn subtokenize(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut pieces = Vec::new();
    let mut p = 0;
    while p < chars.len() {
        match SCANNERS.iter().find_map(|scan| scan(&chars, p)) {
            Some(end) => {
                pieces.push(chars[p..end].iter().collect());
                p = end;
            }
            None => p += 1,
        }
    }
    pieces
}

/// Split tokens into subtokens, resolve punctuation and currency, and
/// regroup glued unresolved subtokens.
pub fn retokenize(tokens: Vec<Token>) -> Vec<Unit> {
    let mut units: Vec<Unit> = Vec::new();
    let mut currency: Option<String> = None;

    for token in tokens {
        let mut subtokens: Vec<Token> = if token.alias.is_none() && token.phonemes.is_none() {
            subtokenize(&token.text)
                .into_iter()
                .map(|text| Token {
                    text,
                    tag: token.tag.clone(),
                    whitespace: String::new(),
                    phonemes: None,
                    is_head: true,
                    alias: None,
                    stress: token.stress,
                    currency: None,
                    num_flags: token.num_flags.clone(),
                    prespace: false,
                    rating: None,
                })
                .collect()
        } else {
            vec![token.clone()]
        };
        match subtokens.last_mut() {
            Some(last) => last.whitespace = token.whitespace.clone(),
            None => continue,
        }

        let count = subtokens.len();
        for j in 0..count {
            let glued_two = j > 0
                && j + 1 < count
                && subtokens[j].text == "2"
                && {
                    let prev = subtokens[j - 1].text.chars().last();
                    let next = subtokens[j + 1].text.chars().next();
                    prev.is_some_and(char::is_alphabetic) && next.is_some_and(char::is_alphabetic)
                };
            let next_is_cd = j + 1 < count && subtokens[j + 1].tag == "CD";
            let tk = &mut subtokens[j];

            if tk.alias.is_some() || tk.phonemes.is_some() {
                // pre-resolved by an annotation
            } else if tk.tag == "$" && currency_units(&tk.text).is_some() {
                currency = Some(tk.text.clone());
                tk.phonemes = Some(String::new());
                tk.rating = Some(RATING_GOLD);
            } else if tk.tag == ":" && (tk.text == "-" || tk.text == "–") {
                tk.phonemes = Some("—".to_string());
                tk.rating = Some(RATING_SILVER);
            } else if PUNCT_TAGS.contains(&tk.tag.as_str())
                && !tk.text.chars().all(|c| c.is_ascii_alphabetic())
            {
                let ps = match punct_tag_phonemes(&tk.tag) {
                    Some(ps) => ps.to_string(),
                    None => tk.text.chars().filter(|&c| PUNCTS.contains(c)).collect(),
                };
                tk.phonemes = Some(ps);
                tk.rating = Some(RATING_GOLD);
            } else if currency.is_some() {
                if tk.tag != "CD" {
                    currency = None;
                } else if !next_is_cd {
                    tk.currency = currency.clone();
                }
            } else if glued_two {
                tk.alias = Some("to".to_string());
            }
        }

        for mut tk in subtokens {
            if tk.alias.is_some() || tk.phonemes.is_some() {
                units.push(Unit::Word(tk));
                continue;
            }
            match units.last_mut() {
                Some(Unit::Group(group))
                    if group.last().is_some_and(|last| last.whitespace.is_empty()) =>
                {
                    tk.is_head = false;
                    group.push(tk);
                }
                _ if !tk.whitespace.is_empty() => units.push(Unit::Word(tk)),
                _ => units.push(Unit::Group(vec![tk])),
            }
        }
    }

    units
        .into_iter()
        .map(|unit| match unit {
            Unit::Group(mut group) if group.len() == 1 => Unit::Word(group.remove(0)),
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(unit: &Unit) -> Vec<&str> {
        match unit {
            Unit::Word(tk) => vec![tk.text.as_str()],
            Unit::Group(group) => group.iter().map(|tk| tk.text.as_str()).collect(),
        }
    }

    #[test]
    fn test_subtokenize_apostrophes() {
        assert_eq!(subtokenize("don't"), vec!["don't"]);
        assert_eq!(subtokenize("rock'n'roll"), vec!["rock'n'roll"]);
        assert_eq!(subtokenize("'quoted'"), vec!["'", "quoted", "'"]);
    }

    #[test]
    fn test_subtokenize_hyphen() {
        assert_eq!(subtokenize("well-known"), vec!["well", "-", "known"]);
        assert_eq!(subtokenize("snake__case"), vec!["snake", "__", "case"]);
    }

    #[test]
    fn test_subtokenize_camel_case() {
        assert_eq!(subtokenize("camelCase"), vec!["camel", "Case"]);
        assert_eq!(subtokenize("4KTv"), vec!["4", "K", "Tv"]);
        assert_eq!(subtokenize("iPhone"), vec!["i", "Phone"]);
    }

    #[test]
    fn test_subtokenize_digits() {
        assert_eq!(subtokenize("3.50"), vec!["3.50"]);
        assert_eq!(subtokenize("1,000,000"), vec!["1,000,000"]);
        assert_eq!(subtokenize("-5"), vec!["-5"]);
        assert_eq!(subtokenize("b2b"), vec!["b", "2", "b"]);
        assert_eq!(subtokenize("1990s"), vec!["1990", "s"]);
    }

    #[test]
    fn test_subtokenize_symbols() {
        assert_eq!(subtokenize("a/b"), vec!["a", "/", "b"]);
        assert_eq!(subtokenize("$5"), vec!["$", "5"]);
    }

    #[test]
    fn test_currency_carried_to_numeral() {
        let units = retokenize(vec![
            Token::new("$", "$", ""),
            Token::new("3.50", "CD", ""),
            Token::new(".", ".", " "),
        ]);
        assert_eq!(units.len(), 3);
        let Unit::Word(dollar) = &units[0] else { panic!("expected word") };
        assert_eq!(dollar.phonemes.as_deref(), Some(""));
        assert_eq!(dollar.rating, Some(RATING_GOLD));
        let Unit::Word(amount) = &units[1] else { panic!("expected word") };
        assert_eq!(amount.currency.as_deref(), Some("$"));
        assert!(amount.phonemes.is_none());
        let Unit::Word(period) = &units[2] else { panic!("expected word") };
        assert_eq!(period.phonemes.as_deref(), Some("."));
    }

    #[test]
    fn test_currency_cleared_by_other_tag() {
        let units = retokenize(vec![
            Token::new("$", "$", " "),
            Token::new("many", "JJ", " "),
            Token::new("5", "CD", " "),
        ]);
        let Unit::Word(five) = &units[2] else { panic!("expected word") };
        assert!(five.currency.is_none());
    }

    #[test]
    fn test_punctuation_literals() {
        let units = retokenize(vec![
            Token::new("(", "-LRB-", ""),
            Token::new("hi", "NN", ""),
            Token::new(")", "-RRB-", " "),
            Token::new("-", ":", " "),
            Token::new("“", "``", ""),
        ]);
        let ps: Vec<Option<&str>> = units
            .iter()
            .map(|u| match u {
                Unit::Word(tk) => tk.phonemes.as_deref(),
                Unit::Group(_) => None,
            })
            .collect();
        assert_eq!(ps, vec![Some("("), None, Some(")"), Some("—"), Some("“")]);
    }

    #[test]
    fn test_glued_subtokens_group() {
        let units = retokenize(vec![Token::new("well-known", "JJ", " ")]);
        assert_eq!(units.len(), 1);
        assert_eq!(words(&units[0]), vec!["well", "-", "known"]);
        let Unit::Group(group) = &units[0] else { panic!("expected group") };
        assert!(group[0].is_head);
        assert!(!group[1].is_head);
        assert_eq!(group[2].whitespace, " ");
    }

    #[test]
    fn test_two_between_letters_becomes_to() {
        let units = retokenize(vec![Token::new("b2b", "NN", " ")]);
        assert_eq!(units.len(), 3);
        let Unit::Word(two) = &units[1] else { panic!("expected word") };
        assert_eq!(two.alias.as_deref(), Some("to"));
    }

    #[test]
    fn test_single_subtoken_is_word() {
        let units = retokenize(vec![Token::new("cat", "NN", " "), Token::new("dog", "NN", " ")]);
        assert!(units.iter().all(|u| matches!(u, Unit::Word(_))));
    }

    #[test]
    fn test_annotated_token_not_split() {
        let mut tk = Token::new("well-known", "JJ", " ");
        tk.phonemes = Some("wˈɛlnˈOn".into());
        let units = retokenize(vec![tk]);
        assert_eq!(units.len(), 1);
        assert_eq!(words(&units[0]), vec!["well-known"]);
    }
}
