//! Reading numerals: cardinals, ordinals, years, decimals, digit strings
//! and currency amounts, with `s`/`ed`/`ing` suffixes re-attached.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{Rating, RATING_GOLD};

use super::lexicon::{currency_units, Lexicon};
use super::numerals;

const ORDINAL_SUFFIXES: [&str; 4] = ["st", "nd", "rd", "th"];

/// Suffixes a numeral may carry and still count as a number.
const NUMBER_SUFFIXES: [&str; 9] = ["ing", "'d", "ed", "'s", "st", "nd", "rd", "th", "s"];

lazy_static! {
    static ref SUFFIX_REGEX: Regex = Regex::new(r"[a-z']+$").unwrap();
    static ref NON_LETTERS: Regex = Regex::new(r"[^a-z]+").unwrap();
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Whether `word` reads as a numeral. A leading minus is only allowed on
/// head tokens.
pub fn is_number(word: &str, is_head: bool) -> bool {
    if !word.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    let stem = NUMBER_SUFFIXES
        .iter()
        .find_map(|s| word.strip_suffix(s))
        .unwrap_or(word);
    stem.chars().enumerate().all(|(i, c)| {
        c.is_ascii_digit() || c == ',' || c == '.' || (is_head && i == 0 && c == '-')
    })
}

/// Whether an amount can be read as major and minor currency units.
fn is_currency(word: &str) -> bool {
    match word.matches('.').count() {
        0 => true,
        1 => {
            let cents = word.split('.').nth(1).unwrap_or("");
            cents.chars().count() < 3 || cents.chars().all(|c| c == '0')
        }
        _ => false,
    }
}

/// Accumulates the phonemes of a spelled-out numeral.
struct NumberReader<'a> {
    lexicon: &'a Lexicon,
    flags: &'a str,
    parts: Vec<(String, Rating)>,
    failed: bool,
}

impl<'a> NumberReader<'a> {
    fn push_word(&mut self, word: &str, stress: Option<f64>) {
        match self.lexicon.lookup(word, None, stress, None) {
            Some(part) => self.parts.push(part),
            None => {
                log::warn!("No pronunciation for number word {:?}", word);
                self.failed = true;
            }
        }
    }

    /// Split spelled-out words on non-letters and look each one up,
    /// applying the `&`, `a` and `n` reading flags.
    fn extend_words(&mut self, words: &str, first: bool) {
        let splits: Vec<&str> = NON_LETTERS.split(words).filter(|w| !w.is_empty()).collect();
        for (i, w) in splits.iter().enumerate() {
            if *w != "and" || self.flags.contains('&') {
                if first && i == 0 && splits.len() > 1 && *w == "one" && self.flags.contains('a') {
                    self.parts.push(("ə".to_string(), RATING_GOLD));
                } else {
                    let stress = if *w == "point" { Some(-2.0) } else { None };
                    self.push_word(w, stress);
                }
            } else if self.flags.contains('n') {
                if let Some(last) = self.parts.last_mut() {
                    last.0.push_str("ən");
                }
            }
        }
    }

    fn extend_cardinal(&mut self, n: i64, first: bool) {
        self.extend_words(&numerals::cardinal(n), first);
    }

    /// Read each digit on its own.
    fn extend_digits(&mut self, digits: &str) {
        for d in digits.bytes().filter(u8::is_ascii_digit) {
            self.extend_cardinal((d - b'0') as i64, false);
        }
    }
}

fn parse_int(s: &str) -> Option<i64> {
    match s.parse::<i64>() {
        Ok(n) => Some(n),
        Err(e) => {
            log::warn!("Cannot read {:?} as an integer: {}", s, e);
            None
        }
    }
}

impl Lexicon {
    /// Spell out a numeral token.
    ///
    /// `is_head` is false for numerals glued to a preceding token (phone
    /// numbers, version strings), which read digit by digit or in short
    /// groups. Returns `None` when no reading applies.
    pub fn get_number(
        &self,
        word: &str,
        currency: Option<&str>,
        is_head: bool,
        flags: &str,
    ) -> Option<(String, Rating)> {
        let suffix = SUFFIX_REGEX.find(word).map(|m| m.as_str());
        let mut word = match suffix {
            Some(s) => &word[..word.len() - s.len()],
            None => word,
        };
        let ordinal = suffix.is_some_and(|s| ORDINAL_SUFFIXES.contains(&s));
        let units = currency.and_then(currency_units);

        let mut reader = NumberReader {
            lexicon: self,
            flags,
            parts: Vec::new(),
            failed: false,
        };
        if let Some(rest) = word.strip_prefix('-') {
            reader.push_word("minus", None);
            word = rest;
        }

        if is_digits(word) && ordinal {
            reader.extend_words(&numerals::ordinal(parse_int(word)?), true);
        } else if is_head
            && reader.parts.is_empty()
            && word.len() == 4
            && units.is_none()
            && is_digits(word)
        {
            reader.extend_words(&numerals::year(parse_int(word)?), true);
        } else if !is_head && !word.contains('.') {
            let num = word.replace(',', "");
            let bytes = num.as_bytes();
            if !is_digits(&num) {
                // nothing to read
            } else if bytes[0] == b'0' || num.len() > 3 {
                reader.extend_digits(&num);
            } else if num.len() == 3 && !num.ends_with("00") {
                reader.extend_cardinal((bytes[0] - b'0') as i64, true);
                if bytes[1] == b'0' {
                    reader.push_word("O", Some(-2.0));
                    reader.extend_cardinal((bytes[2] - b'0') as i64, false);
                } else {
                    reader.extend_cardinal(parse_int(&num[1..])?, false);
                }
            } else {
                reader.extend_cardinal(parse_int(&num)?, true);
            }
        } else if word.matches('.').count() > 1 || !is_head {
            let mut first = true;
            for num in word.replace(',', "").split('.') {
                if !is_digits(num) {
                    // skip
                } else if num.starts_with('0')
                    || (num.len() != 2 && num.bytes().skip(1).any(|b| b != b'0'))
                {
                    reader.extend_digits(num);
                } else {
                    reader.extend_cardinal(parse_int(num)?, first);
                }
                first = false;
            }
        } else if let Some((major, minor)) = units.filter(|_| is_currency(word)) {
            let plain = word.replace(',', "");
            let mut pairs: Vec<(i64, &str)> = Vec::new();
            for (num, unit) in plain.split('.').zip([major, minor]) {
                let n = if num.is_empty() { 0 } else { parse_int(num)? };
                pairs.push((n, unit));
            }
            if pairs.len() > 1 {
                if pairs[1].0 == 0 {
                    pairs.truncate(1);
                } else if pairs[0].0 == 0 {
                    pairs.remove(0);
                }
            }
            for (i, &(n, unit)) in pairs.iter().enumerate() {
                if i > 0 {
                    reader.push_word("and", None);
                }
                reader.extend_cardinal(n, i == 0);
                let unit_ps = if n.abs() != 1 && unit != "pence" {
                    self.stem_s(&format!("{}s", unit), None, None, None)
                } else {
                    self.lookup(unit, None, None, None)
                };
                match unit_ps {
                    Some(part) => reader.parts.push(part),
                    None => {
                        log::warn!("No pronunciation for currency unit {:?}", unit);
                        reader.failed = true;
                    }
                }
            }
        } else {
            let spelled = if is_digits(word) || !word.contains('.') {
                let n = parse_int(&word.replace(',', ""))?;
                if ordinal {
                    numerals::ordinal(n)
                } else {
                    numerals::cardinal(n)
                }
            } else {
                let plain = word.replace(',', "");
                match plain.strip_prefix('.') {
                    Some(frac) => {
                        let digits: Vec<String> = frac
                            .bytes()
                            .filter(u8::is_ascii_digit)
                            .map(|d| numerals::cardinal((d - b'0') as i64))
                            .collect();
                        format!("point {}", digits.join(" "))
                    }
                    None => numerals::decimal(&plain)?,
                }
            };
            reader.extend_words(&spelled, true);
        }

        if reader.failed || reader.parts.is_empty() {
            log::warn!("Failed to read {:?} as a number", word);
            return None;
        }
        let rating = reader.parts.iter().map(|(_, r)| *r).min().unwrap_or(RATING_GOLD);
        let joined = reader
            .parts
            .iter()
            .map(|(ps, _)| ps.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let ps = match suffix {
            Some("s") | Some("'s") => self.suffix_s(&joined)?,
            Some("ed") | Some("'d") => self.suffix_ed(&joined)?,
            Some("ing") => self.suffix_ing(&joined)?,
            _ => joined,
        };
        Some((ps, rating))
    }
}
