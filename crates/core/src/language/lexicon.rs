//! Dictionary-backed word → phoneme resolver.
//!
//! Two tiers are consulted in order: a high-confidence "gold" dictionary
//! and a lower-confidence "silver" one. Words missing from both are
//! resolved through closed-class special cases, possessive/contraction
//! stripping and `-s`/`-ed`/`-ing` morphology. Numerals are expanded in
//! [`super::numbers`].
//!
//! Entry files are JSON objects mapping a word either to a phoneme string
//! or to a tag-indexed object with a mandatory `DEFAULT` key:
//!
//! ```json
//! { "cat": "kˈæt", "read": { "DEFAULT": "ɹˈid", "VBD": "ɹˈɛd" } }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;
use unicode_normalization::UnicodeNormalization;

use crate::error::LexiconError;
use crate::types::{Rating, Token, TokenContext, RATING_GOLD, RATING_SILVER};

use super::numbers::is_number;
use super::stress::{apply_stress, PRIMARY_STRESS, SECONDARY_STRESS};

/// Symbols allowed in American English entries.
pub const US_VOCAB: &str = "AIOWYbdfhijklmnpstuvwzæðŋɑɔəɛɜɡɪɹɾʃʊʌʒʤʧˈˌθᵊᵻʔ";

/// Symbols allowed in British English entries.
pub const GB_VOCAB: &str = "AIQWYabdfhijklmnpstuvwzðŋɑɒɔəɛɜɡɪɹʃʊʌʒʤʧˈˌːθᵊ";

/// Vowels after which a US `t` flaps before a vowel-initial suffix.
const US_TAUS: &str = "AIOWYiuæɑəɛɪɹʊʌ";

/// Currency symbols and their (major, minor) unit words.
pub const CURRENCIES: [(&str, (&str, &str)); 3] = [
    ("$", ("dollar", "cent")),
    ("£", ("pound", "pence")),
    ("€", ("euro", "cent")),
];

/// Symbols read aloud when they stand alone.
const SYMBOLS: [(&str, &str); 4] = [("%", "percent"), ("&", "and"), ("+", "plus"), ("@", "at")];

/// Symbols read aloud only when tagged `ADD` (URLs, e-mail addresses).
const ADD_SYMBOLS: [(&str, &str); 2] = [(".", "dot"), ("/", "slash")];

pub fn currency_units(symbol: &str) -> Option<(&'static str, &'static str)> {
    CURRENCIES
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, units)| *units)
}

fn symbol_word(symbol: &str) -> Option<&'static str> {
    SYMBOLS.iter().find(|(s, _)| *s == symbol).map(|(_, w)| *w)
}

fn add_symbol_word(symbol: &str) -> Option<&'static str> {
    ADD_SYMBOLS.iter().find(|(s, _)| *s == symbol).map(|(_, w)| *w)
}

/// One dictionary value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    Flat(String),
    /// Keyed by tag, parent tag, `"None"` or `"DEFAULT"`; values may be null
    Tagged(BTreeMap<String, Option<String>>),
}

impl Entry {
    /// The `DEFAULT` pronunciation (or the flat one).
    pub fn default_phonemes(&self) -> Option<&str> {
        match self {
            Entry::Flat(ps) => Some(ps),
            Entry::Tagged(map) => map.get("DEFAULT").and_then(|v| v.as_deref()),
        }
    }

    fn tagged(&self, tag: &str) -> Option<&str> {
        match self {
            Entry::Flat(ps) => Some(ps),
            Entry::Tagged(map) => map.get(tag).and_then(|v| v.as_deref()),
        }
    }
}

/// Map a fine-grained tag onto its coarse category.
pub fn parent_tag(tag: Option<&str>) -> Option<&str> {
    let tag = tag?;
    Some(if tag.starts_with("VB") {
        "VERB"
    } else if tag.starts_with("NN") {
        "NOUN"
    } else if tag.starts_with("ADV") || tag.starts_with("RB") || tag == "RP" {
        "ADV"
    } else if tag.starts_with("ADJ") || tag.starts_with("JJ") {
        "ADJ"
    } else {
        tag
    })
}

pub(crate) fn is_alpha(word: &str) -> bool {
    !word.is_empty() && word.chars().all(char::is_alphabetic)
}

fn is_lexicon_char(c: char) -> bool {
    c == '\'' || c == '-' || c.is_ascii_alphabetic()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Everything but the first character.
fn tail(word: &str) -> &str {
    let mut chars = word.chars();
    chars.next();
    chars.as_str()
}

/// Drop the last `n` characters.
fn drop_last(word: &str, n: usize) -> &str {
    match word.char_indices().rev().nth(n - 1) {
        Some((i, _)) => &word[..i],
        None => "",
    }
}

fn last_char(ps: &str) -> Option<char> {
    ps.chars().last()
}

/// Closed-class words and symbols resolved by rule before any lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpecialCase {
    AddSymbol(&'static str),
    Symbol(&'static str),
    Initials,
    A,
    Am,
    An,
    I,
    By,
    To,
    In,
    The,
    Versus,
    Used,
}

impl SpecialCase {
    fn classify(word: &str, tag: &str) -> Option<Self> {
        if tag == "ADD" {
            if let Some(w) = add_symbol_word(word) {
                return Some(SpecialCase::AddSymbol(w));
            }
        }
        if let Some(w) = symbol_word(word) {
            return Some(SpecialCase::Symbol(w));
        }
        if is_initials(word) {
            return Some(SpecialCase::Initials);
        }
        let case = match word {
            "a" | "A" => SpecialCase::A,
            "am" | "Am" | "AM" => SpecialCase::Am,
            "an" | "An" | "AN" => SpecialCase::An,
            "I" if tag == "PRP" => SpecialCase::I,
            "by" | "By" | "BY" if parent_tag(Some(tag)) == Some("ADV") => SpecialCase::By,
            "to" | "To" => SpecialCase::To,
            "TO" if tag == "TO" || tag == "IN" => SpecialCase::To,
            "in" | "In" => SpecialCase::In,
            "IN" if tag != "NNP" => SpecialCase::In,
            "the" | "The" => SpecialCase::The,
            "THE" if tag == "DT" => SpecialCase::The,
            "used" | "Used" | "USED" => SpecialCase::Used,
            w if tag == "IN" && is_versus(w) => SpecialCase::Versus,
            _ => return None,
        };
        Some(case)
    }
}

/// Dotted initials such as "U.S." or "e.g.": letters in groups of at most
/// two, separated by periods.
fn is_initials(word: &str) -> bool {
    word.trim_matches('.').contains('.')
        && is_alpha(&word.replace('.', ""))
        && word.split('.').map(|s| s.chars().count()).max().unwrap_or(0) < 3
}

fn is_versus(word: &str) -> bool {
    let lower = word.to_lowercase();
    lower == "vs" || lower == "vs."
}

/// Pronunciation dictionary for one English dialect.
#[derive(Debug, Clone)]
pub struct Lexicon {
    british: bool,
    /// Stress applied to Capitalised and ALL-CAPS surface forms
    cap_stresses: (f64, f64),
    golds: HashMap<String, Entry>,
    silvers: HashMap<String, Entry>,
}

impl Lexicon {
    /// Load `{us,gb}_gold.json` and `{us,gb}_silver.json` from `dir`.
    pub fn load(dir: &Path, british: bool) -> Result<Self, LexiconError> {
        let prefix = if british { "gb" } else { "us" };
        let gold_path = dir.join(format!("{}_gold.json", prefix));
        let silver_path = dir.join(format!("{}_silver.json", prefix));
        let read = |path: &Path| {
            std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
                path: path.to_path_buf(),
                source,
            })
        };
        let gold = read(&gold_path)?;
        let silver = read(&silver_path)?;
        let lexicon = Self::from_json_with_origin(
            &gold,
            &silver,
            british,
            (&gold_path.display().to_string(), &silver_path.display().to_string()),
        )?;
        log::info!(
            "Loaded {} lexicon: {} gold, {} silver entries from {}",
            if british { "GB" } else { "US" },
            lexicon.golds.len(),
            lexicon.silvers.len(),
            dir.display()
        );
        Ok(lexicon)
    }

    /// Build a lexicon from in-memory JSON documents.
    pub fn from_json(gold: &str, silver: &str, british: bool) -> Result<Self, LexiconError> {
        Self::from_json_with_origin(gold, silver, british, ("gold", "silver"))
    }

    fn from_json_with_origin(
        gold: &str,
        silver: &str,
        british: bool,
        origin: (&str, &str),
    ) -> Result<Self, LexiconError> {
        let parse = |json: &str, origin: &str| {
            serde_json::from_str::<HashMap<String, Entry>>(json).map_err(|source| {
                LexiconError::Json {
                    origin: origin.to_string(),
                    source,
                }
            })
        };
        let vocab = if british { GB_VOCAB } else { US_VOCAB };
        let dialect = if british { "GB" } else { "US" };
        let golds = parse(gold, origin.0)?;
        validate(&golds, vocab, dialect)?;
        let silvers = parse(silver, origin.1)?;
        validate(&silvers, vocab, dialect)?;
        Ok(Self {
            british,
            cap_stresses: (0.5, 2.0),
            golds: grow_dictionary(golds),
            silvers: grow_dictionary(silvers),
        })
    }

    pub fn british(&self) -> bool {
        self.british
    }

    pub fn gold_len(&self) -> usize {
        self.golds.len()
    }

    pub fn silver_len(&self) -> usize {
        self.silvers.len()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.golds.contains_key(word) || self.silvers.contains_key(word)
    }

    fn gold_default(&self, word: &str) -> Option<String> {
        self.golds.get(word)?.default_phonemes().map(str::to_string)
    }

    /// Resolve a token in context. Entry point of the resolution loop.
    ///
    /// Tries word lookup, then numeral expansion, then the lowercased form
    /// of a casing variant. The token's own stress override is applied last.
    pub fn resolve_token(&self, token: &Token, ctx: &TokenContext) -> Option<(String, Rating)> {
        let raw = token.alias.as_deref().unwrap_or(&token.text);
        let word: String = raw.replace(['\u{2018}', '\u{2019}'], "'").nfkc().collect();
        let lower = word.to_lowercase();
        let upper = word.to_uppercase();
        let stress = if word == lower {
            None
        } else if word == upper {
            Some(self.cap_stresses.1)
        } else {
            Some(self.cap_stresses.0)
        };

        if let Some((ps, rating)) = self.get_word(&word, Some(&token.tag), stress, ctx) {
            let ps = self.append_currency(ps, token.currency.as_deref());
            return Some((apply_stress(&ps, token.stress), rating));
        }
        if is_number(&word, token.is_head) {
            let (ps, rating) = self.get_number(
                &word,
                token.currency.as_deref(),
                token.is_head,
                &token.num_flags,
            )?;
            return Some((apply_stress(&ps, token.stress), rating));
        }
        if !word.chars().all(is_lexicon_char) {
            return None;
        }
        if word != lower && (word == upper || tail(&word) == tail(&lower)) {
            if let Some((ps, rating)) = self.get_word(&lower, Some(&token.tag), stress, ctx) {
                log::debug!("Resolved {:?} through its lowercase form", word);
                let ps = self.append_currency(ps, token.currency.as_deref());
                return Some((apply_stress(&ps, token.stress), rating));
            }
        }
        None
    }

    fn append_currency(&self, ps: String, currency: Option<&str>) -> String {
        let Some((major, _)) = currency.and_then(currency_units) else {
            return ps;
        };
        match self.stem_s(&format!("{}s", major), None, None, None) {
            Some((unit, _)) => format!("{} {}", ps, unit),
            None => ps,
        }
    }

    /// Resolve a word (no numerals) through special cases, dictionary
    /// lookup and morphology.
    pub fn get_word(
        &self,
        word: &str,
        tag: Option<&str>,
        stress: Option<f64>,
        ctx: &TokenContext,
    ) -> Option<(String, Rating)> {
        if let Some(resolved) = self.get_special_case(word, tag, stress, ctx) {
            return Some(resolved);
        }

        let lower = word.to_lowercase();
        let mut word = word;
        if word.chars().count() > 1
            && is_alpha(&word.replace('\'', ""))
            && word != lower
            && (tag != Some("NNP") || word.chars().count() > 7)
            && !self.contains(word)
            && (word == word.to_uppercase() || tail(word) == tail(&lower))
            && (self.contains(&lower)
                || self.stem_s(&lower, tag, stress, Some(ctx)).is_some()
                || self.stem_ed(&lower, tag, stress, Some(ctx)).is_some()
                || self.stem_ing(&lower, tag, stress, Some(ctx)).is_some())
        {
            word = &lower;
        }

        if self.is_known(word) {
            return self.lookup(word, tag, stress, Some(ctx));
        }
        if let Some(stem) = word.strip_suffix("s'") {
            let possessive = format!("{}'s", stem);
            if self.is_known(&possessive) {
                return self.lookup(&possessive, tag, stress, Some(ctx));
            }
        }
        if let Some(stem) = word.strip_suffix('\'') {
            if self.is_known(stem) {
                return self.lookup(stem, tag, stress, Some(ctx));
            }
            // plural possessive of a regular plural: "cats'"
            if let Some(found) = self.stem_s(stem, tag, stress, Some(ctx)) {
                return Some(found);
            }
        }
        if let Some(found) = self.stem_s(word, tag, stress, Some(ctx)) {
            return Some(found);
        }
        if let Some(found) = self.stem_ed(word, tag, stress, Some(ctx)) {
            return Some(found);
        }
        self.stem_ing(word, tag, Some(stress.unwrap_or(0.5)), Some(ctx))
    }

    fn get_special_case(
        &self,
        word: &str,
        tag: Option<&str>,
        stress: Option<f64>,
        ctx: &TokenContext,
    ) -> Option<(String, Rating)> {
        let tag_str = tag.unwrap_or("");
        let case = SpecialCase::classify(word, tag_str)?;
        log::debug!("Special case {:?} for {:?}", case, word);
        let gold = |ps: String| Some((ps, RATING_GOLD));
        match case {
            SpecialCase::AddSymbol(w) => self.lookup(w, None, Some(-0.5), Some(ctx)),
            SpecialCase::Symbol(w) => self.lookup(w, None, None, Some(ctx)),
            SpecialCase::Initials => self.get_nnp(word),
            SpecialCase::A => gold(if tag_str == "DT" { "ɐ".into() } else { "ˈA".into() }),
            SpecialCase::Am => {
                if tag_str.starts_with("NN") {
                    self.get_nnp(word)
                } else if ctx.future_vowel.is_none()
                    || word != "am"
                    || stress.is_some_and(|s| s > 0.0)
                {
                    self.gold_default("am").and_then(gold)
                } else {
                    gold("ɐm".into())
                }
            }
            SpecialCase::An => {
                if word == "AN" && tag_str.starts_with("NN") {
                    self.get_nnp(word)
                } else {
                    gold("ɐn".into())
                }
            }
            SpecialCase::I => gold(format!("{}I", SECONDARY_STRESS)),
            SpecialCase::By => gold("bˈI".into()),
            SpecialCase::To => match ctx.future_vowel {
                None => self.gold_default("to").and_then(gold),
                Some(false) => gold("tə".into()),
                Some(true) => gold("tʊ".into()),
            },
            SpecialCase::In => {
                let mark = if ctx.future_vowel.is_none() || tag_str != "IN" {
                    PRIMARY_STRESS.to_string()
                } else {
                    String::new()
                };
                gold(format!("{}ɪn", mark))
            }
            SpecialCase::The => gold(if ctx.future_vowel == Some(true) { "ði".into() } else { "ðə".into() }),
            SpecialCase::Versus => self.lookup("versus", None, None, Some(ctx)),
            SpecialCase::Used => {
                let entry = self.golds.get("used")?;
                let ps = if (tag_str == "VBD" || tag_str == "JJ") && ctx.future_to {
                    entry.tagged("VBD")
                } else {
                    entry.default_phonemes()
                };
                ps.map(str::to_string).and_then(gold)
            }
        }
    }

    /// Spell a word letter by letter, stressing the final letter.
    pub fn get_nnp(&self, word: &str) -> Option<(String, Rating)> {
        let mut ps = String::new();
        for c in word.chars().filter(|c| c.is_alphabetic()) {
            let letter: String = c.to_uppercase().collect();
            ps.push_str(self.golds.get(&letter)?.default_phonemes()?);
        }
        let ps = apply_stress(&ps, Some(0.0));
        let ps = match ps.rfind(SECONDARY_STRESS) {
            Some(i) => format!(
                "{}{}{}",
                &ps[..i],
                PRIMARY_STRESS,
                &ps[i + SECONDARY_STRESS.len_utf8()..]
            ),
            None => ps,
        };
        Some((ps, RATING_SILVER))
    }

    /// Whether `word` can be looked up directly.
    pub fn is_known(&self, word: &str) -> bool {
        if self.contains(word) || symbol_word(word).is_some() {
            return true;
        }
        if !is_alpha(word) || !word.chars().all(is_lexicon_char) {
            return false;
        }
        if word.chars().count() == 1 {
            return true;
        }
        let upper = word.to_uppercase();
        if word == upper && self.golds.contains_key(&word.to_lowercase()) {
            return true;
        }
        tail(word) == tail(&upper)
    }

    /// Plain dictionary lookup with tag disambiguation.
    pub fn lookup(
        &self,
        word: &str,
        tag: Option<&str>,
        stress: Option<f64>,
        ctx: Option<&TokenContext>,
    ) -> Option<(String, Rating)> {
        let mut key = word.to_string();
        let mut is_nnp = false;
        if word == word.to_uppercase() && !self.golds.contains_key(word) {
            key = word.to_lowercase();
            is_nnp = tag == Some("NNP");
        }

        let mut entry = self.golds.get(&key).map(|e| (e, RATING_GOLD));
        if entry.is_none() && !is_nnp {
            entry = self.silvers.get(&key).map(|e| (e, RATING_SILVER));
        }

        let mut rating = RATING_GOLD;
        let ps: Option<&str> = entry.and_then(|(e, r)| {
            rating = r;
            match e {
                Entry::Flat(ps) => Some(ps.as_str()),
                Entry::Tagged(map) => {
                    let key = if ctx.is_some_and(|c| c.future_vowel.is_none())
                        && map.contains_key("None")
                    {
                        Some("None")
                    } else if tag.is_some_and(|t| map.contains_key(t)) {
                        tag
                    } else {
                        parent_tag(tag)
                    };
                    match key.and_then(|k| map.get(k)) {
                        Some(v) => v.as_deref(),
                        None => e.default_phonemes(),
                    }
                }
            }
        });

        match ps {
            Some(ps) if !(is_nnp && !ps.contains(PRIMARY_STRESS)) => {
                Some((apply_stress(ps, stress), rating))
            }
            _ => {
                let spelled = self.get_nnp(&key);
                if spelled.is_none() {
                    if let Some(ps) = ps {
                        return Some((apply_stress(ps, stress), rating));
                    }
                }
                spelled
            }
        }
    }

    /// Append a plural / third-person `-s` to a phoneme stem.
    pub(crate) fn suffix_s(&self, stem: &str) -> Option<String> {
        let last = last_char(stem)?;
        Some(if "ptkfθ".contains(last) {
            format!("{}s", stem)
        } else if "szʃʒʧʤ".contains(last) {
            format!("{}{}z", stem, if self.british { 'ɪ' } else { 'ᵻ' })
        } else {
            format!("{}z", stem)
        })
    }

    pub(crate) fn stem_s(
        &self,
        word: &str,
        tag: Option<&str>,
        stress: Option<f64>,
        ctx: Option<&TokenContext>,
    ) -> Option<(String, Rating)> {
        let len = word.chars().count();
        if len < 3 || !word.ends_with('s') {
            return None;
        }
        let stem = if !word.ends_with("ss") && self.is_known(drop_last(word, 1)) {
            drop_last(word, 1).to_string()
        } else if (word.ends_with("'s")
            || (len > 4 && word.ends_with("es") && !word.ends_with("ies")))
            && self.is_known(drop_last(word, 2))
        {
            drop_last(word, 2).to_string()
        } else if len > 4
            && word.ends_with("ies")
            && self.is_known(&format!("{}y", drop_last(word, 3)))
        {
            format!("{}y", drop_last(word, 3))
        } else {
            return None;
        };
        let (ps, rating) = self.lookup(&stem, tag, stress, ctx)?;
        Some((self.suffix_s(&ps)?, rating))
    }

    /// Append a past-tense `-ed` to a phoneme stem.
    pub(crate) fn suffix_ed(&self, stem: &str) -> Option<String> {
        let last = last_char(stem)?;
        Some(if "pkfθʃsʧ".contains(last) {
            format!("{}t", stem)
        } else if last == 'd' {
            format!("{}{}d", stem, if self.british { 'ɪ' } else { 'ᵻ' })
        } else if last != 't' {
            format!("{}d", stem)
        } else if self.british || stem.chars().count() < 2 {
            format!("{}ɪd", stem)
        } else if stem.chars().rev().nth(1).is_some_and(|c| US_TAUS.contains(c)) {
            format!("{}ɾᵻd", drop_last(stem, 1))
        } else {
            format!("{}ᵻd", stem)
        })
    }

    pub(crate) fn stem_ed(
        &self,
        word: &str,
        tag: Option<&str>,
        stress: Option<f64>,
        ctx: Option<&TokenContext>,
    ) -> Option<(String, Rating)> {
        let len = word.chars().count();
        if len < 4 || !word.ends_with('d') {
            return None;
        }
        let stem = if !word.ends_with("dd") && self.is_known(drop_last(word, 1)) {
            drop_last(word, 1)
        } else if len > 4
            && word.ends_with("ed")
            && !word.ends_with("eed")
            && self.is_known(drop_last(word, 2))
        {
            drop_last(word, 2)
        } else {
            return None;
        };
        let (ps, rating) = self.lookup(stem, tag, stress, ctx)?;
        Some((self.suffix_ed(&ps)?, rating))
    }

    /// Append a progressive `-ing` to a phoneme stem.
    pub(crate) fn suffix_ing(&self, stem: &str) -> Option<String> {
        let last = last_char(stem)?;
        if self.british {
            if last == 'ə' || last == 'ː' {
                return None;
            }
        } else if last == 't' && stem.chars().rev().nth(1).is_some_and(|c| US_TAUS.contains(c)) {
            return Some(format!("{}ɾɪŋ", drop_last(stem, 1)));
        }
        Some(format!("{}ɪŋ", stem))
    }

    pub(crate) fn stem_ing(
        &self,
        word: &str,
        tag: Option<&str>,
        stress: Option<f64>,
        ctx: Option<&TokenContext>,
    ) -> Option<(String, Rating)> {
        let len = word.chars().count();
        if len < 5 || !word.ends_with("ing") {
            return None;
        }
        let base = drop_last(word, 3);
        let stem = if len > 5 && self.is_known(base) {
            base.to_string()
        } else if self.is_known(&format!("{}e", base)) {
            format!("{}e", base)
        } else if len > 5 && has_doubled_final(base) && self.is_known(drop_last(word, 4)) {
            drop_last(word, 4).to_string()
        } else {
            return None;
        };
        let (ps, rating) = self.lookup(&stem, tag, stress, ctx)?;
        Some((self.suffix_ing(&ps)?, rating))
    }
}

/// "running" → "runn": a doubled consonant before `-ing`, or a `ck`.
fn has_doubled_final(base: &str) -> bool {
    let mut rev = base.chars().rev();
    match (rev.next(), rev.next()) {
        (Some(a), Some(b)) => (a == b && "bcdgklmnprstvxz".contains(a)) || (b == 'c' && a == 'k'),
        _ => false,
    }
}

/// Add the sibling casing of every lowercase or Capitalised key.
fn grow_dictionary(dict: HashMap<String, Entry>) -> HashMap<String, Entry> {
    let mut grown = HashMap::with_capacity(dict.len() * 2);
    for (key, value) in &dict {
        if key.chars().count() < 2 {
            continue;
        }
        let lower = key.to_lowercase();
        if *key == lower {
            let cap = capitalize(key);
            if cap != *key {
                grown.insert(cap, value.clone());
            }
        } else if *key == capitalize(&lower) {
            grown.insert(lower, value.clone());
        }
    }
    grown.extend(dict);
    grown
}

fn validate(dict: &HashMap<String, Entry>, vocab: &str, dialect: &'static str) -> Result<(), LexiconError> {
    let check = |word: &str, ps: &str| -> Result<(), LexiconError> {
        match ps.chars().find(|&c| !vocab.contains(c)) {
            Some(symbol) => Err(LexiconError::InvalidSymbol {
                word: word.to_string(),
                symbol,
                dialect,
            }),
            None => Ok(()),
        }
    };
    // Sorted so the reported entry does not depend on hash order.
    let mut words: Vec<&String> = dict.keys().collect();
    words.sort_unstable();
    for word in words {
        match &dict[word] {
            Entry::Flat(ps) => check(word, ps)?,
            Entry::Tagged(map) => {
                if !map.contains_key("DEFAULT") {
                    return Err(LexiconError::MissingDefault { word: word.clone() });
                }
                for ps in map.values().flatten() {
                    check(word, ps)?;
                }
            }
        }
    }
    Ok(())
}
