//! Fallback phonemizer interface and backends.
//!
//! Used for words the lexicon cannot resolve:
//! - EspeakFallback: espeak-ng subprocess, IPA mapped into the lexicon alphabet
//!
//! Backends are picked by [`get_fallback`].

#[cfg(feature = "espeak")]
use std::io::Write;
use std::process::Command;
#[cfg(feature = "espeak")]
use std::process::Stdio;

#[cfg(feature = "espeak")]
use anyhow::Context;
use anyhow::{bail, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::{Rating, Token};
#[cfg(feature = "espeak")]
use crate::types::RATING_FALLBACK;

#[cfg(feature = "espeak")]
use super::punctuation::Punctuation;

/// Fallback backend trait.
pub trait Fallback: Send + Sync {
    /// Backend name for logging/display.
    fn name(&self) -> &str;

    /// Phonemize one token. `None` signals failure.
    fn phonemize(&self, token: &Token) -> Option<(String, Rating)>;
}

/// Which fallback to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackKind {
    /// Leave unknown words as the placeholder glyph
    None,
    Espeak,
    /// espeak-ng when installed, otherwise none
    #[default]
    Auto,
}

impl std::str::FromStr for FallbackKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(FallbackKind::None),
            "espeak" => Ok(FallbackKind::Espeak),
            "auto" => Ok(FallbackKind::Auto),
            _ => bail!("Unknown fallback: '{}'. Available: none, espeak, auto", s),
        }
    }
}

/// espeak IPA → lexicon symbols, longest patterns first.
const E2M: [(&str, &str); 21] = [
    ("ʔˌn\u{329}", "tᵊn"),
    ("ʔn\u{329}", "tᵊn"),
    ("a^ɪ", "I"),
    ("a^ʊ", "W"),
    ("d^ʒ", "ʤ"),
    ("e^ɪ", "A"),
    ("t^ʃ", "ʧ"),
    ("ɔ^ɪ", "Y"),
    ("ə^l", "ᵊl"),
    ("ʔn", "tᵊn"),
    ("ʲO", "jO"),
    ("ʲQ", "jQ"),
    ("e", "A"),
    ("r", "ɹ"),
    ("x", "k"),
    ("ç", "k"),
    ("ɐ", "ə"),
    ("ɚ", "əɹ"),
    ("ɬ", "l"),
    ("ʔ", "t"),
    ("ʲ", ""),
];

lazy_static! {
    /// A syllabic consonant: the diacritic becomes a schwa before it.
    static ref SYLLABIC_REGEX: Regex = Regex::new("(\\S)\u{329}").unwrap();
}

/// Map espeak-ng IPA (with `^` ties) into the lexicon alphabet.
pub fn espeak_to_lexicon(ps: &str, british: bool) -> String {
    // Dialect diphthongs go first so the bare `e` rule cannot split them.
    let mut ps = if british {
        ps.replace("e^ə", "ɛː").replace("ə^ʊ", "Q")
    } else {
        ps.replace("o^ʊ", "O")
    };
    for (from, to) in E2M {
        ps = ps.replace(from, to);
    }
    let mut ps = SYLLABIC_REGEX
        .replace_all(&ps, "ᵊ$1")
        .replace('\u{329}', "");
    if british {
        ps = ps.replace("iə", "ɪə");
    } else {
        ps = ps
            .replace("ɜːɹ", "ɜɹ")
            .replace("ɜː", "ɜɹ")
            .replace("ɪə", "iə")
            .replace('ː', "");
    }
    ps.replace('o', "ɔ").replace('^', "")
}

/// espeak-ng subprocess backend.
#[cfg(feature = "espeak")]
pub struct EspeakFallback {
    pub british: bool,
    pub binary: String,
    punctuation: Punctuation,
}

#[cfg(feature = "espeak")]
impl EspeakFallback {
    pub fn new(british: bool, binary: &str) -> Self {
        Self {
            british,
            binary: binary.to_string(),
            punctuation: Punctuation::default(),
        }
    }

    fn voice(&self) -> &'static str {
        if self.british {
            "en-gb"
        } else {
            "en-us"
        }
    }

    /// Run espeak-ng on one punctuation-free chunk.
    fn run(&self, text: &str) -> Result<String> {
        let mut child = Command::new(&self.binary)
            .args(["-q", "--ipa", "--tie=^", "-v", self.voice(), "--stdin"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start {}", self.binary))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .context("Failed to write to espeak-ng")?;
        }
        let output = child
            .wait_with_output()
            .context("Failed to read espeak-ng output")?;
        if !output.status.success() {
            bail!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        let ipa = String::from_utf8_lossy(&output.stdout);
        Ok(ipa.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    fn phonemize_text(&self, text: &str) -> Result<String> {
        let (chunks, marks) = self.punctuation.preserve(&[text]);
        let phonemized = chunks
            .iter()
            .map(|chunk| self.run(chunk))
            .collect::<Result<Vec<_>>>()?;
        let restored = Punctuation::restore(phonemized, marks, " ", true);
        Ok(restored.concat())
    }
}

#[cfg(feature = "espeak")]
impl Fallback for EspeakFallback {
    fn name(&self) -> &str {
        "espeak"
    }

    fn phonemize(&self, token: &Token) -> Option<(String, Rating)> {
        let text = token.alias.as_deref().unwrap_or(&token.text);
        match self.phonemize_text(text) {
            Ok(ipa) if !ipa.trim().is_empty() => {
                Some((espeak_to_lexicon(&ipa, self.british), RATING_FALLBACK))
            }
            Ok(_) => None,
            Err(e) => {
                log::warn!("espeak fallback failed for {:?}: {:#}", text, e);
                None
            }
        }
    }
}

/// Check if espeak-ng is available on the system.
pub fn espeak_available(binary: &str) -> bool {
    Command::new(binary)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Get a fallback backend by kind.
///
/// Modes:
/// - `none`: no fallback.
/// - `espeak`: espeak-ng; fails if the binary is missing or the
///   `espeak` feature is disabled.
/// - `auto`: espeak-ng when available, otherwise none.
pub fn get_fallback(kind: FallbackKind, british: bool, binary: &str) -> Result<Option<Box<dyn Fallback>>> {
    match kind {
        FallbackKind::None => Ok(None),
        FallbackKind::Espeak => {
            if !espeak_available(binary) {
                bail!("espeak fallback requested but '{}' was not found", binary);
            }
            espeak_backend(british, binary)
        }
        FallbackKind::Auto => {
            if espeak_available(binary) {
                log::info!("Auto-detected {}, using espeak fallback", binary);
                espeak_backend(british, binary).or_else(|e| {
                    log::info!("{:#}, unknown words stay unresolved", e);
                    Ok(None)
                })
            } else {
                log::info!("espeak-ng not available, unknown words stay unresolved");
                Ok(None)
            }
        }
    }
}

#[cfg(feature = "espeak")]
fn espeak_backend(british: bool, binary: &str) -> Result<Option<Box<dyn Fallback>>> {
    Ok(Some(Box::new(EspeakFallback::new(british, binary))))
}

#[cfg(not(feature = "espeak"))]
fn espeak_backend(_british: bool, _binary: &str) -> Result<Option<Box<dyn Fallback>>> {
    bail!("espeak fallback requires the 'espeak' feature")
}
