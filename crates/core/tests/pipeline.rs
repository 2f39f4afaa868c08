use std::path::Path;

use lexiphone_core::language::fallback::FallbackKind;
use lexiphone_core::language::lexicon::Lexicon;
use lexiphone_core::{G2p, G2pConfig, LexiconError, RATING_GOLD, RATING_USER};

const US_GOLD: &str = include_str!("fixtures/us_gold.json");
const US_SILVER: &str = include_str!("fixtures/us_silver.json");

fn g2p() -> G2p {
    let lexicon = Lexicon::from_json(US_GOLD, US_SILVER, false).unwrap();
    G2p::new(lexicon, None, "❓")
}

fn write_lexicon(dir: &Path, prefix: &str, gold: &str, silver: &str) {
    std::fs::write(dir.join(format!("{}_gold.json", prefix)), gold).unwrap();
    std::fs::write(dir.join(format!("{}_silver.json", prefix)), silver).unwrap();
}

#[test]
fn test_currency_sentence() {
    let result = g2p().phonemize("It costs $3.50.");
    assert_eq!(
        result.phonemes,
        "ˈɪt kˈɔsts θɹˈi dˈɑləɹz ænd fˈɪfti sˈɛnts. "
    );

    let texts: Vec<&str> = result.tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["It", "costs", "$", "3.50", "."]);
    // the currency sign is read as part of the amount
    assert_eq!(result.tokens[2].phonemes.as_deref(), Some(""));
    assert_eq!(result.tokens[3].rating, Some(RATING_GOLD));
    assert_eq!(result.tokens[4].phonemes.as_deref(), Some("."));
}

#[test]
fn test_the_before_vowel_and_consonant() {
    let g2p = g2p();
    assert_eq!(g2p.phonemize("the apple").phonemes, "ði ˈæpᵊl ");
    assert_eq!(g2p.phonemize("the cat").phonemes, "ðə kˈæt ");
}

#[test]
fn test_acronym_in_sentence() {
    let result = g2p().phonemize("call the FBI.");
    assert_eq!(result.phonemes, "kˈɔl ði ˌɛfbˌiˈI. ");
}

#[test]
fn test_phoneme_annotation() {
    let result = g2p().phonemize("[read](/ɹˈɛd/) it");
    assert_eq!(result.phonemes, "ɹˈɛd ˈɪt ");
    assert_eq!(result.tokens[0].rating, Some(RATING_USER));
}

#[test]
fn test_phrase_annotation() {
    let result = g2p().phonemize("[New York](/nˈu jˈɔɹk/) is big");
    assert_eq!(result.phonemes, "nˈu jˈɔɹk ˈɪz bˈɪɡ ");
    assert_eq!(result.tokens[0].text, "New York");
}

#[test]
fn test_number_flag_annotation() {
    let g2p = g2p();
    assert_eq!(g2p.phonemize("204").phonemes, "tˈu hˈʌndɹəd fˈɔɹ ");
    assert_eq!(g2p.phonemize("[204](#&#)").phonemes, "tˈu hˈʌndɹəd ænd fˈɔɹ ");
}

#[test]
fn test_phone_number_reads_digits() {
    let result = g2p().phonemize("555-0800");
    let tail = result.tokens.iter().find(|t| t.text == "0800").unwrap();
    let bare: String = tail
        .phonemes
        .as_deref()
        .unwrap()
        .chars()
        .filter(|c| !"ˈˌ".contains(*c))
        .collect();
    assert_eq!(bare, "ziɹO At ziɹO ziɹO");
}

#[test]
fn test_compound_and_hyphenated() {
    let g2p = g2p();
    assert_eq!(g2p.phonemize("well-known").phonemes, "wˌɛlnˈOn ");
}

#[test]
fn test_unknown_words_get_placeholder() {
    let result = g2p().phonemize("hello zzyzx world");
    assert_eq!(result.phonemes, "həlˈO ❓ wˈɜɹld ");
    assert_eq!(result.tokens[1].rating, None);
}

#[test]
fn test_tokens_serialize() {
    let result = g2p().phonemize("hello");
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["tokens"][0]["phonemes"], "həlˈO");
    assert_eq!(json["tokens"][0]["rating"], 4);
}

#[test]
fn test_from_config_loads_lexicon_dir() {
    let dir = tempfile::tempdir().unwrap();
    write_lexicon(dir.path(), "us", US_GOLD, US_SILVER);
    let config = G2pConfig {
        lexicon_dir: Some(dir.path().to_path_buf()),
        fallback: FallbackKind::None,
        ..Default::default()
    };
    let g2p = G2p::from_config(&config).unwrap();
    assert!(g2p.fallback_name().is_none());
    assert_eq!(g2p.phonemize("hello world").phonemes, "həlˈO wˈɜɹld ");
}

#[test]
fn test_british_lexicon() {
    let dir = tempfile::tempdir().unwrap();
    write_lexicon(dir.path(), "gb", r#"{"hello": "həlˈQ", "car": "kˈɑː"}"#, "{}");
    let config = G2pConfig {
        british: true,
        lexicon_dir: Some(dir.path().to_path_buf()),
        fallback: FallbackKind::None,
        ..Default::default()
    };
    let g2p = G2p::from_config(&config).unwrap();
    assert!(g2p.lexicon().british());
    assert_eq!(g2p.phonemize("hello car").phonemes, "həlˈQ kˈɑː ");
}

#[test]
fn test_invalid_lexicon_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    write_lexicon(dir.path(), "us", r#"{"car": "kˈɑː"}"#, "{}");
    let config = G2pConfig {
        lexicon_dir: Some(dir.path().to_path_buf()),
        fallback: FallbackKind::None,
        ..Default::default()
    };
    let err = G2p::from_config(&config).err().unwrap();
    let lexicon_err = err.downcast_ref::<LexiconError>().unwrap();
    assert!(matches!(lexicon_err, LexiconError::InvalidSymbol { symbol: 'ː', .. }));
}

#[test]
fn test_missing_lexicon_dir() {
    let config = G2pConfig {
        lexicon_dir: Some("/definitely/not/here".into()),
        fallback: FallbackKind::None,
        ..Default::default()
    };
    let err = G2p::from_config(&config).err().unwrap();
    assert!(format!("{:#}", err).contains("Failed to load lexicon"));
}
