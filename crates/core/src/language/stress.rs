//! Stress weighting and stress-mark rewriting for phoneme strings.
//!
//! Phoneme strings carry ASCII-free IPA-like symbols plus two stress
//! diacritics: primary `ˈ` and secondary `ˌ`, each sitting immediately
//! before the vowel it stresses.

pub const PRIMARY_STRESS: char = 'ˈ';
pub const SECONDARY_STRESS: char = 'ˌ';

/// Vowel nuclei, including the single-glyph diphthongs `A I O Q W Y`.
pub const VOWELS: &str = "AIOQWYaiuæɑɒɔəɛɜɪʊʌᵻ";

/// Symbols counted as "heavy" by [`stress_weight`].
pub const DIPHTHONGS: &str = "AIOQWYʤʧ";

pub const CONSONANTS: &str = "bdfhjklmnpstvwzðŋɡɹɾʃʒʤʧθ";

pub fn is_vowel(c: char) -> bool {
    VOWELS.contains(c)
}

pub fn is_consonant(c: char) -> bool {
    CONSONANTS.contains(c)
}

fn is_stress(c: char) -> bool {
    c == PRIMARY_STRESS || c == SECONDARY_STRESS
}

/// Syllable heaviness proxy: 2 per diphthong symbol, 1 per anything else.
pub fn stress_weight(ps: &str) -> usize {
    ps.chars()
        .map(|c| if DIPHTHONGS.contains(c) { 2 } else { 1 })
        .sum()
}

/// Move every stress mark so it sits right before the next vowel.
///
/// Implemented as a stable sort where a mark at position `i` is keyed
/// half a slot before the first vowel at or after `i`. Marks with no
/// following vowel stay where they are.
fn restress(ps: &str) -> String {
    let chars: Vec<char> = ps.chars().collect();
    // Keys are doubled so the "minus a half" offset stays integral.
    let mut keyed: Vec<(usize, char)> = chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            if is_stress(c) {
                match chars[i..].iter().position(|&v| is_vowel(v)) {
                    Some(offset) => (2 * (i + offset) - 1, c),
                    None => (2 * i, c),
                }
            } else {
                (2 * i, c)
            }
        })
        .collect();
    keyed.sort_by_key(|&(key, _)| key);
    keyed.into_iter().map(|(_, c)| c).collect()
}

/// Rewrite the stress marks of `ps` according to a stress directive.
///
/// - `< -1`: strip all marks
/// - `-1`, or `0`/`-0.5` when a primary mark exists: demote primary to
///   secondary, dropping existing secondaries
/// - `0`, `0.5`, `1` on an unmarked string: add a secondary mark
/// - `>= 1` with only a secondary mark: promote it to primary
/// - `> 1` on an unmarked string: add a primary mark
///
/// Strings without any vowel are never given a new mark.
pub fn apply_stress(ps: &str, stress: Option<f64>) -> String {
    let Some(stress) = stress else {
        return ps.to_string();
    };
    let has_primary = ps.contains(PRIMARY_STRESS);
    let has_secondary = ps.contains(SECONDARY_STRESS);
    let unmarked = !has_primary && !has_secondary;
    let has_vowel = ps.chars().any(is_vowel);

    if stress < -1.0 {
        ps.chars().filter(|&c| !is_stress(c)).collect()
    } else if stress == -1.0 || ((stress == 0.0 || stress == -0.5) && has_primary) {
        ps.chars()
            .filter(|&c| c != SECONDARY_STRESS)
            .map(|c| if c == PRIMARY_STRESS { SECONDARY_STRESS } else { c })
            .collect()
    } else if (stress == 0.0 || stress == 0.5 || stress == 1.0) && unmarked {
        if !has_vowel {
            return ps.to_string();
        }
        restress(&format!("{SECONDARY_STRESS}{ps}"))
    } else if stress >= 1.0 && !has_primary && has_secondary {
        ps.replace(SECONDARY_STRESS, &PRIMARY_STRESS.to_string())
    } else if stress > 1.0 && unmarked {
        if !has_vowel {
            return ps.to_string();
        }
        restress(&format!("{PRIMARY_STRESS}{ps}"))
    } else {
        ps.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stress_weight() {
        assert_eq!(stress_weight(""), 0);
        assert_eq!(stress_weight("AIO"), 6);
        assert_eq!(stress_weight("bcd"), 3);
        assert_eq!(stress_weight("bˈAs"), 5);
    }

    #[test]
    fn test_none_is_identity() {
        assert_eq!(apply_stress("kˈæt", None), "kˈæt");
    }

    #[test]
    fn test_strip_all_marks() {
        assert_eq!(apply_stress("ˌɛfbˌiˈI", Some(-2.0)), "ɛfbiI");
    }

    #[test]
    fn test_demote_primary() {
        assert_eq!(apply_stress("hˌɛlˈO", Some(-1.0)), "hɛlˌO");
        assert_eq!(apply_stress("bˈɔl", Some(-0.5)), "bˌɔl");
        assert_eq!(apply_stress("bˈɔl", Some(0.0)), "bˌɔl");
    }

    #[test]
    fn test_insert_secondary_before_first_vowel() {
        assert_eq!(apply_stress("kæt", Some(0.0)), "kˌæt");
        assert_eq!(apply_stress("stɹɪŋ", Some(0.5)), "stɹˌɪŋ");
    }

    #[test]
    fn test_insert_is_idempotent() {
        let once = apply_stress("kæt", Some(0.0));
        let twice = apply_stress(&once, Some(0.0));
        assert_eq!(once, twice);
        assert_eq!(twice.matches(SECONDARY_STRESS).count(), 1);

        let once = apply_stress("kæt", Some(2.0));
        assert_eq!(once, "kˈæt");
        assert_eq!(apply_stress(&once, Some(2.0)), "kˈæt");
    }

    #[test]
    fn test_no_vowel_is_noop() {
        assert_eq!(apply_stress("st", Some(0.0)), "st");
        assert_eq!(apply_stress("st", Some(2.0)), "st");
    }

    #[test]
    fn test_promote_secondary() {
        assert_eq!(apply_stress("kˌæt", Some(1.0)), "kˈæt");
        assert_eq!(apply_stress("kˌæt", Some(2.0)), "kˈæt");
    }

    #[test]
    fn test_primary_left_alone_by_positive_stress() {
        assert_eq!(apply_stress("ˈɪt", Some(0.5)), "ˈɪt");
        assert_eq!(apply_stress("nˈæsə", Some(2.0)), "nˈæsə");
    }

    #[test]
    fn test_restress_moves_mark_to_vowel() {
        assert_eq!(restress("ˈstɹIk"), "stɹˈIk");
        assert_eq!(restress("ˌA"), "ˌA");
    }
}
