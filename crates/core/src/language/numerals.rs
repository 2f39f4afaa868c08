//! English number spelling: cardinals, ordinals, years and decimals.
//!
//! Phrasing follows British convention ("two hundred and four",
//! "one thousand, two hundred and thirty-four"). Callers that do not
//! want the joining "and" drop it after splitting on non-letters.

const ONES: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const SCALES: [(u64, &str); 6] = [
    (1_000_000_000_000_000_000, "quintillion"),
    (1_000_000_000_000_000, "quadrillion"),
    (1_000_000_000_000, "trillion"),
    (1_000_000_000, "billion"),
    (1_000_000, "million"),
    (1_000, "thousand"),
];

/// Spell a whole number.
pub fn cardinal(n: i64) -> String {
    if n < 0 {
        return format!("minus {}", cardinal_unsigned(n.unsigned_abs()));
    }
    cardinal_unsigned(n as u64)
}

fn cardinal_unsigned(n: u64) -> String {
    if n < 20 {
        return ONES[n as usize].to_string();
    }
    if n < 100 {
        let tens = TENS[(n / 10) as usize];
        return match n % 10 {
            0 => tens.to_string(),
            ones => format!("{}-{}", tens, ONES[ones as usize]),
        };
    }
    if n < 1000 {
        let head = format!("{} hundred", ONES[(n / 100) as usize]);
        return match n % 100 {
            0 => head,
            rem => format!("{} and {}", head, cardinal_unsigned(rem)),
        };
    }

    for &(scale, name) in &SCALES {
        if n >= scale {
            let head = format!("{} {}", cardinal_unsigned(n / scale), name);
            let rem = n % scale;
            return if rem == 0 {
                head
            } else if rem < 100 {
                format!("{} and {}", head, cardinal_unsigned(rem))
            } else {
                format!("{}, {}", head, cardinal_unsigned(rem))
            };
        }
    }
    unreachable!("n >= 1000 always matches a scale")
}

/// Spell an ordinal ("twenty-first").
pub fn ordinal(n: i64) -> String {
    let words = cardinal(n);
    let (head, last) = match words.rfind([' ', '-']) {
        Some(i) => (&words[..=i], &words[i + 1..]),
        None => ("", words.as_str()),
    };
    let last = match last {
        "one" => "first".to_string(),
        "two" => "second".to_string(),
        "three" => "third".to_string(),
        "five" => "fifth".to_string(),
        "eight" => "eighth".to_string(),
        "nine" => "ninth".to_string(),
        "twelve" => "twelfth".to_string(),
        w if w.ends_with('y') => format!("{}ieth", &w[..w.len() - 1]),
        w => format!("{}th", w),
    };
    format!("{}{}", head, last)
}

/// Spell a number the way years are read ("nineteen oh-five").
///
/// Years like 2000-2009, those below 100 and those above 9999 read as
/// plain cardinals.
pub fn year(n: i64) -> String {
    if n < 0 {
        return format!("{} BC", year(-n));
    }
    let (high, low) = (n / 100, n % 100);
    if high == 0 || (high % 10 == 0 && low < 10) || high >= 100 {
        return cardinal(n);
    }
    let low_text = match low {
        0 => "hundred".to_string(),
        1..=9 => format!("oh-{}", cardinal(low)),
        _ => cardinal(low),
    };
    format!("{} {}", cardinal(high), low_text)
}

/// Spell a decimal string such as `"3.14"`.
///
/// Trailing fractional zeros are dropped, as a float would; a fraction
/// of only zeros still reads "point zero". Returns `None` when the text
/// is not a plain `digits.digits` number.
pub fn decimal(text: &str) -> Option<String> {
    let (int_part, frac_part) = text.split_once('.')?;
    if !frac_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let whole: i64 = if int_part.is_empty() { 0 } else { int_part.parse().ok()? };
    let frac = frac_part.trim_end_matches('0');
    let frac = if frac.is_empty() { "0" } else { frac };
    let digits: Vec<&str> = frac
        .bytes()
        .map(|b| ONES[(b - b'0') as usize])
        .collect();
    Some(format!("{} point {}", cardinal(whole), digits.join(" ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinal_small() {
        assert_eq!(cardinal(0), "zero");
        assert_eq!(cardinal(7), "seven");
        assert_eq!(cardinal(19), "nineteen");
        assert_eq!(cardinal(40), "forty");
        assert_eq!(cardinal(42), "forty-two");
    }

    #[test]
    fn test_cardinal_hundreds() {
        assert_eq!(cardinal(100), "one hundred");
        assert_eq!(cardinal(204), "two hundred and four");
        assert_eq!(cardinal(999), "nine hundred and ninety-nine");
    }

    #[test]
    fn test_cardinal_large() {
        assert_eq!(cardinal(1005), "one thousand and five");
        assert_eq!(cardinal(1234), "one thousand, two hundred and thirty-four");
        assert_eq!(cardinal(2_000_000), "two million");
        assert_eq!(cardinal(1_001_000), "one million, one thousand");
        assert_eq!(cardinal(-3), "minus three");
    }

    #[test]
    fn test_ordinal() {
        assert_eq!(ordinal(1), "first");
        assert_eq!(ordinal(3), "third");
        assert_eq!(ordinal(12), "twelfth");
        assert_eq!(ordinal(20), "twentieth");
        assert_eq!(ordinal(21), "twenty-first");
        assert_eq!(ordinal(104), "one hundred and fourth");
    }

    #[test]
    fn test_year() {
        assert_eq!(year(1990), "nineteen ninety");
        assert_eq!(year(1905), "nineteen oh-five");
        assert_eq!(year(1900), "nineteen hundred");
        assert_eq!(year(2000), "two thousand");
        assert_eq!(year(2008), "two thousand and eight");
        assert_eq!(year(2024), "twenty twenty-four");
    }

    #[test]
    fn test_decimal() {
        assert_eq!(decimal("3.14").as_deref(), Some("three point one four"));
        assert_eq!(decimal("3.50").as_deref(), Some("three point five"));
        assert_eq!(decimal("2.0").as_deref(), Some("two point zero"));
        assert_eq!(decimal("12"), None);
        assert_eq!(decimal("1.2.3"), None);
    }
}
