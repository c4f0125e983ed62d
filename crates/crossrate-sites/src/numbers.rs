//! Score/count parsing from page text and locale-aware count formatting.

use regex::Regex;
use std::sync::LazyLock;

static COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d[\d.,'\s]*)\s*([km])?(?:\b|\+|$)").expect("count pattern")
});

static SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)?").expect("score pattern"));

/// Parse a rating count such as `77 Reviews`, `250,000+ Ratings`,
/// `2.8M` or `1 234 567` (any grouping separator, including NBSP).
pub fn parse_count(text: &str) -> Option<u64> {
    let caps = COUNT.captures(text)?;
    let digits = caps.get(1)?.as_str().trim();

    match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(suffix) => {
            let multiplier = if suffix == "k" { 1_000.0 } else { 1_000_000.0 };
            let value: f64 = digits.replace(',', ".").replace(char::is_whitespace, "").parse().ok()?;
            Some((value * multiplier).round() as u64)
        }
        None => {
            let plain: String = digits.chars().filter(char::is_ascii_digit).collect();
            plain.parse().ok()
        }
    }
}

/// Parse the first decimal number in `text`, accepting `,` as the decimal
/// mark (`9,3/10` is 9.3).
pub fn parse_score(text: &str) -> Option<f64> {
    SCORE
        .find(text)
        .and_then(|m| m.as_str().replace(',', ".").parse().ok())
}

/// How numbers are shown to the viewer of an injected page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLocale {
    tag: String,
    group_separator: char,
    decimal_separator: char,
}

impl Default for DisplayLocale {
    fn default() -> Self {
        Self {
            tag: "en-US".to_string(),
            group_separator: ',',
            decimal_separator: '.',
        }
    }
}

impl DisplayLocale {
    /// Accepts BCP-47 tags (`de-DE`) and POSIX locale names (`de_DE.UTF-8`).
    pub fn parse(tag: &str) -> Option<Self> {
        let base = tag.split(['.', '@']).next().unwrap_or_default().trim();
        if base.eq_ignore_ascii_case("C") || base.eq_ignore_ascii_case("POSIX") {
            return Some(Self::default());
        }

        let mut parts = base.split(['-', '_']);
        let language = parts.next()?.to_ascii_lowercase();
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        let region = parts
            .next()
            .filter(|r| r.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|r| r.to_ascii_uppercase());

        let (group_separator, decimal_separator) = separators(&language, region.as_deref());
        let tag = match region {
            Some(region) => format!("{}-{}", language, region),
            None => language,
        };

        Some(Self {
            tag,
            group_separator,
            decimal_separator,
        })
    }

    /// Configured locale first, then `LC_ALL`, `LC_NUMERIC`, `LANG`.
    pub fn detect(configured: Option<&str>) -> Self {
        let env_tags = ["LC_ALL", "LC_NUMERIC", "LANG"]
            .into_iter()
            .filter_map(|var| std::env::var(var).ok());

        configured
            .map(str::to_string)
            .into_iter()
            .chain(env_tags)
            .filter(|tag| !tag.trim().is_empty())
            .find_map(|tag| Self::parse(&tag))
            .unwrap_or_default()
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn group_separator(&self) -> char {
        self.group_separator
    }

    pub fn format_count(&self, count: u64) -> String {
        let digits = count.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(self.group_separator);
            }
            out.push(c);
        }
        out
    }

    /// Fixed number of decimals, using the locale's decimal mark
    pub fn format_score(&self, score: f64, decimals: usize) -> String {
        let formatted = format!("{:.*}", decimals, score);
        if self.decimal_separator == '.' {
            formatted
        } else {
            formatted.replace('.', &self.decimal_separator.to_string())
        }
    }
}

fn separators(language: &str, region: Option<&str>) -> (char, char) {
    match (language, region) {
        ("de" | "it" | "fr", Some("CH")) | ("rm", _) => ('\u{2019}', '.'),
        ("fr", _) => ('\u{202f}', ','),
        ("de" | "nl" | "it" | "es" | "pt" | "da" | "id" | "tr" | "el" | "ro" | "hr" | "sl" | "sr", _) => ('.', ','),
        ("sv" | "nb" | "nn" | "no" | "fi" | "cs" | "sk" | "pl" | "ru" | "uk" | "hu" | "bg" | "lt" | "lv" | "et", _) => {
            ('\u{a0}', ',')
        }
        _ => (',', '.'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count_variants() {
        assert_eq!(parse_count("77 Reviews"), Some(77));
        assert_eq!(parse_count("250,000+ Ratings"), Some(250_000));
        assert_eq!(parse_count("2,912,345"), Some(2_912_345));
        assert_eq!(parse_count("1.234.567"), Some(1_234_567));
        assert_eq!(parse_count("1\u{a0}234\u{a0}567"), Some(1_234_567));
        assert_eq!(parse_count("2.8M"), Some(2_800_000));
        assert_eq!(parse_count("12K"), Some(12_000));
        assert_eq!(parse_count("Fewer than 50 Ratings"), Some(50));
        assert_eq!(parse_count("77 Movies"), Some(77));
        assert_eq!(parse_count("no reviews"), None);
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("91%"), Some(91.0));
        assert_eq!(parse_score("9.3/10"), Some(9.3));
        assert_eq!(parse_score("9,3"), Some(9.3));
        assert_eq!(parse_score("tbd"), None);
    }

    #[test]
    fn test_locale_parse() {
        assert_eq!(DisplayLocale::parse("de_DE.UTF-8").unwrap().tag(), "de-DE");
        assert_eq!(DisplayLocale::parse("en").unwrap().group_separator(), ',');
        assert_eq!(DisplayLocale::parse("C").unwrap(), DisplayLocale::default());
        assert!(DisplayLocale::parse("").is_none());
        assert!(DisplayLocale::parse("12-34").is_none());
    }

    #[test]
    fn test_format_count_grouping() {
        let en = DisplayLocale::parse("en-US").unwrap();
        let de = DisplayLocale::parse("de-DE").unwrap();
        let fr = DisplayLocale::parse("fr-FR").unwrap();
        let sv = DisplayLocale::parse("sv-SE").unwrap();

        assert_eq!(en.format_count(0), "0");
        assert_eq!(en.format_count(999), "999");
        assert_eq!(en.format_count(1000), "1,000");
        assert_eq!(en.format_count(2_912_345), "2,912,345");
        assert_eq!(de.format_count(250_000), "250.000");
        assert_eq!(fr.format_count(1_234_567), "1\u{202f}234\u{202f}567");
        assert_eq!(sv.format_count(77_000), "77\u{a0}000");
    }

    #[test]
    fn test_format_score_decimal_mark() {
        assert_eq!(DisplayLocale::default().format_score(9.3, 1), "9.3");
        assert_eq!(DisplayLocale::parse("de").unwrap().format_score(9.3, 1), "9,3");
        assert_eq!(DisplayLocale::parse("de-CH").unwrap().format_score(9.25, 2), "9.25");
    }

    #[test]
    fn test_detect_prefers_configured() {
        assert_eq!(DisplayLocale::detect(Some("nl-NL")).tag(), "nl-NL");
    }
}
