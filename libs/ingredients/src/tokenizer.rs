//! First-stage tokenization of free-text ingredient lines
//!
//! A [`Tokenizer`] splits text into raw (name, comment, amount, unit) records
//! without interpreting the unit. [`RegexTokenizer`] is the default
//! implementation: one ingredient per non-empty line.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::units::lookup_unit;

/// One ingredient as found in the text, before standardization
#[derive(Debug, Clone, PartialEq)]
pub struct RawIngredient {
    /// The source line
    pub line: String,
    /// Core item name, lower-cased
    pub name: String,
    /// Secondary information ("finely chopped"), possibly empty
    pub comment: String,
    /// Leading amount, if the line had one
    pub amount: Option<f64>,
    /// Unit text as written, possibly empty
    pub unit: String,
}

/// Errors reported by a tokenizer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenizeError {
    /// The tokenizer refused the input
    #[error("tokenizer rejected input: {0}")]
    Rejected(String),
}

/// Text ingredient tokenization capability
pub trait Tokenizer: Send + Sync {
    /// Split `text` into the ingredients it contains
    fn tokenize(&self, text: &str) -> Result<Vec<RawIngredient>, TokenizeError>;
}

/// Words describing size that are moved into the comment
const SIZE_WORDS: &[&str] = &["small", "medium", "large", "extra-large", "jumbo"];

fn amount_regex() -> &'static Regex {
    static AMOUNT_REGEX: OnceLock<Regex> = OnceLock::new();
    AMOUNT_REGEX.get_or_init(|| {
        Regex::new(
            r"^(?P<amount>\d+\s+\d+/\d+|\d+/\d+|\d+(?:\.\d+)?)(?:\s*(?:-|–|to|or)\s*(?:\d+\s+\d+/\d+|\d+/\d+|\d+(?:\.\d+)?))?",
        )
        .expect("Failed to compile amount regex")
    })
}

fn parenthetical_regex() -> &'static Regex {
    static PARENTHETICAL_REGEX: OnceLock<Regex> = OnceLock::new();
    PARENTHETICAL_REGEX
        .get_or_init(|| Regex::new(r"\(([^()]*)\)").expect("Failed to compile parenthetical regex"))
}

fn vulgar_fraction(c: char) -> Option<&'static str> {
    let fraction = match c {
        '½' => "1/2",
        '⅓' => "1/3",
        '⅔' => "2/3",
        '¼' => "1/4",
        '¾' => "3/4",
        '⅕' => "1/5",
        '⅙' => "1/6",
        '⅛' => "1/8",
        '⅜' => "3/8",
        '⅝' => "5/8",
        '⅞' => "7/8",
        _ => return None,
    };
    Some(fraction)
}

/// Expand unicode fractions ("1½" -> "1 1/2") and collapse whitespace
fn normalize_line(line: &str) -> String {
    let mut expanded = String::with_capacity(line.len());
    for c in line.chars() {
        match vulgar_fraction(c) {
            Some(fraction) => {
                expanded.push(' ');
                expanded.push_str(fraction);
                expanded.push(' ');
            }
            None if c == '⁄' => expanded.push('/'),
            None => expanded.push(c),
        }
    }
    expanded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_term(term: &str) -> Option<f64> {
    match term.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator: f64 = numerator.parse().ok()?;
            let denominator: f64 = denominator.parse().ok()?;
            if denominator == 0.0 {
                None
            } else {
                Some(numerator / denominator)
            }
        }
        None => term.parse().ok(),
    }
}

/// Parse "2", "1.5", "3/4" or "1 1/2"
fn parse_amount(text: &str) -> Option<f64> {
    text.split_whitespace().map(parse_term).sum()
}

/// Regex-driven tokenizer treating each non-empty line as one ingredient
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexTokenizer;

impl RegexTokenizer {
    fn tokenize_line(&self, line: &str) -> Option<RawIngredient> {
        let trimmed = line
            .trim()
            .trim_start_matches(['•', '*', '-', '–'])
            .trim();
        // blank lines and section headers ("For the sauce:") carry no ingredient
        if trimmed.is_empty() || trimmed.ends_with(':') {
            return None;
        }

        let normalized = normalize_line(trimmed);

        let mut comments: Vec<String> = Vec::new();
        let mut parentheticals: Vec<String> = Vec::new();
        for capture in parenthetical_regex().captures_iter(&normalized) {
            let inner = capture[1].trim();
            if !inner.is_empty() {
                parentheticals.push(inner.to_string());
            }
        }
        let without_parens = parenthetical_regex().replace_all(&normalized, " ");
        let text = without_parens.split_whitespace().collect::<Vec<_>>().join(" ");

        let (amount, rest) = match amount_regex().captures(&text) {
            Some(captures) => {
                let whole = captures.get(0).map_or(0, |m| m.end());
                let amount = captures.name("amount").and_then(|m| parse_amount(m.as_str()));
                (amount, text[whole..].trim())
            }
            None => (None, text.as_str()),
        };

        let words: Vec<&str> = rest.split_whitespace().collect();
        let mut idx = 0;
        let mut unit = String::new();

        if words.len() > 2 {
            let two_words = format!("{} {}", words[0], words[1].trim_end_matches(','));
            if lookup_unit(&two_words).is_some() {
                unit = two_words;
                idx = 2;
            }
        }
        if idx == 0 && words.len() > 1 {
            let word = words[0].trim_end_matches(',');
            if lookup_unit(word).is_some() {
                unit = word.to_string();
                idx = 1;
            }
        }
        if idx > 0 && idx < words.len() - 1 && words[idx].eq_ignore_ascii_case("of") {
            idx += 1;
        }
        while idx < words.len().saturating_sub(1) {
            let word = words[idx].trim_end_matches(',').to_lowercase();
            if !SIZE_WORDS.contains(&word.as_str()) {
                break;
            }
            comments.push(word);
            idx += 1;
        }

        let remainder = words[idx.min(words.len())..].join(" ");
        let (name, after_comma) = match remainder.split_once(',') {
            Some((name, after)) => (name.trim().to_string(), after.trim().to_string()),
            None => (remainder.trim().to_string(), String::new()),
        };
        if !after_comma.is_empty() {
            comments.push(after_comma);
        }
        comments.extend(parentheticals);

        let name = name.trim_matches(|c: char| c == '.' || c == ';').trim();
        let name = if name.is_empty() {
            text.to_lowercase()
        } else {
            name.to_lowercase()
        };

        Some(RawIngredient {
            line: line.trim().to_string(),
            name,
            comment: comments.join(", "),
            amount,
            unit,
        })
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<RawIngredient>, TokenizeError> {
        Ok(text
            .lines()
            .filter_map(|line| self.tokenize_line(line))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(line: &str) -> RawIngredient {
        let mut ingredients = RegexTokenizer.tokenize(line).unwrap();
        assert_eq!(ingredients.len(), 1, "expected one ingredient in {:?}", line);
        ingredients.remove(0)
    }

    #[test]
    fn test_amount_unit_and_name() {
        let ing = single("2 cups flour");
        assert_eq!(ing.amount, Some(2.0));
        assert_eq!(ing.unit, "cups");
        assert_eq!(ing.name, "flour");
        assert_eq!(ing.comment, "");
    }

    #[test]
    fn test_mixed_number_and_comment() {
        let ing = single("1 1/2 cups brown sugar, packed");
        assert_eq!(ing.amount, Some(1.5));
        assert_eq!(ing.unit, "cups");
        assert_eq!(ing.name, "brown sugar");
        assert_eq!(ing.comment, "packed");
    }

    #[test]
    fn test_unicode_fraction() {
        let ing = single("1½ tsp Kosher Salt");
        assert_eq!(ing.amount, Some(1.5));
        assert_eq!(ing.unit, "tsp");
        assert_eq!(ing.name, "kosher salt");

        let ing = single("¾ cup milk");
        assert_eq!(ing.amount, Some(0.75));
    }

    #[test]
    fn test_count_with_size_word() {
        let ing = single("3 large eggs");
        assert_eq!(ing.amount, Some(3.0));
        assert_eq!(ing.unit, "");
        assert_eq!(ing.name, "eggs");
        assert_eq!(ing.comment, "large");
    }

    #[test]
    fn test_parenthetical_moves_to_comment() {
        let ing = single("1 (14 ounce) can diced tomatoes");
        assert_eq!(ing.amount, Some(1.0));
        assert_eq!(ing.unit, "can");
        assert_eq!(ing.name, "diced tomatoes");
        assert_eq!(ing.comment, "14 ounce");
    }

    #[test]
    fn test_range_uses_first_value() {
        let ing = single("2-3 cloves garlic, minced");
        assert_eq!(ing.amount, Some(2.0));
        assert_eq!(ing.unit, "cloves");
        assert_eq!(ing.name, "garlic");
        assert_eq!(ing.comment, "minced");
    }

    #[test]
    fn test_unit_followed_by_of() {
        let ing = single("1 pinch of salt");
        assert_eq!(ing.unit, "pinch");
        assert_eq!(ing.name, "salt");
    }

    #[test]
    fn test_two_word_unit() {
        let ing = single("8 fl. oz. heavy cream");
        assert_eq!(ing.unit, "fl. oz.");
        assert_eq!(ing.name, "heavy cream");
    }

    #[test]
    fn test_line_without_amount() {
        let ing = single("Salt and pepper to taste");
        assert_eq!(ing.amount, None);
        assert_eq!(ing.unit, "");
        assert_eq!(ing.name, "salt and pepper to taste");
    }

    #[test]
    fn test_blank_lines_and_headers_are_skipped() {
        let ingredients = RegexTokenizer
            .tokenize("For the dough:\n\n2 cups flour\n   \n1 tsp yeast")
            .unwrap();
        assert_eq!(ingredients.len(), 2);
        assert_eq!(ingredients[0].name, "flour");
        assert_eq!(ingredients[1].name, "yeast");
    }

    #[test]
    fn test_parse_amount_rejects_zero_denominator() {
        assert_eq!(parse_amount("1/0"), None);
        assert_eq!(parse_amount("2 1/4"), Some(2.25));
    }
}
