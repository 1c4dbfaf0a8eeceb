//! Ingredient line parsing
//!
//! The second stage after tokenization: standardizes each raw measure and
//! assembles the final [`ParsedIngredient`].

use thiserror::Error;
use tracing::debug;

use crate::measure::Measure;
use crate::tokenizer::{RawIngredient, RegexTokenizer, TokenizeError, Tokenizer};

/// An ingredient ready to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedIngredient {
    /// Original source line
    pub line: String,
    /// Core item name
    pub name: String,
    /// Secondary, non-grouping information about the item
    pub description: Option<String>,
    pub measure: Measure,
}

/// Hard parse failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A single-line parse found zero or several ingredients
    #[error("incorrect number of ingredients in line \"{line}\": {count}")]
    CountMismatch { line: String, count: usize },

    /// The tokenizer itself failed
    #[error(transparent)]
    Tokenizer(#[from] TokenizeError),
}

/// Parses free-text ingredient lines into [`ParsedIngredient`]s
pub struct IngredientParser {
    tokenizer: Box<dyn Tokenizer>,
}

impl Default for IngredientParser {
    fn default() -> Self {
        IngredientParser::new(RegexTokenizer)
    }
}

impl std::fmt::Debug for IngredientParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngredientParser").finish_non_exhaustive()
    }
}

impl IngredientParser {
    /// Create a parser on top of the given tokenizer
    pub fn new(tokenizer: impl Tokenizer + 'static) -> Self {
        IngredientParser {
            tokenizer: Box::new(tokenizer),
        }
    }

    /// Parse a line that must contain exactly one ingredient
    pub fn parse_line(&self, line: &str) -> Result<ParsedIngredient, ParseError> {
        let mut raw = self.tokenizer.tokenize(line)?;

        if raw.len() != 1 {
            return Err(ParseError::CountMismatch {
                line: line.to_string(),
                count: raw.len(),
            });
        }

        Ok(convert(raw.remove(0)))
    }

    /// Parse any number of lines; blank lines contribute nothing
    pub fn parse_lines(&self, lines: &[String]) -> Result<Vec<ParsedIngredient>, ParseError> {
        let raw = self.tokenizer.tokenize(&lines.join("\n"))?;
        debug!("Parsed {} ingredients from {} lines", raw.len(), lines.len());
        Ok(raw.into_iter().map(convert).collect())
    }
}

fn convert(raw: RawIngredient) -> ParsedIngredient {
    let measure = match raw.amount {
        Some(amount) => Measure::new(amount, raw.unit),
        None => Measure::unmeasured(raw.unit),
    };

    ParsedIngredient {
        line: raw.line,
        name: raw.name,
        description: Some(raw.comment).filter(|c| !c.is_empty()),
        measure,
    }
}
