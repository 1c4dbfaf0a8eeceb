//! Ingredient parsing and unit standardization
//!
//! Turns free-text ingredient lines ("1 1/2 cups brown sugar, packed") into
//! structured records whose quantities have been converted into one of a few
//! standard measurement classes, so that the same item coming from different
//! recipes can be summed.
//!
//! ```rust
//! use ingredients::{IngredientParser, StandardUnit};
//!
//! let parser = IngredientParser::default();
//! let parsed = parser.parse_line("2 tbsp olive oil").unwrap();
//! assert_eq!(parsed.name, "olive oil");
//! assert_eq!(parsed.measure.standard.unit(), StandardUnit::FluidOunce);
//! ```

pub mod measure;
pub mod parser;
pub mod tokenizer;
pub mod units;

pub use measure::{Measure, StandardMeasure};
pub use parser::{IngredientParser, ParseError, ParsedIngredient};
pub use tokenizer::{RawIngredient, RegexTokenizer, TokenizeError, Tokenizer};
pub use units::{StandardUnit, lookup_unit, standardize};
