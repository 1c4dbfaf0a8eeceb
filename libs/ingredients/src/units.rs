//! Standardized measurement classes and unit conversion
//!
//! Free-text unit strings scraped from recipes are mapped onto a small closed
//! set of [`StandardUnit`] classes so that quantities from different recipes
//! can be summed.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::measure::StandardMeasure;

/// Canonical measurement class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardUnit {
    /// Volume, in US fluid ounces
    FluidOunce,
    /// Weight, in avoirdupois ounces
    Ounce,
    /// Discrete count, e.g. "2 eggs"
    Each,
    /// Any label that is not one of the canonical tokens
    Unrecognized,
}

impl StandardUnit {
    /// Every member of the enumeration
    pub const ALL: [StandardUnit; 4] = [
        StandardUnit::FluidOunce,
        StandardUnit::Ounce,
        StandardUnit::Each,
        StandardUnit::Unrecognized,
    ];

    /// Canonical display token
    pub fn as_str(self) -> &'static str {
        match self {
            StandardUnit::FluidOunce => "fl. oz.",
            StandardUnit::Ounce => "oz",
            StandardUnit::Each => "whole",
            StandardUnit::Unrecognized => "<error>",
        }
    }

    /// Map a canonical token back to its unit.
    ///
    /// Anything other than the tokens produced by [`StandardUnit::as_str`]
    /// maps to [`StandardUnit::Unrecognized`].
    pub fn from_label(label: &str) -> StandardUnit {
        match label {
            "fl. oz." => StandardUnit::FluidOunce,
            "oz" => StandardUnit::Ounce,
            "whole" => StandardUnit::Each,
            _ => StandardUnit::Unrecognized,
        }
    }
}

impl fmt::Display for StandardUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StandardUnit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StandardUnit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(StandardUnit::from_label(&label))
    }
}

/// A recognised free-text unit and how it converts into its class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitDefinition {
    pub name: &'static str,
    pub class: StandardUnit,
    /// Multiplier from this unit into the class's standard unit
    pub factor: f64,
    aliases: &'static [&'static str],
}

const UNITS: &[UnitDefinition] = &[
    // volume -> fluid ounces
    UnitDefinition {
        name: "teaspoon",
        class: StandardUnit::FluidOunce,
        factor: 1.0 / 6.0,
        aliases: &["teaspoon", "teaspoons", "tsp", "tsps", "tspn", "ts"],
    },
    UnitDefinition {
        name: "tablespoon",
        class: StandardUnit::FluidOunce,
        factor: 0.5,
        aliases: &["tablespoon", "tablespoons", "tbsp", "tbsps", "tbs", "tbl", "tbls"],
    },
    UnitDefinition {
        name: "fluid ounce",
        class: StandardUnit::FluidOunce,
        factor: 1.0,
        aliases: &["fluid ounce", "fluid ounces", "fl oz", "floz", "fl ounce", "fl ounces"],
    },
    UnitDefinition {
        name: "cup",
        class: StandardUnit::FluidOunce,
        factor: 8.0,
        aliases: &["cup", "cups", "c"],
    },
    UnitDefinition {
        name: "pint",
        class: StandardUnit::FluidOunce,
        factor: 16.0,
        aliases: &["pint", "pints", "pt", "pts"],
    },
    UnitDefinition {
        name: "quart",
        class: StandardUnit::FluidOunce,
        factor: 32.0,
        aliases: &["quart", "quarts", "qt", "qts"],
    },
    UnitDefinition {
        name: "gallon",
        class: StandardUnit::FluidOunce,
        factor: 128.0,
        aliases: &["gallon", "gallons", "gal", "gals"],
    },
    UnitDefinition {
        name: "milliliter",
        class: StandardUnit::FluidOunce,
        factor: 0.033_814,
        aliases: &["milliliter", "milliliters", "millilitre", "millilitres", "ml", "mls"],
    },
    UnitDefinition {
        name: "deciliter",
        class: StandardUnit::FluidOunce,
        factor: 3.381_4,
        aliases: &["deciliter", "deciliters", "decilitre", "decilitres", "dl"],
    },
    UnitDefinition {
        name: "liter",
        class: StandardUnit::FluidOunce,
        factor: 33.814,
        aliases: &["liter", "liters", "litre", "litres", "l"],
    },
    UnitDefinition {
        name: "pinch",
        class: StandardUnit::FluidOunce,
        factor: 1.0 / 96.0,
        aliases: &["pinch", "pinches"],
    },
    UnitDefinition {
        name: "dash",
        class: StandardUnit::FluidOunce,
        factor: 1.0 / 48.0,
        aliases: &["dash", "dashes"],
    },
    // weight -> ounces
    UnitDefinition {
        name: "ounce",
        class: StandardUnit::Ounce,
        factor: 1.0,
        aliases: &["ounce", "ounces", "oz", "ozs"],
    },
    UnitDefinition {
        name: "pound",
        class: StandardUnit::Ounce,
        factor: 16.0,
        aliases: &["pound", "pounds", "lb", "lbs"],
    },
    UnitDefinition {
        name: "gram",
        class: StandardUnit::Ounce,
        factor: 0.035_274,
        aliases: &["gram", "grams", "gramme", "grammes", "g", "gr"],
    },
    UnitDefinition {
        name: "kilogram",
        class: StandardUnit::Ounce,
        factor: 35.274,
        aliases: &["kilogram", "kilograms", "kilogramme", "kilogrammes", "kg", "kgs"],
    },
    UnitDefinition {
        name: "milligram",
        class: StandardUnit::Ounce,
        factor: 0.000_035_274,
        aliases: &["milligram", "milligrams", "mg"],
    },
    // count -> each
    UnitDefinition {
        name: "each",
        class: StandardUnit::Each,
        factor: 1.0,
        aliases: &["each", "ea", "whole"],
    },
    UnitDefinition {
        name: "piece",
        class: StandardUnit::Each,
        factor: 1.0,
        aliases: &["piece", "pieces", "pc", "pcs"],
    },
    UnitDefinition {
        name: "clove",
        class: StandardUnit::Each,
        factor: 1.0,
        aliases: &["clove", "cloves"],
    },
    UnitDefinition {
        name: "can",
        class: StandardUnit::Each,
        factor: 1.0,
        aliases: &["can", "cans", "tin", "tins"],
    },
    UnitDefinition {
        name: "package",
        class: StandardUnit::Each,
        factor: 1.0,
        aliases: &["package", "packages", "pkg", "pkgs", "packet", "packets"],
    },
    UnitDefinition {
        name: "slice",
        class: StandardUnit::Each,
        factor: 1.0,
        aliases: &["slice", "slices"],
    },
    UnitDefinition {
        name: "stick",
        class: StandardUnit::Each,
        factor: 1.0,
        aliases: &["stick", "sticks"],
    },
    UnitDefinition {
        name: "head",
        class: StandardUnit::Each,
        factor: 1.0,
        aliases: &["head", "heads"],
    },
    UnitDefinition {
        name: "bunch",
        class: StandardUnit::Each,
        factor: 1.0,
        aliases: &["bunch", "bunches"],
    },
    UnitDefinition {
        name: "sprig",
        class: StandardUnit::Each,
        factor: 1.0,
        aliases: &["sprig", "sprigs"],
    },
];

/// Lower-case, treat periods as separators and collapse whitespace.
fn normalize_unit(raw: &str) -> String {
    raw.replace('.', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Look up a free-text unit.
///
/// "T" and "t" are the only case-sensitive spellings (tablespoon and
/// teaspoon respectively).
pub fn lookup_unit(raw: &str) -> Option<&'static UnitDefinition> {
    let trimmed = raw.trim().trim_end_matches('.');
    let name = match trimmed {
        "T" => "tablespoon",
        "t" => "teaspoon",
        _ => {
            let normalized = normalize_unit(trimmed);
            return UNITS
                .iter()
                .find(|unit| unit.aliases.contains(&normalized.as_str()));
        }
    };
    UNITS.iter().find(|unit| unit.name == name)
}

/// Convert an original (amount, unit) pair into its standardized form.
///
/// A missing amount or an unknown unit yields [`StandardMeasure::Unconvertible`];
/// an empty unit is a plain count.
pub fn standardize(amount: Option<f64>, raw_unit: &str) -> StandardMeasure {
    let Some(amount) = amount.filter(|a| a.is_finite() && *a >= 0.0) else {
        return StandardMeasure::Unconvertible;
    };

    if raw_unit.trim().is_empty() {
        return StandardMeasure::Converted {
            amount,
            unit: StandardUnit::Each,
        };
    }

    match lookup_unit(raw_unit) {
        Some(unit) => StandardMeasure::Converted {
            amount: amount * unit.factor,
            unit: unit.class,
        },
        None => StandardMeasure::Unconvertible,
    }
}
