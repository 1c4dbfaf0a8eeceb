//! Original and standardized measures

use serde::{Deserialize, Serialize};

use crate::units::{self, StandardUnit};

/// The standardized half of a [`Measure`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StandardMeasure {
    /// A quantity in one of the standard classes
    Converted { amount: f64, unit: StandardUnit },
    /// The original measure could not be placed in any class; never summed
    Unconvertible,
}

impl StandardMeasure {
    /// The unit class this measure is bucketed under
    pub fn unit(&self) -> StandardUnit {
        match self {
            StandardMeasure::Converted { unit, .. } => *unit,
            StandardMeasure::Unconvertible => StandardUnit::Unrecognized,
        }
    }

    /// The summable amount, if there is one
    pub fn amount(&self) -> Option<f64> {
        match self {
            StandardMeasure::Converted { amount, .. } => Some(*amount),
            StandardMeasure::Unconvertible => None,
        }
    }

    /// Rebuild from persisted columns.
    ///
    /// Rows with no amount, a negative amount or an unrecognized unit label
    /// come back as `Unconvertible`.
    pub fn from_parts(amount: Option<f64>, unit_label: &str) -> Self {
        let unit = StandardUnit::from_label(unit_label);
        match amount {
            Some(amount)
                if amount.is_finite() && amount >= 0.0 && unit != StandardUnit::Unrecognized =>
            {
                StandardMeasure::Converted { amount, unit }
            }
            _ => StandardMeasure::Unconvertible,
        }
    }

    /// Columns to persist: (standard amount, standard unit label)
    pub fn to_parts(&self) -> (Option<f64>, &'static str) {
        (self.amount(), self.unit().as_str())
    }
}

/// An amount as scraped plus its standardized form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub original_amount: f64,
    pub original_units: String,
    pub standard: StandardMeasure,
}

impl Measure {
    /// Build a measure, standardizing the original (amount, units)
    pub fn new(amount: f64, units: impl Into<String>) -> Self {
        let original_units = units.into();
        let standard = units::standardize(Some(amount), &original_units);
        Measure {
            original_amount: amount,
            original_units,
            standard,
        }
    }

    /// A measure for a line that carried no amount ("salt to taste")
    pub fn unmeasured(units: impl Into<String>) -> Self {
        Measure {
            original_amount: 0.0,
            original_units: units.into(),
            standard: StandardMeasure::Unconvertible,
        }
    }
}
