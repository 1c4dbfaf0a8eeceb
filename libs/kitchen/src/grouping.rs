//! Item aggregation
//!
//! Groups the items of a grocery list into shopping totals. Items are keyed
//! by name, and optionally by standard unit as well; the standardized amounts
//! of each group are summed per unit class. Unconvertible items are listed as
//! members of their group but never contribute to a total.

use ingredients::{StandardMeasure, StandardUnit};
use serde::Serialize;
use std::collections::HashMap;

use crate::models::Item;

/// Granularity of grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupingMode {
    /// One group per name, with a total per unit class
    ByName,
    /// One group per (name, unit class) pair
    #[default]
    ByNameAndUnit,
}

/// Derived aggregate of items sharing a name (and optionally a unit)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemGroup {
    pub name: String,
    /// Set when grouped by unit as well as name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<StandardUnit>,
    pub totals: HashMap<StandardUnit, f64>,
    pub items: Vec<Item>,
}

impl ItemGroup {
    /// A group with no members
    pub fn empty(name: impl Into<String>, unit: Option<StandardUnit>) -> Self {
        ItemGroup {
            name: name.into(),
            unit,
            totals: HashMap::new(),
            items: Vec::new(),
        }
    }

    /// Add a member, folding its standardized amount into the totals
    pub fn push(&mut self, item: Item) {
        if let StandardMeasure::Converted { amount, unit } = item.measure.standard {
            *self.totals.entry(unit).or_insert(0.0) += amount;
        }
        self.items.push(item);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Key under which items of the same name are grouped
pub fn group_name(name: &str) -> String {
    name.to_lowercase()
}

/// Group items; output order is unspecified.
///
/// Names are compared ignoring case, matching the by-name lookup.
pub fn group_items(items: Vec<Item>, mode: GroupingMode) -> Vec<ItemGroup> {
    let mut groups: HashMap<(String, Option<StandardUnit>), ItemGroup> = HashMap::new();

    for item in items {
        let unit = match mode {
            GroupingMode::ByName => None,
            GroupingMode::ByNameAndUnit => Some(item.measure.standard.unit()),
        };
        let name = group_name(&item.name);
        groups
            .entry((name.clone(), unit))
            .or_insert_with(|| ItemGroup::empty(name, unit))
            .push(item);
    }

    groups.into_values().collect()
}
