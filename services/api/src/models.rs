//! Request bodies and query parameters

use kitchen::GroupingMode;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateGroceryListRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateMealRequest {
    pub recipe_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Flags accepted by the item listing endpoint.
///
/// A bare flag (`?grouped`) deserializes to an empty string.
#[derive(Debug, Default, Deserialize)]
pub struct ItemsQuery {
    pub grouped: Option<String>,
    pub ungrouped: Option<String>,
}

/// How the item listing should be shaped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemListing {
    Flat,
    Grouped(GroupingMode),
}

impl ItemsQuery {
    pub fn listing(&self) -> Result<ItemListing, ApiError> {
        match (self.grouped.as_deref(), self.ungrouped.is_some()) {
            (Some(_), true) => Err(ApiError::Conflict(
                "grouped and ungrouped cannot be requested together".to_string(),
            )),
            (None, _) => Ok(ItemListing::Flat),
            (Some("" | "unit"), false) => Ok(ItemListing::Grouped(GroupingMode::ByNameAndUnit)),
            (Some("name"), false) => Ok(ItemListing::Grouped(GroupingMode::ByName)),
            (Some(other), false) => Err(ApiError::BadRequest(format!(
                "unknown grouping: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(grouped: Option<&str>, ungrouped: Option<&str>) -> ItemsQuery {
        ItemsQuery {
            grouped: grouped.map(str::to_string),
            ungrouped: ungrouped.map(str::to_string),
        }
    }

    #[test]
    fn test_listing_modes() {
        assert_eq!(query(None, None).listing().unwrap(), ItemListing::Flat);
        assert_eq!(query(None, Some("")).listing().unwrap(), ItemListing::Flat);
        assert_eq!(
            query(Some(""), None).listing().unwrap(),
            ItemListing::Grouped(GroupingMode::ByNameAndUnit)
        );
        assert_eq!(
            query(Some("unit"), None).listing().unwrap(),
            ItemListing::Grouped(GroupingMode::ByNameAndUnit)
        );
        assert_eq!(
            query(Some("name"), None).listing().unwrap(),
            ItemListing::Grouped(GroupingMode::ByName)
        );
    }

    #[test]
    fn test_conflicting_and_unknown_flags() {
        assert!(matches!(
            query(Some(""), Some("")).listing(),
            Err(ApiError::Conflict(_))
        ));
        assert!(matches!(
            query(Some("colour"), None).listing(),
            Err(ApiError::BadRequest(_))
        ));
    }
}
