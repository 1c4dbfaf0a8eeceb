//! Recipe and grocery-list domain layer
//!
//! [`Kitchen`] is the entry point: every operation takes the acting [`User`]
//! explicitly and checks that it owns the resource it touches. Resources are
//! looked up first and ownership is checked second, so a missing resource is
//! reported as [`DomainError::NotFound`] and never as
//! [`DomainError::Forbidden`].
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use kitchen::{GroupingMode, Kitchen};
//! use kitchen::scraper::{HttpScraper, ScraperConfig};
//! use kitchen::store::PgStore;
//!
//! # async fn run(pool: sqlx::PgPool, user: kitchen::models::User) -> Result<(), Box<dyn std::error::Error>> {
//! let scraper = HttpScraper::new(&ScraperConfig::from_env())?;
//! let kitchen = Kitchen::new(Arc::new(PgStore::new(pool)), Arc::new(scraper));
//!
//! let recipe = kitchen.create_recipe_from_url(&user, "https://example.com/pancakes").await?;
//! let list = kitchen.create_grocery_list(&user, "Weekend").await?;
//! kitchen.create_meal(&user, &list, recipe.recipe.id).await?;
//!
//! for group in kitchen.get_item_groups_for_grocery_list(&user, &list, GroupingMode::ByNameAndUnit).await? {
//!     println!("{}: {:?}", group.name, group.totals);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod grouping;
pub mod models;
pub mod scraper;
pub mod store;

mod grocery_lists;
mod items;
mod meals;
mod recipes;
mod users;

use ingredients::IngredientParser;
use std::sync::Arc;
use uuid::Uuid;

pub use error::{DomainError, DomainResult, ErrorKind, ImportFailure};
pub use grouping::{GroupingMode, ItemGroup, group_items, group_name};

use crate::models::User;
use crate::scraper::RecipeScraper;
use crate::store::Store;

/// Ownership-checked access to recipes, grocery lists, meals and items
#[derive(Clone)]
pub struct Kitchen {
    store: Arc<dyn Store>,
    scraper: Arc<dyn RecipeScraper>,
    parser: Arc<IngredientParser>,
}

impl Kitchen {
    /// Create a kitchen using the default ingredient parser
    pub fn new(store: Arc<dyn Store>, scraper: Arc<dyn RecipeScraper>) -> Self {
        Kitchen {
            store,
            scraper,
            parser: Arc::new(IngredientParser::default()),
        }
    }

    /// Replace the ingredient parser
    pub fn with_parser(mut self, parser: IngredientParser) -> Self {
        self.parser = Arc::new(parser);
        self
    }
}

/// Fails with Forbidden unless `user` is the owner
fn ensure_owner(user: &User, owner_id: Uuid) -> DomainResult<()> {
    if user.id == owner_id {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}
