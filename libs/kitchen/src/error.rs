//! Domain error taxonomy
//!
//! Every kitchen operation fails with a [`DomainError`]. Callers at the
//! transport boundary match on [`DomainError::kind`] to pick a status code and
//! show [`DomainError::message`] to the client; the `Display` form carries
//! the underlying cause and is meant for logs.

use common::error::DatabaseError;
use ingredients::ParseError;
use thiserror::Error;

use crate::scraper::ScrapeError;

/// The closed set of client-facing failure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    UserNotFound,
    Forbidden,
    RecipeScraperFailure,
    Internal,
}

/// Why a recipe import could not produce a recipe
#[derive(Error, Debug)]
pub enum ImportFailure {
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Error returned by domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    /// The referenced entity does not exist
    #[error("not_found: the requested resource does not exist")]
    NotFound,

    /// The referenced user does not exist
    #[error("user_not_found: the user with the given id does not exist")]
    UserNotFound,

    /// The acting user does not own the resource
    #[error("forbidden_access: you do not have authorization to access that resource")]
    Forbidden,

    /// Scraping or parsing the recipe at a URL failed
    #[error("recipe_scraper_failure: {0}")]
    RecipeScraperFailure(#[from] ImportFailure),

    /// Storage failure
    #[error("internal_error: {0}")]
    Database(#[from] DatabaseError),

    /// Any other unexpected failure
    #[error("internal_error: {0}")]
    Internal(String),
}

impl From<ScrapeError> for DomainError {
    fn from(err: ScrapeError) -> Self {
        DomainError::RecipeScraperFailure(ImportFailure::Scrape(err))
    }
}

impl From<ParseError> for DomainError {
    fn from(err: ParseError) -> Self {
        DomainError::RecipeScraperFailure(ImportFailure::Parse(err))
    }
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound => ErrorKind::NotFound,
            DomainError::UserNotFound => ErrorKind::UserNotFound,
            DomainError::Forbidden => ErrorKind::Forbidden,
            DomainError::RecipeScraperFailure(_) => ErrorKind::RecipeScraperFailure,
            DomainError::Database(_) | DomainError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::NotFound => "not_found",
            ErrorKind::UserNotFound => "user_not_found",
            ErrorKind::Forbidden => "forbidden_access",
            ErrorKind::RecipeScraperFailure => "recipe_scraper_failure",
            ErrorKind::Internal => "internal_error",
        }
    }

    /// Client-facing message; never exposes storage details
    pub fn message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::NotFound => "the requested resource does not exist",
            ErrorKind::UserNotFound => "the user with the given id does not exist",
            ErrorKind::Forbidden => "you do not have authorization to access that resource",
            ErrorKind::RecipeScraperFailure => "the recipe scraper could not parse the given url",
            ErrorKind::Internal => "something went wrong",
        }
    }
}

/// Type alias for Result with DomainError
pub type DomainResult<T> = Result<T, DomainError>;
