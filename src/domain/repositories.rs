//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::DomainError;
use crate::models::book_image::ImageRole;
use crate::models::{BookDetails, BookSummary, author, genre, tag};

/// Image row to be created together with its book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBookImage {
    pub image: String,
    pub role: ImageRole,
}

/// Input for creating a book aggregate
#[derive(Debug, Clone)]
pub struct NewBook {
    pub name: String,
    pub description: Option<String>,
    pub genre_id: i32,
    pub author_id: i32,
    pub sale_price: Decimal,
    pub cost_price: Decimal,
    pub discount_percent: Decimal,
    pub stock_status: bool,
    pub is_best_seller: bool,
    pub is_new: bool,
    pub tag_ids: Vec<i32>,
    pub images: Vec<NewBookImage>,
}

/// Files written ahead of a create, waiting for the database commit.
///
/// `promote` runs inside the transaction right before commit. `revert`
/// undoes a successful promotion when the commit itself fails.
#[async_trait]
pub trait PendingUploads: Send + Sync {
    async fn promote(&self) -> Result<(), DomainError>;

    async fn revert(&self);
}

/// Repository trait for Book aggregates
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Active books with genre and images loaded
    async fn find_active(&self) -> Result<Vec<BookSummary>, DomainError>;

    /// Active book with tag ids and images, for editing
    async fn find_active_by_id(&self, id: i32) -> Result<Option<BookDetails>, DomainError>;

    /// Insert the book, its images and tag rows in one transaction.
    /// Returns the new book id.
    async fn create(&self, book: NewBook, uploads: &dyn PendingUploads)
    -> Result<i32, DomainError>;

    /// Mark a book as deleted, whatever its current status
    async fn soft_delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Read-only access to authors, genres and tags
#[async_trait]
pub trait ReferenceRepository: Send + Sync {
    async fn authors(&self) -> Result<Vec<author::Model>, DomainError>;

    async fn genres(&self) -> Result<Vec<genre::Model>, DomainError>;

    async fn tags(&self) -> Result<Vec<tag::Model>, DomainError>;

    async fn author_exists(&self, id: i32) -> Result<bool, DomainError>;

    async fn genre_exists(&self, id: i32) -> Result<bool, DomainError>;

    async fn tag_exists(&self, id: i32) -> Result<bool, DomainError>;
}
