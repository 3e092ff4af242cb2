//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::{BookRepository, DomainError, NewBook, PendingUploads};
use crate::models::book::{ActiveModel, BookStatus, Column, Entity as BookEntity};
use crate::models::{BookDetails, BookSummary, book_image, book_tags, genre};

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_active(&self) -> Result<Vec<BookSummary>, DomainError> {
        let books = BookEntity::find()
            .filter(Column::Status.eq(BookStatus::Active))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        // Eager load genre and images for the whole page in two queries
        let genres = books.load_one(genre::Entity, &self.db).await?;
        let images = books.load_many(book_image::Entity, &self.db).await?;

        Ok(books
            .into_iter()
            .zip(genres)
            .zip(images)
            .map(|((book, genre), mut images)| {
                images.sort_by_key(|image| image.id);
                BookSummary {
                    book,
                    genre,
                    images,
                }
            })
            .collect())
    }

    async fn find_active_by_id(&self, id: i32) -> Result<Option<BookDetails>, DomainError> {
        let Some(book) = BookEntity::find_by_id(id)
            .filter(Column::Status.eq(BookStatus::Active))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let tag_ids = book
            .find_related(book_tags::Entity)
            .order_by_asc(book_tags::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|book_tag| book_tag.tag_id)
            .collect();

        let images = book
            .find_related(book_image::Entity)
            .order_by_asc(book_image::Column::Id)
            .all(&self.db)
            .await?;

        Ok(Some(BookDetails {
            book,
            tag_ids,
            images,
        }))
    }

    async fn create(
        &self,
        book: NewBook,
        uploads: &dyn PendingUploads,
    ) -> Result<i32, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        // Dropping the transaction on an early return rolls it back
        let txn = self.db.begin().await?;

        let model = ActiveModel {
            name: Set(book.name),
            description: Set(book.description),
            genre_id: Set(book.genre_id),
            author_id: Set(book.author_id),
            sale_price: Set(book.sale_price),
            cost_price: Set(book.cost_price),
            discount_percent: Set(book.discount_percent),
            stock_status: Set(book.stock_status),
            is_best_seller: Set(book.is_best_seller),
            is_new: Set(book.is_new),
            created_at: Set(now.clone()),
            modified_at: Set(now),
            status: Set(BookStatus::Active),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for image in book.images {
            book_image::ActiveModel {
                book_id: Set(model.id),
                image: Set(image.image),
                role: Set(image.role),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        for tag_id in book.tag_ids {
            book_tags::ActiveModel {
                book_id: Set(model.id),
                tag_id: Set(tag_id),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        uploads.promote().await?;

        if let Err(e) = txn.commit().await {
            uploads.revert().await;
            return Err(e.into());
        }

        Ok(model.id)
    }

    async fn soft_delete(&self, id: i32) -> Result<(), DomainError> {
        let book = BookEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = book.into();
        active.status = Set(BookStatus::Deleted);
        active.modified_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.db).await?;

        Ok(())
    }
}
