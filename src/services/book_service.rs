//! Book Service - admin operations without the HTTP layer
//!
//! Handlers in `api::books` are thin wrappers around these functions.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::domain::{DomainError, NewBook, NewBookImage};
use crate::infrastructure::AppState;
use crate::infrastructure::file_storage::{StagedBatch, StorageError};
use crate::models::book_image::ImageRole;
use crate::models::{BookDetails, BookForm, BookSummary, UploadedFile, author, genre, tag};
use crate::services::validation::{self, FormErrors};

/// Error type for service operations
#[derive(Debug)]
pub enum ServiceError {
    Database(String),
    Storage(String),
    NotFound,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Database(msg) => write!(f, "Database error: {}", msg),
            ServiceError::Storage(msg) => write!(f, "Storage error: {}", msg),
            ServiceError::NotFound => write!(f, "Book not found"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<DomainError> for ServiceError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => ServiceError::NotFound,
            DomainError::Database(msg) => ServiceError::Database(msg),
            DomainError::Storage(msg) => ServiceError::Storage(msg),
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(e: StorageError) -> Self {
        ServiceError::Storage(e.to_string())
    }
}

/// Reference data every book form needs for its select inputs
#[derive(Debug, Clone, Serialize)]
pub struct FormContext {
    pub authors: Vec<author::Model>,
    pub genres: Vec<genre::Model>,
    pub tags: Vec<tag::Model>,
}

/// Result of a create submission that did not fault
#[derive(Debug)]
pub enum CreateOutcome {
    Created(i32),
    Rejected(FormErrors),
}

impl CreateOutcome {
    fn rejected(field: &str, message: impl Into<String>) -> Self {
        CreateOutcome::Rejected(FormErrors::single(field, message))
    }
}

/// All active books, with genre and images
pub async fn list_books(state: &AppState) -> Result<Vec<BookSummary>, ServiceError> {
    let books = state.book_repo.find_active().await?;
    tracing::debug!("Listing {} active books", books.len());
    Ok(books)
}

/// Authors, genres and tags for the create and edit forms.
///
/// Used for the empty form as well as for re-displaying a rejected one.
pub async fn form_context(state: &AppState) -> Result<FormContext, ServiceError> {
    Ok(FormContext {
        authors: state.reference_repo.authors().await?,
        genres: state.reference_repo.genres().await?,
        tags: state.reference_repo.tags().await?,
    })
}

/// Validate a submitted form and persist the book with its images and tags.
///
/// Checks run in a fixed order and the first failing step rejects the form.
/// Nothing is written to disk or to the database before every check passed,
/// and a failure while persisting removes the files again.
pub async fn create_book(
    state: &AppState,
    form: &BookForm,
) -> Result<CreateOutcome, ServiceError> {
    let input = match validation::validate_fields(form) {
        Ok(input) => input,
        Err(errors) => return Ok(CreateOutcome::Rejected(errors)),
    };

    let author_id = match input.author_id {
        Some(id) if state.reference_repo.author_exists(id).await? => id,
        _ => return Ok(CreateOutcome::rejected("author_id", "Author not found")),
    };

    let genre_id = match input.genre_id {
        Some(id) if state.reference_repo.genre_exists(id).await? => id,
        _ => return Ok(CreateOutcome::rejected("genre_id", "Genre not found")),
    };

    let Some(poster) = form.poster_file.as_ref() else {
        return Ok(CreateOutcome::rejected(
            "poster_file",
            "poster_file is required",
        ));
    };

    let Some(hover_poster) = form.hover_poster_file.as_ref() else {
        return Ok(CreateOutcome::rejected(
            "hover_poster_file",
            "hover_poster_file is required",
        ));
    };

    let mut errors = FormErrors::default();
    if !validation::is_image_valid(poster, "poster_file", &mut errors)
        || !validation::is_image_valid(hover_poster, "hover_poster_file", &mut errors)
    {
        return Ok(CreateOutcome::Rejected(errors));
    }

    for file in &form.image_files {
        if !validation::is_image_valid(file, "image_files", &mut errors) {
            return Ok(CreateOutcome::Rejected(errors));
        }
    }

    for tag_id in &input.tag_ids {
        if !state.reference_repo.tag_exists(*tag_id).await? {
            return Ok(CreateOutcome::rejected("tag_ids", "Tag not found"));
        }
    }

    // One join row per tag, even if the form repeated it
    let mut seen = HashSet::new();
    let tag_ids: Vec<i32> = input
        .tag_ids
        .into_iter()
        .filter(|id| seen.insert(*id))
        .collect();

    let mut batch = state.uploads.batch();
    let images = match stage_images(&mut batch, poster, hover_poster, &form.image_files).await {
        Ok(images) => images,
        Err(e) => {
            batch.discard().await;
            tracing::error!("Failed to stage book images: {}", e);
            return Err(e.into());
        }
    };

    let new_book = NewBook {
        name: input.name,
        description: input.description,
        genre_id,
        author_id,
        sale_price: input.sale_price,
        cost_price: input.cost_price,
        discount_percent: input.discount_percent,
        stock_status: input.stock_status,
        is_best_seller: input.is_best_seller,
        is_new: input.is_new,
        tag_ids,
        images,
    };

    match state.book_repo.create(new_book, &batch).await {
        Ok(id) => {
            tracing::info!(
                book_id = id,
                images = batch.names().len(),
                "Book created"
            );
            Ok(CreateOutcome::Created(id))
        }
        Err(e) => {
            batch.discard().await;
            tracing::error!("Failed to create book: {}", e);
            Err(e.into())
        }
    }
}

async fn stage_images(
    batch: &mut StagedBatch,
    poster: &UploadedFile,
    hover_poster: &UploadedFile,
    gallery: &[UploadedFile],
) -> Result<Vec<NewBookImage>, StorageError> {
    let mut images = Vec::with_capacity(gallery.len() + 2);

    images.push(NewBookImage {
        image: batch.stage(poster).await?,
        role: ImageRole::Poster,
    });
    images.push(NewBookImage {
        image: batch.stage(hover_poster).await?,
        role: ImageRole::HoverPoster,
    });

    for file in gallery {
        images.push(NewBookImage {
            image: batch.stage(file).await?,
            role: ImageRole::Gallery,
        });
    }

    Ok(images)
}

/// Active book with its tag ids and images, for the edit form
pub async fn get_book_for_edit(state: &AppState, id: i32) -> Result<BookDetails, ServiceError> {
    state
        .book_repo
        .find_active_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound)
}

/// Soft-delete a book. Images and tag rows are left as they are.
pub async fn delete_book(state: &AppState, id: i32) -> Result<(), ServiceError> {
    state.book_repo.soft_delete(id).await?;
    tracing::info!(book_id = id, "Book marked as deleted");
    Ok(())
}
