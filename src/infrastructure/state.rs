//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{BookRepository, ReferenceRepository};
use crate::infrastructure::file_storage::UploadStore;
use crate::infrastructure::{SeaOrmBookRepository, SeaOrmReferenceRepository};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Book aggregates
    pub book_repo: Arc<dyn BookRepository>,
    /// Authors, genres and tags
    pub reference_repo: Arc<dyn ReferenceRepository>,
    /// Where uploaded book images end up
    pub uploads: UploadStore,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection, uploads: UploadStore) -> Self {
        let book_repo = Arc::new(SeaOrmBookRepository::new(db.clone()));
        let reference_repo = Arc::new(SeaOrmReferenceRepository::new(db));

        Self {
            book_repo,
            reference_repo,
            uploads,
        }
    }
}
