pub mod books;
pub mod error;
pub mod forms;
pub mod health;

use axum::{
    Router,
    routing::{get, post},
};

use crate::infrastructure::AppState;

/// Routes of the book admin area, relative to its prefix
pub fn admin_router(state: AppState) -> Router {
    Router::new()
        // Listing
        .route("/", get(books::index))
        .route("/index", get(books::index))
        // Create
        .route("/create", get(books::create_form).post(books::create))
        // Edit
        .route("/edit/:id", get(books::edit_form))
        .route("/edit", post(books::edit))
        // Delete
        .route("/delete/:id", get(books::delete).post(books::delete))
        .with_state(state)
}
