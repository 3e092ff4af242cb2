//! Book admin handlers
//!
//! Views are returned as JSON documents: the listing, the form context
//! (authors, genres, tags) with the form values and field errors, or an
//! error view.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::{Value, json};

use crate::api::error::ApiError;
use crate::api::forms::read_book_form;
use crate::infrastructure::AppState;
use crate::infrastructure::server::BOOK_ADMIN_PREFIX;
use crate::models::BookForm;
use crate::services::validation::FormErrors;
use crate::services::{self, CreateOutcome, FormContext};

fn form_view(context: FormContext, form: Value, errors: &FormErrors) -> Value {
    json!({
        "authors": context.authors,
        "genres": context.genres,
        "tags": context.tags,
        "form": form,
        "errors": errors,
    })
}

#[utoipa::path(
    get,
    path = "/manage/book/index",
    responses(
        (status = 200, description = "Active books with their genre and images")
    )
)]
pub async fn index(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let books = services::list_books(&state).await?;

    Ok(Json(json!({
        "total": books.len(),
        "books": books,
    })))
}

#[utoipa::path(
    get,
    path = "/manage/book/create",
    responses(
        (status = 200, description = "Empty book form with authors, genres and tags")
    )
)]
pub async fn create_form(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let context = services::form_context(&state).await?;

    Ok(Json(form_view(
        context,
        json!(BookForm::default()),
        &FormErrors::default(),
    )))
}

#[utoipa::path(
    post,
    path = "/manage/book/create",
    responses(
        (status = 303, description = "Book created, redirect to the listing"),
        (status = 422, description = "Form rejected, field errors and reference data returned"),
        (status = 400, description = "Malformed multipart body")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = read_book_form(multipart).await?;

    match services::create_book(&state, &form).await? {
        CreateOutcome::Created(_) => {
            Ok(Redirect::to(&format!("{}/index", BOOK_ADMIN_PREFIX)).into_response())
        }
        CreateOutcome::Rejected(errors) => {
            tracing::debug!(?errors, "Book form rejected");
            let context = services::form_context(&state).await?;
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(form_view(context, json!(form), &errors)),
            )
                .into_response())
        }
    }
}

#[utoipa::path(
    get,
    path = "/manage/book/edit/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book form filled with the stored book"),
        (status = 404, description = "No active book with this id")
    )
)]
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let book = services::get_book_for_edit(&state, id).await?;
    let context = services::form_context(&state).await?;

    Ok(Json(form_view(context, json!(book), &FormErrors::default())))
}

// TODO: apply scalar changes, replace images and resync tags once the
// edit workflow is agreed on. Until then the submission is only echoed.
#[utoipa::path(
    post,
    path = "/manage/book/edit",
    responses(
        (status = 200, description = "Submitted form echoed back, nothing is saved")
    )
)]
pub async fn edit(multipart: Multipart) -> Result<Json<BookForm>, ApiError> {
    let form = read_book_form(multipart).await?;
    tracing::warn!(name = ?form.name, "Book edit submitted but not persisted");
    Ok(Json(form))
}

#[utoipa::path(
    post,
    path = "/manage/book/delete/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book marked as deleted"),
        (status = 404, description = "No book with this id")
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    services::delete_book(&state, id).await?;
    Ok(StatusCode::OK)
}
