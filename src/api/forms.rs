use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;

use crate::models::{BookForm, UploadedFile};

/// Read the admin book form out of a multipart body.
///
/// Scalar fields keep their first value, so a ticked checkbox followed by
/// its hidden "false" fallback reads as ticked. Empty file inputs are
/// treated as absent. `description` is read as an alias of `desc`.
/// Unknown fields are skipped.
pub async fn read_book_form(mut multipart: Multipart) -> Result<BookForm, MultipartError> {
    let mut form = BookForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if let Some(file_name) = field.file_name().map(str::to_owned) {
            let content_type = field.content_type().unwrap_or_default().to_owned();
            let data = field.bytes().await?;
            if file_name.is_empty() && data.is_empty() {
                continue;
            }

            let file = UploadedFile::new(file_name, content_type, data);
            match name.as_str() {
                "poster_file" => set_once(&mut form.poster_file, file),
                "hover_poster_file" => set_once(&mut form.hover_poster_file, file),
                "image_files" => form.image_files.push(file),
                _ => tracing::debug!("Ignoring file field '{}'", name),
            }
            continue;
        }

        let value = field.text().await?;
        match name.as_str() {
            "name" => set_once(&mut form.name, value),
            "desc" | "description" => set_once(&mut form.desc, value),
            "genre_id" => set_once(&mut form.genre_id, value),
            "author_id" => set_once(&mut form.author_id, value),
            "sale_price" => set_once(&mut form.sale_price, value),
            "cost_price" => set_once(&mut form.cost_price, value),
            "discount_percent" => set_once(&mut form.discount_percent, value),
            "stock_status" => set_once(&mut form.stock_status, value),
            "is_best_seller" => set_once(&mut form.is_best_seller, value),
            "is_new" => set_once(&mut form.is_new, value),
            "tag_ids" => form.tag_ids.push(value),
            _ => tracing::debug!("Ignoring form field '{}'", name),
        }
    }

    Ok(form)
}

fn set_once<T>(slot: &mut Option<T>, value: T) {
    if slot.is_none() {
        *slot = Some(value);
    }
}
