//! Request-only book data
//!
//! Nothing here is persisted. The admin form is read into a `BookForm`
//! with raw string values so that type errors can be reported per field.

use bytes::Bytes;
use serde::Serialize;

/// A file received in a multipart upload
#[derive(Debug, Clone, Serialize)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
    #[serde(skip)]
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            size: data.len(),
            data,
        }
    }

    /// Lowercased extension of the original file name, if any
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .map(|ext| ext.to_ascii_lowercase())
    }
}

/// Raw values of the create/edit form, as submitted.
#[derive(Debug, Default, Clone, Serialize)]
pub struct BookForm {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub genre_id: Option<String>,
    pub author_id: Option<String>,
    pub sale_price: Option<String>,
    pub cost_price: Option<String>,
    pub discount_percent: Option<String>,
    pub stock_status: Option<String>,
    pub is_best_seller: Option<String>,
    pub is_new: Option<String>,
    pub tag_ids: Vec<String>,
    pub poster_file: Option<UploadedFile>,
    pub hover_poster_file: Option<UploadedFile>,
    pub image_files: Vec<UploadedFile>,
}
