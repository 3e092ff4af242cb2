pub mod author;
pub mod book;
pub mod book_form;
pub mod book_image;
pub mod book_tags;
pub mod genre;
pub mod tag;

pub use book::{BookDetails, BookSummary};
pub use book_form::{BookForm, UploadedFile};
