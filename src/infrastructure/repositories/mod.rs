//! Repository implementations using SeaORM

pub mod book_repository;
pub mod reference_repository;

pub use book_repository::SeaOrmBookRepository;
pub use reference_repository::SeaOrmReferenceRepository;
