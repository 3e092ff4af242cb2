use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::book_image;

/// Soft-delete state. Deleted books stay in storage but are hidden from
/// every read except the delete lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "deleted")]
    Deleted,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
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
    pub created_at: String,
    pub modified_at: String,
    pub status: BookStatus,
}

impl Model {
    pub fn is_deleted(&self) -> bool {
        self.status == BookStatus::Deleted
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::genre::Entity",
        from = "Column::GenreId",
        to = "super::genre::Column::Id"
    )]
    Genre,
    #[sea_orm(
        belongs_to = "super::author::Entity",
        from = "Column::AuthorId",
        to = "super::author::Column::Id"
    )]
    Author,
    #[sea_orm(has_many = "super::book_image::Entity")]
    Images,
    #[sea_orm(has_many = "super::book_tags::Entity")]
    BookTags,
}

impl Related<super::genre::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Genre.def()
    }
}

impl Related<super::author::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::book_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl Related<super::book_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookTags.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::book_tags::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::book_tags::Relation::Book.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

// DTO for the admin listing
#[derive(Debug, Clone, Serialize)]
pub struct BookSummary {
    #[serde(flatten)]
    pub book: Model,
    pub genre: Option<super::genre::Model>,
    pub images: Vec<book_image::Model>,
}

// DTO for the edit form
#[derive(Debug, Clone, Serialize)]
pub struct BookDetails {
    #[serde(flatten)]
    pub book: Model,
    pub tag_ids: Vec<i32>,
    pub images: Vec<book_image::Model>,
}
