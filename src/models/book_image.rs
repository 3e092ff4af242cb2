use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What an image is used for on the storefront.
///
/// A book carries exactly one `Poster`, exactly one `HoverPoster` and any
/// number of `Gallery` images.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum ImageRole {
    #[sea_orm(string_value = "poster")]
    Poster,
    #[sea_orm(string_value = "hover_poster")]
    HoverPoster,
    #[sea_orm(string_value = "gallery")]
    Gallery,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "book_images")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub book_id: i32,
    /// Generated file name inside the uploads directory
    pub image: String,
    pub role: ImageRole,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookId",
        to = "super::book::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Book,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
