use crate::models::{author, genre, tag};
use sea_orm::*;

/// Insert demo authors, genres and tags when the reference tables are empty.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    if author::Entity::find().count(db).await? == 0 {
        for name in ["Frank Herbert", "Ursula K. Le Guin", "Isaac Asimov"] {
            author::ActiveModel {
                name: Set(name.to_owned()),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }

    if genre::Entity::find().count(db).await? == 0 {
        for name in ["Science Fiction", "Fantasy", "Classics"] {
            genre::ActiveModel {
                name: Set(name.to_owned()),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }

    // Tag names are unique, so only insert the missing ones
    for name in ["bestseller", "award-winner", "paperback"] {
        let existing = tag::Entity::find()
            .filter(tag::Column::Name.eq(name))
            .one(db)
            .await?;
        if existing.is_none() {
            tag::ActiveModel {
                name: Set(name.to_owned()),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }

    Ok(())
}
