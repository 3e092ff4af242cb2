//! SeaORM implementation of ReferenceRepository

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder};

use crate::domain::{DomainError, ReferenceRepository};
use crate::models::{author, genre, tag};

pub struct SeaOrmReferenceRepository {
    db: DatabaseConnection,
}

impl SeaOrmReferenceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReferenceRepository for SeaOrmReferenceRepository {
    async fn authors(&self) -> Result<Vec<author::Model>, DomainError> {
        Ok(author::Entity::find()
            .order_by_asc(author::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn genres(&self) -> Result<Vec<genre::Model>, DomainError> {
        Ok(genre::Entity::find()
            .order_by_asc(genre::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn tags(&self) -> Result<Vec<tag::Model>, DomainError> {
        Ok(tag::Entity::find()
            .order_by_asc(tag::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn author_exists(&self, id: i32) -> Result<bool, DomainError> {
        Ok(author::Entity::find_by_id(id).count(&self.db).await? > 0)
    }

    async fn genre_exists(&self, id: i32) -> Result<bool, DomainError> {
        Ok(genre::Entity::find_by_id(id).count(&self.db).await? > 0)
    }

    async fn tag_exists(&self, id: i32) -> Result<bool, DomainError> {
        Ok(tag::Entity::find_by_id(id).count(&self.db).await? > 0)
    }
}
