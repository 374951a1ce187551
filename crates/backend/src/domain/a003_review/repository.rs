use contracts::domain::a003_review::Review;
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a003_review")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub hotel_id: String,
    pub reviewer_name: String,
    pub rating: f64,
    pub title: String,
    pub comment: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Review {
    fn from(m: Model) -> Self {
        Review {
            id: m.id,
            hotel_id: m.hotel_id,
            reviewer_name: m.reviewer_name,
            rating: m.rating as f32,
            title: m.title,
            comment: m.comment,
            created_at: m.created_at,
            data_by_api: false,
        }
    }
}

fn conn() -> anyhow::Result<&'static DatabaseConnection> {
    get_connection()
}

/// Свежие отзывы первыми
pub async fn list_by_hotel(hotel_id: &str) -> anyhow::Result<Vec<Review>> {
    let items = Entity::find()
        .filter(Column::HotelId.eq(hotel_id))
        .order_by_desc(Column::CreatedAt)
        .all(conn()?)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn insert(aggregate: &Review) -> anyhow::Result<String> {
    let active = ActiveModel {
        id: Set(aggregate.id.clone()),
        hotel_id: Set(aggregate.hotel_id.clone()),
        reviewer_name: Set(aggregate.reviewer_name.clone()),
        rating: Set(aggregate.rating as f64),
        title: Set(aggregate.title.clone()),
        comment: Set(aggregate.comment.clone()),
        created_at: Set(aggregate.created_at),
    };
    active.insert(conn()?).await?;
    Ok(aggregate.id.clone())
}

pub async fn delete(id: &str) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn()?).await?;
    Ok(result.rows_affected > 0)
}
