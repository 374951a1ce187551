use chrono::Utc;
use contracts::domain::a002_room::Room;
use contracts::domain::common::EntityMetadata;
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::{decode_list, encode_list, get_connection};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_room")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub hotel_id: String,
    pub room_type: String,
    pub description: String,
    pub max_occupancy: i32,
    pub bed_configuration: String,
    pub room_size: Option<f64>,
    pub room_size_unit: String,
    pub base_price: f64,
    pub discounted_price: f64,
    pub amenities: String,
    pub images: String,
    pub quantity: i32,
    pub smoking_allowed: bool,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Room {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };

        Room {
            id: m.id,
            hotel_id: m.hotel_id,
            room_type: m.room_type,
            description: m.description,
            max_occupancy: m.max_occupancy.max(0) as u32,
            bed_configuration: decode_list(&m.bed_configuration),
            room_size: m.room_size,
            room_size_unit: m.room_size_unit,
            base_price: m.base_price,
            discounted_price: m.discounted_price,
            amenities: decode_list(&m.amenities),
            images: decode_list(&m.images),
            quantity: m.quantity.max(0) as u32,
            smoking_allowed: m.smoking_allowed,
            metadata: Some(metadata),
        }
    }
}

fn conn() -> anyhow::Result<&'static DatabaseConnection> {
    get_connection()
}

fn to_active(aggregate: &Room) -> ActiveModel {
    let metadata = aggregate.metadata.clone().unwrap_or_default();
    ActiveModel {
        id: Set(aggregate.id.clone()),
        hotel_id: Set(aggregate.hotel_id.clone()),
        room_type: Set(aggregate.room_type.clone()),
        description: Set(aggregate.description.clone()),
        max_occupancy: Set(aggregate.max_occupancy as i32),
        bed_configuration: Set(encode_list(&aggregate.bed_configuration)),
        room_size: Set(aggregate.room_size),
        room_size_unit: Set(aggregate.room_size_unit.clone()),
        base_price: Set(aggregate.base_price),
        discounted_price: Set(aggregate.discounted_price),
        amenities: Set(encode_list(&aggregate.amenities)),
        images: Set(encode_list(&aggregate.images)),
        quantity: Set(aggregate.quantity as i32),
        smoking_allowed: Set(aggregate.smoking_allowed),
        is_deleted: Set(metadata.is_deleted),
        created_at: Set(Some(metadata.created_at)),
        updated_at: Set(Some(metadata.updated_at)),
        version: Set(metadata.version),
    }
}

pub async fn list_by_hotel(hotel_id: &str) -> anyhow::Result<Vec<Room>> {
    let items = Entity::find()
        .filter(Column::HotelId.eq(hotel_id))
        .filter(Column::IsDeleted.eq(false))
        .order_by_asc(Column::BasePrice)
        .all(conn()?)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<Room>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn()?)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Room) -> anyhow::Result<String> {
    to_active(aggregate).insert(conn()?).await?;
    Ok(aggregate.id.clone())
}

pub async fn update(aggregate: &Room) -> anyhow::Result<()> {
    let mut active = to_active(aggregate);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()?).await?;
    Ok(())
}

pub async fn soft_delete(id: &str) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id))
        .exec(conn()?)
        .await?;
    Ok(result.rows_affected > 0)
}
