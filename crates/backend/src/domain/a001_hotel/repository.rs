use chrono::Utc;
use contracts::domain::a001_hotel::{Hotel, HotelAddress};
use contracts::domain::common::EntityMetadata;
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::{decode_list, encode_list, get_connection};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_hotel")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
    pub star_rating: f64,
    pub check_in_time: String,
    pub check_out_time: String,
    pub amenities: String,
    pub images: String,
    pub tags: String,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Hotel {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };

        Hotel {
            id: m.id,
            name: m.name,
            description: m.description,
            address: HotelAddress {
                street: m.street,
                city: m.city,
                state: m.state,
                country: m.country,
                zip_code: m.zip_code,
            },
            star_rating: m.star_rating as f32,
            check_in_time: m.check_in_time,
            check_out_time: m.check_out_time,
            amenities: decode_list(&m.amenities),
            images: decode_list(&m.images),
            tags: decode_list(&m.tags),
            data_by_api: false,
            metadata: Some(metadata),
        }
    }
}

fn conn() -> anyhow::Result<&'static DatabaseConnection> {
    get_connection()
}

fn to_active(aggregate: &Hotel) -> ActiveModel {
    let metadata = aggregate.metadata.clone().unwrap_or_default();
    ActiveModel {
        id: Set(aggregate.id.clone()),
        name: Set(aggregate.name.clone()),
        description: Set(aggregate.description.clone()),
        street: Set(aggregate.address.street.clone()),
        city: Set(aggregate.address.city.clone()),
        state: Set(aggregate.address.state.clone()),
        country: Set(aggregate.address.country.clone()),
        zip_code: Set(aggregate.address.zip_code.clone()),
        star_rating: Set(aggregate.star_rating as f64),
        check_in_time: Set(aggregate.check_in_time.clone()),
        check_out_time: Set(aggregate.check_out_time.clone()),
        amenities: Set(encode_list(&aggregate.amenities)),
        images: Set(encode_list(&aggregate.images)),
        tags: Set(encode_list(&aggregate.tags)),
        is_deleted: Set(metadata.is_deleted),
        created_at: Set(Some(metadata.created_at)),
        updated_at: Set(Some(metadata.updated_at)),
        version: Set(metadata.version),
    }
}

pub async fn list_all() -> anyhow::Result<Vec<Hotel>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_asc(Column::Name)
        .all(conn()?)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<Hotel>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn()?)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Hotel) -> anyhow::Result<String> {
    to_active(aggregate).insert(conn()?).await?;
    Ok(aggregate.id.clone())
}

pub async fn update(aggregate: &Hotel) -> anyhow::Result<()> {
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
