use chrono::{NaiveDate, Utc};
use contracts::domain::a004_umrah_package::{MealPlan, UmrahPackage};
use contracts::domain::common::EntityMetadata;
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::{decode_list, encode_list, get_connection};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a004_umrah_package")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration_days: i32,
    pub departure_city: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub price_per_person: f64,
    pub currency: String,
    pub seats: i32,
    pub makkah_hotel: String,
    pub makkah_nights: i32,
    pub madinah_hotel: String,
    pub madinah_nights: i32,
    pub visa_included: bool,
    pub flights_included: bool,
    pub transport_included: bool,
    pub meal_plan: String,
    pub inclusions: String,
    pub images: String,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn to_u32(value: i32) -> u32 {
    value.max(0) as u32
}

impl From<Model> for UmrahPackage {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };

        let meal_plan = MealPlan::from_code(&m.meal_plan).unwrap_or_else(|| {
            tracing::warn!("Unknown meal plan '{}' in package {}", m.meal_plan, m.id);
            MealPlan::None
        });

        UmrahPackage {
            id: m.id,
            title: m.title,
            description: m.description,
            duration_days: to_u32(m.duration_days),
            departure_city: m.departure_city,
            departure_date: m.departure_date,
            return_date: m.return_date,
            price_per_person: m.price_per_person,
            currency: m.currency,
            seats: to_u32(m.seats),
            makkah_hotel: m.makkah_hotel,
            makkah_nights: to_u32(m.makkah_nights),
            madinah_hotel: m.madinah_hotel,
            madinah_nights: to_u32(m.madinah_nights),
            visa_included: m.visa_included,
            flights_included: m.flights_included,
            transport_included: m.transport_included,
            meal_plan,
            inclusions: decode_list(&m.inclusions),
            images: decode_list(&m.images),
            metadata: Some(metadata),
        }
    }
}

fn conn() -> anyhow::Result<&'static DatabaseConnection> {
    get_connection()
}

pub async fn list_all() -> anyhow::Result<Vec<UmrahPackage>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_asc(Column::DepartureDate)
        .all(conn()?)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<UmrahPackage>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn()?)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &UmrahPackage) -> anyhow::Result<String> {
    let metadata = aggregate.metadata.clone().unwrap_or_default();
    let active = ActiveModel {
        id: Set(aggregate.id.clone()),
        title: Set(aggregate.title.clone()),
        description: Set(aggregate.description.clone()),
        duration_days: Set(aggregate.duration_days as i32),
        departure_city: Set(aggregate.departure_city.clone()),
        departure_date: Set(aggregate.departure_date),
        return_date: Set(aggregate.return_date),
        price_per_person: Set(aggregate.price_per_person),
        currency: Set(aggregate.currency.clone()),
        seats: Set(aggregate.seats as i32),
        makkah_hotel: Set(aggregate.makkah_hotel.clone()),
        makkah_nights: Set(aggregate.makkah_nights as i32),
        madinah_hotel: Set(aggregate.madinah_hotel.clone()),
        madinah_nights: Set(aggregate.madinah_nights as i32),
        visa_included: Set(aggregate.visa_included),
        flights_included: Set(aggregate.flights_included),
        transport_included: Set(aggregate.transport_included),
        meal_plan: Set(aggregate.meal_plan.code().to_string()),
        inclusions: Set(encode_list(&aggregate.inclusions)),
        images: Set(encode_list(&aggregate.images)),
        is_deleted: Set(metadata.is_deleted),
        created_at: Set(Some(metadata.created_at)),
        updated_at: Set(Some(metadata.updated_at)),
        version: Set(metadata.version),
    };
    active.insert(conn()?).await?;
    Ok(aggregate.id.clone())
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
