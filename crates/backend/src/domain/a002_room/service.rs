use super::repository;
use contracts::domain::a002_room::{Room, RoomDto};

/// Создание номера
pub async fn create(dto: RoomDto) -> anyhow::Result<String> {
    let mut aggregate = Room::new_for_insert(dto);

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    aggregate.before_write();

    repository::insert(&aggregate).await
}

/// Обновление номера
pub async fn update(dto: RoomDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("Invalid ID"))?;

    let mut aggregate = repository::get_by_id(&id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Not found"))?;

    aggregate.update(&dto);

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    aggregate.before_write();

    repository::update(&aggregate).await
}

pub async fn delete(id: &str) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<Room>> {
    repository::get_by_id(id).await
}

/// Номера отеля, от дешёвых к дорогим
pub async fn list_by_hotel(hotel_id: &str) -> anyhow::Result<Vec<Room>> {
    repository::list_by_hotel(hotel_id).await
}
