use super::repository;
use contracts::domain::a001_hotel::{Hotel, HotelDto};
use contracts::shared::pagination::PaginatedResponse;
use contracts::shared::search_filter::SearchFilter;

/// Создание нового отеля
pub async fn create(dto: HotelDto) -> anyhow::Result<String> {
    let mut aggregate = Hotel::new_for_insert(dto);

    // Валидация
    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    aggregate.before_write();

    repository::insert(&aggregate).await
}

/// Обновление существующего отеля
pub async fn update(dto: HotelDto) -> anyhow::Result<()> {
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

/// Мягкое удаление
pub async fn delete(id: &str) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<Hotel>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<Hotel>> {
    repository::list_all().await
}

/// Поиск локальных отелей по фильтру списка
pub async fn search(filter: &SearchFilter) -> anyhow::Result<PaginatedResponse<Hotel>> {
    let hotels = repository::list_all().await?;
    Ok(apply_filter(hotels, filter))
}

/// Фильтры по направлению и звёздам, затем нужная страница
pub fn apply_filter(hotels: Vec<Hotel>, filter: &SearchFilter) -> PaginatedResponse<Hotel> {
    let destination = filter.destination.as_deref().unwrap_or("");
    let min_stars = filter.min_stars.map(f32::from).unwrap_or(0.0);

    let matched: Vec<Hotel> = hotels
        .into_iter()
        .filter(|h| h.matches_destination(destination))
        .filter(|h| h.star_rating >= min_stars)
        .collect();

    PaginatedResponse::from_full_list(matched, filter.page, filter.page_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_hotel::HotelAddress;

    fn hotel(name: &str, city: &str, stars: f32) -> Hotel {
        Hotel::new_for_insert(HotelDto {
            name: name.into(),
            address: HotelAddress {
                city: city.into(),
                country: "Saudi Arabia".into(),
                ..Default::default()
            },
            star_rating: stars,
            ..Default::default()
        })
    }

    fn catalog() -> Vec<Hotel> {
        vec![
            hotel("Hilton Suites", "Makkah", 5.0),
            hotel("Elaf Kinda", "Makkah", 4.0),
            hotel("Pullman Zamzam", "Madinah", 5.0),
            hotel("Budget Inn", "Makkah", 2.0),
        ]
    }

    #[test]
    fn test_filter_by_destination_and_stars() {
        let filter = SearchFilter {
            destination: Some("makkah".into()),
            min_stars: Some(4),
            ..Default::default()
        };
        let page = apply_filter(catalog(), &filter);
        assert_eq!(page.total, 2);
        let names: Vec<_> = page.items.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Hilton Suites", "Elaf Kinda"]);
    }

    #[test]
    fn test_empty_filter_pages_everything() {
        let filter = SearchFilter {
            page: 1,
            page_size: 3,
            ..Default::default()
        };
        let page = apply_filter(catalog(), &filter);
        assert_eq!(page.total, 4);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Budget Inn");
    }
}
