use super::repository;
use contracts::domain::a004_umrah_package::{UmrahPackage, UmrahPackageDto};

/// Создание пакета Умра
pub async fn create(dto: UmrahPackageDto) -> anyhow::Result<String> {
    let mut aggregate = UmrahPackage::new_for_insert(dto);

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    aggregate.before_write();

    repository::insert(&aggregate).await
}

pub async fn delete(id: &str) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<UmrahPackage>> {
    repository::get_by_id(id).await
}

/// Ближайшие вылеты первыми
pub async fn list_all() -> anyhow::Result<Vec<UmrahPackage>> {
    repository::list_all().await
}
