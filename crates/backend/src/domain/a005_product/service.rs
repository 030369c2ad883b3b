use super::repository;
use contracts::domain::a005_product::aggregate::{Product, ProductDto};
use uuid::Uuid;

use crate::shared::error::{not_found_error, validation_error};

pub async fn create(dto: ProductDto) -> anyhow::Result<Uuid> {
    let mut aggregate = Product::new_for_insert(&dto);

    aggregate.validate().map_err(validation_error)?;
    aggregate.before_write();

    repository::insert(&aggregate).await
}

pub async fn update(dto: ProductDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| validation_error("Invalid ID"))?;

    let mut aggregate = get_by_id(id)
        .await?
        .ok_or_else(|| not_found_error("Product"))?;

    aggregate.update(&dto);
    aggregate.validate().map_err(validation_error)?;
    aggregate.before_write();
    aggregate.base.metadata.increment_version();

    repository::update(&aggregate).await
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Product>> {
    Ok(repository::get_by_id(id)
        .await?
        .filter(|p| !p.base.metadata.is_deleted))
}

pub async fn list_all() -> anyhow::Result<Vec<Product>> {
    repository::list_all().await
}
