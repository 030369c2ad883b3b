use super::repository;
use contracts::domain::a001_customer::aggregate::{Customer, CustomerDto};
use uuid::Uuid;

use crate::shared::error::{not_found_error, validation_error};

pub async fn create(dto: CustomerDto) -> anyhow::Result<Uuid> {
    let mut aggregate = Customer::new_for_insert(&dto);

    aggregate.validate().map_err(validation_error)?;
    aggregate.before_write();

    let id = repository::insert(&aggregate).await?;
    tracing::info!("Customer {} created ({})", aggregate.base.code, id);
    Ok(id)
}

pub async fn update(dto: CustomerDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| validation_error("Invalid ID"))?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .filter(|c| !c.base.metadata.is_deleted)
        .ok_or_else(|| not_found_error("Customer"))?;

    aggregate.update(&dto);
    aggregate.validate().map_err(validation_error)?;
    aggregate.before_write();
    aggregate.base.metadata.increment_version();

    repository::update(&aggregate).await
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Customer>> {
    Ok(repository::get_by_id(id)
        .await?
        .filter(|c| !c.base.metadata.is_deleted))
}

pub async fn list_all() -> anyhow::Result<Vec<Customer>> {
    repository::list_all().await
}
