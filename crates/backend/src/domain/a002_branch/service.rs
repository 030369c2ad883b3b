use super::repository;
use contracts::domain::a002_branch::aggregate::{Branch, BranchDto};
use uuid::Uuid;

use crate::domain::a001_customer;
use crate::shared::error::{not_found_error, validation_error};

/// The owning customer must exist and not be deleted
async fn ensure_customer(customer_id: &str) -> anyhow::Result<()> {
    let id = Uuid::parse_str(customer_id).map_err(|_| validation_error("customer_id must be a valid id"))?;
    match a001_customer::service::get_by_id(id).await? {
        Some(_) => Ok(()),
        None => Err(validation_error("Customer not found")),
    }
}

pub async fn create(dto: BranchDto) -> anyhow::Result<Uuid> {
    let mut aggregate = Branch::new_for_insert(&dto);

    aggregate.validate().map_err(validation_error)?;
    ensure_customer(&aggregate.customer_id).await?;
    aggregate.before_write();

    repository::insert(&aggregate).await
}

pub async fn update(dto: BranchDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| validation_error("Invalid ID"))?;

    let mut aggregate = get_by_id(id)
        .await?
        .ok_or_else(|| not_found_error("Branch"))?;

    aggregate.update(&dto);
    aggregate.validate().map_err(validation_error)?;
    ensure_customer(&aggregate.customer_id).await?;
    aggregate.before_write();
    aggregate.base.metadata.increment_version();

    repository::update(&aggregate).await
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Branch>> {
    Ok(repository::get_by_id(id)
        .await?
        .filter(|b| !b.base.metadata.is_deleted))
}

pub async fn list_all() -> anyhow::Result<Vec<Branch>> {
    repository::list_all().await
}

pub async fn list_by_customer(customer_id: Uuid) -> anyhow::Result<Vec<Branch>> {
    repository::list_by_customer(&customer_id.to_string()).await
}
