use super::repository;
use contracts::domain::a009_corrective_action::aggregate::{CorrectiveAction, CorrectiveActionDto};
use uuid::Uuid;

use crate::domain::a001_customer;
use crate::shared::error::{not_found_error, validation_error};

pub async fn create(dto: CorrectiveActionDto) -> anyhow::Result<Uuid> {
    let mut aggregate = CorrectiveAction::new_for_insert(&dto);

    aggregate.validate().map_err(validation_error)?;
    let customer_id = Uuid::parse_str(&aggregate.customer_id).map_err(validation_error)?;
    if a001_customer::service::get_by_id(customer_id).await?.is_none() {
        return Err(validation_error("Customer not found"));
    }
    aggregate.before_write();

    repository::insert(&aggregate).await
}

pub async fn update(dto: CorrectiveActionDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| validation_error("Invalid ID"))?;

    let mut aggregate = get_by_id(id)
        .await?
        .ok_or_else(|| not_found_error("Corrective action"))?;

    aggregate.update(&dto);
    aggregate.validate().map_err(validation_error)?;
    aggregate.before_write();
    aggregate.base.metadata.increment_version();

    repository::update(&aggregate).await
}

/// Admin tick-off; returns the updated record
pub async fn set_checked(id: Uuid, checked: bool) -> anyhow::Result<Option<CorrectiveAction>> {
    let Some(mut aggregate) = get_by_id(id).await? else {
        return Ok(None);
    };

    aggregate.set_checked(checked);
    aggregate.before_write();
    aggregate.base.metadata.increment_version();
    repository::update(&aggregate).await?;

    tracing::info!(
        "Corrective action {} marked {}",
        aggregate.base.code,
        if checked { "checked" } else { "open" }
    );
    Ok(Some(aggregate))
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<CorrectiveAction>> {
    Ok(repository::get_by_id(id)
        .await?
        .filter(|a| !a.base.metadata.is_deleted))
}

pub async fn list(customer_id: Option<Uuid>) -> anyhow::Result<Vec<CorrectiveAction>> {
    let customer_id = customer_id.map(|id| id.to_string());
    repository::list(customer_id.as_deref()).await
}
