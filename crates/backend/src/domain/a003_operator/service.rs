use super::repository;
use contracts::domain::a003_operator::aggregate::{Operator, OperatorDto};
use uuid::Uuid;

use crate::shared::error::{not_found_error, validation_error};

pub async fn create(dto: OperatorDto) -> anyhow::Result<Uuid> {
    let mut aggregate = Operator::new_for_insert(&dto);

    aggregate.validate().map_err(validation_error)?;
    ensure_login_free(&aggregate).await?;
    aggregate.before_write();

    repository::insert(&aggregate).await
}

pub async fn update(dto: OperatorDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| validation_error("Invalid ID"))?;

    let mut aggregate = get_by_id(id)
        .await?
        .ok_or_else(|| not_found_error("Operator"))?;

    aggregate.update(&dto);
    aggregate.validate().map_err(validation_error)?;
    ensure_login_free(&aggregate).await?;
    aggregate.before_write();
    aggregate.base.metadata.increment_version();

    repository::update(&aggregate).await
}

/// One login account maps to at most one operator
async fn ensure_login_free(aggregate: &Operator) -> anyhow::Result<()> {
    let Some(user_id) = aggregate.user_id.as_deref() else {
        return Ok(());
    };
    if let Some(existing) = repository::get_by_user_id(user_id).await? {
        if existing.base.id != aggregate.base.id {
            return Err(validation_error(format!(
                "User is already linked to operator {}",
                existing.base.description
            )));
        }
    }
    Ok(())
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Operator>> {
    Ok(repository::get_by_id(id)
        .await?
        .filter(|o| !o.base.metadata.is_deleted))
}

pub async fn list_all() -> anyhow::Result<Vec<Operator>> {
    repository::list_all().await
}
