use super::repository;
use contracts::domain::a004_visit::aggregate::{Visit, VisitDto, VisitListQuery};
use uuid::Uuid;

use crate::domain::{a002_branch, a003_operator};
use crate::shared::error::{not_found_error, validation_error};

/// Branch must belong to the visit's customer and the operator must exist
async fn check_references(visit: &Visit) -> anyhow::Result<()> {
    let branch_id = Uuid::parse_str(&visit.branch_id).map_err(validation_error)?;
    let branch = a002_branch::service::get_by_id(branch_id)
        .await?
        .ok_or_else(|| validation_error("Branch not found"))?;
    if branch.customer_id != visit.customer_id {
        return Err(validation_error("Branch does not belong to the customer"));
    }

    let operator_id = Uuid::parse_str(&visit.operator_id).map_err(validation_error)?;
    if a003_operator::service::get_by_id(operator_id).await?.is_none() {
        return Err(validation_error("Operator not found"));
    }
    Ok(())
}

pub async fn create(dto: VisitDto) -> anyhow::Result<Uuid> {
    let mut aggregate = Visit::new_for_insert(&dto);

    aggregate.validate().map_err(validation_error)?;
    check_references(&aggregate).await?;
    aggregate.before_write();

    repository::insert(&aggregate).await
}

pub async fn update(dto: VisitDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| validation_error("Invalid ID"))?;

    let mut aggregate = load(id).await?;

    aggregate.update(&dto).map_err(validation_error)?;
    aggregate.validate().map_err(validation_error)?;
    check_references(&aggregate).await?;
    save(aggregate).await
}

pub async fn complete(id: Uuid) -> anyhow::Result<Visit> {
    let mut aggregate = load(id).await?;
    aggregate.complete().map_err(validation_error)?;
    let visit = aggregate.clone();
    save(aggregate).await?;
    tracing::info!("Visit {} completed", visit.base.code);
    Ok(visit)
}

pub async fn cancel(id: Uuid) -> anyhow::Result<Visit> {
    let mut aggregate = load(id).await?;
    aggregate.cancel().map_err(validation_error)?;
    let visit = aggregate.clone();
    save(aggregate).await?;
    tracing::info!("Visit {} cancelled", visit.base.code);
    Ok(visit)
}

async fn load(id: Uuid) -> anyhow::Result<Visit> {
    get_by_id(id)
        .await?
        .ok_or_else(|| not_found_error("Visit"))
}

async fn save(mut aggregate: Visit) -> anyhow::Result<()> {
    aggregate.before_write();
    aggregate.base.metadata.increment_version();
    repository::update(&aggregate).await
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Visit>> {
    Ok(repository::get_by_id(id)
        .await?
        .filter(|v| !v.base.metadata.is_deleted))
}

pub async fn list(query: &VisitListQuery) -> anyhow::Result<Vec<Visit>> {
    repository::list(query).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures;
    use crate::shared::data::db::test_support::with_database;
    use crate::shared::error::from_service;
    use axum::http::StatusCode;
    use contracts::domain::a004_visit::aggregate::VisitStatus;

    #[test]
    fn test_upsert_cannot_complete_cancelled_visit() {
        with_database(async {
            let customer = fixtures::customer(None).await;
            let branch = fixtures::branch(&customer).await;
            let operator = fixtures::operator("Deniz Yilmaz", true).await;
            let at = "2030-06-02T08:00:00Z";
            let id = fixtures::visit(&customer, &branch, &operator, at, VisitStatus::Planned).await;
            let id = Uuid::parse_str(&id).unwrap();

            cancel(id).await.unwrap();

            let mut dto = fixtures::visit_dto(&customer, &branch, &operator, at, VisitStatus::Completed);
            dto.id = Some(id.to_string());
            let err = from_service(update(dto).await.unwrap_err());
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);

            let stored = get_by_id(id).await.unwrap().unwrap();
            assert_eq!(stored.status, VisitStatus::Cancelled);
        });
    }

    #[test]
    fn test_transitions_on_missing_visit_are_not_found() {
        with_database(async {
            let err = from_service(complete(Uuid::new_v4()).await.unwrap_err());
            assert_eq!(err.status(), StatusCode::NOT_FOUND);
            assert_eq!(err.to_string(), "Visit not found");

            let err = from_service(cancel(Uuid::new_v4()).await.unwrap_err());
            assert_eq!(err.status(), StatusCode::NOT_FOUND);
        });
    }
}
