use super::repository;
use contracts::domain::a008_weekly_km::aggregate::{WeeklyKm, WeeklyKmDto};
use uuid::Uuid;

use crate::domain::a003_operator;
use crate::shared::error::{not_found_error, validation_error};

/// One entry per operator and week
async fn check_unique_week(aggregate: &WeeklyKm) -> anyhow::Result<()> {
    if let Some(existing) =
        repository::find_for_week(&aggregate.operator_id, aggregate.week_start).await?
    {
        if existing.base.id != aggregate.base.id {
            return Err(validation_error(format!(
                "Week {} already recorded for this operator",
                aggregate.week_start
            )));
        }
    }
    Ok(())
}

/// Operator must exist; its plate fills a missing one
async fn resolve_operator(aggregate: &mut WeeklyKm) -> anyhow::Result<()> {
    let operator_id = Uuid::parse_str(&aggregate.operator_id).map_err(validation_error)?;
    let operator = a003_operator::service::get_by_id(operator_id)
        .await?
        .ok_or_else(|| validation_error("Operator not found"))?;
    if aggregate.vehicle_plate.is_none() {
        aggregate.vehicle_plate = operator.vehicle_plate;
    }
    Ok(())
}

pub async fn create(dto: WeeklyKmDto) -> anyhow::Result<Uuid> {
    let mut aggregate = WeeklyKm::new_for_insert(&dto);

    aggregate.validate().map_err(validation_error)?;
    resolve_operator(&mut aggregate).await?;
    check_unique_week(&aggregate).await?;
    aggregate.before_write();

    repository::insert(&aggregate).await
}

pub async fn update(dto: WeeklyKmDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| validation_error("Invalid ID"))?;

    let mut aggregate = get_by_id(id)
        .await?
        .ok_or_else(|| not_found_error("Weekly km entry"))?;

    aggregate.update(&dto);
    aggregate.validate().map_err(validation_error)?;
    resolve_operator(&mut aggregate).await?;
    check_unique_week(&aggregate).await?;
    aggregate.before_write();
    aggregate.base.metadata.increment_version();

    repository::update(&aggregate).await
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<WeeklyKm>> {
    Ok(repository::get_by_id(id)
        .await?
        .filter(|e| !e.base.metadata.is_deleted))
}

pub async fn list(operator_id: Option<Uuid>) -> anyhow::Result<Vec<WeeklyKm>> {
    let operator_id = operator_id.map(|id| id.to_string());
    repository::list(operator_id.as_deref()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures;
    use crate::shared::data::db::test_support::with_database;
    use crate::shared::error::from_service;
    use axum::http::StatusCode;
    use chrono::NaiveDate;

    fn entry(operator_id: &str) -> WeeklyKmDto {
        WeeklyKmDto {
            id: None,
            code: None,
            comment: None,
            operator_id: operator_id.to_string(),
            week_start: NaiveDate::from_ymd_opt(2030, 9, 2).unwrap(),
            vehicle_plate: None,
            start_km: 12_000,
            end_km: 12_480,
        }
    }

    #[test]
    fn test_update_requires_existing_operator() {
        with_database(async {
            let operator = fixtures::operator("Elif Sahin", true).await;
            let id = create(entry(&operator)).await.unwrap();

            let stored = get_by_id(id).await.unwrap().unwrap();
            assert_eq!(stored.vehicle_plate.as_deref(), Some("34 ABC 123"));

            let mut dto = entry(&Uuid::new_v4().to_string());
            dto.id = Some(id.to_string());
            let err = from_service(update(dto).await.unwrap_err());
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
            assert_eq!(err.to_string(), "Operator not found");

            let stored = get_by_id(id).await.unwrap().unwrap();
            assert_eq!(stored.operator_id, operator);
        });
    }

    #[test]
    fn test_update_of_missing_entry_is_not_found() {
        with_database(async {
            let operator = fixtures::operator("Fatma Oz", true).await;
            let mut dto = entry(&operator);
            dto.id = Some(Uuid::new_v4().to_string());
            let err = from_service(update(dto).await.unwrap_err());
            assert_eq!(err.status(), StatusCode::NOT_FOUND);
            assert_eq!(err.to_string(), "Weekly km entry not found");
        });
    }
}
