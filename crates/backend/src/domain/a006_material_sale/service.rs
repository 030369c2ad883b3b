use super::repository;
use contracts::domain::a006_material_sale::aggregate::{MaterialSale, MaterialSaleDto};
use uuid::Uuid;

use crate::domain::a004_visit;
use crate::shared::error::{not_found_error, validation_error};

async fn ensure_visit(visit_id: &str) -> anyhow::Result<()> {
    let id = Uuid::parse_str(visit_id).map_err(|_| validation_error("visit_id must be a valid id"))?;
    if a004_visit::service::get_by_id(id).await?.is_none() {
        return Err(validation_error("Visit not found"));
    }
    Ok(())
}

pub async fn create(dto: MaterialSaleDto) -> anyhow::Result<Uuid> {
    let mut aggregate = MaterialSale::new_for_insert(&dto);

    aggregate.validate().map_err(validation_error)?;
    ensure_visit(&aggregate.visit_id).await?;
    aggregate.before_write();

    let id = repository::insert(&aggregate).await?;
    tracing::info!(
        "Material sale {} for visit {}: {:.2}",
        aggregate.base.code,
        aggregate.visit_id,
        aggregate.total_amount
    );
    Ok(id)
}

pub async fn update(dto: MaterialSaleDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| validation_error("Invalid ID"))?;

    let mut aggregate = get_by_id(id)
        .await?
        .ok_or_else(|| not_found_error("Material sale"))?;

    aggregate.update(&dto);
    aggregate.validate().map_err(validation_error)?;
    ensure_visit(&aggregate.visit_id).await?;
    aggregate.before_write();
    aggregate.base.metadata.increment_version();

    repository::update(&aggregate).await
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<MaterialSale>> {
    Ok(repository::get_by_id(id)
        .await?
        .filter(|s| !s.base.metadata.is_deleted))
}

pub async fn list_all() -> anyhow::Result<Vec<MaterialSale>> {
    repository::list_all().await
}

pub async fn list_by_visit(visit_id: Uuid) -> anyhow::Result<Vec<MaterialSale>> {
    repository::list_by_visit(&visit_id.to_string()).await
}
