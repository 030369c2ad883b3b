use chrono::{DateTime, NaiveDate, Utc};
use contracts::domain::a004_visit::aggregate::{Visit, VisitId, VisitListQuery, VisitStatus};
use contracts::domain::common::{AggregateId, BaseAggregate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::domain::common::{metadata_from_row, parse_stored_id};
use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a004_visit")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub customer_id: String,
    pub branch_id: String,
    pub operator_id: String,
    pub status: String,
    pub visit_date: chrono::DateTime<chrono::Utc>,
    pub notes: Option<String>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Visit {
    fn from(m: Model) -> Self {
        let metadata = metadata_from_row(m.created_at, m.updated_at, m.is_deleted, m.version);
        let status = m.status.parse::<VisitStatus>().unwrap_or_else(|e| {
            tracing::warn!("Visit {}: {}", m.id, e);
            VisitStatus::Planned
        });

        Visit {
            base: BaseAggregate::with_metadata(
                VisitId(parse_stored_id(&m.id)),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            customer_id: m.customer_id,
            branch_id: m.branch_id,
            operator_id: m.operator_id,
            status,
            visit_date: m.visit_date,
            notes: m.notes,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(aggregate: &Visit) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.as_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        customer_id: Set(aggregate.customer_id.clone()),
        branch_id: Set(aggregate.branch_id.clone()),
        operator_id: Set(aggregate.operator_id.clone()),
        status: Set(aggregate.status.as_str().to_string()),
        visit_date: Set(aggregate.visit_date),
        notes: Set(aggregate.notes.clone()),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

/// Start of the given day in UTC
fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc()
}

pub async fn list(query: &VisitListQuery) -> anyhow::Result<Vec<Visit>> {
    let mut select = Entity::find().filter(Column::IsDeleted.eq(false));

    if let Some(from) = query.date_from {
        select = select.filter(Column::VisitDate.gte(day_start(from)));
    }
    if let Some(to) = query.date_to.and_then(|d| d.succ_opt()) {
        select = select.filter(Column::VisitDate.lt(day_start(to)));
    }
    if let Some(operator_id) = query.operator_id.as_deref().filter(|s| !s.is_empty()) {
        select = select.filter(Column::OperatorId.eq(operator_id));
    }
    if let Some(status) = query.status {
        select = select.filter(Column::Status.eq(status.as_str()));
    }

    let items = select
        .order_by_asc(Column::VisitDate)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Visit>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Visit) -> anyhow::Result<Uuid> {
    to_active(aggregate).insert(conn()).await?;
    Ok(aggregate.base.id.value())
}

pub async fn update(aggregate: &Visit) -> anyhow::Result<()> {
    let mut active = to_active(aggregate);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}

pub async fn soft_delete(id: Uuid) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.to_string()))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_start_is_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(day_start(date).to_rfc3339(), "2025-03-10T00:00:00+00:00");
    }
}
