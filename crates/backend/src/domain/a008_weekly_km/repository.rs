use chrono::{NaiveDate, Utc};
use contracts::domain::a008_weekly_km::aggregate::{WeeklyKm, WeeklyKmId};
use contracts::domain::common::{AggregateId, BaseAggregate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::domain::common::{metadata_from_row, parse_stored_id};
use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a008_weekly_km")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub operator_id: String,
    pub week_start: NaiveDate,
    pub vehicle_plate: Option<String>,
    pub start_km: i64,
    pub end_km: i64,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for WeeklyKm {
    fn from(m: Model) -> Self {
        let metadata = metadata_from_row(m.created_at, m.updated_at, m.is_deleted, m.version);

        WeeklyKm {
            base: BaseAggregate::with_metadata(
                WeeklyKmId(parse_stored_id(&m.id)),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            operator_id: m.operator_id,
            week_start: m.week_start,
            vehicle_plate: m.vehicle_plate,
            start_km: m.start_km,
            end_km: m.end_km,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(aggregate: &WeeklyKm) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.as_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        operator_id: Set(aggregate.operator_id.clone()),
        week_start: Set(aggregate.week_start),
        vehicle_plate: Set(aggregate.vehicle_plate.clone()),
        start_km: Set(aggregate.start_km),
        end_km: Set(aggregate.end_km),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

pub async fn list(operator_id: Option<&str>) -> anyhow::Result<Vec<WeeklyKm>> {
    let mut select = Entity::find().filter(Column::IsDeleted.eq(false));
    if let Some(operator_id) = operator_id {
        select = select.filter(Column::OperatorId.eq(operator_id));
    }
    let items = select
        .order_by_desc(Column::WeekStart)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn find_for_week(operator_id: &str, week_start: NaiveDate) -> anyhow::Result<Option<WeeklyKm>> {
    let result = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::OperatorId.eq(operator_id))
        .filter(Column::WeekStart.eq(week_start))
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<WeeklyKm>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &WeeklyKm) -> anyhow::Result<Uuid> {
    to_active(aggregate).insert(conn()).await?;
    Ok(aggregate.base.id.value())
}

pub async fn update(aggregate: &WeeklyKm) -> anyhow::Result<()> {
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
