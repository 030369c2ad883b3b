use anyhow::Result;
use sea_orm::{FromQueryResult, Statement, Value};
use serde::{Deserialize, Serialize};

use crate::shared::data::db::get_connection;

/// One weekly odometer entry with the operator's name attached
#[derive(Debug, Clone, Serialize, Deserialize, FromQueryResult)]
pub struct KmEntryRow {
    pub operator_id: String,
    pub operator_name: Option<String>,
    pub start_km: i64,
    pub end_km: i64,
}

pub async fn get_entries(
    date_from: &str,
    date_to: &str,
    operator_id: Option<&str>,
) -> Result<Vec<KmEntryRow>> {
    let db = get_connection();

    let mut sql = String::from(
        r#"
        SELECT
            km.operator_id,
            op.description AS operator_name,
            km.start_km,
            km.end_km
        FROM a008_weekly_km km
        LEFT JOIN a003_operator op ON op.id = km.operator_id
        WHERE km.is_deleted = 0
            AND km.week_start >= ?
            AND km.week_start <= ?
        "#,
    );
    let mut values: Vec<Value> = vec![date_from.into(), date_to.into()];
    if let Some(operator_id) = operator_id {
        sql.push_str(" AND km.operator_id = ?");
        values.push(operator_id.into());
    }

    let stmt = Statement::from_sql_and_values(sea_orm::DatabaseBackend::Sqlite, &sql, values);
    let rows = KmEntryRow::find_by_statement(stmt).all(db).await?;
    Ok(rows)
}
