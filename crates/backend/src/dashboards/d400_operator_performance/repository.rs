use anyhow::Result;
use contracts::domain::common::Pricing;
use sea_orm::{FromQueryResult, Statement, Value};
use serde::{Deserialize, Serialize};

use crate::shared::data::db::get_connection;

/// Completed visit reduced to what the report joins on
#[derive(Debug, Clone, Serialize, Deserialize, FromQueryResult)]
pub struct VisitRow {
    pub visit_id: String,
    pub operator_id: String,
    pub branch_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromQueryResult)]
pub struct SaleRow {
    pub visit_id: String,
    pub total_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromQueryResult)]
pub struct BranchPriceRow {
    pub branch_id: String,
    pub customer_id: String,
    pub monthly_price: Option<f64>,
    pub per_visit_price: Option<f64>,
}

impl BranchPriceRow {
    pub fn pricing(&self) -> Pricing {
        Pricing::new(self.monthly_price, self.per_visit_price)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromQueryResult)]
pub struct CustomerPriceRow {
    pub customer_id: String,
    pub monthly_price: Option<f64>,
    pub per_visit_price: Option<f64>,
}

impl CustomerPriceRow {
    pub fn pricing(&self) -> Pricing {
        Pricing::new(self.monthly_price, self.per_visit_price)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromQueryResult)]
pub struct OperatorRow {
    pub operator_id: String,
    pub operator_name: String,
    pub is_active: bool,
}

fn statement(sql: &str, values: Vec<Value>) -> Statement {
    Statement::from_sql_and_values(sea_orm::DatabaseBackend::Sqlite, sql, values)
}

/// Completed visits dated within [date_from, date_to]
pub async fn get_completed_visits(
    date_from: &str,
    date_to: &str,
    operator_id: Option<&str>,
) -> Result<Vec<VisitRow>> {
    let db = get_connection();

    let mut sql = String::from(
        r#"
        SELECT
            v.id AS visit_id,
            v.operator_id,
            v.branch_id
        FROM a004_visit v
        WHERE v.is_deleted = 0
            AND v.status = 'completed'
            AND substr(v.visit_date, 1, 10) >= ?
            AND substr(v.visit_date, 1, 10) <= ?
        "#,
    );
    let mut values: Vec<Value> = vec![date_from.into(), date_to.into()];
    if let Some(operator_id) = operator_id {
        sql.push_str(" AND v.operator_id = ?");
        values.push(operator_id.into());
    }

    let rows = VisitRow::find_by_statement(statement(&sql, values))
        .all(db)
        .await?;
    Ok(rows)
}

/// Sales on any visit dated in the period; attribution happens in memory
pub async fn get_sales_in_period(date_from: &str, date_to: &str) -> Result<Vec<SaleRow>> {
    let db = get_connection();

    let sql = r#"
        SELECT
            s.visit_id,
            s.total_amount
        FROM a006_material_sale s
        JOIN a004_visit v ON v.id = s.visit_id
        WHERE s.is_deleted = 0
            AND v.is_deleted = 0
            AND substr(v.visit_date, 1, 10) >= ?
            AND substr(v.visit_date, 1, 10) <= ?
    "#;

    let rows = SaleRow::find_by_statement(statement(sql, vec![date_from.into(), date_to.into()]))
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn get_branch_prices() -> Result<Vec<BranchPriceRow>> {
    let db = get_connection();

    let sql = r#"
        SELECT
            id AS branch_id,
            customer_id,
            monthly_price,
            per_visit_price
        FROM a002_branch
        WHERE is_deleted = 0
    "#;

    let rows = BranchPriceRow::find_by_statement(statement(sql, vec![]))
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn get_customer_prices() -> Result<Vec<CustomerPriceRow>> {
    let db = get_connection();

    let sql = r#"
        SELECT
            id AS customer_id,
            monthly_price,
            per_visit_price
        FROM a001_customer
        WHERE is_deleted = 0
    "#;

    let rows = CustomerPriceRow::find_by_statement(statement(sql, vec![]))
        .all(db)
        .await?;
    Ok(rows)
}

/// Operator directory; a filter narrows it to one operator
pub async fn get_operators(operator_id: Option<&str>) -> Result<Vec<OperatorRow>> {
    let db = get_connection();

    let mut sql = String::from(
        r#"
        SELECT
            id AS operator_id,
            description AS operator_name,
            is_active
        FROM a003_operator
        WHERE is_deleted = 0
        "#,
    );
    let mut values: Vec<Value> = Vec::new();
    if let Some(operator_id) = operator_id {
        sql.push_str(" AND id = ?");
        values.push(operator_id.into());
    }
    sql.push_str(" ORDER BY description");

    let rows = OperatorRow::find_by_statement(statement(&sql, values))
        .all(db)
        .await?;
    Ok(rows)
}
