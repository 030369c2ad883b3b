//! Seed records for database-backed tests

use contracts::domain::a001_customer::aggregate::CustomerDto;
use contracts::domain::a002_branch::aggregate::BranchDto;
use contracts::domain::a003_operator::aggregate::OperatorDto;
use contracts::domain::a004_visit::aggregate::{VisitDto, VisitStatus};
use contracts::domain::a006_material_sale::aggregate::{MaterialSaleDto, SaleLine};
use uuid::Uuid;

use super::{a001_customer, a002_branch, a003_operator, a004_visit, a006_material_sale};

pub async fn customer(monthly_price: Option<f64>) -> String {
    a001_customer::service::create(CustomerDto {
        id: None,
        code: None,
        description: "Harbor Bakery".into(),
        comment: None,
        email: None,
        phone: None,
        tax_number: None,
        monthly_price,
        per_visit_price: None,
    })
    .await
    .unwrap()
    .to_string()
}

pub async fn branch(customer_id: &str) -> String {
    a002_branch::service::create(BranchDto {
        id: None,
        code: None,
        description: "Harbor Bakery, main street".into(),
        comment: None,
        customer_id: customer_id.to_string(),
        address: None,
        latitude: None,
        longitude: None,
        monthly_price: None,
        per_visit_price: None,
    })
    .await
    .unwrap()
    .to_string()
}

pub async fn operator(name: &str, is_active: bool) -> String {
    a003_operator::service::create(OperatorDto {
        id: None,
        code: None,
        description: name.to_string(),
        comment: None,
        user_id: None,
        phone: None,
        vehicle_plate: Some("34 ABC 123".into()),
        is_active: Some(is_active),
    })
    .await
    .unwrap()
    .to_string()
}

pub fn visit_dto(
    customer_id: &str,
    branch_id: &str,
    operator_id: &str,
    at: &str,
    status: VisitStatus,
) -> VisitDto {
    VisitDto {
        id: None,
        code: None,
        description: String::new(),
        comment: None,
        customer_id: customer_id.to_string(),
        branch_id: branch_id.to_string(),
        operator_id: operator_id.to_string(),
        status: Some(status),
        visit_date: at.parse().unwrap(),
        notes: None,
    }
}

pub async fn visit(
    customer_id: &str,
    branch_id: &str,
    operator_id: &str,
    at: &str,
    status: VisitStatus,
) -> String {
    a004_visit::service::create(visit_dto(customer_id, branch_id, operator_id, at, status))
        .await
        .unwrap()
        .to_string()
}

pub async fn sale(visit_id: &str, amount: f64) -> Uuid {
    a006_material_sale::service::create(MaterialSaleDto {
        id: None,
        code: None,
        description: String::new(),
        comment: None,
        visit_id: visit_id.to_string(),
        lines: vec![SaleLine {
            product_id: Uuid::new_v4().to_string(),
            quantity: 1.0,
            unit_price: amount,
        }],
    })
    .await
    .unwrap()
}
