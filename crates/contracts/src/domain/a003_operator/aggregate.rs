use crate::domain::common::base_aggregate::{generate_code, normalize_opt};
use crate::domain::common::BaseAggregate;
use crate::{define_aggregate_id, impl_aggregate_root};
use serde::{Deserialize, Serialize};

define_aggregate_id!(OperatorId);

/// Field technician performing visits. `description` holds the full name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operator {
    #[serde(flatten)]
    pub base: BaseAggregate<OperatorId>,

    /// Login account (sys_users.id), if the operator uses the app
    pub user_id: Option<String>,
    pub phone: Option<String>,
    pub vehicle_plate: Option<String>,
    pub is_active: bool,
}

impl Operator {
    pub fn new_for_insert(dto: &OperatorDto) -> Self {
        let code = normalize_opt(dto.code.clone()).unwrap_or_else(|| generate_code("OP"));
        let mut base = BaseAggregate::new(OperatorId::new_v4(), code, dto.description.clone());
        base.comment = dto.comment.clone();

        Self {
            base,
            user_id: normalize_opt(dto.user_id.clone()),
            phone: normalize_opt(dto.phone.clone()),
            vehicle_plate: normalize_opt(dto.vehicle_plate.clone()).map(|p| p.to_uppercase()),
            is_active: dto.is_active.unwrap_or(true),
        }
    }

    pub fn update(&mut self, dto: &OperatorDto) {
        if let Some(code) = normalize_opt(dto.code.clone()) {
            self.base.code = code;
        }
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
        self.user_id = normalize_opt(dto.user_id.clone());
        self.phone = normalize_opt(dto.phone.clone());
        self.vehicle_plate = normalize_opt(dto.vehicle_plate.clone()).map(|p| p.to_uppercase());
        if let Some(active) = dto.is_active {
            self.is_active = active;
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.base.validate()
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl_aggregate_root!(Operator, OperatorId, "a003", "operator", "Operator");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperatorDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    pub comment: Option<String>,
    pub user_id: Option<String>,
    pub phone: Option<String>,
    pub vehicle_plate: Option<String>,
    pub is_active: Option<bool>,
}
