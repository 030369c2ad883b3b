use crate::domain::common::base_aggregate::{generate_code, normalize_opt};
use crate::domain::common::BaseAggregate;
use crate::{define_aggregate_id, impl_aggregate_root};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

define_aggregate_id!(CorrectiveActionId);

/// Non-compliance record (DÖF): a finding at a customer site and the
/// corrective/preventive action agreed for it. An admin ticks it off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectiveAction {
    #[serde(flatten)]
    pub base: BaseAggregate<CorrectiveActionId>,

    pub customer_id: String,
    pub branch_id: Option<String>,
    pub finding: String,
    pub action: String,
    pub due_date: Option<NaiveDate>,
    pub checked: bool,
    pub checked_at: Option<DateTime<Utc>>,
}

impl CorrectiveAction {
    pub fn new_for_insert(dto: &CorrectiveActionDto) -> Self {
        let code = normalize_opt(dto.code.clone()).unwrap_or_else(|| generate_code("DOF"));
        let mut base =
            BaseAggregate::new(CorrectiveActionId::new_v4(), code, dto.description.clone());
        base.comment = dto.comment.clone();

        Self {
            base,
            customer_id: dto.customer_id.clone(),
            branch_id: normalize_opt(dto.branch_id.clone()),
            finding: dto.finding.clone(),
            action: dto.action.clone(),
            due_date: dto.due_date,
            checked: false,
            checked_at: None,
        }
    }

    pub fn update(&mut self, dto: &CorrectiveActionDto) {
        if let Some(code) = normalize_opt(dto.code.clone()) {
            self.base.code = code;
        }
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
        self.customer_id = dto.customer_id.clone();
        self.branch_id = normalize_opt(dto.branch_id.clone());
        self.finding = dto.finding.clone();
        self.action = dto.action.clone();
        self.due_date = dto.due_date;
    }

    pub fn set_checked(&mut self, checked: bool) {
        if checked && !self.checked {
            self.checked_at = Some(Utc::now());
        } else if !checked {
            self.checked_at = None;
        }
        self.checked = checked;
    }

    pub fn validate(&self) -> Result<(), String> {
        self.base.validate()?;
        if uuid::Uuid::parse_str(&self.customer_id).is_err() {
            return Err("Record must reference a customer".into());
        }
        if self.finding.trim().is_empty() {
            return Err("Finding cannot be empty".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl_aggregate_root!(
    CorrectiveAction,
    CorrectiveActionId,
    "a009",
    "corrective_action",
    "Corrective action"
);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrectiveActionDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    pub comment: Option<String>,
    pub customer_id: String,
    pub branch_id: Option<String>,
    pub finding: String,
    #[serde(default)]
    pub action: String,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetCheckedRequest {
    pub checked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_checked_tracks_timestamp() {
        let dto = CorrectiveActionDto {
            description: "Rodent activity in storage".into(),
            customer_id: uuid::Uuid::new_v4().to_string(),
            finding: "Droppings near pallets".into(),
            ..Default::default()
        };
        let mut record = CorrectiveAction::new_for_insert(&dto);
        assert!(record.validate().is_ok());

        record.set_checked(true);
        let first = record.checked_at;
        assert!(first.is_some());
        record.set_checked(true);
        assert_eq!(record.checked_at, first);

        record.set_checked(false);
        assert!(!record.checked);
        assert!(record.checked_at.is_none());
    }
}
