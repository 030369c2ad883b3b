use crate::domain::common::base_aggregate::{generate_code, normalize_opt};
use crate::domain::common::BaseAggregate;
use crate::{define_aggregate_id, impl_aggregate_root};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

define_aggregate_id!(VisitId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VisitStatus {
    #[default]
    Planned,
    Completed,
    Cancelled,
}

impl VisitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitStatus::Planned => "planned",
            VisitStatus::Completed => "completed",
            VisitStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for VisitStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planned" => Ok(VisitStatus::Planned),
            "completed" => Ok(VisitStatus::Completed),
            "cancelled" | "canceled" => Ok(VisitStatus::Cancelled),
            other => Err(anyhow::anyhow!("Unknown visit status: {}", other)),
        }
    }
}

impl std::fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A scheduled service call linking customer, branch and operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visit {
    #[serde(flatten)]
    pub base: BaseAggregate<VisitId>,

    pub customer_id: String,
    pub branch_id: String,
    pub operator_id: String,
    pub status: VisitStatus,
    pub visit_date: DateTime<Utc>,
    pub notes: Option<String>,
}

impl Visit {
    pub fn new_for_insert(dto: &VisitDto) -> Self {
        let code = normalize_opt(dto.code.clone()).unwrap_or_else(|| generate_code("VIS"));
        let description = normalize_opt(Some(dto.description.clone()))
            .unwrap_or_else(|| format!("Visit {}", dto.visit_date.format("%Y-%m-%d")));
        let mut base = BaseAggregate::new(VisitId::new_v4(), code, description);
        base.comment = dto.comment.clone();

        Self {
            base,
            customer_id: dto.customer_id.clone(),
            branch_id: dto.branch_id.clone(),
            operator_id: dto.operator_id.clone(),
            status: dto.status.unwrap_or_default(),
            visit_date: dto.visit_date,
            notes: normalize_opt(dto.notes.clone()),
        }
    }

    /// Status changes go through `complete`/`cancel`; finished visits
    /// cannot be reopened.
    pub fn update(&mut self, dto: &VisitDto) -> Result<(), String> {
        if let Some(code) = normalize_opt(dto.code.clone()) {
            self.base.code = code;
        }
        if let Some(description) = normalize_opt(Some(dto.description.clone())) {
            self.base.description = description;
        }
        self.base.comment = dto.comment.clone();
        self.customer_id = dto.customer_id.clone();
        self.branch_id = dto.branch_id.clone();
        self.operator_id = dto.operator_id.clone();
        match dto.status {
            Some(status) if status == self.status => {}
            Some(VisitStatus::Completed) => self.complete()?,
            Some(VisitStatus::Cancelled) => self.cancel()?,
            Some(VisitStatus::Planned) => return Err("Finished visit cannot be reopened".into()),
            None => {}
        }
        self.visit_date = dto.visit_date;
        self.notes = normalize_opt(dto.notes.clone());
        Ok(())
    }

    /// Mark the visit as done. Cancelled visits stay cancelled.
    pub fn complete(&mut self) -> Result<(), String> {
        match self.status {
            VisitStatus::Cancelled => Err("Cancelled visit cannot be completed".into()),
            _ => {
                self.status = VisitStatus::Completed;
                Ok(())
            }
        }
    }

    pub fn cancel(&mut self) -> Result<(), String> {
        match self.status {
            VisitStatus::Completed => Err("Completed visit cannot be cancelled".into()),
            _ => {
                self.status = VisitStatus::Cancelled;
                Ok(())
            }
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.base.validate()?;
        for (name, value) in [
            ("customer_id", &self.customer_id),
            ("branch_id", &self.branch_id),
            ("operator_id", &self.operator_id),
        ] {
            if uuid::Uuid::parse_str(value).is_err() {
                return Err(format!("{} must be a valid id", name));
            }
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl_aggregate_root!(Visit, VisitId, "a004", "visit", "Visit");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitDto {
    pub id: Option<String>,
    pub code: Option<String>,
    #[serde(default)]
    pub description: String,
    pub comment: Option<String>,
    pub customer_id: String,
    pub branch_id: String,
    pub operator_id: String,
    pub status: Option<VisitStatus>,
    pub visit_date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Filter for visit lists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisitListQuery {
    /// Inclusive, "YYYY-MM-DD"
    pub date_from: Option<chrono::NaiveDate>,
    /// Inclusive, "YYYY-MM-DD"
    pub date_to: Option<chrono::NaiveDate>,
    pub operator_id: Option<String>,
    pub status: Option<VisitStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> VisitDto {
        VisitDto {
            id: None,
            code: None,
            description: String::new(),
            comment: None,
            customer_id: uuid::Uuid::new_v4().to_string(),
            branch_id: uuid::Uuid::new_v4().to_string(),
            operator_id: uuid::Uuid::new_v4().to_string(),
            status: None,
            visit_date: "2025-03-10T09:00:00Z".parse().unwrap(),
            notes: None,
        }
    }

    #[test]
    fn test_default_description_and_status() {
        let visit = Visit::new_for_insert(&dto());
        assert_eq!(visit.base.description, "Visit 2025-03-10");
        assert_eq!(visit.status, VisitStatus::Planned);
        assert!(visit.validate().is_ok());
    }

    #[test]
    fn test_status_transitions() {
        let mut visit = Visit::new_for_insert(&dto());
        visit.cancel().unwrap();
        assert!(visit.complete().is_err());

        let mut visit = Visit::new_for_insert(&dto());
        visit.complete().unwrap();
        assert_eq!(visit.status, VisitStatus::Completed);
        assert!(visit.cancel().is_err());
    }

    #[test]
    fn test_update_cannot_complete_cancelled_visit() {
        let mut visit = Visit::new_for_insert(&dto());
        visit.cancel().unwrap();

        let mut change = dto();
        change.status = Some(VisitStatus::Completed);
        assert!(visit.update(&change).is_err());
        assert_eq!(visit.status, VisitStatus::Cancelled);

        change.status = Some(VisitStatus::Planned);
        assert!(visit.update(&change).is_err());
        assert_eq!(visit.status, VisitStatus::Cancelled);
    }

    #[test]
    fn test_update_moves_status_through_transitions() {
        let mut visit = Visit::new_for_insert(&dto());

        let mut change = dto();
        change.notes = Some("gate code 1234".into());
        visit.update(&change).unwrap();
        assert_eq!(visit.status, VisitStatus::Planned);

        change.status = Some(VisitStatus::Completed);
        visit.update(&change).unwrap();
        assert_eq!(visit.status, VisitStatus::Completed);

        // Same status again is not a transition
        visit.update(&change).unwrap();
        assert_eq!(visit.status, VisitStatus::Completed);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Completed".parse::<VisitStatus>().unwrap(), VisitStatus::Completed);
        assert_eq!("canceled".parse::<VisitStatus>().unwrap(), VisitStatus::Cancelled);
        assert!("done".parse::<VisitStatus>().is_err());
    }
}
