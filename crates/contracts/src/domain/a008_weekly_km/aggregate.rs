use crate::domain::common::base_aggregate::{generate_code, normalize_opt};
use crate::domain::common::BaseAggregate;
use crate::{define_aggregate_id, impl_aggregate_root};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

define_aggregate_id!(WeeklyKmId);

/// Odometer readings of an operator's vehicle for one week
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyKm {
    #[serde(flatten)]
    pub base: BaseAggregate<WeeklyKmId>,

    pub operator_id: String,
    /// Monday of the week
    pub week_start: NaiveDate,
    pub vehicle_plate: Option<String>,
    pub start_km: i64,
    pub end_km: i64,
}

impl WeeklyKm {
    pub fn new_for_insert(dto: &WeeklyKmDto) -> Self {
        let code = normalize_opt(dto.code.clone()).unwrap_or_else(|| generate_code("KM"));
        let week_start = monday_of(dto.week_start);
        let description = format!("Week of {}", week_start.format("%Y-%m-%d"));
        let mut base = BaseAggregate::new(WeeklyKmId::new_v4(), code, description);
        base.comment = dto.comment.clone();

        Self {
            base,
            operator_id: dto.operator_id.clone(),
            week_start,
            vehicle_plate: normalize_opt(dto.vehicle_plate.clone()).map(|p| p.to_uppercase()),
            start_km: dto.start_km,
            end_km: dto.end_km,
        }
    }

    pub fn update(&mut self, dto: &WeeklyKmDto) {
        self.base.comment = dto.comment.clone();
        self.operator_id = dto.operator_id.clone();
        self.week_start = monday_of(dto.week_start);
        self.base.description = format!("Week of {}", self.week_start.format("%Y-%m-%d"));
        self.vehicle_plate = normalize_opt(dto.vehicle_plate.clone()).map(|p| p.to_uppercase());
        self.start_km = dto.start_km;
        self.end_km = dto.end_km;
    }

    pub fn distance(&self) -> i64 {
        self.end_km - self.start_km
    }

    pub fn validate(&self) -> Result<(), String> {
        self.base.validate()?;
        if uuid::Uuid::parse_str(&self.operator_id).is_err() {
            return Err("Entry must reference an operator".into());
        }
        if self.start_km < 0 {
            return Err("Start km cannot be negative".into());
        }
        if self.end_km <= self.start_km {
            return Err("End km must be greater than start km".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl_aggregate_root!(WeeklyKm, WeeklyKmId, "a008", "weekly_km", "Weekly km entry");

/// Any day of the week maps to that week's Monday
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(date.weekday().num_days_from_monday() as i64)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyKmDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub comment: Option<String>,
    pub operator_id: String,
    pub week_start: NaiveDate,
    pub vehicle_plate: Option<String>,
    pub start_km: i64,
    pub end_km: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(start_km: i64, end_km: i64) -> WeeklyKmDto {
        WeeklyKmDto {
            id: None,
            code: None,
            comment: None,
            operator_id: uuid::Uuid::new_v4().to_string(),
            week_start: NaiveDate::from_ymd_opt(2025, 3, 13).unwrap(),
            vehicle_plate: Some("34 abc 123".into()),
            start_km,
            end_km,
        }
    }

    #[test]
    fn test_end_km_must_exceed_start_km() {
        assert!(WeeklyKm::new_for_insert(&dto(1000, 1000)).validate().is_err());
        assert!(WeeklyKm::new_for_insert(&dto(1000, 900)).validate().is_err());
        let entry = WeeklyKm::new_for_insert(&dto(1000, 1420));
        assert!(entry.validate().is_ok());
        assert_eq!(entry.distance(), 420);
    }

    #[test]
    fn test_week_start_normalized_to_monday() {
        let entry = WeeklyKm::new_for_insert(&dto(1, 2));
        assert_eq!(entry.week_start, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(entry.vehicle_plate.as_deref(), Some("34 ABC 123"));
    }
}
