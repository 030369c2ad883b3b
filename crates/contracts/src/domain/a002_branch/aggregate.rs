use crate::domain::common::base_aggregate::{generate_code, normalize_opt};
use crate::domain::common::{BaseAggregate, Pricing};
use crate::{define_aggregate_id, impl_aggregate_root};
use serde::{Deserialize, Serialize};

define_aggregate_id!(BranchId);

/// Physical site of a customer. Pricing here overrides the customer's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    #[serde(flatten)]
    pub base: BaseAggregate<BranchId>,

    pub customer_id: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    #[serde(flatten)]
    pub pricing: Pricing,
}

impl Branch {
    pub fn new_for_insert(dto: &BranchDto) -> Self {
        let code = normalize_opt(dto.code.clone()).unwrap_or_else(|| generate_code("BR"));
        let mut base = BaseAggregate::new(BranchId::new_v4(), code, dto.description.clone());
        base.comment = dto.comment.clone();

        Self {
            base,
            customer_id: dto.customer_id.clone(),
            address: normalize_opt(dto.address.clone()),
            latitude: dto.latitude,
            longitude: dto.longitude,
            pricing: Pricing::new(dto.monthly_price, dto.per_visit_price),
        }
    }

    pub fn update(&mut self, dto: &BranchDto) {
        if let Some(code) = normalize_opt(dto.code.clone()) {
            self.base.code = code;
        }
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
        self.customer_id = dto.customer_id.clone();
        self.address = normalize_opt(dto.address.clone());
        self.latitude = dto.latitude;
        self.longitude = dto.longitude;
        self.pricing = Pricing::new(dto.monthly_price, dto.per_visit_price);
    }

    /// Both coordinates, if the branch is geocoded
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.base.validate()?;
        if uuid::Uuid::parse_str(&self.customer_id).is_err() {
            return Err("Branch must reference a customer".into());
        }
        match (self.latitude, self.longitude) {
            (None, None) => {}
            (Some(lat), Some(lng)) => {
                if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
                    return Err("Coordinates out of range".into());
                }
            }
            _ => return Err("Latitude and longitude must be set together".into()),
        }
        self.pricing.validate()
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl_aggregate_root!(Branch, BranchId, "a002", "branch", "Branch");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    pub comment: Option<String>,
    pub customer_id: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub monthly_price: Option<f64>,
    pub per_visit_price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> BranchDto {
        BranchDto {
            description: "Kadikoy warehouse".into(),
            customer_id: uuid::Uuid::new_v4().to_string(),
            latitude: Some(40.99),
            longitude: Some(29.03),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_branch() {
        let branch = Branch::new_for_insert(&dto());
        assert!(branch.validate().is_ok());
        assert_eq!(branch.coordinates(), Some((40.99, 29.03)));
    }

    #[test]
    fn test_half_coordinates_rejected() {
        let mut d = dto();
        d.longitude = None;
        assert!(Branch::new_for_insert(&d).validate().is_err());
    }

    #[test]
    fn test_missing_customer_rejected() {
        let mut d = dto();
        d.customer_id = String::new();
        assert!(Branch::new_for_insert(&d).validate().is_err());
    }
}
