use crate::domain::common::base_aggregate::{generate_code, normalize_opt};
use crate::domain::common::{BaseAggregate, Pricing};
use crate::{define_aggregate_id, impl_aggregate_root};
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================
define_aggregate_id!(CustomerId);

// ============================================================================
// Aggregate Root
// ============================================================================

/// Legal/billing identity. Owns one or more branches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(flatten)]
    pub base: BaseAggregate<CustomerId>,

    pub email: Option<String>,
    pub phone: Option<String>,
    pub tax_number: Option<String>,

    #[serde(flatten)]
    pub pricing: Pricing,
}

impl Customer {
    pub fn new_for_insert(dto: &CustomerDto) -> Self {
        let code = normalize_opt(dto.code.clone()).unwrap_or_else(|| generate_code("CUS"));
        let mut base = BaseAggregate::new(CustomerId::new_v4(), code, dto.description.clone());
        base.comment = dto.comment.clone();

        Self {
            base,
            email: normalize_opt(dto.email.clone()),
            phone: normalize_opt(dto.phone.clone()),
            tax_number: normalize_opt(dto.tax_number.clone()),
            pricing: Pricing::new(dto.monthly_price, dto.per_visit_price),
        }
    }

    pub fn update(&mut self, dto: &CustomerDto) {
        if let Some(code) = normalize_opt(dto.code.clone()) {
            self.base.code = code;
        }
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
        self.email = normalize_opt(dto.email.clone());
        self.phone = normalize_opt(dto.phone.clone());
        self.tax_number = normalize_opt(dto.tax_number.clone());
        self.pricing = Pricing::new(dto.monthly_price, dto.per_visit_price);
    }

    pub fn validate(&self) -> Result<(), String> {
        self.base.validate()?;
        if let Some(ref email) = self.email {
            if !email.contains('@') {
                return Err("Invalid email format".into());
            }
        }
        self.pricing.validate()
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl_aggregate_root!(Customer, CustomerId, "a001", "customer", "Customer");

// ============================================================================
// DTO
// ============================================================================

/// Create/update payload. `id` present means update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    pub comment: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub tax_number: Option<String>,
    pub monthly_price: Option<f64>,
    pub per_visit_price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> CustomerDto {
        CustomerDto {
            description: "Anatolia Foods".into(),
            email: Some("billing@anatolia.example".into()),
            monthly_price: Some(900.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_customer_gets_generated_code() {
        let customer = Customer::new_for_insert(&dto());
        assert!(customer.base.code.starts_with("CUS-"));
        assert!(customer.validate().is_ok());
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut d = dto();
        d.email = Some("not-an-email".into());
        assert!(Customer::new_for_insert(&d).validate().is_err());
    }

    #[test]
    fn test_update_keeps_code_when_omitted() {
        let mut customer = Customer::new_for_insert(&dto());
        let code = customer.base.code.clone();
        let mut d = dto();
        d.per_visit_price = Some(150.0);
        customer.update(&d);
        assert_eq!(customer.base.code, code);
        assert_eq!(customer.pricing.per_visit(), Some(150.0));
    }
}
