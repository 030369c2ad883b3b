use crate::domain::common::base_aggregate::{generate_code, normalize_opt};
use crate::domain::common::BaseAggregate;
use crate::{define_aggregate_id, impl_aggregate_root};
use serde::{Deserialize, Serialize};

define_aggregate_id!(MaterialSaleId);

/// Line of a paid material sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl SaleLine {
    pub fn amount(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// Billing record attached to a visit: materials the customer paid for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialSale {
    #[serde(flatten)]
    pub base: BaseAggregate<MaterialSaleId>,

    pub visit_id: String,
    pub lines: Vec<SaleLine>,
    /// Always equal to the sum of line amounts
    pub total_amount: f64,
}

impl MaterialSale {
    pub fn new_for_insert(dto: &MaterialSaleDto) -> Self {
        let code = normalize_opt(dto.code.clone()).unwrap_or_else(|| generate_code("MS"));
        let description = normalize_opt(Some(dto.description.clone()))
            .unwrap_or_else(|| "Material sale".to_string());
        let mut base = BaseAggregate::new(MaterialSaleId::new_v4(), code, description);
        base.comment = dto.comment.clone();

        let mut sale = Self {
            base,
            visit_id: dto.visit_id.clone(),
            lines: dto.lines.clone(),
            total_amount: 0.0,
        };
        sale.recalculate_total();
        sale
    }

    pub fn update(&mut self, dto: &MaterialSaleDto) {
        if let Some(code) = normalize_opt(dto.code.clone()) {
            self.base.code = code;
        }
        if let Some(description) = normalize_opt(Some(dto.description.clone())) {
            self.base.description = description;
        }
        self.base.comment = dto.comment.clone();
        self.visit_id = dto.visit_id.clone();
        self.lines = dto.lines.clone();
        self.recalculate_total();
    }

    pub fn recalculate_total(&mut self) {
        // Rounded to cents so repeated edits don't accumulate float noise
        let total: f64 = self.lines.iter().map(SaleLine::amount).sum();
        self.total_amount = (total * 100.0).round() / 100.0;
    }

    pub fn validate(&self) -> Result<(), String> {
        self.base.validate()?;
        if uuid::Uuid::parse_str(&self.visit_id).is_err() {
            return Err("Sale must reference a visit".into());
        }
        if self.lines.is_empty() {
            return Err("Sale must have at least one line".into());
        }
        for (idx, line) in self.lines.iter().enumerate() {
            if line.product_id.trim().is_empty() {
                return Err(format!("Line {}: product is required", idx + 1));
            }
            if !(line.quantity > 0.0) {
                return Err(format!("Line {}: quantity must be positive", idx + 1));
            }
            if !line.unit_price.is_finite() || line.unit_price < 0.0 {
                return Err(format!("Line {}: unit price must be non-negative", idx + 1));
            }
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.recalculate_total();
        self.base.touch();
    }
}

impl_aggregate_root!(
    MaterialSale,
    MaterialSaleId,
    "a006",
    "material_sale",
    "Paid material sale"
);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialSaleDto {
    pub id: Option<String>,
    pub code: Option<String>,
    #[serde(default)]
    pub description: String,
    pub comment: Option<String>,
    pub visit_id: String,
    #[serde(default)]
    pub lines: Vec<SaleLine>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: f64, unit_price: f64) -> SaleLine {
        SaleLine {
            product_id: "p".into(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn test_total_is_sum_of_lines() {
        let dto = MaterialSaleDto {
            visit_id: uuid::Uuid::new_v4().to_string(),
            lines: vec![line(2.0, 50.0), line(1.0, 0.1), line(3.0, 0.2)],
            ..Default::default()
        };
        let sale = MaterialSale::new_for_insert(&dto);
        assert_eq!(sale.total_amount, 100.7);
        assert!(sale.validate().is_ok());
    }

    #[test]
    fn test_empty_or_bad_lines_rejected() {
        let mut dto = MaterialSaleDto {
            visit_id: uuid::Uuid::new_v4().to_string(),
            ..Default::default()
        };
        assert!(MaterialSale::new_for_insert(&dto).validate().is_err());

        dto.lines = vec![line(0.0, 10.0)];
        assert!(MaterialSale::new_for_insert(&dto).validate().is_err());
    }
}
