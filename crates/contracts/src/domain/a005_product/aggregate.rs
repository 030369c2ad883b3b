use crate::domain::common::base_aggregate::{generate_code, normalize_opt};
use crate::domain::common::BaseAggregate;
use crate::{define_aggregate_id, impl_aggregate_root};
use serde::{Deserialize, Serialize};

define_aggregate_id!(ProductId);

/// Catalog item sold during visits (baits, traps, chemicals)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(flatten)]
    pub base: BaseAggregate<ProductId>,

    /// Unit of measure ("pcs", "l", "kg")
    pub unit: String,
    pub unit_price: f64,
}

impl Product {
    pub fn new_for_insert(dto: &ProductDto) -> Self {
        let code = normalize_opt(dto.code.clone()).unwrap_or_else(|| generate_code("PRD"));
        let mut base = BaseAggregate::new(ProductId::new_v4(), code, dto.description.clone());
        base.comment = dto.comment.clone();

        Self {
            base,
            unit: normalize_opt(dto.unit.clone()).unwrap_or_else(|| "pcs".to_string()),
            unit_price: dto.unit_price,
        }
    }

    pub fn update(&mut self, dto: &ProductDto) {
        if let Some(code) = normalize_opt(dto.code.clone()) {
            self.base.code = code;
        }
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
        if let Some(unit) = normalize_opt(dto.unit.clone()) {
            self.unit = unit;
        }
        self.unit_price = dto.unit_price;
    }

    pub fn validate(&self) -> Result<(), String> {
        self.base.validate()?;
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            return Err("Unit price must be a non-negative number".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl_aggregate_root!(Product, ProductId, "a005", "product", "Product");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    pub comment: Option<String>,
    pub unit: Option<String>,
    #[serde(default)]
    pub unit_price: f64,
}
