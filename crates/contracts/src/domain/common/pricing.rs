use serde::{Deserialize, Serialize};

/// Billing model of a customer or a branch.
///
/// A customer is billed either a flat monthly amount or per visit. A branch
/// may override either value; unset (or non-positive) values fall through
/// to the next source when the report picks a unit price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(default)]
    pub monthly_price: Option<f64>,
    #[serde(default)]
    pub per_visit_price: Option<f64>,
}

impl Pricing {
    pub fn new(monthly_price: Option<f64>, per_visit_price: Option<f64>) -> Self {
        Self {
            monthly_price,
            per_visit_price,
        }
    }

    /// Per-visit price if one is configured
    pub fn per_visit(&self) -> Option<f64> {
        self.per_visit_price.filter(|p| *p > 0.0)
    }

    /// Monthly price if one is configured
    pub fn monthly(&self) -> Option<f64> {
        self.monthly_price.filter(|p| *p > 0.0)
    }

    pub fn is_configured(&self) -> bool {
        self.per_visit().is_some() || self.monthly().is_some()
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("monthly_price", self.monthly_price),
            ("per_visit_price", self.per_visit_price),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(format!("{} must be a non-negative number", name));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_price_is_not_configured() {
        let p = Pricing::new(Some(0.0), None);
        assert_eq!(p.monthly(), None);
        assert!(!p.is_configured());
    }

    #[test]
    fn test_negative_price_fails_validation() {
        assert!(Pricing::new(Some(-1.0), None).validate().is_err());
        assert!(Pricing::new(Some(900.0), Some(120.0)).validate().is_ok());
    }
}
