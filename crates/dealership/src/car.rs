use serde::{Deserialize, Serialize};

use ledgerkit_core::{DomainError, DomainResult, ValueObject};

/// A car model on offer, identified entirely by its attributes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Car {
    brand: String,
    model: String,
    year: u16,
    /// Unit price in whole tenge.
    price: u64,
}

impl Car {
    pub fn new(
        brand: impl Into<String>,
        model: impl Into<String>,
        year: u16,
        price: u64,
    ) -> DomainResult<Self> {
        let brand = brand.into();
        let model = model.into();
        if brand.trim().is_empty() {
            return Err(DomainError::validation("brand cannot be empty"));
        }
        if model.trim().is_empty() {
            return Err(DomainError::validation("model cannot be empty"));
        }

        Ok(Self {
            brand,
            model,
            year,
            price,
        })
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    /// "Toyota Camry 75"
    pub fn label(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

impl ValueObject for Car {}

impl core::fmt::Display for Car {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} {} {} - {} KZT",
            self.year, self.brand, self.model, self.price
        )
    }
}
