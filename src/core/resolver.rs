use crate::domain::model::PriceEstimate;
use crate::domain::ports::PriceResolver;
use crate::utils::error::{AppError, Result, UnknownVehicleError};
use std::collections::HashMap;

/// 內建價格表 (make, model, price)
pub const DEFAULT_CATALOG: &[(&str, &str, u32)] = &[
    ("honda", "accord", 4750),
    ("honda", "civic", 3500),
    ("toyota", "camry", 5200),
    ("toyota", "corolla", 3800),
    ("ford", "focus", 3200),
    ("ford", "mustang", 8500),
];

/// Lowercases, trims and collapses inner whitespace runs to one space.
pub fn normalize_key(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Read-only price lookup keyed by normalized (make, model).
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    prices: HashMap<(String, String), u32>,
}

impl PriceTable {
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, S, u32)>,
        S: AsRef<str>,
    {
        let mut prices = HashMap::new();

        for (make, model, price) in entries {
            let (make, model) = (make.as_ref(), model.as_ref());
            let key = (normalize_key(make), normalize_key(model));

            if key.0.is_empty() || key.1.is_empty() {
                return Err(AppError::InvalidConfigValueError {
                    field: "pricing.entries".to_string(),
                    value: format!("{}/{}", make, model),
                    reason: "make and model must not be empty".to_string(),
                });
            }
            if price == 0 {
                return Err(AppError::InvalidConfigValueError {
                    field: "pricing.entries".to_string(),
                    value: format!("{}/{}", make, model),
                    reason: "price must be greater than zero".to_string(),
                });
            }
            if prices.insert(key, price).is_some() {
                return Err(AppError::InvalidConfigValueError {
                    field: "pricing.entries".to_string(),
                    value: format!("{}/{}", make, model),
                    reason: "duplicate entry".to_string(),
                });
            }
        }

        Ok(Self { prices })
    }

    pub fn default_catalog() -> Self {
        let prices = DEFAULT_CATALOG
            .iter()
            .map(|(make, model, price)| ((make.to_string(), model.to_string()), *price))
            .collect();
        Self { prices }
    }

    pub fn lookup(&self, make: &str, model: &str) -> Option<u32> {
        self.prices
            .get(&(normalize_key(make), normalize_key(model)))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl PriceResolver for PriceTable {
    fn resolve(&self, make: &str, model: &str) -> std::result::Result<PriceEstimate, UnknownVehicleError> {
        match self.lookup(make, model) {
            Some(price) => Ok(PriceEstimate {
                make: make.to_string(),
                model: model.to_string(),
                price,
            }),
            None => Err(UnknownVehicleError {
                make: make.to_string(),
                model: model.to_string(),
            }),
        }
    }
}
